use value_type::cli;

fn main() -> anyhow::Result<()> {
    let command_line_interface = cli::CommandLineInterface::load();
    value_type::logging::init(&command_line_interface.log_level);
    command_line_interface.run()
}
