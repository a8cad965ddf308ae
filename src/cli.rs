//! Minimal CLI: suite round trip | show
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::error::{Error, Result};
use crate::model::Type;
use crate::suite::Stats;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// decode JSON documents into the zero-field `Type` value and echo them back
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// tracing filter used when RUST_LOG is unset (e.g. `info`, `value_type=debug`)
    #[arg(long, global = true, env = "VALUE_TYPE_LOG", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// read one JSON document per line, decode it, write the re-encoding
    Suite(SuiteOut),
    /// build instances through the builder and print them
    Show(ShowOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// Zero or more inputs. May be literal paths or quoted glob patterns; stdin when omitted
    #[arg(long, short, num_args = 1..)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct SuiteOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct ShowOut {
    /// print the JSON encoding instead of the display form
    #[arg(long)]
    json: bool,

    /// how many instances to build
    #[arg(long, default_value_t = 1)]
    count: usize,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Input files in processing order; empty means stdin.
    fn resolve(&self) -> Result<Vec<PathBuf>> {
        resolve_file_path_patterns(&self.input)
    }

    fn load_process(&self, source_paths: &[PathBuf], output: &mut dyn Write) -> Result<Stats> {
        if self.input.is_empty() {
            tracing::debug!("reading suite input from stdin");
            return crate::suite::run(std::io::stdin().lock(), output);
        }

        let mut total = Stats::default();
        for source_path in source_paths {
            let file = File::open(source_path).map_err(|source| Error::Read {
                path: source_path.clone(),
                source,
            })?;
            tracing::debug!(path = %source_path.display(), "reading suite input");
            let stats = crate::suite::run(BufReader::new(file), &mut *output)?;
            total.lines += stats.lines;
            total.decoded += stats.decoded;
            total.skipped += stats.skipped;
        }
        Ok(total)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Suite(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                let source_paths = target.input_settings.resolve()?;

                let stats = match target.out.as_ref() {
                    Some(out) => {
                        ensure_not_an_input(out, &source_paths)?;

                        // the whole run lands in memory; `out` is only touched once it succeeded
                        let mut buffer = Vec::<u8>::new();
                        let stats = target.input_settings.load_process(&source_paths, &mut buffer)?;

                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("failed to create {}", parent.display()))?;
                        }
                        std::fs::write(out, &buffer)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                        stats
                    }
                    None => {
                        let mut stdout = BufWriter::new(std::io::stdout().lock());
                        target.input_settings.load_process(&source_paths, &mut stdout)?
                    }
                };
                tracing::info!(decoded = stats.decoded, "suite finished");
                Ok(())
            }
            Command::Show(target) => {
                let mut stdout = BufWriter::new(std::io::stdout().lock());
                show(target, &mut stdout)?;
                stdout.flush()?;
                Ok(())
            }
        }
    }
}

fn show(target: &ShowOut, output: &mut dyn Write) -> Result<()> {
    let builder = Type::builder();
    for _ in 0..target.count {
        let value = builder.build();
        value.foo();
        if target.json {
            writeln!(output, "{}", serde_json::to_string(&value)?)?;
        } else {
            writeln!(output, "{value}")?;
        }
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Refuse to overwrite a file that is also read as input.
fn ensure_not_an_input(out: &Path, source_paths: &[PathBuf]) -> Result<()> {
    // a missing `out` cannot be one of the inputs
    let Ok(out_canonical) = std::fs::canonicalize(out) else {
        return Ok(());
    };
    for source_path in source_paths {
        if std::fs::canonicalize(source_path).is_ok_and(|p| p == out_canonical) {
            return Err(Error::OutputIsInput(out.to_path_buf()));
        }
    }
    Ok(())
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'['))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                match entry {
                    Ok(p) => {
                        matched_any = true;
                        out.push(p);
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "skipping unreadable glob entry");
                    }
                }
            }
            if !matched_any {
                return Err(Error::NoMatch(pattern.to_string()));
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CommandLineInterface {
        CommandLineInterface::try_parse_from(std::iter::once("value-type").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn suite_reads_globbed_files_into_out() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}\n{\"k\": 1}\n").unwrap();
        std::fs::write(dir.path().join("b.json"), "\n{}\n").unwrap();
        let out = dir.path().join("nested/out.json");

        let pattern = dir.path().join("*.json");
        let cli = parse(&["suite", "-i", pattern.to_str().unwrap(), "--out", out.to_str().unwrap()]);
        cli.run().unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), "{}\n{}\n{}\n");
    }

    #[test]
    fn suite_surfaces_decode_errors() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(&input, "{}\n42\n").unwrap();
        let out = dir.path().join("out.json");

        let cli = parse(&["suite", "--input", input.to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let err = cli.run().unwrap_err();
        assert!(err.to_string().starts_with("line 2:"), "{err}");
    }

    #[test]
    fn glob_without_matches_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("*.nothing");
        let err = resolve_file_path_patterns([pattern.to_str().unwrap()]).unwrap_err();
        assert!(matches!(err, Error::NoMatch(_)));
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, vec![PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn show_prints_display_or_json() {
        let mut out = Vec::new();
        show(&ShowOut { json: false, count: 2 }, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Type()\nType()\n");

        let mut out = Vec::new();
        show(&ShowOut { json: true, count: 1 }, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{}\n");
    }

    #[test]
    fn log_level_defaults_to_warn_and_reads_env() {
        use clap::CommandFactory;
        let command = CommandLineInterface::command();
        let arg = command.get_arguments().find(|a| a.get_id() == "log_level").unwrap();
        let defaults: Vec<_> = arg.get_default_values().iter().map(|v| v.to_str()).collect();
        assert_eq!(defaults, vec![Some("warn")]);
        assert_eq!(arg.get_env().and_then(|v| v.to_str()), Some("VALUE_TYPE_LOG"));

        let cli = parse(&["show", "--log-level", "value_type=debug"]);
        assert_eq!(cli.log_level, "value_type=debug");
    }

    #[test]
    fn out_equal_to_input_is_rejected_and_left_intact() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        std::fs::write(&data, "{}\n{}\n").unwrap();

        let cli = parse(&["suite", "-i", data.to_str().unwrap(), "-o", data.to_str().unwrap()]);
        let err = cli.run().unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::OutputIsInput(_))), "{err}");
        assert_eq!(std::fs::read_to_string(&data).unwrap(), "{}\n{}\n");
    }

    #[test]
    fn out_matched_by_input_glob_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}\n".repeat(2000)).unwrap();
        let out = dir.path().join("z_out.json");
        std::fs::write(&out, "{}\n").unwrap();

        let pattern = dir.path().join("*.json");
        let cli = parse(&["suite", "-i", pattern.to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let err = cli.run().unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::OutputIsInput(_))), "{err}");
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "{}\n");
    }

    #[test]
    fn fresh_out_next_to_globbed_inputs_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), "{}\n".repeat(2000)).unwrap();
        let out = dir.path().join("z_out.json");

        let pattern = dir.path().join("*.json");
        let cli = parse(&["suite", "-i", pattern.to_str().unwrap(), "-o", out.to_str().unwrap()]);
        cli.run().unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap().lines().count(), 2000);
    }

    #[test]
    fn missing_literal_input_is_a_read_error_and_out_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let out = dir.path().join("out.json");

        let cli = parse(&["suite", "-i", missing.to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let err = cli.run().unwrap_err();
        match err.downcast_ref::<Error>() {
            Some(Error::Read { path, .. }) => assert_eq!(path, &missing),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!out.exists());
    }

    #[test]
    fn unmatched_glob_leaves_existing_out_alone() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.json");
        std::fs::write(&out, "previous\n").unwrap();

        let pattern = dir.path().join("*.nothing");
        let cli = parse(&["suite", "-i", pattern.to_str().unwrap(), "-o", out.to_str().unwrap()]);
        let err = cli.run().unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NoMatch(_))), "{err}");
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "previous\n");
    }

    #[test]
    fn decode_failure_leaves_existing_out_alone() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(&input, "{}\nnull\n").unwrap();
        let out = dir.path().join("out.json");
        std::fs::write(&out, "previous\n").unwrap();

        let cli = parse(&["suite", "-i", input.to_str().unwrap(), "-o", out.to_str().unwrap()]);
        assert!(cli.run().is_err());
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "previous\n");
    }
}
