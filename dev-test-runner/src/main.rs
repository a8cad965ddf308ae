//! Runs every `<name>.input.json` under the cases directory through the suite
//! round trip and compares it with `<name>.expected.json`.
//!
//! Cases named `*.fail` must error and carry no expected file.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CASE_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?P<name>.+)\.input\.json$").unwrap());

#[derive(Parser, Debug)]
struct Settings {
    /// directory holding the case files
    #[arg(long, default_value = "suite/cases")]
    cases: PathBuf,

    /// only run cases whose name matches this regex
    #[arg(long)]
    filter: Option<Regex>,
}

#[derive(Debug)]
struct Case {
    name: String,
    input: PathBuf,
}

impl Case {
    fn expect_failure(&self) -> bool {
        self.name.ends_with(".fail")
    }

    fn expected_path(&self) -> PathBuf {
        self.input.with_file_name(format!("{}.expected.json", self.name))
    }

    fn check(&self) -> Result<()> {
        let source = std::fs::read(&self.input)
            .with_context(|| format!("failed to read {}", self.input.display()))?;
        let mut out = Vec::<u8>::new();
        let result = value_type::suite::run(source.as_slice(), &mut out);

        if self.expect_failure() {
            return match result {
                Ok(stats) => bail!("expected failure, decoded {} line(s)", stats.decoded),
                Err(_) => Ok(()),
            };
        }
        result?;

        let expected_path = self.expected_path();
        let expected = std::fs::read_to_string(&expected_path)
            .with_context(|| format!("failed to read {}", expected_path.display()))?;
        let actual = String::from_utf8(out)?;

        let expected = parse_lines(&expected).context("expected file")?;
        let actual = parse_lines(&actual).context("suite output")?;
        if expected.len() != actual.len() {
            bail!("expected {} document(s), got {}", expected.len(), actual.len());
        }
        for (index, (want, got)) in expected.iter().zip(actual.iter()).enumerate() {
            if want != got {
                bail!("document {}: expected {want}, got {got}", index + 1);
            }
        }
        Ok(())
    }
}

fn parse_lines(src: &str) -> Result<Vec<Value>> {
    src.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).with_context(|| format!("not JSON: {line}")))
        .collect()
}

fn discover(dir: &Path, filter: Option<&Regex>) -> Result<Vec<Case>> {
    let mut cases = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(caps) = CASE_FILE.captures(file_name) else {
            continue;
        };
        let name = caps["name"].to_string();
        if filter.is_some_and(|re| !re.is_match(&name)) {
            continue;
        }
        cases.push(Case { name, input: path });
    }
    cases.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(cases)
}

fn main() -> Result<ExitCode> {
    let settings = Settings::parse();
    let cases = discover(&settings.cases, settings.filter.as_ref())?;
    if cases.is_empty() {
        bail!("no cases found in {}", settings.cases.display());
    }

    let mut failed = 0usize;
    for case in &cases {
        match case.check() {
            Ok(()) => println!("{} {}", "PASS".green().bold(), case.name),
            Err(error) => {
                failed += 1;
                println!("{} {}: {error:#}", "FAIL".red().bold(), case.name);
            }
        }
    }

    let summary = format!("{} passed, {} failed", cases.len() - failed, failed);
    if failed == 0 {
        println!("{}", summary.green());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", summary.red());
        Ok(ExitCode::FAILURE)
    }
}
