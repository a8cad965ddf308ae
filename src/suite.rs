//! Line-oriented round trip: every non-blank input line is one JSON document,
//! decoded into [`Type`] and written back in its canonical encoding.
use std::io::{BufRead, Write};

use crate::error::{Error, Result};
use crate::model::Type;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub lines: usize,
    pub decoded: usize,
    pub skipped: usize,
}

/// Decode one document and return its re-encoding.
pub fn roundtrip_line(line: &str) -> Result<String> {
    let value: Type = crate::path_de::from_str_with_path(line)?;
    Ok(serde_json::to_string(&value)?)
}

pub fn run<R: BufRead, W: Write>(input: R, mut output: W) -> Result<Stats> {
    let mut stats = Stats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        stats.lines += 1;

        if line.trim().is_empty() {
            stats.skipped += 1;
            continue;
        }

        let encoded = roundtrip_line(&line).map_err(|source| Error::Line {
            line: index + 1,
            source: Box::new(source),
        })?;
        tracing::debug!(line = index + 1, %encoded, "decoded");

        writeln!(output, "{encoded}")?;
        stats.decoded += 1;
    }

    output.flush()?;
    tracing::info!(lines = stats.lines, decoded = stats.decoded, skipped = stats.skipped, "suite run complete");
    Ok(stats)
}
