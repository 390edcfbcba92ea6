//! Interactive and one-shot sessions.
//!
//! Symbols are processed one at a time, in the order they arrive. A failed
//! run is reported and the session moves on to the next symbol.

use std::io::Write;

use crypto_analyst::{AnalystError, Pipeline, PipelineOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const PROMPT: &str = "Enter cryptocurrency symbol or name (or 'quit'): ";

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

#[derive(Debug, PartialEq, Eq)]
pub enum Input<'a> {
    Quit,
    Skip,
    Symbol(&'a str),
}

pub fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        Input::Skip
    } else if QUIT_WORDS.iter().any(|w| trimmed.eq_ignore_ascii_case(w)) {
        Input::Quit
    } else {
        Input::Symbol(trimmed)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Read symbols until a quit word or end of input.
///
/// Lines are decoded lossily so stray non-UTF-8 bytes fail only that symbol.
pub async fn run_interactive<R, W>(pipeline: &Pipeline, mut reader: R, out: &mut W) -> anyhow::Result<Summary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();
    let mut summary = Summary::default();

    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            writeln!(out)?;
            break;
        }
        let line = String::from_utf8_lossy(&buf);

        match classify(&line) {
            Input::Quit => break,
            Input::Skip => continue,
            Input::Symbol(symbol) => {
                let ok = analyze_one(pipeline, symbol, out).await?;
                summary.record(ok);
            }
        }
    }

    tracing::info!(succeeded = summary.succeeded, failed = summary.failed, "session ended");
    Ok(summary)
}

pub async fn run_batch<W: Write>(pipeline: &Pipeline, symbols: &[String], out: &mut W) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    for symbol in symbols {
        match classify(symbol) {
            Input::Symbol(symbol) => {
                let ok = analyze_one(pipeline, symbol, out).await?;
                summary.record(ok);
            }
            Input::Quit | Input::Skip => tracing::debug!(%symbol, "ignoring argument"),
        }
    }
    Ok(summary)
}

async fn analyze_one<W: Write>(pipeline: &Pipeline, symbol: &str, out: &mut W) -> anyhow::Result<bool> {
    match pipeline.run(symbol).await {
        Ok(outcome) => {
            print_outcome(&outcome, out)?;
            Ok(true)
        }
        Err(err) => {
            report_failure(symbol, &err);
            Ok(false)
        }
    }
}

fn print_outcome<W: Write>(outcome: &PipelineOutcome, out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(&outcome.report)?)?;
    writeln!(out, "Saved {}", outcome.persisted.json_path.display())?;
    writeln!(out, "Appended {}", outcome.persisted.csv_path.display())?;
    Ok(())
}

fn report_failure(symbol: &str, err: &AnalystError) {
    tracing::error!(%symbol, error = %err, "analysis failed");
    eprintln!("Error analyzing {symbol}: {}", err.user_message());
}
