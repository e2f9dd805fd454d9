use super::Reporter;
use crate::message::{Outcome, format_outcome};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{self, AsyncWrite, AsyncWriteExt, BufWriter};

/// Reporter writing one human-readable line per outcome.
///
/// Lines look like `M_7 = 2^7 - 1: prime`.
pub struct LineReporter<W> {
    writer: BufWriter<W>,
    lines: usize,
}

impl LineReporter<io::Stdout> {
    /// Creates a reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W> LineReporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            lines: 0,
        }
    }

    /// Number of lines written so far.
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> Reporter for LineReporter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn report(&mut self, outcome: &Outcome) -> Result<()> {
        let line = format!("{}\n", format_outcome(outcome));
        self.writer
            .write_all(line.as_bytes())
            .await
            .context("Failed to write report line")?;
        self.lines += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .context("Failed to flush report output")
    }

    fn name(&self) -> &'static str {
        "line"
    }
}
