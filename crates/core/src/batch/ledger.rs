//! Success and failure ledgers.

use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::pipeline::Outcome;

use super::error::LedgerError;

struct LedgerFile {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl LedgerFile {
    async fn open(path: &Path, append: bool) -> Result<Self, LedgerError> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)
            .await
            .map_err(|source| LedgerError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    async fn write_line(&mut self, line: &str) -> Result<(), LedgerError> {
        self.writer.write_all(line.as_bytes()).await.map_err(|e| self.write_error(e))?;
        self.writer.write_all(b"\n").await.map_err(|e| self.write_error(e))?;
        self.writer.flush().await.map_err(|e| self.write_error(e))
    }

    fn write_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

/// The two append-only outcome logs of a batch run.
///
/// Success lines are `<filename>success`, failure lines are the failure
/// reason. Both files are opened once and written by a single owner.
pub struct Ledgers {
    success: LedgerFile,
    failure: LedgerFile,
}

impl Ledgers {
    /// Opens both ledgers, truncating them unless `append` is set.
    pub async fn create(
        success_path: &Path,
        failure_path: &Path,
        append: bool,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            success: LedgerFile::open(success_path, append).await?,
            failure: LedgerFile::open(failure_path, append).await?,
        })
    }

    /// Writes one outcome to the matching ledger.
    pub async fn record(&mut self, outcome: &Outcome) -> Result<(), LedgerError> {
        match outcome {
            Outcome::Success { filename, .. } => {
                self.success
                    .write_line(&format!("{}success", filename))
                    .await
            }
            Outcome::Failure { reason, .. } => self.failure.write_line(reason).await,
        }
    }

    /// Flushes and closes both ledgers.
    pub async fn finish(mut self) -> Result<(), LedgerError> {
        self.success.writer.shutdown().await.map_err(|e| self.success.write_error(e))?;
        self.failure.writer.shutdown().await.map_err(|e| self.failure.write_error(e))?;
        Ok(())
    }
}
