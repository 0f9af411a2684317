//! JSONL audit log writer with daily file rotation.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

use super::{AuditEntry, AuditLogger};
use crate::{AppError, Result};

/// A daily-rotating JSONL audit log writer.
///
/// Appends one JSON object per line to `<log_dir>/audit-YYYY-MM-DD.jsonl`,
/// opening a new file when the calendar date changes between writes.
pub struct JsonlAuditWriter {
    log_dir: PathBuf,
    state: Mutex<Option<OpenFile>>,
}

struct OpenFile {
    date: NaiveDate,
    writer: BufWriter<File>,
}

impl JsonlAuditWriter {
    /// Construct a writer that stores logs in `log_dir`, creating the
    /// directory and its parents when absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Audit`] if the directory cannot be created.
    pub fn new(log_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&log_dir).map_err(|err| {
            AppError::Audit(format!(
                "failed to create audit log directory {}: {err}",
                log_dir.display()
            ))
        })?;
        Ok(Self {
            log_dir,
            state: Mutex::new(None),
        })
    }

    fn open_for_date(dir: &Path, date: NaiveDate) -> Result<OpenFile> {
        let path = dir.join(format!("audit-{date}.jsonl"));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                AppError::Audit(format!("failed to open audit log {}: {err}", path.display()))
            })?;
        Ok(OpenFile {
            date,
            writer: BufWriter::new(file),
        })
    }
}

impl AuditLogger for JsonlAuditWriter {
    fn log_entry(&self, entry: AuditEntry) -> Result<()> {
        let today = Utc::now().date_naive();
        let line = serde_json::to_string(&entry)
            .map_err(|err| AppError::Audit(format!("failed to serialize audit entry: {err}")))?;

        let mut guard = self
            .state
            .lock()
            .map_err(|_| AppError::Audit("audit writer mutex poisoned".into()))?;

        let rotate = guard.as_ref().is_none_or(|open| open.date != today);
        if rotate {
            *guard = Some(Self::open_for_date(&self.log_dir, today)?);
        }

        if let Some(open) = guard.as_mut() {
            writeln!(open.writer, "{line}")
                .map_err(|err| AppError::Audit(format!("audit write failed: {err}")))?;
            open.writer
                .flush()
                .map_err(|err| AppError::Audit(format!("audit flush failed: {err}")))?;
        }

        Ok(())
    }
}
