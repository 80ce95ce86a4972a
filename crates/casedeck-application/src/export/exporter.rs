use std::path::{Path, PathBuf};

use casedeck_core::error::{CasedeckError, Result};
use casedeck_core::filter::FilterCriteria;
use casedeck_core::notification::Notification;
use casedeck_core::test_case::TestCase;
use casedeck_infrastructure::spreadsheet::write_workbook;
use chrono::{DateTime, Utc};

use super::layout::build_worksheet;
use crate::events::Notifier;
use crate::session::SessionStore;

/// A generated workbook, ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Number of data rows, excluding the template rows.
    pub row_count: usize,
}

/// Result of an export request.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Exported(ExportedFile),
    /// The view was empty; no file was produced.
    AbortedEmpty,
}

impl ExportOutcome {
    /// The file, or `EmptyExport` when nothing was produced.
    pub fn into_file(self) -> Result<ExportedFile> {
        match self {
            ExportOutcome::Exported(file) => Ok(file),
            ExportOutcome::AbortedEmpty => Err(CasedeckError::EmptyExport),
        }
    }
}

/// `test_cases_<session title>_<UTC yyyyMMddHHmmssSSS>.xlsx`
///
/// Characters that are unsafe in file names are replaced by `_`.
pub fn export_filename(session_title: &str, now: DateTime<Utc>) -> String {
    let sanitized: String = session_title
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let title = if sanitized.is_empty() {
        "untitled"
    } else {
        sanitized.as_str()
    };
    format!(
        "test_cases_{}_{}.xlsx",
        title,
        now.format("%Y%m%d%H%M%S%3f")
    )
}

/// Serializes the visible test cases into the import-template workbook.
pub struct SpreadsheetExporter {
    notifier: Notifier,
}

impl SpreadsheetExporter {
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }

    /// Builds the workbook for `cases` in input order.
    pub fn export<'a, I>(&self, cases: I, session_title: &str) -> Result<ExportOutcome>
    where
        I: IntoIterator<Item = &'a TestCase>,
    {
        Self::export_at(cases, session_title, Utc::now())
    }

    /// Like [`export`](Self::export) with an explicit timestamp for the filename.
    pub fn export_at<'a, I>(
        cases: I,
        session_title: &str,
        now: DateTime<Utc>,
    ) -> Result<ExportOutcome>
    where
        I: IntoIterator<Item = &'a TestCase>,
    {
        let cases: Vec<&TestCase> = cases.into_iter().collect();
        if cases.is_empty() {
            return Ok(ExportOutcome::AbortedEmpty);
        }

        let row_count = cases.len();
        let bytes = write_workbook(&build_worksheet(cases))?;
        Ok(ExportOutcome::Exported(ExportedFile {
            bytes,
            filename: export_filename(session_title, now),
            row_count,
        }))
    }

    /// Exports `cases` and writes the workbook into `dir`.
    ///
    /// Returns the written path, or `None` when there was nothing to export.
    pub async fn export_to_dir<'a, I>(
        &self,
        cases: I,
        session_title: &str,
        dir: &Path,
    ) -> Result<Option<PathBuf>>
    where
        I: IntoIterator<Item = &'a TestCase>,
    {
        let file = match self.export(cases, session_title)? {
            ExportOutcome::Exported(file) => file,
            ExportOutcome::AbortedEmpty => {
                tracing::warn!("[SpreadsheetExporter] Nothing to export");
                self.notifier.notify(Notification::warning("Nothing to export"));
                return Ok(None);
            }
        };

        let path = dir.join(&file.filename);
        let written = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, &file.bytes).await
        }
        .await;
        if let Err(e) = written {
            tracing::error!(
                "[SpreadsheetExporter] Failed to write {}: {}",
                path.display(),
                e
            );
            self.notifier
                .notify(Notification::error(format!("Export failed: {e}")));
            return Err(e.into());
        }

        tracing::info!(
            "[SpreadsheetExporter] Exported {} test cases to {}",
            file.row_count,
            path.display()
        );
        self.notifier.notify(Notification::success(format!(
            "Exported {} test cases",
            file.row_count
        )));
        Ok(Some(path))
    }

    /// Exports the active session's test cases that pass `criteria`.
    ///
    /// Returns `None` when there was nothing to export or the active session
    /// changed while its test cases were loading.
    pub async fn export_view(
        &self,
        store: &SessionStore,
        criteria: &FilterCriteria,
        dir: &Path,
    ) -> Result<Option<PathBuf>> {
        let session = store
            .active_session()
            .await
            .ok_or_else(|| CasedeckError::validation("session", "no active session"))?;

        let Some(cases) = store.active_test_cases().await? else {
            return Ok(None);
        };
        let visible = criteria.apply(&cases);
        tracing::debug!(
            "[SpreadsheetExporter] {} of {} test cases visible",
            visible.len(),
            cases.len()
        );
        self.export_to_dir(visible, &session.title, dir).await
    }
}
