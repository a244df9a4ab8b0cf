//! Journal file output

use crate::error::{JournalError, Result};
use crate::types::Timeframe;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment override for the report base directory.
pub const REPORTS_DIR_ENV: &str = "REPORTS_DIR";

/// Writes rendered journals under `<base>/<timeframe>/`.
pub struct ReportWriter {
    output_path: PathBuf,
}

impl ReportWriter {
    /// The base directory must already exist; the timeframe subdirectory is
    /// created on demand. `REPORTS_DIR` in the environment takes precedence
    /// over the configured directory, and `~` is expanded.
    pub fn new(report_dir: &str, timeframe: Timeframe) -> Result<Self> {
        let base = std::env::var(REPORTS_DIR_ENV).unwrap_or_else(|_| report_dir.to_string());
        let base = shellexpand::tilde(&base).into_owned();

        if !Path::new(&base).is_dir() {
            return Err(JournalError::Report(format!(
                "output path '{base}' does not exist"
            )));
        }

        let output_path = Path::new(&base).join(timeframe.to_string());
        if !output_path.is_dir() {
            std::fs::create_dir_all(&output_path)?;
        }

        Ok(Self { output_path })
    }

    pub fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        if file_name.is_empty() || content.is_empty() {
            let missing = if file_name.is_empty() { "file name" } else { "content" };
            return Err(JournalError::Report(format!(
                "no {missing} was provided to write the journal"
            )));
        }

        let path = self.output_path.join(format!("{file_name}.md"));
        std::fs::write(&path, content)?;
        info!(path = %path.display(), "journal written");

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_base_dir_rejected() {
        let result = ReportWriter::new("/definitely/not/a/real/dir", Timeframe::Daily);
        assert!(result.is_err());
    }

    #[test]
    fn test_writes_into_timeframe_subdir() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(tmp.path().to_str().unwrap(), Timeframe::Weekly).unwrap();

        let path = writer.write("Weekly Journal 2026-08-03", "# content").unwrap();
        assert!(path.ends_with("Weekly/Weekly Journal 2026-08-03.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# content");
    }

    #[test]
    fn test_empty_content_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let writer = ReportWriter::new(tmp.path().to_str().unwrap(), Timeframe::Daily).unwrap();

        assert!(writer.write("title", "").is_err());
        assert!(writer.write("", "content").is_err());
    }
}
