use std::fs;
use std::path::Path;

use crate::{AuditError, Result};

/// Report sinks. The scan itself never writes anything; these run only
/// after the report is fully assembled.
pub struct OutputWriter;

impl OutputWriter {
    pub fn new() -> Self {
        Self
    }

    /// Writes the report to a new file, creating parent directories.
    /// Refuses to clobber an existing file.
    pub fn write_file(&self, path: impl AsRef<Path>, contents: &str) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(AuditError::Output(format!(
                "output file '{}' already exists",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, contents)?;
        log::info!("report written to {}", path.display());
        Ok(())
    }

    pub fn copy_to_clipboard(&self, contents: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| AuditError::Output(format!("clipboard unavailable: {}", e)))?;
        clipboard
            .set_text(contents.to_string())
            .map_err(|e| AuditError::Output(format!("clipboard write failed: {}", e)))?;
        Ok(())
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}
