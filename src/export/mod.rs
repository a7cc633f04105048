use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::utils::ensure_directory;

/// File name the generated script is downloaded as.
pub const SCRIPT_FILE_NAME: &str = "existance_check.bat";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    /// Nothing was generated, so the clipboard was left untouched.
    Skipped,
}

/// Destination for the copy action.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError>;
}

/// The host system clipboard.
pub struct SystemClipboard {
    clipboard: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ExportError> {
        let clipboard =
            arboard::Clipboard::new().map_err(|e| ExportError::Clipboard(e.to_string()))?;
        Ok(Self { clipboard })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
        self.clipboard
            .set_text(text.to_string())
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

/// True when there is no script worth copying or writing.
pub fn is_blank(script: &str) -> bool {
    script.trim().is_empty()
}

/// Copy `script` to `sink`. A blank script is a no-op.
pub fn copy_script(script: &str, sink: &mut dyn ClipboardSink) -> Result<CopyOutcome, ExportError> {
    if is_blank(script) {
        log::debug!("copy skipped: no script generated");
        return Ok(CopyOutcome::Skipped);
    }

    sink.set_text(script)?;
    log::info!("copied {} byte script to clipboard", script.len());
    Ok(CopyOutcome::Copied)
}

/// Write `script` as `existance_check.bat` inside `dir`.
///
/// Returns the written path, or `None` when the script is blank and nothing
/// was written.
pub fn write_script_file(script: &str, dir: &Path) -> Result<Option<PathBuf>, ExportError> {
    if is_blank(script) {
        log::debug!("download skipped: no script generated");
        return Ok(None);
    }

    ensure_directory(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(SCRIPT_FILE_NAME);
    fs::write(&path, script.as_bytes()).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    log::info!("wrote {}", path.display());
    Ok(Some(path))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// In-memory clipboard, optionally refusing writes.
    #[derive(Default)]
    pub struct MemoryClipboard {
        pub contents: Option<String>,
        pub deny: bool,
    }

    impl ClipboardSink for MemoryClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ExportError> {
            if self.deny {
                return Err(ExportError::Clipboard("permission denied".to_string()));
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }
}
