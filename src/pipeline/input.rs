//! Input handling: read the source bytes and give the PDF engine a path.
//!
//! pdfium opens documents by file-system path, so the raw bytes handed to
//! the orchestrator are written to a [`NamedTempFile`]. The file is removed
//! when the handle is dropped, on success, on error and on panic alike.

use crate::error::Pdf2MdError;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Path argument that means "read the PDF from stdin".
pub const STDIN_PATH: &str = "-";

/// Read the PDF bytes from `path`, or from stdin when `path` is `-`.
pub fn read_input(path: impl AsRef<Path>) -> Result<Vec<u8>, Pdf2MdError> {
    let path = path.as_ref();

    if path.as_os_str() == STDIN_PATH {
        let mut bytes = Vec::new();
        std::io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .map_err(|e| Pdf2MdError::Io {
                path: PathBuf::from(STDIN_PATH),
                source: e,
            })?;
        debug!("Read {} bytes from stdin", bytes.len());
        return Ok(bytes);
    }

    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => Pdf2MdError::FileNotFound {
            path: path.to_path_buf(),
        },
        ErrorKind::PermissionDenied => Pdf2MdError::PermissionDenied {
            path: path.to_path_buf(),
        },
        _ => Pdf2MdError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Write `bytes` to a scoped temporary `.pdf` file.
///
/// The file lives exactly as long as the returned handle.
pub fn persist_temp(bytes: &[u8]) -> Result<NamedTempFile, Pdf2MdError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("pdf2md-")
        .suffix(".pdf")
        .tempfile()
        .map_err(Pdf2MdError::TempFile)?;
    tmp.write_all(bytes).map_err(Pdf2MdError::TempFile)?;
    tmp.flush().map_err(Pdf2MdError::TempFile)?;

    debug!("Persisted {} bytes to {}", bytes.len(), tmp.path().display());
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_file_not_found() {
        let err = read_input("/definitely/not/a/real/file.pdf").unwrap_err();
        assert!(matches!(err, Pdf2MdError::FileNotFound { .. }), "got {err:?}");
    }

    #[test]
    fn reads_existing_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.4\n").unwrap();
        let bytes = read_input(tmp.path()).unwrap();
        assert_eq!(bytes, b"%PDF-1.4\n");
    }

    #[test]
    fn temp_copy_is_removed_on_drop() {
        let tmp = persist_temp(b"%PDF-1.7").unwrap();
        let path = tmp.path().to_path_buf();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        drop(tmp);
        assert!(!path.exists());
    }
}
