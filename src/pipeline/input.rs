//! Input validation: make sure the user-supplied path is a readable PDF.
//!
//! The `%PDF` magic bytes are checked before pdfium is involved so a wrong
//! file produces [`DirectoryError::NotAPdf`] instead of a generic pdfium
//! load failure.

use crate::error::DirectoryError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate that `path` exists, is readable, and starts with `%PDF`.
pub fn validate_pdf_path(path: &Path) -> Result<PathBuf, DirectoryError> {
    let path = path.to_path_buf();

    if !path.exists() {
        return Err(DirectoryError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(DirectoryError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(DirectoryError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(DirectoryError::FileNotFound { path });
        }
    }

    debug!("Validated PDF input: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_is_not_found() {
        let err = validate_pdf_path(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, DirectoryError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_not_a_pdf() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"title, category\n").unwrap();
        let err = validate_pdf_path(tmp.path()).unwrap_err();
        match err {
            DirectoryError::NotAPdf { magic, .. } => assert_eq!(&magic, b"titl"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_is_accepted() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"%PDF-1.7\n%%EOF\n").unwrap();
        let path = validate_pdf_path(tmp.path()).unwrap();
        assert_eq!(path, tmp.path());
    }
}
