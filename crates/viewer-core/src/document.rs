//! Retrieval of document bytes for the viewer.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use doc_model::{DocumentBuffer, SearchResult};

const PDF_HEADER: &[u8] = b"%PDF-";

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to open ({path}): {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Must not be PDF (File should start with PDF header): {path}")]
    NotPdf { path: String },
    #[error("No document is open")]
    NoDocument,
    #[error("Search failed ({path}): {message}")]
    Search { path: String, message: String },
}

/// Source of document bytes. Implementations choose the buffer shape.
pub trait DocumentSource {
    fn read(&self, filepath: &str) -> Result<DocumentBuffer, DocumentError>;
}

/// Full-text search over a document, owned by the rendering engine.
pub trait DocumentSearch {
    fn search(&self, search_term: &str, filepath: &str) -> Result<SearchResult, DocumentError>;
}

/// Reads a whole PDF file from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentSource;

impl DocumentSource for FsDocumentSource {
    fn read(&self, filepath: &str) -> Result<DocumentBuffer, DocumentError> {
        let path = Path::new(filepath);
        let mut file = File::open(path)
            .map_err(|source| DocumentError::Open { path: filepath.to_owned(), source })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| DocumentError::Read { path: filepath.to_owned(), source })?;

        if !bytes.starts_with(PDF_HEADER) {
            return Err(DocumentError::NotPdf { path: filepath.to_owned() });
        }

        tracing::debug!(%filepath, bytes = bytes.len(), "document read");
        Ok(DocumentBuffer::Whole(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_whole_pdf_including_header() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("sample.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%%EOF\n").expect("fixture should be written");

        let buffer = FsDocumentSource
            .read(path.to_str().expect("temp path should be utf-8"))
            .expect("pdf should be read");

        match buffer {
            DocumentBuffer::Whole(bytes) => assert!(bytes.starts_with(b"%PDF-1.7")),
            DocumentBuffer::Pages(_) => panic!("filesystem source returns a whole buffer"),
        }
    }

    #[test]
    fn rejects_files_without_pdf_header() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("notes.txt");
        std::fs::write(&path, b"plain text").expect("fixture should be written");

        let err = FsDocumentSource
            .read(path.to_str().expect("temp path should be utf-8"))
            .expect_err("non-pdf should be rejected");

        assert!(matches!(err, DocumentError::NotPdf { .. }));
        assert!(err.to_string().starts_with("Must not be PDF"));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let path = temp.path().join("missing.pdf");

        let err = FsDocumentSource
            .read(path.to_str().expect("temp path should be utf-8"))
            .expect_err("missing file should fail");

        assert!(matches!(err, DocumentError::Open { .. }));
        assert!(err.to_string().starts_with("Failed to open ("));
    }
}
