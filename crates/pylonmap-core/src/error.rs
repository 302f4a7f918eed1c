//! Error type shared by the pylonmap crates.
//!
//! Only whole-document failures are errors. Problems confined to a single
//! entity (missing fields, malformed numbers, dangling links) are recorded in
//! [`crate::diagnostics::ConversionDiagnostics`] and never surface here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PylonmapError {
    /// Source document could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Source document is not well formed
    #[error("Parse error: {0}")]
    Parse(String),
}

pub type PylonmapResult<T> = Result<T, PylonmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_names_location() {
        let err = PylonmapError::Parse("at byte 120: mismatched end tag".into());
        assert_eq!(err.to_string(), "Parse error: at byte 120: mismatched end tag");
    }

    #[test]
    fn test_missing_document_is_io() {
        fn read(path: &str) -> PylonmapResult<String> {
            Ok(std::fs::read_to_string(path)?)
        }

        let err = read("/nonexistent/pylonmap/export.xml").unwrap_err();
        assert!(matches!(err, PylonmapError::Io(_)));
    }
}
