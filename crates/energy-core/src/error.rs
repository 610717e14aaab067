use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the household energy tools.
#[derive(Error, Debug)]
pub enum EnergyError {
    /// A measurement file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row of a measurement file is malformed.
    #[error("Invalid measurement row at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// A fill-mode name is not one of the recognised policies.
    #[error("Invalid fill mode: {0}")]
    InvalidFillMode(String),

    /// A period name is not one of the recognised aggregation periods.
    #[error("Invalid aggregation period: {0}")]
    InvalidPeriod(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the energy crates.
pub type Result<T> = std::result::Result<T, EnergyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = EnergyError::FileRead {
            path: PathBuf::from("/data/2008.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/data/2008.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_parse() {
        let err = EnergyError::Parse {
            line: 7,
            reason: "expected 10 fields, found 9".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid measurement row at line 7: expected 10 fields, found 9"
        );
    }

    #[test]
    fn test_error_display_invalid_fill_mode() {
        let err = EnergyError::InvalidFillMode("sideways".to_string());
        assert_eq!(err.to_string(), "Invalid fill mode: sideways");
    }

    #[test]
    fn test_error_display_invalid_period() {
        let err = EnergyError::InvalidPeriod("week".to_string());
        assert_eq!(err.to_string(), "Invalid aggregation period: week");
    }

    #[test]
    fn test_error_display_config() {
        let err = EnergyError::Config("no data file given".to_string());
        assert_eq!(err.to_string(), "Configuration error: no data file given");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: EnergyError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: EnergyError = json_err.into();
        assert!(err.to_string().contains("Failed to process JSON"));
    }
}
