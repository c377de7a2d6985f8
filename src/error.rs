use thiserror::Error;

/// Errors that can occur during volume estimation.
///
/// Engine error codes are deliberately *not* represented here: a non-zero
/// code from the volume engine is returned as data inside
/// [`crate::TreeVolumeResult`] so batch evaluation can continue per tree.
/// Only problems detected before the engine is invoked become `Err`.
#[derive(Error, Debug)]
pub enum VolumeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown species: {0}")]
    UnknownSpecies(String),

    #[error("No volume equation for species {species} in region {region}")]
    NoEquation { species: u16, region: u8 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let err = VolumeError::Configuration("empty log length list".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: empty log length list"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let err = VolumeError::Validation("dbh must be non-negative".to_string());
        assert!(err.to_string().contains("Validation error"));
    }

    #[test]
    fn test_no_equation_display() {
        let err = VolumeError::NoEquation {
            species: 202,
            region: 6,
        };
        assert_eq!(
            err.to_string(),
            "No volume equation for species 202 in region 6"
        );
    }

    #[test]
    fn test_io_error_from_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: VolumeError = io_err.into();
        assert!(matches!(err, VolumeError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn test_json_error_from_conversion() {
        let result: Result<serde_json::Value, _> = serde_json::from_str("{bad json");
        let err: VolumeError = result.unwrap_err().into();
        assert!(matches!(err, VolumeError::Json(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let err = VolumeError::UnknownSpecies("ZZ".to_string());
        assert!(format!("{err:?}").contains("UnknownSpecies"));
    }
}
