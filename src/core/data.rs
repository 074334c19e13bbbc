//! RON data loading shared by every module that reads tuning files.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when loading a data file.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

/// Parse a RON string. `origin` names the source in error messages.
pub fn parse_ron<T: DeserializeOwned>(contents: &str, origin: &str) -> Result<T, DataLoadError> {
    ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
        path: origin.to_string(),
        details: e.to_string(),
    })
}

/// Read and parse one RON file.
pub fn load_ron<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, DataLoadError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    if !path.exists() {
        return Err(DataLoadError::FileNotFound(display));
    }
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    parse_ron(&contents, &display)
}

/// Load a RON file, or fall back to `T::default()` and log why.
pub fn load_or_default<T: DeserializeOwned + Default>(path: impl AsRef<Path>) -> T {
    match load_ron(path.as_ref()) {
        Ok(value) => {
            info!("Loaded {}", path.as_ref().display());
            value
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("{} not found, using defaults", path);
            T::default()
        }
        Err(e) => {
            error!("{}; using defaults", e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default, PartialEq)]
    struct Sample {
        speed: f32,
        #[serde(default)]
        name: String,
    }

    #[test]
    fn parses_partial_struct() {
        let sample: Sample = parse_ron("(speed: 2.5)", "inline").unwrap();
        assert_eq!(sample, Sample { speed: 2.5, name: String::new() });
    }

    #[test]
    fn parse_error_names_origin() {
        let err = parse_ron::<Sample>("(speed: fast)", "inline").unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { ref path, .. } if path == "inline"));
    }

    #[test]
    fn missing_file_falls_back() {
        let sample: Sample = load_or_default("assets/data/does_not_exist.ron");
        assert_eq!(sample, Sample::default());
    }
}
