//! Read model configuration JSON files.

use std::fs::File;
use std::path::Path;

use crate::domain::ModelConfig;
use crate::error::AppError;

/// Read and validate a config file. Missing keys take their defaults; unknown
/// keys are a configuration error.
pub fn read_config_json(path: &Path) -> Result<ModelConfig, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open config JSON '{}': {e}", path.display())))?;
    let config: ModelConfig = serde_json::from_reader(file).map_err(|e| {
        AppError::config(format!("Invalid config JSON '{}': {e}", path.display()))
    })?;
    config.validate()?;
    Ok(config)
}

/// Pretty-printed JSON for a config.
pub fn config_to_json(config: &ModelConfig) -> Result<String, AppError> {
    serde_json::to_string_pretty(config)
        .map_err(|e| AppError::io(format!("Failed to serialize config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("hank-core-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn partial_config_fills_defaults() {
        let path = temp_file("partial.json", r#"{ "nx": 50, "dof_removed_state": 1 }"#);
        let config = read_config_json(&path).unwrap();
        assert_eq!(config.nx, 50);
        assert_eq!(config.ns, 2);
        assert_eq!(config.dof_removed_state, 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unknown_key_is_rejected() {
        let path = temp_file("unknown.json", r#"{ "nx": 50, "n_gird": 3 }"#);
        let err = read_config_json(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_config_json(Path::new("/nonexistent/hank.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn defaults_serialize_back_to_an_equal_config() {
        let json = config_to_json(&ModelConfig::default()).unwrap();
        assert_eq!(ModelConfig::from_json_str(&json).unwrap(), ModelConfig::default());
    }
}
