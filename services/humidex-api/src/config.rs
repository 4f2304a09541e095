//! Loader configuration from YAML.

use std::path::Path;

use anyhow::{Context, Result};
use netcdf_parser::LoaderConfig;

/// Load variable and dimension names from an optional YAML file.
///
/// Without a path the defaults are used. A path that does not exist falls
/// back to the defaults with a warning; a file that exists but does not
/// parse is an error.
///
/// ```yaml
/// humidex_var: humidex_max
/// longitude_vars: [lon]
/// latitude_vars: [lat]
/// ```
pub fn load_loader_config(path: Option<&Path>) -> Result<LoaderConfig> {
    let Some(path) = path else {
        return Ok(LoaderConfig::default());
    };

    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "Loader config does not exist, using defaults"
        );
        return Ok(LoaderConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {:?}", path))?;

    let config: LoaderConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse loader config: {:?}", path))?;

    tracing::info!(path = %path.display(), "Loaded loader config");

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_no_path_gives_defaults() {
        let config = load_loader_config(None).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_loader_config(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert_eq!(config, LoaderConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "humidex_var: hx\nlongitude_vars: [x_coord]").unwrap();

        let config = load_loader_config(Some(file.path())).unwrap();
        assert_eq!(config.humidex_var, "hx");
        assert_eq!(config.longitude_vars, vec!["x_coord".to_string()]);
        // Unspecified fields keep their defaults
        assert_eq!(config.scenario_dim, "gwl");
        assert_eq!(config.latitude_vars, LoaderConfig::default().latitude_vars);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "longitude_vars: {{ not: a list }}").unwrap();

        let err = load_loader_config(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
