//! Configuration parsing
//!
//! Supports TOML (primary) and JSON formats.

use contracts::{ViewerBlueprint, ViewerError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML format (recommended)
    Toml,
    /// JSON format
    Json,
}

impl ConfigFormat {
    /// Infer format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<ViewerBlueprint, ViewerError> {
    toml::from_str(content).map_err(|e| ViewerError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<ViewerBlueprint, ViewerError> {
    serde_json::from_str(content).map_err(|e| ViewerError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse configuration in the given format
pub fn parse(content: &str, format: ConfigFormat) -> Result<ViewerBlueprint, ViewerError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_full() {
        let content = r#"
[camera]
id = "front_depth"
mode = "depth_left"
width = 640
height = 480
frequency_hz = 30.0

[camera.intrinsics]
fx = 570.0
fy = 570.0
cx = 319.5
cy = 239.5
baseline_m = 0.06

[scene]
camera_height_m = 1.0
tilt_deg = 25.0
obstacle_count = 3

[floor]
ransac_iterations = 128
distance_threshold_m = 0.03

[[sinks]]
name = "frames"
kind = "file"
[sinks.params]
base_path = "./out"
"#;
        let result = parse_toml(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let bp = result.unwrap();
        assert_eq!(bp.camera.id, "front_depth");
        assert_eq!(bp.floor.ransac_iterations, 128);
        assert_eq!(bp.sinks[0].params.get("base_path").unwrap(), "./out");
    }

    #[test]
    fn test_parse_json_minimal() {
        let content = r#"{
            "camera": { "width": 320, "height": 240 },
            "sinks": [{ "name": "console", "kind": "log" }]
        }"#;
        let result = parse_json(content);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        assert_eq!(result.unwrap().camera.width, 320);
    }

    #[test]
    fn test_parse_toml_syntax_error() {
        let content = "invalid toml [[[";
        let result = parse_toml(content);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ViewerError::ConfigParse { .. }));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_extension("toml"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("TOML"),
            Some(ConfigFormat::Toml)
        );
        assert_eq!(
            ConfigFormat::from_extension("json"),
            Some(ConfigFormat::Json)
        );
        assert_eq!(ConfigFormat::from_extension("yaml"), None);
    }
}
