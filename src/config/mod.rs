//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::canvas::{CanvasSettings, Rgba, StrokeStyle, Tool, ToolSwitchPolicy};
use crate::recognition::RecognitionSettings;
use crate::session::DEFAULT_CANVAS_SIZE;

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Canvas behavior
    pub canvas: CanvasConfig,
    /// Pencil stroke style
    pub pencil: PencilConfig,
    /// Eraser stroke style
    pub eraser: EraserConfig,
    /// Settings passed through to the recognizer
    pub recognition: RecognitionSettings,
    /// Which recognizer to run
    pub recognizer: RecognizerConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Canvas settings assembled from the individual sections
    pub fn canvas_settings(&self) -> CanvasSettings {
        CanvasSettings {
            initial_tool: self.canvas.default_tool,
            tool_switch_policy: self.canvas.tool_switch_policy,
            max_points_per_gesture: self.canvas.max_points_per_gesture,
            pencil: self.pencil.style(),
            eraser: self.eraser.style(),
        }
    }
}

/// Canvas behavior settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Tool selected at startup
    pub default_tool: Tool,
    /// What a tool switch does to a gesture in progress
    pub tool_switch_policy: ToolSwitchPolicy,
    /// Optional cap on samples per gesture
    pub max_points_per_gesture: Option<usize>,
    /// Canvas width handed to the recognizer
    pub width: f64,
    /// Canvas height handed to the recognizer
    pub height: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            default_tool: Tool::Pencil,
            tool_switch_policy: ToolSwitchPolicy::EndActive,
            max_points_per_gesture: None,
            width: DEFAULT_CANVAS_SIZE.0,
            height: DEFAULT_CANVAS_SIZE.1,
        }
    }
}

/// Pencil stroke style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PencilConfig {
    pub width: f64,
    pub color: Rgba,
}

impl Default for PencilConfig {
    fn default() -> Self {
        Self {
            width: StrokeStyle::PENCIL.width,
            color: StrokeStyle::PENCIL.color,
        }
    }
}

impl PencilConfig {
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.width)
    }
}

/// Eraser stroke style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EraserConfig {
    pub width: f64,
    pub color: Rgba,
}

impl Default for EraserConfig {
    fn default() -> Self {
        Self {
            width: StrokeStyle::ERASER.width,
            color: StrokeStyle::ERASER.color,
        }
    }
}

impl EraserConfig {
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.width)
    }
}

/// External recognizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Program to run for each request; recognition is unavailable when unset
    pub command: Option<String>,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// How long a script `recognize` step waits for the answer
    pub response_timeout_ms: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            response_timeout_ms: 10_000,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Get the configuration directory
pub fn config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "handwriting", "HandwritingCanvas")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Default location of the configuration file
pub fn default_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::RecognitionLevel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        // Check canvas defaults
        assert_eq!(config.canvas.default_tool, Tool::Pencil);
        assert_eq!(config.canvas.tool_switch_policy, ToolSwitchPolicy::EndActive);
        assert!(config.canvas.max_points_per_gesture.is_none());
        assert_eq!((config.canvas.width, config.canvas.height), (800.0, 600.0));

        // Check stroke styles
        assert_eq!(config.pencil.style(), StrokeStyle::new(Rgba::BLACK, 2.0));
        assert_eq!(config.eraser.style(), StrokeStyle::new(Rgba::WHITE, 20.0));

        // Check recognition defaults
        assert_eq!(config.recognition.level, RecognitionLevel::Accurate);
        assert!(config.recognizer.command.is_none());
        assert_eq!(config.recognizer.response_timeout_ms, 10_000);

        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.canvas.tool_switch_policy = ToolSwitchPolicy::Reject;
        config.canvas.max_points_per_gesture = Some(500);
        config.pencil.width = 3.5;
        config.recognition.minimum_text_height = Some(0.1);
        config.recognizer.command = Some("recognize-ink".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.canvas.tool_switch_policy, ToolSwitchPolicy::Reject);
        assert_eq!(parsed.canvas.max_points_per_gesture, Some(500));
        assert_eq!(parsed.pencil.width, 3.5);
        assert_eq!(parsed.recognition.minimum_text_height, Some(0.1));
        assert_eq!(parsed.recognizer.command.as_deref(), Some("recognize-ink"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [canvas]
            default_tool = "lasso"

            [eraser]
            width = 30.0
            "#,
        )
        .unwrap();

        assert_eq!(parsed.canvas.default_tool, Tool::Lasso);
        assert_eq!(parsed.canvas.width, 800.0);
        assert_eq!(parsed.eraser.width, 30.0);
        assert_eq!(parsed.eraser.color, Rgba::WHITE);
        assert_eq!(parsed.pencil.width, 2.0);
    }

    #[test]
    fn test_canvas_settings_from_config() {
        let mut config = AppConfig::default();
        config.canvas.default_tool = Tool::Eraser;
        config.eraser.width = 12.0;

        let settings = config.canvas_settings();
        assert_eq!(settings.initial_tool, Tool::Eraser);
        assert_eq!(settings.eraser.width, 12.0);
        assert_eq!(settings.pencil, StrokeStyle::new(Rgba::BLACK, 2.0));
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();

        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
