//! @ai:module:intent Configuration structs for the report pipeline
//! @ai:module:layer infrastructure
//! @ai:module:public_api ReportConfig, ApiConfig, PathConfig, RenderConfig, RunConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// @ai:intent Main configuration for the report pipeline
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub api: ApiConfig,
    pub paths: PathConfig,
    pub render: RenderConfig,
    pub run: RunConfig,
}

/// @ai:intent API configuration for the text-generation client
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Fixed pause between generation calls for consecutive students
    #[serde(default = "default_request_delay")]
    pub request_delay_secs: u64,
}

/// @ai:intent Path configuration for input/output directories
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_logo_file")]
    pub logo_file: PathBuf,
}

/// @ai:intent Branding strings for the rendered document
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_footer_brand")]
    pub footer_brand: String,
    #[serde(default = "default_logo_placeholder")]
    pub logo_placeholder: String,
}

/// @ai:intent Run configuration for pipeline execution
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub dry_run: bool,
    /// Restrict processing to these student ids; `None` processes everything
    #[serde(default)]
    pub student_ids: Option<Vec<String>>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            paths: PathConfig::default(),
            render: RenderConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            request_delay_secs: default_request_delay(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            logo_file: default_logo_file(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            footer_brand: default_footer_brand(),
            logo_placeholder: default_logo_placeholder(),
        }
    }
}

fn default_model() -> String {
    "llama3-70b-8192".to_string()
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.7
}

fn default_request_delay() -> u64 {
    5
}

fn default_logo_file() -> PathBuf {
    PathBuf::from("mathongo_logo.jpeg")
}

fn default_footer_brand() -> String {
    "MathonGo IIT JEE Prep".to_string()
}

fn default_logo_placeholder() -> String {
    "MathonGo Logo Placeholder".to_string()
}

impl ReportConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl RunConfig {
    /// @ai:intent Check whether a student id passes the configured filter
    /// @ai:effects pure
    pub fn selects(&self, student_id: &str) -> bool {
        self.student_ids
            .as_ref()
            .map(|ids| ids.iter().any(|id| id == student_id))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_selects_all_when_empty() {
        let run = RunConfig::default();
        assert!(run.selects("220"));
        assert!(run.selects("anything"));
    }

    #[test]
    fn test_filter_selects_specific_students() {
        let run = RunConfig {
            student_ids: Some(vec!["220".to_string(), "221".to_string()]),
            ..Default::default()
        };
        assert!(run.selects("220"));
        assert!(run.selects("221"));
        assert!(!run.selects("999"));
    }

    #[test]
    fn test_defaults_match_service_contract() {
        let api = ApiConfig::default();
        assert_eq!(api.model, "llama3-70b-8192");
        assert_eq!(api.max_tokens, 800);
        assert!((api.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(api.request_delay_secs, 5);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = ReportConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ReportConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.api.model, config.api.model);
        assert_eq!(parsed.paths.data_dir, config.paths.data_dir);
        assert_eq!(parsed.render.footer_brand, config.render.footer_brand);
    }
}
