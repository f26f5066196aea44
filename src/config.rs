use std::path::PathBuf;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ai: AiConfig,
    pub suggest: SuggestConfig,
    pub school: SchoolConfig,
    pub export: ExportConfig,
    pub tui: TuiConfig,
}

/// Generative AI backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key. Usually left empty here and supplied via environment or keyring.
    pub api_key: Option<String>,
    /// Model used for topics, curriculum prefill and full plan content.
    pub text_model: String,
    /// Model used for the illustration.
    pub image_model: String,
    /// Base URL of the Generative Language API.
    pub api_base: String,
    pub suggestion_timeout_secs: u64,
    pub content_timeout_secs: u64,
    pub image_timeout_secs: u64,
}

/// Autosuggestion tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    /// Quiet period after the last edit before a prefill call is issued.
    pub debounce_ms: u64,
    /// Material text must be strictly longer than this to trigger a prefill.
    pub min_material_chars: usize,
    /// Upper bound on advisory topics kept from a suggestion response.
    pub max_topics: usize,
}

/// School profile used to seed a new lesson plan form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchoolConfig {
    pub school_name: String,
    /// Selectable class teachers; the first one is preselected.
    pub teachers: Vec<String>,
    pub teacher_nip: String,
    pub principal_name: String,
    pub principal_nip: String,
    pub academic_year: String,
    pub default_subject: String,
    pub default_grade: String,
    pub default_duration: String,
    pub default_meeting_count: u32,
    /// Place printed in front of the signing date.
    pub signing_place: String,
}

/// Document export configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Override the default output directory.
    pub output_dir: Option<PathBuf>,
    /// External HTML-to-PDF rasteriser executable.
    pub pdf_command: String,
    pub page_width_mm: u32,
    pub page_height_mm: u32,
    pub margin_mm: u32,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            text_model: "gemini-3-flash-preview".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            suggestion_timeout_secs: 30,
            content_timeout_secs: 180,
            image_timeout_secs: 120,
        }
    }
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 1200,
            min_material_chars: 5,
            max_topics: 10,
        }
    }
}

impl Default for SchoolConfig {
    fn default() -> Self {
        Self {
            school_name: "SDN 14 Andopan".to_string(),
            teachers: vec![
                "Nasriwanto, S.Pd".to_string(),
                "Raynaldi, S.Pd".to_string(),
                "Randi Maikel, S.Or".to_string(),
                "Nilam Melani Putri, S.Pd".to_string(),
                "Lelis Mawati, S.Pd".to_string(),
                "Raflinda Roza, S.Pd".to_string(),
                "Sarwenda, S.PdI".to_string(),
            ],
            teacher_nip: "19XXXXXXXXXXXXX".to_string(),
            principal_name: "Drs. H. Ahmad".to_string(),
            principal_nip: "19XXXXXXXXXXXXX".to_string(),
            academic_year: "2025/2026".to_string(),
            default_subject: "Bahasa Indonesia".to_string(),
            default_grade: "Kelas 4".to_string(),
            default_duration: "2 x 35 menit".to_string(),
            default_meeting_count: 2,
            signing_place: "Andopan".to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            pdf_command: "wkhtmltopdf".to_string(),
            page_width_mm: 210,
            page_height_mm: 330,
            margin_mm: 10,
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 100 }
    }
}

impl AiConfig {
    pub fn suggestion_timeout(&self) -> Duration {
        Duration::from_secs(self.suggestion_timeout_secs)
    }

    pub fn content_timeout(&self) -> Duration {
        Duration::from_secs(self.content_timeout_secs)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.image_timeout_secs)
    }
}

impl SuggestConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl AppConfig {
    /// Load configuration from defaults, `~/.config/rpm-generator/config.toml`
    /// and `RPM_*` environment variables, in that order.
    /// Returns `Default` if any source is unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match Self::figment(&config_path).extract() {
            Ok(config) => {
                if config_path.exists() {
                    log::info!("Loaded config from {}", config_path.display());
                } else {
                    log::debug!(
                        "No config file at {}; using defaults and environment",
                        config_path.display()
                    );
                }
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config from {}: {e}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Layered configuration sources. Nested keys in the environment use `__`,
    /// e.g. `RPM_SUGGEST__DEBOUNCE_MS=800`.
    pub fn figment(config_path: &std::path::Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("RPM_").split("__"))
    }

    /// Resolved export directory (override or `~/Documents/RPM`).
    pub fn output_dir(&self) -> PathBuf {
        self.export.output_dir.clone().unwrap_or_else(|| {
            dirs::document_dir()
                .or_else(dirs::home_dir)
                .map(|d| d.join("RPM"))
                .unwrap_or_else(|| PathBuf::from("rpm-output"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("rpm-generator").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
