use crate::banner::DEFAULT_BANNERS;
use crate::error::{Result, SanctuaryError};
use crate::event::{parse_timestamp, EventDefinition, Schedule};
use crate::occurrence::DEFAULT_IMMINENT_WINDOW_MINUTES;
use crate::paths;
use crate::verse::Verse;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// CountdownConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// How long after its start an event still reads "happening now".
    #[serde(default = "default_imminent_window")]
    pub imminent_window_minutes: i64,
    #[serde(default = "default_tick")]
    pub tick_seconds: u64,
}

fn default_imminent_window() -> i64 {
    DEFAULT_IMMINENT_WINDOW_MINUTES
}

fn default_tick() -> u64 {
    1
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            imminent_window_minutes: default_imminent_window(),
            tick_seconds: default_tick(),
        }
    }
}

// ---------------------------------------------------------------------------
// BannerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BannerConfig {
    #[serde(default = "default_banner_messages")]
    pub messages: Vec<String>,
    #[serde(default = "default_rotate")]
    pub rotate_seconds: u64,
}

fn default_banner_messages() -> Vec<String> {
    DEFAULT_BANNERS.iter().map(|s| s.to_string()).collect()
}

fn default_rotate() -> u64 {
    8
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            messages: default_banner_messages(),
            rotate_seconds: default_rotate(),
        }
    }
}

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

/// Which remote service answers verse lookups.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Plain JSON text API: `GET {base_url}/{reference}`.
    BibleApi {
        #[serde(default = "default_bible_api_url")]
        base_url: String,
        #[serde(default = "default_translation")]
        translation: String,
    },
    /// Generative model asked to return a verse as JSON.
    Generative {
        #[serde(default = "default_generative_url")]
        base_url: String,
        #[serde(default = "default_generative_model")]
        model: String,
        /// Environment variable holding the API key.
        #[serde(default = "default_api_key_env")]
        api_key_env: String,
    },
}

fn default_bible_api_url() -> String {
    "https://bible-api.com".to_string()
}

fn default_translation() -> String {
    "kjv".to_string()
}

fn default_generative_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generative_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "SANCTUARY_API_KEY".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::BibleApi {
            base_url: default_bible_api_url(),
            translation: default_translation(),
        }
    }
}

// ---------------------------------------------------------------------------
// RetryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_jitter")]
    pub jitter_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_base_delay() -> u64 {
    1_000
}

fn default_max_delay() -> u64 {
    16_000
}

fn default_jitter() -> u64 {
    1_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay(),
            max_delay_ms: default_max_delay(),
            jitter_ms: default_jitter(),
        }
    }
}

// ---------------------------------------------------------------------------
// SiteConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub site: SiteConfig,
    #[serde(default)]
    pub events: Vec<EventDefinition>,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub banner: BannerConfig,
    /// Verses for the daily rotation; built-ins are used when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verses: Vec<Verse>,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            site: SiteConfig {
                name: site_name.into(),
                tagline: None,
            },
            events: Vec::new(),
            countdown: CountdownConfig::default(),
            banner: BannerConfig::default(),
            verses: Vec::new(),
            provider: ProviderConfig::default(),
            retry: RetryConfig::default(),
        }
    }

    /// A config with the usual weekly schedule, written by `sanctuary init`.
    pub fn starter(site_name: impl Into<String>) -> Self {
        let mut cfg = Self::new(site_name);
        cfg.events = vec![
            EventDefinition::recurring("Sunday Worship", 0, 10, 30),
            EventDefinition::recurring("Midweek Bible Study", 3, 19, 0),
            EventDefinition::recurring("Youth Night", 5, 19, 0),
        ];
        cfg
    }

    pub fn imminent_window(&self) -> TimeDelta {
        TimeDelta::try_minutes(self.countdown.imminent_window_minutes).unwrap_or(TimeDelta::MAX)
    }

    pub fn banner_period(&self) -> TimeDelta {
        i64::try_from(self.banner.rotate_seconds)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(SanctuaryError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Write this config only if none exists yet. Returns true if written.
    pub fn save_if_missing(&self, root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(self)?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let warn = |level: WarnLevel, message: String| ConfigWarning { level, message };

        // Events: malformed schedules still load, they just never count down.
        let mut seen = HashSet::new();
        for event in &self.events {
            if event.title.trim().is_empty() {
                warnings.push(warn(WarnLevel::Warning, "event with an empty title".into()));
            }
            if !seen.insert(event.title.as_str()) {
                warnings.push(warn(
                    WarnLevel::Warning,
                    format!("duplicate event title '{}'", event.title),
                ));
            }
            match &event.schedule {
                Schedule::Fixed { at } => {
                    if parse_timestamp(at).is_err() {
                        warnings.push(warn(
                            WarnLevel::Warning,
                            format!("event '{}' has an unreadable date '{}'", event.title, at),
                        ));
                    }
                }
                Schedule::Recurring {
                    weekday,
                    hour,
                    minute,
                } => {
                    if *weekday > 6 || *hour > 23 || *minute > 59 {
                        warnings.push(warn(
                            WarnLevel::Warning,
                            format!(
                                "event '{}' has an out-of-range schedule (weekday {}, {:02}:{:02})",
                                event.title, weekday, hour, minute
                            ),
                        ));
                    }
                }
            }
        }

        if self.countdown.imminent_window_minutes <= 0 {
            warnings.push(warn(
                WarnLevel::Error,
                "countdown.imminent_window_minutes must be positive".into(),
            ));
        }
        if self.countdown.tick_seconds == 0 {
            warnings.push(warn(
                WarnLevel::Error,
                "countdown.tick_seconds must be at least 1".into(),
            ));
        }
        if self.banner.rotate_seconds == 0 {
            warnings.push(warn(
                WarnLevel::Error,
                "banner.rotate_seconds must be at least 1".into(),
            ));
        }

        if self.retry.max_attempts == 0 {
            warnings.push(warn(
                WarnLevel::Error,
                "retry.max_attempts must be at least 1".into(),
            ));
        } else if self.retry.max_attempts > 10 {
            warnings.push(warn(
                WarnLevel::Warning,
                format!(
                    "retry.max_attempts={} (>10 is unusual)",
                    self.retry.max_attempts
                ),
            ));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            warnings.push(warn(
                WarnLevel::Warning,
                format!(
                    "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                    self.retry.base_delay_ms, self.retry.max_delay_ms
                ),
            ));
        }

        if let ProviderConfig::Generative { api_key_env, .. } = &self.provider {
            if api_key_env.trim().is_empty() {
                warnings.push(warn(
                    WarnLevel::Error,
                    "provider.api_key_env must name an environment variable".into(),
                ));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
