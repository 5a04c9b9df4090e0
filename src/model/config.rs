use serde::{Deserialize, Serialize};

use super::category::DEFAULT_CATEGORIES;

/// Configuration from config.toml in the data directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub deadline: DeadlineConfig,
    #[serde(default)]
    pub categories: CategoryConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineConfig {
    /// A pending task due within this many minutes is "nearing its deadline"
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,
    /// How often `td watch` recomputes the highlight
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: u32,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        DeadlineConfig {
            window_minutes: default_window_minutes(),
            tick_seconds: default_tick_seconds(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Registry used when nothing is stored yet
    #[serde(default = "default_category_names")]
    pub defaults: Vec<String>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        CategoryConfig {
            defaults: default_category_names(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Populate an empty store with the sample tasks
    #[serde(default = "default_true")]
    pub examples: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig { examples: true }
    }
}

fn default_window_minutes() -> u32 {
    120
}

fn default_tick_seconds() -> u32 {
    60
}

fn default_true() -> bool {
    true
}

fn default_category_names() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect()
}
