use std::sync::LazyLock;

use derive_from_env::FromEnv;

/// Handler defaults read from `EVLOG_*` environment variables.
#[derive(FromEnv, Debug, Clone, PartialEq)]
#[from_env(prefix = "EVLOG")]
#[allow(non_snake_case)]
pub struct EvlogConfig {
    /// `name` field written by the Bunyan handler.
    #[from_env(default = "default")]
    pub BUNYAN_NAME: String,
    /// Whether the pretty handler styles its output.
    #[from_env(default = "true")]
    pub PRETTY_COLORS: bool,
}

impl Default for EvlogConfig {
    fn default() -> Self {
        Self {
            BUNYAN_NAME: "default".into(),
            PRETTY_COLORS: true,
        }
    }
}

impl EvlogConfig {
    /// Reads the environment. A variable that does not parse discards the
    /// whole environment in favor of the defaults.
    pub fn load() -> Self {
        Self::from_env().unwrap_or_default()
    }
}

pub static EVLOG_CONFIG: LazyLock<EvlogConfig> = LazyLock::new(EvlogConfig::load);
