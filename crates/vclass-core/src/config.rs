use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::retry::RetryPolicy;

/// Environment variable holding the portal username.
pub const USERNAME_VAR: &str = "VCLASS_USERNAME";
/// Environment variable holding the portal password.
pub const PASSWORD_VAR: &str = "VCLASS_PASSWORD";

/// Fixed-delay retry parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Constant delay in seconds between attempts.
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_secs: 5.0,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.max_attempts, secs(self.delay_secs))
    }
}

/// Exponential backoff parameters (optional `[backoff]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay in seconds before the second attempt; doubles after each failure.
    pub initial_delay_secs: f64,
    /// Optional upper bound on a single wait, in seconds. Unset means the
    /// waits keep doubling.
    #[serde(default)]
    pub max_delay_secs: Option<u64>,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_secs: 1.0,
            max_delay_secs: None,
        }
    }
}

impl BackoffConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.max_attempts,
            secs(self.initial_delay_secs),
            self.max_delay_secs.map(Duration::from_secs),
        )
    }
}

/// Global configuration loaded from `~/.config/vclass/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VclassConfig {
    /// Portal root, e.g. `https://v-class.gunadarma.ac.id`.
    pub base_url: String,
    pub login_path: String,
    pub dashboard_path: String,
    pub timeline_path: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    /// Pause after every successful page fetch by a scraper.
    pub courtesy_delay_secs: f64,
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Fixed retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Exponential backoff policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub backoff: Option<BackoffConfig>,
}

impl Default for VclassConfig {
    fn default() -> Self {
        Self {
            base_url: "https://v-class.gunadarma.ac.id".to_string(),
            login_path: "/login/index.php".to_string(),
            dashboard_path: "/my/".to_string(),
            timeline_path: "/my/".to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            courtesy_delay_secs: 1.0,
            user_agent: None,
            retry: None,
            backoff: None,
        }
    }
}

impl VclassConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().policy()
    }

    pub fn backoff_policy(&self) -> RetryPolicy {
        self.backoff.clone().unwrap_or_default().policy()
    }

    /// Reject settings that would make a fetch policy meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.retry.as_ref().is_some_and(|r| r.max_attempts == 0) {
            bail!("[retry] max_attempts must be at least 1");
        }
        if self.backoff.as_ref().is_some_and(|b| b.max_attempts == 0) {
            bail!("[backoff] max_attempts must be at least 1");
        }
        Ok(())
    }

    pub fn courtesy_delay(&self) -> Duration {
        secs(self.courtesy_delay_secs)
    }

    /// Resolve the configured paths against `base_url`.
    pub fn endpoints(&self) -> Result<Endpoints> {
        let base = Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        let join = |path: &str| -> Result<String> {
            Ok(base
                .join(path)
                .with_context(|| format!("invalid portal path {:?}", path))?
                .to_string())
        };
        Ok(Endpoints {
            login: join(&self.login_path)?,
            dashboard: join(&self.dashboard_path)?,
            timeline: join(&self.timeline_path)?,
        })
    }
}

/// Absolute URLs of the fixed portal pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub login: String,
    pub dashboard: String,
    pub timeline: String,
}

/// Portal login credentials, read once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the environment, loading `./.env` first if present.
    pub fn from_env() -> Result<Self> {
        if dotenv::dotenv().is_ok() {
            tracing::debug!("loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("environment variable {} is not set", key))
        };
        Ok(Self {
            username: get(USERNAME_VAR)?,
            password: get(PASSWORD_VAR)?,
        })
    }
}

fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value)
    } else {
        Duration::ZERO
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("vclass")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<VclassConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = VclassConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit path.
pub fn load_from(path: &std::path::Path) -> Result<VclassConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg: VclassConfig =
        toml::from_str(&data).with_context(|| format!("parsing config {}", path.display()))?;
    cfg.validate()
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
