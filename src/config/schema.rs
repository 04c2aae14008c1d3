use anyhow::{Context, Result};
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
#[cfg(unix)]
use tokio::fs::File;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Env var that relocates the whole config directory.
pub const CONFIG_DIR_ENV: &str = "TOOLCHAT_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.toml";

// ── Top-level config ──────────────────────────────────────────────

/// Top-level toolchat configuration, loaded from `config.toml`.
///
/// Resolution order: `--config-dir` flag → `TOOLCHAT_CONFIG_DIR` env → `~/.toolchat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed at load time, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,
    /// API key for the selected provider. Overridden by `TOOLCHAT_API_KEY` or `API_KEY` env vars.
    pub api_key: Option<String>,
    /// Base URL override for provider API (e.g. "http://10.0.0.1:11434/v1" for remote Ollama)
    pub api_url: Option<String>,
    /// Default provider ID (`"ollama"`, `"openai"` or `"custom:<URL>"`). Default: `"ollama"`.
    pub default_provider: Option<String>,
    /// Default model routed through the selected provider. Default: `"phi3:mini"`.
    pub default_model: Option<String>,
    /// Default model temperature (0.0–2.0). Default: `0.7`.
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,

    /// Turn handling settings (`[agent]`).
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_temperature() -> f64 {
    0.7
}

/// Turn handling configuration (`[agent]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum conversation history messages retained per session. Default: `30`.
    #[serde(default = "default_agent_max_history_messages")]
    pub max_history_messages: usize,
    /// Seconds to wait for the model before answering with the generic error. Default: `120`.
    #[serde(default = "default_agent_model_timeout_secs")]
    pub model_timeout_secs: u64,
    /// Longest inbound message accepted, in characters. Default: `4000`.
    #[serde(default = "default_agent_max_message_chars")]
    pub max_message_chars: usize,
    /// Replaces the built-in system instruction sent ahead of the history.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

fn default_agent_max_history_messages() -> usize {
    crate::sessions::MAX_HISTORY
}

fn default_agent_model_timeout_secs() -> u64 {
    120
}

fn default_agent_max_message_chars() -> usize {
    4000
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_history_messages: default_agent_max_history_messages(),
            model_timeout_secs: default_agent_model_timeout_secs(),
            max_message_chars: default_agent_max_message_chars(),
            system_prompt: None,
        }
    }
}

// ── Config impl ──────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        let config_dir = default_config_dir().unwrap_or_else(|_| PathBuf::from(".toolchat"));

        Self {
            config_path: config_dir.join(CONFIG_FILE_NAME),
            api_key: None,
            api_url: None,
            default_provider: Some("ollama".to_string()),
            default_model: Some("phi3:mini".to_string()),
            default_temperature: default_temperature(),
            agent: AgentConfig::default(),
        }
    }
}

fn default_config_dir() -> Result<PathBuf> {
    let home = UserDirs::new()
        .map(|u| u.home_dir().to_path_buf())
        .context("Could not find home directory")?;
    Ok(home.join(".toolchat"))
}

fn resolve_config_dir(config_dir_override: Option<&Path>) -> Result<(PathBuf, &'static str)> {
    if let Some(dir) = config_dir_override {
        return Ok((dir.to_path_buf(), "flag"));
    }
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        let dir = dir.trim();
        if !dir.is_empty() {
            return Ok((PathBuf::from(dir), "env"));
        }
    }
    Ok((default_config_dir()?, "default"))
}

fn config_dir_creation_error(path: &Path) -> String {
    format!(
        "Failed to initialize config directory {}. Set {CONFIG_DIR_ENV} or pass --config-dir to a writable path.",
        path.display()
    )
}

impl Config {
    /// Load `config.toml`, writing a default one on first run.
    pub async fn load_or_init(config_dir_override: Option<&Path>) -> Result<Self> {
        let (config_dir, resolution_source) = resolve_config_dir(config_dir_override)?;
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        fs::create_dir_all(&config_dir)
            .await
            .with_context(|| config_dir_creation_error(&config_dir))?;

        let initialized = if config_path.exists() {
            false
        } else {
            let mut config = Config::default();
            config.config_path = config_path.clone();
            config.save().await?;

            // Restrict permissions on newly created config file (may contain API keys)
            #[cfg(unix)]
            {
                use std::{fs::Permissions, os::unix::fs::PermissionsExt};
                let _ = fs::set_permissions(&config_path, Permissions::from_mode(0o600)).await;
            }
            true
        };

        // Warn if config file is world-readable (may contain API keys)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Ok(meta) = fs::metadata(&config_path).await {
                if meta.permissions().mode() & 0o004 != 0 {
                    tracing::warn!(
                        "Config file {:?} is world-readable (mode {:o}). \
                         Consider restricting with: chmod 600 {:?}",
                        config_path,
                        meta.permissions().mode() & 0o777,
                        config_path,
                    );
                }
            }
        }

        let contents = fs::read_to_string(&config_path)
            .await
            .context("Failed to read config file")?;
        let mut config: Config =
            toml::from_str(&contents).context("Failed to parse config file")?;
        config.config_path = config_path;

        config.apply_env_overrides();
        config.validate()?;
        tracing::info!(
            path = %config.config_path.display(),
            source = resolution_source,
            initialized,
            "Config loaded"
        );
        Ok(config)
    }

    /// Validate configuration values that would cause runtime failures.
    ///
    /// Called after TOML deserialization and env-override application to catch
    /// obviously invalid values early instead of failing mid-conversation.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            anyhow::bail!(
                "default_temperature must be between 0.0 and 2.0 (got {})",
                self.default_temperature
            );
        }

        // Agent
        if self.agent.max_history_messages < 2 {
            anyhow::bail!("agent.max_history_messages must be at least 2");
        }
        if self.agent.model_timeout_secs == 0 {
            anyhow::bail!("agent.model_timeout_secs must be greater than 0");
        }
        if self.agent.max_message_chars == 0 {
            anyhow::bail!("agent.max_message_chars must be greater than 0");
        }

        if let Some(provider) = self.default_provider.as_deref() {
            if provider.trim().is_empty() {
                anyhow::bail!("default_provider must not be empty");
            }
        }

        Ok(())
    }

    /// Apply environment variable overrides to config
    pub fn apply_env_overrides(&mut self) {
        // API Key: TOOLCHAT_API_KEY or API_KEY (generic)
        if let Ok(key) = std::env::var("TOOLCHAT_API_KEY").or_else(|_| std::env::var("API_KEY")) {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        if let Ok(provider) = std::env::var("TOOLCHAT_PROVIDER") {
            if !provider.is_empty() {
                self.default_provider = Some(provider);
            }
        }

        if let Ok(model) = std::env::var("TOOLCHAT_MODEL") {
            if !model.is_empty() {
                self.default_model = Some(model);
            }
        }

        if let Ok(url) = std::env::var("TOOLCHAT_API_URL") {
            if !url.is_empty() {
                self.api_url = Some(url);
            }
        }

        // Temperature: TOOLCHAT_TEMPERATURE
        if let Ok(temp_str) = std::env::var("TOOLCHAT_TEMPERATURE") {
            if let Ok(temp) = temp_str.parse::<f64>() {
                if (0.0..=2.0).contains(&temp) {
                    self.default_temperature = temp;
                }
            }
        }

        if let Ok(raw) = std::env::var("TOOLCHAT_MAX_HISTORY") {
            match raw.trim().parse::<usize>() {
                Ok(max) => self.agent.max_history_messages = max,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid TOOLCHAT_MAX_HISTORY"),
            }
        }
    }

    pub async fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        let parent_dir = self
            .config_path
            .parent()
            .context("Config path must have a parent directory")?;

        fs::create_dir_all(parent_dir).await.with_context(|| {
            format!(
                "Failed to create config directory: {}",
                parent_dir.display()
            )
        })?;

        let file_name = self
            .config_path
            .file_name()
            .and_then(|v| v.to_str())
            .unwrap_or(CONFIG_FILE_NAME);
        let temp_path = parent_dir.join(format!(".{file_name}.tmp-{}", uuid::Uuid::new_v4()));
        let backup_path = parent_dir.join(format!("{file_name}.bak"));

        let mut temp_file = OpenOptions::new()
            .create_new(true)
            .write(true)
            .open(&temp_path)
            .await
            .with_context(|| {
                format!(
                    "Failed to create temporary config file: {}",
                    temp_path.display()
                )
            })?;
        temp_file
            .write_all(toml_str.as_bytes())
            .await
            .context("Failed to write temporary config contents")?;
        temp_file
            .sync_all()
            .await
            .context("Failed to fsync temporary config file")?;
        drop(temp_file);

        let had_existing_config = self.config_path.exists();
        if had_existing_config {
            fs::copy(&self.config_path, &backup_path)
                .await
                .with_context(|| {
                    format!(
                        "Failed to create config backup before atomic replace: {}",
                        backup_path.display()
                    )
                })?;
        }

        if let Err(e) = fs::rename(&temp_path, &self.config_path).await {
            let _ = fs::remove_file(&temp_path).await;
            if had_existing_config && backup_path.exists() {
                fs::copy(&backup_path, &self.config_path)
                    .await
                    .context("Failed to restore config backup")?;
            }
            anyhow::bail!("Failed to atomically replace config file: {e}");
        }

        sync_directory(parent_dir).await?;

        if had_existing_config {
            let _ = fs::remove_file(&backup_path).await;
        }

        Ok(())
    }
}

async fn sync_directory(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        let dir = File::open(path)
            .await
            .with_context(|| format!("Failed to open directory for fsync: {}", path.display()))?;
        dir.sync_all()
            .await
            .with_context(|| format!("Failed to fsync directory metadata: {}", path.display()))?;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = path;
        Ok(())
    }
}
