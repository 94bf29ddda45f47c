use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Default config template created when no config exists
const DEFAULT_CONFIG: &str = r#"
[catalog]
source = "skills.json"  # File path or http(s) URL; or set SKILLDECK_CATALOG
page_size = 18

[completion]
model = "llama-3.3-70b-versatile"
base_url = "https://api.groq.com/openai/v1"
api_key = ""  # Set via SKILLDECK_API_KEY env var; empty disables live test drives

[backend]
kind = "local"  # "local" (SQLite) or "remote" (Supabase)
database = "skilldeck.db"
url = ""  # Set via SUPABASE_URL env var
anon_key = ""  # Set via SUPABASE_ANON_KEY env var

[logging]
level = "warn"  # trace, debug, info, warn, error
"#;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub source: String,
    pub page_size: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: "skills.json".to_string(),
            page_size: 18,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CompletionConfig {
    pub model: String,
    pub base_url: String,
    pub api_key: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: skilldeck_provider::DEFAULT_MODEL.to_string(),
            base_url: skilldeck_provider::DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub database: String,
    pub url: String,
    pub anon_key: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
            database: "skilldeck.db".to_string(),
            url: String::new(),
            anon_key: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the global config path: ~/.skilldeck/skilldeck.toml
    fn global_config_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Ok(home.join(".skilldeck").join("skilldeck.toml"))
    }

    /// Ensure global config directory and file exist, creating defaults if needed
    fn ensure_global_config() -> anyhow::Result<PathBuf> {
        let config_path = Self::global_config_path()?;

        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                fs::create_dir_all(config_dir).with_context(|| {
                    format!("Failed to create config directory {}", config_dir.display())
                })?;
                eprintln!("Created config directory: {}", config_dir.display());
            }
        }

        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG.trim())
                .with_context(|| format!("Failed to write {}", config_path.display()))?;
            eprintln!("Created default config: {}", config_path.display());
        }

        Ok(config_path)
    }

    /// Load configuration with layered approach:
    /// 1. Global config: ~/.skilldeck/skilldeck.toml (auto-created if missing)
    /// 2. Local override: ./skilldeck.toml (optional)
    /// 3. Environment variables with SKILLDECK__ prefix
    /// 4. Convenience env vars (highest priority)
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let global_config_path = Self::ensure_global_config()?;

        let builder = config::Config::builder()
            .add_source(config::File::from(global_config_path))
            .add_source(config::File::with_name("skilldeck").required(false))
            .add_source(config::Environment::with_prefix("SKILLDECK").separator("__"));

        let overrides = [
            ("SKILLDECK_API_KEY", "completion.api_key"),
            ("SKILLDECK_CATALOG", "catalog.source"),
            ("SUPABASE_URL", "backend.url"),
            ("SUPABASE_ANON_KEY", "backend.anon_key"),
        ]
        .into_iter()
        .filter_map(|(var, key)| env::var(var).ok().map(|value| (key, value)));

        Self::build(builder, overrides)
    }

    fn build<I>(
        mut builder: config::ConfigBuilder<config::builder::DefaultState>,
        overrides: I,
    ) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (&'static str, String)>,
    {
        for (key, value) in overrides {
            builder = builder.set_override(key, value)?;
        }

        let config: Self = builder
            .build()?
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.catalog.page_size == 0 {
            return Err(anyhow!("catalog.page_size must be at least 1"));
        }
        if self.backend.kind == BackendKind::Remote
            && (self.backend.url.is_empty() || self.backend.anon_key.is_empty())
        {
            return Err(anyhow!(
                "backend.kind = \"remote\" needs backend.url and backend.anon_key \
                 (or SUPABASE_URL and SUPABASE_ANON_KEY)"
            ));
        }
        Ok(())
    }
}
