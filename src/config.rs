use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

pub const DEFAULT_FEED_URL: &str = "http://20.244.56.144/evaluation-service";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedCfg {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for FeedCfg {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_URL.to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthCfg {
    pub url: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub access_code: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl AuthCfg {
    /// Auth endpoint, defaulting to `<base_url>/auth`
    pub fn endpoint(&self, base_url: &str) -> String {
        self.url
            .clone()
            .unwrap_or_else(|| format!("{}/auth", base_url.trim_end_matches('/')))
    }

    pub fn has_credentials(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerCfg {
    pub host: String,
    pub port: u16,
}

impl Default for ServerCfg {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsCfg {
    pub minutes: u32,
}

impl Default for DefaultsCfg {
    fn default() -> Self {
        Self { minutes: 30 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub feed: FeedCfg,
    pub auth: AuthCfg,
    pub server: ServerCfg,
    pub defaults: DefaultsCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let cfg: Self = toml::from_str(&s).context("parse config file")?;
        Ok(cfg)
    }

    /// Config file (if any), then environment overrides on top
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    /// Credential and port overrides, keyed by the environment variable names
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let auth = &mut self.auth;
        for (key, slot) in [
            ("EMAIL", &mut auth.email),
            ("NAME", &mut auth.name),
            ("ROLL_NO", &mut auth.roll_no),
            ("ACCESS_CODE", &mut auth.access_code),
            ("CLIENT_ID", &mut auth.client_id),
            ("CLIENT_SECRET", &mut auth.client_secret),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *slot = Some(value);
            }
        }

        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("invalid PORT value: {}", port))?;
        }
        Ok(())
    }
}
