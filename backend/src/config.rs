use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context};

/// What to do when the model artifact cannot be loaded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    #[default]
    Fatal,
    /// Start anyway; `/predict` answers 500 until restarted with a valid model.
    Degraded,
}

impl FromStr for LoadPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(LoadPolicy::Fatal),
            "degraded" => Ok(LoadPolicy::Degraded),
            other => bail!("unknown model load policy '{other}' (expected 'fatal' or 'degraded')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub model_path: PathBuf,
    pub load_policy: LoadPolicy,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("invalid PORT '{raw}'"))?,
            None => 5000,
        };

        // A bad worker count is not worth refusing to start over.
        let workers = lookup("WORKERS")
            .and_then(|w| w.trim().parse::<usize>().ok())
            .filter(|w| *w > 0)
            .unwrap_or_else(num_cpus::get);

        let model_path = lookup("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("model.json"));

        let load_policy = match lookup("MODEL_LOAD_POLICY") {
            Some(raw) => raw.parse()?,
            None => LoadPolicy::default(),
        };

        Ok(ServerConfig {
            host,
            port,
            workers,
            model_path,
            load_policy,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
