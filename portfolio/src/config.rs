use serde::Deserialize;
use std::{env, fs};

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Scylla,
    Memory,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScyllaConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,

    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
}

fn default_connection_timeout_secs() -> u64 {
    3
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub allowed_origin: String,

    #[serde(default)]
    pub store: StoreConfig,

    pub scylla: Option<ScyllaConfig>,
}

impl Config {
    /// Reads `config.{ENV}.toml` from the working directory.
    pub fn load() -> Self {
        let env = env::var("ENV").expect("ENV must be set");
        let config_file = format!("config.{}.toml", env);

        let contents =
            fs::read_to_string(&config_file).unwrap_or_else(|e| panic!("Unable to read {}: {}", config_file, e));

        Self::parse(&contents).unwrap_or_else(|e| panic!("Unable to parse {}: {}", config_file, e))
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn scylla(&self) -> &ScyllaConfig {
        self.scylla
            .as_ref()
            .expect("Missing [scylla] section for scylla store backend")
    }
}
