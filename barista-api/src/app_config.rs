use barista_catalog::PricingRules;
use barista_order::StageDelays;
use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub menu: MenuConfig,
    #[serde(default)]
    pub pricing: PricingRules,
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuConfig {
    /// External menu API; when unset, prices come from the local registry
    pub base_url: Option<String>,
    #[serde(default = "default_menu_timeout")]
    pub timeout_seconds: u64,
}

impl MenuConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: default_menu_timeout(),
        }
    }
}

fn default_menu_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProcessingConfig {
    pub accept_ms: u64,
    pub prepare_ms: u64,
    pub pickup_ms: u64,
}

impl ProcessingConfig {
    pub fn delays(&self) -> StageDelays {
        StageDelays {
            accept: Duration::from_millis(self.accept_ms),
            prepare: Duration::from_millis(self.prepare_ms),
            pickup: Duration::from_millis(self.pickup_ms),
        }
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            accept_ms: 500,
            prepare_ms: 3000,
            pickup_ms: 1000,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    pub dir: String,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            dir: "reports".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `BARISTA__SERVER__PORT=9090` overrides the file value
            .add_source(config::Environment::with_prefix("BARISTA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_delay_defaults() {
        let processing = ProcessingConfig::default();
        let delays = processing.delays();
        assert_eq!(delays.accept, Duration::from_millis(500));
        assert_eq!(delays.prepare, Duration::from_secs(3));
        assert_eq!(delays.pickup, Duration::from_secs(1));
    }
}
