use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;
use url::Url;

use crate::errors::AppError;

pub const DEFAULT_SYMBOLS: [&str; 2] = ["^NSEI", "NSEI.NS"];
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Parameters of the random walk used when no live data is available.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub periods: usize,
    pub base_price: f64,
    pub step_scale: f64,
    pub volume_min: u64,
    pub volume_max: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            periods: 30,
            base_price: 22000.0,
            step_scale: 100.0,
            volume_min: 1_000_000,
            volume_max: 5_000_000,
        }
    }
}

/// Service configuration, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub instrument_name: String,
    /// Aliases for the same instrument, tried in order.
    pub symbols: Vec<String>,
    pub history_range: String,
    pub market_data_base_url: Url,
    pub market_data_timeout: Duration,
    pub request_timeout: Duration,
    pub currency_symbol: String,
    pub synthetic: SyntheticConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 3000,
            instrument_name: "Nifty 50".to_string(),
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            history_range: "1mo".to_string(),
            market_data_base_url: default_base_url(),
            market_data_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            currency_symbol: "₹".to_string(),
            synthetic: SyntheticConfig::default(),
        }
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("default base url is valid")
}

pub(crate) fn env_str(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

pub(crate) fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    match env_str(name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}, using default", name, raw);
            default
        }),
        None => default,
    }
}

fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let synthetic = SyntheticConfig::default();

        let market_data_base_url = match env_str("MARKET_DATA_BASE_URL") {
            Some(raw) => Url::parse(&raw).unwrap_or_else(|e| {
                warn!("Ignoring invalid MARKET_DATA_BASE_URL {:?}: {}", raw, e);
                defaults.market_data_base_url.clone()
            }),
            None => defaults.market_data_base_url.clone(),
        };

        Self {
            bind_addr: env_str("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: env_parse("PORT", defaults.port),
            instrument_name: env_str("INSTRUMENT_NAME").unwrap_or(defaults.instrument_name),
            symbols: env_str("MARKET_SYMBOLS")
                .map(|raw| parse_symbols(&raw))
                .unwrap_or(defaults.symbols),
            history_range: env_str("MARKET_DATA_RANGE").unwrap_or(defaults.history_range),
            market_data_base_url,
            market_data_timeout: Duration::from_secs(env_parse(
                "MARKET_DATA_TIMEOUT_SECS",
                defaults.market_data_timeout.as_secs(),
            )),
            request_timeout: Duration::from_secs(env_parse(
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            currency_symbol: env_str("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            synthetic: SyntheticConfig {
                periods: env_parse("SYNTHETIC_PERIODS", synthetic.periods),
                base_price: env_parse("SYNTHETIC_BASE_PRICE", synthetic.base_price),
                step_scale: env_parse("SYNTHETIC_STEP_SCALE", synthetic.step_scale),
                ..synthetic
            },
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.market_data_timeout.is_zero() {
            return Err(AppError::Config("MARKET_DATA_TIMEOUT_SECS must be greater than 0".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be greater than 0".into()));
        }
        if self.synthetic.periods == 0 {
            return Err(AppError::Config("SYNTHETIC_PERIODS must be greater than 0".into()));
        }
        if !(self.synthetic.base_price.is_finite() && self.synthetic.base_price > 0.0) {
            return Err(AppError::Config("SYNTHETIC_BASE_PRICE must be a positive number".into()));
        }
        if !(self.synthetic.step_scale.is_finite() && self.synthetic.step_scale > 0.0) {
            return Err(AppError::Config("SYNTHETIC_STEP_SCALE must be a positive number".into()));
        }
        if self.synthetic.volume_min >= self.synthetic.volume_max {
            return Err(AppError::Config("synthetic volume range is empty".into()));
        }
        if self.symbols.is_empty() {
            warn!("No market symbols configured, every request will use synthetic data");
        }
        Ok(())
    }

    /// Time all alias attempts may take together. Kept below the request
    /// timeout so the synthetic fallback still answers in time.
    pub fn market_data_budget(&self) -> Duration {
        self.request_timeout * 4 / 5
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_track_nifty() {
        let config = AppConfig::default();
        assert_eq!(config.symbols, vec!["^NSEI", "NSEI.NS"]);
        assert_eq!(config.history_range, "1mo");
        assert_eq!(config.synthetic.periods, 30);
        assert_eq!(config.synthetic.base_price, 22000.0);
        assert_eq!(config.currency_symbol, "₹");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_symbols_trims_and_drops_empty() {
        assert_eq!(parse_symbols(" ^NSEI , ,NSEI.NS,"), vec!["^NSEI", "NSEI.NS"]);
        assert!(parse_symbols(" , ").is_empty());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = AppConfig {
            market_data_timeout: Duration::ZERO,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_synthetic_settings() {
        let mut config = AppConfig::default();
        config.synthetic.periods = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.synthetic.base_price = -1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.synthetic.step_scale = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.synthetic.volume_min = config.synthetic.volume_max;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_symbol_list_is_allowed() {
        let config = AppConfig {
            symbols: vec![],
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_market_data_budget_below_request_timeout() {
        let config = AppConfig::default();
        assert_eq!(config.market_data_budget(), Duration::from_secs(24));

        let config = AppConfig {
            request_timeout: Duration::from_millis(300),
            ..AppConfig::default()
        };
        assert_eq!(config.market_data_budget(), Duration::from_millis(240));
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            bind_addr: "127.0.0.1".into(),
            port: 8080,
            ..AppConfig::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }
}
