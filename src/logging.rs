use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{env_parse, env_str};

const DEFAULT_FILTER: &str = "info,tower_http=info";

/// Where log events go besides stdout.
#[derive(Debug, Clone, PartialEq)]
pub enum LogShipping {
    ConsoleOnly,
    Loki { url: url::Url },
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter: String,
    pub service_name: String,
    pub environment: String,
    pub loki_enabled: bool,
    pub loki_url: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            service_name: "nifty-predictor".to_string(),
            environment: "development".to_string(),
            loki_enabled: false,
            loki_url: None,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            filter: env_str("RUST_LOG").unwrap_or(defaults.filter),
            service_name: env_str("SERVICE_NAME").unwrap_or(defaults.service_name),
            environment: env_str("ENVIRONMENT").unwrap_or(defaults.environment),
            loki_enabled: env_parse("LOKI_ENABLED", defaults.loki_enabled),
            loki_url: env_str("LOKI_URL"),
        }
    }

    /// Resolve the Loki settings. An enabled Loki without a usable URL is an error.
    pub fn shipping(&self) -> anyhow::Result<LogShipping> {
        if !self.loki_enabled {
            return Ok(LogShipping::ConsoleOnly);
        }
        let raw = self
            .loki_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("LOKI_ENABLED is true but LOKI_URL is not set"))?;
        let url = url::Url::parse(raw).map_err(|e| anyhow::anyhow!("invalid LOKI_URL {:?}: {}", raw, e))?;
        Ok(LogShipping::Loki { url })
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber: stdout always, plus Loki when configured
/// and the `loki` feature is compiled in.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let shipping = config.shipping()?;

    #[cfg(feature = "loki")]
    let loki = match &shipping {
        LogShipping::Loki { url } => {
            let (layer, task) = tracing_loki::builder()
                .label("service", &config.service_name)?
                .label("environment", &config.environment)?
                .build_url(url.clone())?;
            tokio::spawn(task);
            Some(layer)
        }
        LogShipping::ConsoleOnly => None,
    };
    #[cfg(not(feature = "loki"))]
    let loki: Option<tracing_subscriber::layer::Identity> = None;

    let shipping_to_loki = loki.is_some();

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(tracing_subscriber::fmt::layer())
        .with(loki)
        .try_init()?;

    match shipping {
        LogShipping::Loki { url } if shipping_to_loki => {
            tracing::info!("✅ Logging to console and Loki at {} ({})", url, config.environment)
        }
        LogShipping::Loki { .. } => {
            tracing::warn!("LOKI_ENABLED is set but the binary was built without the loki feature")
        }
        LogShipping::ConsoleOnly => tracing::info!("📊 Console logging initialized ({})", config.environment),
    }

    Ok(())
}
