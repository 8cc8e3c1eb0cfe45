//! Configuration for the summarizer service.

use core_config::{AppInfo, Environment, FromEnv, app_info, env_or_default, server::ServerConfig};
use jobstream::BrokerSettings;
use std::time::Duration;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub broker: BrokerSettings,
    /// Number of worker loops sharing the durable consumer.
    pub worker_instances: usize,
    /// Grace period for draining workers at shutdown.
    pub shutdown_grace: Duration,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let app = app_info!();
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8000

        let broker = BrokerSettings::new(env_or_default("NATS_URL", "nats://localhost:4222"))
            .with_connection_name(app.name);

        let worker_instances = env_or_default("NATS_NUM_SUMMARIZER_CONSUMER_INSTANCES", "3")
            .parse()
            .unwrap_or(3);

        let shutdown_grace = Duration::from_secs(
            env_or_default("SHUTDOWN_GRACE_SECS", "2").parse().unwrap_or(2),
        );

        Ok(Self {
            app,
            server,
            environment,
            broker,
            worker_instances,
            shutdown_grace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars(
            [
                ("NATS_URL", None::<&str>),
                ("NATS_NUM_SUMMARIZER_CONSUMER_INSTANCES", None),
                ("SHUTDOWN_GRACE_SECS", None),
                ("HOST", None),
                ("PORT", None),
                ("APP_ENV", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.broker.url, "nats://localhost:4222");
                assert_eq!(config.broker.connection_name, "summarizer");
                assert_eq!(config.worker_instances, 3);
                assert_eq!(config.shutdown_grace, Duration::from_secs(2));
                assert_eq!(config.server.port, 8000);
                assert_eq!(config.environment, Environment::Development);
            },
        );
    }

    #[test]
    fn test_config_reads_worker_instances() {
        temp_env::with_vars(
            [
                ("NATS_URL", Some("nats://broker:4222")),
                ("NATS_NUM_SUMMARIZER_CONSUMER_INSTANCES", Some("5")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.broker.url, "nats://broker:4222");
                assert_eq!(config.worker_instances, 5);
            },
        );
    }

    #[test]
    fn test_config_ignores_invalid_worker_count() {
        temp_env::with_var(
            "NATS_NUM_SUMMARIZER_CONSUMER_INSTANCES",
            Some("not_a_number"),
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.worker_instances, 3);
            },
        );
    }
}
