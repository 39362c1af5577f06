use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub estimator: EstimatorConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            estimator: EstimatorConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_env() -> Self {
        let host_value =
            env_string("PRESSGANG_API_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, effective_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse PRESSGANG_API_HOST ('{}'): {}. Using {}.",
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    Self::DEFAULT_HOST
                        .parse::<IpAddr>()
                        .expect("Default host must be valid"),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match env_string("PRESSGANG_API_PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    eprintln!(
                        "⚠️ PRESSGANG_API_PORT must not be 0. Using {}.",
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    eprintln!(
                        "⚠️ Could not parse PRESSGANG_API_PORT ('{}'): {}. Using {}.",
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host: effective_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }

    /// Checks whether the hostname matches the default value.
    pub fn uses_default_host(&self) -> bool {
        self.display_host == Self::DEFAULT_HOST
    }
}

/// Configuration for the estimation endpoints.
#[derive(Clone, Copy, Debug)]
pub struct EstimatorConfig {
    default_dollar_rate: f64,
    default_result_count: usize,
    max_result_count: usize,
}

impl EstimatorConfig {
    const DOLLAR_RATE_VAR: &'static str = "PRESSGANG_DEFAULT_DOLLAR_RATE";
    const DEFAULT_RESULTS_VAR: &'static str = "PRESSGANG_DEFAULT_RESULT_COUNT";
    const MAX_RESULTS_VAR: &'static str = "PRESSGANG_MAX_RESULT_COUNT";

    pub const DEFAULT_DOLLAR_RATE: f64 = 1.0;
    pub const DEFAULT_RESULT_COUNT: usize = 5;
    pub const DEFAULT_MAX_RESULT_COUNT: usize = 50;

    fn from_env() -> Self {
        let default_dollar_rate = load_f64_with_warning(
            Self::DOLLAR_RATE_VAR,
            Self::DEFAULT_DOLLAR_RATE,
            |value| value > 0.0,
            "must be greater than 0",
        );

        let default_result_count = load_usize_with_warning(
            Self::DEFAULT_RESULTS_VAR,
            Self::DEFAULT_RESULT_COUNT,
            |value| value >= 1,
            "must be at least 1",
        );

        let max_result_count = load_usize_with_warning(
            Self::MAX_RESULTS_VAR,
            Self::DEFAULT_MAX_RESULT_COUNT,
            |value| value >= 1,
            "must be at least 1",
        );

        let max_result_count = if max_result_count < default_result_count {
            eprintln!(
                "⚠️ {} is below {}. Using {}.",
                Self::MAX_RESULTS_VAR,
                Self::DEFAULT_RESULTS_VAR,
                default_result_count
            );
            default_result_count
        } else {
            max_result_count
        };

        Self {
            default_dollar_rate,
            default_result_count,
            max_result_count,
        }
    }

    /// Exchange rate used when a request does not carry one.
    pub fn default_dollar_rate(&self) -> f64 {
        self.default_dollar_rate
    }

    /// Number of plans returned when a request does not specify one.
    pub fn default_result_count(&self) -> usize {
        self.default_result_count
    }

    /// Upper bound for the requested number of plans.
    pub fn max_result_count(&self) -> usize {
        self.max_result_count
    }

    /// Caps a requested result count to the configured maximum,
    /// falling back to the default for 0.
    pub fn clamp_result_count(&self, requested: usize) -> usize {
        if requested == 0 {
            self.default_result_count
        } else {
            requested.min(self.max_result_count)
        }
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
) -> f64 {
    match env_string(var_name) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) => {
                if !validator(value) {
                    eprintln!(
                        "⚠️ {} contains invalid value '{}': {}. Using {}.",
                        var_name, raw, invalid_hint, default
                    );
                    default
                } else {
                    value
                }
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}

fn load_usize_with_warning(
    var_name: &str,
    default: usize,
    validator: impl Fn(usize) -> bool,
    invalid_hint: &str,
) -> usize {
    match env_string(var_name) {
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) => {
                if !validator(value) {
                    eprintln!(
                        "⚠️ {} contains invalid value '{}': {}. Using {}.",
                        var_name, raw, invalid_hint, default
                    );
                    default
                } else {
                    value
                }
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator_config(default_count: usize, max_count: usize) -> EstimatorConfig {
        EstimatorConfig {
            default_dollar_rate: 1.0,
            default_result_count: default_count,
            max_result_count: max_count,
        }
    }

    #[test]
    fn test_clamp_result_count_caps_at_maximum() {
        let config = estimator_config(5, 50);
        assert_eq!(config.clamp_result_count(3), 3);
        assert_eq!(config.clamp_result_count(50), 50);
        assert_eq!(config.clamp_result_count(500), 50);
    }

    #[test]
    fn test_clamp_result_count_zero_falls_back_to_default() {
        let config = estimator_config(5, 50);
        assert_eq!(config.clamp_result_count(0), 5);
    }
}
