use std::{env, fs, path::Path, str::FromStr, time::Duration};

use tracing::Level;
use url::Url;

use crate::{error::Error, helpers::parse_list, types::SwapType};

pub const DEFAULT_API_BASE_URL: &str = "https://api.aggtrade.xyz/tracking";
const DEFAULT_TIMEOUT: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT: u64 = 10;
const DEFAULT_EXECUTIONS_LIMIT: u32 = 50;
const DEFAULT_DASHBOARD_LIMIT: u32 = 100;
const DEFAULT_RECONNECT_DELAY_MS: u64 = 3000;
const DEFAULT_RECONNECT_MAX_ATTEMPTS: u32 = 5;

/// What the swap stream pump does after the connection drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconnectPolicy {
    #[default]
    Never,
    Fixed { delay: Duration, max_attempts: u32 },
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), `None` to give up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        match self {
            ReconnectPolicy::Never => None,
            ReconnectPolicy::Fixed {
                delay,
                max_attempts,
            } => {
                if attempt <= *max_attempts {
                    Some(*delay)
                } else {
                    None
                }
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub timeout: u64,
    pub connect_timeout: u64,
    pub executions_limit: u32,
    pub dashboard_limit: u32,
    pub stream_swap_types: Vec<SwapType>,
    pub reconnect_policy: ReconnectPolicy,
    pub event_log_capacity: Option<usize>,
    pub log_level: Level,
}

impl Config {
    /// Builds the configuration from a key lookup. Missing keys fall back to
    /// the defaults, malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = Url::parse(
            lookup("API_BASE_URL")
                .as_deref()
                .unwrap_or(DEFAULT_API_BASE_URL)
                .trim(),
        )?;

        let timeout = parse_or(&lookup, "TIMEOUT", DEFAULT_TIMEOUT)?;
        let connect_timeout =
            parse_or(&lookup, "CONNECT_TIMEOUT", DEFAULT_CONNECT_TIMEOUT)?;
        let executions_limit =
            parse_or(&lookup, "EXECUTIONS_LIMIT", DEFAULT_EXECUTIONS_LIMIT)?;
        let dashboard_limit =
            parse_or(&lookup, "DASHBOARD_LIMIT", DEFAULT_DASHBOARD_LIMIT)?;

        let stream_swap_types = match lookup("STREAM_SWAP_TYPES") {
            Some(value) => {
                let mut types = vec![];
                for item in parse_list(&value) {
                    let swap_type =
                        SwapType::from_str(&item).map_err(|_| {
                            Error::InvalidOption {
                                option: format!(
                                    "STREAM_SWAP_TYPES '{}'. Valid options: CLASSIC, LIMIT_ORDER",
                                    item
                                ),
                            }
                        })?;
                    if !types.contains(&swap_type) {
                        types.push(swap_type);
                    }
                }
                types
            },
            None => vec![SwapType::Classic],
        };

        let reconnect_policy = parse_reconnect_policy(&lookup)?;

        let event_log_capacity =
            match parse_or(&lookup, "EVENT_LOG_CAPACITY", 0_usize)? {
                0 => None,
                capacity => Some(capacity),
            };

        let log_level = match lookup("LOG_LEVEL") {
            Some(value) => Level::from_str(value.trim()).map_err(|_| {
                Error::InvalidOption {
                    option: format!("LOG_LEVEL '{}'", value),
                }
            })?,
            None => Level::INFO,
        };

        Ok(Config {
            api_base_url,
            timeout,
            connect_timeout,
            executions_limit,
            dashboard_limit,
            stream_swap_types,
            reconnect_policy,
            event_log_capacity,
            log_level,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse::<T>().map_err(|e| {
            Error::ConfigurationError(format!("{}: {}", key, e))
        }),
        None => Ok(default),
    }
}

fn parse_reconnect_policy<F>(lookup: &F) -> Result<ReconnectPolicy, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let policy = lookup("STREAM_RECONNECT").unwrap_or_default();

    match policy.trim().to_lowercase().as_str() {
        "" | "never" => Ok(ReconnectPolicy::Never),
        "fixed" => {
            let delay = parse_or(
                lookup,
                "STREAM_RECONNECT_DELAY_MS",
                DEFAULT_RECONNECT_DELAY_MS,
            )?;
            let max_attempts = parse_or(
                lookup,
                "STREAM_RECONNECT_MAX_ATTEMPTS",
                DEFAULT_RECONNECT_MAX_ATTEMPTS,
            )?;
            Ok(ReconnectPolicy::Fixed {
                delay: Duration::from_millis(delay),
                max_attempts,
            })
        },
        p => Err(Error::InvalidOption {
            option: format!(
                "STREAM_RECONNECT '{}'. Valid options: never, fixed",
                p
            ),
        }),
    }
}

pub fn get_configuration() -> Result<Config, Error> {
    Config::from_lookup(|key| env::var(key).ok())
}

/// Seeds the process environment from `.env` in the working directory, if
/// present. Variables already set in the environment win.
pub fn set_configuration() -> Result<(), Error> {
    let config_file = Path::new(".env");

    if !config_file.exists() {
        return Ok(());
    }

    let config_string = fs::read_to_string(config_file)?;

    for (key, value) in parse_config_string(&config_string) {
        if env::var_os(&key).is_none() {
            env::set_var(key, value);
        }
    }

    Ok(())
}

fn parse_config_string(config: &str) -> Vec<(String, String)> {
    config
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_at(line.find('=')?);
            let value = value[1..].trim().trim_matches('"');
            Some((key.trim().to_owned(), value.to_owned()))
        })
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
