use serde::Deserialize;
use std::env;
use std::str::FromStr;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },

    #[error("invalid booking rules: {0}")]
    Rules(#[from] ValidationErrors),

    #[error("PREMIUM_ROWS ({premium}) must not exceed STANDARD_ROWS ({standard})")]
    TierOrder { premium: usize, standard: usize },
}

// Top-level configuration, one section per concern
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub redis: Option<RedisConfig>,
    pub store: StoreConfig,
    pub booking: BookingRules,
}

// HTTP server and logging
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub rust_log: String,
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

// Redis is optional: without it snapshots live in process memory
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub snapshot_key: String,
}

/// Everything the seat engine needs to know about the venue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
pub struct BookingRules {
    #[validate(nested)]
    pub grid: GridConfig,
    #[validate(range(min = 1))]
    pub max_seats_per_booking: usize,
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct GridConfig {
    #[validate(range(min = 1, max = 1000))]
    pub rows: usize,
    #[validate(range(min = 1, max = 1000))]
    pub seats_per_row: usize,
}

/// Tier boundaries are exclusive row indices: rows below `premium_rows` are
/// Premium, rows below `standard_rows` are Standard, the rest Economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PricingConfig {
    pub premium_price: u32,
    pub premium_rows: usize,
    pub standard_price: u32,
    pub standard_rows: usize,
    pub economy_price: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            seats_per_row: 10,
        }
    }
}

impl GridConfig {
    pub fn seat_count(&self) -> usize {
        self.rows * self.seats_per_row
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            premium_price: 1000,
            premium_rows: 3,
            standard_price: 750,
            standard_rows: 6,
            economy_price: 500,
        }
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            max_seats_per_booking: 8,
            pricing: PricingConfig::default(),
        }
    }
}

impl BookingRules {
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if self.pricing.premium_rows > self.pricing.standard_rows {
            return Err(ConfigError::TierOrder {
                premium: self.pricing.premium_rows,
                standard: self.pricing.standard_rows,
            });
        }
        Ok(())
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key source. Missing keys
    /// fall back to defaults, present but unparsable keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = BookingRules::default();

        let config = Config {
            app: AppConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", 8000)?,
                environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
                rust_log: lookup("RUST_LOG")
                    .unwrap_or_else(|| "seat_booking=debug,tower_http=debug".to_string()),
                log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,
            },
            redis: lookup("REDIS_URL")
                .filter(|url| !url.trim().is_empty())
                .map(|url| RedisConfig { url }),
            store: StoreConfig {
                snapshot_key: lookup("SNAPSHOT_KEY")
                    .unwrap_or_else(|| "seatBookingData".to_string()),
            },
            booking: BookingRules {
                grid: GridConfig {
                    rows: parse_or(&lookup, "GRID_ROWS", defaults.grid.rows)?,
                    seats_per_row: parse_or(
                        &lookup,
                        "GRID_SEATS_PER_ROW",
                        defaults.grid.seats_per_row,
                    )?,
                },
                max_seats_per_booking: parse_or(
                    &lookup,
                    "MAX_SEATS_PER_BOOKING",
                    defaults.max_seats_per_booking,
                )?,
                pricing: PricingConfig {
                    premium_price: parse_or(&lookup, "PREMIUM_PRICE", defaults.pricing.premium_price)?,
                    premium_rows: parse_or(&lookup, "PREMIUM_ROWS", defaults.pricing.premium_rows)?,
                    standard_price: parse_or(
                        &lookup,
                        "STANDARD_PRICE",
                        defaults.pricing.standard_price,
                    )?,
                    standard_rows: parse_or(&lookup, "STANDARD_ROWS", defaults.pricing.standard_rows)?,
                    economy_price: parse_or(&lookup, "ECONOMY_PRICE", defaults.pricing.economy_price)?,
                },
            },
        };

        config.booking.check()?;
        Ok(config)
    }
}

fn parse_or<T, F>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => Ok(value),
            Err(_) => Err(ConfigError::Invalid { key, value: raw }),
        },
    }
}
