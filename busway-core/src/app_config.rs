use serde::Deserialize;
use std::env;

use crate::{CoreError, CoreResult};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// Cancellation closes once departure is this close (strictly more time must remain).
    #[serde(default = "default_cutoff_minutes")]
    pub cancellation_cutoff_minutes: i64,
    /// Flat fee added on top of the seat fares. The booking page shows zero today.
    #[serde(default)]
    pub service_fee: f64,
}

fn default_cutoff_minutes() -> i64 { 120 }

impl BookingRules {
    /// One year.
    pub const MAX_CUTOFF_MINUTES: i64 = 365 * 24 * 60;

    pub fn validate(&self) -> CoreResult<()> {
        if !(0..=Self::MAX_CUTOFF_MINUTES).contains(&self.cancellation_cutoff_minutes) {
            return Err(CoreError::InvalidRules(format!(
                "cancellation_cutoff_minutes must be within 0..={}, got {}",
                Self::MAX_CUTOFF_MINUTES,
                self.cancellation_cutoff_minutes
            )));
        }
        if !self.service_fee.is_finite() || self.service_fee < 0.0 {
            return Err(CoreError::InvalidRules(format!(
                "service_fee must be a non-negative amount, got {}",
                self.service_fee
            )));
        }
        Ok(())
    }
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            cancellation_cutoff_minutes: default_cutoff_minutes(),
            service_fee: 0.0,
        }
    }
}

impl Config {
    pub fn load() -> CoreResult<Self> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `BUSWAY__BOOKING__SERVICE_FEE=25`
            .add_source(config::Environment::with_prefix("BUSWAY").separator("__"))
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.booking.validate()?;
        Ok(config)
    }

    /// Parse a single TOML document, without touching files or the environment.
    pub fn from_toml(contents: &str) -> CoreResult<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.booking.validate()?;
        Ok(config)
    }
}
