//! Runtime settings: record-service endpoint and GST jurisdiction
//!
//! Settings come from an optional file (any format the `config` crate knows,
//! picked by extension) overlaid with `RECEIVING_*` environment variables, e.g.
//! `RECEIVING_GST__HOME_STATE_CODE=27` or `RECEIVING_RECORD_SERVICE__BASE_URL=...`.

use bigdecimal::BigDecimal;
use serde::Deserialize;
use std::path::Path;

use crate::tax::gst::{GstConfig, DEFAULT_HOME_STATE_CODE};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub record_service: RecordServiceSettings,
    #[serde(default)]
    pub gst: GstSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordServiceSettings {
    /// Base URL of the REST backend, e.g. `https://erp.example.com/api`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RecordServiceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GstSettings {
    /// GSTIN prefix treated as intra-state
    #[serde(default = "default_home_state_code")]
    pub home_state_code: String,
    /// Total GST rate in percent, split 50/50 into CGST and SGST for intra-state vendors
    #[serde(default = "default_rate_percent")]
    pub rate_percent: BigDecimal,
}

fn default_home_state_code() -> String {
    DEFAULT_HOME_STATE_CODE.to_string()
}

fn default_rate_percent() -> BigDecimal {
    BigDecimal::from(18)
}

impl Default for GstSettings {
    fn default() -> Self {
        Self {
            home_state_code: default_home_state_code(),
            rate_percent: default_rate_percent(),
        }
    }
}

impl GstSettings {
    pub fn to_config(&self) -> GstConfig {
        GstConfig::with_rate(self.home_state_code.clone(), self.rate_percent.clone())
    }
}

impl Settings {
    /// Load settings from an optional file plus environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix("RECEIVING")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Settings>()
    }
}
