use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub discovery_ttl: Duration,
    pub page_ttl: Duration,
    pub shutdown_drain: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            discovery_ttl: Duration::from_secs(30),
            page_ttl: Duration::from_secs(60),
            shutdown_drain: Duration::from_millis(5000),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub data_path: PathBuf,
    pub cutoff: NaiveDateTime,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/restaurants.parquet"),
            cutoff: taxmap_query::default_cutoff(),
        }
    }
}

pub fn validate_startup_config_contract(
    api: &ApiConfig,
    dataset: &DatasetConfig,
) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max_body_bytes must be > 0".to_string());
    }
    if api.discovery_ttl.is_zero() || api.page_ttl.is_zero() {
        return Err("cache ttls must be > 0".to_string());
    }
    if dataset.data_path.as_os_str().is_empty() {
        return Err("data_path must not be empty".to_string());
    }
    Ok(())
}
