use std::path::PathBuf;

use config::{Config, Environment, File};
use domain_work_order::model::vo::{Column, DateRangeShortcut, ExportFormat, DEFAULT_LIMIT};
use serde::{Deserialize, Serialize};
use service_work_order::{DEFAULT_DEBOUNCE, DEFAULT_KEEP_UNUSED_FOR};

use crate::telemetry::TelemetryConfig;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
/// Overrides `api.base_url` when set.
pub const API_URL_ENV: &str = "WORK_ORDER_API_URL";
const ENV_PREFIX: &str = "WOD";

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct DeskConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ApiConfig {
    #[serde(default = "ApiConfig::default_base_url")]
    pub base_url: String,
    /// Whole-request timeout; unset waits forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    fn default_base_url() -> String {
        "http://localhost:5000/api".to_string()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: None,
        }
    }
}

/// Where the client-side session (state blob, cookies, storages) is kept.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct SessionConfig {
    #[serde(default = "SessionConfig::default_path")]
    pub path: PathBuf,
}

impl SessionConfig {
    fn default_path() -> PathBuf {
        PathBuf::from(".work-order-desk/session.json")
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ExportConfig {
    #[serde(default = "ExportConfig::default_download_dir")]
    pub download_dir: PathBuf,
    #[serde(default)]
    pub default_format: ExportFormat,
    #[serde(default)]
    pub default_range: DateRangeShortcut,
}

impl ExportConfig {
    fn default_download_dir() -> PathBuf {
        PathBuf::from("./downloads")
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            download_dir: Self::default_download_dir(),
            default_format: Default::default(),
            default_range: Default::default(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_page_size")]
    pub page_size: u32,
    /// Quiet period of the search box.
    #[serde(default = "ViewConfig::default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "ViewConfig::default_columns")]
    pub columns: Vec<Column>,
}

impl ViewConfig {
    fn default_page_size() -> u32 {
        DEFAULT_LIMIT
    }
    fn default_debounce_ms() -> u64 {
        DEFAULT_DEBOUNCE.as_millis() as u64
    }
    fn default_columns() -> Vec<Column> {
        vec![
            Column::WorkOrderNumber,
            Column::VisitInstDate,
            Column::WorkOrderType,
            Column::CustomerName,
            Column::Area,
            Column::Technician,
            Column::WorkOrderStatus,
        ]
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: Self::default_page_size(),
            debounce_ms: Self::default_debounce_ms(),
            columns: Self::default_columns(),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct CacheConfig {
    /// How long an entry nobody subscribes to is kept.
    #[serde(default = "CacheConfig::default_keep_unused_for_secs")]
    pub keep_unused_for_secs: u64,
}

impl CacheConfig {
    fn default_keep_unused_for_secs() -> u64 {
        DEFAULT_KEEP_UNUSED_FOR.as_secs()
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            keep_unused_for_secs: Self::default_keep_unused_for_secs(),
        }
    }
}

/// Layer, lowest priority first: the optional config file, `WOD__SECTION__KEY`
/// variables, then [`API_URL_ENV`].
pub fn build_config(path: Option<&str>) -> anyhow::Result<DeskConfig> {
    let path = path.unwrap_or(DEFAULT_CONFIG_FILE);
    let config = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .set_override_option("api.base_url", std::env::var(API_URL_ENV).ok())?
        .build()?;
    Ok(config.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sources_yield_defaults() {
        let config: DeskConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.view.page_size, 10);
        assert_eq!(config.view.debounce_ms, 500);
        assert_eq!(config.cache.keep_unused_for_secs, 60);
        assert_eq!(config.export.default_format, ExportFormat::Csv);
        assert!(config.telemetry.enable);
        assert!(!config.telemetry.file.enable);
    }

    #[test]
    fn yaml_sections_are_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("desk.yaml");
        std::fs::write(
            &file,
            indoc::indoc! {r#"
                api:
                  base_url: https://orders.example.com/api
                  timeout_secs: 15
                view:
                  page_size: 25
                  columns: [workOrderNumber, workOrderStatus]
                export:
                  default_format: xlsx
            "#},
        )
        .unwrap();

        let config = build_config(file.to_str()).unwrap();
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.view.page_size, 25);
        assert_eq!(
            config.view.columns,
            vec![Column::WorkOrderNumber, Column::WorkOrderStatus]
        );
        assert_eq!(config.export.default_format, ExportFormat::Xlsx);
        assert_eq!(config.cache.keep_unused_for_secs, 60);
    }
}
