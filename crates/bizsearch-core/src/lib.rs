pub mod app_config;
pub mod config;
pub mod fallback;
pub mod records;

use thiserror::Error;

pub use app_config::{AppConfig, TransportKind};
pub use config::{load_app_config, load_app_config_from_env};
pub use fallback::{load_fallback_file, DemoDataset, FallbackProvider, FileDataset, NoFallback};
pub use records::{BusinessRecord, SearchEnvelope};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read fallback dataset {path}: {source}")]
    FallbackFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse fallback dataset: {0}")]
    FallbackFileParse(#[from] serde_yaml::Error),

    #[error("fallback dataset validation failed: {0}")]
    Validation(String),
}
