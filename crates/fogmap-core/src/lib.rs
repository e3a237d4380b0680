pub mod app_config;
pub mod config;
pub mod poi;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use poi::{load_points_of_interest, PoiCatalog};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read points of interest file {path}: {source}")]
    PoiFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse points of interest file: {0}")]
    PoiFileParse(#[from] serde_yaml::Error),

    #[error("points of interest validation failed: {0}")]
    Validation(String),
}
