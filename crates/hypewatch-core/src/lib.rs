pub mod app_config;
pub mod brands;
pub mod config;
pub mod posts;

pub use app_config::{AppConfig, Environment};
pub use brands::{
    load_brands, parse_brands, slug_from_name, BrandConfig, BrandsFile, PriceRange, Relationship,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use posts::{Platform, Post};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read brands file {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),

    #[error("brands validation error: {0}")]
    Validation(String),
}
