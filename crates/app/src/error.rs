use brushtrail_config::ConfigError;
use painting::SurfaceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Failed to write canvas image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Canvas buffer does not match its {width}x{height} size")]
    Buffer { width: u32, height: u32 },
    #[error("Failed to serialize summary: {0}")]
    Summary(#[from] serde_json::Error),
}
