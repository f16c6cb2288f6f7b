use thiserror::Error;
use tilebin_bounds::BoundsError;
use tilebin_core::CoreError;
use tilebin_layout::LayoutError;

/// Error type for tileset and world compilation
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("Boundary error: {0}")]
    Bounds(#[from] BoundsError),
    #[error("Invalid input: {0}")]
    Core(#[from] CoreError),
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("more than {max} indexed entities in one world")]
    IndexedIdOverflow { max: usize },
}

pub type Result<T> = std::result::Result<T, CompileError>;
