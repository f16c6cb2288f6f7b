use thiserror::Error;
use tilebin_core::CoreError;

#[derive(Debug, Error, PartialEq)]
pub enum BoundsError {
    #[error("bounds tile {tile:#06x} at ({x}, {y}) has no collision shape")]
    UnknownShape { tile: u16, x: u16, y: u16 },

    #[error("boundary {stage} did not settle after {rounds} rounds")]
    NoFixedPoint { stage: &'static str, rounds: usize },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, BoundsError>;
