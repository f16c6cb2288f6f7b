//! Layer types for image and bounds layers

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Exact parallax factor with 8-bit numerator and denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fraction {
    pub numerator: u8,
    pub denominator: u8,
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ONE
    }
}

impl Fraction {
    pub const ONE: Fraction = Fraction {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u8, denominator: u8) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Convert an editor parallax factor into an exact fraction.
    ///
    /// The factor is reduced at a precision of 1e-9. When that fraction does
    /// not fit in 8 bits, the closest fraction with a denominator of at most
    /// 255 is used instead.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 || value > f64::from(u8::MAX) {
            return Err(CoreError::Parallax(value));
        }
        const PRECISION: u64 = 1_000_000_000;
        let scaled = (value * PRECISION as f64).round() as u64;
        let divisor = gcd(scaled, PRECISION);
        let (numerator, denominator) = (scaled / divisor, PRECISION / divisor);
        if let (Ok(n), Ok(d)) = (u8::try_from(numerator), u8::try_from(denominator)) {
            return Ok(Self::new(n, d));
        }

        let mut best: Option<(f64, u8, u8)> = None;
        for d in 1..=u8::MAX {
            let n = (value * f64::from(d)).round();
            if n > f64::from(u8::MAX) {
                break;
            }
            let error = (n / f64::from(d) - value).abs();
            if best.map_or(true, |(e, _, _)| error < e) {
                best = Some((error, n as u8, d));
            }
        }
        best.map(|(_, n, d)| Self::new(n, d))
            .ok_or(CoreError::Parallax(value))
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Whether a layer draws tiles or describes collision geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LayerKind {
    #[default]
    Image,
    Bounds,
}

/// A full-map grid of remapped tile values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Hashed layer name
    pub name: u32,
    pub kind: LayerKind,
    #[serde(default)]
    pub parallax_x: Fraction,
    #[serde(default)]
    pub parallax_y: Fraction,
    /// Row-major tiles, `width * height` entries; 0 is empty
    pub tiles: Vec<u16>,
}

impl Layer {
    /// Create an empty image layer sized for a `width x height` map
    pub fn new(name: u32, width: u16, height: u16) -> Self {
        Self {
            name,
            kind: LayerKind::Image,
            parallax_x: Fraction::ONE,
            parallax_y: Fraction::ONE,
            tiles: vec![0; usize::from(width) * usize::from(height)],
        }
    }

    /// Set the layer kind
    pub fn with_kind(mut self, kind: LayerKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set both parallax fractions
    pub fn with_parallax(mut self, x: Fraction, y: Fraction) -> Self {
        self.parallax_x = x;
        self.parallax_y = y;
        self
    }

    /// Replace the tile grid
    pub fn with_tiles(mut self, tiles: Vec<u16>) -> Self {
        self.tiles = tiles;
        self
    }

    pub fn is_bounds(&self) -> bool {
        self.kind == LayerKind::Bounds
    }

    /// Tile at grid position, if inside the layer
    pub fn tile_at(&self, x: u16, y: u16, width: u16) -> Option<u16> {
        if x >= width {
            return None;
        }
        self.tiles
            .get(usize::from(y) * usize::from(width) + usize::from(x))
            .copied()
    }

    /// Check the grid holds exactly `width * height` tiles
    pub fn check_size(&self, width: u16, height: u16) -> Result<()> {
        let expected = usize::from(width) * usize::from(height);
        if self.tiles.len() != expected {
            return Err(CoreError::LayerSize {
                expected,
                actual: self.tiles.len(),
            });
        }
        Ok(())
    }
}
