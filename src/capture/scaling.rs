use anyhow::{bail, Result};
use std::fmt;

/// Raster pixels per logical pixel along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingFactor {
    pub width_scale: f64,
    pub height_scale: f64,
}

impl ScalingFactor {
    pub fn resolve(logical: (u32, u32), raster: (u32, u32)) -> Result<Self> {
        if logical.0 == 0 || logical.1 == 0 {
            bail!("display reports a zero logical size {:?}", logical);
        }
        Ok(Self {
            width_scale: raster.0 as f64 / logical.0 as f64,
            height_scale: raster.1 as f64 / logical.1 as f64,
        })
    }
}

impl fmt::Display for ScalingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.width_scale, self.height_scale)
    }
}
