//! Rays sampled from traced trajectories
//!
//! A ray is an anchor point and a direction, typically the position and velocity of a
//! particle at the end of its trajectory. Coordinates are `(x, y, z)` with `z` the optical
//! axis; the meridian plane is `y = 0`.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TracingError};

/// Anchor point plus direction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Point on the ray
    pub anchor: [f64; 3],
    /// Direction, not necessarily unit length
    pub direction: [f64; 3],
}

impl Ray {
    /// Create a ray, rejecting a zero or non-finite direction and a non-finite anchor
    ///
    /// Errors carry index 0; the focus functions report the position in the set instead.
    pub fn new(anchor: [f64; 3], direction: [f64; 3]) -> Result<Self> {
        let ray = Self { anchor, direction };
        ray.check(0)?;
        Ok(ray)
    }

    /// Ray from a tracer state row
    ///
    /// Accepted widths:
    /// - 4: `(x, z, vx, vz)` of a meridian-plane trajectory (y = 0)
    /// - 6: `(x, y, z, vx, vy, vz)`
    pub fn from_phase_space(row: &[f64]) -> Result<Self> {
        match *row {
            [x, z, vx, vz] => Self::new([x, 0.0, z], [vx, 0.0, vz]),
            [x, y, z, vx, vy, vz] => Self::new([x, y, z], [vx, vy, vz]),
            _ => Err(TracingError::InvalidStateLength {
                len: row.len(),
                expected: "4 or 6",
            }),
        }
    }

    /// Same direction, anchor shifted by `offset`
    pub fn translated(&self, offset: [f64; 3]) -> Self {
        Self {
            anchor: [
                self.anchor[0] + offset[0],
                self.anchor[1] + offset[1],
                self.anchor[2] + offset[2],
            ],
            direction: self.direction,
        }
    }

    /// Point at parameter `t` along the ray
    pub fn point_at(&self, t: f64) -> [f64; 3] {
        [
            self.anchor[0] + t * self.direction[0],
            self.anchor[1] + t * self.direction[1],
            self.anchor[2] + t * self.direction[2],
        ]
    }

    /// Anchor and direction reduced to the meridian plane, as `(x, z)` pairs
    pub fn meridian(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.anchor[0], self.anchor[2]],
            [self.direction[0], self.direction[2]],
        )
    }

    pub(crate) fn check(&self, index: usize) -> Result<()> {
        check_anchor(&self.anchor, index)?;
        unit_max_direction(&self.direction, index)?;
        Ok(())
    }
}

pub(crate) fn check_anchor(anchor: &[f64], index: usize) -> Result<()> {
    if anchor.iter().any(|v| !v.is_finite()) {
        return Err(TracingError::NonFiniteAnchor { index });
    }
    Ok(())
}

/// Largest absolute component of `direction`
///
/// Fails with `ZeroDirection` when every component is zero or any is non-finite.
pub(crate) fn direction_scale(direction: &[f64], index: usize) -> Result<f64> {
    if direction.iter().any(|v| !v.is_finite()) {
        return Err(TracingError::ZeroDirection { index });
    }
    let scale = direction.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    if scale == 0.0 {
        return Err(TracingError::ZeroDirection { index });
    }
    Ok(scale)
}

/// `direction` divided by [`direction_scale`]: the largest component becomes ±1
pub(crate) fn unit_max_direction<const N: usize>(
    direction: &[f64; N],
    index: usize,
) -> Result<[f64; N]> {
    let scale = direction_scale(direction, index)?;
    Ok(std::array::from_fn(|i| direction[i] / scale))
}
