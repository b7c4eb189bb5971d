//! Atomic Layer: speed curve
//!
//! `speed = constant + linear * |remaining| ^ exponent`, signed like the
//! remaining displacement. With an exponent below 1 far targets are covered
//! quickly and the last few lines slow down.

use crate::config::MotionConfig;

/// The three speed tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityCurve {
    pub constant: f64,
    pub linear: f64,
    pub exponent: f64,
}

impl From<&MotionConfig> for VelocityCurve {
    fn from(config: &MotionConfig) -> Self {
        Self {
            constant: config.speed_constant_factor,
            linear: config.speed_linear_factor,
            exponent: config.speed_exponentiation_factor,
        }
    }
}

/// Signed speed in lines per second for the remaining displacement
///
/// `subline_carry` is the fraction of a line already travelled but not yet
/// applied, so the distance left is `target - carry`.
#[inline]
pub fn velocity(target_displacement: i64, subline_carry: f64, curve: &VelocityCurve) -> f64 {
    let distance = (target_displacement as f64 - subline_carry).abs();
    let speed = curve.constant + curve.linear * distance.powf(curve.exponent);
    match target_displacement.signum() {
        0 => 0.0,
        sign => speed * sign as f64,
    }
}
