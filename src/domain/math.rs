use std::f64::consts::{PI, TAU};

/// Maps an angle into `[0, 2π)`.
pub fn normal_absolute_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU { 0.0 } else { a }
}

/// Maps an angle into `[-π, π)`.
pub fn normal_relative_angle(angle: f64) -> f64 {
    let a = (angle + PI).rem_euclid(TAU) - PI;
    if a >= PI { a - TAU } else { a }
}

/// Clamps `remaining` to `±limit` and returns the step taken this turn.
pub fn step_toward_zero(remaining: f64, limit: f64) -> f64 {
    remaining.clamp(-limit, limit)
}
