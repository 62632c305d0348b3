//! Critically damped smoothing for driver inputs and gauges.

use rapier3d::prelude::Real;

/// Move `current` toward `target` like a critically damped spring that
/// settles in roughly `smooth_time` seconds. `velocity` carries state between
/// calls. The result never overshoots `target`.
pub fn smooth_damp(
    current: Real,
    target: Real,
    velocity: &mut Real,
    smooth_time: Real,
    max_speed: Real,
    dt: Real,
) -> Real {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1.0e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut out = clamped_target + (change + temp) * decay;

    // overshoot guard
    if (target - current > 0.0) == (out > target) {
        out = target;
        *velocity = (out - target) / dt;
    }
    out
}

/// A scalar with its own smoothing velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Smoothed {
    pub value: Real,
    pub velocity: Real,
}

impl Smoothed {
    pub fn new(value: Real) -> Self {
        Self { value, velocity: 0.0 }
    }

    pub fn update(&mut self, target: Real, smooth_time: Real, dt: Real) -> Real {
        self.value = smooth_damp(self.value, target, &mut self.velocity, smooth_time, Real::INFINITY, dt);
        self.value
    }
}
