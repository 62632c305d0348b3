use rapier3d::prelude::Real;

use crate::config::SpeedometerConfig;
use crate::smoothing::Smoothed;

/// Needle angle (degrees) for a dial speedometer.
#[derive(Debug, Clone)]
pub struct Speedometer {
    cfg: SpeedometerConfig,
    needle: Smoothed,
}

impl Speedometer {
    pub fn new(cfg: SpeedometerConfig) -> Self {
        let needle = Smoothed::new(cfg.start_rotation);
        Self { cfg, needle }
    }

    pub fn target_angle(&self, speed: Real) -> Real {
        self.cfg.start_rotation - self.cfg.degrees_per_speed * speed.abs()
    }

    pub fn update(&mut self, speed: Real, dt: Real) -> Real {
        let target = self.target_angle(speed);
        self.needle.update(target, self.cfg.smooth_time, dt)
    }

    pub fn angle(&self) -> Real {
        self.needle.value
    }
}
