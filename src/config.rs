// ==============================================================================
// config.rs — SIMULATION CONFIG (JSON)
// ------------------------------------------------------------------------------
// Every field has a default so a config file only needs the values it changes.
// ==============================================================================

use std::fs;
use std::path::Path;

use rapier3d::prelude::Real;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarConfig {
    pub mass: Real,                       // kg
    pub linear_damping: Real,             // drag
    pub angular_damping: Real,            // rotational drag
    pub chassis_half_extents: [Real; 3],  // [hx, hy, hz] meters

    // --- Suspension ---
    pub suspension_length: Real,          // probe length == spring rest length (m)
    pub suspension_strength: Real,        // N at full compression
    pub mount_offsets: [[Real; 3]; 4],    // FL, FR, RL, RR in chassis space (+Z forward)

    // --- Tires / drive ---
    pub grip_amount: Real,                // 1/s of lateral slip cancelled
    pub power: Real,                      // m/s^2 per driven wheel at full throttle

    // --- Controls ---
    pub max_steer_angle: Real,            // radians
    pub input_smooth_time: Real,          // s

    // --- Cosmetic ---
    pub wheel_visual_lift: Real,          // wheel local y = -travel + lift
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            mass: 1200.0,
            linear_damping: 1.0,
            angular_damping: 2.0,
            chassis_half_extents: [0.9, 0.4, 2.0],

            suspension_length: 1.0,
            suspension_strength: 12_000.0,
            mount_offsets: [
                [ 0.8, -0.2,  1.4],
                [-0.8, -0.2,  1.4],
                [ 0.8, -0.2, -1.4],
                [-0.8, -0.2, -1.4],
            ],

            grip_amount: 6.0,
            power: 4.0,

            max_steer_angle: 30.0_f32.to_radians(),
            input_smooth_time: 0.4,

            wheel_visual_lift: 0.3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreePrefab {
    pub name: String,
    pub trunk_radius: Real,
    pub trunk_half_height: Real,
}

impl Default for TreePrefab {
    fn default() -> Self {
        Self { name: "pine".into(), trunk_radius: 0.3, trunk_half_height: 2.5 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    pub floor_center: [Real; 3],       // forest ground patch, props only land here
    pub floor_half_extents: [Real; 3],
    pub amount: usize,
    pub bounds_min: [Real; 3],
    pub bounds_max: [Real; 3],
    pub prefabs: Vec<TreePrefab>,
    pub seed: u64,
    pub max_attempts: usize,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            floor_center: [0.0, 0.0, 90.0],
            floor_half_extents: [60.0, 0.05, 50.0],
            amount: 40,
            bounds_min: [-120.0, 5.0, 30.0],
            bounds_max: [120.0, 20.0, 150.0],
            prefabs: vec![
                TreePrefab::default(),
                TreePrefab { name: "oak".into(), trunk_radius: 0.45, trunk_half_height: 2.0 },
            ],
            seed: 7,
            max_attempts: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub ground_half_extent: Real,     // ground is a square slab, top at y = 0
    pub ramp: Option<RampConfig>,
    pub forest: ForestConfig,
    pub spawn_position: [Real; 3],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_half_extent: 250.0,
            ramp: Some(RampConfig::default()),
            forest: ForestConfig::default(),
            spawn_position: [0.0, 1.5, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RampConfig {
    pub center: [Real; 3],
    pub half_extents: [Real; 3],
    pub pitch: Real, // radians about +X
}

impl Default for RampConfig {
    fn default() -> Self {
        Self {
            center: [0.0, 0.0, -40.0],
            half_extents: [4.0, 0.5, 10.0],
            pitch: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedometerConfig {
    pub start_rotation: Real,     // degrees at standstill
    pub degrees_per_speed: Real,  // degrees per m/s
    pub smooth_time: Real,        // s
}

impl Default for SpeedometerConfig {
    fn default() -> Self {
        Self { start_rotation: 120.0, degrees_per_speed: 4.0, smooth_time: 0.5 }
    }
}

/// One leg of the scripted drive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DriveSegment {
    pub ticks: u64,
    pub throttle: Real, // -1..1
    pub steer: Real,    // -1..1, positive = right
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub tick_hz: u32,
    pub duration_ticks: u64,     // 0 = run until Ctrl-C
    pub snapshot_every: u64,
    pub realtime: bool,
    pub debug_overlay: bool,
    pub drive_plan: Vec<DriveSegment>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            duration_ticks: 60 * 20,
            snapshot_every: 30,
            realtime: true,
            debug_overlay: false,
            drive_plan: vec![
                DriveSegment { ticks: 120, throttle: 0.0, steer: 0.0 },
                DriveSegment { ticks: 240, throttle: 1.0, steer: 0.0 },
                DriveSegment { ticks: 180, throttle: 1.0, steer: 0.6 },
                DriveSegment { ticks: 180, throttle: 0.5, steer: -0.6 },
                DriveSegment { ticks: 240, throttle: -0.5, steer: 0.0 },
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub car: CarConfig,
    pub world: WorldConfig,
    pub speedometer: SpeedometerConfig,
    pub run: RunConfig,
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: SimConfig = serde_json::from_str(&text).map_err(|source| SimError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SimResult<()> {
        let car = &self.car;
        let finite = [
            ("car.mass", car.mass),
            ("car.linear_damping", car.linear_damping),
            ("car.angular_damping", car.angular_damping),
            ("car.suspension_length", car.suspension_length),
            ("car.suspension_strength", car.suspension_strength),
            ("car.grip_amount", car.grip_amount),
            ("car.power", car.power),
            ("car.max_steer_angle", car.max_steer_angle),
            ("car.input_smooth_time", car.input_smooth_time),
            ("car.wheel_visual_lift", car.wheel_visual_lift),
            ("speedometer.start_rotation", self.speedometer.start_rotation),
            ("speedometer.degrees_per_speed", self.speedometer.degrees_per_speed),
            ("speedometer.smooth_time", self.speedometer.smooth_time),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::InvalidConfig(format!("{name} must be finite (got {value})")));
            }
        }
        if car.mount_offsets.iter().flatten().any(|c| !c.is_finite()) {
            return Err(SimError::InvalidConfig("car.mount_offsets must be finite".into()));
        }

        let positive = [
            ("car.mass", car.mass),
            ("car.suspension_length", car.suspension_length),
            ("car.input_smooth_time", car.input_smooth_time),
            ("speedometer.smooth_time", self.speedometer.smooth_time),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(SimError::InvalidConfig(format!("{name} must be > 0 (got {value})")));
            }
        }
        // chassis density is mass / volume
        if car.chassis_half_extents.iter().any(|&e| !(e.is_finite() && e > 0.0)) {
            return Err(SimError::InvalidConfig(format!(
                "car.chassis_half_extents must be finite and > 0 (got {:?})",
                car.chassis_half_extents
            )));
        }
        if car.suspension_strength < 0.0 || car.grip_amount < 0.0 {
            return Err(SimError::InvalidConfig(
                "car.suspension_strength and car.grip_amount must be >= 0".into(),
            ));
        }

        if self.run.tick_hz == 0 {
            return Err(SimError::InvalidConfig("run.tick_hz must be > 0".into()));
        }
        if !self.run.realtime && self.run.duration_ticks == 0 {
            return Err(SimError::InvalidConfig(
                "run.duration_ticks must be set when run.realtime is false".into(),
            ));
        }
        if self
            .run
            .drive_plan
            .iter()
            .any(|s| !s.throttle.is_finite() || !s.steer.is_finite())
        {
            return Err(SimError::InvalidConfig("run.drive_plan inputs must be finite".into()));
        }

        let world = &self.world;
        let forest = &world.forest;
        let mut world_values = [world.ground_half_extent]
            .into_iter()
            .chain(world.spawn_position)
            .chain(forest.floor_center)
            .chain(forest.floor_half_extents)
            .chain(forest.bounds_min)
            .chain(forest.bounds_max);
        if world_values.any(|c| !c.is_finite()) {
            return Err(SimError::InvalidConfig("world values must be finite".into()));
        }
        if forest.amount > 0 && forest.prefabs.is_empty() {
            return Err(SimError::InvalidConfig("world.forest.prefabs is empty".into()));
        }
        if (0..3).any(|i| forest.bounds_min[i] > forest.bounds_max[i]) {
            return Err(SimError::InvalidConfig("world.forest bounds_min exceeds bounds_max".into()));
        }
        Ok(())
    }

    pub fn dt(&self) -> Real {
        1.0 / self.run.tick_hz as Real
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: SimConfig = serde_json::from_str(
            r#"{ "car": { "grip_amount": 2.5 }, "run": { "tick_hz": 120 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.car.grip_amount, 2.5);
        assert_eq!(cfg.car.suspension_length, CarConfig::default().suspension_length);
        assert_eq!(cfg.run.tick_hz, 120);
        assert!((cfg.dt() - 1.0 / 120.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_suspension_length() {
        let mut cfg = SimConfig::default();
        cfg.car.suspension_length = 0.0;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_chassis_extent() {
        let mut cfg = SimConfig::default();
        cfg.car.chassis_half_extents = [0.9, 0.0, 2.0];
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        cfg.car.chassis_half_extents = [0.9, -0.4, 2.0];
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_finite_values() {
        let mut cfg = SimConfig::default();
        cfg.car.input_smooth_time = Real::NAN;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        let mut cfg = SimConfig::default();
        cfg.car.suspension_strength = Real::INFINITY;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        let mut cfg = SimConfig::default();
        cfg.car.grip_amount = Real::NAN;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        let mut cfg = SimConfig::default();
        cfg.car.power = Real::NEG_INFINITY;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        let mut cfg = SimConfig::default();
        cfg.car.chassis_half_extents[2] = Real::INFINITY;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));

        let mut cfg = SimConfig::default();
        cfg.world.spawn_position[1] = Real::NAN;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_smooth_time() {
        let mut cfg = SimConfig::default();
        cfg.car.input_smooth_time = 0.0;
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_forest_without_prefabs() {
        let mut cfg = SimConfig::default();
        cfg.world.forest.prefabs.clear();
        assert!(matches!(cfg.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn load_reports_missing_file_and_bad_json() {
        let missing = std::env::temp_dir().join("raycar-does-not-exist.json");
        assert!(matches!(SimConfig::load(&missing), Err(SimError::ConfigIo { .. })));

        let bad = std::env::temp_dir().join(format!("raycar-bad-{}.json", std::process::id()));
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(SimConfig::load(&bad), Err(SimError::ConfigParse { .. })));
        let _ = fs::remove_file(&bad);
    }
}
