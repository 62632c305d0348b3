use rapier3d::prelude::{Real, RigidBody};
use serde::Serialize;

use crate::debug_builders::DebugRay;
use crate::vehicle::WheelReport;

#[derive(Debug, Clone, Serialize)]
pub struct VehicleSnapshot {
    pub tick: u64,
    pub position: [f32; 3],
    pub rotation: [f32; 4], // quaternion (i, j, k, w)
    pub speed: f32,         // m/s
    pub throttle: f32,
    pub steer_angle: f32,   // radians
    pub speedometer: f32,   // needle degrees
    pub wheels: Vec<WheelReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Vec<DebugRay>>,
}

impl VehicleSnapshot {
    pub fn capture(tick: u64, body: &RigidBody, throttle: Real, steer_angle: Real, speedometer: Real, wheels: Vec<WheelReport>) -> Self {
        let iso = body.position();
        let t = iso.translation.vector;
        let q = iso.rotation;
        Self {
            tick,
            position: [t.x, t.y, t.z],
            rotation: [q.i, q.j, q.k, q.w],
            speed: body.linvel().norm(),
            throttle,
            steer_angle,
            speedometer,
            wheels,
            debug: None,
        }
    }

    pub fn with_debug(mut self, rays: Vec<DebugRay>) -> Self {
        self.debug = Some(rays);
        self
    }

    pub fn to_json(&self) -> String {
        // all fields are plain numbers / strings
        serde_json::to_string(self).unwrap_or_else(|e| format!(r#"{{"error":"{e}"}}"#))
    }
}
