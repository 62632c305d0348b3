//! Core shared types for the suspension solver (engine-agnostic).
// suspension/types.rs
use std::fmt;

use rapier3d::na::UnitQuaternion;
use rapier3d::prelude::{Isometry, Point, Real, Vector};
use serde::Serialize;

// ============================================
// Wheel identification
// ============================================

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum WheelId { FL, FR, RL, RR }

impl WheelId {
    pub const ALL: [WheelId; 4] = [WheelId::FL, WheelId::FR, WheelId::RL, WheelId::RR];

    pub fn as_str(&self) -> &'static str {
        match self {
            WheelId::FL => "FL",
            WheelId::FR => "FR",
            WheelId::RL => "RL",
            WheelId::RR => "RR",
        }
    }

    pub fn is_front(&self) -> bool {
        matches!(self, WheelId::FL | WheelId::FR)
    }

    pub fn is_rear(&self) -> bool {
        matches!(self, WheelId::RL | WheelId::RR)
    }
}

impl fmt::Display for WheelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// ----- mounts / params ----------------------
// ============================================

/// Suspension attach point. Body space when stored on the car, world space
/// when handed to the solver (see [`WheelMount::to_world`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelMount {
    pub origin: Point<Real>,    // top of the suspension
    pub up: Vector<Real>,       // unit; the probe travels along -up
    pub forward: Vector<Real>,  // unit; nominal rolling direction
    pub probe_length: Real,     // max suspension travel (> 0)
}

impl WheelMount {
    pub fn to_world(&self, pose: &Isometry<Real>) -> WheelMount {
        WheelMount {
            origin: pose * self.origin,
            up: pose.rotation * self.up,
            forward: pose.rotation * self.forward,
            probe_length: self.probe_length,
        }
    }

    /// Yaw the rolling direction about the mount's own `up`.
    pub fn steered(&self, angle: Real) -> WheelMount {
        let Some(axis) = rapier3d::na::Unit::try_new(self.up, 1.0e-6) else {
            return *self;
        };
        let rot = UnitQuaternion::from_axis_angle(&axis, angle);
        WheelMount { forward: rot * self.forward, ..*self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuspensionParams {
    pub rest_length: Real,      // m, equals the probe length
    pub spring_strength: Real,  // N at full compression
    pub grip_coefficient: Real, // 1/s, fraction of lateral slip cancelled per second
    pub drive_force: Real,      // m/s^2 along road forward, signed
}

// ============================================
// ----- contact + forces ---------------------
// ============================================

/// Probe hit in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactSample {
    pub point: Point<Real>,
    pub normal: Vector<Real>,
    pub distance: Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ForceMode {
    /// Newtons.
    Force,
    /// Mass-independent; the host multiplies by body mass.
    Acceleration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceContribution {
    pub force: Vector<Real>,
    pub at_point: Point<Real>,
    pub mode: ForceMode,
}
