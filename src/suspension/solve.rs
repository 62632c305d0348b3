// ==============================================================================
// solve.rs — RAYCAST SUSPENSION + LATERAL GRIP (ONE WHEEL, ONE STEP)
// ------------------------------------------------------------------------------
// Per wheel, per fixed step:
// 1) probe from the mount origin along -up, up to probe_length
// 2) miss -> no forces (wheel in the air)
// 3) hit at distance d:
//      compression = clamp01(1 - d / rest_length)^2
//      spring      = compression * spring_strength, along up, at the mount
//      grip        = -dot(v_contact, lateral) * grip_coefficient, along lateral
//      drive       = drive_force along road_forward
//    grip + drive are applied together at the contact point (acceleration),
//    the spring separately at the mount origin (force).
//
// Notes:
// - This file does NOT apply forces. It only builds contributions; the caller
//   forwards them to the host.
// - Nothing here is cached between steps.
// ==============================================================================

use rapier3d::prelude::{Real, Vector};

use crate::host::PhysicsHost;
use crate::suspension::basis::ContactBasis;
use crate::suspension::types::{
    ContactSample, ForceContribution, ForceMode, SuspensionParams, WheelMount,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelContact {
    pub sample: ContactSample,
    pub basis: ContactBasis,
    pub compression: Real,  // 0..1, already squared
    pub slip_lateral: Real, // m/s along basis.lateral
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WheelSolution {
    pub contact: Option<WheelContact>,
    pub forces: Vec<ForceContribution>,
}

impl WheelSolution {
    pub fn airborne() -> Self {
        Self::default()
    }

    pub fn grounded(&self) -> bool {
        self.contact.is_some()
    }

    /// Cosmetic only: how far below the mount the wheel sits.
    pub fn visual_travel(&self) -> Option<Real> {
        self.contact.map(|c| c.sample.distance)
    }
}

/// Quadratic spring response: soft near full extension, stiff near bottom-out.
#[inline]
pub fn spring_compression(distance: Real, rest_length: Real) -> Real {
    let linear = (1.0 - distance / rest_length).clamp(0.0, 1.0);
    if linear.is_finite() { linear * linear } else { 0.0 }
}

/// Solve one wheel against a contact that has already been probed.
///
/// `contact_velocity` is the body's velocity at `sample.point`.
pub fn resolve_contact(
    mount: &WheelMount,
    params: &SuspensionParams,
    sample: ContactSample,
    contact_velocity: Vector<Real>,
) -> WheelSolution {
    let compression = spring_compression(sample.distance, params.rest_length);
    let basis = ContactBasis::new(sample.normal, mount.forward, mount.up);

    // slide velocity in (lateral, normal, forward); only the lateral part is gripped
    let slip_lateral = finite_or_zero(basis.to_local(contact_velocity).x);

    let grip = basis.to_world(Vector::new(-slip_lateral * params.grip_coefficient, 0.0, 0.0));
    let drive = basis.road_forward * params.drive_force;
    let contact_force = finite_or_zero_vec(grip + drive);

    let spring = finite_or_zero_vec(mount.up * (compression * params.spring_strength));

    let forces = vec![
        ForceContribution {
            force: contact_force,
            at_point: sample.point,
            mode: ForceMode::Acceleration,
        },
        ForceContribution {
            force: spring,
            at_point: mount.origin,
            mode: ForceMode::Force,
        },
    ];

    WheelSolution {
        contact: Some(WheelContact { sample, basis, compression, slip_lateral }),
        forces,
    }
}

/// Probe, read contact velocity and solve one wheel. `mount` is world space.
pub fn solve_wheel<H: PhysicsHost>(
    host: &H,
    body: H::Body,
    mount: &WheelMount,
    params: &SuspensionParams,
) -> WheelSolution {
    let Some(sample) = host.probe(mount.origin, -mount.up, mount.probe_length, body) else {
        return WheelSolution::airborne();
    };

    let v = host.point_velocity(body, sample.point);
    resolve_contact(mount, params, sample, v)
}

#[inline]
fn finite_or_zero(x: Real) -> Real {
    if x.is_finite() { x } else { 0.0 }
}

#[inline]
fn finite_or_zero_vec(v: Vector<Real>) -> Vector<Real> {
    if v.iter().all(|c| c.is_finite()) { v } else { Vector::zeros() }
}
