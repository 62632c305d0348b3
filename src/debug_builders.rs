// ==============================================================================
// debug_builders.rs — DEBUG OVERLAY PRIMITIVES
// ------------------------------------------------------------------------------
// Serializable line segments describing what each wheel saw this step:
// - grounded: road basis (forward blue, normal green, lateral red),
//   suspension ray shaded yellow -> red by compression, grip vector in cyan
// - airborne: the full probe ray in green
//
// Purely visualization scaffolding; no physics side effects.
// ==============================================================================

use rapier3d::prelude::{Point, Real, Vector};
use serde::Serialize;

use crate::suspension::{WheelId, WheelMount, WheelSolution};

const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
const RED: [f32; 3] = [1.0, 0.0, 0.0];
const YELLOW: [f32; 3] = [1.0, 0.92, 0.016];
const CYAN: [f32; 3] = [0.0, 1.0, 1.0];

const BASIS_LEN: Real = 0.5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DebugRay {
    pub wheel: WheelId,
    pub origin: [f32; 3],
    pub direction: [f32; 3], // unit, or zero for a degenerate segment
    pub length: f32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugOverlay {
    pub rays: Vec<DebugRay>,
}

impl DebugOverlay {
    pub fn clear(&mut self) {
        self.rays.clear();
    }

    pub fn push_wheel(&mut self, wheel: WheelId, mount: &WheelMount, solution: &WheelSolution) {
        let Some(contact) = solution.contact else {
            self.rays.push(segment(wheel, mount.origin, -mount.up * mount.probe_length, GREEN));
            return;
        };

        let p = contact.sample.point;
        let b = contact.basis;
        self.rays.push(segment(wheel, p, b.road_forward * BASIS_LEN, BLUE));
        self.rays.push(segment(wheel, p, b.normal * BASIS_LEN, GREEN));
        self.rays.push(segment(wheel, p, b.lateral * BASIS_LEN, RED));

        let shade = lerp_color(YELLOW, RED, contact.compression);
        self.rays.push(segment(wheel, mount.origin, p - mount.origin, shade));

        // velocity the grip is trying to cancel, drawn from the mount
        let grip_vel = b.lateral * -contact.slip_lateral;
        self.rays.push(segment(wheel, mount.origin, grip_vel, CYAN));
    }
}

#[inline] fn v3(v: Vector<Real>) -> [f32; 3] { [v.x, v.y, v.z] }
#[inline] fn p3(p: Point<Real>)  -> [f32; 3] { [p.x, p.y, p.z] }

fn segment(wheel: WheelId, origin: Point<Real>, delta: Vector<Real>, color: [f32; 3]) -> DebugRay {
    let length = delta.norm();
    let direction = if length > 1.0e-6 { v3(delta / length) } else { [0.0; 3] };
    DebugRay { wheel, origin: p3(origin), direction, length, color }
}

fn lerp_color(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
