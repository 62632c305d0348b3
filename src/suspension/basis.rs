// ==============================================================================
// basis.rs — CONTACT PLANE BASIS (WORLD SPACE)
// ------------------------------------------------------------------------------
// Builds the orthonormal frame a tire works in at its contact point:
// - normal:       surface normal from the probe hit
// - road_forward: mount forward projected onto the contact plane
// - lateral:      normal × road_forward (right-handed)
//
// With normal = +Y and forward = +Z, lateral comes out as +X.
//
// Degenerate inputs never produce NaN:
// - zero normal            -> the mount's up is used instead
// - forward parallel to n  -> tangent built from the world axis least aligned
//                             with the normal
// ==============================================================================

use rapier3d::prelude::{Real, Vector};

const EPS: Real = 1.0e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactBasis {
    pub normal: Vector<Real>,
    pub road_forward: Vector<Real>,
    pub lateral: Vector<Real>,
}

impl ContactBasis {
    pub fn new(normal: Vector<Real>, forward: Vector<Real>, up_fallback: Vector<Real>) -> Self {
        let normal = safe_normalize(normal)
            .or_else(|| safe_normalize(up_fallback))
            .unwrap_or_else(Vector::y);

        let road_forward = safe_normalize(project_on_plane(forward, normal))
            .unwrap_or_else(|| any_tangent(normal));

        let lateral = normal.cross(&road_forward);

        Self { normal, road_forward, lateral }
    }

    /// World vector -> (lateral, normal, forward) components.
    pub fn to_local(&self, v: Vector<Real>) -> Vector<Real> {
        Vector::new(v.dot(&self.lateral), v.dot(&self.normal), v.dot(&self.road_forward))
    }

    /// (lateral, normal, forward) components -> world vector.
    pub fn to_world(&self, local: Vector<Real>) -> Vector<Real> {
        self.lateral * local.x + self.normal * local.y + self.road_forward * local.z
    }
}

#[inline]
pub fn project_on_plane(v: Vector<Real>, normal: Vector<Real>) -> Vector<Real> {
    v - normal * v.dot(&normal)
}

#[inline]
pub fn safe_normalize(v: Vector<Real>) -> Option<Vector<Real>> {
    let n = v.norm();
    (n > EPS && n.is_finite()).then(|| v / n)
}

fn any_tangent(normal: Vector<Real>) -> Vector<Real> {
    let a = normal.abs();
    let axis = if a.x <= a.y && a.x <= a.z {
        Vector::x()
    } else if a.y <= a.z {
        Vector::y()
    } else {
        Vector::z()
    };
    // `axis` is at most ~54.7° from orthogonal to `normal`, never parallel
    safe_normalize(project_on_plane(axis, normal)).unwrap_or_else(Vector::x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(b: &ContactBasis) {
        for v in [b.normal, b.road_forward, b.lateral] {
            assert!((v.norm() - 1.0).abs() < 1e-5, "not unit: {v:?}");
        }
        assert!(b.normal.dot(&b.road_forward).abs() < 1e-5);
        assert!(b.normal.dot(&b.lateral).abs() < 1e-5);
        assert!(b.road_forward.dot(&b.lateral).abs() < 1e-5);
    }

    #[test]
    fn flat_ground_sign_convention() {
        let b = ContactBasis::new(Vector::y(), Vector::z(), Vector::y());
        assert!((b.lateral - Vector::x()).norm() < 1e-6);
        assert!((b.road_forward - Vector::z()).norm() < 1e-6);
        assert_orthonormal(&b);
    }

    #[test]
    fn slope_projects_forward_onto_plane() {
        let n = Vector::new(0.0, 1.0, -1.0).normalize();
        let b = ContactBasis::new(n, Vector::z(), Vector::y());
        assert_orthonormal(&b);
        // uphill: forward picks up a +Y component
        assert!(b.road_forward.y > 0.5);
        assert!(b.road_forward.z > 0.5);
    }

    #[test]
    fn forward_parallel_to_normal_falls_back() {
        for n in [Vector::y(), Vector::z(), -Vector::x(), Vector::new(1.0, 1.0, 1.0).normalize()] {
            let b = ContactBasis::new(n, n * 3.0, Vector::y());
            assert!(b.lateral.iter().all(|c| c.is_finite()));
            assert_orthonormal(&b);
        }
    }

    #[test]
    fn zero_normal_uses_mount_up() {
        let b = ContactBasis::new(Vector::zeros(), Vector::z(), Vector::y());
        assert!((b.normal - Vector::y()).norm() < 1e-6);
        assert_orthonormal(&b);
    }

    #[test]
    fn local_world_round_trip() {
        let b = ContactBasis::new(Vector::new(0.2, 1.0, 0.1).normalize(), Vector::z(), Vector::y());
        let v = Vector::new(1.5, -2.0, 0.25);
        assert!((b.to_world(b.to_local(v)) - v).norm() < 1e-5);
    }
}
