// ==============================================================================
// host.rs — RIGID-BODY HOST INTERFACE
// ------------------------------------------------------------------------------
// The suspension solver never owns a physics engine. Whatever integrates the
// chassis implements PhysicsHost and is passed in per step.
// ==============================================================================

use rapier3d::prelude::{Isometry, Point, Real, Vector};

use crate::suspension::{ContactSample, ForceContribution};

pub trait PhysicsHost {
    type Body: Copy;

    /// World pose of `body`; identity if the body is gone.
    fn body_pose(&self, body: Self::Body) -> Isometry<Real>;

    /// Nearest hit along `direction` (unit) within `max_distance`,
    /// ignoring `exclude` itself.
    fn probe(
        &self,
        origin: Point<Real>,
        direction: Vector<Real>,
        max_distance: Real,
        exclude: Self::Body,
    ) -> Option<ContactSample>;

    fn point_velocity(&self, body: Self::Body, point: Point<Real>) -> Vector<Real>;

    fn apply_force(&mut self, body: Self::Body, contribution: ForceContribution);
}
