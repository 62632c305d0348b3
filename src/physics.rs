// src/physics.rs
//
// rapier3d world hosting the car: static ground, an optional ramp, a forest
// floor patch for props, and the dynamic chassis. Implements PhysicsHost so
// the suspension solver can probe it and push forces into it.

use log::{info, warn};
use rapier3d::prelude::*;

use crate::config::{CarConfig, RampConfig, TreePrefab, WorldConfig};
use crate::error::{SimError, SimResult};
use crate::host::PhysicsHost;
use crate::suspension::{ContactSample, ForceContribution, ForceMode};

pub const GROUP_GROUND: Group  = Group::from_bits_truncate(0b0001);
pub const GROUP_CHASSIS: Group = Group::from_bits_truncate(0b0010);
pub const GROUP_FOREST: Group  = Group::from_bits_truncate(0b0100);
pub const GROUP_PROPS: Group   = Group::from_bits_truncate(0b1000);

const WORLD_LIMIT: Real = 1_000.0;

pub struct PhysicsWorld {
    pub gravity: Vector<Real>,               // gravity vector
    pub pipeline: PhysicsPipeline,           // physics pipeline
    pub island_manager: IslandManager,       // manages islands of bodies
    pub broad_phase: DefaultBroadPhase,      // broad-phase collision detection
    pub narrow_phase: NarrowPhase,           // collision detection
    pub bodies: RigidBodySet,                // for rigid bodies
    pub colliders: ColliderSet,              // for collision shapes
    pub joints: ImpulseJointSet,             // for constraints
    pub multibody_joints: MultibodyJointSet, // for articulated bodies
    pub ccd: CCDSolver,                      // continuous collision detection
    pub query_pipeline: QueryPipeline,       // for raycasting
    pub spawn_point: Vector<Real>,           // where runaway bodies are put back
}

impl PhysicsWorld {
    pub fn new(cfg: &WorldConfig) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        // === Ground slab, top surface exactly at y = 0 ===
        let ground_rb = RigidBodyBuilder::fixed()
            .translation(vector![0.0, -0.5, 0.0])
            .build();
        let ground_handle = bodies.insert(ground_rb);

        let ground_collider = ColliderBuilder::cuboid(cfg.ground_half_extent, 0.5, cfg.ground_half_extent)
            .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CHASSIS))
            .friction(1.2)
            .restitution(0.0)
            .build();
        colliders.insert_with_parent(ground_collider, ground_handle, &mut bodies);

        // === Forest floor: the only surface props may land on ===
        let f = &cfg.forest;
        let floor = ColliderBuilder::cuboid(f.floor_half_extents[0], f.floor_half_extents[1], f.floor_half_extents[2])
            .translation(vector![f.floor_center[0], f.floor_center[1], f.floor_center[2]])
            .collision_groups(InteractionGroups::new(GROUP_GROUND | GROUP_FOREST, GROUP_CHASSIS))
            .friction(1.0)
            .build();
        colliders.insert(floor);

        if let Some(ramp) = &cfg.ramp {
            colliders.insert(ramp_collider(ramp));
        }

        info!(
            "🌎 World built. Bodies = {}, Colliders = {}",
            bodies.len(),
            colliders.len()
        );

        let [sx, sy, sz] = cfg.spawn_position;

        let mut world = Self {
            gravity: vector![0.0, -9.81, 0.0],
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders,
            joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            spawn_point: vector![sx, sy, sz],
        };
        world.query_pipeline.update(&world.colliders);
        world
    }

    /// Dynamic box chassis. Wheels are not colliders; the suspension holds
    /// the box off the ground.
    pub fn spawn_car(&mut self, config: &CarConfig, position: [Real; 3]) -> RigidBodyHandle {
        let [hx, hy, hz] = config.chassis_half_extents;
        let volume = 8.0 * hx * hy * hz;
        let density = config.mass / volume; // ρ = m / V

        let rb = RigidBodyBuilder::dynamic()
            .translation(vector![position[0], position[1], position[2]])
            .linear_damping(config.linear_damping)
            .angular_damping(config.angular_damping)
            .ccd_enabled(true)
            .build();

        let collider = ColliderBuilder::cuboid(hx, hy, hz)
            .collision_groups(InteractionGroups::new(
                GROUP_CHASSIS,
                GROUP_GROUND | GROUP_FOREST | GROUP_PROPS,
            ))
            .density(density)
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = self.bodies.insert(rb);
        self.colliders.insert_with_parent(collider, handle, &mut self.bodies);
        if let Some(rb) = self.bodies.get_mut(handle) {
            rb.recompute_mass_properties_from_colliders(&self.colliders);
        }

        info!("🚗 Spawned car at {:?} (body = {:?})", position, handle);
        handle
    }

    /// Static tree trunk standing on `base`.
    pub fn add_prop(&mut self, prefab: &TreePrefab, base: Point<Real>, yaw: Real, scale: Real) -> ColliderHandle {
        let half_height = prefab.trunk_half_height * scale;
        let radius = prefab.trunk_radius * scale;
        let center = base.coords + vector![0.0, half_height, 0.0];

        let collider = ColliderBuilder::cylinder(half_height, radius)
            .position(Isometry::new(center, vector![0.0, yaw, 0.0]))
            .collision_groups(InteractionGroups::new(GROUP_PROPS, GROUP_CHASSIS))
            .build();
        self.colliders.insert(collider)
    }

    /// Clear last step's user forces and make ray casts see the current state.
    pub fn begin_step(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            body.reset_forces(false);
            body.reset_torques(false);
        }
        self.query_pipeline.update(&self.colliders);
    }

    pub fn body(&self, handle: RigidBodyHandle) -> SimResult<&RigidBody> {
        self.bodies.get(handle).ok_or(SimError::MissingBody(handle))
    }

    pub fn step(&mut self, dt: Real) {
        self.pipeline.step(
            &self.gravity,
            &IntegrationParameters {
                dt,
                ..IntegrationParameters::default()
            },
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        // Safety: prevent bodies from exploding to insane coordinates
        for (handle, body) in self.bodies.iter_mut() {
            if !body.is_dynamic() {
                continue;
            }
            let pos = *body.translation();
            let bad = pos.iter().any(|c| !c.is_finite() || c.abs() > WORLD_LIMIT);

            if bad {
                body.set_position(Isometry::translation(self.spawn_point.x, self.spawn_point.y, self.spawn_point.z), true);
                body.set_linvel(Vector::zeros(), true);
                body.set_angvel(Vector::zeros(), true);
                warn!("⚠️ Reset runaway body {:?} from {:?} back to spawn", handle, pos);
            }
        }
    }
}

fn ramp_collider(ramp: &RampConfig) -> Collider {
    let [hx, hy, hz] = ramp.half_extents;
    let [cx, cy, cz] = ramp.center;
    ColliderBuilder::cuboid(hx, hy, hz)
        .position(Isometry::new(vector![cx, cy, cz], vector![ramp.pitch, 0.0, 0.0]))
        .collision_groups(InteractionGroups::new(GROUP_GROUND, GROUP_CHASSIS))
        .friction(1.0)
        .build()
}

impl PhysicsHost for PhysicsWorld {
    type Body = RigidBodyHandle;

    fn body_pose(&self, body: RigidBodyHandle) -> Isometry<Real> {
        self.bodies
            .get(body)
            .map(|b| *b.position())
            .unwrap_or_else(Isometry::identity)
    }

    fn probe(
        &self,
        origin: Point<Real>,
        direction: Vector<Real>,
        max_distance: Real,
        exclude: RigidBodyHandle,
    ) -> Option<ContactSample> {
        let ray = Ray::new(origin, direction);
        let filter = QueryFilter::default().exclude_rigid_body(exclude);

        let (_collider, hit) = self.query_pipeline.cast_ray_and_get_normal(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true,
            filter,
        )?;

        Some(ContactSample {
            point: ray.point_at(hit.time_of_impact),
            normal: hit.normal,
            distance: hit.time_of_impact,
        })
    }

    fn point_velocity(&self, body: RigidBodyHandle, point: Point<Real>) -> Vector<Real> {
        self.bodies
            .get(body)
            .map(|b| b.velocity_at_point(&point))
            .unwrap_or_else(Vector::zeros)
    }

    fn apply_force(&mut self, body: RigidBodyHandle, contribution: ForceContribution) {
        let Some(rb) = self.bodies.get_mut(body) else { return };
        let force = match contribution.mode {
            ForceMode::Force => contribution.force,
            ForceMode::Acceleration => contribution.force * rb.mass(),
        };
        rb.add_force_at_point(force, contribution.at_point, true);
    }
}
