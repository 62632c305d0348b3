use log::{debug, info};
use rand::Rng;
use rapier3d::prelude::*;

use crate::config::ForestConfig;
use crate::error::{SimError, SimResult};
use crate::physics::{PhysicsWorld, GROUP_FOREST};

const DROP_DEPTH: Real = 1_000.0;

// ---------------------------------------------
// PLACED PROP (returned for logging / snapshots)
// ---------------------------------------------
#[derive(Debug, Clone)]
pub struct PlacedProp {
    pub prefab: String,
    pub position: Point<Real>,
    pub yaw: Real,
    pub scale: Real,
    pub collider: ColliderHandle,
}

pub fn random_point_in_bounds<R: Rng>(rng: &mut R, min: [Real; 3], max: [Real; 3]) -> Point<Real> {
    let mut p = [0.0; 3];
    for i in 0..3 {
        p[i] = if min[i] < max[i] { rng.gen_range(min[i]..max[i]) } else { min[i] };
    }
    point![p[0], p[1], p[2]]
}

// ---------------------------------------------------------
// Scatter trees: drop rays from random points in the bounds
// and keep only hits on the forest floor. Prefabs are used
// round-robin; each tree gets a random yaw and size.
// ---------------------------------------------------------
pub fn scatter_props<R: Rng>(
    world: &mut PhysicsWorld,
    cfg: &ForestConfig,
    rng: &mut R,
) -> SimResult<Vec<PlacedProp>> {
    let mut placed = Vec::with_capacity(cfg.amount);
    if cfg.amount == 0 {
        return Ok(placed);
    }
    if cfg.prefabs.is_empty() {
        return Err(SimError::InvalidConfig("world.forest.prefabs is empty".into()));
    }

    let down = vector![0.0, -1.0, 0.0];
    let mut attempts = 0;

    while placed.len() < cfg.amount {
        if attempts >= cfg.max_attempts {
            return Err(SimError::PropPlacement {
                placed: placed.len(),
                requested: cfg.amount,
            });
        }
        attempts += 1;

        let origin = random_point_in_bounds(rng, cfg.bounds_min, cfg.bounds_max);
        let ray = Ray::new(origin, down);

        let Some((hit_collider, toi)) = world.query_pipeline.cast_ray(
            &world.bodies,
            &world.colliders,
            &ray,
            DROP_DEPTH,
            true,
            QueryFilter::default(),
        ) else {
            continue;
        };

        let on_forest = world
            .colliders
            .get(hit_collider)
            .is_some_and(|c| c.collision_groups().memberships.contains(GROUP_FOREST));
        if !on_forest {
            continue;
        }

        let prefab = &cfg.prefabs[placed.len() % cfg.prefabs.len()];
        let position = ray.point_at(toi);
        let yaw = rng.gen_range(0.0..std::f32::consts::TAU);
        let scale = rng.gen_range(0.8..1.5);

        let collider = world.add_prop(prefab, position, yaw, scale);
        debug!("🌲 {} at {:?} (scale {:.2})", prefab.name, position, scale);

        placed.push(PlacedProp {
            prefab: prefab.name.clone(),
            position,
            yaw,
            scale,
            collider,
        });
    }

    // new trunks must be visible to the suspension probes
    world.query_pipeline.update(&world.colliders);

    info!("🌲 Placed {} props in {} attempts", placed.len(), attempts);
    Ok(placed)
}
