//! Raycast car: per-wheel spring suspension and lateral tire grip, hosted in a
//! rapier3d world.

pub mod config;
pub mod debug_builders;
pub mod error;
pub mod gauge;
pub mod host;
pub mod physics;
pub mod smoothing;
pub mod spawn;
pub mod state;
pub mod suspension;
pub mod vehicle;

pub use config::SimConfig;
pub use error::{SimError, SimResult};
pub use host::PhysicsHost;
pub use physics::PhysicsWorld;
pub use vehicle::{CarController, ControlInput};
