//! suspension - engine-agnostic raycast suspension + tire grip (pure types + solver)

pub mod types;
pub mod basis;
pub mod solve;

pub use types::*;
pub use basis::ContactBasis;
pub use solve::{resolve_contact, solve_wheel, spring_compression, WheelContact, WheelSolution};
