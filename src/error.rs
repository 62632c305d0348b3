use std::path::PathBuf;

use rapier3d::prelude::RigidBodyHandle;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("placed {placed} of {requested} props before running out of attempts")]
    PropPlacement { placed: usize, requested: usize },

    #[error("rigid body {0:?} is not in the world")]
    MissingBody(RigidBodyHandle),
}

pub type SimResult<T> = Result<T, SimError>;
