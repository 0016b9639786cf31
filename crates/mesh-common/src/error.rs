//! Error types for mesh description and decomposition.

use thiserror::Error;

/// Result type alias using MeshError.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised while describing or decomposing a mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Invalid mesh configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot split {points} points in {axis} evenly over {procs} processors")]
    UnevenDecomposition {
        axis: char,
        points: usize,
        procs: usize,
    },

    #[error("Rank {rank} out of range for a decomposition with {ranks} ranks")]
    RankOutOfRange { rank: usize, ranks: usize },

    #[error("Failed to read mesh configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse mesh configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl MeshError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
