//! Configuration for grid file access.

use serde::{Deserialize, Serialize};

/// Names of the bookkeeping variables a grid file may contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableNames {
    /// Number of y boundary guard cells stored in the file (optional).
    pub y_boundary_guards: String,

    /// y index where the second target region starts (optional).
    pub ny_inner: String,

    /// Presence selects direct rather than spectral 3-D decoding.
    pub nz: String,

    /// Grid spacing field every standard grid file carries.
    pub spacing: String,
}

impl Default for VariableNames {
    fn default() -> Self {
        Self {
            y_boundary_guards: "y_boundary_guards".to_string(),
            ny_inner: "ny_inner".to_string(),
            nz: "nz".to_string(),
            spacing: "dx".to_string(),
        }
    }
}

/// Configuration for a [`GridFile`](crate::GridFile).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridFileConfig {
    #[serde(default)]
    pub variables: VariableNames,
}

impl GridFileConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GRID_Y_GUARDS_VAR") {
            config.variables.y_boundary_guards = val;
        }

        if let Ok(val) = std::env::var("GRID_NY_INNER_VAR") {
            config.variables.ny_inner = val;
        }

        if let Ok(val) = std::env::var("GRID_NZ_VAR") {
            config.variables.nz = val;
        }

        if let Ok(val) = std::env::var("GRID_SPACING_VAR") {
            config.variables.spacing = val;
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let names = [
            ("y_boundary_guards", &self.variables.y_boundary_guards),
            ("ny_inner", &self.variables.ny_inner),
            ("nz", &self.variables.nz),
            ("spacing", &self.variables.spacing),
        ];
        for (role, name) in names {
            if name.trim().is_empty() {
                return Err(format!("variable name for {} must not be empty", role));
            }
        }
        Ok(())
    }
}
