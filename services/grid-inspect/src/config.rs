//! Inspector configuration.

use anyhow::{Context, Result};
use grid_loader::GridFileConfig;
use mesh_common::MeshConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Mesh decomposition plus optional variable-name overrides.
///
/// ```yaml
/// mesh:
///   nx: 64
///   ny: 32
///   nz: 16
///   nxpe: 2
///   nype: 4
/// grid:
///   variables:
///     y_boundary_guards: y_boundary_guards
///     ny_inner: ny_inner
///     nz: nz
///     spacing: dx
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    pub mesh: MeshConfig,

    /// Defaults to the standard names with environment overrides applied.
    #[serde(default = "GridFileConfig::from_env")]
    pub grid: GridFileConfig,
}

impl InspectConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.mesh.validate()?;
        config.grid.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_only() {
        let config = InspectConfig::from_yaml_str("mesh:\n  nx: 8\n  ny: 4\n  nz: 2\n").unwrap();
        assert_eq!(config.mesh.nx, 8);
        assert_eq!(config.mesh.num_ranks(), 1);
    }

    #[test]
    fn test_variable_override() {
        let text = "\
mesh:
  nx: 8
  ny: 4
  nz: 2
grid:
  variables:
    y_boundary_guards: jyg
    ny_inner: ny_inner
    nz: nz
    spacing: dx
";
        let config = InspectConfig::from_yaml_str(text).unwrap();
        assert_eq!(config.grid.variables.y_boundary_guards, "jyg");
    }

    #[test]
    fn test_uneven_mesh_rejected() {
        let text = "mesh:\n  nx: 9\n  ny: 4\n  nz: 2\n  nxpe: 2\n";
        assert!(InspectConfig::from_yaml_str(text).is_err());
    }
}
