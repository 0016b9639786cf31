//! Load the requested fields for one partition and summarise them.

use anyhow::{bail, Result};
use datafile::DataFormat;
use grid_loader::{FieldRead, FieldSource, GridFile};
use mesh_common::{CellLocation, FieldBuffer, Partition, PartitionLayout};
use serde::Serialize;
use tracing::info;

/// Dimensionality to load a field with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDim {
    Two,
    Three,
}

impl FieldDim {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "2" | "2d" => Some(Self::Two),
            "3" | "3d" => Some(Self::Three),
            _ => None,
        }
    }
}

/// Statistics of one loaded field over the whole local array.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub source: &'static str,
    pub shape: [usize; 3],
    pub location: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl FieldSummary {
    fn from_read<T: FieldBuffer>(name: &str, read: &FieldRead<T>) -> Self {
        let field = &read.field;
        let (nx, ny, nz) = field.shape();

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    let v = field.value(x, y, z);
                    min = min.min(v);
                    max = max.max(v);
                    sum += v;
                }
            }
        }
        let count = nx * ny * nz;

        Self {
            name: name.to_string(),
            source: match read.source {
                FieldSource::File => "file",
                FieldSource::Scalar => "scalar",
                FieldSource::Default => "default",
            },
            shape: [nx, ny, nz],
            location: field.location().to_string(),
            min,
            max,
            mean: if count > 0 { sum / count as f64 } else { 0.0 },
        }
    }
}

/// What one rank sees of a grid file.
#[derive(Debug, Clone, Serialize)]
pub struct GridSummary {
    pub path: String,
    pub rank: usize,
    pub y_boundary_guards: usize,
    pub ny_inner: usize,
    pub x_boundary_guards: bool,
    pub fields: Vec<FieldSummary>,
}

/// A field to load.
#[derive(Debug, Clone)]
pub struct FieldRequest {
    pub name: String,
    pub dim: FieldDim,
    pub location: CellLocation,
    pub default: f64,
}

impl FieldRequest {
    /// Parse `name[:dim[:location]]`, e.g. `Rxy`, `psi:3d` or `psi:3d:zlow`.
    pub fn parse(text: &str, default: f64) -> Result<Self> {
        let mut parts = text.split(':');
        let name = match parts.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => bail!("empty field name in '{}'", text),
        };
        let dim = match parts.next() {
            Some(d) => match FieldDim::from_str(d) {
                Some(dim) => dim,
                None => bail!("unknown dimensionality '{}' for field {}", d, name),
            },
            None => FieldDim::Two,
        };
        let location = parts.next().map(CellLocation::from_str).unwrap_or_default();
        if parts.next().is_some() {
            bail!("too many ':' separated parts in '{}'", text);
        }

        Ok(Self {
            name,
            dim,
            location,
            default,
        })
    }
}

pub fn inspect<F: DataFormat>(
    grid: &mut GridFile<F>,
    partition: &Partition,
    rank: usize,
    requests: &[FieldRequest],
) -> Result<GridSummary> {
    let mut fields = Vec::with_capacity(requests.len());
    for request in requests {
        let summary = match request.dim {
            FieldDim::Two => {
                let read = grid.load_field_2d(partition, &request.name, request.default)?;
                FieldSummary::from_read(&request.name, &read)
            }
            FieldDim::Three => {
                let read = grid.load_field_3d_at(
                    partition,
                    &request.name,
                    request.default,
                    request.location,
                )?;
                FieldSummary::from_read(&request.name, &read)
            }
        };
        info!(
            field = %summary.name,
            source = summary.source,
            min = summary.min,
            max = summary.max,
            "Loaded field"
        );
        fields.push(summary);
    }

    Ok(GridSummary {
        path: grid.path().display().to_string(),
        rank,
        y_boundary_guards: grid.y_boundary_guards(),
        ny_inner: grid.ny_inner(),
        x_boundary_guards: grid.has_x_boundary_guards(partition),
        fields,
    })
}

/// Local extents of `partition` for the summary header.
pub fn describe_partition(partition: &Partition) -> String {
    format!(
        "local {}x{}x{} at offset ({}, {})",
        partition.local_nx(),
        partition.local_ny(),
        partition.local_nz(),
        partition.offset_x(),
        partition.offset_y()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use datafile::{MemoryDataset, MemoryFormat};
    use test_utils::{global_index_dataset, mesh};

    #[test]
    fn test_parse_field_request() {
        let r = FieldRequest::parse("psi:3d:zlow", 0.0).unwrap();
        assert_eq!(r.name, "psi");
        assert_eq!(r.dim, FieldDim::Three);
        assert_eq!(r.location, CellLocation::ZLow);

        let r = FieldRequest::parse("Rxy", 1.0).unwrap();
        assert_eq!(r.dim, FieldDim::Two);
        assert_eq!(r.location, CellLocation::Centre);

        assert!(FieldRequest::parse("", 0.0).is_err());
        assert!(FieldRequest::parse("psi:4d", 0.0).is_err());
        assert!(FieldRequest::parse("psi:3d:zlow:extra", 0.0).is_err());
    }

    #[test]
    fn test_inspect_reports_sources() {
        let config = mesh::six_ranks();
        let p = config.partition(0).unwrap();
        let dataset: MemoryDataset = global_index_dataset(config.nx + 4, config.ny, config.nz);
        let mut grid = GridFile::open(MemoryFormat::from_dataset(dataset), "grid.json").unwrap();

        let requests = vec![
            FieldRequest::parse("f2d", 0.0).unwrap(),
            FieldRequest::parse("f3d:3d", 0.0).unwrap(),
            FieldRequest::parse("missing", 2.5).unwrap(),
        ];
        let summary = inspect(&mut grid, &p, 0, &requests).unwrap();

        assert!(summary.x_boundary_guards);
        assert_eq!(summary.y_boundary_guards, 0);
        assert_eq!(summary.fields[0].source, "file");
        assert_eq!(summary.fields[1].shape, [12, 8, 4]);
        assert_eq!(summary.fields[2].source, "default");
        assert_eq!(summary.fields[2].mean, 2.5);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["fields"][0]["name"], "f2d");
    }
}
