//! In-memory datasets, optionally persisted as JSON.
//!
//! A [`MemoryFormat`] either wraps a dataset built in code (every path opens
//! it) or loads a JSON document from the path given to `open_read`.
//!
//! JSON layout:
//!
//! ```json
//! {
//!   "attributes": { "title": "test grid" },
//!   "variables": {
//!     "nx": { "shape": [], "data": { "type": "int", "values": [30] } },
//!     "dx": { "shape": [34, 20], "data": { "type": "real", "values": [...] } }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::format::{hyperslab_indices, DataFormat};

/// Stored values of one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum VariableData {
    Int(Vec<i32>),
    Real(Vec<f64>),
}

impl VariableData {
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Real(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named variable. An empty `shape` is a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryVariable {
    #[serde(default)]
    pub shape: Vec<usize>,
    pub data: VariableData,
}

impl MemoryVariable {
    /// Extents as reported by [`DataFormat::size`].
    fn extents(&self) -> Vec<usize> {
        if self.shape.is_empty() {
            vec![1]
        } else {
            self.shape.clone()
        }
    }
}

/// A complete dataset held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryDataset {
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub variables: BTreeMap<String, MemoryVariable>,
}

impl MemoryDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a real-valued variable.
    pub fn with_real(mut self, name: &str, shape: &[usize], values: Vec<f64>) -> Self {
        self.variables.insert(
            name.to_string(),
            MemoryVariable {
                shape: shape.to_vec(),
                data: VariableData::Real(values),
            },
        );
        self
    }

    /// Add an integer variable.
    pub fn with_int(mut self, name: &str, shape: &[usize], values: Vec<i32>) -> Self {
        self.variables.insert(
            name.to_string(),
            MemoryVariable {
                shape: shape.to_vec(),
                data: VariableData::Int(values),
            },
        );
        self
    }

    pub fn with_scalar_real(self, name: &str, value: f64) -> Self {
        self.with_real(name, &[], vec![value])
    }

    pub fn with_scalar_int(self, name: &str, value: i32) -> Self {
        self.with_int(name, &[], vec![value])
    }

    /// Add a file-level text attribute.
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    /// Check that every variable holds exactly as many values as its shape.
    pub fn validate(&self) -> FormatResult<()> {
        for (name, var) in &self.variables {
            let expected: usize = var.extents().iter().product();
            if var.data.len() != expected {
                return Err(FormatError::InvalidFormat(format!(
                    "variable '{}' has shape {:?} but {} values",
                    name,
                    var.shape,
                    var.data.len()
                )));
            }
        }
        Ok(())
    }

    pub fn from_json_str(text: &str) -> FormatResult<Self> {
        let dataset: Self = serde_json::from_str(text)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> FormatResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> FormatResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// [`DataFormat`] backed by a [`MemoryDataset`].
#[derive(Debug, Clone)]
pub struct MemoryFormat {
    dataset: MemoryDataset,
    load_json: bool,
    open_path: Option<PathBuf>,
    origin: Vec<usize>,
}

impl MemoryFormat {
    /// Serve `dataset` for whatever path is opened.
    pub fn from_dataset(dataset: MemoryDataset) -> Self {
        Self {
            dataset,
            load_json: false,
            open_path: None,
            origin: Vec::new(),
        }
    }

    /// Load a JSON dataset from the path passed to `open_read`.
    pub fn json() -> Self {
        Self {
            dataset: MemoryDataset::default(),
            load_json: true,
            open_path: None,
            origin: Vec::new(),
        }
    }

    pub fn dataset(&self) -> &MemoryDataset {
        &self.dataset
    }

    fn variable(&self, name: &str) -> FormatResult<&MemoryVariable> {
        if !self.is_valid() {
            return Err(FormatError::NotOpen);
        }
        self.dataset
            .variables
            .get(name)
            .ok_or_else(|| FormatError::MissingData(format!("variable {}", name)))
    }

    fn gather<T: Copy>(
        &self,
        name: &str,
        dest: &mut [T],
        counts: &[usize],
        convert_int: impl Fn(i32) -> T,
        convert_real: impl Fn(f64) -> T,
    ) -> FormatResult<()> {
        let var = self.variable(name)?;
        let indices = hyperslab_indices(name, &var.extents(), &self.origin, counts)?;
        if indices.len() != dest.len() {
            return Err(FormatError::shape_mismatch(
                name,
                format!("buffer holds {} values, hyperslab has {}", dest.len(), indices.len()),
            ));
        }

        match &var.data {
            VariableData::Int(values) => {
                for (d, &i) in dest.iter_mut().zip(&indices) {
                    *d = convert_int(*values.get(i).ok_or_else(|| short_data(name))?);
                }
            }
            VariableData::Real(values) => {
                for (d, &i) in dest.iter_mut().zip(&indices) {
                    *d = convert_real(*values.get(i).ok_or_else(|| short_data(name))?);
                }
            }
        }
        Ok(())
    }
}

fn short_data(name: &str) -> FormatError {
    FormatError::InvalidFormat(format!("variable '{}' holds fewer values than its shape", name))
}

impl DataFormat for MemoryFormat {
    fn open_read(&mut self, path: &Path) -> FormatResult<()> {
        if self.load_json {
            self.dataset = MemoryDataset::from_json_file(path).map_err(|e| {
                FormatError::OpenFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
        }
        debug!(path = %path.display(), variables = self.dataset.variables.len(), "Opened dataset");
        self.open_path = Some(path.to_path_buf());
        self.origin.clear();
        Ok(())
    }

    fn close(&mut self) {
        if let Some(path) = self.open_path.take() {
            debug!(path = %path.display(), "Closed dataset");
        }
    }

    fn is_valid(&self) -> bool {
        self.open_path.is_some()
    }

    fn size(&self, name: &str) -> Vec<usize> {
        self.variable(name)
            .map(MemoryVariable::extents)
            .unwrap_or_default()
    }

    fn read_f64(&self, dest: &mut [f64], name: &str, counts: &[usize]) -> FormatResult<()> {
        self.gather(name, dest, counts, f64::from, |v| v)
    }

    fn read_i32(&self, dest: &mut [i32], name: &str, counts: &[usize]) -> FormatResult<()> {
        self.gather(name, dest, counts, |v| v, |v| v.round() as i32)
    }

    fn origin(&self) -> &[usize] {
        &self.origin
    }

    fn set_origin(&mut self, origin: &[usize]) {
        self.origin = origin.to_vec();
    }

    fn global_attribute(&self, name: &str) -> Option<String> {
        if !self.is_valid() {
            return None;
        }
        self.dataset.attributes.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::OriginGuard;

    fn open(dataset: MemoryDataset) -> MemoryFormat {
        let mut format = MemoryFormat::from_dataset(dataset);
        format.open_read(Path::new("memory.nc")).unwrap();
        format
    }

    #[test]
    fn test_closed_format_reports_nothing() {
        let format = MemoryFormat::from_dataset(MemoryDataset::new().with_scalar_int("n", 3));
        assert!(!format.is_valid());
        assert!(format.size("n").is_empty());
        let mut v = [0i32];
        assert!(matches!(
            format.read_i32(&mut v, "n", &[1]),
            Err(FormatError::NotOpen)
        ));
    }

    #[test]
    fn test_scalar_size_and_read() {
        let format = open(MemoryDataset::new().with_scalar_real("zlength", 6.5));
        assert_eq!(format.size("zlength"), vec![1]);
        let mut v = [0.0];
        format.read_f64(&mut v, "zlength", &[1]).unwrap();
        assert_eq!(v[0], 6.5);
    }

    #[test]
    fn test_int_to_real_conversion() {
        let format = open(MemoryDataset::new().with_int("ix", &[3], vec![1, 2, 3]));
        let mut v = [0.0; 3];
        format.read_f64(&mut v, "ix", &[3]).unwrap();
        assert_eq!(v, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_origin_guard_restores() {
        let values: Vec<f64> = (0..12).map(f64::from).collect();
        let mut format = open(MemoryDataset::new().with_real("v", &[3, 4], values));
        {
            let cursor = OriginGuard::new(&mut format, &[2, 1]);
            let mut v = [0.0; 2];
            cursor.read_f64(&mut v, "v", &[1, 2]).unwrap();
            assert_eq!(v, [9.0, 10.0]);
        }
        assert!(format.origin().is_empty());
    }

    #[test]
    fn test_buffer_length_checked() {
        let format = open(MemoryDataset::new().with_real("v", &[4], vec![0.0; 4]));
        let mut v = [0.0; 3];
        let err = format.read_f64(&mut v, "v", &[4]).unwrap_err();
        assert!(matches!(err, FormatError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_validate_rejects_short_data() {
        let dataset = MemoryDataset::new().with_real("v", &[2, 2], vec![1.0]);
        assert!(dataset.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let dataset = MemoryDataset::new()
            .with_attribute("title", "grid")
            .with_scalar_int("ny_inner", 4)
            .with_real("dx", &[2, 2], vec![0.5; 4]);
        let text = dataset.to_json_string().unwrap();
        assert_eq!(MemoryDataset::from_json_str(&text).unwrap(), dataset);
    }
}
