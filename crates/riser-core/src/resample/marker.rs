//! Markers and marker chains.

use riser_math::PdfTable;

use super::ResampleError;

/// A dated, offset geomorphic marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    name: String,
    age: PdfTable,
    displacement: PdfTable,
}

impl Marker {
    pub fn new(name: impl Into<String>, age: PdfTable, displacement: PdfTable) -> Self {
        Self {
            name: name.into(),
            age,
            displacement,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> &PdfTable {
        &self.age
    }

    pub fn displacement(&self) -> &PdfTable {
        &self.displacement
    }
}

/// Markers ordered youngest to oldest; at least two.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerChain {
    markers: Vec<Marker>,
}

impl MarkerChain {
    pub fn new(markers: Vec<Marker>) -> Result<Self, ResampleError> {
        if markers.len() < 2 {
            return Err(ResampleError::TooFewMarkers {
                count: markers.len(),
            });
        }
        Ok(Self { markers })
    }

    /// Build from parallel age and displacement lists, naming markers by
    /// position (`M1`, `M2`, ...).
    pub fn from_lists(
        ages: Vec<PdfTable>,
        displacements: Vec<PdfTable>,
    ) -> Result<Self, ResampleError> {
        if ages.len() != displacements.len() {
            return Err(ResampleError::MismatchedLists {
                ages: ages.len(),
                displacements: displacements.len(),
            });
        }
        let markers = ages
            .into_iter()
            .zip(displacements)
            .enumerate()
            .map(|(i, (age, displacement))| Marker::new(format!("M{}", i + 1), age, displacement))
            .collect();
        Self::new(markers)
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Always false; a chain holds at least two markers.
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Number of intervals between adjacent markers.
    pub fn interval_count(&self) -> usize {
        self.markers.len() - 1
    }

    /// `"younger-older"` label for each interval.
    pub fn interval_labels(&self) -> Vec<String> {
        self.markers
            .windows(2)
            .map(|pair| format!("{}-{}", pair[0].name, pair[1].name))
            .collect()
    }
}
