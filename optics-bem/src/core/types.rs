//! Core type definitions for the excitation layer
//!
//! This module defines the meshed geometry consumed by the excitation registry: point
//! coordinates, boundary-element connectivity, named element groups and the symmetry tag.
//! Mesh generation is done elsewhere; a `Geometry` is only validated and read here.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::core::error::{ExcitationError, Result};

// ============================================================================
// Symmetry
// ============================================================================

/// Symmetry of the simulated system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symmetry {
    /// Axially symmetric, meshed in the (r, z) meridian plane with line elements
    Radial,
    /// Full 3D geometry
    ThreeD,
    /// Full 3D geometry with higher-order element treatment
    ThreeDHigherOrder,
}

impl Symmetry {
    /// Number of coordinates per mesh point
    pub fn dimension(&self) -> usize {
        match self {
            Symmetry::Radial => 2,
            Symmetry::ThreeD | Symmetry::ThreeDHigherOrder => 3,
        }
    }

    /// True for the fully three-dimensional variants
    pub fn is_3d(&self) -> bool {
        !matches!(self, Symmetry::Radial)
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// Meshed geometry with named element groups
///
/// Every element index in a group refers to a row of `elements`, and every point index in
/// `elements` refers to a row of `points`. Both are checked by [`Geometry::new`].
/// Groups are expected to be disjoint, but that is not enforced here.
#[derive(Debug, Clone)]
pub struct Geometry {
    points: Array2<f64>,
    elements: Array2<usize>,
    groups: BTreeMap<String, Vec<usize>>,
    symmetry: Symmetry,
}

impl Geometry {
    /// Create a validated geometry
    ///
    /// # Arguments
    /// * `points` - Point coordinates (num_points × dimension)
    /// * `elements` - Element connectivity (num_elements × nodes_per_element)
    /// * `groups` - Element indices per group name
    /// * `symmetry` - Symmetry tag, fixes the expected point dimension
    pub fn new(
        points: Array2<f64>,
        elements: Array2<usize>,
        groups: BTreeMap<String, Vec<usize>>,
        symmetry: Symmetry,
    ) -> Result<Self> {
        if points.ncols() != symmetry.dimension() {
            return Err(ExcitationError::InvalidGeometry(format!(
                "{:?} symmetry needs {} coordinates per point, got {}",
                symmetry,
                symmetry.dimension(),
                points.ncols()
            )));
        }
        if elements.nrows() > 0 && elements.ncols() == 0 {
            return Err(ExcitationError::InvalidGeometry(
                "elements have no nodes".to_string(),
            ));
        }
        if let Some(&bad) = elements.iter().find(|&&p| p >= points.nrows()) {
            return Err(ExcitationError::InvalidGeometry(format!(
                "element references point {} but only {} points exist",
                bad,
                points.nrows()
            )));
        }
        for (name, indices) in &groups {
            if let Some(&bad) = indices.iter().find(|&&e| e >= elements.nrows()) {
                return Err(ExcitationError::InvalidGeometry(format!(
                    "group '{}' references element {} but only {} elements exist",
                    name,
                    bad,
                    elements.nrows()
                )));
            }
        }

        log::debug!(
            "Geometry: {} points, {} elements, {} groups ({:?})",
            points.nrows(),
            elements.nrows(),
            groups.len(),
            symmetry
        );

        Ok(Self {
            points,
            elements,
            groups,
            symmetry,
        })
    }

    /// Create a geometry made of two-node line elements
    pub fn with_lines(
        points: Array2<f64>,
        lines: &[[usize; 2]],
        groups: BTreeMap<String, Vec<usize>>,
        symmetry: Symmetry,
    ) -> Result<Self> {
        let mut elements = Array2::zeros((lines.len(), 2));
        for (i, line) in lines.iter().enumerate() {
            elements[[i, 0]] = line[0];
            elements[[i, 1]] = line[1];
        }
        Self::new(points, elements, groups, symmetry)
    }

    /// Point coordinates (num_points × dimension)
    pub fn points(&self) -> ArrayView2<'_, f64> {
        self.points.view()
    }

    /// Element connectivity (num_elements × nodes_per_element)
    pub fn elements(&self) -> ArrayView2<'_, usize> {
        self.elements.view()
    }

    /// Point indices of a single element
    pub fn element(&self, index: usize) -> ArrayView1<'_, usize> {
        self.elements.row(index)
    }

    /// Symmetry tag
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Coordinates per point
    pub fn dimension(&self) -> usize {
        self.points.ncols()
    }

    /// Total number of points
    pub fn num_points(&self) -> usize {
        self.points.nrows()
    }

    /// Total number of elements
    pub fn num_elements(&self) -> usize {
        self.elements.nrows()
    }

    /// Nodes per element (2 for line elements)
    pub fn nodes_per_element(&self) -> usize {
        self.elements.ncols()
    }

    /// Group names, sorted
    pub fn electrode_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Element indices of a named group
    pub fn group(&self, name: &str) -> Option<&[usize]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// True if `name` is a group of this geometry
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Coordinates of the points of one element (nodes_per_element × dimension)
    pub fn element_points(&self, index: usize) -> Array2<f64> {
        let row = self.elements.row(index);
        let mut coords = Array2::zeros((row.len(), self.dimension()));
        for (i, &p) in row.iter().enumerate() {
            coords.row_mut(i).assign(&self.points.row(p));
        }
        coords
    }
}
