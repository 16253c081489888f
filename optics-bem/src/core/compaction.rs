//! Active-element compaction
//!
//! The boundary-element solve only sees elements whose group carries a boundary condition.
//! Compaction drops every other element while keeping the relative order of the rest, so
//! the new index of an active element `i` is `i` minus the number of inactive elements
//! before it. The old-to-new table is built once over the whole element list and then
//! shared by every group, which keeps elements that were adjacent in the mesh adjacent
//! after compaction regardless of which group they belong to.

use std::collections::BTreeMap;

use ndarray::{Array3, s};

use crate::core::excitation::Excitation;

/// Old element index to compacted index, `None` for inactive elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemap {
    table: Vec<Option<usize>>,
    num_active: usize,
}

impl IndexRemap {
    /// Build the table from per-element inactive flags
    pub fn from_inactive(inactive: &[bool]) -> Self {
        let mut table = Vec::with_capacity(inactive.len());
        let mut inactive_before = 0;
        for (i, &is_inactive) in inactive.iter().enumerate() {
            if is_inactive {
                inactive_before += 1;
                table.push(None);
            } else {
                table.push(Some(i - inactive_before));
            }
        }
        let num_active = inactive.len() - inactive_before;
        Self { table, num_active }
    }

    /// Compacted index of original element `index`
    pub fn get(&self, index: usize) -> Option<usize> {
        self.table.get(index).copied().flatten()
    }

    /// Number of elements in the original list
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if the original list was empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of active elements
    pub fn num_active(&self) -> usize {
        self.num_active
    }

    /// Original indices of active elements, in order
    pub fn active_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.table
            .iter()
            .enumerate()
            .filter_map(|(i, new)| new.map(|_| i))
    }
}

/// Active elements handed to the boundary-element solver
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveElements {
    /// Point coordinates of each active element (num_active × nodes_per_element × dimension)
    pub points: Array3<f64>,
    /// Compacted element indices per assigned group
    pub names: BTreeMap<String, Vec<usize>>,
    /// Table from original to compacted element indices
    pub remap: IndexRemap,
}

impl ActiveElements {
    /// Number of active elements
    pub fn num_active(&self) -> usize {
        self.points.shape()[0]
    }

    /// Compacted indices of a group, `None` if the group is not assigned
    pub fn indices(&self, name: &str) -> Option<&[usize]> {
        self.names.get(name).map(Vec::as_slice)
    }

    /// True if some compacted index is owned by more than one group
    ///
    /// This only happens when assigned groups share elements, which is a configuration
    /// error of the geometry.
    pub fn has_overlap(&self) -> bool {
        let total: usize = self.names.values().map(Vec::len).sum();
        let mut seen = vec![false; self.num_active()];
        let mut distinct = 0;
        for &i in self.names.values().flatten() {
            if !seen[i] {
                seen[i] = true;
                distinct += 1;
            }
        }
        distinct != total
    }
}

impl Excitation<'_> {
    /// Compact the element list to the elements of assigned groups
    ///
    /// Recomputed on every call; the registry is not modified.
    pub fn compact(&self) -> ActiveElements {
        let geometry = self.geometry();
        let num_elements = geometry.num_elements();

        let mut inactive = vec![true; num_elements];
        for name in self.assigned_names() {
            for &i in geometry.group(name).unwrap_or_default() {
                inactive[i] = false;
            }
        }

        let remap = IndexRemap::from_inactive(&inactive);

        // Every element of an assigned group was marked active above
        let names: BTreeMap<String, Vec<usize>> = self
            .assigned_names()
            .map(|name| {
                let indices = geometry
                    .group(name)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|&i| remap.get(i))
                    .collect();
                (name.to_string(), indices)
            })
            .collect();

        let nodes = geometry.nodes_per_element();
        let dim = geometry.dimension();
        let elements = geometry.elements();
        let all_points = geometry.points();
        let mut points = Array3::zeros((remap.num_active(), nodes, dim));
        for (new, old) in remap.active_indices().enumerate() {
            for (node, &p) in elements.row(old).iter().enumerate() {
                points
                    .slice_mut(s![new, node, ..])
                    .assign(&all_points.row(p));
            }
        }

        let result = ActiveElements {
            points,
            names,
            remap,
        };

        log::debug!(
            "Compaction: {} of {} elements active in {} groups",
            result.num_active(),
            num_elements,
            result.names.len()
        );
        if result.has_overlap() {
            log::warn!(
                "Assigned groups share elements: {} group entries for {} active elements",
                self.active_element_count(),
                result.num_active()
            );
        }

        result
    }
}
