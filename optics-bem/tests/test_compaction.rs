//! Compaction Tests
//!
//! Checks the active-element set produced from a geometry and its excitations: index
//! ordering and coverage, element counts, rejection of unknown groups and idempotence.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use electron_optics_bem::{
    Excitation, ExcitationError, ExcitationKind, Geometry, Symmetry, Voltage,
};
use ndarray::{Array2, s};

/// Quarter-circle arcs of the concentric spheres validation case, meshed in (r, z)
///
/// Shells are meshed one after the other, so each group is a contiguous block of elements.
fn concentric_spheres(segments: usize) -> Geometry {
    let radii = [("inner", 0.5), ("dielectric", 0.6), ("dielectric", 0.9), ("outer", 1.0)];

    let mut points = Vec::new();
    let mut lines = Vec::new();
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();

    for (name, r) in radii {
        let first = points.len();
        for k in 0..=segments {
            let theta = -PI / 2.0 + PI * k as f64 / segments as f64;
            points.push([r * theta.cos(), r * theta.sin()]);
        }
        for k in 0..segments {
            groups
                .entry(name.to_string())
                .or_default()
                .push(lines.len());
            lines.push([first + k, first + k + 1]);
        }
    }

    let points = Array2::from_shape_fn((points.len(), 2), |(i, j)| points[i][j]);
    Geometry::with_lines(points, &lines, groups, Symmetry::Radial).unwrap()
}

/// Geometry whose groups interleave: element i belongs to group `i % 3`
fn interleaved(num_elements: usize) -> Geometry {
    let points = Array2::from_shape_fn((num_elements + 1, 2), |(i, j)| (i * (j + 1)) as f64);
    let lines: Vec<[usize; 2]> = (0..num_elements).map(|i| [i, i + 1]).collect();
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for i in 0..num_elements {
        groups.entry(format!("g{}", i % 3)).or_default().push(i);
    }
    Geometry::with_lines(points, &lines, groups, Symmetry::Radial).unwrap()
}

fn assert_order_and_coverage(exc: &Excitation) {
    let active = exc.compact();
    let n = active.num_active();

    let mut covered = vec![0usize; n];
    for (name, indices) in &active.names {
        assert!(
            indices.windows(2).all(|w| w[0] < w[1]),
            "indices of '{}' are not strictly increasing: {:?}",
            name,
            indices
        );
        for &i in indices {
            covered[i] += 1;
        }
    }
    assert!(covered.iter().all(|&c| c == 1), "coverage: {:?}", covered);
    assert_eq!(exc.active_element_count(), n);
}

#[test]
fn test_concentric_spheres_compaction() {
    let geom = concentric_spheres(8);
    let mut exc = Excitation::new(&geom);
    exc.add_voltage([("inner", 1.0)]).unwrap();
    exc.add_voltage([("outer", 0.0)]).unwrap();
    exc.add_dielectric([("dielectric", 2.0)]).unwrap();

    assert_eq!(exc.active_element_count(), 32);
    let active = exc.compact();
    assert_eq!(active.num_active(), 32);
    assert_eq!(active.points.shape(), &[32, 2, 2]);
    assert_eq!(active.indices("inner").unwrap(), (0..8).collect::<Vec<_>>());
    assert_eq!(active.indices("dielectric").unwrap(), (8..24).collect::<Vec<_>>());
    assert_eq!(active.indices("outer").unwrap(), (24..32).collect::<Vec<_>>());
    assert_order_and_coverage(&exc);
}

#[test]
fn test_unassigned_middle_group_is_dropped() {
    let geom = concentric_spheres(4);
    let mut exc = Excitation::new(&geom);
    exc.add_voltage([("inner", 1.0), ("outer", 0.0)]).unwrap();

    let active = exc.compact();
    assert_eq!(active.num_active(), 8);
    // Outer shell follows the inner one directly once the dielectric is removed
    assert_eq!(active.indices("outer").unwrap(), &[4, 5, 6, 7]);
    assert!(active.indices("dielectric").is_none());

    // First active element of the outer shell starts at (0, -1)
    assert_abs_diff_eq!(active.points[[4, 0, 0]], 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(active.points[[4, 0, 1]], -1.0, epsilon = 1e-12);

    // Same coordinates as the original element
    let original = geom.group("outer").unwrap()[0];
    assert_eq!(active.points.slice(s![4, .., ..]), geom.element_points(original));
    assert_eq!(active.remap.get(original), Some(4));
}

#[test]
fn test_interleaved_groups_preserve_order() {
    let geom = interleaved(30);

    let subsets: [&[&str]; 5] = [
        &["g0"],
        &["g1"],
        &["g0", "g2"],
        &["g1", "g2"],
        &["g0", "g1", "g2"],
    ];
    for subset in subsets {
        let mut exc = Excitation::new(&geom);
        exc.assign(ExcitationKind::FixedVoltage(0.0), subset).unwrap();
        assert_order_and_coverage(&exc);

        let expected: usize = subset.iter().map(|n| geom.group(n).unwrap().len()).sum();
        assert_eq!(exc.compact().num_active(), expected);
    }
}

#[test]
fn test_adjacent_groups_get_adjacent_indices() {
    let geom = interleaved(9);
    let mut exc = Excitation::new(&geom);
    exc.add_voltage([("g0", 1.0), ("g1", 2.0)]).unwrap();

    // Active originals: 0 1 3 4 6 7
    let active = exc.compact();
    assert_eq!(active.indices("g0").unwrap(), &[0, 2, 4]);
    assert_eq!(active.indices("g1").unwrap(), &[1, 3, 5]);
}

#[test]
fn test_unknown_group_rejected_without_side_effects() {
    let geom = concentric_spheres(2);
    let mut exc = Excitation::new(&geom);
    exc.add_voltage([("inner", 1.0)]).unwrap();
    let before = exc.compact();

    for kind in [
        ExcitationKind::FixedVoltage(1.0),
        ExcitationKind::Dielectric(2.0),
        ExcitationKind::FloatingConductor(0.0),
    ] {
        let err = exc.assign(kind, &["outer", "nonexistent"]).unwrap_err();
        assert!(matches!(err, ExcitationError::UnknownGroup { .. }));
    }
    assert!(!exc.is_assigned("outer"));
    assert_eq!(exc.compact(), before);
}

#[test]
fn test_compact_is_idempotent() {
    let geom = concentric_spheres(6);
    let mut exc = Excitation::new(&geom);
    exc.add_voltage([
        ("inner", Voltage::from(5.0 / 3.0)),
        ("outer", Voltage::function(|p: &[f64]| 0.6 + 0.01 * p[1])),
    ])
    .unwrap();

    let first = exc.compact();
    let second = exc.compact();
    assert_eq!(first, second);
}

#[test]
fn test_three_dimensional_triangles() {
    // Two triangles of a square in z = 0, one triangle lifted to z = 1
    let points = ndarray::array![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0]
    ];
    let elements = ndarray::array![[0, 1, 2], [0, 2, 3], [4, 5, 6]];
    let groups = BTreeMap::from([
        ("bottom".to_string(), vec![0, 1]),
        ("top".to_string(), vec![2]),
    ]);
    let geom = Geometry::new(points, elements, groups, Symmetry::ThreeD).unwrap();

    let mut exc = Excitation::new(&geom);
    exc.add_floating_conductor([("top", 1e-9)]).unwrap();

    let active = exc.compact();
    assert_eq!(active.points.shape(), &[1, 3, 3]);
    assert_eq!(active.indices("top").unwrap(), &[0]);
    let lifted: Vec<f64> = (0..3).map(|k| active.points[[0, 2, k]]).collect();
    assert_eq!(lifted, vec![1.0, 1.0, 1.0]);
}
