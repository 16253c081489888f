//! Excitation registry
//!
//! Assigns a boundary condition to named element groups of a [`Geometry`]. Each group is
//! either unassigned or carries exactly one [`ExcitationKind`]; only assigned groups take
//! part in the boundary-element solve (see [`Excitation::compact`]).
//!
//! Assigning a group that already has a kind replaces it (last write wins) and logs a
//! warning. Every `add_*` call validates all of its names and values before touching the
//! table, so a rejected call leaves the registry unchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::core::error::{ExcitationError, Result};
use crate::core::types::Geometry;

// ============================================================================
// Boundary values
// ============================================================================

/// Position-dependent voltage, evaluated at a mesh point
#[derive(Clone)]
pub struct VoltageFn(Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>);

impl VoltageFn {
    /// Wrap a closure
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Evaluate at `point`
    pub fn eval(&self, point: &[f64]) -> f64 {
        (self.0)(point)
    }
}

impl fmt::Debug for VoltageFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VoltageFn(..)")
    }
}

/// A voltage boundary value: constant or position dependent
#[derive(Debug, Clone)]
pub enum Voltage {
    /// Constant potential
    Fixed(f64),
    /// Potential as a function of position
    Function(VoltageFn),
}

impl Voltage {
    /// Position-dependent voltage from a closure
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Voltage::Function(VoltageFn::new(f))
    }
}

impl From<f64> for Voltage {
    fn from(value: f64) -> Self {
        Voltage::Fixed(value)
    }
}

impl From<i32> for Voltage {
    fn from(value: i32) -> Self {
        Voltage::Fixed(value as f64)
    }
}

impl From<VoltageFn> for Voltage {
    fn from(f: VoltageFn) -> Self {
        Voltage::Function(f)
    }
}

/// Boundary condition carried by an electrode group
#[derive(Debug, Clone)]
pub enum ExcitationKind {
    /// Electrode held at a constant potential
    FixedVoltage(f64),
    /// Electrode with a position-dependent potential
    VoltageFunction(VoltageFn),
    /// Dielectric interface with the given relative permittivity
    Dielectric(f64),
    /// Isolated conductor carrying a fixed total charge
    FloatingConductor(f64),
}

impl ExcitationKind {
    /// Numeric tag of the kind (1 fixed voltage, 2 voltage function, 3 dielectric,
    /// 4 floating conductor)
    pub fn kind_index(&self) -> u8 {
        match self {
            ExcitationKind::FixedVoltage(_) => 1,
            ExcitationKind::VoltageFunction(_) => 2,
            ExcitationKind::Dielectric(_) => 3,
            ExcitationKind::FloatingConductor(_) => 4,
        }
    }

    /// Returns true for the two voltage kinds
    pub fn is_voltage(&self) -> bool {
        matches!(
            self,
            ExcitationKind::FixedVoltage(_) | ExcitationKind::VoltageFunction(_)
        )
    }

    /// Potential at `point` for voltage kinds, `None` otherwise
    pub fn voltage_at(&self, point: &[f64]) -> Option<f64> {
        match self {
            ExcitationKind::FixedVoltage(v) => Some(*v),
            ExcitationKind::VoltageFunction(f) => Some(f.eval(point)),
            _ => None,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        match self {
            ExcitationKind::FixedVoltage(v) if !v.is_finite() => {
                Err(ExcitationError::unsupported(name, format!("voltage {} is not finite", v)))
            }
            ExcitationKind::Dielectric(k) if !(k.is_finite() && *k > 0.0) => {
                Err(ExcitationError::unsupported(
                    name,
                    format!("relative permittivity {} must be finite and > 0", k),
                ))
            }
            ExcitationKind::FloatingConductor(q) if !q.is_finite() => {
                Err(ExcitationError::unsupported(name, format!("charge {} is not finite", q)))
            }
            _ => Ok(()),
        }
    }
}

impl From<Voltage> for ExcitationKind {
    fn from(voltage: Voltage) -> Self {
        match voltage {
            Voltage::Fixed(v) => ExcitationKind::FixedVoltage(v),
            Voltage::Function(f) => ExcitationKind::VoltageFunction(f),
        }
    }
}

/// Assignment state of one electrode group
#[derive(Debug, Clone, Default)]
pub enum GroupState {
    /// No boundary condition yet; the group's elements are inactive
    #[default]
    Unassigned,
    /// Boundary condition assigned
    Assigned(ExcitationKind),
}

impl GroupState {
    /// The assigned kind, if any
    pub fn kind(&self) -> Option<&ExcitationKind> {
        match self {
            GroupState::Unassigned => None,
            GroupState::Assigned(kind) => Some(kind),
        }
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Boundary conditions for the named groups of a geometry
#[derive(Debug, Clone)]
pub struct Excitation<'g> {
    geometry: &'g Geometry,
    states: BTreeMap<String, GroupState>,
}

impl<'g> Excitation<'g> {
    /// Create an empty registry over all groups of `geometry`
    pub fn new(geometry: &'g Geometry) -> Self {
        let states = geometry
            .electrode_names()
            .map(|name| (name.to_string(), GroupState::Unassigned))
            .collect();
        Self { geometry, states }
    }

    /// The geometry this registry refers to
    pub fn geometry(&self) -> &'g Geometry {
        self.geometry
    }

    /// All group names of the geometry, sorted
    pub fn electrodes(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    /// Assignment state of a group, `None` if the group does not exist
    pub fn state(&self, name: &str) -> Option<&GroupState> {
        self.states.get(name)
    }

    /// Assigned kind of a group
    pub fn excitation_kind(&self, name: &str) -> Option<&ExcitationKind> {
        self.states.get(name).and_then(GroupState::kind)
    }

    /// True if the group has a boundary condition
    pub fn is_assigned(&self, name: &str) -> bool {
        self.excitation_kind(name).is_some()
    }

    /// Names of assigned groups, sorted
    pub fn assigned_names(&self) -> impl Iterator<Item = &str> {
        self.assigned().map(|(name, _)| name)
    }

    /// Assigned groups with their kinds, sorted by name
    pub fn assigned(&self) -> impl Iterator<Item = (&str, &ExcitationKind)> {
        self.states
            .iter()
            .filter_map(|(name, state)| state.kind().map(|kind| (name.as_str(), kind)))
    }

    /// Assign the same kind to every name in `names`
    ///
    /// Fails with [`ExcitationError::UnknownGroup`] if any name is not a group of the
    /// geometry, and with [`ExcitationError::UnsupportedValue`] if the value is invalid for
    /// its kind. Nothing is recorded on failure.
    pub fn assign<S: AsRef<str>>(&mut self, kind: ExcitationKind, names: &[S]) -> Result<()> {
        for name in names {
            let name = name.as_ref();
            self.check_known(name)?;
            kind.validate(name)?;
        }
        for name in names {
            self.record(name.as_ref(), kind.clone());
        }
        Ok(())
    }

    /// Assign voltages, constant or position dependent
    ///
    /// ```ignore
    /// exc.add_voltage([("inner", Voltage::from(5.0 / 3.0)), ("outer", Voltage::from(0.6))])?;
    /// exc.add_voltage([("deflector", Voltage::function(|p| 10.0 * p[0]))])?;
    /// ```
    pub fn add_voltage<I, S, V>(&mut self, voltages: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, V)>,
        S: AsRef<str>,
        V: Into<Voltage>,
    {
        self.add_kinds(
            voltages
                .into_iter()
                .map(|(name, v)| (name, ExcitationKind::from(v.into()))),
        )
    }

    /// Assign dielectric groups with their relative permittivity
    pub fn add_dielectric<I, S>(&mut self, permittivities: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        self.add_kinds(
            permittivities
                .into_iter()
                .map(|(name, k)| (name, ExcitationKind::Dielectric(k))),
        )
    }

    /// Assign floating conductors with their total charge
    pub fn add_floating_conductor<I, S>(&mut self, charges: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        self.add_kinds(
            charges
                .into_iter()
                .map(|(name, q)| (name, ExcitationKind::FloatingConductor(q))),
        )
    }

    /// Total number of elements belonging to assigned groups
    ///
    /// Equals the active element count of [`Excitation::compact`] when assigned groups are
    /// disjoint; overlapping elements are counted once per group.
    pub fn active_element_count(&self) -> usize {
        self.assigned_names()
            .map(|name| self.geometry.group(name).map_or(0, <[usize]>::len))
            .sum()
    }

    fn add_kinds<I, S>(&mut self, pairs: I) -> Result<()>
    where
        I: IntoIterator<Item = (S, ExcitationKind)>,
        S: AsRef<str>,
    {
        let pairs: Vec<(S, ExcitationKind)> = pairs.into_iter().collect();
        for (name, kind) in &pairs {
            self.check_known(name.as_ref())?;
            kind.validate(name.as_ref())?;
        }
        for (name, kind) in pairs {
            self.record(name.as_ref(), kind);
        }
        Ok(())
    }

    fn check_known(&self, name: &str) -> Result<()> {
        if self.states.contains_key(name) {
            Ok(())
        } else {
            Err(ExcitationError::UnknownGroup {
                name: name.to_string(),
            })
        }
    }

    fn record(&mut self, name: &str, kind: ExcitationKind) {
        if let Some(state) = self.states.get_mut(name) {
            if let GroupState::Assigned(previous) = state {
                log::warn!(
                    "Reassigning '{}': kind {} replaced by kind {}",
                    name,
                    previous.kind_index(),
                    kind.kind_index()
                );
            }
            *state = GroupState::Assigned(kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Symmetry;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn geometry() -> Geometry {
        let points = array![[0.0, -1.0], [1.0, 0.0], [0.0, 1.0], [0.0, 2.0], [2.0, 0.0]];
        let lines = [[0, 1], [1, 2], [2, 3], [3, 4]];
        let groups = BTreeMap::from([
            ("inner".to_string(), vec![0, 1]),
            ("outer".to_string(), vec![3]),
            ("dielectric".to_string(), vec![2]),
        ]);
        Geometry::with_lines(points, &lines, groups, Symmetry::Radial).unwrap()
    }

    #[test]
    fn test_new_registry_is_unassigned() {
        let geom = geometry();
        let exc = Excitation::new(&geom);
        assert_eq!(exc.electrodes().count(), 3);
        assert_eq!(exc.assigned_names().count(), 0);
        assert_eq!(exc.active_element_count(), 0);
        assert!(matches!(exc.state("inner"), Some(GroupState::Unassigned)));
        assert!(exc.state("lens").is_none());
    }

    #[test]
    fn test_add_voltage_fixed_and_function() {
        let geom = geometry();
        let mut exc = Excitation::new(&geom);
        exc.add_voltage([("inner", Voltage::from(1)), ("outer", Voltage::from(0.0))])
            .unwrap();
        exc.add_voltage([("dielectric", Voltage::function(|p: &[f64]| 2.0 * p[1]))])
            .unwrap();

        let inner = exc.excitation_kind("inner").unwrap();
        assert_eq!(inner.kind_index(), 1);
        assert_eq!(inner.voltage_at(&[0.0, 0.0]), Some(1.0));

        let fun = exc.excitation_kind("dielectric").unwrap();
        assert_eq!(fun.kind_index(), 2);
        assert_relative_eq!(fun.voltage_at(&[0.0, 1.5]).unwrap(), 3.0);
        assert_eq!(exc.active_element_count(), 4);
    }

    #[test]
    fn test_add_dielectric_and_floating() {
        let geom = geometry();
        let mut exc = Excitation::new(&geom);
        exc.add_dielectric([("dielectric", 2.0)]).unwrap();
        exc.add_floating_conductor([("outer", -1e-3)]).unwrap();

        assert!(matches!(
            exc.excitation_kind("dielectric"),
            Some(ExcitationKind::Dielectric(k)) if *k == 2.0
        ));
        assert_eq!(exc.excitation_kind("outer").unwrap().kind_index(), 4);
        assert!(exc.excitation_kind("outer").unwrap().voltage_at(&[0.0, 0.0]).is_none());
        assert_eq!(exc.assigned_names().collect::<Vec<_>>(), vec!["dielectric", "outer"]);
    }

    #[test]
    fn test_unknown_group_leaves_table_unchanged() {
        let geom = geometry();
        let mut exc = Excitation::new(&geom);
        exc.add_voltage([("inner", 1.0)]).unwrap();

        let err = exc
            .add_voltage([("outer", 5.0), ("nonexistent", 1.0)])
            .unwrap_err();
        assert!(matches!(err, ExcitationError::UnknownGroup { ref name } if name == "nonexistent"));
        assert!(!exc.is_assigned("outer"));
        assert_eq!(exc.assigned_names().collect::<Vec<_>>(), vec!["inner"]);

        let err = exc
            .assign(ExcitationKind::FixedVoltage(0.0), &["nonexistent"])
            .unwrap_err();
        assert!(err.is_assignment_error());
        assert_eq!(exc.assigned_names().count(), 1);
    }

    #[test]
    fn test_unsupported_values() {
        let geom = geometry();
        let mut exc = Excitation::new(&geom);

        let err = exc.add_voltage([("inner", f64::NAN)]).unwrap_err();
        assert!(matches!(err, ExcitationError::UnsupportedValue { .. }));
        assert!(exc.add_dielectric([("dielectric", 0.0)]).is_err());
        assert!(exc.add_dielectric([("dielectric", -2.0)]).is_err());
        assert!(exc.add_floating_conductor([("outer", f64::INFINITY)]).is_err());
        assert_eq!(exc.assigned_names().count(), 0);
    }

    #[test]
    fn test_assign_many_names() {
        let geom = geometry();
        let mut exc = Excitation::new(&geom);
        exc.assign(ExcitationKind::FixedVoltage(0.0), &["inner", "outer"])
            .unwrap();
        assert!(exc.is_assigned("inner"));
        assert!(exc.is_assigned("outer"));
        assert_eq!(exc.active_element_count(), 3);
    }

    #[test]
    fn test_last_write_wins() {
        let geom = geometry();
        let mut exc = Excitation::new(&geom);
        exc.add_voltage([("inner", 1.0)]).unwrap();
        exc.add_dielectric([("inner", 4.0)]).unwrap();

        assert_eq!(exc.excitation_kind("inner").unwrap().kind_index(), 3);
        assert_eq!(exc.active_element_count(), 2);
    }
}
