//! Coordinates and coordinate types.

/// The coordinate type of a geometry: which axes its coordinates carry.
///
/// Every coordinate has X and Y; Z (elevation) and M (measure) are optional
/// and declared per geometry, not per coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordType {
    /// X and Y only.
    #[default]
    Xy,
    /// X, Y and Z.
    Xyz,
    /// X, Y and M.
    Xym,
    /// X, Y, Z and M.
    Xyzm,
}

impl CoordType {
    /// Returns `true` if coordinates of this type carry a Z member.
    #[must_use]
    pub const fn has_z(self) -> bool {
        matches!(self, Self::Xyz | Self::Xyzm)
    }

    /// Returns `true` if coordinates of this type carry an M member.
    #[must_use]
    pub const fn has_m(self) -> bool {
        matches!(self, Self::Xym | Self::Xyzm)
    }

    /// Builds a coordinate type from Z/M presence flags.
    #[must_use]
    pub const fn from_zm(has_z: bool, has_m: bool) -> Self {
        match (has_z, has_m) {
            (false, false) => Self::Xy,
            (true, false) => Self::Xyz,
            (false, true) => Self::Xym,
            (true, true) => Self::Xyzm,
        }
    }

    /// Number of axes per coordinate (2, 3 or 4).
    #[must_use]
    pub const fn axis_count(self) -> usize {
        match self {
            Self::Xy => 2,
            Self::Xyz | Self::Xym => 3,
            Self::Xyzm => 4,
        }
    }
}

/// A single position.
///
/// `z` and `m` are populated according to the owning geometry's
/// [`CoordType`]; a coordinate inside an XY geometry simply leaves them
/// `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub m: Option<f64>,
}

impl Coord {
    /// Creates an XY coordinate.
    #[must_use]
    pub const fn xy(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Creates an XYZ coordinate.
    #[must_use]
    pub const fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    /// Creates an XYM coordinate.
    #[must_use]
    pub const fn xym(x: f64, y: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: Some(m),
        }
    }

    /// Creates an XYZM coordinate.
    #[must_use]
    pub const fn xyzm(x: f64, y: f64, z: f64, m: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: Some(m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coord_type_zm_flags() {
        assert!(!CoordType::Xy.has_z());
        assert!(!CoordType::Xy.has_m());
        assert!(CoordType::Xyz.has_z());
        assert!(!CoordType::Xyz.has_m());
        assert!(!CoordType::Xym.has_z());
        assert!(CoordType::Xym.has_m());
        assert!(CoordType::Xyzm.has_z());
        assert!(CoordType::Xyzm.has_m());
    }

    #[test]
    fn coord_type_from_zm_roundtrip() {
        for ct in [CoordType::Xy, CoordType::Xyz, CoordType::Xym, CoordType::Xyzm] {
            assert_eq!(CoordType::from_zm(ct.has_z(), ct.has_m()), ct);
        }
    }

    #[test]
    fn coord_type_axis_count() {
        assert_eq!(CoordType::Xy.axis_count(), 2);
        assert_eq!(CoordType::Xyz.axis_count(), 3);
        assert_eq!(CoordType::Xym.axis_count(), 3);
        assert_eq!(CoordType::Xyzm.axis_count(), 4);
    }

    #[test]
    fn coord_constructors() {
        let c = Coord::xyzm(1.0, 2.0, 3.0, 4.0);
        assert_eq!(c.x, 1.0);
        assert_eq!(c.y, 2.0);
        assert_eq!(c.z, Some(3.0));
        assert_eq!(c.m, Some(4.0));

        let c = Coord::xym(1.0, 2.0, 4.0);
        assert_eq!(c.z, None);
        assert_eq!(c.m, Some(4.0));
    }

    #[test]
    fn coord_default_is_origin() {
        let c = Coord::default();
        assert_eq!(c, Coord::xy(0.0, 0.0));
    }
}
