//! Envelopes: axis-aligned bounds of a geometry.

use crate::coord::Coord;
use crate::geometry::Geometry;

/// A closed interval on a single axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Widens the interval to contain `value`.
    pub fn expand(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }
}

/// An axis-aligned XY rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    #[must_use]
    pub const fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Widens the envelope to contain the XY position of `coord`.
    pub fn expand(&mut self, coord: Coord) {
        self.min_x = self.min_x.min(coord.x);
        self.min_y = self.min_y.min(coord.y);
        self.max_x = self.max_x.max(coord.x);
        self.max_y = self.max_y.max(coord.y);
    }
}

/// An XY envelope extended with optional Z and M ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendedEnvelope {
    pub xy: Envelope,
    pub z: Option<Interval>,
    pub m: Option<Interval>,
}

impl Geometry {
    /// Computes the bounds of this geometry, or `None` if it is empty.
    ///
    /// Z and M ranges are present iff the coordinate type carries those axes.
    #[must_use]
    pub fn envelope(&self) -> Option<ExtendedEnvelope> {
        let ct = self.coordinate_type();
        let mut env: Option<ExtendedEnvelope> = None;
        self.for_each_coord(&mut |c| {
            let env = env.get_or_insert_with(|| ExtendedEnvelope {
                xy: Envelope::new(c.x, c.y, c.x, c.y),
                z: c.z.filter(|_| ct.has_z()).map(|z| Interval::new(z, z)),
                m: c.m.filter(|_| ct.has_m()).map(|m| Interval::new(m, m)),
            });
            env.xy.expand(c);
            if let (Some(range), Some(z)) = (&mut env.z, c.z) {
                range.expand(z);
            }
            if let (Some(range), Some(m)) = (&mut env.m, c.m) {
                range.expand(m);
            }
        });
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::CoordType;
    use crate::geometry::{LineString, MultiPoint, Point};

    #[test]
    fn empty_geometry_has_no_envelope() {
        let g = Geometry::Point(Point::empty(CoordType::Xy));
        assert_eq!(g.envelope(), None);
    }

    #[test]
    fn point_envelope_is_degenerate() {
        let g = Geometry::Point(Point::new(Coord::xy(3.0, -2.0), CoordType::Xy));
        let env = g.envelope().unwrap();
        assert_eq!(env.xy, Envelope::new(3.0, -2.0, 3.0, -2.0));
        assert_eq!(env.z, None);
        assert_eq!(env.m, None);
    }

    #[test]
    fn line_string_envelope() {
        let g = Geometry::LineString(LineString::new(
            vec![Coord::xy(1.0, 5.0), Coord::xy(-3.0, 2.0), Coord::xy(4.0, 4.0)],
            CoordType::Xy,
        ));
        let env = g.envelope().unwrap();
        assert_eq!(env.xy, Envelope::new(-3.0, 2.0, 4.0, 5.0));
    }

    #[test]
    fn zm_ranges_tracked() {
        let g = Geometry::MultiPoint(MultiPoint::new(
            vec![
                Point::new(Coord::xyzm(2.0, 3.0, 4.0, 5.0), CoordType::Xyzm),
                Point::new(Coord::xyzm(7.0, -2.0, 0.0, 1.0), CoordType::Xyzm),
            ],
            CoordType::Xyzm,
        ));
        let env = g.envelope().unwrap();
        assert_eq!(env.xy, Envelope::new(2.0, -2.0, 7.0, 3.0));
        assert_eq!(env.z, Some(Interval::new(0.0, 4.0)));
        assert_eq!(env.m, Some(Interval::new(1.0, 5.0)));
    }

    #[test]
    fn interval_expand() {
        let mut iv = Interval::new(1.0, 1.0);
        iv.expand(-2.0);
        iv.expand(3.0);
        assert_eq!(iv, Interval::new(-2.0, 3.0));
    }
}
