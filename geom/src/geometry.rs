//! The seven OGC geometry kinds and the `Geometry` sum type.

use std::fmt;

use crate::coord::{Coord, CoordType};

/// The seven OGC geometry categories.
///
/// The discriminants are the codes shared by the WKB-family wire formats
/// (including TWKB) and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GeometryKind {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryKind {
    /// Returns the wire code (1..=7).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parses a wire code; returns `None` for anything outside 1..=7.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Point),
            2 => Some(Self::LineString),
            3 => Some(Self::Polygon),
            4 => Some(Self::MultiPoint),
            5 => Some(Self::MultiLineString),
            6 => Some(Self::MultiPolygon),
            7 => Some(Self::GeometryCollection),
            _ => None,
        }
    }

    /// Returns `true` for the kinds holding multiple components (4..=7).
    #[must_use]
    pub const fn is_multi(self) -> bool {
        matches!(
            self,
            Self::MultiPoint | Self::MultiLineString | Self::MultiPolygon | Self::GeometryCollection
        )
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Point => "Point",
            Self::LineString => "LineString",
            Self::Polygon => "Polygon",
            Self::MultiPoint => "MultiPoint",
            Self::MultiLineString => "MultiLineString",
            Self::MultiPolygon => "MultiPolygon",
            Self::GeometryCollection => "GeometryCollection",
        };
        write!(f, "{name}")
    }
}

/// A point: zero or one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    coord: Option<Coord>,
    coord_type: CoordType,
}

impl Point {
    /// Creates a point at `coord`.
    #[must_use]
    pub const fn new(coord: Coord, coord_type: CoordType) -> Self {
        Self {
            coord: Some(coord),
            coord_type,
        }
    }

    /// Creates an empty point.
    #[must_use]
    pub const fn empty(coord_type: CoordType) -> Self {
        Self {
            coord: None,
            coord_type,
        }
    }

    #[must_use]
    pub const fn coord(&self) -> Option<Coord> {
        self.coord
    }

    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.coord.is_none()
    }
}

/// An ordered coordinate sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineString {
    coords: Vec<Coord>,
    coord_type: CoordType,
}

impl LineString {
    #[must_use]
    pub const fn new(coords: Vec<Coord>, coord_type: CoordType) -> Self {
        Self { coords, coord_type }
    }

    #[must_use]
    pub const fn empty(coord_type: CoordType) -> Self {
        Self {
            coords: Vec::new(),
            coord_type,
        }
    }

    #[must_use]
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Returns `true` if the first and last coordinates coincide.
    ///
    /// Empty and single-coordinate sequences count as closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.coords.first(), self.coords.last()) {
            (Some(first), Some(last)) => first == last,
            _ => true,
        }
    }
}

/// A polygon: a sequence of rings, the first exterior, the rest holes.
///
/// Rings are stored closed (first coordinate repeated as the last).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    rings: Vec<LineString>,
    coord_type: CoordType,
}

impl Polygon {
    #[must_use]
    pub const fn new(rings: Vec<LineString>, coord_type: CoordType) -> Self {
        Self { rings, coord_type }
    }

    #[must_use]
    pub const fn empty(coord_type: CoordType) -> Self {
        Self {
            rings: Vec::new(),
            coord_type,
        }
    }

    #[must_use]
    pub fn rings(&self) -> &[LineString] {
        &self.rings
    }

    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// An ordered sequence of points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPoint {
    points: Vec<Point>,
    coord_type: CoordType,
}

impl MultiPoint {
    #[must_use]
    pub const fn new(points: Vec<Point>, coord_type: CoordType) -> Self {
        Self { points, coord_type }
    }

    #[must_use]
    pub const fn empty(coord_type: CoordType) -> Self {
        Self {
            points: Vec::new(),
            coord_type,
        }
    }

    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    /// Returns `true` if every component point is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.iter().all(Point::is_empty)
    }
}

/// An ordered sequence of line strings.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiLineString {
    line_strings: Vec<LineString>,
    coord_type: CoordType,
}

impl MultiLineString {
    #[must_use]
    pub const fn new(line_strings: Vec<LineString>, coord_type: CoordType) -> Self {
        Self {
            line_strings,
            coord_type,
        }
    }

    #[must_use]
    pub const fn empty(coord_type: CoordType) -> Self {
        Self {
            line_strings: Vec::new(),
            coord_type,
        }
    }

    #[must_use]
    pub fn line_strings(&self) -> &[LineString] {
        &self.line_strings
    }

    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_strings.iter().all(LineString::is_empty)
    }
}

/// An ordered sequence of polygons.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon {
    polygons: Vec<Polygon>,
    coord_type: CoordType,
}

impl MultiPolygon {
    #[must_use]
    pub const fn new(polygons: Vec<Polygon>, coord_type: CoordType) -> Self {
        Self {
            polygons,
            coord_type,
        }
    }

    #[must_use]
    pub const fn empty(coord_type: CoordType) -> Self {
        Self {
            polygons: Vec::new(),
            coord_type,
        }
    }

    #[must_use]
    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(Polygon::is_empty)
    }
}

/// An ordered sequence of geometries of any kind, possibly mixed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeometryCollection {
    geometries: Vec<Geometry>,
    coord_type: CoordType,
}

impl GeometryCollection {
    #[must_use]
    pub const fn new(geometries: Vec<Geometry>, coord_type: CoordType) -> Self {
        Self {
            geometries,
            coord_type,
        }
    }

    #[must_use]
    pub const fn empty(coord_type: CoordType) -> Self {
        Self {
            geometries: Vec::new(),
            coord_type,
        }
    }

    #[must_use]
    pub fn geometries(&self) -> &[Geometry] {
        &self.geometries
    }

    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        self.coord_type
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometries.iter().all(Geometry::is_empty)
    }
}

/// A geometry of any of the seven kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

impl Geometry {
    /// Returns the kind tag of this geometry.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPoint(_) => GeometryKind::MultiPoint,
            Self::MultiLineString(_) => GeometryKind::MultiLineString,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Self::GeometryCollection(_) => GeometryKind::GeometryCollection,
        }
    }

    /// Returns the coordinate type of this geometry.
    #[must_use]
    pub const fn coordinate_type(&self) -> CoordType {
        match self {
            Self::Point(g) => g.coord_type(),
            Self::LineString(g) => g.coord_type(),
            Self::Polygon(g) => g.coord_type(),
            Self::MultiPoint(g) => g.coord_type(),
            Self::MultiLineString(g) => g.coord_type(),
            Self::MultiPolygon(g) => g.coord_type(),
            Self::GeometryCollection(g) => g.coord_type(),
        }
    }

    /// Returns `true` if this geometry contains no coordinates.
    ///
    /// Container kinds are empty when every component is empty, including the
    /// no-component case.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Point(g) => g.is_empty(),
            Self::LineString(g) => g.is_empty(),
            Self::Polygon(g) => g.is_empty(),
            Self::MultiPoint(g) => g.is_empty(),
            Self::MultiLineString(g) => g.is_empty(),
            Self::MultiPolygon(g) => g.is_empty(),
            Self::GeometryCollection(g) => g.is_empty(),
        }
    }

    /// Calls `f` for every coordinate of this geometry, in storage order.
    pub fn for_each_coord<F: FnMut(Coord)>(&self, f: &mut F) {
        match self {
            Self::Point(g) => {
                if let Some(c) = g.coord() {
                    f(c);
                }
            }
            Self::LineString(g) => {
                for &c in g.coords() {
                    f(c);
                }
            }
            Self::Polygon(g) => {
                for ring in g.rings() {
                    for &c in ring.coords() {
                        f(c);
                    }
                }
            }
            Self::MultiPoint(g) => {
                for p in g.points() {
                    if let Some(c) = p.coord() {
                        f(c);
                    }
                }
            }
            Self::MultiLineString(g) => {
                for ls in g.line_strings() {
                    for &c in ls.coords() {
                        f(c);
                    }
                }
            }
            Self::MultiPolygon(g) => {
                for poly in g.polygons() {
                    for ring in poly.rings() {
                        for &c in ring.coords() {
                            f(c);
                        }
                    }
                }
            }
            Self::GeometryCollection(g) => {
                for child in g.geometries() {
                    child.for_each_coord(f);
                }
            }
        }
    }

    /// Total number of coordinates stored in this geometry.
    #[must_use]
    pub fn coord_count(&self) -> usize {
        let mut count = 0;
        self.for_each_coord(&mut |_| count += 1);
        count
    }
}

impl From<Point> for Geometry {
    fn from(g: Point) -> Self {
        Self::Point(g)
    }
}

impl From<LineString> for Geometry {
    fn from(g: LineString) -> Self {
        Self::LineString(g)
    }
}

impl From<Polygon> for Geometry {
    fn from(g: Polygon) -> Self {
        Self::Polygon(g)
    }
}

impl From<MultiPoint> for Geometry {
    fn from(g: MultiPoint) -> Self {
        Self::MultiPoint(g)
    }
}

impl From<MultiLineString> for Geometry {
    fn from(g: MultiLineString) -> Self {
        Self::MultiLineString(g)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(g: MultiPolygon) -> Self {
        Self::MultiPolygon(g)
    }
}

impl From<GeometryCollection> for Geometry {
    fn from(g: GeometryCollection) -> Self {
        Self::GeometryCollection(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_codes_match_wire_values() {
        assert_eq!(GeometryKind::Point.code(), 1);
        assert_eq!(GeometryKind::LineString.code(), 2);
        assert_eq!(GeometryKind::Polygon.code(), 3);
        assert_eq!(GeometryKind::MultiPoint.code(), 4);
        assert_eq!(GeometryKind::MultiLineString.code(), 5);
        assert_eq!(GeometryKind::MultiPolygon.code(), 6);
        assert_eq!(GeometryKind::GeometryCollection.code(), 7);
    }

    #[test]
    fn kind_from_code_roundtrip() {
        for code in 1..=7u8 {
            let kind = GeometryKind::from_code(code).unwrap();
            assert_eq!(kind.code(), code);
        }
        assert_eq!(GeometryKind::from_code(0), None);
        assert_eq!(GeometryKind::from_code(8), None);
        assert_eq!(GeometryKind::from_code(0xFF), None);
    }

    #[test]
    fn kind_is_multi() {
        assert!(!GeometryKind::Point.is_multi());
        assert!(!GeometryKind::LineString.is_multi());
        assert!(!GeometryKind::Polygon.is_multi());
        assert!(GeometryKind::MultiPoint.is_multi());
        assert!(GeometryKind::MultiLineString.is_multi());
        assert!(GeometryKind::MultiPolygon.is_multi());
        assert!(GeometryKind::GeometryCollection.is_multi());
    }

    #[test]
    fn kind_display() {
        assert_eq!(GeometryKind::MultiPolygon.to_string(), "MultiPolygon");
    }

    #[test]
    fn point_emptiness() {
        assert!(Point::empty(CoordType::Xy).is_empty());
        assert!(!Point::new(Coord::xy(1.0, 2.0), CoordType::Xy).is_empty());
    }

    #[test]
    fn line_string_is_closed() {
        let open = LineString::new(
            vec![Coord::xy(0.0, 0.0), Coord::xy(1.0, 0.0)],
            CoordType::Xy,
        );
        assert!(!open.is_closed());

        let closed = LineString::new(
            vec![
                Coord::xy(0.0, 0.0),
                Coord::xy(1.0, 0.0),
                Coord::xy(0.0, 0.0),
            ],
            CoordType::Xy,
        );
        assert!(closed.is_closed());

        assert!(LineString::empty(CoordType::Xy).is_closed());
    }

    #[test]
    fn multi_kinds_empty_when_all_components_empty() {
        let mp = MultiPolygon::new(vec![Polygon::empty(CoordType::Xy)], CoordType::Xy);
        assert!(mp.is_empty());

        let ring = LineString::new(
            vec![
                Coord::xy(0.0, 0.0),
                Coord::xy(1.0, 0.0),
                Coord::xy(1.0, 1.0),
                Coord::xy(0.0, 0.0),
            ],
            CoordType::Xy,
        );
        let mp = MultiPolygon::new(
            vec![
                Polygon::empty(CoordType::Xy),
                Polygon::new(vec![ring], CoordType::Xy),
            ],
            CoordType::Xy,
        );
        assert!(!mp.is_empty());
    }

    #[test]
    fn collection_empty_recurses() {
        let gc = GeometryCollection::new(
            vec![Geometry::Point(Point::empty(CoordType::Xy))],
            CoordType::Xy,
        );
        assert!(gc.is_empty());

        let gc = GeometryCollection::new(
            vec![Geometry::Point(Point::new(
                Coord::xy(0.0, 1.0),
                CoordType::Xy,
            ))],
            CoordType::Xy,
        );
        assert!(!gc.is_empty());
    }

    #[test]
    fn coord_count_walks_nested_structure() {
        let ls = LineString::new(
            vec![Coord::xy(4.0, 5.0), Coord::xy(6.0, 7.0)],
            CoordType::Xy,
        );
        let gc = GeometryCollection::new(
            vec![
                Geometry::Point(Point::new(Coord::xy(0.0, 1.0), CoordType::Xy)),
                Geometry::LineString(ls),
            ],
            CoordType::Xy,
        );
        assert_eq!(Geometry::GeometryCollection(gc).coord_count(), 3);
    }
}
