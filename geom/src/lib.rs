//! Planar vector-geometry value model.
//!
//! This crate defines the geometry values the TWKB codec encodes and decodes:
//! coordinates with optional Z and M members, the seven OGC geometry kinds,
//! and envelopes. It knows nothing about any wire format.
//!
//! # Design Principles
//!
//! - **Plain owned values** - Geometries are ordinary structs and enums with
//!   no interior mutability and no lifetime parameters.
//! - **No wire knowledge** - This crate never touches bytes; codecs live in
//!   sibling crates.
//! - **Permissive construction** - Validity checking (ring orientation,
//!   self-intersection, and friends) is a concern for topology layers, not
//!   for the value model.

mod coord;
mod envelope;
mod geometry;

pub use coord::{Coord, CoordType};
pub use envelope::{Envelope, ExtendedEnvelope, Interval};
pub use geometry::{
    Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString, MultiPoint,
    MultiPolygon, Point, Polygon,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Coord::xy(1.0, 2.0);
        let _ = CoordType::Xy;
        let _ = Point::empty(CoordType::Xy);
        let _ = GeometryKind::Point;
        let _ = Interval::new(0.0, 1.0);
    }

    #[test]
    fn geometry_from_kind_structs() {
        let g: Geometry = Point::new(Coord::xy(1.0, 2.0), CoordType::Xy).into();
        assert_eq!(g.kind(), GeometryKind::Point);
        assert!(!g.is_empty());
    }
}
