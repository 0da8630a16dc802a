//! TWKB decoding: bytes → geometry tree.

use geom::{
    CoordType, Geometry, GeometryCollection, GeometryKind, LineString, MultiLineString,
    MultiPoint, MultiPolygon, Point, Polygon,
};
use log::trace;

use crate::delta::{AxisPrecisions, DeltaReader};
use crate::error::{DecodeError, DecodeResult, LimitKind};
use crate::header::Header;
use crate::limits::DecodeLimits;
use crate::varint::ByteReader;

/// Decodes one TWKB record with the default [`DecodeLimits`].
///
/// Returns the geometry and the number of bytes consumed; trailing bytes are
/// left to the caller rather than treated as an error.
///
/// # Errors
///
/// Any [`DecodeError`]; truncated or malformed input never panics.
pub fn decode(bytes: &[u8]) -> DecodeResult<(Geometry, usize)> {
    decode_with_limits(bytes, &DecodeLimits::default())
}

/// Decodes one TWKB record under explicit limits.
///
/// # Errors
///
/// As [`decode`], plus [`DecodeError::LimitExceeded`] when the input asks for
/// more nesting or more coordinates than `limits` allow.
pub fn decode_with_limits(
    bytes: &[u8],
    limits: &DecodeLimits,
) -> DecodeResult<(Geometry, usize)> {
    let mut decoder = Decoder {
        reader: ByteReader::new(bytes),
        limits,
        coords_read: 0,
    };
    let geometry = decoder.read_record(0)?;
    let consumed = decoder.reader.position();
    trace!(
        "decoded {} record: {} of {} bytes",
        geometry.kind(),
        consumed,
        bytes.len()
    );
    Ok((geometry, consumed))
}

struct Decoder<'a, 'b> {
    reader: ByteReader<'a>,
    limits: &'b DecodeLimits,
    coords_read: usize,
}

impl Decoder<'_, '_> {
    fn read_record(&mut self, depth: usize) -> DecodeResult<Geometry> {
        if depth > self.limits.max_nesting_depth {
            return Err(DecodeError::LimitExceeded {
                kind: LimitKind::NestingDepth,
                limit: self.limits.max_nesting_depth,
                actual: depth,
            });
        }

        let header = Header::read(&mut self.reader)?;

        let size_check = if header.flags.has_size() {
            let declared = self.reader.read_uvarint()?;
            let payload_start = self.reader.position();
            if declared > self.reader.remaining() as u64 {
                return Err(DecodeError::ShortPayload {
                    offset: payload_start,
                });
            }
            Some((declared, payload_start))
        } else {
            None
        };

        if header.flags.is_empty() {
            if let Some((declared, payload_start)) = size_check {
                if declared != 0 {
                    return Err(DecodeError::EmptyWithPayload {
                        offset: payload_start,
                    });
                }
            }
            return Ok(empty_geometry(header.kind));
        }

        if header.flags.has_bbox() {
            self.reader.skip_varints(2 * header.axis_count())?;
        }

        let ct = header.coord_type();
        let axes = header.axis_count();
        let prec = AxisPrecisions::new(ct, header.prec_xy, header.prec_z, header.prec_m);
        let mut delta = DeltaReader::new(prec);

        let geometry = match header.kind {
            GeometryKind::Point => {
                self.add_coords(1)?;
                let coord = delta.read_coord(&mut self.reader)?;
                Geometry::Point(Point::new(coord, ct))
            }
            GeometryKind::LineString => {
                Geometry::LineString(self.read_line_string_body(&mut delta, ct, axes)?)
            }
            GeometryKind::Polygon => {
                Geometry::Polygon(self.read_polygon_body(&mut delta, ct, axes)?)
            }
            GeometryKind::MultiPoint => {
                let count = self.read_count(axes)?;
                self.skip_id_list(&header, count)?;
                self.add_coords(count)?;
                let mut points = Vec::with_capacity(count);
                for _ in 0..count {
                    points.push(Point::new(delta.read_coord(&mut self.reader)?, ct));
                }
                Geometry::MultiPoint(MultiPoint::new(points, ct))
            }
            GeometryKind::MultiLineString => {
                let count = self.read_count(1)?;
                self.skip_id_list(&header, count)?;
                let mut components = Vec::with_capacity(count);
                for _ in 0..count {
                    components.push(self.read_line_string_body(&mut delta, ct, axes)?);
                }
                Geometry::MultiLineString(MultiLineString::new(components, ct))
            }
            GeometryKind::MultiPolygon => {
                let count = self.read_count(1)?;
                self.skip_id_list(&header, count)?;
                let mut components = Vec::with_capacity(count);
                for _ in 0..count {
                    components.push(self.read_polygon_body(&mut delta, ct, axes)?);
                }
                Geometry::MultiPolygon(MultiPolygon::new(components, ct))
            }
            GeometryKind::GeometryCollection => {
                // Every nested record is at least a type byte and a flags byte.
                let count = self.read_count(2)?;
                self.skip_id_list(&header, count)?;
                let mut children = Vec::with_capacity(count);
                for _ in 0..count {
                    children.push(self.read_record(depth + 1)?);
                }
                Geometry::GeometryCollection(GeometryCollection::new(children, ct))
            }
        };

        if let Some((declared, payload_start)) = size_check {
            let actual = (self.reader.position() - payload_start) as u64;
            if actual != declared {
                return Err(DecodeError::SizeMismatch { declared, actual });
            }
        }

        Ok(geometry)
    }

    fn read_line_string_body(
        &mut self,
        delta: &mut DeltaReader,
        ct: CoordType,
        axes: usize,
    ) -> DecodeResult<LineString> {
        let count = self.read_count(axes)?;
        self.add_coords(count)?;
        let mut coords = Vec::with_capacity(count);
        for _ in 0..count {
            coords.push(delta.read_coord(&mut self.reader)?);
        }
        Ok(LineString::new(coords, ct))
    }

    fn read_polygon_body(
        &mut self,
        delta: &mut DeltaReader,
        ct: CoordType,
        axes: usize,
    ) -> DecodeResult<Polygon> {
        let nrings = self.read_count(1)?;
        let mut rings = Vec::with_capacity(nrings);
        for _ in 0..nrings {
            let count = self.read_count(axes)?;
            self.add_coords(count)?;
            let mut coords = Vec::with_capacity(count + 1);
            for _ in 0..count {
                coords.push(delta.read_coord(&mut self.reader)?);
            }
            // A ring whose closing coordinate was left off the wire gets it
            // back; the copy never enters the delta state.
            if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
                if first != last {
                    coords.push(first);
                }
            }
            rings.push(LineString::new(coords, ct));
        }
        Ok(Polygon::new(rings, ct))
    }

    /// Reads a count varint and rejects values that imply more bytes than
    /// remain, assuming at least `min_bytes_each` per element.
    fn read_count(&mut self, min_bytes_each: usize) -> DecodeResult<usize> {
        let offset = self.reader.position();
        let count = self.reader.read_uvarint()?;
        let remaining = self.reader.remaining();
        if count > (remaining / min_bytes_each.max(1)) as u64 {
            return Err(DecodeError::InvalidCount {
                count,
                remaining,
                offset,
            });
        }
        Ok(count as usize)
    }

    fn skip_id_list(&mut self, header: &Header, count: usize) -> DecodeResult<()> {
        if header.flags.has_id_list() {
            self.reader.skip_varints(count)?;
        }
        Ok(())
    }

    fn add_coords(&mut self, count: usize) -> DecodeResult<()> {
        self.coords_read = self.coords_read.saturating_add(count);
        if self.coords_read > self.limits.max_coordinates {
            return Err(DecodeError::LimitExceeded {
                kind: LimitKind::Coordinates,
                limit: self.limits.max_coordinates,
                actual: self.coords_read,
            });
        }
        Ok(())
    }
}

fn empty_geometry(kind: GeometryKind) -> Geometry {
    let ct = CoordType::Xy;
    match kind {
        GeometryKind::Point => Geometry::Point(Point::empty(ct)),
        GeometryKind::LineString => Geometry::LineString(LineString::empty(ct)),
        GeometryKind::Polygon => Geometry::Polygon(Polygon::empty(ct)),
        GeometryKind::MultiPoint => Geometry::MultiPoint(MultiPoint::empty(ct)),
        GeometryKind::MultiLineString => {
            Geometry::MultiLineString(MultiLineString::empty(ct))
        }
        GeometryKind::MultiPolygon => Geometry::MultiPolygon(MultiPolygon::empty(ct)),
        GeometryKind::GeometryCollection => {
            Geometry::GeometryCollection(GeometryCollection::empty(ct))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Coord;

    #[test]
    fn empty_point_consumes_two_bytes() {
        let (g, consumed) = decode(&[0x01, 0x10]).unwrap();
        assert_eq!(g, Geometry::Point(Point::empty(CoordType::Xy)));
        assert_eq!(consumed, 2);
    }

    #[test]
    fn trailing_bytes_are_reported_not_rejected() {
        let (g, consumed) = decode(&[0x01, 0x00, 0x02, 0x04, 0xDE, 0xAD]).unwrap();
        assert_eq!(
            g,
            Geometry::Point(Point::new(Coord::xy(1.0, 2.0), CoordType::Xy))
        );
        assert_eq!(consumed, 4);
    }

    #[test]
    fn zero_count_line_string_decodes_empty() {
        let (g, consumed) = decode(&[0x02, 0x00, 0x00]).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.kind(), GeometryKind::LineString);
        assert_eq!(consumed, 3);
    }

    #[test]
    fn count_exceeding_remaining_bytes_rejected() {
        // LINESTRING claiming 127 points with nothing after the count.
        let err = decode(&[0x02, 0x00, 0x7F]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::InvalidCount {
                count: 127,
                remaining: 0,
                offset: 2
            }
        );
    }

    #[test]
    fn truncated_coordinate_is_malformed_varint() {
        // POINT with an X delta but no Y delta.
        let err = decode(&[0x01, 0x00, 0x02]).unwrap_err();
        assert_eq!(err, DecodeError::MalformedVarint { offset: 3 });
    }

    #[test]
    fn declared_size_longer_than_input_rejected() {
        let err = decode(&[0x01, 0x02, 0x05, 0x02, 0x04]).unwrap_err();
        assert_eq!(err, DecodeError::ShortPayload { offset: 3 });
    }

    #[test]
    fn declared_size_mismatch_rejected() {
        // Size says 3 bytes but the point payload is 2.
        let err = decode(&[0x01, 0x02, 0x03, 0x02, 0x04, 0xFF]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SizeMismatch {
                declared: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn empty_record_declaring_payload_rejected() {
        let err = decode(&[0x01, 0x12, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00]).unwrap_err();
        assert_eq!(err, DecodeError::EmptyWithPayload { offset: 3 });
    }

    #[test]
    fn empty_record_with_zero_size_accepted() {
        let (g, consumed) = decode(&[0x01, 0x12, 0x00]).unwrap();
        assert!(g.is_empty());
        assert_eq!(consumed, 3);
    }

    #[test]
    fn nesting_depth_limit_enforced() {
        // Collections nested one level past the testing limit.
        let limits = DecodeLimits::for_testing();
        let mut bytes = Vec::new();
        for _ in 0..=limits.max_nesting_depth {
            bytes.extend_from_slice(&[0x07, 0x00, 0x01]);
        }
        bytes.extend_from_slice(&[0x01, 0x00, 0x02, 0x04]);
        let err = decode_with_limits(&bytes, &limits).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitExceeded {
                kind: LimitKind::NestingDepth,
                ..
            }
        ));
    }

    #[test]
    fn coordinate_limit_enforced() {
        let limits = DecodeLimits {
            max_nesting_depth: 8,
            max_coordinates: 2,
        };
        // LINESTRING(1 1, 5 5, 6 6)
        let bytes = [0x02, 0x00, 0x03, 0x02, 0x02, 0x08, 0x08, 0x02, 0x02];
        let err = decode_with_limits(&bytes, &limits).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitExceeded {
                kind: LimitKind::Coordinates,
                limit: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn reserved_meta_bits_are_ignored() {
        let (g, _) = decode(&[0x01, 0xE0, 0x02, 0x04]).unwrap();
        assert_eq!(
            g,
            Geometry::Point(Point::new(Coord::xy(1.0, 2.0), CoordType::Xy))
        );
    }

    #[test]
    fn multipoint_id_list_content_is_skipped() {
        // MULTIPOINT(0 1, 2 3) with ids [0, 1].
        let bytes = [0x04, 0x04, 0x02, 0x00, 0x02, 0x00, 0x02, 0x04, 0x04];
        let (g, consumed) = decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        let Geometry::MultiPoint(mp) = g else {
            panic!("expected MultiPoint");
        };
        assert_eq!(mp.points().len(), 2);
        assert_eq!(mp.points()[1].coord(), Some(Coord::xy(2.0, 3.0)));
    }
}
