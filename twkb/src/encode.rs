//! TWKB encoding: geometry tree → bytes.

use geom::{Geometry, GeometryKind, LineString, Polygon};
use log::trace;

use crate::delta::{AxisPrecisions, BoundsTracker, DeltaWriter};
use crate::error::{Axis, EncodeError};
use crate::header::{Flags, Header};
use crate::varint::{write_svarint, write_uvarint};

const XY_PRECISION_MIN: i32 = -4;
const XY_PRECISION_MAX: i32 = 7;
const ZM_PRECISION_MAX: i32 = 7;

/// Options controlling [`encode`].
///
/// # Example
///
/// ```
/// use twkb::EncodeOptions;
///
/// let opts = EncodeOptions::new().size_header().id_list(vec![0, 1]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    prec_z: Option<i32>,
    prec_m: Option<i32>,
    size_header: bool,
    bbox_header: bool,
    close_rings: bool,
    id_list: Vec<i64>,
}

impl EncodeOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Z-axis precision (0..=7). Required iff the geometry carries Z.
    #[must_use]
    pub fn precision_z(mut self, prec: i32) -> Self {
        self.prec_z = Some(prec);
        self
    }

    /// M-axis precision (0..=7). Required iff the geometry carries M.
    #[must_use]
    pub fn precision_m(mut self, prec: i32) -> Self {
        self.prec_m = Some(prec);
        self
    }

    /// Prefix the record body with its byte length.
    #[must_use]
    pub fn size_header(mut self) -> Self {
        self.size_header = true;
        self
    }

    /// Include a bounding-box block.
    ///
    /// Ignored for Point records; an error for empty geometries.
    #[must_use]
    pub fn bounding_box_header(mut self) -> Self {
        self.bbox_header = true;
        self
    }

    /// Write each polygon ring's closing coordinate instead of omitting it.
    #[must_use]
    pub fn close_rings(mut self) -> Self {
        self.close_rings = true;
        self
    }

    /// Attach per-element IDs. Valid only for the container kinds; the length
    /// must match the element count. An empty list means no ID list.
    #[must_use]
    pub fn id_list(mut self, ids: Vec<i64>) -> Self {
        self.id_list = ids;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct EncodeCfg {
    prec_xy: i32,
    prec_z: i32,
    prec_m: i32,
    close_rings: bool,
}

/// Header blocks that apply to the outermost record only.
#[derive(Debug, Clone, Copy)]
struct TopBlocks<'a> {
    size: bool,
    bbox: bool,
    ids: &'a [i64],
}

/// Encodes `geometry` as a TWKB record at the given XY precision.
///
/// # Errors
///
/// Returns an [`EncodeError`] for out-of-range precisions, a missing Z/M
/// precision, ID-list misuse, a bounding box requested on an empty geometry,
/// non-finite coordinates, or an unclosed ring under
/// [`close_rings`](EncodeOptions::close_rings).
pub fn encode(
    geometry: &Geometry,
    prec_xy: i32,
    options: &EncodeOptions,
) -> Result<Vec<u8>, EncodeError> {
    if !(XY_PRECISION_MIN..=XY_PRECISION_MAX).contains(&prec_xy) {
        return Err(EncodeError::PrecisionOutOfRange {
            axis: Axis::Xy,
            precision: prec_xy,
        });
    }
    for (axis, prec) in [(Axis::Z, options.prec_z), (Axis::M, options.prec_m)] {
        if let Some(prec) = prec {
            if !(0..=ZM_PRECISION_MAX).contains(&prec) {
                return Err(EncodeError::PrecisionOutOfRange {
                    axis,
                    precision: prec,
                });
            }
        }
    }
    let prec_z = match options.prec_z {
        Some(prec) => prec,
        None if uses_z(geometry) => return Err(EncodeError::MissingZPrecision),
        None => 0,
    };
    let prec_m = match options.prec_m {
        Some(prec) => prec,
        None if uses_m(geometry) => return Err(EncodeError::MissingMPrecision),
        None => 0,
    };

    let cfg = EncodeCfg {
        prec_xy,
        prec_z,
        prec_m,
        close_rings: options.close_rings,
    };
    let top = TopBlocks {
        size: options.size_header,
        bbox: options.bbox_header,
        ids: &options.id_list,
    };

    let mut out = Vec::new();
    let mut bounds = BoundsTracker::new();
    write_record(&mut out, geometry, cfg, Some(top), &mut bounds)?;
    trace!(
        "encoded {} record at precision {}: {} bytes",
        geometry.kind(),
        prec_xy,
        out.len()
    );
    Ok(out)
}

fn write_record(
    out: &mut Vec<u8>,
    geometry: &Geometry,
    cfg: EncodeCfg,
    top: Option<TopBlocks<'_>>,
    bounds: &mut BoundsTracker,
) -> Result<(), EncodeError> {
    let kind = geometry.kind();
    let empty = geometry.is_empty();
    let ct = geometry.coordinate_type();
    let (has_z, has_m) = if empty {
        (false, false)
    } else {
        (ct.has_z(), ct.has_m())
    };

    let (want_size, want_bbox, ids) = match top {
        Some(top) => (top.size, top.bbox, top.ids),
        None => (false, false, &[][..]),
    };

    if want_bbox && empty {
        return Err(EncodeError::BboxOnEmpty);
    }
    // A point's bounding box would repeat its only coordinate; skip it.
    let use_bbox = want_bbox && kind != GeometryKind::Point;

    if !ids.is_empty() {
        if !kind.is_multi() {
            return Err(EncodeError::IdListOnNonMulti { kind });
        }
        let expected = if empty {
            0
        } else {
            encodable_components(geometry)
        };
        if ids.len() != expected {
            return Err(EncodeError::IdListLengthMismatch {
                expected,
                actual: ids.len(),
            });
        }
    }
    let use_ids = !ids.is_empty();

    let mut raw = 0u8;
    if use_bbox {
        raw |= Flags::BBOX;
    }
    if want_size {
        raw |= Flags::SIZE;
    }
    if use_ids {
        raw |= Flags::ID_LIST;
    }
    if has_z || has_m {
        raw |= Flags::EXTENDED;
    }
    if empty {
        raw |= Flags::EMPTY;
    }

    let header = Header {
        kind,
        prec_xy: cfg.prec_xy,
        flags: Flags::from_raw(raw),
        has_z,
        has_m,
        prec_z: cfg.prec_z,
        prec_m: cfg.prec_m,
    };
    header.write(out);

    if empty {
        if want_size {
            write_uvarint(out, 0);
        }
        return Ok(());
    }

    let prec = AxisPrecisions::new(ct, cfg.prec_xy, cfg.prec_z, cfg.prec_m);
    let mut writer = DeltaWriter::new(prec);

    if want_size || use_bbox {
        // The size varint and bounding box precede the payload but depend on
        // it, so the payload goes through a scratch buffer first.
        let mut payload = Vec::new();
        write_payload(&mut payload, geometry, cfg, ids, &mut writer, bounds)?;

        let mut bbox_block = Vec::new();
        if use_bbox {
            for axis in 0..prec.axis_count() {
                let (min, max) = bounds.range(axis);
                write_svarint(&mut bbox_block, min);
                write_svarint(&mut bbox_block, max.wrapping_sub(min));
            }
        }
        if want_size {
            write_uvarint(out, (bbox_block.len() + payload.len()) as u64);
        }
        out.extend_from_slice(&bbox_block);
        out.extend_from_slice(&payload);
    } else {
        write_payload(out, geometry, cfg, ids, &mut writer, bounds)?;
    }
    Ok(())
}

fn write_payload(
    out: &mut Vec<u8>,
    geometry: &Geometry,
    cfg: EncodeCfg,
    ids: &[i64],
    writer: &mut DeltaWriter,
    bounds: &mut BoundsTracker,
) -> Result<(), EncodeError> {
    match geometry {
        Geometry::Point(point) => {
            if let Some(coord) = point.coord() {
                writer.write_coord(out, bounds, coord)?;
            }
        }
        Geometry::LineString(ls) => {
            write_line_string_body(out, ls, writer, bounds)?;
        }
        Geometry::Polygon(polygon) => {
            write_polygon_body(out, polygon, cfg, writer, bounds)?;
        }
        Geometry::MultiPoint(mp) => {
            // Empty points have no wire representation inside a MultiPoint.
            let points = mp.points().iter().filter(|p| !p.is_empty());
            write_uvarint(out, points.clone().count() as u64);
            write_id_list(out, ids);
            for point in points {
                if let Some(coord) = point.coord() {
                    writer.write_coord(out, bounds, coord)?;
                }
            }
        }
        Geometry::MultiLineString(mls) => {
            write_uvarint(out, mls.line_strings().len() as u64);
            write_id_list(out, ids);
            for ls in mls.line_strings() {
                write_line_string_body(out, ls, writer, bounds)?;
            }
        }
        Geometry::MultiPolygon(mp) => {
            write_uvarint(out, mp.polygons().len() as u64);
            write_id_list(out, ids);
            for polygon in mp.polygons() {
                write_polygon_body(out, polygon, cfg, writer, bounds)?;
            }
        }
        Geometry::GeometryCollection(gc) => {
            write_uvarint(out, gc.geometries().len() as u64);
            write_id_list(out, ids);
            for child in gc.geometries() {
                // Nested records carry their own headers and restart delta
                // state, but never size/bbox/ID blocks of their own.
                write_record(out, child, cfg, None, bounds)?;
            }
        }
    }
    Ok(())
}

fn write_line_string_body(
    out: &mut Vec<u8>,
    ls: &LineString,
    writer: &mut DeltaWriter,
    bounds: &mut BoundsTracker,
) -> Result<(), EncodeError> {
    write_uvarint(out, ls.coords().len() as u64);
    for &coord in ls.coords() {
        writer.write_coord(out, bounds, coord)?;
    }
    Ok(())
}

fn write_polygon_body(
    out: &mut Vec<u8>,
    polygon: &Polygon,
    cfg: EncodeCfg,
    writer: &mut DeltaWriter,
    bounds: &mut BoundsTracker,
) -> Result<(), EncodeError> {
    write_uvarint(out, polygon.rings().len() as u64);
    for ring in polygon.rings() {
        let coords = ring.coords();
        if cfg.close_rings {
            if !ring.is_closed() {
                return Err(EncodeError::UnclosedRing);
            }
            write_uvarint(out, coords.len() as u64);
            for &coord in coords {
                writer.write_coord(out, bounds, coord)?;
            }
        } else {
            // The closing coordinate is implied; it stays off the wire and
            // out of the delta state.
            let wire_len = coords.len().saturating_sub(1);
            write_uvarint(out, wire_len as u64);
            for &coord in &coords[..wire_len] {
                writer.write_coord(out, bounds, coord)?;
            }
        }
    }
    Ok(())
}

fn write_id_list(out: &mut Vec<u8>, ids: &[i64]) {
    for &id in ids {
        write_svarint(out, id);
    }
}

fn encodable_components(geometry: &Geometry) -> usize {
    match geometry {
        Geometry::MultiPoint(mp) => mp.points().iter().filter(|p| !p.is_empty()).count(),
        Geometry::MultiLineString(mls) => mls.line_strings().len(),
        Geometry::MultiPolygon(mp) => mp.polygons().len(),
        Geometry::GeometryCollection(gc) => gc.geometries().len(),
        _ => 0,
    }
}

fn uses_z(geometry: &Geometry) -> bool {
    if geometry.is_empty() {
        return false;
    }
    if geometry.coordinate_type().has_z() {
        return true;
    }
    match geometry {
        Geometry::GeometryCollection(gc) => gc.geometries().iter().any(uses_z),
        _ => false,
    }
}

fn uses_m(geometry: &Geometry) -> bool {
    if geometry.is_empty() {
        return false;
    }
    if geometry.coordinate_type().has_m() {
        return true;
    }
    match geometry {
        Geometry::GeometryCollection(gc) => gc.geometries().iter().any(uses_m),
        _ => false,
    }
}
