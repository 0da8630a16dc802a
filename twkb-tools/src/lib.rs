//! Inspection and decoding helpers behind the `twkb-tools` CLI.

use anyhow::{bail, Context, Result};
use geom::{Coord, Geometry, LineString, Polygon};
use serde::Serialize;
use serde_json::{json, Value};
use twkb::{decode, extract_envelope, extract_id_list, extract_size, ByteReader, Header};

/// Header-level summary of a TWKB record, gathered without decoding the
/// payload.
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub kind: String,
    pub precision_xy: i32,
    pub has_z: bool,
    pub has_m: bool,
    pub precision_z: Option<i32>,
    pub precision_m: Option<i32>,
    pub empty: bool,
    /// Total record length in bytes, when a size header is present.
    pub record_size: Option<u64>,
    pub envelope: Option<EnvelopeReport>,
    pub ids: Option<Vec<i64>>,
    pub input_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct EnvelopeReport {
    pub x: (f64, f64),
    pub y: (f64, f64),
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<(f64, f64)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub m: Option<(f64, f64)>,
}

/// Summarizes a record from its header and partial blocks.
pub fn inspect_twkb(bytes: &[u8]) -> Result<InspectReport> {
    let header =
        Header::read(&mut ByteReader::new(bytes)).context("parse TWKB header")?;
    let record_size = extract_size(bytes).context("read size header")?;
    let envelope = extract_envelope(bytes)
        .context("read bounding box")?
        .map(|env| EnvelopeReport {
            x: (env.xy.min_x, env.xy.max_x),
            y: (env.xy.min_y, env.xy.max_y),
            z: env.z.map(|iv| (iv.min, iv.max)),
            m: env.m.map(|iv| (iv.min, iv.max)),
        });
    let ids = extract_id_list(bytes).context("read ID list")?;

    Ok(InspectReport {
        kind: header.kind.to_string(),
        precision_xy: header.prec_xy,
        has_z: header.has_z,
        has_m: header.has_m,
        precision_z: header.has_z.then_some(header.prec_z),
        precision_m: header.has_m.then_some(header.prec_m),
        empty: header.flags.is_empty(),
        record_size,
        envelope,
        ids,
        input_bytes: bytes.len(),
    })
}

/// Renders an [`InspectReport`] as aligned key/value lines.
#[must_use]
pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    let mut push = |key: &str, value: String| {
        out.push_str(&format!("{key:14} {value}\n"));
    };
    push("kind", report.kind.clone());
    push("precision xy", report.precision_xy.to_string());
    if let Some(prec) = report.precision_z {
        push("precision z", prec.to_string());
    }
    if let Some(prec) = report.precision_m {
        push("precision m", prec.to_string());
    }
    push("empty", report.empty.to_string());
    match report.record_size {
        Some(size) => push("record size", format!("{size} bytes")),
        None => push("record size", "(no size header)".to_string()),
    }
    if let Some(env) = &report.envelope {
        push("bbox x", format!("{} .. {}", env.x.0, env.x.1));
        push("bbox y", format!("{} .. {}", env.y.0, env.y.1));
        if let Some(z) = env.z {
            push("bbox z", format!("{} .. {}", z.0, z.1));
        }
        if let Some(m) = env.m {
            push("bbox m", format!("{} .. {}", m.0, m.1));
        }
    }
    if let Some(ids) = &report.ids {
        push("ids", format!("{ids:?}"));
    }
    push("input", format!("{} bytes", report.input_bytes));
    out
}

/// Fully decodes a record into GeoJSON-flavored JSON.
///
/// M values ride along as a fourth coordinate member where present.
pub fn decode_geometry_json(bytes: &[u8]) -> Result<Value> {
    let (geometry, consumed) = decode(bytes).context("decode TWKB")?;
    Ok(json!({
        "consumed_bytes": consumed,
        "trailing_bytes": bytes.len() - consumed,
        "geometry": geometry_value(&geometry),
    }))
}

fn coord_value(coord: Coord) -> Value {
    let mut members = vec![coord.x, coord.y];
    if let Some(z) = coord.z {
        members.push(z);
    }
    if let Some(m) = coord.m {
        members.push(m);
    }
    json!(members)
}

fn line_value(ls: &LineString) -> Value {
    Value::Array(ls.coords().iter().map(|&c| coord_value(c)).collect())
}

fn polygon_value(polygon: &Polygon) -> Value {
    Value::Array(polygon.rings().iter().map(line_value).collect())
}

fn geometry_value(geometry: &Geometry) -> Value {
    match geometry {
        Geometry::Point(g) => json!({
            "type": "Point",
            "coordinates": g.coord().map_or(json!([]), coord_value),
        }),
        Geometry::LineString(g) => json!({
            "type": "LineString",
            "coordinates": line_value(g),
        }),
        Geometry::Polygon(g) => json!({
            "type": "Polygon",
            "coordinates": polygon_value(g),
        }),
        Geometry::MultiPoint(g) => json!({
            "type": "MultiPoint",
            "coordinates": Value::Array(
                g.points()
                    .iter()
                    .map(|p| p.coord().map_or(json!([]), coord_value))
                    .collect(),
            ),
        }),
        Geometry::MultiLineString(g) => json!({
            "type": "MultiLineString",
            "coordinates": Value::Array(g.line_strings().iter().map(line_value).collect()),
        }),
        Geometry::MultiPolygon(g) => json!({
            "type": "MultiPolygon",
            "coordinates": Value::Array(g.polygons().iter().map(polygon_value).collect()),
        }),
        Geometry::GeometryCollection(g) => json!({
            "type": "GeometryCollection",
            "geometries": Value::Array(g.geometries().iter().map(geometry_value).collect()),
        }),
    }
}

/// Parses hex text (whitespace tolerated) into bytes.
pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.split_whitespace().collect();
    if compact.len() % 2 != 0 {
        bail!("hex input has an odd number of digits");
    }
    (0..compact.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&compact[i..i + 2], 16)
                .with_context(|| format!("bad hex digits at offset {i}"))
        })
        .collect()
}
