//! Delta-coded coordinate streams.
//!
//! Coordinates are quantized to integers under per-axis precision scales and
//! written as ZigZag varints of the difference from the previous coordinate.
//! The running per-axis state is explicit in [`DeltaWriter`]/[`DeltaReader`]
//! values: one flows through an entire record (across rings and across the
//! components of the homogeneous container kinds), and a fresh one is created
//! for each nested record inside a GeometryCollection.

use geom::{Coord, CoordType};

use crate::error::{DecodeResult, EncodeError};
use crate::varint::{write_svarint, ByteReader};

/// Upper bound on axes per coordinate (X, Y, Z, M).
pub(crate) const MAX_AXES: usize = 4;

/// Per-axis precision assignment for one record.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisPrecisions {
    axes: usize,
    has_z: bool,
    has_m: bool,
    prec: [i32; MAX_AXES],
}

impl AxisPrecisions {
    pub(crate) fn new(coord_type: CoordType, prec_xy: i32, prec_z: i32, prec_m: i32) -> Self {
        let mut prec = [prec_xy, prec_xy, 0, 0];
        let mut axes = 2;
        if coord_type.has_z() {
            prec[axes] = prec_z;
            axes += 1;
        }
        if coord_type.has_m() {
            prec[axes] = prec_m;
            axes += 1;
        }
        Self {
            axes,
            has_z: coord_type.has_z(),
            has_m: coord_type.has_m(),
            prec,
        }
    }

    pub(crate) const fn axis_count(&self) -> usize {
        self.axes
    }

    pub(crate) const fn precision(&self, axis: usize) -> i32 {
        self.prec[axis]
    }

    /// The coordinate's axis values in wire order (X, Y, [Z], [M]).
    ///
    /// A missing Z or M member on a coordinate whose geometry declares the
    /// axis contributes zero.
    fn axis_values(&self, coord: Coord) -> [f64; MAX_AXES] {
        let mut vals = [coord.x, coord.y, 0.0, 0.0];
        let mut axis = 2;
        if self.has_z {
            vals[axis] = coord.z.unwrap_or(0.0);
            axis += 1;
        }
        if self.has_m {
            vals[axis] = coord.m.unwrap_or(0.0);
        }
        vals
    }

    fn coord_from(&self, vals: [f64; MAX_AXES]) -> Coord {
        let mut coord = Coord::xy(vals[0], vals[1]);
        let mut axis = 2;
        if self.has_z {
            coord.z = Some(vals[axis]);
            axis += 1;
        }
        if self.has_m {
            coord.m = Some(vals[axis]);
        }
        coord
    }
}

/// Applies the `10^prec` scale factor to a real value.
///
/// Multiplies for non-negative precisions and divides for negative ones, so a
/// single correctly-rounded operation maps between domains in both
/// directions.
pub(crate) fn scale_up(value: f64, prec: i32) -> f64 {
    if prec >= 0 {
        value * 10f64.powi(prec)
    } else {
        value / 10f64.powi(-prec)
    }
}

/// Maps a stored integer back to the real domain (inverse of [`scale_up`]).
pub(crate) fn scale_down(value: i64, prec: i32) -> f64 {
    if prec >= 0 {
        value as f64 / 10f64.powi(prec)
    } else {
        value as f64 * 10f64.powi(-prec)
    }
}

/// Quantizes a real value under `prec`, rounding half away from zero.
pub(crate) fn quantize(value: f64, prec: i32) -> Result<i64, EncodeError> {
    if !value.is_finite() {
        return Err(EncodeError::CoordinateNotFinite);
    }
    let scaled = scale_up(value, prec);
    if !scaled.is_finite() {
        return Err(EncodeError::CoordinateNotFinite);
    }
    Ok(scaled.round() as i64)
}

/// Integer-domain bounds accumulated while encoding a record's payload.
///
/// Shared by every coordinate of a record, including those inside nested
/// collection records, so a top-level bounding box covers the whole tree.
#[derive(Debug)]
pub(crate) struct BoundsTracker {
    min: [i64; MAX_AXES],
    max: [i64; MAX_AXES],
    seen: [bool; MAX_AXES],
}

impl BoundsTracker {
    pub(crate) const fn new() -> Self {
        Self {
            min: [0; MAX_AXES],
            max: [0; MAX_AXES],
            seen: [false; MAX_AXES],
        }
    }

    fn record(&mut self, axis: usize, value: i64) {
        if self.seen[axis] {
            self.min[axis] = self.min[axis].min(value);
            self.max[axis] = self.max[axis].max(value);
        } else {
            self.min[axis] = value;
            self.max[axis] = value;
            self.seen[axis] = true;
        }
    }

    /// The (min, max) pair for an axis; (0, 0) if no coordinate supplied it.
    pub(crate) const fn range(&self, axis: usize) -> (i64, i64) {
        if self.seen[axis] {
            (self.min[axis], self.max[axis])
        } else {
            (0, 0)
        }
    }
}

/// Writes one record's coordinate stream as running deltas.
#[derive(Debug)]
pub(crate) struct DeltaWriter {
    prec: AxisPrecisions,
    prev: [i64; MAX_AXES],
}

impl DeltaWriter {
    pub(crate) const fn new(prec: AxisPrecisions) -> Self {
        Self {
            prec,
            prev: [0; MAX_AXES],
        }
    }

    /// Quantizes `coord` and appends its per-axis deltas.
    pub(crate) fn write_coord(
        &mut self,
        out: &mut Vec<u8>,
        bounds: &mut BoundsTracker,
        coord: Coord,
    ) -> Result<(), EncodeError> {
        let vals = self.prec.axis_values(coord);
        for axis in 0..self.prec.axis_count() {
            let quantized = quantize(vals[axis], self.prec.precision(axis))?;
            write_svarint(out, quantized.wrapping_sub(self.prev[axis]));
            self.prev[axis] = quantized;
            bounds.record(axis, quantized);
        }
        Ok(())
    }
}

/// Reads one record's coordinate stream, reversing [`DeltaWriter`].
#[derive(Debug)]
pub(crate) struct DeltaReader {
    prec: AxisPrecisions,
    prev: [i64; MAX_AXES],
}

impl DeltaReader {
    pub(crate) const fn new(prec: AxisPrecisions) -> Self {
        Self {
            prec,
            prev: [0; MAX_AXES],
        }
    }

    pub(crate) fn read_coord(&mut self, reader: &mut ByteReader<'_>) -> DecodeResult<Coord> {
        let mut vals = [0f64; MAX_AXES];
        for axis in 0..self.prec.axis_count() {
            let delta = reader.read_svarint()?;
            self.prev[axis] = self.prev[axis].wrapping_add(delta);
            vals[axis] = scale_down(self.prev[axis], self.prec.precision(axis));
        }
        Ok(self.prec.coord_from(vals))
    }
}
