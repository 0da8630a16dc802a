//! Partial parsers: size, envelope, and ID list without decoding the payload.
//!
//! Each extractor reads the header and then skips exactly the blocks it does
//! not need. When the relevant flag is unset the extractor returns `Ok(None)`
//! rather than an error, so callers can probe records cheaply.

use geom::{Envelope, ExtendedEnvelope, Interval};

use crate::delta::scale_down;
use crate::error::{DecodeError, DecodeResult};
use crate::header::Header;
use crate::varint::ByteReader;

/// Reads the total encoded length of the record, in bytes.
///
/// The result counts the header bytes and the size varint itself, so it
/// delimits the record even when trailing data follows. Returns `Ok(None)`
/// when the record carries no size header.
///
/// # Errors
///
/// Only header-level failures: [`DecodeError::ShortHeader`],
/// [`DecodeError::UnknownKind`], [`DecodeError::MalformedVarint`].
pub fn extract_size(bytes: &[u8]) -> DecodeResult<Option<u64>> {
    let mut reader = ByteReader::new(bytes);
    let header = Header::read(&mut reader)?;
    if !header.flags.has_size() {
        return Ok(None);
    }
    let declared = reader.read_uvarint()?;
    Ok(Some((reader.position() as u64).saturating_add(declared)))
}

/// Reads the bounding-box block as an envelope of the declared coordinate
/// type, or `Ok(None)` when the record carries none.
///
/// # Errors
///
/// As [`extract_size`].
pub fn extract_envelope(bytes: &[u8]) -> DecodeResult<Option<ExtendedEnvelope>> {
    let mut reader = ByteReader::new(bytes);
    let header = Header::read(&mut reader)?;
    if header.flags.has_size() {
        reader.read_uvarint()?;
    }
    if !header.flags.has_bbox() {
        return Ok(None);
    }

    let mut axis_range = |prec: i32| -> DecodeResult<Interval> {
        let min = reader.read_svarint()?;
        let delta = reader.read_svarint()?;
        Ok(Interval::new(
            scale_down(min, prec),
            scale_down(min.wrapping_add(delta), prec),
        ))
    };

    let x = axis_range(header.prec_xy)?;
    let y = axis_range(header.prec_xy)?;
    let z = if header.has_z {
        Some(axis_range(header.prec_z)?)
    } else {
        None
    };
    let m = if header.has_m {
        Some(axis_range(header.prec_m)?)
    } else {
        None
    };

    Ok(Some(ExtendedEnvelope {
        xy: Envelope::new(x.min, y.min, x.max, y.max),
        z,
        m,
    }))
}

/// Reads the ID list of a container record, or `Ok(None)` when the record
/// carries none (including when the kind cannot carry one).
///
/// The ID count is the record's element count varint; consistency with the
/// payload that follows is checked only by the full decoder.
///
/// # Errors
///
/// As [`extract_size`], plus [`DecodeError::InvalidCount`] for a count that
/// implies more bytes than remain.
pub fn extract_id_list(bytes: &[u8]) -> DecodeResult<Option<Vec<i64>>> {
    let mut reader = ByteReader::new(bytes);
    let header = Header::read(&mut reader)?;
    if !header.flags.has_id_list() || !header.kind.is_multi() {
        return Ok(None);
    }
    if header.flags.has_size() {
        reader.read_uvarint()?;
    }
    if header.flags.has_bbox() {
        reader.skip_varints(2 * header.axis_count())?;
    }

    let offset = reader.position();
    let count = reader.read_uvarint()?;
    if count > reader.remaining() as u64 {
        return Err(DecodeError::InvalidCount {
            count,
            remaining: reader.remaining(),
            offset,
        });
    }
    let mut ids = Vec::with_capacity(count as usize);
    for _ in 0..count {
        ids.push(reader.read_svarint()?);
    }
    Ok(Some(ids))
}
