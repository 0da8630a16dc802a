//! Error types for TWKB encoding and decoding.

use std::fmt;

use geom::GeometryKind;

/// Result type for TWKB decode operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Precision axes named by encode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The shared X/Y precision.
    Xy,
    Z,
    M,
}

/// Decode limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    NestingDepth,
    Coordinates,
}

/// Errors raised while decoding TWKB bytes.
///
/// Offsets are byte positions into the input at which the problem was
/// detected. Malformed or truncated input always yields one of these; the
/// decoder never panics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Input ended inside the fixed header bytes.
    ShortHeader { offset: usize },

    /// Input ended inside the payload.
    ShortPayload { offset: usize },

    /// A varint ran past the end of input or past 64 bits.
    MalformedVarint { offset: usize },

    /// The type byte's kind nibble is outside 1..=7.
    UnknownKind { code: u8, offset: usize },

    /// A count implies more bytes than remain in the input.
    InvalidCount {
        count: u64,
        remaining: usize,
        offset: usize,
    },

    /// The Empty flag is set but the record declares payload bytes.
    EmptyWithPayload { offset: usize },

    /// The size header disagrees with the bytes actually consumed.
    SizeMismatch { declared: u64, actual: u64 },

    /// A decode limit was exceeded.
    LimitExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },
}

/// Errors raised while encoding a geometry as TWKB.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EncodeError {
    /// A precision lies outside its representable range.
    PrecisionOutOfRange { axis: Axis, precision: i32 },

    /// The geometry carries Z but no Z precision was supplied.
    MissingZPrecision,

    /// The geometry carries M but no M precision was supplied.
    MissingMPrecision,

    /// The ID list length differs from the element count.
    IdListLengthMismatch { expected: usize, actual: usize },

    /// An ID list was supplied for a non-container kind.
    IdListOnNonMulti { kind: GeometryKind },

    /// A bounding-box header was requested for an empty geometry.
    BboxOnEmpty,

    /// A coordinate is NaN or infinite.
    CoordinateNotFinite,

    /// Ring closing was requested but a ring's endpoints differ.
    UnclosedRing,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortHeader { offset } => {
                write!(f, "input ends inside the header at byte {offset}")
            }
            Self::ShortPayload { offset } => {
                write!(f, "input ends inside the payload at byte {offset}")
            }
            Self::MalformedVarint { offset } => {
                write!(f, "malformed varint at byte {offset}")
            }
            Self::UnknownKind { code, offset } => {
                write!(f, "unknown geometry kind {code} at byte {offset}")
            }
            Self::InvalidCount {
                count,
                remaining,
                offset,
            } => {
                write!(
                    f,
                    "count {count} at byte {offset} exceeds the {remaining} remaining bytes"
                )
            }
            Self::EmptyWithPayload { offset } => {
                write!(f, "empty record declares payload bytes at byte {offset}")
            }
            Self::SizeMismatch { declared, actual } => {
                write!(
                    f,
                    "size header declares {declared} bytes but {actual} were consumed"
                )
            }
            Self::LimitExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NestingDepth => "nesting depth",
            Self::Coordinates => "coordinate count",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Xy => "XY",
            Self::Z => "Z",
            Self::M => "M",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrecisionOutOfRange { axis, precision } => {
                write!(f, "{axis} precision {precision} is out of range")
            }
            Self::MissingZPrecision => {
                write!(f, "geometry has Z coordinates but no Z precision was given")
            }
            Self::MissingMPrecision => {
                write!(f, "geometry has M coordinates but no M precision was given")
            }
            Self::IdListLengthMismatch { expected, actual } => {
                write!(
                    f,
                    "ID list has {actual} entries but the geometry has {expected} elements"
                )
            }
            Self::IdListOnNonMulti { kind } => {
                write!(f, "ID list is not valid for {kind} geometries")
            }
            Self::BboxOnEmpty => {
                write!(f, "bounding-box header is not valid for empty geometries")
            }
            Self::CoordinateNotFinite => {
                write!(f, "coordinate value is not finite")
            }
            Self::UnclosedRing => {
                write!(f, "ring closing requested but a ring is not closed")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

impl std::error::Error for EncodeError {}
