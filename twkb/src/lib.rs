//! Tiny Well-Known Binary (TWKB) geometry codec.
//!
//! TWKB is a compact, variable-length binary encoding of 2D/3D/measured
//! geometries used by PostGIS and friends. Coordinates are quantized under
//! per-axis precision scales and delta-coded as ZigZag varints; records carry
//! optional size, bounding-box, and ID-list blocks that can be read without
//! touching the payload.
//!
//! # Design Principles
//!
//! - **Pure codec** - No I/O, no shared state; every call owns its buffers.
//! - **Bounded decoding** - Counts are validated against remaining input
//!   before any allocation, and recursion is depth-limited.
//! - **Explicit errors** - Malformed input yields structured errors with byte
//!   offsets, never a panic.
//!
//! # Example
//!
//! ```
//! use geom::{Coord, CoordType, Geometry, Point};
//! use twkb::EncodeOptions;
//!
//! let point = Geometry::Point(Point::new(Coord::xy(1.0, 2.0), CoordType::Xy));
//! let bytes = twkb::encode(&point, 0, &EncodeOptions::new()).unwrap();
//! assert_eq!(bytes, [0x01, 0x00, 0x02, 0x04]);
//!
//! let (decoded, consumed) = twkb::decode(&bytes).unwrap();
//! assert_eq!(decoded, point);
//! assert_eq!(consumed, bytes.len());
//! ```

mod decode;
mod delta;
mod encode;
mod error;
mod extract;
mod header;
mod limits;
mod varint;

pub use decode::{decode, decode_with_limits};
pub use encode::{encode, EncodeOptions};
pub use error::{Axis, DecodeError, DecodeResult, EncodeError, LimitKind};
pub use extract::{extract_envelope, extract_id_list, extract_size};
pub use header::{Flags, Header};
pub use limits::DecodeLimits;
pub use varint::{
    write_svarint, write_uvarint, zigzag_decode, zigzag_encode, ByteReader, MAX_VARINT_BYTES,
};
