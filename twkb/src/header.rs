//! The TWKB record header: type/precision byte, metadata flags, and the
//! optional extended precision byte.

use geom::{CoordType, GeometryKind};

use crate::error::{DecodeError, DecodeResult};

/// Metadata flags (the record's second byte).
///
/// Bits 5..=7 are reserved: ignored on read, written as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    /// Bounding-box block present.
    pub const BBOX: u8 = 1 << 0;

    /// Size varint present.
    pub const SIZE: u8 = 1 << 1;

    /// ID list present (container kinds only).
    pub const ID_LIST: u8 = 1 << 2;

    /// Extended precision byte present.
    pub const EXTENDED: u8 = 1 << 3;

    /// Geometry is empty; no payload follows.
    pub const EMPTY: u8 = 1 << 4;

    const KNOWN_MASK: u8 = 0b0001_1111;

    /// Creates flags from a raw metadata byte, dropping reserved bits.
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw & Self::KNOWN_MASK)
    }

    /// Returns the raw flag bits.
    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn has_bbox(self) -> bool {
        self.0 & Self::BBOX != 0
    }

    #[must_use]
    pub const fn has_size(self) -> bool {
        self.0 & Self::SIZE != 0
    }

    #[must_use]
    pub const fn has_id_list(self) -> bool {
        self.0 & Self::ID_LIST != 0
    }

    #[must_use]
    pub const fn has_extended(self) -> bool {
        self.0 & Self::EXTENDED != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 & Self::EMPTY != 0
    }
}

/// A parsed TWKB header: everything before the size/bbox/ID blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: GeometryKind,
    /// XY precision, from the 4-bit ZigZag nibble (range -8..=7).
    pub prec_xy: i32,
    pub flags: Flags,
    pub has_z: bool,
    pub has_m: bool,
    /// Z precision (0..=7); meaningful only when `has_z`.
    pub prec_z: i32,
    /// M precision (0..=7); meaningful only when `has_m`.
    pub prec_m: i32,
}

impl Header {
    /// Reads the type/precision byte, metadata byte, and (if flagged) the
    /// extended precision byte.
    ///
    /// # Errors
    ///
    /// [`DecodeError::ShortHeader`] on truncation, [`DecodeError::UnknownKind`]
    /// for a kind nibble outside 1..=7.
    pub fn read(reader: &mut crate::varint::ByteReader<'_>) -> DecodeResult<Self> {
        let start = reader.position();
        if reader.remaining() < 2 {
            return Err(DecodeError::ShortHeader {
                offset: start + reader.remaining(),
            });
        }

        let type_prec = reader.read_u8()?;
        let meta = reader.read_u8()?;

        let code = type_prec & 0x0F;
        let Some(kind) = GeometryKind::from_code(code) else {
            return Err(DecodeError::UnknownKind {
                code,
                offset: start,
            });
        };
        let prec_xy = zigzag4_decode(type_prec >> 4);
        let flags = Flags::from_raw(meta);

        let mut header = Self {
            kind,
            prec_xy,
            flags,
            has_z: false,
            has_m: false,
            prec_z: 0,
            prec_m: 0,
        };

        if flags.has_extended() {
            if reader.is_empty() {
                return Err(DecodeError::ShortHeader {
                    offset: reader.position(),
                });
            }
            let ext = reader.read_u8()?;
            header.has_z = ext & 0x01 != 0;
            header.has_m = ext & 0x02 != 0;
            header.prec_z = i32::from((ext >> 2) & 0x07);
            header.prec_m = i32::from((ext >> 5) & 0x07);
        }

        Ok(header)
    }

    /// Appends the header bytes. The extended byte is written iff the
    /// `EXTENDED` flag is set.
    pub fn write(&self, out: &mut Vec<u8>) {
        out.push(self.kind.code() | (zigzag4_encode(self.prec_xy) << 4));
        out.push(self.flags.raw());
        if self.flags.has_extended() {
            let mut ext = 0u8;
            if self.has_z {
                ext |= 0x01;
            }
            if self.has_m {
                ext |= 0x02;
            }
            ext |= ((self.prec_z as u8) & 0x07) << 2;
            ext |= ((self.prec_m as u8) & 0x07) << 5;
            out.push(ext);
        }
    }

    /// The coordinate type declared by this header.
    #[must_use]
    pub const fn coord_type(&self) -> CoordType {
        CoordType::from_zm(self.has_z, self.has_m)
    }

    /// Number of axes per coordinate (2..=4).
    #[must_use]
    pub const fn axis_count(&self) -> usize {
        self.coord_type().axis_count()
    }
}

const fn zigzag4_encode(prec: i32) -> u8 {
    (((prec << 1) ^ (prec >> 31)) as u8) & 0x0F
}

const fn zigzag4_decode(nibble: u8) -> i32 {
    ((nibble >> 1) as i32) ^ -((nibble & 1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::varint::ByteReader;

    fn read_header(bytes: &[u8]) -> DecodeResult<Header> {
        Header::read(&mut ByteReader::new(bytes))
    }

    #[test]
    fn zigzag4_nibble_roundtrip() {
        for prec in -8..=7 {
            let nibble = zigzag4_encode(prec);
            assert!(nibble <= 0x0F);
            assert_eq!(zigzag4_decode(nibble), prec, "prec {prec}");
        }
    }

    #[test]
    fn zigzag4_known_values() {
        assert_eq!(zigzag4_encode(0), 0);
        assert_eq!(zigzag4_encode(-1), 1);
        assert_eq!(zigzag4_encode(1), 2);
        assert_eq!(zigzag4_encode(7), 14);
        assert_eq!(zigzag4_encode(-8), 15);
    }

    #[test]
    fn read_plain_point_header() {
        let header = read_header(&[0x01, 0x00]).unwrap();
        assert_eq!(header.kind, GeometryKind::Point);
        assert_eq!(header.prec_xy, 0);
        assert_eq!(header.flags, Flags::default());
        assert!(!header.has_z);
        assert!(!header.has_m);
        assert_eq!(header.axis_count(), 2);
    }

    #[test]
    fn read_precision_nibble() {
        // High nibble 0xE is ZigZag for 7.
        let header = read_header(&[0xE1, 0x00]).unwrap();
        assert_eq!(header.prec_xy, 7);

        // High nibble 1 is ZigZag for -1.
        let header = read_header(&[0x11, 0x00]).unwrap();
        assert_eq!(header.prec_xy, -1);
    }

    #[test]
    fn read_empty_flag() {
        let header = read_header(&[0x03, 0x10]).unwrap();
        assert_eq!(header.kind, GeometryKind::Polygon);
        assert!(header.flags.is_empty());
    }

    #[test]
    fn read_extended_byte_zm() {
        // hasZ | hasM | precZ=1 | precM=3
        let ext = 0x01 | 0x02 | (1 << 2) | (3 << 5);
        let header = read_header(&[0x01, 0x08, ext]).unwrap();
        assert!(header.has_z);
        assert!(header.has_m);
        assert_eq!(header.prec_z, 1);
        assert_eq!(header.prec_m, 3);
        assert_eq!(header.coord_type(), CoordType::Xyzm);
        assert_eq!(header.axis_count(), 4);
    }

    #[test]
    fn read_extended_byte_m_only() {
        // LINESTRING M, precXY 2, precM 3: fixture bytes 42 08 62.
        let header = read_header(&[0x42, 0x08, 0x62]).unwrap();
        assert_eq!(header.kind, GeometryKind::LineString);
        assert_eq!(header.prec_xy, 2);
        assert!(!header.has_z);
        assert!(header.has_m);
        assert_eq!(header.prec_m, 3);
        assert_eq!(header.coord_type(), CoordType::Xym);
    }

    #[test]
    fn unknown_kind_rejected() {
        for code in [0x00u8, 0x08, 0x0F] {
            let err = read_header(&[code, 0x00]).unwrap_err();
            assert!(
                matches!(err, DecodeError::UnknownKind { code: c, offset: 0 } if c == code),
                "code {code:#x}"
            );
        }
    }

    #[test]
    fn short_header_rejected() {
        assert!(matches!(
            read_header(&[]),
            Err(DecodeError::ShortHeader { .. })
        ));
        assert!(matches!(
            read_header(&[0x01]),
            Err(DecodeError::ShortHeader { .. })
        ));
        // Extended flag set but no extended byte.
        assert!(matches!(
            read_header(&[0x01, 0x08]),
            Err(DecodeError::ShortHeader { offset: 2 })
        ));
    }

    #[test]
    fn reserved_bits_ignored() {
        let header = read_header(&[0x01, 0xE0]).unwrap();
        assert_eq!(header.flags, Flags::default());
    }

    #[test]
    fn write_read_roundtrip() {
        let header = Header {
            kind: GeometryKind::MultiPoint,
            prec_xy: -1,
            flags: Flags::from_raw(Flags::BBOX | Flags::EXTENDED),
            has_z: true,
            has_m: true,
            prec_z: 2,
            prec_m: 3,
        };
        let mut out = Vec::new();
        header.write(&mut out);
        assert_eq!(out.len(), 3);
        assert_eq!(read_header(&out).unwrap(), header);
    }

    #[test]
    fn write_known_fixture_prefix() {
        // MULTIPOINT ZM, precXY -1, bbox + extended, precZ 2, precM 3:
        // fixture bytes 14 09 6b.
        let header = Header {
            kind: GeometryKind::MultiPoint,
            prec_xy: -1,
            flags: Flags::from_raw(Flags::BBOX | Flags::EXTENDED),
            has_z: true,
            has_m: true,
            prec_z: 2,
            prec_m: 3,
        };
        let mut out = Vec::new();
        header.write(&mut out);
        assert_eq!(out, vec![0x14, 0x09, 0x6B]);
    }
}
