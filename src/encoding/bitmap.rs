//! # Compact Integer-Set (Bitmap) Codec
//!
//! Binary state codec for `AggregateFunction(groupBitmap, T)` columns:
//! a set of unsigned integers whose element width (1/2/4/8 bytes) comes
//! from the declared base type `T`.
//!
//! ## Wire Format
//!
//! ```text
//! +------+----------------------------------------------------+
//! | 0x00 | u8 cardinality, then cardinality elements (LE)     |  small set
//! +------+----------------------------------------------------+
//! | 0x01 | varint payload length, then Roaring serialization  |  bitmap
//! +------+----------------------------------------------------+
//! ```
//!
//! Sets of up to 32 elements use the small-set form; the empty set is
//! therefore always the fixed two-byte sequence `00 00`. Larger sets use
//! the portable Roaring serialization: `RoaringBitmap` for widths up to
//! 32 bits, `RoaringTreemap` for 64-bit elements.

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::io::{ByteInput, ByteOutput};
use crate::types::DataType;
use roaring::{RoaringBitmap, RoaringTreemap};

use super::varint::{read_varint, write_varint};

/// Largest set encoded in the small-set form.
const SMALL_SET_MAX: u64 = 32;

/// Element width in bytes for a bitmap base type.
pub fn element_width(base: DataType) -> Result<usize> {
    match base {
        DataType::Int8 | DataType::UInt8 => Ok(1),
        DataType::Int16 | DataType::UInt16 => Ok(2),
        DataType::Int32 | DataType::UInt32 => Ok(4),
        DataType::Int64 | DataType::UInt64 => Ok(8),
        other => Err(Error::UnknownType(format!(
            "groupBitmap over {}",
            other.name()
        ))),
    }
}

/// In-memory bitmap state: 32-bit universe for element widths 1/2/4,
/// 64-bit universe for width 8.
#[derive(Debug, Clone, PartialEq)]
pub enum Bitmap {
    Bits32(RoaringBitmap),
    Bits64(RoaringTreemap),
}

impl Bitmap {
    /// Empty bitmap sized for the given base type.
    pub fn for_base(base: DataType) -> Result<Bitmap> {
        Ok(if element_width(base)? == 8 {
            Bitmap::Bits64(RoaringTreemap::new())
        } else {
            Bitmap::Bits32(RoaringBitmap::new())
        })
    }

    pub fn cardinality(&self) -> u64 {
        match self {
            Bitmap::Bits32(bits) => bits.len(),
            Bitmap::Bits64(bits) => bits.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    pub fn insert(&mut self, value: u64) -> Result<()> {
        match self {
            Bitmap::Bits32(bits) => {
                let narrow = u32::try_from(value).map_err(|_| Error::Overflow {
                    value: value.to_string(),
                    target: "32-bit bitmap element",
                })?;
                bits.insert(narrow);
            }
            Bitmap::Bits64(bits) => {
                bits.insert(value);
            }
        }
        Ok(())
    }

    pub fn contains(&self, value: u64) -> bool {
        match self {
            Bitmap::Bits32(bits) => u32::try_from(value).is_ok_and(|v| bits.contains(v)),
            Bitmap::Bits64(bits) => bits.contains(value),
        }
    }

    /// Set members in ascending order, widened to u64.
    pub fn to_vec(&self) -> Vec<u64> {
        match self {
            Bitmap::Bits32(bits) => bits.iter().map(u64::from).collect(),
            Bitmap::Bits64(bits) => bits.iter().collect(),
        }
    }
}

/// Decodes one bitmap state for the given base type. The serialized
/// payload length is capped by the configured buffer ceiling like every
/// other decoded length prefix.
pub fn read_bitmap<I: ByteInput + ?Sized>(
    input: &mut I,
    base: DataType,
    config: &CodecConfig,
) -> Result<Bitmap> {
    let width = element_width(base)?;
    let flag = input.read_byte()?;
    match flag {
        0 => {
            let cardinality = input.read_byte()? as usize;
            let mut bitmap = Bitmap::for_base(base)?;
            let mut buf = [0u8; 8];
            for _ in 0..cardinality {
                buf = [0u8; 8];
                input.read_bytes(&mut buf[..width])?;
                bitmap.insert(u64::from_le_bytes(buf))?;
            }
            Ok(bitmap)
        }
        1 => {
            let length = config.check_length(read_varint(input)?)?;
            let mut payload = vec![0u8; length];
            input.read_bytes(&mut payload)?;
            if width == 8 {
                let bits = RoaringTreemap::deserialize_from(&payload[..])
                    .map_err(|e| Error::io("deserializing 64-bit bitmap state", e))?;
                Ok(Bitmap::Bits64(bits))
            } else {
                let bits = RoaringBitmap::deserialize_from(&payload[..])
                    .map_err(|e| Error::io("deserializing bitmap state", e))?;
                Ok(Bitmap::Bits32(bits))
            }
        }
        other => Err(Error::Conversion {
            from: "bitmap state",
            to: format!("unrecognized format flag {other}"),
        }),
    }
}

/// Encodes one bitmap state for the given base type.
pub fn write_bitmap<O: ByteOutput + ?Sized>(
    bitmap: &Bitmap,
    base: DataType,
    out: &mut O,
) -> Result<()> {
    let width = element_width(base)?;
    let max = if width == 8 {
        u64::MAX
    } else {
        (1u64 << (width * 8)) - 1
    };

    if bitmap.cardinality() <= SMALL_SET_MAX {
        out.write_byte(0)?;
        out.write_byte(bitmap.cardinality() as u8)?;
        for value in bitmap.to_vec() {
            if value > max {
                return Err(Error::Overflow {
                    value: value.to_string(),
                    target: "bitmap element width",
                });
            }
            out.write_bytes(&value.to_le_bytes()[..width])?;
        }
        return Ok(());
    }

    out.write_byte(1)?;
    let mut payload = Vec::new();
    match bitmap {
        Bitmap::Bits32(bits) => bits
            .serialize_into(&mut payload)
            .map_err(|e| Error::io("serializing bitmap state", e))?,
        Bitmap::Bits64(bits) => bits
            .serialize_into(&mut payload)
            .map_err(|e| Error::io("serializing 64-bit bitmap state", e))?,
    }
    write_varint(payload.len() as u64, out)?;
    out.write_bytes(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_two_zero_bytes() {
        let bitmap = Bitmap::for_base(DataType::UInt32).unwrap();
        let mut buf = Vec::new();
        write_bitmap(&bitmap, DataType::UInt32, &mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x00]);

        let mut input: &[u8] = &buf;
        let back = read_bitmap(&mut input, DataType::UInt32, &CodecConfig::default()).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn small_set_uses_declared_width() {
        let mut bitmap = Bitmap::for_base(DataType::UInt16).unwrap();
        bitmap.insert(1).unwrap();
        bitmap.insert(0x0203).unwrap();

        let mut buf = Vec::new();
        write_bitmap(&bitmap, DataType::UInt16, &mut buf).unwrap();
        // flag, cardinality, then two 2-byte LE elements in ascending order
        assert_eq!(buf, vec![0x00, 0x02, 0x01, 0x00, 0x03, 0x02]);

        let mut input: &[u8] = &buf;
        assert_eq!(
            read_bitmap(&mut input, DataType::UInt16, &CodecConfig::default()).unwrap(),
            bitmap
        );
    }

    #[test]
    fn large_set_roundtrips_via_roaring() {
        let mut bitmap = Bitmap::for_base(DataType::UInt32).unwrap();
        for value in 0..1000u64 {
            bitmap.insert(value * 7).unwrap();
        }

        let mut buf = Vec::new();
        write_bitmap(&bitmap, DataType::UInt32, &mut buf).unwrap();
        assert_eq!(buf[0], 0x01);

        let mut input: &[u8] = &buf;
        let back = read_bitmap(&mut input, DataType::UInt32, &CodecConfig::default()).unwrap();
        assert_eq!(back, bitmap);
        assert_eq!(back.cardinality(), 1000);
    }

    #[test]
    fn sixty_four_bit_elements_roundtrip() {
        let mut bitmap = Bitmap::for_base(DataType::UInt64).unwrap();
        bitmap.insert(u64::MAX).unwrap();
        bitmap.insert(0).unwrap();
        for value in 0..100u64 {
            bitmap.insert(value << 33).unwrap();
        }

        let mut buf = Vec::new();
        write_bitmap(&bitmap, DataType::UInt64, &mut buf).unwrap();
        let mut input: &[u8] = &buf;
        let back = read_bitmap(&mut input, DataType::UInt64, &CodecConfig::default()).unwrap();
        assert_eq!(back, bitmap);
        assert!(back.contains(u64::MAX));
    }

    #[test]
    fn claimed_payload_length_is_capped_before_allocation() {
        let mut buf = vec![0x01];
        write_varint(1 << 30, &mut buf).unwrap();

        let config = CodecConfig::new().with_max_buffer_size(16);
        let mut input: &[u8] = &buf;
        let err = read_bitmap(&mut input, DataType::UInt32, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::BufferLimit {
                length: 1_073_741_824,
                limit: 16,
            }
        ));
    }

    #[test]
    fn narrow_bitmap_rejects_wide_elements() {
        let mut bitmap = Bitmap::for_base(DataType::UInt8).unwrap();
        bitmap.insert(300).unwrap();

        let mut buf = Vec::new();
        let err = write_bitmap(&bitmap, DataType::UInt8, &mut buf).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
    }

    #[test]
    fn non_integer_base_is_rejected() {
        assert!(element_width(DataType::String).is_err());
        assert!(Bitmap::for_base(DataType::Float64).is_err());
    }
}
