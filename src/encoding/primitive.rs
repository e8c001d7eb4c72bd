//! # Fixed-Width Binary Primitives
//!
//! Little-endian codecs for every fixed-width scalar RowBinary carries:
//! two's-complement signed integers, unsigned integers, IEEE-754 floats,
//! and the 256-bit wide integers that exceed native widths and are
//! exposed in memory as `num_bigint::BigInt`.
//!
//! | Width | In-memory type | Wire layout |
//! |-------|----------------|-------------|
//! | 8..64 | native `iN`/`uN` | N/8 bytes LE |
//! | 128 | `i128`/`u128` | 16 bytes LE |
//! | 256 | `BigInt` | 32 bytes LE two's-complement / unsigned |
//! | 32/64 float | `f32`/`f64` | IEEE-754 LE |
//!
//! Encode-side range checks fail with `Error::Overflow` when a `BigInt`
//! does not fit its declared 256-bit slot; decode never fails except on
//! short input.

use crate::error::{Error, Result};
use crate::io::{ByteInput, ByteOutput};
use num_bigint::{BigInt, Sign};

macro_rules! fixed_codec {
    ($read:ident, $write:ident, $ty:ty) => {
        pub fn $read<I: ByteInput + ?Sized>(input: &mut I) -> Result<$ty> {
            let mut buf = [0u8; std::mem::size_of::<$ty>()];
            input.read_bytes(&mut buf)?;
            Ok(<$ty>::from_le_bytes(buf))
        }

        pub fn $write<O: ByteOutput + ?Sized>(value: $ty, out: &mut O) -> Result<()> {
            out.write_bytes(&value.to_le_bytes())
        }
    };
}

fixed_codec!(read_i8, write_i8, i8);
fixed_codec!(read_i16, write_i16, i16);
fixed_codec!(read_i32, write_i32, i32);
fixed_codec!(read_i64, write_i64, i64);
fixed_codec!(read_i128, write_i128, i128);
fixed_codec!(read_u16, write_u16, u16);
fixed_codec!(read_u32, write_u32, u32);
fixed_codec!(read_u64, write_u64, u64);
fixed_codec!(read_u128, write_u128, u128);
fixed_codec!(read_f32, write_f32, f32);
fixed_codec!(read_f64, write_f64, f64);

pub fn read_u8<I: ByteInput + ?Sized>(input: &mut I) -> Result<u8> {
    input.read_byte()
}

pub fn write_u8<O: ByteOutput + ?Sized>(value: u8, out: &mut O) -> Result<()> {
    out.write_byte(value)
}

/// Reads a 256-bit signed integer (32 bytes, LE two's-complement).
pub fn read_i256<I: ByteInput + ?Sized>(input: &mut I) -> Result<BigInt> {
    let mut buf = [0u8; 32];
    input.read_bytes(&mut buf)?;
    Ok(BigInt::from_signed_bytes_le(&buf))
}

/// Writes a 256-bit signed integer, failing if `value` needs more than
/// 256 bits.
pub fn write_i256<O: ByteOutput + ?Sized>(value: &BigInt, out: &mut O) -> Result<()> {
    let bytes = value.to_signed_bytes_le();
    if bytes.len() > 32 {
        return Err(Error::Overflow {
            value: value.to_string(),
            target: "Int256",
        });
    }
    let mut buf = [if value.sign() == Sign::Minus { 0xFF } else { 0x00 }; 32];
    buf[..bytes.len()].copy_from_slice(&bytes);
    out.write_bytes(&buf)
}

/// Reads a 256-bit unsigned integer (32 bytes, LE).
pub fn read_u256<I: ByteInput + ?Sized>(input: &mut I) -> Result<BigInt> {
    let mut buf = [0u8; 32];
    input.read_bytes(&mut buf)?;
    Ok(BigInt::from_bytes_le(Sign::Plus, &buf))
}

/// Writes a 256-bit unsigned integer, failing on negatives and on values
/// wider than 256 bits.
pub fn write_u256<O: ByteOutput + ?Sized>(value: &BigInt, out: &mut O) -> Result<()> {
    if value.sign() == Sign::Minus {
        return Err(Error::Overflow {
            value: value.to_string(),
            target: "UInt256",
        });
    }
    let (_, bytes) = value.to_bytes_le();
    if bytes.len() > 32 {
        return Err(Error::Overflow {
            value: value.to_string(),
            target: "UInt256",
        });
    }
    let mut buf = [0u8; 32];
    buf[..bytes.len()].copy_from_slice(&bytes);
    out.write_bytes(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int32_max_is_ff_ff_ff_7f() {
        let mut buf = Vec::new();
        write_i32(i32::MAX, &mut buf).unwrap();
        assert_eq!(buf, vec![0xFF, 0xFF, 0xFF, 0x7F]);

        let mut input: &[u8] = &buf;
        assert_eq!(read_i32(&mut input).unwrap(), 2147483647);
    }

    #[test]
    fn signed_roundtrip_extremes() {
        for value in [i64::MIN, -1, 0, 1, i64::MAX] {
            let mut buf = Vec::new();
            write_i64(value, &mut buf).unwrap();
            let mut input: &[u8] = &buf;
            assert_eq!(read_i64(&mut input).unwrap(), value);
        }
    }

    #[test]
    fn u128_little_endian_layout() {
        let mut buf = Vec::new();
        write_u128(1, &mut buf).unwrap();
        assert_eq!(buf.len(), 16);
        assert_eq!(buf[0], 1);
        assert!(buf[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn float_bit_patterns_preserved() {
        for value in [0.0f64, -0.0, 1.5, f64::MIN, f64::MAX, f64::NAN] {
            let mut buf = Vec::new();
            write_f64(value, &mut buf).unwrap();
            let mut input: &[u8] = &buf;
            let back = read_f64(&mut input).unwrap();
            assert_eq!(back.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn i256_roundtrip_negative() {
        let value = BigInt::from(-1234567890123456789i64) * BigInt::from(1_000_000_000u64);
        let mut buf = Vec::new();
        write_i256(&value, &mut buf).unwrap();
        assert_eq!(buf.len(), 32);
        let mut input: &[u8] = &buf;
        assert_eq!(read_i256(&mut input).unwrap(), value);
    }

    #[test]
    fn i256_sign_extension_fills_high_bytes() {
        let mut buf = Vec::new();
        write_i256(&BigInt::from(-1), &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn u256_rejects_negative_and_oversized() {
        let mut buf = Vec::new();
        let err = write_u256(&BigInt::from(-1), &mut buf).unwrap_err();
        assert!(matches!(err, Error::Overflow { target: "UInt256", .. }));

        let too_big = BigInt::from(1) << 256;
        let err = write_u256(&too_big, &mut buf).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
        let err = write_i256(&too_big, &mut buf).unwrap_err();
        assert!(matches!(err, Error::Overflow { .. }));
    }

    #[test]
    fn u256_roundtrip_large() {
        let value = (BigInt::from(1) << 255) + BigInt::from(17);
        let mut buf = Vec::new();
        write_u256(&value, &mut buf).unwrap();
        let mut input: &[u8] = &buf;
        assert_eq!(read_u256(&mut input).unwrap(), value);
    }
}
