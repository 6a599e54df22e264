//! 32-byte, endianness-aware serialization of [`U256`] and [`FieldElement`],
//! with optional sub-byte prefix packing in the most-significant byte.

use crate::constants::MODULUS;
use crate::error::FieldError;
use crate::field::FieldElement;
use crate::u256::U256;
use std::io::{Read, Write};

/// Byte order for the 32-byte on-wire representation. Prefix bits always
/// live inside the most-significant byte of the *numeric* value, regardless
/// of this setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    LittleEndian,
    BigEndian,
}

/// A sub-byte prefix to pack into (or read from) the top bits of an encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitHeader {
    pub prefix_bits: u8,
    pub prefix_len: u8,
}

impl BitHeader {
    /// Panics if `prefix_len > 8` or `prefix_bits >= 2^prefix_len`: these are
    /// invariant violations at the construction site, not user-facing errors.
    pub fn new(prefix_bits: u8, prefix_len: u8) -> Self {
        assert!(prefix_len <= 8, "prefix_len must be in 0..=8, got {prefix_len}");
        let bound = 1u16 << prefix_len;
        assert!(
            (prefix_bits as u16) < bound,
            "prefix_bits {prefix_bits} does not fit in {prefix_len} bits"
        );
        BitHeader { prefix_bits, prefix_len }
    }

    pub const NONE: BitHeader = BitHeader { prefix_bits: 0, prefix_len: 0 };
}

fn order_bytes(be: [u8; 32], order: ByteOrder) -> [u8; 32] {
    match order {
        ByteOrder::BigEndian => be,
        ByteOrder::LittleEndian => {
            let mut le = be;
            le.reverse();
            le
        }
    }
}

fn to_be_bytes(bytes: &[u8; 32], order: ByteOrder) -> [u8; 32] {
    match order {
        ByteOrder::BigEndian => *bytes,
        ByteOrder::LittleEndian => {
            let mut be = *bytes;
            be.reverse();
            be
        }
    }
}

// ---------------------------------------------------------------------------
// Plain (unprefixed) serialization
// ---------------------------------------------------------------------------

pub fn serialize_u256(v: &U256, order: ByteOrder) -> [u8; 32] {
    order_bytes(v.to_bytes_be(), order)
}

pub fn deserialize_u256(bytes: &[u8; 32], order: ByteOrder) -> U256 {
    U256::from_bytes_be(&to_be_bytes(bytes, order))
}

pub fn serialize_field(x: &FieldElement, order: ByteOrder) -> [u8; 32] {
    serialize_u256(&x.to_u256(), order)
}

/// Deserializes a field element, rejecting non-canonical encodings
/// (`value >= p`) with a [`FieldError::NonCanonical`] error.
pub fn deserialize_field(bytes: &[u8; 32], order: ByteOrder) -> Result<FieldElement, FieldError> {
    let v = deserialize_u256(bytes, order);
    if v.compare(&MODULUS) >= 0 {
        return Err(FieldError::NonCanonical { raw: *bytes });
    }
    Ok(FieldElement::from_u256(&v))
}

/// Like [`deserialize_field`], but always returns the reduced value: a
/// non-canonical encoding is reported as a warning-style `Some(error)`
/// alongside the (still valid) reduced field element, rather than losing it.
pub fn deserialize_field_lossy(bytes: &[u8; 32], order: ByteOrder) -> (FieldElement, Option<FieldError>) {
    let v = deserialize_u256(bytes, order);
    let element = FieldElement::from_u256(&v);
    if v.compare(&MODULUS) >= 0 {
        (element, Some(FieldError::NonCanonical { raw: *bytes }))
    } else {
        (element, None)
    }
}

// ---------------------------------------------------------------------------
// Prefix-packed serialization
// ---------------------------------------------------------------------------

fn prefix_mask(prefix_len: u8) -> u8 {
    if prefix_len == 0 {
        0
    } else {
        ((1u16 << prefix_len) - 1) as u8
    }
}

/// Packs `header.prefix_bits` into the top `header.prefix_len` bits of `v`'s
/// most-significant byte. Fails with [`FieldError::PrefixDoesNotFit`] (and
/// writes nothing) if those bits of `v` are not already zero.
pub fn serialize_u256_prefixed(v: &U256, header: BitHeader, order: ByteOrder) -> Result<[u8; 32], FieldError> {
    let max_bits = 256 - header.prefix_len as u32;
    if v.bit_length() > max_bits {
        return Err(FieldError::PrefixDoesNotFit);
    }
    let mut be = v.to_bytes_be();
    let shift = 8 - header.prefix_len;
    be[0] |= header.prefix_bits << shift;
    Ok(order_bytes(be, order))
}

/// Reads back a prefix-packed encoding, returning the cleared value and the
/// prefix bits that were stored.
pub fn deserialize_u256_prefixed_get(bytes: &[u8; 32], prefix_len: u8, order: ByteOrder) -> (U256, u8) {
    let mut be = to_be_bytes(bytes, order);
    let shift = 8 - prefix_len;
    let mask = prefix_mask(prefix_len);
    let prefix_bits = if prefix_len == 0 { 0 } else { (be[0] >> shift) & mask };
    if prefix_len > 0 {
        be[0] &= !(mask << shift);
    }
    (U256::from_bytes_be(&be), prefix_bits)
}

/// Like [`deserialize_u256_prefixed_get`], but fails with
/// [`FieldError::PrefixMismatch`] if the stored prefix differs from `expected`.
pub fn deserialize_u256_prefixed_expect(
    bytes: &[u8; 32],
    expected: BitHeader,
    order: ByteOrder,
) -> Result<U256, FieldError> {
    let (v, actual) = deserialize_u256_prefixed_get(bytes, expected.prefix_len, order);
    if actual != expected.prefix_bits {
        return Err(FieldError::PrefixMismatch { expected: expected.prefix_bits, actual });
    }
    Ok(v)
}

pub fn serialize_field_prefixed(x: &FieldElement, header: BitHeader, order: ByteOrder) -> Result<[u8; 32], FieldError> {
    serialize_u256_prefixed(&x.to_u256(), header, order)
}

pub fn deserialize_field_prefixed_get(
    bytes: &[u8; 32],
    prefix_len: u8,
    order: ByteOrder,
) -> Result<(FieldElement, u8), FieldError> {
    let (v, prefix) = deserialize_u256_prefixed_get(bytes, prefix_len, order);
    if v.compare(&MODULUS) >= 0 {
        return Err(FieldError::NonCanonical { raw: *bytes });
    }
    Ok((FieldElement::from_u256(&v), prefix))
}

pub fn deserialize_field_prefixed_expect(
    bytes: &[u8; 32],
    expected: BitHeader,
    order: ByteOrder,
) -> Result<FieldElement, FieldError> {
    let v = deserialize_u256_prefixed_expect(bytes, expected, order)?;
    if v.compare(&MODULUS) >= 0 {
        return Err(FieldError::NonCanonical { raw: *bytes });
    }
    Ok(FieldElement::from_u256(&v))
}

// ---------------------------------------------------------------------------
// Byte-level IO (wraps a caller-supplied `Read`/`Write`)
// ---------------------------------------------------------------------------

fn read_exact_32(r: &mut impl Read) -> Result<[u8; 32], FieldError> {
    let mut buf = [0u8; 32];
    let mut total = 0usize;
    while total < 32 {
        match r.read(&mut buf[total..]) {
            Ok(0) => {
                return if total == 0 {
                    Err(FieldError::IoReadEof)
                } else {
                    Err(FieldError::IoReadUnexpectedEof { bytes_read: total, actually_read: buf[..total].to_vec() })
                };
            }
            Ok(n) => total += n,
            Err(_) => {
                return Err(FieldError::IoRead {
                    partial_read: total != 0 && total != 32,
                    bytes_read: total,
                    actually_read: buf[..total].to_vec(),
                });
            }
        }
    }
    Ok(buf)
}

fn write_exact_32(w: &mut impl Write, bytes: &[u8; 32]) -> Result<(), FieldError> {
    let mut total = 0usize;
    while total < 32 {
        match w.write(&bytes[total..]) {
            Ok(0) => {
                return Err(FieldError::IoWrite { partial_write: total != 0 && total != 32, bytes_written: total });
            }
            Ok(n) => total += n,
            Err(_) => {
                return Err(FieldError::IoWrite { partial_write: total != 0 && total != 32, bytes_written: total });
            }
        }
    }
    Ok(())
}

pub fn write_u256<W: Write>(w: &mut W, v: &U256, order: ByteOrder) -> Result<(), FieldError> {
    write_exact_32(w, &serialize_u256(v, order))
}

pub fn read_u256<R: Read>(r: &mut R, order: ByteOrder) -> Result<U256, FieldError> {
    let bytes = read_exact_32(r)?;
    Ok(deserialize_u256(&bytes, order))
}

pub fn write_field<W: Write>(w: &mut W, x: &FieldElement, order: ByteOrder) -> Result<(), FieldError> {
    write_exact_32(w, &serialize_field(x, order))
}

pub fn read_field<R: Read>(r: &mut R, order: ByteOrder) -> Result<FieldElement, FieldError> {
    let bytes = read_exact_32(r)?;
    deserialize_field(&bytes, order)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_roundtrip_both_orders() {
        let v = U256::from_raw([1, 2, 3, 4]);
        for order in [ByteOrder::LittleEndian, ByteOrder::BigEndian] {
            let bytes = serialize_u256(&v, order);
            assert_eq!(deserialize_u256(&bytes, order), v);
        }
    }

    #[test]
    fn field_rejects_non_canonical() {
        let bytes = serialize_u256(&MODULUS, ByteOrder::LittleEndian);
        assert_eq!(
            deserialize_field(&bytes, ByteOrder::LittleEndian),
            Err(FieldError::NonCanonical { raw: bytes })
        );
    }

    #[test]
    fn field_lossy_still_returns_reduced_value() {
        let bytes = serialize_u256(&MODULUS, ByteOrder::LittleEndian);
        let (element, err) = deserialize_field_lossy(&bytes, ByteOrder::LittleEndian);
        assert!(element.is_zero());
        assert!(err.is_some());
    }

    #[test]
    fn prefix_roundtrip() {
        let header = BitHeader::new(0b101, 3);
        let v = U256::from_raw([42, 0, 0, 0]);
        let bytes = serialize_u256_prefixed(&v, header, ByteOrder::BigEndian).unwrap();
        let (back, prefix) = deserialize_u256_prefixed_get(&bytes, 3, ByteOrder::BigEndian);
        assert_eq!(back, v);
        assert_eq!(prefix, 0b101);
    }

    #[test]
    fn prefix_mismatch_is_detected() {
        let header = BitHeader::new(0b11, 2);
        let v = U256::from_raw([7, 0, 0, 0]);
        let bytes = serialize_u256_prefixed(&v, header, ByteOrder::LittleEndian).unwrap();
        let wrong = BitHeader::new(0b01, 2);
        assert_eq!(
            deserialize_u256_prefixed_expect(&bytes, wrong, ByteOrder::LittleEndian),
            Err(FieldError::PrefixMismatch { expected: 0b01, actual: 0b11 })
        );
    }

    #[test]
    fn prefix_does_not_fit_when_top_bits_set() {
        let header = BitHeader::new(1, 1);
        let v = MODULUS; // top bit definitely set
        assert_eq!(serialize_u256_prefixed(&v, header, ByteOrder::BigEndian), Err(FieldError::PrefixDoesNotFit));
    }

    #[test]
    #[should_panic]
    fn bit_header_rejects_oversized_prefix() {
        BitHeader::new(4, 2); // 4 does not fit in 2 bits
    }

    #[test]
    fn read_write_roundtrip_over_a_vec() {
        let v = U256::from_raw([9, 8, 7, 6]);
        let mut buf = Vec::new();
        write_u256(&mut buf, &v, ByteOrder::LittleEndian).unwrap();
        assert_eq!(buf.len(), 32);
        let mut cursor = &buf[..];
        assert_eq!(read_u256(&mut cursor, ByteOrder::LittleEndian).unwrap(), v);
    }

    #[test]
    fn read_reports_eof_on_empty_input() {
        let mut cursor: &[u8] = &[];
        assert_eq!(read_u256(&mut cursor, ByteOrder::LittleEndian), Err(FieldError::IoReadEof));
    }

    #[test]
    fn read_reports_unexpected_eof_on_short_input() {
        let mut cursor: &[u8] = &[1, 2, 3];
        match read_u256(&mut cursor, ByteOrder::LittleEndian) {
            Err(FieldError::IoReadUnexpectedEof { bytes_read, actually_read }) => {
                assert_eq!(bytes_read, 3);
                assert_eq!(actually_read, vec![1, 2, 3]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
