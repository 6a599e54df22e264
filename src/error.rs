//! Error taxonomy for field-element construction, serialization and batch
//! operations.

use thiserror::Error;

/// Everything that can go wrong while constructing, converting or
/// (de)serializing a field element.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Attempted to invert the additive identity.
    #[error("cannot invert zero")]
    DivisionByZero,

    /// A prefix value does not fit in the number of bits requested.
    #[error("prefix value does not fit in the requested bit width")]
    PrefixDoesNotFit,

    /// A requested prefix bit length is outside the supported range.
    #[error("prefix length {len} is not a valid bit width (expected 1..=7)")]
    PrefixLengthInvalid { len: u8 },

    /// The prefix bits read back from an encoding did not match what the
    /// caller asserted when decoding.
    #[error("prefix mismatch: expected {expected}, found {actual}")]
    PrefixMismatch { expected: u8, actual: u8 },

    /// A 32-byte encoding decoded to an integer `>= p`.
    #[error("value is not a canonical field element: {raw:02x?}")]
    NonCanonical { raw: [u8; 32] },

    /// A field element could not be represented as the requested native type
    /// (out of range, e.g. converting to `u64` or `i64`).
    #[error("value cannot be represented as {type_name}")]
    CannotRepresent { type_name: &'static str },

    /// A read from a byte source returned fewer bytes than requested but more
    /// than zero.
    #[error("expected {bytes_read} bytes, read fewer ({actually_read:?})")]
    IoRead {
        partial_read: bool,
        bytes_read: usize,
        actually_read: Vec<u8>,
    },

    /// A read from a byte source returned zero bytes where at least one was
    /// expected.
    #[error("expected bytes, read none (end of input)")]
    IoReadEof,

    /// A read from a byte source ended before the expected number of bytes
    /// could be produced.
    #[error("unexpected end of input after {bytes_read} bytes")]
    IoReadUnexpectedEof {
        bytes_read: usize,
        actually_read: Vec<u8>,
    },

    /// A write to a byte sink accepted fewer bytes than requested.
    #[error("expected to write {bytes_written} bytes, partial write: {partial_write}")]
    IoWrite {
        partial_write: bool,
        bytes_written: usize,
    },

    /// Batch inversion encountered one or more zero elements in strict mode.
    #[error("batch inversion found {count} zero element(s) at indices {zero_indices:?}")]
    BatchInversionZero { zero_indices: Vec<usize>, count: usize },
}
