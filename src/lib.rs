//! Finite-field arithmetic for the Bandersnatch base field: the scalar field
//! of BLS12-381, `p = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001`.
//!
//! [`FieldElement`] is the public type; everything below [`u256`]/[`u512`] is
//! plain fixed-width integer arithmetic with no notion of the modulus, and
//! [`modular`]/[`montgomery`] bridge the two. [`FieldElement`] also
//! implements [`ff::Field`]/[`ff::PrimeField`] so curve-point code written
//! against that trait family can use this crate as a drop-in scalar field.

#![forbid(unsafe_code)]

pub(crate) mod arithmetic;
pub mod batch;
pub mod constants;
pub mod error;
pub mod field;
pub mod modular;
pub(crate) mod montgomery;
pub mod serialize;
pub(crate) mod sqrt;
pub mod u256;
pub mod u512;

pub use batch::{batch_invert, batch_invert_skip_zeros, product_slice, sum_slice};
pub use error::FieldError;
pub use field::FieldElement;
pub use serialize::{BitHeader, ByteOrder};
pub use u256::U256;
pub use u512::U512;
