//! Bit-exact constants for the Bandersnatch/BLS12-381 scalar field.
//!
//! `p = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001`
//!
//! All Montgomery-form constants below are the Montgomery representation
//! (`value * R mod p`) of the named mathematical value, matching the storage
//! convention of [`crate::field::FieldElement`].

use crate::u256::U256;

/// The field modulus, in plain (non-Montgomery) form.
pub const MODULUS: U256 = U256::from_raw([
    0xffffffff00000001,
    0x53bda402fffe5bfe,
    0x3339d80809a1d805,
    0x73eda753299d7d48,
]);

/// `INV = -(p^-1 mod 2^64) mod 2^64`, the Montgomery reduction constant.
pub const INV: u64 = 0xffff_fffe_ffff_ffff;

/// `R = 2^256 mod p`; also the Montgomery representation of the field element `1`.
pub const R: U256 = U256::from_raw([
    0x00000001fffffffe,
    0x5884b7fa00034802,
    0x998c4fefecbc4ff5,
    0x1824b159acc5056f,
]);

/// `R^2 = 2^512 mod p`, used to move plain values into Montgomery form.
pub const R2: U256 = U256::from_raw([
    0xc999e990f3f29c6d,
    0x2b6cedcb87925c23,
    0x05d314967254398f,
    0x0748d9d99f59ff11,
]);

/// `R^3 = 2^768 mod p`.
pub const R3: U256 = U256::from_raw([
    0xc62c1807439b73af,
    0x1b3e0d188cf06990,
    0x73d13c71c7b5f418,
    0x6e2a5bb9c8db33e9,
]);

/// Precomputed 320-bit (5-limb) Barrett reciprocal `floor(2^512 / p)`.
pub const BARRETT_MU: [u64; 5] = [
    0x42737a020c0d6393,
    0x65043eb4be4bad71,
    0x38b5dcb707e08ed3,
    0x355094edfede377c,
    0x2,
];

/// 2-adicity of `p - 1`.
pub const S: u32 = 32;

/// Block size used by the small-subgroup discrete-log table in [`crate::sqrt`].
pub const BLOCK_SIZE: u32 = 8;

/// `m`, the odd part of `p - 1 = 2^S * m`.
pub const M: U256 = U256::from_raw([
    0xfffe5bfeffffffff,
    0x09a1d80553bda402,
    0x299d7d483339d808,
    0x0000000073eda753,
]);

/// `(m + 1) / 2`, the exponent used to compute the Tonelli-Shanks candidate root.
pub const M_PLUS_ONE_OVER_TWO: U256 = U256::from_raw([
    0x7fff2dff80000000,
    0x04d0ec02a9ded201,
    0x94cebea4199cec04,
    0x0000000039f6d3a9,
]);

/// `GENERATOR = 7`, a primitive root of the field, in Montgomery form.
pub const GENERATOR: U256 = U256::from_raw([
    0x0000000efffffff1,
    0x17e363d300189c0f,
    0xff9c57876f8457b0,
    0x351332208fc5a8c4,
]);

/// `1/2 mod p`, in Montgomery form.
pub const TWO_INV: U256 = U256::from_raw([
    0x00000000ffffffff,
    0xac425bfd0001a401,
    0xccc627f7f65e27fa,
    0x0c1258acd66282b7,
]);

/// A primitive `2^S`-th root of unity, in Montgomery form (`GENERATOR^m`).
pub const ROOT_OF_UNITY: U256 = U256::from_raw([
    0xb9b58d8c5f0e466a,
    0x5b1b4c801819d7ec,
    0x0af53ae352a31e64,
    0x5bf3adda19e9b27b,
]);

/// `1 / ROOT_OF_UNITY mod p`, in Montgomery form.
pub const ROOT_OF_UNITY_INV: U256 = U256::from_raw([
    0x4256481adcf3219a,
    0x45f37b7f96b6cad3,
    0xf9c3f1d75f7a3b27,
    0x2d2fc049658afd43,
]);

/// `GENERATOR^(2^S)`, a generator of the odd-order (`m`) subgroup, in Montgomery form.
pub const DELTA: U256 = U256::from_raw([
    0x70e310d3d146f96a,
    0x4b64c08919e299e6,
    0x51e114186a8b970d,
    0x6185d06627c067cb,
]);

pub const MODULUS_STR: &str =
    "0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001";
