//! Modular reduction routines over [`U256`], tiered by the reducedness contract
//! they accept and produce (see `SPEC_FULL.md` §3 for the `Reduced_a/b/c/f`
//! hierarchy). Function names advertise their contract: `reduce_ca` takes
//! `Reduced_a` and produces `Reduced_c`, `add_and_reduce_bc` takes `Reduced_b`
//! inputs and produces a `Reduced_c` output, and so on.

use crate::arithmetic::{adc, mac, sbb};
use crate::constants::{BARRETT_MU, MODULUS};
use crate::u256::U256;
use crate::u512::U512;
use num_bigint::BigInt;
use num_integer::Integer;

/// `Reduced_a -> Reduced_c`: subtracts `p` at most twice. For this field's
/// modulus, `floor(2^256 / p) == 2`, so two conditional subtractions are always
/// enough to land below `p` itself (a stronger guarantee than `Reduced_c`
/// strictly requires, but cheap to provide).
pub fn reduce_ca(x: &U256) -> U256 {
    let mut r = *x;
    if r.geq(&MODULUS) {
        r = r.sub(&MODULUS);
    }
    if r.geq(&MODULUS) {
        r = r.sub(&MODULUS);
    }
    r
}

/// `Reduced_b -> Reduced_f`: a single conditional subtraction, valid only when
/// the input is already known to be `< 2p`.
pub fn reduce_fb(x: &U256) -> U256 {
    if x.geq(&MODULUS) {
        x.sub(&MODULUS)
    } else {
        *x
    }
}

/// `Reduced_b -> Reduced_c`: addition of two `Reduced_b` values followed by the
/// tiered reduction that Montgomery multiplication relies on to avoid a full
/// canonicalization after every step.
pub fn add_and_reduce_bc(x: &U256, y: &U256) -> U256 {
    reduce_ca(&x.add(y))
}

/// `Reduced_a -> Reduced_f` via Barrett reduction, using the precomputed
/// 320-bit reciprocal [`BARRETT_MU`].
pub fn reduce_barrett_fa(x: &U256) -> U256 {
    let wide = U512::from_u256(x);
    let approx = barrett_reduce_512(&wide);
    finish_reduction_5limb(approx)
}

/// Reduces an arbitrary `U512` modulo `p`, returning a value that fits in 256
/// bits (`Reduced_a`) but is not necessarily canonical.
pub fn reduce_u512_to_u256_a(x: &U512) -> U256 {
    let approx = barrett_reduce_512(x);
    // `approx` is already guaranteed < 3p (see `barrett_reduce_512`), which is
    // comfortably inside 256 bits for this modulus; one more conditional
    // subtraction below is enough to additionally land in `Reduced_a` (trivial)
    // while staying cheap. Callers that need full canonicalization should
    // follow with `reduce_ca`/`reduce_fb`.
    let mut r = approx;
    while limbs5_geq(&r, &pad5(&MODULUS)) {
        r = sub5(&r, &pad5(&MODULUS));
    }
    U256::from_raw([r[0], r[1], r[2], r[3]])
}

/// Core Barrett reduction (HAC 14.42) for a 512-bit input against this
/// field's 4-limb modulus and 5-limb reciprocal. Returns a 5-limb value
/// guaranteed to be `< 3p`.
fn barrett_reduce_512(x: &U512) -> [u64; 5] {
    // q1 = x >> 192 (drop the low 3 limbs), up to 320 bits.
    let q1 = [x.0[3], x.0[4], x.0[5], x.0[6], x.0[7]];
    // q2 = q1 * mu, up to 320 + 258 = 578 bits (10 limbs).
    let q2 = mul5x5(&q1, &BARRETT_MU);
    // q3 = q2 >> 320 (drop the low 5 limbs).
    let q3 = [q2[5], q2[6], q2[7], q2[8], q2[9]];
    // r2 = (q3 * p) mod 2^320 (low 5 limbs of the product).
    let r2_full = mul5x4(&q3, &MODULUS.0);
    let r2 = [r2_full[0], r2_full[1], r2_full[2], r2_full[3], r2_full[4]];
    // r1 = x mod 2^320 (low 5 limbs of x).
    let r1 = [x.0[0], x.0[1], x.0[2], x.0[3], x.0[4]];
    // r = r1 - r2 (mod 2^320); plain 5-limb wrapping subtraction already
    // computes the correct non-negative residue modulo 2^320.
    sub5(&r1, &r2)
}

/// Bounded cleanup after Barrett reduction: HAC guarantees at most two
/// subtractions of `p` remain once `r < 3p`; we loop defensively in case of
/// a slightly looser bound and assert it terminates quickly.
fn finish_reduction_5limb(mut r: [u64; 5]) -> U256 {
    let m5 = pad5(&MODULUS);
    let mut iterations = 0;
    while limbs5_geq(&r, &m5) {
        r = sub5(&r, &m5);
        iterations += 1;
        debug_assert!(iterations <= 4, "Barrett reduction did not converge");
    }
    U256::from_raw([r[0], r[1], r[2], r[3]])
}

fn pad5(x: &U256) -> [u64; 5] {
    [x.0[0], x.0[1], x.0[2], x.0[3], 0]
}

fn limbs5_geq(a: &[u64; 5], b: &[u64; 5]) -> bool {
    for i in (0..5).rev() {
        if a[i] != b[i] {
            return a[i] > b[i];
        }
    }
    true
}

fn sub5(a: &[u64; 5], b: &[u64; 5]) -> [u64; 5] {
    let mut r = [0u64; 5];
    let mut borrow = 0u64;
    for i in 0..5 {
        let (v, bo) = sbb(a[i], b[i], borrow);
        r[i] = v;
        borrow = bo;
    }
    r
}

fn mul5x5(a: &[u64; 5], b: &[u64; 5]) -> [u64; 10] {
    let mut r = [0u64; 10];
    for (i, &ai) in a.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &bj) in b.iter().enumerate() {
            let (v, c) = mac(r[i + j], ai, bj, carry);
            r[i + j] = v;
            carry = c;
        }
        r[i + 5] = adc(r[i + 5], carry, 0).0;
    }
    r
}

fn mul5x4(a: &[u64; 5], b: &[u64; 4]) -> [u64; 9] {
    let mut r = [0u64; 9];
    for (i, &ai) in a.iter().enumerate() {
        let mut carry = 0u64;
        for (j, &bj) in b.iter().enumerate() {
            let (v, c) = mac(r[i + j], ai, bj, carry);
            r[i + j] = v;
            carry = c;
        }
        r[i + 4] = adc(r[i + 4], carry, 0).0;
    }
    r
}

fn u256_to_bigint(x: &U256) -> BigInt {
    let bytes = x.to_bytes_le();
    BigInt::from_bytes_le(num_bigint::Sign::Plus, &bytes)
}

fn bigint_to_u256_mod_p(x: &BigInt) -> U256 {
    let modulus = u256_to_bigint(&MODULUS);
    let reduced = x.mod_floor(&modulus);
    let (_, bytes) = reduced.to_bytes_le();
    let mut buf = [0u8; 32];
    buf[..bytes.len().min(32)].copy_from_slice(&bytes[..bytes.len().min(32)]);
    U256::from_bytes_le(&buf)
}

/// Modular inverse of `x` modulo `p`, via the extended Euclidean algorithm
/// (delegated to `num-bigint`/`num-integer`, the crate's one sanctioned use of
/// an arbitrary-precision integer type). Returns `None` iff `x ≡ 0 (mod p)`.
pub fn mod_inverse(x: &U256) -> Option<U256> {
    if x.is_zero() {
        return None;
    }
    let modulus = u256_to_bigint(&MODULUS);
    let a = u256_to_bigint(x);
    let egcd = a.extended_gcd(&modulus);
    if egcd.gcd != BigInt::from(1) {
        return None;
    }
    Some(bigint_to_u256_mod_p(&egcd.x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::u256::U256;

    #[test]
    fn reduce_ca_brings_max_value_below_modulus() {
        let max = U256::from_raw([u64::MAX; 4]);
        let r = reduce_ca(&max);
        assert!(r.compare(&MODULUS) < 0);
    }

    #[test]
    fn reduce_fb_is_identity_below_modulus() {
        let x = U256::from_u64(42);
        assert_eq!(reduce_fb(&x), x);
    }

    #[test]
    fn reduce_fb_subtracts_once_when_at_least_modulus() {
        let x = MODULUS.add(&U256::from_u64(5));
        assert_eq!(reduce_fb(&x), U256::from_u64(5));
    }

    #[test]
    fn reduce_u512_matches_big_int_mod() {
        let x = U512::from_raw([
            0x1111111111111111,
            0x2222222222222222,
            0x3333333333333333,
            0x4444444444444444,
            0x5555555555555555,
            0x6666666666666666,
            0x7777777777777777,
            0x8888888888888888,
        ]);
        let r = reduce_u512_to_u256_a(&x);
        let r = reduce_ca(&r);

        let mut bytes = [0u8; 64];
        for i in 0..8 {
            bytes[i * 8..i * 8 + 8].copy_from_slice(&x.0[i].to_le_bytes());
        }
        let big = BigInt::from_bytes_le(num_bigint::Sign::Plus, &bytes);
        let modulus = u256_to_bigint(&MODULUS);
        let expected = big.mod_floor(&modulus);
        let expected_u256 = bigint_to_u256_mod_p(&expected);
        assert_eq!(r, expected_u256);
    }

    #[test]
    fn mod_inverse_round_trips() {
        let x = U256::from_u64(12345);
        let inv = mod_inverse(&x).unwrap();
        let prod_big = u256_to_bigint(&x) * u256_to_bigint(&inv);
        let modulus = u256_to_bigint(&MODULUS);
        assert_eq!(prod_big.mod_floor(&modulus), BigInt::from(1));
    }

    #[test]
    fn mod_inverse_of_zero_is_none() {
        assert!(mod_inverse(&U256::ZERO).is_none());
    }
}
