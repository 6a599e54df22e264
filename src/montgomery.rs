//! Montgomery multiplication and the exponentiation routines built on top of it.
//!
//! Every function in this module operates on values already in Montgomery form
//! (`x * R mod p`); conversion in and out of that form lives here too
//! ([`to_montgomery`], [`from_montgomery`]).

use crate::arithmetic::{adc, mac};
use crate::constants::{INV, MODULUS, R};
use crate::modular::reduce_fb;
use crate::u256::U256;

/// Montgomery multiplication: `(a * b * R^-1) mod p`, for `a, b` already in
/// Montgomery form. This is the canonical entry point used throughout
/// [`crate::field`]; implemented as a full 256x256 multiply followed by
/// Montgomery reduction (REDC), which is the easiest form of this algorithm to
/// check by hand against the textbook definition.
pub fn mont_mul(a: &U256, b: &U256) -> U256 {
    let wide = a.long_mul(b);
    redc(&wide.0)
}

/// Bit-for-bit equivalent of [`mont_mul`], written with the REDC limb loops
/// manually unrolled instead of driven by `for`. Kept only so tests can assert
/// the two implementations agree; not used on the default path.
pub fn mont_mul_unrolled(a: &U256, b: &U256) -> U256 {
    let wide = a.long_mul(b);
    redc_unrolled(&wide.0)
}

/// Montgomery reduction (REDC) of a 512-bit value, `(t * R^-1) mod p`.
fn redc(t_in: &[u64; 8]) -> U256 {
    let p = MODULUS.limbs();
    let mut t = [0u64; 9];
    t[0..8].copy_from_slice(t_in);

    for i in 0..4 {
        let m = t[i].wrapping_mul(INV);
        let mut carry = 0u64;
        for j in 0..4 {
            let (v, c) = mac(t[i + j], m, p[j], carry);
            t[i + j] = v;
            carry = c;
        }
        let mut k = i + 4;
        while carry != 0 {
            let (v, c) = adc(t[k], carry, 0);
            t[k] = v;
            carry = c;
            k += 1;
        }
    }
    debug_assert_eq!(t[8], 0, "Montgomery reduction overflowed 2p");
    reduce_fb(&U256::from_raw([t[4], t[5], t[6], t[7]]))
}

/// Same algorithm as [`redc`], with both the four-round outer loop and the
/// four-limb inner loop written out explicitly.
fn redc_unrolled(t_in: &[u64; 8]) -> U256 {
    let p = MODULUS.limbs();
    let [p0, p1, p2, p3] = [p[0], p[1], p[2], p[3]];
    let mut t = [0u64; 9];
    t[0..8].copy_from_slice(t_in);

    // Round 0
    {
        let m = t[0].wrapping_mul(INV);
        let (v, c) = mac(t[0], m, p0, 0);
        t[0] = v;
        let (v, c) = mac(t[1], m, p1, c);
        t[1] = v;
        let (v, c) = mac(t[2], m, p2, c);
        t[2] = v;
        let (v, c) = mac(t[3], m, p3, c);
        t[3] = v;
        let (v, c) = adc(t[4], c, 0);
        t[4] = v;
        let (v, c) = adc(t[5], c, 0);
        t[5] = v;
        let (v, c) = adc(t[6], c, 0);
        t[6] = v;
        let (v, c) = adc(t[7], c, 0);
        t[7] = v;
        let (v, _) = adc(t[8], c, 0);
        t[8] = v;
    }
    // Round 1
    {
        let m = t[1].wrapping_mul(INV);
        let (v, c) = mac(t[1], m, p0, 0);
        t[1] = v;
        let (v, c) = mac(t[2], m, p1, c);
        t[2] = v;
        let (v, c) = mac(t[3], m, p2, c);
        t[3] = v;
        let (v, c) = mac(t[4], m, p3, c);
        t[4] = v;
        let (v, c) = adc(t[5], c, 0);
        t[5] = v;
        let (v, c) = adc(t[6], c, 0);
        t[6] = v;
        let (v, c) = adc(t[7], c, 0);
        t[7] = v;
        let (v, _) = adc(t[8], c, 0);
        t[8] = v;
    }
    // Round 2
    {
        let m = t[2].wrapping_mul(INV);
        let (v, c) = mac(t[2], m, p0, 0);
        t[2] = v;
        let (v, c) = mac(t[3], m, p1, c);
        t[3] = v;
        let (v, c) = mac(t[4], m, p2, c);
        t[4] = v;
        let (v, c) = mac(t[5], m, p3, c);
        t[5] = v;
        let (v, c) = adc(t[6], c, 0);
        t[6] = v;
        let (v, c) = adc(t[7], c, 0);
        t[7] = v;
        let (v, _) = adc(t[8], c, 0);
        t[8] = v;
    }
    // Round 3
    {
        let m = t[3].wrapping_mul(INV);
        let (v, c) = mac(t[3], m, p0, 0);
        t[3] = v;
        let (v, c) = mac(t[4], m, p1, c);
        t[4] = v;
        let (v, c) = mac(t[5], m, p2, c);
        t[5] = v;
        let (v, c) = mac(t[6], m, p3, c);
        t[6] = v;
        let (v, c) = adc(t[7], c, 0);
        t[7] = v;
        let (v, _) = adc(t[8], c, 0);
        t[8] = v;
    }

    debug_assert_eq!(t[8], 0, "Montgomery reduction overflowed 2p");
    reduce_fb(&U256::from_raw([t[4], t[5], t[6], t[7]]))
}

/// Converts a plain (non-Montgomery) value into Montgomery form: `x -> x*R mod p`.
pub fn to_montgomery(x: &U256) -> U256 {
    mont_mul(x, &crate::constants::R2)
}

/// Converts a Montgomery-form value back to plain form: `x*R^-1 mod p -> x`.
pub fn from_montgomery(x: &U256) -> U256 {
    mont_mul(x, &U256::ONE)
}

/// `base^exp mod p` for `base` in Montgomery form, via plain left-to-right
/// square-and-multiply. `exp` is a plain (non-Montgomery) integer.
pub fn pow_square_and_multiply(base: &U256, exp: &U256) -> U256 {
    let bits = exp.bit_length();
    let mut result = R;
    let mut i = bits;
    while i > 0 {
        i -= 1;
        result = mont_mul(&result, &result);
        if exp.test_bit(i) {
            result = mont_mul(&result, base);
        }
    }
    result
}

fn bit_width(e: u64) -> u32 {
    64 - e.leading_zeros()
}

/// `base^exp mod p` for `base` in Montgomery form, via left-to-right sliding
/// window exponentiation with window size `w` (see
/// [`U256::sliding_window_decomposition`]). Produces the same value as
/// [`pow_square_and_multiply`] with fewer multiplications, at the cost of a
/// `2^(w-1)`-entry table of precomputed odd powers of `base`.
pub fn pow_sliding_window(base: &U256, exp: &U256, w: u32) -> U256 {
    let mut terms = exp.sliding_window_decomposition(w);
    if terms.is_empty() {
        return R;
    }
    terms.reverse();

    let base_sq = mont_mul(base, base);
    let table_len = 1usize << (w - 1);
    let mut odd_powers = vec![*base; table_len];
    for k in 1..table_len {
        odd_powers[k] = mont_mul(&odd_powers[k - 1], &base_sq);
    }

    let mut result = R;
    let mut cursor = exp.bit_length();
    for (e, p) in terms {
        let width = bit_width(e);
        let top = p + width;
        for _ in 0..(cursor - top) {
            result = mont_mul(&result, &result);
        }
        for _ in 0..width {
            result = mont_mul(&result, &result);
        }
        result = mont_mul(&result, &odd_powers[((e - 1) / 2) as usize]);
        cursor = p;
    }
    for _ in 0..cursor {
        result = mont_mul(&result, &result);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::R2;

    #[test]
    fn mont_mul_and_unrolled_agree_on_small_values() {
        for a in [1u64, 2, 3, 1234567, u64::MAX] {
            for b in [1u64, 5, 999, 0xdeadbeef, u64::MAX] {
                let am = to_montgomery(&U256::from_u64(a));
                let bm = to_montgomery(&U256::from_u64(b));
                assert_eq!(mont_mul(&am, &bm), mont_mul_unrolled(&am, &bm));
            }
        }
    }

    #[test]
    fn to_from_montgomery_roundtrip() {
        let x = U256::from_u64(123456789);
        let mont = to_montgomery(&x);
        assert_eq!(from_montgomery(&mont), x);
    }

    #[test]
    fn montgomery_form_of_one_is_r() {
        assert_eq!(to_montgomery(&U256::ONE), R);
    }

    #[test]
    fn mont_mul_by_r2_matches_to_montgomery() {
        let x = U256::from_u64(77);
        assert_eq!(mont_mul(&x, &R2), to_montgomery(&x));
    }

    #[test]
    fn square_and_multiply_matches_sliding_window() {
        let base = to_montgomery(&U256::from_u64(5));
        let exp = U256::from_raw([0xabcdef0123456789, 0x1, 0, 0]);
        let a = pow_square_and_multiply(&base, &exp);
        for w in [2u32, 3, 4, 5] {
            assert_eq!(pow_sliding_window(&base, &exp, w), a, "window size {w}");
        }
    }

    #[test]
    fn pow_zero_is_one() {
        let base = to_montgomery(&U256::from_u64(9));
        assert_eq!(pow_square_and_multiply(&base, &U256::ZERO), R);
        assert_eq!(pow_sliding_window(&base, &U256::ZERO, 4), R);
    }

    #[test]
    fn pow_one_is_base() {
        let base = to_montgomery(&U256::from_u64(9));
        assert_eq!(pow_square_and_multiply(&base, &U256::ONE), base);
        assert_eq!(pow_sliding_window(&base, &U256::ONE, 4), base);
    }
}
