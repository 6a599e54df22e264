//! Square root extraction, specialized to this field's 2-adicity (32).
//!
//! The construction follows Tonelli-Shanks but replaces the usual iterative
//! order-finding loop with a direct discrete-log lookup: the exponent `e` in
//! `c = ROOT_OF_UNITY^e` is recovered 8 bits at a time via a 256-entry table
//! over the order-256 subgroup generated by `ROOT_OF_UNITY^(2^24)`.

use crate::constants;
use crate::field::FieldElement;
use crate::u256::U256;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Exponentiation specialized to the fixed odd-order exponents used by
/// Tonelli-Shanks (`m` and `(m+1)/2`). Both are compile-time constants, so
/// there is no variable-exponent path to guard against; this just names the
/// call site for what it's doing rather than exponentiating by an arbitrary
/// `U256`.
fn exp_odd_order(x: &FieldElement, exponent: &U256) -> FieldElement {
    x.pow_square_and_multiply(exponent)
}

fn pow_m(x: &FieldElement) -> FieldElement {
    exp_odd_order(x, &constants::M)
}

fn pow_m_plus_one_over_two(x: &FieldElement) -> FieldElement {
    exp_odd_order(x, &constants::M_PLUS_ONE_OVER_TWO)
}

/// `base^(step), base^(2*step), ..., base^((n-1)*step)`, as a lookup table
/// indexed by the multiplier `0..n`.
fn build_power_table(base: &FieldElement, step: u64, n: usize) -> Vec<FieldElement> {
    let step_elem = base.pow_square_and_multiply(&U256::from_u64(step));
    let mut table = Vec::with_capacity(n);
    table.push(FieldElement::ONE);
    for d in 1..n {
        table.push(table[d - 1].mul(&step_elem));
    }
    table
}

lazy_static! {
    /// `RHO[i] = ROOT_OF_UNITY^(2^i)`; `RHO[0]` has order `2^32`, `RHO[32] == 1`.
    static ref RHO: [FieldElement; 33] = {
        let mut arr = [FieldElement::ONE; 33];
        arr[0] = FieldElement::from_montgomery_unchecked(constants::ROOT_OF_UNITY);
        for i in 1..33 {
            arr[i] = arr[i - 1].square();
        }
        arr
    };

    /// Discrete-log table for the order-256 subgroup generated by `RHO[24]`:
    /// maps `RHO[24]^k` (canonical bytes) to `k`.
    static ref DLOG_TABLE: HashMap<U256, u8> = {
        let rho24 = RHO[24];
        let mut table = HashMap::with_capacity(256);
        let mut cur = FieldElement::ONE;
        for k in 0..256u32 {
            table.insert(cur.to_u256(), k as u8);
            cur = cur.mul(&rho24);
        }
        table
    };

    static ref ROOT_INV: FieldElement = FieldElement::from_montgomery_unchecked(constants::ROOT_OF_UNITY_INV);

    /// Digit-removal table: `ROOT_OF_UNITY_INV^d` for `d in 0..256`.
    static ref TABLE_A: Vec<FieldElement> = build_power_table(&ROOT_INV, 1, 256);
    /// Digit-removal table: `ROOT_OF_UNITY_INV^(256*d)` for `d in 0..256`.
    static ref TABLE_B: Vec<FieldElement> = build_power_table(&ROOT_INV, 256, 256);
    /// Digit-removal table: `ROOT_OF_UNITY_INV^(65536*d)` for `d in 0..256`.
    static ref TABLE_C: Vec<FieldElement> = build_power_table(&ROOT_INV, 65536, 256);
    /// Half-digit correction table: `ROOT_OF_UNITY_INV^k` for `k in 0..128`.
    static ref HALF_TABLE: Vec<FieldElement> = build_power_table(&ROOT_INV, 1, 128);
    /// `ROOT_OF_UNITY_INV^128`, the base used for the upper three correction digits.
    static ref BASE128: FieldElement = {
        let mut b = *ROOT_INV;
        for _ in 0..7 {
            b = b.square();
        }
        b
    };
}

/// Attempts to extract a square root of `x`. Returns `(root, true)` on
/// success (one of the two roots; sign is unspecified and may vary between
/// calls) and `(x, false)` if `x` is not a quadratic residue.
pub fn sqrt(x: &FieldElement) -> (FieldElement, bool) {
    if x.is_zero() {
        return (FieldElement::ZERO, true);
    }

    let c = pow_m(x);
    let s = pow_m_plus_one_over_two(x);

    let powers: [u64; 4] = [1 << 24, 1 << 16, 1 << 8, 1];
    let mut residual = c;
    let mut digits = [0u32; 4];

    for (step, &power) in powers.iter().enumerate() {
        let t = residual.pow_square_and_multiply(&U256::from_u64(power));
        let d = match DLOG_TABLE.get(&t.to_u256()) {
            Some(&d) => d as u32,
            None => return (*x, false),
        };
        digits[step] = d;
        if step == 0 && d % 2 == 1 {
            return (*x, false);
        }
        residual = match step {
            0 => residual.mul(&TABLE_A[d as usize]),
            1 => residual.mul(&TABLE_B[d as usize]),
            2 => residual.mul(&TABLE_C[d as usize]),
            _ => residual,
        };
    }

    let [d0, d1, d2, d3] = digits;
    let rest_exp = d1 as u64 + 256 * (d2 as u64) + 65536 * (d3 as u64);
    let correction = HALF_TABLE[(d0 / 2) as usize].mul(&BASE128.pow_square_and_multiply(&U256::from_u64(rest_exp)));
    let y = s.mul(&correction);
    (y, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Recomputes the first few generating values and compares them against
    /// golden bytes, to catch accidental drift in `ROOT_OF_UNITY`/`S` from
    /// breaking the precomputed tables silently.
    #[test]
    fn generating_constants_match_golden_bytes() {
        const ROOT_OF_UNITY_LE: [u8; 32] = [
            0x2b, 0x0d, 0x9f, 0x43, 0x1f, 0x97, 0x29, 0x38, 0xb9, 0x80, 0x22, 0x8c, 0x50, 0x83,
            0x36, 0xb6, 0xb4, 0x13, 0xc8, 0x22, 0x19, 0x68, 0x9b, 0xd0, 0x20, 0x1f, 0xe8, 0xdf,
            0x9e, 0xa1, 0xa2, 0x16,
        ];
        const RHO24_LE: [u8; 32] = [
            0x4b, 0x69, 0x7f, 0x81, 0x2f, 0xbd, 0x35, 0x49, 0xff, 0xde, 0xe8, 0x99, 0xa8, 0x65,
            0x08, 0x0a, 0xad, 0xf4, 0x0c, 0xac, 0x21, 0x81, 0x36, 0x6b, 0x2e, 0xf1, 0xe9, 0xe2,
            0x98, 0x40, 0x9b, 0x4f,
        ];
        assert_eq!(RHO[0].to_u256().to_bytes_le(), ROOT_OF_UNITY_LE);
        assert_eq!(RHO[24].to_u256().to_bytes_le(), RHO24_LE);
        assert_eq!(RHO[32], FieldElement::ONE);
    }

    #[test]
    fn dlog_table_has_256_entries_rooted_at_identity() {
        assert_eq!(DLOG_TABLE.len(), 256);
        assert_eq!(DLOG_TABLE.get(&FieldElement::ONE.to_u256()), Some(&0u8));
    }

    #[test]
    fn sqrt_of_zero_is_zero() {
        let (root, is_square) = sqrt(&FieldElement::ZERO);
        assert!(is_square);
        assert!(root.is_zero());
    }

    #[test]
    fn sqrt_of_square_round_trips() {
        for v in [2u64, 3, 4, 1234567, 999999999] {
            let x = FieldElement::from_u64(v);
            let sq = x.mul(&x);
            let (root, is_square) = sqrt(&sq);
            assert!(is_square, "value {v}");
            assert_eq!(root.mul(&root), sq, "value {v}");
        }
    }

    #[test]
    fn sqrt_of_non_residue_fails() {
        // `MULTIPLICATIVE_GENERATOR` (7) is a non-residue for this field, since
        // `ROOT_OF_UNITY = 7^m` has full order `2^32` rather than being a square.
        let g = FieldElement::from_u64(7);
        let (_, is_square) = sqrt(&g);
        assert!(!is_square);
    }
}
