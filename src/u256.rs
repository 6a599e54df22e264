//! A 256-bit unsigned integer with little-endian limb storage.
//!
//! `U256` carries no notion of the field modulus; every operation here is plain
//! arithmetic modulo `2^256` (or, for the `long_*` family, exact wide arithmetic
//! producing a [`crate::u512::U512`]). The modular layer in [`crate::modular`] is
//! built on top of these primitives.

use crate::arithmetic::{adc, limbs_geq, mac, macx, sbb};
use crate::u512::U512;
use core::cmp::Ordering;
use core::fmt;

/// A 256-bit unsigned integer, stored as four 64-bit little-endian limbs
/// (`0` is the least-significant limb).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256(pub [u64; 4]);

impl U256 {
    pub const ZERO: U256 = U256([0, 0, 0, 0]);
    pub const ONE: U256 = U256([1, 0, 0, 0]);

    /// Builds a `U256` from four little-endian 64-bit limbs.
    pub const fn from_raw(limbs: [u64; 4]) -> Self {
        U256(limbs)
    }

    pub const fn from_u64(v: u64) -> Self {
        U256([v, 0, 0, 0])
    }

    pub const fn limbs(&self) -> &[u64; 4] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0, 0]
    }

    /// `self + other mod 2^256`, discarding any carry out of the top limb.
    pub fn add(&self, other: &U256) -> U256 {
        self.add_with_carry(other).0
    }

    /// `self + other`, also returning whether the sum overflowed `2^256`.
    pub fn add_with_carry(&self, other: &U256) -> (U256, bool) {
        let (r0, c) = adc(self.0[0], other.0[0], 0);
        let (r1, c) = adc(self.0[1], other.0[1], c);
        let (r2, c) = adc(self.0[2], other.0[2], c);
        let (r3, c) = adc(self.0[3], other.0[3], c);
        (U256([r0, r1, r2, r3]), c != 0)
    }

    /// `self - other mod 2^256`, discarding any borrow out of the top limb.
    pub fn sub(&self, other: &U256) -> U256 {
        self.sub_with_borrow(other).0
    }

    /// `self - other`, also returning whether the subtraction underflowed.
    pub fn sub_with_borrow(&self, other: &U256) -> (U256, bool) {
        let (r0, b) = sbb(self.0[0], other.0[0], 0);
        let (r1, b) = sbb(self.0[1], other.0[1], b);
        let (r2, b) = sbb(self.0[2], other.0[2], b);
        let (r3, b) = sbb(self.0[3], other.0[3], b);
        (U256([r0, r1, r2, r3]), b != 0)
    }

    pub fn increment(&self) -> U256 {
        self.add(&U256::ONE)
    }

    pub fn increment_assign(&mut self) {
        *self = self.increment();
    }

    pub fn decrement(&self) -> U256 {
        self.sub(&U256::ONE)
    }

    pub fn decrement_assign(&mut self) {
        *self = self.decrement();
    }

    /// Full 256x256 -> 512 bit product.
    pub fn long_mul(&self, other: &U256) -> U512 {
        let a = &self.0;
        let b = &other.0;
        let mut r = [0u64; 8];

        let (v, c) = macx(a[0], b[0], 0);
        r[0] = v;
        let mut carry = c;
        let (v, c) = mac(0, a[0], b[1], carry);
        let mut t1 = v;
        carry = c;
        let (v, c) = mac(0, a[0], b[2], carry);
        let mut t2 = v;
        carry = c;
        let (v, c) = macx(a[0], b[3], carry);
        let mut t3 = v;
        let mut t4 = c;

        let (v, c) = mac(t1, a[1], b[0], 0);
        r[1] = v;
        carry = c;
        let (v, c) = mac(t2, a[1], b[1], carry);
        t1 = v;
        carry = c;
        let (v, c) = mac(t3, a[1], b[2], carry);
        t2 = v;
        carry = c;
        let (v, c) = mac(t4, a[1], b[3], carry);
        t3 = v;
        t4 = c;

        let (v, c) = mac(t1, a[2], b[0], 0);
        r[2] = v;
        carry = c;
        let (v, c) = mac(t2, a[2], b[1], carry);
        t1 = v;
        carry = c;
        let (v, c) = mac(t3, a[2], b[2], carry);
        t2 = v;
        carry = c;
        let (v, c) = mac(t4, a[2], b[3], carry);
        t3 = v;
        t4 = c;

        let (v, c) = mac(t1, a[3], b[0], 0);
        r[3] = v;
        carry = c;
        let (v, c) = mac(t2, a[3], b[1], carry);
        r[4] = v;
        carry = c;
        let (v, c) = mac(t3, a[3], b[2], carry);
        r[5] = v;
        carry = c;
        let (v, c) = mac(t4, a[3], b[3], carry);
        r[6] = v;
        r[7] = c;

        U512(r)
    }

    /// Full 256-bit squaring. Delegates to [`Self::long_mul`]; kept as a separate
    /// named entry point because callers (and the Montgomery layer) reason about
    /// squaring as its own operation even though this implementation does not
    /// special-case the diagonal terms.
    pub fn long_square(&self) -> U512 {
        self.long_mul(self)
    }

    /// 256x64 -> 320 bit product, returned as a `U256` (the low 256 bits) plus the
    /// overflow limb (bits 256..320).
    pub fn long_mul_256x64(&self, y: u64) -> (U256, u64) {
        let a = &self.0;
        let (r0, c) = macx(a[0], y, 0);
        let (r1, c) = macx(a[1], y, c);
        let (r2, c) = macx(a[2], y, c);
        let (r3, c) = macx(a[3], y, c);
        (U256([r0, r1, r2, r3]), c)
    }

    /// `(self * other) mod 2^256`, i.e. the low 256 bits of the full product.
    pub fn mul_256x256_mod_2_256(&self, other: &U256) -> U256 {
        let wide = self.long_mul(other);
        U256([wide.0[0], wide.0[1], wide.0[2], wide.0[3]])
    }

    /// Shifts left by exactly 64 bits (one limb), discarding the top limb.
    pub fn shift_left_64(&self) -> U256 {
        U256([0, self.0[0], self.0[1], self.0[2]])
    }

    /// Shifts right by exactly 64 bits (one limb), returning the shifted-out word.
    pub fn shift_right_64(&self) -> (U256, u64) {
        (U256([self.0[1], self.0[2], self.0[3], 0]), self.0[0])
    }

    /// Shifts right by `i` bits, `0 <= i < 64`.
    pub fn shr_small(&self, i: u32) -> U256 {
        if i == 0 {
            return *self;
        }
        debug_assert!(i < 64);
        let a = &self.0;
        let mut r = [0u64; 4];
        for idx in 0..4 {
            let lo = a[idx] >> i;
            let hi = if idx + 1 < 4 { a[idx + 1] << (64 - i) } else { 0 };
            r[idx] = lo | hi;
        }
        U256(r)
    }

    /// Shifts left by `i` bits, `0 <= i < 64`, discarding bits shifted out of the top limb.
    pub fn shl_small(&self, i: u32) -> U256 {
        if i == 0 {
            return *self;
        }
        debug_assert!(i < 64);
        let a = &self.0;
        let mut r = [0u64; 4];
        for idx in (0..4).rev() {
            let hi = a[idx] << i;
            let lo = if idx > 0 { a[idx - 1] >> (64 - i) } else { 0 };
            r[idx] = hi | lo;
        }
        U256(r)
    }

    /// Smallest `i` such that `self < 2^i`; `0` for the zero value.
    pub fn bit_length(&self) -> u32 {
        for i in (0..4).rev() {
            if self.0[i] != 0 {
                return (i as u32) * 64 + (64 - self.0[i].leading_zeros());
            }
        }
        0
    }

    /// Three-way comparison: `-1`, `0`, `+1`.
    pub fn compare(&self, other: &U256) -> i8 {
        for i in (0..4).rev() {
            if self.0[i] != other.0[i] {
                return if self.0[i] > other.0[i] { 1 } else { -1 };
            }
        }
        0
    }

    pub(crate) fn geq(&self, other: &U256) -> bool {
        limbs_geq(&self.0, &other.0)
    }

    /// Sliding-window decomposition with window size `w`, `1 <= w <= 64`.
    ///
    /// Produces the unique sparse representation `self = sum e_j * 2^(p_j)` where
    /// every `e_j` is odd and in `[1, 2^w - 1]` and the positions `p_j` strictly
    /// increase. Used to drive windowed exponentiation in [`crate::montgomery`].
    pub fn sliding_window_decomposition(&self, w: u32) -> Vec<(u64, u32)> {
        assert!((1..=64).contains(&w), "window size must be in 1..=64");
        let bits = self.bit_length();
        let mut terms = Vec::new();
        let mut i = 0u32;
        while i < bits {
            if !self.test_bit(i) {
                i += 1;
                continue;
            }
            // Extend the window as far as it can go while staying odd-terminated
            // and within `w` bits.
            let window_end = core::cmp::min(i + w, bits);
            let mut j = window_end;
            // Find the highest set bit within [i, window_end) to make the window tight.
            while j > i && !self.test_bit(j - 1) {
                j -= 1;
            }
            let width = j - i;
            let mut e: u64 = 0;
            for k in 0..width {
                if self.test_bit(i + k) {
                    e |= 1 << k;
                }
            }
            debug_assert_eq!(e & 1, 1);
            terms.push((e, i));
            i = j;
        }
        terms
    }

    pub(crate) fn test_bit(&self, i: u32) -> bool {
        if i >= 256 {
            return false;
        }
        let limb = (i / 64) as usize;
        let bit = i % 64;
        (self.0[limb] >> bit) & 1 == 1
    }

    pub fn to_bytes_le(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..4 {
            out[i * 8..i * 8 + 8].copy_from_slice(&self.0[i].to_le_bytes());
        }
        out
    }

    pub fn from_bytes_le(bytes: &[u8; 32]) -> Self {
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            limbs[i] = u64::from_le_bytes(bytes[i * 8..i * 8 + 8].try_into().unwrap());
        }
        U256(limbs)
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        let mut le = self.to_bytes_le();
        le.reverse();
        le
    }

    pub fn from_bytes_be(bytes: &[u8; 32]) -> Self {
        let mut le = *bytes;
        le.reverse();
        Self::from_bytes_le(&le)
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.compare(other) {
            -1 => Ordering::Less,
            0 => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for limb in self.0.iter().rev() {
            write!(f, "{:016x}", limb)?;
        }
        Ok(())
    }
}
