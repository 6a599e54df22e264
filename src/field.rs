//! The public field-element type: a Montgomery-form wrapper over [`U256`].

use crate::constants::{self, MODULUS, R};
use crate::error::FieldError;
use crate::modular::{self, reduce_fb};
use crate::montgomery::{self, mont_mul};
use crate::sqrt;
use crate::u256::U256;
use crate::u512::U512;
use core::fmt;
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use ff::{Field as FfField, PrimeField};
use num_bigint::BigInt;
use rand_core::RngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// An element of the Bandersnatch base field, stored internally in Montgomery
/// form. Two distinct `U256` bit patterns may represent the same field value
/// (see the module-level notes in [`crate::modular`]); equality always goes
/// through normalization rather than comparing bits directly.
#[derive(Clone, Copy)]
pub struct FieldElement(pub(crate) U256);

impl FieldElement {
    pub const ZERO: FieldElement = FieldElement(U256::ZERO);
    pub const ONE: FieldElement = FieldElement(R);

    /// Wraps a raw Montgomery-form limb value without any validation. Only
    /// used internally by constants and conversions that already know their
    /// input satisfies the `Reduced_c` contract.
    pub(crate) const fn from_montgomery_unchecked(w: U256) -> Self {
        FieldElement(w)
    }

    /// The unique canonical representative `v ∈ [0, p)`.
    fn normalize(&self) -> U256 {
        reduce_fb(&self.0)
    }

    pub fn from_u256(v: &U256) -> Self {
        FieldElement(montgomery::to_montgomery(&modular::reduce_ca(v)))
    }

    pub fn to_u256(&self) -> U256 {
        self.normalize()
    }

    pub fn from_bigint(v: &BigInt) -> Self {
        let modulus_big = {
            let bytes = MODULUS.to_bytes_le();
            BigInt::from_bytes_le(num_bigint::Sign::Plus, &bytes)
        };
        let reduced = {
            use num_integer::Integer;
            v.mod_floor(&modulus_big)
        };
        let (_, bytes) = reduced.to_bytes_le();
        let mut buf = [0u8; 32];
        buf[..bytes.len().min(32)].copy_from_slice(&bytes[..bytes.len().min(32)]);
        Self::from_u256(&U256::from_bytes_le(&buf))
    }

    pub fn to_bigint(&self) -> BigInt {
        let bytes = self.to_u256().to_bytes_le();
        BigInt::from_bytes_le(num_bigint::Sign::Plus, &bytes)
    }

    pub fn from_u64(v: u64) -> Self {
        Self::from_u256(&U256::from_u64(v))
    }

    pub fn to_u64(&self) -> Result<u64, FieldError> {
        let v = self.to_u256();
        let limbs = v.limbs();
        if limbs[1] != 0 || limbs[2] != 0 || limbs[3] != 0 {
            return Err(FieldError::CannotRepresent { type_name: "u64" });
        }
        Ok(limbs[0])
    }

    pub fn from_i64(v: i64) -> Self {
        if v >= 0 {
            Self::from_u64(v as u64)
        } else {
            Self::from_u64((-v) as u64).neg()
        }
    }

    pub fn to_i64(&self) -> Result<i64, FieldError> {
        match self.sign() {
            0 | 1 => {
                let u = self.to_u64().map_err(|_| FieldError::CannotRepresent { type_name: "i64" })?;
                i64::try_from(u).map_err(|_| FieldError::CannotRepresent { type_name: "i64" })
            }
            _ => {
                let u = self.neg().to_u64().map_err(|_| FieldError::CannotRepresent { type_name: "i64" })?;
                let signed = i64::try_from(u).map_err(|_| FieldError::CannotRepresent { type_name: "i64" })?;
                Ok(-signed)
            }
        }
    }

    pub fn add(&self, other: &Self) -> Self {
        FieldElement(modular::add_and_reduce_bc(&self.0, &other.0))
    }

    pub fn sub(&self, other: &Self) -> Self {
        let (diff, borrowed) = self.0.sub_with_borrow(&other.0);
        let corrected = if borrowed { diff.add(&MODULUS).add(&MODULUS) } else { diff };
        FieldElement(modular::reduce_ca(&corrected))
    }

    pub fn neg(&self) -> Self {
        if self.0.is_zero() {
            *self
        } else {
            FieldElement(montgomery::to_montgomery(&MODULUS.sub(&self.normalize())))
        }
    }

    pub fn mul(&self, other: &Self) -> Self {
        FieldElement(mont_mul(&self.0, &other.0))
    }

    pub fn square(&self) -> Self {
        FieldElement(mont_mul(&self.0, &self.0))
    }

    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// Multiplies by the small constant 5 using a dedicated limb-scaling path
    /// rather than three generic additions.
    pub fn mul_by_five(&self) -> Self {
        // `long_mul_256x64` gives the exact 320-bit product `5 * self.0`, split
        // into its low 256 bits and a 64-bit overflow limb; reducing that as a
        // wide value (rather than folding the overflow back in via wrapping
        // 256-bit adds) avoids silently dropping a `2^256` multiple.
        let (low, overflow) = self.0.long_mul_256x64(5);
        let limbs = low.limbs();
        let wide = U512::from_raw([limbs[0], limbs[1], limbs[2], limbs[3], overflow, 0, 0, 0]);
        let reduced = modular::reduce_ca(&modular::reduce_u512_to_u256_a(&wide));
        FieldElement(reduced)
    }

    pub fn invert(&self) -> Result<Self, FieldError> {
        let plain = self.normalize();
        let inv_plain = modular::mod_inverse(&plain).ok_or(FieldError::DivisionByZero)?;
        Ok(FieldElement(montgomery::to_montgomery(&inv_plain)))
    }

    pub fn div(&self, other: &Self) -> Result<Self, FieldError> {
        Ok(self.mul(&other.invert()?))
    }

    /// `self^exponent`, via sliding-window exponentiation (window width 4).
    /// `0^0 == 1` by convention.
    pub fn pow(&self, exponent: &U256) -> Self {
        FieldElement(montgomery::pow_sliding_window(&self.0, exponent, 4))
    }

    pub fn pow_square_and_multiply(&self, exponent: &U256) -> Self {
        FieldElement(montgomery::pow_square_and_multiply(&self.0, exponent))
    }

    pub fn is_zero(&self) -> bool {
        self.normalize().is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.normalize() == U256::ONE
    }

    pub fn ct_eq(&self, other: &Self) -> bool {
        self.normalize() == other.normalize()
    }

    /// `sign(z) ∈ {-1, 0, +1}`: 0 for the additive identity, +1 for values in
    /// `[1, (p-1)/2]`, -1 otherwise.
    pub fn sign(&self) -> i8 {
        let v = self.normalize();
        if v.is_zero() {
            return 0;
        }
        let half = MODULUS.shr_small(1); // floor(p/2) == (p-1)/2 since p is odd
        if v.compare(&half) <= 0 {
            1
        } else {
            -1
        }
    }

    fn abs_repr(&self) -> U256 {
        let v = self.normalize();
        if self.sign() < 0 {
            MODULUS.sub(&v)
        } else {
            v
        }
    }

    /// `(|z| == |x|, z == x)`, with `|v|` the signed representative (see [`Self::sign`]).
    pub fn cmp_abs(&self, other: &Self) -> (bool, bool) {
        (self.abs_repr() == other.abs_repr(), self.ct_eq(other))
    }

    /// The Jacobi symbol of the canonical representative with respect to `p`,
    /// computed via the standard binary algorithm (no external dependency).
    pub fn jacobi(&self) -> i8 {
        jacobi_symbol(&self.normalize(), &MODULUS)
    }

    /// Attempts to find `y` with `y^2 == self`. Returns `(y, true)` on success
    /// (one of the two roots, sign unspecified) and `(unchanged, false)` on
    /// failure (this value is not a square).
    pub fn sqrt(&self) -> (Self, bool) {
        sqrt::sqrt(self)
    }

    /// A field element drawn from a non-cryptographic RNG. Explicitly named
    /// to flag that it carries none of the usual randomness guarantees;
    /// intended for test inputs only.
    pub fn random_unsafe(mut rng: impl RngCore) -> Self {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Self::from_u256(&U256::from_bytes_le(&bytes))
    }
}

fn jacobi_symbol(a: &U256, n: &U256) -> i8 {
    let mut a = *a;
    let mut n = *n;
    let mut result = 1i8;
    a = if a.geq(&n) { bigint_mod(&a, &n) } else { a };
    while !a.is_zero() {
        while a.limbs()[0] & 1 == 0 {
            a = a.shr_small(1);
            let n_mod8 = n.limbs()[0] & 7;
            if n_mod8 == 3 || n_mod8 == 5 {
                result = -result;
            }
        }
        core::mem::swap(&mut a, &mut n);
        if (a.limbs()[0] & 3 == 3) && (n.limbs()[0] & 3 == 3) {
            result = -result;
        }
        a = bigint_mod(&a, &n);
    }
    if n == U256::ONE {
        result
    } else {
        0
    }
}

fn bigint_mod(a: &U256, n: &U256) -> U256 {
    if n.is_zero() {
        return *a;
    }
    let a_big = {
        let bytes = a.to_bytes_le();
        BigInt::from_bytes_le(num_bigint::Sign::Plus, &bytes)
    };
    let n_big = {
        let bytes = n.to_bytes_le();
        BigInt::from_bytes_le(num_bigint::Sign::Plus, &bytes)
    };
    use num_integer::Integer;
    let reduced = a_big.mod_floor(&n_big);
    let (_, bytes) = reduced.to_bytes_le();
    let mut buf = [0u8; 32];
    buf[..bytes.len().min(32)].copy_from_slice(&bytes[..bytes.len().min(32)]);
    U256::from_bytes_le(&buf)
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other)
    }
}
impl Eq for FieldElement {}

impl Default for FieldElement {
    fn default() -> Self {
        FieldElement::ZERO
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({:?})", self.to_u256())
    }
}

impl Add for FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: Self) -> Self::Output {
        FieldElement::add(&self, &rhs)
    }
}
impl AddAssign for FieldElement {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl Sub for FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: Self) -> Self::Output {
        FieldElement::sub(&self, &rhs)
    }
}
impl SubAssign for FieldElement {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
impl Mul for FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: Self) -> Self::Output {
        FieldElement::mul(&self, &rhs)
    }
}
impl MulAssign for FieldElement {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
impl Neg for FieldElement {
    type Output = FieldElement;
    fn neg(self) -> Self::Output {
        FieldElement::neg(&self)
    }
}

impl<'a> Add<&'a FieldElement> for FieldElement {
    type Output = FieldElement;
    fn add(self, rhs: &'a FieldElement) -> Self::Output {
        FieldElement::add(&self, rhs)
    }
}
impl<'a> Sub<&'a FieldElement> for FieldElement {
    type Output = FieldElement;
    fn sub(self, rhs: &'a FieldElement) -> Self::Output {
        FieldElement::sub(&self, rhs)
    }
}
impl<'a> Mul<&'a FieldElement> for FieldElement {
    type Output = FieldElement;
    fn mul(self, rhs: &'a FieldElement) -> Self::Output {
        FieldElement::mul(&self, rhs)
    }
}

impl<'a> AddAssign<&'a FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &'a FieldElement) {
        *self = FieldElement::add(self, rhs);
    }
}
impl<'a> SubAssign<&'a FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &'a FieldElement) {
        *self = FieldElement::sub(self, rhs);
    }
}
impl<'a> MulAssign<&'a FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &'a FieldElement) {
        *self = FieldElement::mul(self, rhs);
    }
}

impl Sum for FieldElement {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(FieldElement::ZERO, |acc, x| acc + x)
    }
}
impl Product for FieldElement {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(FieldElement::ONE, |acc, x| acc * x)
    }
}
impl<'a> Sum<&'a FieldElement> for FieldElement {
    fn sum<I: Iterator<Item = &'a FieldElement>>(iter: I) -> Self {
        iter.fold(FieldElement::ZERO, |acc, x| acc.add(x))
    }
}
impl<'a> Product<&'a FieldElement> for FieldElement {
    fn product<I: Iterator<Item = &'a FieldElement>>(iter: I) -> Self {
        iter.fold(FieldElement::ONE, |acc, x| acc.mul(x))
    }
}

impl From<u64> for FieldElement {
    fn from(v: u64) -> Self {
        FieldElement::from_u64(v)
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        Choice::from(u8::from(FieldElement::ct_eq(self, other)))
    }
}

impl ConditionallySelectable for FieldElement {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = u64::conditional_select(&a.0.limbs()[i], &b.0.limbs()[i], choice);
        }
        FieldElement(U256::from_raw(out))
    }
}

impl FfField for FieldElement {
    const ZERO: Self = FieldElement::ZERO;
    const ONE: Self = FieldElement::ONE;

    fn random(mut rng: impl RngCore) -> Self {
        Self::random_unsafe(&mut rng)
    }

    fn square(&self) -> Self {
        FieldElement::square(self)
    }

    fn double(&self) -> Self {
        FieldElement::double(self)
    }

    fn invert(&self) -> CtOption<Self> {
        match FieldElement::invert(self) {
            Ok(v) => CtOption::new(v, Choice::from(1)),
            Err(_) => CtOption::new(FieldElement::ZERO, Choice::from(0)),
        }
    }

    fn sqrt_ratio(num: &Self, div: &Self) -> (Choice, Self) {
        let inv = FieldElement::invert(div);
        match inv {
            Ok(div_inv) => {
                let ratio = num.mul(&div_inv);
                let (root, is_square) = ratio.sqrt();
                (Choice::from(is_square as u8), root)
            }
            Err(_) => (Choice::from(0), FieldElement::ZERO),
        }
    }
}

impl PrimeField for FieldElement {
    type Repr = [u8; 32];

    fn from_repr(repr: Self::Repr) -> CtOption<Self> {
        let v = U256::from_bytes_le(&repr);
        let is_canonical = v.compare(&MODULUS) < 0;
        CtOption::new(Self::from_u256(&v), Choice::from(is_canonical as u8))
    }

    fn to_repr(&self) -> Self::Repr {
        self.to_u256().to_bytes_le()
    }

    fn is_odd(&self) -> Choice {
        Choice::from((self.to_u256().limbs()[0] & 1) as u8)
    }

    const MODULUS: &'static str = constants::MODULUS_STR;
    const NUM_BITS: u32 = 255;
    const CAPACITY: u32 = 254;
    const TWO_INV: Self = FieldElement(constants::TWO_INV);
    const MULTIPLICATIVE_GENERATOR: Self = FieldElement(constants::GENERATOR);
    const S: u32 = constants::S;
    const ROOT_OF_UNITY: Self = FieldElement(constants::ROOT_OF_UNITY);
    const ROOT_OF_UNITY_INV: Self = FieldElement(constants::ROOT_OF_UNITY_INV);
    const DELTA: Self = FieldElement(constants::DELTA);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_one_roundtrip() {
        assert!(FieldElement::ZERO.is_zero());
        assert!(FieldElement::ONE.is_one());
    }

    #[test]
    fn add_sub_are_inverse() {
        let a = FieldElement::from_u64(123);
        let b = FieldElement::from_u64(456);
        assert_eq!(a.add(&b).sub(&b), a);
    }

    #[test]
    fn neg_sign_is_antisymmetric() {
        let a = FieldElement::from_u64(123);
        assert_eq!(a.sign(), -a.neg().sign());
    }

    #[test]
    fn mul_by_five_matches_repeated_addition() {
        let a = FieldElement::from_u64(987654321);
        let five = a.add(&a).add(&a).add(&a).add(&a);
        assert_eq!(a.mul_by_five(), five);
    }

    #[test]
    fn invert_zero_errs() {
        assert_eq!(FieldElement::ZERO.invert(), Err(FieldError::DivisionByZero));
    }

    #[test]
    fn invert_round_trips() {
        let a = FieldElement::from_u64(99999);
        let inv = a.invert().unwrap();
        assert!(a.mul(&inv).is_one());
    }

    #[test]
    fn u256_roundtrip() {
        let v = U256::from_raw([1, 2, 3, 0]);
        let f = FieldElement::from_u256(&v);
        assert_eq!(f.to_u256(), v);
    }

    #[test]
    fn i64_roundtrip() {
        for v in [-12345i64, 0, 99999] {
            let f = FieldElement::from_i64(v);
            assert_eq!(f.to_i64().unwrap(), v);
        }
    }

    #[test]
    fn cmp_abs_detects_negation() {
        let a = FieldElement::from_u64(17);
        let b = a.neg();
        let (abs_eq, eq) = a.cmp_abs(&b);
        assert!(abs_eq);
        assert!(!eq);
    }

    #[test]
    fn jacobi_of_square_is_one() {
        let a = FieldElement::from_u64(4);
        let sq = a.mul(&a);
        assert_eq!(sq.jacobi(), 1);
    }
}
