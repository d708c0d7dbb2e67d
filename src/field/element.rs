use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::error::{FriError, FriResult};
use crate::field::traits::HasFieldOperations;
use crate::unsigned_integer::{xgcd, U256};

/// An element of the field `F`. Wraps `F::BaseType`; all arithmetic is
/// delegated to `F`'s trait methods, matching the teacher's
/// `FieldElement<F: HasFieldOperations>` wrapper.
pub struct FieldElement<F: HasFieldOperations> {
    value: F::BaseType,
    _marker: PhantomData<F>,
}

impl<F: HasFieldOperations> Clone for FieldElement<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: HasFieldOperations> Copy for FieldElement<F> {}

impl<F: HasFieldOperations> FieldElement<F> {
    pub fn new(value: F::BaseType) -> Self {
        FieldElement { value, _marker: PhantomData }
    }

    pub fn value(&self) -> &F::BaseType {
        &self.value
    }

    pub fn representative(&self) -> u128 {
        F::representative(&self.value)
    }

    pub fn zero() -> Self {
        FieldElement::new(F::zero())
    }

    pub fn one() -> Self {
        FieldElement::new(F::one())
    }

    pub fn from_u128(value: u128) -> Self {
        FieldElement::new(F::from_u128(value))
    }

    pub fn inv(&self) -> FriResult<Self> {
        Ok(FieldElement::new(F::inv(&self.value)?))
    }

    pub fn pow(&self, exponent: u128) -> Self {
        FieldElement::new(F::pow(&self.value, exponent))
    }

    pub fn is_zero(&self) -> bool {
        F::eq(&self.value, &F::zero())
    }
}

impl<F: HasFieldOperations> PartialEq for FieldElement<F> {
    fn eq(&self, other: &Self) -> bool {
        F::eq(&self.value, &other.value)
    }
}
impl<F: HasFieldOperations> Eq for FieldElement<F> {}

impl<F: HasFieldOperations> fmt::Debug for FieldElement<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({:?})", self.value)
    }
}

impl<F: HasFieldOperations> Add for FieldElement<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        FieldElement::new(F::add(&self.value, &rhs.value))
    }
}

impl<F: HasFieldOperations> Sub for FieldElement<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        FieldElement::new(F::sub(&self.value, &rhs.value))
    }
}

impl<F: HasFieldOperations> Mul for FieldElement<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        FieldElement::new(F::mul(&self.value, &rhs.value))
    }
}

impl<F: HasFieldOperations> Neg for FieldElement<F> {
    type Output = Self;
    fn neg(self) -> Self {
        FieldElement::new(F::neg(&self.value))
    }
}

impl<F: HasFieldOperations> Div for FieldElement<F> {
    type Output = FriResult<Self>;
    fn div(self, rhs: Self) -> FriResult<Self> {
        Ok(FieldElement::new(F::div(&self.value, &rhs.value)?))
    }
}

/// The canonical prime modulus: `p = 1 + 407 * 2^119`. Fits under `2^128`
/// (`407 < 2^9`), so `u128` holds every representative, but products of two
/// representatives need the full 256-bit widening multiply in
/// `unsigned_integer`.
pub const P: u128 = 1 + 407 * (1u128 << 119);

/// The literal element the reference implementation uses as both "the"
/// generator and the seed for primitive roots of unity; it has
/// multiplicative order `2^119` modulo `P`.
pub const OMEGA_MAX: u128 = 85_408_008_396_924_667_383_611_388_730_472_331_217;

/// A prime field over a `u128` modulus, parameterized at the type level so
/// `FieldElement<U128PrimeField<P>>` is monomorphic per instantiation —
/// mirrors the teacher's `U64PrimeField<const MODULO: u64>`, widened to the
/// modulus this protocol actually needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct U128PrimeField<const MODULO: u128>;

impl<const MODULO: u128> HasFieldOperations for U128PrimeField<MODULO> {
    type BaseType = u128;

    fn add(a: &u128, b: &u128) -> u128 {
        // `a + b` can overflow u128 when both are close to MODULO; reduce
        // via the modulus-complement trick instead of widening.
        let diff = MODULO - b;
        if *a >= diff {
            a - diff
        } else {
            a + b
        }
    }

    fn sub(a: &u128, b: &u128) -> u128 {
        if a >= b {
            a - b
        } else {
            MODULO - (b - a)
        }
    }

    fn mul(a: &u128, b: &u128) -> u128 {
        let product = U256::mul_u128(*a, *b);
        let (_, remainder) = product.divmod(&U256::from_u128(MODULO));
        remainder.to_u128()
    }

    fn neg(a: &u128) -> u128 {
        if *a == 0 {
            0
        } else {
            MODULO - a
        }
    }

    fn inv(a: &u128) -> FriResult<u128> {
        if *a == 0 {
            return Err(FriError::DivisionByZero);
        }
        let (bezout_a, _bezout_m, gcd) = xgcd(*a, MODULO);
        if gcd.to_u128() != 1 {
            return Err(FriError::DivisionByZero);
        }
        Ok(bezout_a.rem_euclid(&U256::from_u128(MODULO)).to_u128())
    }

    fn zero() -> u128 {
        0
    }

    fn one() -> u128 {
        1
    }

    fn from_u128(value: u128) -> u128 {
        value % MODULO
    }

    fn representative(a: &u128) -> u128 {
        *a
    }
}

/// The one concrete field this crate's FRI instance runs over.
pub type Fp = FieldElement<U128PrimeField<P>>;

impl Fp {
    /// The reference element of multiplicative order `2^119`, reused (per
    /// the source this spec distills from) as both the nominal "generator"
    /// and the seed for `primitive_nth_root`.
    pub fn generator() -> Fp {
        Fp::from_u128(OMEGA_MAX)
    }

    /// Returns a primitive `n`-th root of unity, for `n` a power of two
    /// dividing `2^119`.
    pub fn primitive_nth_root(n: u128) -> FriResult<Fp> {
        if !n.is_power_of_two() || n > (1u128 << 119) {
            return Err(FriError::BadParameter(format!(
                "{n} does not divide the field's 2-power subgroup order"
            )));
        }
        let order: u128 = 1 << 119;
        let exponent = order / n;
        Ok(Fp::from_u128(OMEGA_MAX).pow(exponent))
    }

    /// Deterministically folds a byte string into a field element, matching
    /// the reference implementation's big-endian fold-into-accumulator
    /// sampling routine: interpret `bytes` as a big-endian unsigned integer
    /// and reduce mod `P`. `acc * 256` can exceed `u128` well before the
    /// final reduction (`P` is close to `2^128`), so the running product is
    /// formed in `U256` and reduced back to a representative after every
    /// byte, the same widening multiply `U128PrimeField::mul` uses.
    pub fn sample(bytes: &[u8]) -> Fp {
        let modulus = U256::from_u128(P);
        let mut acc: u128 = 0;
        for &byte in bytes {
            let scaled = U256::mul_u128(acc, 256);
            let widened = scaled.add(&U256::from_u128(byte as u128)).0;
            let (_, remainder) = widened.divmod(&modulus);
            acc = remainder.to_u128();
        }
        Fp::from_u128(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_are_inverse() {
        let a = Fp::from_u128(123456789);
        let b = Fp::from_u128(987654321);
        assert_eq!((a + b) - b, a);
    }

    #[test]
    fn mul_by_inverse_is_one() {
        let a = Fp::from_u128(42);
        let inv = a.inv().unwrap();
        assert_eq!(a * inv, Fp::one());
    }

    #[test]
    fn zero_has_no_inverse() {
        assert!(Fp::zero().inv().is_err());
    }

    #[test]
    fn primitive_root_has_expected_order() {
        let n: u128 = 1 << 10;
        let root = Fp::primitive_nth_root(n).unwrap();
        assert_eq!(root.pow(n), Fp::one());
        assert_ne!(root.pow(n / 2), Fp::one());
    }

    #[test]
    fn sample_is_deterministic() {
        let a = Fp::sample(b"fri-iop");
        let b = Fp::sample(b"fri-iop");
        assert_eq!(a, b);
    }

    #[test]
    fn near_modulus_addition_does_not_overflow() {
        let a = Fp::from_u128(P - 1);
        let b = Fp::from_u128(P - 1);
        let sum = a + b;
        assert_eq!(sum, Fp::from_u128(P - 2));
    }
}
