use crate::error::FriResult;

/// Operations a prime field implementation must provide. Mirrors the
/// teacher's `HasFieldOperations` trait: a zero-sized type parameterizes
/// `FieldElement<F>` and supplies arithmetic over a raw representative type,
/// rather than `FieldElement` itself carrying the modulus.
pub trait HasFieldOperations {
    type BaseType: Clone + Copy + std::fmt::Debug + PartialEq + Eq;

    fn add(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;
    fn sub(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;
    fn mul(a: &Self::BaseType, b: &Self::BaseType) -> Self::BaseType;
    fn neg(a: &Self::BaseType) -> Self::BaseType;
    fn inv(a: &Self::BaseType) -> FriResult<Self::BaseType>;

    fn div(a: &Self::BaseType, b: &Self::BaseType) -> FriResult<Self::BaseType> {
        Ok(Self::mul(a, &Self::inv(b)?))
    }

    fn eq(a: &Self::BaseType, b: &Self::BaseType) -> bool {
        a == b
    }

    fn zero() -> Self::BaseType;
    fn one() -> Self::BaseType;
    fn from_u128(value: u128) -> Self::BaseType;
    fn representative(a: &Self::BaseType) -> u128;

    /// Square-and-multiply exponentiation; fields rarely need to override
    /// this default.
    fn pow(a: &Self::BaseType, mut exponent: u128) -> Self::BaseType {
        let mut base = *a;
        let mut result = Self::one();
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = Self::mul(&result, &base);
            }
            base = Self::mul(&base, &base);
            exponent >>= 1;
        }
        result
    }
}
