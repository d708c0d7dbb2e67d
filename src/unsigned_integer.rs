//! Fixed-width big integer support for the prime field modulus.
//!
//! `p = 1 + 407 * 2^119` fits in a `u128`, but multiplying two field
//! elements can overflow 128 bits, and the Bezout coefficients produced by
//! the extended Euclidean algorithm can reach magnitude close to `p`, which
//! itself exceeds `i128::MAX`. `U256` and `SignedU256` give both enough
//! headroom without reaching for a variable-width bignum crate the teacher
//! doesn't use anywhere in this pack.

use std::cmp::Ordering;

/// A 256-bit unsigned integer, stored as four little-endian `u64` limbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct U256 {
    pub limbs: [u64; 4],
}

impl U256 {
    pub const ZERO: U256 = U256 { limbs: [0, 0, 0, 0] };
    pub const ONE: U256 = U256 { limbs: [1, 0, 0, 0] };

    pub fn from_u128(value: u128) -> Self {
        U256 {
            limbs: [
                value as u64,
                (value >> 64) as u64,
                0,
                0,
            ],
        }
    }

    /// Truncates to the low 128 bits. Callers must ensure the value fits.
    pub fn to_u128(&self) -> u128 {
        (self.limbs[0] as u128) | ((self.limbs[1] as u128) << 64)
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    pub fn cmp(&self, other: &U256) -> Ordering {
        for i in (0..4).rev() {
            match self.limbs[i].cmp(&other.limbs[i]) {
                Ordering::Equal => continue,
                other_ord => return other_ord,
            }
        }
        Ordering::Equal
    }

    /// Returns `(sum, carry_out)`.
    pub fn add(&self, other: &U256) -> (U256, bool) {
        let mut result = [0u64; 4];
        let mut carry = 0u128;
        for i in 0..4 {
            let sum = self.limbs[i] as u128 + other.limbs[i] as u128 + carry;
            result[i] = sum as u64;
            carry = sum >> 64;
        }
        (U256 { limbs: result }, carry != 0)
    }

    /// Returns `(difference, borrow_out)`. Wraps on underflow, matching
    /// two's-complement subtraction over the 256-bit ring.
    pub fn sub(&self, other: &U256) -> (U256, bool) {
        let mut result = [0u64; 4];
        let mut borrow = 0i128;
        for i in 0..4 {
            let diff = self.limbs[i] as i128 - other.limbs[i] as i128 - borrow;
            if diff < 0 {
                result[i] = (diff + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                result[i] = diff as u64;
                borrow = 0;
            }
        }
        (U256 { limbs: result }, borrow != 0)
    }

    /// Widening multiplication of two 128-bit values into a full 256-bit
    /// product.
    pub fn mul_u128(a: u128, b: u128) -> U256 {
        let a_lo = a as u64 as u128;
        let a_hi = (a >> 64) as u64 as u128;
        let b_lo = b as u64 as u128;
        let b_hi = (b >> 64) as u64 as u128;

        let lo_lo = a_lo * b_lo;
        let lo_hi = a_lo * b_hi;
        let hi_lo = a_hi * b_lo;
        let hi_hi = a_hi * b_hi;

        let mut limb0 = lo_lo as u64 as u128;
        let mut carry = lo_lo >> 64;

        let mid = lo_hi + hi_lo + carry;
        let limb1 = mid as u64 as u128;
        carry = mid >> 64;

        let top = hi_hi + carry;
        let limb2 = top as u64 as u128;
        let limb3 = top >> 64;

        limb0 = limb0; // limb0 already holds the low 64 bits of the product
        U256 {
            limbs: [
                limb0 as u64,
                limb1 as u64,
                limb2 as u64,
                limb3 as u64,
            ],
        }
    }

    fn bit(&self, index: u32) -> bool {
        let limb = (index / 64) as usize;
        let offset = index % 64;
        (self.limbs[limb] >> offset) & 1 == 1
    }

    fn shl1(&self) -> (U256, bool) {
        let mut result = [0u64; 4];
        let mut carry = 0u64;
        for i in 0..4 {
            let new_carry = self.limbs[i] >> 63;
            result[i] = (self.limbs[i] << 1) | carry;
            carry = new_carry;
        }
        (U256 { limbs: result }, carry != 0)
    }

    fn set_bit0(&mut self, value: bool) {
        if value {
            self.limbs[0] |= 1;
        } else {
            self.limbs[0] &= !1;
        }
    }

    /// Bit-by-bit long division. Returns `(quotient, remainder)`.
    ///
    /// Panics on division by zero; callers in this crate only ever divide
    /// by the (non-zero) field modulus or a non-zero gcd remainder.
    pub fn divmod(&self, divisor: &U256) -> (U256, U256) {
        assert!(!divisor.is_zero(), "division by zero in U256::divmod");
        let mut quotient = U256::ZERO;
        let mut remainder = U256::ZERO;
        for i in (0..256u32).rev() {
            let (shifted, overflow) = remainder.shl1();
            remainder = shifted;
            remainder.set_bit0(self.bit(i));
            let _ = overflow;
            if remainder.cmp(divisor) != Ordering::Less {
                remainder = remainder.sub(divisor).0;
                quotient.set_bit(i, true);
            }
        }
        (quotient, remainder)
    }

    fn set_bit(&mut self, index: u32, value: bool) {
        let limb = (index / 64) as usize;
        let offset = index % 64;
        if value {
            self.limbs[limb] |= 1u64 << offset;
        } else {
            self.limbs[limb] &= !(1u64 << offset);
        }
    }
}

/// A sign-magnitude wide integer, used to hold extended-GCD Bezout
/// coefficients, which can be negative and approach the field modulus in
/// magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedU256 {
    pub negative: bool,
    pub magnitude: U256,
}

impl SignedU256 {
    pub fn zero() -> Self {
        SignedU256 { negative: false, magnitude: U256::ZERO }
    }

    pub fn from_u128(value: u128) -> Self {
        SignedU256 { negative: false, magnitude: U256::from_u128(value) }
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    fn normalize(negative: bool, magnitude: U256) -> Self {
        if magnitude.is_zero() {
            SignedU256 { negative: false, magnitude }
        } else {
            SignedU256 { negative, magnitude }
        }
    }

    pub fn add(&self, other: &SignedU256) -> SignedU256 {
        if self.negative == other.negative {
            let (sum, _) = self.magnitude.add(&other.magnitude);
            SignedU256::normalize(self.negative, sum)
        } else {
            match self.magnitude.cmp(&other.magnitude) {
                Ordering::Equal => SignedU256::zero(),
                Ordering::Greater => {
                    let (diff, _) = self.magnitude.sub(&other.magnitude);
                    SignedU256::normalize(self.negative, diff)
                }
                Ordering::Less => {
                    let (diff, _) = other.magnitude.sub(&self.magnitude);
                    SignedU256::normalize(other.negative, diff)
                }
            }
        }
    }

    pub fn neg(&self) -> SignedU256 {
        SignedU256::normalize(!self.negative, self.magnitude)
    }

    pub fn sub(&self, other: &SignedU256) -> SignedU256 {
        self.add(&other.neg())
    }

    /// Multiplies this value by an unsigned, single-limb-width quotient
    /// (the quotients produced by `divmod` during `xgcd` fit in `U256`).
    pub fn mul_unsigned(&self, quotient: &U256) -> SignedU256 {
        // Schoolbook 256x256 -> low 256 bits is sufficient here: the
        // extended Euclidean invariant keeps the true mathematical product
        // within range of the modulus being reduced, so the high limbs are
        // always zero for the products xgcd actually forms.
        let mut acc = U256::ZERO;
        let mut shifted = self.magnitude;
        for i in 0..256u32 {
            if (quotient.limbs[(i / 64) as usize] >> (i % 64)) & 1 == 1 {
                acc = acc.add(&shifted).0;
            }
            shifted = shifted.shl1().0;
        }
        SignedU256::normalize(self.negative, acc)
    }

    /// Reduces modulo `modulus` (a positive `U256`), returning a value in
    /// `[0, modulus)` represented as a non-negative `SignedU256`.
    pub fn rem_euclid(&self, modulus: &U256) -> U256 {
        let (_, r) = self.magnitude.divmod(modulus);
        if self.negative && !r.is_zero() {
            modulus.sub(&r).0
        } else {
            r
        }
    }
}

/// Extended Euclidean algorithm: given `a` and `modulus`, returns
/// `(bezout_a, bezout_modulus, gcd)` such that
/// `a * bezout_a + modulus * bezout_modulus == gcd`.
///
/// Mirrors the `old_r/r`, `old_s/s`, `old_t/t` loop structure of the
/// reference implementation, widened to `U256`/`SignedU256` since `a` and
/// `modulus` do not fit in a native machine word once products are formed.
pub fn xgcd(a: u128, modulus: u128) -> (SignedU256, SignedU256, U256) {
    let mut old_r = SignedU256::from_u128(a);
    let mut r = SignedU256::from_u128(modulus);
    let mut old_s = SignedU256::from_u128(1);
    let mut s = SignedU256::zero();
    let mut old_t = SignedU256::zero();
    let mut t = SignedU256::from_u128(1);

    while !r.is_zero() {
        let (q, _) = old_r.magnitude.divmod(&r.magnitude);
        // quotient sign: old_r / r with standard integer division rounding
        // toward zero, matching Python's behavior for the values xgcd
        // actually produces (old_r, r share no forced sign pattern, so the
        // quotient's sign is the xor of the two operands' signs).
        let q_signed = SignedU256 { negative: old_r.negative != r.negative, magnitude: q };

        let new_r = old_r.sub(&signed_mul(&q_signed, &r));
        old_r = r;
        r = new_r;

        let new_s = old_s.sub(&signed_mul(&q_signed, &s));
        old_s = s;
        s = new_s;

        let new_t = old_t.sub(&signed_mul(&q_signed, &t));
        old_t = t;
        t = new_t;
    }

    (old_s, old_t, old_r.magnitude)
}

fn signed_mul(a: &SignedU256, b: &SignedU256) -> SignedU256 {
    let product = a.mul_unsigned(&b.magnitude);
    SignedU256::normalize(a.negative != b.negative, product.magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_sub_round_trip() {
        let a = U256::from_u128(u128::MAX);
        let b = U256::from_u128(1);
        let (sum, carry) = a.add(&b);
        assert!(carry);
        assert_eq!(sum.limbs[2], 1);
        let (back, borrow) = sum.sub(&b);
        assert!(!borrow);
        assert_eq!(back, a);
    }

    #[test]
    fn mul_u128_matches_small_values() {
        let product = U256::mul_u128(6, 7);
        assert_eq!(product.to_u128(), 42);
    }

    #[test]
    fn mul_u128_overflows_into_high_limbs() {
        let product = U256::mul_u128(u128::MAX, u128::MAX);
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1, which does not fit in 128 bits.
        assert_ne!(product.limbs[2], 0);
    }

    #[test]
    fn divmod_matches_native_division() {
        let a = U256::from_u128(1_000_000_007);
        let b = U256::from_u128(97);
        let (q, r) = a.divmod(&b);
        assert_eq!(q.to_u128(), 1_000_000_007 / 97);
        assert_eq!(r.to_u128(), 1_000_000_007 % 97);
    }

    #[test]
    fn xgcd_bezout_identity_holds_for_small_modulus() {
        let modulus: u128 = 1_000_000_007;
        let a: u128 = 12345;
        let (bezout_a, _bezout_m, gcd) = xgcd(a, modulus);
        assert_eq!(gcd.to_u128(), 1);
        let inverse = bezout_a.rem_euclid(&U256::from_u128(modulus));
        let product = (inverse.to_u128() * a) % modulus;
        assert_eq!(product, 1);
    }
}
