use std::ops::{Add, Mul, Neg, Sub};

use crate::error::{FriError, FriResult};
use crate::field::{FieldElement, HasFieldOperations};

/// A univariate polynomial over `F`, stored as a coefficient vector with
/// `coefficients[i]` the coefficient of `x^i`. The zero polynomial is the
/// empty vector, giving it `degree() == -1` rather than colliding with a
/// genuine degree-0 constant.
#[derive(Debug)]
pub struct Polynomial<F: HasFieldOperations> {
    coefficients: Vec<FieldElement<F>>,
}

impl<F: HasFieldOperations> Clone for Polynomial<F> {
    fn clone(&self) -> Self {
        Polynomial { coefficients: self.coefficients.clone() }
    }
}

impl<F: HasFieldOperations> Polynomial<F> {
    pub fn new(mut coefficients: Vec<FieldElement<F>>) -> Self {
        while let Some(last) = coefficients.last() {
            if last.is_zero() {
                coefficients.pop();
            } else {
                break;
            }
        }
        Polynomial { coefficients }
    }

    pub fn zero() -> Self {
        Polynomial { coefficients: Vec::new() }
    }

    pub fn constant(value: FieldElement<F>) -> Self {
        Polynomial::new(vec![value])
    }

    pub fn coefficients(&self) -> &[FieldElement<F>] {
        &self.coefficients
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// `-1` for the zero polynomial, otherwise the highest exponent with a
    /// non-zero coefficient.
    pub fn degree(&self) -> i64 {
        if self.coefficients.is_empty() {
            -1
        } else {
            (self.coefficients.len() - 1) as i64
        }
    }

    pub fn leading_coefficient(&self) -> FieldElement<F> {
        self.coefficients.last().copied().unwrap_or_else(FieldElement::zero)
    }

    pub fn evaluate(&self, point: FieldElement<F>) -> FieldElement<F> {
        let mut result = FieldElement::zero();
        for &coeff in self.coefficients.iter().rev() {
            result = result * point + coeff;
        }
        result
    }

    pub fn evaluate_domain(&self, domain: &[FieldElement<F>]) -> Vec<FieldElement<F>> {
        domain.iter().map(|&point| self.evaluate(point)).collect()
    }

    /// Lagrange interpolation through `(domain[i], values[i])`.
    pub fn interpolate_domain(
        domain: &[FieldElement<F>],
        values: &[FieldElement<F>],
    ) -> FriResult<Self> {
        if domain.len() != values.len() {
            return Err(FriError::BadParameter(
                "interpolation domain and values must have equal length".into(),
            ));
        }
        if domain.is_empty() {
            return Err(FriError::BadParameter(
                "cannot interpolate an empty domain".into(),
            ));
        }
        let mut result = Polynomial::zero();
        for i in 0..domain.len() {
            let mut term = Polynomial::constant(values[i]);
            for j in 0..domain.len() {
                if i == j {
                    continue;
                }
                let denominator = (domain[i] - domain[j]).inv()?;
                let factor = Polynomial::new(vec![-domain[j] * denominator, denominator]);
                term = term * factor;
            }
            result = result + term;
        }
        Ok(result)
    }

    /// The monic polynomial vanishing exactly on `domain`.
    pub fn zerofier_domain(domain: &[FieldElement<F>]) -> Self {
        let mut result = Polynomial::constant(FieldElement::one());
        for &point in domain {
            let factor = Polynomial::new(vec![-point, FieldElement::one()]);
            result = result * factor;
        }
        result
    }

    /// Returns `f(factor * x)`, i.e. `coefficients[i] * factor^i`.
    pub fn scale(&self, factor: FieldElement<F>) -> Self {
        let mut power = FieldElement::one();
        let scaled = self
            .coefficients
            .iter()
            .map(|&c| {
                let term = c * power;
                power = power * factor;
                term
            })
            .collect();
        Polynomial::new(scaled)
    }

    pub fn pow(&self, mut exponent: u64) -> Self {
        let mut base = self.clone();
        let mut result = Polynomial::constant(FieldElement::one());
        while exponent > 0 {
            if exponent & 1 == 1 {
                result = result.clone() * base.clone();
            }
            base = base.clone() * base.clone();
            exponent >>= 1;
        }
        result
    }

    /// Polynomial long division: `self = quotient * divisor + remainder`,
    /// with `degree(remainder) < degree(divisor)`.
    pub fn divide(&self, divisor: &Self) -> FriResult<(Self, Self)> {
        if divisor.is_zero() {
            return Err(FriError::DivisionByZero);
        }
        if self.degree() < divisor.degree() {
            return Ok((Polynomial::zero(), self.clone()));
        }
        let mut remainder = self.coefficients.clone();
        let divisor_degree = divisor.degree();
        let leading_inv = divisor.leading_coefficient().inv()?;
        let mut quotient = vec![FieldElement::zero(); (self.degree() - divisor_degree + 1) as usize];

        loop {
            let remainder_degree = {
                let trimmed = Polynomial::new(remainder.clone());
                trimmed.degree()
            };
            if remainder_degree < divisor_degree {
                break;
            }
            let shift = (remainder_degree - divisor_degree) as usize;
            let coeff = remainder[remainder_degree as usize] * leading_inv;
            quotient[shift] = coeff;
            for (i, &d) in divisor.coefficients.iter().enumerate() {
                remainder[shift + i] = remainder[shift + i] - coeff * d;
            }
        }

        Ok((Polynomial::new(quotient), Polynomial::new(remainder)))
    }

    /// Exact division; errors if the remainder is non-zero.
    pub fn exact_divide(&self, divisor: &Self) -> FriResult<Self> {
        let (quotient, remainder) = self.divide(divisor)?;
        if !remainder.is_zero() {
            return Err(FriError::NonExactDivision);
        }
        Ok(quotient)
    }

    /// True iff every point in `points` lies on a single line, i.e. the
    /// interpolant through them has degree exactly 1. A shared y-value
    /// (degree-0 interpolant) does not count as colinear.
    pub fn test_colinearity(points: &[(FieldElement<F>, FieldElement<F>)]) -> FriResult<bool> {
        if points.len() < 2 {
            return Err(FriError::BadParameter(
                "colinearity requires at least two points".into(),
            ));
        }
        let domain: Vec<FieldElement<F>> = points.iter().map(|p| p.0).collect();
        let values: Vec<FieldElement<F>> = points.iter().map(|p| p.1).collect();
        let interpolant = Polynomial::interpolate_domain(&domain, &values)?;
        Ok(interpolant.degree() == 1)
    }
}

impl<F: HasFieldOperations> PartialEq for Polynomial<F> {
    fn eq(&self, other: &Self) -> bool {
        self.coefficients == other.coefficients
    }
}

impl<F: HasFieldOperations> Add for Polynomial<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let len = self.coefficients.len().max(rhs.coefficients.len());
        let mut result = Vec::with_capacity(len);
        for i in 0..len {
            let a = self.coefficients.get(i).copied().unwrap_or_else(FieldElement::zero);
            let b = rhs.coefficients.get(i).copied().unwrap_or_else(FieldElement::zero);
            result.push(a + b);
        }
        Polynomial::new(result)
    }
}

impl<F: HasFieldOperations> Sub for Polynomial<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<F: HasFieldOperations> Neg for Polynomial<F> {
    type Output = Self;
    fn neg(self) -> Self {
        Polynomial::new(self.coefficients.iter().map(|&c| -c).collect())
    }
}

impl<F: HasFieldOperations> Mul for Polynomial<F> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Polynomial::zero();
        }
        let mut result = vec![FieldElement::zero(); self.coefficients.len() + rhs.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in rhs.coefficients.iter().enumerate() {
                result[i + j] = result[i + j] + a * b;
            }
        }
        Polynomial::new(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Fp, P, U128PrimeField};

    fn fe(v: u128) -> Fp {
        Fp::from_u128(v)
    }

    #[test]
    fn zero_polynomial_has_degree_minus_one() {
        assert_eq!(Polynomial::<U128PrimeField<P>>::zero().degree(), -1);
    }

    #[test]
    fn interpolate_then_evaluate_round_trips() {
        let domain = vec![fe(1), fe(2), fe(3)];
        let values = vec![fe(1), fe(4), fe(9)];
        let poly = Polynomial::interpolate_domain(&domain, &values).unwrap();
        for (x, y) in domain.iter().zip(values.iter()) {
            assert_eq!(poly.evaluate(*x), *y);
        }
    }

    #[test]
    fn zerofier_vanishes_on_domain() {
        let domain = vec![fe(5), fe(6), fe(7)];
        let z = Polynomial::zerofier_domain(&domain);
        for &point in &domain {
            assert!(z.evaluate(point).is_zero());
        }
    }

    #[test]
    fn divide_recovers_quotient_and_zero_remainder() {
        let a = Polynomial::new(vec![fe(6), fe(11), fe(6), fe(1)]); // (x+1)(x+2)(x+3)
        let b = Polynomial::new(vec![fe(1), fe(1)]); // x + 1
        let (q, r) = a.divide(&b).unwrap();
        assert!(r.is_zero());
        assert_eq!(q.evaluate(fe(0)), fe(6));
    }

    #[test]
    fn colinear_points_detected() {
        let points = vec![(fe(0), fe(1)), (fe(1), fe(3)), (fe(2), fe(5))]; // y = 2x + 1
        assert!(Polynomial::test_colinearity(&points).unwrap());
    }

    #[test]
    fn non_colinear_points_rejected() {
        let points = vec![(fe(0), fe(1)), (fe(1), fe(3)), (fe(2), fe(9))];
        assert!(!Polynomial::test_colinearity(&points).unwrap());
    }
}
