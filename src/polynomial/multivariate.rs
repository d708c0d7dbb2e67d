use std::collections::BTreeMap;

use crate::error::FriResult;
use crate::field::{FieldElement, HasFieldOperations};
use crate::polynomial::univariate::Polynomial;

/// A multivariate polynomial represented as a map from exponent tuples to
/// coefficients — a direct port of the exponent-tuple-dictionary
/// representation used by AIR-style constraint systems. Not exercised by
/// FRI itself; it is the algebra this protocol's transcripts are meant to
/// be composed with.
#[derive(Debug)]
pub struct Multivariate<F: HasFieldOperations> {
    terms: BTreeMap<Vec<u64>, FieldElement<F>>,
}

impl<F: HasFieldOperations> Clone for Multivariate<F> {
    fn clone(&self) -> Self {
        Multivariate { terms: self.terms.clone() }
    }
}

fn pad(exponents: &[u64], len: usize) -> Vec<u64> {
    let mut padded = exponents.to_vec();
    padded.resize(len, 0);
    padded
}

impl<F: HasFieldOperations> Multivariate<F> {
    pub fn zero() -> Self {
        Multivariate { terms: BTreeMap::new() }
    }

    pub fn constant(value: FieldElement<F>) -> Self {
        let mut terms = BTreeMap::new();
        if !value.is_zero() {
            terms.insert(vec![], value);
        }
        Multivariate { terms }
    }

    pub fn is_zero(&self) -> bool {
        self.terms.values().all(|c| c.is_zero())
    }

    /// Returns `num_variables` single-variable generators `x_0, ..., x_{n-1}`.
    pub fn variables(num_variables: usize) -> Vec<Self> {
        (0..num_variables)
            .map(|i| {
                let mut exponents = vec![0u64; num_variables];
                exponents[i] = 1;
                let mut terms = BTreeMap::new();
                terms.insert(exponents, FieldElement::one());
                Multivariate { terms }
            })
            .collect()
    }

    /// Embeds a univariate polynomial as a multivariate one in variable
    /// `variable_index` (of `num_variables` total).
    pub fn lift(poly: &Polynomial<F>, variable_index: usize, num_variables: usize) -> Self {
        let mut terms = BTreeMap::new();
        for (power, &coeff) in poly.coefficients().iter().enumerate() {
            if coeff.is_zero() {
                continue;
            }
            let mut exponents = vec![0u64; num_variables];
            exponents[variable_index] = power as u64;
            terms.insert(exponents, coeff);
        }
        Multivariate { terms }
    }

    pub fn add(&self, other: &Self) -> Self {
        let len = self
            .terms
            .keys()
            .chain(other.terms.keys())
            .map(|k| k.len())
            .fold(0, usize::max);
        let mut result: BTreeMap<Vec<u64>, FieldElement<F>> = BTreeMap::new();
        for (exponents, &coeff) in &self.terms {
            *result.entry(pad(exponents, len)).or_insert_with(FieldElement::zero) =
                coeff;
        }
        for (exponents, &coeff) in &other.terms {
            let key = pad(exponents, len);
            let entry = result.entry(key).or_insert_with(FieldElement::zero);
            *entry = *entry + coeff;
        }
        result.retain(|_, v| !v.is_zero());
        Multivariate { terms: result }
    }

    pub fn neg(&self) -> Self {
        Multivariate {
            terms: self.terms.iter().map(|(k, &v)| (k.clone(), -v)).collect(),
        }
    }

    pub fn sub(&self, other: &Self) -> Self {
        self.add(&other.neg())
    }

    pub fn mul(&self, other: &Self) -> Self {
        let num_vars = self
            .terms
            .keys()
            .chain(other.terms.keys())
            .map(|k| k.len())
            .fold(0, usize::max);
        let mut result: BTreeMap<Vec<u64>, FieldElement<F>> = BTreeMap::new();
        for (a_exp, &a_coeff) in &self.terms {
            let a_padded = pad(a_exp, num_vars);
            for (b_exp, &b_coeff) in &other.terms {
                let b_padded = pad(b_exp, num_vars);
                let combined: Vec<u64> = a_padded
                    .iter()
                    .zip(b_padded.iter())
                    .map(|(x, y)| x + y)
                    .collect();
                let entry = result.entry(combined).or_insert_with(FieldElement::zero);
                *entry = *entry + a_coeff * b_coeff;
            }
        }
        result.retain(|_, v| !v.is_zero());
        Multivariate { terms: result }
    }

    pub fn pow(&self, exponent: u64) -> Self {
        let mut result = Multivariate::constant(FieldElement::one());
        for _ in 0..exponent {
            result = result.mul(self);
        }
        result
    }

    pub fn evaluate(&self, point: &[FieldElement<F>]) -> FieldElement<F> {
        let mut total = FieldElement::zero();
        for (exponents, &coeff) in &self.terms {
            let mut term = coeff;
            for (i, &e) in exponents.iter().enumerate() {
                if e == 0 {
                    continue;
                }
                term = term * point[i].pow(e as u128);
            }
            total = total + term;
        }
        total
    }

    /// Substitutes each variable with a univariate polynomial and combines
    /// the results into a single univariate polynomial.
    pub fn evaluate_symbolic(&self, point: &[Polynomial<F>]) -> FriResult<Polynomial<F>> {
        let mut total = Polynomial::zero();
        for (exponents, &coeff) in &self.terms {
            let mut term = Polynomial::constant(coeff);
            for (i, &e) in exponents.iter().enumerate() {
                if e == 0 {
                    continue;
                }
                term = term * point[i].pow(e as u64);
            }
            total = total + term;
        }
        Ok(total)
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
    fn variables_evaluate_to_their_coordinate() {
        let vars = Multivariate::<U128PrimeField<P>>::variables(2);
        let point = [fe(3), fe(5)];
        assert_eq!(vars[0].evaluate(&point), fe(3));
        assert_eq!(vars[1].evaluate(&point), fe(5));
    }

    #[test]
    fn product_of_variables_evaluates_correctly() {
        let vars = Multivariate::<U128PrimeField<P>>::variables(2);
        let product = vars[0].mul(&vars[1]);
        let point = [fe(3), fe(5)];
        assert_eq!(product.evaluate(&point), fe(15));
    }

    #[test]
    fn lift_matches_univariate_evaluation() {
        let poly = Polynomial::<U128PrimeField<P>>::new(vec![fe(1), fe(2), fe(3)]);
        let lifted = Multivariate::lift(&poly, 0, 1);
        assert_eq!(lifted.evaluate(&[fe(7)]), poly.evaluate(fe(7)));
    }
}
