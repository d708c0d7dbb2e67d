pub mod element;
pub mod traits;

pub use element::{Fp, FieldElement, U128PrimeField, OMEGA_MAX, P};
pub use traits::HasFieldOperations;
