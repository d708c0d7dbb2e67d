//! FRI proximity prover/verifier over a fixed prime field, with its
//! supporting big-integer, field, polynomial, Merkle commitment and
//! Fiat-Shamir transcript layers.

pub mod error;
pub mod fiat_shamir;
pub mod field;
pub mod fri;
pub mod hash;
pub mod merkle;
pub mod polynomial;
pub mod unsigned_integer;

pub use error::{FriError, FriResult};
pub use field::Fp;
pub use fiat_shamir::{Transcript, TranscriptItem};
pub use fri::Fri;
