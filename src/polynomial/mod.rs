pub mod multivariate;
pub mod univariate;

pub use multivariate::Multivariate;
pub use univariate::Polynomial;
