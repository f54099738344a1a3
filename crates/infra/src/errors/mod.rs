//! Infrastructure error conversions

pub mod conversions;

pub(crate) use conversions::is_transient;
pub use conversions::InfraError;
