pub mod errors;

pub use errors::{ConfigError, CrystalError};

pub type Result<T> = std::result::Result<T, CrystalError>;
