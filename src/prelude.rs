pub use standard_error::StandardError;

pub type Result<T> = std::result::Result<T, StandardError>;
