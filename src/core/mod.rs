pub mod currency;
pub mod error;

pub use currency::Toman;
pub use error::{AppError, Result};
