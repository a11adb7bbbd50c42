pub mod entities;
pub mod errors;
pub mod requests;

pub use crate::errors::ApiError;
