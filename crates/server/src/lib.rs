#![forbid(unsafe_code)]

pub mod api;
pub mod dto;
pub mod error;

pub use api::{AppState, router};
pub use error::ApiError;
