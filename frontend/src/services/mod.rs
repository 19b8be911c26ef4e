pub mod api;
pub mod date_utils;

pub use api::{ApiClient, ApiError, IdentityApi, RecordApi, RecordWrite};
