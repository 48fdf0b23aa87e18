pub mod auth;
pub mod request_id;

pub use auth::{hash_api_key, ApiKeyAuth, ApiKeyStore, Principal};
pub use request_id::{RequestId, RequestIdValue};
