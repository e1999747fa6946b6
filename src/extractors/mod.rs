//! Request extractors whose rejections use the response envelope.

pub mod json;
pub use json::ApiJson;
