//! Stateless image relay for clients blocked by cross-origin rules.

pub mod image;

pub use image::{ImageProxy, ProxiedImage, PROXY_CONTENT_TYPE};
