//! ytdl-gateway: yt-dlp metadata extraction over HTTP, plus an image proxy.
//!
//! The [`assets`] module makes sure the tool is on disk, [`extraction`] runs
//! it, [`proxy`] relays images and [`server`] wires all of it into an axum
//! router.

pub mod assets;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod proxy;
pub mod server;

#[cfg(all(test, unix))]
pub(crate) mod test_support;
