//! Metadata extraction through the external yt-dlp tool.
//!
//! The tool is treated as a black box: a URL goes in as an argument, one JSON
//! document comes out on stdout.

pub mod invoker;

pub use invoker::ExtractionInvoker;
