//! Table recognition client library
//!
//! An async client for an image-to-spreadsheet service: upload an image, wait
//! for OCR, edit the recognized tables (including merged cells) and download
//! the generated spreadsheet.

pub mod api;
pub mod error;
pub mod grid;
pub mod model;
pub mod pipeline;
pub mod poll;
pub mod session;

mod client;
mod response;

pub use client::*;
pub use response::Envelope;
