//! Common HID utilities shared by the hidstick crates
//!
//! This crate provides the byte-level building blocks used on both sides of a
//! report: a capacity-bounded [`ReportWriter`] for descriptors and input
//! reports, a [`ReportParser`] for inbound records, and the [`HidTransport`]
//! trait that stands in for the USB stack.

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]

pub mod hid_traits;
pub mod report_parser;

pub use hid_traits::*;
pub use report_parser::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HidCommonError {
    #[error("Buffer overflow: {requested} bytes requested, capacity is {capacity}")]
    BufferOverflow { capacity: usize, requested: usize },

    #[error("Invalid report format: {0}")]
    InvalidReport(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Device disconnected")]
    Disconnected,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type HidCommonResult<T> = Result<T, HidCommonError>;
