//! usb-snapshot library crate.
//!
//! This module exposes the internal components for integration testing.

pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod interrupt;
pub mod logging;
pub mod preview;
pub mod selection;
pub mod storage;
pub mod terminal;
pub mod watermark;
