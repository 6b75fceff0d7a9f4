//! GreenGate controller library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. Concrete device, network, and cloud adapters live outside
//! this crate and plug in through the port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod actor;
pub mod app;
pub mod config;
pub mod runner;
pub mod schedule;
pub mod telemetry;

mod error;

pub use error::{Error, Result};
