//! Application core: port traits, outbound events, and the control service.

pub mod events;
pub mod ports;
pub mod service;
