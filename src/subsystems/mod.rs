//! # Tello subsystems
//!
//! The SDK interface of the Tello groups naturally into a handful of
//! independent concerns: flight commands, read commands, the pushed state
//! stream, the RMTT expansion board and the video stream. Each concern is
//! implemented by one module here and exposed as one field on
//! [Tello](crate::Tello).
//!
//! Modules here implement the Rust API for the different drone subsystems,
//! they are the main way to interact with the drone.

pub mod commander;
pub mod expansion;
pub mod platform;
pub mod telemetry;
pub mod video;
