//! # Tello library
//!
//! This crate allows to connect, communicate with and control the Ryze/DJI
//! Tello, Tello EDU and RoboMaster TT drones over their Wi-Fi SDK
//! interface. The drone opens an access point; once the host has joined it,
//! everything goes over UDP.
//!
//! ## Status
//!
//! The crate aims at implementing a Rust API for the full SDK interface.
//! The drone functionalities are implemented in subsystems. The current
//! status is:
//!
//! | Subsystem | Support |
//! |-----------|---------|
//! | Commander | Full |
//! | Platform | Full |
//! | Telemetry | Full |
//! | Expansion (RMTT) | LED and matrix |
//! | Video | Encoded frames (no decoding) |
//! | Mission pads | None |
//!
//! ## Compatibility
//!
//! This crate talks SDK 2.0, the protocol understood by the Tello EDU and
//! the RoboMaster TT. The original Tello (SDK 1.3) works for everything but
//! the `stop` command and the `sdk?`/`sn?` queries; the RMTT extension
//! commands are gated on the hardware probe done at connection time.
//!
//! ## Usage
//!
//! The basic procedure to use the lib is:
//!  - Join the drone's Wi-Fi access point (or have the drone join your
//!    network, see [ConnectOptions])
//!  - Create a [Tello] object, this connects to the drone, switches it to
//!    SDK mode and initializes the subsystems
//!  - Subsystems are available as public fields of the [Tello] struct.
//!  - Use the subsystems to fly and observe the drone
//!  - Drop the [Tello] object or call [Tello::disconnect()]
//!
//! All subsystem functions only take an un-mutable reference to self
//! (`&self`), the intention is for the [Tello] object to be shared between
//! tasks using `Arc<>` or `Rc<>`.
//!
//! For example:
//! ``` no_run
//! # async fn test() -> Result<(), Box<dyn std::error::Error>> {
//! let drone = tello_lib::Tello::connect().await?;
//!
//! println!("Battery at {} %", drone.platform.battery().await?);
//!
//! drone.commander.take_off().await?;
//! drone.commander.forward(50).await?;
//! drone.commander.land().await?;
//!
//! drone.disconnect().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod link;
mod protocol;
mod state;
mod tello;

pub mod subsystems;

pub use crate::error::{Error, Result};
pub use crate::protocol::{Flip, MatrixColor, ScrollDirection};
pub use crate::state::FlightState;
pub use crate::tello::{ConnectOptions, Hardware, Tello};
