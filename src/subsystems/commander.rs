//! # Flight command subsystem
//!
//! This subsystem sends the flight commands of the SDK interface. Most of
//! them are *actions*: the drone acknowledges them only once the maneuver is
//! finished, so a call like [Commander::forward()] resolves when the drone
//! has actually covered the distance. A failed maneuver resolves to
//! [Error::CommandFailed](crate::Error::CommandFailed) carrying the
//! firmware's error text.
//!
//! A couple of things to be aware of when flying:
//!  - Distances are in centimeters and limited to 20..=500, rotations are
//!    in degrees in 1..=360. Out-of-range arguments are rejected locally
//!    before anything is sent.
//!  - [Commander::rc()] is a setpoint, not an action: it is sent
//!    fire-and-forget and needs to be refreshed regularly to keep the drone
//!    moving.
//!  - The drone lands by itself if it receives no command for about 15
//!    seconds.
//!
//! The following example code would fly a small square:
//! ``` no_run
//! # async fn square(drone: tello_lib::Tello) -> Result<(), Box<dyn std::error::Error>> {
//! drone.commander.take_off().await?;
//!
//! for _ in 0..4 {
//!     drone.commander.forward(50).await?;
//!     drone.commander.rotate_cw(90).await?;
//! }
//!
//! drone.commander.land().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::link::Connection;
use crate::protocol::{Command, Flip};
use crate::Result;

/// # Access to the flight command subsystem
///
/// See the [commander module documentation](crate::subsystems::commander) for more context and information.
pub struct Commander {
    link: Arc<Connection>,
}

impl Commander {
    pub(crate) fn new(link: Arc<Connection>) -> Self {
        Self { link }
    }
}

/// # Basic flight
impl Commander {
    /// Start the motors and climb to about 1 m.
    ///
    /// The firmware only acknowledges `takeoff` once the climb is over,
    /// which takes several seconds. The command is therefore sent without
    /// waiting for the answer: this function resolves as soon as the climb
    /// has started and the drone stabilizes on its own.
    pub async fn take_off(&self) -> Result<()> {
        self.link.request(&Command::TakeOff).await?;
        Ok(())
    }

    /// Descend and stop the motors.
    pub async fn land(&self) -> Result<()> {
        self.link.request(&Command::Land).await?;
        Ok(())
    }

    /// Stop all motors immediately. The drone falls.
    pub async fn emergency(&self) -> Result<()> {
        self.link.request(&Command::Emergency).await?;
        Ok(())
    }

    /// Stop moving and hover in place.
    ///
    /// Can be sent at any time, including in the middle of another maneuver.
    pub async fn stop(&self) -> Result<()> {
        self.link.request(&Command::Stop).await?;
        Ok(())
    }
}

/// # Linear maneuvers
///
/// These commands move the drone a fixed amount relative to where it is.
/// Distances are in centimeters in 20..=500, rotations in degrees in
/// 1..=360.
impl Commander {
    /// Climb `distance` centimeters.
    pub async fn up(&self, distance: u16) -> Result<()> {
        self.link.request(&Command::Up(distance)).await?;
        Ok(())
    }

    /// Descend `distance` centimeters.
    pub async fn down(&self, distance: u16) -> Result<()> {
        self.link.request(&Command::Down(distance)).await?;
        Ok(())
    }

    /// Fly `distance` centimeters to the left.
    pub async fn left(&self, distance: u16) -> Result<()> {
        self.link.request(&Command::Left(distance)).await?;
        Ok(())
    }

    /// Fly `distance` centimeters to the right.
    pub async fn right(&self, distance: u16) -> Result<()> {
        self.link.request(&Command::Right(distance)).await?;
        Ok(())
    }

    /// Fly `distance` centimeters forward.
    pub async fn forward(&self, distance: u16) -> Result<()> {
        self.link.request(&Command::Forward(distance)).await?;
        Ok(())
    }

    /// Fly `distance` centimeters backward.
    pub async fn back(&self, distance: u16) -> Result<()> {
        self.link.request(&Command::Back(distance)).await?;
        Ok(())
    }

    /// Rotate clockwise by `angle` degrees.
    pub async fn rotate_cw(&self, angle: u16) -> Result<()> {
        self.link.request(&Command::RotateCw(angle)).await?;
        Ok(())
    }

    /// Rotate counter-clockwise by `angle` degrees.
    pub async fn rotate_ccw(&self, angle: u16) -> Result<()> {
        self.link.request(&Command::RotateCcw(angle)).await?;
        Ok(())
    }

    /// Perform an automated flip in the given direction.
    ///
    /// The firmware refuses to flip when the battery is below 50%.
    pub async fn flip(&self, direction: Flip) -> Result<()> {
        self.link.request(&Command::Flip(direction)).await?;
        Ok(())
    }
}

/// # Coordinate maneuvers
///
/// These commands fly to a point given in the drone's body frame at the
/// time the command is received: x is forward, y is left and z is up, all
/// in centimeters.
impl Commander {
    /// Fly in a straight line to (`x`, `y`, `z`) at `speed` cm/s.
    ///
    /// Coordinates are in -500..=500 and cannot all be within -20..20 at
    /// the same time. Speed is in 10..=100.
    pub async fn go(&self, x: i16, y: i16, z: i16, speed: u8) -> Result<()> {
        self.link.request(&Command::Go { x, y, z, speed }).await?;
        Ok(())
    }

    /// Fly a curve through (`x1`, `y1`, `z1`) ending at (`x2`, `y2`, `z2`)
    /// at `speed` cm/s.
    ///
    /// The firmware fits an arc through the current position and the two
    /// points, so the arc radius must stay within 0.5 m to 10 m. Speed is
    /// in 10..=60.
    #[allow(clippy::too_many_arguments)]
    pub async fn curve(
        &self,
        x1: i16,
        y1: i16,
        z1: i16,
        x2: i16,
        y2: i16,
        z2: i16,
        speed: u8,
    ) -> Result<()> {
        self.link
            .request(&Command::Curve { x1, y1, z1, x2, y2, z2, speed })
            .await?;
        Ok(())
    }

    /// Set the cruise speed used by the linear maneuvers, in cm/s in
    /// 10..=100.
    pub async fn set_speed(&self, speed: u8) -> Result<()> {
        self.link.request(&Command::Speed(speed)).await?;
        Ok(())
    }
}

/// # Manual control
impl Commander {
    /// Send one remote-control style setpoint.
    ///
    /// The four axes are in percent in -100..=100: positive `left_right`
    /// moves right, positive `forward_back` moves forward, positive
    /// `up_down` climbs and positive `yaw` rotates clockwise. The setpoint
    /// stays active until replaced, so a control loop should keep sending
    /// them and finish with all axes at zero.
    pub async fn rc(
        &self,
        left_right: i8,
        forward_back: i8,
        up_down: i8,
        yaw: i8,
    ) -> Result<()> {
        self.link
            .request(&Command::Rc { left_right, forward_back, up_down, yaw })
            .await?;
        Ok(())
    }
}
