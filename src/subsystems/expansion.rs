//! # RMTT expansion board
//!
//! The RoboMaster TT variant of the drone ships with an expansion board
//! carrying an RGB LED and an 8x8 LED matrix, controlled through the `EXT`
//! family of commands. Whether the board is present is probed once during
//! [connect](crate::Tello::connect); on a plain Tello every method here
//! resolves to [Error::NotSupported](crate::Error::NotSupported).
//!
//! The firmware does not acknowledge `EXT` commands, so these methods
//! resolve as soon as the command is sent.

use std::sync::Arc;

use crate::link::Connection;
use crate::protocol::{Command, MatrixColor, ScrollDirection};
use crate::{Error, Result};

/// # Access to the RMTT expansion board
///
/// See the [expansion module documentation](crate::subsystems::expansion) for more context and information.
pub struct Expansion {
    link: Arc<Connection>,
    available: bool,
}

impl Expansion {
    pub(crate) fn new(link: Arc<Connection>, available: bool) -> Self {
        Self { link, available }
    }

    /// True if the connected drone answered the hardware probe as an RMTT.
    pub fn is_available(&self) -> bool {
        self.available
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::NotSupported(
                "the LED and matrix commands need the RMTT expansion board".to_owned(),
            ))
        }
    }

    /// Set the RGB LED to a steady color.
    pub async fn set_led(&self, r: u8, g: u8, b: u8) -> Result<()> {
        self.ensure_available()?;
        self.link.request(&Command::LedColor { r, g, b }).await?;
        Ok(())
    }

    /// Fade the RGB LED in and out at `rate` Hz, in 0.1..=2.5.
    pub async fn pulse_led(&self, r: u8, g: u8, b: u8, rate: f32) -> Result<()> {
        self.ensure_available()?;
        self.link.request(&Command::LedPulse { r, g, b, rate }).await?;
        Ok(())
    }

    /// Blink the RGB LED between two colors at `rate` Hz, in 0.1..=2.5.
    ///
    /// The colors are `(r, g, b)` triplets.
    pub async fn blink_led(
        &self,
        first: (u8, u8, u8),
        second: (u8, u8, u8),
        rate: f32,
    ) -> Result<()> {
        self.ensure_available()?;
        let (r1, g1, b1) = first;
        let (r2, g2, b2) = second;
        self.link
            .request(&Command::LedBlink { r1, g1, b1, r2, g2, b2, rate })
            .await?;
        Ok(())
    }

    /// Draw a static image on the LED matrix.
    ///
    /// The pattern is 64 characters, one per pixel row by row from the top
    /// left: `r` for red, `b` for blue, `p` for purple and `0` for off.
    pub async fn draw_pattern(&self, pattern: &str) -> Result<()> {
        self.ensure_available()?;
        self.link
            .request(&Command::MatrixPattern(pattern.to_owned()))
            .await?;
        Ok(())
    }

    /// Show a single character on the LED matrix.
    pub async fn show_character(
        &self,
        color: MatrixColor,
        rate: f32,
        character: char,
    ) -> Result<()> {
        self.ensure_available()?;
        self.link
            .request(&Command::MatrixChar { color, rate, character })
            .await?;
        Ok(())
    }

    /// Scroll a text across the LED matrix.
    ///
    /// The text is 1 to 70 characters and scrolls at `rate` Hz in 0.1..=2.5.
    pub async fn scroll_text(
        &self,
        direction: ScrollDirection,
        color: MatrixColor,
        rate: f32,
        text: &str,
    ) -> Result<()> {
        self.ensure_available()?;
        self.link
            .request(&Command::MatrixScroll {
                direction,
                color,
                rate,
                text: text.to_owned(),
            })
            .await?;
        Ok(())
    }

    /// Set the brightness of the LED matrix, 0 to 255.
    pub async fn set_brightness(&self, level: u8) -> Result<()> {
        self.ensure_available()?;
        self.link.request(&Command::MatrixBrightness(level)).await?;
        Ok(())
    }
}
