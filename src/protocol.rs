//! Wire protocol for the Tello SDK interface
//!
//! The Tello is commanded with short ASCII strings sent over UDP: a command
//! word followed by space-separated arguments (for example `go 50 0 -30 60`).
//! The drone answers on the same socket with `ok`, `error`, `error <detail>`
//! or, for the `x?` read commands, with the raw value.
//!
//! This module contains the command catalog, the rendering of commands to
//! their wire strings and the decoding of answers. It is all private to the
//! crate except for the small argument enums that appear in the public API.

use std::fmt;

use crate::{Error, Result};

/// Direction of an automated flip maneuver.
///
/// Used as argument to [flip](crate::subsystems::commander::Commander::flip).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// Flip towards the left of the drone
    Left,
    /// Flip towards the right of the drone
    Right,
    /// Flip forward
    Forward,
    /// Flip backward
    Back,
}

impl Flip {
    fn as_char(self) -> char {
        match self {
            Flip::Left => 'l',
            Flip::Right => 'r',
            Flip::Forward => 'f',
            Flip::Back => 'b',
        }
    }
}

/// Scroll direction for text on the RMTT LED matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    /// Scroll towards the left
    Left,
    /// Scroll towards the right
    Right,
    /// Scroll upwards
    Up,
    /// Scroll downwards
    Down,
}

impl ScrollDirection {
    fn as_char(self) -> char {
        match self {
            ScrollDirection::Left => 'l',
            ScrollDirection::Right => 'r',
            ScrollDirection::Up => 'u',
            ScrollDirection::Down => 'd',
        }
    }
}

/// Color of characters drawn on the RMTT LED matrix.
///
/// The matrix LEDs only support these three colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixColor {
    /// Red
    Red,
    /// Blue
    Blue,
    /// Purple (red and blue together)
    Purple,
}

impl MatrixColor {
    fn as_char(self) -> char {
        match self {
            MatrixColor::Red => 'r',
            MatrixColor::Blue => 'b',
            MatrixColor::Purple => 'p',
        }
    }
}

/// Read commands answered with a value instead of `ok`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Query {
    Battery,
    Speed,
    Time,
    Wifi,
    SdkVersion,
    SerialNumber,
    Hardware,
}

impl Query {
    fn wire_word(self) -> &'static str {
        match self {
            Query::Battery => "battery?",
            Query::Speed => "speed?",
            Query::Time => "time?",
            Query::Wifi => "wifi?",
            Query::SdkVersion => "sdk?",
            Query::SerialNumber => "sn?",
            Query::Hardware => "hardware?",
        }
    }
}

/// The command catalog of the Tello SDK interface
///
/// Rendering a command with `to_string()`/[Display](fmt::Display) produces
/// the exact string sent on the wire.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// `command`, switches the drone to SDK mode. Sent once at connection.
    SdkMode,
    TakeOff,
    Land,
    Emergency,
    Stop,
    StreamOn,
    StreamOff,
    Up(u16),
    Down(u16),
    Left(u16),
    Right(u16),
    Forward(u16),
    Back(u16),
    RotateCw(u16),
    RotateCcw(u16),
    Flip(Flip),
    Go { x: i16, y: i16, z: i16, speed: u8 },
    Curve { x1: i16, y1: i16, z1: i16, x2: i16, y2: i16, z2: i16, speed: u8 },
    Speed(u8),
    Rc { left_right: i8, forward_back: i8, up_down: i8, yaw: i8 },
    Query(Query),
    LedColor { r: u8, g: u8, b: u8 },
    LedPulse { r: u8, g: u8, b: u8, rate: f32 },
    LedBlink { r1: u8, g1: u8, b1: u8, r2: u8, g2: u8, b2: u8, rate: f32 },
    MatrixPattern(String),
    MatrixChar { color: MatrixColor, rate: f32, character: char },
    MatrixScroll { direction: ScrollDirection, color: MatrixColor, rate: f32, text: String },
    MatrixBrightness(u8),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SdkMode => write!(f, "command"),
            Command::TakeOff => write!(f, "takeoff"),
            Command::Land => write!(f, "land"),
            Command::Emergency => write!(f, "emergency"),
            Command::Stop => write!(f, "stop"),
            Command::StreamOn => write!(f, "streamon"),
            Command::StreamOff => write!(f, "streamoff"),
            Command::Up(cm) => write!(f, "up {}", cm),
            Command::Down(cm) => write!(f, "down {}", cm),
            Command::Left(cm) => write!(f, "left {}", cm),
            Command::Right(cm) => write!(f, "right {}", cm),
            Command::Forward(cm) => write!(f, "forward {}", cm),
            Command::Back(cm) => write!(f, "back {}", cm),
            Command::RotateCw(deg) => write!(f, "cw {}", deg),
            Command::RotateCcw(deg) => write!(f, "ccw {}", deg),
            Command::Flip(direction) => write!(f, "flip {}", direction.as_char()),
            Command::Go { x, y, z, speed } => write!(f, "go {} {} {} {}", x, y, z, speed),
            Command::Curve { x1, y1, z1, x2, y2, z2, speed } => {
                write!(f, "curve {} {} {} {} {} {} {}", x1, y1, z1, x2, y2, z2, speed)
            }
            Command::Speed(speed) => write!(f, "speed {}", speed),
            Command::Rc { left_right, forward_back, up_down, yaw } => {
                write!(f, "rc {} {} {} {}", left_right, forward_back, up_down, yaw)
            }
            Command::Query(query) => write!(f, "{}", query.wire_word()),
            Command::LedColor { r, g, b } => write!(f, "EXT led {} {} {}", r, g, b),
            Command::LedPulse { r, g, b, rate } => {
                write!(f, "EXT led br {} {} {} {}", rate, r, g, b)
            }
            Command::LedBlink { r1, g1, b1, r2, g2, b2, rate } => {
                write!(f, "EXT led bl {} {} {} {} {} {} {}", rate, r1, g1, b1, r2, g2, b2)
            }
            Command::MatrixPattern(pattern) => write!(f, "EXT mled g {}", pattern),
            Command::MatrixChar { color, rate, character } => {
                write!(f, "EXT mled s {} {} {}", color.as_char(), rate, character)
            }
            Command::MatrixScroll { direction, color, rate, text } => {
                write!(
                    f,
                    "EXT mled {} {} {} {}",
                    direction.as_char(),
                    color.as_char(),
                    rate,
                    text
                )
            }
            Command::MatrixBrightness(level) => write!(f, "EXT mled sl {}", level),
        }
    }
}

impl Command {
    /// True if the firmware answers this command on the command socket.
    ///
    /// `takeoff` is only acknowledged once the multi-second climb is over,
    /// `rc` is a setpoint stream and the RMTT extension commands are not
    /// acknowledged at all, so those are sent fire-and-forget.
    pub(crate) fn expects_response(&self) -> bool {
        !matches!(
            self,
            Command::TakeOff
                | Command::Rc { .. }
                | Command::LedColor { .. }
                | Command::LedPulse { .. }
                | Command::LedBlink { .. }
                | Command::MatrixPattern(_)
                | Command::MatrixChar { .. }
                | Command::MatrixScroll { .. }
                | Command::MatrixBrightness(_)
        )
    }

    /// Check the arguments against the ranges accepted by the firmware.
    ///
    /// The firmware answers out-of-range commands with a bare `error`;
    /// checking here gives the caller a message that names the problem.
    pub(crate) fn validate(&self) -> Result<()> {
        match self {
            Command::Up(cm)
            | Command::Down(cm)
            | Command::Left(cm)
            | Command::Right(cm)
            | Command::Forward(cm)
            | Command::Back(cm) => in_range("distance", i64::from(*cm), 20, 500),
            Command::RotateCw(deg) | Command::RotateCcw(deg) => {
                in_range("angle", i64::from(*deg), 1, 360)
            }
            Command::Go { x, y, z, speed } => {
                in_range("x", i64::from(*x), -500, 500)?;
                in_range("y", i64::from(*y), -500, 500)?;
                in_range("z", i64::from(*z), -500, 500)?;
                in_range("speed", i64::from(*speed), 10, 100)?;
                if x.abs() < 20 && y.abs() < 20 && z.abs() < 20 {
                    return Err(Error::InvalidArgument(
                        "x, y and z cannot all be within -20..20".to_owned(),
                    ));
                }
                Ok(())
            }
            Command::Curve { x1, y1, z1, x2, y2, z2, speed } => {
                for (name, value) in [
                    ("x1", x1),
                    ("y1", y1),
                    ("z1", z1),
                    ("x2", x2),
                    ("y2", y2),
                    ("z2", z2),
                ] {
                    in_range(name, i64::from(*value), -500, 500)?;
                }
                in_range("speed", i64::from(*speed), 10, 60)
            }
            Command::Speed(speed) => in_range("speed", i64::from(*speed), 10, 100),
            Command::Rc { left_right, forward_back, up_down, yaw } => {
                in_range("left_right", i64::from(*left_right), -100, 100)?;
                in_range("forward_back", i64::from(*forward_back), -100, 100)?;
                in_range("up_down", i64::from(*up_down), -100, 100)?;
                in_range("yaw", i64::from(*yaw), -100, 100)
            }
            Command::LedPulse { rate, .. } | Command::LedBlink { rate, .. } => {
                rate_in_range(*rate)
            }
            Command::MatrixChar { rate, .. } => rate_in_range(*rate),
            Command::MatrixScroll { rate, text, .. } => {
                rate_in_range(*rate)?;
                if text.is_empty() || text.len() > 70 {
                    return Err(Error::InvalidArgument(
                        "scroll text must be 1 to 70 characters".to_owned(),
                    ));
                }
                Ok(())
            }
            Command::MatrixPattern(pattern) => {
                if pattern.len() != 64 || !pattern.chars().all(|c| matches!(c, 'r' | 'b' | 'p' | '0'))
                {
                    return Err(Error::InvalidArgument(
                        "matrix pattern must be 64 characters of r, b, p or 0".to_owned(),
                    ));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn in_range(name: &str, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(Error::InvalidArgument(format!(
            "{} must be in {}..={}, got {}",
            name, min, max, value
        )));
    }
    Ok(())
}

fn rate_in_range(rate: f32) -> Result<()> {
    if !(0.1..=2.5).contains(&rate) {
        return Err(Error::InvalidArgument(format!(
            "rate must be in 0.1..=2.5 Hz, got {}",
            rate
        )));
    }
    Ok(())
}

/// A decoded answer from the command socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Response {
    /// Plain `ok` acknowledgment
    Ok,
    /// Answer to a read command, trimmed
    Value(String),
}

impl Response {
    /// Decode a raw answer datagram.
    ///
    /// `error`, `error <detail>` and `unactive` (the firmware's way of
    /// saying SDK mode is not active anymore) become
    /// [Error::CommandFailed]; everything else that is not `ok` is the
    /// value of a read command.
    pub(crate) fn parse(raw: &str) -> Result<Response> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("ok") {
            return Ok(Response::Ok);
        }
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("error") || lower.starts_with("unactive") {
            return Err(Error::CommandFailed(trimmed.to_owned()));
        }
        Ok(Response::Value(trimmed.to_owned()))
    }

    /// The answer text: `ok` for an acknowledgment, the value otherwise.
    pub(crate) fn into_text(self) -> String {
        match self {
            Response::Ok => "ok".to_owned(),
            Response::Value(value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flight_commands_render_wire_strings() {
        assert_eq!(Command::SdkMode.to_string(), "command");
        assert_eq!(Command::TakeOff.to_string(), "takeoff");
        assert_eq!(Command::Land.to_string(), "land");
        assert_eq!(Command::Emergency.to_string(), "emergency");
        assert_eq!(Command::Stop.to_string(), "stop");
        assert_eq!(Command::StreamOn.to_string(), "streamon");
        assert_eq!(Command::StreamOff.to_string(), "streamoff");
    }

    #[test]
    fn motion_commands_render_wire_strings() {
        assert_eq!(Command::Up(30).to_string(), "up 30");
        assert_eq!(Command::Back(500).to_string(), "back 500");
        assert_eq!(Command::RotateCw(90).to_string(), "cw 90");
        assert_eq!(Command::RotateCcw(360).to_string(), "ccw 360");
        assert_eq!(Command::Flip(Flip::Left).to_string(), "flip l");
        assert_eq!(Command::Flip(Flip::Back).to_string(), "flip b");
        assert_eq!(
            Command::Go { x: 50, y: 0, z: -30, speed: 60 }.to_string(),
            "go 50 0 -30 60"
        );
        assert_eq!(
            Command::Curve { x1: 20, y1: 50, z1: 0, x2: 200, y2: 0, z2: 0, speed: 40 }.to_string(),
            "curve 20 50 0 200 0 0 40"
        );
        assert_eq!(Command::Speed(50).to_string(), "speed 50");
        assert_eq!(
            Command::Rc { left_right: -10, forward_back: 0, up_down: 100, yaw: 0 }.to_string(),
            "rc -10 0 100 0"
        );
    }

    #[test]
    fn read_commands_render_wire_strings() {
        assert_eq!(Command::Query(Query::Battery).to_string(), "battery?");
        assert_eq!(Command::Query(Query::Speed).to_string(), "speed?");
        assert_eq!(Command::Query(Query::Time).to_string(), "time?");
        assert_eq!(Command::Query(Query::Wifi).to_string(), "wifi?");
        assert_eq!(Command::Query(Query::SdkVersion).to_string(), "sdk?");
        assert_eq!(Command::Query(Query::SerialNumber).to_string(), "sn?");
        assert_eq!(Command::Query(Query::Hardware).to_string(), "hardware?");
    }

    #[test]
    fn expansion_commands_render_wire_strings() {
        assert_eq!(
            Command::LedColor { r: 255, g: 0, b: 0 }.to_string(),
            "EXT led 255 0 0"
        );
        assert_eq!(
            Command::LedPulse { r: 255, g: 0, b: 0, rate: 1.5 }.to_string(),
            "EXT led br 1.5 255 0 0"
        );
        // second color is rendered green-then-blue like the first one
        assert_eq!(
            Command::LedBlink { r1: 255, g1: 0, b1: 0, r2: 0, g2: 255, b2: 0, rate: 1.5 }
                .to_string(),
            "EXT led bl 1.5 255 0 0 0 255 0"
        );
        assert_eq!(
            Command::MatrixScroll {
                direction: ScrollDirection::Left,
                color: MatrixColor::Red,
                rate: 2.5,
                text: "hello".to_owned(),
            }
            .to_string(),
            "EXT mled l r 2.5 hello"
        );
        assert_eq!(
            Command::MatrixChar { color: MatrixColor::Blue, rate: 1.5, character: 'A' }
                .to_string(),
            "EXT mled s b 1.5 A"
        );
        assert_eq!(Command::MatrixBrightness(128).to_string(), "EXT mled sl 128");
    }

    #[test]
    fn ack_expectations_match_the_firmware() {
        assert!(Command::SdkMode.expects_response());
        assert!(Command::Land.expects_response());
        assert!(Command::Query(Query::Battery).expects_response());
        assert!(!Command::TakeOff.expects_response());
        assert!(!Command::Rc { left_right: 0, forward_back: 0, up_down: 0, yaw: 0 }
            .expects_response());
        assert!(!Command::LedColor { r: 0, g: 0, b: 0 }.expects_response());
        assert!(!Command::MatrixBrightness(255).expects_response());
    }

    #[test]
    fn distances_and_angles_are_range_checked() {
        assert!(Command::Up(20).validate().is_ok());
        assert!(Command::Up(500).validate().is_ok());
        assert!(Command::Up(19).validate().is_err());
        assert!(Command::Down(501).validate().is_err());
        assert!(Command::RotateCw(1).validate().is_ok());
        assert!(Command::RotateCw(0).validate().is_err());
        assert!(Command::RotateCcw(361).validate().is_err());
        assert!(Command::Speed(9).validate().is_err());
        assert!(Command::Speed(100).validate().is_ok());
    }

    #[test]
    fn go_and_curve_are_range_checked() {
        assert!(Command::Go { x: 100, y: 0, z: 0, speed: 50 }.validate().is_ok());
        assert!(Command::Go { x: 501, y: 0, z: 0, speed: 50 }.validate().is_err());
        assert!(Command::Go { x: 100, y: 0, z: 0, speed: 101 }.validate().is_err());
        // all axes inside the dead zone
        assert!(Command::Go { x: 10, y: -10, z: 0, speed: 50 }.validate().is_err());
        assert!(
            Command::Curve { x1: 20, y1: 50, z1: 0, x2: 200, y2: 0, z2: 0, speed: 60 }
                .validate()
                .is_ok()
        );
        assert!(
            Command::Curve { x1: 20, y1: 50, z1: 0, x2: 200, y2: 0, z2: 0, speed: 61 }
                .validate()
                .is_err()
        );
    }

    #[test]
    fn rc_axes_are_range_checked() {
        assert!(Command::Rc { left_right: -100, forward_back: 100, up_down: 0, yaw: 0 }
            .validate()
            .is_ok());
        assert!(Command::Rc { left_right: 101, forward_back: 0, up_down: 0, yaw: 0 }
            .validate()
            .is_err());
    }

    #[test]
    fn expansion_arguments_are_range_checked() {
        assert!(Command::LedPulse { r: 255, g: 0, b: 0, rate: 0.1 }.validate().is_ok());
        assert!(Command::LedPulse { r: 255, g: 0, b: 0, rate: 0.05 }.validate().is_err());
        assert!(Command::LedPulse { r: 255, g: 0, b: 0, rate: 2.6 }.validate().is_err());
        assert!(Command::MatrixPattern("r".repeat(64)).validate().is_ok());
        assert!(Command::MatrixPattern("r".repeat(63)).validate().is_err());
        assert!(Command::MatrixPattern(format!("{}x", "r".repeat(63))).validate().is_err());
        assert!(Command::MatrixScroll {
            direction: ScrollDirection::Up,
            color: MatrixColor::Purple,
            rate: 1.0,
            text: String::new(),
        }
        .validate()
        .is_err());
    }

    #[test]
    fn responses_decode() {
        assert_eq!(Response::parse("ok").unwrap(), Response::Ok);
        assert_eq!(Response::parse("OK\r\n").unwrap(), Response::Ok);
        assert_eq!(Response::parse(" 87\r\n").unwrap(), Response::Value("87".to_owned()));
        assert!(matches!(
            Response::parse("error"),
            Err(Error::CommandFailed(text)) if text == "error"
        ));
        assert!(matches!(
            Response::parse("error Motor stop"),
            Err(Error::CommandFailed(text)) if text == "error Motor stop"
        ));
        assert!(matches!(Response::parse("unactive"), Err(Error::CommandFailed(_))));
    }
}
