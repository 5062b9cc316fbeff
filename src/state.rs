//! Flight state telemetry
//!
//! Once in SDK mode the drone pushes a state report to UDP port 8890 at
//! roughly 10 Hz. Each report is a single ASCII datagram of `key:value;`
//! pairs, for example:
//!
//! ```text
//! pitch:0;roll:0;yaw:-45;vgx:0;vgy:0;vgz:0;templ:60;temph:62;tof:10;h:0;bat:87;baro:163.02;time:0;agx:5.00;agy:-7.00;agz:-999.00;
//! ```
//!
//! The RMTT firmware prepends mission pad fields (`mid`, `x`, `y`, `z`,
//! `mpry`) to the same report. Parsing is tolerant: unknown keys are
//! skipped so reports from either firmware decode into the same
//! [FlightState].

use std::str::FromStr;

use crate::Error;

/// One decoded state report from the drone
///
/// All fields are plain sensor readouts. Fields absent from a report keep
/// their default value of zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlightState {
    /// Pitch angle in degrees
    pub pitch: i16,
    /// Roll angle in degrees
    pub roll: i16,
    /// Yaw angle relative to startup orientation, in degrees
    pub yaw: i16,
    /// Ground speed along the x axis in cm/s
    pub velocity_x: i16,
    /// Ground speed along the y axis in cm/s
    pub velocity_y: i16,
    /// Ground speed along the z axis in cm/s
    pub velocity_z: i16,
    /// Lowest motherboard temperature in degrees Celsius
    pub temperature_low: u8,
    /// Highest motherboard temperature in degrees Celsius
    pub temperature_high: u8,
    /// Distance measured by the time-of-flight sensor in cm
    pub tof_distance: i16,
    /// Height relative to the takeoff point in cm
    pub height: i16,
    /// Battery charge in percent
    pub battery: u8,
    /// Barometric altitude in m
    pub barometer: f32,
    /// Accumulated motor-on time in seconds
    pub motor_time: u16,
    /// Acceleration along the x axis in 0.001 g
    pub acceleration_x: f32,
    /// Acceleration along the y axis in 0.001 g
    pub acceleration_y: f32,
    /// Acceleration along the z axis in 0.001 g
    pub acceleration_z: f32,
}

fn assign<T: FromStr>(slot: &mut T, value: &str) -> bool {
    match value.parse() {
        Ok(parsed) => {
            *slot = parsed;
            true
        }
        Err(_) => false,
    }
}

impl FromStr for FlightState {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut state = FlightState::default();
        let mut recognized = 0usize;

        for pair in raw.trim().split(';') {
            let Some((key, value)) = pair.split_once(':') else {
                continue;
            };
            recognized += match key {
                "pitch" => assign(&mut state.pitch, value),
                "roll" => assign(&mut state.roll, value),
                "yaw" => assign(&mut state.yaw, value),
                "vgx" => assign(&mut state.velocity_x, value),
                "vgy" => assign(&mut state.velocity_y, value),
                "vgz" => assign(&mut state.velocity_z, value),
                "templ" => assign(&mut state.temperature_low, value),
                "temph" => assign(&mut state.temperature_high, value),
                "tof" => assign(&mut state.tof_distance, value),
                "h" => assign(&mut state.height, value),
                "bat" => assign(&mut state.battery, value),
                "baro" => assign(&mut state.barometer, value),
                "time" => assign(&mut state.motor_time, value),
                "agx" => assign(&mut state.acceleration_x, value),
                "agy" => assign(&mut state.acceleration_y, value),
                "agz" => assign(&mut state.acceleration_z, value),
                _ => false,
            } as usize;
        }

        if recognized == 0 {
            return Err(Error::ProtocolError(format!(
                "no recognized telemetry field in {:?}",
                raw.trim()
            )));
        }
        Ok(state)
    }
}
