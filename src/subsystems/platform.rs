//! # Platform services
//!
//! The SDK interface has a handful of read commands, recognizable by their
//! trailing `?`, that report slow-changing facts about the drone: battery
//! charge, firmware SDK version, serial number and so on. This subsystem
//! wraps them. For the fast-changing sensor values prefer the
//! [telemetry](crate::subsystems::telemetry) subsystem, which does not cost
//! a command round-trip.

use std::str::FromStr;
use std::sync::Arc;

use crate::link::Connection;
use crate::protocol::{Command, Query};
use crate::{Error, Result};

/// # Access to the platform services
///
/// See the [platform module documentation](crate::subsystems::platform) for more context and information.
pub struct Platform {
    link: Arc<Connection>,
}

impl Platform {
    pub(crate) fn new(link: Arc<Connection>) -> Self {
        Self { link }
    }

    /// Fetch the battery charge in percent.
    pub async fn battery(&self) -> Result<u8> {
        let answer = self.link.request(&Command::Query(Query::Battery)).await?;
        parse_value("battery", &answer)
    }

    /// Fetch the current cruise speed setting in cm/s.
    pub async fn speed(&self) -> Result<f32> {
        let answer = self.link.request(&Command::Query(Query::Speed)).await?;
        parse_value("speed", &answer)
    }

    /// Fetch the accumulated motor-on time in seconds.
    pub async fn flight_time(&self) -> Result<u32> {
        let answer = self.link.request(&Command::Query(Query::Time)).await?;
        // Some firmware versions append a unit, as in `12s`
        parse_value("flight time", answer.trim_end_matches('s'))
    }

    /// Fetch the signal to noise ratio of the Wi-Fi link.
    ///
    /// The answer format varies between firmware versions, so the raw text
    /// is returned.
    pub async fn wifi_snr(&self) -> Result<String> {
        self.link.request(&Command::Query(Query::Wifi)).await
    }

    /// Fetch the SDK version of the firmware, for example `20` for SDK 2.0.
    pub async fn sdk_version(&self) -> Result<String> {
        self.link.request(&Command::Query(Query::SdkVersion)).await
    }

    /// Fetch the serial number of the drone.
    pub async fn serial_number(&self) -> Result<String> {
        self.link.request(&Command::Query(Query::SerialNumber)).await
    }
}

fn parse_value<T: FromStr>(what: &str, answer: &str) -> Result<T> {
    answer.trim().parse().map_err(|_| {
        Error::ProtocolError(format!("unexpected {} answer: {:?}", what, answer))
    })
}
