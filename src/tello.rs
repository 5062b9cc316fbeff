use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::link::{Connection, COMMAND_PORT, STATE_PORT, VIDEO_PORT};
use crate::protocol::{Command, Query};
use crate::subsystems::commander::Commander;
use crate::subsystems::expansion::Expansion;
use crate::subsystems::platform::Platform;
use crate::subsystems::telemetry::Telemetry;
use crate::subsystems::video::Video;
use crate::{Error, Result};

/// Address of the drone on the access point it opens itself
const DEFAULT_DRONE_ADDRESS: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 10, 1)), COMMAND_PORT);

/// Default time to wait for a command answer. Maneuver commands are only
/// answered once the maneuver is done, so this is generous.
const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

/// A plain Tello never answers the hardware probe, so it gets a short
/// timeout of its own.
const HARDWARE_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Drone model detected during the connection handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hardware {
    /// Tello or Tello EDU
    Tello,
    /// RoboMaster TT, carries the [expansion](crate::subsystems::expansion) board
    Rmtt,
}

impl fmt::Display for Hardware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hardware::Tello => write!(f, "Tello"),
            Hardware::Rmtt => write!(f, "RMTT"),
        }
    }
}

/// Options for [Tello::connect_with()]
///
/// The defaults match a drone on its own access point: commands to
/// `192.168.10.1:8889` from local port 8889, state reports on port 8890 and
/// video on port 11111.
///
/// ``` no_run
/// # use tello_lib::{ConnectOptions, Tello};
/// # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
/// let drone = Tello::connect_with(
///     ConnectOptions::default().address("192.168.1.42:8889".parse()?),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub(crate) address: SocketAddr,
    pub(crate) bind_ip: IpAddr,
    pub(crate) local_command_port: u16,
    pub(crate) state_port: u16,
    pub(crate) video_port: u16,
    pub(crate) response_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            address: DEFAULT_DRONE_ADDRESS,
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            local_command_port: COMMAND_PORT,
            state_port: STATE_PORT,
            video_port: VIDEO_PORT,
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
        }
    }
}

impl ConnectOptions {
    /// Address of the drone. Useful when the drone joined an existing
    /// network instead of opening its own access point.
    pub fn address(mut self, address: SocketAddr) -> Self {
        self.address = address;
        self
    }

    /// Local IP address to bind the sockets to, `0.0.0.0` by default.
    pub fn bind_ip(mut self, ip: IpAddr) -> Self {
        self.bind_ip = ip;
        self
    }

    /// Local port for the command socket. The drone answers to the port
    /// the handshake came from, so any free port works.
    pub fn local_command_port(mut self, port: u16) -> Self {
        self.local_command_port = port;
        self
    }

    /// Local port for the state report socket.
    pub fn state_port(mut self, port: u16) -> Self {
        self.state_port = port;
        self
    }

    /// Local port for the video stream socket.
    pub fn video_port(mut self, port: u16) -> Self {
        self.video_port = port;
        self
    }

    /// Time to wait for a command answer before giving up with
    /// [Error::Timeout](crate::Error::Timeout).
    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }
}

/// # The Tello
///
/// This struct is one-time use: creating it connects to a drone and once
/// disconnected, either on request or because the link broke, the object
/// cannot be reconnected. A new one needs to be created to connect again.
///
/// See the [tello-lib crate root documentation](crate) for more context and information.
pub struct Tello {
    /// Flight command subsystem access
    pub commander: Commander,
    /// Platform services access
    pub platform: Platform,
    /// Telemetry subsystem access
    pub telemetry: Telemetry,
    /// RMTT expansion board access
    pub expansion: Expansion,
    /// Video stream subsystem access
    pub video: Video,
    hardware: Hardware,
    connection: Arc<Connection>,
}

impl Tello {
    /// Connect a drone on its own access point.
    ///
    /// Equivalent to [Tello::connect_with()] with default
    /// [ConnectOptions].
    pub async fn connect() -> Result<Self> {
        Self::connect_with(ConnectOptions::default()).await
    }

    /// Connect a drone with explicit [ConnectOptions].
    ///
    /// Connecting binds the UDP sockets, switches the drone to SDK mode
    /// and probes which hardware answered. An error is returned if the
    /// sockets cannot be bound or if the drone refuses SDK mode.
    pub async fn connect_with(options: ConnectOptions) -> Result<Self> {
        let (connection, state_downlink) = Connection::open(&options).await?;
        let connection = Arc::new(connection);

        // Everything else builds on SDK mode, a refusal here is fatal
        connection.request(&Command::SdkMode).await?;

        let hardware = probe_hardware(&connection).await;
        info!("connected to {} at {}", hardware, options.address);

        let commander = Commander::new(connection.clone());
        let platform = Platform::new(connection.clone());
        let telemetry = Telemetry::new(state_downlink);
        let expansion = Expansion::new(connection.clone(), hardware == Hardware::Rmtt);
        let video = Video::new(connection.clone(), options.bind_ip, options.video_port);

        Ok(Tello {
            commander,
            platform,
            telemetry,
            expansion,
            video,
            hardware,
            connection,
        })
    }

    /// The hardware that answered the connection handshake.
    pub fn hardware(&self) -> Hardware {
        self.hardware
    }

    /// True until the connection is closed or lost.
    pub fn is_connected(&self) -> bool {
        !self.connection.is_closed()
    }

    /// Send a raw SDK command line and return the raw answer text.
    ///
    /// This is the escape hatch for commands the typed subsystems do not
    /// cover. Every raw command waits for an answer, so commands the
    /// firmware leaves unanswered run into the response timeout; prefer
    /// the subsystems when they cover the command.
    ///
    /// The `wifi` and `ap` families are refused: they reconfigure the
    /// network and would strand this connection.
    pub async fn send_raw_command(&self, command: &str) -> Result<String> {
        let line = command.trim();
        if line.is_empty() {
            return Err(Error::InvalidArgument("empty command".to_owned()));
        }
        if line.starts_with("wifi") || line.starts_with("ap") {
            return Err(Error::InvalidArgument(
                "wifi configuration commands would drop this connection".to_owned(),
            ));
        }
        self.connection
            .request_raw(line, true, self.connection.response_timeout())
            .await
    }

    /// Disconnect the drone.
    ///
    /// The connection can be ended in two ways: either by dropping the
    /// [Tello] object or by calling this function. Once it returns, the
    /// drone is fully disconnected and every method that talks to it
    /// resolves to [Error::Disconnected](crate::Error::Disconnected).
    pub async fn disconnect(&self) {
        debug!("disconnecting");
        self.video.shutdown().await;
        self.connection.close().await;
    }

    /// Wait for the drone to be disconnected.
    ///
    /// This function waits for the link to close, finishes the disconnect
    /// and returns a string describing the reason. One intended use is to
    /// block on it from a monitoring task to detect a connection loss.
    pub async fn wait_disconnect(&self) -> String {
        let reason = self.connection.wait_close().await;

        self.disconnect().await;

        reason
    }
}

impl Drop for Tello {
    fn drop(&mut self) {
        self.connection.abort();
    }
}

async fn probe_hardware(connection: &Connection) -> Hardware {
    match connection
        .request_with_timeout(&Command::Query(Query::Hardware), HARDWARE_PROBE_TIMEOUT)
        .await
    {
        Ok(answer) if answer == "RMTT" => Hardware::Rmtt,
        // A plain Tello does not know the probe and ignores or refuses it.
        // Any other failure still means something answered the handshake,
        // so the probe never fails the connection.
        Ok(_) | Err(_) => Hardware::Tello,
    }
}
