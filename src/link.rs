//! # Link layer to the drone
//!
//! The Tello SDK interface is a pair of UDP flows: commands are exchanged on
//! the drone's port 8889 and state reports are pushed back to local port
//! 8890. The firmware handles one command at a time, so this module funnels
//! all requests through a single task that owns the command socket and runs
//! one send/answer exchange at a time. A second task decodes the state
//! stream and forwards it to the telemetry subsystem.
//!
//! Everything here is private to the crate, the public connection lifecycle
//! lives on [Tello](crate::Tello).

use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use flume as channel;
use flume::{Receiver, Sender};
use futures::lock::Mutex;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::protocol::{Command, Response};
use crate::state::FlightState;
use crate::tello::ConnectOptions;
use crate::{Error, Result};

/// UDP port the drone listens on for commands
pub(crate) const COMMAND_PORT: u16 = 8889;
/// Local UDP port the drone pushes state reports to
pub(crate) const STATE_PORT: u16 = 8890;
/// Local UDP port the drone streams video to after `streamon`
pub(crate) const VIDEO_PORT: u16 = 11111;

/// Interval at which the I/O tasks re-check the disconnect flag
pub(crate) const POLL_PERIOD: Duration = Duration::from_millis(100);

pub(crate) const DATAGRAM_SIZE: usize = 2048;

/// One queued command exchange
struct Request {
    line: String,
    wait_response: bool,
    timeout: Duration,
    reply: Sender<Result<String>>,
}

/// The two UDP flows to one drone, wrapped in I/O tasks
///
/// Dropping the connection (or calling [Connection::close]) stops both
/// tasks. In-flight and queued requests then resolve to
/// [Error::Disconnected].
pub(crate) struct Connection {
    requests: Sender<Request>,
    response_timeout: Duration,
    command_task: Mutex<Option<JoinHandle<()>>>,
    state_task: Mutex<Option<JoinHandle<()>>>,
    disconnect: Arc<AtomicBool>,
    close_notice: Receiver<String>,
    close_reason: Mutex<Option<String>>,
}

impl Connection {
    /// Bind the UDP sockets and start the I/O tasks.
    ///
    /// The returned receiver yields one [FlightState] per state report the
    /// drone pushes. Reports only start flowing once the drone has accepted
    /// the `command` handshake.
    pub(crate) async fn open(
        options: &ConnectOptions,
    ) -> Result<(Connection, Receiver<FlightState>)> {
        let command_socket =
            UdpSocket::bind((options.bind_ip, options.local_command_port)).await?;
        command_socket.connect(options.address).await?;
        let state_socket = UdpSocket::bind((options.bind_ip, options.state_port)).await?;

        let disconnect = Arc::new(AtomicBool::new(false));
        let (requests, request_queue) = channel::unbounded();
        let (close_tx, close_notice) = channel::bounded(1);

        let disconnect_command = disconnect.clone();
        let close_command = close_tx.clone();
        let command_task = tokio::spawn(async move {
            let reason =
                command_loop(command_socket, request_queue, disconnect_command).await;
            let _ = close_command.try_send(reason);
        });

        let (state_tx, state_rx) = channel::unbounded();
        let disconnect_state = disconnect.clone();
        let state_task = tokio::spawn(async move {
            state_loop(state_socket, state_tx, disconnect_state).await;
        });

        Ok((
            Connection {
                requests,
                response_timeout: options.response_timeout,
                command_task: Mutex::new(Some(command_task)),
                state_task: Mutex::new(Some(state_task)),
                disconnect,
                close_notice,
                close_reason: Mutex::new(None),
            },
            state_rx,
        ))
    }

    /// Send a command and wait for its answer, with the default timeout.
    pub(crate) async fn request(&self, command: &Command) -> Result<String> {
        self.request_with_timeout(command, self.response_timeout).await
    }

    /// Send a command and wait for its answer.
    ///
    /// The command arguments are checked before anything touches the
    /// socket. Commands the firmware does not answer resolve to an empty
    /// string as soon as the datagram is sent.
    pub(crate) async fn request_with_timeout(
        &self,
        command: &Command,
        timeout: Duration,
    ) -> Result<String> {
        command.validate()?;
        self.request_raw(&command.to_string(), command.expects_response(), timeout)
            .await
    }

    /// Send an already rendered command line.
    pub(crate) async fn request_raw(
        &self,
        line: &str,
        wait_response: bool,
        timeout: Duration,
    ) -> Result<String> {
        let (reply, answer) = channel::bounded(1);
        self.requests
            .send_async(Request {
                line: line.to_owned(),
                wait_response,
                timeout,
                reply,
            })
            .await?;
        answer.recv_async().await?
    }

    /// The default answer timeout this connection was opened with.
    pub(crate) fn response_timeout(&self) -> Duration {
        self.response_timeout
    }

    /// True once the link is closing or closed, whatever the reason.
    pub(crate) fn is_closed(&self) -> bool {
        self.disconnect.load(Relaxed)
            || !self.close_notice.is_empty()
            || self.close_notice.is_disconnected()
    }

    /// Tell the I/O tasks to stop without waiting for them.
    pub(crate) fn abort(&self) {
        self.disconnect.store(true, Relaxed);
    }

    /// Stop both I/O tasks and wait for them to finish.
    pub(crate) async fn close(&self) {
        self.disconnect.store(true, Relaxed);

        if let Some(command_task) = self.command_task.lock().await.take() {
            let _ = command_task.await;
        }
        if let Some(state_task) = self.state_task.lock().await.take() {
            let _ = state_task.await;
        }
    }

    /// Wait for the link to close and return the reason.
    ///
    /// Resolves immediately if the link already closed.
    pub(crate) async fn wait_close(&self) -> String {
        let mut close_reason = self.close_reason.lock().await;
        if let Some(reason) = close_reason.as_ref() {
            return reason.clone();
        }
        let reason = self
            .close_notice
            .recv_async()
            .await
            .unwrap_or_else(|_| "link closed".to_owned());
        *close_reason = Some(reason.clone());
        reason
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect.store(true, Relaxed);
    }
}

/// Run command exchanges one at a time until told to stop.
///
/// Returns the close reason.
async fn command_loop(
    socket: UdpSocket,
    request_queue: Receiver<Request>,
    disconnect: Arc<AtomicBool>,
) -> String {
    let mut scratch = [0u8; DATAGRAM_SIZE];

    while !disconnect.load(Relaxed) {
        let request =
            match tokio::time::timeout(POLL_PERIOD, request_queue.recv_async()).await {
                Ok(Ok(request)) => request,
                Ok(Err(channel::RecvError::Disconnected)) => {
                    return "connection handle dropped".to_owned();
                }
                Err(_) => continue,
            };

        // A late answer to an earlier exchange must not be taken for the
        // answer to this one.
        while socket.try_recv(&mut scratch).is_ok() {}

        debug!("sending {:?}", request.line);
        if let Err(err) = socket.send(request.line.as_bytes()).await {
            let reason = format!("link error: {}", err);
            let _ = request.reply.send_async(Err(err.into())).await;
            return reason;
        }

        if !request.wait_response {
            let _ = request.reply.send_async(Ok(String::new())).await;
            continue;
        }

        let deadline = Instant::now() + request.timeout;
        let result = loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break Err(Error::Timeout);
            }
            match tokio::time::timeout(remaining.min(POLL_PERIOD), socket.recv_text()).await {
                Ok(Ok(answer)) => {
                    debug!("received {:?}", answer.trim());
                    break Response::parse(&answer).map(Response::into_text);
                }
                Ok(Err(err)) => {
                    let _ = request.reply.send_async(Err(err)).await;
                    return "link error while waiting for an answer".to_owned();
                }
                Err(_) => {
                    if disconnect.load(Relaxed) {
                        break Err(Error::Disconnected);
                    }
                }
            }
        };
        let _ = request.reply.send_async(result).await;
    }

    "disconnected on request".to_owned()
}

/// Forward decoded state reports until told to stop.
async fn state_loop(
    socket: UdpSocket,
    state_tx: Sender<FlightState>,
    disconnect: Arc<AtomicBool>,
) {
    while !disconnect.load(Relaxed) {
        match tokio::time::timeout(POLL_PERIOD, socket.recv_text()).await {
            Ok(Ok(report)) => match report.parse::<FlightState>() {
                Ok(state) => {
                    let _ = state_tx.send_async(state).await;
                }
                Err(err) => debug!("dropping state report: {}", err),
            },
            Ok(Err(err)) => {
                warn!("state socket error: {}", err);
                return;
            }
            Err(_) => continue,
        }
    }
}

#[async_trait]
pub(crate) trait RecvText {
    async fn recv_text(&self) -> Result<String>;
}

#[async_trait]
impl RecvText for UdpSocket {
    async fn recv_text(&self) -> Result<String> {
        let mut buffer = [0u8; DATAGRAM_SIZE];
        let len = self.recv(&mut buffer).await?;
        Ok(String::from_utf8_lossy(&buffer[..len]).into_owned())
    }
}
