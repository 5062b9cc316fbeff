// An in-process stand-in for the drone. It answers SDK commands on a
// loopback socket, records everything it receives and can push state
// reports and video datagrams like the real firmware does.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

pub struct MockDroneBuilder {
    hardware: Option<String>,
    overrides: HashMap<String, Option<String>>,
}

impl MockDroneBuilder {
    /// Answer the `hardware?` probe with `answer`. An unconfigured mock
    /// stays silent on the probe, like a plain Tello.
    pub fn hardware(mut self, answer: &str) -> Self {
        self.hardware = Some(answer.to_owned());
        self
    }

    /// Answer the exact command line `command` with `reply` instead of the
    /// default.
    pub fn reply(mut self, command: &str, reply: &str) -> Self {
        self.overrides.insert(command.to_owned(), Some(reply.to_owned()));
        self
    }

    /// Never answer the exact command line `command`.
    pub fn silent_on(mut self, command: &str) -> Self {
        self.overrides.insert(command.to_owned(), None);
        self
    }

    pub async fn start(self) -> MockDrone {
        init_tracing();

        let socket = Arc::new(UdpSocket::bind("127.0.0.1:0").await.unwrap());
        let address = socket.local_addr().unwrap();
        let commands: Arc<Mutex<Vec<String>>> = Default::default();

        let loop_socket = socket.clone();
        let loop_commands = commands.clone();
        let task = tokio::spawn(async move {
            let mut buffer = [0u8; 2048];
            loop {
                let Ok((len, from)) = loop_socket.recv_from(&mut buffer).await else {
                    return;
                };
                let line = String::from_utf8_lossy(&buffer[..len]).into_owned();
                loop_commands.lock().unwrap().push(line.clone());

                let reply = match self.overrides.get(&line) {
                    Some(reply) => reply.clone(),
                    None => default_reply(&line, self.hardware.as_deref()),
                };
                if let Some(reply) = reply {
                    let _ = loop_socket.send_to(reply.as_bytes(), from).await;
                }
            }
        });

        MockDrone {
            socket,
            address,
            commands,
            task,
        }
    }
}

pub struct MockDrone {
    socket: Arc<UdpSocket>,
    address: SocketAddr,
    commands: Arc<Mutex<Vec<String>>>,
    task: JoinHandle<()>,
}

impl MockDrone {
    pub fn builder() -> MockDroneBuilder {
        MockDroneBuilder {
            hardware: None,
            overrides: HashMap::new(),
        }
    }

    /// Start a mock with default behavior: `ok` to everything, canned
    /// values for the read commands, silence on the hardware probe.
    pub async fn start() -> MockDrone {
        Self::builder().start().await
    }

    /// The address to hand to `ConnectOptions::address`.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Every command line received so far, in arrival order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    /// Push one state report to the client's state port.
    pub async fn push_state(&self, state_port: u16, report: &str) {
        self.socket
            .send_to(report.as_bytes(), ("127.0.0.1", state_port))
            .await
            .unwrap();
    }

    /// Push one video datagram to the client's video port.
    pub async fn push_video(&self, video_port: u16, chunk: &[u8]) {
        self.socket
            .send_to(chunk, ("127.0.0.1", video_port))
            .await
            .unwrap();
    }
}

impl Drop for MockDrone {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn default_reply(line: &str, hardware: Option<&str>) -> Option<String> {
    let reply = match line {
        "hardware?" => return hardware.map(str::to_owned),
        "battery?" => "87",
        "speed?" => "100.0",
        "time?" => "12",
        "wifi?" => "90",
        "sdk?" => "30",
        "sn?" => "0TQZK7AAAA0000",
        _ => "ok",
    };
    Some(reply.to_owned())
}

/// Install the test log subscriber, controlled by `RUST_LOG` as usual.
fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A free loopback UDP port for the client side of a test.
pub async fn free_port() -> u16 {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    socket.local_addr().unwrap().port()
}

/// Connect options pointing at the mock, with ephemeral local ports so
/// parallel tests do not trip over each other.
pub async fn options_for(mock: &MockDrone) -> tello_lib::ConnectOptions {
    tello_lib::ConnectOptions::default()
        .address(mock.address())
        .bind_ip("127.0.0.1".parse().unwrap())
        .local_command_port(0)
        .state_port(free_port().await)
}
