//! # Video stream subsystem
//!
//! After `streamon` the drone pushes its camera picture to local UDP port
//! 11111 as a raw Annex-B H.264 elementary stream, 960x720 at up to 30
//! frames per second. The stream arrives in 1460 byte chunks; a shorter
//! chunk marks the end of a frame. This subsystem reassembles the chunks
//! and hands out complete encoded frames, decoding them is left to the
//! application.

use std::net::IpAddr;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering::Relaxed;
use std::sync::Arc;

use flume as channel;
use futures::lock::Mutex;
use futures::Stream;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::link::{Connection, DATAGRAM_SIZE, POLL_PERIOD};
use crate::protocol::Command;
use crate::Result;

/// Chunk size the firmware slices frames into
const VIDEO_CHUNK_SIZE: usize = 1460;
/// Reassembly limit, a frame larger than this means the stream is corrupt
const MAX_FRAME_SIZE: usize = 1 << 20;
/// Complete frames buffered for the consumer
const FRAME_BACKLOG: usize = 64;

/// # Access to the video stream subsystem
///
/// See the [video module documentation](crate::subsystems::video) for more context and information.
pub struct Video {
    link: Arc<Connection>,
    bind_ip: IpAddr,
    video_port: u16,
    frame_sender: channel::Sender<Vec<u8>>,
    frame_receiver: channel::Receiver<Vec<u8>>,
    receive_task: Mutex<Option<(Arc<AtomicBool>, JoinHandle<()>)>>,
}

impl Video {
    pub(crate) fn new(link: Arc<Connection>, bind_ip: IpAddr, video_port: u16) -> Self {
        let (frame_sender, frame_receiver) = channel::bounded(FRAME_BACKLOG);
        Self {
            link,
            bind_ip,
            video_port,
            frame_sender,
            frame_receiver,
            receive_task: Mutex::new(None),
        }
    }

    /// Ask the drone to start streaming video.
    ///
    /// Does nothing if the stream is already running.
    pub async fn start(&self) -> Result<()> {
        let mut receive_task = self.receive_task.lock().await;
        if receive_task.is_some() {
            return Ok(());
        }

        // Bind before asking for the stream so no datagram is lost
        let socket = UdpSocket::bind((self.bind_ip, self.video_port)).await?;
        self.link.request(&Command::StreamOn).await?;

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let frames = self.frame_sender.clone();
        let handle = tokio::spawn(async move {
            video_loop(socket, frames, stop_flag).await;
        });
        *receive_task = Some((stop, handle));

        Ok(())
    }

    /// Ask the drone to stop streaming and release the video socket.
    pub async fn stop(&self) -> Result<()> {
        self.shutdown().await;
        self.link.request(&Command::StreamOff).await?;
        Ok(())
    }

    /// True while the receive task is running.
    pub async fn is_streaming(&self) -> bool {
        self.receive_task.lock().await.is_some()
    }

    /// The stream of complete encoded frames.
    ///
    /// Each item is one H.264 frame, ready to be fed to a decoder. The
    /// stream is single-consumer: when several streams are taken, each
    /// frame goes to only one of them.
    pub async fn frames(&self) -> impl Stream<Item = Vec<u8>> {
        self.frame_receiver.clone().into_stream()
    }

    /// Stop the receive task without talking to the drone.
    pub(crate) async fn shutdown(&self) {
        if let Some((stop, handle)) = self.receive_task.lock().await.take() {
            stop.store(true, Relaxed);
            let _ = handle.await;
        }
    }
}

impl Drop for Video {
    fn drop(&mut self) {
        // The receive task exits on its own once the flag is set, which
        // releases the video socket even when the Tello is dropped without
        // a disconnect() call.
        if let Some((stop, _)) = self.receive_task.get_mut() {
            stop.store(true, Relaxed);
        }
    }
}

/// Reassemble chunked datagrams into frames until told to stop.
async fn video_loop(
    socket: UdpSocket,
    frames: channel::Sender<Vec<u8>>,
    stop: Arc<AtomicBool>,
) {
    let mut buffer = [0u8; DATAGRAM_SIZE];
    let mut frame: Vec<u8> = Vec::new();

    while !stop.load(Relaxed) {
        match tokio::time::timeout(POLL_PERIOD, socket.recv(&mut buffer)).await {
            Ok(Ok(len)) => {
                frame.extend_from_slice(&buffer[..len]);
                if len < VIDEO_CHUNK_SIZE {
                    if frames.try_send(std::mem::take(&mut frame)).is_err() {
                        debug!("dropping a video frame, the consumer is not keeping up");
                    }
                } else if frame.len() > MAX_FRAME_SIZE {
                    debug!("dropping an oversized video frame");
                    frame.clear();
                }
            }
            Ok(Err(err)) => {
                warn!("video socket error: {}", err);
                return;
            }
            Err(_) => continue,
        }
    }
}
