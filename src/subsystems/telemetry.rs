//! # Telemetry subsystem
//!
//! Once connected, the drone pushes a [FlightState] report roughly 10 times
//! per second. This subsystem keeps the most recent report and fans the
//! stream out to any number of subscribers.
//!
//! ``` no_run
//! # use futures::StreamExt;
//! # async fn monitor(drone: tello_lib::Tello) {
//! let mut states = drone.telemetry.watch().await;
//! while let Some(state) = states.next().await {
//!     println!("height {} cm, battery {} %", state.height, state.battery);
//! }
//! # }
//! ```

use std::sync::Arc;

use async_broadcast::broadcast;
use flume as channel;
use futures::lock::Mutex;
use futures::Stream;
use tokio::task::JoinHandle;

use crate::state::FlightState;

/// Backlog kept for slow subscribers, about 1.5 s of reports
const WATCH_BACKLOG: usize = 16;

/// # Access to the telemetry subsystem
///
/// See the [telemetry module documentation](crate::subsystems::telemetry) for more context and information.
pub struct Telemetry {
    latest_state: Arc<Mutex<Option<FlightState>>>,
    watch_receiver: async_broadcast::Receiver<FlightState>,
    _telemetry_task: JoinHandle<()>,
}

impl Telemetry {
    pub(crate) fn new(downlink: channel::Receiver<FlightState>) -> Self {
        let (mut watch_sender, watch_receiver) = broadcast(WATCH_BACKLOG);
        // A subscriber that stops polling must not stall the stream for the
        // others, old reports are dropped instead.
        watch_sender.set_overflow(true);

        let latest_state: Arc<Mutex<Option<FlightState>>> = Default::default();
        let latest = latest_state.clone();

        let _telemetry_task = tokio::spawn(async move {
            while let Ok(state) = downlink.recv_async().await {
                *latest.lock().await = Some(state);
                let _ = watch_sender.try_broadcast(state);
            }
        });

        Self {
            latest_state,
            watch_receiver,
            _telemetry_task,
        }
    }

    /// The most recent state report, or [None] before the first one
    /// arrives.
    pub async fn latest(&self) -> Option<FlightState> {
        *self.latest_state.lock().await
    }

    /// Subscribe to the state stream.
    ///
    /// A new subscriber may first receive a short backlog of recent
    /// reports, up to about 1.5 s worth, before the live stream. A
    /// subscriber that polls slower than the drone pushes skips the oldest
    /// reports rather than lagging further and further behind.
    pub async fn watch(&self) -> impl Stream<Item = FlightState> {
        self.watch_receiver.clone()
    }
}
