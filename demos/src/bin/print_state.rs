// Example connects and prints the pushed state reports for ten seconds,
// without flying. Useful to check that the state stream is coming through.

use std::time::Duration;

use futures::StreamExt;
use tokio::time::{timeout_at, Instant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Connecting ...");
    let drone = tello_lib::Tello::connect().await?;
    println!("Connected!");

    let mut states = drone.telemetry.watch().await;

    let deadline = Instant::now() + Duration::from_secs(10);
    while let Ok(Some(state)) = timeout_at(deadline, states.next()).await {
        println!(
            "height: {:4} cm  tof: {:4} cm  battery: {:3} %  yaw: {:4} deg",
            state.height, state.tof_distance, state.battery, state.yaw
        );
    }

    drone.disconnect().await;

    Ok(())
}
