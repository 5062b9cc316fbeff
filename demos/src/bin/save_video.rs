// Example records ten seconds of video to an H.264 elementary stream file.
// The result plays with e.g. `ffplay out.h264` or `mpv out.h264`.

use std::time::Duration;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tokio::time::{timeout_at, Instant};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "out.h264".to_owned());

    println!("Connecting ...");
    let drone = tello_lib::Tello::connect().await?;
    println!("Connected!");

    drone.video.start().await?;
    println!("Recording to {} ...", path);

    let mut file = tokio::fs::File::create(&path).await?;
    let mut frames = drone.video.frames().await;

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut frame_count = 0u32;
    while let Ok(Some(frame)) = timeout_at(deadline, frames.next()).await {
        file.write_all(&frame).await?;
        frame_count += 1;
    }
    file.flush().await?;

    println!("Saved {} frames", frame_count);

    drone.video.stop().await?;
    drone.disconnect().await;

    Ok(())
}
