// Example drives the RMTT expansion board: LED colors and a scrolling text
// on the matrix. Exits early when connected to a plain Tello.

use std::time::Duration;

use tello_lib::{MatrixColor, ScrollDirection, Tello};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Connecting ...");
    let drone = Tello::connect().await?;
    println!("Connected to a {}", drone.hardware());

    if !drone.expansion.is_available() {
        println!("No expansion board on this drone, exiting!");
        drone.disconnect().await;
        return Ok(());
    }

    println!("Cycling the LED ...");
    for (r, g, b) in [(255, 0, 0), (0, 255, 0), (0, 0, 255)] {
        drone.expansion.set_led(r, g, b).await?;
        sleep(Duration::from_secs(1)).await;
    }

    println!("Blinking ...");
    drone.expansion.blink_led((255, 0, 0), (0, 0, 255), 1.5).await?;
    sleep(Duration::from_secs(3)).await;

    println!("Scrolling ...");
    drone
        .expansion
        .scroll_text(ScrollDirection::Left, MatrixColor::Purple, 2.5, "hello")
        .await?;
    sleep(Duration::from_secs(5)).await;

    drone.expansion.set_led(0, 0, 0).await?;

    drone.disconnect().await;

    Ok(())
}
