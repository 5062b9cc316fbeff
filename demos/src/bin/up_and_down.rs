// The smallest possible flight: take off, hover for a bit, land.
// Join the drone's Wi-Fi access point before running this.

use std::time::Duration;

use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("creating drone");
    println!("connecting");
    let drone = tello_lib::Tello::connect().await?;
    println!("connected");

    println!("up");
    drone.commander.take_off().await?;

    sleep(Duration::from_secs(5)).await;

    println!("down");
    drone.commander.land().await?;

    drone.disconnect().await;

    Ok(())
}
