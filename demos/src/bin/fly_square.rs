// Example flies a 50 cm square and prints some facts about the drone.
// The drone address can be given as first argument, the default is the
// drone's own access point.

use tello_lib::{ConnectOptions, Tello};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ConnectOptions::default();
    if let Some(address) = std::env::args().nth(1) {
        options = options.address(address.parse()?);
    }

    println!("Connecting ...");
    let drone = Tello::connect_with(options).await?;
    println!("Connected!");

    let sdk_version = drone.platform.sdk_version().await?;
    println!("Hardware:    {}", drone.hardware());
    println!("SDK version: {}", sdk_version);
    println!("Battery:     {} %", drone.platform.battery().await?);

    drone.commander.set_speed(50).await?;

    println!("Taking off ...");
    drone.commander.take_off().await?;

    for corner in 1..=4 {
        println!("Corner {}", corner);
        drone.commander.forward(50).await?;
        drone.commander.rotate_cw(90).await?;
    }

    println!("Landing ...");
    drone.commander.land().await?;

    drone.disconnect().await;

    Ok(())
}
