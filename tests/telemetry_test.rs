// Tests for the state report stream, pushed by the mock drone the way the
// firmware pushes to port 8890.

mod mock_drone;

use std::time::Duration;

use futures::StreamExt;
use mock_drone::MockDrone;
use tello_lib::Tello;
use tokio::time::{sleep, timeout};

const REPORT: &str = "pitch:1;roll:-2;yaw:-45;vgx:0;vgy:0;vgz:0;templ:60;temph:62;\
                      tof:10;h:40;bat:87;baro:163.02;time:0;agx:0.00;agy:0.00;agz:-999.00;";

#[tokio::test]
async fn the_latest_report_is_kept() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockDrone::builder().hardware("RMTT").start().await;
    let state_port = mock_drone::free_port().await;

    let options = mock_drone::options_for(&mock).await.state_port(state_port);
    let drone = Tello::connect_with(options).await?;

    assert_eq!(drone.telemetry.latest().await, None);

    mock.push_state(state_port, "bat:90;h:0;").await;
    mock.push_state(state_port, REPORT).await;
    sleep(Duration::from_millis(200)).await;

    let state = drone.telemetry.latest().await.expect("no report arrived");
    assert_eq!(state.battery, 87);
    assert_eq!(state.height, 40);
    assert_eq!(state.yaw, -45);

    drone.disconnect().await;
    Ok(())
}

#[tokio::test]
async fn every_subscriber_sees_the_reports() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockDrone::builder().hardware("RMTT").start().await;
    let state_port = mock_drone::free_port().await;

    let options = mock_drone::options_for(&mock).await.state_port(state_port);
    let drone = Tello::connect_with(options).await?;

    let mut first = drone.telemetry.watch().await;
    let mut second = drone.telemetry.watch().await;

    mock.push_state(state_port, REPORT).await;

    let from_first = timeout(Duration::from_secs(1), first.next()).await?.unwrap();
    let from_second = timeout(Duration::from_secs(1), second.next()).await?.unwrap();
    assert_eq!(from_first, from_second);
    assert_eq!(from_first.tof_distance, 10);

    drone.disconnect().await;
    Ok(())
}

#[tokio::test]
async fn malformed_reports_are_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockDrone::builder().hardware("RMTT").start().await;
    let state_port = mock_drone::free_port().await;

    let options = mock_drone::options_for(&mock).await.state_port(state_port);
    let drone = Tello::connect_with(options).await?;

    let mut states = drone.telemetry.watch().await;

    mock.push_state(state_port, "conn_req:lh").await;
    mock.push_state(state_port, REPORT).await;

    // Only the well-formed report comes through
    let state = timeout(Duration::from_secs(1), states.next()).await?.unwrap();
    assert_eq!(state.battery, 87);

    drone.disconnect().await;
    Ok(())
}

#[tokio::test]
async fn rmtt_reports_with_mission_pad_fields_parse() -> Result<(), Box<dyn std::error::Error>> {
    let mock = MockDrone::builder().hardware("RMTT").start().await;
    let state_port = mock_drone::free_port().await;

    let options = mock_drone::options_for(&mock).await.state_port(state_port);
    let drone = Tello::connect_with(options).await?;

    let report = format!("mid:-1;x:-100;y:-100;z:-100;mpry:0,0,0;{}", REPORT);
    mock.push_state(state_port, &report).await;
    sleep(Duration::from_millis(200)).await;

    let state = drone.telemetry.latest().await.expect("no report arrived");
    assert_eq!(state.battery, 87);
    assert_eq!(state.barometer, 163.02);

    drone.disconnect().await;
    Ok(())
}
