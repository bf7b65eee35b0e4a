//! Binary (UDP) device walkthrough

use std::time::Duration;

use biogate::{DeviceEndpoint, FingerprintDevice, ZktecoDevice};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    // Change to your device IP
    let ip = std::env::var("DEVICE_IP").unwrap_or_else(|_| "192.168.1.201".to_string());

    println!("Connecting to {} via UDP...", ip);

    let endpoint = DeviceEndpoint::new(ip, 4370, Duration::from_secs(5))?;
    let mut device = ZktecoDevice::new(&endpoint);

    if !device.connect().await {
        anyhow::bail!("device at {} did not answer the handshake", endpoint);
    }
    println!("✓ Connected (session {:?})", device.session().session_id());

    match device.get_device_info().await {
        Some(info) => println!("✓ Device: {}", info),
        None => println!("✗ Device info unavailable"),
    }

    let result = device.verify_fingerprint(1, 0).await;
    println!("Verify user 1: {}", result);

    device.disconnect().await;
    println!("✓ Disconnected");

    Ok(())
}
