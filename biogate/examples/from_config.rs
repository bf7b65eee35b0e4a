//! Config-driven example: works for any supported device family
//!
//! Usage: `cargo run --example from_config -- device.toml [user_id]`

use std::path::PathBuf;

use anyhow::Context;
use biogate::{DeviceConfig, DeviceManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let path = PathBuf::from(args.next().unwrap_or_else(|| "device.toml".to_string()));
    let user_id: u32 = match args.next() {
        Some(raw) => raw.parse().context("user_id must be an unsigned integer")?,
        None => 1,
    };

    let config = DeviceConfig::load(&path)
        .with_context(|| format!("loading {}", path.display()))?;
    let mut device = DeviceManager::from_config(&config)?;

    println!("{} device at {}", device.family(), config.endpoint()?);

    if !device.connect().await {
        anyhow::bail!("device unreachable");
    }

    if let Some(info) = device.get_device_info().await {
        println!("Device: {}", info);
    }

    println!("Enrolling finger 0 of user {}...", user_id);
    let enrolled = device.enroll_fingerprint(user_id, 0).await;
    println!("Enroll: {}", enrolled);

    if enrolled.success {
        println!("Verify: {}", device.verify_fingerprint(user_id, 0).await);
        println!("Delete: {}", device.delete_fingerprint(user_id, 0).await);
    }

    let logs = device.get_attendance_logs().await;
    println!("{} attendance records", logs.len());

    device.disconnect().await;
    Ok(())
}
