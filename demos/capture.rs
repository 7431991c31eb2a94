//! Captures a few scans from a URG sensor and prints a summary of each.
//!
//! Usage: `cargo run --example capture -- [DEVICE] [BITRATE]`
//! Without a device, the first serial port found is used. Set `RUST_LOG=urg=trace`
//! to follow the protocol exchange.

use std::process::exit;
use std::thread::sleep;
use std::time::Duration;

use urg::utils::to_cartesian;
use urg::{SerialOptions, UrgDevice, URG_DEFAULT_BITRATE};

const SCAN_COUNT: usize = 5;
const SCAN_INTERVAL: Duration = Duration::from_millis(500);

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = std::env::args().skip(1);
    let device_path = match args.next() {
        Some(path) => path,
        None => {
            let devices = urg::serial::list_devices().unwrap_or_else(|e| {
                eprintln!("Failed to list serial devices: {}", e);
                exit(1);
            });
            for device in &devices {
                println!("found {}", device.display_name);
            }
            match devices.into_iter().next() {
                Some(device) => device.identifier,
                None => {
                    eprintln!("There are no devices.");
                    exit(1);
                }
            }
        }
    };
    let bitrate = args
        .next()
        .and_then(|b| b.parse().ok())
        .unwrap_or(URG_DEFAULT_BITRATE);

    let port = urg::serial::open(&device_path, &SerialOptions::with_bitrate(bitrate))
        .unwrap_or_else(|e| {
            eprintln!("Failed to open {}: {}", device_path, e);
            exit(1);
        });
    let mut device = UrgDevice::with_stream(port);

    let params = match device.connect() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            exit(1);
        }
    };
    println!(
        "{}: {}-{} mm, indices {}..={} (front {})",
        params.model,
        params.distance_min,
        params.distance_max,
        params.index_min,
        params.index_max,
        params.index_front
    );

    if let Err(e) = device.set_laser(true) {
        eprintln!("Failed to turn the laser on: {}", e);
        exit(1);
    }

    for i in 0..SCAN_COUNT {
        match device.capture_once() {
            Ok(scan) => {
                let nearest = to_cartesian(&scan, &params)
                    .into_iter()
                    .map(|(x, y)| (x.hypot(y), x, y))
                    .filter(|(d, _, _)| *d >= params.distance_min as f32)
                    .min_by(|a, b| a.0.total_cmp(&b.0));
                print!("scan {}: {}/{} valid", i, scan.valid_count(), scan.len());
                match nearest {
                    Some((d, x, y)) => println!(", nearest {:.0} mm at ({:.0}, {:.0})", d, x, y),
                    None => println!(),
                }
            }
            Err(e) => println!("scan {}: failed: {}", i, e),
        }
        sleep(SCAN_INTERVAL);
    }

    match device.disconnect() {
        Ok(()) => println!("disconnected"),
        Err(e) => eprintln!("Failed to disconnect cleanly: {}", e),
    }
}
