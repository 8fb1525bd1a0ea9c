//! Home telemetry monitor CLI
//!
//! A command-line front end for the simulated home-automation rig: a
//! microcontroller streams readings over a serial line and this tool renders
//! them on the console.
//!
//! This tool allows users to:
//! - Read the climate channel (ambient temperature, desired temperature,
//!   fan speed) once.
//! - Read the curtain channel (outdoor temperature, pressure, light
//!   intensity, curtain position) once.
//! - Run in a continuous watch mode that polls both channels at an interval.
//!
//! Fields that have not received a reading yet are rendered as "N/A". The
//! CLI leverages the `homelink_lib` crate for the line grammar and the state
//! caches.

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{Logger, LoggerHandle};
use homelink_lib::{
    climate::ClimateMonitor,
    curtain::CurtainMonitor,
    line_source::{SerialLineSource, SharedLineSource},
};
use log::*;
use std::panic;

mod commandline;

fn logging_init(loglevel: LevelFilter) -> LoggerHandle {
    let log_handle = Logger::try_with_env_or_str(loglevel.as_str())
        .expect("Cannot init logging")
        .start()
        .expect("Cannot start logging");

    panic::set_hook(Box::new(|panic_info| {
        let (filename, line, column) = panic_info
            .location()
            .map(|loc| (loc.file(), loc.line(), loc.column()))
            .unwrap_or(("<unknown_file>", 0, 0)); // Provide defaults

        let cause_str = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            *s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.as_str()
        } else {
            "<unknown_panic_cause>"
        };

        error!(
            target: "panic",
            "Thread '{}' panicked at '{}': {}:{} - Cause: {}",
            std::thread::current().name().unwrap_or("<unnamed>"),
            filename,
            line,
            column,
            cause_str
        );
    }));
    log_handle
}

/// Renders an optional reading, using the sentinel the GUI shows for fields
/// that never received a value.
fn display_reading(value: Option<f32>) -> String {
    match value {
        Some(value) => value.to_string(),
        None => String::from("N/A"),
    }
}

macro_rules! print_climate {
    ($climate:expr) => {
        println!(
            "Ambient temperature (°C): {}",
            display_reading($climate.ambient_temperature())
        );
        println!(
            "Desired temperature (°C): {}",
            display_reading($climate.desired_temperature())
        );
        println!("Fan speed: {}", $climate.fan_speed());
    };
}

macro_rules! print_curtain {
    ($curtain:expr) => {
        println!(
            "Outdoor temperature (°C): {}",
            display_reading($curtain.outdoor_temperature())
        );
        println!(
            "Outdoor pressure: {}",
            display_reading($curtain.outdoor_pressure())
        );
        println!(
            "Light intensity: {}",
            display_reading($curtain.light_intensity())
        );
        println!(
            "Curtain position (%): {}",
            display_reading($curtain.curtain_status())
        );
    };
}

fn main() -> Result<()> {
    let args = commandline::CliArgs::parse();

    // 1. Initialize logging as early as possible
    let _log_handle = logging_init(args.verbose.log_level_filter());
    info!(
        "Home telemetry monitor started. Log level: {}",
        args.verbose.log_level_filter()
    );

    // 2. Open the shared serial line source
    info!(
        "Attempting to connect to device {} (Baud: {}, Timeout: {:?}, Settle delay: {:?})...",
        args.device, args.baud_rate, args.timeout, args.settle_delay
    );
    let source = SharedLineSource::new(
        SerialLineSource::connect(&args.device, args.baud_rate, args.timeout, args.settle_delay)
            .with_context(|| format!("Cannot open serial port {}", args.device))?,
    );
    let mut climate = ClimateMonitor::new(source.clone());
    let mut curtain = CurtainMonitor::new(source);

    // 3. Execute the command
    match args.command {
        commandline::CliCommands::Watch { poll_interval } => {
            info!("Starting watch mode: interval={poll_interval:?}");
            loop {
                debug!("Watch: polling both channels...");
                print_climate!(&mut climate);
                print_curtain!(&mut curtain);
                println!();
                std::thread::sleep(poll_interval);
            }
        }
        commandline::CliCommands::Climate => {
            info!("Executing: Read Climate Channel");
            print_climate!(&mut climate);
        }
        commandline::CliCommands::Curtain => {
            info!("Executing: Read Curtain Channel");
            print_curtain!(&mut curtain);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reading() {
        assert_eq!(display_reading(Some(21.5)), "21.5");
        assert_eq!(display_reading(Some(0.0)), "0");
        assert_eq!(display_reading(None), "N/A");
    }
}
