use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use homelink_lib::protocol as proto;
use std::time::Duration;

fn default_device_name() -> String {
    if cfg!(target_os = "windows") {
        String::from("COM2") // Matches the PICSimLab default pairing.
    } else {
        String::from("/dev/ttyUSB0") // Common default for USB-to-serial adapters on Linux.
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum CliCommands {
    /// Run in watch mode: continuously poll both channels at a specified
    /// interval and print the readings to the standard output.
    /// Fields without a reading yet are printed as "N/A".
    #[clap(verbatim_doc_comment)]
    Watch {
        /// Interval between polls (e.g., "2s", "500ms").
        #[arg(value_parser = humantime::parse_duration, short, long, default_value = "2sec")]
        poll_interval: Duration,
    },

    /// Read and display the climate channel once:
    /// ambient temperature, desired temperature, fan speed.
    Climate,

    /// Read and display the curtain channel once:
    /// outdoor temperature, pressure, light intensity, curtain position.
    Curtain,
}

const fn about_text() -> &'static str {
    "Home telemetry monitor - read climate and curtain readings from the UART line stream."
}

#[derive(Parser, Debug)]
#[command(name="homemon", author, version, about=about_text(), long_about = None, propagate_version = true)]
pub struct CliArgs {
    /// Configure verbosity of logging output.
    /// -v for info, -vv for debug, -vvv for trace. Default is off.
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,

    /// Serial port device name.
    /// Examples: "/dev/ttyUSB0" (Linux), "COM2" (Windows).
    #[arg(short, long, default_value_t = default_device_name())]
    pub device: String,

    /// Baud rate for serial communication.
    /// Must match the firmware's configured rate.
    #[arg(long, default_value_t = proto::FACTORY_DEFAULT_BAUD_RATE)]
    pub baud_rate: u32,

    /// Bounded wait for one line read.
    /// Examples: "1s", "500ms".
    #[arg(long, default_value = "1s", value_parser = humantime::parse_duration, verbatim_doc_comment)]
    pub timeout: Duration,

    /// Delay between opening the port and the first read.
    /// Opening the port resets the microcontroller; give it time to boot.
    /// Examples: "2s", "500ms".
    #[arg(long, default_value = "2s", value_parser = humantime::parse_duration, verbatim_doc_comment)]
    pub settle_delay: Duration,

    /// What to read from the device.
    #[command(subcommand)]
    pub command: CliCommands,
}
