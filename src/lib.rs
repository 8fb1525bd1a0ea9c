//! A library for reading home-automation telemetry from a UART line stream.
//!
//! A simulated microcontroller streams readings one per newline-terminated
//! line: a bare decimal number for the ambient temperature (climate channel)
//! and `TAG:<decimal>` pairs for the curtain channel (outdoor temperature,
//! pressure, light intensity, curtain position). This crate provides:
//!
//! 1.  **Line grammar**: [`protocol`] parses single lines into typed
//!     readings and validates explicitly constructed values.
//!
//! 2.  **Line sources**: [`line_source`] abstracts the byte stream behind a
//!     one-line-per-call trait, with a serial implementation (feature
//!     `serial`) and a mutex-guarded wrapper for sharing one port.
//!
//! 3.  **State caches**: [`climate::ClimateMonitor`] and
//!     [`curtain::CurtainMonitor`] hold the last known value per telemetry
//!     field and refresh them opportunistically, one line per accessor call.
//!
//! Telemetry is best-effort by design: timeouts and malformed lines never
//! surface as errors, they just leave the caches unchanged. Only the initial
//! port open can fail hard.
//!
//! ## Quick Start
//!
//! ```no_run
//! use homelink_lib::{
//!     climate::ClimateMonitor,
//!     curtain::CurtainMonitor,
//!     line_source::{SerialLineSource, SharedLineSource},
//!     protocol,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Open the port once and share it between both caches.
//!     let source = SharedLineSource::new(SerialLineSource::connect(
//!         "/dev/ttyUSB0",
//!         protocol::FACTORY_DEFAULT_BAUD_RATE,
//!         protocol::DEFAULT_READ_TIMEOUT,
//!         protocol::DEFAULT_SETTLE_DELAY,
//!     )?);
//!     let mut climate = ClimateMonitor::new(source.clone());
//!     let mut curtain = CurtainMonitor::new(source);
//!
//!     match climate.ambient_temperature() {
//!         Some(celsius) => println!("Ambient temperature: {celsius} °C"),
//!         None => println!("Ambient temperature: N/A"),
//!     }
//!     curtain.set_curtain_status(42.0);
//!
//!     Ok(())
//! }
//! ```

pub mod climate;
pub mod curtain;
pub mod line_source;
pub mod protocol;
