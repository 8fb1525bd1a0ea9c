//! Line grammar for the home-telemetry UART stream.
//!
//! The microcontroller sends one reading per newline-terminated line. Two
//! shapes exist on the wire:
//!
//! - a bare decimal number: the ambient temperature (climate channel);
//! - `TAG:<decimal>` with `TAG` one of `OUT_TEMP`, `PRESSURE`, `LIGHT` or
//!   `CURTAIN` (curtain channel).
//!
//! Parsing is deliberately lenient: a line that matches neither shape yields
//! no reading at all, so stale telemetry never turns into an error for the
//! caller. Only explicit value construction (e.g. [`CurtainPosition`]) can
//! fail with a [`Error`].

use std::fmt;
use std::time::Duration;

/// Factory default baud rate of the telemetry stream.
pub const FACTORY_DEFAULT_BAUD_RATE: u32 = 9600;

/// Default bounded wait for one line read.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Default delay between opening the port and the first read.
///
/// Opening the port resets the microcontroller; reads issued before the
/// device finished booting would see garbage or nothing.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);

/// Represents all errors that can occur when constructing protocol values.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The curtain position is outside the valid range of
    /// [`CurtainPosition::MIN`] to [`CurtainPosition::MAX`].
    #[error("Curtain position {0} is out of range ({min} to {max})", min = CurtainPosition::MIN, max = CurtainPosition::MAX)]
    PositionOutOfRange(f32),
}

/// Parses a climate-channel line: a bare decimal temperature in °C.
///
/// Returns `None` for empty input (read timeout) and for anything that does
/// not parse as a float. Surrounding whitespace is tolerated.
///
/// # Examples
///
/// ```
/// use homelink_lib::protocol::parse_temperature;
///
/// assert_eq!(parse_temperature("21.5"), Some(21.5));
/// assert_eq!(parse_temperature(""), None);
/// assert_eq!(parse_temperature("OUT_TEMP:18.2"), None);
/// ```
pub fn parse_temperature(line: &str) -> Option<f32> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    line.parse::<f32>().ok()
}

/// One decoded curtain-channel reading.
///
/// The variant identifies which cache field the reading belongs to; the
/// payload is the decoded value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CurtainReading {
    /// `OUT_TEMP:<decimal>` — outdoor temperature in °C.
    OutdoorTemperature(f32),
    /// `PRESSURE:<decimal>` — outdoor pressure.
    OutdoorPressure(f32),
    /// `LIGHT:<decimal>` — light intensity.
    LightIntensity(f32),
    /// `CURTAIN:<decimal>` — curtain position in percent.
    Position(f32),
}

impl CurtainReading {
    /// Parses a curtain-channel line.
    ///
    /// The tag is matched as a literal prefix before the first colon; the
    /// numeric payload is the text between the first and second colon, so a
    /// trailing `:...` suffix is ignored (the device never sends one, but a
    /// partially garbled line should not poison the value). Any other line
    /// shape, unknown tag, or non-numeric payload yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use homelink_lib::protocol::CurtainReading;
    ///
    /// assert_eq!(
    ///     CurtainReading::parse("OUT_TEMP:18.2"),
    ///     Some(CurtainReading::OutdoorTemperature(18.2))
    /// );
    /// assert_eq!(CurtainReading::parse("21.5"), None);
    /// assert_eq!(CurtainReading::parse("CURTAIN:abc"), None);
    /// ```
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (tag, rest) = line.split_once(':')?;
        let payload = rest.split(':').next().unwrap_or(rest);
        let value = payload.parse::<f32>().ok()?;
        match tag {
            "OUT_TEMP" => Some(CurtainReading::OutdoorTemperature(value)),
            "PRESSURE" => Some(CurtainReading::OutdoorPressure(value)),
            "LIGHT" => Some(CurtainReading::LightIntensity(value)),
            "CURTAIN" => Some(CurtainReading::Position(value)),
            _ => None,
        }
    }
}

/// A validated curtain position in percent, `0.0` (closed) to `100.0` (open).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurtainPosition(f32);

impl CurtainPosition {
    /// Fully closed.
    pub const MIN: f32 = 0.0;
    /// Fully open.
    pub const MAX: f32 = 100.0;
}

impl TryFrom<f32> for CurtainPosition {
    type Error = Error;

    /// Validates that the position is within [`Self::MIN`] to [`Self::MAX`].
    fn try_from(value: f32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(CurtainPosition(value))
        } else {
            Err(Error::PositionOutOfRange(value))
        }
    }
}

impl std::ops::Deref for CurtainPosition {
    type Target = f32;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for CurtainPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} %", self.0)
    }
}
