//! Last-known-value cache for the curtain channel.

use crate::line_source::LineSource;
use crate::protocol::{CurtainPosition, CurtainReading};

/// State cache for the curtain channel: outdoor temperature, pressure, light
/// intensity and curtain position, all multiplexed over one tagged line
/// format.
///
/// Every getter runs the same update step first: pull at most one line from
/// the source and dispatch it by tag. The line that arrives may belong to a
/// different field than the one the caller asked for; that other field is
/// updated and the requested one returns its cached (possibly `None`) value.
/// The next readings catch up on subsequent calls.
///
/// # Examples
///
/// ```
/// use homelink_lib::curtain::CurtainMonitor;
/// use homelink_lib::line_source::LineSource;
/// use std::io;
///
/// struct Quiet;
/// impl LineSource for Quiet {
///     fn receive_line(&mut self) -> io::Result<String> {
///         Ok(String::new())
///     }
/// }
///
/// let mut curtain = CurtainMonitor::new(Quiet);
/// assert_eq!(curtain.curtain_status(), None);
/// curtain.set_curtain_status(42.0);
/// assert_eq!(curtain.curtain_status(), Some(42.0));
/// ```
#[derive(Debug)]
pub struct CurtainMonitor<S> {
    source: S,
    outdoor_temperature: Option<f32>,
    outdoor_pressure: Option<f32>,
    light_intensity: Option<f32>,
    curtain_status: Option<f32>,
}

impl<S: LineSource> CurtainMonitor<S> {
    /// Creates a cache with no values yet cached.
    pub fn new(source: S) -> Self {
        Self {
            source,
            outdoor_temperature: None,
            outdoor_pressure: None,
            light_intensity: None,
            curtain_status: None,
        }
    }

    /// Shared update step: consume at most one line and fold it into the
    /// matching field. Timeouts, unknown tags, malformed payloads and
    /// transport errors all leave every field untouched.
    fn poll(&mut self) {
        let line = match self.source.receive_line() {
            Ok(line) => line,
            Err(_) => return,
        };
        match CurtainReading::parse(&line) {
            Some(CurtainReading::OutdoorTemperature(value)) => {
                self.outdoor_temperature = Some(value);
            }
            Some(CurtainReading::OutdoorPressure(value)) => {
                self.outdoor_pressure = Some(value);
            }
            Some(CurtainReading::LightIntensity(value)) => {
                self.light_intensity = Some(value);
            }
            Some(CurtainReading::Position(value)) => {
                self.curtain_status = Some(value);
            }
            None => {}
        }
    }

    /// Returns the outdoor temperature in °C, after one update step.
    pub fn outdoor_temperature(&mut self) -> Option<f32> {
        self.poll();
        self.outdoor_temperature
    }

    /// Returns the outdoor pressure, after one update step.
    pub fn outdoor_pressure(&mut self) -> Option<f32> {
        self.poll();
        self.outdoor_pressure
    }

    /// Returns the light intensity, after one update step.
    pub fn light_intensity(&mut self) -> Option<f32> {
        self.poll();
        self.light_intensity
    }

    /// Returns the curtain position in percent, after one update step.
    pub fn curtain_status(&mut self) -> Option<f32> {
        self.poll();
        self.curtain_status
    }

    /// Overwrites the cached curtain position.
    ///
    /// Values outside [`CurtainPosition::MIN`] to [`CurtainPosition::MAX`]
    /// are dropped without touching the cache. Nothing is transmitted to the
    /// device.
    // TODO: send `SET_CURTAIN:<value>` once the firmware accepts commands.
    pub fn set_curtain_status(&mut self, value: f32) {
        if let Ok(position) = CurtainPosition::try_from(value) {
            self.curtain_status = Some(*position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_source::testing::ScriptedSource;
    use std::io;

    #[test]
    fn all_fields_start_unavailable() {
        let mut curtain = CurtainMonitor::new(ScriptedSource::new([]));
        assert_eq!(curtain.outdoor_temperature(), None);
        assert_eq!(curtain.outdoor_pressure(), None);
        assert_eq!(curtain.light_intensity(), None);
        assert_eq!(curtain.curtain_status(), None);
    }

    #[test]
    fn tagged_lines_update_matching_fields() {
        let mut curtain = CurtainMonitor::new(ScriptedSource::new([
            "OUT_TEMP:18.2",
            "PRESSURE:1013.25",
            "LIGHT:870",
            "CURTAIN:42",
        ]));
        assert_eq!(curtain.outdoor_temperature(), Some(18.2));
        assert_eq!(curtain.outdoor_pressure(), Some(1013.25));
        assert_eq!(curtain.light_intensity(), Some(870.0));
        assert_eq!(curtain.curtain_status(), Some(42.0));
    }

    #[test]
    fn update_step_is_shared_between_getters() {
        let mut curtain = CurtainMonitor::new(ScriptedSource::new(["OUT_TEMP:18.2"]));
        // The pressure getter consumes the temperature line: temperature is
        // updated behind the scenes while pressure stays unavailable.
        assert_eq!(curtain.outdoor_pressure(), None);
        assert_eq!(curtain.outdoor_temperature(), Some(18.2));
        assert_eq!(curtain.outdoor_pressure(), None);
    }

    #[test]
    fn malformed_lines_are_dropped() {
        let mut curtain = CurtainMonitor::new(ScriptedSource::new([
            "OUT_TEMP:18.2",
            "OUT_TEMP:abc",
            "HUMIDITY:55",
            "21.5",
            "",
        ]));
        assert_eq!(curtain.outdoor_temperature(), Some(18.2));
        assert_eq!(curtain.outdoor_temperature(), Some(18.2));
        assert_eq!(curtain.outdoor_temperature(), Some(18.2));
        assert_eq!(curtain.outdoor_temperature(), Some(18.2));
        assert_eq!(curtain.outdoor_temperature(), Some(18.2));
    }

    #[test]
    fn read_error_is_absorbed() {
        let mut source = ScriptedSource::new(["LIGHT:500"]);
        source.push_error(io::ErrorKind::BrokenPipe);
        let mut curtain = CurtainMonitor::new(source);
        assert_eq!(curtain.light_intensity(), Some(500.0));
        assert_eq!(curtain.light_intensity(), Some(500.0));
    }

    #[test]
    fn set_curtain_status_accepts_valid_range() {
        let mut curtain = CurtainMonitor::new(ScriptedSource::new([]));
        curtain.set_curtain_status(0.0);
        assert_eq!(curtain.curtain_status(), Some(0.0));
        curtain.set_curtain_status(100.0);
        assert_eq!(curtain.curtain_status(), Some(100.0));
        curtain.set_curtain_status(42.0);
        assert_eq!(curtain.curtain_status(), Some(42.0));
    }

    #[test]
    fn out_of_range_set_is_a_no_op() {
        let mut curtain = CurtainMonitor::new(ScriptedSource::new([]));
        curtain.set_curtain_status(150.0);
        assert_eq!(curtain.curtain_status(), None);
        curtain.set_curtain_status(42.0);
        curtain.set_curtain_status(-1.0);
        assert_eq!(curtain.curtain_status(), Some(42.0));
    }

    #[test]
    fn wire_update_overwrites_explicit_set() {
        let mut curtain = CurtainMonitor::new(ScriptedSource::new(["CURTAIN:77"]));
        curtain.set_curtain_status(10.0);
        assert_eq!(curtain.curtain_status(), Some(77.0));
    }
}
