//! Last-known-value cache for the climate channel.

use crate::line_source::LineSource;
use crate::protocol;

/// State cache for the climate channel: ambient temperature from the wire,
/// desired temperature from the user, and a placeholder fan speed.
///
/// Reads are best-effort: every [`ambient_temperature`](Self::ambient_temperature)
/// call pulls at most one line from the source and falls back to the cached
/// value when nothing new (or nothing parseable) arrived. A field that never
/// received a value reads as `None`, which front ends render as a sentinel
/// such as `N/A`.
///
/// # Examples
///
/// ```
/// use homelink_lib::climate::ClimateMonitor;
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
/// let mut climate = ClimateMonitor::new(Quiet);
/// assert_eq!(climate.ambient_temperature(), None);
/// climate.set_desired_temperature(21.5);
/// assert_eq!(climate.desired_temperature(), Some(21.5));
/// assert_eq!(climate.fan_speed(), 0);
/// ```
#[derive(Debug)]
pub struct ClimateMonitor<S> {
    source: S,
    ambient: Option<f32>,
    desired: Option<f32>,
}

impl<S: LineSource> ClimateMonitor<S> {
    /// Creates a cache with no values yet cached.
    pub fn new(source: S) -> Self {
        Self {
            source,
            ambient: None,
            desired: None,
        }
    }

    /// Pulls one line from the source and returns the current ambient
    /// temperature in °C.
    ///
    /// An empty line (timeout), a malformed line, or a transport error all
    /// leave the cache untouched and return the previous value; `None` means
    /// no reading has ever arrived.
    pub fn ambient_temperature(&mut self) -> Option<f32> {
        // Stale data beats interrupting the caller: read errors are absorbed
        // the same way malformed lines are.
        if let Ok(line) = self.source.receive_line() {
            if let Some(value) = protocol::parse_temperature(&line) {
                self.ambient = Some(value);
            }
        }
        self.ambient
    }

    /// Returns the user-set target temperature in °C, without touching the
    /// wire. `None` until [`set_desired_temperature`](Self::set_desired_temperature)
    /// was called.
    pub fn desired_temperature(&self) -> Option<f32> {
        self.desired
    }

    /// Overwrites the target temperature. Local state only, nothing is
    /// transmitted to the device.
    pub fn set_desired_temperature(&mut self, value: f32) {
        self.desired = Some(value);
    }

    /// Returns the fan speed. The current firmware reports no fan telemetry,
    /// so this is the constant `0`.
    pub fn fan_speed(&self) -> u8 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_source::testing::ScriptedSource;
    use std::io;

    #[test]
    fn ambient_starts_unavailable() {
        let mut climate = ClimateMonitor::new(ScriptedSource::new([]));
        assert_eq!(climate.ambient_temperature(), None);
        assert_eq!(climate.desired_temperature(), None);
    }

    #[test]
    fn ambient_updates_from_valid_line() {
        let mut climate = ClimateMonitor::new(ScriptedSource::new(["21.5", "22.0"]));
        assert_eq!(climate.ambient_temperature(), Some(21.5));
        assert_eq!(climate.ambient_temperature(), Some(22.0));
    }

    #[test]
    fn malformed_line_keeps_cached_value() {
        let mut climate = ClimateMonitor::new(ScriptedSource::new(["21.5", "garbage", "21.5C"]));
        assert_eq!(climate.ambient_temperature(), Some(21.5));
        assert_eq!(climate.ambient_temperature(), Some(21.5));
        assert_eq!(climate.ambient_temperature(), Some(21.5));
    }

    #[test]
    fn timeout_keeps_cached_value() {
        let mut climate = ClimateMonitor::new(ScriptedSource::new(["19.0", ""]));
        assert_eq!(climate.ambient_temperature(), Some(19.0));
        assert_eq!(climate.ambient_temperature(), Some(19.0));
        // Exhausted script keeps reading as timeouts.
        assert_eq!(climate.ambient_temperature(), Some(19.0));
    }

    #[test]
    fn read_error_is_absorbed() {
        let mut source = ScriptedSource::new(["18.5"]);
        source.push_error(io::ErrorKind::BrokenPipe);
        let mut climate = ClimateMonitor::new(source);
        assert_eq!(climate.ambient_temperature(), Some(18.5));
        assert_eq!(climate.ambient_temperature(), Some(18.5));
    }

    #[test]
    fn desired_is_decoupled_from_the_wire() {
        let mut climate = ClimateMonitor::new(ScriptedSource::new(["21.5"]));
        climate.set_desired_temperature(24.0);
        assert_eq!(climate.ambient_temperature(), Some(21.5));
        // The wire parse must not leak into the user-set target.
        assert_eq!(climate.desired_temperature(), Some(24.0));
        climate.set_desired_temperature(18.0);
        assert_eq!(climate.desired_temperature(), Some(18.0));
        assert_eq!(climate.ambient_temperature(), Some(21.5));
    }

    #[test]
    fn fan_speed_is_constant_zero() {
        let climate = ClimateMonitor::new(ScriptedSource::new(["999"]));
        assert_eq!(climate.fan_speed(), 0);
    }
}
