//! Line-oriented access to the telemetry byte stream.
//!
//! [`LineSource`] is the seam between the state caches and the transport: one
//! decoded, trimmed line per call, with an empty string standing in for "no
//! data arrived within the bounded wait". A read timeout is therefore
//! indistinguishable from a quiet device, which is exactly the contract the
//! caches want.
//!
//! [`SerialLineSource`] implements the trait over a real serial port (feature
//! `serial`); [`SharedLineSource`] wraps any source in an `Arc<Mutex<..>>` so
//! the climate and curtain caches can share a single port without
//! interleaving partial reads.

use std::io;
#[cfg(feature = "serial")]
use std::io::Read;
use std::sync::{Arc, Mutex};

/// Yields discrete text lines from a telemetry byte stream.
pub trait LineSource {
    /// Returns the next decoded, whitespace-trimmed line, or an empty string
    /// if no complete line arrived within the source's bounded wait.
    ///
    /// # Errors
    ///
    /// Transport-level read failures other than a timeout. Callers that
    /// prefer stale data over failure (the state caches do) treat an error
    /// the same as an empty line.
    fn receive_line(&mut self) -> io::Result<String>;
}

/// Accumulates raw bytes and hands out complete lines.
///
/// Partial tails survive across reads, so a line split by a read timeout is
/// completed by a later chunk instead of being dropped.
#[derive(Debug, Default)]
struct LineBuffer {
    bytes: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    /// Removes and decodes the first buffered line, if one is complete.
    ///
    /// Decoding drops invalid UTF-8 bytes rather than replacing them; the
    /// device-side UART occasionally garbles a byte during its reset and the
    /// remainder of the line is still usable.
    fn take_line(&mut self) -> Option<String> {
        let pos = self.bytes.iter().position(|&b| b == b'\n')?;
        let raw: Vec<u8> = self.bytes.drain(..=pos).collect();
        let decoded: String = String::from_utf8_lossy(&raw)
            .chars()
            .filter(|c| *c != char::REPLACEMENT_CHARACTER)
            .collect();
        Some(decoded.trim().to_string())
    }
}

/// A [`LineSource`] backed by one serial port handle.
///
/// The handle is owned for the lifetime of the value and released on drop;
/// there is no reconnect. All reads are bounded by the timeout configured at
/// [`connect`](Self::connect) time.
#[cfg(feature = "serial")]
pub struct SerialLineSource {
    port: Box<dyn serialport::SerialPort>,
    buffer: LineBuffer,
    timeout: std::time::Duration,
}

/// Represents all errors that can occur while opening a line source.
#[cfg(feature = "serial")]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The serial port could not be opened.
    #[error("Cannot open serial port {device}: {source}")]
    Connect {
        /// The device name that failed to open.
        device: String,
        /// The underlying serial error.
        source: serialport::Error,
    },
}

#[cfg(feature = "serial")]
impl SerialLineSource {
    /// Opens `device` at `baud_rate` (8-N-1, no flow control) and waits out
    /// the settle delay before returning.
    ///
    /// Opening the port typically resets the attached microcontroller; the
    /// settle delay gives it time to finish booting, so the first
    /// [`receive_line`](LineSource::receive_line) call does not race the
    /// boot banner. A failure to open is a hard error and is never retried.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use homelink_lib::line_source::SerialLineSource;
    /// use homelink_lib::protocol;
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let source = SerialLineSource::connect(
    ///     "/dev/ttyUSB0",
    ///     protocol::FACTORY_DEFAULT_BAUD_RATE,
    ///     protocol::DEFAULT_READ_TIMEOUT,
    ///     protocol::DEFAULT_SETTLE_DELAY,
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn connect(
        device: &str,
        baud_rate: u32,
        timeout: std::time::Duration,
        settle_delay: std::time::Duration,
    ) -> Result<Self, Error> {
        let port = serialport::new(device, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(timeout)
            .open()
            .map_err(|source| Error::Connect {
                device: device.to_string(),
                source,
            })?;
        std::thread::sleep(settle_delay);
        Ok(Self {
            port,
            buffer: LineBuffer::default(),
            timeout,
        })
    }
}

#[cfg(feature = "serial")]
impl LineSource for SerialLineSource {
    fn receive_line(&mut self) -> io::Result<String> {
        if let Some(line) = self.buffer.take_line() {
            return Ok(line);
        }
        // The port read is already bounded by its own timeout; the deadline
        // keeps a trickling sender from chaining several of them.
        let deadline = std::time::Instant::now() + self.timeout;
        let mut chunk = [0u8; 256];
        loop {
            match self.port.read(&mut chunk) {
                Ok(0) => return Ok(String::new()),
                Ok(n) => {
                    self.buffer.push(&chunk[..n]);
                    if let Some(line) = self.buffer.take_line() {
                        return Ok(line);
                    }
                }
                Err(error) if error.kind() == io::ErrorKind::TimedOut => {
                    return Ok(String::new());
                }
                Err(error) => return Err(error),
            }
            if std::time::Instant::now() >= deadline {
                return Ok(String::new());
            }
        }
    }
}

/// A cloneable, mutex-guarded [`LineSource`].
///
/// The climate and curtain caches read from the same physical port. Guarding
/// the handle keeps overlapping accessor calls (a UI timer firing before the
/// previous refresh returned) from interleaving partial reads.
///
/// # Examples
///
/// ```
/// use homelink_lib::line_source::{LineSource, SharedLineSource};
/// use std::io;
///
/// struct Quiet;
/// impl LineSource for Quiet {
///     fn receive_line(&mut self) -> io::Result<String> {
///         Ok(String::new())
///     }
/// }
///
/// let shared = SharedLineSource::new(Quiet);
/// let mut for_climate = shared.clone();
/// let mut for_curtain = shared;
/// assert_eq!(for_climate.receive_line().unwrap(), "");
/// assert_eq!(for_curtain.receive_line().unwrap(), "");
/// ```
#[derive(Debug)]
pub struct SharedLineSource<S> {
    inner: Arc<Mutex<S>>,
}

// Cloning shares the handle regardless of whether `S` itself is `Clone`.
impl<S> Clone for SharedLineSource<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S> SharedLineSource<S> {
    /// Wraps a source for shared use.
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    /// Creates a handle from an already shared source.
    pub fn from_shared(inner: Arc<Mutex<S>>) -> Self {
        Self { inner }
    }

    /// Clones the shared inner source.
    pub fn clone_shared(&self) -> Arc<Mutex<S>> {
        self.inner.clone()
    }
}

impl<S: LineSource> LineSource for SharedLineSource<S> {
    fn receive_line(&mut self) -> io::Result<String> {
        let mut source = self.inner.lock().unwrap();
        source.receive_line()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::LineSource;
    use std::collections::VecDeque;
    use std::io;

    /// A [`LineSource`] that replays a fixed script of results and yields
    /// empty lines (timeouts) once the script is exhausted.
    pub(crate) struct ScriptedSource {
        results: VecDeque<io::Result<String>>,
    }

    impl ScriptedSource {
        pub(crate) fn new<'a, I>(lines: I) -> Self
        where
            I: IntoIterator<Item = &'a str>,
        {
            Self {
                results: lines.into_iter().map(|l| Ok(l.to_string())).collect(),
            }
        }

        pub(crate) fn push_error(&mut self, kind: io::ErrorKind) {
            self.results.push_back(Err(io::Error::from(kind)));
        }
    }

    impl LineSource for ScriptedSource {
        fn receive_line(&mut self) -> io::Result<String> {
            self.results.pop_front().unwrap_or_else(|| Ok(String::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_buffer_splits_on_newline() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"21.5\nOUT_TEMP:18.2\n");
        assert_eq!(buffer.take_line().as_deref(), Some("21.5"));
        assert_eq!(buffer.take_line().as_deref(), Some("OUT_TEMP:18.2"));
        assert_eq!(buffer.take_line(), None);
    }

    #[test]
    fn line_buffer_keeps_partial_tail() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"21");
        assert_eq!(buffer.take_line(), None);
        buffer.push(b".5\n22");
        assert_eq!(buffer.take_line().as_deref(), Some("21.5"));
        assert_eq!(buffer.take_line(), None);
        buffer.push(b".0\n");
        assert_eq!(buffer.take_line().as_deref(), Some("22.0"));
    }

    #[test]
    fn line_buffer_trims_carriage_return() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"  21.5\r\n");
        assert_eq!(buffer.take_line().as_deref(), Some("21.5"));
    }

    #[test]
    fn line_buffer_drops_invalid_bytes() {
        let mut buffer = LineBuffer::default();
        buffer.push(b"21\xff.5\n");
        assert_eq!(buffer.take_line().as_deref(), Some("21.5"));
    }

    #[test]
    fn shared_source_serializes_access() {
        use super::testing::ScriptedSource;

        let shared = SharedLineSource::new(ScriptedSource::new(["21.5", "22.0"]));
        let mut first = shared.clone();
        let mut second = shared;
        assert_eq!(first.receive_line().unwrap(), "21.5");
        assert_eq!(second.receive_line().unwrap(), "22.0");
        // Exhausted script reads as a timeout, not an error.
        assert_eq!(first.receive_line().unwrap(), "");
    }
}
