//! Receiver Serial Link
//!
//! The link is read-only from the core's point of view: bytes flow from
//! the receiver to the accumulator and decoder. Framing is fixed at
//! 8 data bits, no parity, 1 stop bit; only the baud rate varies.

use crate::error::LinkError;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::time::timeout;
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::debug;

/// Byte-oriented receiver link with a switchable baud rate
///
/// The probe and the ingest loop are written against this trait so they
/// can run on a scripted link in tests, without hardware.
#[allow(async_fn_in_trait)]
pub trait UartLink {
    /// (Re)open the link at the given baud rate, discarding any prior handle
    async fn reopen(&mut self, baud: u32) -> Result<(), LinkError>;

    /// Read up to `buf.len()` bytes, waiting at most `wait`
    ///
    /// Returns `Ok(0)` when the wait elapses without data.
    async fn read(&mut self, buf: &mut [u8], wait: Duration) -> Result<usize, LinkError>;

    /// Currently configured baud rate, 0 until the link is first opened
    fn baud(&self) -> u32;
}

/// Receiver link over a real serial device
pub struct SerialLink {
    /// Serial device path (e.g. "/dev/ttyUSB0")
    device: String,
    /// Currently configured baud rate, 0 until first opened
    baud: u32,
    /// Open stream, present after a successful reopen
    stream: Option<SerialStream>,
}

impl SerialLink {
    /// Create a link for the given device path; the port is not opened yet
    pub fn new(device: &str) -> Self {
        Self {
            device: device.to_string(),
            baud: 0,
            stream: None,
        }
    }

    /// Serial device path this link is bound to
    pub fn device(&self) -> &str {
        &self.device
    }
}

impl UartLink for SerialLink {
    async fn reopen(&mut self, baud: u32) -> Result<(), LinkError> {
        // Drop the old handle first so the device is free to reopen.
        self.stream = None;
        let stream = tokio_serial::new(&self.device, baud)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .open_native_async()?;
        debug!("Opened {} at {} baud", self.device, baud);
        self.stream = Some(stream);
        self.baud = baud;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8], wait: Duration) -> Result<usize, LinkError> {
        let stream = self.stream.as_mut().ok_or(LinkError::NotOpen)?;
        match timeout(wait, stream.read(buf)).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Ok(0),
        }
    }

    fn baud(&self) -> u32 {
        self.baud
    }
}
