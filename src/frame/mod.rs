//! Frame transmission and synchronous request execution.
//!
//! This module moves whole frames over blocking descriptors:
//! - [`send_frame`] flushes a header plus payload as one logical
//!   scatter/gather write,
//! - [`read_full`] reads an exact number of bytes or fails,
//! - [`exec_frame`] runs one request/response exchange end to end.
//!
//! Frames are opaque here: the wire layout lives behind the
//! [`FrameHeader`] trait, and payload bytes are never interpreted.
//! Callers on the event-driven path use [`crate::conn`] instead; these
//! routines block and belong on control-plane threads.

mod gather;

#[doc(inline)]
pub use gather::GatherCursor;

use crate::sys::{sys_read, sys_sendmsg};

use std::io;
use std::os::fd::RawFd;

use tracing::error;

/// Fixed-size wire header of a request/response frame.
///
/// Requests and responses share one layout; the executor decodes the
/// response in place over the request's storage. Implementations
/// usually wrap a byte array with field accessors:
///
/// ```rust,ignore
/// struct Header {
///     bytes: [u8; 48],
/// }
///
/// impl FrameHeader for Header {
///     fn as_bytes(&self) -> &[u8] {
///         &self.bytes
///     }
///
///     fn as_bytes_mut(&mut self) -> &mut [u8] {
///         &mut self.bytes
///     }
///
///     fn is_write(&self) -> bool {
///         self.bytes[2] & 0x01 != 0
///     }
///
///     fn data_len(&self) -> u32 {
///         u32::from_le_bytes(self.bytes[4..8].try_into().unwrap())
///     }
/// }
/// ```
pub trait FrameHeader {
    /// Returns the header's wire image.
    fn as_bytes(&self) -> &[u8];

    /// Returns the header's wire image mutably, for decoding a
    /// response in place.
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Returns `true` when the frame carries a request body toward
    /// the peer.
    fn is_write(&self) -> bool;

    /// Returns the payload length this header declares.
    fn data_len(&self) -> u32;
}

/// Sends a header and payload as one logical write.
///
/// The two buffers go out through a single gather descriptor, retried
/// across partial writes and interruption until every byte is on the
/// wire. Would-block is not retried: blocking callers sit on sockets
/// with a bounded send timeout, and hitting it fails the call.
///
/// # Errors
///
/// Returns the first write error other than interruption. The stream
/// position is unspecified after a failure; callers abandon the
/// descriptor.
pub fn send_frame<H: FrameHeader>(fd: RawFd, header: &H, payload: &[u8]) -> io::Result<()> {
    let mut message = GatherCursor::new(header.as_bytes(), payload);

    while !message.is_empty() {
        let n = sys_sendmsg(fd, message.segments());

        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                continue;
            }

            error!("failed to send frame: {err}");
            return Err(err);
        }

        message.advance(n as usize);
    }

    Ok(())
}

/// Reads exactly `buffer.len()` bytes from a blocking descriptor.
///
/// Interruption is retried; everything else fails, including a clean
/// end-of-stream before the buffer fills (`UnexpectedEof`).
pub fn read_full(fd: RawFd, buffer: &mut [u8]) -> io::Result<()> {
    read_full_with(fd, buffer, false)
}

fn read_full_with(fd: RawFd, buffer: &mut [u8], retry_would_block: bool) -> io::Result<()> {
    let mut pos = 0;

    while pos < buffer.len() {
        let n = sys_read(fd, &mut buffer[pos..]);

        if n == 0 {
            error!("connection closed with {} bytes outstanding", buffer.len() - pos);
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed mid-frame",
            ));
        }

        if n < 0 {
            let err = io::Error::last_os_error();
            match err.kind() {
                io::ErrorKind::Interrupted => continue,
                io::ErrorKind::WouldBlock if retry_would_block => continue,
                _ => {
                    error!("failed to read from socket: {err}");
                    return Err(err);
                }
            }
        }

        pos += n as usize;
    }

    Ok(())
}

/// Runs one synchronous request/response exchange.
///
/// Equivalent to [`exec_frame_with`] without the would-block retry;
/// the descriptor must be in blocking mode.
pub fn exec_frame<H: FrameHeader>(fd: RawFd, header: &mut H, data: &mut [u8]) -> io::Result<()> {
    exec_frame_with(fd, header, data, false)
}

/// Runs one synchronous request/response exchange.
///
/// The direction of `data` follows the header: a write-bearing frame
/// sends `header.data_len()` bytes of `data` as the request body and
/// expects a bare response header back; otherwise the request is the
/// header alone and `data` receives the response body. The number of
/// response bytes read is the smaller of what the caller provisioned
/// and what the response header declares, so a peer can neither
/// overrun the buffer nor stall the call by declaring more than it
/// sends.
///
/// On success the response header has replaced the request image in
/// `header`. With `retry_would_block` set, reads on a non-blocking
/// descriptor spin until the data arrives.
///
/// # Errors
///
/// Returns the underlying error of the first failing send or read.
///
/// # Panics
///
/// Panics if a write-bearing header declares more bytes than `data`
/// holds.
pub fn exec_frame_with<H: FrameHeader>(
    fd: RawFd,
    header: &mut H,
    data: &mut [u8],
    retry_would_block: bool,
) -> io::Result<()> {
    let (wlen, mut rlen) = if header.is_write() {
        (header.data_len() as usize, 0)
    } else {
        (0, (header.data_len() as usize).min(data.len()))
    };

    send_frame(fd, header, &data[..wlen])?;

    if let Err(err) = read_full_with(fd, header.as_bytes_mut(), retry_would_block) {
        error!("failed to read a response: {err}");
        return Err(err);
    }

    // The response may declare less than was asked for.
    rlen = rlen.min(header.data_len() as usize);

    if rlen > 0 {
        if let Err(err) = read_full_with(fd, &mut data[..rlen], retry_would_block) {
            error!("failed to read the response data: {err}");
            return Err(err);
        }
    }

    Ok(())
}
