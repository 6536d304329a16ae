//! Per-connection non-blocking I/O engine.
//!
//! This module drives partial transfers over event-driven sockets.
//! A [`Connection`] owns one descriptor and advances its receive and
//! send cursors one readiness event at a time:
//! - [`rx`](Connection::rx) and [`tx`](Connection::tx) perform exactly
//!   one I/O attempt and report progress through the direction states,
//! - the interest toggles keep the dispatcher's registration in sync,
//! - [`is_dead`](Connection::is_dead) tells the dispatcher when to reap
//!   the connection.
//!
//! The engine never blocks and never retries; scheduling the next
//! attempt belongs to the event loop that owns the readiness source.

mod cursor;

#[doc(inline)]
pub use cursor::Cursor;

use crate::sys::{sys_close, sys_read, sys_write};

use std::os::fd::RawFd;
use std::{io, mem};

/// Readiness interest for one descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interest {
    pub read: bool,
    pub write: bool,
}

/// Dispatcher-side registration seam.
///
/// The engine never talks to an event loop directly; it pushes every
/// interest change through this trait. Implementations typically wrap
/// an epoll/kqueue modify call keyed by the descriptor.
pub trait EventRegistry {
    /// Replaces the interest set registered for `fd`.
    fn modify(&self, fd: RawFd, interest: Interest) -> io::Result<()>;
}

/// State of one transfer direction.
///
/// `S` is the dispatcher's own stage type; the engine stores it
/// opaquely and only ever writes [`Closed`](IoState::Closed) or the
/// stage handed to the completing call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IoState<S> {
    /// A transfer is in progress.
    Open,
    /// The direction saw an error or end-of-stream. Terminal.
    Closed,
    /// The transfer completed and reached the caller's stage.
    Done(S),
}

/// One socket endpoint under event-driven control.
///
/// A `Connection` owns its descriptor for its whole lifetime and
/// closes it on drop. Each direction carries an owned [`Cursor`] and
/// an [`IoState`]; the dispatcher installs a buffer with
/// [`begin_rx`](Self::begin_rx)/[`begin_tx`](Self::begin_tx), then
/// calls [`rx`](Self::rx)/[`tx`](Self::tx) whenever the descriptor is
/// ready, until the state leaves [`IoState::Open`].
///
/// A closed direction never reopens; once either direction is closed
/// the connection is dead and should be dropped.
pub struct Connection<S> {
    fd: RawFd,
    events: Interest,
    rx_state: IoState<S>,
    tx_state: IoState<S>,
    rx: Cursor,
    tx: Cursor,
}

impl<S: Copy> Connection<S> {
    /// Takes ownership of a connected, non-blocking descriptor.
    ///
    /// Both directions start open with empty cursors, and the initial
    /// interest is read-only.
    pub fn new(fd: RawFd) -> Self {
        Self {
            fd,
            events: Interest {
                read: true,
                write: false,
            },
            rx_state: IoState::Open,
            tx_state: IoState::Open,
            rx: Cursor::default(),
            tx: Cursor::default(),
        }
    }

    /// Returns the underlying descriptor.
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    /// Returns the interest set as last pushed to the registry.
    pub fn interest(&self) -> Interest {
        self.events
    }

    /// Returns the receive-direction state.
    pub fn rx_state(&self) -> IoState<S> {
        self.rx_state
    }

    /// Returns the send-direction state.
    pub fn tx_state(&self) -> IoState<S> {
        self.tx_state
    }

    /// Installs a fresh receive buffer and opens the direction.
    ///
    /// A closed direction stays closed.
    pub fn begin_rx(&mut self, buffer: Vec<u8>) {
        self.rx = Cursor::new(buffer);
        if !matches!(self.rx_state, IoState::Closed) {
            self.rx_state = IoState::Open;
        }
    }

    /// Installs a fresh send buffer and opens the direction.
    ///
    /// A closed direction stays closed.
    pub fn begin_tx(&mut self, buffer: Vec<u8>) {
        self.tx = Cursor::new(buffer);
        if !matches!(self.tx_state, IoState::Closed) {
            self.tx_state = IoState::Open;
        }
    }

    /// Recovers the receive buffer, leaving an empty cursor behind.
    pub fn take_rx(&mut self) -> Vec<u8> {
        mem::take(&mut self.rx).into_inner()
    }

    /// Recovers the send buffer, leaving an empty cursor behind.
    pub fn take_tx(&mut self) -> Vec<u8> {
        mem::take(&mut self.tx).into_inner()
    }

    /// Performs one non-blocking read into the receive cursor.
    ///
    /// Returns the number of bytes read this attempt (possibly zero).
    /// State transitions:
    /// - end-of-stream closes the direction,
    /// - would-block leaves everything unchanged,
    /// - any other failure closes the direction,
    /// - filling the cursor completely moves the direction to
    ///   `Done(next)`.
    pub fn rx(&mut self, next: S) -> usize {
        let n = sys_read(self.fd, self.rx.chunk_mut());

        if n == 0 {
            self.rx_state = IoState::Closed;
            return 0;
        }

        if n < 0 {
            if io::Error::last_os_error().kind() != io::ErrorKind::WouldBlock {
                self.rx_state = IoState::Closed;
            }
            return 0;
        }

        let n = n as usize;
        self.rx.advance(n);

        if self.rx.is_done() {
            self.rx_state = IoState::Done(next);
        }

        n
    }

    /// Performs one non-blocking write from the send cursor.
    ///
    /// Returns the number of bytes written this attempt (possibly
    /// zero). Would-block leaves everything unchanged; any other
    /// failure closes the direction; draining the cursor completely
    /// moves the direction to `Done(next)`.
    pub fn tx(&mut self, next: S) -> usize {
        let n = sys_write(self.fd, self.tx.chunk());

        if n < 0 {
            if io::Error::last_os_error().kind() != io::ErrorKind::WouldBlock {
                self.tx_state = IoState::Closed;
            }
            return 0;
        }

        let n = n as usize;
        self.tx.advance(n);

        if self.tx.is_done() {
            self.tx_state = IoState::Done(next);
        }

        n
    }

    /// Adds write to the registered interest set.
    pub fn tx_on<R: EventRegistry>(&mut self, registry: &R) -> io::Result<()> {
        self.events.write = true;
        registry.modify(self.fd, self.events)
    }

    /// Removes write from the registered interest set.
    pub fn tx_off<R: EventRegistry>(&mut self, registry: &R) -> io::Result<()> {
        self.events.write = false;
        registry.modify(self.fd, self.events)
    }

    /// Adds read to the registered interest set.
    pub fn rx_on<R: EventRegistry>(&mut self, registry: &R) -> io::Result<()> {
        self.events.read = true;
        registry.modify(self.fd, self.events)
    }

    /// Removes read from the registered interest set.
    pub fn rx_off<R: EventRegistry>(&mut self, registry: &R) -> io::Result<()> {
        self.events.read = false;
        registry.modify(self.fd, self.events)
    }

    /// Closes the receive direction explicitly.
    pub fn close_rx(&mut self) {
        self.rx_state = IoState::Closed;
    }

    /// Closes the send direction explicitly.
    pub fn close_tx(&mut self) {
        self.tx_state = IoState::Closed;
    }

    /// Returns `true` once either direction has closed.
    pub fn is_dead(&self) -> bool {
        matches!(self.rx_state, IoState::Closed) || matches!(self.tx_state, IoState::Closed)
    }
}

impl<S> Drop for Connection<S> {
    /// Closes the underlying descriptor.
    fn drop(&mut self) {
        sys_close(self.fd);
    }
}
