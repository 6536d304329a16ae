use crate::sys::{sys_close, sys_set_nonblocking, sys_setsockopt};

use libc::{
    IPPROTO_TCP, SO_KEEPALIVE, SO_RCVTIMEO, SO_SNDTIMEO, SOL_SOCKET, TCP_KEEPCNT, TCP_KEEPIDLE,
    TCP_KEEPINTVL, TCP_NODELAY, c_int, timeval,
};
use std::io;
use std::os::fd::RawFd;
use std::time::Duration;

use tracing::{debug, error};

/// Send timeout for blocking control-plane sockets.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Receive timeout for blocking control-plane sockets.
///
/// Much longer than [`SEND_TIMEOUT`]: the peer may have to finish
/// local storage work before it can answer.
pub const RECV_TIMEOUT: Duration = Duration::from_secs(30);

/// Seconds a connection stays idle before the first keepalive probe.
pub const KEEPALIVE_IDLE: c_int = 5;

/// Seconds between keepalive probes.
pub const KEEPALIVE_INTERVAL: c_int = 1;

/// Unanswered probes before the connection is declared dead.
pub const KEEPALIVE_PROBES: c_int = 3;

/// Switches a descriptor to non-blocking mode.
///
/// # Errors
///
/// On failure the descriptor is closed before the error is returned;
/// it must not be used again. A socket that cannot be made
/// non-blocking must never reach the event engine.
pub fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    if let Err(err) = sys_set_nonblocking(fd) {
        error!("failed to set socket non-blocking: {err}");
        sys_close(fd);
        return Err(err);
    }

    Ok(())
}

/// Applies [`SEND_TIMEOUT`] to the socket's send path.
pub fn set_snd_timeout(fd: RawFd) -> io::Result<()> {
    sys_setsockopt(fd, SOL_SOCKET, SO_SNDTIMEO, &timeval_of(SEND_TIMEOUT))
}

/// Applies [`RECV_TIMEOUT`] to the socket's receive path.
pub fn set_rcv_timeout(fd: RawFd) -> io::Result<()> {
    sys_setsockopt(fd, SOL_SOCKET, SO_RCVTIMEO, &timeval_of(RECV_TIMEOUT))
}

/// Disables Nagle's algorithm.
///
/// Cluster frames are small and latency-sensitive.
pub fn set_nodelay(fd: RawFd) -> io::Result<()> {
    let yes: c_int = 1;
    sys_setsockopt(fd, IPPROTO_TCP, TCP_NODELAY, &yes)
}

/// Enables aggressive TCP keepalive.
///
/// With idle [`KEEPALIVE_IDLE`], interval [`KEEPALIVE_INTERVAL`] and
/// [`KEEPALIVE_PROBES`] probes, a failed peer is detected within
/// single-digit seconds.
pub fn set_keepalive(fd: RawFd) -> io::Result<()> {
    let yes: c_int = 1;
    if let Err(err) = sys_setsockopt(fd, SOL_SOCKET, SO_KEEPALIVE, &yes) {
        debug!("failed to enable keepalive: {err}");
        return Err(err);
    }

    for (name, value) in [
        (TCP_KEEPIDLE, KEEPALIVE_IDLE),
        (TCP_KEEPINTVL, KEEPALIVE_INTERVAL),
        (TCP_KEEPCNT, KEEPALIVE_PROBES),
    ] {
        if let Err(err) = sys_setsockopt(fd, IPPROTO_TCP, name, &value) {
            debug!("failed to tune keepalive: {err}");
            return Err(err);
        }
    }

    Ok(())
}

fn timeval_of(duration: Duration) -> timeval {
    timeval {
        tv_sec: duration.as_secs() as _,
        tv_usec: duration.subsec_micros() as _,
    }
}
