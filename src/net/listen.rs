use crate::net::options::set_nonblocking;
use crate::sys::{
    sys_bind, sys_bind_unix, sys_close, sys_listen, sys_set_reuseaddr, sys_set_v6only, sys_socket,
};

use libc::{AF_INET, AF_INET6, AF_UNIX};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use std::os::fd::RawFd;

use tracing::error;

/// Creates listening sockets for every usable bind candidate.
///
/// With `bindaddr` set, the name is resolved and each resulting
/// address becomes a candidate; with `None`, the unspecified address
/// of each family is tried, IPv6 listeners bound v6-only so both
/// wildcards can coexist. Every candidate goes through socket,
/// address-reuse, bind, listen and the switch to non-blocking, then is
/// handed to `register`, which takes ownership of the descriptor.
///
/// A candidate failing any step is closed and skipped. The call
/// succeeds as long as at least one listener was registered.
///
/// # Errors
///
/// Fails when resolution fails or when no candidate could be bound.
pub fn create_listeners<F>(bindaddr: Option<&str>, port: u16, mut register: F) -> io::Result<()>
where
    F: FnMut(RawFd) -> io::Result<()>,
{
    let candidates = resolve_bind_candidates(bindaddr, port)?;

    let mut success = 0;

    for addr in candidates {
        let domain = if addr.is_ipv4() { AF_INET } else { AF_INET6 };
        let fd = match sys_socket(domain) {
            Ok(fd) => fd,
            Err(_) => continue,
        };

        if let Err(err) = sys_set_reuseaddr(fd) {
            error!("failed to set SO_REUSEADDR: {err}");
        }

        if addr.is_ipv6() && sys_set_v6only(fd, true).is_err() {
            sys_close(fd);
            continue;
        }

        if let Err(err) = sys_bind(fd, &addr) {
            error!("failed to bind server socket: {err}");
            sys_close(fd);
            continue;
        }

        if let Err(err) = sys_listen(fd) {
            error!("failed to listen on server socket: {err}");
            sys_close(fd);
            continue;
        }

        // set_nonblocking closes the descriptor itself on failure.
        if set_nonblocking(fd).is_err() {
            continue;
        }

        if register(fd).is_err() {
            sys_close(fd);
            continue;
        }

        success += 1;
    }

    if success == 0 {
        error!("failed to create a listening port");
        return Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no listening address could be bound",
        ));
    }

    Ok(())
}

fn resolve_bind_candidates(bindaddr: Option<&str>, port: u16) -> io::Result<Vec<SocketAddr>> {
    match bindaddr {
        Some(host) => match (host, port).to_socket_addrs() {
            Ok(addrs) => Ok(addrs.collect()),
            Err(err) => {
                error!("failed to get address info: {err}");
                Err(err)
            }
        },

        None => Ok(vec![
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
        ]),
    }
}

/// Creates a listening UNIX-domain socket at `path`.
///
/// The descriptor is bound, marked listening, switched to
/// non-blocking and handed to `register`, which takes ownership.
/// There is a single candidate, so any failure fails the call; a path
/// that does not fit the address structure is rejected before the
/// bind is attempted.
pub fn create_unix_listener<F>(path: &str, register: F) -> io::Result<()>
where
    F: FnOnce(RawFd) -> io::Result<()>,
{
    let fd = match sys_socket(AF_UNIX) {
        Ok(fd) => fd,
        Err(err) => {
            error!("failed to create socket: {err}");
            return Err(err);
        }
    };

    if let Err(err) = sys_bind_unix(fd, path) {
        error!("failed to bind socket: {err}");
        sys_close(fd);
        return Err(err);
    }

    if let Err(err) = sys_listen(fd) {
        error!("failed to listen on socket: {err}");
        sys_close(fd);
        return Err(err);
    }

    // set_nonblocking closes the descriptor itself on failure.
    set_nonblocking(fd)?;

    if let Err(err) = register(fd) {
        sys_close(fd);
        return Err(err);
    }

    Ok(())
}
