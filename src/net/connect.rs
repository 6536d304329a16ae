use crate::net::options::{set_nodelay, set_rcv_timeout, set_snd_timeout};
use crate::sys::{sys_close, sys_connect, sys_setsockopt, sys_socket};

use libc::{AF_INET, AF_INET6, SO_LINGER, SOL_SOCKET, linger};
use std::io;
use std::net::ToSocketAddrs;
use std::os::fd::RawFd;

use tracing::{debug, error};

/// Establishes a blocking control-plane connection to `name:port`.
///
/// Every resolved address is tried in resolver order. Each attempt
/// configures the socket before connecting: zero-timeout linger so a
/// later close tears the connection down at once, then the send and
/// receive timeouts, and Nagle-disable once connected. A failure to
/// create, configure linger on, or connect a candidate moves on to
/// the next address; a failing timeout or no-delay option abandons
/// the remaining candidates.
///
/// Returns the connected descriptor, owned by the caller.
///
/// # Errors
///
/// Fails when resolution fails or every candidate was exhausted.
pub fn connect_to(name: &str, port: u16) -> io::Result<RawFd> {
    let addrs = match (name, port).to_socket_addrs() {
        Ok(addrs) => addrs,
        Err(err) => {
            error!("failed to get address info: {err}");
            return Err(err);
        }
    };

    let linger_opt = linger {
        l_onoff: 1,
        l_linger: 0,
    };

    for addr in addrs {
        let domain = if addr.is_ipv4() { AF_INET } else { AF_INET6 };
        let fd = match sys_socket(domain) {
            Ok(fd) => fd,
            Err(_) => continue,
        };

        if let Err(err) = sys_setsockopt(fd, SOL_SOCKET, SO_LINGER, &linger_opt) {
            error!("failed to set SO_LINGER: {err}");
            sys_close(fd);
            continue;
        }

        if let Err(err) = set_snd_timeout(fd) {
            error!("failed to set send timeout: {err}");
            sys_close(fd);
            break;
        }

        if let Err(err) = set_rcv_timeout(fd) {
            error!("failed to set recv timeout: {err}");
            sys_close(fd);
            break;
        }

        if let Err(err) = sys_connect(fd, &addr) {
            error!("failed to connect to {name}:{port}: {err}");
            sys_close(fd);
            continue;
        }

        if let Err(err) = set_nodelay(fd) {
            error!("failed to disable nagle: {err}");
            sys_close(fd);
            break;
        }

        debug!("{fd}, {name}:{port}");
        return Ok(fd);
    }

    Err(io::Error::new(
        io::ErrorKind::NotConnected,
        format!("could not connect to {name}:{port}"),
    ))
}
