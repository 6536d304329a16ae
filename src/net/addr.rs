use libc::{
    AF_INET, AF_INET6, IFF_LOOPBACK, c_int, freeifaddrs, getifaddrs, ifaddrs, sockaddr_in,
    sockaddr_in6,
};
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::ptr;

use tracing::{debug, error};

/// Renders a binary node address as text.
///
/// Addresses travel through the cluster as 16 bytes: IPv6 uses all of
/// them, IPv4 sits right-justified in the last four with the first
/// twelve zero. The family is detected from that shape. A non-zero
/// `port` is appended as `:port`; IPv6 text carries no brackets.
pub fn addr_to_str(addr: &[u8; 16], port: u16) -> String {
    let v4 = addr[12] != 0 && addr[..12].iter().all(|&oct| oct == 0);

    let ip = if v4 {
        Ipv4Addr::new(addr[12], addr[13], addr[14], addr[15]).to_string()
    } else {
        Ipv6Addr::from(*addr).to_string()
    };

    if port != 0 {
        format!("{ip}:{port}")
    } else {
        ip
    }
}

/// Parses a textual address into the 16-byte binary form.
///
/// A colon anywhere selects IPv6, otherwise the text must be a dotted
/// quad. Returns `None` when the text parses as neither.
pub fn str_to_addr(text: &str) -> Option<[u8; 16]> {
    let mut addr = [0u8; 16];

    if text.contains(':') {
        addr = text.parse::<Ipv6Addr>().ok()?.octets();
    } else {
        let v4: Ipv4Addr = text.parse().ok()?;
        addr[12..].copy_from_slice(&v4.octets());
    }

    Some(addr)
}

/// Checks that `text` is a well-formed IPv4 or IPv6 address.
pub fn is_valid_addr(text: &str) -> bool {
    let valid = if text.contains(':') {
        text.parse::<Ipv6Addr>().is_ok()
    } else {
        text.parse::<Ipv4Addr>().is_ok()
    };

    if !valid {
        error!("bad address '{text}'");
    }

    valid
}

/// Returns the first non-loopback interface address of this node, in
/// the 16-byte binary form.
pub fn local_addr() -> io::Result<[u8; 16]> {
    let mut ifaddr: *mut ifaddrs = ptr::null_mut();
    if unsafe { getifaddrs(&mut ifaddr) } == -1 {
        let err = io::Error::last_os_error();
        error!("getifaddrs failed: {err}");
        return Err(err);
    }

    let mut bytes = [0u8; 16];
    let mut found = false;

    let mut ifa = ifaddr;
    while !ifa.is_null() {
        let entry = unsafe { &*ifa };
        ifa = entry.ifa_next;

        if entry.ifa_flags & IFF_LOOPBACK as u32 != 0 {
            continue;
        }
        if entry.ifa_addr.is_null() {
            continue;
        }

        match unsafe { (*entry.ifa_addr).sa_family } as c_int {
            AF_INET => {
                let sin = entry.ifa_addr as *const sockaddr_in;
                let octets = unsafe { (*sin).sin_addr.s_addr }.to_ne_bytes();
                bytes[12..].copy_from_slice(&octets);
                bytes[12..].copy_from_slice(&octets);
                debug!("found IPv4 address");
                found = true;
            }
            AF_INET6 => {
                let sin6 = entry.ifa_addr as *const sockaddr_in6;
                bytes = unsafe { (*sin6).sin6_addr.s6_addr };
                debug!("found IPv6 address");
                found = true;
            }
            _ => continue,
        }

        break;
    }

    unsafe { freeifaddrs(ifaddr) };

    if found {
        Ok(bytes)
    } else {
        error!("no valid interface found");
        Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "no valid interface found",
        ))
    }
}
