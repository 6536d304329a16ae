//! Socket lifecycle and address plumbing.
//!
//! This module produces configured raw descriptors and converts node
//! addresses:
//! - listening sockets over every usable address family, plus
//!   UNIX-domain listeners for local management,
//! - outbound blocking connections with failure-detection options
//!   applied,
//! - per-socket options (timeouts, keepalive, no-delay, non-blocking),
//! - the cluster's 16-byte binary address form and its text
//!   round-trip.
//!
//! Descriptors leave this module raw; the event engine in
//! [`crate::conn`] and the frame routines in [`crate::frame`] take
//! over from there.

mod addr;
mod connect;
mod listen;

pub mod options;

pub use addr::{addr_to_str, is_valid_addr, local_addr, str_to_addr};
pub use connect::connect_to;
pub use listen::{create_listeners, create_unix_listener};
