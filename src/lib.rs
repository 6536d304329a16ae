//! # Vinculum
//!
//! **Vinculum** is the cluster transport layer of the **Nebula** ecosystem:
//! the piece of a storage node that turns raw, possibly-fragmented byte
//! streams into reliable delivery of request/response frames.
//!
//! It does not interpret opcodes, buffer beyond what the caller hands it,
//! or run an event loop of its own. It provides the primitives an
//! event-driven dispatcher drives many connections with, and the blocking
//! calls control-plane threads use against peer nodes:
//!
//! - A **partial-transfer engine** that advances per-connection cursors one
//!   readiness event at a time, without ever blocking the loop
//! - **Scatter/gather frame writes** that put a header and payload on the
//!   wire as one logical send
//! - A **synchronous executor** for request/response exchanges, bounded by
//!   what the caller provisioned and the peer declared
//! - **Socket lifecycle setup** with the timeouts and keepalive tuning
//!   that make peer failure visible in seconds
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vinculum::frame::exec_frame;
//! use vinculum::net::connect_to;
//!
//! fn main() -> std::io::Result<()> {
//!     let fd = connect_to("peer.cluster.local", 7000)?;
//!
//!     let mut header = GetObjectHeader::new(4096);
//!     let mut data = vec![0; 4096];
//!
//!     // Sends the request, then fills `header` and `data` with the
//!     // peer's response.
//!     exec_frame(fd, &mut header, &mut data)?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`conn`] — Event-driven partial-transfer connections
//! - [`frame`] — Frame transmission and synchronous request execution
//! - [`net`] — Socket setup, options, and node addresses
//!
//! ## Getting Started
//!
//! Add Vinculum to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! vinculum = { git = "https://github.com/nebula-platform/vinculum", package = "vinculum" }
//! ```

mod sys;

pub mod conn;
pub mod frame;
pub mod net;

pub use conn::{Connection, Cursor, EventRegistry, Interest, IoState};
