//! Net Module
//!
//! Length-prefixed raw socket transport for the cache protocol.
//!
//! # Protocol
//! Each message is a 4-byte big-endian length followed by UTF-8 text,
//! colon-delimited into `COMMAND:ARG1:ARG2`:
//! - `VERSION` → `OK`
//! - `PING` → `PONG`
//! - `CHECK:<key>` → `HIT:<value>` or `MISS`
//! - `SET:<key>:<value>` → `OK`
//! - `ENQUEUE:<key>:<value>` → `OK`
//! - `STATUS:<key>` → `DONE` | `QUEUED` | `NEW`
//! - anything else → `ERR_UNKNOWN`

pub mod frame;
pub mod server;

pub use frame::{read_frame, write_frame, MAX_FRAME_BYTES};
pub use server::{serve, spawn_socket_server};
