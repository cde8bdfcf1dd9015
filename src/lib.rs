//! # QuickGPS Library
//!
//! Streaming NMEA parser and configuration driver for u-blox style GPS
//! receivers on a serial link.
//!
//! Bytes are reassembled into lines, checksum-verified, and decoded from
//! GLL, GGA and RMC sentences into a single position/time/lock [`Fix`].
//! The receiver is configured with `$PUBX` commands on startup and again
//! whenever it goes too long without a lock.
//!
//! [`Fix`]: nmea::protocol::Fix

pub mod clock;
pub mod config;
pub mod error;
pub mod nmea;
pub mod receiver;
pub mod serial;
