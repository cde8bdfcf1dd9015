//! # NMEA Protocol Module
//!
//! Implementation of the subset of NMEA-0183 a QuickGPS receiver needs.
//!
//! This module handles:
//! - XOR checksum validation and generation
//! - Field decoding (coordinates, hemispheres, time, date, altitude)
//! - GLL, GGA and RMC sentence decoding into a [`protocol::Fix`]
//! - u-blox `$PUBX` configuration command encoding

pub mod protocol;
pub mod encoder;
pub mod decoder;
pub mod checksum;
pub mod fields;
