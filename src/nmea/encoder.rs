//! # PUBX Command Encoder
//!
//! Builds u-blox proprietary `$PUBX` configuration commands.
//!
//! - `$PUBX,40,...` sets the output rate of one NMEA message on every port
//! - `$PUBX,41,...` sets the protocols and baud rate of a port

use super::checksum::append_checksum;
use super::protocol::SentenceType;
use crate::error::Result;

/// `$PUBX` message id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandId {
    /// Set NMEA message output rate
    Rate = 40,
    /// Set protocols and baud rate of a port
    Config = 41,
}

/// Protocol mask bits for the in/out protocol fields of `$PUBX,41`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ProtocolMask {
    Ubx = 1,
    Nmea = 2,
}

/// Receiver port id of UART1
pub const UBX_PORT_UART1: u8 = 1;

/// Protocol the receiver should accept on UART1
pub const CONFIG_IN_PROTOCOL: ProtocolMask = ProtocolMask::Nmea;

/// Protocol the receiver should emit on UART1
pub const CONFIG_OUT_PROTOCOL: ProtocolMask = ProtocolMask::Nmea;

/// Messages enabled after configuration
pub const ENABLED_MESSAGES: &[SentenceType] = &[SentenceType::Rmc];

/// Verbose messages the decoder never consumes
pub const DISABLED_MESSAGES: &[&str] = &["VTG", "GSV", "GSA"];

/// Build a `$PUBX,40` rate command for one message
///
/// The rate (0 = off, 1 = every epoch) is applied to all five receiver
/// ports: DDC, UART1, UART2, USB, SPI.
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::encoder::encode_message_rate;
///
/// let cmd = encode_message_rate("RMC", true).unwrap();
/// assert_eq!(cmd, b"$PUBX,40,RMC,1,1,1,1,1,0*46\r\n");
/// ```
pub fn encode_message_rate(message: &str, enable: bool) -> Result<Vec<u8>> {
    let rate = u8::from(enable);
    append_checksum(&format!(
        "$PUBX,{},{},{},{},{},{},{},0",
        CommandId::Rate as u8,
        message,
        rate,
        rate,
        rate,
        rate,
        rate
    ))
}

/// Build a `$PUBX,41` port configuration command for UART1
///
/// Protocol masks are rendered as four-digit fields; autobauding is off.
///
/// # Examples
///
/// ```
/// use quick_gps::nmea::encoder::{encode_port_config, ProtocolMask};
///
/// let cmd = encode_port_config(ProtocolMask::Nmea, ProtocolMask::Nmea, 9600).unwrap();
/// assert_eq!(cmd, b"$PUBX,41,1,0002,0002,9600,0*14\r\n");
/// ```
pub fn encode_port_config(
    in_protocol: ProtocolMask,
    out_protocol: ProtocolMask,
    baud_rate: u32,
) -> Result<Vec<u8>> {
    append_checksum(&format!(
        "$PUBX,{},{},{:04},{:04},{},0",
        CommandId::Config as u8,
        UBX_PORT_UART1,
        in_protocol as u16,
        out_protocol as u16,
        baud_rate
    ))
}

/// Build the full startup configuration sequence
///
/// One port configuration command followed by one rate command per
/// enabled and disabled message. The same sequence is re-sent when the
/// receiver stops reporting a lock.
pub fn configuration_sequence(baud_rate: u32) -> Result<Vec<Vec<u8>>> {
    let mut commands = Vec::with_capacity(1 + ENABLED_MESSAGES.len() + DISABLED_MESSAGES.len());

    commands.push(encode_port_config(
        CONFIG_IN_PROTOCOL,
        CONFIG_OUT_PROTOCOL,
        baud_rate,
    )?);

    for message in ENABLED_MESSAGES {
        commands.push(encode_message_rate(message.formatter(), true)?);
    }

    for message in DISABLED_MESSAGES {
        commands.push(encode_message_rate(message, false)?);
    }

    Ok(commands)
}
