//! Framing for Socket.IO packets carried over an Engine.IO (v3) websocket.
//!
//! Only the subset needed to subscribe to job status updates is handled: handshake,
//! heartbeats, the default namespace, and text events. In this protocol revision the server
//! joins the client to the default namespace on its own, and the client drives heartbeats.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::types::{Error, Result};

/// Namespace disconnect for the default namespace
pub (crate) const DISCONNECT_PACKET: &str = "41";
/// Client heartbeat
pub (crate) const PING_PACKET: &str = "2";

/// Session parameters announced by the engine open packet
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub (crate) struct Handshake {
    #[serde(default)]
    pub sid: String,
    /// Milliseconds between client pings
    #[serde(default = "default_ping_interval")]
    pub ping_interval: u64,
    /// Milliseconds the server may take to answer a ping
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout: u64,
}

fn default_ping_interval() -> u64 { 25000 }
fn default_ping_timeout() -> u64 { 5000 }

impl Handshake {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|_| Error::MalformedPacket(text.to_owned()))
    }

    pub fn ping_interval(&self) -> Duration {
        // a zero period would stall the heartbeat timer
        Duration::from_millis(self.ping_interval.max(1))
    }

    pub fn ping_timeout(&self) -> Duration {
        Duration::from_millis(self.ping_timeout)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::FromRepr)]
#[repr(u8)]
enum EnginePacket {
    Open = 0,
    Close = 1,
    Ping = 2,
    Pong = 3,
    Message = 4,
    Upgrade = 5,
    Noop = 6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::FromRepr)]
#[repr(u8)]
enum SocketPacket {
    Connect = 0,
    Disconnect = 1,
    Event = 2,
    Ack = 3,
    ConnectError = 4,
    BinaryEvent = 5,
    BinaryAck = 6,
}

/// A decoded text frame
#[derive(Debug, Clone, PartialEq)]
pub (crate) enum Frame {
    /// Engine handshake, carries the session parameters
    Open(String),
    Close,
    Ping(String),
    Pong(String),
    Noop,
    /// Namespace connection accepted
    Connect(String),
    Disconnect,
    /// Namespace connection refused
    ConnectError(String),
    Event { name: String, args: Vec<Value> },
    /// Packets we never ask for (acks, binary attachments, transport upgrades)
    Unsupported,
}

fn packet_kind(text: &str) -> Option<(u8, &str)> {
    let mut chars = text.chars();
    let digit = chars.next()?.to_digit(10)?;
    Some((digit as u8, chars.as_str()))
}

/// Decode one websocket text message
pub (crate) fn decode_frame(text: &str) -> Result<Frame> {
    let malformed = || Error::MalformedPacket(text.to_owned());
    let (kind, rest) = packet_kind(text).ok_or_else(malformed)?;

    Ok(match EnginePacket::from_repr(kind).ok_or_else(malformed)? {
        EnginePacket::Open => Frame::Open(rest.to_owned()),
        EnginePacket::Close => Frame::Close,
        EnginePacket::Ping => Frame::Ping(rest.to_owned()),
        EnginePacket::Pong => Frame::Pong(rest.to_owned()),
        EnginePacket::Noop => Frame::Noop,
        EnginePacket::Upgrade => Frame::Unsupported,
        EnginePacket::Message => return decode_socket_packet(rest).ok_or_else(malformed),
    })
}

fn decode_socket_packet(text: &str) -> Option<Frame> {
    let (kind, rest) = packet_kind(text)?;
    let kind = SocketPacket::from_repr(kind)?;

    // only the default namespace is used, skip any explicit one
    let rest = if rest.starts_with('/') {
        match rest.split_once(',') {
            Some((_, rest)) => rest,
            None => "",
        }
    } else {
        rest
    };

    Some(match kind {
        SocketPacket::Connect => Frame::Connect(rest.to_owned()),
        SocketPacket::Disconnect => Frame::Disconnect,
        SocketPacket::ConnectError => Frame::ConnectError(rest.to_owned()),
        SocketPacket::Event => {
            let payload = rest.trim_start_matches(|c: char| c.is_ascii_digit());
            let mut values: Vec<Value> = serde_json::from_str(payload).ok()?;
            if values.is_empty() {
                return None
            }
            let name = match values.remove(0) {
                Value::String(name) => name,
                _ => return None,
            };
            Frame::Event { name, args: values }
        },
        SocketPacket::Ack | SocketPacket::BinaryEvent | SocketPacket::BinaryAck => Frame::Unsupported,
    })
}

/// Encode an event on the default namespace
pub (crate) fn encode_event(name: &str, payload: Value) -> String {
    format!("4{}{}", SocketPacket::Event as u8, json!([name, payload]))
}

/// Answer to a heartbeat, echoing its data
pub (crate) fn encode_pong(data: &str) -> String {
    format!("{}{data}", EnginePacket::Pong as u8)
}

/// Text handed to status callbacks for an event's arguments.
/// String payloads are passed through untouched, anything else as compact json.
pub (crate) fn event_text(args: &[Value]) -> Option<String> {
    match args.first()? {
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
