//! Inbound viewer commands.
//!
//! Viewers send a JSON object such as
//! `{"action": "start", "numBodies": 10, "gravity": 1.0}`. `numBodies`
//! defaults to 5 when absent on `start` and is required on `update`;
//! `gravity` is required on both. A field that is present but `null` is
//! accepted and left to the engine's coercion (it becomes 0).
//!
//! `numBodies` may be any JSON number: `10.0` and `1e3` are counts too.
//! Fractions truncate toward zero and values beyond `i64` saturate, so the
//! engine's clamp still sees them.

use serde::{Deserialize, Deserializer};

use crate::error::ProtocolError;

pub const DEFAULT_START_BODIES: i64 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start {
        num_bodies: Option<i64>,
        gravity: Option<f64>,
    },
    Update {
        num_bodies: Option<i64>,
        gravity: Option<f64>,
    },
    Stop,
}

/// Wire shape. The outer `Option` is "field present", the inner one is "not null".
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommand {
    #[serde(default)]
    action: String,
    #[serde(default, deserialize_with = "present")]
    num_bodies: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    gravity: Option<Option<f64>>,
}

fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

/// Float to count: truncating, saturating at the `i64` bounds
fn to_count(n: f64) -> i64 {
    n.trunc() as i64
}

impl Command {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        let raw: RawCommand =
            serde_json::from_str(text).map_err(|_| ProtocolError::InvalidFormat)?;
        let num_bodies = raw.num_bodies.map(|n| n.map(to_count));

        match raw.action.as_str() {
            "start" => Ok(Command::Start {
                num_bodies: num_bodies.unwrap_or(Some(DEFAULT_START_BODIES)),
                gravity: raw.gravity.ok_or(ProtocolError::InvalidFormat)?,
            }),
            "update" => Ok(Command::Update {
                num_bodies: num_bodies.ok_or(ProtocolError::InvalidFormat)?,
                gravity: raw.gravity.ok_or(ProtocolError::InvalidFormat)?,
            }),
            "stop" => Ok(Command::Stop),
            other => Err(ProtocolError::UnknownAction(other.to_string())),
        }
    }
}
