//! The record returned by version 2 of the
//! [mcsrvstat.us](https://api.mcsrvstat.us/) API.
//!
//! Every field falls back to its zero value when the API omits it
//! or sends `null`, so list fields are always present (possibly empty).

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes `null` the same way as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Snapshot of a server's public state at query time.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status {
    /// Whether the server answered the API's ping or query.
    #[serde(deserialize_with = "null_as_default")]
    pub online: bool,

    /// The IP address the hostname resolved to.
    #[serde(deserialize_with = "null_as_default")]
    pub ip: String,

    #[serde(deserialize_with = "null_as_default")]
    pub port: u16,

    #[serde(deserialize_with = "null_as_default")]
    pub debug: DebugInfo,

    #[serde(deserialize_with = "null_as_default")]
    pub motd: Lines,

    #[serde(deserialize_with = "null_as_default")]
    pub players: Players,

    /// The server's advertised version, i.e. "1.20.1".
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,

    /// The server's ServerListPing protocol version.
    #[serde(deserialize_with = "null_as_default")]
    pub protocol: i64,

    #[serde(deserialize_with = "null_as_default")]
    pub hostname: String,

    /// Favicon as a `data:image/png;base64,...` URI.
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,

    #[serde(deserialize_with = "null_as_default")]
    pub software: String,

    #[serde(deserialize_with = "null_as_default")]
    pub map: String,

    #[serde(deserialize_with = "null_as_default")]
    pub plugins: Extensions,

    #[serde(deserialize_with = "null_as_default")]
    pub mods: Extensions,

    /// Text some servers show in place of the player list.
    #[serde(deserialize_with = "null_as_default")]
    pub info: Lines,
}

/// How the API reached the server.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub ping: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub query: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub srv: bool,

    #[serde(rename = "querymismatch", deserialize_with = "null_as_default")]
    pub query_mismatch: bool,

    #[serde(rename = "ipinsrv", deserialize_with = "null_as_default")]
    pub ip_in_srv: bool,

    #[serde(rename = "animatedmotd", deserialize_with = "null_as_default")]
    pub animated_motd: bool,

    #[serde(rename = "proxypipe", deserialize_with = "null_as_default")]
    pub proxy_pipe: bool,

    /// Unix timestamp of when the API cached this result.
    #[serde(rename = "cachetime", deserialize_with = "null_as_default")]
    pub cache_time: i64,
}

/// Text offered with formatting codes, stripped of them, and as HTML.
///
/// Used for both the MOTD and the info block.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lines {
    #[serde(deserialize_with = "null_as_default")]
    pub raw: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub clean: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub html: Vec<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Players {
    /// The number of players currently online.
    #[serde(deserialize_with = "null_as_default")]
    pub online: i64,

    /// The configured maximum number of players. Servers may
    /// advertise any value here, negative ones included.
    #[serde(deserialize_with = "null_as_default")]
    pub max: i64,

    /// Names of online players, in the order the server listed them.
    #[serde(deserialize_with = "null_as_default")]
    pub list: Vec<String>,
}

/// Plugin or mod listing.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Extensions {
    #[serde(deserialize_with = "null_as_default")]
    pub names: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub raw: Vec<String>,
}

impl std::str::FromStr for Status {
    type Err = serde_json::Error;
    fn from_str(json: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(json)
    }
}
