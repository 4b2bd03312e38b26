//! Session identifiers and record types.
//!
//! A session is keyed by a 6-character uppercase-alphanumeric code which
//! doubles as the stem of its on-disk filename (`<ID>.json`). The types here
//! are shared between the wire (HTTP bodies) and the disk format; both sides
//! reject unknown fields.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length of a session identifier.
pub const ID_LEN: usize = 6;

/// Alphabet a session identifier is drawn from.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A raw string failed session-id validation.
#[derive(Debug, Clone, Error)]
#[error("invalid session id {0:?}: expected exactly 6 uppercase alphanumeric characters")]
pub struct InvalidSessionId(pub String);

/// A validated 6-character session identifier.
///
/// Every construction path (parsing, deserialization) enforces the
/// `[A-Z0-9]{6}` shape, so holders of a `SessionId` can join it into a
/// filesystem path without re-checking it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Draw a fresh random identifier: 6 independent uniform samples from
    /// the 36-character alphabet.
    ///
    /// Uniqueness is not guaranteed and collisions are not retried; at the
    /// intended scale (tens of concurrent sessions out of 36^6 codes) the
    /// collision probability is negligible.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let code = (0..ID_LEN)
            .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
            .collect();
        SessionId(code)
    }

    /// The raw 6-character code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The on-disk filename for this session (`<ID>.json`).
    pub fn file_name(&self) -> String {
        format!("{}.json", self.0)
    }

    /// Parse a directory entry name back into an identifier.
    ///
    /// Returns `None` for anything that is not `<6-char-ID>.json`, which is
    /// how foreign files in the store directory get filtered out.
    pub fn from_file_name(name: &str) -> Option<SessionId> {
        name.strip_suffix(".json")?.parse().ok()
    }
}

impl TryFrom<String> for SessionId {
    type Error = InvalidSessionId;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let valid = raw.len() == ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if valid {
            Ok(SessionId(raw))
        } else {
            Err(InvalidSessionId(raw))
        }
    }
}

impl FromStr for SessionId {
    type Err = InvalidSessionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionId::try_from(s.to_string())
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> String {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A complete session record as stored on disk and served to clients.
///
/// The on-disk format is one JSON object with exactly these four keys;
/// a file with extra or missing keys fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionRecord {
    /// Server-assigned identifier, immutable once written.
    pub id: SessionId,
    /// IP address of the leader node.
    pub host: IpAddr,
    /// Port the leader node is reachable on.
    pub port: u16,
    /// The menu of election options. May be empty, never absent.
    pub options: Vec<String>,
}

impl SessionRecord {
    /// Merge a patch into this record.
    ///
    /// A present `host` and a non-zero `port` overwrite the stored values;
    /// everything else in the patch is ignored. There is deliberately no way
    /// to clear a field back to empty (zero/absent always means
    /// "unchanged").
    pub fn apply(&mut self, patch: &SessionPatch) {
        if let Some(host) = patch.host {
            self.host = host;
        }
        if patch.port != 0 {
            self.port = patch.port;
        }
    }
}

/// Client payload for creating a session.
///
/// All fields are optional at the decode level; completeness (host present,
/// port non-zero, options present) is checked by the store. A supplied `id`
/// must still be well-formed but is otherwise discarded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSession {
    /// Ignored; the store assigns its own identifier.
    #[serde(default)]
    pub id: Option<SessionId>,
    #[serde(default)]
    pub host: Option<IpAddr>,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

/// Client payload for a merge-update.
///
/// Only `host` and `port` can change; `id` and `options` are accepted in the
/// payload but never applied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionPatch {
    /// Ignored; the identifier in the request path wins.
    #[serde(default)]
    pub id: Option<SessionId>,
    #[serde(default)]
    pub host: Option<IpAddr>,
    #[serde(default)]
    pub port: u16,
    /// Ignored; options are fixed at creation time.
    #[serde(default)]
    pub options: Option<Vec<String>>,
}
