//! Pure frame formatters.
//!
//! Everything here is a stateless function from arguments to wire bytes;
//! nothing touches a socket or remembers a frame. The per-verb helpers
//! inject the headers the protocol mandates for that verb, so callers only
//! supply what is specific to their message.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Version offer sent in every CONNECT frame.
const ACCEPT_VERSIONS: &str = "1.0,1.1,1.2";

/// Render one frame to wire bytes.
///
/// Layout: command line, header lines, blank separator line, body bytes,
/// NUL terminator. An empty `body` means the frame has none, matching the
/// parse side where a zero-length body comes back as absent. Header keys
/// are translated to wire form (`_` becomes `-`) so callers can use
/// identifier-style names like `accept_version`.
///
/// A non-empty body always gets a `content-length` header with the exact
/// byte count, emitted ahead of the caller headers; a caller-supplied
/// `content-length` is never trusted and never emitted.
pub fn format_frame(command: &str, body: &[u8], headers: &[(&str, &str)]) -> Bytes {
    let mut dst = BytesMut::with_capacity(64 + body.len());

    dst.extend_from_slice(command.as_bytes());
    dst.put_u8(b'\n');

    if !body.is_empty() {
        dst.extend_from_slice(b"content-length:");
        dst.extend_from_slice(body.len().to_string().as_bytes());
        dst.put_u8(b'\n');
    }

    for &(key, value) in headers {
        let key = wire_key(key);
        if key == "content-length" {
            continue;
        }
        dst.extend_from_slice(key.as_bytes());
        dst.put_u8(b':');
        dst.extend_from_slice(value.as_bytes());
        dst.put_u8(b'\n');
    }

    dst.put_u8(b'\n');
    dst.extend_from_slice(body);
    dst.put_u8(0);
    dst.freeze()
}

/// CONNECT with the version offer and the virtual host.
pub fn connect(host: &str, headers: &[(&str, &str)]) -> Bytes {
    let mut merged = vec![("accept-version", ACCEPT_VERSIONS), ("host", host)];
    push_extras(&mut merged, headers, &["accept-version", "host"]);
    format_frame("CONNECT", b"", &merged)
}

/// SEND to a destination. Pass an empty `body` for a body-less frame.
pub fn send(destination: &str, body: &[u8], headers: &[(&str, &str)]) -> Bytes {
    let mut merged = vec![("destination", destination)];
    push_extras(&mut merged, headers, &["destination"]);
    format_frame("SEND", body, &merged)
}

/// SUBSCRIBE to a destination.
///
/// The subscription `id` is set-if-absent: a caller-supplied `id` header is
/// kept, otherwise the next id is drawn from `ids`.
pub fn subscribe(destination: &str, headers: &[(&str, &str)], ids: &SubscriptionIds) -> Bytes {
    let generated;
    let mut merged = vec![("destination", destination)];
    if !headers.iter().any(|(k, _)| wire_key(k) == "id") {
        generated = ids.next_id();
        merged.push(("id", generated.as_str()));
    }
    push_extras(&mut merged, headers, &["destination"]);
    format_frame("SUBSCRIBE", b"", &merged)
}

/// UNSUBSCRIBE a subscription by destination and id.
pub fn unsubscribe(destination: &str, id: &str, headers: &[(&str, &str)]) -> Bytes {
    let mut merged = vec![("destination", destination), ("id", id)];
    push_extras(&mut merged, headers, &["destination", "id"]);
    format_frame("UNSUBSCRIBE", b"", &merged)
}

/// ACK a message by ack id.
pub fn ack(id: &str, headers: &[(&str, &str)]) -> Bytes {
    let mut merged = vec![("id", id)];
    push_extras(&mut merged, headers, &["id"]);
    format_frame("ACK", b"", &merged)
}

/// NACK a message by ack id.
pub fn nack(id: &str, headers: &[(&str, &str)]) -> Bytes {
    let mut merged = vec![("id", id)];
    push_extras(&mut merged, headers, &["id"]);
    format_frame("NACK", b"", &merged)
}

/// BEGIN a transaction.
pub fn begin(transaction: &str, headers: &[(&str, &str)]) -> Bytes {
    transaction_frame("BEGIN", transaction, headers)
}

/// COMMIT a transaction.
pub fn commit(transaction: &str, headers: &[(&str, &str)]) -> Bytes {
    transaction_frame("COMMIT", transaction, headers)
}

/// ABORT a transaction.
pub fn abort(transaction: &str, headers: &[(&str, &str)]) -> Bytes {
    transaction_frame("ABORT", transaction, headers)
}

/// DISCONNECT with a receipt id so the broker can confirm the goodbye.
pub fn disconnect(receipt: &str, headers: &[(&str, &str)]) -> Bytes {
    let mut merged = vec![("receipt", receipt)];
    push_extras(&mut merged, headers, &["receipt"]);
    format_frame("DISCONNECT", b"", &merged)
}

fn transaction_frame(command: &str, transaction: &str, headers: &[(&str, &str)]) -> Bytes {
    let mut merged = vec![("transaction", transaction)];
    push_extras(&mut merged, headers, &["transaction"]);
    format_frame(command, b"", &merged)
}

/// Translate an identifier-style key to wire form.
fn wire_key(key: &str) -> String {
    key.replace('_', "-")
}

/// Append caller pairs, dropping any whose wire key collides with a
/// helper-mandated one.
fn push_extras<'a>(
    merged: &mut Vec<(&'a str, &'a str)>,
    extra: &[(&'a str, &'a str)],
    reserved: &[&str],
) {
    for &(key, value) in extra {
        let wire = wire_key(key);
        if reserved.iter().any(|r| wire == *r) {
            continue;
        }
        merged.push((key, value));
    }
}

/// Counter-backed source of SUBSCRIBE `id` values.
///
/// Ids only need to be unique within one connection, so an atomic counter
/// starting at 1 does the job and keeps tests deterministic.
#[derive(Debug)]
pub struct SubscriptionIds(AtomicU64);

impl SubscriptionIds {
    pub fn new() -> Self {
        Self(AtomicU64::new(1))
    }

    /// Next unused id, ready to use as a header value.
    pub fn next_id(&self) -> String {
        self.0.fetch_add(1, Ordering::SeqCst).to_string()
    }
}

impl Default for SubscriptionIds {
    fn default() -> Self {
        Self::new()
    }
}

/// The ten client-originated commands, each backed by a formatter above.
///
/// Server frames (CONNECTED, MESSAGE, RECEIPT, ERROR) arrive through the
/// parser and have no formatter here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Connect,
    Send,
    Subscribe,
    Unsubscribe,
    Ack,
    Nack,
    Begin,
    Commit,
    Abort,
    Disconnect,
}

/// A verb name with no formatter behind it.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported verb: {0}")]
pub struct UnsupportedVerb(pub String);

impl Verb {
    pub const ALL: [Verb; 10] = [
        Verb::Connect,
        Verb::Send,
        Verb::Subscribe,
        Verb::Unsubscribe,
        Verb::Ack,
        Verb::Nack,
        Verb::Begin,
        Verb::Commit,
        Verb::Abort,
        Verb::Disconnect,
    ];

    /// Canonical wire command for this verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Connect => "CONNECT",
            Verb::Send => "SEND",
            Verb::Subscribe => "SUBSCRIBE",
            Verb::Unsubscribe => "UNSUBSCRIBE",
            Verb::Ack => "ACK",
            Verb::Nack => "NACK",
            Verb::Begin => "BEGIN",
            Verb::Commit => "COMMIT",
            Verb::Abort => "ABORT",
            Verb::Disconnect => "DISCONNECT",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = UnsupportedVerb;

    /// Resolve a verb name, ASCII case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CONNECT" => Ok(Verb::Connect),
            "SEND" => Ok(Verb::Send),
            "SUBSCRIBE" => Ok(Verb::Subscribe),
            "UNSUBSCRIBE" => Ok(Verb::Unsubscribe),
            "ACK" => Ok(Verb::Ack),
            "NACK" => Ok(Verb::Nack),
            "BEGIN" => Ok(Verb::Begin),
            "COMMIT" => Ok(Verb::Commit),
            "ABORT" => Ok(Verb::Abort),
            "DISCONNECT" => Ok(Verb::Disconnect),
            _ => Err(UnsupportedVerb(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_key_translates_underscores() {
        assert_eq!(wire_key("accept_version"), "accept-version");
        assert_eq!(wire_key("plain"), "plain");
        assert_eq!(wire_key("a_b_c"), "a-b-c");
    }

    #[test]
    fn push_extras_drops_reserved_keys() {
        let mut merged = vec![("destination", "/queue/a")];
        push_extras(
            &mut merged,
            &[("destination", "/queue/b"), ("priority", "9")],
            &["destination"],
        );
        assert_eq!(merged, vec![("destination", "/queue/a"), ("priority", "9")]);
    }

    #[test]
    fn push_extras_compares_translated_keys() {
        let mut merged = vec![("accept-version", "1.0,1.1,1.2")];
        push_extras(&mut merged, &[("accept_version", "9.9")], &["accept-version"]);
        assert_eq!(merged, vec![("accept-version", "1.0,1.1,1.2")]);
    }
}
