use bytes::Bytes;
use std::fmt;

/// One complete STOMP frame as read off the wire.
///
/// `Frame` contains the command (e.g. "MESSAGE", "CONNECTED"), an ordered
/// list of headers (key/value pairs) and the optional body bytes. Headers
/// keep their arrival order; when the wire data carried a header name more
/// than once, only the first occurrence is present here (the STOMP "first
/// header entry wins" rule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// STOMP command (e.g. CONNECTED, MESSAGE, RECEIPT). Never empty.
    pub command: String,
    /// Ordered headers as (key, value) pairs, names unique.
    pub headers: Vec<(String, String)>,
    /// Body bytes, `None` when the frame carried no payload.
    pub body: Option<Bytes>,
}

impl Frame {
    /// Get the value of a header by name.
    ///
    /// Returns the first header value matching the given key (case-sensitive),
    /// or `None` if no such header exists.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Body interpreted as UTF-8: `None` when there is no body or it is not
    /// valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        self.body.as_deref().and_then(|b| std::str::from_utf8(b).ok())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Command: {}", self.command)?;
        for (k, v) in &self.headers {
            writeln!(f, "{}: {}", k, v)?;
        }
        match &self.body {
            Some(body) => writeln!(f, "Body ({} bytes)", body.len()),
            None => Ok(()),
        }
    }
}
