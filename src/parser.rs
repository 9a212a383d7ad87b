use bytes::{Buf, BytesMut};
use std::collections::VecDeque;
use thiserror::Error;

use crate::frame::Frame;

/// Wire-level faults that make the rest of the stream unusable.
///
/// Incomplete data is never an error; the parser just waits for more bytes.
/// After a `ProtocolError` the buffered bytes are in an unspecified state
/// and the parser should be discarded along with its connection.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A header line contained no `:` separator.
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    /// `content-length` was present but not an unsigned integer.
    #[error("invalid content-length {0:?}")]
    InvalidContentLength(String),
    /// The byte where a `content-length` body ends was not NUL.
    #[error("missing NUL terminator after content-length body")]
    MissingNulTerminator,
    /// Command or header text was not valid UTF-8.
    #[error("frame {context} is not valid utf8: {source}")]
    InvalidUtf8 {
        context: &'static str,
        source: std::str::Utf8Error,
    },
}

/// Incremental (push) parser for STOMP frames.
///
/// Feed raw chunks in with [`receive`](Parser::receive) exactly as they
/// arrive from the transport; complete frames accumulate in an internal
/// queue in wire order and are drained with [`can_read`](Parser::can_read)
/// and [`next`](Parser::next). The parser never reads a socket and never
/// blocks, so chunk boundaries are irrelevant: a frame may arrive byte by
/// byte or many frames may arrive in one chunk.
#[derive(Debug, Default)]
pub struct Parser {
    buffer: BytesMut,
    /// End offset of an announced `content-length` body whose terminator
    /// has not arrived yet.
    pending_body_end: Option<usize>,
    queue: VecDeque<Frame>,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `chunk` to the buffer and extract every frame it completes.
    ///
    /// Frames queued before an error remain readable; the buffer does not
    /// recover. A [`ProtocolError`] means the peer wrote something the
    /// protocol cannot express and the connection should be dropped.
    pub fn receive(&mut self, chunk: &[u8]) -> Result<(), ProtocolError> {
        self.buffer.extend_from_slice(chunk);
        while self.extract_one()? {}
        Ok(())
    }

    /// True when at least one complete frame is waiting.
    pub fn can_read(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Pop the oldest complete frame, or `None` when the queue is empty.
    pub fn next(&mut self) -> Option<Frame> {
        self.queue.pop_front()
    }

    /// Try to cut one complete frame off the front of the buffer.
    ///
    /// `Ok(true)` queued a frame and another attempt may succeed right
    /// away; `Ok(false)` means more bytes are needed first.
    fn extract_one(&mut self) -> Result<bool, ProtocolError> {
        // no frame can complete without a NUL somewhere in the buffer
        let nul = match self.buffer.iter().position(|&b| b == 0) {
            Some(i) => i,
            None => return Ok(false),
        };

        // an announced body end needs its terminator byte buffered too
        if let Some(end) = self.pending_body_end {
            if self.buffer.len() <= end {
                return Ok(false);
            }
        }

        let (command, headers, body_start) = match scan_frame(&self.buffer[..nul]) {
            Some(bounds) => {
                let command = utf8("command", bounds.command)?.to_owned();
                let headers = build_headers(&bounds.header_lines)?;
                (command, headers, bounds.body_start)
            }
            // headers not closed before the NUL: a stray NUL inside an
            // unfinished frame still just means "wait for more data"
            None => return Ok(false),
        };

        let body_end = match content_length(&headers)? {
            // absent or zero: the NUL we found is the terminator
            None | Some(0) => nul,
            Some(n) => {
                let expected = body_start.saturating_add(n);
                if expected == nul {
                    expected
                } else if self.buffer.len() > expected {
                    // the body carries NULs of its own; the announced end
                    // must still land on the terminator
                    if self.buffer[expected] != 0 {
                        return Err(ProtocolError::MissingNulTerminator);
                    }
                    expected
                } else {
                    self.pending_body_end = Some(expected);
                    return Ok(false);
                }
            }
        };

        // cut the frame, terminator included, off the buffer
        let mut taken = self.buffer.split_to(body_end + 1);
        taken.advance(body_start);
        taken.truncate(body_end - body_start);
        let body = if taken.is_empty() {
            None
        } else {
            Some(taken.freeze())
        };

        self.pending_body_end = None;
        self.queue.push_back(Frame {
            command,
            headers,
            body,
        });
        Ok(true)
    }
}

/// Frame boundaries located inside a buffer prefix.
struct FrameBounds<'a> {
    command: &'a [u8],
    header_lines: Vec<&'a [u8]>,
    /// Offset of the first body byte, just past the blank line.
    body_start: usize,
}

/// Locate the command line and header block in `region`, the buffered bytes
/// before a candidate terminating NUL.
///
/// Lines end with LF; a trailing CR is stripped. Any number of blank lines
/// before the command are heartbeats and are skipped. Returns `None` while
/// the region does not yet hold both a command line and the blank line that
/// closes the headers.
fn scan_frame(region: &[u8]) -> Option<FrameBounds<'_>> {
    let mut pos = 0usize;

    // skip blank heartbeat lines before the command
    let command = loop {
        let line_end = region[pos..].iter().position(|&b| b == b'\n')?;
        let line = strip_cr(&region[pos..pos + line_end]);
        pos += line_end + 1;
        if !line.is_empty() {
            break line;
        }
    };

    // header lines run until the blank separator line
    let mut header_lines = Vec::new();
    loop {
        let line_end = region[pos..].iter().position(|&b| b == b'\n')?;
        let line = strip_cr(&region[pos..pos + line_end]);
        pos += line_end + 1;
        if line.is_empty() {
            return Some(FrameBounds {
                command,
                header_lines,
                body_start: pos,
            });
        }
        header_lines.push(line);
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    if line.last() == Some(&b'\r') {
        &line[..line.len() - 1]
    } else {
        line
    }
}

/// Split raw header lines at their first colon, keeping the first value for
/// any repeated name.
fn build_headers(lines: &[&[u8]]) -> Result<Vec<(String, String)>, ProtocolError> {
    let mut headers: Vec<(String, String)> = Vec::with_capacity(lines.len());
    for line in lines {
        let colon = match line.iter().position(|&b| b == b':') {
            Some(i) => i,
            None => {
                return Err(ProtocolError::MalformedHeader(
                    String::from_utf8_lossy(line).into_owned(),
                ));
            }
        };
        let key = utf8("header name", &line[..colon])?;
        let value = utf8("header value", &line[colon + 1..])?;
        if !headers.iter().any(|(k, _)| k == key) {
            headers.push((key.to_owned(), value.to_owned()));
        }
    }
    Ok(headers)
}

/// Optional `content-length` value from a header list.
///
/// The name match is ASCII case-insensitive and the value is trimmed before
/// parsing. Present but unparsable is a protocol error.
fn content_length(headers: &[(String, String)]) -> Result<Option<usize>, ProtocolError> {
    for (k, v) in headers {
        if k.eq_ignore_ascii_case("content-length") {
            let trimmed = v.trim();
            return trimmed
                .parse::<usize>()
                .map(Some)
                .map_err(|_| ProtocolError::InvalidContentLength(trimmed.to_owned()));
        }
    }
    Ok(None)
}

fn utf8<'a>(context: &'static str, bytes: &'a [u8]) -> Result<&'a str, ProtocolError> {
    std::str::from_utf8(bytes).map_err(|source| ProtocolError::InvalidUtf8 { context, source })
}
