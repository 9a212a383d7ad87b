//! Incremental STOMP 1.2 wire handling: a push parser, pure frame
//! formatters, and a thin Tokio client tying them to a TCP stream.
//!
//! The parser is fed chunks exactly as they come off the transport; it
//! copes with frames split at any byte, several frames in one chunk, LF
//! heartbeats between frames, and binary bodies that carry NUL bytes via
//! `content-length`.
//!
//! ```
//! use stomp_wire::{Parser, format};
//!
//! let wire = format::send("/queue/greetings", b"hello", &[("priority", "5")]);
//!
//! let mut parser = Parser::new();
//! parser.receive(&wire).expect("valid frame");
//! assert!(parser.can_read());
//!
//! let frame = parser.next().unwrap();
//! assert_eq!(frame.command, "SEND");
//! assert_eq!(frame.get_header("destination"), Some("/queue/greetings"));
//! assert_eq!(frame.get_header("content-length"), Some("5"));
//! assert_eq!(frame.body.as_deref(), Some(&b"hello"[..]));
//! ```

pub mod client;
pub mod format;
pub mod frame;
pub mod parser;

pub use client::{Client, ClientError, ClientReader, ClientWriter, parse_url};
pub use format::{SubscriptionIds, UnsupportedVerb, Verb};
pub use frame::Frame;
pub use parser::{Parser, ProtocolError};
