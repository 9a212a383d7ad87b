//! Thin TCP client.
//!
//! Deliberately minimal glue between a socket and the wire modules: reads
//! feed [`Parser::receive`], sends go through the [`format`] helpers. There
//! is no negotiation, no subscription registry and no reconnect logic;
//! callers that need those build them on top.

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use url::Url;

use crate::format::{self, SubscriptionIds};
use crate::frame::Frame;
use crate::parser::{Parser, ProtocolError};

/// Errors surfaced by the TCP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The broker wrote bytes the protocol cannot express.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    /// The broker closed the connection (zero-length read).
    #[error("disconnected")]
    Disconnected,
    /// A broker URL that is not of the form `tcp://host:port/`.
    #[error("invalid broker url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Split a `tcp://host:port/` URL into host and port.
pub fn parse_url(input: &str) -> Result<(String, u16), ClientError> {
    let bad = |reason: &str| ClientError::InvalidUrl {
        url: input.to_string(),
        reason: reason.to_string(),
    };
    let url = Url::parse(input).map_err(|e| bad(&e.to_string()))?;
    if url.scheme() != "tcp" {
        return Err(bad("scheme must be tcp"));
    }
    let host = url
        .host_str()
        .ok_or_else(|| bad("missing host"))?
        .to_string();
    let port = url.port().ok_or_else(|| bad("missing port"))?;
    Ok((host, port))
}

/// Receiving half: socket reads feeding the incremental parser.
#[derive(Debug)]
pub struct ClientReader {
    read: OwnedReadHalf,
    parser: Parser,
    chunk: BytesMut,
}

impl ClientReader {
    /// Next frame from the broker, reading from the socket as needed.
    ///
    /// A zero-length read maps to [`ClientError::Disconnected`]; protocol
    /// violations from the parser propagate and end the session.
    pub async fn next(&mut self) -> Result<Frame, ClientError> {
        loop {
            if let Some(frame) = self.parser.next() {
                return Ok(frame);
            }
            self.chunk.clear();
            let n = self.read.read_buf(&mut self.chunk).await?;
            if n == 0 {
                tracing::debug!("broker closed the connection");
                return Err(ClientError::Disconnected);
            }
            if let Err(err) = self.parser.receive(&self.chunk) {
                tracing::warn!("unparseable data from broker: {}", err);
                return Err(err.into());
            }
        }
    }
}

/// Sending half: formats frames and writes them to the socket.
#[derive(Debug)]
pub struct ClientWriter {
    write: OwnedWriteHalf,
    ids: SubscriptionIds,
}

impl ClientWriter {
    /// SEND a message to `destination`. An empty `body` sends a body-less
    /// frame.
    pub async fn send(
        &mut self,
        destination: &str,
        body: &[u8],
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.write_bytes(format::send(destination, body, headers))
            .await
    }

    /// SUBSCRIBE to `destination`. The subscription id is generated unless
    /// the caller supplies an `id` header.
    pub async fn subscribe(
        &mut self,
        destination: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.write_bytes(format::subscribe(destination, headers, &self.ids))
            .await
    }

    /// UNSUBSCRIBE a subscription by destination and id.
    pub async fn unsubscribe(
        &mut self,
        destination: &str,
        id: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.write_bytes(format::unsubscribe(destination, id, headers))
            .await
    }

    /// ACK a message by ack id.
    pub async fn ack(&mut self, id: &str, headers: &[(&str, &str)]) -> Result<(), ClientError> {
        self.write_bytes(format::ack(id, headers)).await
    }

    /// NACK a message by ack id.
    pub async fn nack(&mut self, id: &str, headers: &[(&str, &str)]) -> Result<(), ClientError> {
        self.write_bytes(format::nack(id, headers)).await
    }

    /// BEGIN a transaction.
    pub async fn begin(
        &mut self,
        transaction: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.write_bytes(format::begin(transaction, headers)).await
    }

    /// COMMIT a transaction.
    pub async fn commit(
        &mut self,
        transaction: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.write_bytes(format::commit(transaction, headers)).await
    }

    /// ABORT a transaction.
    pub async fn abort(
        &mut self,
        transaction: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.write_bytes(format::abort(transaction, headers)).await
    }

    /// DISCONNECT, asking for a receipt.
    pub async fn disconnect(
        &mut self,
        receipt: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.write_bytes(format::disconnect(receipt, headers)).await
    }

    async fn write_bytes(&mut self, bytes: Bytes) -> Result<(), ClientError> {
        self.write.write_all(&bytes).await?;
        Ok(())
    }
}

/// Minimal STOMP client over TCP.
///
/// [`connect`](Client::connect) opens the stream and emits the CONNECT
/// frame; after that the client is just the pair of halves. Use
/// [`into_split`](Client::into_split) when reading and writing need to run
/// concurrently.
#[derive(Debug)]
pub struct Client {
    reader: ClientReader,
    writer: ClientWriter,
}

impl Client {
    /// Open a TCP connection and send the CONNECT frame.
    ///
    /// Login and passcode headers are included only when given. The broker
    /// reply (CONNECTED or ERROR) is not awaited here; read it with
    /// [`next`](Client::next).
    pub async fn connect(
        host: &str,
        port: u16,
        login: Option<&str>,
        passcode: Option<&str>,
    ) -> Result<Self, ClientError> {
        let stream = TcpStream::connect((host, port)).await?;
        tracing::debug!("connected to {}:{}", host, port);
        let (read, write) = stream.into_split();
        let mut client = Self {
            reader: ClientReader {
                read,
                parser: Parser::new(),
                chunk: BytesMut::with_capacity(4096),
            },
            writer: ClientWriter {
                write,
                ids: SubscriptionIds::new(),
            },
        };

        let mut headers: Vec<(&str, &str)> = Vec::new();
        if let Some(login) = login {
            headers.push(("login", login));
        }
        if let Some(passcode) = passcode {
            headers.push(("passcode", passcode));
        }
        client
            .writer
            .write_bytes(format::connect(host, &headers))
            .await?;
        Ok(client)
    }

    /// Like [`connect`](Client::connect), with a `tcp://host:port/` URL.
    pub async fn connect_url(
        url: &str,
        login: Option<&str>,
        passcode: Option<&str>,
    ) -> Result<Self, ClientError> {
        let (host, port) = parse_url(url)?;
        Self::connect(&host, port, login, passcode).await
    }

    /// Next frame from the broker. See [`ClientReader::next`].
    pub async fn next(&mut self) -> Result<Frame, ClientError> {
        self.reader.next().await
    }

    /// Split into independently owned halves so receiving and sending can
    /// run concurrently (e.g. from separate tasks).
    pub fn into_split(self) -> (ClientReader, ClientWriter) {
        (self.reader, self.writer)
    }

    /// SEND a message to `destination`. See [`ClientWriter::send`].
    pub async fn send(
        &mut self,
        destination: &str,
        body: &[u8],
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.writer.send(destination, body, headers).await
    }

    /// SUBSCRIBE to `destination`. See [`ClientWriter::subscribe`].
    pub async fn subscribe(
        &mut self,
        destination: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.writer.subscribe(destination, headers).await
    }

    /// UNSUBSCRIBE a subscription by destination and id.
    pub async fn unsubscribe(
        &mut self,
        destination: &str,
        id: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.writer.unsubscribe(destination, id, headers).await
    }

    /// ACK a message by ack id.
    pub async fn ack(&mut self, id: &str, headers: &[(&str, &str)]) -> Result<(), ClientError> {
        self.writer.ack(id, headers).await
    }

    /// NACK a message by ack id.
    pub async fn nack(&mut self, id: &str, headers: &[(&str, &str)]) -> Result<(), ClientError> {
        self.writer.nack(id, headers).await
    }

    /// BEGIN a transaction.
    pub async fn begin(
        &mut self,
        transaction: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.writer.begin(transaction, headers).await
    }

    /// COMMIT a transaction.
    pub async fn commit(
        &mut self,
        transaction: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.writer.commit(transaction, headers).await
    }

    /// ABORT a transaction.
    pub async fn abort(
        &mut self,
        transaction: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.writer.abort(transaction, headers).await
    }

    /// DISCONNECT, asking for a receipt.
    pub async fn disconnect(
        &mut self,
        receipt: &str,
        headers: &[(&str, &str)],
    ) -> Result<(), ClientError> {
        self.writer.disconnect(receipt, headers).await
    }
}
