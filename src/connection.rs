use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::{SinkExt, StreamExt};
use socket2::SockRef;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
#[cfg(unix)]
use tokio::net::UnixStream;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, field, info, instrument, trace, warn, Span};
use uuid::Uuid;

use crate::codec::FrameCodec;
use crate::commands::{Auth, Command};
use crate::config::{Authentication, Config, Endpoint};
use crate::frame::Frame;
use crate::{Error, Result};

type FramedTransport = Framed<Transport, FrameCodec>;

/// The byte stream a connection talks over.
#[derive(Debug)]
pub enum Transport {
    Tcp(TcpStream),
    #[cfg(unix)]
    Unix(UnixStream),
}

impl Transport {
    fn is_active(&self) -> bool {
        match self {
            // Fails with `NotConnected` once the socket has been shut down.
            Transport::Tcp(stream) => stream.peer_addr().is_ok(),
            #[cfg(unix)]
            Transport::Unix(stream) => stream.peer_addr().is_ok(),
        }
    }
}

impl AsyncRead for Transport {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_read(cx, buf),
            #[cfg(unix)]
            Transport::Unix(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Transport {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_write(cx, buf),
            #[cfg(unix)]
            Transport::Unix(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_flush(cx),
            #[cfg(unix)]
            Transport::Unix(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Transport::Tcp(stream) => Pin::new(stream).poll_shutdown(cx),
            #[cfg(unix)]
            Transport::Unix(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}

/// A single session with the server. Created unconnected, it opens the transport on the first
/// command and drops it whenever an exchange fails at the transport or framing level. The next
/// command then reconnects from scratch.
///
/// A connection is not synchronized on its own, [`crate::Client`] serializes access to it.
pub struct Connection {
    config: Config,
    // Present exactly while connected.
    framed: Option<FramedTransport>,
    pub id: Uuid,
}

impl Connection {
    pub fn new(config: Config) -> Connection {
        Connection {
            config,
            framed: None,
            id: Uuid::new_v4(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.framed
            .as_ref()
            .is_some_and(|framed| framed.get_ref().is_active())
    }

    /// Opens the transport and runs auto-auth if configured. Does nothing when already
    /// connected.
    #[instrument(
        name = "connect",
        skip(self),
        fields(connection_id, endpoint = %self.config.endpoint)
    )]
    pub async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Ok(());
        }
        // A transport that went away on its own is discarded before reconnecting.
        self.close();

        let endpoint = &self.config.endpoint;
        let connect_timeout = self.config.connect_timeout;

        // Dropping the timed out future disposes of a half-open socket.
        let transport = match timeout(connect_timeout, open_transport(&self.config)).await {
            Ok(Ok(transport)) => transport,
            Ok(Err(source)) => {
                debug!("connect failed: {}", source);
                return Err(Error::Connect {
                    endpoint: endpoint.clone(),
                    source,
                });
            }
            Err(_) => {
                debug!("connect timed out after {:?}", connect_timeout);
                return Err(Error::ConnectTimeout {
                    endpoint: endpoint.clone(),
                    timeout: connect_timeout,
                });
            }
        };

        self.id = Uuid::new_v4();
        Span::current().record("connection_id", field::display(self.id));

        self.framed = Some(Framed::new(
            transport,
            FrameCodec::new(self.config.max_frame_size),
        ));
        info!("connected");

        if let Authentication::AutoAuth { username, password } = &self.config.authentication {
            let auth = Auth {
                username: username.clone(),
                password: password.clone(),
            };

            if let Err(err) = self.run(auth).await {
                warn!("authentication failed: {}", err);
                self.close();
                return Err(err);
            }
            debug!("authenticated");
        }

        Ok(())
    }

    /// Drops the transport. Closing an unconnected connection is a no-op.
    pub fn close(&mut self) {
        if self.framed.take().is_some() {
            debug!(connection_id = %self.id, "connection closed");
        }
    }

    /// Like [`Connection::close`] but flushes and shuts down the write half first.
    pub async fn shutdown(&mut self) {
        if let Some(mut framed) = self.framed.take() {
            if let Err(err) = SinkExt::<Frame>::close(&mut framed).await {
                debug!(connection_id = %self.id, "error while shutting down: {}", err);
            }
            debug!(connection_id = %self.id, "connection closed");
        }
    }

    /// Connects if needed, then runs a full exchange for `command`.
    #[instrument(
        name = "execute",
        skip_all,
        fields(command = command.name(), connection_id)
    )]
    pub async fn execute<C: Command>(&mut self, command: C) -> Result<C::Output> {
        self.connect().await?;
        Span::current().record("connection_id", field::display(self.id));

        self.run(command).await
    }

    /// Sends the request and interprets the reply. Error replies go to [`Command::on_error`],
    /// everything else to [`Command::from_frame`].
    async fn run<C: Command>(&mut self, command: C) -> Result<C::Output> {
        let reply = self.exchange(command.to_frame()).await?;
        trace!(reply = %reply, "received reply");

        match reply {
            Frame::Error(message) => command.on_error(message),
            Frame::BulkError(message) => {
                command.on_error(String::from_utf8_lossy(&message).into_owned())
            }
            reply => command.from_frame(reply),
        }
    }

    /// Writes one request and reads exactly one reply. Unless the exchange completes, the
    /// transport is closed before returning, whether the failure is an error, a read timeout or
    /// the future being dropped mid-flight.
    async fn exchange(&mut self, request: Frame) -> Result<Frame> {
        let read_timeout = self.config.read_timeout;

        let mut guard = CloseGuard::new(&mut self.framed);
        let framed = guard.framed()?;

        framed.send(request).await?;

        let read = async {
            loop {
                match framed.next().await {
                    Some(Ok(Frame::Push(data))) => {
                        debug!(len = data.len(), "skipping out-of-band push")
                    }
                    Some(reply) => return reply,
                    None => return Err(Error::ConnectionClosed),
                }
            }
        };

        let reply = match read_timeout {
            Some(duration) => timeout(duration, read)
                .await
                .map_err(|_| Error::ReadTimeout(duration))??,
            None => read.await?,
        };

        guard.disarm();
        Ok(reply)
    }
}

/// Closes the transport on drop unless disarmed.
struct CloseGuard<'a> {
    slot: &'a mut Option<FramedTransport>,
    armed: bool,
}

impl<'a> CloseGuard<'a> {
    fn new(slot: &'a mut Option<FramedTransport>) -> Self {
        Self { slot, armed: true }
    }

    fn framed(&mut self) -> Result<&mut FramedTransport> {
        self.slot.as_mut().ok_or(Error::ConnectionClosed)
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for CloseGuard<'_> {
    fn drop(&mut self) {
        if self.armed && self.slot.take().is_some() {
            warn!("exchange did not complete, closing connection");
        }
    }
}

async fn open_transport(config: &Config) -> io::Result<Transport> {
    match &config.endpoint {
        Endpoint::HostPort { host, port } => {
            let stream = TcpStream::connect((host.as_str(), *port)).await?;
            stream.set_nodelay(true)?;
            if config.keep_alive {
                SockRef::from(&stream).set_keepalive(true)?;
            }
            Ok(Transport::Tcp(stream))
        }
        #[cfg(unix)]
        Endpoint::UnixSocket(path) => Ok(Transport::Unix(UnixStream::connect(path).await?)),
        #[cfg(not(unix))]
        Endpoint::UnixSocket(_) => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "unix sockets are not supported on this platform",
        )),
    }
}
