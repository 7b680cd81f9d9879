//! Live job status notifications.
//!
//! A check's progress is pushed over a Socket.IO channel. Subscribing emits a single
//! `job-check` event for the job, after which every `job-status` event is handed to the
//! caller's callback until the job reaches a terminal state or the subscription is closed.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use log::{debug, info, warn};
use serde_json::json;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::connection::Connection;
use crate::models::status::JobStatus;
use crate::socketio::{decode_frame, encode_event, encode_pong, event_text, Frame, Handshake, DISCONNECT_PACKET, PING_PACKET};
use crate::types::{Error, Result};

/// Event asking the service to report on a job
pub const JOB_CHECK_EVENT: &str = "job-check";
/// Event carrying a job status update
pub const JOB_STATUS_EVENT: &str = "job-status";

/// Bound on connecting and joining the namespace when no timeout is configured
const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Job status API
pub struct Status {
    connection: Arc<Connection>,
}

impl Status {
    pub (crate) fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// Subscribe to the status updates of a job.
    ///
    /// The callback receives every raw status message in arrival order. The returned handle
    /// owns the channel: dropping it or calling [`Subscription::close`] ends the subscription,
    /// [`Subscription::detach`] leaves it running until the job finishes.
    pub async fn listen<F>(&self, job_id: u64, callback: F) -> Result<Subscription>
        where F: FnMut(&str) + Send + 'static
    {
        let url = self.connection.socket_url()?;
        let limit = self.connection.timeout().unwrap_or(DEFAULT_HANDSHAKE_TIMEOUT);
        let (mut socket, session) = match tokio::time::timeout(limit, open_channel(&url)).await {
            Ok(opened) => opened?,
            Err(_) => return Err(Error::SocketConnection(format!("no handshake from {url} within {limit:?}"))),
        };
        debug!("Status channel session {} (ping every {:?})", session.sid, session.ping_interval());

        let subscribe = encode_event(JOB_CHECK_EVENT, json!({"jobid": job_id}));
        socket.send(Message::text(subscribe)).await
            .map_err(|err| Error::JobSubscription(err.to_string()))?;
        info!("Subscribed to status of job {job_id}");

        let cancel = CancellationToken::new();
        let task = tokio::spawn(pump(socket, session, job_id, cancel.clone(), callback));

        Ok(Subscription { job_id, cancel, task: Some(task) })
    }
}

async fn open_channel(url: &Url) -> Result<(Socket, Handshake)> {
    debug!("Opening status channel {url}");
    let (mut socket, _) = tokio_tungstenite::connect_async(url.as_str()).await
        .map_err(|err| Error::SocketConnection(err.to_string()))?;
    let session = handshake(&mut socket).await?;
    Ok((socket, session))
}

/// Wait for the engine handshake and the server joining us to the default namespace
async fn handshake(socket: &mut Socket) -> Result<Handshake> {
    let mut session = None;
    while let Some(message) = socket.next().await {
        let message = message.map_err(|err| Error::SocketConnection(err.to_string()))?;
        let text = match message {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };

        match decode_frame(text.as_str()) {
            Ok(Frame::Open(params)) if session.is_none() => {
                session = Some(Handshake::parse(&params)?);
            },
            Ok(Frame::Ping(data)) => {
                socket.send(Message::text(encode_pong(&data))).await
                    .map_err(|err| Error::SocketConnection(err.to_string()))?;
            },
            Ok(Frame::Connect(_)) => match session.take() {
                Some(session) => return Ok(session),
                None => debug!("Namespace ack before engine handshake"),
            },
            Ok(Frame::ConnectError(reason)) => return Err(Error::SocketConnection(reason)),
            Ok(Frame::Close | Frame::Disconnect) => break,
            Ok(frame) => debug!("Ignoring packet during handshake: {frame:?}"),
            Err(err) => debug!("{err}"),
        }
    }
    Err(Error::SocketConnection("channel closed during handshake".to_owned()))
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Deliver status events until the job ends, the server leaves, or the caller cancels
async fn pump<F>(mut socket: Socket, session: Handshake, job_id: u64, cancel: CancellationToken, mut callback: F) -> Result<()>
    where F: FnMut(&str) + Send + 'static
{
    let period = session.ping_interval();
    let mut heartbeat = tokio::time::interval_at(Instant::now() + period, period);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pong_deadline: Option<Instant> = None;

    loop {
        let message = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Closing status channel of job {job_id}");
                disconnect(&mut socket).await;
                return Ok(())
            },
            _ = heartbeat.tick() => {
                if pong_deadline.is_none() {
                    pong_deadline = Some(Instant::now() + session.ping_timeout());
                }
                socket.send(Message::text(PING_PACKET)).await
                    .map_err(|err| Error::SocketConnection(err.to_string()))?;
                continue
            },
            _ = wait_until(pong_deadline) => {
                warn!("Status channel of job {job_id} stopped answering heartbeats");
                return Err(Error::SocketConnection("heartbeat timed out".to_owned()))
            },
            message = socket.next() => message,
        };

        let text = match message {
            None | Some(Ok(Message::Close(_))) => {
                info!("Status channel of job {job_id} closed by server");
                return Ok(())
            },
            Some(Err(err)) => {
                warn!("Status channel of job {job_id} failed: {err}");
                return Err(Error::SocketConnection(err.to_string()))
            },
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(_)) => continue,
        };

        match decode_frame(text.as_str()) {
            Ok(Frame::Pong(_)) => pong_deadline = None,
            Ok(Frame::Ping(data)) => {
                socket.send(Message::text(encode_pong(&data))).await
                    .map_err(|err| Error::SocketConnection(err.to_string()))?;
            },
            Ok(Frame::Event { name, args }) if name == JOB_STATUS_EVENT => {
                let Some(status) = event_text(&args) else { continue };
                callback(&status);

                match JobStatus::parse(&status) {
                    Ok(parsed) if parsed.is_terminal() => {
                        info!("Job {job_id} finished (error: {}, percent: {})", parsed.error, parsed.percent);
                        disconnect(&mut socket).await;
                        return Ok(())
                    },
                    Ok(_) => {},
                    Err(err) => warn!("Unreadable status for job {job_id}: {err}"),
                }
            },
            Ok(Frame::Close | Frame::Disconnect) => {
                info!("Status channel of job {job_id} closed by server");
                return Ok(())
            },
            Ok(frame) => debug!("Ignoring packet: {frame:?}"),
            Err(err) => debug!("{err}"),
        }
    }
}

async fn disconnect(socket: &mut Socket) {
    if let Err(err) = socket.send(Message::text(DISCONNECT_PACKET)).await {
        debug!("Could not leave namespace: {err}");
    }
    if let Err(err) = socket.close(None).await {
        debug!("Could not close status channel: {err}");
    }
}

/// Handle on a running job status subscription
pub struct Subscription {
    job_id: u64,
    cancel: CancellationToken,
    task: Option<JoinHandle<Result<()>>>,
}

impl Subscription {
    /// Job this subscription reports on
    pub fn job_id(&self) -> u64 {
        self.job_id
    }

    /// The listener has stopped delivering messages
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Stop listening and wait for the channel to close
    pub async fn close(mut self) -> Result<()> {
        self.cancel.cancel();
        self.join().await
    }

    /// Wait until the job reaches a terminal state or the server closes the channel
    pub async fn finished(mut self) -> Result<()> {
        self.join().await
    }

    /// Let the listener run on its own until the job finishes
    pub fn detach(mut self) {
        self.task.take();
    }

    async fn join(&mut self) -> Result<()> {
        match self.task.take() {
            Some(task) => task.await?,
            None => Ok(()),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.cancel.cancel();
        }
    }
}
