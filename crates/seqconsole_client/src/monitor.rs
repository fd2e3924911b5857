use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use console_logging::{console_debug, console_info, console_warn};
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use url::Url;

use crate::http::ApiSettings;
use crate::sse::SseParser;
use crate::types::{ClientEvent, JobDto};

/// Fixed delay between reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);
/// Automatic reconnect budget; a manual reconnect resets it.
pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;

const STREAM_PATH: &str = "api/jobs/stream";

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

enum MonitorCommand {
    Connect,
    Shutdown,
}

/// Drives the persistent job event stream on a dedicated thread.
///
/// The thread owns a tokio runtime; job updates and stream lifecycle changes
/// are pushed through the sink. Dropping the handle shuts the thread down.
pub struct MonitorHandle {
    cmd_tx: mpsc::Sender<MonitorCommand>,
}

impl MonitorHandle {
    pub fn new(settings: ApiSettings, sink: Box<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            runtime.block_on(run_monitor(settings, sink, cmd_rx));
        });
        Self { cmd_tx }
    }

    /// Reset the retry budget and reopen the stream.
    pub fn reconnect(&self) {
        let _ = self.cmd_tx.send(MonitorCommand::Connect);
    }

    pub fn shutdown(&self) {
        let _ = self.cmd_tx.send(MonitorCommand::Shutdown);
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(MonitorCommand::Shutdown);
    }
}

enum StreamEnd {
    /// Connection failed or the stream ended; counts against the budget.
    Dropped,
    Shutdown,
}

async fn run_monitor(
    settings: ApiSettings,
    sink: Box<dyn EventSink>,
    cmd_rx: mpsc::Receiver<MonitorCommand>,
) {
    // The stream is long-lived, so no overall request timeout here; only the
    // connect phase is bounded.
    let client = match reqwest::Client::builder()
        .connect_timeout(settings.connect_timeout)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            console_warn!("Monitor could not build an HTTP client: {err}");
            sink.emit(ClientEvent::StreamClosed);
            return;
        }
    };

    let url = {
        let mut base = settings.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        match Url::parse(&base).and_then(|base| base.join(STREAM_PATH)) {
            Ok(url) => url,
            Err(err) => {
                console_warn!("Monitor has no usable stream URL: {err}");
                sink.emit(ClientEvent::StreamClosed);
                return;
            }
        }
    };

    let mut attempts: u32 = 0;
    loop {
        match stream_once(&client, &url, sink.as_ref(), &cmd_rx, &mut attempts).await {
            StreamEnd::Shutdown => return,
            StreamEnd::Dropped => {
                attempts += 1;
                if attempts > MAX_RECONNECT_ATTEMPTS {
                    console_warn!("Job stream gave up after {MAX_RECONNECT_ATTEMPTS} attempts");
                    sink.emit(ClientEvent::StreamClosed);
                    // Idle until a manual reconnect (or shutdown) arrives.
                    loop {
                        match cmd_rx.recv() {
                            Ok(MonitorCommand::Connect) => {
                                attempts = 0;
                                break;
                            }
                            Ok(MonitorCommand::Shutdown) | Err(_) => return,
                        }
                    }
                } else {
                    sink.emit(ClientEvent::StreamRetrying {
                        attempt: attempts,
                        max_attempts: MAX_RECONNECT_ATTEMPTS,
                    });
                    tokio::time::sleep(RECONNECT_DELAY).await;
                    // A command sent during the delay still applies.
                    match drain_commands(&cmd_rx) {
                        Some(MonitorCommand::Connect) => attempts = 0,
                        Some(MonitorCommand::Shutdown) => return,
                        None => {}
                    }
                }
            }
        }
    }
}

/// Last pending command, if any.
fn drain_commands(cmd_rx: &mpsc::Receiver<MonitorCommand>) -> Option<MonitorCommand> {
    let mut last = None;
    while let Ok(cmd) = cmd_rx.try_recv() {
        if matches!(cmd, MonitorCommand::Shutdown) {
            return Some(MonitorCommand::Shutdown);
        }
        last = Some(cmd);
    }
    last
}

async fn stream_once(
    client: &reqwest::Client,
    url: &Url,
    sink: &dyn EventSink,
    cmd_rx: &mpsc::Receiver<MonitorCommand>,
    attempts: &mut u32,
) -> StreamEnd {
    let response = match client
        .get(url.clone())
        .header(ACCEPT, "text/event-stream")
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            console_warn!("Job stream connect failed: {err}");
            return StreamEnd::Dropped;
        }
    };
    if !response.status().is_success() {
        console_warn!("Job stream rejected: {}", response.status());
        return StreamEnd::Dropped;
    }

    console_info!("Job stream connected");
    sink.emit(ClientEvent::StreamOpened);

    let mut parser = SseParser::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        match drain_commands(cmd_rx) {
            Some(MonitorCommand::Shutdown) => return StreamEnd::Shutdown,
            // A reconnect while already streaming just refreshes the budget.
            Some(MonitorCommand::Connect) => *attempts = 0,
            None => {}
        }

        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                console_warn!("Job stream read failed: {err}");
                return StreamEnd::Dropped;
            }
        };
        for event in parser.feed(&chunk) {
            match event.event.as_deref() {
                Some("job-update") => match serde_json::from_str::<JobDto>(&event.data) {
                    Ok(job) => sink.emit(ClientEvent::JobUpdate(job)),
                    Err(err) => console_warn!("Undecodable job update dropped: {err}"),
                },
                // Explicit keep-alive events carry no job payload.
                Some("keepalive") => {}
                other => {
                    console_debug!("Ignoring stream event of type {:?}", other);
                }
            }
        }
    }

    console_info!("Job stream ended");
    StreamEnd::Dropped
}
