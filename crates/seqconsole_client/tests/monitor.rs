use std::sync::{Arc, Mutex};
use std::time::Duration;

use seqconsole_client::{ApiSettings, ClientEvent, EventSink, MonitorHandle};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<ClientEvent>>>,
}

impl TestSink {
    fn new() -> (Self, Arc<Mutex<Vec<ClientEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: events.clone(),
            },
            events,
        )
    }
}

impl EventSink for TestSink {
    fn emit(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn settings_for(server: &MockServer) -> ApiSettings {
    ApiSettings {
        base_url: server.uri(),
        ..ApiSettings::default()
    }
}

async fn wait_until(events: &Arc<Mutex<Vec<ClientEvent>>>, pred: impl Fn(&[ClientEvent]) -> bool) {
    for _ in 0..100 {
        if pred(&events.lock().unwrap()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("condition not met; events: {:?}", events.lock().unwrap());
}

#[tokio::test]
async fn monitor_delivers_job_updates_and_filters_keepalives() {
    let server = MockServer::start().await;
    let body = concat!(
        ": keep-alive\n\n",
        "event: keepalive\ndata: {}\n\n",
        "event: job-update\n",
        "data: {\"id\":\"j1\",\"fileId\":\"a1\",\"fileName\":\"reads.fasta\",",
        "\"tool\":\"mafft\",\"status\":\"RUNNING\",",
        "\"createdAt\":\"2026-08-01T10:00:00Z\",\"updatedAt\":\"2026-08-01T10:05:00Z\"}\n\n",
    );
    Mock::given(method("GET"))
        .and(path("/api/jobs/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let (sink, events) = TestSink::new();
    let _monitor = MonitorHandle::new(settings_for(&server), Box::new(sink));

    wait_until(&events, |events| {
        events
            .iter()
            .any(|e| matches!(e, ClientEvent::JobUpdate(_)))
    })
    .await;

    let events = events.lock().unwrap();
    assert_eq!(events[0], ClientEvent::StreamOpened);
    let updates: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            ClientEvent::JobUpdate(job) => Some(job),
            _ => None,
        })
        .collect();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, "j1");
    assert_eq!(updates[0].tool, "mafft");
}

#[tokio::test]
async fn monitor_schedules_a_retry_when_the_stream_ends() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/stream"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("data: {\"bad\":1}\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let (sink, events) = TestSink::new();
    let _monitor = MonitorHandle::new(settings_for(&server), Box::new(sink));

    // The mock body is finite, so the stream ends and a retry is scheduled.
    wait_until(&events, |events| {
        events
            .iter()
            .any(|e| matches!(e, ClientEvent::StreamRetrying { attempt: 1, .. }))
    })
    .await;
}

#[tokio::test]
async fn monitor_counts_attempts_against_a_rejecting_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs/stream"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let (sink, events) = TestSink::new();
    let _monitor = MonitorHandle::new(settings_for(&server), Box::new(sink));

    wait_until(&events, |events| {
        matches!(
            events.first(),
            Some(ClientEvent::StreamRetrying { attempt: 1, .. })
        )
    })
    .await;
    // No open event was ever emitted.
    assert!(!events
        .lock()
        .unwrap()
        .iter()
        .any(|e| matches!(e, ClientEvent::StreamOpened)));
}
