#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};

use ck_core::CurvePoint;
use ck_store::{CurveStore, SignalKind, StoreEvent};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

pub fn points(frames: &[i32]) -> Vec<CurvePoint> {
    frames
        .iter()
        .map(|&f| CurvePoint::new(f, f as f64, -(f as f64)))
        .collect()
}

/// Subscribe to `kinds` and collect every delivered event.
pub fn record(store: &CurveStore, kinds: &[SignalKind]) -> Arc<Mutex<Vec<StoreEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    store.subscribe_many(kinds, move |event| sink.lock().unwrap().push(event.clone()));
    log
}

pub fn events_of(log: &Arc<Mutex<Vec<StoreEvent>>>) -> Vec<StoreEvent> {
    log.lock().unwrap().clone()
}

#[derive(Clone, Default)]
pub struct WarningCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl WarningCapture {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for WarningCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.messages.lock().unwrap().push(visitor.0);
        }
    }
}

/// Run `f` with a subscriber that records WARN-level messages.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
    let capture = WarningCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, capture.messages())
}
