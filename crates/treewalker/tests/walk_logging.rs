use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tracing_subscriber::prelude::*;
use treewalker::{Signal, WalkOutcome, Walker};

#[derive(Debug, Default, Clone)]
struct Captured {
    message: String,
    fields: HashMap<String, String>,
}

struct CaptureLayer(Arc<Mutex<Vec<Captured>>>);

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Captured::default());
        event.record(&mut visitor);
        self.0.lock().unwrap().push(visitor.0);
    }
}

struct FieldVisitor(Captured);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.0.message = rendered;
        } else {
            self.0.fields.insert(field.name().to_string(), rendered);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0.message.push_str(value);
        } else {
            self.0
                .fields
                .insert(field.name().to_string(), value.to_string());
        }
    }
}

fn capture() -> (Arc<Mutex<Vec<Captured>>>, tracing::subscriber::DefaultGuard) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(events.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (events, guard)
}

fn find<'e>(events: &'e [Captured], message: &str) -> Option<&'e Captured> {
    events.iter().find(|event| event.message == message)
}

fn tree() -> Value {
    json!({
        "children": [
            { "id": "a", "children": [{ "id": "a1" }, { "id": "a2" }] },
            { "id": "b" }
        ]
    })
}

#[tokio::test]
async fn test_logs_walk_summary() {
    let (events, _guard) = capture();
    let root = tree();

    let walker = Walker::<&Value, (), String>::new();
    let outcome = walker.walk(&&root, &mut ()).await;
    assert_eq!(outcome, Ok(WalkOutcome::Completed));

    let events = events.lock().unwrap();
    let start = find(&events, "Starting walk").expect("start event");
    assert_eq!(start.fields.get("enter").map(String::as_str), Some("default"));
    assert_eq!(start.fields.get("children").map(String::as_str), Some("default"));

    let finished = find(&events, "Walk finished").expect("finish event");
    assert_eq!(finished.fields.get("entered").map(String::as_str), Some("4"));
    assert_eq!(finished.fields.get("left").map(String::as_str), Some("4"));
    assert_eq!(finished.fields.get("max_depth").map(String::as_str), Some("2"));
}

#[tokio::test]
async fn test_logs_abort_and_failure() {
    let (events, _guard) = capture();
    let root = tree();

    let aborting = Walker::<&Value, (), String>::builder()
        .on_enter_sync(|node, _| {
            Ok(if node["id"] == "a1" {
                Signal::Abort
            } else {
                Signal::Continue
            })
        })
        .build();
    assert_eq!(
        aborting.walk(&&root, &mut ()).await,
        Ok(WalkOutcome::Aborted)
    );

    let failing = Walker::<&Value, (), String>::builder()
        .on_leave_sync(|_, _| Err("leave failed".to_string()))
        .build();
    assert_eq!(
        failing.walk(&&root, &mut ()).await,
        Err("leave failed".to_string())
    );

    let events = events.lock().unwrap();
    let aborted = find(&events, "Aborted on enter").expect("abort event");
    assert_eq!(aborted.fields.get("depth").map(String::as_str), Some("2"));
    assert!(find(&events, "Walk failed in a hook").is_some());
}
