#![forbid(unsafe_code)]

//! Structured logging integration tests.
//!
//! With events enabled:
//!   cargo test -p devlens-overlay --features tracing --test tracing_tests
//!
//! Without the feature only the silence check runs.

use std::sync::{Arc, Mutex};

use devlens_core::geometry::{AnchorRect, Size};
use devlens_overlay::annotation::AnnotationRecord;
use devlens_overlay::composer::OverlaySession;
use devlens_overlay::config::OverlayConfig;
use devlens_overlay::region::InspectedRegion;
use devlens_overlay::stylesheet::InMemoryStyleHost;

use tracing_subscriber::layer::SubscriberExt;

/// A captured event: its message plus string-formatted fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    message: String,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    #[allow(dead_code)]
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .push((field.name().to_string(), format!("{value:?}")));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor {
            message: String::new(),
            fields: Vec::new(),
        };
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn interaction() {
    let mut session = OverlaySession::new(OverlayConfig::default(), InMemoryStyleHost::new());
    session.set_viewport(Size::new(1280.0, 800.0));
    session.toggle_enabled();
    let mut region = InspectedRegion::new(AnnotationRecord::new("Card").status_note("orphan"));
    session.hover_enter(&mut region, &AnchorRect::new(100.0, 50.0, 150.0, 140.0));
    session.hover_leave(&mut region);
    session.toggle_enabled();
}

#[cfg(feature = "tracing")]
#[test]
fn mode_changes_are_logged() {
    let events = capture(interaction);
    let toggles: Vec<_> = events
        .iter()
        .filter(|e| e.message == "inspection mode changed")
        .collect();
    assert_eq!(toggles.len(), 2);
    assert_eq!(toggles[0].field("flag"), Some("enabled"));
    assert_eq!(toggles[0].field("value"), Some("true"));
    assert_eq!(toggles[1].field("value"), Some("false"));
}

#[cfg(feature = "tracing")]
#[test]
fn style_block_changes_are_logged() {
    let events = capture(interaction);
    let changes: Vec<_> = events
        .iter()
        .filter(|e| e.message == "override style block synced")
        .filter_map(|e| e.field("change"))
        .collect();
    assert_eq!(changes, vec!["inserted", "removed"]);
}

#[cfg(feature = "tracing")]
#[test]
fn hover_and_issues_are_logged() {
    let events = capture(interaction);
    let messages: Vec<&str> = events.iter().map(|e| e.message.as_str()).collect();
    assert!(messages.contains(&"hover entered"));
    assert!(messages.contains(&"hover left"));
    assert!(messages.contains(&"placed inspection panel"));

    let issue = events
        .iter()
        .find(|e| e.message == "tolerated annotation issue")
        .expect("orphan status note logged");
    assert_eq!(issue.field("identifier"), Some("Card"));
}

#[cfg(not(feature = "tracing"))]
#[test]
fn zero_overhead_without_feature() {
    let events = capture(interaction);
    assert!(events.is_empty(), "unexpected events: {events:?}");
}
