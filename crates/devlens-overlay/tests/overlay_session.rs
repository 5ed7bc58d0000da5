#![forbid(unsafe_code)]

//! End-to-end overlay session behavior: mode toggles, the singleton style
//! block, hover placement and panel composition across several regions.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use devlens_core::event::{KeyCode, KeyEvent, Modifiers};
use devlens_core::geometry::{AnchorRect, PanelPlacement, Size};
use devlens_core::mode::{ModeChange, ModeState};
use devlens_core::positioner::PanelSide;
use devlens_overlay::annotation::{AnnotationRecord, ReviewStatus};
use devlens_overlay::composer::OverlaySession;
use devlens_overlay::config::OverlayConfig;
use devlens_overlay::diagnostics::{DiagnosticEventKind, TelemetryHooks};
use devlens_overlay::panel::{SectionBody, SectionKind};
use devlens_overlay::region::InspectedRegion;
use devlens_overlay::stylesheet::{InMemoryStyleHost, OutlineTarget, OverrideStyles, StyleHost};
use devlens_overlay::visual::{OutlineStyle, VisualState};
use pretty_assertions::assert_eq;

const VIEWPORT: Size = Size::new(1280.0, 800.0);

fn session() -> OverlaySession<InMemoryStyleHost> {
    let mut session = OverlaySession::new(
        OverlayConfig::default().diagnostics(true),
        InMemoryStyleHost::new(),
    )
    .with_deterministic_diagnostics();
    session.set_viewport(VIEWPORT);
    session
}

fn chord() -> KeyEvent {
    KeyEvent::new(KeyCode::Char('d')).with_modifiers(Modifiers::SUPER | Modifiers::SHIFT)
}

#[test]
fn repeated_toggles_leave_at_most_one_block() {
    let mut session = session();
    for _ in 0..2 {
        assert!(session.toggle_enabled());
        assert_eq!(session.style_host().block_count(), 1);
        assert!(!session.toggle_enabled());
        assert_eq!(session.style_host().block_count(), 0);
    }
    for _ in 0..7 {
        session.toggle_enabled();
        assert!(session.style_host().block_count() <= 1);
    }
    assert_eq!(session.style_host().block_count(), 1);
}

/// Host that counts live blocks and rejects double inserts.
#[derive(Default)]
struct StrictHost {
    live: usize,
    max_live: usize,
}

impl StyleHost for StrictHost {
    fn insert_block(&mut self, _styles: &OverrideStyles) {
        assert_eq!(self.live, 0, "insert while a block is installed");
        self.live += 1;
        self.max_live = self.max_live.max(self.live);
    }

    fn remove_block(&mut self) {
        assert_eq!(self.live, 1, "remove without an installed block");
        self.live -= 1;
    }
}

#[test]
fn host_never_sees_two_blocks() {
    let mut session = OverlaySession::new(OverlayConfig::default(), StrictHost::default());
    session.set_enabled(true);
    session.toggle_show_outlines();
    session.toggle_show_outlines();
    session.set_enabled(true);
    session.set_enabled(false);
    session.set_show_outlines_always(false);
    session.set_enabled(true);
    let host = session.teardown();
    assert_eq!(host.live, 0);
    assert_eq!(host.max_live, 1);
}

#[test]
fn block_content_tracks_outline_setting() {
    let mut session = session();
    session.set_enabled(true);
    assert_eq!(
        session.style_host().current().map(|b| b.ambient_target),
        Some(OutlineTarget::AllRegions)
    );
    session.set_show_outlines_always(false);
    assert_eq!(
        session.style_host().current().map(|b| b.ambient_target),
        Some(OutlineTarget::HoveredRegion)
    );
    assert_eq!(session.style_host().block_count(), 1);
}

#[test]
fn listeners_see_session_changes_in_order() {
    let mut session = session();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let id = session.subscribe(move |state, change| sink.borrow_mut().push((*state, change)));

    session.handle_key(&chord());
    session.set_show_outlines_always(false);
    session.set_show_outlines_always(false);
    assert!(session.unsubscribe(id));
    session.toggle_enabled();

    assert_eq!(
        *seen.borrow(),
        vec![
            (ModeState::new(true, true), ModeChange::Enabled(true)),
            (
                ModeState::new(true, false),
                ModeChange::ShowOutlinesAlways(false)
            ),
        ]
    );
    assert_eq!(session.mode().revision(), 3);
}

#[test]
fn regions_resolve_independently() {
    let mut session = session();
    session.set_enabled(true);

    let mut header = InspectedRegion::new(AnnotationRecord::new("Header"));
    let mut footer = InspectedRegion::new(AnnotationRecord::new("Footer"));
    session.hover_enter(&mut header, &AnchorRect::new(0.0, 0.0, 1280.0, 64.0));

    let header_paint = session.compose(&header);
    let footer_paint = session.compose(&footer);
    assert_eq!(header_paint.state, VisualState::Highlighted);
    assert_eq!(footer_paint.state, VisualState::Outlined);
    assert_eq!(footer_paint.outline, Some(OutlineStyle::AMBIENT));
    assert!(footer_paint.panel.is_none());

    session.set_show_outlines_always(false);
    assert_eq!(session.compose(&footer).state, VisualState::Hidden);
    assert!(session.compose(&footer).is_plain());
    assert_eq!(session.compose(&header).state, VisualState::Highlighted);

    session.hover_leave(&mut footer);
    assert!(header.hover.is_hovered());
}

#[test]
fn right_edge_anchor_flips_left() {
    let mut session = session();
    session.set_enabled(true);
    let mut region = InspectedRegion::new(AnnotationRecord::new("Avatar"));
    let trace = session
        .hover_enter(&mut region, &AnchorRect::new(20.0, 1200.0, 1260.0, 60.0))
        .expect("enabled");
    assert_eq!(trace.side, PanelSide::Left);
    assert_eq!(trace.placement, PanelPlacement::new(20.0, 872.0));
}

#[test]
fn bottom_anchor_shifts_up() {
    let mut session = session();
    session.set_enabled(true);
    let mut region = InspectedRegion::new(AnnotationRecord::new("Toast"));
    let trace = session
        .hover_enter(&mut region, &AnchorRect::new(750.0, 50.0, 150.0, 790.0))
        .expect("enabled");
    assert_eq!(trace.placement.top, 512.0);
    assert!(trace.shifted_up);
}

#[test]
fn viewport_change_applies_to_next_hover() {
    let mut session = session();
    session.set_enabled(true);
    let mut region = InspectedRegion::new(AnnotationRecord::new("Sidebar"));
    let anchor = AnchorRect::new(100.0, 600.0, 700.0, 400.0);

    session.hover_enter(&mut region, &anchor);
    assert_eq!(region.hover.placement().map(|p| p.left), Some(708.0));
    session.hover_leave(&mut region);

    session.set_viewport(Size::new(900.0, 800.0));
    session.hover_enter(&mut region, &anchor);
    assert_eq!(region.hover.placement().map(|p| p.left), Some(272.0));
}

#[test]
fn full_panel_content() {
    let mut session = session();
    session.set_enabled(true);
    let record = AnnotationRecord::new("PricingCard")
        .attribute("tier", "pro")
        .attribute("highlighted", "true")
        .spacing("p-6 gap-4")
        .colors("surface-raised, brand-600")
        .typography("heading-md / body-sm")
        .icons("check-circle")
        .contains(["PriceTag", "FeatureList", "CtaButton"])
        .notes("Most popular badge only on pro")
        .status(ReviewStatus::Warning)
        .status_note("badge overlaps on 320px");
    let mut region = InspectedRegion::new(record);
    session.hover_enter(&mut region, &AnchorRect::new(200.0, 100.0, 400.0, 500.0));

    let content = session.compose(&region).panel.expect("panel").content;
    let labels: Vec<&str> = content.sections.iter().map(|s| s.label()).collect();
    assert_eq!(
        labels,
        vec!["Props", "Spacing", "Colors", "Typography", "Icons", "Contains", "Notes"]
    );
    assert_eq!(
        content.section(SectionKind::Contains).map(|s| s.body.clone()),
        Some(SectionBody::Text("PriceTag, FeatureList, CtaButton".into()))
    );
    assert_eq!(
        content.status.map(|s| s.display()),
        Some("⚠️ badge overlaps on 320px".to_string())
    );
}

#[test]
fn telemetry_hooks_observe_hover_lifecycle() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let hooks = TelemetryHooks::new().on_hover(move |entry| {
        sink.lock().expect("lock").push(entry.kind);
    });
    let mut session = session().with_telemetry_hooks(hooks);
    session.set_enabled(true);

    let mut region = InspectedRegion::new(AnnotationRecord::new("Tab"));
    session.hover_enter(&mut region, &AnchorRect::new(10.0, 10.0, 20.0, 20.0));
    session.hover_leave(&mut region);
    session.hover_leave(&mut region);

    assert_eq!(
        *events.lock().expect("lock"),
        vec![
            DiagnosticEventKind::HoverEntered,
            DiagnosticEventKind::PanelPlaced,
            DiagnosticEventKind::HoverLeft,
        ]
    );
}

#[test]
fn deterministic_jsonl_export() {
    let run = || {
        let mut session = session();
        session.handle_key(&chord());
        let mut region = InspectedRegion::new(AnnotationRecord::new("Tab"));
        session.hover_enter(&mut region, &AnchorRect::new(10.0, 10.0, 20.0, 20.0));
        session.diagnostics().expect("diagnostics on").to_jsonl()
    };
    let first = run();
    assert_eq!(first, run());
    assert_eq!(first.lines().count(), 5);
    assert!(first.lines().all(|line| line.starts_with("{\"")));
}
