//! End-to-end tests: inbound messages, render ticks, gestures and status
//! driven through `AppContext` the way a host event loop would.

use std::time::{Duration, Instant};

use glam::DVec2;

use starwatch_client::{AppContext, ClientConfig, LayerId};
use starwatch_core::enums::{ConnectionStatus, EntityKind};
use starwatch_core::error::ProtocolError;
use starwatch_core::types::EntityKey;
use starwatch_view::InputEvent;

const SHIP: EntityKey = EntityKey {
    kind: EntityKind::Ship,
    id: 1,
};

fn ship_message(ts: u64, x: f64, vx: f64) -> String {
    format!(r#"{{"ts": {ts}, "items": [{{"type": "ship", "id": 1, "pos": [{x}, 0.0, {vx}, 0.0]}}]}}"#)
}

#[test]
fn test_dead_reckoning_between_batches() {
    let t0 = Instant::now();
    let mut ctx = AppContext::default();

    ctx.handle_message(&ship_message(0, 0.0, 10.0), t0).unwrap();
    let t1 = t0 + Duration::from_secs(1);
    ctx.handle_message(&ship_message(1_000_000, 10.0, 20.0), t1).unwrap();

    // One second after the second batch: 10 + 20 + 10/2
    let stats = ctx.render_tick(t1 + Duration::from_secs(1));
    assert_eq!(stats.now_us, 2_000_000);
    assert_eq!(stats.drawn, 1);

    let drawable = ctx.scene().drawable(&SHIP).unwrap();
    assert!((drawable.position.x - 35.0).abs() < 1e-9);
    assert_eq!(ctx.store().len(), 1);
}

#[test]
fn test_bad_envelope_leaves_state_untouched() {
    let t0 = Instant::now();
    let mut ctx = AppContext::default();
    ctx.handle_message(&ship_message(500, 0.0, 1.0), t0).unwrap();

    let result = ctx.handle_message(r#"{"items": []}"#, t0 + Duration::from_secs(5));
    assert!(matches!(result, Err(ProtocolError::MissingBatchTimestamp)));
    assert_eq!(ctx.clock().last_server_us(), Some(500));
    assert_eq!(ctx.store().len(), 1);
}

#[test]
fn test_pan_moves_world_layers_but_not_overlay() {
    let t0 = Instant::now();
    let mut ctx = AppContext::default();
    ctx.handle_message(&ship_message(0, 100.0, 0.0), t0).unwrap();
    ctx.render_tick(t0);

    ctx.handle_input(InputEvent::PointerDown(DVec2::new(10.0, 10.0)));
    assert!(ctx.handle_input(InputEvent::PointerMove(DVec2::new(60.0, 30.0))));
    ctx.handle_input(InputEvent::PointerUp);

    assert_eq!(ctx.scene().screen_position(&SHIP), Some(DVec2::new(150.0, 20.0)));

    let gui = ctx.scene().layer(LayerId::Gui).unwrap();
    assert_eq!(starwatch_view::RenderTarget::translation(gui), DVec2::ZERO);
    assert_eq!(starwatch_view::RenderTarget::scale(gui), DVec2::ONE);
}

#[test]
fn test_zoom_keeps_entity_under_pointer() {
    let t0 = Instant::now();
    let mut ctx = AppContext::default();
    ctx.handle_message(&ship_message(0, 250.0, 0.0), t0).unwrap();
    ctx.render_tick(t0);

    let at = DVec2::new(250.0, 0.0);
    for _ in 0..3 {
        ctx.handle_input(InputEvent::Wheel { at, delta_y: -1.0 });
    }
    let screen = ctx.scene().screen_position(&SHIP).unwrap();
    assert!((screen - at).length() < 1e-9);

    let scale = ctx.controller().view().scale();
    assert!((scale.x - 1.1f64.powi(3)).abs() < 1e-12);
}

#[test]
fn test_focus_loss_ends_drag() {
    let mut ctx = AppContext::default();
    ctx.handle_input(InputEvent::PointerDown(DVec2::ZERO));
    ctx.handle_input(InputEvent::Cancel);
    assert!(!ctx.handle_input(InputEvent::PointerMove(DVec2::new(100.0, 0.0))));
    assert_eq!(ctx.controller().view().translation(), DVec2::ZERO);
}

#[test]
fn test_connection_loss_keeps_predicting() {
    let t0 = Instant::now();
    let mut ctx = AppContext::default();
    assert_eq!(ctx.connection_status(), ConnectionStatus::Connecting);
    assert_eq!(
        ctx.scene().layer(LayerId::Gui).unwrap().text(),
        Some("Connecting...")
    );

    ctx.set_connection_status(ConnectionStatus::Established);
    ctx.handle_message(&ship_message(0, 0.0, 2.0), t0).unwrap();
    ctx.set_connection_status(ConnectionStatus::Lost);
    assert_eq!(
        ctx.scene().layer(LayerId::Gui).unwrap().text(),
        Some("Connection lost")
    );

    ctx.render_tick(t0 + Duration::from_secs(3));
    let drawable = ctx.scene().drawable(&SHIP).unwrap();
    assert!((drawable.position.x - 6.0).abs() < 1e-9);
}

#[test]
fn test_entities_kept_forever_by_default() {
    let t0 = Instant::now();
    let mut ctx = AppContext::default();
    ctx.handle_message(&ship_message(0, 0.0, 0.0), t0).unwrap();

    let t1 = t0 + Duration::from_secs(3600);
    let report = ctx
        .handle_message(r#"{"ts": 3600000000, "items": []}"#, t1)
        .unwrap();
    ctx.render_tick(t1);
    assert!(report.expired.is_empty());
    assert_eq!(ctx.store().len(), 1);
}

#[test]
fn test_render_tick_never_evicts() {
    let config = ClientConfig {
        entity_ttl_secs: Some(1.0),
        ..Default::default()
    };
    let t0 = Instant::now();
    let mut ctx = AppContext::new(config);
    ctx.handle_message(&ship_message(0, 0.0, 1.0), t0).unwrap();

    // Well past the TTL on the local clock, but no newer batch has arrived.
    let stats = ctx.render_tick(t0 + Duration::from_secs(5));
    assert_eq!(stats.now_us, 5_000_000);
    assert_eq!(stats.drawn, 1);
    assert_eq!(ctx.store().len(), 1);
    assert!(ctx.scene().drawable(&SHIP).is_some());
}

#[test]
fn test_ttl_expires_silent_entities() {
    let config = ClientConfig {
        entity_ttl_secs: Some(2.0),
        ..Default::default()
    };
    let t0 = Instant::now();
    let mut ctx = AppContext::new(config);

    ctx.handle_message(
        r#"{"ts": 0, "items": [
            {"type": "ship", "id": 1, "pos": [0, 0, 0, 0]},
            {"type": "asteroid", "id": 5, "pos": [0, 0, 0, 0]}
        ]}"#,
        t0,
    )
    .unwrap();
    ctx.render_tick(t0);
    assert_eq!(ctx.scene().drawables().count(), 2);

    // Only the asteroid keeps reporting.
    let t1 = t0 + Duration::from_secs(3);
    let report = ctx
        .handle_message(
            r#"{"ts": 3000000, "items": [{"type": "asteroid", "id": 5, "pos": [1, 0, 0, 0]}]}"#,
            t1,
        )
        .unwrap();

    assert_eq!(report.expired, vec![SHIP]);
    assert!(ctx.scene().drawable(&SHIP).is_none());
    assert!(ctx.scene().layer(LayerId::Ships).unwrap().is_empty());
    assert_eq!(ctx.store().len(), 1);

    let stats = ctx.render_tick(t1);
    assert_eq!(stats.drawn, 1);
}
