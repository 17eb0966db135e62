use diorama_engine::camera3d::OrbitRig;
use diorama_engine::events::{EventBus, StageEvent};
use diorama_engine::media::MediaDeck;
use diorama_engine::scene::CameraRigData;
use glam::Vec2;

#[test]
fn playback_starts_exactly_once() {
    let mut events = EventBus::default();
    let mut deck = MediaDeck::new("media/orion_from_the_street.mp4");
    assert!(!deck.started());

    deck.on_interaction(&mut events);
    assert!(deck.started());
    deck.on_interaction(&mut events);
    deck.on_interaction(&mut events);

    let starts = events
        .drain()
        .iter()
        .filter(|event| matches!(event, StageEvent::MediaStarted { .. }))
        .count();
    assert_eq!(starts, 1, "later interactions never restart playback");
    assert_eq!(deck.source(), "media/orion_from_the_street.mp4");

    let triggers: Vec<&String> = deck.recent_triggers().collect();
    assert_eq!(triggers.len(), 4, "three interactions plus the one start");
}

#[test]
fn disabled_deck_ignores_interactions() {
    let mut events = EventBus::default();
    let mut deck = MediaDeck::new("clip.mp4");
    deck.set_enabled(false);
    assert!(!deck.enabled());

    deck.on_interaction(&mut events);
    assert!(!deck.started());
    assert!(events.drain().is_empty());
    assert_eq!(deck.recent_triggers().len(), 0);
}

#[test]
fn first_camera_interaction_drives_the_deck() {
    let mut events = EventBus::default();
    let mut deck = MediaDeck::new("clip.mp4");
    let mut rig = OrbitRig::from_data(&CameraRigData::default());

    // Mirrors the host loop: the rig's one-shot edge feeds the deck.
    rig.orbit(Vec2::new(0.2, 0.0));
    if rig.take_interaction_started() {
        events.push(StageEvent::InteractionStarted);
        deck.on_interaction(&mut events);
    }
    rig.zoom(1.2);
    if rig.take_interaction_started() {
        deck.on_interaction(&mut events);
    }

    assert!(deck.started());
    let drained = events.drain();
    assert!(drained.iter().any(|event| matches!(event, StageEvent::InteractionStarted)));
    assert_eq!(
        drained.iter().filter(|event| matches!(event, StageEvent::MediaStarted { .. })).count(),
        1
    );
    assert_eq!(format!("{}", drained[1]), "MediaStarted source=clip.mp4");
}
