use super::*;

#[test]
fn starts_paused_at_zero() {
    let mut p = Playhead::new(1.0);
    assert!(!p.is_playing());
    assert_eq!(p.tick(0.5), None);
    assert_eq!(p.time(), 0.0);
}

#[test]
fn play_then_reverse_emits_each_boundary_once() {
    let mut p = Playhead::new(1.0);
    p.play();
    assert_eq!(p.tick(0.6), None);
    assert_eq!(p.tick(0.6), Some(PlaybackEvent::Complete));
    assert_eq!(p.time(), 1.0);
    assert_eq!(p.tick(0.6), None);

    p.reverse();
    assert_eq!(p.tick(0.5), None);
    assert_eq!(p.tick(0.5), Some(PlaybackEvent::ReverseComplete));
    assert_eq!(p.time(), 0.0);
    assert!(!p.is_playing());
}

#[test]
fn reversing_midway_heads_back_to_start() {
    let mut p = Playhead::new(2.0);
    p.play();
    p.tick(0.5);
    p.reverse();
    assert_eq!(p.tick(0.25), None);
    assert_eq!(p.time(), 0.25);
    assert_eq!(p.tick(1.0), Some(PlaybackEvent::ReverseComplete));
}

#[test]
fn replaying_a_completed_playhead_does_not_refire() {
    let mut p = Playhead::new(1.0);
    p.apply(PlaybackAction::Complete);
    p.play();
    assert_eq!(p.tick(0.1), None);
}

#[test]
fn actions_follow_their_names() {
    let mut p = Playhead::new(1.0);
    p.apply(PlaybackAction::Play);
    p.tick(0.4);
    p.apply(PlaybackAction::Pause);
    assert_eq!(p.tick(0.4), None);
    assert_eq!(p.time(), 0.4);
    p.apply(PlaybackAction::Resume);
    p.tick(0.1);
    assert!((p.time() - 0.5).abs() < 1e-12);
    p.apply(PlaybackAction::Restart);
    assert_eq!(p.time(), 0.0);
    assert!(p.is_playing());
    p.apply(PlaybackAction::Reset);
    assert!(!p.is_playing());
    p.apply(PlaybackAction::None);
    assert!(!p.is_playing());
}

#[test]
fn parses_action_names() {
    for name in [
        "play", "pause", "resume", "reverse", "restart", "reset", "complete", "none",
    ] {
        let action: PlaybackAction = name.parse().unwrap();
        assert_eq!(action.to_string(), name);
    }
    assert!("jump".parse::<PlaybackAction>().is_err());
}
