use diorama_engine::time::Clock;
use std::thread;
use std::time::Duration;

#[test]
fn elapsed_equals_sum_of_reported_deltas() {
    let mut clock = Clock::new();
    let mut sum = 0.0_f64;
    for _ in 0..20 {
        let tick = clock.tick();
        sum += tick.delta_seconds as f64;
        thread::sleep(Duration::from_millis(1));
    }
    assert!(
        (sum - clock.elapsed_seconds()).abs() <= f64::EPSILON,
        "elapsed should be exactly the running sum of deltas"
    );
}

#[test]
fn first_tick_reports_zero_delta() {
    let mut clock = Clock::new();
    let tick = clock.tick();
    assert_eq!(tick.delta_seconds, 0.0);
    assert_eq!(tick.elapsed_seconds, 0.0);
}

#[test]
fn deltas_are_never_negative() {
    let mut clock = Clock::new();
    for _ in 0..50 {
        let tick = clock.tick();
        assert!(tick.delta_seconds >= 0.0);
        assert_eq!(clock.delta_seconds(), tick.delta_seconds);
    }
}

#[test]
fn elapsed_millis_tracks_elapsed_seconds() {
    let mut clock = Clock::new();
    clock.tick();
    thread::sleep(Duration::from_millis(5));
    clock.tick();
    let expected = clock.elapsed_seconds() * 1000.0;
    assert!((clock.elapsed_millis() - expected).abs() < 1e-9);
    assert!(clock.elapsed_millis() > 0.0);
}
