// tests/driver.rs

use std::sync::Arc;
use std::time::Duration;

use koch_snowflake::geometry::Polygon;
use koch_snowflake::{Error, Presenter, SnowflakeDriver, SnowflakeSequence, StopSignal};

#[derive(Default)]
struct Recorder {
    stages: Vec<(usize, usize)>,
}

impl Presenter for Recorder {
    fn present(&mut self, polygon: &Polygon, iteration: usize) {
        self.stages.push((iteration, polygon.len()));
    }
}

#[test]
fn zero_iterations_never_presents() {
    let err = SnowflakeDriver::new(Polygon::reference_seed(), 0).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
}

#[test]
fn malformed_seed_fails_before_any_stage() {
    let err = Polygon::from_flat(&[-0.5, 0.0, 0.0, 0.866, 0.5]).unwrap_err();
    assert!(matches!(err, Error::InvalidPolygon(_)));
}

#[test]
fn cycle_restarts_from_identical_seed() {
    let mut sequence = SnowflakeSequence::new(Polygon::reference_seed(), 6).unwrap();
    let first = sequence.next().unwrap();
    let restarted = sequence.nth(5).unwrap();
    assert_eq!(restarted.iteration, 0);
    assert!(Arc::ptr_eq(&first.polygon, &restarted.polygon));
    assert_eq!(
        restarted.polygon.to_flat(),
        Polygon::reference_seed().to_flat()
    );
}

#[test]
fn reference_animation_stage_sizes() {
    let mut driver = SnowflakeDriver::new(Polygon::reference_seed(), 4).unwrap();
    let mut recorder = Recorder::default();
    for _ in 0..5 {
        driver.step(&mut recorder);
    }
    assert_eq!(
        recorder.stages,
        vec![(0, 3), (1, 12), (2, 48), (3, 192), (0, 3)]
    );
}

#[test]
fn reset_presents_seed_next() {
    let mut driver = SnowflakeDriver::new(Polygon::reference_seed(), 5).unwrap();
    let mut recorder = Recorder::default();
    driver.step(&mut recorder);
    driver.step(&mut recorder);
    driver.reset();
    let frame = driver.step(&mut recorder);
    assert_eq!(frame.iteration, 0);
    assert_eq!(driver.frames_presented(), 3);
}

#[test]
fn blocking_loop_stops_between_steps() {
    let mut driver = SnowflakeDriver::new(Polygon::reference_seed(), 3).unwrap();
    let mut recorder = Recorder::default();
    let stop = StopSignal::new();
    let presented = driver.run_blocking(&mut recorder, &stop, |frame| {
        if frame.iteration == 2 {
            stop.stop();
        }
    });
    assert_eq!(presented, 3);
    assert_eq!(recorder.stages.len(), 3);
}

#[test]
fn blocking_loop_with_raised_signal_presents_nothing() {
    let mut driver = SnowflakeDriver::new(Polygon::reference_seed(), 3).unwrap();
    let mut recorder = Recorder::default();
    let stop = StopSignal::new();
    stop.stop();
    assert_eq!(driver.run_blocking(&mut recorder, &stop, |_| {}), 0);
    assert!(recorder.stages.is_empty());
}

#[tokio::test(start_paused = true)]
async fn async_loop_presents_on_cadence_until_stopped() {
    let mut driver = SnowflakeDriver::new(Polygon::reference_seed(), 12).unwrap();
    let mut recorder = Recorder::default();
    let stop = StopSignal::new();

    let stopper = stop.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1250)).await;
        stopper.stop();
    });

    let presented = driver
        .run(&mut recorder, Duration::from_millis(500), &stop)
        .await
        .unwrap();
    assert_eq!(presented, 3);
    assert_eq!(recorder.stages, vec![(0, 3), (1, 12), (2, 48)]);
}

#[tokio::test]
async fn async_loop_rejects_zero_cadence() {
    let mut driver = SnowflakeDriver::new(Polygon::reference_seed(), 2).unwrap();
    let mut recorder = Recorder::default();
    let result = driver.run(&mut recorder, Duration::ZERO, &StopSignal::new()).await;
    assert!(matches!(result, Err(Error::Configuration(_))));
    assert!(recorder.stages.is_empty());
}
