// src/driver.rs

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::error::{Error, Result};
use crate::geometry::Polygon;
use crate::sequence::{Frame, SnowflakeSequence};
use crate::subdivision::Bulge;

/// Receives every stage exactly once, in order.
pub trait Presenter {
    fn present(&mut self, polygon: &Polygon, iteration: usize);
}

impl<F> Presenter for F
where
    F: FnMut(&Polygon, usize),
{
    fn present(&mut self, polygon: &Polygon, iteration: usize) {
        self(polygon, iteration)
    }
}

/// Cancellation flag shared between a running loop and whoever tears it down.
#[derive(Clone)]
pub struct StopSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn stop(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.sender.borrow()
    }

    /// Resolves once `stop` has been called, immediately if it already was.
    pub async fn stopped(&self) {
        let mut receiver = self.sender.subscribe();
        let _ = receiver.wait_for(|stopped| *stopped).await;
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopSignal")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

/// Owns the current stage and hands each one to a [`Presenter`].
///
/// Timing is up to the caller: `step` from a frame callback, `run_blocking`
/// with a custom pacing closure, or `run` on a tokio interval.
#[derive(Debug)]
pub struct SnowflakeDriver {
    sequence: SnowflakeSequence,
    frames_presented: u64,
}

impl SnowflakeDriver {
    pub fn new(seed: Polygon, max_iterations: usize) -> Result<Self> {
        Self::with_bulge(seed, max_iterations, Bulge::Outward)
    }

    pub fn with_bulge(seed: Polygon, max_iterations: usize, bulge: Bulge) -> Result<Self> {
        let sequence = SnowflakeSequence::with_bulge(seed, max_iterations, bulge)?;
        Ok(Self {
            sequence,
            frames_presented: 0,
        })
    }

    pub fn sequence(&self) -> &SnowflakeSequence {
        &self.sequence
    }

    /// Most recently presented stage.
    pub fn current(&self) -> Option<&Frame> {
        self.sequence.current()
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Moves to the next stage and presents it.
    pub fn step<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Frame {
        let frame = self.sequence.advance();
        presenter.present(&frame.polygon, frame.iteration);
        self.frames_presented += 1;
        frame
    }

    /// The next `step` presents the seed.
    pub fn reset(&mut self) {
        debug!("Driver reset to seed");
        self.sequence.reset();
    }

    /// Steps until `stop` is raised, calling `pace` after each presentation.
    /// Returns how many frames this call presented.
    pub fn run_blocking<P, F>(&mut self, presenter: &mut P, stop: &StopSignal, mut pace: F) -> u64
    where
        P: Presenter + ?Sized,
        F: FnMut(&Frame),
    {
        info!(
            "Starting blocking loop ({} iterations)",
            self.sequence.max_iterations()
        );
        let start = self.frames_presented;
        while !stop.is_stopped() {
            let frame = self.step(presenter);
            pace(&frame);
        }
        let presented = self.frames_presented - start;
        info!("Blocking loop stopped after {} frames", presented);
        presented
    }

    /// Presents a stage immediately and then once per `cadence` until `stop`
    /// is raised. Returns how many frames this call presented.
    pub async fn run<P>(&mut self, presenter: &mut P, cadence: Duration, stop: &StopSignal) -> Result<u64>
    where
        P: Presenter + ?Sized,
    {
        if cadence.is_zero() {
            return Err(Error::Configuration(
                "Animation cadence must be greater than zero".to_string(),
            ));
        }
        info!(
            "Starting animation loop ({} iterations, every {:?})",
            self.sequence.max_iterations(),
            cadence
        );

        let start = self.frames_presented;
        let mut ticker = tokio::time::interval(cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop.stopped() => break,
                _ = ticker.tick() => {}
            }
            self.step(presenter);
        }

        let presented = self.frames_presented - start;
        info!("Animation loop stopped after {} frames", presented);
        Ok(presented)
    }
}
