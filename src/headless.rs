// src/headless.rs

use log::info;

use koch_snowflake::config::AnimationSettings;
use koch_snowflake::geometry::Polygon;
use koch_snowflake::{Presenter, SnowflakeDriver, StopSignal};

/// Reports every stage through the log; raises `stop` once `limit` stages
/// have been shown.
pub struct LogPresenter {
    limit: Option<u64>,
    presented: u64,
    stop: StopSignal,
}

impl LogPresenter {
    pub fn new(limit: Option<u64>, stop: StopSignal) -> Self {
        Self { limit, presented: 0, stop }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl Presenter for LogPresenter {
    fn present(&mut self, polygon: &Polygon, iteration: usize) {
        info!(
            "Iteration {:>2}: {:>9} vertices, perimeter {:.6}, area {:.6}",
            iteration,
            polygon.len(),
            polygon.perimeter(),
            polygon.area()
        );
        self.presented += 1;
        if self.limit.is_some_and(|limit| self.presented >= limit) {
            self.stop.stop();
        }
    }
}

/// Runs the animation loop without a window until Ctrl-C or the frame limit.
pub async fn run(settings: AnimationSettings, frames: Option<u64>) -> koch_snowflake::Result<u64> {
    if frames == Some(0) {
        return Err(koch_snowflake::Error::Configuration(
            "frame limit must be at least 1".to_string(),
        ));
    }
    let mut driver = SnowflakeDriver::with_bulge(settings.seed, settings.max_iterations, settings.bulge)?;
    let stop = StopSignal::new();

    let ctrl_c_stop = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl-C received, stopping");
            ctrl_c_stop.stop();
        }
    });

    let mut presenter = LogPresenter::new(frames, stop.clone());
    driver.run(&mut presenter, settings.interval, &stop).await?;
    Ok(presenter.presented())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn stops_after_frame_limit() {
        let settings = AnimationSettings {
            seed: Polygon::reference_seed(),
            max_iterations: 3,
            bulge: Default::default(),
            interval: Duration::from_millis(500),
        };
        assert_eq!(run(settings, Some(5)).await.unwrap(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_frame_limit_presents_nothing() {
        let settings = AnimationSettings {
            seed: Polygon::reference_seed(),
            max_iterations: 3,
            bulge: Default::default(),
            interval: Duration::from_millis(500),
        };
        assert!(matches!(
            run(settings, Some(0)).await,
            Err(koch_snowflake::Error::Configuration(_))
        ));
    }

    #[test]
    fn presenter_raises_stop_at_limit() {
        let stop = StopSignal::new();
        let mut presenter = LogPresenter::new(Some(2), stop.clone());
        let seed = Polygon::reference_seed();
        presenter.present(&seed, 0);
        assert!(!stop.is_stopped());
        presenter.present(&seed, 1);
        assert!(stop.is_stopped());
        assert_eq!(presenter.presented(), 2);
    }
}
