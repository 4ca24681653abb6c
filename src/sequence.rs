// src/sequence.rs

use std::sync::Arc;

use log::debug;

use crate::error::{Error, Result};
use crate::geometry::Polygon;
use crate::subdivision::{subdivide_with, Bulge};

/// One stage of the animation.
#[derive(Clone, Debug)]
pub struct Frame {
    /// 0 for the seed, up to `max_iterations - 1`.
    pub iteration: usize,
    pub polygon: Arc<Polygon>,
}

/// Endless `seed, 1, 2, ..., N-1, seed, ...` stream of subdivided polygons.
///
/// Each stage is computed when it is requested, from the previous stage
/// only. After the last stage the original seed is handed out again.
#[derive(Clone, Debug)]
pub struct SnowflakeSequence {
    seed: Arc<Polygon>,
    current: Option<Frame>,
    max_iterations: usize,
    bulge: Bulge,
}

impl SnowflakeSequence {
    pub fn new(seed: Polygon, max_iterations: usize) -> Result<Self> {
        Self::with_bulge(seed, max_iterations, Bulge::Outward)
    }

    pub fn with_bulge(seed: Polygon, max_iterations: usize, bulge: Bulge) -> Result<Self> {
        if max_iterations < 1 {
            return Err(Error::Configuration(format!(
                "max_iterations must be at least 1, got {}",
                max_iterations
            )));
        }
        Ok(Self {
            seed: Arc::new(seed),
            current: None,
            max_iterations,
            bulge,
        })
    }

    pub fn seed(&self) -> &Arc<Polygon> {
        &self.seed
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn bulge(&self) -> Bulge {
        self.bulge
    }

    /// Last frame handed out, if any.
    pub fn current(&self) -> Option<&Frame> {
        self.current.as_ref()
    }

    /// Next call yields the seed again.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Produces the next stage; the iterator form of this never ends.
    pub fn advance(&mut self) -> Frame {
        let frame = match self.current.take() {
            Some(previous) if previous.iteration + 1 < self.max_iterations => {
                let polygon = subdivide_with(&previous.polygon, self.bulge);
                Frame {
                    iteration: previous.iteration + 1,
                    polygon: Arc::new(polygon),
                }
            }
            _ => self.seed_frame(),
        };
        debug!(
            "Stage {}/{}: {} vertices",
            frame.iteration,
            self.max_iterations - 1,
            frame.polygon.len()
        );
        self.current = Some(frame.clone());
        frame
    }

    fn seed_frame(&self) -> Frame {
        Frame {
            iteration: 0,
            polygon: Arc::clone(&self.seed),
        }
    }
}

impl Iterator for SnowflakeSequence {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        Some(self.advance())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_iterations_is_rejected() {
        let err = SnowflakeSequence::new(Polygon::reference_seed(), 0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn cycles_back_to_the_same_seed() {
        let mut sequence = SnowflakeSequence::new(Polygon::reference_seed(), 4).unwrap();
        let iterations: Vec<usize> = sequence.by_ref().take(9).map(|f| f.iteration).collect();
        assert_eq!(iterations, vec![0, 1, 2, 3, 0, 1, 2, 3, 0]);

        let current = sequence.current().unwrap();
        assert!(Arc::ptr_eq(&current.polygon, sequence.seed()));
        assert_eq!(*current.polygon, Polygon::reference_seed());
    }

    #[test]
    fn single_iteration_repeats_the_seed() {
        let mut sequence = SnowflakeSequence::new(Polygon::reference_seed(), 1).unwrap();
        for frame in sequence.by_ref().take(3) {
            assert_eq!(frame.iteration, 0);
            assert_eq!(frame.polygon.len(), 3);
        }
    }

    #[test]
    fn reset_restarts_mid_cycle() {
        let mut sequence = SnowflakeSequence::new(Polygon::reference_seed(), 5).unwrap();
        sequence.nth(2);
        assert_eq!(sequence.current().unwrap().iteration, 2);
        sequence.reset();
        assert!(sequence.current().is_none());
        assert_eq!(sequence.next().unwrap().iteration, 0);
    }

    #[test]
    fn vertex_counts_grow_by_four() {
        let sequence = SnowflakeSequence::new(Polygon::reference_seed(), 4).unwrap();
        let counts: Vec<usize> = sequence.take(4).map(|f| f.polygon.len()).collect();
        assert_eq!(counts, vec![3, 12, 48, 192]);
    }
}
