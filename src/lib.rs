// src/lib.rs

pub mod config;
pub mod containment;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod sequence;
pub mod subdivision;

pub use config::{AnimationSettings, SnowflakeConfig};
pub use driver::{Presenter, SnowflakeDriver, StopSignal};
pub use error::{Error, Result};
pub use geometry::{Point2, Polygon, Winding};
pub use sequence::{Frame, SnowflakeSequence};
pub use subdivision::{subdivide, subdivide_with, vertex_count_after, Bulge};
