// src/engine_lib/mod.rs
pub mod camera;
pub mod controller;

pub use camera::Camera2D;
pub use controller::{AnimationController, ControlAction};
