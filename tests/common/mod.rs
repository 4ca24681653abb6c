// tests/common/mod.rs

use koch_snowflake::geometry::{Point2, Polygon};
use rand::Rng;

/// Random convex polygon, counter-clockwise: perturbed angles on a circle of
/// random radius.
pub fn generate_convex_polygon(
    rng: &mut impl Rng,
    center: Point2,
    avg_radius: f64,
    num_vertices: usize,
) -> Polygon {
    let step = 2.0 * std::f64::consts::PI / num_vertices as f64;
    let max_perturbation = step * 0.3;
    let radius = rng.gen_range(avg_radius * 0.8..avg_radius * 1.2);

    let points = (0..num_vertices)
        .map(|i| {
            let angle = i as f64 * step + rng.gen_range(-max_perturbation..max_perturbation);
            Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect();

    Polygon::new(points).expect("generated polygon has at least three finite vertices")
}

pub fn reversed(polygon: &Polygon) -> Polygon {
    Polygon::new(polygon.vertices().iter().rev().copied().collect()).unwrap()
}
