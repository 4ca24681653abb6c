// src/subdivision.rs

use clap::ValueEnum;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point2, Polygon, Winding};

/// Which side of each edge the new apex is raised on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Bulge {
    /// Away from the interior: the classic snowflake.
    #[default]
    Outward,
    /// Into the interior: the anti-snowflake.
    Inward,
}

impl Bulge {
    /// +1.0 selects the left normal `(-dy, dx)`, -1.0 the right normal.
    ///
    /// The interior lies to the left of every edge of a counter-clockwise
    /// loop, so outward means the right normal there. Degenerate loops fall
    /// back to the left normal.
    fn normal_sign(self, winding: Winding) -> f64 {
        let outward = match winding {
            Winding::CounterClockwise => -1.0,
            Winding::Clockwise | Winding::Degenerate => 1.0,
        };
        match self {
            Bulge::Outward => outward,
            Bulge::Inward => -outward,
        }
    }
}

/// Replaces every edge with four edges of a third of its length, bulging
/// outward. See [`subdivide_with`].
pub fn subdivide(polygon: &Polygon) -> Polygon {
    subdivide_with(polygon, Bulge::Outward)
}

/// One Koch step: each edge `P -> Q` contributes `P`, the two trisection
/// points, and the apex of the equilateral bump between them, in that order.
///
/// The output always has four times as many vertices as the input.
pub fn subdivide_with(polygon: &Polygon, bulge: Bulge) -> Polygon {
    let sign = bulge.normal_sign(polygon.winding());
    let bump_height_ratio = 3.0_f64.sqrt() / 6.0;

    let mut vertices = Vec::with_capacity(polygon.len() * 4);
    for (p, q) in polygon.edges() {
        let near = Point2::new((2.0 * p.x + q.x) / 3.0, (2.0 * p.y + q.y) / 3.0);
        let far = Point2::new((p.x + 2.0 * q.x) / 3.0, (p.y + 2.0 * q.y) / 3.0);

        let mid = Point2::new((p.x + q.x) / 2.0, (p.y + q.y) / 2.0);
        let x_diff = bump_height_ratio * (q.x - p.x);
        let y_diff = bump_height_ratio * (q.y - p.y);
        let apex = Point2::new(mid.x - sign * y_diff, mid.y + sign * x_diff);

        vertices.push(p);
        vertices.push(near);
        vertices.push(apex);
        vertices.push(far);
    }

    trace!(
        "Subdivided {} vertices into {} ({:?})",
        polygon.len(),
        vertices.len(),
        bulge
    );
    Polygon::from_vertices_unchecked(vertices)
}

/// Vertex count after `iterations` steps from a seed of `seed_len` points,
/// or `None` if it does not fit in `usize`.
pub fn vertex_count_after(seed_len: usize, iterations: u32) -> Option<usize> {
    4usize
        .checked_pow(iterations)
        .and_then(|factor| factor.checked_mul(seed_len))
}
