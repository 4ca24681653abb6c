// src/containment.rs

use crate::geometry::{Point2, Polygon, Winding};

const EDGE_TOLERANCE: f64 = 1e-9;

/// Twice the signed area of triangle `(edge_start, edge_end, point)`:
/// positive when `point` is left of the directed edge.
#[inline(always)]
fn side_of(point: &Point2, edge_start: &Point2, edge_end: &Point2) -> f64 {
    (*edge_end - *edge_start).cross(&(*point - *edge_start))
}

/// Half-plane test for convex polygons of either winding. Points on an edge
/// count as inside.
pub fn contains_convex(polygon: &Polygon, point: &Point2) -> bool {
    let orientation = match polygon.winding() {
        Winding::CounterClockwise => 1.0,
        Winding::Clockwise => -1.0,
        Winding::Degenerate => return false,
    };
    polygon
        .edges()
        .all(|(start, end)| orientation * side_of(point, &start, &end) >= -EDGE_TOLERANCE)
}

/// Non-zero winding number test; handles concave outlines such as a
/// subdivided snowflake.
pub fn contains(polygon: &Polygon, point: &Point2) -> bool {
    winding_number(polygon, point) != 0
}

pub fn winding_number(polygon: &Polygon, point: &Point2) -> i32 {
    let mut wn = 0;
    for (start, end) in polygon.edges() {
        if start.y <= point.y {
            if end.y > point.y && side_of(point, &start, &end) > 0.0 {
                wn += 1;
            }
        } else if end.y <= point.y && side_of(point, &start, &end) < 0.0 {
            wn -= 1;
        }
    }
    wn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subdivision::subdivide;

    #[test]
    fn convex_test_handles_both_windings() {
        let cw = Polygon::reference_seed();
        let ccw = Polygon::new(cw.vertices().iter().rev().copied().collect()).unwrap();
        let centroid = Point2::new(0.0, 0.3);
        let outside = Point2::new(0.6, 0.6);
        for polygon in [&cw, &ccw] {
            assert!(contains_convex(polygon, &centroid));
            assert!(!contains_convex(polygon, &outside));
        }
    }

    #[test]
    fn convex_test_counts_edges_as_inside() {
        let seed = Polygon::reference_seed();
        assert!(contains_convex(&seed, &Point2::new(0.0, 0.0)));
    }

    #[test]
    fn winding_number_sign_tracks_orientation() {
        let cw = Polygon::reference_seed();
        let ccw = Polygon::new(cw.vertices().iter().rev().copied().collect()).unwrap();
        let centroid = Point2::new(0.0, 0.3);
        assert_eq!(winding_number(&cw, &centroid), -1);
        assert_eq!(winding_number(&ccw, &centroid), 1);
    }

    #[test]
    fn snowflake_points_and_notches() {
        let flake = subdivide(&Polygon::reference_seed());
        // Tip of the bump below the base edge.
        assert!(contains(&flake, &Point2::new(0.0, -0.2)));
        // Inside the bounding box but in the notch between two bumps.
        assert!(!contains(&flake, &Point2::new(0.45, -0.1)));
        // Far away.
        assert!(!contains(&flake, &Point2::new(2.0, 2.0)));
    }
}
