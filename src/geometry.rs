// src/geometry.rs

use std::ops::{Add, Div, Mul, Sub};

use crate::error::{Error, Result};

/// Fewest vertices that still enclose an area.
pub const MIN_VERTICES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Point2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product; positive when `other` is
    /// counter-clockwise from `self`.
    pub fn cross(&self, other: &Point2) -> f64 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        (*other - *self).length()
    }

    /// Rotates the vector a quarter turn counter-clockwise.
    pub fn perp_left(&self) -> Point2 {
        Point2::new(-self.y, self.x)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2 {
    type Output = Point2;
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point2 {
    type Output = Point2;
    fn mul(self, rhs: f64) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point2 {
    type Output = Point2;
    fn div(self, rhs: f64) -> Point2 {
        Point2::new(self.x / rhs, self.y / rhs)
    }
}

impl From<[f64; 2]> for Point2 {
    fn from(p: [f64; 2]) -> Self {
        Point2::new(p[0], p[1])
    }
}

/// Rotational direction of a polygon's vertex order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Winding {
    CounterClockwise,
    Clockwise,
    /// Zero signed area, e.g. all points collinear.
    Degenerate,
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point2,
    pub max: Point2,
}

impl Bounds {
    pub fn center(&self) -> Point2 {
        (self.min + self.max) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min: Point2::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point2::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

/// Closed loop of points; the last vertex connects back to the first.
///
/// Always holds at least [`MIN_VERTICES`] finite points. Polygons are never
/// edited after construction, a subdivision step builds a new one.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point2>) -> Result<Self> {
        if vertices.len() < MIN_VERTICES {
            return Err(Error::InvalidPolygon(format!(
                "Polygon must have at least {} vertices, got {}",
                MIN_VERTICES,
                vertices.len()
            )));
        }
        if let Some(index) = vertices.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidPolygon(format!(
                "Vertex {} has a non-finite coordinate: {:?}",
                index, vertices[index]
            )));
        }
        Ok(Self { vertices })
    }

    /// Builds a polygon from interleaved `x, y` coordinates.
    pub fn from_flat(coords: &[f64]) -> Result<Self> {
        if coords.len() % 2 != 0 {
            return Err(Error::InvalidPolygon(format!(
                "Coordinate sequence has odd length {}",
                coords.len()
            )));
        }
        let vertices = coords
            .chunks_exact(2)
            .map(|c| Point2::new(c[0], c[1]))
            .collect();
        Self::new(vertices)
    }

    /// Equilateral triangle with unit edges resting on the x axis.
    pub fn reference_seed() -> Self {
        Self {
            vertices: vec![
                Point2::new(-0.5, 0.0),
                Point2::new(0.0, 3.0_f64.sqrt() / 2.0),
                Point2::new(0.5, 0.0),
            ],
        }
    }

    /// Used by the subdivider, whose output is valid whenever its input is.
    pub(crate) fn from_vertices_unchecked(vertices: Vec<Point2>) -> Self {
        debug_assert!(vertices.len() >= MIN_VERTICES);
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Never true for a constructed polygon.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Every edge `(start, end)` in order, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        let count = self.vertices.len();
        (0..count).map(move |i| (self.vertices[i], self.vertices[(i + 1) % count]))
    }

    pub fn to_flat(&self) -> Vec<f64> {
        self.vertices.iter().flat_map(|p| [p.x, p.y]).collect()
    }

    pub fn perimeter(&self) -> f64 {
        self.edges().map(|(p, q)| p.distance(&q)).sum()
    }

    /// Shoelace area, positive for counter-clockwise order.
    pub fn signed_area(&self) -> f64 {
        let twice: f64 = self.edges().map(|(p, q)| p.cross(&q)).sum();
        twice / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn winding(&self) -> Winding {
        let area = self.signed_area();
        if area > 0.0 {
            Winding::CounterClockwise
        } else if area < 0.0 {
            Winding::Clockwise
        } else {
            Winding::Degenerate
        }
    }

    pub fn bounds(&self) -> Bounds {
        let first = self.vertices[0];
        self.vertices.iter().skip(1).fold(
            Bounds { min: first, max: first },
            |b, p| Bounds {
                min: Point2::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Point2::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        )
    }
}
