//! UV coordinate storage.
//!
//! This module provides the [`UvMap`] type holding the 2D parameterization
//! computed for each output vertex.

use nalgebra::Point2;

/// UV coordinates, one per output vertex, indexed by dense vertex id.
///
/// For a harmonic map onto the unit circle every coordinate satisfies
/// `|uv| <= 1`: boundary vertices lie exactly on the circle, interior
/// vertices strictly inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct UvMap {
    coords: Vec<Point2<f64>>,
}

impl UvMap {
    /// Create a UV map from per-vertex coordinates in id order.
    pub fn new(coords: Vec<Point2<f64>>) -> Self {
        Self { coords }
    }

    /// Get the UV coordinates of a vertex.
    #[inline]
    pub fn get(&self, id: usize) -> Point2<f64> {
        self.coords[id]
    }

    /// Get the number of UV coordinates.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Iterate over all coordinates with their vertex ids.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Point2<f64>)> + '_ {
        self.coords.iter().enumerate().map(|(i, &uv)| (i, uv))
    }

    /// Get the raw coordinates slice.
    pub fn as_slice(&self) -> &[Point2<f64>] {
        &self.coords
    }

    /// Compute the bounding box of the UV coordinates.
    ///
    /// Returns `None` if the map is empty. Useful for fitting overlay
    /// drawings of the flattened mesh.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        if self.coords.is_empty() {
            return None;
        }

        let mut min = self.coords[0];
        let mut max = self.coords[0];
        for uv in &self.coords {
            min.x = min.x.min(uv.x);
            min.y = min.y.min(uv.y);
            max.x = max.x.max(uv.x);
            max.y = max.y.max(uv.y);
        }

        Some((min, max))
    }
}
