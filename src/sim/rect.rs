//! Axis-aligned rectangle geometry for the player box and platforms
//!
//! Screen coordinates: x grows to the right, y grows downward, so a
//! rectangle's `top` is its smallest y.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height (must be positive)
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Center point (the pivot the renderer rotates about)
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Penetration depth along each axis, or `None` when not intersecting
    ///
    /// Each component is the smaller of the two distances needed to push
    /// `self` out of `other` along that axis.
    pub fn penetration(&self, other: &Rect) -> Option<Vec2> {
        if !self.intersects(other) {
            return None;
        }
        let x = (self.right() - other.left()).min(other.right() - self.left());
        let y = (self.bottom() - other.top()).min(other.bottom() - self.top());
        Some(Vec2::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        // Sitting exactly on top
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        // Flush to the right
        let beside = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&below));
        assert!(!a.intersects(&beside));
    }

    #[test]
    fn test_penetration() {
        // Player box sunk 0.6 into a wide floor
        let player = Rect::new(100.0, 420.6, 50.0, 80.0);
        let floor = Rect::new(0.0, 500.0, 800.0, 100.0);
        let depth = player.penetration(&floor).unwrap();
        assert!((depth.y - 0.6).abs() < 1e-4);
        // Pushing left out of the floor is the shorter way: 150 vs 700
        assert_eq!(depth.x, 150.0);

        let far = Rect::new(900.0, 0.0, 10.0, 10.0);
        assert!(player.penetration(&far).is_none());
    }
}
