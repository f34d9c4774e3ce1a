//! Static platforms and the read-only registry the resolver walks

use serde::{Deserialize, Serialize};

use super::rect::Rect;

/// A static obstacle. Immutable once the level is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Collision bounds
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Positive, finite extents
    pub fn is_well_formed(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Ordered platform list. Order matters for last-write-wins corrections.
///
/// Geometry must already be validated (see [`crate::level::Level::validate`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlatformRegistry {
    platforms: Vec<Platform>,
}

impl PlatformRegistry {
    pub fn new(platforms: Vec<Platform>) -> Self {
        debug_assert!(
            platforms.iter().all(Platform::is_well_formed),
            "platform geometry must be validated before building the registry"
        );
        Self { platforms }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Platform> {
        self.platforms.iter()
    }

    pub fn as_slice(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn len(&self) -> usize {
        self.platforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.platforms.is_empty()
    }
}

impl<'a> IntoIterator for &'a PlatformRegistry {
    type Item = &'a Platform;
    type IntoIter = std::slice::Iter<'a, Platform>;

    fn into_iter(self) -> Self::IntoIter {
        self.platforms.iter()
    }
}
