//! Geometry primitives for swept collision
//!
//! Vectors are `glam::Vec2`. Boxes are axis-aligned, y grows downward (screen space),
//! so `min` is the top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    #[inline]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box of the given full size centred on `center`
    #[inline]
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Corner selected by a 2-bit index.
    ///
    /// Bit 0 picks the x side (0 = min, 1 = max), bit 1 picks the y side.
    /// The region classification in `collision` relies on this exact layout.
    #[inline]
    pub fn corner(&self, index: u8) -> Vec2 {
        Vec2::new(
            if index & 1 != 0 { self.max.x } else { self.min.x },
            if index & 2 != 0 { self.max.y } else { self.min.y },
        )
    }

    /// Grow the box by `amount` on every side (Minkowski sum with a disc)
    #[inline]
    pub fn expanded(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(amount),
            max: self.max + Vec2::splat(amount),
        }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// A line segment from `a` to `b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec2,
    pub b: Vec2,
}

impl Segment {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2) -> Self {
        Self { a, b }
    }

    /// Segment from `origin` along `displacement`
    #[inline]
    pub fn from_ray(origin: Vec2, displacement: Vec2) -> Self {
        Self {
            a: origin,
            b: origin + displacement,
        }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.b - self.a
    }

    /// Point at parameter `t` (0 = a, 1 = b)
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.a + self.direction() * t
    }
}

/// A circle: the ball's collision volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec2,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub const fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// A segment thickened by a radius (stadium shape)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub a: Vec2,
    pub b: Vec2,
    pub radius: f32,
}

impl Capsule {
    #[inline]
    pub const fn new(a: Vec2, b: Vec2, radius: f32) -> Self {
        Self { a, b, radius }
    }
}

/// Reflect `v` about a unit normal: v' = v - 2(v·n)n
#[inline]
pub fn reflect(v: Vec2, normal: Vec2) -> Vec2 {
    v - 2.0 * v.dot(normal) * normal
}

/// Normalize `v`, or return `fallback` when `v` has no usable length
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    v.try_normalize().unwrap_or(fallback)
}
