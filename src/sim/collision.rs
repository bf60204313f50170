//! Swept collision tests for a moving ball against axis-aligned boxes
//!
//! The tricky part of Brickfall: a fast ball must never tunnel through a thin
//! block, so every test here sweeps the ball's whole displacement for the step.
//! The composite solver follows the moving-sphere-vs-AABB construction from
//! Ericson's *Real-Time Collision Detection*: ray-cast against the box grown by
//! the radius, then resolve corners exactly with capsule tests.
//!
//! All parameters `t` are fractions of the tested displacement and lie in `[0, 1]`.

use glam::Vec2;

use super::shapes::{Aabb, Capsule, Segment, Sphere, normalize_or};

/// Threshold for parallel rays and degenerate segments
pub const EPSILON: f32 = 1e-18;

/// Contact found by a swept test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Ball centre at the moment of contact
    pub point: Vec2,
    /// Unit surface normal, pointing away from the obstacle
    pub normal: Vec2,
    /// Time of impact as a fraction of the displacement
    pub t: f32,
}

/// Ray R(t) = origin + t * direction against a box (slab method).
///
/// Returns the entry parameter and entry point. A ray starting inside or
/// touching the box (`t` below [`EPSILON`]) is not a new hit.
pub fn intersect_ray_aabb(origin: Vec2, direction: Vec2, aabb: &Aabb) -> Option<(f32, Vec2)> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::MAX;

    for axis in 0..2 {
        let (p, d, lo, hi) = (origin[axis], direction[axis], aabb.min[axis], aabb.max[axis]);
        if d.abs() < EPSILON {
            // Parallel to this slab: must already be inside it
            if p < lo || p > hi {
                return None;
            }
        } else {
            let ood = 1.0 / d;
            let mut t1 = (lo - p) * ood;
            let mut t2 = (hi - p) * ood;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }
    }

    if t_min < EPSILON {
        return None;
    }

    Some((t_min, origin + direction * t_min))
}

/// Closest points between two segments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentClosestPoints {
    /// Parameter on the first segment
    pub s: f32,
    /// Parameter on the second segment
    pub t: f32,
    /// Closest point on the first segment
    pub c1: Vec2,
    /// Closest point on the second segment
    pub c2: Vec2,
    /// Squared distance between `c1` and `c2`
    pub dist_sq: f32,
}

/// Closest points of S1(s) = p1 + s(q1 - p1) and S2(t) = p2 + t(q2 - p2), s, t in [0, 1].
///
/// Zero-length segments fall back to point-segment or point-point distance.
pub fn closest_points_segment_segment(
    p1: Vec2,
    q1: Vec2,
    p2: Vec2,
    q2: Vec2,
) -> SegmentClosestPoints {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;

            // Parallel segments: pick s = 0 and let the t clamp fix it up
            let s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    SegmentClosestPoints {
        s,
        t,
        c1,
        c2,
        dist_sq: (c1 - c2).length_squared(),
    }
}

/// First parameter at which a segment enters a circle.
///
/// A segment that starts inside the circle hits at `t = 0`.
/// A segment that starts outside and points away never hits.
pub fn intersect_segment_sphere(segment: &Segment, sphere: &Sphere) -> Option<f32> {
    let d = segment.direction();
    let m = segment.a - sphere.center;
    let c = m.dot(m) - sphere.radius * sphere.radius;
    let a = d.dot(d);

    if a <= EPSILON {
        return (c <= 0.0).then_some(0.0);
    }

    let b = m.dot(d);
    if c > 0.0 && b > 0.0 {
        return None;
    }

    let discr = b * b - a * c;
    if discr < 0.0 {
        return None;
    }

    let t = (-b - discr.sqrt()) / a;
    if t > 1.0 {
        return None;
    }
    Some(t.max(0.0))
}

/// Segment against a capsule.
///
/// The capsule's core point nearest the segment is used as a circle centre and
/// the exact time of impact is solved against that circle.
pub fn intersect_segment_capsule(segment: &Segment, capsule: &Capsule) -> Option<HitInfo> {
    let closest = closest_points_segment_segment(segment.a, segment.b, capsule.a, capsule.b);
    if closest.dist_sq > capsule.radius * capsule.radius {
        return None;
    }

    let sphere = Sphere::new(closest.c2, capsule.radius);
    let t = intersect_segment_sphere(segment, &sphere)?;
    let point = segment.point_at(t);
    let backwards = normalize_or(-segment.direction(), Vec2::ZERO);

    Some(HitInfo {
        point,
        normal: normalize_or(point - sphere.center, backwards),
        t,
    })
}

/// Where the ray hit the grown box, relative to the original box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    /// Outside on one axis; payload is the outward face normal index
    Face { axis: usize, max_side: bool },
    /// Outside on both axes; payload is the corner index
    Vertex { corner: u8 },
    /// Neither; solved against the capsule joining two corners
    Edge { from: u8, to: u8 },
}

/// Classify a point on the grown box against the original box.
///
/// `u` has a bit per axis where the point is below `min`, `v` where it is above `max`.
fn classify(point: Vec2, aabb: &Aabb) -> Region {
    let mut u = 0u8;
    let mut v = 0u8;
    if point.x < aabb.min.x {
        u |= 1;
    }
    if point.x > aabb.max.x {
        v |= 1;
    }
    if point.y < aabb.min.y {
        u |= 2;
    }
    if point.y > aabb.max.y {
        v |= 2;
    }

    match u | v {
        3 => Region::Vertex { corner: v },
        m @ (1 | 2) => Region::Face {
            axis: (m >> 1) as usize,
            max_side: v != 0,
        },
        _ => Region::Edge { from: u ^ 3, to: v },
    }
}

fn face_normal(axis: usize, max_side: bool) -> Vec2 {
    let sign = if max_side { 1.0 } else { -1.0 };
    if axis == 0 {
        Vec2::new(sign, 0.0)
    } else {
        Vec2::new(0.0, sign)
    }
}

/// Earliest contact of a sphere moving by `displacement` against a box.
///
/// Returns `None` when the box is not reached within this displacement.
pub fn intersect_moving_sphere_aabb(
    sphere: &Sphere,
    displacement: Vec2,
    aabb: &Aabb,
) -> Option<HitInfo> {
    let grown = aabb.expanded(sphere.radius);
    let (t, point) = intersect_ray_aabb(sphere.center, displacement, &grown)?;
    if t > 1.0 {
        return None;
    }

    let path = Segment::from_ray(sphere.center, displacement);

    match classify(point, aabb) {
        Region::Face { axis, max_side } => Some(HitInfo {
            point,
            normal: face_normal(axis, max_side),
            t,
        }),
        Region::Vertex { corner } => {
            let along_x = Capsule::new(aabb.corner(corner), aabb.corner(corner ^ 1), sphere.radius);
            let along_y = Capsule::new(aabb.corner(corner), aabb.corner(corner ^ 2), sphere.radius);

            let first = intersect_segment_capsule(&path, &along_x);
            let second = intersect_segment_capsule(&path, &along_y);
            match (first, second) {
                (Some(a), Some(b)) => Some(if b.t < a.t { b } else { a }),
                (a, b) => a.or(b),
            }
        }
        Region::Edge { from, to } => {
            let edge = Capsule::new(aabb.corner(from), aabb.corner(to), sphere.radius);
            intersect_segment_capsule(&path, &edge)
        }
    }
}
