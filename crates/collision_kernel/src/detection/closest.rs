//! Closest-point routines for segments and triangles

use crate::foundation::math::{tolerance, Vec3};

/// Closest point to `point` on the segment `start`..`end`
pub fn closest_point_on_segment(point: &Vec3, start: &Vec3, end: &Vec3) -> Vec3 {
    let edge = end - start;
    let length_squared = edge.magnitude_squared();
    if length_squared < tolerance::POSITION_EPSILON * tolerance::POSITION_EPSILON {
        return *start;
    }
    let t = ((point - start).dot(&edge) / length_squared).clamp(0.0, 1.0);
    start + edge * t
}

/// Closest pair of points between segments `p1..q1` and `p2..q2`
///
/// Returns the point on the first segment, then the point on the second.
pub fn closest_points_between_segments(p1: &Vec3, q1: &Vec3, p2: &Vec3, q2: &Vec3) -> (Vec3, Vec3) {
    let eps = tolerance::POSITION_EPSILON * tolerance::POSITION_EPSILON;
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.magnitude_squared();
    let e = d2.magnitude_squared();
    let f = d2.dot(&r);

    if a <= eps && e <= eps {
        return (*p1, *p2);
    }

    let (s, t) = if a <= eps {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= eps {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let s = if denom > eps * a * e {
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

    (p1 + d1 * s, p2 + d2 * t)
}

/// Squared distance between two segments
pub fn segment_segment_distance_squared(p1: &Vec3, q1: &Vec3, p2: &Vec3, q2: &Vec3) -> f32 {
    let (c1, c2) = closest_points_between_segments(p1, q1, p2, q2);
    (c1 - c2).magnitude_squared()
}

/// Whether `point`, assumed on the triangle plane, lies inside the triangle
///
/// Sign test of each edge cross product against the face normal.
pub fn point_in_triangle(point: &Vec3, corners: &[Vec3; 3], normal: &Vec3) -> bool {
    (0..3).all(|i| {
        let start = corners[i];
        let end = corners[(i + 1) % 3];
        (end - start).cross(&(point - start)).dot(normal) >= -tolerance::POSITION_EPSILON
    })
}

/// Closest point to `point` on the boundary edges of a triangle
pub fn closest_point_on_triangle_edges(point: &Vec3, corners: &[Vec3; 3]) -> Vec3 {
    let mut best = closest_point_on_segment(point, &corners[0], &corners[1]);
    let mut best_distance = (best - point).magnitude_squared();
    for i in 1..3 {
        let candidate = closest_point_on_segment(point, &corners[i], &corners[(i + 1) % 3]);
        let distance = (candidate - point).magnitude_squared();
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}

/// Barycentric weights of the point of triangle `a b c` closest to `point`
///
/// Walks the Voronoi regions of the vertices, then the edges, then the face.
/// A weight of zero means the matching corner does not contribute, which is
/// what the GJK simplex reduction relies on.
pub fn closest_triangle_weights(point: &Vec3, a: &Vec3, b: &Vec3, c: &Vec3) -> [f32; 3] {
    let ab = b - a;
    let ac = c - a;

    let ap = point - a;
    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return [1.0, 0.0, 0.0];
    }

    let bp = point - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return [0.0, 1.0, 0.0];
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return [1.0 - v, v, 0.0];
    }

    let cp = point - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return [0.0, 0.0, 1.0];
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return [1.0 - w, 0.0, w];
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return [0.0, 1.0 - w, w];
    }

    let sum = va + vb + vc;
    if sum.abs() <= f32::MIN_POSITIVE {
        // Collinear corners: the face has no interior.
        return closest_edge_weights(point, a, b, c);
    }
    let v = vb / sum;
    let w = vc / sum;
    [1.0 - v - w, v, w]
}

fn closest_edge_weights(point: &Vec3, a: &Vec3, b: &Vec3, c: &Vec3) -> [f32; 3] {
    let segment_t = |start: &Vec3, end: &Vec3| {
        let edge = end - start;
        let length_squared = edge.magnitude_squared();
        if length_squared <= f32::MIN_POSITIVE {
            0.0
        } else {
            ((point - start).dot(&edge) / length_squared).clamp(0.0, 1.0)
        }
    };
    let t_ab = segment_t(a, b);
    let t_bc = segment_t(b, c);
    let t_ca = segment_t(c, a);
    let candidates = [
        [1.0 - t_ab, t_ab, 0.0],
        [0.0, 1.0 - t_bc, t_bc],
        [t_ca, 0.0, 1.0 - t_ca],
    ];
    let mut best = candidates[0];
    let mut best_distance = f32::INFINITY;
    for weights in candidates {
        let distance = (a * weights[0] + b * weights[1] + c * weights[2] - point).magnitude_squared();
        if distance < best_distance {
            best = weights;
            best_distance = distance;
        }
    }
    best
}

/// Closest point to `point` on the solid triangle `corners`
pub fn closest_point_on_triangle(point: &Vec3, corners: &[Vec3; 3]) -> Vec3 {
    let [u, v, w] = closest_triangle_weights(point, &corners[0], &corners[1], &corners[2]);
    corners[0] * u + corners[1] * v + corners[2] * w
}
