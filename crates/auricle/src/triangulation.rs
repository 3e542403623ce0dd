//! Spherical triangulation of the measured directions.
//!
//! The Delaunay triangulation of points on a sphere is the boundary of their 3d convex hull, so this builds the hull
//! incrementally: seed a tetrahedron from extreme points, then fold the remaining points in one at a time by deleting
//! the faces each point can see and re-closing the opened horizon with a fan of new faces.  Directions are looked up
//! by casting a ray from the listening point and intersecting the front-facing hull faces, the same scheme HRIR
//! sphere renderers use on their pre-triangulated meshes.
//!
//! Exactly three directions degenerate into a single triangle.  Corpora whose directions are collinear, or coplanar
//! with four or more points, span no volume and cannot be triangulated at all.
use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::math::Vec3;

/// Signed distances below this are "behind the face" during hull construction.  Points on a unit sphere separated by
/// the bank's duplicate tolerance sit many orders of magnitude above it.
const VISIBILITY_EPS: f64 = 1e-12;

/// A ray hit closer to the origin than this is a plane through the listening point, not a face of a surrounding
/// sphere; treat it as a miss.
const MIN_HIT_DISTANCE: f64 = 1e-6;

/// Slack on the containment test of the located triangle.  Rays that graze an edge may numerically land in either of
/// the two adjacent faces; the slack keeps them from landing in neither.
const CONTAINMENT_EPS: f64 = 1e-9;

/// One triangle of the hull.  `a`, `b`, `c` index the bank's entries; winding is counterclockwise seen from outside,
/// so `normal` points away from the interior.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Face {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    normal: Vec3,
}

impl Face {
    fn new(a: usize, b: usize, c: usize, vertices: &[Vec3]) -> Face {
        let normal = (vertices[b] - vertices[a])
            .cross(vertices[c] - vertices[a])
            .normalized();
        Face { a, b, c, normal }
    }

    /// Signed distance of `point` above this face's plane.
    fn height_of(&self, point: Vec3, vertices: &[Vec3]) -> f64 {
        self.normal.dot(point - vertices[self.a])
    }
}

/// The three corpus indices of a located triangle and the barycentric weight of each.
///
/// Weights are non-negative and sum to one.
#[derive(Copy, Clone, Debug)]
pub(crate) struct BarycentricWeights {
    pub sources: [usize; 3],
    pub weights: [f64; 3],
}

impl BarycentricWeights {
    /// The position of the largest weight, as an index into `sources`.
    pub fn dominant(&self) -> usize {
        let mut best = 0;
        for i in 1..3 {
            if self.weights[i] > self.weights[best] {
                best = i;
            }
        }
        best
    }
}

/// The memoized triangulation a [crate::FilterBank] owns.
#[derive(Clone, Debug)]
pub(crate) struct Triangulation {
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Triangulation {
    /// Triangulate `vertices`, which must be the bank's directions projected onto the unit sphere, index for index.
    pub fn build(vertices: Vec<Vec3>) -> Result<Triangulation> {
        let faces = match vertices.len() {
            0..=2 => return Err(Error::DegenerateGeometry(vertices.len())),
            3 => vec![lone_triangle(&vertices)?],
            _ => incremental_hull(&vertices)?,
        };

        log::debug!(
            "triangulated {} directions into {} faces",
            vertices.len(),
            faces.len()
        );

        Ok(Triangulation { vertices, faces })
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Find the triangle a direction passes through and the barycentric weights of the crossing point.
    ///
    /// `None` means the ray from the listening point misses every face: the direction is outside the hull of the
    /// measured directions.
    pub fn locate(&self, direction: Vec3) -> Option<BarycentricWeights> {
        let dir = direction.normalized();

        for face in &self.faces {
            // Only exit faces: the ray leaves the hull through a face whose outward normal it runs along.
            let denom = face.normal.dot(dir);
            if denom <= VISIBILITY_EPS {
                continue;
            }

            let t = face.normal.dot(self.vertices[face.a]) / denom;
            if t <= MIN_HIT_DISTANCE {
                continue;
            }

            let hit = dir.scale(t);
            if let Some(weights) = barycentric_in_triangle(
                hit,
                self.vertices[face.a],
                self.vertices[face.b],
                self.vertices[face.c],
            ) {
                log::trace!(
                    "direction located in face ({}, {}, {}) with weights {:?}",
                    face.a,
                    face.b,
                    face.c,
                    weights
                );
                return Some(BarycentricWeights {
                    sources: [face.a, face.b, face.c],
                    weights,
                });
            }
        }

        None
    }
}

/// Barycentric coordinates of `p` relative to the triangle `(a, b, c)`, or `None` if `p` lies outside it.
///
/// Negative weights within [CONTAINMENT_EPS] are clamped to zero and the triple renormalized, so a `Some` answer
/// always carries non-negative weights summing to one.
fn barycentric_in_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Option<[f64; 3]> {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;

    let d00 = v0.dot(v0);
    let d01 = v0.dot(v1);
    let d11 = v1.dot(v1);
    let d20 = v2.dot(v0);
    let d21 = v2.dot(v1);
    let denom = d00 * d11 - d01 * d01;
    if denom.abs() < VISIBILITY_EPS {
        // Degenerate sliver; no meaningful coordinates exist.
        return None;
    }

    let v = (d11 * d20 - d01 * d21) / denom;
    let w = (d00 * d21 - d01 * d20) / denom;
    let u = 1.0 - v - w;

    if u < -CONTAINMENT_EPS || v < -CONTAINMENT_EPS || w < -CONTAINMENT_EPS {
        return None;
    }

    let clamped = [u.max(0.0), v.max(0.0), w.max(0.0)];
    let sum = clamped[0] + clamped[1] + clamped[2];
    Some([clamped[0] / sum, clamped[1] / sum, clamped[2] / sum])
}

/// The three-direction corpus: one triangle, wound so the normal points away from the listening point where the
/// plane allows a choice.
fn lone_triangle(vertices: &[Vec3]) -> Result<Face> {
    let face = Face::new(0, 1, 2, vertices);
    if face.normal.norm() == 0.0 {
        // Collinear.
        return Err(Error::DegenerateGeometry(vertices.len()));
    }
    if face.normal.dot(vertices[0]) < 0.0 {
        return Ok(Face::new(0, 2, 1, vertices));
    }
    Ok(face)
}

fn incremental_hull(vertices: &[Vec3]) -> Result<Vec<Face>> {
    let seed = seed_tetrahedron(vertices)?;
    let mut faces = Vec::with_capacity(2 * vertices.len());

    // The four seed faces, each wound so the leftover seed vertex is behind it.
    for (tri, opposite) in [
        ([seed[0], seed[1], seed[2]], seed[3]),
        ([seed[0], seed[1], seed[3]], seed[2]),
        ([seed[0], seed[2], seed[3]], seed[1]),
        ([seed[1], seed[2], seed[3]], seed[0]),
    ] {
        let mut face = Face::new(tri[0], tri[1], tri[2], vertices);
        if face.height_of(vertices[opposite], vertices) > 0.0 {
            face = Face::new(tri[0], tri[2], tri[1], vertices);
        }
        faces.push(face);
    }

    for point in 0..vertices.len() {
        if seed.contains(&point) {
            continue;
        }
        add_point(&mut faces, vertices, point);
    }

    Ok(faces)
}

/// Pick four vertices spanning a volume: the two most separated along a first sweep, the one farthest off their
/// line, and the one farthest off their plane.
fn seed_tetrahedron(vertices: &[Vec3]) -> Result<[usize; 4]> {
    let degenerate = || Error::DegenerateGeometry(vertices.len());

    let i0 = 0;
    let i1 = argmax(vertices, |p| (p - vertices[i0]).norm()).ok_or_else(degenerate)?;

    let line = (vertices[i1] - vertices[i0]).normalized();
    let i2 = argmax(vertices, |p| (p - vertices[i0]).cross(line).norm()).ok_or_else(degenerate)?;

    let plane_normal = (vertices[i1] - vertices[i0])
        .cross(vertices[i2] - vertices[i0])
        .normalized();
    let i3 = argmax(vertices, |p| plane_normal.dot(p - vertices[i0]).abs()).ok_or_else(degenerate)?;

    Ok([i0, i1, i2, i3])
}

/// The index maximizing `score`, or `None` when no vertex clears the degeneracy threshold.
fn argmax(vertices: &[Vec3], score: impl Fn(Vec3) -> f64) -> Option<usize> {
    let mut best = None;
    let mut best_score = 1e-9;
    for (index, p) in vertices.iter().enumerate() {
        let s = score(*p);
        if s > best_score {
            best_score = s;
            best = Some(index);
        }
    }
    best
}

fn add_point(faces: &mut Vec<Face>, vertices: &[Vec3], point: usize) {
    let p = vertices[point];

    let mut visible_edges: SmallVec<[(usize, usize); 24]> = SmallVec::new();
    let mut any_visible = false;
    faces.retain(|face| {
        if face.height_of(p, vertices) > VISIBILITY_EPS {
            any_visible = true;
            visible_edges.push((face.a, face.b));
            visible_edges.push((face.b, face.c));
            visible_edges.push((face.c, face.a));
            false
        } else {
            true
        }
    });

    if !any_visible {
        // On the sphere this can only be a point lying exactly in the plane of a coplanar patch (a polar cap with no
        // pole measurement).  It contributes no volume, so the hull is unchanged; coincident queries are served by
        // the bank's exact-match shortcut regardless.
        log::debug!("direction {point} lies on the existing hull; leaving triangulation as is");
        return;
    }

    // The horizon is every visible edge whose mirror twin stayed invisible.  New faces keep the edge's direction, so
    // the fan around `point` winds outward like the faces it replaces.
    for (u, v) in visible_edges.iter().copied() {
        if !visible_edges.contains(&(v, u)) {
            faces.push(Face::new(u, v, point, vertices));
        }
    }
}
