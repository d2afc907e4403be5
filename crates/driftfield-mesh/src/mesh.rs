//! Indexed triangle mesh with per-vertex normals and UVs.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A triangle list. Every three entries of `indices` form one triangle with
/// counter-clockwise winding when seen from outside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions in object space.
    pub positions: Vec<Vec3>,
    /// Unit normals, one per position.
    pub normals: Vec<Vec3>,
    /// Texture coordinates, one per position.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Move every vertex through `f`, which receives the vertex index and its
    /// current position. Normals are left stale; call
    /// [`compute_vertex_normals`](Self::compute_vertex_normals) afterwards.
    pub fn displace_vertices(&mut self, mut f: impl FnMut(usize, Vec3) -> Vec3) {
        for (i, p) in self.positions.iter_mut().enumerate() {
            *p = f(i, *p);
        }
    }

    /// Recompute normals by summing the (area-weighted) face normals of every
    /// triangle a vertex belongs to.
    ///
    /// On a mesh that does not share vertices between triangles this yields
    /// flat shading, which is what deformed asteroids want.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for [a, b, c] in self.triangles() {
            let face = face_normal(self.positions[a], self.positions[b], self.positions[c]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }

    /// Largest distance of any vertex from the origin.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }

    /// Geometric (unnormalized) normal of triangle `t`.
    pub fn triangle_normal(&self, [a, b, c]: [usize; 3]) -> Vec3 {
        face_normal(self.positions[a], self.positions[b], self.positions[c])
    }
}

/// Cross product of two triangle edges; its length is twice the area.
fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a)
}
