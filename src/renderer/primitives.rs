//! Procedural meshes used when no model file is configured.
//!
//! All meshes wind counter-clockwise when seen from outside, with uv origin
//! at the top-left.

use super::vertex::{v, MeshVertex};
use std::f32::consts::PI;

/// Per-face basis: normal, tangent (u axis) and bitangent (v axis) with
/// `tangent × bitangent == normal`.
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

const FACE_CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

/// Axis-aligned cube centred on the origin, four vertices per face so each
/// face gets a flat normal and its own 0..1 uv square.
pub fn cube_mesh(half_extent: f32) -> (Vec<MeshVertex>, Vec<u32>) {
    let mut verts = Vec::with_capacity(24);
    for (normal, tangent, bitangent) in CUBE_FACES {
        for (s, t) in FACE_CORNERS {
            let pos = [
                (normal[0] + s * tangent[0] + t * bitangent[0]) * half_extent,
                (normal[1] + s * tangent[1] + t * bitangent[1]) * half_extent,
                (normal[2] + s * tangent[2] + t * bitangent[2]) * half_extent,
            ];
            let uv = [(s + 1.0) * 0.5, 1.0 - (t + 1.0) * 0.5];
            verts.push(v(pos, normal, uv));
        }
    }

    let idx = (0..6u32)
        .flat_map(|f| {
            let o = f * 4;
            [o, o + 1, o + 2, o, o + 2, o + 3]
        })
        .collect::<Vec<_>>();

    (verts, idx)
}

/// Flat grid on the XZ plane facing +Y. Uvs span 0..1 across the whole
/// plane; callers tile them in the shader.
pub fn plane_mesh(half_extent: f32, subdivisions: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let n = subdivisions.max(1);
    let row = n + 1;
    let mut verts = Vec::with_capacity((row * row) as usize);
    let mut indices = Vec::with_capacity((n * n * 6) as usize);

    for k in 0..=n {
        for i in 0..=n {
            let fu = i as f32 / n as f32;
            let fv = k as f32 / n as f32;
            let x = -half_extent + 2.0 * half_extent * fu;
            let z = -half_extent + 2.0 * half_extent * fv;
            verts.push(v([x, 0.0, z], [0.0, 1.0, 0.0], [fu, fv]));
        }
    }

    for k in 0..n {
        for i in 0..n {
            let a = k * row + i;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    (verts, indices)
}

pub fn sphere_mesh(radius: f32, segments: u32, rings: u32) -> (Vec<MeshVertex>, Vec<u32>) {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
    let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for segment in 0..=segments {
            let theta = 2.0 * PI * segment as f32 / segments as f32;
            let normal = [ring_radius * theta.cos(), y, ring_radius * theta.sin()];
            let pos = [normal[0] * radius, normal[1] * radius, normal[2] * radius];
            let uv = [
                segment as f32 / segments as f32,
                ring as f32 / rings as f32,
            ];
            vertices.push(v(pos, normal, uv));
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    (vertices, indices)
}
