//! Mesh shapes for the demo scenes.
//!
//! All generators emit unit-scale geometry centered on the origin; scene
//! scale lives in the model matrix. The bubble scene additionally keeps its
//! base sphere host-side and re-displaces it every tick.

use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec2, Vec3};
use optics::noise::gradient3;

use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

pub(crate) const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

pub(crate) fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Torus,
    Box,
    Sphere,
    Cylinder,
    Dodecahedron,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Torus,
        Shape::Box,
        Shape::Sphere,
        Shape::Cylinder,
        Shape::Dodecahedron,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Shape::Torus => "torus",
            Shape::Box => "box",
            Shape::Sphere => "sphere",
            Shape::Cylinder => "cylinder",
            Shape::Dodecahedron => "dodecahedron",
        }
    }

    /// The shape after this one in panel cycling order.
    pub fn next(self) -> Shape {
        let index = Shape::ALL.iter().position(|&shape| shape == self).unwrap_or(0);
        Shape::ALL[(index + 1) % Shape::ALL.len()]
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .iter()
            .copied()
            .find(|shape| shape.name() == value)
            .ok_or_else(|| format!("unknown shape '{value}'"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn generate(shape: Shape) -> Self {
        match shape {
            Shape::Torus => torus(1.0, 0.5, 100, 100),
            Shape::Box => cuboid(1.0),
            Shape::Sphere => uv_sphere(1.0, 96, 96),
            Shape::Cylinder => cylinder(0.7, 2.0, 64),
            Shape::Dodecahedron => dodecahedron(),
        }
    }

    pub fn bounding_sphere(&self) -> BoundingSphere {
        if self.vertices.is_empty() {
            return BoundingSphere { center: Vec3::ZERO, radius: 0.0 };
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for vertex in &self.vertices {
            let p = Vec3::from(vertex.position);
            min = min.min(p);
            max = max.max(p);
        }
        let center = (min + max) * 0.5;
        let radius = self
            .vertices
            .iter()
            .map(|vertex| (Vec3::from(vertex.position) - center).length())
            .fold(0.0f32, f32::max);
        BoundingSphere { center, radius }
    }
}

fn grid_indices(rows: u32, columns: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity((rows * columns * 6) as usize);
    let stride = columns + 1;
    for row in 0..rows {
        for column in 0..columns {
            let a = row * stride + column;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }
    indices
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((radial_segments + 1) * (tubular_segments + 1)) as usize);
    for i in 0..=radial_segments {
        let v = i as f32 / radial_segments as f32 * TAU;
        for j in 0..=tubular_segments {
            let u = j as f32 / tubular_segments as f32 * TAU;
            let center = Vec3::new(u.cos() * radius, 0.0, u.sin() * radius);
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                tube * v.sin(),
                (radius + tube * v.cos()) * u.sin(),
            );
            let normal = (position - center).normalize();
            vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: [j as f32 / tubular_segments as f32, i as f32 / radial_segments as f32],
            });
        }
    }
    MeshData {
        vertices,
        indices: grid_indices(radial_segments, tubular_segments),
    }
}

fn cuboid(half: f32) -> MeshData {
    // One quad per face so the normals stay flat.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::NEG_Z, Vec3::X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, up, right) in FACES {
        let base = vertices.len() as u32;
        for (du, dv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (normal + right * du + up * dv) * half;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                uv: [du * 0.5 + 0.5, dv * 0.5 + 0.5],
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData { vertices, indices }
}

fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut vertices =
        Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);
    for i in 0..=height_segments {
        let v = i as f32 / height_segments as f32;
        let phi = v * PI;
        for j in 0..=width_segments {
            let u = j as f32 / width_segments as f32;
            let theta = u * TAU;
            let normal = Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            vertices.push(Vertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [u, v],
            });
        }
    }
    MeshData {
        vertices,
        indices: grid_indices(height_segments, width_segments),
    }
}

fn cylinder(radius: f32, height: f32, radial_segments: u32) -> MeshData {
    let half = height * 0.5;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side wall.
    for i in 0..=1u32 {
        let y = if i == 0 { half } else { -half };
        for j in 0..=radial_segments {
            let theta = j as f32 / radial_segments as f32 * TAU;
            let normal = Vec3::new(theta.cos(), 0.0, theta.sin());
            vertices.push(Vertex {
                position: (normal * radius + Vec3::Y * y).to_array(),
                normal: normal.to_array(),
                uv: [j as f32 / radial_segments as f32, i as f32],
            });
        }
    }
    indices.extend(grid_indices(1, radial_segments));

    // Caps, fan-triangulated around a center vertex.
    for (sign, winding_flip) in [(1.0f32, false), (-1.0, true)] {
        let normal = Vec3::Y * sign;
        let center = vertices.len() as u32;
        vertices.push(Vertex {
            position: (Vec3::Y * half * sign).to_array(),
            normal: normal.to_array(),
            uv: [0.5, 0.5],
        });
        let ring_start = vertices.len() as u32;
        for j in 0..=radial_segments {
            let theta = j as f32 / radial_segments as f32 * TAU;
            vertices.push(Vertex {
                position: Vec3::new(theta.cos() * radius, half * sign, theta.sin() * radius)
                    .to_array(),
                normal: normal.to_array(),
                uv: [theta.cos() * 0.5 + 0.5, theta.sin() * 0.5 + 0.5],
            });
        }
        for j in 0..radial_segments {
            let (a, b) = (ring_start + j, ring_start + j + 1);
            if winding_flip {
                indices.extend_from_slice(&[center, a, b]);
            } else {
                indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    MeshData { vertices, indices }
}

fn dodecahedron() -> MeshData {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let r = 1.0 / t;
    #[rustfmt::skip]
    let raw: [[f32; 3]; 20] = [
        [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0],
        [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
        [0.0, -r, -t], [0.0, -r, t], [0.0, r, -t], [0.0, r, t],
        [-r, -t, 0.0], [-r, t, 0.0], [r, -t, 0.0], [r, t, 0.0],
        [-t, 0.0, -r], [t, 0.0, -r], [-t, 0.0, r], [t, 0.0, r],
    ];
    #[rustfmt::skip]
    let tris: [u32; 108] = [
        3, 11, 7, 3, 7, 15, 3, 15, 13,
        7, 19, 17, 7, 17, 6, 7, 6, 15,
        17, 4, 8, 17, 8, 10, 17, 10, 6,
        8, 0, 16, 8, 16, 2, 8, 2, 10,
        0, 12, 1, 0, 1, 18, 0, 18, 16,
        6, 10, 2, 6, 2, 13, 6, 13, 15,
        2, 16, 18, 2, 18, 3, 2, 3, 13,
        18, 1, 9, 18, 9, 11, 18, 11, 3,
        4, 14, 12, 4, 12, 0, 4, 0, 8,
        11, 9, 5, 11, 5, 19, 11, 19, 7,
        19, 5, 14, 19, 14, 4, 19, 4, 17,
        1, 12, 14, 1, 14, 5, 1, 5, 9,
    ];
    // Projected onto the unit sphere; smooth normals equal positions.
    let vertices = raw
        .iter()
        .map(|&p| {
            let n = Vec3::from(p).normalize();
            Vertex {
                position: n.to_array(),
                normal: n.to_array(),
                uv: [n.z.atan2(n.x) / TAU + 0.5, n.y * 0.5 + 0.5],
            }
        })
        .collect();
    MeshData { vertices, indices: tris.to_vec() }
}

/// Recomputes smooth vertex normals by area-weighted face accumulation.
pub fn recompute_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for vertex in vertices.iter_mut() {
        vertex.normal = [0.0; 3];
    }
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        let pa = Vec3::from(vertices[a].position);
        let pb = Vec3::from(vertices[b].position);
        let pc = Vec3::from(vertices[c].position);
        let face = (pb - pa).cross(pc - pa);
        for index in [a, b, c] {
            let n = Vec3::from(vertices[index].normal) + face;
            vertices[index].normal = n.to_array();
        }
    }
    for vertex in vertices.iter_mut() {
        vertex.normal = Vec3::from(vertex.normal).normalize_or_zero().to_array();
    }
}

/// Noise-displaces the base sphere for the bubble scene.
///
/// `amplitude` couples to pointer distance from the viewport center;
/// `rotation` carries the pointer-driven spin of the displaced shell. The
/// field is deterministic for a fixed `seed` and `time`.
pub fn displace_sphere(
    base: &MeshData,
    time: f32,
    amplitude: f32,
    rotation: Vec2,
    seed: f32,
) -> Vec<Vertex> {
    let spin = Mat3::from_rotation_z(rotation.y) * Mat3::from_rotation_y(rotation.x);
    let mut vertices = base.vertices.clone();
    for vertex in vertices.iter_mut() {
        let p = Vec3::from(vertex.position);
        let sample = (p + Vec3::ONE) * 1.2 + Vec3::new(time * 0.1, time * 0.1, 0.0);
        let ratio = gradient3(sample, seed) * 0.125 * (amplitude + 0.1) + 0.8;
        vertex.position = (spin * (p * ratio)).to_array();
    }
    recompute_normals(&mut vertices, &base.indices);
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_produces_valid_triangles() {
        for shape in Shape::ALL {
            let mesh = MeshData::generate(shape);
            assert!(!mesh.vertices.is_empty(), "{}", shape.name());
            assert_eq!(mesh.indices.len() % 3, 0, "{}", shape.name());
            let max = *mesh.indices.iter().max().unwrap();
            assert!((max as usize) < mesh.vertices.len(), "{}", shape.name());
        }
    }

    #[test]
    fn normals_are_unit_length() {
        for shape in Shape::ALL {
            for vertex in MeshData::generate(shape).vertices {
                let length = Vec3::from(vertex.normal).length();
                assert!((length - 1.0).abs() < 1e-3, "{}: {length}", shape.name());
            }
        }
    }

    #[test]
    fn bounding_spheres_track_shape_extents() {
        let torus = MeshData::generate(Shape::Torus).bounding_sphere();
        assert!((torus.radius - 1.5).abs() < 0.05, "torus {}", torus.radius);
        assert!(torus.center.length() < 1e-3);

        let sphere = MeshData::generate(Shape::Sphere).bounding_sphere();
        assert!((sphere.radius - 1.0).abs() < 0.01);

        let cuboid = MeshData::generate(Shape::Box).bounding_sphere();
        assert!((cuboid.radius - 3.0f32.sqrt()).abs() < 0.01);
    }

    #[test]
    fn swapping_shape_changes_the_bounding_volume() {
        let a = MeshData::generate(Shape::Torus).bounding_sphere();
        let b = MeshData::generate(Shape::Sphere).bounding_sphere();
        assert!((a.radius - b.radius).abs() > 0.1);
    }

    #[test]
    fn shape_cycle_visits_every_variant() {
        let mut shape = Shape::Torus;
        let mut seen = vec![shape];
        for _ in 0..Shape::ALL.len() - 1 {
            shape = shape.next();
            assert!(!seen.contains(&shape));
            seen.push(shape);
        }
        assert_eq!(shape.next(), Shape::Torus);
    }

    #[test]
    fn shape_names_round_trip() {
        for shape in Shape::ALL {
            assert_eq!(shape.name().parse::<Shape>().unwrap(), shape);
        }
        assert!("teapot".parse::<Shape>().is_err());
    }

    #[test]
    fn displacement_is_bounded_and_deterministic() {
        let base = MeshData::generate(Shape::Sphere);
        let a = displace_sphere(&base, 2.0, 0.5, Vec2::new(0.3, -0.2), 7.0);
        let b = displace_sphere(&base, 2.0, 0.5, Vec2::new(0.3, -0.2), 7.0);
        for (va, vb) in a.iter().zip(&b) {
            assert_eq!(va.position, vb.position);
            let radius = Vec3::from(va.position).length();
            // ratio stays within 0.8 +- 0.125 * (amplitude + 0.1)
            assert!((0.7..=0.9).contains(&radius), "radius {radius}");
        }
    }

    #[test]
    fn recomputed_normals_face_outward_on_a_sphere() {
        let base = MeshData::generate(Shape::Sphere);
        let mut vertices = base.vertices.clone();
        recompute_normals(&mut vertices, &base.indices);
        let mut aligned = 0;
        for vertex in &vertices {
            let p = Vec3::from(vertex.position).normalize();
            if Vec3::from(vertex.normal).dot(p) > 0.9 {
                aligned += 1;
            }
        }
        // Pole seams aside, normals should agree with the radial direction.
        assert!(aligned as f32 / vertices.len() as f32 > 0.95);
    }
}
