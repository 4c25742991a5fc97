//! Tube mesh output and per-segment mass properties.

use bevy_heavy::ComputeMassProperties3d;
use bevy_math::primitives::Cylinder;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// The indexed triangle mesh produced by interpreting a symbol string.
///
/// Vertices are not shared between segments: each `F` contributes two fresh
/// rings of `num_sides` vertices and `2 × num_sides` triangles. Tubes are
/// open-ended. Triangles wind counter-clockwise when seen from outside.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TubeMesh {
    /// Vertex positions, in emission order.
    pub vertices: Vec<Vec3>,

    /// Zero-based vertex indices, three per triangle.
    pub indices: Vec<u32>,

    /// One record per drawn segment, in emission order.
    pub segments: Vec<TubeSegment>,
}

impl TubeMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates over the index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Vertex positions as a flat array, ready for a GPU vertex buffer.
    pub fn positions(&self) -> Vec<[f32; 3]> {
        self.vertices.iter().map(|v| v.to_array()).collect()
    }

    /// Axis-aligned bounds `(min, max)`, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }

    /// Sum of the segments' solid cylinder volumes.
    pub fn volume(&self) -> f32 {
        self.segments.iter().map(TubeSegment::volume).sum()
    }

    /// Total mass of the segments as solid cylinders of the given density.
    pub fn mass(&self, density: f32) -> f32 {
        self.segments.iter().map(|s| s.mass(density)).sum()
    }
}

/// A single drawn tube segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TubeSegment {
    /// Centre of the proximal ring.
    pub start: Vec3,
    /// Centre of the distal ring.
    pub end: Vec3,
    /// Ring radius (half the turtle's thickness, clamped to be non-negative).
    pub radius: f32,
}

impl TubeSegment {
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// The segment as a `bevy_math` cylinder (aligned along Y).
    pub fn to_cylinder(&self) -> Cylinder {
        Cylinder::new(self.radius, self.length())
    }

    pub fn volume(&self) -> f32 {
        std::f32::consts::PI * self.radius * self.radius * self.length()
    }

    /// Mass in kg for the given density (kg/m^3), computed via `bevy_heavy`.
    pub fn mass(&self, density: f32) -> f32 {
        self.to_cylinder().mass(density)
    }
}
