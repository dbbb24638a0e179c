//! Volume cells and their canonical tetrahedral wirings
//!
//! Every cell shape decomposes into a fixed set of tetrahedra and carries a
//! fixed list of outward counter-clockwise triangles. Vertex conventions:
//!
//! - **Tetrahedron** `0..4`: positively oriented (see [`Tetrahedron`]).
//! - **Triangular bipyramid** `0..5`: shared triangle `0,1,2` whose normal
//!   `(1−0)×(2−0)` points to apex `3`; apex `4` lies on the other side.
//! - **Triangular prism** `0..6`: triangle `0,1,2` with normal pointing to
//!   the opposite triangle `3,4,5`; edges `0–3`, `1–4`, `2–5`.
//! - **Hexahedron** `0..8`: bottom face `0,1,2,3` counter-clockwise seen
//!   from the top face `4,5,6,7`; edges `0–4`, `1–5`, `2–6`, `3–7`.

use std::cell::OnceCell;

use crate::physics::geometry::Plane;
use crate::physics::types::DVec3;

use super::tetrahedron::{TETRAHEDRON_FACES, Tetrahedron};

const BIPYRAMID_TETRAHEDRA: [[usize; 4]; 2] = [[0, 1, 2, 3], [0, 2, 1, 4]];
const BIPYRAMID_FACES: [[usize; 3]; 6] = [[0, 1, 3], [1, 2, 3], [2, 0, 3], [0, 2, 4], [2, 1, 4], [1, 0, 4]];

const PRISM_TETRAHEDRA: [[usize; 4]; 3] = [[0, 1, 2, 3], [1, 2, 3, 4], [2, 3, 4, 5]];
const PRISM_FACES: [[usize; 3]; 8] = [
    [0, 2, 1],
    [3, 4, 5],
    [0, 1, 4],
    [0, 4, 3],
    [1, 2, 5],
    [1, 5, 4],
    [2, 0, 3],
    [2, 3, 5],
];

/// Four corner tetrahedra plus the central one on alternate corners.
const HEXAHEDRON_TETRAHEDRA: [[usize; 4]; 5] = [[0, 1, 3, 4], [1, 2, 3, 6], [1, 4, 5, 6], [3, 4, 6, 7], [1, 3, 4, 6]];
const HEXAHEDRON_FACES: [[usize; 3]; 12] = [
    [0, 3, 2],
    [0, 2, 1],
    [4, 5, 6],
    [4, 6, 7],
    [0, 1, 5],
    [0, 5, 4],
    [1, 2, 6],
    [1, 6, 5],
    [2, 3, 7],
    [2, 7, 6],
    [3, 0, 4],
    [3, 4, 7],
];

/// The closed set of supported cell shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellShape {
    Tetrahedron,
    TriangularBipyramid,
    TriangularPrism,
    Hexahedron,
}

impl CellShape {
    /// Shape implied by a vertex count (4, 5, 6 or 8).
    pub fn from_vertex_count(count: usize) -> Option<Self> {
        match count {
            4 => Some(Self::Tetrahedron),
            5 => Some(Self::TriangularBipyramid),
            6 => Some(Self::TriangularPrism),
            8 => Some(Self::Hexahedron),
            _ => None,
        }
    }

    pub fn vertex_count(self) -> usize {
        match self {
            Self::Tetrahedron => 4,
            Self::TriangularBipyramid => 5,
            Self::TriangularPrism => 6,
            Self::Hexahedron => 8,
        }
    }

    /// Vertex quadruples of the canonical decomposition.
    pub fn tetrahedra_wiring(self) -> &'static [[usize; 4]] {
        match self {
            Self::Tetrahedron => &[[0, 1, 2, 3]],
            Self::TriangularBipyramid => &BIPYRAMID_TETRAHEDRA,
            Self::TriangularPrism => &PRISM_TETRAHEDRA,
            Self::Hexahedron => &HEXAHEDRON_TETRAHEDRA,
        }
    }

    /// Outward-CCW triangles (vertex indices).
    pub fn face_wiring(self) -> &'static [[usize; 3]] {
        match self {
            Self::Tetrahedron => &TETRAHEDRON_FACES,
            Self::TriangularBipyramid => &BIPYRAMID_FACES,
            Self::TriangularPrism => &PRISM_FACES,
            Self::Hexahedron => &HEXAHEDRON_FACES,
        }
    }

    /// Vertex pairs to swap after a reflection so the conventions above hold
    /// again (reflection reverses every winding).
    fn mirror_swaps(self) -> &'static [(usize, usize)] {
        match self {
            Self::Tetrahedron | Self::TriangularBipyramid => &[(1, 2)],
            Self::TriangularPrism => &[(1, 2), (4, 5)],
            Self::Hexahedron => &[(1, 3), (5, 7)],
        }
    }
}

/// A volume element with its mass and cached tetrahedral decomposition.
#[derive(Debug, Clone)]
pub struct VolumeCell {
    shape: CellShape,
    vertices: Vec<DVec3>,
    /// `None` means "derive from volume and distribution".
    pub mass: Option<f64>,
    pub mass_distribution: f64,
    decomposition: OnceCell<Vec<Tetrahedron>>,
}

impl VolumeCell {
    /// Builds a cell from owned vertices; `None` for an unsupported count.
    pub fn new(vertices: Vec<DVec3>) -> Option<Self> {
        let shape = CellShape::from_vertex_count(vertices.len())?;
        Some(Self {
            shape,
            vertices,
            mass: None,
            mass_distribution: 1.0,
            decomposition: OnceCell::new(),
        })
    }

    pub fn tetrahedron(tetra: &Tetrahedron) -> Self {
        Self {
            shape: CellShape::Tetrahedron,
            vertices: tetra.vertices.to_vec(),
            mass: tetra.mass,
            mass_distribution: tetra.mass_distribution,
            decomposition: OnceCell::new(),
        }
    }

    pub fn with_mass(mut self, mass: Option<f64>) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_mass_distribution(mut self, mass_distribution: f64) -> Self {
        self.mass_distribution = mass_distribution;
        self
    }

    pub fn shape(&self) -> CellShape {
        self.shape
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    fn decompose(&self) -> Vec<Tetrahedron> {
        self.shape
            .tetrahedra_wiring()
            .iter()
            .map(|&[a, b, c, d]| Tetrahedron {
                vertices: [self.vertices[a], self.vertices[b], self.vertices[c], self.vertices[d]],
                mass: None,
                mass_distribution: self.mass_distribution,
            })
            .collect()
    }

    /// Canonical tetrahedra, computed on first use.
    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        self.decomposition.get_or_init(|| self.decompose())
    }

    /// Takes the cached decomposition out for mutation; pair with
    /// [`restore_tetrahedra`](Self::restore_tetrahedra).
    pub(crate) fn take_tetrahedra(&mut self) -> Vec<Tetrahedron> {
        match self.decomposition.take() {
            Some(tetrahedra) => tetrahedra,
            None => self.decompose(),
        }
    }

    pub(crate) fn restore_tetrahedra(&mut self, tetrahedra: Vec<Tetrahedron>) {
        self.decomposition = OnceCell::from(tetrahedra);
    }

    pub fn volume(&self) -> f64 {
        match self.shape {
            CellShape::Tetrahedron => self.tetrahedra()[0].volume(),
            _ => self.tetrahedra().iter().map(Tetrahedron::volume).sum(),
        }
    }

    /// Volume-weighted centroid of the decomposition.
    pub fn centroid(&self) -> DVec3 {
        let tetrahedra = self.tetrahedra();
        if let [single] = tetrahedra {
            return single.centroid();
        }
        let (weighted, volume) = tetrahedra
            .iter()
            .fold((DVec3::ZERO, 0.0), |(acc, vol), t| {
                let v = t.volume();
                (acc + t.centroid() * v, vol + v)
            });
        if volume > 0.0 {
            weighted / volume
        } else {
            self.vertices.iter().copied().sum::<DVec3>() / self.vertices.len() as f64
        }
    }

    /// Outward-CCW triangles in world coordinates.
    pub fn faces(&self) -> Vec<[DVec3; 3]> {
        self.shape
            .face_wiring()
            .iter()
            .map(|&[i, j, k]| [self.vertices[i], self.vertices[j], self.vertices[k]])
            .collect()
    }

    /// Reflection of this cell through `plane`, rewired to keep outward faces.
    pub fn mirrored(&self, plane: &Plane) -> Self {
        let mut vertices: Vec<DVec3> = self.vertices.iter().map(|&v| plane.reflect_point(v)).collect();
        for &(i, j) in self.shape.mirror_swaps() {
            vertices.swap(i, j);
        }
        Self {
            shape: self.shape,
            vertices,
            mass: self.mass,
            mass_distribution: self.mass_distribution,
            decomposition: OnceCell::new(),
        }
    }
}
