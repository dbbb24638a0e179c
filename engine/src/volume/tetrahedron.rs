//! Tetrahedron: the leaf cell of every volume
//!
//! Vertex order convention: `(a, b, c, d)` is positively oriented when
//! `(b − a) × (c − a) · (d − a) > 0`. The outward counter-clockwise faces of
//! a positively oriented tetrahedron are then `(a,c,b)`, `(a,b,d)`,
//! `(b,c,d)` and `(a,d,c)`.

use crate::physics::types::{DMat3, DVec3};

/// Outward-CCW faces of a positively oriented tetrahedron (vertex indices).
pub const TETRAHEDRON_FACES: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];

/// Four vertices plus the mass they carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tetrahedron {
    pub vertices: [DVec3; 4],
    /// `None` until mass allocation assigns one.
    pub mass: Option<f64>,
    /// Relative density used when a total mass is spread over cells.
    pub mass_distribution: f64,
}

impl Tetrahedron {
    pub fn new(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> Self {
        Self::from_vertices([a, b, c, d])
    }

    pub fn from_vertices(vertices: [DVec3; 4]) -> Self {
        Self {
            vertices,
            mass: None,
            mass_distribution: 1.0,
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Six times the signed volume: `(b − a) · ((c − a) × (d − a))`.
    #[inline]
    fn triple_product(&self) -> f64 {
        let [a, b, c, d] = self.vertices;
        (b - a).cross(c - a).dot(d - a)
    }

    /// Volume with the orientation sign of the vertex order.
    pub fn signed_volume(&self) -> f64 {
        self.triple_product() / 6.0
    }

    /// `|a · (b × c)| / 6` over the edge vectors from the first vertex.
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    pub fn centroid(&self) -> DVec3 {
        let [a, b, c, d] = self.vertices;
        (a + b + c + d) * 0.25
    }

    /// Mass, treating an unassigned mass as zero.
    pub fn mass_or_zero(&self) -> f64 {
        self.mass.unwrap_or(0.0)
    }

    /// Swaps two vertices when needed so the orientation sign matches `sign`.
    pub fn oriented(mut self, sign: f64) -> Self {
        if self.triple_product() * sign < 0.0 {
            self.vertices.swap(1, 2);
        }
        self
    }

    /// Inertia tensor about the tetrahedron's own centroid.
    ///
    /// Closed form for a uniform-density tetrahedron: with vertex
    /// coordinates relative to the centroid, every second moment is a sum of
    /// products over the vertices, scaled by `6·mass / 120` (the Jacobian
    /// `6V` times density `mass / V`, over the integration constant).
    pub fn inertia_tensor(&self) -> DMat3 {
        let mass = self.mass_or_zero();
        let centroid = self.centroid();
        let rel = self.vertices.map(|v| v - centroid);
        let xs = rel.map(|v| v.x);
        let ys = rel.map(|v| v.y);
        let zs = rel.map(|v| v.z);

        let scale = 6.0 * mass / 120.0;
        let cxx = scale * sum_of_products(&xs, &xs);
        let cyy = scale * sum_of_products(&ys, &ys);
        let czz = scale * sum_of_products(&zs, &zs);
        let cxy = scale * sum_of_products(&xs, &ys);
        let cxz = scale * sum_of_products(&xs, &zs);
        let cyz = scale * sum_of_products(&ys, &zs);

        DMat3::from_cols(
            DVec3::new(cyy + czz, -cxy, -cxz),
            DVec3::new(-cxy, cxx + czz, -cyz),
            DVec3::new(-cxz, -cyz, cxx + cyy),
        )
    }

    /// Outward-CCW triangles in world coordinates.
    pub fn faces(&self) -> [[DVec3; 3]; 4] {
        let sign = self.triple_product();
        TETRAHEDRON_FACES.map(|[i, j, k]| {
            if sign >= 0.0 {
                [self.vertices[i], self.vertices[j], self.vertices[k]]
            } else {
                [self.vertices[i], self.vertices[k], self.vertices[j]]
            }
        })
    }
}

/// `Σ aᵢbᵢ + (Σ aᵢ)(Σ bᵢ)`, the pairwise-product sum of the tetrahedron
/// second-moment integrals.
fn sum_of_products(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let diagonal: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let sa: f64 = a.iter().sum();
    let sb: f64 = b.iter().sum();
    diagonal + sa * sb
}
