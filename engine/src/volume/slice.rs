//! Plane slicing of tetrahedra
//!
//! Used to split hull volumes at the waterline: the part below the plane is
//! the displaced volume, the part above is dry. Each vertex is classified by
//! its signed distance to the plane (near-zero distances snap to "on the
//! plane") and one of four topologies applies:
//!
//! | on plane | above / below | pieces                                        |
//! |----------|---------------|-----------------------------------------------|
//! | 1        | 1 / 2         | tetrahedron + bipyramid-wired pair            |
//! | 2        | 1 / 1         | one tetrahedron per side                      |
//! | 0        | 1 / 3         | tetrahedron + prism-wired triple              |
//! | 0        | 2 / 2         | prism-wired triple per side                   |
//!
//! (and their mirror images). Every piece keeps the parent's orientation
//! sign, and an assigned parent mass is shared in proportion to volume.

use crate::physics::geometry::Plane;
use crate::physics::types::{DVec3, NEAR_ZERO};

use super::cell::CellShape;
use super::tetrahedron::Tetrahedron;

/// Outcome of [`slice_with_plane`].
#[derive(Debug, Clone, PartialEq)]
pub enum SliceResult {
    /// The plane does not cut the tetrahedron's interior. Distinct from a
    /// split where the requested side happens to be empty.
    NoIntersection,
    /// Pieces on each requested side; a side that was not requested is empty.
    Split {
        above: Vec<Tetrahedron>,
        below: Vec<Tetrahedron>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Above,
    Below,
    On,
}

/// Point where edge `a → b` crosses the plane.
fn crossing(plane: &Plane, a: DVec3, b: DVec3) -> DVec3 {
    plane.intersect_line(a, b).unwrap_or_else(|| {
        // Endpoints on opposite sides cannot be parallel to the plane; keep
        // a sane point if round-off says otherwise.
        let da = plane.distance_to_point(a);
        let db = plane.distance_to_point(b);
        a.lerp(b, da / (da - db))
    })
}

/// Tetrahedra wired from `shape`'s canonical decomposition over `vertices`.
fn wire(shape: CellShape, vertices: &[DVec3]) -> Vec<[DVec3; 4]> {
    shape
        .tetrahedra_wiring()
        .iter()
        .map(|&[a, b, c, d]| [vertices[a], vertices[b], vertices[c], vertices[d]])
        .collect()
}

/// Splits `tetra` by `plane`.
///
/// Sides not requested through `keep_above` / `keep_below` come back empty.
pub fn slice_with_plane(tetra: &Tetrahedron, plane: &Plane, keep_above: bool, keep_below: bool) -> SliceResult {
    let v = tetra.vertices;
    let distances = v.map(|p| plane.distance_to_point(p));
    let sides = distances.map(|d| {
        if d.abs() <= NEAR_ZERO {
            Side::On
        } else if d > 0.0 {
            Side::Above
        } else {
            Side::Below
        }
    });

    let collect = |side: Side| -> Vec<usize> { (0..4).filter(|&i| sides[i] == side).collect() };
    let above = collect(Side::Above);
    let below = collect(Side::Below);
    let on = collect(Side::On);

    if above.is_empty() || below.is_empty() {
        return SliceResult::NoIntersection;
    }

    // Pieces as (vertices, is_above).
    let mut pieces: Vec<([DVec3; 4], bool)> = Vec::with_capacity(6);

    match (on.len(), above.len(), below.len()) {
        // One vertex on the plane, the lone vertex on one side.
        (1, 1, 2) | (1, 2, 1) => {
            let lone_above = above.len() == 1;
            let (lone, pair) = if lone_above { (above[0], &below) } else { (below[0], &above) };
            let o = on[0];
            let p = crossing(plane, v[lone], v[pair[0]]);
            let q = crossing(plane, v[lone], v[pair[1]]);

            // Lone side: the parent with the pair replaced by their crossings.
            let mut small = v;
            small[pair[0]] = p;
            small[pair[1]] = q;
            pieces.push((small, lone_above));

            // Other side: quad pyramid apex `o` over pair[0], pair[1], q, p,
            // wired as a bipyramid around the shared triangle (o, p, pair[1]).
            // A quad pyramid is exactly 2 tetrahedra; a third would be
            // degenerate or overlap.
            let bipyramid = [v[o], p, v[pair[1]], v[pair[0]], q];
            for t in wire(CellShape::TriangularBipyramid, &bipyramid) {
                pieces.push((t, !lone_above));
            }
        }
        // Two on the plane: the crossing of the remaining edge splits it in two.
        (2, 1, 1) => {
            let a = above[0];
            let b = below[0];
            let p = crossing(plane, v[a], v[b]);

            let mut upper = v;
            upper[b] = p;
            pieces.push((upper, true));

            let mut lower = v;
            lower[a] = p;
            pieces.push((lower, false));
        }
        // Lone vertex on one side, three on the other.
        (0, 1, 3) | (0, 3, 1) => {
            let lone_above = above.len() == 1;
            let (lone, others) = if lone_above { (above[0], &below) } else { (below[0], &above) };
            let crossings: Vec<DVec3> = others.iter().map(|&i| crossing(plane, v[lone], v[i])).collect();

            let mut cap = v;
            for (&i, &c) in others.iter().zip(&crossings) {
                cap[i] = c;
            }
            pieces.push((cap, lone_above));

            let prism = [
                crossings[0],
                crossings[1],
                crossings[2],
                v[others[0]],
                v[others[1]],
                v[others[2]],
            ];
            for t in wire(CellShape::TriangularPrism, &prism) {
                pieces.push((t, !lone_above));
            }
        }
        // Two and two: a wedge on each side.
        (0, 2, 2) => {
            let (a0, a1) = (above[0], above[1]);
            let (b0, b1) = (below[0], below[1]);
            let p00 = crossing(plane, v[a0], v[b0]);
            let p01 = crossing(plane, v[a0], v[b1]);
            let p10 = crossing(plane, v[a1], v[b0]);
            let p11 = crossing(plane, v[a1], v[b1]);

            let upper = [v[a0], p00, p01, v[a1], p10, p11];
            for t in wire(CellShape::TriangularPrism, &upper) {
                pieces.push((t, true));
            }
            let lower = [v[b0], p00, p10, v[b1], p01, p11];
            for t in wire(CellShape::TriangularPrism, &lower) {
                pieces.push((t, false));
            }
        }
        _ => return SliceResult::NoIntersection,
    }

    let parent_sign = tetra.signed_volume().signum();
    let parent_volume = tetra.volume();
    let make = |vertices: [DVec3; 4]| -> Tetrahedron {
        let mut piece = Tetrahedron {
            vertices,
            mass: None,
            mass_distribution: tetra.mass_distribution,
        }
        .oriented(parent_sign);
        if let Some(mass) = tetra.mass {
            piece.mass = Some(if parent_volume > 0.0 {
                mass * piece.volume() / parent_volume
            } else {
                0.0
            });
        }
        piece
    };

    let mut above_pieces = Vec::new();
    let mut below_pieces = Vec::new();
    for (vertices, is_above) in pieces {
        match (is_above, keep_above, keep_below) {
            (true, true, _) => above_pieces.push(make(vertices)),
            (false, _, true) => below_pieces.push(make(vertices)),
            _ => {}
        }
    }

    SliceResult::Split {
        above: above_pieces,
        below: below_pieces,
    }
}

/// Volume of the part of `tetra` below `plane`.
pub fn volume_below(tetra: &Tetrahedron, plane: &Plane) -> f64 {
    match slice_with_plane(tetra, plane, false, true) {
        SliceResult::Split { below, .. } => below.iter().map(Tetrahedron::volume).sum(),
        SliceResult::NoIntersection => {
            let submerged = tetra
                .vertices
                .iter()
                .any(|&p| plane.distance_to_point(p) < -NEAR_ZERO);
            if submerged { tetra.volume() } else { 0.0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_tetra() -> Tetrahedron {
        Tetrahedron::new(DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z).with_mass(6.0)
    }

    fn split(tetra: &Tetrahedron, plane: &Plane) -> (Vec<Tetrahedron>, Vec<Tetrahedron>) {
        match slice_with_plane(tetra, plane, true, true) {
            SliceResult::Split { above, below } => (above, below),
            SliceResult::NoIntersection => panic!("expected a split"),
        }
    }

    fn total_volume(pieces: &[Tetrahedron]) -> f64 {
        pieces.iter().map(Tetrahedron::volume).sum()
    }

    fn assert_conserved(tetra: &Tetrahedron, above: &[Tetrahedron], below: &[Tetrahedron]) {
        assert_abs_diff_eq!(total_volume(above) + total_volume(below), tetra.volume(), epsilon = 1e-12);
        let mass: f64 = above.iter().chain(below).map(Tetrahedron::mass_or_zero).sum();
        assert_abs_diff_eq!(mass, tetra.mass_or_zero(), epsilon = 1e-9);
        for piece in above.iter().chain(below) {
            assert!(piece.signed_volume() * tetra.signed_volume() >= 0.0);
        }
    }

    #[test]
    fn test_no_intersection() {
        let t = unit_tetra();
        let plane = Plane::from_point_normal(DVec3::new(0.0, 0.0, 2.0), DVec3::Z);
        assert_eq!(slice_with_plane(&t, &plane, true, true), SliceResult::NoIntersection);

        // Touching a face is not a cut either.
        let face = Plane::from_point_normal(DVec3::ZERO, DVec3::Z);
        assert_eq!(slice_with_plane(&t, &face, true, true), SliceResult::NoIntersection);
    }

    #[test]
    fn test_one_vs_three() {
        let t = unit_tetra();
        let plane = Plane::from_point_normal(DVec3::new(0.0, 0.0, 0.5), DVec3::Z);
        let (above, below) = split(&t, &plane);
        assert_eq!(above.len(), 1);
        assert_eq!(below.len(), 3);
        assert_abs_diff_eq!(total_volume(&above), 1.0 / 48.0, epsilon = 1e-12);
        assert_conserved(&t, &above, &below);
    }

    #[test]
    fn test_two_vs_two() {
        let t = unit_tetra();
        // x + y = 0.5 separates {0, 3} from {1, 2}.
        let plane = Plane::new(DVec3::new(1.0, 1.0, 0.0), -0.5);
        let (above, below) = split(&t, &plane);
        assert_eq!(above.len(), 3);
        assert_eq!(below.len(), 3);
        assert_conserved(&t, &above, &below);
    }

    #[test]
    fn test_one_on_plane() {
        let t = unit_tetra();
        // Plane through vertex 0 separating X from {Y, Z}: x = 0.5 (y + z).
        let plane = Plane::new(DVec3::new(2.0, -1.0, -1.0), 0.0);
        let (above, below) = split(&t, &plane);
        assert_eq!(above.len(), 1);
        assert_eq!(below.len(), 2);
        assert_conserved(&t, &above, &below);
    }

    #[test]
    fn test_two_on_plane() {
        let t = unit_tetra();
        // Plane x = y holds vertices 0 and 3.
        let plane = Plane::new(DVec3::new(1.0, -1.0, 0.0), 0.0);
        let (above, below) = split(&t, &plane);
        assert_eq!(above.len(), 1);
        assert_eq!(below.len(), 1);
        assert_abs_diff_eq!(total_volume(&above), 1.0 / 12.0, epsilon = 1e-12);
        assert_conserved(&t, &above, &below);
    }

    #[test]
    fn test_negative_orientation_preserved() {
        let t = Tetrahedron::new(DVec3::ZERO, DVec3::Y, DVec3::X, DVec3::Z);
        let plane = Plane::from_point_normal(DVec3::new(0.0, 0.0, 0.3), DVec3::Z);
        let (above, below) = split(&t, &plane);
        assert_conserved(&t, &above, &below);
        assert!(above.iter().chain(&below).all(|p| p.signed_volume() < 0.0));
    }

    #[test]
    fn test_keep_flags() {
        let t = unit_tetra();
        let plane = Plane::from_point_normal(DVec3::new(0.0, 0.0, 0.5), DVec3::Z);
        match slice_with_plane(&t, &plane, false, true) {
            SliceResult::Split { above, below } => {
                assert!(above.is_empty());
                assert_eq!(below.len(), 3);
            }
            SliceResult::NoIntersection => panic!("expected a split"),
        }
    }

    #[test]
    fn test_volume_below() {
        let t = unit_tetra();
        let waterline = Plane::from_point_normal(DVec3::new(0.0, 0.0, 0.5), DVec3::Z);
        assert_abs_diff_eq!(volume_below(&t, &waterline), 1.0 / 6.0 - 1.0 / 48.0, epsilon = 1e-12);

        let deep = Plane::from_point_normal(DVec3::new(0.0, 0.0, 5.0), DVec3::Z);
        assert_abs_diff_eq!(volume_below(&t, &deep), 1.0 / 6.0, epsilon = 1e-12);
        let high = Plane::from_point_normal(DVec3::new(0.0, 0.0, -5.0), DVec3::Z);
        assert_abs_diff_eq!(volume_below(&t, &high), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_random_planes_conserve_volume() {
        let t = Tetrahedron::new(
            DVec3::new(0.3, -0.2, 0.1),
            DVec3::new(2.0, 0.4, -0.5),
            DVec3::new(-0.7, 1.9, 0.3),
            DVec3::new(0.2, 0.5, 2.2),
        )
        .with_mass(3.0);
        let normals = [
            DVec3::new(0.3, 0.9, -0.2),
            DVec3::new(-1.0, 0.2, 0.7),
            DVec3::new(0.1, -0.4, 1.0),
            DVec3::new(1.0, 1.0, 1.0),
        ];
        for normal in normals {
            for offset in [-0.5, 0.0, 0.4, 0.9] {
                let plane = Plane::from_point_normal(t.centroid() + normal.normalize() * offset * 0.5, normal);
                if let SliceResult::Split { above, below } = slice_with_plane(&t, &plane, true, true) {
                    assert_conserved(&t, &above, &below);
                }
            }
        }
    }
}
