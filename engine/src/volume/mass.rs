//! Mass allocation and inertia composition over volume cells
//!
//! Masses flow top-down: a total mass is spread over cells in proportion to
//! `volume × mass_distribution`, then each cell's mass is spread over its
//! canonical tetrahedra the same way. Inertia flows bottom-up: every leaf
//! tetrahedron's tensor about its own centroid is shifted to the origin with
//! the parallel-axis theorem while the mass-weighted centroid accumulates,
//! and the origin tensor is finally shifted back to that centroid.

use tracing::warn;

use crate::physics::types::{DMat3, DVec3, NEAR_ZERO, outer};

use super::cell::VolumeCell;
use super::tetrahedron::Tetrahedron;

/// Mass, center of mass and inertia about the center of mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties {
    pub mass: f64,
    pub center_of_mass: DVec3,
    pub inertia: DMat3,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 0.0,
            center_of_mass: DVec3::ZERO,
            inertia: DMat3::ZERO,
        }
    }
}

/// Parallel-axis term `m (|r|² I − r rᵀ)` for a displacement `r`.
pub fn parallel_axis_term(mass: f64, offset: DVec3) -> DMat3 {
    (DMat3::IDENTITY * offset.length_squared() - outer(offset, offset)) * mass
}

/// Splits `total` over `weights` proportionally; zero total weight splits evenly.
fn proportional_shares(weights: &[f64], total: f64) -> Vec<f64> {
    let sum: f64 = weights.iter().sum();
    if sum.abs() <= NEAR_ZERO {
        if !weights.is_empty() {
            warn!(
                count = weights.len(),
                "zero total volume while allocating mass; splitting evenly"
            );
        }
        let even = total / weights.len().max(1) as f64;
        return vec![even; weights.len()];
    }
    weights.iter().map(|w| total * w / sum).collect()
}

fn tetrahedron_weight(tetra: &Tetrahedron) -> f64 {
    tetra.volume() * tetra.mass_distribution
}

/// Spreads the cell's own mass over its tetrahedra.
fn distribute_cell_mass(cell: &mut VolumeCell) {
    let Some(mass) = cell.mass else {
        return;
    };
    let mut tetrahedra = cell.take_tetrahedra();
    let weights: Vec<f64> = tetrahedra.iter().map(tetrahedron_weight).collect();
    for (tetra, share) in tetrahedra.iter_mut().zip(proportional_shares(&weights, mass)) {
        tetra.mass = Some(share);
    }
    cell.restore_tetrahedra(tetrahedra);
}

/// Assigns masses to cells and their leaf tetrahedra.
///
/// With a `total_mass` it is spread over the cells by
/// `volume × mass_distribution`. Without one, cells keep the masses they
/// carry and unassigned cells take `volume × mass_distribution`, the
/// distribution acting as a density. Every cell then pushes its mass down to
/// its tetrahedra.
pub fn allocate_mass(cells: &mut [VolumeCell], total_mass: Option<f64>) {
    match total_mass {
        Some(total) => {
            let weights: Vec<f64> = cells.iter().map(|c| c.volume() * c.mass_distribution).collect();
            for (cell, share) in cells.iter_mut().zip(proportional_shares(&weights, total)) {
                cell.mass = Some(share);
            }
        }
        None => {
            for cell in cells.iter_mut().filter(|c| c.mass.is_none()) {
                cell.mass = Some(cell.volume() * cell.mass_distribution);
            }
        }
    }
    for cell in cells.iter_mut() {
        distribute_cell_mass(cell);
    }
}

/// Total mass, center of mass and inertia tensor of the leaf tetrahedra.
///
/// Tetrahedra without an assigned mass contribute nothing.
pub fn overall_inertia(cells: &[VolumeCell]) -> MassProperties {
    overall_inertia_of(cells.iter().flat_map(|c| c.tetrahedra().iter()))
}

/// [`overall_inertia`] over any set of tetrahedra.
pub fn overall_inertia_of<'a>(tetrahedra: impl IntoIterator<Item = &'a Tetrahedron>) -> MassProperties {
    let mut mass = 0.0;
    let mut weighted_centroid = DVec3::ZERO;
    let mut origin_inertia = DMat3::ZERO;

    for tetra in tetrahedra {
        let m = tetra.mass_or_zero();
        if m == 0.0 {
            continue;
        }
        let centroid = tetra.centroid();
        origin_inertia += tetra.inertia_tensor() + parallel_axis_term(m, centroid);
        weighted_centroid += centroid * m;
        mass += m;
    }

    if mass.abs() <= NEAR_ZERO {
        return MassProperties::default();
    }
    let center_of_mass = weighted_centroid / mass;
    MassProperties {
        mass,
        center_of_mass,
        inertia: origin_inertia - parallel_axis_term(mass, center_of_mass),
    }
}
