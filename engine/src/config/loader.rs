//! Builders turning configuration records into engine objects
//!
//! Everything here runs once at load time. Curve names are resolved to
//! shared [`Arc`]s so foils never look anything up per tick.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::records::{BodyRecord, CurveRecord, CurveSource, FoilRecord, VolumesRecord};
use crate::aero::{AerodynamicCurve, ClCdInterp, CurveLibrary, Foil};
use crate::error::{AeroError, ConfigError};
use crate::physics::body_tree::{BodyHandle, BodyTree};
use crate::physics::geometry::Plane;
use crate::physics::rigid_body::RigidBody;
use crate::physics::transform_history::Placement;
use crate::physics::types::{DMat3, DQuat, DVec3};
use crate::volume::{MassProperties, VolumeCell, allocate_mass, overall_inertia};

/// Parses any record type from a JSON string.
pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<T, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses any record type from a JSON file.
pub fn from_json_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    from_json_str(&text)
}

// ============================================================================
// VOLUMES
// ============================================================================

/// Builds the cells of a volumes record.
///
/// Cells with an unsupported index count are skipped with a warning. With a
/// mirror plane every cell is followed by its reflection.
pub fn build_volume_cells(record: &VolumesRecord) -> Result<Vec<VolumeCell>, ConfigError> {
    if record.vertices.len() % 3 != 0 {
        return Err(ConfigError::VertexListLength(record.vertices.len()));
    }
    let vertices: Vec<DVec3> = record
        .vertices
        .chunks_exact(3)
        .map(|c| DVec3::new(c[0], c[1], c[2]))
        .collect();

    let mut cells = Vec::with_capacity(record.indices.len());
    for (cell_index, entry) in record.indices.iter().enumerate() {
        let mut cell_vertices = Vec::with_capacity(entry.indices().len());
        for &index in entry.indices() {
            let vertex = vertices.get(index).ok_or(ConfigError::VertexIndexOutOfRange {
                index,
                count: vertices.len(),
            })?;
            cell_vertices.push(*vertex);
        }

        let Some(cell) = VolumeCell::new(cell_vertices) else {
            warn!(
                cell = cell_index,
                vertex_count = entry.indices().len(),
                "unsupported cell vertex count (expected 4, 5, 6 or 8); skipping"
            );
            continue;
        };
        let cell = cell
            .with_mass(entry.mass())
            .with_mass_distribution(entry.mass_distribution().unwrap_or(1.0));
        cells.push(cell);
    }

    if let Some(mirror) = record.mirror_plane {
        let plane = Plane::from(mirror);
        let reflected: Vec<VolumeCell> = cells.iter().map(|c| c.mirrored(&plane)).collect();
        cells.extend(reflected);
    }
    Ok(cells)
}

/// Mass properties a body record resolves to: volume-derived values with
/// explicit fields taking precedence.
pub fn resolve_mass_properties(record: &BodyRecord) -> Result<MassProperties, ConfigError> {
    let derived = match &record.volumes {
        Some(volumes) => {
            let mut cells = build_volume_cells(volumes)?;
            allocate_mass(&mut cells, record.mass);
            overall_inertia(&cells)
        }
        None => MassProperties::default(),
    };

    Ok(MassProperties {
        mass: record.mass.unwrap_or(derived.mass),
        center_of_mass: record.center_of_mass.map_or(derived.center_of_mass, DVec3::from),
        inertia: record.moment_inertia.map_or(derived.inertia, DMat3::from),
    })
}

// ============================================================================
// BODIES
// ============================================================================

impl RigidBody {
    /// A single body from its record, ignoring `parts`.
    pub fn from_record(record: &BodyRecord) -> Result<Self, ConfigError> {
        let props = resolve_mass_properties(record)?;
        let placement = Placement::new(
            record.position.map_or(DVec3::ZERO, DVec3::from),
            record.orientation.map_or(DQuat::IDENTITY, DQuat::from),
        );
        let name = record.name.clone().unwrap_or_else(|| "body".to_string());
        let mut body = RigidBody::new(name, props.mass, props.center_of_mass, props.inertia).with_placement(placement);
        if let Some(capacity) = record.history_capacity {
            body = body.with_history_capacity(capacity);
        }
        Ok(body)
    }
}

impl BodyTree {
    /// Adds a body record and all its parts; returns the root's handle.
    pub fn load_body(&mut self, record: &BodyRecord) -> Result<BodyHandle, ConfigError> {
        let body = RigidBody::from_record(record)?;
        debug!(name = %body.name, mass = body.mass, parts = record.parts.len(), "loaded body");
        let handle = self.add_body(body);

        for part_record in &record.parts {
            let part = self.load_body(part_record)?;
            self.add_part(handle, part)?;
            if !part_record.enabled {
                self.set_part_enabled(handle, part, false);
            }
        }
        Ok(handle)
    }

    /// [`BodyTree::load_body`] from a JSON string.
    pub fn load_body_json(&mut self, json: &str) -> Result<BodyHandle, ConfigError> {
        let record: BodyRecord = from_json_str(json)?;
        self.load_body(&record)
    }
}

// ============================================================================
// CURVES AND FOILS
// ============================================================================

impl AerodynamicCurve {
    pub fn from_record(record: &CurveRecord) -> Result<Self, AeroError> {
        let table = &record.cl_cd_interp;
        let lifting = ClCdInterp::new(
            &table.alphas,
            &table.cls,
            &table.cds,
            table.cms.as_deref(),
            record.is_fore_aft_symmetric,
        )?;

        let mut curve = AerodynamicCurve::new(
            lifting,
            record.cl_cd_stall.map(Into::into),
            record.stall_start_deg,
            record.lift_end_deg,
        )?
        .with_aspect_ratio(record.aspect_ratio)
        .with_reynolds(record.re)
        .with_symmetry(record.is_symmetric, record.is_fore_aft_symmetric);

        if record.aft_lift_end_deg.is_some() || record.aft_stall_start_deg.is_some() {
            let aft_lift_end = record.aft_lift_end_deg.unwrap_or(curve.aft_lift_end_deg());
            let aft_stall_start = record.aft_stall_start_deg.unwrap_or(curve.aft_stall_start_deg());
            curve = curve.with_aft_bands(aft_lift_end, aft_stall_start)?;
        }
        Ok(curve)
    }
}

impl CurveLibrary {
    /// Library from named curve records.
    pub fn from_records(records: &HashMap<String, CurveRecord>) -> Result<Self, ConfigError> {
        let mut library = CurveLibrary::new();
        for (name, record) in records {
            library.insert(name.clone(), AerodynamicCurve::from_record(record)?);
        }
        Ok(library)
    }

    /// Library from a JSON object `{ "name": curve, ... }`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let records: HashMap<String, CurveRecord> = from_json_str(json)?;
        Self::from_records(&records)
    }
}

impl Foil {
    /// Builds a foil, resolving a named curve through `library`.
    pub fn from_record(record: &FoilRecord, library: &CurveLibrary) -> Result<Self, ConfigError> {
        let curve = match &record.curve {
            CurveSource::Named(name) => library
                .get(name)
                .ok_or_else(|| ConfigError::UnknownCurve(name.clone()))?,
            CurveSource::Inline(curve) => Arc::new(AerodynamicCurve::from_record(curve)?),
        };
        Ok(Foil::new(record.chord_line.into(), record.slice_z, record.area, curve)
            .with_aspect_ratio(record.aspect_ratio))
    }
}
