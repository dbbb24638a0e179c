//! Foil: lift, drag and pitching moment of one wing section
//!
//! A foil lives in its body's local XY plane at height `slice_z`. The local
//! calculation works purely in 2D; [`Foil::calc_world_force`] derives the
//! apparent flow from the body's transform history and returns the result as
//! a world-frame [`Resultant`] applied at the leading edge.
//!
//! # Example
//!
//! ```ignore
//! use sail_physics::aero::Foil;
//! use sail_physics::physics::{ChordLine, DVec2};
//!
//! let foil = Foil::new(ChordLine::new(DVec2::ZERO, DVec2::new(1.2, 0.0)), 0.0, 2.4, curve);
//! let force = foil.calc_force(1.225, DVec2::new(6.0, 0.8));
//! println!("lift {:.1} N, drag {:.1} N", force.lift, force.drag);
//! ```

use std::f64::consts::PI;
use std::sync::Arc;

use super::curve::{AeroCoefficients, AerodynamicCurve};
use crate::physics::geometry::{ChordLine, signed_angle_2d};
use crate::physics::resultant::Resultant;
use crate::physics::transform_history::TransformHistory;
use crate::physics::types::{DVec2, DVec3, is_near_zero};

/// Sea-level air density (kg/m³).
pub const AIR_DENSITY: f64 = 1.225;
/// Sea water density (kg/m³).
pub const SEA_WATER_DENSITY: f64 = 1025.0;

/// Local-frame force on a foil.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FoilForce {
    /// Angle of attack (degrees, chord to flow, counter-clockwise positive)
    pub angle_of_attack_deg: f64,
    /// Coefficients the forces were computed from
    pub coefficients: AeroCoefficients,
    /// Dynamic pressure ½ρ|V|² (Pa)
    pub dynamic_pressure: f64,
    /// Lift magnitude, perpendicular to the flow (N)
    pub lift: f64,
    /// Profile drag magnitude, along the flow (N)
    pub drag: f64,
    /// Induced drag magnitude, along the flow (N); zero without an aspect ratio
    pub induced_drag: f64,
    /// Total force vector in the foil plane (N)
    pub force: DVec2,
    /// Moment about the leading edge, counter-clockwise positive (N·m)
    pub moment: f64,
}

/// World-frame result of [`Foil::calc_world_force`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldFoilForce {
    /// Force and moment applied at the world leading edge
    pub resultant: Resultant,
    /// Apparent flow in the foil's local frame (m/s)
    pub local_flow: DVec3,
    /// The underlying local calculation
    pub local: FoilForce,
}

/// One lifting section.
#[derive(Debug, Clone)]
pub struct Foil {
    /// Leading → trailing edge in the local XY plane
    pub chord: ChordLine,
    /// Span-wise position of the section (local Z)
    pub slice_z: f64,
    /// Reference area (m²)
    pub area: f64,
    /// Overrides the curve's aspect ratio for induced drag
    pub aspect_ratio: Option<f64>,
    curve: Arc<AerodynamicCurve>,
}

impl Foil {
    pub fn new(chord: ChordLine, slice_z: f64, area: f64, curve: Arc<AerodynamicCurve>) -> Self {
        Self {
            chord,
            slice_z,
            area,
            aspect_ratio: None,
            curve,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: Option<f64>) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn curve(&self) -> &Arc<AerodynamicCurve> {
        &self.curve
    }

    /// Foil aspect ratio, falling back to the curve's.
    pub fn effective_aspect_ratio(&self) -> Option<f64> {
        self.aspect_ratio.or(self.curve.aspect_ratio)
    }

    pub fn leading_edge(&self) -> DVec3 {
        self.chord.leading.extend(self.slice_z)
    }

    pub fn trailing_edge(&self) -> DVec3 {
        self.chord.trailing.extend(self.slice_z)
    }

    /// Signed angle from the chord to `flow`, in degrees.
    pub fn angle_of_attack_deg(&self, flow: DVec2) -> f64 {
        signed_angle_2d(self.chord.direction(), flow).to_degrees()
    }

    /// Force from a local flow velocity using the foil's own chord, area and
    /// aspect ratio.
    pub fn calc_force(&self, rho: f64, flow: DVec2) -> FoilForce {
        self.calc_force_with(rho, flow, self.chord.length(), self.area, self.effective_aspect_ratio())
    }

    /// Force from a local flow velocity with explicit section parameters.
    ///
    /// Lift acts perpendicular to the flow (rotated +90°), drag along it. A
    /// chord-fraction moment places the force line `|cm|·chord_length`
    /// behind the leading edge and takes its moment about the leading edge;
    /// a true coefficient gives `cm·q·A·chord_length`.
    pub fn calc_force_with(
        &self,
        rho: f64,
        flow: DVec2,
        chord_length: f64,
        area: f64,
        aspect_ratio: Option<f64>,
    ) -> FoilForce {
        let speed = flow.length();
        if is_near_zero(speed) {
            return FoilForce {
                coefficients: self.curve.evaluate(0.0),
                ..FoilForce::default()
            };
        }

        let angle_of_attack_deg = self.angle_of_attack_deg(flow);
        let coefficients = self.curve.evaluate(angle_of_attack_deg);
        let q = 0.5 * rho * speed * speed;
        let qa = q * area;

        let lift = coefficients.cl * qa;
        let drag = coefficients.cd * qa;
        let induced_drag = match aspect_ratio {
            Some(ar) if !is_near_zero(ar) => coefficients.cl * coefficients.cl / (PI * ar) * qa,
            _ => 0.0,
        };

        let flow_dir = flow / speed;
        let force = flow_dir.perp() * lift + flow_dir * (drag + induced_drag);

        let moment = if coefficients.cm_is_chord_fraction {
            let arm = self.chord.direction() * (coefficients.cm.abs() * chord_length);
            arm.perp_dot(force)
        } else {
            coefficients.cm * qa * chord_length
        };

        FoilForce {
            angle_of_attack_deg,
            coefficients,
            dynamic_pressure: q,
            lift,
            drag,
            induced_drag,
            force,
            moment,
        }
    }

    /// World-frame force from the body's motion and the surrounding fluid.
    ///
    /// The foil's velocity is a blend of its two chord endpoints' velocities
    /// weighted towards the slower one, which keeps a fast-spinning foil from
    /// seeing a flow dominated by its tip speed. The apparent flow
    /// `fluid_velocity − v` is taken into the local frame and its XY part
    /// drives [`Foil::calc_force`].
    pub fn calc_world_force(&self, rho: f64, history: &TransformHistory, fluid_velocity: DVec3) -> WorldFoilForce {
        let lead = history.point_local_to_world(self.leading_edge(), true, false, None);
        let trail = history.point_local_to_world(self.trailing_edge(), true, false, None);
        let v_lead = lead.world_velocity.unwrap_or(DVec3::ZERO);
        let v_trail = trail.world_velocity.unwrap_or(DVec3::ZERO);

        let (speed_lead, speed_trail) = (v_lead.length(), v_trail.length());
        let total = speed_lead + speed_trail;
        let (w_lead, w_trail) = if is_near_zero(total) {
            (0.5, 0.5)
        } else {
            (speed_trail / total, speed_lead / total)
        };
        let foil_velocity = v_lead * w_lead + v_trail * w_trail;

        let current = history.current();
        let local_flow = current
            .local_from_world
            .transform_vector3(fluid_velocity - foil_velocity);
        let local = self.calc_force(rho, local_flow.truncate());

        let force = current.world_from_local.transform_vector3(local.force.extend(0.0));
        let moment = current
            .world_from_local
            .transform_vector3(DVec3::new(0.0, 0.0, local.moment));

        WorldFoilForce {
            resultant: Resultant::new(force, moment, lead.world_position),
            local_flow,
            local,
        }
    }
}
