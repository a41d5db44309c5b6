#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Engine voor het coplanair uitlijnen van joint-ketens: bouwt een
//! uitlijnvlak uit een van de invoermodi en herorienteert de keten tegen
//! dat vlak. De scene zelf is eigendom van de gastheer en wordt via het
//! [`scene::SceneGraph`] interface benaderd.

pub mod geom;
pub mod modes;
pub mod orient;
pub mod scene;

use log::debug;
use serde::Serialize;

use geom::{Axis, AxisComponent, Plane, Vec3};
use modes::{PlaneError, PlaneMode, PlaneSolution};
use orient::{OrientError, ReorientStatus};
use scene::hierarchy::{ChainSelection, validate_chain_selection};
use scene::{NodeId, SceneGraph};

/// Fouttype voor [`Coplanarizer::apply`]: vlakconstructie of ketenloper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Plane(#[from] PlaneError),
    #[error(transparent)]
    Orient(#[from] OrientError),
}

/// Exportpayload waarmee een gastheer het voorbeeldvlak kan tekenen. Het
/// anker is het modus-eigen ankerpunt, of anders het eerste assnijpunt van
/// het vlak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlanePreview {
    pub normal: [f64; 3],
    pub distance: f64,
    pub anchor: [f64; 3],
}

/// Public entry point for consumers.
///
/// Houdt uitsluitend parameters vast (jointselectie, askeuzes, vlakmodus);
/// keten en vlak worden op aanvraag herberekend in plaats van als gedeelde
/// toestand bijgewerkt.
#[derive(Debug, Clone)]
pub struct Coplanarizer {
    joint_a: Option<NodeId>,
    joint_b: Option<NodeId>,
    chain: Option<ChainSelection>,
    aim_axis: Axis,
    turn_axis: Axis,
    plane_mode: PlaneMode,
}

impl Coplanarizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            joint_a: None,
            joint_b: None,
            chain: None,
            aim_axis: Axis::X,
            turn_axis: Axis::Z,
            plane_mode: PlaneMode::AutomaticFromPositions,
        }
    }

    /// Selecteer het jointpaar en bepaal wortel en einde van de keten.
    /// Volgorde-onafhankelijk; `None` wanneer de selectie geen keten vormt.
    pub fn select_joints<S: SceneGraph>(
        &mut self,
        scene: &S,
        joint_a: NodeId,
        joint_b: NodeId,
    ) -> Option<ChainSelection> {
        self.joint_a = Some(joint_a);
        self.joint_b = Some(joint_b);
        self.refresh_chain(scene)
    }

    pub fn clear_selection(&mut self) {
        self.joint_a = None;
        self.joint_b = None;
        self.chain = None;
    }

    /// Hervalideer de keten tegen de huidige scene, bv. nadat de gastheer
    /// de hierarchie heeft gewijzigd.
    pub fn refresh_chain<S: SceneGraph>(&mut self, scene: &S) -> Option<ChainSelection> {
        self.chain = match (self.joint_a, self.joint_b) {
            (Some(a), Some(b)) => validate_chain_selection(scene, a, b),
            _ => None,
        };
        self.chain
    }

    #[must_use]
    pub const fn chain(&self) -> Option<ChainSelection> {
        self.chain
    }

    #[must_use]
    pub const fn aim_axis(&self) -> Axis {
        self.aim_axis
    }

    #[must_use]
    pub const fn turn_axis(&self) -> Axis {
        self.turn_axis
    }

    #[must_use]
    pub const fn plane_mode(&self) -> &PlaneMode {
        &self.plane_mode
    }

    pub fn set_plane_mode(&mut self, mode: PlaneMode) {
        self.plane_mode = mode;
    }

    /// Zet de mik-as. Deelt de nieuwe as zijn component met de draai-as,
    /// dan wijkt de draai-as uit zodat de twee nooit samenvallen.
    pub fn set_aim_axis(&mut self, axis: Axis) {
        if self.turn_axis.component == axis.component {
            self.turn_axis = Axis::new(
                evaded_component(axis.component),
                self.turn_axis.negative,
            );
            debug!("draai-as uitgeweken naar {:?}", self.turn_axis.component);
        }
        self.aim_axis = axis;
    }

    /// Zet de draai-as; de mik-as wijkt zo nodig uit.
    pub fn set_turn_axis(&mut self, axis: Axis) {
        if self.aim_axis.component == axis.component {
            self.aim_axis = Axis::new(
                evaded_component(axis.component),
                self.aim_axis.negative,
            );
            debug!("mik-as uitgeweken naar {:?}", self.aim_axis.component);
        }
        self.turn_axis = axis;
    }

    /// Bereken het uitlijnvlak voor de actieve modus. Puur; muteert niets.
    pub fn compute_plane<S: SceneGraph>(&self, scene: &S) -> Result<PlaneSolution, PlaneError> {
        modes::compute_plane(scene, &self.plane_mode, self.chain.as_ref(), self.turn_axis)
    }

    /// Voorbeeldvlak voor de gastheer-visualisatie.
    pub fn plane_preview<S: SceneGraph>(&self, scene: &S) -> Result<PlanePreview, PlaneError> {
        let solution = self.compute_plane(scene)?;
        let anchor = solution
            .preview_anchor
            .unwrap_or_else(|| axis_intercept(solution.plane));
        Ok(PlanePreview {
            normal: solution.plane.normal().to_array(),
            distance: solution.plane.distance(),
            anchor: anchor.to_array(),
        })
    }

    /// Pas de ketenbewerking toe: het enige muterende toegangspunt. Zonder
    /// geldige keten gebeurt er niets.
    pub fn apply<S: SceneGraph>(&self, scene: &mut S) -> Result<ReorientStatus, ApplyError> {
        let Some(chain) = self.chain else {
            debug!("geen geldige ketenselectie; apply is een no-op");
            return Ok(ReorientStatus::NoOp);
        };

        let solution = self.compute_plane(scene)?;
        let status = orient::reorient_chain(
            scene,
            chain.chain_end,
            chain.chain_root,
            &solution.plane,
            self.aim_axis,
            self.turn_axis,
        )?;
        Ok(status)
    }
}

impl Default for Coplanarizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Uitwijkcomponent wanneer twee assen zouden samenvallen: X, tenzij de
/// bezette component zelf X is.
const fn evaded_component(taken: AxisComponent) -> AxisComponent {
    match taken {
        AxisComponent::X => AxisComponent::Y,
        AxisComponent::Y | AxisComponent::Z => AxisComponent::X,
    }
}

/// Snijpunt van het vlak met de eerste as waarlangs de normaal een
/// component heeft; een unit-normaal heeft er altijd minstens een.
fn axis_intercept(plane: Plane) -> Vec3 {
    let normal = plane.normal();
    let distance = plane.distance();
    if normal.x != 0.0 {
        Vec3::new(-distance / normal.x, 0.0, 0.0)
    } else if normal.y != 0.0 {
        Vec3::new(0.0, -distance / normal.y, 0.0)
    } else {
        Vec3::new(0.0, 0.0, -distance / normal.z)
    }
}
