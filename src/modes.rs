//! Vlakconstructie per invoermodus. Elke modus is een pure functie van zijn
//! parameters (plus de huidige keten waar relevant) naar een [`Plane`]; er
//! wordt nooit een bestaand vlak ter plekke bijgewerkt.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::geom::{
    Axis, GeometryError, Plane, Vec3, three_point_normal, two_point_normal,
};
use crate::scene::hierarchy::{
    ChainSelection, average_direction, average_position, whole_parent_chain,
};
use crate::scene::{NodeId, SceneError, SceneGraph};

/// Beschikbare vlakmodi. Er is er altijd precies een actief; wisselen van
/// modus gooit het oude vlak weg en herbouwt onder de regels van de nieuwe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlaneMode {
    /// Expliciet opgegeven normaal door een positie.
    ExplicitVector { normal: Vec3, position: Vec3 },
    /// Normaal loodrecht op de lijn `p0`-`p1`, binnen het vlak van lijn en
    /// richtingshint.
    TwoPointsAndVector {
        p0: Vec3,
        p1: Vec3,
        hint: Vec3,
        position: Vec3,
    },
    /// Normaal van het vlak door drie punten.
    ThreePoints {
        p0: Vec3,
        p1: Vec3,
        p2: Vec3,
        position: Vec3,
    },
    /// As-uitgelijnd vlak op een wereldoffset langs de as.
    AxisAligned { axis: Axis, offset: f64 },
    /// Drie-punts-vlak uit de ketengeometrie: wortel, zwaartepunt, einde.
    AutomaticFromPositions,
    /// Vlak uit de keteneindpunten met de gemiddelde kijkrichting als hint.
    AutomaticFromOrientations,
}

impl PlaneMode {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExplicitVector { .. } => "explicit vector",
            Self::TwoPointsAndVector { .. } => "two points + vector",
            Self::ThreePoints { .. } => "three points",
            Self::AxisAligned { .. } => "axis aligned",
            Self::AutomaticFromPositions => "automatic from positions",
            Self::AutomaticFromOrientations => "automatic from orientations",
        }
    }
}

/// Resultaat van een vlakconstructie: het vlak zelf plus een optioneel
/// ankerpunt dat alleen voor visualisatie dient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneSolution {
    pub plane: Plane,
    pub preview_anchor: Option<Vec3>,
}

/// Fouttype voor vlakconstructies. Een fout betekent: geen vlak, en de
/// aanroeper mag de ketenbewerking niet starten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlaneError {
    #[error("gedegenereerde invoer voor vlakconstructie: {0}")]
    Geometry(#[from] GeometryError),
    #[error("deze vlakmodus vereist een geldige joint-keten")]
    ChainRequired,
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Bereken het uitlijnvlak voor de actieve modus. Puur: de scene wordt
/// alleen gelezen. `chain` en `turn_axis` sturen de tekenkeuze van de
/// normaal en de automatische modi.
pub fn compute_plane<S: SceneGraph>(
    scene: &S,
    mode: &PlaneMode,
    chain: Option<&ChainSelection>,
    turn_axis: Axis,
) -> Result<PlaneSolution, PlaneError> {
    debug!("vlak herberekenen via modus `{}`", mode.name());

    match *mode {
        PlaneMode::ExplicitVector { normal, position } => build_explicit_vector(normal, position),
        PlaneMode::TwoPointsAndVector {
            p0,
            p1,
            hint,
            position,
        } => build_two_points_and_vector(scene, chain, turn_axis, p0, p1, hint, position),
        PlaneMode::ThreePoints {
            p0,
            p1,
            p2,
            position,
        } => build_three_points(scene, chain, turn_axis, p0, p1, p2, position),
        PlaneMode::AxisAligned { axis, offset } => build_axis_aligned(axis, offset),
        PlaneMode::AutomaticFromPositions => {
            build_automatic_from_positions(scene, chain, turn_axis)
        }
        PlaneMode::AutomaticFromOrientations => {
            build_automatic_from_orientations(scene, chain, turn_axis)
        }
    }
}

fn build_explicit_vector(normal: Vec3, position: Vec3) -> Result<PlaneSolution, PlaneError> {
    let plane = Plane::from_normal_and_point(normal, position)?;
    Ok(PlaneSolution {
        plane,
        preview_anchor: Some(position),
    })
}

fn build_two_points_and_vector<S: SceneGraph>(
    scene: &S,
    chain: Option<&ChainSelection>,
    turn_axis: Axis,
    p0: Vec3,
    p1: Vec3,
    hint: Vec3,
    position: Vec3,
) -> Result<PlaneSolution, PlaneError> {
    let normal = two_point_normal(p0, p1, hint)?;
    let normal = oriented_toward_chain(scene, normal, chain, turn_axis)?;
    let plane = Plane::from_normal_and_point(normal, position)?;
    Ok(PlaneSolution {
        plane,
        preview_anchor: Some(position),
    })
}

fn build_three_points<S: SceneGraph>(
    scene: &S,
    chain: Option<&ChainSelection>,
    turn_axis: Axis,
    p0: Vec3,
    p1: Vec3,
    p2: Vec3,
    position: Vec3,
) -> Result<PlaneSolution, PlaneError> {
    let normal = three_point_normal(p0, p1, p2)?;
    let normal = oriented_toward_chain(scene, normal, chain, turn_axis)?;
    let plane = Plane::from_normal_and_point(normal, position)?;
    Ok(PlaneSolution {
        plane,
        preview_anchor: Some(position),
    })
}

fn build_axis_aligned(axis: Axis, offset: f64) -> Result<PlaneSolution, PlaneError> {
    // Onder de impliciete vorm `n·P + d = 0` ligt het punt op `offset` langs
    // de as precies op het vlak wanneer d het tegengestelde teken draagt.
    let distance = offset * if axis.negative { 1.0 } else { -1.0 };
    let plane = Plane::new(axis.unit_vector(), distance)?;
    Ok(PlaneSolution {
        plane,
        preview_anchor: None,
    })
}

fn build_automatic_from_positions<S: SceneGraph>(
    scene: &S,
    chain: Option<&ChainSelection>,
    turn_axis: Axis,
) -> Result<PlaneSolution, PlaneError> {
    let (chain, joints) = require_chain(scene, chain)?;

    let root_position = scene.world_position(chain.chain_root)?;
    let end_position = scene.world_position(chain.chain_end)?;
    let centroid = average_position(scene, &joints)?;

    // Een gestrekte keten heeft zijn zwaartepunt op de wortel-einde-lijn en
    // spant dan geen vlak.
    let normal = three_point_normal(root_position, centroid, end_position)?;
    let normal = flip_toward_facing(scene, normal, &joints, turn_axis)?;

    let plane = Plane::from_normal_and_point(normal, centroid)?;
    Ok(PlaneSolution {
        plane,
        preview_anchor: Some(centroid),
    })
}

fn build_automatic_from_orientations<S: SceneGraph>(
    scene: &S,
    chain: Option<&ChainSelection>,
    turn_axis: Axis,
) -> Result<PlaneSolution, PlaneError> {
    let (chain, joints) = require_chain(scene, chain)?;

    let root_position = scene.world_position(chain.chain_root)?;
    let end_position = scene.world_position(chain.chain_end)?;
    let facing = average_direction(scene, &joints, turn_axis)?;

    let normal = two_point_normal(root_position, end_position, facing)?;
    let normal = if normal.dot(facing) < 0.0 { -normal } else { normal };

    let plane = Plane::from_normal_and_point(normal, root_position)?;
    Ok(PlaneSolution {
        plane,
        preview_anchor: Some(root_position),
    })
}

fn require_chain<'a, S: SceneGraph>(
    scene: &S,
    chain: Option<&'a ChainSelection>,
) -> Result<(&'a ChainSelection, Vec<NodeId>), PlaneError> {
    let chain = chain.ok_or(PlaneError::ChainRequired)?;
    let joints = whole_parent_chain(scene, chain.chain_root, chain.chain_end)
        .ok_or(PlaneError::ChainRequired)?;
    Ok((chain, joints))
}

/// Tekenkeuze voor normalen uit punten: houd het vlak aan de kant waar de
/// keten nu al heen kijkt, in plaats van willekeurig te klappen bij kleine
/// invoerwijzigingen. Zonder keten blijft de kandidaat ongemoeid.
fn oriented_toward_chain<S: SceneGraph>(
    scene: &S,
    normal: Vec3,
    chain: Option<&ChainSelection>,
    turn_axis: Axis,
) -> Result<Vec3, PlaneError> {
    let Some(chain) = chain else {
        return Ok(normal);
    };
    let Some(joints) = whole_parent_chain(scene, chain.chain_root, chain.chain_end) else {
        return Ok(normal);
    };
    flip_toward_facing(scene, normal, &joints, turn_axis)
}

fn flip_toward_facing<S: SceneGraph>(
    scene: &S,
    normal: Vec3,
    joints: &[NodeId],
    turn_axis: Axis,
) -> Result<Vec3, PlaneError> {
    let facing = average_direction(scene, joints, turn_axis)?;
    if normal.dot(facing) < 0.0 {
        Ok(-normal)
    } else {
        Ok(normal)
    }
}
