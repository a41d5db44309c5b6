//! De ketenloper: loopt een joint-keten van einde naar wortel, projecteert
//! elke joint op het uitlijnvlak en bakt een nieuwe orientatie die langs de
//! keten mikt. Kinderen worden per stap losgekoppeld en met behoud van
//! wereldpose teruggehangen, zodat alleen de keten zelf beweegt.

use log::{debug, warn};

use crate::geom::{Axis, EulerRotation, Mat3, Plane, RotationOrder, Vec3};
use crate::scene::hierarchy::is_descendant;
use crate::scene::{NodeId, SceneError, SceneGraph};

/// Afstand waarover de oude kijkrichting van het keteneinde vooruit wordt
/// verlengd om een kunstmatig mikpunt op het vlak te maken.
const AIM_REACH: f64 = 10.0;

/// Uitkomst van een ketenbewerking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorientStatus {
    /// De keten is herorienteerd; `joints` telt de verwerkte nodes.
    Applied { joints: usize },
    /// Ongeldige invoer; de scene is onaangeroerd gebleven.
    NoOp,
}

/// Fouttype voor de ketenloper. Scene-fouten zijn fataal: elke stap neemt
/// aan dat de vorige mutatie geslaagd is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OrientError {
    #[error("mik-as en draai-as delen dezelfde component")]
    AxesConflict,
    #[error("ouderketen onderbroken boven {0:?} tijdens het herorienteren")]
    ChainInterrupted(NodeId),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Pure mik-constructie: de orientatie die de lokale `aim_axis` van
/// `source` naar `target` laat wijzen, met `world_up` als up-referentie
/// opgelost tegen de lokale `turn_axis`. Geen levende constraint; het
/// resultaat wordt eenmalig gebakken en daarna vergeten.
///
/// `None` wanneer `target` op `source` valt en er dus geen richting is.
#[must_use]
pub fn aim_orientation(
    source: Vec3,
    target: Vec3,
    aim_axis: Axis,
    turn_axis: Axis,
    world_up: Vec3,
    order: RotationOrder,
) -> Option<EulerRotation> {
    let forward = (target - source).normalized()?;

    let up = match (world_up - forward * world_up.dot(forward)).normalized() {
        Some(up) => up,
        None => {
            warn!("up-referentie evenwijdig aan de mikrichting; willekeurige loodrechte gekozen");
            forward.any_orthogonal()
        }
    };

    let aim_unit = aim_axis.unit_vector();
    let turn_unit = turn_axis.unit_vector();

    // Beide drietallen zijn orthonormaal en rechtshandig, dus het product
    // van wereldbasis en getransponeerde lokale basis is een zuivere
    // rotatie die aim op forward en turn op up afbeeldt.
    let world_basis = Mat3::from_columns(forward, up, forward.cross(up));
    let local_basis = Mat3::from_columns(aim_unit, turn_unit, aim_unit.cross(turn_unit));
    let rotation = world_basis * local_basis.transpose();

    Some(rotation.to_euler(order))
}

/// Herorienteer de keten van `chain_end` tot en met `chain_root` tegen het
/// gegeven vlak. Het enige muterende toegangspunt van de engine.
///
/// Per joint, van einde naar wortel: kinderen naar de scene-root, oude
/// wereldpose vastleggen, positie op het vlak projecteren, mikken op de
/// vorige joint (of op de oude kijkrichting voor het keteneinde), kinderen
/// met behoud van wereldpose terughangen.
///
/// Geen voorouder/afstammeling-paar: [`ReorientStatus::NoOp`], de scene
/// blijft onaangeroerd.
pub fn reorient_chain<S: SceneGraph>(
    scene: &mut S,
    chain_end: NodeId,
    chain_root: NodeId,
    plane: &Plane,
    aim_axis: Axis,
    turn_axis: Axis,
) -> Result<ReorientStatus, OrientError> {
    if aim_axis.component == turn_axis.component {
        return Err(OrientError::AxesConflict);
    }

    if !is_descendant(scene, chain_root, chain_end) {
        debug!("selectie {chain_root:?}/{chain_end:?} vormt geen keten; niets te doen");
        return Ok(ReorientStatus::NoOp);
    }

    let mut current = chain_end;
    let mut last: Option<NodeId> = None;
    let mut processed = 0usize;

    loop {
        // Kinderen eerst los, zodat de verplaatsing van deze joint ze niet
        // meesleept.
        let children = scene.children(current);
        if let Some(children) = &children {
            for child in children {
                scene.reparent(*child, None)?;
            }
        }

        let old_position = scene.world_position(current)?;
        let old_orientation = scene.world_orientation(current)?;

        let new_position = plane.project_point(old_position);
        scene.set_world_position(current, new_position)?;

        if last.is_some() || children.is_none() {
            let target = match last {
                Some(previous) => scene.world_position(previous)?,
                // Keteneinde zonder kinderen: verleng de oude kijkrichting
                // en projecteer die op het vlak, zodat de joint zo dicht
                // mogelijk bij zijn oude richting blijft kijken.
                None => plane.project_point(
                    old_position + old_orientation.direction_along(aim_axis) * AIM_REACH,
                ),
            };

            match aim_orientation(
                new_position,
                target,
                aim_axis,
                turn_axis,
                plane.normal(),
                scene.rotation_order(current),
            ) {
                Some(orientation) => scene.set_world_orientation(current, orientation)?,
                None => warn!("mikpunt valt samen met joint {current:?}; orientatie overgeslagen"),
            }
        } else {
            // Keteneinde met een eigen zijtak: er is niets om op te mikken.
            debug!("joint {current:?} heeft kinderen buiten de keten; orientatie overgeslagen");
        }

        scene.zero_scale_orientation(current)?;

        if let Some(children) = &children {
            for child in children {
                scene.reparent(*child, Some(current))?;
                scene.fold_rotation_into_orient(*child)?;
            }
        }

        processed += 1;

        if current == chain_root {
            debug!("keten herorienteerd over {processed} joints");
            return Ok(ReorientStatus::Applied { joints: processed });
        }

        last = Some(current);
        current = scene
            .parent(current)
            .ok_or(OrientError::ChainInterrupted(current))?;
    }
}
