//! Scene-graaf abstractie. De echte scene is eigendom van het
//! gastheerprogramma; de engine werkt uitsluitend tegen dit interface en
//! blijft daardoor gastheer-agnostisch.

pub mod hierarchy;
pub mod memory;

use crate::geom::{EulerRotation, RotationOrder, Vec3};

/// Identifier voor een node binnen de scene.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Ord, PartialOrd)]
pub struct NodeId(pub usize);

impl NodeId {
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

/// Fouttype voor scene-operaties. Een falende mutatie is fataal voor de
/// lopende bewerking; er wordt nergens opnieuw geprobeerd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} niet gevonden in de scene")]
    UnknownNode(NodeId),
    #[error("herparenteren van {0:?} zou een cyclus maken")]
    CyclicReparent(NodeId),
}

/// Capabiliteiten die de engine van een scene-graaf nodig heeft.
///
/// Wereldtransformaties zijn rigide (positie + orientatie); schaal blijft
/// buiten dit interface. Alle mutaties zijn one-shot: er blijft geen
/// constraint of ander levend object achter in de scene.
pub trait SceneGraph {
    /// Ouder van een node, of `None` voor een root of onbekende node.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Directe kinderen, of `None` wanneer de node er geen heeft.
    fn children(&self, node: NodeId) -> Option<Vec<NodeId>>;

    /// Of de node een joint is. Joints dragen een joint-orient voorrotatie
    /// die meetelt in de wereldorientatie.
    fn is_joint(&self, node: NodeId) -> bool;

    /// Rotatievolgorde van de lokale rotatie van de node.
    fn rotation_order(&self, node: NodeId) -> RotationOrder;

    fn world_position(&self, node: NodeId) -> Result<Vec3, SceneError>;

    /// Zet de wereldpositie; de lokale translatie wordt herrekend tegen de
    /// huidige ouder.
    fn set_world_position(&mut self, node: NodeId, position: Vec3) -> Result<(), SceneError>;

    /// Wereldorientatie: ouder-rotatie, joint-orient (alleen joints) en
    /// lokale rotatie in de eigen volgorde, samengesteld tot een enkele
    /// [`EulerRotation`] met gedefinieerde volgorde.
    fn world_orientation(&self, node: NodeId) -> Result<EulerRotation, SceneError>;

    /// Bak een wereldorientatie in de lokale rotatie van de node; de
    /// joint-orient blijft onaangeroerd.
    fn set_world_orientation(
        &mut self,
        node: NodeId,
        orientation: EulerRotation,
    ) -> Result<(), SceneError>;

    /// Hang een node onder een nieuwe ouder (`None` = scene-root) met behoud
    /// van de wereldtransformatie.
    fn reparent(&mut self, node: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError>;

    /// Vouw de lokale rotatie van een joint in diens joint-orient zodat de
    /// lokale rotatie identiteit wordt; de wereldpose verandert niet.
    /// Geen effect op niet-joints.
    fn fold_rotation_into_orient(&mut self, node: NodeId) -> Result<(), SceneError>;

    /// Vouw een eventueel schaal-orientatierestant terug in de lokale
    /// rotatie. Geen effect wanneer het restant identiteit is.
    fn zero_scale_orientation(&mut self, node: NodeId) -> Result<(), SceneError>;
}
