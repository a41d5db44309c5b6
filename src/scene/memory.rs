//! In-geheugen referentie-implementatie van [`SceneGraph`]. Dient gastheren
//! zonder eigen scene-graaf en alle tests in deze crate. Wereldposes zijn
//! rigide en worden recursief samengesteld via quaternionen.

use std::collections::HashMap;

use crate::geom::{EulerRotation, Quat, RotationOrder, Vec3};

use super::{NodeId, SceneError, SceneGraph};

/// Een node in de geheugen-scene: lokale translatie, lokale rotatie in de
/// eigen volgorde, en voor joints een joint-orient voorrotatie plus een
/// eventueel schaal-orientatierestant.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: NodeId,
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    translation: Vec3,
    rotation: EulerRotation,
    joint_orient: EulerRotation,
    scale_orient: EulerRotation,
    is_joint: bool,
}

impl SceneNode {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn local_translation(&self) -> Vec3 {
        self.translation
    }

    #[must_use]
    pub const fn local_rotation(&self) -> EulerRotation {
        self.rotation
    }

    #[must_use]
    pub const fn joint_orient(&self) -> EulerRotation {
        self.joint_orient
    }

    /// Samengestelde lokale rotatie: joint-orient, dan lokale rotatie, dan
    /// het schaal-orientatierestant.
    fn local_quat(&self) -> Quat {
        self.joint_orient.to_quat() * self.rotation.to_quat() * self.scale_orient.to_quat()
    }
}

/// Scene-container met een index voor snelle lookups.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: Vec<SceneNode>,
    node_index: HashMap<NodeId, usize>,
    next_id: usize,
}

impl MemoryScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Voeg een joint toe onder `parent` (`None` = scene-root).
    pub fn add_joint(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        translation: Vec3,
    ) -> Result<NodeId, SceneError> {
        self.insert(name, parent, translation, true)
    }

    /// Voeg een gewone transform-node toe (geen joint-orient).
    pub fn add_transform(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        translation: Vec3,
    ) -> Result<NodeId, SceneError> {
        self.insert(name, parent, translation, false)
    }

    fn insert(
        &mut self,
        name: &str,
        parent: Option<NodeId>,
        translation: Vec3,
        is_joint: bool,
    ) -> Result<NodeId, SceneError> {
        if let Some(parent) = parent {
            if !self.node_index.contains_key(&parent) {
                return Err(SceneError::UnknownNode(parent));
            }
        }

        let id = NodeId::new(self.next_id);
        self.next_id += 1;

        let idx = self.nodes.len();
        self.nodes.push(SceneNode {
            id,
            name: name.to_owned(),
            parent,
            children: Vec::new(),
            translation,
            rotation: EulerRotation::IDENTITY,
            joint_orient: EulerRotation::IDENTITY,
            scale_orient: EulerRotation::IDENTITY,
            is_joint,
        });
        self.node_index.insert(id, idx);

        if let Some(parent) = parent {
            let parent_idx = self.index(parent)?;
            self.nodes[parent_idx].children.push(id);
        }

        Ok(id)
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.node_index.get(&id).map(|idx| &self.nodes[*idx])
    }

    /// Zet de lokale rotatie (inclusief rotatievolgorde) van een node.
    pub fn set_local_rotation(
        &mut self,
        id: NodeId,
        rotation: EulerRotation,
    ) -> Result<(), SceneError> {
        let idx = self.index(id)?;
        self.nodes[idx].rotation = rotation;
        Ok(())
    }

    /// Zet de joint-orient voorrotatie van een joint.
    pub fn set_joint_orient(
        &mut self,
        id: NodeId,
        orient: EulerRotation,
    ) -> Result<(), SceneError> {
        let idx = self.index(id)?;
        self.nodes[idx].joint_orient = orient;
        Ok(())
    }

    fn index(&self, id: NodeId) -> Result<usize, SceneError> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(SceneError::UnknownNode(id))
    }

    /// Wereldpose (orientatie + positie) door de ouderketen heen.
    fn world_pose(&self, id: NodeId) -> Result<(Quat, Vec3), SceneError> {
        let idx = self.index(id)?;
        let node = &self.nodes[idx];
        let local_q = node.local_quat();

        match node.parent {
            None => Ok((local_q, node.translation)),
            Some(parent) => {
                let (parent_q, parent_pos) = self.world_pose(parent)?;
                Ok((
                    (parent_q * local_q).normalized(),
                    parent_pos + parent_q.rotate_vec(node.translation),
                ))
            }
        }
    }

    /// Pose van de ouder, of identiteit voor een root-node.
    fn parent_pose(&self, parent: Option<NodeId>) -> Result<(Quat, Vec3), SceneError> {
        match parent {
            None => Ok((Quat::IDENTITY, Vec3::ZERO)),
            Some(parent) => self.world_pose(parent),
        }
    }

    fn detach_from_parent(&mut self, id: NodeId) -> Result<(), SceneError> {
        let idx = self.index(id)?;
        if let Some(old_parent) = self.nodes[idx].parent {
            let parent_idx = self.index(old_parent)?;
            self.nodes[parent_idx].children.retain(|child| *child != id);
        }
        self.nodes[idx].parent = None;
        Ok(())
    }

    /// Herbereken de lokale transformatie van `id` zodat de gegeven
    /// wereldpose behouden blijft onder de huidige ouder.
    fn rebuild_local_from_world(
        &mut self,
        id: NodeId,
        world_q: Quat,
        world_pos: Vec3,
    ) -> Result<(), SceneError> {
        let idx = self.index(id)?;
        let (parent_q, parent_pos) = self.parent_pose(self.nodes[idx].parent)?;

        let node = &mut self.nodes[idx];
        let inverse_parent = parent_q.conjugate();
        node.translation = inverse_parent.rotate_vec(world_pos - parent_pos);

        let local_q = (node.joint_orient.to_quat().conjugate()
            * inverse_parent
            * world_q
            * node.scale_orient.to_quat().conjugate())
        .normalized();
        node.rotation = EulerRotation::from_quat(local_q, node.rotation.order);
        Ok(())
    }
}

impl SceneGraph for MemoryScene {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(|n| n.parent)
    }

    fn children(&self, node: NodeId) -> Option<Vec<NodeId>> {
        let children = &self.node(node)?.children;
        if children.is_empty() {
            None
        } else {
            Some(children.clone())
        }
    }

    fn is_joint(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|n| n.is_joint)
    }

    fn rotation_order(&self, node: NodeId) -> RotationOrder {
        self.node(node)
            .map_or(RotationOrder::Xyz, |n| n.rotation.order)
    }

    fn world_position(&self, node: NodeId) -> Result<Vec3, SceneError> {
        self.world_pose(node).map(|(_, position)| position)
    }

    fn set_world_position(&mut self, node: NodeId, position: Vec3) -> Result<(), SceneError> {
        let idx = self.index(node)?;
        let (parent_q, parent_pos) = self.parent_pose(self.nodes[idx].parent)?;
        self.nodes[idx].translation = parent_q.conjugate().rotate_vec(position - parent_pos);
        Ok(())
    }

    fn world_orientation(&self, node: NodeId) -> Result<EulerRotation, SceneError> {
        let order = self.rotation_order(node);
        let (world_q, _) = self.world_pose(node)?;
        Ok(EulerRotation::from_quat(world_q, order))
    }

    fn set_world_orientation(
        &mut self,
        node: NodeId,
        orientation: EulerRotation,
    ) -> Result<(), SceneError> {
        let idx = self.index(node)?;
        let (parent_q, _) = self.parent_pose(self.nodes[idx].parent)?;

        let target = orientation.to_quat();
        let n = &mut self.nodes[idx];
        let local_q = (n.joint_orient.to_quat().conjugate()
            * parent_q.conjugate()
            * target
            * n.scale_orient.to_quat().conjugate())
        .normalized();
        n.rotation = EulerRotation::from_quat(local_q, n.rotation.order);
        Ok(())
    }

    fn reparent(&mut self, node: NodeId, new_parent: Option<NodeId>) -> Result<(), SceneError> {
        let idx = self.index(node)?;

        if let Some(parent) = new_parent {
            self.index(parent)?;
            // Een node onder zichzelf of onder een eigen afstammeling hangen
            // zou de graaf cyclisch maken.
            let mut current = Some(parent);
            while let Some(candidate) = current {
                if candidate == node {
                    return Err(SceneError::CyclicReparent(node));
                }
                current = self.parent(candidate);
            }
        }

        if self.nodes[idx].parent == new_parent {
            return Ok(());
        }

        let (world_q, world_pos) = self.world_pose(node)?;

        self.detach_from_parent(node)?;
        if let Some(parent) = new_parent {
            let parent_idx = self.index(parent)?;
            self.nodes[parent_idx].children.push(node);
            self.nodes[idx].parent = Some(parent);
        }

        self.rebuild_local_from_world(node, world_q, world_pos)
    }

    fn fold_rotation_into_orient(&mut self, node: NodeId) -> Result<(), SceneError> {
        let idx = self.index(node)?;
        let n = &mut self.nodes[idx];
        if !n.is_joint {
            return Ok(());
        }

        let folded = (n.joint_orient.to_quat() * n.rotation.to_quat()).normalized();
        n.joint_orient = EulerRotation::from_quat(folded, n.joint_orient.order);
        n.rotation = EulerRotation::identity(n.rotation.order);
        Ok(())
    }

    fn zero_scale_orientation(&mut self, node: NodeId) -> Result<(), SceneError> {
        let idx = self.index(node)?;
        let n = &mut self.nodes[idx];

        let folded = (n.rotation.to_quat() * n.scale_orient.to_quat()).normalized();
        n.rotation = EulerRotation::from_quat(folded, n.rotation.order);
        n.scale_orient = EulerRotation::identity(n.scale_orient.order);
        Ok(())
    }
}
