//! Alleen-lezen introspectie van de scene-hierarchie: afstammingstests,
//! ouderketens en gemiddelden over nodes. Generiek over [`SceneGraph`],
//! zodat iedere gastheer-adapter dezelfde queries krijgt.

use crate::geom::{Axis, Vec3};

use super::{NodeId, SceneError, SceneGraph};

/// Gevalideerde selectie van een joint-keten: `chain_root` is een strikte
/// voorouder van `chain_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSelection {
    pub chain_root: NodeId,
    pub chain_end: NodeId,
}

/// Bepaal uit twee geselecteerde nodes welke de ketenwortel en welke het
/// keteneinde is. Volgorde-onafhankelijk: de voorouder wordt altijd de
/// wortel. `None` wanneer geen van beide een voorouder van de ander is
/// (of beide dezelfde node zijn).
#[must_use]
pub fn validate_chain_selection<S: SceneGraph>(
    scene: &S,
    node_a: NodeId,
    node_b: NodeId,
) -> Option<ChainSelection> {
    if is_descendant(scene, node_a, node_b) {
        Some(ChainSelection {
            chain_root: node_a,
            chain_end: node_b,
        })
    } else if is_descendant(scene, node_b, node_a) {
        Some(ChainSelection {
            chain_root: node_b,
            chain_end: node_a,
        })
    } else {
        None
    }
}

/// Of `node` een afstammeling van `ancestor` is. Een node is geen
/// afstammeling van zichzelf. O(diepte).
#[must_use]
pub fn is_descendant<S: SceneGraph>(scene: &S, ancestor: NodeId, node: NodeId) -> bool {
    if ancestor == node {
        return false;
    }

    let mut current = scene.parent(node);
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = scene.parent(parent);
    }

    false
}

/// Nodes strikt tussen `end` en `root`, geordend van einde naar wortel.
/// `None` wanneer `root == end` of `root` niet boven `end` ligt.
#[must_use]
pub fn inner_parent_chain<S: SceneGraph>(
    scene: &S,
    root: NodeId,
    end: NodeId,
) -> Option<Vec<NodeId>> {
    if root == end {
        return None;
    }

    let mut chain = Vec::new();
    let mut current = scene.parent(end)?;
    while current != root {
        chain.push(current);
        current = scene.parent(current)?;
    }

    Some(chain)
}

/// Volledige keten van `end` tot en met `root`, geordend van einde naar
/// wortel. `None` onder dezelfde voorwaarden als [`inner_parent_chain`].
#[must_use]
pub fn whole_parent_chain<S: SceneGraph>(
    scene: &S,
    root: NodeId,
    end: NodeId,
) -> Option<Vec<NodeId>> {
    let inner = inner_parent_chain(scene, root, end)?;

    let mut chain = Vec::with_capacity(inner.len() + 2);
    chain.push(end);
    chain.extend(inner);
    chain.push(root);
    Some(chain)
}

/// Zwaartepunt van de wereldposities van de gegeven nodes; nulvector voor
/// een lege lijst.
pub fn average_position<S: SceneGraph>(
    scene: &S,
    nodes: &[NodeId],
) -> Result<Vec3, SceneError> {
    let mut centroid = Vec3::ZERO;
    for node in nodes {
        centroid = centroid + scene.world_position(*node)?;
    }

    if nodes.is_empty() {
        Ok(centroid)
    } else {
        Ok(centroid / nodes.len() as f64)
    }
}

/// Gemiddelde kijkrichting van de nodes langs `axis`: de genormaliseerde som
/// van de per-node richtingsvectoren. Valt terug op +X wanneer de som exact
/// nul is, zodat afnemers altijd een richting hebben.
pub fn average_direction<S: SceneGraph>(
    scene: &S,
    nodes: &[NodeId],
    axis: Axis,
) -> Result<Vec3, SceneError> {
    let mut sum = Vec3::ZERO;
    for node in nodes {
        sum = sum + scene.world_orientation(*node)?.direction_along(axis);
    }

    Ok(sum.normalized().unwrap_or(Vec3::X))
}

#[cfg(test)]
mod tests {
    use super::{
        inner_parent_chain, is_descendant, validate_chain_selection, whole_parent_chain,
    };
    use crate::geom::{Axis, Tolerance, Vec3};
    use crate::scene::hierarchy::{average_direction, average_position};
    use crate::scene::memory::MemoryScene;

    #[test]
    fn descendant_walks_the_whole_parent_chain() {
        let mut scene = MemoryScene::new();
        let root = scene.add_joint("heup", None, Vec3::ZERO).unwrap();
        let mid = scene.add_joint("knie", Some(root), Vec3::Y).unwrap();
        let end = scene.add_joint("enkel", Some(mid), Vec3::Y).unwrap();
        let loose = scene.add_joint("los", None, Vec3::X).unwrap();

        assert!(is_descendant(&scene, root, end));
        assert!(is_descendant(&scene, mid, end));
        assert!(!is_descendant(&scene, end, root));
        assert!(!is_descendant(&scene, root, root));
        assert!(!is_descendant(&scene, root, loose));
    }

    #[test]
    fn chain_selection_is_order_independent() {
        let mut scene = MemoryScene::new();
        let root = scene.add_joint("a", None, Vec3::ZERO).unwrap();
        let end = scene.add_joint("b", Some(root), Vec3::Y).unwrap();
        let loose = scene.add_joint("c", None, Vec3::X).unwrap();

        let forward = validate_chain_selection(&scene, root, end).expect("keten geldig");
        let reversed = validate_chain_selection(&scene, end, root).expect("keten geldig");
        assert_eq!(forward, reversed);
        assert_eq!(forward.chain_root, root);
        assert_eq!(forward.chain_end, end);

        assert!(validate_chain_selection(&scene, root, loose).is_none());
        assert!(validate_chain_selection(&scene, root, root).is_none());
    }

    #[test]
    fn parent_chains_run_from_end_to_root() {
        let mut scene = MemoryScene::new();
        let root = scene.add_joint("r", None, Vec3::ZERO).unwrap();
        let a = scene.add_joint("a", Some(root), Vec3::Y).unwrap();
        let b = scene.add_joint("b", Some(a), Vec3::Y).unwrap();
        let end = scene.add_joint("e", Some(b), Vec3::Y).unwrap();

        assert_eq!(inner_parent_chain(&scene, root, end).unwrap(), vec![b, a]);
        assert_eq!(
            whole_parent_chain(&scene, root, end).unwrap(),
            vec![end, b, a, root]
        );
        assert!(whole_parent_chain(&scene, root, root).is_none());
        assert!(whole_parent_chain(&scene, end, root).is_none());
    }

    #[test]
    fn averages_fall_back_on_empty_or_cancelled_input() {
        let mut scene = MemoryScene::new();
        let a = scene.add_joint("a", None, Vec3::new(0.0, 0.0, 0.0)).unwrap();
        let b = scene.add_joint("b", None, Vec3::new(2.0, 4.0, 6.0)).unwrap();

        let centroid = average_position(&scene, &[a, b]).unwrap();
        assert!(Tolerance::DEFAULT.approx_eq_vec3(centroid, Vec3::new(1.0, 2.0, 3.0)));
        assert!(
            Tolerance::DEFAULT.approx_eq_vec3(average_position(&scene, &[]).unwrap(), Vec3::ZERO)
        );

        // Identiteitsorientaties kijken allemaal langs +X.
        let facing = average_direction(&scene, &[a, b], Axis::X).unwrap();
        assert!(Tolerance::DEFAULT.approx_eq_vec3(facing, Vec3::X));

        // Lege som valt terug op +X.
        let fallback = average_direction(&scene, &[], Axis::Z).unwrap();
        assert!(Tolerance::DEFAULT.approx_eq_vec3(fallback, Vec3::X));
    }
}
