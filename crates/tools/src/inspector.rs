use lego_common::NodeId;
use lego_scene::{NodeKind, Scene};

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene for the CLI and the debug overlay.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene) -> SceneSummary {
        let mut summary = SceneSummary {
            nodes: scene.node_count(),
            meshes: 0,
            lights: 0,
            hidden: 0,
            triangles: scene.triangle_count(),
        };
        for node in scene.nodes().values() {
            match node.kind {
                NodeKind::Mesh(_) => summary.meshes += 1,
                NodeKind::Light(_) => summary.lights += 1,
            }
            if !node.visible {
                summary.hidden += 1;
            }
        }
        summary
    }

    pub fn inspect_node(scene: &Scene, id: NodeId) -> Option<NodeInfo> {
        scene.get(id).map(|node| {
            let t = &node.transform;
            NodeInfo {
                id,
                name: node.name.clone(),
                kind: match &node.kind {
                    NodeKind::Mesh(_) => "mesh",
                    NodeKind::Light(light) => light.kind_name(),
                },
                position: t.position.to_array(),
                scale: t.scale.to_array(),
                visible: node.visible,
            }
        })
    }

    pub fn list_nodes(scene: &Scene) -> Vec<NodeInfo> {
        scene
            .nodes()
            .keys()
            .filter_map(|id| Self::inspect_node(scene, *id))
            .collect()
    }
}

/// Counts over the whole scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub nodes: usize,
    pub meshes: usize,
    pub lights: usize,
    pub hidden: usize,
    pub triangles: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} meshes={} lights={} hidden={} triangles={}",
            self.nodes, self.meshes, self.lights, self.hidden, self.triangles
        )
    }
}

#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    /// "mesh" or the light kind.
    pub kind: &'static str,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    pub visible: bool,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} ({}) pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id.short(),
            self.name,
            self.kind,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )?;
        if !self.visible {
            write!(f, " hidden")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lego_common::{Color, Transform};
    use lego_scene::{Geometry, Light, Mesh, Node};

    fn scene() -> (Scene, NodeId) {
        let mut scene = Scene::new();
        let cube = scene.add(Node::mesh(
            "cube",
            Mesh::new(Geometry::cuboid(1.0, 1.0, 1.0), Color::WHITE),
            Transform::from_position(glam::Vec3::new(1.0, 2.0, 3.0)),
        ));
        scene.add(Node::light(
            "sun",
            Light::directional(Color::WHITE, 1.0),
            Transform::default(),
        ));
        (scene, cube)
    }

    #[test]
    fn summary_counts_kinds() {
        let (mut scene, cube) = scene();
        scene.get_mut(cube).unwrap().visible = false;

        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.nodes, 2);
        assert_eq!(summary.meshes, 1);
        assert_eq!(summary.lights, 1);
        assert_eq!(summary.hidden, 1);
        assert_eq!(summary.triangles, 0);
    }

    #[test]
    fn inspect_node_found() {
        let (scene, cube) = scene();
        let info = SceneInspector::inspect_node(&scene, cube).unwrap();
        assert_eq!(info.position, [1.0, 2.0, 3.0]);
        assert_eq!(info.kind, "mesh");
        assert!(format!("{info}").contains("cube (mesh)"));
    }

    #[test]
    fn inspect_node_not_found() {
        let (scene, _) = scene();
        assert!(SceneInspector::inspect_node(&scene, NodeId::new()).is_none());
    }

    #[test]
    fn list_nodes_covers_scene() {
        let (scene, _) = scene();
        let kinds: Vec<_> = SceneInspector::list_nodes(&scene)
            .into_iter()
            .map(|n| n.kind)
            .collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&"directional"));
    }

    #[test]
    fn summary_display() {
        let s = format!("{}", SceneInspector::summary(&Scene::new()));
        assert!(s.contains("nodes=0"));
    }
}
