use std::collections::BTreeMap;

use lego_common::{Color, NodeId, Transform};

use crate::geometry::Mesh;
use crate::light::Light;

/// What a node draws or emits.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Mesh(Mesh),
    Light(Light),
}

/// A named, positioned entry in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub visible: bool,
}

impl Node {
    pub fn mesh(name: impl Into<String>, mesh: Mesh, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            kind: NodeKind::Mesh(mesh),
            visible: true,
        }
    }

    pub fn light(name: impl Into<String>, light: Light, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            kind: NodeKind::Light(light),
            visible: true,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(m) => Some(m),
            NodeKind::Light(_) => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(l) => Some(l),
            NodeKind::Mesh(_) => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(l) => Some(l),
            NodeKind::Mesh(_) => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(m) => Some(m),
            NodeKind::Light(_) => None,
        }
    }
}

/// Errors from scene operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
}

/// The scene graph.
///
/// A flat set of nodes keyed by id. BTreeMap keeps iteration order stable
/// between frames and platforms.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    pub background: Color,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_background(Color::from_hex(0x1a1a26))
    }

    pub fn with_background(background: Color) -> Self {
        Self {
            nodes: BTreeMap::new(),
            background,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, Node> {
        &self.nodes
    }

    /// Add a node and return its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId::new();
        tracing::debug!(id = %id.short(), name = %node.name, "node added");
        self.nodes.insert(id, node);
        id
    }

    pub fn remove(&mut self, id: NodeId) -> Result<Node, SceneError> {
        self.nodes.remove(&id).ok_or(SceneError::NodeNotFound(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// First node with the given name, in id order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| *id)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        node.transform = transform;
        Ok(())
    }

    /// Visible light nodes with their transforms.
    pub fn lights(&self) -> impl Iterator<Item = (&Transform, &Light)> {
        self.nodes
            .values()
            .filter(|n| n.visible)
            .filter_map(|n| n.as_light().map(|l| (&n.transform, l)))
    }

    /// Ids of every light node, hidden ones included.
    pub fn light_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, n)| n.as_light().is_some())
            .map(|(id, _)| *id)
    }

    /// Visible mesh nodes with their transforms.
    pub fn meshes(&self) -> impl Iterator<Item = (&Transform, &Mesh)> {
        self.nodes
            .values()
            .filter(|n| n.visible)
            .filter_map(|n| n.as_mesh().map(|m| (&n.transform, m)))
    }

    /// Sum of ambient contributions, as a color.
    pub fn ambient(&self) -> Color {
        self.lights()
            .filter_map(|(_, light)| match light {
                Light::Ambient { color, intensity } => Some(color.scaled(*intensity)),
                _ => None,
            })
            .fold(Color::BLACK, |acc, c| {
                Color::rgb(acc.r + c.r, acc.g + c.g, acc.b + c.b)
            })
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes().map(|(_, m)| m.geometry.triangle_count()).sum()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use glam::Vec3;

    fn cube() -> Node {
        Node::mesh(
            "cube",
            Mesh::new(Geometry::cuboid(1.0, 1.0, 1.0), Color::WHITE),
            Transform::default(),
        )
    }

    #[test]
    fn scene_starts_empty() {
        let s = Scene::new();
        assert!(s.is_empty());
        assert_eq!(s.triangle_count(), 0);
    }

    #[test]
    fn add_find_remove() {
        let mut s = Scene::new();
        let id = s.add(cube());
        assert_eq!(s.find("cube"), Some(id));
        assert_eq!(s.node_count(), 1);

        let node = s.remove(id).unwrap();
        assert_eq!(node.name, "cube");
        assert!(matches!(s.remove(id), Err(SceneError::NodeNotFound(_))));
    }

    #[test]
    fn set_transform_missing_node_fails() {
        let mut s = Scene::new();
        let err = s.set_transform(NodeId::new(), Transform::default());
        assert!(err.is_err());
    }

    #[test]
    fn set_transform_moves_node() {
        let mut s = Scene::new();
        let id = s.add(cube());
        s.set_transform(id, Transform::from_position(Vec3::Y)).unwrap();
        assert_eq!(s.get(id).unwrap().transform.position, Vec3::Y);
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let mut s = Scene::new();
        let id = s.add(cube());
        s.add(Node::light(
            "sun",
            Light::directional(Color::WHITE, 1.0),
            Transform::default(),
        ));
        assert_eq!(s.meshes().count(), 1);
        assert_eq!(s.lights().count(), 1);
        assert_eq!(s.light_ids().count(), 1);

        s.get_mut(id).unwrap().visible = false;
        assert_eq!(s.meshes().count(), 0);
        assert_eq!(s.triangle_count(), 0);
    }

    #[test]
    fn ambient_sums_ambient_lights() {
        let mut s = Scene::new();
        s.add(Node::light(
            "a",
            Light::ambient(Color::WHITE, 0.25),
            Transform::default(),
        ));
        s.add(Node::light(
            "b",
            Light::ambient(Color::rgb(1.0, 0.0, 0.0), 0.5),
            Transform::default(),
        ));
        s.add(Node::light(
            "sun",
            Light::directional(Color::WHITE, 3.0),
            Transform::default(),
        ));
        assert_eq!(s.ambient(), Color::rgb(0.75, 0.25, 0.25));
    }
}
