use std::fmt::Write;

use lego_common::Color;
use lego_scene::{Light, NodeKind, PerspectiveCamera, Scene};
use serde::{Deserialize, Serialize};

/// Reference grid drawn on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub enabled: bool,
    /// Number of lines on each side of the origin.
    pub half_extent: u32,
    pub spacing: f32,
    pub color: Color,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            half_extent: 20,
            spacing: 1.0,
            color: Color::from_hex(0x555566),
        }
    }
}

/// Backend-neutral renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    /// Scene background; copied onto the scene at composition time.
    pub clear_color: Color,
    pub grid: GridSettings,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            clear_color: Color::from_hex(0x1a1a26),
            grid: GridSettings::default(),
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and camera and produces output. It may keep
/// GPU-side caches, which is why it takes `&mut self`, but scene truth stays
/// with the caller.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Self::Output;

    /// The drawable area changed size.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Headless renderer producing a text description of each frame.
///
/// Used by the CLI, by logging, and by tests of the composer.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    frames: u64,
    size: (u32, u32),
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> String {
        self.frames += 1;
        let mut out = String::new();
        let (p, t) = (camera.position, camera.target);

        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame {} ({} nodes, {} triangles, background {}) ===",
            self.frames,
            scene.node_count(),
            scene.triangle_count(),
            scene.background
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2}) fov={:.0} aspect={:.2}",
            p.x, p.y, p.z, t.x, t.y, t.z, camera.fov, camera.aspect
        );

        for (id, node) in scene.nodes() {
            let pos = node.transform.position;
            let what = match &node.kind {
                NodeKind::Mesh(mesh) => format!(
                    "mesh tris={} color={}",
                    mesh.geometry.triangle_count(),
                    mesh.color
                ),
                NodeKind::Light(light) => describe_light(light),
            };
            let _ = writeln!(
                out,
                "  [{}] {} pos=({:.2}, {:.2}, {:.2}) {}{}",
                id.short(),
                node.name,
                pos.x,
                pos.y,
                pos.z,
                what,
                if node.visible { "" } else { " (hidden)" }
            );
        }

        tracing::trace!(frame = self.frames, nodes = scene.node_count(), "text frame");
        out
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        tracing::debug!(width, height, "text renderer resized");
    }
}

fn describe_light(light: &Light) -> String {
    let mut s = format!(
        "{} light color={} intensity={:.2}",
        light.kind_name(),
        light.color(),
        light.intensity()
    );
    if let Light::Point { distance, .. } = light {
        let _ = write!(s, " distance={distance:.1}");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use lego_common::Transform;
    use lego_scene::{Geometry, Mesh, Node};

    #[test]
    fn empty_scene() {
        let mut renderer = DebugTextRenderer::new();
        let output = renderer.render(&Scene::new(), &PerspectiveCamera::default());

        assert!(output.contains("Frame 1"));
        assert!(output.contains("0 nodes"));
        assert_eq!(renderer.frames(), 1);
    }

    #[test]
    fn lists_meshes_and_lights() {
        let mut scene = Scene::new();
        scene.add(Node::mesh(
            "ground",
            Mesh::new(Geometry::cuboid(1.0, 1.0, 1.0), Color::WHITE),
            Transform::from_position(Vec3::new(1.0, 2.0, 3.0)),
        ));
        scene.add(Node::light(
            "lamp",
            Light::point(Color::WHITE, 2.0, 15.0),
            Transform::default(),
        ));

        let output = DebugTextRenderer::new().render(&scene, &PerspectiveCamera::default());
        assert!(output.contains("ground pos=(1.00, 2.00, 3.00) mesh tris=12"));
        assert!(output.contains("point light"));
        assert!(output.contains("distance=15.0"));
    }

    #[test]
    fn counts_frames_and_tracks_size() {
        let mut renderer = DebugTextRenderer::new();
        let (scene, camera) = (Scene::new(), PerspectiveCamera::default());
        renderer.render(&scene, &camera);
        let second = renderer.render(&scene, &camera);
        renderer.resize(640, 480);

        assert!(second.contains("Frame 2"));
        assert_eq!(renderer.size(), (640, 480));
    }

    #[test]
    fn settings_defaults() {
        let settings = RendererSettings::default();
        assert!(settings.grid.enabled);
        assert_eq!(settings.clear_color.to_hex(), 0x1a1a26);
    }
}
