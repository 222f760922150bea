use lego_common::{NodeId, Transform};
use lego_debug::{BoundParams, DebugBinder, DebugPanel, Options};
use lego_input::Gesture;
use lego_render::{GraphicsProbe, Renderer};
use lego_scene::{Geometry, Mesh, Node, OrbitControls, PerspectiveCamera, Scene};
use lego_tools::FrameStats;

use crate::config::LegoConfig;
use crate::error::ComposeError;
use crate::mount::Mount;

/// Name of the ground node.
pub const GROUND_NAME: &str = "ground";

/// Per-frame callback, run before controls update and rendering.
pub type FrameCallback = Box<dyn FnMut(&mut Scene)>;

/// Fail with [`ComposeError::GraphicsUnsupported`] unless `probe` reports
/// hardware acceleration.
///
/// Hosts that must probe before they can build a renderer call this first.
pub fn ensure_graphics<P: GraphicsProbe + ?Sized>(probe: &P) -> Result<(), ComposeError> {
    if probe.is_supported() {
        return Ok(());
    }
    tracing::error!(probe = %probe.describe(), "no graphics acceleration");
    Err(ComposeError::GraphicsUnsupported)
}

/// Owns a scene and everything needed to render it frame by frame.
pub struct Lego<R: Renderer> {
    mount: Mount,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    renderer: R,
    debug: Option<DebugBinder>,
    stats: Option<FrameStats>,
    callbacks: Vec<FrameCallback>,
    ground: NodeId,
    frame: u64,
}

impl<R: Renderer> Lego<R> {
    /// Validate the mount and graphics support, then build the scene.
    ///
    /// Debugging gets a fresh panel; use [`Lego::with_panel`] to share one.
    pub fn new<P>(
        mount: Option<Mount>,
        config: &LegoConfig,
        probe: &P,
        renderer: R,
    ) -> Result<Self, ComposeError>
    where
        P: GraphicsProbe + ?Sized,
    {
        Self::with_panel(mount, config, probe, renderer, DebugPanel::new())
    }

    /// Like [`Lego::new`], registering debug controls in `panel`.
    pub fn with_panel<P>(
        mount: Option<Mount>,
        config: &LegoConfig,
        probe: &P,
        mut renderer: R,
        panel: DebugPanel,
    ) -> Result<Self, ComposeError>
    where
        P: GraphicsProbe + ?Sized,
    {
        let mount = match mount {
            Some(m) if m.is_container() => m,
            Some(m) => {
                return Err(ComposeError::InvalidMount(format!(
                    "'{}' is a {} element, expected a container",
                    m.label, m.kind
                )));
            }
            None => return Err(ComposeError::InvalidMount("nothing mounted".into())),
        };
        ensure_graphics(probe)?;
        config.validate()?;

        let mut scene = Scene::with_background(config.renderer.clear_color);
        let camera = PerspectiveCamera::new(&config.camera, mount.aspect());
        let controls = OrbitControls::new(&camera, config.controls);

        for light in &config.lights {
            scene.add(Node::light(
                light.name.clone(),
                light.light,
                Transform::from_position(light.position),
            ));
        }

        let g = &config.ground;
        let ground = scene.add(Node::mesh(
            GROUND_NAME,
            Mesh::new(Geometry::extruded_rect(g.width, g.depth, g.thickness), g.color),
            Transform::default(),
        ));

        renderer.resize(mount.width, mount.height);

        let debug = config
            .debug
            .enabled
            .then(|| DebugBinder::new(panel, config.debug.settings()));
        let stats = config.debug.stats.then(FrameStats::new);

        let debug_enabled = debug.is_some();
        tracing::info!(
            mount = %mount.label,
            width = mount.width,
            height = mount.height,
            graphics = %probe.describe(),
            nodes = scene.node_count(),
            debug = debug_enabled,
            "scene composed"
        );

        Ok(Self {
            mount,
            scene,
            camera,
            controls,
            renderer,
            debug,
            stats,
            callbacks: Vec::new(),
            ground,
            frame: 0,
        })
    }

    /// Register a callback run at the start of every frame.
    pub fn on_frame(&mut self, callback: impl FnMut(&mut Scene) + 'static) {
        self.callbacks.push(Box::new(callback));
        tracing::debug!(callbacks = self.callbacks.len(), "frame callback registered");
    }

    /// Render one frame `dt` seconds after the previous one.
    pub fn render(&mut self, dt: f32) -> R::Output {
        for callback in &mut self.callbacks {
            callback(&mut self.scene);
        }
        self.controls.update(&mut self.camera);
        if let Some(stats) = &mut self.stats {
            stats.record(dt);
        }
        self.frame += 1;
        self.renderer.render(&self.scene, &self.camera)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.mount.width = width;
        self.mount.height = height;
        self.camera.set_viewport(width, height);
        self.renderer.resize(width, height);
        tracing::debug!(width, height, "resized");
    }

    /// Forward a pointer gesture to the orbit controls. It takes effect on
    /// the next frame.
    pub fn handle_gesture(&mut self, gesture: Gesture) {
        self.controls.handle(gesture);
    }

    /// Bind a light node's intensity and color to a debug panel folder named
    /// after the node, and copy panel edits back onto the light every frame.
    ///
    /// Returns `None` when debugging is disabled or `id` is not a light.
    pub fn bind_light(&mut self, id: NodeId) -> Option<BoundParams> {
        let binder = self.debug.as_ref()?;
        let node = self.scene.get(id)?;
        let light = node.as_light()?;

        let options = Options::new()
            .with("intensity", light.intensity())
            .with("color", light.color());
        let bound = binder.add(&node.name, &options);

        let params = bound.clone();
        self.on_frame(move |scene| {
            let Some(light) = scene.get_mut(id).and_then(|n| n.as_light_mut()) else {
                return;
            };
            if let Some(intensity) = params.number("intensity") {
                light.set_intensity(intensity);
            }
            if let Some(color) = params.color("color") {
                light.set_color(color);
            }
        });
        Some(bound)
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The debug binder, when debugging is enabled.
    pub fn debug(&self) -> Option<&DebugBinder> {
        self.debug.as_ref()
    }

    pub fn panel(&self) -> Option<&DebugPanel> {
        self.debug.as_ref().map(DebugBinder::panel)
    }

    pub fn stats(&self) -> Option<&FrameStats> {
        self.stats.as_ref()
    }

    pub fn ground(&self) -> NodeId {
        self.ground
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::mount::MountKind;
    use glam::Vec2;
    use lego_common::Color;
    use lego_debug::Control;
    use lego_render::{AlwaysSupported, DebugTextRenderer, Unsupported};
    use lego_scene::Light;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records the order of frame work into a shared log.
    struct LoggingRenderer(Log);

    impl Renderer for LoggingRenderer {
        type Output = usize;

        fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) -> usize {
            self.0.borrow_mut().push("render".into());
            scene.node_count()
        }
    }

    fn mount() -> Option<Mount> {
        Some(Mount::container("viewport", 800, 600))
    }

    fn lego() -> Lego<DebugTextRenderer> {
        Lego::new(
            mount(),
            &LegoConfig::default(),
            &AlwaysSupported,
            DebugTextRenderer::new(),
        )
        .unwrap()
    }

    fn ground_count(scene: &Scene) -> usize {
        scene
            .nodes()
            .values()
            .filter(|n| n.name == GROUND_NAME)
            .count()
    }

    #[test]
    fn missing_mount_fails() {
        let result = Lego::new(
            None,
            &LegoConfig::default(),
            &AlwaysSupported,
            DebugTextRenderer::new(),
        );
        assert!(matches!(result, Err(ComposeError::InvalidMount(_))));
    }

    #[test]
    fn non_container_mount_fails() {
        let canvas = Mount {
            kind: MountKind::Canvas,
            ..Mount::container("overlay", 10, 10)
        };
        let err = Lego::new(
            Some(canvas),
            &LegoConfig::default(),
            &AlwaysSupported,
            DebugTextRenderer::new(),
        )
        .err()
        .unwrap();
        assert!(err.to_string().starts_with("no valid mount element provided"));
        assert!(err.to_string().contains("overlay"));
    }

    #[test]
    fn unsupported_graphics_fails() {
        let result = Lego::new(
            mount(),
            &LegoConfig::default(),
            &Unsupported,
            DebugTextRenderer::new(),
        );
        assert!(matches!(result, Err(ComposeError::GraphicsUnsupported)));
    }

    #[test]
    fn graphics_check_follows_probe() {
        assert!(ensure_graphics(&AlwaysSupported).is_ok());

        let err = ensure_graphics(&Unsupported).unwrap_err();
        assert!(matches!(err, ComposeError::GraphicsUnsupported));
        assert_eq!(
            err.to_string(),
            "graphics acceleration unsupported by this environment"
        );

        let boxed: Box<dyn GraphicsProbe> = Box::new(Unsupported);
        assert!(ensure_graphics(boxed.as_ref()).is_err());
    }

    #[test]
    fn invalid_config_fails() {
        let mut config = LegoConfig::default();
        config.camera.near = 0.0;
        let result = Lego::new(mount(), &config, &AlwaysSupported, DebugTextRenderer::new());
        assert!(matches!(result, Err(ComposeError::Config(_))));
    }

    #[test]
    fn ground_is_added_once() {
        let mut lego = lego();
        assert_eq!(ground_count(lego.scene()), 1);
        for _ in 0..5 {
            lego.render(1.0 / 60.0);
        }
        assert_eq!(ground_count(lego.scene()), 1);

        let ground = lego.scene().get(lego.ground()).unwrap();
        let (lo, hi) = ground.as_mesh().unwrap().geometry.bounds().unwrap();
        assert_eq!(hi.y, 0.0);
        assert!(lo.y < 0.0);
    }

    #[test]
    fn lights_come_from_config() {
        let lego = lego();
        let kinds: Vec<_> = lego.scene().lights().map(|(_, l)| l.kind_name()).collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&"ambient"));
        assert!(kinds.contains(&"directional"));
    }

    #[test]
    fn callbacks_run_in_order_before_render() {
        let log: Log = Rc::default();
        let mut lego = Lego::new(
            mount(),
            &LegoConfig::default(),
            &AlwaysSupported,
            LoggingRenderer(log.clone()),
        )
        .unwrap();

        for name in ["first", "second"] {
            let log = log.clone();
            lego.on_frame(move |_| log.borrow_mut().push(name.into()));
        }

        lego.render(0.016);
        lego.render(0.016);
        assert_eq!(
            *log.borrow(),
            ["first", "second", "render", "first", "second", "render"]
        );
        assert_eq!(lego.frame_count(), 2);
    }

    #[test]
    fn callbacks_can_edit_the_scene() {
        let mut lego = lego();
        let ground = lego.ground();
        lego.on_frame(move |scene| {
            if let Some(node) = scene.get_mut(ground) {
                node.visible = false;
            }
        });
        let frame = lego.render(0.016);
        assert!(frame.contains("ground"));
        assert!(frame.contains("(hidden)"));
    }

    #[test]
    fn resize_updates_camera_and_renderer() {
        let mut lego = lego();
        assert_eq!(lego.renderer().size(), (800, 600));

        lego.resize(1000, 500);
        assert_eq!(lego.camera().aspect, 2.0);
        assert_eq!(lego.renderer().size(), (1000, 500));
        assert_eq!(lego.mount().width, 1000);
    }

    #[test]
    fn gestures_move_the_camera_on_render() {
        let mut lego = lego();
        let before = lego.camera().position;
        lego.handle_gesture(Gesture::Rotate(Vec2::new(120.0, 0.0)));
        assert_eq!(lego.camera().position, before);

        lego.render(0.016);
        assert_ne!(lego.camera().position, before);
    }

    #[test]
    fn stats_follow_frames() {
        let mut lego = lego();
        lego.render(0.02);
        lego.render(0.02);
        let stats = lego.stats().unwrap();
        assert_eq!(stats.frames(), 2);
        assert!((stats.fps() - 50.0).abs() < 0.01);
    }

    #[test]
    fn debug_disabled_has_no_binder() {
        let mut config = LegoConfig::default();
        config.debug.enabled = false;
        config.debug.stats = false;
        let mut lego =
            Lego::new(mount(), &config, &AlwaysSupported, DebugTextRenderer::new()).unwrap();

        assert!(lego.debug().is_none());
        assert!(lego.stats().is_none());
        let sun = lego.scene().find("sun").unwrap();
        assert!(lego.bind_light(sun).is_none());
    }

    #[test]
    fn bound_light_follows_panel_edits() {
        let panel = DebugPanel::new();
        let mut config = LegoConfig::default();
        config.lights = vec![crate::LightConfig {
            name: "Light".into(),
            position: glam::Vec3::new(0.0, 5.0, 0.0),
            light: Light::point(Color::WHITE, 2.0, 0.0),
        }];
        let mut lego = Lego::with_panel(
            mount(),
            &config,
            &AlwaysSupported,
            DebugTextRenderer::new(),
            panel.clone(),
        )
        .unwrap();

        let id = lego.scene().find("Light").unwrap();
        let bound = lego.bind_light(id).unwrap();

        assert_eq!(panel.folder_names(), ["Light"]);
        assert_eq!(
            panel.controls(0),
            [
                Control::Slider {
                    field: "intensity".into(),
                    min: -6.0,
                    max: 6.0
                },
                Control::Color {
                    field: "color".into()
                },
            ]
        );

        // Edits reach the light only when a frame runs.
        bound.set_number("intensity", 4.5);
        bound.set_color("color", Color::from_hex(0xff0000));
        assert_eq!(lego.scene().get(id).unwrap().as_light().unwrap().intensity(), 2.0);

        lego.render(0.016);
        let light = lego.scene().get(id).unwrap().as_light().unwrap();
        assert_eq!(light.intensity(), 4.5);
        assert_eq!(light.color(), Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn bind_light_rejects_meshes() {
        let mut lego = lego();
        let ground = lego.ground();
        assert!(lego.bind_light(ground).is_none());
    }
}
