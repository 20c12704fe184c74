use std::sync::Arc;

use glam::Vec2;

use crate::animation::AnimationMixer;
use crate::app::clock::FrameClock;
use crate::app::input::{Input, PointerButton};
use crate::app::orbit::OrbitControls;
use crate::app::settings::DemoSettings;
use crate::assets::{AssetServer, LoadTask, Prefab};
use crate::driver::ClipDriver;
use crate::errors::{Error, Result};
use crate::scene::{Camera, Light, NodeHandle, Scene};

/// What a pending load turns into once it resolves.
#[derive(Debug, Clone, Copy)]
enum LoadRole {
    /// The model whose clips the driver owns.
    Primary,
    /// A model that gets its animation from a second file.
    ExtraModel { index: usize },
    /// The animation file for an already instantiated extra model.
    ExtraAnimation { root: NodeHandle },
}

struct PendingLoad {
    role: LoadRole,
    task: LoadTask,
}

/// The demo's whole state: scene, clock, pointer and in-flight loads.
///
/// Clip control only becomes available once the primary model has loaded;
/// until then [`DemoApp::driver`] is `None` and [`DemoApp::select_clip`]
/// reports [`Error::NotLoaded`].
pub struct DemoApp {
    settings: DemoSettings,
    assets: AssetServer,
    scene: Scene,
    clock: FrameClock,
    input: Input,
    orbit: Option<OrbitControls>,
    pending: Vec<PendingLoad>,
    driver: Option<ClipDriver>,
    model_root: Option<NodeHandle>,
    extra_roots: Vec<NodeHandle>,
}

impl DemoApp {
    /// Builds the camera and lights and starts loading every configured model.
    #[must_use]
    pub fn new(settings: DemoSettings) -> Self {
        let assets = AssetServer::new(&settings.asset_root);
        let mut app = Self::with_scene(settings, assets);

        if !app.settings.model.is_empty() {
            let task = app.assets.spawn_load(&app.settings.model);
            app.pending.push(PendingLoad {
                role: LoadRole::Primary,
                task,
            });
        }
        for index in 0..app.settings.extra_models.len() {
            let task = app.assets.spawn_load(&app.settings.extra_models[index].model);
            app.pending.push(PendingLoad {
                role: LoadRole::ExtraModel { index },
                task,
            });
        }

        app
    }

    /// Builds the scene without issuing any load; models are handed in
    /// through [`DemoApp::attach_model`].
    #[must_use]
    pub fn without_loading(settings: DemoSettings) -> Self {
        let assets = AssetServer::new(&settings.asset_root);
        Self::with_scene(settings, assets)
    }

    fn with_scene(settings: DemoSettings, assets: AssetServer) -> Self {
        let mut scene = Scene::new();

        let cam = &settings.camera;
        let camera = scene.add_camera(Camera::new_perspective(
            cam.fov, cam.aspect, cam.near, cam.far,
        ));
        if let Some(node) = scene.get_node_mut(camera) {
            node.transform.position = cam.position;
        }
        scene.active_camera = Some(camera);

        let input = Input::with_screen_size(settings.window.width, settings.window.height);
        let orbit = settings.orbit.enabled.then(|| {
            let mut orbit = OrbitControls::from_settings(&settings.orbit, cam.position);
            if let Some(node) = scene.get_node_mut(camera) {
                orbit.update(&mut node.transform, &input, cam.fov.to_radians(), 0.0);
            }
            orbit
        });

        let sun = &settings.directional_light;
        let mut light = Light::new_directional(
            Light::color_from_hex(sun.color),
            sun.intensity,
            sun.target,
        );
        if settings.renderer.shadows && sun.cast_shadows {
            light = light.with_shadow(sun.shadow.clone());
        }
        let light_node = scene.add_light(light);
        if let Some(node) = scene.get_node_mut(light_node) {
            node.transform.position = sun.position;
        }

        let ambient = &settings.ambient_light;
        scene.add_light(Light::new_ambient(
            Light::color_from_hex(ambient.color),
            ambient.intensity,
        ));

        Self {
            clock: FrameClock::new(settings.max_frame_delta),
            input,
            orbit,
            settings,
            assets,
            scene,
            pending: Vec::new(),
            driver: None,
            model_root: None,
            extra_roots: Vec::new(),
        }
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Collects every load that finished since the last call.
    pub fn poll_loads(&mut self) {
        let mut still_pending = Vec::new();
        for mut load in std::mem::take(&mut self.pending) {
            match load.task.poll() {
                Some(result) => self.finish_load(load.role, result),
                None => still_pending.push(load),
            }
        }
        // Resolving an extra model queues its animation file.
        self.pending.append(&mut still_pending);
    }

    /// Blocks until every queued load, including follow-up loads, resolved.
    pub fn wait_for_loads(&mut self) {
        while !self.pending.is_empty() {
            for load in std::mem::take(&mut self.pending) {
                let result = load.task.wait();
                self.finish_load(load.role, result);
            }
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    fn finish_load(&mut self, role: LoadRole, result: Result<Prefab>) {
        let prefab = match result {
            Ok(prefab) => prefab,
            Err(e) => {
                log::error!("{e}");
                return;
            }
        };
        match role {
            LoadRole::Primary => {
                if let Err(e) = self.attach_model(prefab) {
                    log::error!("Model loaded without clip control: {e}");
                }
            }
            LoadRole::ExtraModel { index } => self.attach_extra_model(index, &prefab),
            LoadRole::ExtraAnimation { root } => self.play_first_clip(root, prefab),
        }
    }

    /// Instantiates the primary model and hands its clips to a new
    /// [`ClipDriver`].
    ///
    /// The model stays in the scene even when the driver cannot be built.
    pub fn attach_model(&mut self, mut prefab: Prefab) -> Result<()> {
        let root = self.scene.instantiate(&prefab);
        let shadows = self.settings.renderer.shadows;
        self.scene.traverse_mut(root, |node| {
            node.cast_shadow = shadows;
            node.receive_shadow = shadows;
        });
        self.model_root = Some(root);

        let clips = std::mem::take(&mut prefab.animations);
        let driver =
            ClipDriver::initialize(&mut self.scene, root, clips, &self.settings.head_tracking)?;
        self.driver = Some(driver);
        Ok(())
    }

    fn attach_extra_model(&mut self, index: usize, prefab: &Prefab) {
        let Some(extra) = self.settings.extra_models.get(index) else {
            return;
        };
        let root = self.scene.instantiate(prefab);
        let shadows = self.settings.renderer.shadows;
        self.scene.traverse_mut(root, |node| node.cast_shadow = shadows);
        if let Some(node) = self.scene.get_node_mut(root) {
            node.transform.set_uniform_scale(extra.scale);
            node.transform.position = extra.offset;
        }
        self.extra_roots.push(root);

        let task = self.assets.spawn_load(&extra.animation);
        self.pending.push(PendingLoad {
            role: LoadRole::ExtraAnimation { root },
            task,
        });
    }

    fn play_first_clip(&mut self, root: NodeHandle, mut prefab: Prefab) {
        if prefab.animations.is_empty() {
            log::warn!("Animation file has no clips; extra model stays in its rest pose");
            return;
        }
        let clip = Arc::new(prefab.animations.swap_remove(0));
        let mut mixer = AnimationMixer::new(root);
        let key = mixer.clip_action(&self.scene, clip);
        if let Some(action) = mixer.action_mut(key) {
            action.play();
        }
        self.scene.add_mixer(mixer);
    }

    // ========================================================================
    // Per-frame entry points
    // ========================================================================

    /// Runs one frame: finished loads are attached, every mixer advances by
    /// the time since the previous frame and the camera follows the orbit
    /// input. Returns that time in seconds.
    pub fn frame(&mut self, timestamp_ms: f64) -> f32 {
        self.poll_loads();
        let dt = self.clock.tick(timestamp_ms);
        ClipDriver::advance(&mut self.scene, dt);
        self.update_orbit(dt);
        self.input.end_frame();
        dt
    }

    fn update_orbit(&mut self, dt: f32) {
        let Some(orbit) = self.orbit.as_mut() else {
            return;
        };
        let Some(fov) = self.scene.main_camera_mut().map(|camera| camera.fov) else {
            return;
        };
        let Some(handle) = self.scene.active_camera else {
            return;
        };
        if let Some(node) = self.scene.get_node_mut(handle) {
            orbit.update(&mut node.transform, &self.input, fov, dt);
        }
    }

    pub fn on_pointer_button(&mut self, button: PointerButton, pressed: bool) {
        self.input.handle_button(button, pressed);
    }

    /// Wheel input in lines; positive `lines_y` zooms in.
    pub fn on_scroll(&mut self, lines_x: f32, lines_y: f32) {
        self.input.handle_scroll(lines_x, lines_y);
    }

    /// Records a pointer move (window pixels) and aims the neck at it.
    /// Returns whether the neck joint was rotated.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.input.handle_cursor_move(x, y);
        let Some(pointer) = self.input.pointer_ndc() else {
            return false;
        };
        self.look_at(pointer)
    }

    /// Aims the neck at a pointer given in normalized device coordinates.
    pub fn look_at(&mut self, pointer: Vec2) -> bool {
        match &self.driver {
            Some(driver) => driver.look_at(&mut self.scene, pointer),
            None => false,
        }
    }

    pub fn select_clip(&mut self, index: usize) -> Result<()> {
        let driver = self.driver.as_mut().ok_or(Error::NotLoaded)?;
        driver.select_clip(&mut self.scene, index)
    }

    /// Follows a window resize. A zero-sized window keeps the old aspect.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.input.handle_resize(width, height);
        if width == 0 || height == 0 {
            return;
        }
        if let Some(camera) = self.scene.main_camera_mut() {
            camera.set_aspect(width as f32 / height as f32);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[must_use]
    pub fn settings(&self) -> &DemoSettings {
        &self.settings
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn driver(&self) -> Option<&ClipDriver> {
        self.driver.as_ref()
    }

    #[must_use]
    pub fn model_root(&self) -> Option<NodeHandle> {
        self.model_root
    }

    #[must_use]
    pub fn extra_roots(&self) -> &[NodeHandle] {
        &self.extra_roots
    }

    #[must_use]
    pub fn input(&self) -> &Input {
        &self.input
    }

    #[must_use]
    pub fn orbit(&self) -> Option<&OrbitControls> {
        self.orbit.as_ref()
    }

    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}
