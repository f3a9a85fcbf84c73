//! Browser binding: canvas listeners and the JS-facing scene handle.
//!
//! The page owns rendering (model, environment map, depth of field).
//! Each animation frame it calls `tick` and copies the camera pose.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use trophy_camera::{Catalog, InteractionKind, InteractionSurface, SurfaceError};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement};

use crate::config::SceneConfig;
use crate::scene::TrophyScene;

type Listener = Closure<dyn FnMut(Event)>;

/// Canvas event listeners feeding interactions into the scene.
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    scene: Weak<RefCell<TrophyScene>>,
    listeners: Vec<(InteractionKind, Listener)>,
}

impl CanvasSurface {
    fn new(canvas: HtmlCanvasElement, scene: Weak<RefCell<TrophyScene>>) -> Self {
        Self {
            canvas,
            scene,
            listeners: Vec::new(),
        }
    }
}

impl InteractionSurface for CanvasSurface {
    fn attach(&mut self, kind: InteractionKind) -> Result<(), SurfaceError> {
        let scene = self.scene.clone();
        let listener = Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
            let Some(scene) = scene.upgrade() else {
                return;
            };
            // Events dispatched while the scene is mid-call are dropped
            match scene.try_borrow_mut() {
                Ok(mut scene) => {
                    scene.interact(kind);
                }
                Err(_) => log::warn!("Scene busy, ignoring '{}'", kind.event_name()),
            }
        });

        self.canvas
            .add_event_listener_with_callback(kind.event_name(), listener.as_ref().unchecked_ref())
            .map_err(|e| SurfaceError::Attach {
                event: kind.event_name(),
                reason: format!("{:?}", e),
            })?;
        self.listeners.push((kind, listener));
        Ok(())
    }

    fn detach(&mut self, kind: InteractionKind) {
        let canvas = &self.canvas;
        self.listeners.retain(|(attached, listener)| {
            if *attached != kind {
                return true;
            }
            if let Err(e) = canvas
                .remove_event_listener_with_callback(kind.event_name(), listener.as_ref().unchecked_ref())
            {
                log::warn!("Failed to remove '{}' listener: {:?}", kind.event_name(), e);
            }
            false
        });
    }
}

/// Scene handle exported to JS.
#[wasm_bindgen]
pub struct TrophySceneHandle {
    scene: Rc<RefCell<TrophyScene>>,
    surface: CanvasSurface,
}

#[wasm_bindgen]
impl TrophySceneHandle {
    /// Build the scene and start the tour on `canvas`.
    ///
    /// `config_ron` and `catalog_ron` override the compiled defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config_ron: Option<String>,
        catalog_ron: Option<String>,
    ) -> Result<TrophySceneHandle, JsValue> {
        let config = match config_ron {
            Some(text) => SceneConfig::from_ron(&text)
                .map_err(|e| JsValue::from_str(&format!("Invalid scene config: {:#}", e)))?,
            None => SceneConfig::default(),
        };
        let catalog = match catalog_ron {
            Some(text) => Arc::new(
                Catalog::from_ron(&text)
                    .map_err(|e| JsValue::from_str(&format!("Invalid motion catalog: {}", e)))?,
            ),
            None => Catalog::reference(),
        };

        let scene = Rc::new(RefCell::new(TrophyScene::new(config, catalog)));
        let mut surface = CanvasSurface::new(canvas, Rc::downgrade(&scene));
        scene.borrow_mut().start(&mut surface);

        Ok(Self { scene, surface })
    }

    /// Advance by `dt` seconds.
    pub fn tick(&self, dt: f32) {
        match self.scene.try_borrow_mut() {
            Ok(mut scene) => scene.tick(dt),
            Err(_) => log::warn!("Scene busy, skipping frame"),
        }
    }

    #[wasm_bindgen(js_name = cameraPosition)]
    pub fn camera_position(&self) -> Vec<f32> {
        self.scene.borrow().camera().position_array().to_vec()
    }

    /// Camera orientation as `[x, y, z, w]`.
    #[wasm_bindgen(js_name = cameraQuaternion)]
    pub fn camera_quaternion(&self) -> Vec<f32> {
        self.scene.borrow().camera().orientation_array().to_vec()
    }

    #[wasm_bindgen(js_name = cameraFov)]
    pub fn camera_fov(&self) -> f32 {
        self.scene.borrow().camera().fov_degrees
    }

    #[wasm_bindgen(js_name = currentClip)]
    pub fn current_clip(&self) -> Option<String> {
        self.scene
            .borrow()
            .sequencer()
            .current_clip_name()
            .map(str::to_string)
    }

    #[wasm_bindgen(js_name = modelPath)]
    pub fn model_path(&self) -> String {
        self.scene.borrow().config().assets.model.clone()
    }

    #[wasm_bindgen(js_name = environmentMap)]
    pub fn environment_map(&self) -> String {
        self.scene.borrow().config().assets.environment_map.clone()
    }

    /// `[scale, rotation_y]` for the loaded model.
    #[wasm_bindgen(js_name = modelTransform)]
    pub fn model_transform(&self) -> Vec<f32> {
        let scene = self.scene.borrow();
        let assets = &scene.config().assets;
        vec![assets.model_scale, assets.model_rotation_y]
    }

    /// `[focus_distance, focal_length, bokeh_scale]`
    #[wasm_bindgen(js_name = depthOfField)]
    pub fn depth_of_field(&self) -> Vec<f32> {
        let scene = self.scene.borrow();
        let dof = &scene.config().depth_of_field;
        vec![dof.focus_distance, dof.focal_length, dof.bokeh_scale]
    }

    /// Stop the tour and remove the canvas listeners. Safe to call twice.
    pub fn dispose(&mut self) {
        match self.scene.try_borrow_mut() {
            Ok(mut scene) => scene.dispose(&mut self.surface),
            Err(_) => log::error!("Scene busy, dispose skipped"),
        }
    }
}

impl Drop for TrophySceneHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}
