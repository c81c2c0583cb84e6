use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement, PointerEvent};

use crate::config::SceneConfig;
use crate::gpu::renderer::Renderer;
use crate::scene_state::SceneState;
use crate::section::Section;

#[wasm_bindgen]
pub struct WasmScene {
    inner: Rc<RefCell<SceneContext>>,
}

struct SceneContext {
    renderer: Renderer,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    canvas: HtmlCanvasElement,
    state: SceneState,
    /// Timestamp of the previous animation frame, in milliseconds.
    last_frame_ms: Option<f64>,
    /// Sections already reported missing from the DOM.
    missing_sections: Vec<Section>,
}

impl SceneContext {
    fn render(&mut self, dt: f32) {
        self.state.update(dt);

        match self.surface.get_current_texture() {
            Ok(output) => {
                let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());
                self.renderer.render(&view, &self.state);
                output.present();
            }
            Err(wgpu::SurfaceError::Lost) => {
                self.surface.configure(self.renderer.device(), &self.config);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Surface out of memory");
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(self.renderer.device(), &self.config);
        self.renderer.resize(width, height);
        self.state.resize(width as f32, height as f32);
    }

    /// Write section opacities into the `style.opacity` of the matching DOM elements.
    fn sync_sections(&mut self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for (section, opacity) in self.state.sections().iter() {
            let element = document
                .get_element_by_id(section.id())
                .and_then(|e| e.dyn_into::<HtmlElement>().ok());
            match element {
                Some(element) => {
                    if let Err(e) = element.style().set_property("opacity", &format!("{:.3}", opacity)) {
                        log::warn!("Failed to set opacity on #{}: {:?}", section.id(), e);
                    }
                }
                None => {
                    if !self.missing_sections.contains(&section) {
                        log::warn!("No element with id '{}' in the page", section.id());
                        self.missing_sections.push(section);
                    }
                }
            }
        }
    }
}

fn window_size(window: &web_sys::Window) -> (f64, f64) {
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (width, height)
}

fn request_animation_frame(window: &web_sys::Window, f: &Closure<dyn FnMut(f64)>) {
    if let Err(e) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
        log::error!("requestAnimationFrame failed: {:?}", e);
    }
}

#[wasm_bindgen]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
impl WasmScene {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        panic!("Use create_scene async constructor");
    }

    /// Handle a scroll event. Returns the name of the active section, or
    /// `undefined` if the input was rejected.
    pub fn on_scroll(&self, scroll_y: f32, viewport_height: f32) -> Option<String> {
        let mut inner = self.inner.borrow_mut();
        inner
            .state
            .on_scroll(scroll_y, viewport_height)
            .map(|t| t.active_section.id().to_string())
    }

    /// Handle a pointer move in client coordinates.
    /// Returns true if the particle rotation changed.
    pub fn on_pointer_move(&self, client_x: f32, client_y: f32) -> bool {
        let mut inner = self.inner.borrow_mut();
        inner.state.on_pointer_move(client_x, client_y)
    }

    pub fn resize(&self, width: u32, height: u32) {
        let mut inner = self.inner.borrow_mut();
        inner.resize(width, height);
    }

    /// Advance `dt` seconds and draw one frame.
    pub fn render(&self, dt: f32) {
        let mut inner = self.inner.borrow_mut();
        inner.render(dt);
        inner.sync_sections();
    }

    pub fn active_section(&self) -> String {
        let inner = self.inner.borrow();
        inner.state.active_section().id().to_string()
    }

    /// Current opacity of a section, or `undefined` for an unknown name.
    pub fn section_opacity(&self, name: &str) -> Option<f32> {
        let inner = self.inner.borrow();
        Section::from_id(name).map(|s| inner.state.sections().get(s))
    }

    /// Current scene state as JSON, for debugging.
    pub fn snapshot_json(&self) -> String {
        let inner = self.inner.borrow();
        serde_json::to_string(&inner.state.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Replace the scene configuration. Takes effect for subsequent events;
    /// the particle field and geometry keep their start-up values.
    /// Returns true if the JSON parsed.
    pub fn set_config_json(&self, json: &str) -> bool {
        match SceneConfig::from_json(json) {
            Ok(config) => {
                let mut inner = self.inner.borrow_mut();
                inner.state.config = config;
                log::info!("Scene config updated");
                true
            }
            Err(e) => {
                log::error!("Failed to parse scene config: {}", e);
                false
            }
        }
    }

    /// Subscribe to window scroll/resize and canvas pointer events, and start
    /// the animation frame loop. The listeners live for the page lifetime.
    pub fn attach(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;

        // Scroll
        {
            let inner = self.inner.clone();
            let win = window.clone();
            let on_scroll = Closure::<dyn FnMut()>::new(move || {
                let scroll_y = win.scroll_y().unwrap_or(0.0) as f32;
                let (_, height) = window_size(&win);
                inner.borrow_mut().state.on_scroll(scroll_y, height as f32);
            });
            window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
            on_scroll.forget();
        }

        // Resize
        {
            let inner = self.inner.clone();
            let win = window.clone();
            let on_resize = Closure::<dyn FnMut()>::new(move || {
                let (width, height) = window_size(&win);
                inner.borrow_mut().resize(width as u32, height as u32);
            });
            window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
            on_resize.forget();
        }

        // Pointer
        {
            let inner = self.inner.clone();
            let canvas = inner.borrow().canvas.clone();
            let on_pointer = Closure::<dyn FnMut(PointerEvent)>::new(move |e: PointerEvent| {
                inner
                    .borrow_mut()
                    .state
                    .on_pointer_move(e.client_x() as f32, e.client_y() as f32);
            });
            canvas.add_event_listener_with_callback("pointermove", on_pointer.as_ref().unchecked_ref())?;
            on_pointer.forget();
        }

        // Frame loop: the closure re-schedules itself through a shared handle.
        let frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let frame_handle = frame.clone();
        let inner = self.inner.clone();
        let win = window.clone();
        *frame.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp_ms: f64| {
            {
                let mut ctx = inner.borrow_mut();
                let dt = ctx
                    .last_frame_ms
                    .map(|last| ((timestamp_ms - last) / 1000.0) as f32)
                    .unwrap_or(0.0);
                ctx.last_frame_ms = Some(timestamp_ms);
                ctx.render(dt);
                ctx.sync_sections();
            }
            if let Some(f) = frame_handle.borrow().as_ref() {
                request_animation_frame(&win, f);
            }
        }));
        if let Some(f) = frame.borrow().as_ref() {
            request_animation_frame(&window, f);
        }

        log::info!("Scene attached to window events");
        Ok(())
    }
}

#[wasm_bindgen]
pub async fn create_scene(canvas: HtmlCanvasElement) -> Result<WasmScene, JsValue> {
    init_panic_hook();

    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        dx12_shader_compiler: Default::default(),
        flags: wgpu::InstanceFlags::default(),
        gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
    });

    let target = wgpu::SurfaceTarget::Canvas(canvas.clone());
    let surface = instance.create_surface(target)
        .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

    let adapter = instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::None,
        compatible_surface: Some(&surface),
        force_fallback_adapter: false,
    }).await.ok_or_else(|| JsValue::from_str("Failed to find an appropriate adapter"))?;

    let (device, queue) = adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            memory_hints: Default::default(),
        },
        None,
    ).await.map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;

    let surface_caps = surface.get_capabilities(&adapter);
    let surface_format = surface_caps.formats.iter()
        .copied()
        .find(|f: &wgpu::TextureFormat| f.is_srgb())
        .or_else(|| surface_caps.formats.first().copied())
        .ok_or_else(|| JsValue::from_str("Surface reports no formats"))?;

    // The canvas is layered over page content, so keep its alpha.
    let alpha_mode = if surface_caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::PreMultiplied) {
        wgpu::CompositeAlphaMode::PreMultiplied
    } else {
        surface_caps.alpha_modes[0]
    };

    let config = wgpu::SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format: surface_format,
        width: canvas.width().max(1),
        height: canvas.height().max(1),
        present_mode: surface_caps.present_modes[0],
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency: 2,
    };
    surface.configure(&device, &config);

    let state = SceneState::new(SceneConfig::default(), config.width as f32, config.height as f32);

    let renderer = Renderer::new(
        device,
        queue,
        config.format,
        config.width,
        config.height,
        &state,
    );

    Ok(WasmScene {
        inner: Rc::new(RefCell::new(SceneContext {
            renderer,
            surface,
            config,
            canvas,
            state,
            last_frame_ms: None,
            missing_sections: Vec::new(),
        })),
    })
}
