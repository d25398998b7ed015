//! In-memory stand-ins for the host and its renderer, used for testing.
//!
//! `MockHost` keeps a store of windows and a single 1000x1000 monitor at the
//! origin, and records every request made to it instead of acting on it.
#![allow(dead_code)]

use std::time::{Duration, Instant};

use indexmap::IndexMap;

use crate::platform::{
    Host, HostWindow, HostAction, HookHandle, HookKind, MonitorInfo, WorkspaceInfo,
    BarRenderer, HOST_API_VERSION,
};
use crate::texture::{
    Rasterizer, TextureUploader, TextureId, RasterBuffer, RasterError, UploadError,
    TextRequest, CirclesRequest,
};
use crate::title::WindowSnapshot;
use crate::types::{
    WindowId, MonitorId, ColorF, Point, Size, Rectangle, Logical, Physical,
};

#[derive(Debug, Clone)]
pub struct MockWindow {
    pub id: WindowId,
    pub title: String,
    pub mapped: bool,
    pub hidden: bool,
    pub floating: bool,
    pub pinned: bool,
    pub wants_decorations: bool,
    pub workspace: Option<WorkspaceInfo>,
    pub monitor: Option<MonitorId>,
    pub rounding: f64,
    pub rounding_power: f64,
    pub border: f64,
    pub position: Point<f64, Logical>,
    pub size: Size<f64, Logical>,
    pub floating_offset: Point<f64, Logical>,
    pub top_edge: Point<f64, Logical>,
    pub rules: Vec<String>,
    pub snapshot: WindowSnapshot,
}

impl MockWindow {
    /// A mapped 200x100 window at (100, 100) on a visible workspace.
    pub fn new(id: u64) -> Self {
        Self {
            id: WindowId(id),
            title: format!("window {}", id),
            mapped: true,
            hidden: false,
            floating: false,
            pinned: false,
            wants_decorations: true,
            workspace: Some(WorkspaceInfo { visible: true, render_offset: Point::zeroed() }),
            monitor: Some(MonitorId(0)),
            rounding: 0.0,
            rounding_power: 2.0,
            border: 0.0,
            position: Point::new(100.0, 100.0),
            size: Size::new(200.0, 100.0),
            floating_offset: Point::zeroed(),
            top_edge: Point::new(100.0, 100.0),
            rules: Vec::new(),
            snapshot: WindowSnapshot::default(),
        }
    }
}

impl HostWindow for MockWindow {
    fn id(&self) -> WindowId { self.id }
    fn title(&self) -> String { self.title.clone() }
    fn is_mapped(&self) -> bool { self.mapped }
    fn is_hidden(&self) -> bool { self.hidden }
    fn is_floating(&self) -> bool { self.floating }
    fn is_pinned(&self) -> bool { self.pinned }
    fn wants_decorations(&self) -> bool { self.wants_decorations }
    fn workspace(&self) -> Option<WorkspaceInfo> { self.workspace }
    fn monitor(&self) -> Option<MonitorId> { self.monitor }
    fn rounding(&self) -> f64 { self.rounding }
    fn rounding_power(&self) -> f64 { self.rounding_power }
    fn border_size(&self) -> f64 { self.border }
    fn position(&self) -> Point<f64, Logical> { self.position }
    fn size(&self) -> Size<f64, Logical> { self.size }
    fn floating_offset(&self) -> Point<f64, Logical> { self.floating_offset }
    fn top_edge(&self) -> Point<f64, Logical> { self.top_edge }
    fn matched_rules(&self) -> Vec<String> { self.rules.clone() }

    fn snapshot(&self) -> WindowSnapshot {
        WindowSnapshot {
            title: self.title.clone(),
            is_floating: self.floating,
            pinned: self.pinned,
            ..self.snapshot.clone()
        }
    }
}

#[derive(Debug)]
pub struct MockHost {
    pub version: String,
    pub windows: IndexMap<WindowId, MockWindow>,
    pub monitors: Vec<MonitorInfo>,
    pub focused: Option<WindowId>,
    pub under_cursor: Option<WindowId>,
    pub cursor: Point<f64, Logical>,
    pub exclusive_layer: bool,
    pub seat_grab: Option<bool>,
    pub layer_surface: bool,
    pub blur: bool,
    pub now: Instant,

    pub actions: Vec<HostAction>,
    pub damaged: Vec<Rectangle<f64, Logical>>,
    pub repositioned: Vec<WindowId>,
    pub decorations_updated: Vec<WindowId>,
    pub recalculated: Vec<WindowId>,
    pub notifications: Vec<(String, ColorF, Duration)>,
    pub hooks: Vec<(HookHandle, HookKind)>,
    next_hook: u64,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            version: HOST_API_VERSION.to_string(),
            windows: IndexMap::new(),
            monitors: vec![MonitorInfo {
                id: MonitorId(0),
                name: "DP-1".into(),
                position: Point::zeroed(),
                size: Size::new(1000.0, 1000.0),
                scale: 1.0,
            }],
            focused: None,
            under_cursor: None,
            cursor: Point::zeroed(),
            exclusive_layer: false,
            seat_grab: None,
            layer_surface: false,
            blur: true,
            now: Instant::now(),
            actions: Vec::new(),
            damaged: Vec::new(),
            repositioned: Vec::new(),
            decorations_updated: Vec::new(),
            recalculated: Vec::new(),
            notifications: Vec::new(),
            hooks: Vec::new(),
            next_hook: 0,
        }
    }

    pub fn add_window(&mut self, window: MockWindow) {
        self.windows.insert(window.id, window);
    }

    pub fn remove_window(&mut self, id: u64) -> Option<MockWindow> {
        self.windows.shift_remove(&WindowId(id))
    }

    pub fn window_mut(&mut self, id: u64) -> &mut MockWindow {
        &mut self.windows[&WindowId(id)]
    }
}

impl Host for MockHost {
    type Window = MockWindow;

    fn api_version(&self) -> String {
        self.version.clone()
    }

    fn window(&self, id: WindowId) -> Option<&MockWindow> {
        self.windows.get(&id)
    }

    fn windows(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    fn focused_window(&self) -> Option<WindowId> {
        self.focused
    }

    fn window_under_cursor(&self) -> Option<WindowId> {
        self.under_cursor
    }

    fn cursor_position(&self) -> Point<f64, Logical> {
        self.cursor
    }

    fn exclusive_layer_active(&self) -> bool {
        self.exclusive_layer
    }

    fn seat_grab_accepts(&self, _id: WindowId) -> Option<bool> {
        self.seat_grab
    }

    fn layer_surface_at(&self, _point: Point<f64, Logical>) -> bool {
        self.layer_surface
    }

    fn monitor(&self, id: MonitorId) -> Option<MonitorInfo> {
        self.monitors.iter().find(|m| m.id == id).cloned()
    }

    fn monitor_by_name(&self, name: &str) -> Option<MonitorInfo> {
        self.monitors.iter().find(|m| m.name == name).cloned()
    }

    fn last_monitor(&self) -> Option<MonitorInfo> {
        self.monitors.first().cloned()
    }

    fn blur_enabled(&self) -> bool {
        self.blur
    }

    fn now(&self) -> Instant {
        self.now
    }

    fn dispatch(&mut self, action: HostAction) {
        self.actions.push(action);
    }

    fn damage(&mut self, region: Rectangle<f64, Logical>) {
        self.damaged.push(region);
    }

    fn reposition_decorations(&mut self, id: WindowId) {
        self.repositioned.push(id);
    }

    fn update_decorations(&mut self, id: WindowId) {
        self.decorations_updated.push(id);
    }

    fn recalculate_window(&mut self, id: WindowId) {
        self.recalculated.push(id);
    }

    fn notify(&mut self, text: &str, color: ColorF, timeout: Duration) {
        self.notifications.push((text.to_string(), color, timeout));
    }

    fn register_hook(&mut self, kind: HookKind) -> HookHandle {
        self.next_hook += 1;
        let handle = HookHandle(self.next_hook);
        self.hooks.push((handle, kind));
        handle
    }

    fn unregister_hook(&mut self, handle: HookHandle) {
        self.hooks.retain(|(h, _)| *h != handle);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Scissor(Option<Rectangle<i32, Physical>>),
    PushClip(Rectangle<i32, Physical>, f64),
    PopClip,
    Rect(Rectangle<i32, Physical>, ColorF, bool),
    Texture(TextureId, Rectangle<i32, Physical>),
}

#[derive(Debug, Default)]
pub struct MockRenderer {
    pub calls: Vec<RenderCall>,
}

impl MockRenderer {
    pub fn textures(&self) -> Vec<TextureId> {
        self.calls.iter().filter_map(|c| match c {
            RenderCall::Texture(id, _) => Some(*id),
            _ => None,
        }).collect()
    }

    pub fn placeholders(&self) -> usize {
        self.calls.iter()
            .filter(|c| matches!(c, RenderCall::Rect(_, color, _) if *color == ColorF::PLACEHOLDER))
            .count()
    }
}

impl BarRenderer for MockRenderer {
    fn scissor(&mut self, region: Option<Rectangle<i32, Physical>>) {
        self.calls.push(RenderCall::Scissor(region));
    }

    fn push_rounded_clip(&mut self, region: Rectangle<i32, Physical>, radius: f64, _power: f64) {
        self.calls.push(RenderCall::PushClip(region, radius));
    }

    fn pop_clip(&mut self) {
        self.calls.push(RenderCall::PopClip);
    }

    fn render_rect(
        &mut self,
        region: Rectangle<i32, Physical>,
        color: ColorF,
        _radius: f64,
        _power: f64,
        blur: bool,
    ) {
        self.calls.push(RenderCall::Rect(region, color, blur));
    }

    fn render_texture(&mut self, texture: TextureId, region: Rectangle<i32, Physical>, _alpha: f32) {
        self.calls.push(RenderCall::Texture(texture, region));
    }
}

/// Produces blank buffers of the requested size.
#[derive(Debug, Default)]
pub struct MockRasterizer {
    pub fail: bool,
    pub text_calls: usize,
    pub circle_calls: usize,
    pub texts: Vec<String>,
}

impl Rasterizer for MockRasterizer {
    fn rasterize_text(&mut self, req: &TextRequest<'_>) -> Result<RasterBuffer, RasterError> {
        self.text_calls += 1;
        self.texts.push(req.text.to_string());
        if self.fail {
            return Err(RasterError::Font("mock failure".into()))
        }
        RasterBuffer::new(req.buffer)
    }

    fn rasterize_circles(&mut self, req: &CirclesRequest<'_>) -> Result<RasterBuffer, RasterError> {
        self.circle_calls += 1;
        if self.fail {
            return Err(RasterError::Other("mock failure".into()))
        }
        RasterBuffer::new(req.buffer)
    }
}

/// Hands out sequential texture ids and tracks which are still live.
#[derive(Debug, Default)]
pub struct MockUploader {
    pub fail: bool,
    pub released: Vec<TextureId>,
    pub(crate) live: Vec<TextureId>,
    pub(crate) next: u64,
}

impl MockUploader {
    pub fn live(&self) -> &[TextureId] {
        &self.live
    }
}

impl TextureUploader for MockUploader {
    fn upload(&mut self, _buffer: &RasterBuffer) -> Result<TextureId, UploadError> {
        if self.fail {
            return Err(UploadError::Allocation)
        }
        self.next += 1;
        let id = TextureId(self.next);
        self.live.push(id);
        Ok(id)
    }

    fn release(&mut self, texture: TextureId) {
        self.live.retain(|t| *t != texture);
        self.released.push(texture);
    }
}
