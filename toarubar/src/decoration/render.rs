//! Drawing a bar.

use tracing::{instrument, trace, warn};

use crate::config::TitleVars;
use crate::config::rules::Style;
use crate::layout::ButtonLayout;
use crate::manager::BarsState;
use crate::platform::{Host, HostWindow, Frame};
use crate::texture::{Circle, CirclesRequest, TextRequest, TextPosition};
use crate::title;
use crate::types::{ColorF, Point, Size, Rectangle, Scale, Logical, Physical};

use super::{BarDecoration, WindowView};

/// Icon glyphs are drawn at this fraction of the button diameter.
const ICON_SCALE: f64 = 0.62;

/// The width of the placeholder drawn when the buttons texture is missing.
const BUTTONS_PLACEHOLDER_WIDTH: i32 = 20;

impl BarDecoration {
    /// Draws the bar onto the monitor in `frame`.
    ///
    /// Nothing is drawn for hidden bars, unmapped or undecorated windows, or
    /// while bars are disabled.
    #[instrument(level = "trace", skip_all, fields(window = %self.window))]
    pub fn draw<H: Host>(&mut self, host: &mut H, state: &BarsState, frame: &mut Frame<'_>) {
        let style = self.style(state);

        if style.enabled != self.last_enabled {
            self.last_enabled = style.enabled;
            host.reposition_decorations(self.window);
        }

        let Some(view) = WindowView::capture(host, self.window) else {
            return
        };
        if style.hidden || !view.mapped || view.hidden || !style.enabled || !view.wants_decorations {
            return
        }

        if view.focused != self.had_focus {
            self.had_focus = view.focused;
            if style.inactive_button_color.is_visible() {
                self.textures.buttons_dirty = true;
            }
        }

        let now = host.now();
        let deco_box = self.global_box_from(&view);

        self.color.set_goal(style.color, now);
        if self.color.is_animating(now) {
            host.damage(deco_box);
        }
        let color = self.color.value(now).with_alpha_mul(frame.alpha);
        let blur = style.blur && host.blur_enabled() && color.a < 1.0;

        if style.height < 1 {
            self.sync_height(host, style.height);
            return
        }

        let scale = frame.scale();
        let rounding = view.rounding + if style.precedence_over_border { 0.0 } else { view.border };
        let radius = if rounding > 0.0 { rounding * scale - 2.0 } else { 0.0 };
        let power = view.rounding_power;

        let monitor = frame.monitor.position;
        let bar_buffer = Size::<f64, Physical>::new(
            deco_box.size.width * scale,
            deco_box.size.height * scale,
        );
        let title_bar = Rectangle::<f64, Logical>::new(
            deco_box.point.x - monitor.x,
            deco_box.point.y - monitor.y,
            deco_box.size.height + rounding * 3.0,
            deco_box.size.width,
        )
            .translate(view.floating_offset)
            .as_physical(Scale::uniform(scale))
            .round();

        if title_bar.is_empty() {
            return
        }

        frame.renderer.scissor(Some(title_bar));

        let clipped = rounding > 0.0;
        if clipped {
            let window_box = Rectangle::<f64, Logical>::new(
                view.position.x + view.floating_offset.x - monitor.x + 1.0,
                view.position.y + view.floating_offset.y - monitor.y + 1.0,
                view.size.height - 2.0,
                view.size.width - 2.0,
            );
            if window_box.is_empty() {
                frame.renderer.scissor(None);
                return
            }
            let window_box = window_box
                .translate(view.workspace_offset())
                .as_physical(Scale::uniform(scale))
                .round();
            frame.renderer.push_rounded_clip(window_box, radius, power);
        }

        frame.renderer.render_rect(title_bar, color, radius, power, blur);

        let buffer = Size::<i32, Physical>::new(bar_buffer.width as i32, bar_buffer.height as i32);
        let layout = ButtonLayout {
            bar: bar_buffer,
            scale,
            align: style.buttons_alignment,
            padding: style.padding as f64,
            button_padding: style.button_padding as f64,
        };

        if style.title_enabled {
            let text = self.title_text(host, &style, &state.title_vars);
            let font_size = style.text_size as f64 * scale;

            if self.textures.title_stale(&text, style.title_color, font_size) {
                let req = TextRequest {
                    text: &text,
                    font: &style.font,
                    font_size,
                    color: style.title_color.to_f32(),
                    buffer,
                    position: TextPosition::Placed(
                        layout.title_placement(&style.buttons, style.text_align, view.border)
                    ),
                };
                if let Err(e) = self.textures.regenerate_title(
                    frame.rasterizer, frame.uploader, &req, style.title_color
                ) {
                    warn!(target: "decoration::render", "title for {}: {}", self.window, e);
                }
            }
        }

        if clipped {
            frame.renderer.pop_clip();
        }

        let text_box = Rectangle::<i32, Physical>::new(
            title_bar.point.x,
            title_bar.point.y,
            buffer.height,
            buffer.width,
        );

        if style.title_enabled {
            match self.textures.title() {
                Some(id) => frame.renderer.render_texture(id, text_box, frame.alpha),
                None => frame.renderer.render_rect(text_box, ColorF::PLACEHOLDER, radius, power, false),
            }
        }

        if self.textures.buttons_stale(scale) {
            let circles = button_circles(&style, &layout, view.focused);
            let req = CirclesRequest { buffer, circles: &circles };
            if let Err(e) = self.textures.regenerate_buttons(frame.rasterizer, frame.uploader, &req, scale) {
                warn!(target: "decoration::render", "buttons for {}: {}", self.window, e);
            }
        }

        match self.textures.buttons() {
            Some(id) => frame.renderer.render_texture(id, text_box, frame.alpha),
            None => {
                let strip = Rectangle::new(
                    text_box.right() - BUTTONS_PLACEHOLDER_WIDTH,
                    text_box.point.y,
                    text_box.size.height,
                    BUTTONS_PLACEHOLDER_WIDTH,
                );
                frame.renderer.render_rect(strip, ColorF::PLACEHOLDER, radius, power, false);
            }
        }

        frame.renderer.scissor(None);

        self.update_hover(host, &style, &view);
        self.draw_icons(&style, &layout, text_box, frame);

        self.textures.finish_frame();
        self.sync_height(host, style.height);
    }

    /// Asks the host to lay the window out again if the bar height changed.
    fn sync_height<H: Host>(&mut self, host: &mut H, height: i64) {
        if self.last_height != height {
            trace!(target: "decoration::render", "{} height {} -> {}", self.window, self.last_height, height);
            host.recalculate_window(self.window);
            self.last_height = height;
        }
    }

    /// The text the title should show: the window title, or the expanded custom title.
    fn title_text<H: Host>(&self, host: &H, style: &Style, vars: &TitleVars) -> String {
        let Some(window) = host.window(self.window) else {
            return String::new()
        };
        match &style.custom_title {
            Some(template) => title::expand(template, &window.snapshot(), vars),
            None => window.title(),
        }
    }

    /// Recomputes which buttons the cursor is over.
    ///
    /// With icons shown on hover only, a button whose hover state flips has its region damaged.
    pub(crate) fn update_hover<H: Host>(&mut self, host: &mut H, style: &Style, view: &WindowView) {
        let bar = self.global_box_from(view);
        let cursor = host.cursor_position() - bar.point;
        let regions = self.logical_layout(style).regions(&style.buttons);

        self.hovered.resize(regions.len(), false);
        for region in regions {
            let hover = region.contains(cursor);
            if hover == self.hovered[region.index] {
                continue
            }
            self.hovered[region.index] = hover;
            if style.icon_on_hover {
                host.damage(region.hit_box.translate(bar.point));
            }
        }
    }

    /// Whether button `index` is under the cursor.
    pub fn is_hovered(&self, index: usize) -> bool {
        self.hovered.get(index).copied().unwrap_or(false)
    }

    fn draw_icons(
        &mut self,
        style: &Style,
        layout: &ButtonLayout<Physical>,
        text_box: Rectangle<i32, Physical>,
        frame: &mut Frame<'_>,
    ) {
        let origin = text_box.point.as_f64();

        for region in layout.regions(&style.buttons) {
            let button = &style.buttons[region.index];
            if button.icon.is_empty() || (style.icon_on_hover && !self.is_hovered(region.index)) {
                continue
            }

            let size = button.size * layout.scale;
            let req = TextRequest {
                text: &button.icon,
                font: &style.font,
                font_size: button.size * ICON_SCALE * layout.scale,
                color: button.icon_color(),
                buffer: Size::<f64, Physical>::new(size, size).round(),
                position: TextPosition::Centered,
            };
            let Some(id) = self.textures.icon(region.index, frame.rasterizer, frame.uploader, &req) else {
                continue
            };

            let circle = region.circle_box();
            let pos = Rectangle {
                point: circle.point + origin,
                size: circle.size,
            }.round();
            frame.renderer.render_texture(id, pos, frame.alpha);
        }
    }
}

/// The circles making up the buttons texture.
fn button_circles(style: &Style, layout: &ButtonLayout<Physical>, focused: bool) -> Vec<Circle> {
    layout.regions(&style.buttons).into_iter().map(|region| {
        let button = &style.buttons[region.index];
        Circle {
            center: Point::new(region.center.x.floor(), region.center.y.floor()),
            radius: region.radius,
            color: style.button_color(button, focused).to_f32(),
        }
    }).collect()
}
