//! Bar and button geometry.
//!
//! Everything here is a pure function of the bar size, scale and style: the
//! same [`ButtonLayout`] answers hit tests in logical space (with a scale of 1)
//! and places button circles and the title in the physical space of the buffer
//! being drawn (with the monitor scale).
//!
//! Buttons are packed from the alignment edge inward:
//!
//! ```text
//!  right-aligned, padding p, button padding q
//! +-------------------------------------------+
//! | title...            (b2) q (b1) q (b0)  p |
//! +-------------------------------------------+
//! ```
//!
//! A button that does not fit in the width left after padding is neither
//! drawn nor hit-testable, and neither is any button after it.

use crate::config::ButtonSpec;
use crate::types::{ButtonAlign, TextAlign, Point, Size, Rectangle, GeometryKind};

/// The inputs needed to lay out buttons on a bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonLayout<K: GeometryKind> {
    /// The size of the bar, in the space being laid out.
    pub bar: Size<f64, K>,
    /// The factor converting logical style values into the space being laid out.
    pub scale: f64,
    /// The edge buttons are packed against.
    pub align: ButtonAlign,
    /// Padding between the bar edges and the buttons, unscaled.
    pub padding: f64,
    /// Padding between buttons, unscaled.
    pub button_padding: f64,
}

/// The region a single visible button occupies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonRegion<K: GeometryKind> {
    /// The position of the button in the effective button list.
    pub index: usize,
    /// The center of the button circle.
    pub center: Point<f64, K>,
    /// The radius of the button circle.
    pub radius: f64,
    /// The clickable area: the circle's bounding box, extended toward
    /// the inside of the bar by the button padding.
    pub hit_box: Rectangle<f64, K>,
}

impl<K: GeometryKind> ButtonRegion<K> {
    /// Whether `pt` is over the button. Edges count.
    pub fn contains(&self, pt: Point<f64, K>) -> bool {
        self.hit_box.contains_point_inclusive(pt)
    }

    /// The bounding box of the button circle.
    pub fn circle_box(&self) -> Rectangle<f64, K> {
        let d = self.radius * 2.0;
        Rectangle::new(self.center.x - self.radius, self.center.y - self.radius, d, d)
    }
}

impl<K: GeometryKind> ButtonLayout<K> {
    /// How many leading buttons fit on the bar.
    ///
    /// Buttons are packed greedily: the first one that does not fit ends the count.
    pub fn visible_count(&self, buttons: &[ButtonSpec]) -> usize {
        let mut available = self.bar.width - self.padding * self.scale * 2.0;
        let mut count = 0;

        for button in buttons {
            let needed = (button.size + self.button_padding) * self.scale;
            if available < needed {
                break
            }
            available -= needed;
            count += 1;
        }

        count
    }

    /// The regions of every visible button, in list order.
    pub fn regions(&self, buttons: &[ButtonSpec]) -> Vec<ButtonRegion<K>> {
        let visible = self.visible_count(buttons);
        let pad = self.button_padding * self.scale;
        let mut offset = self.padding * self.scale;

        buttons.iter().take(visible).enumerate().map(|(index, button)| {
            let size = button.size * self.scale;
            let radius = size / 2.0;

            let cx = match self.align {
                ButtonAlign::Right => self.bar.width - offset - radius,
                ButtonAlign::Left => offset + radius,
            };
            let top = ((self.bar.height - size) / 2.0).floor();
            let hit_x = match self.align {
                ButtonAlign::Right => cx - radius - pad,
                ButtonAlign::Left => cx - radius,
            };

            offset += pad + size;

            ButtonRegion {
                index,
                center: Point::new(cx, self.bar.height / 2.0),
                radius,
                hit_box: Rectangle::new(hit_x, top, size, size + pad),
            }
        }).collect()
    }

    /// The index of the visible button under `pt`, if any.
    pub fn hit_button(&self, buttons: &[ButtonSpec], pt: Point<f64, K>) -> Option<usize> {
        self.regions(buttons)
            .into_iter()
            .find(|region| region.contains(pt))
            .map(|region| region.index)
    }

    /// Whether `pt` falls on the bar's active region.
    ///
    /// The region spans the full width and all but the bottom row, edges included.
    pub fn contains(&self, pt: Point<f64, K>) -> bool {
        Rectangle::new(0.0, 0.0, self.bar.height - 1.0, self.bar.width)
            .contains_point_inclusive(pt)
    }

    /// The horizontal space reserved for buttons when placing the title.
    ///
    /// This covers every button, visible or not, each with its padding,
    /// plus one leading button padding.
    pub fn buttons_width(&self, buttons: &[ButtonSpec]) -> f64 {
        let total = buttons.iter()
            .fold(self.button_padding, |acc, b| acc + b.size + self.button_padding);
        total * self.scale
    }

    /// Where the title goes, given its alignment and the window's border size.
    ///
    /// `border` is unscaled.
    pub fn title_placement(&self, buttons: &[ButtonSpec], align: TextAlign, border: f64) -> TitlePlacement {
        let buttons_width = self.buttons_width(buttons);
        let padding = self.padding * self.scale;
        let width = self.bar.width;

        let reserved = padding * 2.0
            + buttons_width
            + if align.is_left() { 0.0 } else { buttons_width };

        let anchor_x = match align {
            TextAlign::Left => padding + if self.align.is_left() { buttons_width } else { 0.0 },
            TextAlign::Center => (width - border * self.scale) / 2.0,
            TextAlign::Right => width - padding - if self.align.is_right() { buttons_width } else { 0.0 },
        };

        TitlePlacement {
            align,
            anchor_x,
            max_width: (width - reserved).max(0.0),
        }
    }
}

/// Where the title is drawn within the title buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TitlePlacement {
    /// How the text hangs off the anchor.
    pub align: TextAlign,
    /// The x-coordinate the text is aligned to: its left edge, center or right edge.
    pub anchor_x: f64,
    /// Text wider than this is ellipsized at the end.
    pub max_width: f64,
}

impl TitlePlacement {
    /// The x-coordinate of the left edge of text `text_width` wide, rounded to a pixel.
    pub fn origin_x(&self, text_width: f64) -> f64 {
        let x = match self.align {
            TextAlign::Left => self.anchor_x,
            TextAlign::Center => self.anchor_x - text_width / 2.0,
            TextAlign::Right => self.anchor_x - text_width,
        };
        x.round()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::types::Logical;

    fn button(size: f64) -> ButtonSpec {
        ButtonSpec::from_keyword(&format!("rgb(ff0000), {}, X, cmd{}", size, size)).unwrap()
    }

    fn layout(width: f64, align: ButtonAlign) -> ButtonLayout<Logical> {
        ButtonLayout {
            bar: Size::new(width, 20.0),
            scale: 1.0,
            align,
            padding: 7.0,
            button_padding: 5.0,
        }
    }

    #[test]
    fn test_visible_count_scenario() {
        // first button needs 25, second needs 21, padding takes 14
        let buttons = [button(20.0), button(16.0)];

        assert_eq!(layout(14.0 + 25.0, ButtonAlign::Right).visible_count(&buttons), 1);
        assert_eq!(layout(14.0 + 45.0, ButtonAlign::Right).visible_count(&buttons), 1);
        assert_eq!(layout(14.0 + 46.0, ButtonAlign::Right).visible_count(&buttons), 2);
        assert_eq!(layout(10.0, ButtonAlign::Right).visible_count(&buttons), 0);
    }

    #[test]
    fn test_visible_count_monotonic_in_width() {
        let buttons = [button(10.0), button(30.0), button(12.0), button(8.0)];
        let mut last = 0;

        for width in 0..200 {
            let count = layout(width as f64, ButtonAlign::Left).visible_count(&buttons);
            assert!(count >= last, "count dropped at width {}", width);
            last = count;
        }
        assert_eq!(last, 4);
    }

    #[test]
    fn test_greedy_stops_at_first_misfit() {
        // the small button after the big one would fit on its own, but is not shown.
        let buttons = [button(10.0), button(100.0), button(2.0)];
        assert_eq!(layout(60.0, ButtonAlign::Right).visible_count(&buttons), 1);
    }

    #[test]
    fn test_regions_right_aligned() {
        let buttons = [button(10.0), button(10.0)];
        let regions = layout(100.0, ButtonAlign::Right).regions(&buttons);

        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].center, Point::new(88.0, 10.0));
        assert_eq!(regions[0].hit_box, Rectangle::new(78.0, 5.0, 10.0, 15.0));
        assert_eq!(regions[1].center, Point::new(73.0, 10.0));
        assert_eq!(regions[0].circle_box(), Rectangle::new(83.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn test_regions_left_aligned_scaled() {
        let buttons = [button(10.0)];
        let mut layout = layout(200.0, ButtonAlign::Left);
        layout.scale = 2.0;
        layout.bar = Size::new(200.0, 40.0);

        let regions = layout.regions(&buttons);
        assert_eq!(regions[0].center, Point::new(24.0, 20.0));
        assert_eq!(regions[0].radius, 10.0);
        assert_eq!(regions[0].hit_box, Rectangle::new(14.0, 10.0, 20.0, 30.0));
    }

    #[test]
    fn test_hit_testing() {
        let buttons = [button(10.0), button(10.0), button(200.0)];
        let layout = layout(100.0, ButtonAlign::Right);

        assert_eq!(layout.hit_button(&buttons, Point::new(90.0, 10.0)), Some(0));
        assert_eq!(layout.hit_button(&buttons, Point::new(70.0, 10.0)), Some(1));
        assert_eq!(layout.hit_button(&buttons, Point::new(20.0, 10.0)), None);
        assert_eq!(layout.hit_button(&buttons, Point::new(90.0, 1.0)), None);

        assert!(layout.contains(Point::new(0.0, 0.0)));
        assert!(layout.contains(Point::new(100.0, 19.0)));
        assert!(!layout.contains(Point::new(50.0, 19.5)));
        assert!(!layout.contains(Point::new(-1.0, 5.0)));
    }

    #[test]
    fn test_title_placement() {
        let buttons = [button(10.0), button(10.0)];
        // buttons width is 5 + 2 * 15 = 35
        let layout = layout(200.0, ButtonAlign::Right);

        let left = layout.title_placement(&buttons, TextAlign::Left, 2.0);
        assert_eq!(left.anchor_x, 7.0);
        assert_eq!(left.max_width, 200.0 - (14.0 + 35.0));
        assert_eq!(left.origin_x(50.0), 7.0);

        let center = layout.title_placement(&buttons, TextAlign::Center, 2.0);
        assert_eq!(center.anchor_x, 99.0);
        assert_eq!(center.max_width, 200.0 - (14.0 + 70.0));
        assert_eq!(center.origin_x(50.0), 74.0);

        let right = layout.title_placement(&buttons, TextAlign::Right, 2.0);
        assert_eq!(right.anchor_x, 200.0 - 7.0 - 35.0);
        assert_eq!(right.origin_x(50.0), 108.0);
    }
}
