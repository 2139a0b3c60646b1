//! Geometry invariant controller
//!
//! Keeps the display window's rectangle locked to the selection window's
//! aspect ratio and keeps both rectangles inside the host display's usable
//! area. All ratio-derived dimensions round half-up through [`derive_height`]
//! and [`derive_width`]; nothing else in the crate derives a dimension from a
//! ratio directly.

use crate::DisplayProvider;
use capture_gdi::{DisplayArea, Point, Rect};

/// Minimum usable window dimension, both axes, both windows.
pub const MIN_WINDOW_DIM: u32 = 100;

/// Width of the selection window's border chrome. The border is excluded
/// from the captured pixel region.
pub const BORDER_WIDTH: u32 = 6;

/// Aspect ratio of a rectangle. Callers uphold the `MIN_WINDOW_DIM`
/// invariant, which keeps the height nonzero.
pub fn aspect_ratio(rect: &Rect) -> f64 {
    rect.width as f64 / rect.height as f64
}

/// Height for `width` at `ratio`, rounded half-up.
pub fn derive_height(width: u32, ratio: f64) -> u32 {
    (width as f64 / ratio).round() as u32
}

/// Width for `height` at `ratio`, rounded half-up.
pub fn derive_width(height: u32, ratio: f64) -> u32 {
    (height as f64 * ratio).round() as u32
}

/// Recompute the display rectangle after a selection-driven change.
///
/// The display keeps its position and width; its height follows the
/// selection's aspect ratio. `None` when the selection is degenerate or the
/// derived height collapses to zero — the caller keeps the prior rectangle.
pub fn resize_display_to_match_selection(selection: &Rect, display: &Rect) -> Option<Rect> {
    if selection.height == 0 || selection.width == 0 {
        return None;
    }

    let height = derive_height(display.width, aspect_ratio(selection));
    if height == 0 {
        return None;
    }

    Some(Rect::new(display.x, display.y, display.width, height))
}

/// Fit a rectangle into a display's usable area.
///
/// Oversized rectangles are scaled down ratio-preserving until both axes
/// fit, then the position is clamped so the whole rectangle lies inside the
/// usable area. Applying this twice is the same as applying it once.
pub fn clamp_to_area(rect: &Rect, usable: &Rect) -> Rect {
    let ratio = aspect_ratio(rect);
    let (mut width, mut height) = rect.size();

    if width > usable.width {
        width = usable.width;
        height = derive_height(width, ratio);
    }
    if height > usable.height {
        height = usable.height;
        width = derive_width(height, ratio);
    }

    let x = rect.x.clamp(usable.x, (usable.right() - width as i32).max(usable.x));
    let y = rect.y.clamp(usable.y, (usable.bottom() - height as i32).max(usable.y));

    Rect::new(x, y, width, height)
}

/// Largest rectangle of the given ratio that fits the usable area, placed at
/// its origin. Wider-than-tall ratios fill the width, others the height; the
/// result is re-clamped so the derived axis can never spill past the usable
/// area.
pub fn maximized_rect(ratio: f64, usable: &Rect) -> Rect {
    let (width, height) = if ratio > 1.0 {
        (usable.width, derive_height(usable.width, ratio))
    } else {
        (derive_width(usable.height, ratio), usable.height)
    };

    clamp_to_area(&Rect::new(usable.x, usable.y, width, height), usable)
}

/// The pixel region actually read from the screen: the selection rectangle
/// inset by the border chrome on every edge. A degenerate result surfaces as
/// a failed grab and skips that tick.
pub fn capture_region(rect: &Rect, border: u32) -> Rect {
    Rect::new(
        rect.x + border as i32,
        rect.y + border as i32,
        rect.width.saturating_sub(2 * border),
        rect.height.saturating_sub(2 * border),
    )
}

/// Resolve the display hosting a point: containment against full monitor
/// bounds, primary display when the point is outside every display (e.g.
/// after an external display is unplugged).
pub fn host_display(displays: &dyn DisplayProvider, point: Point) -> DisplayArea {
    displays.containing(point).unwrap_or_else(|| {
        log::warn!(
            "point ({}, {}) outside all displays, falling back to primary",
            point.x,
            point.y
        );
        displays.primary()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TwoDisplays;

    impl DisplayProvider for TwoDisplays {
        fn all(&self) -> Vec<DisplayArea> {
            vec![
                DisplayArea {
                    full: Rect::new(0, 0, 1920, 1080),
                    usable: Rect::new(0, 0, 1920, 1040),
                    is_primary: true,
                },
                DisplayArea {
                    full: Rect::new(1920, 0, 1280, 1024),
                    usable: Rect::new(1920, 0, 1280, 1024),
                    is_primary: false,
                },
            ]
        }

        fn primary(&self) -> DisplayArea {
            self.all()[0]
        }
    }

    #[test]
    fn display_follows_selection_ratio_within_one_pixel() {
        for (w, h) in [(800, 600), (1000, 750), (1234, 567), (100, 100), (333, 999)] {
            let selection = Rect::new(0, 0, w, h);
            let display = Rect::new(50, 50, 640, 480);
            let next = resize_display_to_match_selection(&selection, &display).unwrap();

            assert_eq!(next.width, 640);
            let want = 640.0 / aspect_ratio(&selection);
            assert!(
                (next.height as f64 - want).abs() <= 1.0,
                "selection {w}x{h}: got height {}, want ~{want}",
                next.height
            );
        }
    }

    #[test]
    fn display_recompute_keeps_position() {
        let selection = Rect::new(0, 0, 800, 600);
        let display = Rect::new(300, 200, 400, 123);
        let next = resize_display_to_match_selection(&selection, &display).unwrap();
        assert_eq!((next.x, next.y), (300, 200));
        assert_eq!((next.width, next.height), (400, 300));
    }

    #[test]
    fn degenerate_selection_is_a_no_op() {
        let display = Rect::new(0, 0, 640, 480);
        assert!(resize_display_to_match_selection(&Rect::new(0, 0, 800, 0), &display).is_none());
        assert!(resize_display_to_match_selection(&Rect::new(0, 0, 0, 600), &display).is_none());
    }

    #[test]
    fn zero_width_display_is_a_no_op() {
        let selection = Rect::new(0, 0, 800, 600);
        let display = Rect::new(0, 0, 0, 480);
        assert!(resize_display_to_match_selection(&selection, &display).is_none());
    }

    #[test]
    fn clamp_is_idempotent() {
        let usable = Rect::new(0, 0, 1000, 500);
        for rect in [
            Rect::new(0, 0, 2000, 2000),
            Rect::new(-50, 900, 800, 600),
            Rect::new(990, 490, 400, 100),
            Rect::new(100, 100, 300, 200),
            Rect::new(0, 0, 3000, 400),
        ] {
            let once = clamp_to_area(&rect, &usable);
            let twice = clamp_to_area(&once, &usable);
            assert_eq!(once, twice, "clamp not idempotent for {rect:?}");
        }
    }

    #[test]
    fn clamp_fits_both_axes_preserving_ratio() {
        let usable = Rect::new(0, 0, 1000, 500);
        let clamped = clamp_to_area(&Rect::new(0, 0, 2000, 2000), &usable);
        assert_eq!((clamped.width, clamped.height), (500, 500));

        let clamped = clamp_to_area(&Rect::new(0, 0, 3000, 1500), &usable);
        assert_eq!((clamped.width, clamped.height), (1000, 500));
    }

    #[test]
    fn clamp_moves_rect_inside_usable_area() {
        let usable = Rect::new(100, 50, 1000, 800);
        let clamped = clamp_to_area(&Rect::new(2000, -300, 400, 300), &usable);
        assert_eq!((clamped.x, clamped.y), (700, 50));
        assert_eq!((clamped.width, clamped.height), (400, 300));
    }

    #[test]
    fn clamp_keeps_fitting_rect_unchanged() {
        let usable = Rect::new(0, 0, 1920, 1040);
        let rect = Rect::new(200, 100, 800, 600);
        assert_eq!(clamp_to_area(&rect, &usable), rect);
    }

    #[test]
    fn drag_scenario_selection_then_display() {
        // Selection 800x600, corner dragged +200 horizontally: width leads,
        // height follows the ratio.
        let start = Rect::new(0, 0, 800, 600);
        let ratio = aspect_ratio(&start);
        let width = 1000;
        let height = derive_height(width, ratio);
        assert_eq!(height, 750);

        let display = Rect::new(0, 0, 1000, 750);
        let selection = Rect::new(0, 0, width, height);
        let next = resize_display_to_match_selection(&selection, &display).unwrap();
        assert_eq!((next.width, next.height), (1000, 750));

        let usable = Rect::new(0, 0, 1920, 700);
        let clamped = clamp_to_area(&next, &usable);
        assert_eq!((clamped.width, clamped.height), (933, 700));
    }

    #[test]
    fn maximize_wide_ratio_reclamps_overflowing_height() {
        // 16:9 on a 1920x1040 usable area: width-first gives 1920x1080,
        // which exceeds the usable height and is scaled back down.
        let usable = Rect::new(0, 0, 1920, 1040);
        let max = maximized_rect(16.0 / 9.0, &usable);
        assert_eq!((max.x, max.y), (0, 0));
        assert_eq!((max.width, max.height), (1849, 1040));
    }

    #[test]
    fn maximize_tall_ratio_fills_height() {
        let usable = Rect::new(10, 20, 1920, 1040);
        let max = maximized_rect(0.5, &usable);
        assert_eq!((max.x, max.y), (10, 20));
        assert_eq!((max.width, max.height), (520, 1040));
    }

    #[test]
    fn maximize_square_ratio_fills_height() {
        // Ratio exactly 1 takes the height-first branch.
        let usable = Rect::new(0, 0, 1920, 1040);
        let max = maximized_rect(1.0, &usable);
        assert_eq!((max.width, max.height), (1040, 1040));
    }

    #[test]
    fn capture_region_is_inset_by_border() {
        let rect = Rect::new(100, 200, 800, 600);
        let region = capture_region(&rect, BORDER_WIDTH);
        assert_eq!(region, Rect::new(106, 206, 788, 588));
    }

    #[test]
    fn capture_region_saturates_on_tiny_rects() {
        let region = capture_region(&Rect::new(0, 0, 10, 10), BORDER_WIDTH);
        assert_eq!((region.width, region.height), (0, 0));
    }

    #[test]
    fn host_display_resolves_by_full_bounds() {
        // y=1060 is inside the primary's full bounds but below its usable
        // area (taskbar strip); it still belongs to the primary.
        let host = host_display(&TwoDisplays, Point::new(500, 1060));
        assert!(host.is_primary);

        let host = host_display(&TwoDisplays, Point::new(2000, 100));
        assert!(!host.is_primary);
    }

    #[test]
    fn host_display_falls_back_to_primary() {
        let host = host_display(&TwoDisplays, Point::new(-5000, -5000));
        assert!(host.is_primary);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(derive_height(1000, 800.0 / 600.0), 750);
        assert_eq!(derive_height(999, 2.0), 500); // 499.5 rounds up
        assert_eq!(derive_width(333, 1.5), 500); // 499.5 rounds up
    }
}
