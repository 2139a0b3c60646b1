//! Pointer mapping into display-window space
//!
//! The pointer travels through four coordinate spaces: absolute desktop →
//! capture-region-relative → selection-window-relative scale → display-window
//! pixels. The region and the selection window differ by the border inset,
//! and the display window is sized independently of both, so the two scale
//! stages cannot be collapsed.

use capture_gdi::{Point, Rect};

/// Map an absolute pointer position to display-window pixel coordinates.
///
/// The result is clamped to `[0, dim - 1]` on each axis so the marker never
/// leaves the visible bitmap, even for pointers far outside the capture
/// region. Zero-sized selection or display dimensions map to the origin.
pub fn map_pointer(
    pointer: Point,
    region: &Rect,
    display_size: (u32, u32),
    selection_size: (u32, u32),
) -> (i32, i32) {
    let (display_w, display_h) = display_size;
    let (selection_w, selection_h) = selection_size;

    if selection_w == 0 || selection_h == 0 || display_w == 0 || display_h == 0 {
        return (0, 0);
    }

    let rel_x = pointer.x - region.x;
    let rel_y = pointer.y - region.y;

    let scale_x = display_w as f64 / selection_w as f64;
    let scale_y = display_h as f64 / selection_h as f64;

    let x = (rel_x as f64 * scale_x) as i32;
    let y = (rel_y as f64 * scale_y) as i32;

    (
        x.clamp(0, display_w as i32 - 1),
        y.clamp(0, display_h as i32 - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGION: Rect = Rect {
        x: 100,
        y: 50,
        width: 788,
        height: 588,
    };

    #[test]
    fn maps_region_origin_to_display_origin() {
        let mapped = map_pointer(Point::new(100, 50), &REGION, (400, 300), (800, 600));
        assert_eq!(mapped, (0, 0));
    }

    #[test]
    fn scales_by_window_size_ratio_per_axis() {
        // scale_x = 400/800 = 0.5, scale_y = 600/600 = 1.0
        let mapped = map_pointer(Point::new(300, 150), &REGION, (400, 600), (800, 600));
        assert_eq!(mapped, (100, 100));
    }

    #[test]
    fn mapping_is_monotonic_in_pointer_x() {
        // scale_x = 2.0: moving the pointer by delta moves the marker by
        // 2 * delta while inside the region.
        let base = map_pointer(Point::new(200, 100), &REGION, (1600, 300), (800, 600));
        for delta in [1, 7, 50, 123] {
            let moved = map_pointer(Point::new(200 + delta, 100), &REGION, (1600, 300), (800, 600));
            assert_eq!(moved.0 - base.0, 2 * delta);
            assert_eq!(moved.1, base.1);
        }
    }

    #[test]
    fn result_stays_inside_display_bitmap() {
        let display = (400, 300);
        let far_points = [
            Point::new(-10_000, -10_000),
            Point::new(10_000, 10_000),
            Point::new(0, 10_000),
            Point::new(10_000, 0),
        ];
        for p in far_points {
            let (x, y) = map_pointer(p, &REGION, display, (800, 600));
            assert!((0..400).contains(&x), "x {x} out of range for {p:?}");
            assert!((0..300).contains(&y), "y {y} out of range for {p:?}");
        }

        let (x, y) = map_pointer(Point::new(100_000, 100_000), &REGION, display, (800, 600));
        assert_eq!((x, y), (399, 299));
    }

    #[test]
    fn zero_selection_dimension_maps_to_origin() {
        assert_eq!(
            map_pointer(Point::new(500, 500), &REGION, (400, 300), (0, 600)),
            (0, 0)
        );
        assert_eq!(
            map_pointer(Point::new(500, 500), &REGION, (400, 300), (800, 0)),
            (0, 0)
        );
    }
}
