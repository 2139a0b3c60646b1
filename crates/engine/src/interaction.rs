//! Per-window drag/resize state machine

use crate::geometry::{self, MIN_WINDOW_DIM};
use capture_gdi::{Point, Rect};

/// Hit radius around the bottom-right corner that starts a resize. Only the
/// far corner is resize-active; presses anywhere else move the window.
pub const RESIZE_CORNER: i32 = 30;

/// Snapshot taken at interaction start. Every drag update is computed from
/// these plus the current pointer position, so the result is the same no
/// matter how many intermediate move events arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragContext {
    /// Absolute pointer position at the press.
    pub origin: Point,
    /// Window rectangle at the press.
    pub start_rect: Rect,
}

/// Interaction state of one window. Transient: any release returns to
/// `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Moving(DragContext),
    Resizing(DragContext),
}

/// How a window's rectangle responds to a corner drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeRule {
    /// Width follows the pointer, height is derived from the aspect ratio
    /// locked at drag start (selection window).
    DeriveHeight,
    /// Both axes follow the pointer (display window); the selection's ratio
    /// is left alone and the new proportions stand until the next
    /// selection-driven recompute.
    FreeForm,
}

/// Border color selector; a pure function of the interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderStyle {
    Neutral,
    Moving,
    Resizing,
}

impl InteractionState {
    /// Primary-button press at `window_point` (window-local) while the
    /// pointer sits at `pointer` (absolute). Within the corner hit radius
    /// of the far corner the press starts a resize, anywhere else a move.
    pub fn press(window_point: Point, pointer: Point, rect: Rect) -> Self {
        let context = DragContext {
            origin: pointer,
            start_rect: rect,
        };

        let near_corner = (rect.width as i32 - window_point.x).abs() <= RESIZE_CORNER
            && (rect.height as i32 - window_point.y).abs() <= RESIZE_CORNER;

        if near_corner {
            Self::Resizing(context)
        } else {
            Self::Moving(context)
        }
    }

    /// Pointer moved while pressed. Returns the window's new rectangle, or
    /// `None` when the update is rejected (idle, or a move into negative
    /// desktop coordinates).
    pub fn drag(&self, pointer: Point, rule: ResizeRule) -> Option<Rect> {
        match self {
            Self::Idle => None,

            Self::Moving(ctx) => {
                let x = ctx.start_rect.x + (pointer.x - ctx.origin.x);
                let y = ctx.start_rect.y + (pointer.y - ctx.origin.y);
                if x < 0 || y < 0 {
                    return None;
                }
                Some(Rect::new(x, y, ctx.start_rect.width, ctx.start_rect.height))
            }

            Self::Resizing(ctx) => {
                let dx = pointer.x - ctx.origin.x;
                let dy = pointer.y - ctx.origin.y;
                let width = floored(ctx.start_rect.width, dx);

                let height = match rule {
                    ResizeRule::DeriveHeight => {
                        let ratio = geometry::aspect_ratio(&ctx.start_rect);
                        geometry::derive_height(width, ratio).max(MIN_WINDOW_DIM)
                    }
                    ResizeRule::FreeForm => floored(ctx.start_rect.height, dy),
                };

                Some(Rect::new(ctx.start_rect.x, ctx.start_rect.y, width, height))
            }
        }
    }

    /// Pointer released: back to `Idle`. Returns the state that was in
    /// progress, if any.
    pub fn release(&mut self) -> Option<DragContext> {
        let context = match *self {
            Self::Idle => None,
            Self::Moving(ctx) | Self::Resizing(ctx) => Some(ctx),
        };
        *self = Self::Idle;
        context
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn border_style(&self) -> BorderStyle {
        match self {
            Self::Idle => BorderStyle::Neutral,
            Self::Moving(_) => BorderStyle::Moving,
            Self::Resizing(_) => BorderStyle::Resizing,
        }
    }
}

fn floored(dim: u32, delta: i32) -> u32 {
    (dim as i64 + delta as i64).max(MIN_WINDOW_DIM as i64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect_200() -> Rect {
        Rect::new(400, 300, 200, 200)
    }

    fn press_at(x: i32, y: i32) -> InteractionState {
        let rect = rect_200();
        InteractionState::press(
            Point::new(x, y),
            Point::new(rect.x + x, rect.y + y),
            rect,
        )
    }

    #[test]
    fn press_near_far_corner_starts_resize() {
        assert!(matches!(press_at(185, 185), InteractionState::Resizing(_)));
        assert!(matches!(press_at(170, 170), InteractionState::Resizing(_)));
        assert!(matches!(press_at(200, 200), InteractionState::Resizing(_)));
    }

    #[test]
    fn press_elsewhere_starts_move() {
        assert!(matches!(press_at(50, 50), InteractionState::Moving(_)));
        // Near only one of the two far edges is not a corner hit.
        assert!(matches!(press_at(185, 50), InteractionState::Moving(_)));
        assert!(matches!(press_at(50, 185), InteractionState::Moving(_)));
    }

    #[test]
    fn move_applies_pointer_delta_to_start_rect() {
        let mut state = press_at(50, 50);
        let origin = Point::new(450, 350);

        let moved = state.drag(Point::new(origin.x + 30, origin.y - 20), ResizeRule::FreeForm);
        assert_eq!(moved, Some(Rect::new(430, 280, 200, 200)));

        // Deltas are origin-relative, not incremental: the same pointer
        // position always produces the same rectangle.
        let again = state.drag(Point::new(origin.x + 30, origin.y - 20), ResizeRule::FreeForm);
        assert_eq!(again, moved);

        assert!(state.release().is_some());
        assert!(state.is_idle());
    }

    #[test]
    fn move_into_negative_coordinates_is_rejected() {
        let state = press_at(50, 50);
        let origin = Point::new(450, 350);

        assert_eq!(
            state.drag(Point::new(origin.x - 500, origin.y), ResizeRule::FreeForm),
            None
        );
        // A later event back in range applies normally.
        assert!(state
            .drag(Point::new(origin.x - 100, origin.y), ResizeRule::FreeForm)
            .is_some());
    }

    #[test]
    fn derive_height_resize_follows_locked_ratio() {
        let rect = Rect::new(0, 0, 800, 600);
        let origin = Point::new(795, 595);
        let state = InteractionState::press(Point::new(795, 595), origin, rect);
        assert!(matches!(state, InteractionState::Resizing(_)));

        let resized = state.drag(Point::new(origin.x + 200, origin.y), ResizeRule::DeriveHeight);
        assert_eq!(resized, Some(Rect::new(0, 0, 1000, 750)));

        // Vertical pointer travel is ignored; only width drives the size.
        let resized = state.drag(
            Point::new(origin.x + 200, origin.y + 400),
            ResizeRule::DeriveHeight,
        );
        assert_eq!(resized, Some(Rect::new(0, 0, 1000, 750)));
    }

    #[test]
    fn free_form_resize_controls_both_axes() {
        let rect = rect_200();
        let origin = Point::new(rect.right() - 5, rect.bottom() - 5);
        let state = InteractionState::press(Point::new(195, 195), origin, rect);

        let resized = state.drag(Point::new(origin.x + 40, origin.y + 90), ResizeRule::FreeForm);
        assert_eq!(resized, Some(Rect::new(400, 300, 240, 290)));
    }

    #[test]
    fn resize_floors_both_axes_at_minimum() {
        let rect = rect_200();
        let origin = Point::new(rect.right() - 5, rect.bottom() - 5);
        let state = InteractionState::press(Point::new(195, 195), origin, rect);

        let resized = state.drag(
            Point::new(origin.x - 500, origin.y - 500),
            ResizeRule::FreeForm,
        );
        assert_eq!(resized, Some(Rect::new(400, 300, 100, 100)));

        let resized = state.drag(
            Point::new(origin.x - 500, origin.y),
            ResizeRule::DeriveHeight,
        );
        assert_eq!(resized, Some(Rect::new(400, 300, 100, 100)));
    }

    #[test]
    fn derived_height_is_floored_at_minimum() {
        // 10:1 ratio would derive a 10px height at the minimum width.
        let rect = Rect::new(0, 0, 1000, 100);
        let origin = Point::new(995, 95);
        let state = InteractionState::press(Point::new(995, 95), origin, rect);

        let resized = state.drag(Point::new(origin.x - 900, origin.y), ResizeRule::DeriveHeight);
        assert_eq!(resized, Some(Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn border_style_tracks_state() {
        assert_eq!(InteractionState::Idle.border_style(), BorderStyle::Neutral);
        assert_eq!(press_at(50, 50).border_style(), BorderStyle::Moving);
        assert_eq!(press_at(190, 190).border_style(), BorderStyle::Resizing);
    }

    #[test]
    fn release_from_idle_reports_nothing() {
        let mut state = InteractionState::Idle;
        assert!(state.release().is_none());
    }
}
