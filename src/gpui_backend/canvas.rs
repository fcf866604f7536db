use gpui::Window;

use crate::canvas::{Canvas, WidgetLock};
use crate::event::Cursor;
use crate::render::{RenderList, TextMeasurer};
use crate::transform::Transform;

use super::state::SurfaceState;
use super::text::GpuiTextMeasurer;

/// Saved-background token of the GPUI canvas.
///
/// GPUI repaints whole frames, so instead of pixels the canvas keeps the
/// static render list of a given generation and hands out its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundToken {
    generation: u64,
}

/// [`Canvas`] implementation over a view's retained surface.
pub(crate) struct GpuiCanvas<'a> {
    surface: &'a mut SurfaceState,
    measurer: GpuiTextMeasurer<'a>,
    lock: &'a WidgetLock,
}

impl<'a> GpuiCanvas<'a> {
    pub(crate) fn new(surface: &'a mut SurfaceState, window: &'a Window, lock: &'a WidgetLock) -> Self {
        Self {
            surface,
            measurer: GpuiTextMeasurer::new(window),
            lock,
        }
    }
}

impl Canvas for GpuiCanvas<'_> {
    type Background = BackgroundToken;

    fn transform(&self) -> Option<Transform> {
        self.surface.transform.clone()
    }

    fn supports_blit(&self) -> bool {
        true
    }

    fn draw(&mut self) {
        self.surface.request_full_redraw();
    }

    fn draw_idle(&mut self) {
        self.surface.request_full_redraw();
    }

    fn copy_background(&mut self) -> BackgroundToken {
        BackgroundToken {
            generation: self.surface.pending_generation(),
        }
    }

    fn restore_background(&mut self, background: &BackgroundToken) {
        if !self.surface.restore_generation(background.generation) {
            tracing::trace!(generation = background.generation, "stale background, redrawing");
        }
    }

    fn draw_artists(&mut self, artists: &RenderList) {
        self.surface.overlay.extend_from(artists);
    }

    fn blit(&mut self) {
        self.surface.dirty = true;
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        if self.surface.cursor != cursor {
            self.surface.cursor = cursor;
            self.surface.dirty = true;
        }
    }

    fn text_measurer(&self) -> &dyn TextMeasurer {
        &self.measurer
    }

    fn widget_lock(&self) -> Option<&WidgetLock> {
        Some(self.lock)
    }
}
