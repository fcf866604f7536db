use crate::canvas::{CanvasWidget, RenderPass};
use crate::event::{Cursor, Modifiers};
use crate::geom::ScreenRect;
use crate::render::{RenderList, TextMeasurer};
use crate::ruler::Ruler;
use crate::text_mover::TextMover;
use crate::transform::Transform;

use super::canvas::{BackgroundToken, GpuiCanvas};

/// Ruler hosted by a [`GpuiMeasureView`](super::GpuiMeasureView).
pub type GpuiRuler = Ruler<BackgroundToken>;

/// Text mover hosted by a [`GpuiMeasureView`](super::GpuiMeasureView).
pub type GpuiTextMover = TextMover<BackgroundToken>;

/// The widgets attached to one view.
#[derive(Debug)]
pub struct MeasureWidgets {
    ruler: GpuiRuler,
    text_mover: GpuiTextMover,
}

impl MeasureWidgets {
    pub(crate) fn new(ruler: GpuiRuler, text_mover: GpuiTextMover) -> Self {
        Self { ruler, text_mover }
    }

    /// Access the ruler.
    pub fn ruler(&self) -> &GpuiRuler {
        &self.ruler
    }

    /// Access the ruler mutably.
    pub fn ruler_mut(&mut self) -> &mut GpuiRuler {
        &mut self.ruler
    }

    /// Access the text mover.
    pub fn text_mover(&self) -> &GpuiTextMover {
        &self.text_mover
    }

    /// Access the text mover mutably.
    pub fn text_mover_mut(&mut self) -> &mut GpuiTextMover {
        &mut self.text_mover
    }

    pub(crate) fn dispatch(&mut self, canvas: &mut GpuiCanvas<'_>, event: &crate::event::WidgetEvent) {
        // Texts are picked before the ruler so grabbing a label never starts a ruler.
        self.text_mover.handle_event(canvas, event);
        self.ruler.handle_event(canvas, event);
    }

    pub(crate) fn render(
        &self,
        transform: &Transform,
        measurer: &dyn TextMeasurer,
        pass: RenderPass,
        out: &mut RenderList,
    ) {
        self.text_mover.render_pass(transform, measurer, pass, out);
        self.ruler.render_pass(transform, measurer, pass, out);
    }
}

/// Retained drawing state of a view.
///
/// `base` plays the role of the saved background: it holds every artist that
/// is not animated and is rebuilt only on full redraws. `overlay` holds the
/// artists drawn since the last restore.
#[derive(Debug, Clone, Default)]
pub(crate) struct SurfaceState {
    pub(crate) plot_rect: Option<ScreenRect>,
    pub(crate) transform: Option<Transform>,
    pub(crate) base: RenderList,
    pub(crate) overlay: RenderList,
    pub(crate) generation: u64,
    pub(crate) full_redraw: bool,
    pub(crate) dirty: bool,
    pub(crate) cursor: Cursor,
    pub(crate) modifiers: Modifiers,
}

impl SurfaceState {
    pub(crate) fn new() -> Self {
        Self {
            full_redraw: true,
            ..Self::default()
        }
    }

    /// Generation the base will have once pending work is painted.
    pub(crate) fn pending_generation(&self) -> u64 {
        if self.full_redraw {
            self.generation + 1
        } else {
            self.generation
        }
    }

    /// Drop the overlay if `generation` still describes the base, otherwise
    /// schedule a full redraw. Returns whether the saved base was reused.
    pub(crate) fn restore_generation(&mut self, generation: u64) -> bool {
        if generation == self.pending_generation() {
            self.overlay.clear();
            true
        } else {
            self.request_full_redraw();
            false
        }
    }

    pub(crate) fn request_full_redraw(&mut self) {
        self.full_redraw = true;
        self.overlay.clear();
        self.dirty = true;
    }

    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenPoint;
    use crate::render::{LineSegment, LineStyle, RenderCommand};

    fn line() -> RenderList {
        let mut list = RenderList::new();
        list.push(RenderCommand::LineSegments {
            segments: vec![LineSegment::new(
                ScreenPoint::new(0.0, 0.0),
                ScreenPoint::new(1.0, 1.0),
            )],
            style: LineStyle::default(),
        });
        list
    }

    #[test]
    fn saved_generation_survives_the_pending_redraw() {
        let mut surface = SurfaceState::new();
        assert_eq!(surface.pending_generation(), 1);
        let saved = surface.pending_generation();

        surface.overlay.extend_from(&line());
        assert!(surface.restore_generation(saved));
        assert!(surface.overlay.is_empty());

        // The frame builder repaints the base and bumps the generation.
        surface.full_redraw = false;
        surface.generation = 1;
        assert!(surface.restore_generation(saved));
    }

    #[test]
    fn stale_generation_forces_full_redraw() {
        let mut surface = SurfaceState::new();
        surface.full_redraw = false;
        surface.generation = 4;
        surface.overlay.extend_from(&line());

        assert!(!surface.restore_generation(3));
        assert!(surface.full_redraw);
        assert!(surface.overlay.is_empty());
        assert!(surface.take_dirty());
        assert!(!surface.take_dirty());
    }
}
