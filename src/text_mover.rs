//! Drag text annotations around an axes.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::canvas::{Canvas, CanvasWidget, RenderPass, WidgetId};
use crate::error::{MeasureError, Result};
use crate::event::{MouseButton, PointerEvent, WidgetEvent};
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::render::{RenderCommand, RenderList, TextMeasurer, TextStyle};
use crate::transform::Transform;

static TEXT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a text annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextId(u64);

impl TextId {
    fn next() -> Self {
        Self(TEXT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A text annotation anchored at its bottom-left corner in data space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnnotation {
    id: TextId,
    text: String,
    position: Point,
    style: TextStyle,
    visible: bool,
}

impl TextAnnotation {
    /// Annotation identifier.
    pub fn id(&self) -> TextId {
        self.id
    }

    /// Annotation text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Anchor in data space.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Text styling.
    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    /// Whether the annotation is drawn and pickable.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Screen bounds of the rendered text.
    pub fn bounds(&self, transform: &Transform, measurer: &dyn TextMeasurer) -> Option<ScreenRect> {
        let anchor = transform.data_to_screen(self.position)?;
        let (width, height) = measurer.measure(&self.text, self.style.size);
        Some(ScreenRect::new(
            ScreenPoint::new(anchor.x, anchor.y - height),
            ScreenPoint::new(anchor.x + width, anchor.y),
        ))
    }

    fn push(&self, transform: &Transform, measurer: &dyn TextMeasurer, out: &mut RenderList) {
        if let Some(bounds) = self.bounds(transform, measurer) {
            out.push(RenderCommand::Text {
                position: bounds.min,
                text: self.text.clone(),
                style: self.style.clone(),
            });
        }
    }
}

/// Configuration for a [`TextMover`].
#[derive(Debug, Clone)]
pub struct TextMoverConfig {
    /// Whether dragging is enabled when created.
    pub active: bool,
    /// Use partial redraws while dragging, when the canvas supports them.
    pub use_blit: bool,
    /// Extra pixels around each text accepted as a hit.
    pub pick_padding_px: f32,
}

impl Default for TextMoverConfig {
    fn default() -> Self {
        Self {
            active: true,
            use_blit: true,
            pick_padding_px: 2.0,
        }
    }
}

impl TextMoverConfig {
    /// Check the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.pick_padding_px.is_finite() || self.pick_padding_px < 0.0 {
            return Err(MeasureError::InvalidPickRadius(self.pick_padding_px));
        }
        Ok(())
    }
}

/// Widget that lets the user drag text annotations with the primary button.
#[derive(Debug)]
pub struct TextMover<B> {
    id: WidgetId,
    config: TextMoverConfig,
    active: bool,
    texts: Vec<TextAnnotation>,
    selected: Option<TextId>,
    pressed: bool,
    animated: bool,
    background: Option<B>,
}

impl<B> TextMover<B> {
    /// Create a text mover after validating its configuration.
    pub fn new(config: TextMoverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: WidgetId::next(),
            active: config.active,
            config,
            texts: Vec::new(),
            selected: None,
            pressed: false,
            animated: false,
            background: None,
        })
    }

    /// Widget identifier.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Whether dragging is enabled.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable dragging.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Add an annotation; later annotations are picked first.
    pub fn add_text(
        &mut self,
        text: impl Into<String>,
        position: Point,
        style: TextStyle,
    ) -> Result<TextId> {
        ensure_finite(position)?;
        let id = TextId::next();
        self.texts.push(TextAnnotation {
            id,
            text: text.into(),
            position,
            style,
            visible: true,
        });
        Ok(id)
    }

    /// Remove an annotation.
    pub fn remove_text(&mut self, id: TextId) -> Result<TextAnnotation> {
        let index = self.index_of(id)?;
        if self.selected == Some(id) {
            // The drag itself ends on release, which also frees the lock.
            self.selected = None;
            self.animated = false;
        }
        Ok(self.texts.remove(index))
    }

    /// Look up an annotation.
    pub fn text(&self, id: TextId) -> Option<&TextAnnotation> {
        self.texts.iter().find(|text| text.id == id)
    }

    /// All annotations, bottom-most first.
    pub fn texts(&self) -> &[TextAnnotation] {
        &self.texts
    }

    /// Move an annotation.
    pub fn set_position(&mut self, id: TextId, position: Point) -> Result<()> {
        ensure_finite(position)?;
        let index = self.index_of(id)?;
        self.texts[index].position = position;
        Ok(())
    }

    /// Show or hide an annotation.
    pub fn set_visible(&mut self, id: TextId, visible: bool) -> Result<()> {
        let index = self.index_of(id)?;
        self.texts[index].visible = visible;
        Ok(())
    }

    /// Annotation currently being dragged.
    pub fn selected(&self) -> Option<TextId> {
        self.selected
    }

    /// Top-most visible annotation under a screen position.
    pub fn pick(
        &self,
        transform: &Transform,
        measurer: &dyn TextMeasurer,
        position: ScreenPoint,
    ) -> Option<TextId> {
        self.texts
            .iter()
            .rev()
            .filter(|text| text.visible)
            .find(|text| {
                text.bounds(transform, measurer).is_some_and(|bounds| {
                    bounds.inflate(self.config.pick_padding_px).contains(position)
                })
            })
            .map(|text| text.id)
    }

    /// Emit the annotations belonging to a redraw pass.
    pub fn render_pass(
        &self,
        transform: &Transform,
        measurer: &dyn TextMeasurer,
        pass: RenderPass,
        out: &mut RenderList,
    ) {
        for text in self.texts.iter().filter(|text| text.visible) {
            let animated = self.animated && self.selected == Some(text.id);
            let emit = match pass {
                RenderPass::Full => !animated,
                RenderPass::Animated => animated,
            };
            if emit {
                text.push(transform, measurer, out);
            }
        }
    }

    fn index_of(&self, id: TextId) -> Result<usize> {
        self.texts
            .iter()
            .position(|text| text.id == id)
            .ok_or(MeasureError::UnknownText(id))
    }
}

impl<B> TextMover<B> {
    /// Handle a button press: pick the annotation under the pointer.
    pub fn on_press<C>(&mut self, canvas: &mut C, event: &PointerEvent)
    where
        C: Canvas<Background = B>,
    {
        if !self.active || event.button != Some(MouseButton::Left) || !event.in_axes() {
            return;
        }
        if canvas.navigation_active() {
            return;
        }
        if let Some(lock) = canvas.widget_lock()
            && !lock.available(self.id)
        {
            return;
        }
        let Some(transform) = canvas.transform() else {
            return;
        };
        let Some(id) = self.pick(&transform, canvas.text_measurer(), event.position) else {
            return;
        };

        debug!(?id, "text annotation picked");
        if let Some(lock) = canvas.widget_lock() {
            lock.acquire(self.id);
        }
        self.selected = Some(id);
        self.pressed = true;
        if self.use_blit(canvas) {
            self.animated = true;
            canvas.draw();
            self.background = Some(canvas.copy_background());
            self.blit_selected(canvas, &transform);
        } else {
            canvas.draw_idle();
        }
    }

    /// Handle pointer motion: drag the selected annotation.
    pub fn on_move<C>(&mut self, canvas: &mut C, event: &PointerEvent)
    where
        C: Canvas<Background = B>,
    {
        let Some(point) = event.data else {
            return;
        };
        if !self.pressed {
            return;
        }
        let Some(id) = self.selected else {
            return;
        };
        if let Some(text) = self.texts.iter_mut().find(|text| text.id == id) {
            text.position = point;
        }

        match (&self.background, canvas.transform()) {
            (Some(background), Some(transform)) if self.animated => {
                canvas.restore_background(background);
                self.blit_selected(canvas, &transform);
            }
            _ => canvas.draw_idle(),
        }
    }

    /// Handle a button release: drop the selected annotation.
    pub fn on_release<C>(&mut self, canvas: &mut C, _event: &PointerEvent)
    where
        C: Canvas<Background = B>,
    {
        let selected = self.selected.take();
        if !std::mem::take(&mut self.pressed) && selected.is_none() {
            return;
        }
        if let Some(id) = selected {
            debug!(?id, position = ?self.text(id).map(|text| text.position), "text annotation dropped");
        }
        self.animated = false;
        self.background = None;
        if let Some(lock) = canvas.widget_lock() {
            lock.release(self.id);
        }
        canvas.draw_idle();
    }

    fn use_blit<C>(&self, canvas: &C) -> bool
    where
        C: Canvas<Background = B>,
    {
        self.config.use_blit && canvas.supports_blit()
    }

    fn blit_selected<C>(&self, canvas: &mut C, transform: &Transform)
    where
        C: Canvas<Background = B>,
    {
        let mut artists = RenderList::new();
        self.render_pass(transform, canvas.text_measurer(), RenderPass::Animated, &mut artists);
        canvas.draw_artists(&artists);
        canvas.blit();
    }
}

impl<C: Canvas> CanvasWidget<C> for TextMover<C::Background> {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn handle_event(&mut self, canvas: &mut C, event: &WidgetEvent) {
        match event {
            WidgetEvent::Press(event) => self.on_press(canvas, event),
            WidgetEvent::Move(event) => self.on_move(canvas, event),
            WidgetEvent::Release(event) => self.on_release(canvas, event),
            WidgetEvent::KeyPress(_) | WidgetEvent::KeyRelease(_) => {}
        }
    }

    fn render(
        &self,
        transform: &Transform,
        measurer: &dyn TextMeasurer,
        pass: RenderPass,
        out: &mut RenderList,
    ) {
        self.render_pass(transform, measurer, pass, out);
    }
}

fn ensure_finite(position: Point) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        Err(MeasureError::NonFinitePosition {
            x: position.x,
            y: position.y,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::WidgetLock;
    use crate::canvas::testing::{CanvasCall, RecordingCanvas};
    use crate::render::ApproxTextMeasurer;

    type TestMover = TextMover<u32>;

    fn at(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(
            ScreenPoint::new((x * 10.0) as f32, (100.0 - y * 10.0) as f32),
            Some(Point::new(x, y)),
        )
    }

    fn press(x: f64, y: f64) -> PointerEvent {
        at(x, y).with_button(MouseButton::Left)
    }

    fn mover_with_label(use_blit: bool) -> (TestMover, TextId) {
        let config = TextMoverConfig {
            use_blit,
            ..TextMoverConfig::default()
        };
        let mut mover = TestMover::new(config).unwrap();
        // "label" at 12px spans 36 x 14.4 px above (20, 80).
        let id = mover
            .add_text("label", Point::new(2.0, 2.0), TextStyle::default())
            .unwrap();
        (mover, id)
    }

    #[test]
    fn annotation_management() {
        let (mut mover, id) = mover_with_label(false);
        assert_eq!(mover.text(id).map(TextAnnotation::text), Some("label"));
        mover.set_position(id, Point::new(1.0, 1.0)).unwrap();
        assert_eq!(mover.text(id).unwrap().position(), Point::new(1.0, 1.0));
        assert!(matches!(
            mover.set_position(id, Point::new(f64::NAN, 0.0)),
            Err(MeasureError::NonFinitePosition { .. })
        ));
        let removed = mover.remove_text(id).unwrap();
        assert_eq!(removed.id(), id);
        assert_eq!(mover.remove_text(id), Err(MeasureError::UnknownText(id)));
    }

    #[test]
    fn pick_prefers_top_most_visible_text() {
        let (mut mover, bottom) = mover_with_label(false);
        let top = mover
            .add_text("other", Point::new(2.0, 2.0), TextStyle::default())
            .unwrap();
        let canvas = RecordingCanvas::new(false);
        let transform = canvas.transform().unwrap();
        let hit = ScreenPoint::new(30.0, 75.0);
        assert_eq!(mover.pick(&transform, &ApproxTextMeasurer, hit), Some(top));
        mover.set_visible(top, false).unwrap();
        assert_eq!(mover.pick(&transform, &ApproxTextMeasurer, hit), Some(bottom));
        assert_eq!(
            mover.pick(&transform, &ApproxTextMeasurer, ScreenPoint::new(90.0, 10.0)),
            None
        );
    }

    #[test]
    fn drag_moves_text_without_blit() {
        let mut canvas = RecordingCanvas::new(false);
        let (mut mover, id) = mover_with_label(false);

        mover.on_press(&mut canvas, &press(3.0, 2.5));
        assert_eq!(mover.selected(), Some(id));
        mover.on_move(&mut canvas, &at(6.0, 7.0));
        assert_eq!(mover.text(id).unwrap().position(), Point::new(6.0, 7.0));
        mover.on_release(&mut canvas, &press(6.0, 7.0));
        assert_eq!(mover.selected(), None);

        mover.on_move(&mut canvas, &at(1.0, 1.0));
        assert_eq!(mover.text(id).unwrap().position(), Point::new(6.0, 7.0));
        assert_eq!(canvas.count(&CanvasCall::Blit), 0);
    }

    #[test]
    fn drag_with_blit_draws_only_selected_text() {
        let mut canvas = RecordingCanvas::new(true);
        let (mut mover, id) = mover_with_label(true);
        mover
            .add_text("far away", Point::new(8.0, 8.0), TextStyle::default())
            .unwrap();

        mover.on_press(&mut canvas, &press(3.0, 2.5));
        assert_eq!(
            &canvas.calls[..2],
            &[CanvasCall::Draw, CanvasCall::CopyBackground(1)]
        );
        assert_eq!(canvas.last_artists().unwrap().texts(), vec!["label"]);

        let transform = canvas.transform().unwrap();
        let mut full = RenderList::new();
        mover.render_pass(&transform, &ApproxTextMeasurer, RenderPass::Full, &mut full);
        assert_eq!(full.texts(), vec!["far away"]);

        canvas.calls.clear();
        mover.on_move(&mut canvas, &at(5.0, 5.0));
        assert_eq!(canvas.calls[0], CanvasCall::RestoreBackground(1));
        assert_eq!(canvas.calls.last(), Some(&CanvasCall::Blit));
        assert_eq!(mover.text(id).unwrap().position(), Point::new(5.0, 5.0));

        canvas.calls.clear();
        mover.on_release(&mut canvas, &press(5.0, 5.0));
        assert_eq!(canvas.calls, vec![CanvasCall::DrawIdle]);
        let mut full = RenderList::new();
        mover.render_pass(&transform, &ApproxTextMeasurer, RenderPass::Full, &mut full);
        assert_eq!(full.texts().len(), 2);
    }

    #[test]
    fn ignores_inactive_secondary_and_locked_presses() {
        let mut canvas = RecordingCanvas::new(false);
        let (mut mover, _) = mover_with_label(false);

        mover.on_press(&mut canvas, &at(3.0, 2.5).with_button(MouseButton::Right));
        assert_eq!(mover.selected(), None);

        mover.set_active(false);
        mover.on_press(&mut canvas, &press(3.0, 2.5));
        assert_eq!(mover.selected(), None);

        mover.set_active(true);
        let lock = WidgetLock::new();
        lock.acquire(WidgetId::next());
        canvas.lock = Some(lock);
        mover.on_press(&mut canvas, &press(3.0, 2.5));
        assert_eq!(mover.selected(), None);
    }

    #[test]
    fn release_without_selection_is_a_no_op() {
        let mut canvas = RecordingCanvas::new(false);
        let (mut mover, _) = mover_with_label(false);
        mover.on_release(&mut canvas, &press(0.0, 0.0));
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn removing_dragged_text_still_frees_lock_on_release() {
        let mut canvas = RecordingCanvas::new(false);
        canvas.lock = Some(WidgetLock::new());
        let (mut mover, id) = mover_with_label(false);

        mover.on_press(&mut canvas, &press(3.0, 2.5));
        assert_eq!(canvas.lock.as_ref().unwrap().holder(), Some(mover.id()));
        mover.remove_text(id).unwrap();
        assert_eq!(mover.selected(), None);

        mover.on_release(&mut canvas, &press(3.0, 2.5));
        assert_eq!(canvas.lock.as_ref().unwrap().holder(), None);
    }

    #[test]
    fn release_outside_axes_drops_selection_and_lock() {
        let mut canvas = RecordingCanvas::new(false);
        canvas.lock = Some(WidgetLock::new());
        let (mut mover, id) = mover_with_label(false);

        mover.on_press(&mut canvas, &press(3.0, 2.5));
        mover.on_move(&mut canvas, &at(6.0, 7.0));
        let outside = PointerEvent::new(ScreenPoint::new(150.0, -5.0), None)
            .with_button(MouseButton::Left);
        mover.on_release(&mut canvas, &outside);

        assert_eq!(mover.selected(), None);
        assert_eq!(canvas.lock.as_ref().unwrap().holder(), None);
        assert_eq!(mover.text(id).unwrap().position(), Point::new(6.0, 7.0));
    }
}
