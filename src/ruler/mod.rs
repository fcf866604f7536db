//! Interactive ruler for measuring distances and angles on an axes.
//!
//! Usage on a canvas:
//!
//! 1. Press, drag and release the primary button to draw the ruler.
//!    Hold shift to keep it horizontal, control to keep it vertical.
//! 2. Grab the start or end marker to move that end, or the midpoint marker
//!    to move the whole ruler. The same modifiers constrain the motion.
//! 3. With two-click mode enabled, secondary-click the start and then the end.
//!
//! The toggle-active chord (`m` by default) switches the ruler on and off, and
//! the toggle-visible chord (`ctrl+m`) hides or shows it.

mod config;
mod state;

use tracing::{debug, info};

use crate::canvas::{Canvas, CanvasWidget, RenderPass, WidgetId};
use crate::error::Result;
use crate::event::{Cursor, KeyEvent, MouseButton, PointerEvent, WidgetEvent};
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::measure::Measurement;
use crate::render::{LineSegment, RenderCommand, RenderList, TextMeasurer, TextStyle};
use crate::transform::Transform;

pub use config::{RulerConfig, TextAnchor};
pub use state::RulerHandle;

use state::{DragSnapshot, GestureState, constrain};

const TEXT_BOX_PADDING: f32 = 3.0;
const LINE_LABEL_OFFSET: f32 = 6.0;

/// A ruler widget.
///
/// `B` is the background type of the canvas the ruler is attached to; it is
/// only stored between blits.
#[derive(Debug)]
pub struct Ruler<B> {
    id: WidgetId,
    config: RulerConfig,
    active: bool,
    visible: bool,
    animated: bool,
    anchor: Option<Point>,
    segment: Option<Measurement>,
    state: GestureState,
    background: Option<B>,
}

impl<B> Ruler<B> {
    /// Create a ruler after validating its configuration.
    pub fn new(config: RulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            id: WidgetId::next(),
            active: config.active,
            config,
            visible: true,
            animated: false,
            anchor: None,
            segment: None,
            state: GestureState::default(),
            background: None,
        })
    }

    /// Widget identifier.
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// Access the configuration.
    pub fn config(&self) -> &RulerConfig {
        &self.config
    }

    /// Whether the ruler reacts to the pointer.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the ruler is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether a new ruler is being drawn.
    pub fn is_drawing(&self) -> bool {
        self.state.drawing
    }

    /// The marker currently being dragged.
    pub fn dragged_handle(&self) -> Option<RulerHandle> {
        self.state.drag.map(|drag| drag.handle)
    }

    /// Start of a pending two-click placement.
    pub fn pending_start(&self) -> Option<Point> {
        self.state.pending_start
    }

    /// Switch the ruler on or off.
    pub fn set_active(&mut self, active: bool) {
        if self.active != active {
            debug!(active, "ruler activity changed");
        }
        self.active = active;
    }

    /// Toggle whether the ruler reacts to the pointer.
    pub fn toggle_active(&mut self) {
        self.set_active(!self.active);
    }

    /// Current measured segment.
    pub fn measurement(&self) -> Option<Measurement> {
        self.segment
    }

    /// Start and end of the ruler.
    pub fn segment(&self) -> Option<(Point, Point)> {
        self.segment.map(|m| (m.start, m.end))
    }

    /// Ruler length.
    pub fn length(&self) -> Option<f64> {
        self.segment.map(|m| m.length())
    }

    /// Signed horizontal extent.
    pub fn dx(&self) -> Option<f64> {
        self.segment.map(|m| m.dx())
    }

    /// Signed vertical extent.
    pub fn dy(&self) -> Option<f64> {
        self.segment.map(|m| m.dy())
    }

    /// Angle in the configured unit and reference.
    pub fn angle(&self) -> Option<f64> {
        self.segment.map(|m| self.config.format.angle_of(&m))
    }

    /// Readout text, as shown in the overlay.
    pub fn readout(&self) -> Option<String> {
        self.segment.map(|m| self.config.format.readout(&m))
    }

    /// Marker under a screen position, if any is within the pick radius.
    ///
    /// The nearest marker wins; on a tie the end marker is preferred, then the
    /// start marker, then the midpoint.
    pub fn handle_at(&self, transform: &Transform, position: ScreenPoint) -> Option<RulerHandle> {
        if !self.visible {
            return None;
        }
        let segment = self.segment?;
        let radius_sq = self.config.pick_radius_px * self.config.pick_radius_px;
        let candidates = [
            (RulerHandle::End, segment.end),
            (RulerHandle::Start, segment.start),
            (RulerHandle::Mid, segment.midpoint()),
        ];
        let mut best: Option<(RulerHandle, f32)> = None;
        for (handle, point) in candidates {
            let Some(screen) = transform.data_to_screen(point) else {
                continue;
            };
            let distance = screen.distance_sq(position);
            if distance > radius_sq {
                continue;
            }
            if best.is_none_or(|(_, current)| distance < current) {
                best = Some((handle, distance));
            }
        }
        best.map(|(handle, _)| handle)
    }

    /// Cursor for the current state.
    pub fn cursor(&self, over_marker: bool) -> Cursor {
        if !self.active {
            return Cursor::Pointer;
        }
        if over_marker || (self.state.left_pressed() && self.state.moving) {
            if self.state.modifiers.shift {
                Cursor::ResizeHorizontal
            } else if self.state.modifiers.control {
                Cursor::ResizeVertical
            } else {
                Cursor::Move
            }
        } else {
            Cursor::SelectRegion
        }
    }

    /// Emit every ruler artist, regardless of animation state.
    pub fn artists(&self, transform: &Transform, measurer: &dyn TextMeasurer, out: &mut RenderList) {
        if !self.visible {
            return;
        }

        out.push(RenderCommand::ClipRect(transform.screen()));
        let mut markers = Vec::new();
        if let Some(segment) = self.segment {
            if let (Some(start), Some(end)) = (
                transform.data_to_screen(segment.start),
                transform.data_to_screen(segment.end),
            ) {
                out.push(RenderCommand::LineSegments {
                    segments: vec![LineSegment::new(start, end)],
                    style: self.config.line,
                });
                markers.push(start);
                markers.extend(transform.data_to_screen(segment.midpoint()));
                markers.push(end);
            }
        } else if let Some(anchor) = self.anchor {
            markers.extend(transform.data_to_screen(anchor));
        }
        if !markers.is_empty() {
            out.push(RenderCommand::Points {
                points: markers,
                style: self.config.marker,
            });
        }
        if let Some(pending) = self
            .state
            .pending_start
            .and_then(|point| transform.data_to_screen(point))
        {
            out.push(RenderCommand::Points {
                points: vec![pending],
                style: self.config.pending_marker,
            });
        }
        if self.config.show_line_label
            && let Some(segment) = self.segment
            && let Some(mid) = transform.data_to_screen(segment.midpoint())
        {
            out.push(RenderCommand::Text {
                position: ScreenPoint::new(mid.x + LINE_LABEL_OFFSET, mid.y + LINE_LABEL_OFFSET),
                text: self.config.format.label(&segment),
                style: self.config.text.clone(),
            });
        }
        out.push(RenderCommand::ClipEnd);

        if let Some(text) = self.readout() {
            self.push_readout(transform, measurer, text, out);
        }
    }

    /// Emit the artists belonging to a redraw pass.
    ///
    /// Full redraws skip the ruler while it is animated; blit passes draw it
    /// only then.
    pub fn render_pass(
        &self,
        transform: &Transform,
        measurer: &dyn TextMeasurer,
        pass: RenderPass,
        out: &mut RenderList,
    ) {
        let emit = match pass {
            RenderPass::Full => !self.animated,
            RenderPass::Animated => self.animated,
        };
        if emit {
            self.artists(transform, measurer, out);
        }
    }

    fn push_readout(
        &self,
        transform: &Transform,
        measurer: &dyn TextMeasurer,
        text: String,
        out: &mut RenderList,
    ) {
        let anchor = self.config.text_anchor;
        let origin = transform.axes_fraction_to_screen(anchor.fraction.0, anchor.fraction.1);
        let style: &TextStyle = &self.config.text;
        let (width, height) = measurer.measure(&text, style.size);
        // Left aligned, vertically centered on the anchor.
        let position = ScreenPoint::new(
            origin.x + anchor.offset.0,
            origin.y - anchor.offset.1 - height * 0.5,
        );
        let rect = ScreenRect::from_origin_size(position, (width, height)).inflate(TEXT_BOX_PADDING);
        out.push(RenderCommand::Rect {
            rect,
            style: self.config.text_box,
        });
        out.push(RenderCommand::Text {
            position,
            text,
            style: style.clone(),
        });
    }

    fn log_readout(&self) {
        if !self.config.log_measurements {
            return;
        }
        if let Some(text) = self.readout() {
            info!(target: "gpui_measure::ruler", "{text}");
        }
    }
}

impl<B> Ruler<B> {
    /// Hide or show the ruler. Hiding also deactivates it.
    pub fn toggle_visibility<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<Background = B>,
    {
        if self.visible {
            self.visible = false;
            self.active = false;
        } else {
            self.visible = true;
        }
        debug!(visible = self.visible, "ruler visibility toggled");
        self.log_readout();
        self.update_artists(canvas);
    }

    /// Place the ruler programmatically.
    pub fn set_segment<C>(&mut self, canvas: &mut C, start: Point, end: Point)
    where
        C: Canvas<Background = B>,
    {
        self.anchor = Some(start);
        self.segment = Some(Measurement::new(start, end));
        self.log_readout();
        self.update_artists(canvas);
    }

    /// Remove the ruler from the axes and abandon any gesture in progress.
    pub fn clear<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<Background = B>,
    {
        self.anchor = None;
        self.segment = None;
        self.state.pending_start = None;
        self.finish_gesture(canvas);
        canvas.draw_idle();
    }

    /// Handle a button press.
    pub fn on_press<C>(&mut self, canvas: &mut C, event: &PointerEvent)
    where
        C: Canvas<Background = B>,
    {
        self.state.modifiers = event.modifiers;
        self.state.last_position = Some(event.position);
        if let Some(button) = event.button {
            self.state.buttons.insert(button);
        }
        if self.ignore(canvas, event) {
            return;
        }
        let Some(point) = event.data else {
            return;
        };

        match event.button {
            Some(MouseButton::Left) if self.state.pending_start.is_none() => {
                let handle = canvas
                    .transform()
                    .and_then(|transform| self.handle_at(&transform, event.position));
                match handle {
                    Some(handle) => self.begin_drag(canvas, handle),
                    None => self.begin_draw(canvas, point),
                }
            }
            Some(MouseButton::Right) if self.config.two_click => {
                self.place_point(canvas, point);
            }
            _ => {}
        }
    }

    /// Handle pointer motion.
    pub fn on_move<C>(&mut self, canvas: &mut C, event: &PointerEvent)
    where
        C: Canvas<Background = B>,
    {
        self.state.modifiers = event.modifiers;
        self.state.last_position = Some(event.position);
        self.update_cursor(canvas);

        let Some(point) = event.data else {
            return;
        };
        if self.state.drag.is_some() {
            self.drag_to(canvas, point);
        } else if self.state.drawing {
            self.draw_to(canvas, point);
        }
    }

    /// Handle a button release.
    pub fn on_release<C>(&mut self, canvas: &mut C, event: &PointerEvent)
    where
        C: Canvas<Background = B>,
    {
        self.state.last_position = Some(event.position);
        if let Some(button) = event.button {
            self.state.buttons.remove(&button);
        }
        if self.state.in_gesture() {
            debug!(segment = ?self.segment, "ruler gesture finished");
        }
        self.finish_gesture(canvas);
    }

    /// Handle a key press.
    pub fn on_key_press<C>(&mut self, canvas: &mut C, event: &KeyEvent)
    where
        C: Canvas<Background = B>,
    {
        self.state.modifiers = event.held_modifiers();
        self.update_cursor(canvas);

        if event.chord == self.config.toggle_active_key {
            self.toggle_active();
        } else if event.chord == self.config.toggle_visible_key {
            self.toggle_visibility(canvas);
        }
    }

    /// Handle a key release.
    pub fn on_key_release<C>(&mut self, canvas: &mut C, event: &KeyEvent)
    where
        C: Canvas<Background = B>,
    {
        self.state.modifiers = self.state.modifiers.without(event.held_modifiers());
        self.update_cursor(canvas);
    }

    fn ignore<C>(&self, canvas: &C, event: &PointerEvent) -> bool
    where
        C: Canvas<Background = B>,
    {
        if canvas.navigation_active() {
            return true;
        }
        if let Some(lock) = canvas.widget_lock()
            && !lock.available(self.id)
        {
            return true;
        }
        !event.in_axes() || !self.active || !self.visible
    }

    fn use_blit<C>(&self, canvas: &C) -> bool
    where
        C: Canvas<Background = B>,
    {
        self.config.use_blit && canvas.supports_blit()
    }

    fn acquire_lock<C>(&self, canvas: &C)
    where
        C: Canvas<Background = B>,
    {
        if let Some(lock) = canvas.widget_lock() {
            lock.acquire(self.id);
        }
    }

    fn begin_draw<C>(&mut self, canvas: &mut C, point: Point)
    where
        C: Canvas<Background = B>,
    {
        debug!(x = point.x, y = point.y, "ruler drawing started");
        self.acquire_lock(canvas);
        self.state.drawing = true;
        self.anchor = Some(point);
        self.segment = None;
        if self.use_blit(canvas) {
            self.start_animation(canvas);
        }
        self.update_artists(canvas);
    }

    fn begin_drag<C>(&mut self, canvas: &mut C, handle: RulerHandle)
    where
        C: Canvas<Background = B>,
    {
        let Some(segment) = self.segment else {
            return;
        };
        debug!(?handle, "ruler marker grabbed");
        self.acquire_lock(canvas);
        self.state.drag = Some(DragSnapshot::new(handle, segment));
        self.state.moving = false;
    }

    fn place_point<C>(&mut self, canvas: &mut C, point: Point)
    where
        C: Canvas<Background = B>,
    {
        match self.state.pending_start.take() {
            None => {
                self.state.pending_start = Some(point);
            }
            Some(start) => {
                self.anchor = Some(start);
                self.segment = Some(Measurement::new(start, point));
                self.log_readout();
            }
        }
        canvas.draw_idle();
    }

    fn draw_to<C>(&mut self, canvas: &mut C, point: Point)
    where
        C: Canvas<Background = B>,
    {
        let Some(anchor) = self.anchor else {
            return;
        };
        let end = constrain(anchor, point, self.state.modifiers);
        self.segment = Some(Measurement::new(anchor, end));
        self.log_readout();
        self.update_artists(canvas);
    }

    fn drag_to<C>(&mut self, canvas: &mut C, point: Point)
    where
        C: Canvas<Background = B>,
    {
        let Some(snapshot) = self.state.drag else {
            return;
        };
        if !self.state.moving {
            if self.use_blit(canvas) {
                self.start_animation(canvas);
            }
            self.state.moving = true;
        }

        let modifiers = self.state.modifiers;
        let original = snapshot.segment;
        let segment = match snapshot.handle {
            RulerHandle::Start => {
                Measurement::new(constrain(original.start, point, modifiers), original.end)
            }
            RulerHandle::End => {
                Measurement::new(original.start, constrain(original.end, point, modifiers))
            }
            RulerHandle::Mid => {
                let mut dx = point.x - snapshot.mid.x;
                let mut dy = point.y - snapshot.mid.y;
                if modifiers.shift {
                    dy = 0.0;
                } else if modifiers.control {
                    dx = 0.0;
                }
                Measurement::new(original.start.offset(dx, dy), original.end.offset(dx, dy))
            }
        };
        self.anchor = Some(segment.start);
        self.segment = Some(segment);
        self.log_readout();
        self.update_artists(canvas);
    }

    fn start_animation<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<Background = B>,
    {
        self.animated = true;
        canvas.draw();
        self.background = Some(canvas.copy_background());
    }

    fn finish_gesture<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<Background = B>,
    {
        self.state.end_gesture();
        if let Some(lock) = canvas.widget_lock() {
            lock.release(self.id);
        }
        if self.animated {
            self.animated = false;
            self.background = None;
            canvas.draw_idle();
        }
        self.update_cursor(canvas);
    }

    fn update_artists<C>(&mut self, canvas: &mut C)
    where
        C: Canvas<Background = B>,
    {
        if !(self.animated && self.use_blit(canvas)) {
            canvas.draw_idle();
            return;
        }
        if let Some(background) = &self.background {
            canvas.restore_background(background);
        } else {
            self.background = Some(canvas.copy_background());
        }
        let mut artists = RenderList::new();
        if let Some(transform) = canvas.transform() {
            self.artists(&transform, canvas.text_measurer(), &mut artists);
        }
        canvas.draw_artists(&artists);
        canvas.blit();
    }

    fn update_cursor<C>(&self, canvas: &mut C)
    where
        C: Canvas<Background = B>,
    {
        let over_marker = match (canvas.transform(), self.state.last_position) {
            (Some(transform), Some(position)) => self.handle_at(&transform, position).is_some(),
            _ => false,
        };
        canvas.set_cursor(self.cursor(over_marker));
    }
}

impl<C: Canvas> CanvasWidget<C> for Ruler<C::Background> {
    fn id(&self) -> WidgetId {
        self.id
    }

    fn handle_event(&mut self, canvas: &mut C, event: &WidgetEvent) {
        match event {
            WidgetEvent::Press(event) => self.on_press(canvas, event),
            WidgetEvent::Release(event) => self.on_release(canvas, event),
            WidgetEvent::Move(event) => self.on_move(canvas, event),
            WidgetEvent::KeyPress(event) => self.on_key_press(canvas, event),
            WidgetEvent::KeyRelease(event) => self.on_key_release(canvas, event),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::WidgetLock;
    use crate::canvas::testing::{CanvasCall, RecordingCanvas};
    use crate::error::MeasureError;
    use crate::event::{KeyChord, Modifiers};
    use crate::render::ApproxTextMeasurer;

    type TestRuler = Ruler<u32>;

    fn at(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(
            ScreenPoint::new((x * 10.0) as f32, (100.0 - y * 10.0) as f32),
            Some(Point::new(x, y)),
        )
    }

    fn press(x: f64, y: f64) -> PointerEvent {
        at(x, y).with_button(MouseButton::Left)
    }

    fn active_ruler() -> TestRuler {
        Ruler::new(RulerConfig::new().with_active(true)).expect("valid config")
    }

    fn draw(ruler: &mut TestRuler, canvas: &mut RecordingCanvas, from: (f64, f64), to: (f64, f64)) {
        ruler.on_press(canvas, &press(from.0, from.1));
        ruler.on_move(canvas, &at(to.0, to.1));
        ruler.on_release(canvas, &press(to.0, to.1));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = TestRuler::new(RulerConfig::new().with_pick_radius(-1.0));
        assert!(matches!(result, Err(MeasureError::InvalidPickRadius(_))));
    }

    #[test]
    fn inactive_ruler_ignores_presses() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = TestRuler::new(RulerConfig::new()).unwrap();
        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert!(!ruler.is_drawing());
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn draw_gesture_measures_segment() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert!(ruler.is_drawing());
        assert!(ruler.measurement().is_none());

        ruler.on_move(&mut canvas, &at(4.0, 5.0));
        assert_eq!(ruler.length(), Some(5.0));
        assert_eq!(ruler.dx(), Some(3.0));
        assert_eq!(ruler.dy(), Some(4.0));
        assert_eq!(
            ruler.readout().as_deref(),
            Some("L: 5.000; dx: 3.000; dy: 4.000; ang: 36.87deg")
        );
        assert!(canvas.count(&CanvasCall::DrawIdle) >= 2);

        ruler.on_release(&mut canvas, &press(4.0, 5.0));
        assert!(!ruler.is_drawing());
        assert_eq!(ruler.segment(), Some((Point::new(1.0, 1.0), Point::new(4.0, 5.0))));
    }

    #[test]
    fn moves_outside_axes_are_ignored() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        ruler.on_move(&mut canvas, &at(2.0, 2.0));
        ruler.on_move(&mut canvas, &PointerEvent::new(ScreenPoint::new(500.0, 5.0), None));
        assert_eq!(ruler.segment().map(|(_, end)| end), Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn modifiers_constrain_drawing() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        ruler.on_press(&mut canvas, &press(1.0, 1.0));

        ruler.on_move(&mut canvas, &at(4.0, 5.0).with_modifiers(Modifiers::SHIFT));
        assert_eq!(ruler.segment().unwrap().1, Point::new(4.0, 1.0));
        assert!((ruler.angle().unwrap() - 90.0).abs() < 1e-9);

        ruler.on_move(&mut canvas, &at(4.0, 5.0).with_modifiers(Modifiers::CONTROL));
        assert_eq!(ruler.segment().unwrap().1, Point::new(1.0, 5.0));
        assert!(ruler.angle().unwrap().abs() < 1e-9);
    }

    #[test]
    fn dragging_end_marker_moves_only_that_end() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        draw(&mut ruler, &mut canvas, (1.0, 1.0), (4.0, 5.0));

        ruler.on_press(&mut canvas, &press(4.0, 5.0));
        assert_eq!(ruler.dragged_handle(), Some(RulerHandle::End));
        assert!(!ruler.is_drawing());

        ruler.on_move(&mut canvas, &at(7.0, 1.0));
        assert_eq!(ruler.segment(), Some((Point::new(1.0, 1.0), Point::new(7.0, 1.0))));

        ruler.on_release(&mut canvas, &press(7.0, 1.0));
        assert_eq!(ruler.dragged_handle(), None);
    }

    #[test]
    fn dragging_start_marker_with_control_keeps_x() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        draw(&mut ruler, &mut canvas, (1.0, 1.0), (4.0, 5.0));

        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert_eq!(ruler.dragged_handle(), Some(RulerHandle::Start));
        ruler.on_move(&mut canvas, &at(3.0, 2.0).with_modifiers(Modifiers::CONTROL));
        assert_eq!(ruler.segment(), Some((Point::new(1.0, 2.0), Point::new(4.0, 5.0))));
    }

    #[test]
    fn dragging_midpoint_translates_ruler() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        draw(&mut ruler, &mut canvas, (1.0, 1.0), (4.0, 5.0));

        ruler.on_press(&mut canvas, &press(2.5, 3.0));
        assert_eq!(ruler.dragged_handle(), Some(RulerHandle::Mid));
        ruler.on_move(&mut canvas, &at(3.5, 4.0).with_modifiers(Modifiers::SHIFT));
        assert_eq!(ruler.segment(), Some((Point::new(2.0, 1.0), Point::new(5.0, 5.0))));
        assert_eq!(ruler.length(), Some(5.0));

        ruler.on_move(&mut canvas, &at(3.5, 4.0));
        assert_eq!(ruler.segment(), Some((Point::new(2.0, 2.0), Point::new(5.0, 6.0))));
    }

    #[test]
    fn blit_cycle_saves_restores_and_releases() {
        let mut canvas = RecordingCanvas::new(true);
        let mut ruler = Ruler::new(RulerConfig::new().with_active(true).with_blit(true)).unwrap();

        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert_eq!(
            &canvas.calls[..2],
            &[CanvasCall::Draw, CanvasCall::CopyBackground(1)]
        );

        let transform = canvas.transform().unwrap();
        let mut full = RenderList::new();
        ruler.render_pass(&transform, &ApproxTextMeasurer, RenderPass::Full, &mut full);
        assert!(full.is_empty());

        canvas.calls.clear();
        ruler.on_move(&mut canvas, &at(4.0, 5.0));
        assert_eq!(canvas.calls[0], CanvasCall::RestoreBackground(1));
        assert_eq!(canvas.calls.last(), Some(&CanvasCall::Blit));
        let artists = canvas.last_artists().expect("artists drawn");
        assert!(artists.texts().iter().any(|text| text.starts_with("L: 5.000")));

        canvas.calls.clear();
        ruler.on_release(&mut canvas, &press(4.0, 5.0));
        assert_eq!(canvas.calls, vec![CanvasCall::DrawIdle]);
        let mut full = RenderList::new();
        ruler.render_pass(&transform, &ApproxTextMeasurer, RenderPass::Full, &mut full);
        assert!(!full.is_empty());
    }

    #[test]
    fn blit_requested_without_canvas_support_falls_back() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = Ruler::new(RulerConfig::new().with_active(true).with_blit(true)).unwrap();
        draw(&mut ruler, &mut canvas, (1.0, 1.0), (2.0, 2.0));
        assert_eq!(canvas.count(&CanvasCall::Blit), 0);
        assert_eq!(canvas.count(&CanvasCall::Draw), 0);
    }

    #[test]
    fn keys_toggle_activity_and_visibility() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = TestRuler::new(RulerConfig::new()).unwrap();
        let toggle = KeyEvent::new(KeyChord::key("m"));
        let hide = KeyEvent::new(KeyChord::key("m").with_modifiers(Modifiers::CONTROL));

        ruler.on_key_press(&mut canvas, &toggle);
        assert!(ruler.is_active());

        ruler.on_key_press(&mut canvas, &hide);
        assert!(!ruler.is_visible());
        assert!(!ruler.is_active());

        ruler.on_key_press(&mut canvas, &hide);
        assert!(ruler.is_visible());
        assert!(!ruler.is_active());
    }

    #[test]
    fn hidden_ruler_draws_nothing() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        draw(&mut ruler, &mut canvas, (1.0, 1.0), (4.0, 5.0));
        ruler.toggle_visibility(&mut canvas);

        let transform = canvas.transform().unwrap();
        let mut out = RenderList::new();
        ruler.render_pass(&transform, &ApproxTextMeasurer, RenderPass::Full, &mut out);
        assert!(out.is_empty());
        assert!(ruler.handle_at(&transform, ScreenPoint::new(40.0, 50.0)).is_none());
    }

    #[test]
    fn cursor_follows_state() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        ruler.on_move(&mut canvas, &at(5.0, 5.0));
        assert_eq!(canvas.cursor, Cursor::SelectRegion);

        draw(&mut ruler, &mut canvas, (1.0, 1.0), (4.0, 5.0));
        ruler.on_move(&mut canvas, &at(4.0, 5.0));
        assert_eq!(canvas.cursor, Cursor::Move);
        ruler.on_move(&mut canvas, &at(4.0, 5.0).with_modifiers(Modifiers::SHIFT));
        assert_eq!(canvas.cursor, Cursor::ResizeHorizontal);

        ruler.on_key_release(&mut canvas, &KeyEvent::new(KeyChord::key("shift")));
        assert_eq!(canvas.cursor, Cursor::Move);

        ruler.set_active(false);
        ruler.on_move(&mut canvas, &at(4.0, 5.0));
        assert_eq!(canvas.cursor, Cursor::Pointer);
    }

    #[test]
    fn navigation_and_foreign_lock_block_input() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        canvas.navigating = true;
        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert!(!ruler.is_drawing());

        canvas.navigating = false;
        let lock = WidgetLock::new();
        let other = WidgetId::next();
        lock.acquire(other);
        canvas.lock = Some(lock.clone());
        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert!(!ruler.is_drawing());

        lock.release(other);
        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert!(ruler.is_drawing());
        assert_eq!(lock.holder(), Some(ruler.id()));
        ruler.on_release(&mut canvas, &press(1.0, 1.0));
        assert_eq!(lock.holder(), None);
    }

    #[test]
    fn two_click_placement() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler =
            TestRuler::new(RulerConfig::new().with_active(true).with_two_click(true)).unwrap();
        let right = |x, y| at(x, y).with_button(MouseButton::Right);

        ruler.on_press(&mut canvas, &right(0.0, 0.0));
        assert_eq!(ruler.pending_start(), Some(Point::new(0.0, 0.0)));
        ruler.on_release(&mut canvas, &right(0.0, 0.0));

        ruler.on_press(&mut canvas, &press(5.0, 5.0));
        assert!(!ruler.is_drawing());

        ruler.on_press(&mut canvas, &right(0.0, 2.0));
        assert_eq!(ruler.pending_start(), None);
        assert_eq!(ruler.length(), Some(2.0));
        assert!(ruler.angle().unwrap().abs() < 1e-9);
    }

    #[test]
    fn line_label_and_readout_are_rendered() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = TestRuler::new(
            RulerConfig::new()
                .with_active(true)
                .with_line_label(true)
                .with_length_unit("m"),
        )
        .unwrap();
        ruler.set_segment(&mut canvas, Point::new(0.0, 0.0), Point::new(3.0, 4.0));

        let transform = canvas.transform().unwrap();
        let mut out = RenderList::new();
        ruler.artists(&transform, &ApproxTextMeasurer, &mut out);
        let texts = out.texts();
        assert_eq!(texts.len(), 2);
        assert_eq!(texts[0], "5.000 m");
        assert!(texts[1].starts_with("L: 5.000 m; dx: 3.000 m"));

        ruler.clear(&mut canvas);
        assert!(ruler.measurement().is_none());
    }

    #[test]
    fn hidden_active_ruler_ignores_press() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        ruler.toggle_visibility(&mut canvas);
        ruler.set_active(true);
        canvas.calls.clear();

        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        assert!(!ruler.is_drawing());
        assert!(ruler.segment().is_none());
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn press_outside_axes_is_ignored() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        let outside = PointerEvent::new(ScreenPoint::new(500.0, 5.0), None)
            .with_button(MouseButton::Left);

        ruler.on_press(&mut canvas, &outside);
        assert!(!ruler.is_drawing());
        assert!(canvas.calls.is_empty());
    }

    #[test]
    fn blit_update_without_saved_background_copies_one() {
        let mut canvas = RecordingCanvas::new(true);
        let mut ruler = Ruler::new(RulerConfig::new().with_active(true).with_blit(true)).unwrap();
        ruler.animated = true;
        ruler.background = None;

        ruler.set_segment(&mut canvas, Point::new(1.0, 1.0), Point::new(4.0, 5.0));
        assert_eq!(canvas.calls.len(), 3);
        assert_eq!(canvas.calls[0], CanvasCall::CopyBackground(1));
        assert!(matches!(canvas.calls[1], CanvasCall::DrawArtists(_)));
        assert_eq!(canvas.calls[2], CanvasCall::Blit);
        assert_eq!(canvas.count(&CanvasCall::RestoreBackground(1)), 0);

        canvas.calls.clear();
        ruler.set_segment(&mut canvas, Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert_eq!(canvas.calls[0], CanvasCall::RestoreBackground(1));
    }

    #[test]
    fn release_outside_axes_ends_gesture() {
        let mut canvas = RecordingCanvas::new(false);
        let lock = WidgetLock::new();
        canvas.lock = Some(lock.clone());
        let mut ruler = active_ruler();

        ruler.on_press(&mut canvas, &press(1.0, 1.0));
        ruler.on_move(&mut canvas, &at(4.0, 5.0));
        assert_eq!(lock.holder(), Some(ruler.id()));

        let outside = PointerEvent::new(ScreenPoint::new(-20.0, 50.0), None)
            .with_button(MouseButton::Left);
        ruler.on_release(&mut canvas, &outside);
        assert!(!ruler.is_drawing());
        assert_eq!(lock.holder(), None);
        assert_eq!(ruler.length(), Some(5.0));
    }

    #[test]
    fn held_shift_survives_control_press_and_release() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        draw(&mut ruler, &mut canvas, (1.0, 1.0), (4.0, 5.0));
        ruler.on_move(&mut canvas, &at(4.0, 5.0));

        ruler.on_key_press(&mut canvas, &KeyEvent::new(KeyChord::key("shift")));
        assert_eq!(canvas.cursor, Cursor::ResizeHorizontal);

        let both = Modifiers::SHIFT.union(Modifiers::CONTROL);
        ruler.on_key_press(
            &mut canvas,
            &KeyEvent::new(KeyChord::key("control").with_modifiers(both)),
        );
        assert_eq!(canvas.cursor, Cursor::ResizeHorizontal);

        ruler.on_key_release(&mut canvas, &KeyEvent::new(KeyChord::key("control")));
        assert_eq!(canvas.cursor, Cursor::ResizeHorizontal);

        ruler.on_key_release(&mut canvas, &KeyEvent::new(KeyChord::key("shift")));
        assert_eq!(canvas.cursor, Cursor::Move);
    }

    #[test]
    fn readout_offset_is_applied_in_pixels() {
        let mut canvas = RecordingCanvas::new(false);
        let mut ruler = active_ruler();
        ruler.set_segment(&mut canvas, Point::new(0.0, 0.0), Point::new(3.0, 4.0));

        let transform = canvas.transform().unwrap();
        let mut out = RenderList::new();
        ruler.artists(&transform, &ApproxTextMeasurer, &mut out);
        let position = out
            .commands()
            .iter()
            .find_map(|command| match command {
                RenderCommand::Text { position, text, .. } if text.starts_with("L:") => {
                    Some(*position)
                }
                _ => None,
            })
            .expect("readout drawn");
        // Top-left anchor at (0, 0), offset (10, -10), 14.4 px line height.
        assert!((position.x - 10.0).abs() < 1e-4);
        assert!((position.y - 2.8).abs() < 1e-4);
    }
}
