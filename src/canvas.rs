//! The drawing surface a widget is attached to.
//!
//! A [`Canvas`] is implemented by the host (the GPUI backend ships one). It
//! owns pixels, fonts and compositing; widgets only ask it to redraw, to save
//! and restore a background for blitting, and to draw their artists on top.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::event::{Cursor, WidgetEvent};
use crate::render::{RenderList, TextMeasurer};
use crate::transform::Transform;

static WIDGET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a widget attached to a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    pub(crate) fn next() -> Self {
        Self(WIDGET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Exclusive input lock shared by the widgets of one canvas.
///
/// While one widget holds the lock, every other widget ignores pointer input.
#[derive(Debug, Clone, Default)]
pub struct WidgetLock {
    owner: Arc<Mutex<Option<WidgetId>>>,
}

impl WidgetLock {
    /// Create an unheld lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to take the lock. Returns true if `owner` holds it afterwards.
    pub fn acquire(&self, owner: WidgetId) -> bool {
        let mut current = self.owner.lock().expect("widget lock");
        match *current {
            None => {
                *current = Some(owner);
                true
            }
            Some(holder) => holder == owner,
        }
    }

    /// Release the lock if `owner` holds it.
    pub fn release(&self, owner: WidgetId) {
        let mut current = self.owner.lock().expect("widget lock");
        if *current == Some(owner) {
            *current = None;
        }
    }

    /// Check whether `owner` may handle input: the lock is free or its own.
    pub fn available(&self, owner: WidgetId) -> bool {
        let current = self.owner.lock().expect("widget lock");
        current.is_none_or(|holder| holder == owner)
    }

    /// Current holder of the lock.
    pub fn holder(&self) -> Option<WidgetId> {
        *self.owner.lock().expect("widget lock")
    }
}

/// Rendering collaborator used by the widgets.
pub trait Canvas {
    /// Saved pixels (or an equivalent token) restored when blitting.
    type Background;

    /// Transform of the axes the widgets live in, once laid out.
    fn transform(&self) -> Option<Transform>;

    /// Whether partial redraws are supported.
    fn supports_blit(&self) -> bool;

    /// Redraw the whole figure now, skipping animated artists.
    fn draw(&mut self);

    /// Redraw the whole figure at the next opportunity.
    fn draw_idle(&mut self);

    /// Save the current figure contents.
    fn copy_background(&mut self) -> Self::Background;

    /// Put previously saved contents back.
    fn restore_background(&mut self, background: &Self::Background);

    /// Draw artists on top of the current contents.
    fn draw_artists(&mut self, artists: &RenderList);

    /// Push the drawn region to the screen.
    fn blit(&mut self);

    /// Change the pointer cursor.
    fn set_cursor(&mut self, cursor: Cursor);

    /// Text measurement for layout and hit testing.
    fn text_measurer(&self) -> &dyn TextMeasurer;

    /// Whether a pan/zoom navigation mode currently owns the pointer.
    fn navigation_active(&self) -> bool {
        false
    }

    /// Input lock shared by the widgets of this canvas.
    fn widget_lock(&self) -> Option<&WidgetLock> {
        None
    }
}

/// Which artists a render call should emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Full figure redraw: only artists that are not animated.
    Full,
    /// Blit pass: only artists that are animated.
    Animated,
}

/// A widget that reacts to canvas events and draws artists.
pub trait CanvasWidget<C: Canvas> {
    /// Identifier used for the widget lock.
    fn id(&self) -> WidgetId;

    /// Handle one input event.
    fn handle_event(&mut self, canvas: &mut C, event: &WidgetEvent);

    /// Emit artists for the given pass.
    fn render(
        &self,
        transform: &Transform,
        measurer: &dyn TextMeasurer,
        pass: RenderPass,
        out: &mut RenderList,
    );
}
