use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    App, CursorStyle, FocusHandle, KeyDownEvent, KeyUpEvent, ModifiersChangedEvent,
    MouseButton as GpuiMouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent,
    NavigationDirection, Pixels, Point, Window, canvas, div,
};

use crate::canvas::WidgetLock;
use crate::error::Result;
use crate::event::{
    Cursor, KeyChord, KeyEvent, Modifiers, MouseButton, PointerEvent, WidgetEvent,
};
use crate::geom::ScreenPoint;
use crate::ruler::{Ruler, RulerConfig};
use crate::text_mover::{TextMover, TextMoverConfig};

use super::canvas::GpuiCanvas;
use super::config::MeasureViewConfig;
use super::frame::build_frame;
use super::paint::{paint_frame, to_hsla};
use super::state::{MeasureWidgets, SurfaceState};

/// A GPUI view hosting a ruler and a text mover over a fixed axes.
///
/// Mouse, key and modifier events are forwarded to the widgets, the text
/// mover first. The view paints a cached static scene and the overlay the
/// widgets blit on top of it.
#[derive(Clone)]
pub struct GpuiMeasureView {
    widgets: Arc<RwLock<MeasureWidgets>>,
    surface: Arc<RwLock<SurfaceState>>,
    config: MeasureViewConfig,
    lock: WidgetLock,
    focus_handle: FocusHandle,
}

impl GpuiMeasureView {
    /// Create a view with the given widget configurations.
    pub fn new(
        config: MeasureViewConfig,
        ruler: RulerConfig,
        text_mover: TextMoverConfig,
        cx: &mut App,
    ) -> Result<Self> {
        let widgets = MeasureWidgets::new(Ruler::new(ruler)?, TextMover::new(text_mover)?);
        Ok(Self {
            widgets: Arc::new(RwLock::new(widgets)),
            surface: Arc::new(RwLock::new(SurfaceState::new())),
            config,
            lock: WidgetLock::new(),
            focus_handle: cx.focus_handle(),
        })
    }

    /// Get a handle for reading and mutating the hosted widgets.
    pub fn handle(&self) -> MeasureHandle {
        MeasureHandle {
            widgets: Arc::clone(&self.widgets),
            surface: Arc::clone(&self.surface),
        }
    }

    fn dispatch(&self, event: WidgetEvent, window: &Window, cx: &mut Context<Self>) {
        let mut surface = self.surface.write().expect("surface lock");
        let mut widgets = self.widgets.write().expect("widgets lock");
        {
            let mut canvas = GpuiCanvas::new(&mut surface, window, &self.lock);
            widgets.dispatch(&mut canvas, &event);
        }
        if surface.take_dirty() {
            cx.notify();
        }
    }

    fn pointer_event(&self, position: Point<Pixels>, modifiers: &gpui::Modifiers) -> PointerEvent {
        let position = screen_point(position);
        let data = self
            .surface
            .read()
            .expect("surface lock")
            .transform
            .as_ref()
            .and_then(|transform| transform.data_under(position));
        PointerEvent::new(position, data).with_modifiers(modifiers_from(modifiers))
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        window.focus(&self.focus_handle);
        let event = self
            .pointer_event(ev.position, &ev.modifiers)
            .with_button(button_from(ev.button));
        self.dispatch(WidgetEvent::Press(event), window, cx);
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, window: &mut Window, cx: &mut Context<Self>) {
        let mut event = self.pointer_event(ev.position, &ev.modifiers);
        if let Some(button) = ev.pressed_button {
            event = event.with_button(button_from(button));
        }
        self.dispatch(WidgetEvent::Move(event), window, cx);
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, window: &mut Window, cx: &mut Context<Self>) {
        let event = self
            .pointer_event(ev.position, &ev.modifiers)
            .with_button(button_from(ev.button));
        self.dispatch(WidgetEvent::Release(event), window, cx);
    }

    fn on_key_down(&mut self, ev: &KeyDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        let chord = KeyChord::key(ev.keystroke.key.as_str())
            .with_modifiers(modifiers_from(&ev.keystroke.modifiers));
        self.dispatch(WidgetEvent::KeyPress(KeyEvent::new(chord)), window, cx);
    }

    fn on_key_up(&mut self, ev: &KeyUpEvent, window: &mut Window, cx: &mut Context<Self>) {
        let chord = KeyChord::key(ev.keystroke.key.as_str());
        self.dispatch(WidgetEvent::KeyRelease(KeyEvent::new(chord)), window, cx);
    }

    /// Modifier keys never produce key events of their own, so changes are
    /// diffed into presses and releases named after the modifier.
    fn on_modifiers_changed(
        &mut self,
        ev: &ModifiersChangedEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let next = modifiers_from(&ev.modifiers);
        let previous = {
            let mut surface = self.surface.write().expect("surface lock");
            std::mem::replace(&mut surface.modifiers, next)
        };
        for event in modifier_events(previous, next) {
            self.dispatch(event, window, cx);
        }
    }
}

impl Render for GpuiMeasureView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let widgets = Arc::clone(&self.widgets);
        let surface = Arc::clone(&self.surface);
        let config = self.config.clone();
        let cursor = self.surface.read().expect("surface lock").cursor;

        div()
            .size_full()
            .track_focus(&self.focus_handle)
            .bg(to_hsla(self.config.theme.background))
            .cursor(cursor_style(cursor))
            .child(
                canvas(
                    move |bounds, window, _| {
                        let widgets = widgets.read().expect("widgets lock");
                        let mut surface = surface.write().expect("surface lock");
                        build_frame(&mut surface, &widgets, &config, bounds, window)
                    },
                    move |_, frame, window, cx| {
                        paint_frame(&frame, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                GpuiMouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_down(
                GpuiMouseButton::Middle,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_down(
                GpuiMouseButton::Right,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, window, cx| {
                this.on_mouse_move(ev, window, cx);
            }))
            .on_mouse_up(
                GpuiMouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_up(ev, window, cx);
                }),
            )
            .on_mouse_up(
                GpuiMouseButton::Middle,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_up(ev, window, cx);
                }),
            )
            .on_mouse_up(
                GpuiMouseButton::Right,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_up(ev, window, cx);
                }),
            )
            // Releases outside the view still end a gesture.
            .on_mouse_up_out(
                GpuiMouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_up(ev, window, cx);
                }),
            )
            .on_mouse_up_out(
                GpuiMouseButton::Right,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_up(ev, window, cx);
                }),
            )
            .on_key_down(cx.listener(|this, ev, window, cx| {
                this.on_key_down(ev, window, cx);
            }))
            .on_key_up(cx.listener(|this, ev, window, cx| {
                this.on_key_up(ev, window, cx);
            }))
            .on_modifiers_changed(cx.listener(|this, ev, window, cx| {
                this.on_modifiers_changed(ev, window, cx);
            }))
    }
}

/// A handle for reading or mutating the widgets of a `GpuiMeasureView`.
///
/// The handle clones cheaply and can be moved into async tasks. Writes
/// schedule a full redraw; notify the view entity to repaint.
#[derive(Clone)]
pub struct MeasureHandle {
    widgets: Arc<RwLock<MeasureWidgets>>,
    surface: Arc<RwLock<SurfaceState>>,
}

impl MeasureHandle {
    /// Read the widgets.
    pub fn read<R>(&self, f: impl FnOnce(&MeasureWidgets) -> R) -> R {
        let widgets = self.widgets.read().expect("widgets lock");
        f(&widgets)
    }

    /// Mutate the widgets.
    pub fn write<R>(&self, f: impl FnOnce(&mut MeasureWidgets) -> R) -> R {
        let result = {
            let mut widgets = self.widgets.write().expect("widgets lock");
            f(&mut widgets)
        };
        self.surface
            .write()
            .expect("surface lock")
            .request_full_redraw();
        result
    }
}

fn screen_point(point: Point<Pixels>) -> ScreenPoint {
    ScreenPoint::new(f32::from(point.x), f32::from(point.y))
}

fn button_from(button: GpuiMouseButton) -> MouseButton {
    match button {
        GpuiMouseButton::Left => MouseButton::Left,
        GpuiMouseButton::Middle => MouseButton::Middle,
        GpuiMouseButton::Right => MouseButton::Right,
        GpuiMouseButton::Navigate(NavigationDirection::Back) => MouseButton::Other(4),
        GpuiMouseButton::Navigate(NavigationDirection::Forward) => MouseButton::Other(5),
    }
}

fn modifiers_from(modifiers: &gpui::Modifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        control: modifiers.control,
        alt: modifiers.alt,
        platform: modifiers.platform,
    }
}

fn modifier_changes(previous: Modifiers, next: Modifiers) -> Vec<(&'static str, bool)> {
    [
        ("shift", previous.shift, next.shift),
        ("control", previous.control, next.control),
        ("alt", previous.alt, next.alt),
        ("platform", previous.platform, next.platform),
    ]
    .into_iter()
    .filter(|(_, before, after)| before != after)
    .map(|(name, _, after)| (name, after))
    .collect()
}

/// Key events for a modifier change. Presses carry every modifier held
/// afterwards so receivers never lose one that was already down.
fn modifier_events(previous: Modifiers, next: Modifiers) -> Vec<WidgetEvent> {
    modifier_changes(previous, next)
        .into_iter()
        .map(|(name, pressed)| {
            if pressed {
                WidgetEvent::KeyPress(KeyEvent::new(KeyChord::key(name).with_modifiers(next)))
            } else {
                WidgetEvent::KeyRelease(KeyEvent::new(KeyChord::key(name)))
            }
        })
        .collect()
}

fn cursor_style(cursor: Cursor) -> CursorStyle {
    match cursor {
        Cursor::Pointer => CursorStyle::Arrow,
        Cursor::Move => CursorStyle::OpenHand,
        Cursor::ResizeHorizontal => CursorStyle::ResizeLeftRight,
        Cursor::ResizeVertical => CursorStyle::ResizeUpDown,
        Cursor::SelectRegion => CursorStyle::Crosshair,
    }
}
