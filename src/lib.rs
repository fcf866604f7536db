//! gpui_measure provides interactive measurement widgets for GPUI plots.
//!
//! A [`Ruler`] measures distance, offsets and angle between two points of an
//! axes; a [`TextMover`] lets the user drag text annotations around. Both are
//! driven by [`WidgetEvent`]s and draw through a [`Canvas`], which the
//! [`gpui_backend`] module implements for GPUI.

#![forbid(unsafe_code)]

pub mod axis;
pub mod canvas;
pub mod error;
pub mod event;
pub mod geom;
pub mod gpui_backend;
pub mod measure;
pub mod render;
pub mod ruler;
pub mod style;
pub mod text_mover;
pub mod transform;
pub mod view;

pub use axis::AxisScale;
pub use canvas::{Canvas, CanvasWidget, RenderPass, WidgetId, WidgetLock};
pub use error::{KeyChordError, MeasureError, Result};
pub use event::{
    Cursor, KeyChord, KeyEvent, Modifiers, MouseButton, PointerEvent, WidgetEvent,
};
pub use geom::{Point, ScreenPoint, ScreenRect};
pub use gpui_backend::{GpuiMeasureView, MeasureHandle, MeasureViewConfig};
pub use measure::{AngleReference, AngleUnit, MeasureFormat, Measurement, ValueFormat};
pub use render::{
    ApproxTextMeasurer, Color, LineSegment, LineStyle, MarkerShape, MarkerStyle, RectStyle,
    RenderCommand, RenderList, TextMeasurer, TextStyle,
};
pub use ruler::{Ruler, RulerConfig, RulerHandle, TextAnchor};
pub use style::Theme;
pub use text_mover::{TextAnnotation, TextId, TextMover, TextMoverConfig};
pub use transform::Transform;
pub use view::{Range, Viewport};
