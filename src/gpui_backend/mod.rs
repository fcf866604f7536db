//! GPUI integration for gpui_measure.
//!
//! This module provides a GPUI view that lays out a single axes, hosts a
//! [`Ruler`](crate::ruler::Ruler) and a
//! [`TextMover`](crate::text_mover::TextMover), and implements the
//! [`Canvas`](crate::canvas::Canvas) they draw through. Blitting keeps the
//! static scene cached and only repaints the widgets' overlay on top of it.

mod canvas;
mod config;
mod frame;
mod paint;
mod state;
mod text;
mod view;

pub use canvas::BackgroundToken;
pub use config::MeasureViewConfig;
pub use state::{GpuiRuler, GpuiTextMover, MeasureWidgets};
pub use view::{GpuiMeasureView, MeasureHandle};
