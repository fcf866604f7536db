//! Coordinate transforms between data and screen space.

use crate::axis::AxisScale;
use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::view::{Range, Viewport};

const MIN_SPAN: f64 = 1e-12;

/// Transform from the data coordinates of one axes into screen coordinates.
///
/// Hosts hand a transform to the widgets so marker picking can happen in
/// pixels while the ruler itself measures in data units.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    viewport: Viewport,
    screen: ScreenRect,
    x_scale: AxisScale,
    y_scale: AxisScale,
    x_axis: Range,
    y_axis: Range,
}

impl Transform {
    /// Create a transform for the given viewport and screen rectangle.
    ///
    /// Returns `None` when the rectangle has no area or the viewport cannot be
    /// represented on the requested scales.
    pub fn new(
        viewport: Viewport,
        screen: ScreenRect,
        x_scale: AxisScale,
        y_scale: AxisScale,
    ) -> Option<Self> {
        if !screen.is_valid() {
            return None;
        }
        let x_axis = map_range(viewport.x.with_min_span(MIN_SPAN), x_scale)?;
        let y_axis = map_range(viewport.y.with_min_span(MIN_SPAN), y_scale)?;
        Some(Self {
            viewport,
            screen,
            x_scale,
            y_scale,
            x_axis,
            y_axis,
        })
    }

    /// Linear transform on both axes.
    pub fn linear(viewport: Viewport, screen: ScreenRect) -> Option<Self> {
        Self::new(viewport, screen, AxisScale::Linear, AxisScale::Linear)
    }

    /// Access the viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Access the screen rectangle of the axes.
    pub fn screen(&self) -> ScreenRect {
        self.screen
    }

    /// Map a data point into screen space.
    pub fn data_to_screen(&self, point: Point) -> Option<ScreenPoint> {
        let x = self.x_scale.map_value(point.x)?;
        let y = self.y_scale.map_value(point.y)?;
        let x_norm = (x - self.x_axis.min) / self.x_axis.span();
        let y_norm = (y - self.y_axis.min) / self.y_axis.span();
        Some(self.axes_fraction_to_screen(x_norm, y_norm))
    }

    /// Map a screen point into data space.
    pub fn screen_to_data(&self, point: ScreenPoint) -> Option<Point> {
        let x_norm = (point.x as f64 - self.screen.min.x as f64) / self.screen.width() as f64;
        let y_norm = (self.screen.max.y as f64 - point.y as f64) / self.screen.height() as f64;
        let x_axis = self.x_axis.min + x_norm * self.x_axis.span();
        let y_axis = self.y_axis.min + y_norm * self.y_axis.span();
        let x = self.x_scale.invert_value(x_axis)?;
        let y = self.y_scale.invert_value(y_axis)?;
        Some(Point::new(x, y))
    }

    /// Map an axes-fraction coordinate into screen space.
    ///
    /// `(0, 0)` is the bottom-left corner of the axes and `(1, 1)` the
    /// top-right corner.
    pub fn axes_fraction_to_screen(&self, fx: f64, fy: f64) -> ScreenPoint {
        let sx = self.screen.min.x as f64 + fx * self.screen.width() as f64;
        let sy = self.screen.max.y as f64 - fy * self.screen.height() as f64;
        ScreenPoint::new(sx as f32, sy as f32)
    }

    /// Check whether a screen point lies inside the axes.
    pub fn contains_screen(&self, point: ScreenPoint) -> bool {
        self.screen.contains(point)
    }

    /// Map a screen point into data space if it lies inside the axes.
    pub fn data_under(&self, point: ScreenPoint) -> Option<Point> {
        if !self.contains_screen(point) {
            return None;
        }
        self.screen_to_data(point)
    }
}

fn map_range(range: Range, scale: AxisScale) -> Option<Range> {
    let min = scale.map_value(range.min)?;
    let max = scale.map_value(range.max)?;
    Some(Range::new(min, max))
}
