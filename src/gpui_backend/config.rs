use crate::axis::AxisScale;
use crate::style::Theme;
use crate::view::{Range, Viewport};

/// Configuration for the GPUI measurement view.
#[derive(Debug, Clone)]
pub struct MeasureViewConfig {
    /// Data range shown by the axes.
    pub viewport: Viewport,
    /// X axis scale.
    pub x_scale: AxisScale,
    /// Y axis scale.
    pub y_scale: AxisScale,
    /// Space between the view edge and the axes, in pixels.
    pub padding_px: f32,
    /// Number of grid intervals per axis.
    pub grid_divisions: usize,
    /// Draw grid lines.
    pub show_grid: bool,
    /// Draw tick labels along the bottom and left edges.
    pub show_tick_labels: bool,
    /// Colors.
    pub theme: Theme,
}

impl Default for MeasureViewConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(Range::new(0.0, 10.0), Range::new(0.0, 10.0)),
            x_scale: AxisScale::Linear,
            y_scale: AxisScale::Linear,
            padding_px: 48.0,
            grid_divisions: 5,
            show_grid: true,
            show_tick_labels: true,
            theme: Theme::default(),
        }
    }
}

impl MeasureViewConfig {
    /// Configuration showing the given data range.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set both axis scales.
    pub fn with_scales(mut self, x_scale: AxisScale, y_scale: AxisScale) -> Self {
        self.x_scale = x_scale;
        self.y_scale = y_scale;
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}
