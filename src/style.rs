//! Colors used by the hosting view.

use crate::render::Color;

/// Visual theme for the measured axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Window background.
    pub background: Color,
    /// Fill of the axes area.
    pub axes_fill: Color,
    /// Border of the axes area.
    pub axes_border: Color,
    /// Grid lines.
    pub grid: Color,
    /// Tick label text.
    pub tick_label: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Light theme: white axes on a light grey window.
    pub fn light() -> Self {
        Self {
            background: Color::grey(0.96),
            axes_fill: Color::WHITE,
            axes_border: Color::grey(0.2),
            grid: Color::grey(0.88),
            tick_label: Color::grey(0.25),
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::new(0.08, 0.08, 0.09, 1.0),
            axes_fill: Color::new(0.11, 0.11, 0.13, 1.0),
            axes_border: Color::grey(0.6),
            grid: Color::new(0.22, 0.22, 0.25, 1.0),
            tick_label: Color::grey(0.75),
        }
    }
}
