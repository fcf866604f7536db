use crate::error::{MeasureError, Result};
use crate::event::{KeyChord, Modifiers};
use crate::measure::{AngleReference, AngleUnit, MeasureFormat, ValueFormat};
use crate::render::{Color, LineStyle, MarkerShape, MarkerStyle, RectStyle, TextStyle};

/// Where the readout box is placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAnchor {
    /// Axes-fraction position, `(0, 1)` is the top-left corner.
    pub fraction: (f64, f64),
    /// Offset from the anchor in logical pixels (not points), Y pointing up.
    pub offset: (f32, f32),
}

impl Default for TextAnchor {
    fn default() -> Self {
        Self {
            fraction: (0.0, 1.0),
            offset: (10.0, -10.0),
        }
    }
}

/// Configuration for a [`Ruler`](super::Ruler).
#[derive(Debug, Clone)]
pub struct RulerConfig {
    /// Whether the ruler reacts to the pointer when created.
    pub active: bool,
    /// Use partial redraws while dragging, when the canvas supports them.
    pub use_blit: bool,
    /// Emit every readout update through `tracing`.
    pub log_measurements: bool,
    /// Number formatting for the readout.
    pub format: MeasureFormat,
    /// Ruler line styling.
    pub line: LineStyle,
    /// Styling of the start, midpoint and end markers.
    pub marker: MarkerStyle,
    /// Styling of the pending start marker in two-click mode.
    pub pending_marker: MarkerStyle,
    /// Readout text styling.
    pub text: TextStyle,
    /// Readout box styling.
    pub text_box: RectStyle,
    /// Readout placement.
    pub text_anchor: TextAnchor,
    /// Draw the length next to the midpoint marker.
    pub show_line_label: bool,
    /// Allow placing the ruler with two right clicks.
    pub two_click: bool,
    /// Marker pick radius in pixels.
    pub pick_radius_px: f32,
    /// Chord toggling whether the ruler is active.
    pub toggle_active_key: KeyChord,
    /// Chord toggling whether the ruler is shown.
    pub toggle_visible_key: KeyChord,
}

impl Default for RulerConfig {
    fn default() -> Self {
        Self {
            active: false,
            use_blit: false,
            log_measurements: false,
            format: MeasureFormat::default(),
            line: LineStyle::default(),
            marker: MarkerStyle::default(),
            pending_marker: MarkerStyle {
                fill: Color::RED,
                edge: Color::RED,
                edge_width: 1.0,
                size: 8.0,
                shape: MarkerShape::Cross,
            },
            text: TextStyle::default(),
            text_box: RectStyle {
                fill: Color::WHITE.with_alpha(0.5),
                stroke: Color::grey(0.75),
                stroke_width: 1.0,
                corner_radius: 4.0,
            },
            text_anchor: TextAnchor::default(),
            show_line_label: false,
            two_click: false,
            pick_radius_px: 5.0,
            toggle_active_key: KeyChord::key("m"),
            toggle_visible_key: KeyChord::key("m").with_modifiers(Modifiers::CONTROL),
        }
    }
}

impl RulerConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start active.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Enable partial redraws.
    pub fn with_blit(mut self, use_blit: bool) -> Self {
        self.use_blit = use_blit;
        self
    }

    /// Log each readout update.
    pub fn with_logging(mut self, log_measurements: bool) -> Self {
        self.log_measurements = log_measurements;
        self
    }

    /// Set the length format.
    pub fn with_length_format(mut self, format: ValueFormat) -> Self {
        self.format.length = format;
        self
    }

    /// Set the angle format.
    pub fn with_angle_format(mut self, format: ValueFormat) -> Self {
        self.format.angle = format;
        self
    }

    /// Set the angle unit.
    pub fn with_angle_unit(mut self, unit: AngleUnit) -> Self {
        self.format.angle_unit = unit;
        self
    }

    /// Set the angle reference direction.
    pub fn with_angle_reference(mut self, reference: AngleReference) -> Self {
        self.format.angle_reference = reference;
        self
    }

    /// Append a unit to formatted lengths.
    pub fn with_length_unit(mut self, unit: impl Into<String>) -> Self {
        self.format.length_unit = Some(unit.into());
        self
    }

    /// Set the line style.
    pub fn with_line_style(mut self, line: LineStyle) -> Self {
        self.line = line;
        self
    }

    /// Set the marker style.
    pub fn with_marker_style(mut self, marker: MarkerStyle) -> Self {
        self.marker = marker;
        self
    }

    /// Set the readout text style.
    pub fn with_text_style(mut self, text: TextStyle) -> Self {
        self.text = text;
        self
    }

    /// Set the readout placement.
    pub fn with_text_anchor(mut self, anchor: TextAnchor) -> Self {
        self.text_anchor = anchor;
        self
    }

    /// Show the length next to the ruler.
    pub fn with_line_label(mut self, show: bool) -> Self {
        self.show_line_label = show;
        self
    }

    /// Enable two-click placement with the secondary button.
    pub fn with_two_click(mut self, enabled: bool) -> Self {
        self.two_click = enabled;
        self
    }

    /// Set the marker pick radius.
    pub fn with_pick_radius(mut self, radius_px: f32) -> Self {
        self.pick_radius_px = radius_px;
        self
    }

    /// Set the activation chords, e.g. `("r", "ctrl+r")`.
    pub fn with_keys(mut self, toggle_active: &str, toggle_visible: &str) -> Result<Self> {
        self.toggle_active_key = KeyChord::parse(toggle_active)?;
        self.toggle_visible_key = KeyChord::parse(toggle_visible)?;
        Ok(self)
    }

    /// Check the configuration for values the ruler cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.pick_radius_px.is_finite() || self.pick_radius_px <= 0.0 {
            return Err(MeasureError::InvalidPickRadius(self.pick_radius_px));
        }
        let (x, y) = self.text_anchor.fraction;
        if !x.is_finite() || !y.is_finite() {
            return Err(MeasureError::InvalidAnchor { x, y });
        }
        self.format.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RulerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.toggle_visible_key.to_string(), "ctrl+m");
    }

    #[test]
    fn rejects_bad_pick_radius_and_anchor() {
        let config = RulerConfig::new().with_pick_radius(0.0);
        assert_eq!(config.validate(), Err(MeasureError::InvalidPickRadius(0.0)));

        let config = RulerConfig::new().with_text_anchor(TextAnchor {
            fraction: (f64::NAN, 1.0),
            offset: (0.0, 0.0),
        });
        assert!(matches!(
            config.validate(),
            Err(MeasureError::InvalidAnchor { .. })
        ));
    }

    #[test]
    fn custom_keys_parse() {
        let config = RulerConfig::new().with_keys("r", "shift+r").unwrap();
        assert_eq!(config.toggle_active_key, KeyChord::key("r"));
        assert!(config.toggle_visible_key.modifiers.shift);
        assert!(RulerConfig::new().with_keys("r", "bogus+r").is_err());
    }
}
