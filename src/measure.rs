//! Measurements of a segment and the text shown for them.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::error::{MeasureError, Result};
use crate::geom::Point;

/// Largest fixed-point precision accepted by [`ValueFormat::Fixed`].
pub const MAX_PRECISION: usize = 17;

/// Unit used when reporting angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleUnit {
    /// Degrees.
    #[default]
    Degrees,
    /// Radians.
    Radians,
}

impl AngleUnit {
    /// Suffix appended by the fixed formatter when none is configured.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Degrees => "deg",
            Self::Radians => "rad",
        }
    }

    fn from_radians(self, radians: f64) -> f64 {
        match self {
            Self::Degrees => radians * 180.0 / PI,
            Self::Radians => radians,
        }
    }
}

/// Direction that reads as zero angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AngleReference {
    /// Bearing measured from the +Y axis toward +X.
    #[default]
    FromYAxis,
    /// Mathematical angle measured from the +X axis toward +Y.
    FromXAxis,
}

/// Formatter for a single measured value.
#[derive(Clone)]
pub enum ValueFormat {
    /// Fixed-point number with an optional suffix.
    ///
    /// When `suffix` is `None` the caller's default suffix is used (the angle
    /// unit for angles, nothing for lengths).
    Fixed {
        /// Digits after the decimal point.
        precision: usize,
        /// Text appended after the number.
        suffix: Option<String>,
    },
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl ValueFormat {
    /// Fixed-point format without an explicit suffix.
    pub fn fixed(precision: usize) -> Self {
        Self::Fixed {
            precision,
            suffix: None,
        }
    }

    /// Custom formatter.
    pub fn custom(f: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(f))
    }

    /// Set the suffix of a fixed format. Custom formats are returned unchanged.
    pub fn with_suffix(self, suffix: impl Into<String>) -> Self {
        match self {
            Self::Fixed { precision, .. } => Self::Fixed {
                precision,
                suffix: Some(suffix.into()),
            },
            custom => custom,
        }
    }

    /// Format a value, using `default_suffix` when no suffix is configured.
    pub fn format(&self, value: f64, default_suffix: &str) -> String {
        match self {
            Self::Fixed { precision, suffix } => {
                let suffix = suffix.as_deref().unwrap_or(default_suffix);
                format!("{value:.precision$}{suffix}")
            }
            Self::Custom(formatter) => formatter(value),
        }
    }

    /// Reject precisions the formatter cannot honour.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed { precision, .. } if *precision > MAX_PRECISION => {
                Err(MeasureError::InvalidPrecision {
                    precision: *precision,
                    max: MAX_PRECISION,
                })
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Debug for ValueFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed { precision, suffix } => f
                .debug_struct("ValueFormat::Fixed")
                .field("precision", precision)
                .field("suffix", suffix)
                .finish(),
            Self::Custom(_) => write!(f, "ValueFormat::Custom(..)"),
        }
    }
}

/// A measured segment in data space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Segment start.
    pub start: Point,
    /// Segment end.
    pub end: Point,
}

impl Measurement {
    /// Measure the segment from `start` to `end`.
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Signed horizontal component.
    pub fn dx(&self) -> f64 {
        self.end.x - self.start.x
    }

    /// Signed vertical component.
    pub fn dy(&self) -> f64 {
        self.end.y - self.start.y
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.dx().hypot(self.dy())
    }

    /// Angle of the segment.
    pub fn angle(&self, unit: AngleUnit, reference: AngleReference) -> f64 {
        let radians = match reference {
            AngleReference::FromYAxis => self.dx().atan2(self.dy()),
            AngleReference::FromXAxis => self.dy().atan2(self.dx()),
        };
        unit.from_radians(radians)
    }

    /// Segment midpoint.
    pub fn midpoint(&self) -> Point {
        self.start.midpoint(self.end)
    }
}

/// How measurements are turned into text.
#[derive(Debug, Clone)]
pub struct MeasureFormat {
    /// Format for length, dx and dy.
    pub length: ValueFormat,
    /// Format for the angle.
    pub angle: ValueFormat,
    /// Angle unit.
    pub angle_unit: AngleUnit,
    /// Zero direction of the angle.
    pub angle_reference: AngleReference,
    /// Unit text appended to lengths by the fixed formatter, e.g. `"m"`.
    pub length_unit: Option<String>,
}

impl Default for MeasureFormat {
    fn default() -> Self {
        Self {
            length: ValueFormat::fixed(3),
            angle: ValueFormat::fixed(2),
            angle_unit: AngleUnit::Degrees,
            angle_reference: AngleReference::FromYAxis,
            length_unit: None,
        }
    }
}

impl MeasureFormat {
    /// Validate both value formats.
    pub fn validate(&self) -> Result<()> {
        self.length.validate()?;
        self.angle.validate()
    }

    /// Format a length-like value.
    pub fn format_length(&self, value: f64) -> String {
        let suffix = self
            .length_unit
            .as_deref()
            .map(|unit| format!(" {unit}"))
            .unwrap_or_default();
        self.length.format(value, &suffix)
    }

    /// Format an angle already expressed in [`Self::angle_unit`].
    pub fn format_angle(&self, value: f64) -> String {
        self.angle.format(value, self.angle_unit.suffix())
    }

    /// Angle of a measurement in the configured unit and reference.
    pub fn angle_of(&self, measurement: &Measurement) -> f64 {
        measurement.angle(self.angle_unit, self.angle_reference)
    }

    /// Full readout: `L: ..; dx: ..; dy: ..; ang: ..`.
    pub fn readout(&self, measurement: &Measurement) -> String {
        [
            format!("L: {}", self.format_length(measurement.length())),
            format!("dx: {}", self.format_length(measurement.dx())),
            format!("dy: {}", self.format_length(measurement.dy())),
            format!("ang: {}", self.format_angle(self.angle_of(measurement))),
        ]
        .join("; ")
    }

    /// Short label with the length only.
    pub fn label(&self, measurement: &Measurement) -> String {
        self.format_length(measurement.length())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_are_signed() {
        let m = Measurement::new(Point::new(3.0, 4.0), Point::new(0.0, 0.0));
        assert_eq!(m.dx(), -3.0);
        assert_eq!(m.dy(), -4.0);
        assert_eq!(m.length(), 5.0);
    }

    #[test]
    fn angle_references() {
        let m = Measurement::new(Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        let bearing = m.angle(AngleUnit::Degrees, AngleReference::FromYAxis);
        let math = m.angle(AngleUnit::Degrees, AngleReference::FromXAxis);
        assert!((bearing - 90.0).abs() < 1e-9);
        assert!(math.abs() < 1e-9);
        let radians = m.angle(AngleUnit::Radians, AngleReference::FromYAxis);
        assert!((radians - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn default_readout_matches_layout() {
        let format = MeasureFormat::default();
        let m = Measurement::new(Point::new(0.0, 0.0), Point::new(3.0, 4.0));
        assert_eq!(
            format.readout(&m),
            "L: 5.000; dx: 3.000; dy: 4.000; ang: 36.87deg"
        );
    }

    #[test]
    fn length_unit_and_custom_angle() {
        let format = MeasureFormat {
            length: ValueFormat::fixed(1),
            angle: ValueFormat::custom(|v| format!("{v:.0} degrees")),
            length_unit: Some("m".to_string()),
            ..MeasureFormat::default()
        };
        let m = Measurement::new(Point::new(0.0, 0.0), Point::new(0.0, 2.0));
        assert_eq!(format.label(&m), "2.0 m");
        assert_eq!(format.format_angle(format.angle_of(&m)), "0 degrees");
    }

    #[test]
    fn radians_switch_default_suffix() {
        let format = MeasureFormat {
            angle_unit: AngleUnit::Radians,
            ..MeasureFormat::default()
        };
        assert_eq!(format.format_angle(1.5), "1.50rad");
        let explicit = ValueFormat::fixed(1).with_suffix("°");
        assert_eq!(explicit.format(10.0, "deg"), "10.0°");
    }

    #[test]
    fn oversized_precision_is_rejected() {
        let format = ValueFormat::fixed(MAX_PRECISION + 1);
        assert!(matches!(
            format.validate(),
            Err(MeasureError::InvalidPrecision { .. })
        ));
    }
}
