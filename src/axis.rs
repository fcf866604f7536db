//! Axis scaling used when mapping pointer positions into data space.

/// Axis scale type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisScale {
    /// Linear scaling.
    #[default]
    Linear,
    /// Base-10 logarithmic scaling.
    Log10,
}

impl AxisScale {
    /// Map a value into axis space.
    pub fn map_value(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            Self::Linear => Some(value),
            Self::Log10 => {
                if value <= 0.0 {
                    None
                } else {
                    Some(value.log10())
                }
            }
        }
    }

    /// Invert a value from axis space back into data space.
    pub fn invert_value(self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        match self {
            Self::Linear => Some(value),
            Self::Log10 => Some(10_f64.powf(value)),
        }
    }
}
