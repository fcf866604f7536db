//! Error types for widget configuration and annotation management.

use thiserror::Error;

use crate::text_mover::TextId;

/// Result alias for fallible widget operations.
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Errors reported by the measurement widgets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// Pick radius is not a positive finite pixel distance.
    #[error("pick radius must be a positive number of pixels, got {0}")]
    InvalidPickRadius(f32),

    /// Fixed-point formatting asked for too many digits.
    #[error("format precision {precision} exceeds the maximum of {max}")]
    InvalidPrecision { precision: usize, max: usize },

    /// Readout anchor is not a finite axes fraction.
    #[error("text anchor ({x}, {y}) is not a finite axes fraction")]
    InvalidAnchor { x: f64, y: f64 },

    /// Key chord string could not be parsed.
    #[error("invalid key chord `{chord}`: {source}")]
    KeyChord {
        chord: String,
        #[source]
        source: KeyChordError,
    },

    /// Text annotation id is not managed by the text mover.
    #[error("unknown text annotation {0:?}")]
    UnknownText(TextId),

    /// Annotation position has a non-finite coordinate.
    #[error("text position ({x}, {y}) is not finite")]
    NonFinitePosition { x: f64, y: f64 },
}

/// Reasons a key chord string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyChordError {
    /// Nothing but whitespace was given.
    #[error("chord is empty")]
    Empty,

    /// A `+`-separated prefix is not a known modifier.
    #[error("unknown modifier `{0}`")]
    UnknownModifier(String),

    /// The chord ends with a separator.
    #[error("missing key after modifiers")]
    MissingKey,
}
