//! Backend-neutral input events delivered to widgets.

use std::fmt;
use std::str::FromStr;

use crate::error::{KeyChordError, MeasureError};
use crate::geom::{Point, ScreenPoint};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Middle button or wheel click.
    Middle,
    /// Secondary button.
    Right,
    /// Any other button, by backend index.
    Other(u8),
}

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Modifiers {
    /// Shift key.
    pub shift: bool,
    /// Control key.
    pub control: bool,
    /// Alt / option key.
    pub alt: bool,
    /// Platform key (command / super).
    pub platform: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        platform: false,
    };

    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Only control held.
    pub const CONTROL: Self = Self {
        control: true,
        ..Self::NONE
    };

    /// Parse a single modifier name such as `ctrl` or `shift`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "shift" => Some(Self::SHIFT),
            "ctrl" | "control" => Some(Self::CONTROL),
            "alt" | "option" => Some(Self {
                alt: true,
                ..Self::NONE
            }),
            "cmd" | "super" | "platform" | "meta" => Some(Self {
                platform: true,
                ..Self::NONE
            }),
            _ => None,
        }
    }

    /// Check whether no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }

    /// Modifiers held in either set.
    pub fn union(self, other: Self) -> Self {
        Self {
            shift: self.shift || other.shift,
            control: self.control || other.control,
            alt: self.alt || other.alt,
            platform: self.platform || other.platform,
        }
    }

    /// Modifiers held here but not in `other`.
    pub fn without(self, other: Self) -> Self {
        Self {
            shift: self.shift && !other.shift,
            control: self.control && !other.control,
            alt: self.alt && !other.alt,
            platform: self.platform && !other.platform,
        }
    }
}

/// Pointer event in both screen and data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Pointer position in pixels.
    pub position: ScreenPoint,
    /// Pointer position in data space, `None` when outside the axes.
    pub data: Option<Point>,
    /// Button that changed state, if any.
    pub button: Option<MouseButton>,
    /// Modifiers held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a pointer event without a button or modifiers.
    pub fn new(position: ScreenPoint, data: Option<Point>) -> Self {
        Self {
            position,
            data,
            button: None,
            modifiers: Modifiers::NONE,
        }
    }

    /// Set the button.
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Set the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check whether the pointer is inside the axes.
    pub fn in_axes(&self) -> bool {
        self.data.is_some()
    }
}

/// A key press or release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key and modifiers of the event.
    pub chord: KeyChord,
}

impl KeyEvent {
    /// Create a key event.
    pub fn new(chord: KeyChord) -> Self {
        Self { chord }
    }

    /// Modifiers named by this event, including the key itself when the key
    /// is a modifier.
    pub fn held_modifiers(&self) -> Modifiers {
        let own = Modifiers::from_name(&self.chord.key).unwrap_or_default();
        self.chord.modifiers.union(own)
    }
}

/// A key combined with modifiers, written as `ctrl+m`, `shift+r` or `m`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    /// Lower-case key name.
    pub key: String,
    /// Modifiers that must be held.
    pub modifiers: Modifiers,
}

impl KeyChord {
    /// Chord for a bare key.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into().to_ascii_lowercase(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Same key with the given modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Parse a chord, wrapping failures in [`MeasureError`].
    pub fn parse(chord: &str) -> Result<Self, MeasureError> {
        chord.parse().map_err(|source| MeasureError::KeyChord {
            chord: chord.to_string(),
            source,
        })
    }
}

impl FromStr for KeyChord {
    type Err = KeyChordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(KeyChordError::Empty);
        }
        let mut parts: Vec<&str> = trimmed.split('+').map(str::trim).collect();
        let key = parts.pop().unwrap_or_default();
        if key.is_empty() {
            return Err(KeyChordError::MissingKey);
        }
        let mut modifiers = Modifiers::NONE;
        for part in parts {
            let modifier = Modifiers::from_name(part)
                .ok_or_else(|| KeyChordError::UnknownModifier(part.to_string()))?;
            modifiers = modifiers.union(modifier);
        }
        Ok(Self::key(key).with_modifiers(modifiers))
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.control {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.alt {
            f.write_str("alt+")?;
        }
        if self.modifiers.platform {
            f.write_str("cmd+")?;
        }
        if self.modifiers.shift {
            f.write_str("shift+")?;
        }
        f.write_str(&self.key)
    }
}

/// Cursor shapes a widget may request from the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Regular arrow.
    #[default]
    Pointer,
    /// Move / drag hand.
    Move,
    /// Horizontal resize.
    ResizeHorizontal,
    /// Vertical resize.
    ResizeVertical,
    /// Crosshair for drawing a new region.
    SelectRegion,
}

/// Events dispatched from the canvas to its widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// A mouse button went down.
    Press(PointerEvent),
    /// A mouse button went up.
    Release(PointerEvent),
    /// The pointer moved.
    Move(PointerEvent),
    /// A key went down.
    KeyPress(KeyEvent),
    /// A key went up.
    KeyRelease(KeyEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_chords() {
        let chord: KeyChord = "ctrl+m".parse().unwrap();
        assert_eq!(chord, KeyChord::key("m").with_modifiers(Modifiers::CONTROL));
        assert_eq!(chord.to_string(), "ctrl+m");

        let upper: KeyChord = "Shift+Control+R".parse().unwrap();
        assert!(upper.modifiers.shift && upper.modifiers.control);
        assert_eq!(upper.key, "r");
    }

    #[test]
    fn parse_rejects_bad_chords() {
        assert_eq!("".parse::<KeyChord>(), Err(KeyChordError::Empty));
        assert_eq!("ctrl+".parse::<KeyChord>(), Err(KeyChordError::MissingKey));
        assert_eq!(
            "hyper+m".parse::<KeyChord>(),
            Err(KeyChordError::UnknownModifier("hyper".to_string()))
        );
        assert!(matches!(
            KeyChord::parse("hyper+m"),
            Err(MeasureError::KeyChord { .. })
        ));
    }

    #[test]
    fn modifier_key_counts_as_held() {
        let event = KeyEvent::new(KeyChord::key("shift"));
        assert_eq!(event.held_modifiers(), Modifiers::SHIFT);
        let both = Modifiers::SHIFT.union(Modifiers::CONTROL);
        assert_eq!(both.without(Modifiers::SHIFT), Modifiers::CONTROL);
    }
}
