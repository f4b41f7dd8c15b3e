//! Three-position toggle read from two active-low pins.

use embedded_hal::digital::InputPin;

/// Toggle position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    Left,
    #[default]
    Center,
    Right,
}

impl Position {
    pub const fn name(self) -> &'static str {
        match self {
            Position::Left => "Left",
            Position::Center => "Center",
            Position::Right => "Right",
        }
    }
}

/// On-off-on toggle. Pin A grounded means left, pin B grounded means right.
///
/// Not debounced: the contacts are read directly each tick.
pub struct Switch3<A, B> {
    pin_a: A,
    pin_b: B,
    position: Position,
}

impl<A: InputPin, B: InputPin> Switch3<A, B> {
    pub fn new(pin_a: A, pin_b: B) -> Self {
        Switch3 {
            pin_a,
            pin_b,
            position: Position::Center,
        }
    }

    /// Sample both pins. A failed read keeps the previous position.
    pub fn read(&mut self) -> Position {
        let (Ok(a_low), Ok(b_low)) = (self.pin_a.is_low(), self.pin_b.is_low()) else {
            return self.position;
        };
        self.position = if a_low {
            Position::Left
        } else if b_low {
            Position::Right
        } else {
            Position::Center
        };
        self.position
    }

    /// Position from the most recent [`read()`](Self::read).
    pub fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::debounce::tests::MockInput;
    use core::cell::Cell;

    #[test]
    fn positions() {
        let a = Cell::new(true);
        let b = Cell::new(true);
        let mut toggle = Switch3::new(MockInput(&a), MockInput(&b));
        assert_eq!(toggle.read(), Position::Center);

        a.set(false);
        assert_eq!(toggle.read(), Position::Left);

        a.set(true);
        b.set(false);
        assert_eq!(toggle.read(), Position::Right);
        assert_eq!(toggle.position(), Position::Right);
        assert_eq!(toggle.position().name(), "Right");
    }

    #[test]
    fn pin_a_wins_when_both_low() {
        let a = Cell::new(false);
        let b = Cell::new(false);
        let mut toggle = Switch3::new(MockInput(&a), MockInput(&b));
        assert_eq!(toggle.read(), Position::Left);
    }
}
