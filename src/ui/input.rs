//! Keyboard commands and the custom duration input fields

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Longest value accepted in a duration field
const MAX_FIELD_LEN: usize = 4;

/// User intent decoded from a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Toggle,
    Reset,
    Quit,
    NextField,
    Digit(char),
    Backspace,
}

/// Map a key press to a command, if it is bound
pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Enter => Some(Command::Toggle),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Reset),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Tab | KeyCode::BackTab => Some(Command::NextField),
        KeyCode::Char(c) if c.is_ascii_digit() => Some(Command::Digit(c)),
        KeyCode::Backspace | KeyCode::Delete => Some(Command::Backspace),
        _ => None,
    }
}

/// Which duration field has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Minutes,
    Seconds,
}

/// Raw text of the minutes and seconds fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationInputs {
    pub minutes: String,
    pub seconds: String,
    pub focus: Field,
}

impl DurationInputs {
    pub fn new(minutes: impl Into<String>, seconds: impl Into<String>) -> Self {
        Self {
            minutes: minutes.into(),
            seconds: seconds.into(),
            focus: Field::Minutes,
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Field::Minutes => Field::Seconds,
            Field::Seconds => Field::Minutes,
        };
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Minutes => &mut self.minutes,
            Field::Seconds => &mut self.seconds,
        }
    }

    /// Append a digit to the focused field; returns false when the field is full
    pub fn push_digit(&mut self, digit: char) -> bool {
        let field = self.focused_mut();
        if !digit.is_ascii_digit() || field.chars().count() >= MAX_FIELD_LEN {
            return false;
        }
        field.push(digit);
        true
    }

    pub fn backspace(&mut self) {
        self.focused_mut().pop();
    }
}

impl Default for DurationInputs {
    fn default() -> Self {
        Self::new("25", "0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn maps_bound_keys() {
        assert_eq!(map_key(press(KeyCode::Char(' '))), Some(Command::Toggle));
        assert_eq!(map_key(press(KeyCode::Enter)), Some(Command::Toggle));
        assert_eq!(map_key(press(KeyCode::Char('r'))), Some(Command::Reset));
        assert_eq!(map_key(press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(map_key(press(KeyCode::Tab)), Some(Command::NextField));
        assert_eq!(map_key(press(KeyCode::Char('7'))), Some(Command::Digit('7')));
        assert_eq!(map_key(press(KeyCode::Backspace)), Some(Command::Backspace));
        assert_eq!(map_key(press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key), Some(Command::Quit));
    }

    #[test]
    fn edits_go_to_focused_field() {
        let mut inputs = DurationInputs::new("", "");
        assert!(inputs.push_digit('1'));
        inputs.switch_focus();
        assert!(inputs.push_digit('3'));
        assert!(inputs.push_digit('0'));
        assert_eq!(inputs.minutes, "1");
        assert_eq!(inputs.seconds, "30");

        inputs.backspace();
        assert_eq!(inputs.seconds, "3");
        inputs.switch_focus();
        assert_eq!(inputs.focus, Field::Minutes);
    }

    #[test]
    fn fields_have_a_length_limit() {
        let mut inputs = DurationInputs::new("9999", "");
        assert!(!inputs.push_digit('9'));
        assert_eq!(inputs.minutes, "9999");
    }
}
