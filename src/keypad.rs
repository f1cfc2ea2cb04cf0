//! Static input tables: the button grid and the keyboard mapping. Both only
//! name an [`Action`]; carrying it out is the session's job.

use crate::ops::Function;

/// What a button or key press asks the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Append fixed text to the expression buffer.
    Append(&'static str),
    /// Append a single typed character.
    Type(char),
    Apply(Function),
    FlipSign,
    Delete,
    Clear,
    Equals,
}

/// Visual class of a button. Cosmetic only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    Function,
    Digit,
    Operator,
    Control,
    Equals,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: &'static str,
    pub action: Action,
    pub style: Style,
}

const fn button(label: &'static str, action: Action, style: Style) -> Button {
    Button {
        label,
        action,
        style,
    }
}

const fn func(label: &'static str, action: Action) -> Button {
    button(label, action, Style::Function)
}

const fn digit(label: &'static str) -> Button {
    button(label, Action::Append(label), Style::Digit)
}

const fn digit_append(label: &'static str, text: &'static str) -> Button {
    button(label, Action::Append(text), Style::Digit)
}

const fn operator(label: &'static str, text: &'static str) -> Button {
    button(label, Action::Append(text), Style::Operator)
}

pub const COLUMNS: usize = 5;

/// The button grid, row by row. The last row is one short: `=` spans its
/// final two columns.
pub static LAYOUT: [&[Button]; 9] = [
    &[
        func("abs", Action::Append("abs(")),
        func("mod", Action::Append("%")),
        func("div", Action::Append("//")),
        func("x!", Action::Apply(Function::Factorial)),
        func("e", Action::Append("2.718281828459045")),
    ],
    &[
        func("sin", Action::Apply(Function::Sine)),
        func("cos", Action::Apply(Function::Cosine)),
        func("tan", Action::Apply(Function::Tangent)),
        func("cot", Action::Apply(Function::Cotangent)),
        func("π", Action::Append("3.141592653589793")),
    ],
    &[
        func("x²", Action::Append("**2")),
        func("x³", Action::Append("**3")),
        func("xⁿ", Action::Append("**")),
        func("x⁻¹", Action::Append("**(-1)")),
        func("10ˣ", Action::Append("10**")),
    ],
    &[
        func("√", Action::Apply(Function::SquareRoot)),
        func("∛", Action::Apply(Function::CubeRoot)),
        func("ⁿ√", Action::Append("**(1/")),
        func("log", Action::Append("log10(")),
        func("ln", Action::Append("log(")),
    ],
    &[
        func("(", Action::Append("(")),
        func(")", Action::Append(")")),
        func("±", Action::FlipSign),
        func("%", Action::Apply(Function::Percent)),
        func("eˣ", Action::Append("exp(")),
    ],
    &[
        digit("7"),
        digit("8"),
        digit("9"),
        button("DEL", Action::Delete, Style::Control),
        button("AC", Action::Clear, Style::Control),
    ],
    &[
        digit("4"),
        digit("5"),
        digit("6"),
        operator("×", "*"),
        operator("÷", "/"),
    ],
    &[
        digit("1"),
        digit("2"),
        digit("3"),
        operator("+", "+"),
        operator("−", "-"),
    ],
    &[
        digit("0"),
        digit("."),
        digit_append("EXP", "*10**"),
        button("=", Action::Equals, Style::Equals),
    ],
];

/// Every button, in grid order.
pub fn buttons() -> impl Iterator<Item = &'static Button> {
    LAYOUT.iter().flat_map(|row| row.iter())
}

/// Look a button up by its label.
pub fn find(label: &str) -> Option<&'static Button> {
    buttons().find(|button| button.label == label)
}

/// A key press as delivered by the keyboard surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Backspace,
    Escape,
}

impl Key {
    /// Digits and `+ - * / . ( )` type themselves; any other character is
    /// ignored.
    pub fn action(self) -> Option<Action> {
        match self {
            Key::Char(c) if c.is_ascii_digit() || "+-*/.()".contains(c) => Some(Action::Type(c)),
            Key::Char(_) => None,
            Key::Enter => Some(Action::Equals),
            Key::Backspace => Some(Action::Delete),
            Key::Escape => Some(Action::Clear),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_shape() {
        assert_eq!(LAYOUT.len(), 9);
        for row in &LAYOUT[..8] {
            assert_eq!(row.len(), COLUMNS);
        }
        assert_eq!(LAYOUT[8].len(), COLUMNS - 1);
        assert_eq!(buttons().count(), 44);
    }

    #[test]
    fn labels_are_unique() {
        for button in buttons() {
            assert_eq!(find(button.label), Some(button));
        }
    }

    #[test]
    fn constants_match_float_text() {
        assert_eq!(
            find("π").map(|b| b.action),
            Some(Action::Append("3.141592653589793"))
        );
        assert_eq!(std::f64::consts::PI.to_string(), "3.141592653589793");
        assert_eq!(std::f64::consts::E.to_string(), "2.718281828459045");
    }

    #[test]
    fn keyboard_table() {
        assert_eq!(Key::Char('7').action(), Some(Action::Type('7')));
        assert_eq!(Key::Char('(').action(), Some(Action::Type('(')));
        assert_eq!(Key::Char('a').action(), None);
        assert_eq!(Key::Char('%').action(), None);
        assert_eq!(Key::Char('=').action(), None);
        assert_eq!(Key::Enter.action(), Some(Action::Equals));
        assert_eq!(Key::Backspace.action(), Some(Action::Delete));
        assert_eq!(Key::Escape.action(), Some(Action::Clear));
    }
}
