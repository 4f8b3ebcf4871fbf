// ANSI SGR styles for highlighted tokens.
//
// Plain color names are the high-intensity variants; `-low` selects the
// normal-intensity ones.

use std::fmt::Write as _;

use tracing::warn;

const CSI: &str = "\x1b[";
const RESET: &str = "\x1b[0m";

const COLORS: [&str; 8] = ["black", "red", "green", "yellow", "blue", "magenta", "cyan", "white"];

/// Look up the SGR code for a style name (case-insensitive).
pub fn attribute_code(name: &str) -> Option<u8> {
    let name = name.to_ascii_lowercase();

    let modifier = match name.as_str() {
        "bold" => Some(1),
        "faint" => Some(2),
        "italic" => Some(3),
        "underline" => Some(4),
        "blink" => Some(5),
        "reverse" => Some(7),
        "strikethrough" => Some(9),
        _ => None,
    };
    if modifier.is_some() {
        return modifier;
    }

    let (base, color) = match name.strip_prefix("bg-") {
        Some(rest) => (40, rest),
        None => (30, name.strip_prefix("fg-").unwrap_or(&name)),
    };
    let (color, high) = match color.strip_suffix("-low") {
        Some(color) => (color, false),
        None => (color, true),
    };

    let index = COLORS.iter().position(|candidate| *candidate == color)? as u8;
    Some(if high { base + 60 + index } else { base + index })
}

/// An ordered set of SGR attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    codes: Vec<u8>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse space-separated style names, skipping unknown ones with a
    /// warning.
    pub fn parse(definition: &str) -> Self {
        let mut style = Self::new();
        for name in definition.split_whitespace() {
            match attribute_code(name) {
                Some(code) => style.push(code),
                None => warn!(color = name, definition, "invalid color value, ignoring"),
            }
        }
        style
    }

    pub fn push(&mut self, code: u8) {
        self.codes.push(code);
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Wrap `text` in this style's escape sequence.
    pub fn paint(&self, text: &str) -> String {
        if self.codes.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len() + 4 * self.codes.len() + RESET.len() + 2);
        out.push_str(CSI);
        for (index, code) in self.codes.iter().enumerate() {
            if index > 0 {
                out.push(';');
            }
            let _ = write!(out, "{code}");
        }
        out.push('m');
        out.push_str(text);
        out.push_str(RESET);
        out
    }
}
