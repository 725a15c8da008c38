//! Terminal rendering of legacy `§` formatting codes.
//!
//! Text leaving the core carries `§a`, `§l`, ... codes. The shell maps them
//! onto the `colored` palette so a simulated player's view reads the way it
//! would in game.

use cmdforge_core::colors::SECTION_SIGN;
use colored::{Color, ColoredString, Colorize};

#[derive(Debug, Clone, Copy, Default)]
struct Format {
    color: Option<Color>,
    bold: bool,
    italic: bool,
    underline: bool,
    strikethrough: bool,
}

impl Format {
    fn apply(self, text: &str) -> ColoredString {
        let mut out = self.color.map_or_else(|| text.normal(), |color| text.color(color));
        if self.bold {
            out = out.bold();
        }
        if self.italic {
            out = out.italic();
        }
        if self.underline {
            out = out.underline();
        }
        if self.strikethrough {
            out = out.strikethrough();
        }
        out
    }
}

fn code_color(code: char) -> Option<Color> {
    Some(match code {
        '0' => Color::Black,
        '1' => Color::Blue,
        '2' => Color::Green,
        '3' => Color::Cyan,
        '4' => Color::Red,
        '5' => Color::Magenta,
        '6' => Color::Yellow,
        '7' => Color::White,
        '8' => Color::BrightBlack,
        '9' => Color::BrightBlue,
        'a' => Color::BrightGreen,
        'b' => Color::BrightCyan,
        'c' => Color::BrightRed,
        'd' => Color::BrightMagenta,
        'e' => Color::BrightYellow,
        'f' => Color::BrightWhite,
        _ => return None,
    })
}

/// Renders `§`-coded text for the terminal.
///
/// A colour code resets the active styles, `§r` resets everything, and
/// `§k`/`§x` are dropped.
pub fn render(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut format = Format::default();
    let mut segment = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != SECTION_SIGN {
            segment.push(c);
            continue;
        }
        let Some(code) = chars.next() else { break };
        if !segment.is_empty() {
            out.push_str(&format.apply(&segment).to_string());
            segment.clear();
        }
        match code.to_ascii_lowercase() {
            'l' => format.bold = true,
            'o' => format.italic = true,
            'n' => format.underline = true,
            'm' => format.strikethrough = true,
            'r' => format = Format::default(),
            other => {
                if let Some(color) = code_color(other) {
                    format = Format { color: Some(color), ..Format::default() };
                }
            }
        }
    }
    if !segment.is_empty() {
        out.push_str(&format.apply(&segment).to_string());
    }
    out
}
