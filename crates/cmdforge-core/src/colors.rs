//! Legacy `&` colour code translation.
//!
//! Specification authors write `&a`, `&l`, ... for formatting. Hosts expect
//! the section sign form (`§a`), so every text line is translated before it
//! leaves the core.

/// Section sign used by the host's legacy formatting.
pub const SECTION_SIGN: char = '\u{00A7}';

const CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// Replaces `&<code>` with `§<code>` for every valid formatting code.
///
/// An `&` that is not followed by a code is left untouched.
pub fn translate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(&next) = chars.peek() {
                if CODES.contains(next) {
                    out.push(SECTION_SIGN);
                    out.push(next.to_ascii_lowercase());
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

/// Removes `§<code>` sequences, leaving plain text.
pub fn strip(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == SECTION_SIGN {
            chars.next();
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_codes() {
        assert_eq!(translate("&aHello &LWorld"), "§aHello §lWorld");
    }

    #[test]
    fn test_translate_leaves_plain_ampersand() {
        assert_eq!(translate("salt & pepper &"), "salt & pepper &");
        assert_eq!(translate("&zoo"), "&zoo");
    }

    #[test]
    fn test_strip() {
        assert_eq!(strip(&translate("&c&lDanger")), "Danger");
    }
}
