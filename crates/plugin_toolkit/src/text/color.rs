//! Legacy color-code handling.
//!
//! Clients still honor inline section-sign escapes inside plain strings, and
//! plugin authors still write them with `&` aliases and `<#RRGGBB>` hex tags
//! in config files. [`colorize`] turns the user-facing form into the escapes
//! the host understands; [`strip_codes`] removes them again for surfaces that
//! want bare text (console logs, string comparison).

/// The escape character the host's client protocol uses for inline codes.
pub const SECTION: char = '§';

/// Every code character the `&` alias is allowed to precede.
const CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// Rewrites `&`-style color codes and `<#RRGGBB>` hex tags into section-sign
/// escapes.
///
/// Hex tags are rewritten first into the `§x§R§R§G§G§B§B` run clients expect,
/// then `&` followed by a valid code character becomes `§` with the code
/// lowercased. Anything that does not match is left untouched, so strings
/// like `"Rock & roll"` or `"<#nothex>"` pass through unchanged.
///
/// # Examples
/// ```
/// use plugin_toolkit::text::colorize;
///
/// assert_eq!(colorize("&6Gold"), "§6Gold");
/// assert_eq!(colorize("<#FF0000>red"), "§x§f§f§0§0§0§0red");
/// ```
pub fn colorize(input: &str) -> String {
    translate_ampersands(&translate_hex_tags(input))
}

/// Removes every section-sign escape from a string, including hex runs.
pub fn strip_codes(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if c == SECTION {
            chars.next();
        } else {
            out.push(c);
        }
    }
    out
}

fn translate_hex_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find("<#") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        if let Some(hex) = hex_digits(candidate) {
            out.push(SECTION);
            out.push('x');
            for digit in hex.bytes() {
                out.push(SECTION);
                out.push(digit.to_ascii_lowercase() as char);
            }
            rest = &candidate[9..];
        } else {
            // Not a hex tag after all; keep the '<' and carry on behind it.
            out.push('<');
            rest = &candidate[1..];
        }
    }
    out.push_str(rest);
    out
}

/// Returns the six digits of a `<#RRGGBB>` tag sitting at the start of
/// `candidate`, or `None` if the tag is malformed.
fn hex_digits(candidate: &str) -> Option<&str> {
    let digits = candidate.get(2..8)?;
    if candidate.as_bytes().get(8) == Some(&b'>')
        && digits.bytes().all(|b| b.is_ascii_hexdigit())
    {
        Some(digits)
    } else {
        None
    }
}

fn translate_ampersands(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '&' {
            if let Some(&next) = chars.peek() {
                if CODES.contains(next) {
                    chars.next();
                    out.push(SECTION);
                    out.push(next.to_ascii_lowercase());
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_basic_codes() {
        assert_eq!(colorize("&6Gold &lBold"), "§6Gold §lBold");
        assert_eq!(colorize("&a&b&c"), "§a§b§c");
    }

    #[test]
    fn test_colorize_lowercases_code_characters() {
        assert_eq!(colorize("&A&L"), "§a§l");
    }

    #[test]
    fn test_colorize_leaves_plain_ampersands_alone() {
        assert_eq!(colorize("Rock & roll"), "Rock & roll");
        assert_eq!(colorize("&z not a code"), "&z not a code");
        assert_eq!(colorize("trailing &"), "trailing &");
    }

    #[test]
    fn test_colorize_hex_tags() {
        assert_eq!(colorize("<#FF0000>red"), "§x§f§f§0§0§0§0red");
        assert_eq!(colorize("a<#00ff00>b"), "a§x§0§0§f§f§0§0b");
    }

    #[test]
    fn test_colorize_rejects_malformed_hex_tags() {
        assert_eq!(colorize("<#GGGGGG>"), "<#GGGGGG>");
        assert_eq!(colorize("<#FFF>short"), "<#FFF>short");
        assert_eq!(colorize("<#FF0000 no close"), "<#FF0000 no close");
    }

    #[test]
    fn test_colorize_hex_and_codes_together() {
        assert_eq!(
            colorize("<#AABBCC>&lhello"),
            "§x§a§a§b§b§c§c§lhello"
        );
    }

    #[test]
    fn test_strip_codes() {
        assert_eq!(strip_codes("§6Gold §lBold"), "Gold Bold");
        assert_eq!(strip_codes("§x§f§f§0§0§0§0red"), "red");
        assert_eq!(strip_codes("plain"), "plain");
        assert_eq!(strip_codes("dangling §"), "dangling ");
    }
}
