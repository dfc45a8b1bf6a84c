//! Chat components: the structured, styleable text the host's clients render.
//!
//! The host protocol already defines the JSON shape; this module only
//! populates it. [`TextComponent`] is the serde model, [`colorize`] and
//! [`TextComponent::from_legacy`] bridge the old inline color codes into it,
//! and [`MessageBuilder`] assembles multi-part clickable messages.

pub mod builder;
pub mod color;

pub use builder::{FormatRetention, MessageBuilder};
pub use color::{colorize, strip_codes, SECTION};

use serde::{Deserialize, Serialize};

// ============================================================================
// Component Model
// ============================================================================

/// One unit of styleable text, with optional children in `extra`.
///
/// Serializes to the host's chat JSON: style fields are omitted when unset,
/// event keys use the protocol's camelCase names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextComponent {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underlined: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfuscated: Option<bool>,
    #[serde(rename = "clickEvent", skip_serializing_if = "Option::is_none")]
    pub click_event: Option<ClickEvent>,
    #[serde(rename = "hoverEvent", skip_serializing_if = "Option::is_none")]
    pub hover_event: Option<HoverEvent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<TextComponent>,
}

/// Runs something when the rendered text is clicked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub action: ClickAction,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    OpenUrl,
    RunCommand,
    SuggestCommand,
    ChangePage,
    CopyToClipboard,
}

/// Shows something when the rendered text is hovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverEvent {
    pub action: HoverAction,
    pub contents: Box<TextComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoverAction {
    ShowText,
}

impl TextComponent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Parses a section-sign coded string into a component tree.
    ///
    /// Follows the client's legacy rendering rules: a color code starts a new
    /// part and resets styling, format codes accumulate onto the current
    /// part, `§r` resets everything, and `§x§R§R§G§G§B§B` runs become a hex
    /// color. Unknown codes stay in the text verbatim. A single resulting
    /// part is returned directly; several become children of an empty root.
    pub fn from_legacy(input: &str) -> Self {
        let mut parts: Vec<TextComponent> = Vec::new();
        let mut style = LegacyStyle::default();
        let mut text = String::new();
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            if c != SECTION {
                text.push(c);
                continue;
            }
            let Some(code) = chars.next() else {
                text.push(SECTION);
                break;
            };
            match code.to_ascii_lowercase() {
                'x' => {
                    // A hex color is six (§, digit) pairs after the x.
                    let mut lookahead = chars.clone();
                    let mut hex = String::with_capacity(6);
                    for _ in 0..6 {
                        match (lookahead.next(), lookahead.next()) {
                            (Some(SECTION), Some(digit)) if digit.is_ascii_hexdigit() => {
                                hex.push(digit.to_ascii_lowercase());
                            }
                            _ => {
                                hex.clear();
                                break;
                            }
                        }
                    }
                    if hex.len() == 6 {
                        flush(&mut parts, &mut text, &style);
                        chars = lookahead;
                        style = LegacyStyle {
                            color: Some(format!("#{hex}")),
                            ..LegacyStyle::default()
                        };
                    } else {
                        text.push(SECTION);
                        text.push(code);
                    }
                }
                'r' => {
                    flush(&mut parts, &mut text, &style);
                    style = LegacyStyle::default();
                }
                code if color_name(code).is_some() => {
                    flush(&mut parts, &mut text, &style);
                    style = LegacyStyle {
                        color: color_name(code).map(str::to_string),
                        ..LegacyStyle::default()
                    };
                }
                'k' => apply_format(&mut parts, &mut text, &mut style, |s| s.obfuscated = true),
                'l' => apply_format(&mut parts, &mut text, &mut style, |s| s.bold = true),
                'm' => apply_format(&mut parts, &mut text, &mut style, |s| s.strikethrough = true),
                'n' => apply_format(&mut parts, &mut text, &mut style, |s| s.underlined = true),
                'o' => apply_format(&mut parts, &mut text, &mut style, |s| s.italic = true),
                _ => {
                    text.push(SECTION);
                    text.push(code);
                }
            }
        }
        flush(&mut parts, &mut text, &style);

        match parts.len() {
            0 => TextComponent::new(""),
            1 => parts.remove(0),
            _ => TextComponent {
                extra: parts,
                ..TextComponent::default()
            },
        }
    }

    /// Flattens the component tree to its raw text, ignoring styling.
    pub fn plain_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.extra {
            out.push_str(&child.plain_text());
        }
        out
    }
}

// Accumulated inline style while walking a legacy string.
#[derive(Debug, Clone, Default)]
struct LegacyStyle {
    color: Option<String>,
    bold: bool,
    italic: bool,
    underlined: bool,
    strikethrough: bool,
    obfuscated: bool,
}

impl LegacyStyle {
    fn into_component(self, text: String) -> TextComponent {
        TextComponent {
            text,
            color: self.color,
            bold: self.bold.then_some(true),
            italic: self.italic.then_some(true),
            underlined: self.underlined.then_some(true),
            strikethrough: self.strikethrough.then_some(true),
            obfuscated: self.obfuscated.then_some(true),
            ..TextComponent::default()
        }
    }
}

fn flush(parts: &mut Vec<TextComponent>, text: &mut String, style: &LegacyStyle) {
    if !text.is_empty() {
        parts.push(style.clone().into_component(std::mem::take(text)));
    }
}

// Format codes keep the current color; only the pending text is flushed.
fn apply_format(
    parts: &mut Vec<TextComponent>,
    text: &mut String,
    style: &mut LegacyStyle,
    set: impl FnOnce(&mut LegacyStyle),
) {
    flush(parts, text, style);
    set(style);
}

fn color_name(code: char) -> Option<&'static str> {
    Some(match code {
        '0' => "black",
        '1' => "dark_blue",
        '2' => "dark_green",
        '3' => "dark_aqua",
        '4' => "dark_red",
        '5' => "dark_purple",
        '6' => "gold",
        '7' => "gray",
        '8' => "dark_gray",
        '9' => "blue",
        'a' => "green",
        'b' => "aqua",
        'c' => "red",
        'd' => "light_purple",
        'e' => "yellow",
        'f' => "white",
        _ => return None,
    })
}
