//! Multi-part interactive message assembly.
//!
//! A builder keeps the part under construction plus everything appended so
//! far. Appending starts a new part that inherits from the previous one
//! according to a [`FormatRetention`], so a colored prefix can flow through
//! a whole message while each part carries its own click and hover events.

use crate::command::CommandSender;
use crate::error::HostResult;
use crate::host::PluginHost;
use crate::text::color::colorize;
use crate::text::{ClickAction, ClickEvent, HoverAction, HoverEvent, TextComponent};

/// What a freshly appended part inherits from the part before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatRetention {
    /// Nothing carries over.
    None,
    /// Color and style flags carry over.
    #[default]
    Formatting,
    /// Click and hover events carry over.
    Events,
    /// Everything carries over.
    All,
}

/// Builder for chat messages made of several styled, clickable parts.
///
/// # Examples
/// ```
/// use plugin_toolkit::text::MessageBuilder;
///
/// let message = MessageBuilder::new("&6[Shop] ")
///     .append("&fClick to browse")
///     .on_click_run_command("/shop")
///     .on_hover_text("&7Opens the shop menu")
///     .build();
/// assert_eq!(message.extra.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    parts: Vec<TextComponent>,
    current: TextComponent,
}

impl MessageBuilder {
    /// Starts a message from legacy-coded text (colorized first).
    pub fn new(text: &str) -> Self {
        Self {
            parts: Vec::new(),
            current: TextComponent::from_legacy(&colorize(text)),
        }
    }

    /// Starts a message from an already built component.
    pub fn from_component(component: TextComponent) -> Self {
        Self {
            parts: Vec::new(),
            current: component,
        }
    }

    /// Appends legacy-coded text, carrying the previous part's formatting.
    pub fn append(self, text: &str) -> Self {
        self.append_with(text, FormatRetention::Formatting)
    }

    /// Appends legacy-coded text with an explicit retention.
    pub fn append_with(self, text: &str, retention: FormatRetention) -> Self {
        let next = TextComponent::from_legacy(&colorize(text));
        self.push_part(next, retention)
    }

    /// Appends a prebuilt component, carrying everything over by default.
    pub fn append_component(self, component: TextComponent) -> Self {
        self.push_part(component, FormatRetention::All)
    }

    /// Appends several prebuilt components in order. Every component in the
    /// slice inherits from the part that was current before the call, not
    /// from its sibling.
    ///
    /// # Panics
    /// Panics when `components` is empty; appending nothing is a bug at the
    /// call site.
    pub fn append_components(mut self, components: &[TextComponent]) -> Self {
        assert!(
            !components.is_empty(),
            "cannot append an empty set of components"
        );
        let previous = self.current.clone();
        for component in components {
            let mut next = component.clone();
            inherit(&mut next, &previous, FormatRetention::All);
            self.parts.push(std::mem::replace(&mut self.current, next));
        }
        self
    }

    /// Attaches a run-command click to the current part.
    pub fn on_click_run_command(self, command: &str) -> Self {
        self.on_click(ClickAction::RunCommand, command)
    }

    /// Attaches a suggest-command click (fills the sender's chat bar).
    pub fn on_click_suggest_command(self, command: &str) -> Self {
        self.on_click(ClickAction::SuggestCommand, command)
    }

    /// Attaches an arbitrary click event to the current part.
    pub fn on_click(mut self, action: ClickAction, value: &str) -> Self {
        self.current.click_event = Some(ClickEvent {
            action,
            value: colorize(value),
        });
        self
    }

    /// Attaches hover text (legacy-coded) to the current part.
    pub fn on_hover_text(self, text: &str) -> Self {
        self.on_hover(
            HoverAction::ShowText,
            TextComponent::from_legacy(&colorize(text)),
        )
    }

    /// Attaches an arbitrary hover event to the current part.
    pub fn on_hover(mut self, action: HoverAction, contents: TextComponent) -> Self {
        self.current.hover_event = Some(HoverEvent {
            action,
            contents: Box::new(contents),
        });
        self
    }

    /// Drops whatever the current part holds outside the given retention.
    pub fn retain(mut self, retention: FormatRetention) -> Self {
        if matches!(retention, FormatRetention::None | FormatRetention::Events) {
            self.current.color = None;
            self.current.bold = None;
            self.current.italic = None;
            self.current.underlined = None;
            self.current.strikethrough = None;
            self.current.obfuscated = None;
        }
        if matches!(retention, FormatRetention::None | FormatRetention::Formatting) {
            self.current.click_event = None;
            self.current.hover_event = None;
        }
        self
    }

    /// Finishes the message: every appended part plus the current one, in
    /// order. A single part is returned as-is, several become children of an
    /// empty root.
    pub fn build(&self) -> TextComponent {
        if self.parts.is_empty() {
            return self.current.clone();
        }
        let mut extra = self.parts.clone();
        extra.push(self.current.clone());
        TextComponent {
            extra,
            ..TextComponent::default()
        }
    }

    /// Builds the message and delivers it to each target in turn.
    pub async fn send(&self, host: &dyn PluginHost, targets: &[CommandSender]) -> HostResult<()> {
        let component = self.build();
        for target in targets {
            host.send_chat(target, &component).await?;
        }
        Ok(())
    }

    fn push_part(mut self, mut next: TextComponent, retention: FormatRetention) -> Self {
        inherit(&mut next, &self.current, retention);
        self.parts.push(std::mem::replace(&mut self.current, next));
        self
    }
}

/// Copies fields `next` left unset from `prev`, per the retention. Fields
/// the new part already carries always win.
fn inherit(next: &mut TextComponent, prev: &TextComponent, retention: FormatRetention) {
    if matches!(retention, FormatRetention::Formatting | FormatRetention::All) {
        if next.color.is_none() {
            next.color = prev.color.clone();
        }
        if next.bold.is_none() {
            next.bold = prev.bold;
        }
        if next.italic.is_none() {
            next.italic = prev.italic;
        }
        if next.underlined.is_none() {
            next.underlined = prev.underlined;
        }
        if next.strikethrough.is_none() {
            next.strikethrough = prev.strikethrough;
        }
        if next.obfuscated.is_none() {
            next.obfuscated = prev.obfuscated;
        }
    }
    if matches!(retention, FormatRetention::Events | FormatRetention::All) {
        if next.click_event.is_none() {
            next.click_event = prev.click_event.clone();
        }
        if next.hover_event.is_none() {
            next.hover_event = prev.hover_event.clone();
        }
    }
}
