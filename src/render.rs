// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output modes: how fragments are styled and joined into a sink write.
//!
//! Each [`OutputMode`] is backed by a [`Renderer`] with two steps:
//!
//! 1. [`Renderer::style_fragment`] turns a piece of text and an optional [`Style`] into a
//!    [`Fragment`] (escape-wrapped text, text plus a CSS declaration list, or plain text).
//! 2. [`Renderer::join_fragments`] assembles the fragments of one call into the
//!    arguments of a single [`Sink::write`](crate::Sink::write).
//!
//! Adding a mode means adding one renderer.

use crate::error::{ErrorKind, GardenError, LoggedError};
use crate::message::{Message, Value, inspect};
use crate::style::Style;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::sync::LazyLock;

/// The rendering convention of a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Terminal text with ANSI escapes.
    Ansi,
    /// A browser-like console taking `%c` format directives and raw values.
    Console,
    /// HTML markup, one `<span>` per fragment.
    Html,
    /// Plain text.
    Text,
}

impl OutputMode {
    pub fn renderer(self) -> &'static dyn Renderer {
        match self {
            OutputMode::Ansi => &AnsiRenderer,
            OutputMode::Console => &ConsoleRenderer,
            OutputMode::Html => &HtmlRenderer,
            OutputMode::Text => &TextRenderer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OutputMode::Ansi => "ansi",
            OutputMode::Console => "console",
            OutputMode::Html => "html",
            OutputMode::Text => "text",
        }
    }
}

impl Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputMode {
    type Err = GardenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ansi" => Ok(OutputMode::Ansi),
            "console" => Ok(OutputMode::Console),
            "html" => Ok(OutputMode::Html),
            "text" => Ok(OutputMode::Text),
            other => Err(GardenError::InvalidArgument(LoggedError::new(
                ErrorKind::TypeError,
                format!("Invalid output type '{other}'!"),
            ))),
        }
    }
}

/// One unit of output before assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Text, with the CSS for it when the mode styles through format directives.
    Text { text: String, format: Option<String> },
    /// A value kept as-is until assembly.
    Raw(Value),
}

impl Fragment {
    pub fn plain(text: impl Into<String>) -> Self {
        Fragment::Text {
            text: text.into(),
            format: None,
        }
    }
}

/// Styling and assembly strategy for one [`OutputMode`].
pub trait Renderer: Sync {
    /// Styles one piece of text. `supports_color` is the host capability from the
    /// [`Environment`](crate::Environment).
    fn style_fragment(&self, text: &str, style: Option<&Style>, supports_color: bool)
    -> Fragment;

    /// Assembles the fragments of one call into sink-write arguments.
    fn join_fragments(&self, fragments: Vec<Fragment>, supports_color: bool) -> Vec<Message>;
}

fn css_fragment(text: &str, style: Option<&Style>) -> Fragment {
    Fragment::Text {
        text: text.to_string(),
        format: Some(style.map(Style::to_css).unwrap_or_default()),
    }
}

/// Terminal output: escapes are baked into the text.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiRenderer;

impl Renderer for AnsiRenderer {
    fn style_fragment(
        &self,
        text: &str,
        style: Option<&Style>,
        supports_color: bool,
    ) -> Fragment {
        match style {
            Some(style) if supports_color => Fragment::plain(style.paint(text)),
            _ => Fragment::plain(text),
        }
    }

    fn join_fragments(&self, fragments: Vec<Fragment>, supports_color: bool) -> Vec<Message> {
        vec![Message::Text(concatenate(fragments, supports_color))]
    }
}

/// Plain text: styles are discarded.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn style_fragment(&self, text: &str, _style: Option<&Style>, _supports_color: bool) -> Fragment {
        Fragment::plain(text)
    }

    fn join_fragments(&self, fragments: Vec<Fragment>, _supports_color: bool) -> Vec<Message> {
        vec![Message::Text(concatenate(fragments, false))]
    }
}

fn concatenate(fragments: Vec<Fragment>, colorize: bool) -> String {
    let mut line = String::new();
    for fragment in fragments {
        match fragment {
            Fragment::Text { text, .. } => line.push_str(&text),
            Fragment::Raw(value) => {
                line.push(' ');
                line.push_str(&inspect(&value, colorize));
            }
        }
    }
    line.push('\n');
    line
}

/// Browser-like consoles: one string with `%c` directives, then the CSS strings, then
/// raw values.
///
/// Raw values are passed through so the console can render them interactively. Format
/// directives are consumed positionally, so once a raw value has been emitted every
/// later fragment, text included, is passed as a separate argument too.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn style_fragment(
        &self,
        text: &str,
        style: Option<&Style>,
        supports_color: bool,
    ) -> Fragment {
        if supports_color {
            css_fragment(text, style)
        } else {
            Fragment::plain(text)
        }
    }

    fn join_fragments(&self, fragments: Vec<Fragment>, _supports_color: bool) -> Vec<Message> {
        let mut text = String::new();
        let mut formats = Vec::new();
        let mut raw = Vec::new();
        let mut all_raw = false;

        for fragment in fragments {
            match fragment {
                Fragment::Raw(value) => {
                    raw.push(Message::Raw(value));
                    all_raw = true;
                }
                Fragment::Text { text: part, .. } if all_raw => raw.push(Message::Text(part)),
                Fragment::Text {
                    text: part,
                    format: Some(format),
                } => {
                    text.push_str("%c");
                    text.push_str(&part);
                    formats.push(Message::Text(format));
                }
                Fragment::Text {
                    text: part,
                    format: None,
                } => text.push_str(&part),
            }
        }

        let mut args = Vec::with_capacity(1 + formats.len() + raw.len());
        args.push(Message::Text(text));
        args.extend(formats);
        args.extend(raw);
        args
    }
}

static SPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(" {2,}").expect("space-run pattern is valid"));

/// HTML markup for embedding in a page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn style_fragment(&self, text: &str, style: Option<&Style>, _supports_color: bool) -> Fragment {
        css_fragment(text, style)
    }

    fn join_fragments(&self, fragments: Vec<Fragment>, _supports_color: bool) -> Vec<Message> {
        let mut markup = String::new();
        for fragment in fragments {
            let (text, format) = match fragment {
                Fragment::Text { text, format } => (text, format),
                Fragment::Raw(value) => (format!(" {}", inspect(&value, false)), None),
            };
            markup.push_str("<span");
            if let Some(format) = format.filter(|f| !f.is_empty()) {
                markup.push_str(" style=\"");
                markup.push_str(&escape_html(&format));
                markup.push('"');
            }
            markup.push('>');
            let escaped = escape_html(&text);
            let spaced = SPACE_RUN.replace_all(&escaped, |run: &regex::Captures<'_>| {
                "&nbsp;".repeat(run[0].len())
            });
            markup.push_str(&spaced.replace('\n', "<br />"));
            markup.push_str("</span>");
        }
        markup.push_str("<br />");
        vec![Message::Text(markup)]
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
