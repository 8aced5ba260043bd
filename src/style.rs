// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abstract style descriptions and their concrete renderings.
//!
//! A [`Style`] is a CSS-like description (color, background, weight, italics,
//! decoration, plus any other property). It turns into a CSS declaration list for
//! browser consoles and HTML, or into ANSI escapes for terminals. Properties without an
//! ANSI equivalent are simply dropped on terminals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A CSS-like style descriptor.
///
/// Known properties have typed fields; anything else goes into `extra` and is passed
/// through verbatim to the CSS-producing output modes, with camelCase keys written
/// kebab-case.
///
/// ```
/// use gardens::Style;
///
/// let style = Style::color("#a0bef2").with_font_weight(700).with("borderRadius", "3px");
/// assert_eq!(
///     style.to_css(),
///     "color: #a0bef2; font-weight: 700; border-radius: 3px"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// A style with only a foreground color.
    pub fn color(color: impl Into<String>) -> Self {
        Style {
            color: Some(color.into()),
            ..Style::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_font_weight(mut self, weight: u16) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn with_font_style(mut self, font_style: impl Into<String>) -> Self {
        self.font_style = Some(font_style.into());
        self
    }

    pub fn with_text_decoration(mut self, decoration: impl Into<String>) -> Self {
        self.text_decoration = Some(decoration.into());
        self
    }

    /// Sets an arbitrary CSS-like property.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(property.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Style::default()
    }

    /// Shallow merge: every property set on `update` overrides the one on `self`,
    /// properties `update` leaves unset are kept.
    pub fn merge(&mut self, update: &Style) {
        if let Some(color) = &update.color {
            self.color = Some(color.clone());
        }
        if let Some(color) = &update.background_color {
            self.background_color = Some(color.clone());
        }
        if let Some(weight) = update.font_weight {
            self.font_weight = Some(weight);
        }
        if let Some(font_style) = &update.font_style {
            self.font_style = Some(font_style.clone());
        }
        if let Some(decoration) = &update.text_decoration {
            self.text_decoration = Some(decoration.clone());
        }
        for (key, value) in &update.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }

    /// The declaration list used by the console and HTML output modes.
    pub fn to_css(&self) -> String {
        let mut declarations = Vec::new();
        if let Some(color) = &self.color {
            declarations.push(format!("color: {color}"));
        }
        if let Some(color) = &self.background_color {
            declarations.push(format!("background-color: {color}"));
        }
        if let Some(weight) = self.font_weight {
            declarations.push(format!("font-weight: {weight}"));
        }
        if let Some(font_style) = &self.font_style {
            declarations.push(format!("font-style: {font_style}"));
        }
        if let Some(decoration) = &self.text_decoration {
            declarations.push(format!("text-decoration: {decoration}"));
        }
        for (key, value) in &self.extra {
            declarations.push(format!("{}: {value}", kebab_case(key)));
        }
        declarations.join("; ")
    }

    /// The terminal rendering of this style. Colors must be `#rgb` or `#rrggbb`.
    pub fn to_ansi(&self) -> anstyle::Style {
        let mut style = anstyle::Style::new()
            .fg_color(self.color.as_deref().and_then(hex_color))
            .bg_color(self.background_color.as_deref().and_then(hex_color));
        if self.font_weight.is_some_and(|weight| weight > 400) {
            style = style.bold();
        }
        if self.font_style.as_deref() == Some("italic") {
            style = style.italic();
        }
        match self.text_decoration.as_deref() {
            Some("underline") => style = style.underline(),
            Some("line-through") => style = style.strikethrough(),
            _ => {}
        }
        style
    }

    /// Wraps `text` in this style's escape sequences.
    pub fn paint(&self, text: &str) -> String {
        let style = self.to_ansi();
        format!("{}{}{}", style.render(), text, style.render_reset())
    }
}

fn kebab_case(property: &str) -> String {
    let mut out = String::with_capacity(property.len() + 4);
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn hex_color(color: &str) -> Option<anstyle::Color> {
    let hex = color.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let (r, g, b) = match hex.len() {
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            (short(0)?, short(1)?, short(2)?)
        }
        _ => return None,
    };
    Some(anstyle::RgbColor(r, g, b).into())
}

/// Deterministic scope color derived from the scope name.
///
/// Each channel stays within `50..225` so the color is readable on both light and
/// dark backgrounds. The same name always yields the same color.
pub fn colorize(scope: &str) -> String {
    let (mut r, mut g, mut b) = (50u64, 50u64, 50u64);
    for unit in scope.encode_utf16() {
        r = r * pow_mod(u64::from(unit), 12, 175) % 175 + 50;
        (b, r, g) = (r, g, b);
    }
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn pow_mod(mut base: u64, mut exponent: u32, modulus: u64) -> u64 {
    let mut result = 1;
    base %= modulus;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * base % modulus;
        }
        base = base * base % modulus;
        exponent >>= 1;
    }
    result
}
