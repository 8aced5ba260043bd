// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message parts and their normalization.
//!
//! Every logging call takes a heterogeneous list of parts. Strings become
//! [`Message::Text`]; everything else is kept as a raw [`Value`] so that hosts with an
//! interactive inspector (browser devtools) can receive the value itself. Output modes
//! without such an inspector serialize raw values with [`inspect`].

use crate::style::Style;
use std::fmt::Display;
use std::sync::LazyLock;

/// A non-string value passed to a logging call.
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Integer(i128),
    Float(f64),
    /// A regular expression, inspected in its literal `/pattern/` form.
    Pattern(regex::Regex),
    /// Structured data, inspected as JSON.
    Json(serde_json::Value),
}

impl Value {
    /// Serializes any `serde` value into a raw [`Value::Json`].
    pub fn json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Value, serde_json::Error> {
        serde_json::to_value(value).map(Value::Json)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str() == b.as_str(),
            (Value::Json(a), Value::Json(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&inspect(self, false))
    }
}

/// One argument of a logging call or one argument of a sink write.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Text(String),
    Raw(Value),
}

impl Message {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::Text(text) => Some(text),
            Message::Raw(_) => None,
        }
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Message::Text(text) => f.write_str(text),
            Message::Raw(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Message::Text(text.to_string())
    }
}

impl From<String> for Message {
    fn from(text: String) -> Self {
        Message::Text(text)
    }
}

impl From<&String> for Message {
    fn from(text: &String) -> Self {
        Message::Text(text.clone())
    }
}

impl From<Value> for Message {
    fn from(value: Value) -> Self {
        Message::Raw(value)
    }
}

impl From<serde_json::Value> for Message {
    fn from(value: serde_json::Value) -> Self {
        Message::Raw(Value::Json(value))
    }
}

impl From<regex::Regex> for Message {
    fn from(pattern: regex::Regex) -> Self {
        Message::Raw(Value::Pattern(pattern))
    }
}

impl From<bool> for Message {
    fn from(value: bool) -> Self {
        Message::Raw(Value::Bool(value))
    }
}

impl From<f32> for Message {
    fn from(value: f32) -> Self {
        Message::Raw(Value::Float(f64::from(value)))
    }
}

impl From<f64> for Message {
    fn from(value: f64) -> Self {
        Message::Raw(Value::Float(value))
    }
}

macro_rules! integer_messages {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Message {
                fn from(value: $ty) -> Self {
                    Message::Raw(Value::Integer(i128::from(value)))
                }
            }
        )*
    };
}

integer_messages!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<usize> for Message {
    fn from(value: usize) -> Self {
        // usize is at most 64 bits on supported targets
        Message::Raw(Value::Integer(value as i128))
    }
}

/// Anything that can be the argument list of a logging call.
///
/// Implemented for `()`, a single part, vectors and arrays of [`Message`], and tuples
/// of up to six parts, so calls read naturally:
///
/// ```
/// use gardens::{Garden, GardenOptions, MemorySink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let garden = Garden::new(None, GardenOptions::new().sink(sink.clone()));
/// garden.log("Hello!");
/// garden.log(("Object:", serde_json::json!({"a": true}), "Boolean:", true));
/// assert_eq!(
///     sink.drain_logs(),
///     "[log] Hello!\n[log] Object: {\"a\":true} Boolean: true\n"
/// );
/// ```
pub trait IntoMessages {
    fn into_messages(self) -> Vec<Message>;
}

impl IntoMessages for () {
    fn into_messages(self) -> Vec<Message> {
        Vec::new()
    }
}

impl IntoMessages for Vec<Message> {
    fn into_messages(self) -> Vec<Message> {
        self
    }
}

impl<const N: usize> IntoMessages for [Message; N] {
    fn into_messages(self) -> Vec<Message> {
        self.into()
    }
}

macro_rules! single_message {
    ($($ty:ty),*) => {
        $(
            impl IntoMessages for $ty {
                fn into_messages(self) -> Vec<Message> {
                    vec![Message::from(self)]
                }
            }
        )*
    };
}

single_message!(
    Message,
    &str,
    String,
    &String,
    Value,
    serde_json::Value,
    regex::Regex,
    bool,
    f32,
    f64,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    usize
);

macro_rules! tuple_messages {
    ($($name:ident),+) => {
        impl<$($name: Into<Message>),+> IntoMessages for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_messages(self) -> Vec<Message> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_messages!(A);
tuple_messages!(A, B);
tuple_messages!(A, B, C);
tuple_messages!(A, B, C, D);
tuple_messages!(A, B, C, D, E);
tuple_messages!(A, B, C, D, E, F);

static STRING_STYLE: LazyLock<Style> = LazyLock::new(|| Style::color("#40a456"));
static LITERAL_STYLE: LazyLock<Style> = LazyLock::new(|| Style::color("#ecb448"));
static PATTERN_STYLE: LazyLock<Style> = LazyLock::new(|| Style::color("#ff1212"));
static NULL_STYLE: LazyLock<Style> = LazyLock::new(|| Style::new().with_font_weight(700));

/// Serializes a raw value to text.
///
/// Booleans and numbers use their natural form, patterns their `/literal/` form. JSON
/// strings are written verbatim; objects and arrays are pretty-printed with a two-space
/// indent when they have more than four entries and written compactly otherwise.
/// With `colorize`, primitives are painted the way a terminal inspector would.
pub fn inspect(value: &Value, colorize: bool) -> String {
    let (text, style) = match value {
        Value::Bool(b) => (b.to_string(), &*LITERAL_STYLE),
        Value::Integer(n) => (n.to_string(), &*LITERAL_STYLE),
        Value::Float(n) => (format_number(*n), &*LITERAL_STYLE),
        Value::Pattern(pattern) => (format!("/{}/", pattern.as_str()), &*PATTERN_STYLE),
        Value::Json(json) => match json {
            serde_json::Value::Null => ("null".to_string(), &*NULL_STYLE),
            serde_json::Value::Bool(b) => (b.to_string(), &*LITERAL_STYLE),
            serde_json::Value::Number(n) => (n.to_string(), &*LITERAL_STYLE),
            serde_json::Value::String(s) => (s.clone(), &*STRING_STYLE),
            serde_json::Value::Array(items) => return serialize(json, items.len()),
            serde_json::Value::Object(map) => return serialize(json, map.len()),
        },
    };
    if colorize { style.paint(&text) } else { text }
}

fn serialize(json: &serde_json::Value, entries: usize) -> String {
    let serialized = if entries > 4 {
        serde_json::to_string_pretty(json)
    } else {
        serde_json::to_string(json)
    };
    // serializing a serde_json::Value cannot fail: its map keys are always strings
    serialized.unwrap_or_default()
}

/// Formats a float the way a JavaScript engine prints numbers: shortest round-trip
/// digits, exponent form at or above `1e21` and below `1e-6`.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }
    let shortest = format!("{n:e}");
    match shortest.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => shortest,
    }
}

/// Formats `n` with `precision` significant digits, following JavaScript's
/// `Number.prototype.toPrecision`. Exact ties round away from zero.
///
/// ```
/// # use gardens::to_precision;
/// assert_eq!(to_precision(333.123456789, 6), "333.123");
/// assert_eq!(to_precision(0.000123456, 3), "0.000123");
/// assert_eq!(to_precision(123456.0, 2), "1.2e+5");
/// assert_eq!(to_precision(2.5, 1), "3");
/// ```
pub fn to_precision(n: f64, precision: u32) -> String {
    if !n.is_finite() {
        return format_number(n);
    }
    let precision = precision.clamp(1, 100) as usize;
    let (digits, exponent) = significant_digits(n.abs(), precision);
    let sign = if n < 0.0 { "-" } else { "" };

    if exponent < -6 || exponent >= precision as i64 {
        let (first, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            first.to_string()
        } else {
            format!("{first}.{rest}")
        };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{sign}{mantissa}e{exponent_sign}{}", exponent.abs())
    } else if exponent >= 0 {
        let (whole, fraction) = digits.split_at(exponent as usize + 1);
        if fraction.is_empty() {
            format!("{sign}{whole}")
        } else {
            format!("{sign}{whole}.{fraction}")
        }
    } else {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    }
}

/// The first `precision` significant decimal digits of `magnitude`, rounded half up,
/// and the decimal exponent of the first digit.
fn significant_digits(magnitude: f64, precision: usize) -> (String, i64) {
    // 800 digits hold the exact decimal expansion of any f64
    let exact = format!("{magnitude:.800e}");
    let (mantissa, exponent) = exact.split_once('e').unwrap_or((&exact, "0"));
    let mut exponent: i64 = exponent.parse().unwrap_or(0);
    let mut digits: Vec<u8> = mantissa
        .bytes()
        .filter(u8::is_ascii_digit)
        .map(|b| b - b'0')
        .collect();
    let round_up = digits.get(precision).is_some_and(|&d| d >= 5);
    digits.truncate(precision);

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            digits.truncate(precision);
            exponent += 1;
        }
    }
    let text = digits.iter().map(|d| char::from(b'0' + d)).collect();
    (text, exponent)
}
