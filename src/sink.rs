// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output destinations.
//!
//! Every [`Garden`](crate::Garden) writes to a [`Sink`]. The arguments of one write
//! depend on the output mode: one newline-terminated string for `ansi`/`text`, one
//! markup string for `html`, and for `console` a string with `%c` directives followed
//! by the CSS strings and any raw values.

use crate::message::{Message, inspect};
use std::fmt::Debug;

pub trait Sink: Debug + Send + Sync {
    /**
    Writes one call's worth of output.

    Implementations should not buffer indefinitely; callers expect the output to
    appear in call order.
    */
    fn write(&self, args: &[Message]);
}

/// Writes to standard output.
///
/// Text arguments are written verbatim, raw values are inspected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StdoutSink;

impl StdoutSink {
    pub const fn new() -> Self {
        StdoutSink
    }
}

impl Sink for StdoutSink {
    fn write(&self, args: &[Message]) {
        use std::io::Write;
        let mut lock = std::io::stdout().lock();
        for arg in args {
            let result = match arg {
                Message::Text(text) => lock.write_all(text.as_bytes()),
                Message::Raw(value) => lock.write_all(inspect(value, false).as_bytes()),
            };
            //a closed stdout is not something a logger can report anywhere
            if result.is_err() {
                return;
            }
        }
        let _ = lock.flush();
    }
}

/// Bridges to a console.
///
/// In the browser this is `console.log`, which understands `%c` directives and renders
/// raw values interactively. Natively the write is rendered as a console would
/// ([`render_console_args`]) and printed as a line on standard output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub const fn new() -> Self {
        ConsoleSink
    }
}

impl Sink for ConsoleSink {
    fn write(&self, args: &[Message]) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            println!("{}", render_console_args(args));
        }
        #[cfg(target_arch = "wasm32")]
        {
            let array = js_sys::Array::new();
            for arg in args {
                array.push(&to_js(arg));
            }
            web_sys::console::log(&array);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn to_js(arg: &Message) -> wasm_bindgen::JsValue {
    use crate::message::Value;
    use wasm_bindgen::JsValue;
    match arg {
        Message::Text(text) => JsValue::from_str(text),
        Message::Raw(Value::Bool(b)) => JsValue::from_bool(*b),
        Message::Raw(Value::Integer(n)) => JsValue::from_f64(*n as f64),
        Message::Raw(Value::Float(n)) => JsValue::from_f64(*n),
        Message::Raw(Value::Pattern(pattern)) => js_sys::RegExp::new(pattern.as_str(), "").into(),
        Message::Raw(Value::Json(json)) => serde_json::to_string(json)
            .ok()
            .and_then(|s| js_sys::JSON::parse(&s).ok())
            .unwrap_or(JsValue::NULL),
    }
}

/// Renders console-style arguments to a single line.
///
/// `%c` directives in the first argument each consume one following argument (the CSS,
/// which is dropped). Remaining arguments are appended, separated by spaces.
///
/// ```
/// use gardens::{Message, sink::render_console_args};
///
/// let args = [
///     Message::from("%c[log]%c hi"),
///     Message::from("color: #5b5b5b"),
///     Message::from(""),
///     Message::from(true),
/// ];
/// assert_eq!(render_console_args(&args), "[log] hi true");
/// ```
pub fn render_console_args(args: &[Message]) -> String {
    let Some((first, rest)) = args.split_first() else {
        return String::new();
    };
    let mut rest = rest.iter();
    let mut line = match first {
        Message::Text(text) => {
            let directives = text.matches("%c").count();
            for _ in 0..directives {
                rest.next();
            }
            text.replace("%c", "")
        }
        Message::Raw(value) => inspect(value, false),
    };
    for arg in rest {
        line.push(' ');
        match arg {
            Message::Text(text) => line.push_str(text),
            Message::Raw(value) => line.push_str(&inspect(value, false)),
        }
    }
    line
}
