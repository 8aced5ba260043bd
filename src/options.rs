// SPDX-License-Identifier: MIT OR Apache-2.0

//! Options accepted by [`Garden::new`](crate::Garden::new),
//! [`Garden::create_scope_with`](crate::Garden::create_scope_with) and
//! [`Garden::configure`](crate::Garden::configure).
//!
//! Every field is optional; an absent field leaves the inherited value alone. That
//! includes the flags: `verbose: None` means "unchanged", not `false`.

use crate::error::{ErrorKind, GardenError, LoggedError};
use crate::render::OutputMode;
use crate::sink::Sink;
use crate::style::Style;
use std::sync::Arc;

/// Largest precision [`to_precision`](crate::to_precision) accepts.
const MAX_TIMING_PRECISION: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct GardenOptions {
    pub sink: Option<Arc<dyn Sink>>,
    pub output_mode: Option<OutputMode>,
    /// Significant digits for elapsed times. `0` turns precision formatting off;
    /// values above 100 are ignored.
    pub timing_precision: Option<u32>,
    /// Merged into the scope's style.
    pub scope_style: Option<Style>,
    pub verbose: Option<bool>,
    pub display_date: Option<bool>,
    pub display_time: Option<bool>,
}

impl GardenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes to `sink`. Unless [`output_mode`](Self::output_mode) is set as well, this
    /// also switches the scope to [`OutputMode::Text`], the only mode every sink can
    /// take.
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = Some(mode);
        self
    }

    pub fn timing_precision(mut self, precision: u32) -> Self {
        self.timing_precision = Some(precision);
        self
    }

    pub fn scope_style(mut self, style: Style) -> Self {
        self.scope_style = Some(style);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn display_date(mut self, display: bool) -> Self {
        self.display_date = Some(display);
        self
    }

    pub fn display_time(mut self, display: bool) -> Self {
        self.display_time = Some(display);
        self
    }

    /// Reads options from loosely typed JSON, as handed over by a dynamic host.
    ///
    /// * Unknown keys are ignored.
    /// * `outputMode` (or the older `outputType`) must name a mode.
    /// * `sink` (or `stream`) cannot be expressed in JSON and is rejected.
    /// * `timingPrecision` is used only if it is a number or numeric string.
    /// * `verbose`, `displayDate`, `displayTime` follow JavaScript truthiness.
    /// * `scopeStyle` must be an object of style properties.
    ///
    /// ```
    /// use gardens::{GardenOptions, OutputMode};
    /// use serde_json::json;
    ///
    /// let options = GardenOptions::from_json(&json!({
    ///     "outputMode": "html",
    ///     "verbose": 1,
    ///     "timingPrecision": "three",
    ///     "somethingNew": true,
    /// }))
    /// .unwrap();
    /// assert_eq!(options.output_mode, Some(OutputMode::Html));
    /// assert_eq!(options.verbose, Some(true));
    /// assert_eq!(options.timing_precision, None);
    ///
    /// assert!(GardenOptions::from_json(&json!({"outputMode": "bogus"})).is_err());
    /// ```
    pub fn from_json(update: &serde_json::Value) -> Result<Self, GardenError> {
        let Some(map) = update.as_object() else {
            return Err(invalid("options must be an object"));
        };
        let mut options = GardenOptions::new();

        if map.contains_key("sink") || map.contains_key("stream") {
            return Err(invalid(
                "sink must expose a write operation; configure it programmatically",
            ));
        }

        if let Some(mode) = map.get("outputMode").or_else(|| map.get("outputType")) {
            let Some(name) = mode.as_str() else {
                return Err(invalid("Invalid output type!"));
            };
            options.output_mode = Some(name.parse()?);
        }

        if let Some(precision) = map.get("timingPrecision") {
            options.timing_precision = parse_precision(precision);
        }

        if let Some(style) = map.get("scopeStyle") {
            let style: Style = serde_json::from_value(style.clone())
                .map_err(|e| invalid(&format!("scopeStyle is not a style object: {e}")))?;
            options.scope_style = Some(style);
        }

        options.verbose = map.get("verbose").map(truthy);
        options.display_date = map.get("displayDate").map(truthy);
        options.display_time = map.get("displayTime").map(truthy);
        Ok(options)
    }

    /// The precision to store, or `None` when the requested value must be ignored.
    pub(crate) fn accepted_precision(precision: u32) -> Option<Option<u32>> {
        match precision {
            0 => Some(None),
            p if p <= MAX_TIMING_PRECISION => Some(Some(p)),
            _ => None,
        }
    }
}

fn invalid(message: &str) -> GardenError {
    GardenError::InvalidArgument(LoggedError::new(ErrorKind::TypeError, message))
}

fn parse_precision(value: &serde_json::Value) -> Option<u32> {
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if number.is_finite() && number >= 0.0 {
        Some(number.trunc() as u32)
    } else {
        None
    }
}

fn truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
