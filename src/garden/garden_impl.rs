// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core Garden implementation.

use crate::environment::{self, Environment};
use crate::error::{Catchable, ErrorKind, GardenError, LoggedError};
use crate::key::Key;
use crate::level::{DEFAULT_TAG_COLOR, Level, TIMESTAMP_COLOR};
use crate::manager::Manager;
use crate::message::{IntoMessages, Message, format_number, to_precision};
use crate::options::GardenOptions;
use crate::render::{Fragment, OutputMode, Renderer};
use crate::sink::Sink;
use crate::style::{Style, colorize};
use crate::sys::{self, Duration, Instant};
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::tracker::Tracker;

/// Effective configuration of one garden.
///
/// Copied from the parent when a child is created; later changes to the parent are not
/// seen by existing children.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub(crate) sink: Arc<dyn Sink>,
    pub(crate) output_mode: OutputMode,
    pub(crate) scope_style: Style,
    pub(crate) verbose: bool,
    pub(crate) display_date: bool,
    pub(crate) display_time: bool,
    pub(crate) timing_precision: Option<u32>,
}

fn named(name: Option<&str>) -> Option<&str> {
    name.filter(|name| !name.is_empty())
}

fn style_for(name: Option<&str>) -> Style {
    Style {
        color: named(name).map(colorize),
        ..Style::default()
    }
}

impl Config {
    fn root(name: Option<&str>, env: &Environment) -> Config {
        Config {
            sink: env.default_sink.clone(),
            output_mode: env.default_output_mode,
            scope_style: style_for(name),
            verbose: named(name).is_some_and(|name| env.debug_enabled(name)),
            display_date: false,
            display_time: false,
            timing_precision: env.timing_precision,
        }
    }

    fn inherit(parent: &Config, name: Option<&str>, env: &Environment) -> Config {
        Config {
            sink: parent.sink.clone(),
            output_mode: parent.output_mode,
            scope_style: style_for(name),
            verbose: parent.verbose || named(name).is_some_and(|name| env.debug_enabled(name)),
            display_date: parent.display_date,
            display_time: parent.display_time,
            timing_precision: parent.timing_precision,
        }
    }

    fn apply(&mut self, options: GardenOptions) {
        if let Some(sink) = options.sink {
            self.sink = sink;
            if options.output_mode.is_none() {
                self.output_mode = OutputMode::Text;
            }
        }
        if let Some(mode) = options.output_mode {
            self.output_mode = mode;
        }
        if let Some(accepted) = options
            .timing_precision
            .and_then(GardenOptions::accepted_precision)
        {
            self.timing_precision = accepted;
        }
        if let Some(style) = &options.scope_style {
            self.scope_style.merge(style);
        }
        if let Some(verbose) = options.verbose {
            self.verbose = verbose;
        }
        if let Some(display) = options.display_date {
            self.display_date = display;
        }
        if let Some(display) = options.display_time {
            self.display_time = display;
        }
    }
}

#[derive(Debug)]
pub(crate) struct GardenInner {
    pub(crate) name: Option<String>,
    pub(crate) parent: Option<Garden>,
    pub(crate) config: Mutex<Config>,
    pub(crate) tracker: Mutex<Tracker>,
    /// Whether the missing-clock warning was already printed.
    clock_warned: AtomicBool,
}

/// A logging scope.
///
/// A `Garden` prints lines prefixed by the names of itself and its named ancestors,
/// root first, followed by a tag for the kind of line:
///
/// ```text
/// [app][network][warning] retrying
/// ```
///
/// Gardens are cheap to clone (Arc-based) and clones are the same scope: they share
/// configuration, timers and counters.
///
/// # Scopes
///
/// ```rust
/// use gardens::{Garden, GardenOptions, MemorySink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let app = Garden::new(Some("app"), GardenOptions::new().sink(sink.clone()));
/// let network = app.create_scope("network");
///
/// network.warn("retrying");
/// assert_eq!(sink.drain_logs(), "[app][network][warning] retrying\n");
/// ```
///
/// # Configuration inheritance
///
/// A child starts with a copy of its parent's configuration (sink, output mode,
/// verbosity, date/time display, timing precision); its scope color is derived from its
/// own name. Options passed at creation override the copy. Reconfiguring the parent
/// afterwards does not reach existing children.
///
/// ```rust
/// use gardens::{Garden, GardenOptions, MemorySink};
/// use std::sync::Arc;
///
/// let sink = Arc::new(MemorySink::new());
/// let root = Garden::new(None, GardenOptions::new().sink(sink.clone()));
/// let child = root.create_scope("child");
///
/// root.configure(GardenOptions::new().verbose(true));
/// assert!(root.debug("shown"));
/// assert!(!child.debug("hidden"));
/// ```
#[derive(Debug, Clone)]
pub struct Garden {
    pub(crate) inner: Arc<GardenInner>,
}

impl PartialEq for Garden {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Garden {}

impl Hash for Garden {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.inner).hash(state);
    }
}

impl Display for Garden {
    /// The plain-text scope prefix, e.g. `[app][network]`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(parent) = &self.inner.parent {
            write!(f, "{parent}")?;
        }
        if let Some(name) = named(self.inner.name.as_deref()) {
            write!(f, "[{name}]")?;
        }
        Ok(())
    }
}

impl Garden {
    /// Creates a root garden configured from the current [`Environment`].
    ///
    /// `None` (or an empty name) creates an unnamed scope, which adds nothing to the
    /// prefix.
    pub fn new(name: Option<&str>, options: GardenOptions) -> Garden {
        Self::build(name, None, options)
    }

    fn build(name: Option<&str>, parent: Option<Garden>, options: GardenOptions) -> Garden {
        let env = environment::environment();
        let mut config = match &parent {
            Some(parent) => Config::inherit(&parent.lock_config(), name, &env),
            None => Config::root(name, &env),
        };
        config.apply(options);
        Garden {
            inner: Arc::new(GardenInner {
                name: name.map(str::to_string),
                parent,
                config: Mutex::new(config),
                tracker: Mutex::new(Tracker::default()),
                clock_warned: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a child scope.
    pub fn create_scope(&self, name: &str) -> Garden {
        Self::build(Some(name), Some(self.clone()), GardenOptions::new())
    }

    /// Creates a child scope with options; `None` creates an unnamed child.
    pub fn create_scope_with(&self, name: Option<&str>, options: GardenOptions) -> Garden {
        Self::build(name, Some(self.clone()), options)
    }

    /// Creates a [`Manager`] rooted at a new child scope.
    pub fn create_manager(&self, name: &str, options: GardenOptions) -> Manager {
        Manager::new(self.create_scope_with(Some(name), options))
    }

    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    pub fn parent(&self) -> Option<&Garden> {
        self.inner.parent.as_ref()
    }

    /// The root has a nesting level of 0, its children 1, and so on.
    pub fn nesting_level(&self) -> usize {
        let mut level = 0;
        let mut current = self;
        while let Some(parent) = &current.inner.parent {
            level += 1;
            current = parent;
        }
        level
    }

    pub(crate) fn lock_config(&self) -> MutexGuard<'_, Config> {
        self.inner
            .config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_tracker(&self) -> MutexGuard<'_, Tracker> {
        self.inner
            .tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn output_mode(&self) -> OutputMode {
        self.lock_config().output_mode
    }

    pub fn is_verbose(&self) -> bool {
        self.lock_config().verbose
    }

    pub fn scope_style(&self) -> Style {
        self.lock_config().scope_style.clone()
    }

    pub fn timing_precision(&self) -> Option<u32> {
        self.lock_config().timing_precision
    }

    pub fn sink(&self) -> Arc<dyn Sink> {
        self.lock_config().sink.clone()
    }

    /// Updates this scope's configuration in place and returns it for chaining.
    ///
    /// See [`GardenOptions`] for the rules; fields left `None` are unchanged. Existing
    /// children are not affected.
    pub fn configure(&self, options: GardenOptions) -> &Self {
        self.lock_config().apply(options);
        self
    }

    /// Like [`configure`](Self::configure), for loosely typed options
    /// ([`GardenOptions::from_json`]).
    ///
    /// Invalid options are reported through this scope as a `[type error]` line and
    /// returned; the configuration is left untouched.
    pub fn configure_json(&self, update: &serde_json::Value) -> Result<&Self, GardenError> {
        match GardenOptions::from_json(update) {
            Ok(options) => Ok(self.configure(options)),
            Err(error) => {
                let logged = error.logged();
                self.report(Level::TypeError, logged, logged.message(), Vec::new());
                Err(error)
            }
        }
    }

    pub fn log(&self, messages: impl IntoMessages) {
        self.emit(Level::Log, messages.into_messages());
    }

    pub fn info(&self, messages: impl IntoMessages) {
        self.emit(Level::Info, messages.into_messages());
    }

    pub fn success(&self, messages: impl IntoMessages) {
        self.emit(Level::Success, messages.into_messages());
    }

    pub fn warning(&self, messages: impl IntoMessages) {
        self.emit(Level::Warning, messages.into_messages());
    }

    /// Alias of [`warning`](Self::warning).
    pub fn warn(&self, messages: impl IntoMessages) {
        self.warning(messages);
    }

    pub fn failure(&self, messages: impl IntoMessages) {
        self.emit(Level::Failure, messages.into_messages());
    }

    /// Alias of [`failure`](Self::failure).
    pub fn fail(&self, messages: impl IntoMessages) {
        self.failure(messages);
    }

    /// Prints only when the scope is verbose. Returns whether anything was printed.
    pub fn debug(&self, messages: impl IntoMessages) -> bool {
        if !self.prints(Level::Debug) {
            return false;
        }
        self.emit(Level::Debug, messages.into_messages());
        true
    }

    /// Like [`debug`](Self::debug), with a backtrace of the call site.
    pub fn trace(&self, message: &str, messages: impl IntoMessages) -> bool {
        if !self.prints(Level::Trace) {
            return false;
        }
        let stack = LoggedError::with_forced_stack(ErrorKind::Error, message);
        self.report(Level::Trace, &stack, message, messages.into_messages());
        true
    }

    /// Builds an `Error`, prints it and returns it. Whether to propagate it is up to
    /// the caller.
    ///
    /// ```rust
    /// # use gardens::{Garden, GardenOptions, MemorySink, ErrorKind};
    /// # use std::sync::Arc;
    /// # let sink = Arc::new(MemorySink::new());
    /// # let garden = Garden::new(None, GardenOptions::new().sink(sink.clone()));
    /// fn load(garden: &Garden) -> Result<(), gardens::LoggedError> {
    ///     Err(garden.error("config missing", ()))
    /// }
    /// let error = load(&garden).unwrap_err();
    /// assert_eq!(error.kind(), ErrorKind::Error);
    /// assert!(sink.drain_logs().starts_with("[error] config missing"));
    /// ```
    pub fn error(&self, message: &str, messages: impl IntoMessages) -> LoggedError {
        self.raise(ErrorKind::Error, Level::Error, message, "", messages)
    }

    pub fn type_error(&self, message: &str, messages: impl IntoMessages) -> LoggedError {
        self.raise(ErrorKind::TypeError, Level::TypeError, message, "", messages)
    }

    pub fn reference_error(&self, message: &str, messages: impl IntoMessages) -> LoggedError {
        self.raise(
            ErrorKind::ReferenceError,
            Level::ReferenceError,
            message,
            "",
            messages,
        )
    }

    pub fn assertion_error(&self, message: &str, messages: impl IntoMessages) -> LoggedError {
        self.raise(
            ErrorKind::AssertionError,
            Level::AssertionError,
            message,
            "Assert failed! ",
            messages,
        )
    }

    fn raise(
        &self,
        kind: ErrorKind,
        level: Level,
        message: &str,
        prefix: &str,
        messages: impl IntoMessages,
    ) -> LoggedError {
        let error = LoggedError::with_forced_stack(kind, message);
        self.report(
            level,
            &error,
            &format!("{prefix}{message}"),
            messages.into_messages(),
        );
        error
    }

    /// Normalizes anything error-like into a [`LoggedError`], printing it when the
    /// scope is verbose. Never fails.
    ///
    /// ```rust
    /// # use gardens::{Garden, GardenOptions, MemorySink, ErrorKind};
    /// # use std::sync::Arc;
    /// # let sink = Arc::new(MemorySink::new());
    /// # let garden = Garden::new(None, GardenOptions::new().sink(sink.clone()));
    /// let error = garden.catch("This should create an error", ());
    /// assert_eq!(error.kind(), ErrorKind::Error);
    /// assert_eq!(error.message(), "This should create an error");
    /// // not verbose, so nothing was printed
    /// assert!(sink.is_empty());
    /// ```
    pub fn catch(&self, error: impl Catchable, messages: impl IntoMessages) -> LoggedError {
        let error = error.into_logged_error();
        if self.prints(Level::CaughtError) {
            self.report(
                Level::CaughtError,
                &error,
                &error.to_string(),
                messages.into_messages(),
            );
        }
        error
    }

    fn report(&self, level: Level, error: &LoggedError, text: &str, mut messages: Vec<Message>) {
        messages.insert(0, Message::Text(error.body(text)));
        self.emit(level, messages);
    }

    /// Fails when `value` is false.
    pub fn assert(&self, value: bool, messages: impl IntoMessages) -> Result<(), GardenError> {
        if value {
            return Ok(());
        }
        Err(self.assertion_failure(&format!("{value} is not truthy!"), messages))
    }

    /// Fails when `a != b`.
    pub fn assert_eq<A, B>(&self, a: A, b: B, messages: impl IntoMessages) -> Result<(), GardenError>
    where
        A: PartialEq<B> + Debug,
        B: Debug,
    {
        if a == b {
            return Ok(());
        }
        Err(self.assertion_failure(&format!("{a:?} is not equal to {b:?}!"), messages))
    }

    /// Fails when `value` is true.
    pub fn deny(&self, value: bool, messages: impl IntoMessages) -> Result<(), GardenError> {
        if !value {
            return Ok(());
        }
        Err(self.assertion_failure(&format!("{value} is not falsy!"), messages))
    }

    /// Fails unless `f` raises, i.e. returns `Err` or panics.
    ///
    /// ```rust
    /// # use gardens::{Garden, GardenOptions, MemorySink};
    /// # use std::sync::Arc;
    /// # let garden = Garden::new(None, GardenOptions::new().sink(Arc::new(MemorySink::new())));
    /// assert!(garden.throws(|| garden.assert(false, ()), ()).is_ok());
    /// assert!(garden.throws(|| Ok::<_, ()>(42), ()).is_err());
    /// ```
    pub fn throws<F, T, E>(&self, f: F, messages: impl IntoMessages) -> Result<(), GardenError>
    where
        F: FnOnce() -> Result<T, E>,
    {
        match std::panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(Ok(_)) => Err(self.assertion_failure("Function didn't throw!", messages)),
            Ok(Err(_)) | Err(_) => Ok(()),
        }
    }

    fn assertion_failure(&self, message: &str, messages: impl IntoMessages) -> GardenError {
        GardenError::AssertionFailure(self.assertion_error(message, messages))
    }

    /// Writes each value to the sink as-is, one write per value.
    pub fn raw(&self, values: impl IntoMessages) {
        let sink = self.sink();
        for value in values.into_messages() {
            sink.write(std::slice::from_ref(&value));
        }
    }

    /// Writes one styled piece of text, without scope prefix or tag.
    pub fn styled(&self, text: &str, style: &Style) {
        let (sink, mode) = {
            let config = self.lock_config();
            (config.sink.clone(), config.output_mode)
        };
        let supports_color = environment::supports_color();
        let renderer = mode.renderer();
        let fragment = renderer.style_fragment(text, Some(style), supports_color);
        sink.write(&renderer.join_fragments(vec![fragment], supports_color));
    }

    /// Starts a timer under `key`. Timers under one key nest: each
    /// [`time_end`](Self::time_end) stops the most recent one.
    pub fn time(&self, key: impl Into<Key>) {
        self.time_with(key, ());
    }

    /// [`time`](Self::time), warning about extra arguments, which belong to
    /// [`time_end`](Self::time_end).
    pub fn time_with(&self, key: impl Into<Key>, messages: impl IntoMessages) {
        if !messages.into_messages().is_empty() {
            self.warning(
                "'.time' should only take one argument. Pass additional arguments to '.time_end'.",
            );
        }
        if !environment::high_resolution_clock() {
            if !self.inner.clock_warned.swap(true, Ordering::Relaxed) {
                self.warning("High-resolution time is not available; '.time' will not record.");
            }
            return;
        }
        self.lock_tracker().start(key.into(), Instant::now());
    }

    /// Stops the most recent timer under `key` and prints the elapsed milliseconds,
    /// tagged with the key. Without a running timer this warns and returns `None`.
    pub fn time_end(&self, key: impl Into<Key>) -> Option<Duration> {
        self.time_end_with(key, ())
    }

    /// [`time_end`](Self::time_end), appending `messages` to the printed line.
    pub fn time_end_with(
        &self,
        key: impl Into<Key>,
        messages: impl IntoMessages,
    ) -> Option<Duration> {
        let key = key.into();
        let mut messages = messages.into_messages();
        let start = self.lock_tracker().stop(&key);
        let Some(start) = start else {
            messages.insert(
                0,
                Message::Text(format!(
                    "'.time_end' was called for {key} without first calling '.time'!"
                )),
            );
            self.emit(Level::Warning, messages);
            return None;
        };

        let (elapsed, ms) = sys::elapsed_ms(start);
        let ms = match self.timing_precision() {
            Some(precision) => to_precision(ms, precision),
            None => format_number(ms),
        };
        messages.insert(0, Message::Text(format!("{ms}ms")));
        self.print(&key.label("time"), None, messages);
        Some(elapsed)
    }

    /// Increments the counter for `key` and prints `N time(s)`. Returns the new count.
    pub fn count(&self, key: impl Into<Key>) -> u64 {
        self.count_with(key, ())
    }

    /// [`count`](Self::count), appending `messages` to the printed line.
    pub fn count_with(&self, key: impl Into<Key>, messages: impl IntoMessages) -> u64 {
        let key = key.into();
        let label = key.label("count");
        let count = self.lock_tracker().increment(key);
        let noun = if count == 1 { "time" } else { "times" };
        let mut messages = messages.into_messages();
        messages.insert(0, Message::Text(format!("{count} {noun}")));
        self.print(&label, None, messages);
        count
    }

    /// The current value of the counter for `key`, without printing.
    pub fn counter(&self, key: impl Into<Key>) -> u64 {
        self.lock_tracker().count(&key.into())
    }

    /// Resets the counter for `key` without printing.
    pub fn count_reset(&self, key: impl Into<Key>) {
        self.lock_tracker().reset(key.into());
    }

    /// Number of running timers under `key`.
    pub fn pending_timers(&self, key: impl Into<Key>) -> usize {
        self.lock_tracker().pending(&key.into())
    }

    /// The styled `[name]` fragments of every named scope from the root down to this
    /// one, in this scope's output mode.
    pub fn scope_prefix(&self) -> Vec<Fragment> {
        let mode = self.output_mode();
        self.prefix_fragments(mode.renderer(), environment::supports_color())
    }

    fn prefix_fragments(&self, renderer: &dyn Renderer, supports_color: bool) -> Vec<Fragment> {
        let mut prefix = match &self.inner.parent {
            Some(parent) => parent.prefix_fragments(renderer, supports_color),
            None => Vec::new(),
        };
        if let Some(name) = named(self.inner.name.as_deref()) {
            let style = self.scope_style();
            prefix.push(renderer.style_fragment(&format!("[{name}]"), Some(&style), supports_color));
        }
        prefix
    }

    /// Whether lines at `level` are printed by this scope right now.
    fn prints(&self, level: Level) -> bool {
        !level.requires_verbose() || self.is_verbose()
    }

    fn emit(&self, level: Level, messages: Vec<Message>) {
        self.print(level.tag(), Some(&level.style()), messages);
    }

    /// Renders one line: scope prefix, `[tag]`, optional date and time, then the
    /// messages, and writes it to the sink.
    pub(crate) fn print(&self, tag: &str, style: Option<&Style>, messages: Vec<Message>) {
        let config = self.lock_config().clone();
        let supports_color = environment::supports_color();
        let renderer = config.output_mode.renderer();

        let mut fragments = self.prefix_fragments(renderer, supports_color);
        let tag_style = style
            .cloned()
            .unwrap_or_else(|| Style::color(DEFAULT_TAG_COLOR));
        fragments.push(renderer.style_fragment(&format!("[{tag}]"), Some(&tag_style), supports_color));

        if config.display_date || config.display_time {
            let now = chrono::Local::now();
            let stamp_style = Style::color(TIMESTAMP_COLOR);
            if config.display_date {
                let date = format!("[{}]", now.format("%-m/%-d/%Y"));
                fragments.push(renderer.style_fragment(&date, Some(&stamp_style), supports_color));
            }
            if config.display_time {
                let time = format!("[{}]", now.format("%-I:%M:%S %p"));
                fragments.push(renderer.style_fragment(&time, Some(&stamp_style), supports_color));
            }
        }

        for message in messages {
            fragments.push(match message {
                Message::Text(text) => {
                    renderer.style_fragment(&format!(" {text}"), None, supports_color)
                }
                Message::Raw(value) => Fragment::Raw(value),
            });
        }

        config
            .sink
            .write(&renderer.join_fragments(fragments, supports_color));
    }
}
