//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# gardens

gardens is a scoped, styled logging facade for Rust.

# Development status

gardens is experimental and the API may change.

# The problem

Once a program has more than a handful of components, a flat stream of log lines stops being
readable. Which component printed this? Is this warning from the cache or from the network?
Was this timer started by the request handler or by the retry loop?

gardens answers these questions by giving every component its own *garden*: a named scope
that prefixes its lines, keeps its own timers and counters, and can be made verbose on its own.

```text
[app][network][http][warning] retrying request
[app][cache][time] 0.412000ms
[app][cache][count] 3 times
```

# The facade

Every garden offers the same set of operations.

| Operation                                   | Tag                 | Conditions                      |
|---------------------------------------------|---------------------|---------------------------------|
| `log`                                       | `[log]`             | always                          |
| `info`                                      | `[info]`            | always                          |
| `success`                                   | `[success]`         | always                          |
| `warning` / `warn`                          | `[warning]`         | always                          |
| `failure` / `fail`                          | `[failure]`         | always                          |
| `debug`                                     | `[debug]`           | verbose scopes only             |
| `trace`                                     | `[trace]`           | verbose scopes only, with stack |
| `error`, `type_error`, `reference_error`    | `[error]`, ...      | always; returns the error       |
| `catch`                                     | `[caught error]`    | verbose scopes only             |
| `assert`, `assert_eq`, `deny`, `throws`     | `[assertion error]` | on failure                      |
| `time` / `time_end`                         | `[time]` or key     | on `time_end`                   |
| `count`                                     | `[count]` or key    | always                          |

Errors are never raised on the caller's behalf: the error operations build, print and *return*
a [`LoggedError`], and assertions return `Result<(), GardenError>`.

# The API

```rust
use gardens::{Garden, GardenOptions, MemorySink};
use std::sync::Arc;

let sink = Arc::new(MemorySink::new());
let app = Garden::new(Some("app"), GardenOptions::new().sink(sink.clone()));
let cache = app.create_scope("cache");

cache.info(("loaded", 42, "entries"));
cache.count("misses");
assert_eq!(
    sink.drain_logs(),
    "[app][cache][info] loaded 42 entries\n[app][cache][misses] 1 time\n"
);
```

Arguments are anything implementing [`IntoMessages`]: a single string or value, a tuple of
parts, or a [`messages!`] list. Strings are printed as text; other values are kept as raw
[`Value`]s so that hosts with an interactive inspector receive the value itself.

# Output modes

How a line is styled depends on the garden's [`OutputMode`]:

* `ansi`: terminal escape sequences.
* `console`: `%c` format directives plus CSS, for browser-like consoles.
* `html`: `<span style="...">` markup.
* `text`: no styling at all.

The process-wide defaults (mode, sink, color support, verbose scopes) come from the
[`Environment`], detected on first use and replaceable by adapters at startup.

# Bridging `log`

Libraries that log through the [`log`](https://crates.io/crates/log) facade can be routed into
gardens with [`log_bridge::init`]; record targets become scope paths.

# Multithreading

Gardens are `Send + Sync` and cheap to clone. Clones are the same scope: they share
configuration, timers and counters.
*/

mod error;
mod garden;
mod key;
mod level;
mod macros;
mod manager;
mod memory_sink;
mod message;
mod options;
mod spinlock;
mod style;
mod sys;

pub mod environment;
pub mod log_bridge;
pub mod render;
pub mod sink;

pub use environment::Environment;
pub use error::{Catchable, ErrorKind, GardenError, LoggedError};
pub use garden::{Garden, gardens};
pub use key::{Key, Symbol};
pub use level::Level;
pub use manager::Manager;
pub use memory_sink::MemorySink;
pub use message::{IntoMessages, Message, Value, inspect, to_precision};
pub use options::GardenOptions;
pub use render::{Fragment, OutputMode, Renderer};
pub use sink::{ConsoleSink, Sink, StdoutSink};
pub use style::{Style, colorize};

pub use sys::Duration;
