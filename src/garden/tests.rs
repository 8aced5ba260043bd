// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tests for the garden module.

use super::garden_impl::Garden;
use crate::error::{ErrorKind, GardenError};
use crate::key::Symbol;
use crate::memory_sink::MemorySink;
use crate::message::{Message, Value};
use crate::options::GardenOptions;
use crate::render::OutputMode;
use crate::style::{Style, colorize};
use std::collections::HashSet;
use std::sync::Arc;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_test::*;
#[cfg(target_arch = "wasm32")]
wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn recorded(name: Option<&str>) -> (Garden, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let garden = Garden::new(name, GardenOptions::new().sink(sink.clone()));
    (garden, sink)
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn prefix_runs_root_to_leaf() {
    let (root, sink) = recorded(Some("a"));
    let leaf = root
        .create_scope_with(None, GardenOptions::new())
        .create_scope("b");
    leaf.log("hi");
    root.info(("two", "parts"));
    assert_eq!(
        sink.drain_lines(),
        vec!["[a][b][log] hi\n", "[a][info] two parts\n"]
    );
    assert_eq!(leaf.to_string(), "[a][b]");
    assert_eq!(leaf.nesting_level(), 2);
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn empty_name_is_unnamed() {
    let (root, sink) = recorded(Some(""));
    root.warn("careful");
    assert_eq!(sink.drain_logs(), "[warning] careful\n");
    assert_eq!(root.scope_style().color, None);
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn level_tags() {
    let (garden, sink) = recorded(None);
    garden.success("s");
    garden.failure("f");
    garden.fail("g");
    assert_eq!(
        sink.drain_logs(),
        "[success] s\n[failure] f\n[failure] g\n"
    );
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn counting() {
    let (garden, sink) = recorded(None);
    assert_eq!(garden.count(()), 1);
    assert_eq!(garden.count(()), 2);
    assert_eq!(garden.count_with("jobs", "queued"), 1);
    garden.count_reset(());
    assert_eq!(garden.counter(()), 0);
    assert_eq!(garden.count(()), 1);
    assert_eq!(
        sink.drain_lines(),
        vec![
            "[count] 1 time\n",
            "[count] 2 times\n",
            "[jobs] 1 time queued\n",
            "[count] 1 time\n",
        ]
    );
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn symbols_are_distinct_counters() {
    let (garden, sink) = recorded(None);
    let first = Symbol::new("k");
    let second = Symbol::new("k");
    assert_eq!(garden.count(&first), 1);
    assert_eq!(garden.count(&second), 1);
    assert_eq!(garden.count(&first), 2);
    assert_eq!(sink.drain_lines()[0], "[Symbol(k)] 1 time\n");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn counters_are_per_scope() {
    let (garden, _sink) = recorded(None);
    let child = garden.create_scope("child");
    garden.count("n");
    garden.count("n");
    assert_eq!(child.count("n"), 1);
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn timing() {
    let (garden, sink) = recorded(None);
    garden.time(());
    assert_eq!(garden.pending_timers(()), 1);
    assert!(garden.time_end(()).is_some());
    assert_eq!(garden.pending_timers(()), 0);

    let line = sink.drain_logs();
    assert!(line.starts_with("[time] "), "{line}");
    assert!(line.ends_with("ms\n"), "{line}");

    garden.time("load");
    assert!(garden.time_end_with("load", "done").is_some());
    let line = sink.drain_logs();
    assert!(line.starts_with("[load] "), "{line}");
    assert!(line.ends_with("ms done\n"), "{line}");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn nested_timers_unwind() {
    let (garden, sink) = recorded(None);
    garden.time("t");
    garden.time("t");
    assert_eq!(garden.pending_timers("t"), 2);
    assert!(garden.time_end("t").is_some());
    assert!(garden.time_end("t").is_some());
    assert!(garden.time_end("t").is_none());
    let lines = sink.drain_lines();
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[2],
        "[warning] '.time_end' was called for t without first calling '.time'!\n"
    );
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn time_end_without_time() {
    let (garden, sink) = recorded(None);
    assert_eq!(garden.time_end(()), None);
    assert_eq!(
        sink.drain_logs(),
        "[warning] '.time_end' was called for null without first calling '.time'!\n"
    );
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn time_with_extra_arguments_warns() {
    let (garden, sink) = recorded(None);
    garden.time_with("x", "extra");
    assert_eq!(
        sink.drain_logs(),
        "[warning] '.time' should only take one argument. Pass additional arguments to '.time_end'.\n"
    );
    assert_eq!(garden.pending_timers("x"), 1);
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn precision_off_prints_full_number() {
    let (garden, sink) = recorded(None);
    garden.configure(GardenOptions::new().timing_precision(0));
    assert_eq!(garden.timing_precision(), None);
    garden.time(());
    garden.time_end(());
    let line = sink.drain_logs();
    let number = line
        .strip_prefix("[time] ")
        .and_then(|rest| rest.strip_suffix("ms\n"))
        .unwrap();
    assert!(number.parse::<f64>().unwrap() >= 0.0);
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn out_of_range_precision_is_ignored() {
    let (garden, _sink) = recorded(None);
    garden.configure(GardenOptions::new().timing_precision(3));
    garden.configure(GardenOptions::new().timing_precision(101));
    assert_eq!(garden.timing_precision(), Some(3));
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn assertions() {
    let (garden, sink) = recorded(None);
    assert!(garden.assert(true, ()).is_ok());
    assert!(garden.assert_eq(1, 1, ()).is_ok());
    assert!(garden.deny(false, ()).is_ok());
    assert!(sink.is_empty());

    let err = garden.assert(false, ()).unwrap_err();
    assert!(matches!(err, GardenError::AssertionFailure(_)));
    assert_eq!(err.logged().kind(), ErrorKind::AssertionError);
    assert_eq!(err.logged().message(), "false is not truthy!");

    garden.assert_eq("a", "b", ()).unwrap_err();
    garden.deny(true, "context").unwrap_err();

    let lines = sink.drain_lines();
    assert!(lines[0].starts_with("[assertion error] Assert failed! false is not truthy!"));
    assert!(lines[1].starts_with("[assertion error] Assert failed! \"a\" is not equal to \"b\"!"));
    assert!(lines[2].starts_with("[assertion error] Assert failed! true is not falsy!"));
    assert!(lines[2].ends_with(" context\n"));
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn throws() {
    let (garden, sink) = recorded(None);
    assert!(garden.throws(|| Err::<(), _>("nope"), ()).is_ok());
    assert!(garden.throws(|| garden.assert(false, ()), ()).is_ok());
    let err = garden.throws(|| Ok::<_, ()>(()), ()).unwrap_err();
    assert_eq!(err.logged().message(), "Function didn't throw!");
    let lines = sink.drain_lines();
    assert!(lines.last().unwrap().starts_with("[assertion error] Assert failed! Function didn't throw!"));
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn throws_accepts_panics() {
    let (garden, _sink) = recorded(None);
    let result = garden.throws(
        || -> Result<(), ()> {
            panic!("inside");
        },
        (),
    );
    assert!(result.is_ok());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn debug_follows_verbosity() {
    let (root, sink) = recorded(None);
    let a = root.create_scope_with(Some("a"), GardenOptions::new().verbose(true));
    let b = a.create_scope("b");
    let sibling = root.create_scope("c");

    assert!(b.debug("deep"));
    assert!(!sibling.debug("hidden"));
    assert!(!sibling.trace("hidden", ()));
    assert_eq!(sink.drain_logs(), "[a][b][debug] deep\n");

    assert!(b.trace("here", ()));
    assert!(sink.drain_logs().starts_with("[a][b][trace] here"));
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn verbose_child_round_trip() {
    let (root, sink) = recorded(None);
    let a = root.create_scope("a");
    let b = a.create_scope_with(Some("b"), GardenOptions::new().verbose(true));
    let sibling = a.create_scope("c");

    assert!(!a.is_verbose());
    assert!(b.debug("round trip"));
    assert_eq!(sink.drain_lines(), vec!["[a][b][debug] round trip\n"]);

    assert!(!sibling.debug("hidden"));
    assert!(sink.is_empty());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn children_snapshot_parent_config() {
    let (root, sink) = recorded(Some("p"));
    let before = root.create_scope("before");
    root.configure(GardenOptions::new().verbose(true).output_mode(OutputMode::Html));
    let after = root.create_scope("after");

    assert!(!before.is_verbose());
    assert_eq!(before.output_mode(), OutputMode::Text);
    assert!(after.is_verbose());
    assert_eq!(after.output_mode(), OutputMode::Html);

    before.log("x");
    assert_eq!(sink.drain_logs(), "[p][before][log] x\n");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn sink_without_mode_forces_text() {
    let sink = Arc::new(MemorySink::new());
    let text = Garden::new(None, GardenOptions::new().sink(sink.clone()));
    assert_eq!(text.output_mode(), OutputMode::Text);
    let html = Garden::new(
        None,
        GardenOptions::new()
            .sink(sink.clone())
            .output_mode(OutputMode::Html),
    );
    assert_eq!(html.output_mode(), OutputMode::Html);
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn bogus_json_mode_is_reported() {
    let (garden, sink) = recorded(None);
    let err = garden
        .configure_json(&serde_json::json!({"outputMode": "bogus"}))
        .unwrap_err();
    assert!(matches!(err, GardenError::InvalidArgument(_)));
    assert_eq!(err.logged().kind(), ErrorKind::TypeError);
    assert!(
        sink.drain_logs()
            .starts_with("[type error] Invalid output type 'bogus'!")
    );
    assert_eq!(garden.output_mode(), OutputMode::Text);

    assert!(garden
        .configure_json(&serde_json::json!({"outputMode": "html", "verbose": true}))
        .is_ok());
    assert_eq!(garden.output_mode(), OutputMode::Html);
    assert!(garden.is_verbose());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn date_and_time_fragments() {
    let (garden, sink) = recorded(None);
    garden.configure(GardenOptions::new().display_date(true).display_time(true));
    garden.log("stamped");
    let line = sink.drain_logs();
    let pattern = regex::Regex::new(
        r"^\[log\]\[\d{1,2}/\d{1,2}/\d{4}\]\[\d{1,2}:\d{2}:\d{2} (AM|PM)\] stamped\n$",
    )
    .unwrap();
    assert!(pattern.is_match(&line), "{line}");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn catch_prints_only_when_verbose() {
    let (garden, sink) = recorded(None);
    let quiet = garden.catch("boom", ());
    assert_eq!(quiet.message(), "boom");
    assert!(sink.is_empty());

    garden.configure(GardenOptions::new().verbose(true));
    let loud = garden.catch(String::from("bang"), "while loading");
    assert_eq!(loud.kind(), ErrorKind::Error);
    let line = sink.drain_logs();
    assert!(line.starts_with("[caught error] Error: bang"), "{line}");
    assert!(line.ends_with(" while loading\n"), "{line}");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn error_constructors_return_errors() {
    let (garden, sink) = recorded(None);
    let error = garden.error("plain", ());
    let type_error = garden.type_error("typed", ());
    let reference_error = garden.reference_error("missing", ());
    assert_eq!(error.kind(), ErrorKind::Error);
    assert_eq!(type_error.kind(), ErrorKind::TypeError);
    assert_eq!(reference_error.kind(), ErrorKind::ReferenceError);
    let lines = sink.drain_lines();
    assert!(lines[0].starts_with("[error] plain"));
    assert!(lines[1].starts_with("[type error] typed"));
    assert!(lines[2].starts_with("[reference error] missing"));
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn error_lines_carry_the_stack() {
    let (garden, sink) = recorded(None);
    let error = garden.error("boom", ());
    let line = sink.drain_logs();
    if let Some(stack) = error.stack() {
        assert!(line.lines().count() > 1, "{line}");
        assert_eq!(line, format!("[error] boom\n{stack}\n\n"));
    } else {
        assert_eq!(line, "[error] boom\n");
    }

    garden.configure(GardenOptions::new().verbose(true));
    let caught = garden.catch("wrapped", ());
    let line = sink.drain_logs();
    if let Some(stack) = caught.stack() {
        assert_eq!(line, format!("[caught error] Error: wrapped\n{stack}\n\n"));
    }
}

#[cfg(all(target_os = "linux", not(target_arch = "wasm32")))]
#[test]
fn stack_is_captured_without_backtrace_variables() {
    let (garden, _sink) = recorded(None);
    assert!(garden.type_error("typed", ()).stack().is_some());
    assert!(garden.assert(false, ()).unwrap_err().logged().stack().is_some());
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn html_output() {
    let sink = Arc::new(MemorySink::new());
    let garden = Garden::new(
        Some("a"),
        GardenOptions::new()
            .sink(sink.clone())
            .output_mode(OutputMode::Html),
    );
    garden.log("x  y");
    assert_eq!(
        sink.drain_logs(),
        format!(
            "<span style=\"color: {}\">[a]</span>\
             <span style=\"color: #5b5b5b\">[log]</span>\
             <span> x&nbsp;&nbsp;y</span><br />",
            colorize("a")
        )
    );
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn raw_writes_each_value() {
    let (garden, sink) = recorded(None);
    garden.raw(("a", 1));
    assert_eq!(
        sink.drain_writes(),
        vec![
            vec![Message::Text("a".to_string())],
            vec![Message::Raw(Value::Integer(1))],
        ]
    );
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn styled_text_has_no_prefix() {
    let (garden, sink) = recorded(Some("scope"));
    garden.styled("hello", &Style::color("#ff0000"));
    assert_eq!(sink.drain_logs(), "hello\n");
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn scope_style_is_merged() {
    let sink = Arc::new(MemorySink::new());
    let garden = Garden::new(
        Some("bold"),
        GardenOptions::new()
            .sink(sink)
            .scope_style(Style::new().with_font_weight(700)),
    );
    let style = garden.scope_style();
    assert_eq!(style.color, Some(colorize("bold")));
    assert_eq!(style.font_weight, Some(700));
}

#[cfg_attr(not(target_arch = "wasm32"), test)]
#[cfg_attr(target_arch = "wasm32", wasm_bindgen_test)]
fn identity() {
    let (garden, _sink) = recorded(Some("same"));
    let clone = garden.clone();
    let other = garden.create_scope("same");
    assert_eq!(garden, clone);
    assert_ne!(garden, other);
    assert_eq!(other.parent(), Some(&garden));

    let mut set = HashSet::new();
    set.insert(garden.clone());
    set.insert(clone);
    set.insert(other);
    assert_eq!(set.len(), 2);
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn gardens_are_send_and_sync() {
    let (garden, sink) = recorded(Some("threads"));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let garden = garden.clone();
            std::thread::spawn(move || garden.count(()))
        })
        .collect();
    let mut counts: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![1, 2, 3, 4]);
    assert_eq!(sink.len(), 4);
}
