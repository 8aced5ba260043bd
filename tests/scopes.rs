// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope trees, managers and the global root.

use gardens::{
    Catchable, ErrorKind, Garden, GardenError, GardenOptions, MemorySink, Symbol, gardens,
    messages,
};
use std::sync::Arc;

fn recorded(name: &str) -> (Garden, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let garden = Garden::new(Some(name), GardenOptions::new().sink(sink.clone()));
    (garden, sink)
}

#[test]
fn global_root_is_shared() {
    let root = gardens();
    assert_eq!(root, gardens());
    assert_eq!(root.name(), None);
    assert_eq!(root.nesting_level(), 0);
}

#[test]
fn manager_paths() {
    let (app, sink) = recorded("app");
    let manager = app.create_manager("jobs", GardenOptions::new().verbose(true));
    assert_eq!(manager.scope(Vec::<&str>::new()), manager.garden());

    let worker = manager.scope(["pool", "worker"]);
    assert!(worker.is_verbose());
    assert_eq!(worker, manager.scope(["pool", "worker"]));

    worker.debug("picked up");
    assert_eq!(sink.drain_logs(), "[app][jobs][pool][worker][debug] picked up\n");
}

#[test]
fn many_parts_through_macro() {
    let (garden, sink) = recorded("m");
    garden.log(messages!["a", 1, "b", 2.5, "c", true, "d"]);
    assert_eq!(sink.drain_logs(), "[m][log] a 1 b 2.5 c true d\n");
}

#[test]
fn symbol_timers() {
    let (garden, sink) = recorded("t");
    let token = Symbol::new("load");
    garden.time(&token);
    assert!(garden.time_end(&token).is_some());
    assert!(sink.drain_logs().starts_with("[t][Symbol(load)] "));
}

#[test]
fn errors_flow_into_results() {
    fn parse(garden: &Garden, input: &str) -> Result<u32, GardenError> {
        garden.assert(!input.is_empty(), "input must not be empty")?;
        input
            .parse()
            .map_err(|_| GardenError::InvalidArgument(garden.type_error("not a number", input)))
    }

    let (garden, sink) = recorded("parser");
    assert_eq!(parse(&garden, "12").unwrap(), 12);
    assert!(sink.is_empty());

    let err = parse(&garden, "").unwrap_err();
    assert_eq!(err.logged().kind(), ErrorKind::AssertionError);
    let err = parse(&garden, "x").unwrap_err();
    assert_eq!(err.clone().into_logged_error().kind(), ErrorKind::TypeError);

    let lines = sink.drain_lines();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[parser][assertion error] Assert failed! false is not truthy!"));
    assert!(lines[1].starts_with("[parser][type error] not a number"));
    assert!(lines[1].ends_with(" x\n"));
}

#[test]
fn catching_panics() {
    let (garden, sink) = recorded("panics");
    garden.configure(GardenOptions::new().verbose(true));
    let payload = std::panic::catch_unwind(|| panic!("worker died")).unwrap_err();
    let error = garden.catch(payload, ());
    assert_eq!(error.message(), "worker died");
    assert!(
        sink.drain_logs()
            .starts_with("[panics][caught error] Error: worker died")
    );
}
