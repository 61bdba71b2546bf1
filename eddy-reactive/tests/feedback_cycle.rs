//! Cross-primitive wiring: placeholders closing a cycle over live streams
//! and behaviors, and subscription lifetimes across scope teardown.

use eddy_reactive::{accum, cloned, sink_stream, stepper, Placeholder, Scope};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn placeholder_closes_a_counter_cycle() {
    // Consumers wire against the declared total before it exists, the way a
    // feedback loop body sees its own future output.
    let scope = Scope::new();
    let clicks = sink_stream::<i32>();
    let total = Placeholder::<i32>::new();

    let label = total.behavior().map(|n| format!("count: {n}"));

    let seen = Rc::new(RefCell::new(Vec::new()));
    label.subscribe(
        &scope,
        cloned!(seen => move |text: &String| seen.borrow_mut().push(text.clone())),
    );

    // Now build the real source and resolve.
    let source = accum(|acc, n| acc + n, 0, &clicks.stream());
    total.replace_with_behavior(&source).unwrap();

    assert_eq!(label.sample(), "count: 0", "resolution delivers the seed value");

    clicks.push(1);
    clicks.push(2);

    assert_eq!(label.sample(), "count: 3");
    assert_eq!(
        *seen.borrow(),
        vec![
            "count: 0".to_string(),
            "count: 1".to_string(),
            "count: 3".to_string(),
        ],
        "one delivery per write, starting at resolution"
    );
}

#[test]
fn stepper_over_placeholder_stream() {
    let events = Placeholder::<&'static str>::new();
    let latest = stepper("start", &events.stream());

    assert_eq!(latest.sample(), "start");

    let source = sink_stream::<&'static str>();
    source.push("dropped"); // pre-resolution occurrences are not replayed
    events.replace_with_stream(&source.stream()).unwrap();

    source.push("live");
    assert_eq!(latest.sample(), "live");
}

#[test]
fn scope_drop_severs_the_whole_chain() {
    let clicks = sink_stream::<i32>();
    let fired = Rc::new(Cell::new(0));

    {
        let scope = Scope::new();
        let doubled = clicks.map(|n| n * 2);
        doubled.subscribe(
            &scope,
            cloned!(fired => move |_| fired.set(fired.get() + 1)),
        );

        clicks.push(1);
        assert_eq!(fired.get(), 1);
        // scope drops here
    }

    clicks.push(2);
    assert_eq!(fired.get(), 1, "subscription must not survive its scope");
}

#[test]
fn nested_region_scope_teardown() {
    // The shape the dynamic renderer uses: a child scope per rendered
    // region, replaced wholesale on every swap.
    let parent = Scope::new();
    let values = sink_stream::<i32>();
    let first_region = Rc::new(Cell::new(0));
    let second_region = Rc::new(Cell::new(0));

    let region = parent.child();
    values.subscribe(
        &region,
        cloned!(first_region => move |_| first_region.set(first_region.get() + 1)),
    );

    values.push(1);

    // Swap: dispose the old region scope, subscribe under a fresh one.
    region.dispose();
    let region = parent.child();
    values.subscribe(
        &region,
        cloned!(second_region => move |_| second_region.set(second_region.get() + 1)),
    );

    values.push(2);

    assert_eq!(first_region.get(), 1, "old region stops at the swap");
    assert_eq!(second_region.get(), 1, "new region picks up after the swap");

    parent.dispose();
    values.push(3);
    assert_eq!(second_region.get(), 1, "parent dispose tears down the live region");
}
