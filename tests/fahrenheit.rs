//! The temperature converter: two inputs feeding each other through a
//! feedback loop, the classic demonstration that a component's outputs can
//! drive its own inputs.

use eddy::{children, div, input, label, record, run_component_loop, Dom, Value};
use eddy_reactive::{combine, stepper};

fn converter(dom: &Dom) -> eddy::MountHandle {
    run_component_loop(dom, dom.root(), &["fahren_change", "celsius_change"], |inputs, steps| {
        // Model: parse each side, convert, and hold the latest of
        // "typed here" and "converted from the other side".
        let fahren_change = inputs.stream("fahren_change")?;
        let celsius_change = inputs.stream("celsius_change")?;

        let fahren_nr = fahren_change.filter_map(Value::parse_number);
        let celsius_nr = celsius_change.filter_map(Value::parse_number);

        let celsius = stepper(
            Value::from(0),
            &combine(&celsius_change, &fahren_nr.map(|f| Value::from((f - 32.0) / 1.8))),
        );
        let fahren = stepper(
            Value::from(0),
            &combine(&fahren_change, &celsius_nr.map(|c| Value::from(c * 9.0 / 5.0 + 32.0))),
        );

        // View: one labelled input per unit.
        let fahren_row = steps.render(div(children![
            label("Fahrenheit"),
            input()
                .prop("id", "fahrenheit")
                .prop("value", fahren)
                .output("fahren_input", "input"),
        ]))?;
        let celsius_row = steps.render(div(children![
            label("Celsius"),
            input()
                .prop("id", "celsius")
                .prop("value", celsius)
                .output("celsius_input", "input"),
        ]))?;

        Ok(record! {
            "fahren_change" => fahren_row.stream("fahren_input")?,
            "celsius_change" => celsius_row.stream("celsius_input")?,
        })
    })
    .unwrap()
}

#[test]
fn renders_both_rows_seeded_at_zero() {
    let dom = Dom::new();
    let _mount = converter(&dom);

    let fahren = dom.select("#fahrenheit").unwrap();
    let celsius = dom.select("#celsius").unwrap();
    assert_eq!(dom.prop(fahren, "value"), Some(Value::from(0)));
    assert_eq!(dom.prop(celsius, "value"), Some(Value::from(0)));
}

#[test]
fn typing_fahrenheit_updates_celsius() {
    let dom = Dom::new();
    let _mount = converter(&dom);

    let fahren = dom.select("#fahrenheit").unwrap();
    let celsius = dom.select("#celsius").unwrap();

    dom.dispatch(fahren, "input", "212");
    assert_eq!(dom.prop(celsius, "value"), Some(Value::from(100.0)));
    assert_eq!(
        dom.prop(fahren, "value"),
        Some(Value::from("212")),
        "your own box holds what you typed"
    );

    dom.dispatch(fahren, "input", "32");
    assert_eq!(dom.prop(celsius, "value"), Some(Value::from(0.0)));
}

#[test]
fn typing_celsius_updates_fahrenheit() {
    let dom = Dom::new();
    let _mount = converter(&dom);

    let fahren = dom.select("#fahrenheit").unwrap();
    let celsius = dom.select("#celsius").unwrap();

    dom.dispatch(celsius, "input", "100");
    assert_eq!(dom.prop(fahren, "value"), Some(Value::from(212.0)));

    dom.dispatch(celsius, "input", "-40");
    assert_eq!(dom.prop(fahren, "value"), Some(Value::from(-40.0)));
}

#[test]
fn non_numeric_input_leaves_the_other_side_alone() {
    let dom = Dom::new();
    let _mount = converter(&dom);

    let fahren = dom.select("#fahrenheit").unwrap();
    let celsius = dom.select("#celsius").unwrap();

    dom.dispatch(celsius, "input", "100");
    assert_eq!(dom.prop(fahren, "value"), Some(Value::from(212.0)));

    dom.dispatch(celsius, "input", "tepid");
    assert_eq!(
        dom.prop(fahren, "value"),
        Some(Value::from(212.0)),
        "garbage must not propagate"
    );
    assert_eq!(
        dom.prop(celsius, "value"),
        Some(Value::from("tepid")),
        "but it stays visible where it was typed"
    );
}

#[test]
fn unmount_freezes_the_converter() {
    let dom = Dom::new();
    let mount = converter(&dom);

    let fahren = dom.select("#fahrenheit").unwrap();
    dom.dispatch(fahren, "input", "212");

    mount.unmount();
    assert_eq!(dom.select("#fahrenheit"), None, "rows removed on unmount");

    // Events on stale nodes go nowhere.
    dom.dispatch(fahren, "input", "451");
}
