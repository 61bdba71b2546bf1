//! The model/view builder.
//!
//! `component(model, view)` splits a component into a pure-view half and a
//! logic half with inverted dependencies: the view consumes values the
//! model has not produced yet. The view declares the input keys it needs
//! and receives them as placeholders; the model receives the view's real
//! output record and returns the values that resolve those placeholders,
//! plus the record exposed to whoever mounts the component.

use std::rc::Rc;

use tracing::debug;

use eddy_reactive::{Now, Placeholder};

use crate::component::{to_component, Child, Component};
use crate::error::{Error, Result};
use crate::output::{resolve_out, OutputRecord};
use crate::value::Value;

/// The logic half: view outputs in, `(exposed, to_view)` records out.
///
/// The name is carried for error attribution; a missing key in the
/// `to_view` record is reported against it.
#[derive(Clone)]
pub struct Model {
    name: String,
    #[allow(clippy::type_complexity)]
    f: Rc<dyn Fn(&OutputRecord, Now) -> Result<(OutputRecord, OutputRecord)>>,
}

/// The rendering half: declared input keys plus a function from the input
/// record (placeholders at first) to child content.
#[derive(Clone)]
pub struct View {
    inputs: Vec<String>,
    f: Rc<dyn Fn(&OutputRecord) -> Result<Child>>,
}

/// Name a model function. Runs inside the mount's turn; `now` is the
/// witness for sampling.
pub fn model<F>(name: &str, f: F) -> Model
where
    F: Fn(&OutputRecord, Now) -> Result<(OutputRecord, OutputRecord)> + 'static,
{
    Model { name: name.into(), f: Rc::new(f) }
}

/// Declare a view and the input keys it consumes.
pub fn view<C, F>(inputs: &[&str], f: F) -> View
where
    C: Into<Child>,
    F: Fn(&OutputRecord) -> Result<C> + 'static,
{
    View {
        inputs: inputs.iter().map(|name| name.to_string()).collect(),
        f: Rc::new(move |record| f(record).map(Into::into)),
    }
}

/// Assemble a component from a model and a view.
///
/// Run order: build a placeholder per declared view input, render the view
/// against the target, hand the view's record to the model, resolve every
/// declared placeholder from the model's `to_view` record, expose the
/// model's first record. A declared key the model did not return is
/// [`Error::MissingModelKey`], naming the model.
///
/// # Example
///
/// ```ignore
/// let counter = component(
///     model("counter", |view_out, _now| {
///         let clicks = view_out.stream("click")?;
///         let count = accum(|n, _| n + 1.0, 0.0, &clicks).map(Value::from);
///         let mut expose = OutputRecord::new();
///         expose.insert("count", count.clone())?;
///         let mut to_view = OutputRecord::new();
///         to_view.insert("count", count)?;
///         Ok((expose, to_view))
///     }),
///     view(&["count"], |inputs| {
///         let count = inputs.behavior("count")?;
///         Ok(div(children![button("+1"), span(count)]))
///     }),
/// );
/// ```
pub fn component(model: Model, view: View) -> Component {
    Component::new(move |ctx| {
        let mut placeholders: Vec<(String, Placeholder<Value>)> =
            Vec::with_capacity(view.inputs.len());
        let mut inputs = OutputRecord::new();
        for name in &view.inputs {
            let ph = Placeholder::<Value>::new();
            inputs.insert(name.clone(), ph.clone())?;
            placeholders.push((name.clone(), ph));
        }

        let child = (view.f)(&inputs)?;
        let view_out = to_component(child).run(ctx)?;

        let (expose, to_view) = (model.f)(&view_out, ctx.now)?;

        for (name, ph) in &placeholders {
            let out = to_view.get(name).ok_or_else(|| Error::MissingModelKey {
                model: model.name.clone(),
                key: name.clone(),
            })?;
            resolve_out(name, ph, out)?;
        }
        debug!(model = %model.name, inputs = ?view.inputs, "model resolved its view");
        Ok(expose)
    })
}
