//! The feedback combinator: components whose outputs circle back as their
//! own inputs.
//!
//! `feedback` hands the body a record of placeholders, one per declared
//! name. The body renders content that consumes them (wiring against the
//! placeholder views), then returns a record containing the real values.
//! Each declared placeholder is resolved from that record before the mount
//! returns, so everything wired during rendering is connected by the time
//! the caller sees the outputs, within the same turn.

use tracing::debug;

use eddy_reactive::Placeholder;

use crate::component::{to_component, Child, Component, RenderCtx};
use crate::error::{Error, Result};
use crate::output::{resolve_out, OutputRecord};
use crate::value::Value;

/// The rendering steps available inside a feedback body.
///
/// Each [`render`](LoopBody::render) call renders immediately against the
/// mount target and hands back that content's record, so node order equals
/// call order.
pub struct LoopBody<'a> {
    ctx: &'a RenderCtx,
}

impl LoopBody<'_> {
    pub fn render(&mut self, child: impl Into<Child>) -> Result<OutputRecord> {
        to_component(child).run(self.ctx)
    }
}

/// Run `body` with a placeholder for each name in `names`, then resolve
/// every placeholder from the record the body returns.
///
/// The returned component exposes that record, resolved, so consumers
/// outside the loop observe the real values. A declared name missing from
/// the body's record is [`Error::MissingLoopKey`]; resolving one with a
/// nested record is [`Error::InvalidResolution`].
///
/// # Example
///
/// ```ignore
/// let counter = feedback(&["count"], |inputs, body| {
///     let count = inputs.behavior("count")?;
///     let clicks = body.render(button("+1"))?.stream("click")?;
///     body.render(span(count))?;
///
///     let mut out = OutputRecord::new();
///     out.insert("count", accum(|n, _| n + 1.0, 0.0, &clicks).map(Value::from))?;
///     Ok(out)
/// });
/// ```
pub fn feedback<B>(names: &[&str], body: B) -> Component
where
    B: Fn(&OutputRecord, &mut LoopBody) -> Result<OutputRecord> + 'static,
{
    let names: Vec<String> = names.iter().map(|name| name.to_string()).collect();
    Component::new(move |ctx| {
        let mut placeholders: Vec<(String, Placeholder<Value>)> =
            Vec::with_capacity(names.len());
        let mut inputs = OutputRecord::new();
        for name in &names {
            let ph = Placeholder::<Value>::new();
            inputs.insert(name.clone(), ph.clone())?;
            placeholders.push((name.clone(), ph));
        }

        let mut steps = LoopBody { ctx };
        let record = body(&inputs, &mut steps)?;

        for (name, ph) in &placeholders {
            let out = record
                .get(name)
                .ok_or_else(|| Error::MissingLoopKey { name: name.clone() })?;
            resolve_out(name, ph, out)?;
        }
        debug!(?names, "feedback placeholders resolved");
        Ok(record)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Env;
    use crate::dom::Dom;
    use eddy_reactive::{accum, sink_stream, with_now, Now, Scope, Stream};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn test_ctx(dom: &Dom, scope: &Scope, now: Now) -> RenderCtx {
        RenderCtx {
            dom: dom.clone(),
            target: dom.root(),
            scope: scope.clone(),
            env: Env::new(),
            now,
        }
    }

    #[test]
    fn placeholder_inputs_connect_to_the_returned_record() {
        let dom = Dom::new();
        let scope = Scope::new();
        let bumps = sink_stream::<Value>();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let events = bumps.stream();
        let seen_in_view = seen.clone();
        let counter = feedback(&["count"], move |inputs, steps| {
            // Consume the looped value before it exists.
            let count = inputs.behavior("count")?;
            let seen = seen_in_view.clone();
            steps.render(Component::new(move |ctx| {
                let seen = seen.clone();
                count.subscribe(&ctx.scope, move |v: &Value| {
                    seen.borrow_mut().push(v.clone());
                });
                Ok(OutputRecord::new())
            }))?;

            let total = accum(
                |acc: &f64, _: &Value| acc + 1.0,
                0.0,
                &events,
            );
            let mut out = OutputRecord::new();
            out.insert("count", total.map(|n| Value::from(*n)))?;
            Ok(out)
        });

        let record =
            with_now(|now| counter.run(&test_ctx(&dom, &scope, now))).unwrap();

        // The caller sees the resolved value immediately.
        assert_eq!(record.behavior("count").unwrap().sample(), Value::from(0));

        bumps.push(Value::Unit);
        bumps.push(Value::Unit);
        assert_eq!(record.behavior("count").unwrap().sample(), Value::from(2));
        assert_eq!(
            *seen.borrow(),
            vec![Value::from(0), Value::from(1), Value::from(2)],
            "view wired before resolution sees resolution and every later change once"
        );
    }

    #[test]
    fn render_steps_append_in_call_order() {
        let dom = Dom::new();
        let scope = Scope::new();

        let ordered = feedback(&[], |_, steps| {
            steps.render("first")?;
            steps.render("second")?;
            Ok(OutputRecord::new())
        });

        with_now(|now| ordered.run(&test_ctx(&dom, &scope, now))).unwrap();
        assert_eq!(dom.text_content(dom.root()), "firstsecond");
    }

    #[test]
    fn missing_looped_key_names_it() {
        let dom = Dom::new();
        let scope = Scope::new();

        let broken = feedback(&["value"], |_, _| Ok(OutputRecord::new()));
        let err = with_now(|now| broken.run(&test_ctx(&dom, &scope, now))).unwrap_err();

        assert_eq!(err, Error::MissingLoopKey { name: "value".into() });
    }

    #[test]
    fn looped_stream_consumers_miss_nothing() {
        let dom = Dom::new();
        let scope = Scope::new();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let external = sink_stream::<Value>();

        let events = external.stream();
        let hits_in_view = hits.clone();
        let looped = feedback(&["ticks"], move |inputs, steps| {
            let ticks: Stream<Value> = inputs.stream("ticks")?;
            let hits = hits_in_view.clone();
            steps.render(Component::new(move |ctx| {
                let hits = hits.clone();
                ticks.subscribe(&ctx.scope, move |v: &Value| {
                    hits.borrow_mut().push(v.clone());
                });
                Ok(OutputRecord::new())
            }))?;

            let mut out = OutputRecord::new();
            out.insert("ticks", events.clone())?;
            Ok(out)
        });

        with_now(|now| looped.run(&test_ctx(&dom, &scope, now))).unwrap();

        external.push(Value::from("a"));
        external.push(Value::from("b"));
        assert_eq!(*hits.borrow(), vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn every_mount_is_a_fresh_cycle() {
        let dom = Dom::new();
        let scope = Scope::new();

        let stamped = feedback(&["id"], |_, steps| {
            steps.render("x")?;
            let mut out = OutputRecord::new();
            out.insert("id", eddy_reactive::Behavior::of(Value::from("fresh")))?;
            Ok(out)
        });

        with_now(|now| {
            let ctx = test_ctx(&dom, &scope, now);
            stamped.run(&ctx).unwrap();
            // Mounting the same component again must not trip on the first
            // mount's already-resolved placeholders.
            stamped.run(&ctx)
        })
        .unwrap();

        assert_eq!(dom.text_content(dom.root()), "xx");
    }
}
