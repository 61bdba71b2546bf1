//! The dynamic renderer: time-varying content kept in sync with the tree.
//!
//! `dynamic` mounts one region node and owns everything inside it. Each
//! value of the content behavior gets a fresh render under a fresh scope;
//! when the behavior changes, the outgoing render's scope is disposed
//! first, then the region is cleared, then the incoming value is rendered.
//! One swap completes before the next starts (the substrate delivers
//! synchronously), and nothing outside the region is ever touched.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{error, trace};

use eddy_reactive::{cloned, with_now, Behavior, Now, Scope};

use crate::component::{to_component, Child, Component, Env, RenderCtx};
use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::output::OutputRecord;

/// Render content that changes over time.
///
/// Accepts anything child-like. Static children render once; a behavior of
/// children is mounted into a region and re-rendered on every change. A
/// behavior with no current value yet (the view of an unresolved
/// placeholder) renders nothing at mount; the resolution's first delivery
/// renders in the same turn.
///
/// The inner content's outputs are not exposed; `dynamic` returns an empty
/// record. Swap-time render failures cannot propagate to any caller, so
/// they are logged and the next swap starts from a cleared region.
///
/// # Example
///
/// ```ignore
/// let tab = sink_behavior(Child::from(overview_page()));
/// let body = div(children![header(), dynamic(tab.behavior())]);
/// // later: tab.push(Child::from(settings_page()));
/// ```
pub fn dynamic(content: impl Into<Child>) -> Component {
    match content.into() {
        Child::Behavior(behavior) => dynamic_region(behavior),
        other => to_component(other),
    }
}

fn dynamic_region(behavior: Behavior<Child>) -> Component {
    Component::new(move |ctx| {
        let region = ctx.dom.create_region();
        ctx.dom.append_child(ctx.target, region);

        // The scope of whatever is currently rendered in the region. Swaps
        // replace it; unmount disposes it through the cleanup below.
        let slot: Rc<RefCell<Option<Scope>>> = Rc::new(RefCell::new(None));
        ctx.scope.on_dispose(cloned!(slot => move || {
            // Drop the borrow before disposing: teardown may re-enter.
            let current = slot.borrow_mut().take();
            if let Some(scope) = current {
                scope.dispose();
            }
        }));

        if let Some(child) = behavior.try_sample() {
            let fresh = Scope::new();
            *slot.borrow_mut() = Some(fresh.clone());
            render_into(&ctx.dom, region, &ctx.env, &fresh, ctx.now, child)?;
        }

        let dom = ctx.dom.clone();
        let env = ctx.env.clone();
        behavior.subscribe(
            &ctx.scope,
            cloned!(slot => move |child: &Child| {
                let outgoing = slot.borrow_mut().take();
                if let Some(old) = outgoing {
                    old.dispose();
                }
                dom.remove_children(region);

                let fresh = Scope::new();
                *slot.borrow_mut() = Some(fresh.clone());
                let rendered = with_now(|now| {
                    render_into(&dom, region, &env, &fresh, now, child.clone())
                });
                match rendered {
                    Ok(_) => trace!(?region, "dynamic content swapped"),
                    Err(err) => error!(%err, ?region, "dynamic swap failed"),
                }
            }),
        );

        Ok(OutputRecord::new())
    })
}

fn render_into(
    dom: &Dom,
    region: NodeId,
    env: &Env,
    scope: &Scope,
    now: Now,
    child: Child,
) -> Result<OutputRecord> {
    let ctx = RenderCtx {
        dom: dom.clone(),
        target: region,
        scope: scope.clone(),
        env: env.clone(),
        now,
    };
    to_component(child).run(&ctx)
}
