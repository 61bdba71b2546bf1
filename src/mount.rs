//! Mounting: running a component against a live tree.
//!
//! `run_component` enters a turn, renders the root under a fresh scope and
//! hands back a [`MountHandle`] owning that scope. Everything the mount
//! subscribed is released when the handle unmounts (or is dropped); the
//! rendered nodes are removed on `unmount` only, matching the difference
//! between tearing a UI down and merely letting its driver go.

use tracing::debug;

use eddy_reactive::{with_now, Scope};

use crate::component::{to_component, Child, Env, RenderCtx};
use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};
use crate::feedback::{feedback, LoopBody};
use crate::output::OutputRecord;

/// Where to mount: a `"#id"` selector or a node id.
pub enum MountPoint {
    Selector(String),
    Node(NodeId),
}

impl From<&str> for MountPoint {
    fn from(selector: &str) -> Self {
        MountPoint::Selector(selector.into())
    }
}

impl From<String> for MountPoint {
    fn from(selector: String) -> Self {
        MountPoint::Selector(selector)
    }
}

impl From<NodeId> for MountPoint {
    fn from(node: NodeId) -> Self {
        MountPoint::Node(node)
    }
}

/// Handle to a running mount.
///
/// Owns the mount's root scope. [`unmount`](MountHandle::unmount) disposes
/// the scope and removes the rendered children; dropping the handle
/// disposes the scope only, leaving the nodes in place.
pub struct MountHandle {
    dom: Dom,
    target: NodeId,
    scope: Scope,
}

impl MountHandle {
    /// Whether the mount's subscriptions are still live.
    pub fn is_mounted(&self) -> bool {
        self.scope.is_active()
    }

    /// The node the component was rendered under.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Tear the mount down: release every subscription registered while
    /// rendering, then remove the rendered children from the tree.
    pub fn unmount(self) {
        self.scope.dispose();
        self.dom.remove_children(self.target);
        debug!(target = ?self.target, "component unmounted");
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}

/// Mount `root` under `target` and discard its outputs.
///
/// # Example
///
/// ```ignore
/// let dom = Dom::new();
/// let handle = run_component(&dom, dom.root(), div("Hello"))?;
/// // ...
/// handle.unmount();
/// ```
pub fn run_component(
    dom: &Dom,
    target: impl Into<MountPoint>,
    root: impl Into<Child>,
) -> Result<MountHandle> {
    let (_, handle) = mount(dom, resolve(dom, target.into())?, root.into())?;
    Ok(handle)
}

/// Mount `root` and surface its output record alongside the handle.
pub fn run_component_now(
    dom: &Dom,
    target: impl Into<MountPoint>,
    root: impl Into<Child>,
) -> Result<(OutputRecord, MountHandle)> {
    mount(dom, resolve(dom, target.into())?, root.into())
}

/// Mount a raw feedback body: `feedback(names, body)` wired and run in one
/// step.
pub fn run_component_loop<B>(
    dom: &Dom,
    target: impl Into<MountPoint>,
    names: &[&str],
    body: B,
) -> Result<MountHandle>
where
    B: Fn(&OutputRecord, &mut LoopBody) -> Result<OutputRecord> + 'static,
{
    run_component(dom, target, feedback(names, body))
}

fn resolve(dom: &Dom, target: MountPoint) -> Result<NodeId> {
    match target {
        MountPoint::Node(node) if dom.contains(node) => Ok(node),
        MountPoint::Node(node) => {
            Err(Error::TargetNotFound { selector: format!("{node:?}") })
        }
        MountPoint::Selector(selector) => dom
            .select(&selector)
            .ok_or(Error::TargetNotFound { selector }),
    }
}

fn mount(dom: &Dom, target: NodeId, root: Child) -> Result<(OutputRecord, MountHandle)> {
    let scope = Scope::new();
    let record = with_now(|now| {
        let ctx = RenderCtx {
            dom: dom.clone(),
            target,
            scope: scope.clone(),
            env: Env::new(),
            now,
        };
        to_component(root).run(&ctx)
    })?;
    debug!(?target, "component mounted");
    Ok((record, MountHandle { dom: dom.clone(), target, scope }))
}
