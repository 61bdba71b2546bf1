//! Components and their composition.
//!
//! A [`Component`] is a recipe: run it against a render context and it
//! appends nodes under the context's target, registers whatever
//! subscriptions it needs in the context's scope, and hands back an
//! [`OutputRecord`] describing the reactive values it exposes. Running is
//! the only time anything happens; the values themselves are inert and
//! cheap to clone, so the same component can be mounted many times.
//!
//! Composition is `and`: run both against the same target, in order, and
//! merge their records disjointly. Anything child-like (strings, numbers,
//! behaviors, components, lists) converts into [`Child`] and normalizes
//! through [`to_component`].

use std::rc::Rc;

use indexmap::IndexMap;

use eddy_reactive::{Behavior, Now, Placeholder, Scope};

use crate::dom::{Dom, NodeId};
use crate::dynamic::dynamic;
use crate::error::Result;
use crate::output::OutputRecord;
use crate::value::Value;

// =============================================================================
// Environment
// =============================================================================

/// Immutable map of named values flowing down the tree.
///
/// Extension copies the map, so a subtree's additions are invisible to its
/// siblings and its ancestors.
#[derive(Clone, Default)]
pub struct Env {
    entries: Rc<IndexMap<String, Value>>,
}

impl Env {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// A copy of this environment with `key` set.
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Env {
        let mut entries = (*self.entries).clone();
        entries.insert(key.into(), value.into());
        Env { entries: Rc::new(entries) }
    }
}

// =============================================================================
// Render context
// =============================================================================

/// Everything a component needs while rendering: the tree, the node to
/// append under, the scope that will own its subscriptions, the ambient
/// environment, and the turn token.
#[derive(Clone)]
pub struct RenderCtx {
    pub dom: Dom,
    pub target: NodeId,
    pub scope: Scope,
    pub env: Env,
    pub now: Now,
}

impl RenderCtx {
    /// This context retargeted at another node.
    pub fn at(&self, target: NodeId) -> RenderCtx {
        RenderCtx { target, ..self.clone() }
    }

    /// This context with subscriptions owned by `scope` instead.
    pub fn scoped(&self, scope: Scope) -> RenderCtx {
        RenderCtx { scope, ..self.clone() }
    }

    /// This context with a different environment.
    pub fn with_env(&self, env: Env) -> RenderCtx {
        RenderCtx { env, ..self.clone() }
    }
}

// =============================================================================
// Component
// =============================================================================

/// A renderable unit: `(target, environment) -> output record`.
///
/// Appending nodes under the context's target is the only side effect a
/// well-behaved component has. Composing components never mutates either
/// operand.
///
/// # Example
///
/// ```ignore
/// let row = to_component(span("label: ")).and(button("go"));
/// let (outputs, _mount) = run_component_now(&dom, dom.root(), row)?;
/// let clicks = outputs.stream("click")?;
/// ```
#[derive(Clone)]
pub struct Component {
    run: Rc<dyn Fn(&RenderCtx) -> Result<OutputRecord>>,
}

impl Component {
    pub fn new(f: impl Fn(&RenderCtx) -> Result<OutputRecord> + 'static) -> Self {
        Self { run: Rc::new(f) }
    }

    /// Renders nothing, exposes nothing.
    pub fn empty() -> Self {
        Self::new(|_| Ok(OutputRecord::new()))
    }

    /// Render into `ctx`.
    pub fn run(&self, ctx: &RenderCtx) -> Result<OutputRecord> {
        (self.run)(ctx)
    }

    /// Sequential composition: render `self`, then `next`, against the same
    /// target, and expose the disjoint union of both records. A key present
    /// in both is [`Error::DuplicateKey`](crate::Error::DuplicateKey).
    pub fn and(&self, next: impl Into<Child>) -> Component {
        let first = self.clone();
        let second = to_component(next);
        Component::new(move |ctx| {
            let left = first.run(ctx)?;
            let right = second.run(ctx)?;
            left.merge(right)
        })
    }
}

// =============================================================================
// Child
// =============================================================================

/// The closed union of things that can appear in a child position.
///
/// `From` impls cover the common literals, so APIs take `impl Into<Child>`
/// and callers write strings, numbers, behaviors, elements or lists
/// directly.
#[derive(Clone)]
pub enum Child {
    /// Fixed text.
    Text(String),
    /// Text that follows a behavior, updated in place in one text node.
    DynText(Behavior<Value>),
    Component(Component),
    /// Time-varying content, rendered through the dynamic renderer.
    Behavior(Behavior<Child>),
    List(Vec<Child>),
}

impl From<&str> for Child {
    fn from(content: &str) -> Self {
        Child::Text(content.into())
    }
}

impl From<String> for Child {
    fn from(content: String) -> Self {
        Child::Text(content)
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Text(Value::from(n).to_string())
    }
}

impl From<i32> for Child {
    fn from(n: i32) -> Self {
        Child::Text(Value::from(n).to_string())
    }
}

impl From<i64> for Child {
    fn from(n: i64) -> Self {
        Child::Text(Value::from(n).to_string())
    }
}

impl From<Component> for Child {
    fn from(component: Component) -> Self {
        Child::Component(component)
    }
}

impl From<Behavior<Value>> for Child {
    fn from(behavior: Behavior<Value>) -> Self {
        Child::DynText(behavior)
    }
}

impl From<&Behavior<Value>> for Child {
    fn from(behavior: &Behavior<Value>) -> Self {
        Child::DynText(behavior.clone())
    }
}

impl From<Behavior<Child>> for Child {
    fn from(behavior: Behavior<Child>) -> Self {
        Child::Behavior(behavior)
    }
}

impl From<Behavior<Component>> for Child {
    fn from(behavior: Behavior<Component>) -> Self {
        Child::Behavior(behavior.map(|c| Child::Component(c.clone())))
    }
}

impl From<Placeholder<Value>> for Child {
    fn from(placeholder: Placeholder<Value>) -> Self {
        Child::DynText(placeholder.behavior())
    }
}

impl From<&Placeholder<Value>> for Child {
    fn from(placeholder: &Placeholder<Value>) -> Self {
        Child::DynText(placeholder.behavior())
    }
}

impl From<Placeholder<Child>> for Child {
    fn from(placeholder: Placeholder<Child>) -> Self {
        Child::Behavior(placeholder.behavior())
    }
}

impl<C: Into<Child>> From<Vec<C>> for Child {
    fn from(items: Vec<C>) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl<C: Into<Child>, const N: usize> From<[C; N]> for Child {
    fn from(items: [C; N]) -> Self {
        Child::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<()> for Child {
    fn from(_: ()) -> Self {
        Child::List(Vec::new())
    }
}

// =============================================================================
// Normalization and lifts
// =============================================================================

/// Normalize anything child-like into a [`Component`]. The single place
/// where the `Child` union is interpreted:
///
/// - text renders one text node and exposes nothing;
/// - a behavior of text renders one text node updated in place;
/// - a behavior of children goes through [`dynamic`];
/// - a list folds left over [`Component::and`]; the empty list is
///   [`Component::empty`].
pub fn to_component(child: impl Into<Child>) -> Component {
    match child.into() {
        Child::Text(content) => text_node(content),
        Child::DynText(behavior) => dyn_text_node(behavior),
        Child::Component(component) => component,
        Child::Behavior(behavior) => dynamic(behavior),
        Child::List(items) => items
            .into_iter()
            .fold(Component::empty(), |acc, item| acc.and(item)),
    }
}

/// Lift text-like content into a component. `text("Hello")` and
/// `text(200)` render one text node; `text(behavior)` renders one text
/// node that follows the behavior.
pub fn text(content: impl Into<Child>) -> Component {
    to_component(content)
}

/// Make `key = value` visible in the environment of `child`'s subtree.
pub fn provide(
    key: impl Into<String>,
    value: impl Into<Value>,
    child: impl Into<Child>,
) -> Component {
    let key = key.into();
    let value = value.into();
    let inner = to_component(child);
    Component::new(move |ctx| {
        let env = ctx.env.with(key.clone(), value.clone());
        inner.run(&ctx.with_env(env))
    })
}

fn text_node(content: String) -> Component {
    Component::new(move |ctx| {
        let node = ctx.dom.create_text(&content);
        ctx.dom.append_child(ctx.target, node);
        Ok(OutputRecord::new())
    })
}

fn dyn_text_node(behavior: Behavior<Value>) -> Component {
    Component::new(move |ctx| {
        // No current value yet (unresolved placeholder view): start empty,
        // the resolution's delivery fills it in.
        let initial = behavior
            .try_sample()
            .map(|value| value.to_string())
            .unwrap_or_default();
        let node = ctx.dom.create_text(&initial);
        ctx.dom.append_child(ctx.target, node);

        let dom = ctx.dom.clone();
        behavior.subscribe(&ctx.scope, move |value: &Value| {
            dom.set_text(node, &value.to_string());
        });
        Ok(OutputRecord::new())
    })
}

// =============================================================================
// Tests
// =============================================================================
