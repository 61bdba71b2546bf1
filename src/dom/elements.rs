//! Element constructors: the authoring surface over the node tree.
//!
//! `div`, `span`, `button` and friends build an [`Element`] description;
//! converting it into a [`Component`] (or using it anywhere a child fits)
//! renders the element, applies its props, renders its children into it,
//! and exposes its outputs. Props can be static values or behaviors;
//! behavior props re-apply on every change for as long as the mount lives.

use std::rc::Rc;

use eddy_reactive::{stepper, Behavior};

use crate::component::{to_component, Child, Component, RenderCtx};
use crate::dom::NodeId;
use crate::error::Result;
use crate::output::{Out, OutputRecord};
use crate::value::Value;

// =============================================================================
// Prop
// =============================================================================

/// A property value: fixed, or following a behavior.
#[derive(Clone)]
pub enum Prop {
    Static(Value),
    Behavior(Behavior<Value>),
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Static(value)
    }
}

impl From<&str> for Prop {
    fn from(value: &str) -> Self {
        Prop::Static(value.into())
    }
}

impl From<String> for Prop {
    fn from(value: String) -> Self {
        Prop::Static(value.into())
    }
}

impl From<f64> for Prop {
    fn from(value: f64) -> Self {
        Prop::Static(value.into())
    }
}

impl From<i32> for Prop {
    fn from(value: i32) -> Self {
        Prop::Static(value.into())
    }
}

impl From<i64> for Prop {
    fn from(value: i64) -> Self {
        Prop::Static(value.into())
    }
}

impl From<bool> for Prop {
    fn from(value: bool) -> Self {
        Prop::Static(value.into())
    }
}

impl From<Behavior<Value>> for Prop {
    fn from(behavior: Behavior<Value>) -> Self {
        Prop::Behavior(behavior)
    }
}

impl From<&Behavior<Value>> for Prop {
    fn from(behavior: &Behavior<Value>) -> Self {
        Prop::Behavior(behavior.clone())
    }
}

// =============================================================================
// Element
// =============================================================================

/// A tag plus its configuration, waiting to be rendered.
///
/// # Example
///
/// ```ignore
/// let field = input().prop("value", "Foo").prop("id", "name");
/// let save = button("Save").output("save", "click");
/// let form = div(children![label("Name: "), field, save]);
/// ```
pub struct Element {
    tag: String,
    props: Vec<(String, Prop)>,
    outputs: Vec<(String, String)>,
    children: Vec<Child>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.into(),
            props: Vec::new(),
            outputs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set a property. Static values apply once at mount; behavior values
    /// apply their current value at mount (deferring while an unresolved
    /// placeholder) and re-apply on every change.
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Prop>) -> Self {
        self.props.push((name.into(), value.into()));
        self
    }

    /// Expose the raw `event` stream under `key` in this element's record.
    ///
    /// Mapping an event explicitly suppresses the default output for that
    /// event, so `.output("save", "click")` on a button replaces the default
    /// `click` entry rather than duplicating it.
    pub fn output(mut self, key: impl Into<String>, event: impl Into<String>) -> Self {
        self.outputs.push((key.into(), event.into()));
        self
    }

    /// Append another child.
    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    fn render(&self, ctx: &RenderCtx) -> Result<OutputRecord> {
        let node = ctx.dom.create_element(&self.tag);
        ctx.dom.append_child(ctx.target, node);

        for (name, prop) in &self.props {
            match prop {
                Prop::Static(value) => ctx.dom.set_prop(node, name, value.clone()),
                Prop::Behavior(behavior) => {
                    if let Some(value) = behavior.try_sample() {
                        ctx.dom.set_prop(node, name, value);
                    }
                    let dom = ctx.dom.clone();
                    let name = name.clone();
                    behavior.subscribe(&ctx.scope, move |value: &Value| {
                        dom.set_prop(node, &name, value.clone());
                    });
                }
            }
        }

        let child_ctx = ctx.at(node);
        let mut record = OutputRecord::new();
        for child in &self.children {
            let child_record = to_component(child.clone()).run(&child_ctx)?;
            record = record.merge(child_record)?;
        }

        let mut own = OutputRecord::new();
        for (key, event) in &self.outputs {
            own.insert(key.clone(), ctx.dom.event_stream(node, event))?;
        }
        for (key, out) in self.default_outputs(ctx, node) {
            own.insert(key, out)?;
        }

        record.merge(own)
    }

    /// Built-in outputs per tag, skipped when an explicit `.output` already
    /// claims the key or maps the event.
    fn default_outputs(&self, ctx: &RenderCtx, node: NodeId) -> Vec<(&'static str, Out)> {
        let taken = |key: &str, event: &str| {
            self.outputs.iter().any(|(k, e)| k == key || e == event)
        };
        match self.tag.as_str() {
            "button" if !taken("click", "click") => {
                vec![("click", Out::Stream(ctx.dom.event_stream(node, "click")))]
            }
            "input" if !taken("inputValue", "input") => {
                let seed = self.seed_value();
                let held = stepper(seed, &ctx.dom.event_stream(node, "input"));
                vec![("inputValue", Out::Behavior(held))]
            }
            _ => Vec::new(),
        }
    }

    /// Initial value for an input's `inputValue`: the `value` prop if set
    /// (sampled when it is a behavior), empty text otherwise.
    fn seed_value(&self) -> Value {
        for (name, prop) in &self.props {
            if name == "value" {
                return match prop {
                    Prop::Static(value) => value.clone(),
                    Prop::Behavior(behavior) => {
                        behavior.try_sample().unwrap_or_else(|| Value::from(""))
                    }
                };
            }
        }
        Value::from("")
    }
}

impl From<Element> for Component {
    fn from(element: Element) -> Component {
        let element = Rc::new(element);
        Component::new(move |ctx| element.render(ctx))
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Child {
        Child::Component(element.into())
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// An element with an arbitrary tag.
pub fn element(tag: &str) -> Element {
    Element::new(tag)
}

pub fn div(children: impl Into<Child>) -> Element {
    Element::new("div").child(children)
}

pub fn span(children: impl Into<Child>) -> Element {
    Element::new("span").child(children)
}

/// A button. Exposes its `click` stream by default.
pub fn button(children: impl Into<Child>) -> Element {
    Element::new("button").child(children)
}

pub fn label(children: impl Into<Child>) -> Element {
    Element::new("label").child(children)
}

pub fn p(children: impl Into<Child>) -> Element {
    Element::new("p").child(children)
}

/// A text input. Exposes `inputValue` by default: a behavior holding the
/// latest `input` event payload, seeded from the `value` prop.
pub fn input() -> Element {
    Element::new("input")
}

// =============================================================================
// Tests
// =============================================================================
