//! # eddy
//!
//! A small reactive component framework in which a component's own output
//! can circle back into its construction.
//!
//! Built on [`eddy_reactive`] for push-based streams, behaviors and
//! placeholders.
//!
//! ## Model
//!
//! A [`Component`] renders nodes under a target and exposes an
//! [`OutputRecord`] of streams and behaviors. Composition merges records
//! disjointly, so what a tree exposes is the union of what its parts
//! expose:
//!
//! ```text
//! Child values → to_component → run(ctx) → nodes + OutputRecord
//! ```
//!
//! Feedback is the interesting part: [`feedback()`] and
//! [`component()`](fn@crate::component) let content consume values that
//! are produced only after they have rendered, by wiring against
//! placeholders that are resolved before the mount returns.
//!
//! ## Example
//!
//! ```ignore
//! let dom = Dom::new();
//! run_component_loop(&dom, dom.root(), &["name"], |inputs, steps| {
//!     let name = inputs.behavior("name")?;
//!     steps.render(div(name))?;
//!     let field = steps.render(input().prop("value", "Foo"))?;
//!     Ok(record! { "name" => field.behavior("inputValue")? })
//! })?;
//! ```
//!
//! ## Modules
//!
//! - [`component`](mod@component) - components, children, composition,
//!   environment
//! - [`dom`] - the in-memory node tree and element constructors
//! - [`dynamic`](mod@dynamic) - time-varying content in an owned region
//! - [`feedback`](mod@feedback) - the loop combinator
//! - [`builder`] - the model/view builder
//! - [`mount`] - mount entry points and the mount handle

pub mod builder;
pub mod component;
pub mod dom;
pub mod dynamic;
pub mod error;
pub mod feedback;
pub mod macros;
pub mod mount;
pub mod output;
pub mod value;

pub use builder::{component, model, view, Model, View};
pub use component::{provide, text, to_component, Child, Component, Env, RenderCtx};
pub use dom::{
    button, div, element, input, label, p, span, Dom, Element, NodeId, NodeKind, Prop,
};
pub use dynamic::dynamic;
pub use error::{Error, Result};
pub use feedback::{feedback, LoopBody};
pub use mount::{
    run_component, run_component_loop, run_component_now, MountHandle, MountPoint,
};
pub use output::{Out, OutputRecord};
pub use value::Value;
