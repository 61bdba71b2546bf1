//! The in-memory node tree components render into.
//!
//! Nodes live in a slotmap arena behind a cloneable [`Dom`] handle, so ids
//! stay cheap to copy and a removed subtree invalidates its ids instead of
//! leaving dangling pointers. Operations on stale ids are no-ops and reads
//! return nothing, which keeps teardown order forgiving.
//!
//! Three node kinds exist: elements (tagged, with props), text, and regions.
//! A region is an anonymous container owned by the dynamic renderer; tree
//! queries treat it as transparent, so swapping content inside a region never
//! changes what siblings outside it observe.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use indexmap::IndexMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use eddy_reactive::{SinkStream, Stream};

use crate::value::Value;

new_key_type! {
    /// Handle to a node in the arena.
    pub struct NodeId;
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element { tag: String },
    Text { content: String },
    Region,
}

struct NodeData {
    kind: NodeKind,
    props: IndexMap<String, Value>,
    children: SmallVec<[NodeId; 4]>,
    /// Per-event sinks, created lazily on first interest.
    events: IndexMap<String, SinkStream<Value>>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            props: IndexMap::new(),
            children: SmallVec::new(),
            events: IndexMap::new(),
        }
    }
}

struct DomInner {
    nodes: SlotMap<NodeId, NodeData>,
    root: NodeId,
}

impl DomInner {
    fn collect_children(&self, id: NodeId, elements_only: bool, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(id) else { return };
        for &child in &node.children {
            match self.nodes.get(child).map(|data| &data.kind) {
                Some(NodeKind::Region) => self.collect_children(child, elements_only, out),
                Some(NodeKind::Text { .. }) if elements_only => {}
                Some(_) => out.push(child),
                None => {}
            }
        }
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else { return };
        match &node.kind {
            NodeKind::Text { content } => out.push_str(content),
            NodeKind::Element { .. } | NodeKind::Region => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    fn find_by_id(&self, id: NodeId, wanted: &str) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if let Some(Value::Str(value)) = node.props.get("id") {
            if value == wanted {
                return Some(id);
            }
        }
        node.children
            .iter()
            .find_map(|&child| self.find_by_id(child, wanted))
    }

    fn remove_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(id) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    fn write_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else { return };
        for _ in 0..depth {
            out.push_str("  ");
        }
        match &node.kind {
            NodeKind::Element { tag } => {
                out.push_str(tag);
                for (name, value) in &node.props {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
            }
            NodeKind::Text { content } => {
                let _ = write!(out, "\"{content}\"");
            }
            NodeKind::Region => out.push_str("[region]"),
        }
        out.push('\n');
        for &child in &node.children {
            self.write_node(child, depth + 1, out);
        }
    }
}

/// Cloneable handle to the node tree.
#[derive(Clone)]
pub struct Dom {
    inner: Rc<RefCell<DomInner>>,
}

impl Dom {
    /// An empty tree with a single root element.
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(NodeData::new(NodeKind::Element { tag: "root".into() }));
        Self { inner: Rc::new(RefCell::new(DomInner { nodes, root })) }
    }

    pub fn root(&self) -> NodeId {
        self.inner.borrow().root
    }

    pub fn create_element(&self, tag: &str) -> NodeId {
        self.inner
            .borrow_mut()
            .nodes
            .insert(NodeData::new(NodeKind::Element { tag: tag.into() }))
    }

    pub fn create_text(&self, content: &str) -> NodeId {
        self.inner
            .borrow_mut()
            .nodes
            .insert(NodeData::new(NodeKind::Text { content: content.into() }))
    }

    pub fn create_region(&self) -> NodeId {
        self.inner.borrow_mut().nodes.insert(NodeData::new(NodeKind::Region))
    }

    /// Append `child` to `parent`'s child list. No-op if either id is stale.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        let mut inner = self.inner.borrow_mut();
        if !inner.nodes.contains_key(child) {
            return;
        }
        if let Some(node) = inner.nodes.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Remove every child of `parent` and free their subtrees. The ids of
    /// removed nodes become stale; their event sinks are dropped.
    pub fn remove_children(&self, parent: NodeId) {
        let mut inner = self.inner.borrow_mut();
        let children = match inner.nodes.get_mut(parent) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            inner.remove_subtree(child);
        }
    }

    pub fn set_prop(&self, node: NodeId, name: &str, value: impl Into<Value>) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(node) {
            data.props.insert(name.into(), value.into());
        }
    }

    pub fn prop(&self, node: NodeId, name: &str) -> Option<Value> {
        self.inner.borrow().nodes.get(node)?.props.get(name).cloned()
    }

    /// Replace the content of a text node. No-op on elements and regions.
    pub fn set_text(&self, node: NodeId, content: &str) {
        if let Some(data) = self.inner.borrow_mut().nodes.get_mut(node) {
            if let NodeKind::Text { content: current } = &mut data.kind {
                current.clear();
                current.push_str(content);
            }
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<String> {
        match &self.inner.borrow().nodes.get(node)?.kind {
            NodeKind::Element { tag } => Some(tag.clone()),
            _ => None,
        }
    }

    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        Some(self.inner.borrow().nodes.get(node)?.kind.clone())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.inner.borrow().nodes.contains_key(node)
    }

    /// All structural children of `node`, in order, with regions flattened
    /// into their contents.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.inner.borrow().collect_children(node, false, &mut out);
        out
    }

    /// Like [`children`](Self::children) but elements only.
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.inner.borrow().collect_children(node, true, &mut out);
        out
    }

    /// Concatenated text of `node`'s subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.inner.borrow().collect_text(node, &mut out);
        out
    }

    /// Resolve a `"#id"` selector against the `id` prop, depth-first from the
    /// root. Any other selector shape resolves to nothing.
    pub fn select(&self, selector: &str) -> Option<NodeId> {
        let id = selector.strip_prefix('#')?;
        let inner = self.inner.borrow();
        inner.find_by_id(inner.root, id)
    }

    /// The stream of `event` occurrences on `node`. Created lazily; a stale
    /// id yields a stream that never fires.
    pub fn event_stream(&self, node: NodeId, event: &str) -> Stream<Value> {
        let mut inner = self.inner.borrow_mut();
        match inner.nodes.get_mut(node) {
            Some(data) => data
                .events
                .entry(event.into())
                .or_insert_with(SinkStream::new)
                .stream(),
            None => Stream::never(),
        }
    }

    /// Fire `event` on `node` with `value` as the payload. Delivery is
    /// synchronous; no-op when the node is stale or nobody ever asked for
    /// this event's stream.
    pub fn dispatch(&self, node: NodeId, event: &str, value: impl Into<Value>) {
        let sink = {
            let inner = self.inner.borrow();
            inner
                .nodes
                .get(node)
                .and_then(|data| data.events.get(event))
                .cloned()
        };
        // The borrow is released before delivery so handlers can touch the
        // tree.
        if let Some(sink) = sink {
            sink.push(value.into());
        }
    }

    /// Indented rendering of the whole tree, for debugging and tests.
    pub fn dump(&self) -> String {
        let inner = self.inner.borrow();
        let mut out = String::new();
        inner.write_node(inner.root, 0, &mut out);
        out
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use eddy_reactive::Scope;

    #[test]
    fn append_and_query() {
        let dom = Dom::new();
        let div = dom.create_element("div");
        let hello = dom.create_text("Hello");
        dom.append_child(dom.root(), div);
        dom.append_child(div, hello);

        assert_eq!(dom.tag(div).as_deref(), Some("div"));
        assert_eq!(dom.kind(hello), Some(NodeKind::Text { content: "Hello".into() }));
        assert_eq!(dom.children(dom.root()), vec![div]);
        assert_eq!(dom.text_content(div), "Hello");
    }

    #[test]
    fn regions_are_transparent_to_queries() {
        let dom = Dom::new();
        let before = dom.create_element("span");
        let region = dom.create_region();
        let inside = dom.create_element("div");
        let after = dom.create_element("button");
        dom.append_child(dom.root(), before);
        dom.append_child(dom.root(), region);
        dom.append_child(dom.root(), after);
        dom.append_child(region, inside);

        assert_eq!(dom.element_children(dom.root()), vec![before, inside, after]);

        dom.remove_children(region);
        assert_eq!(dom.element_children(dom.root()), vec![before, after]);
    }

    #[test]
    fn element_children_skips_text() {
        let dom = Dom::new();
        let div = dom.create_element("div");
        let txt = dom.create_text("between");
        let span = dom.create_element("span");
        dom.append_child(dom.root(), div);
        dom.append_child(dom.root(), txt);
        dom.append_child(dom.root(), span);

        assert_eq!(dom.element_children(dom.root()), vec![div, span]);
        assert_eq!(dom.children(dom.root()), vec![div, txt, span]);
    }

    #[test]
    fn removed_subtree_ids_go_stale() {
        let dom = Dom::new();
        let div = dom.create_element("div");
        let inner = dom.create_text("gone");
        dom.append_child(dom.root(), div);
        dom.append_child(div, inner);

        dom.remove_children(dom.root());

        assert!(!dom.contains(div));
        assert!(!dom.contains(inner));
        // Stale ids are inert.
        dom.set_text(inner, "resurrected");
        dom.append_child(dom.root(), div);
        assert_eq!(dom.children(dom.root()), Vec::new());
    }

    #[test]
    fn set_text_updates_in_place() {
        let dom = Dom::new();
        let txt = dom.create_text("old");
        dom.append_child(dom.root(), txt);

        dom.set_text(txt, "new");
        assert_eq!(dom.text_content(dom.root()), "new");
    }

    #[test]
    fn select_finds_by_id_prop() {
        let dom = Dom::new();
        let outer = dom.create_element("div");
        let target = dom.create_element("div");
        dom.set_prop(target, "id", "app");
        dom.append_child(dom.root(), outer);
        dom.append_child(outer, target);

        assert_eq!(dom.select("#app"), Some(target));
        assert_eq!(dom.select("#missing"), None);
        assert_eq!(dom.select("app"), None, "only #id selectors resolve");
    }

    #[test]
    fn dispatch_reaches_event_stream() {
        let scope = Scope::new();
        let dom = Dom::new();
        let button = dom.create_element("button");
        dom.append_child(dom.root(), button);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        dom.event_stream(button, "click")
            .subscribe(&scope, move |v: &Value| seen_clone.borrow_mut().push(v.clone()));

        dom.dispatch(button, "click", ());
        dom.dispatch(button, "keydown", "x"); // nobody listening, no-op

        assert_eq!(*seen.borrow(), vec![Value::Unit]);
    }

    #[test]
    fn handlers_may_touch_the_tree_during_dispatch() {
        let scope = Scope::new();
        let dom = Dom::new();
        let button = dom.create_element("button");
        dom.append_child(dom.root(), button);

        let dom_clone = dom.clone();
        let root = dom.root();
        dom.event_stream(button, "click").subscribe(&scope, move |_: &Value| {
            let added = dom_clone.create_element("span");
            dom_clone.append_child(root, added);
        });

        dom.dispatch(button, "click", ());
        assert_eq!(dom.element_children(dom.root()).len(), 2);
    }

    #[test]
    fn dump_renders_the_structure() {
        let dom = Dom::new();
        let div = dom.create_element("div");
        dom.set_prop(div, "id", "app");
        let txt = dom.create_text("hi");
        dom.append_child(dom.root(), div);
        dom.append_child(div, txt);

        let rendered = dom.dump();
        assert_eq!(rendered, "root\n  div id=\"app\"\n    \"hi\"\n");
    }
}
