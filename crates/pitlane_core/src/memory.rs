//! In-memory document
//!
//! A small element tree implementing [`Document`]. It backs the demos and
//! every page-level test: elements carry a tag, classes, attributes, inline
//! styles, text, and an explicit document-space layout box.

use indexmap::IndexMap;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::document::{Document, ElementId};
use crate::geometry::Rect;
use crate::selector::{ElementSource, SelectorList};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    classes: SmallVec<[String; 4]>,
    attributes: IndexMap<String, String>,
    styles: IndexMap<String, String>,
    content: String,
    bounds: Option<Rect>,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            classes: SmallVec::new(),
            attributes: IndexMap::new(),
            styles: IndexMap::new(),
            content: String::new(),
            bounds: None,
            parent: None,
            children: Vec::new(),
        }
    }
}

/// An element tree held in memory
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: SlotMap<ElementId, Node>,
    root: ElementId,
    head: ElementId,
    body: ElementId,
    style_sheets: Vec<String>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("html"));
        let head = nodes.insert(Node::new("head"));
        let body = nodes.insert(Node::new("body"));

        for child in [head, body] {
            nodes[child].parent = Some(root);
            nodes[root].children.push(child);
        }

        Self {
            nodes,
            root,
            head,
            body,
            style_sheets: Vec::new(),
        }
    }

    /// Start building a new element
    pub fn create(&mut self, tag: &str) -> ElementBuilder<'_> {
        ElementBuilder {
            doc: self,
            node: Node::new(tag),
        }
    }

    /// The `<head>` element
    pub fn head(&self) -> ElementId {
        self.head
    }

    /// Set the layout box of an existing element
    pub fn set_bounds(&mut self, element: ElementId, bounds: Rect) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.bounds = Some(bounds);
        }
    }

    /// Set or overwrite an attribute on an existing element
    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.attributes
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    /// Style sheets appended through [`Document::append_style_sheet`]
    pub fn style_sheets(&self) -> &[String] {
        &self.style_sheets
    }

    /// Number of elements, including `<html>`, `<head>` and `<body>`
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn insert(&mut self, mut node: Node, parent: ElementId) -> ElementId {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            tracing::warn!("MemoryDocument: unknown parent, appending to body");
            self.body
        };
        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        self.nodes[parent].children.push(id);
        id
    }

    /// Descendants of `root` in document (pre-)order, excluding `root`
    fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = match self.nodes.get(root) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return out,
        };

        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.nodes.get(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

impl ElementSource for MemoryDocument {
    fn element_tag(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element).map(|node| node.tag.as_str())
    }

    fn element_attribute(&self, element: ElementId, name: &str) -> Option<&str> {
        let node = self.nodes.get(element)?;
        if name == "class" {
            return None;
        }
        node.attributes.get(name).map(String::as_str)
    }

    fn element_has_class(&self, element: ElementId, class: &str) -> bool {
        self.nodes
            .get(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    fn element_parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element).and_then(|node| node.parent)
    }
}

impl Document for MemoryDocument {
    fn body(&self) -> ElementId {
        self.body
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.element_parent(element)
    }

    fn query_all(&self, selector: &SelectorList) -> Vec<ElementId> {
        self.query_within(self.root, selector)
    }

    fn query_within(&self, root: ElementId, selector: &SelectorList) -> Vec<ElementId> {
        self.descendants(root)
            .into_iter()
            .filter(|&id| selector.matches(self, id))
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let node = self.nodes.get(element)?;
        if name == "class" {
            return (!node.classes.is_empty()).then(|| node.classes.join(" "));
        }
        node.attributes.get(name).cloned()
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element_has_class(element, class)
    }

    fn set_class(&mut self, element: ElementId, class: &str, present: bool) {
        let Some(node) = self.nodes.get_mut(element) else {
            return;
        };
        let existing = node.classes.iter().position(|c| c == class);
        match (existing, present) {
            (None, true) => node.classes.push(class.to_string()),
            (Some(index), false) => {
                node.classes.remove(index);
            }
            _ => {}
        }
    }

    fn inline_style(&self, element: ElementId, property: &str) -> Option<String> {
        self.nodes
            .get(element)
            .and_then(|node| node.styles.get(property).cloned())
    }

    fn set_inline_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.styles.insert(property.to_string(), value.to_string());
        }
    }

    fn text(&self, element: ElementId) -> String {
        self.nodes
            .get(element)
            .map(|node| node.content.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(element) {
            node.content = text.to_string();
        }
    }

    fn inner_html(&self, element: ElementId) -> String {
        self.text(element)
    }

    fn set_inner_html(&mut self, element: ElementId, html: &str) {
        self.set_text(element, html);
    }

    fn bounds(&self, element: ElementId) -> Option<Rect> {
        self.nodes.get(element).and_then(|node| node.bounds)
    }

    fn append_style_sheet(&mut self, css: &str) {
        let style = Node {
            content: css.to_string(),
            ..Node::new("style")
        };
        self.insert(style, self.head);
        self.style_sheets.push(css.to_string());
    }
}

/// Builder for a new element in a [`MemoryDocument`]
pub struct ElementBuilder<'a> {
    doc: &'a mut MemoryDocument,
    node: Node,
}

impl ElementBuilder<'_> {
    /// Set the `id` attribute
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    /// Add a class
    pub fn class(mut self, class: &str) -> Self {
        if !self.node.classes.iter().any(|c| c == class) {
            self.node.classes.push(class.to_string());
        }
        self
    }

    /// Set an attribute
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.node
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    /// Set the text content
    pub fn text(mut self, text: &str) -> Self {
        self.node.content = text.to_string();
        self
    }

    /// Set the document-space layout box
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.node.bounds = Some(bounds);
        self
    }

    /// Insert the element as the last child of `parent`
    pub fn append_to(self, parent: ElementId) -> ElementId {
        self.doc.insert(self.node, parent)
    }
}
