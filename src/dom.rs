//! Headless document the views render into.
//!
//! Markup is parsed with `scraper` into a small owned node tree so that a mounted
//! fragment can be patched in place, then serialized back with `html-escape`.

use scraper::{ElementRef, Html};
use std::collections::HashMap;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Sorted by attribute name
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, current)) => *current = value.to_string(),
            None => {
                self.attrs.push((name.to_string(), value.to_string()));
                self.attrs.sort();
            }
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Text held directly by this element, ignoring descendants
    pub fn direct_text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

/// Parse an HTML fragment into owned nodes
pub fn parse_fragment(markup: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(markup);
    convert_children(fragment.root_element())
}

fn convert_children(element: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in element.children() {
        match child.value() {
            scraper::Node::Text(text) => nodes.push(Node::Text(String::from(&**text))),
            scraper::Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    nodes.push(Node::Element(convert_element(child)));
                }
            }
            _ => {}
        }
    }
    nodes
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut attrs: Vec<(String, String)> = value
        .attrs()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    attrs.sort();

    Element {
        name: value.name().to_string(),
        attrs,
        children: convert_children(element),
    }
}

pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&element.name.as_str()) {
                return;
            }
            for child in &element.children {
                write_node(child, out);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
        }
    }
}

fn same_shape(old: &[Node], new: &[Node]) -> bool {
    old.len() == new.len()
        && old.iter().zip(new).all(|pair| match pair {
            (Node::Text(_), Node::Text(_)) => true,
            (Node::Element(a), Node::Element(b)) => {
                a.name == b.name && same_shape(&a.children, &b.children)
            }
            _ => false,
        })
}

/// Copy text and attributes from `new` onto the positionally matching nodes of
/// `old`. Both trees must have the same shape.
fn patch(old: &mut [Node], new: &[Node], patched: &mut usize) {
    for pair in old.iter_mut().zip(new) {
        match pair {
            (Node::Text(old), Node::Text(new)) => {
                if old != new {
                    *old = new.clone();
                }
            }
            (Node::Element(old), Node::Element(new)) => {
                if old == new {
                    continue;
                }
                let mut changed = old.direct_text() != new.direct_text();
                if old.attrs != new.attrs {
                    old.attrs = new.attrs.clone();
                    changed = true;
                }
                patch(&mut old.children, &new.children, patched);
                if changed {
                    *patched += 1;
                }
            }
            _ => {}
        }
    }
}

/// What a mount is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MountStatus {
    #[default]
    Empty,
    Spinner,
    Content,
    Error,
    Message,
}

/// How `Mount::reconcile` applied new markup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// Same shape; this many elements had text or attributes overwritten
    Patched(usize),
    /// Shape changed or nothing was mounted; the fragment was swapped wholesale
    Replaced,
}

/// A container in the document holding one rendered fragment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mount {
    nodes: Vec<Node>,
    status: MountStatus,
}

impl Mount {
    pub fn status(&self) -> MountStatus {
        self.status
    }

    /// Replace the content with `markup`
    pub fn replace(&mut self, markup: &str, status: MountStatus) {
        self.nodes = parse_fragment(markup);
        self.status = status;
    }

    /// Bring the mounted content in line with `markup`, patching in place
    /// when the element trees line up position by position.
    pub fn reconcile(&mut self, markup: &str) -> Reconciliation {
        let new = parse_fragment(markup);
        if self.status == MountStatus::Content && same_shape(&self.nodes, &new) {
            let mut patched = 0;
            patch(&mut self.nodes, &new, &mut patched);
            Reconciliation::Patched(patched)
        } else {
            self.nodes = new;
            self.status = MountStatus::Content;
            Reconciliation::Replaced
        }
    }

    pub fn inner_html(&self) -> String {
        serialize(&self.nodes)
    }

    /// Visible text with runs of whitespace collapsed
    pub fn text_content(&self) -> String {
        let mut raw = String::new();
        collect_text(&self.nodes, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// All elements in document order, each with the index of its parent element
    fn flatten(&self) -> Vec<(Option<usize>, &Element)> {
        fn walk<'a>(
            nodes: &'a [Node],
            parent: Option<usize>,
            out: &mut Vec<(Option<usize>, &'a Element)>,
        ) {
            for node in nodes {
                if let Node::Element(element) = node {
                    let index = out.len();
                    out.push((parent, element));
                    walk(&element.children, Some(index), out);
                }
            }
        }

        let mut out = Vec::new();
        walk(&self.nodes, None, &mut out);
        out
    }

    pub fn element(&self, index: usize) -> Option<&Element> {
        self.flatten().get(index).map(|(_, element)| *element)
    }

    /// Index of the first element carrying `class`
    pub fn find(&self, class: &str) -> Option<usize> {
        self.flatten()
            .iter()
            .position(|(_, element)| element.has_class(class))
    }

    pub fn find_all(&self, class: &str) -> Vec<usize> {
        self.flatten()
            .iter()
            .enumerate()
            .filter(|(_, (_, element))| element.has_class(class))
            .map(|(index, _)| index)
            .collect()
    }

    /// The element at `index` or its nearest ancestor carrying `class`
    pub fn closest(&self, index: usize, class: &str) -> Option<&Element> {
        let elements = self.flatten();
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            let (parent, element) = elements.get(i)?;
            if element.has_class(class) {
                return Some(element);
            }
            cursor = *parent;
        }
        None
    }

    /// Set the `value` of the named form control
    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        fn walk(nodes: &mut [Node], name: &str, value: &str) -> bool {
            for node in nodes {
                if let Node::Element(element) = node {
                    if element.attr("name") == Some(name) {
                        element.set_attr("value", value);
                        return true;
                    }
                    if walk(&mut element.children, name, value) {
                        return true;
                    }
                }
            }
            false
        }
        walk(&mut self.nodes, name, value)
    }

    /// Named `input` values in document order
    pub fn form_data(&self) -> FormData {
        let mut form = FormData::default();
        for (_, element) in self.flatten() {
            if element.name != "input" {
                continue;
            }
            if let Some(name) = element.attr("name") {
                form.push(name, element.attr("value").unwrap_or_default());
            }
        }
        form
    }
}

/// Ordered form fields, like the browser's `FormData`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Overwrite the first field named `name`, appending it when absent
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, current)) => *current = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Named containers of the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    /// `.recipe`
    Recipe,
    /// `.search` form
    Search,
    /// `.results`
    Results,
    /// `.pagination`
    Pagination,
    /// `.bookmarks__list`
    Bookmarks,
    /// `.nav`, holds the add-recipe button
    Nav,
    /// `.add-recipe-window` chrome around the upload form
    Window,
    /// `.overlay`
    Overlay,
    /// `.upload` form
    Upload,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::Recipe,
        Region::Search,
        Region::Results,
        Region::Pagination,
        Region::Bookmarks,
        Region::Nav,
        Region::Window,
        Region::Overlay,
        Region::Upload,
    ];

    pub fn selector(self) -> &'static str {
        match self {
            Region::Recipe => ".recipe",
            Region::Search => ".search",
            Region::Results => ".results",
            Region::Pagination => ".pagination",
            Region::Bookmarks => ".bookmarks__list",
            Region::Nav => ".nav",
            Region::Window => ".add-recipe-window",
            Region::Overlay => ".overlay",
            Region::Upload => ".upload",
        }
    }
}

/// Raw events raised by the document
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Page finished loading
    Load,
    /// The location hash changed
    HashChange,
    /// A form inside `region` was submitted
    Submit { region: Region },
    /// Element `target` (document order inside the region) was clicked;
    /// `None` means the container itself
    Click {
        region: Region,
        target: Option<usize>,
    },
}

/// The page: mounts, location hash and modal visibility
#[derive(Debug, Clone)]
pub struct Document {
    mounts: HashMap<Region, Mount>,
    hash: String,
    modal_hidden: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut document = Self {
            mounts: Region::ALL
                .iter()
                .map(|region| (*region, Mount::default()))
                .collect(),
            hash: String::new(),
            modal_hidden: true,
        };
        document.mount_mut(Region::Search).replace(
            r#"<input type="text" class="search__field" name="query" placeholder="Search over 1,000,000 recipes..." value=""><button class="btn search__btn"><span>Search</span></button>"#,
            MountStatus::Content,
        );
        document.mount_mut(Region::Nav).replace(
            r#"<ul class="nav__list"><li class="nav__item"><button class="nav__btn nav__btn--add-recipe"><span>Add recipe</span></button></li></ul>"#,
            MountStatus::Content,
        );
        document.mount_mut(Region::Window).replace(
            r#"<button class="btn--close-modal">&times;</button>"#,
            MountStatus::Content,
        );
        document
    }

    pub fn mount(&self, region: Region) -> &Mount {
        // every region is inserted in `new`
        &self.mounts[&region]
    }

    pub fn mount_mut(&mut self, region: Region) -> &mut Mount {
        self.mounts.entry(region).or_default()
    }

    /// Location hash without the leading `#`
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Navigate to `#id`; returns the event the browser would fire
    pub fn set_hash(&mut self, id: &str) -> UiEvent {
        self.hash = id.trim_start_matches('#').to_string();
        UiEvent::HashChange
    }

    /// Rewrite the hash without firing a change, like `history.pushState`
    pub fn push_hash(&mut self, id: &str) {
        self.hash = id.trim_start_matches('#').to_string();
    }

    pub fn modal_hidden(&self) -> bool {
        self.modal_hidden
    }

    pub fn toggle_modal(&mut self) {
        self.modal_hidden = !self.modal_hidden;
    }

    /// Type into a named input inside `region`
    pub fn fill(&mut self, region: Region, name: &str, value: &str) -> bool {
        self.mount_mut(region).set_value(name, value)
    }

    /// A click on the first element carrying `class` inside `region`
    pub fn click(&self, region: Region, class: &str) -> Option<UiEvent> {
        self.mount(region).find(class).map(|target| UiEvent::Click {
            region,
            target: Some(target),
        })
    }

    pub fn submit(&self, region: Region) -> UiEvent {
        UiEvent::Submit { region }
    }
}
