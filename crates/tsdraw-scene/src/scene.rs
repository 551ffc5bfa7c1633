#![forbid(unsafe_code)]

//! Format-agnostic vector scene graph.
//!
//! A [`Scene`] is a tree of [`Group`]s holding primitive [`Element`]s.
//! Groups carry the shared style (stroke, fill, font size, text anchor);
//! elements carry only the attributes that differ from their group. Sinks
//! (SVG markup, JSON diagnostics) walk the tree without knowing anything
//! about trees or mutations.

use serde_json::{Map, Value, json};
use tsdraw_core::geometry::{Point, Size};

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// Ordered presentation attributes. Setting a name twice replaces the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attrs(Vec<(&'static str, String)>);

impl Attrs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn to_json(&self) -> Map<String, Value> {
        self.iter()
            .map(|(n, v)| (n.to_string(), Value::String(v.to_string())))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// One step of a path outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    /// Horizontal line to an absolute x.
    Horizontal(f64),
    /// Vertical line to an absolute y.
    Vertical(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Circle { center: Point, radius: f64 },
    Rect { origin: Point, size: Size },
    Line { from: Point, to: Point },
    Path { commands: Vec<PathCommand> },
    Text { at: Point, text: String },
    /// Instance of a group in the scene's defs, by id.
    Use { href: String, at: Point },
}

impl Shape {
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Rect { .. } => "rect",
            Self::Line { .. } => "line",
            Self::Path { .. } => "path",
            Self::Text { .. } => "text",
            Self::Use { .. } => "use",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Circle { center, radius } => {
                json!({ "cx": center.x, "cy": center.y, "r": radius })
            }
            Self::Rect { origin, size } => json!({
                "x": origin.x,
                "y": origin.y,
                "width": size.width,
                "height": size.height,
            }),
            Self::Line { from, to } => {
                json!({ "x1": from.x, "y1": from.y, "x2": to.x, "y2": to.y })
            }
            Self::Path { commands } => {
                let commands: Vec<Value> = commands
                    .iter()
                    .map(|c| match *c {
                        PathCommand::MoveTo(p) => json!(["M", p.x, p.y]),
                        PathCommand::Horizontal(x) => json!(["H", x]),
                        PathCommand::Vertical(y) => json!(["V", y]),
                    })
                    .collect();
                json!({ "d": commands })
            }
            Self::Text { at, text } => json!({ "x": at.x, "y": at.y, "text": text }),
            Self::Use { href, at } => json!({ "href": href, "x": at.x, "y": at.y }),
        }
    }
}

/// A drawable primitive with an optional id and its own attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: Option<String>,
    pub shape: Shape,
    pub attrs: Attrs,
}

impl Element {
    #[must_use]
    pub fn new(shape: Shape) -> Self {
        Self {
            id: None,
            shape,
            attrs: Attrs::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), json!(self.shape.kind()));
        if let Some(id) = &self.id {
            obj.insert("id".into(), json!(id));
        }
        if let Value::Object(geometry) = self.shape.to_json() {
            obj.extend(geometry);
        }
        if !self.attrs.is_empty() {
            obj.insert("attrs".into(), Value::Object(self.attrs.to_json()));
        }
        Value::Object(obj)
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Group(Group),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Group {
    pub id: Option<String>,
    pub class: Option<String>,
    pub attrs: Attrs,
    pub children: Vec<SceneNode>,
}

impl Group {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.set(name, value);
        self
    }

    pub fn push(&mut self, element: Element) {
        self.children.push(SceneNode::Element(element));
    }

    pub fn push_group(&mut self, group: Group) {
        self.children.push(SceneNode::Group(group));
    }

    /// Direct child groups.
    pub fn groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.children.iter().filter_map(|c| match c {
            SceneNode::Group(g) => Some(g),
            SceneNode::Element(_) => None,
        })
    }

    /// Direct child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(|c| match c {
            SceneNode::Element(e) => Some(e),
            SceneNode::Group(_) => None,
        })
    }

    /// First direct child group with `class`.
    pub fn group(&self, class: &str) -> Option<&Group> {
        self.groups().find(|g| g.class.as_deref() == Some(class))
    }

    /// Every element below this group, depth first. A group's own elements
    /// come before those of its subgroups.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack: Vec<&Group> = vec![self];
        while let Some(group) = stack.pop() {
            // Reversed so the first subgroup is visited first.
            for child in group.children.iter().rev() {
                if let SceneNode::Group(g) = child {
                    stack.push(g);
                }
            }
            out.extend(group.elements());
        }
        out
    }

    pub fn find_element(&self, id: &str) -> Option<&Element> {
        self.descendants()
            .into_iter()
            .find(|e| e.id.as_deref() == Some(id))
    }

    pub fn find_group(&self, id: &str) -> Option<&Group> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.groups().find_map(|g| g.find_group(id))
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("type".into(), json!("group"));
        if let Some(id) = &self.id {
            obj.insert("id".into(), json!(id));
        }
        if let Some(class) = &self.class {
            obj.insert("class".into(), json!(class));
        }
        if !self.attrs.is_empty() {
            obj.insert("attrs".into(), Value::Object(self.attrs.to_json()));
        }
        let children: Vec<Value> = self
            .children
            .iter()
            .map(|c| match c {
                SceneNode::Group(g) => g.to_json(),
                SceneNode::Element(e) => e.to_json(),
            })
            .collect();
        obj.insert("children".into(), Value::Array(children));
        Value::Object(obj)
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A complete drawing: canvas size, reusable definitions, and the root group.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Size,
    /// Groups referenced by [`Shape::Use`] elements.
    pub defs: Vec<Group>,
    pub root: Group,
}

impl Scene {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            defs: Vec::new(),
            root: Group::new(),
        }
    }

    /// Search the root group, then the defs.
    pub fn find_group(&self, id: &str) -> Option<&Group> {
        self.root
            .find_group(id)
            .or_else(|| self.defs.iter().find_map(|g| g.find_group(id)))
    }

    pub fn find_element(&self, id: &str) -> Option<&Element> {
        self.root
            .find_element(id)
            .or_else(|| self.defs.iter().find_map(|g| g.find_element(id)))
    }

    pub fn to_json(&self) -> Value {
        let defs: Vec<Value> = self.defs.iter().map(Group::to_json).collect();
        json!({
            "width": self.size.width,
            "height": self.size.height,
            "defs": defs,
            "root": self.root.to_json(),
        })
    }
}
