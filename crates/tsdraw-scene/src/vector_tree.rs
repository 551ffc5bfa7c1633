#![forbid(unsafe_code)]

//! Vector drawing of a single tree.
//!
//! The tree becomes one group, `tree_{index}`, laid out as:
//!
//! ```text
//! tree_{index}
//! ├── edges              stroke, fill=none
//! ├── symbols
//! │   ├── nodes          circles, fill
//! │   └── mutations      squares, fill
//! └── labels             font-size
//!     ├── nodes          start / middle / end anchored groups
//!     └── mutations      start / end anchored groups, italic
//! ```
//!
//! Elements carry a `fill` or `stroke` only when their override differs from
//! the group default, and suppressed elements are left out.

use rustc_hash::FxHashMap;
use tsdraw_core::debug_span;
use tsdraw_core::geometry::{Point, Size};
use tsdraw_core::overrides::{LabelMap, Overrides, Resolved};
use tsdraw_core::tree::{MutationId, NodeId, Tree};
use tsdraw_layout::{
    HeightBound, HeightScale, LayoutError, PlacedMutation, SequenceTimes, VerticalAxis,
    continuous, place_mutations,
};

use crate::scene::{Element, Group, PathCommand, Scene, Shape};

pub const DEFAULT_SIZE: Size = Size::new(200.0, 200.0);
pub const DEFAULT_NODE_FILL: &str = "black";
pub const DEFAULT_EDGE_STROKE: &str = "black";
pub const DEFAULT_MUTATION_FILL: &str = "red";

/// Horizontal margin on each side of the tree.
pub const TREEBOX_X_OFFSET: f64 = 10.0;
pub const NODE_RADIUS: f64 = 3.0;
pub const MUTATION_HALF_SIDE: f64 = 3.0;
pub const FONT_SIZE: f64 = 14.0;

const LABEL_DX: f64 = 5.0;
const LEAF_LABEL_DY: f64 = 20.0;
const LABEL_DY: f64 = -5.0;
const MUTATION_LABEL_DY: f64 = 1.5 * MUTATION_HALF_SIDE;

/// Options for a single vector tree.
#[derive(Debug, Clone)]
pub struct VectorTreeOptions {
    pub size: Size,
    pub height_scale: HeightScale,
    pub max_height: HeightBound,
    pub node_labels: LabelMap<NodeId>,
    pub node_colours: Overrides<NodeId, String>,
    pub edge_colours: Overrides<NodeId, String>,
    pub mutation_labels: LabelMap<MutationId>,
    pub mutation_colours: Overrides<MutationId, String>,
}

impl Default for VectorTreeOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            height_scale: HeightScale::Time,
            max_height: HeightBound::Tree,
            node_labels: LabelMap::ids(),
            node_colours: Overrides::new(DEFAULT_NODE_FILL.to_string()),
            edge_colours: Overrides::new(DEFAULT_EDGE_STROKE.to_string()),
            mutation_labels: LabelMap::ids(),
            mutation_colours: Overrides::new(DEFAULT_MUTATION_FILL.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Start,
    Middle,
    End,
}

/// Leaves are labelled centred below, roots centred above. Other nodes are
/// labelled above and to the outside: left of a leftmost child, right of the
/// rest.
fn node_label_placement<T: Tree>(tree: &T, u: NodeId) -> (Anchor, f64, f64) {
    if tree.is_leaf(u) {
        (Anchor::Middle, 0.0, LEAF_LABEL_DY)
    } else if tree.parent(u).is_none() {
        (Anchor::Middle, 0.0, LABEL_DY)
    } else if tree.left_sib(u).is_none() {
        (Anchor::End, -LABEL_DX, LABEL_DY)
    } else {
        (Anchor::Start, LABEL_DX, LABEL_DY)
    }
}

fn anchored(anchor: &'static str) -> Group {
    Group::new()
        .with_class(anchor)
        .with_attr("text-anchor", anchor)
}

fn styled(mut element: Element, name: &'static str, resolved: Resolved<'_, String>) -> Element {
    if let Resolved::Custom(value) = resolved {
        element.attrs.set(name, value.clone());
    }
    element
}

/// A tree drawn into a scene group, with the coordinates used.
#[derive(Debug, Clone)]
pub struct VectorTree {
    group: Group,
    size: Size,
    points: FxHashMap<NodeId, Point>,
    mutations: Vec<PlacedMutation>,
}

impl VectorTree {
    /// Lay out and draw `tree`. With `context`, heights are shared with the
    /// rest of a sequence.
    pub fn build<T: Tree>(
        tree: &T,
        options: &VectorTreeOptions,
        context: Option<&SequenceTimes>,
    ) -> Result<Self, LayoutError> {
        let index = tree.index();
        let span = debug_span!("vector_tree", tree = index);
        let _guard = span.enter();

        let size = options.size;
        let axis = VerticalAxis::assign(
            tree,
            size.height,
            options.height_scale,
            options.max_height,
            context,
        )?;
        let xs = continuous(tree).scaled(TREEBOX_X_OFFSET, size.width - 2.0 * TREEBOX_X_OFFSET);
        let points: FxHashMap<NodeId, Point> = xs
            .into_iter()
            .filter_map(|(u, x)| Some((u, Point::new(x, axis.y(u)?))))
            .collect();

        let mut edges = Group::new()
            .with_class("edges")
            .with_attr("stroke", options.edge_colours.default_value().as_str())
            .with_attr("fill", "none");
        let mut nodes = Group::new()
            .with_class("nodes")
            .with_attr("fill", options.node_colours.default_value().as_str());
        let mut mutation_marks = Group::new()
            .with_class("mutations")
            .with_attr("fill", options.mutation_colours.default_value().as_str());
        let mut node_start = anchored("start");
        let mut node_middle = anchored("middle");
        let mut node_end = anchored("end");
        let mut mutation_start = anchored("start");
        let mut mutation_end = anchored("end");

        for u in tree.nodes() {
            let Some(&pu) = points.get(&u) else {
                continue;
            };

            let fill = options.node_colours.resolve(&u);
            if fill != Resolved::Suppressed {
                let circle = Element::new(Shape::Circle {
                    center: pu,
                    radius: NODE_RADIUS,
                })
                .with_id(format!("node_{index}_{u}"));
                nodes.push(styled(circle, "fill", fill));
            }

            if let Some(text) = options.node_labels.label(&u) {
                let (anchor, dx, dy) = node_label_placement(tree, u);
                let label = Element::new(Shape::Text {
                    at: pu.offset(dx, dy),
                    text: text.into_owned(),
                });
                match anchor {
                    Anchor::Start => node_start.push(label),
                    Anchor::Middle => node_middle.push(label),
                    Anchor::End => node_end.push(label),
                }
            }

            let Some(&pv) = tree.parent(u).and_then(|v| points.get(&v)) else {
                continue;
            };
            let stroke = options.edge_colours.resolve(&u);
            if stroke != Resolved::Suppressed {
                let path = Element::new(Shape::Path {
                    commands: vec![
                        PathCommand::MoveTo(pu),
                        PathCommand::Vertical(pv.y),
                        PathCommand::Horizontal(pv.x),
                    ],
                })
                .with_id(format!("edge_{index}_{u}"));
                edges.push(styled(path, "stroke", stroke));
            }
        }

        let mutations = place_mutations(tree, &points, axis.root_branch_top());
        let side = 2.0 * MUTATION_HALF_SIDE;
        for m in &mutations {
            let fill = options.mutation_colours.resolve(&m.id);
            if fill != Resolved::Suppressed {
                let square = Element::new(Shape::Rect {
                    origin: m.point.offset(-MUTATION_HALF_SIDE, -MUTATION_HALF_SIDE),
                    size: Size::new(side, side),
                })
                .with_id(format!("mut_{index}_{}", m.id));
                mutation_marks.push(styled(square, "fill", fill));
            }
            if let Some(text) = options.mutation_labels.label(&m.id) {
                let leftmost = tree.left_sib(m.node).is_none();
                let dx = if leftmost { -LABEL_DX } else { LABEL_DX };
                let label = Element::new(Shape::Text {
                    at: m.point.offset(dx, MUTATION_LABEL_DY),
                    text: text.into_owned(),
                });
                if leftmost {
                    mutation_end.push(label);
                } else {
                    mutation_start.push(label);
                }
            }
        }

        let mut symbols = Group::new().with_class("symbols");
        symbols.push_group(nodes);
        symbols.push_group(mutation_marks);

        let mut node_labels = Group::new().with_class("nodes");
        node_labels.push_group(node_start);
        node_labels.push_group(node_middle);
        node_labels.push_group(node_end);

        let mut mutation_labels = Group::new()
            .with_class("mutations")
            .with_attr("font-style", "italic")
            .with_attr("alignment-baseline", "middle");
        mutation_labels.push_group(mutation_start);
        mutation_labels.push_group(mutation_end);

        let mut labels = Group::new()
            .with_class("labels")
            .with_attr("font-size", FONT_SIZE.to_string());
        labels.push_group(node_labels);
        labels.push_group(mutation_labels);

        let mut group = Group::new()
            .with_id(format!("tree_{index}"))
            .with_class("tree");
        group.push_group(edges);
        group.push_group(symbols);
        group.push_group(labels);

        Ok(Self {
            group,
            size,
            points,
            mutations,
        })
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn point(&self, u: NodeId) -> Option<Point> {
        self.points.get(&u).copied()
    }

    pub fn mutations(&self) -> &[PlacedMutation] {
        &self.mutations
    }

    pub fn into_group(self) -> Group {
        self.group
    }

    /// Wrap the tree group in a scene of its own size.
    pub fn into_scene(self) -> Scene {
        let mut scene = Scene::new(self.size);
        scene.root.push_group(self.group);
        scene
    }
}

/// Draw `tree` as a standalone scene.
pub fn draw_vector_tree<T: Tree>(
    tree: &T,
    options: &VectorTreeOptions,
    context: Option<&SequenceTimes>,
) -> Result<Scene, LayoutError> {
    VectorTree::build(tree, options, context).map(VectorTree::into_scene)
}
