#![forbid(unsafe_code)]

//! SVG markup for a [`Scene`].
//!
//! # Feature Gate
//!
//! Enabled via the `export` feature in `tsdraw-scene`.
//!
//! # Usage
//!
//! ```
//! use tsdraw_core::table::TableTree;
//! use tsdraw_scene::export::SvgExporter;
//! use tsdraw_scene::{VectorTreeOptions, draw_vector_tree};
//!
//! let tree = TableTree::from_parents(&[0.0, 0.0, 1.0], &[Some(2), Some(2), None]).unwrap();
//! let scene = draw_vector_tree(&tree, &VectorTreeOptions::default(), None).unwrap();
//! let svg = SvgExporter::default().export(&scene);
//! assert!(svg.contains("id=\"node_0_2\""));
//! ```

use std::fmt::Write;

use crate::scene::{Element, Group, PathCommand, Scene, SceneNode, Shape};

// ---------------------------------------------------------------------------
// SVG Exporter
// ---------------------------------------------------------------------------

/// Configuration for SVG export.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    /// Fill for a full-size background rectangle; `None` leaves it
    /// transparent.
    pub background: Option<String>,
    /// Write `use` references as `xlink:href` for SVG 1.1 consumers.
    pub xlink_href: bool,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            background: None,
            xlink_href: true,
        }
    }
}

impl SvgExporter {
    /// Export a scene to an SVG document.
    ///
    /// Groups become `<g>` elements carrying their shared attributes; the
    /// scene's defs are written once inside `<defs>`.
    pub fn export(&self, scene: &Scene) -> String {
        let w = scene.size.width;
        let h = scene.size.height;
        let mut out = String::with_capacity(4096);

        out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\"");
        if self.xlink_href {
            out.push_str(" xmlns:xlink=\"http://www.w3.org/1999/xlink\"");
        }
        let _ = write!(out, " width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">");

        if let Some(fill) = &self.background {
            out.push_str("<rect width=\"100%\" height=\"100%\" fill=\"");
            svg_escape_attr_into(&mut out, fill);
            out.push_str("\"/>");
        }

        if !scene.defs.is_empty() {
            out.push_str("<defs>");
            for group in &scene.defs {
                self.write_group(&mut out, group);
            }
            out.push_str("</defs>");
        }

        let root = &scene.root;
        if root.id.is_none() && root.class.is_none() && root.attrs.is_empty() {
            self.write_children(&mut out, root);
        } else {
            self.write_group(&mut out, root);
        }

        out.push_str("</svg>");
        out
    }

    fn write_group(&self, out: &mut String, group: &Group) {
        out.push_str("<g");
        write_common(out, group.id.as_deref(), group.class.as_deref());
        for (name, value) in group.attrs.iter() {
            write_attr(out, name, value);
        }
        out.push('>');
        self.write_children(out, group);
        out.push_str("</g>");
    }

    fn write_children(&self, out: &mut String, group: &Group) {
        for child in &group.children {
            match child {
                SceneNode::Group(g) => self.write_group(out, g),
                SceneNode::Element(e) => self.write_element(out, e),
            }
        }
    }

    fn write_element(&self, out: &mut String, element: &Element) {
        let _ = write!(out, "<{}", element.shape.kind());
        write_common(out, element.id.as_deref(), None);
        match &element.shape {
            Shape::Circle { center, radius } => {
                let _ = write!(out, " cx=\"{}\" cy=\"{}\" r=\"{radius}\"", center.x, center.y);
            }
            Shape::Rect { origin, size } => {
                let _ = write!(
                    out,
                    " x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                    origin.x, origin.y, size.width, size.height
                );
            }
            Shape::Line { from, to } => {
                let _ = write!(
                    out,
                    " x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                    from.x, from.y, to.x, to.y
                );
            }
            Shape::Path { commands } => {
                out.push_str(" d=\"");
                write_path_data(out, commands);
                out.push('"');
            }
            Shape::Text { at, .. } => {
                let _ = write!(out, " x=\"{}\" y=\"{}\"", at.x, at.y);
            }
            Shape::Use { href, at } => {
                let name = if self.xlink_href { "xlink:href" } else { "href" };
                let _ = write!(out, " {name}=\"#");
                svg_escape_attr_into(out, href);
                let _ = write!(out, "\" x=\"{}\" y=\"{}\"", at.x, at.y);
            }
        }
        for (name, value) in element.attrs.iter() {
            write_attr(out, name, value);
        }
        match &element.shape {
            Shape::Text { text, .. } => {
                out.push('>');
                svg_escape_into(out, text);
                out.push_str("</text>");
            }
            _ => out.push_str("/>"),
        }
    }
}

fn write_common(out: &mut String, id: Option<&str>, class: Option<&str>) {
    if let Some(id) = id {
        write_attr(out, "id", id);
    }
    if let Some(class) = class {
        write_attr(out, "class", class);
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"");
    svg_escape_attr_into(out, value);
    out.push('"');
}

fn write_path_data(out: &mut String, commands: &[PathCommand]) {
    for (i, command) in commands.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = match *command {
            PathCommand::MoveTo(p) => write!(out, "M{} {}", p.x, p.y),
            PathCommand::Horizontal(x) => write!(out, "H{x}"),
            PathCommand::Vertical(y) => write!(out, "V{y}"),
        };
    }
}

/// Escape text content.
fn svg_escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            _ => out.push(c),
        }
    }
}

/// Escape a double-quoted attribute value.
fn svg_escape_attr_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            _ => svg_escape_into(out, c.encode_utf8(&mut [0; 4])),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_sequence::{VectorSequenceOptions, draw_vector_sequence};
    use crate::vector_tree::{VectorTreeOptions, draw_vector_tree};
    use tsdraw_core::geometry::{Point, Size};
    use tsdraw_core::overrides::LabelMap;
    use tsdraw_core::table::{SequenceBuilder, TableTree};
    use tsdraw_core::tree::NodeId;

    fn balanced() -> TableTree {
        TableTree::from_parents(
            &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0],
            &[Some(4), Some(4), Some(5), Some(5), Some(6), Some(6), None],
        )
        .unwrap()
    }

    fn balanced_svg() -> String {
        let scene = draw_vector_tree(&balanced(), &VectorTreeOptions::default(), None).unwrap();
        SvgExporter::default().export(&scene)
    }

    #[test]
    fn svg_basic_structure() {
        let svg = balanced_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.contains("width=\"200\" height=\"200\" viewBox=\"0 0 200 200\""));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn svg_writes_primitives() {
        let svg = balanced_svg();
        assert!(svg.contains("<circle id=\"node_0_6\" cx=\"100\" cy=\"30\" r=\"3\"/>"));
        assert!(svg.contains("<path id=\"edge_0_0\" d=\"M46 170 V100 H64\"/>"));
        assert!(svg.contains("<text x=\"46\" y=\"190\">0</text>"));
    }

    #[test]
    fn svg_groups_carry_shared_style() {
        let svg = balanced_svg();
        assert!(svg.contains("<g id=\"tree_0\" class=\"tree\">"));
        assert!(svg.contains("<g class=\"edges\" stroke=\"black\" fill=\"none\">"));
        assert!(svg.contains("<g class=\"labels\" font-size=\"14\">"));
        assert!(svg.contains("<g class=\"middle\" text-anchor=\"middle\">"));
    }

    #[test]
    fn svg_escapes_special_chars() {
        let options = VectorTreeOptions {
            node_labels: LabelMap::only([(NodeId(6), Some("<a&b>".to_string()))]),
            ..VectorTreeOptions::default()
        };
        let scene = draw_vector_tree(&balanced(), &options, None).unwrap();
        let svg = SvgExporter::default().export(&scene);
        assert!(svg.contains(">&lt;a&amp;b&gt;</text>"));
    }

    #[test]
    fn svg_escapes_attribute_quotes() {
        let mut scene = Scene::new(Size::new(10.0, 10.0));
        scene.root.push(
            Element::new(Shape::Circle {
                center: Point::new(1.0, 1.0),
                radius: 1.0,
            })
            .with_attr("fill", "url(\"#g\")"),
        );
        let svg = SvgExporter::default().export(&scene);
        assert!(svg.contains("fill=\"url(&quot;#g&quot;)\""));
    }

    #[test]
    fn svg_background_and_plain_href() {
        let mut b = SequenceBuilder::new(1.0);
        let a = b.add_sample(0.0);
        let c = b.add_sample(0.0);
        let p = b.add_node(1.0, false);
        b.add_edge(0.0, 1.0, p, a).add_edge(0.0, 1.0, p, c);
        let ts = b.build().unwrap();
        let scene = draw_vector_sequence(&ts, &VectorSequenceOptions::default()).unwrap();

        let exporter = SvgExporter {
            background: Some("white".into()),
            xlink_href: false,
        };
        let svg = exporter.export(&scene);
        assert!(svg.contains("<rect width=\"100%\" height=\"100%\" fill=\"white\"/>"));
        assert!(svg.contains("<defs><g id=\"tree_0\""));
        assert!(svg.contains("<use href=\"#tree_0\" x=\"20\" y=\"15\"/>"));
        assert!(!svg.contains("xmlns:xlink"));

        let svg = SvgExporter::default().export(&scene);
        assert!(svg.contains("<use xlink:href=\"#tree_0\""));
    }

    #[test]
    fn svg_empty_scene() {
        let svg = SvgExporter::default().export(&Scene::new(Size::new(0.0, 0.0)));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("\"0 0 0 0\"></svg>"));
    }
}
