//! Markup serialization for nodes.
//!
//! Used to compare a pre-render pass against a live document and to make
//! test assertions readable. Frames serialize as an empty `<iframe>`; their
//! embedded document is not inlined.

use super::node::Node;

impl Node {
    /// Markup of this node including itself.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        write_node(self, &mut out);
        out
    }

    /// Markup of this node's children.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            write_node(&child, &mut out);
        }
        out
    }
}

fn write_node(node: &Node, out: &mut String) {
    let Some(tag) = node.tag_name() else {
        escape_into(&node.text().unwrap_or_default(), false, out);
        return;
    };

    out.push('<');
    out.push_str(&tag);
    let class = node.class_name();
    if !class.is_empty() {
        out.push_str(" class=\"");
        escape_into(&class, true, out);
        out.push('"');
    }
    out.push('>');

    for child in node.children() {
        write_node(&child, out);
    }

    out.push_str("</");
    out.push_str(&tag);
    out.push('>');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
