use crate::model::{AttachmentKind, DecisionNode, ProductRef, resolve_go_to};
use crate::navigation::Navigator;
use itertools::Itertools;

const INDENT: &str = "  ";

/// Formats trees and steps into human-readable text.
pub struct TreeFormatter;

impl TreeFormatter {
    /// Renders `tree` under the navigator's view state, one line per visible node.
    ///
    /// `tree` is what should be shown, usually `Navigator::visible` of the full tree.
    /// Children of collapsed nodes are skipped.
    pub fn render(tree: &[DecisionNode], nav: &Navigator) -> String {
        let mut out = String::new();
        Self::render_level(&mut out, tree, nav, 0);
        out
    }

    fn render_level(out: &mut String, nodes: &[DecisionNode], nav: &Navigator, depth: usize) {
        for node in nodes {
            let expanded = nav.is_expanded(node.id);
            let marker = match (node.has_children(), expanded) {
                (false, _) => '•',
                (true, true) => '▾',
                (true, false) => '▸',
            };

            out.push_str(&INDENT.repeat(depth));
            out.push_str(&format!("{} {}", marker, Self::single_line(node.display_name())));
            if node.has_children() {
                out.push_str(&format!(" ({})", node.children.len()));
            }
            if node.highlighted && nav.is_searching() {
                out.push_str(" [match]");
            }
            if nav.is_selected(node.id) {
                out.push_str(" [selected]");
            }
            out.push_str(&format!("  #{}\n", node.id));

            if node.has_children() && expanded {
                Self::render_level(out, &node.children, nav, depth + 1);
            }
        }
    }

    /// Full description of one step: text, documents, submenus, products and the
    /// steps its go-to list leads to.
    pub fn render_details(node: &DecisionNode, tree: &[DecisionNode]) -> String {
        let mut out = String::new();
        out.push_str(&format!("#{} {}\n", node.id, node.display_name()));
        if node.title.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            out.push_str(&format!("{}\n", node.description));
        }

        let documents = node.all_documents();
        if !documents.is_empty() {
            out.push_str("\nDocuments:\n");
            for doc in documents {
                out.push_str(&format!(
                    "{}- {} [{}] {}\n",
                    INDENT,
                    doc.name,
                    Self::kind_label(doc.kind()),
                    doc.display_url()
                ));
            }
        }

        if !node.submenus.is_empty() {
            out.push_str("\nSubmenus:\n");
            for submenu in &node.submenus {
                out.push_str(&format!("{}- {}\n", INDENT, submenu.title));
                if !submenu.description.is_empty() {
                    out.push_str(&format!("{}{}{}\n", INDENT, INDENT, submenu.description));
                }
                for product in &submenu.products {
                    out.push_str(&format!("{}{}{}\n", INDENT, INDENT, Self::product_line(product)));
                }
            }
        }

        if !node.products.is_empty() {
            out.push_str("\nProducts:\n");
            for product in &node.products {
                out.push_str(&format!("{}{}\n", INDENT, Self::product_line(product)));
            }
        }

        let next_steps = resolve_go_to(node, tree);
        if !next_steps.is_empty() {
            out.push_str("\nNext steps:\n");
            for step in next_steps {
                out.push_str(&format!("{}-> #{} {}\n", INDENT, step.id, step.display_name()));
            }
        }

        out
    }

    fn product_line(link: &ProductRef) -> String {
        let product = &link.product;
        let mut line = format!("- {}", product.name);
        if let Some(price) = product.price {
            line.push_str(&format!(" ({price:.2})"));
        }
        if link.recommended {
            line.push_str(" *recommended*");
        }
        if !product.active {
            line.push_str(" [inactive]");
        }
        line
    }

    fn kind_label(kind: AttachmentKind) -> &'static str {
        match kind {
            AttachmentKind::Image => "image",
            AttachmentKind::Pdf => "pdf",
            AttachmentKind::Other => "file",
        }
    }

    /// Descriptions may span lines; tree rows may not.
    fn single_line(text: &str) -> String {
        text.split_whitespace().join(" ")
    }
}
