//! Terminal rendering of trees and picker frames

use arbor_picker::{walk, DropdownView, PanelItem, TreeNode};
use std::fmt::Write;

// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[32m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const CYAN: &str = "\x1b[36m";
}

fn node_line(node: &TreeNode, label_key: &str, value_key: &str) -> String {
    let label = node
        .label(label_key)
        .text()
        .map(|t| t.into_owned())
        .unwrap_or_else(|| "<unlabelled>".to_string());
    let value = node
        .value(value_key)
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{} ({})", label, value)
}

/// Indented outline, one node per line: `label (value)`
pub fn outline(nodes: &[TreeNode], label_key: &str, value_key: &str) -> String {
    let mut out = String::new();
    walk(nodes, &mut |node: &TreeNode, depth| {
        let _ = writeln!(
            out,
            "{}{}",
            "  ".repeat(depth),
            node_line(node, label_key, value_key)
        );
    });
    out
}

/// A picker frame: toggle line, then the panel if expanded
pub fn frame(view: &DropdownView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}[{}]{} {}{}{}",
        colors::BOLD,
        view.toggle.label.text(),
        colors::RESET,
        colors::GRAY,
        view.classes.join(" "),
        colors::RESET
    );

    let Some(panel) = &view.panel else {
        return out;
    };
    for item in &panel.items {
        match item {
            PanelItem::SearchBar(search) => {
                let text = if search.value.is_empty() {
                    format!("{}{}{}", colors::GRAY, search.placeholder, colors::RESET)
                } else {
                    search.value.clone()
                };
                let _ = writeln!(out, "  {}search:{} {}", colors::CYAN, colors::RESET, text);
            }
            PanelItem::Tree(tree) if tree.data.is_empty() => {
                let _ = writeln!(
                    out,
                    "  {}{}{}",
                    colors::GRAY,
                    tree.no_results_text,
                    colors::RESET
                );
            }
            PanelItem::Tree(tree) => {
                walk(&tree.data, &mut |node: &TreeNode, depth| {
                    let checked = node
                        .value(&tree.value_key)
                        .is_some_and(|v| tree.value.contains(v));
                    let mark = if checked {
                        format!("{}[x]{}", colors::GREEN, colors::RESET)
                    } else {
                        "[ ]".to_string()
                    };
                    let _ = writeln!(
                        out,
                        "  {}{} {}",
                        "  ".repeat(depth),
                        mark,
                        node_line(node, &tree.label_key, &tree.value_key)
                    );
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::dom::Document;
    use arbor_core::events::Event;
    use arbor_picker::check_tree_picker;
    use serde_json::json;

    fn fruit() -> Vec<TreeNode> {
        vec![TreeNode::branch(
            "Fruit",
            "fruit",
            vec![TreeNode::leaf("Apple", "apple")],
        )]
    }

    #[test]
    fn test_outline_indents_by_depth() {
        let mut data = fruit();
        data.push(TreeNode::new().attr("value", 7));
        assert_eq!(
            outline(&data, "label", "value"),
            "Fruit (\"fruit\")\n  Apple (\"apple\")\n<unlabelled> (7)\n"
        );
    }

    #[test]
    fn test_frame_marks_selected_nodes() {
        let mut doc = Document::default();
        let mut picker = check_tree_picker(fruit())
            .value(vec![json!("apple")])
            .build(&mut doc);
        picker.mount(&doc);
        picker.handle_toggle(&doc, &Event::click(None));

        let text = frame(&picker.render());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("1 selected"));
        assert!(lines[1].contains("search:"));
        assert!(lines[2].contains("[ ]") && lines[2].contains("Fruit"));
        assert!(lines[3].contains("[x]") && lines[3].contains("Apple"));
    }

    #[test]
    fn test_empty_tree_shows_no_results_text() {
        let mut doc = Document::default();
        let mut picker = check_tree_picker(fruit()).build(&mut doc);
        picker.mount(&doc);
        picker.handle_toggle(&doc, &Event::click(None));
        picker.handle_search("kiwi", &Event::text_input(None, "kiwi"));

        let text = frame(&picker.render());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("No results found"));
    }

    #[test]
    fn test_collapsed_frame_is_one_line() {
        let mut doc = Document::default();
        let picker = check_tree_picker(fruit()).build(&mut doc);
        let text = frame(&picker.render());
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("Select"));
    }
}
