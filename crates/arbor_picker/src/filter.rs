//! Tree filtering by predicate
//!
//! Produces a pruned copy of a tree that keeps every node the predicate
//! accepts plus the ancestors needed to reach it. Kept nodes only retain
//! kept children, so the result contains a node iff that node or one of its
//! descendants matches.

use crate::node::TreeNode;

/// Filter `nodes`, keeping matches and the ancestors of matches
///
/// The input is never modified. A predicate that matches nothing yields an
/// empty vector.
pub fn filter_nodes_of_tree<P>(nodes: &[TreeNode], predicate: P) -> Vec<TreeNode>
where
    P: Fn(&TreeNode) -> bool,
{
    filter_level(nodes, &predicate)
}

fn filter_level<P>(nodes: &[TreeNode], predicate: &P) -> Vec<TreeNode>
where
    P: Fn(&TreeNode) -> bool,
{
    nodes
        .iter()
        .filter_map(|node| filter_node(node, predicate))
        .collect()
}

fn filter_node<P>(node: &TreeNode, predicate: &P) -> Option<TreeNode>
where
    P: Fn(&TreeNode) -> bool,
{
    let children = filter_level(&node.children, predicate);
    if children.is_empty() && !predicate(node) {
        return None;
    }

    Some(TreeNode {
        attrs: node.attrs.clone(),
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Vec<TreeNode> {
        vec![
            TreeNode::branch(
                "Fruit",
                "fruit",
                vec![
                    TreeNode::leaf("Apple", "apple"),
                    TreeNode::leaf("Banana", "banana"),
                    TreeNode::branch(
                        "Citrus",
                        "citrus",
                        vec![TreeNode::leaf("Lemon", "lemon"), TreeNode::leaf("Lime", "lime")],
                    ),
                ],
            ),
            TreeNode::branch("Nuts", "nuts", vec![TreeNode::leaf("Almond", "almond")]),
            TreeNode::leaf("Water", "water"),
        ]
    }

    fn values(nodes: &[TreeNode]) -> Vec<String> {
        let mut out = Vec::new();
        crate::node::walk(nodes, &mut |node: &TreeNode, _| {
            if let Some(v) = node.value("value").and_then(|v| v.as_str()) {
                out.push(v.to_string());
            }
        });
        out
    }

    fn value_is(node: &TreeNode, expected: &str) -> bool {
        node.value("value") == Some(&json!(expected))
    }

    #[test]
    fn test_always_true_returns_equal_copy() {
        let data = sample();
        assert_eq!(filter_nodes_of_tree(&data, |_| true), data);
    }

    #[test]
    fn test_always_false_returns_empty() {
        assert!(filter_nodes_of_tree(&sample(), |_| false).is_empty());
    }

    #[test]
    fn test_keeps_ancestors_of_deep_match() {
        let filtered = filter_nodes_of_tree(&sample(), |n| value_is(n, "lime"));
        assert_eq!(values(&filtered), vec!["fruit", "citrus", "lime"]);
    }

    #[test]
    fn test_matching_parent_drops_non_matching_children() {
        let filtered = filter_nodes_of_tree(&sample(), |n| value_is(n, "citrus"));
        assert_eq!(values(&filtered), vec!["fruit", "citrus"]);
        assert!(filtered[0].children[0].is_leaf());
    }

    #[test]
    fn test_siblings_are_pruned() {
        let filtered = filter_nodes_of_tree(&sample(), |n| {
            value_is(n, "apple") || value_is(n, "almond")
        });
        assert_eq!(values(&filtered), vec!["fruit", "apple", "nuts", "almond"]);
    }

    #[test]
    fn test_node_kept_iff_it_or_descendant_matches() {
        let data = sample();
        let predicate = |n: &TreeNode| {
            n.label("label")
                .text()
                .is_some_and(|t| t.starts_with('L') || t.starts_with('W'))
        };
        let filtered = filter_nodes_of_tree(&data, predicate);

        fn subtree_matches(node: &TreeNode, p: &dyn Fn(&TreeNode) -> bool) -> bool {
            p(node) || node.children.iter().any(|c| subtree_matches(c, p))
        }

        let mut expected = Vec::new();
        crate::node::walk(&data, &mut |node: &TreeNode, _| {
            if subtree_matches(node, &predicate) {
                expected.push(node.value("value").and_then(|v| v.as_str()).unwrap().to_string());
            }
        });

        assert_eq!(values(&filtered), expected);
    }

    #[test]
    fn test_input_is_untouched() {
        let data = sample();
        let before = data.clone();
        let _ = filter_nodes_of_tree(&data, |n| value_is(n, "apple"));
        assert_eq!(data, before);
    }
}
