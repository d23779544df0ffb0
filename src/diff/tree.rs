//! Generic recursive child diff shared by the category and menu comparators.

use indexmap::IndexMap;
use serde_json::Value;

use super::kernel::{field_change, join_path};
use super::types::DiffChange;

/// Describes how to walk one recursive node shape.
pub struct TreeShape<N> {
    /// Key used to match children within one parent.
    pub key_of: fn(&N) -> &str,
    /// Label used in change descriptions.
    pub label_of: fn(&N) -> &str,
    /// Children of a node.
    pub children_of: fn(&N) -> &[N],
    /// Field-level changes of a matched node pair `(desired, observed, path)`.
    pub node_changes: fn(&N, &N, &str) -> Vec<DiffChange>,
    /// Field name holding the children below the top level.
    pub children_field: &'static str,
    /// Noun used in added/removed descriptions.
    pub noun: &'static str,
    /// Whether a pure reordering of children is reported.
    pub detect_reorder: bool,
}

/// Diffs two child lists recursively.
///
/// `path` is the dotted path of the child list and `parent_label` names the
/// node owning it. Added and removed children yield one change each at
/// `path`; matched children are diffed below `<path>.<key>` and their own
/// children below `<path>.<key>.<children_field>`.
#[must_use]
pub fn diff_tree<N>(
    desired: &[N],
    observed: &[N],
    shape: &TreeShape<N>,
    path: &str,
    parent_label: &str,
) -> Vec<DiffChange> {
    let mut changes = Vec::new();
    diff_level(desired, observed, shape, path, parent_label, &mut changes);
    changes
}

fn diff_level<N>(
    desired: &[N],
    observed: &[N],
    shape: &TreeShape<N>,
    path: &str,
    parent_label: &str,
    changes: &mut Vec<DiffChange>,
) {
    let desired_map = child_map(desired, shape);
    let observed_map = child_map(observed, shape);

    if shape.detect_reorder {
        if let Some(change) = reorder_change(&desired_map, &observed_map, path, parent_label) {
            changes.push(change);
        }
    }

    for (key, &wanted) in &desired_map {
        match observed_map.get(key).copied() {
            None => changes.push(field_change(
                path,
                Value::Null,
                Value::String(key.clone()),
                Some(format!(
                    "{} \"{}\" added to \"{parent_label}\"",
                    capitalize(shape.noun),
                    (shape.label_of)(wanted)
                )),
            )),
            Some(actual) => {
                let node_path = join_path(path, key);
                changes.extend((shape.node_changes)(wanted, actual, &node_path));
                diff_level(
                    (shape.children_of)(wanted),
                    (shape.children_of)(actual),
                    shape,
                    &join_path(&node_path, shape.children_field),
                    (shape.label_of)(wanted),
                    changes,
                );
            }
        }
    }

    for (key, &actual) in &observed_map {
        if !desired_map.contains_key(key) {
            changes.push(field_change(
                path,
                Value::String(key.clone()),
                Value::Null,
                Some(format!(
                    "{} \"{}\" removed from \"{parent_label}\"",
                    capitalize(shape.noun),
                    (shape.label_of)(actual)
                )),
            ));
        }
    }
}

fn child_map<'a, N>(nodes: &'a [N], shape: &TreeShape<N>) -> IndexMap<String, &'a N> {
    let mut map = IndexMap::new();
    for node in nodes {
        let key = (shape.key_of)(node).trim();
        if !key.is_empty() {
            map.entry(key.to_string()).or_insert(node);
        }
    }
    map
}

fn reorder_change<N>(
    desired: &IndexMap<String, &N>,
    observed: &IndexMap<String, &N>,
    path: &str,
    parent_label: &str,
) -> Option<DiffChange> {
    let same_set =
        desired.len() == observed.len() && desired.keys().all(|k| observed.contains_key(k));
    let same_order = desired.keys().eq(observed.keys());
    if !same_set || same_order {
        return None;
    }

    let order = |map: &IndexMap<String, &N>| {
        Value::Array(map.keys().cloned().map(Value::String).collect())
    };
    Some(field_change(
        join_path(path, "order"),
        order(observed),
        order(desired),
        Some(format!("Children of \"{parent_label}\" reordered")),
    ))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Node {
        key: String,
        value: u32,
        children: Vec<Node>,
    }

    fn node(key: &str, value: u32, children: Vec<Node>) -> Node {
        Node {
            key: key.to_string(),
            value,
            children,
        }
    }

    fn value_changes(desired: &Node, observed: &Node, path: &str) -> Vec<DiffChange> {
        if desired.value == observed.value {
            Vec::new()
        } else {
            vec![field_change(
                join_path(path, "value"),
                Value::from(observed.value),
                Value::from(desired.value),
                None,
            )]
        }
    }

    fn shape(detect_reorder: bool) -> TreeShape<Node> {
        TreeShape {
            key_of: |n| n.key.as_str(),
            label_of: |n| n.key.as_str(),
            children_of: |n| n.children.as_slice(),
            node_changes: value_changes,
            children_field: "children",
            noun: "node",
            detect_reorder,
        }
    }

    #[test]
    fn test_added_and_removed_carry_parent_label() {
        let desired = vec![node("a", 1, vec![])];
        let observed = vec![node("b", 1, vec![])];
        let changes = diff_tree(&desired, &observed, &shape(false), "nodes", "root");
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].description, "Node \"a\" added to \"root\"");
        assert_eq!(changes[1].description, "Node \"b\" removed from \"root\"");
        assert_eq!(changes[0].field, "nodes");
    }

    #[test]
    fn test_nested_paths() {
        let desired = vec![node("a", 1, vec![node("x", 2, vec![]), node("y", 1, vec![])])];
        let observed = vec![node("a", 1, vec![node("x", 3, vec![])])];
        let changes = diff_tree(&desired, &observed, &shape(false), "nodes", "root");
        let fields: Vec<&str> = changes.iter().map(|c| c.field.as_str()).collect();
        assert_eq!(fields, vec!["nodes.a.children.x.value", "nodes.a.children"]);
        assert_eq!(changes[1].description, "Node \"y\" added to \"a\"");
    }

    #[test]
    fn test_same_name_at_different_depths() {
        let desired = vec![node("a", 1, vec![node("a", 1, vec![])])];
        let observed = vec![node("a", 1, vec![])];
        let changes = diff_tree(&desired, &observed, &shape(false), "nodes", "root");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "nodes.a.children");
    }

    #[test]
    fn test_reorder_detection() {
        let desired = vec![node("a", 1, vec![]), node("b", 1, vec![])];
        let observed = vec![node("b", 1, vec![]), node("a", 1, vec![])];

        let changes = diff_tree(&desired, &observed, &shape(true), "items", "Main");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "items.order");

        assert!(diff_tree(&desired, &observed, &shape(false), "items", "Main").is_empty());
    }
}
