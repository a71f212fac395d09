//! Depth-first search for GHS hazard statement records in an untyped JSON tree.
//!
//! PubChem nests the hazard statements somewhere below `Record.Section[..]`, and
//! the exact path differs between compounds and between classification sources.
//! The walker therefore tests every mapping it meets instead of following a path.

use serde_json::Value;

/// Field that names the kind of information a PubChem node holds.
pub const NAME_FIELD: &str = "Name";

/// `Name` value that marks a hazard statement record.
pub const HAZARD_STATEMENTS: &str = "GHS Hazard Statements";

/// Nodes nested deeper than this are skipped.
pub const MAX_DEPTH: usize = 512;

/// Collect the raw text of every hazard statement in `root`.
///
/// A matching node looks like
/// `{"Name": "GHS Hazard Statements", "Value": {"StringWithMarkup": [{"String": "..."}]}}`.
/// Every occurrence is collected, including records nested inside other records.
/// Missing or mistyped fields simply contribute nothing.
pub fn walk(root: &Value) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut stack: Vec<(&Value, usize)> = vec![(root, 0)];
    let mut truncated = false;

    while let Some((node, depth)) = stack.pop() {
        if depth > MAX_DEPTH {
            truncated = true;
            continue;
        }

        match node {
            Value::Object(map) => {
                if map.get(NAME_FIELD).and_then(Value::as_str) == Some(HAZARD_STATEMENTS) {
                    fragments.extend(statement_strings(node));
                }
                // Reverse so siblings come off the stack in document order.
                stack.extend(map.values().rev().map(|child| (child, depth + 1)));
            }
            Value::Array(items) => {
                stack.extend(items.iter().rev().map(|child| (child, depth + 1)));
            }
            Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => {}
        }
    }

    if truncated {
        tracing::warn!(
            max_depth = MAX_DEPTH,
            "hazard record nesting exceeds depth limit; deeper nodes were skipped"
        );
    }

    fragments
}

/// `Value.StringWithMarkup[*].String` of a hazard statement node.
fn statement_strings(node: &Value) -> impl Iterator<Item = &str> {
    node.get("Value")
        .and_then(|v| v.get("StringWithMarkup"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("String").and_then(Value::as_str))
}
