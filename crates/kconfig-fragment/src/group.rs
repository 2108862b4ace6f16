//! Conditional group parser.
//!
//! The conditional source is an XML fragment with several top-level
//! elements:
//!
//! ```xml
//! <kernel minlts="4.19.0" />
//! <group>
//!     <conditions>
//!         <config><key>CONFIG_ARM64</key><value type="bool">y</value></config>
//!     </conditions>
//!     <config><key>CONFIG_ARMV8_DEPRECATED</key><value type="bool">y</value></config>
//! </group>
//! ```
//!
//! It is wrapped in a synthetic root before parsing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};

/// Errors raised while parsing conditional groups.
#[derive(Debug, thiserror::Error)]
pub enum GroupParseError {
    #[error("Failed to read conditional file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed conditional XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Group {group}: <{parent}> entry is missing <{element}>")]
    MissingElement {
        group: usize,
        parent: &'static str,
        element: &'static str,
    },
}

/// One conditional unit: configs applied when all conditions hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigGroup {
    /// Required base config values (all must match).
    pub conditions: BTreeMap<String, String>,

    /// Values emitted when the group matches.
    pub configs: BTreeMap<String, String>,
}

impl ConfigGroup {
    /// Build a group from condition and config pairs.
    pub fn new<I, J, K, V>(conditions: I, configs: J) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        J: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            conditions: conditions
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            configs: configs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Parse a conditional group file.
pub fn load_groups(path: &Path) -> Result<Vec<ConfigGroup>, GroupParseError> {
    let content = fs::read_to_string(path)?;
    parse_groups(&content)
}

/// Parse conditional groups from source text, in source order.
pub fn parse_groups(content: &str) -> Result<Vec<ConfigGroup>, GroupParseError> {
    let wrapped = format!("<root>{}</root>", content);
    let doc = Document::parse(&wrapped)?;

    let mut groups = Vec::new();
    for (index, group) in child_elements(doc.root_element(), "group").enumerate() {
        let mut parsed = ConfigGroup::default();

        for conditions in child_elements(group, "conditions") {
            for entry in child_elements(conditions, "config") {
                let (key, value) = key_value(entry, index, "conditions")?;
                parsed.conditions.insert(key, value);
            }
        }

        for entry in child_elements(group, "config") {
            let (key, value) = key_value(entry, index, "config")?;
            parsed.configs.insert(key, value);
        }

        groups.push(parsed);
    }

    Ok(groups)
}

fn child_elements<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.has_tag_name(name))
}

fn key_value(
    entry: Node<'_, '_>,
    group: usize,
    parent: &'static str,
) -> Result<(String, String), GroupParseError> {
    let key = child_text(entry, "key").ok_or(GroupParseError::MissingElement {
        group,
        parent,
        element: "key",
    })?;
    let value = child_text(entry, "value").ok_or(GroupParseError::MissingElement {
        group,
        parent,
        element: "value",
    })?;
    Ok((key, value))
}

/// Trimmed text of the first `name` child; an empty element yields "".
fn child_text(node: Node<'_, '_>, name: &'static str) -> Option<String> {
    child_elements(node, name)
        .next()
        .map(|n| n.text().unwrap_or_default().trim().to_string())
}
