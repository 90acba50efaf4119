//! Node Queries
//!
//! Structured predicates used to locate descendants, written as JSON
//! object literals, e.g. `{"state": {"selected": true}}`.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::attributes::AttrValue;
use crate::role::Role;
use crate::tree::AccessibilityNode;
use crate::A11yError;

/// Descendant search predicate
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FindQuery {
    pub role: Option<Role>,
    /// State flags that must hold; an absent flag counts as `false`
    pub state: BTreeMap<String, bool>,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl FindQuery {
    /// Parse a JSON object literal
    pub fn from_json(json: &str) -> Result<Self, A11yError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn matches(&self, node: &AccessibilityNode) -> bool {
        if let Some(role) = &self.role {
            if *role != node.role {
                return false;
            }
        }
        self.state.iter().all(|(name, &on)| node.has_state(name) == on)
            && self.attributes.iter().all(|(name, value)| node.attr(name) == Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AccessibilityTree, Role};

    #[test]
    fn test_parse_query() {
        let q = FindQuery::from_json(r#"{"state":{"selected":true,"invisible":false}}"#).unwrap();
        assert_eq!(q.state.get("selected"), Some(&true));
        assert_eq!(q.state.get("invisible"), Some(&false));
        assert!(q.role.is_none());
    }

    #[test]
    fn test_malformed_query() {
        assert!(matches!(
            FindQuery::from_json(r#"{"state":{"selected":true"#),
            Err(A11yError::InvalidQuery(_))
        ));
        assert!(FindQuery::from_json(r#"{"colour":"red"}"#).is_err());
    }

    #[test]
    fn test_find_descendant() {
        let mut tree = AccessibilityTree::new();
        let popup = tree.create_root(Role::MenuListPopup);
        tree.insert(popup, AccessibilityNode::new(Role::MenuListOption).with_attr("name", "Red"))
            .unwrap();
        let green = tree
            .insert(
                popup,
                AccessibilityNode::new(Role::MenuListOption)
                    .with_attr("name", "Green")
                    .with_state("selected", true),
            )
            .unwrap();

        let q = FindQuery::from_json(r#"{"state":{"selected":true,"invisible":false}}"#).unwrap();
        assert_eq!(tree.find(popup, &q), Some(green));

        let q = FindQuery::from_json(r#"{"attributes":{"name":"Blue"}}"#).unwrap();
        assert_eq!(tree.find(popup, &q), None);

        // The search node itself never matches
        let q = FindQuery::from_json(r#"{"role":"menuListPopup"}"#).unwrap();
        assert_eq!(tree.find(popup, &q), None);
    }
}
