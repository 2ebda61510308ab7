//! # In-Memory Page
//!
//! A serialisable element tree implementing the decoration traits.
//!
//! Used to decorate page snapshots offline (CLI, HTTP API) and as the test
//! double for [`crate::decorate`]. A snapshot is a JSON document:
//!
//! ```json
//! { "nodes": [ { "tag": "span", "classes": ["z-score-value"], "text": "-1.2" } ] }
//! ```

use crate::decorate::{PageDocument, PageElement};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One element of a page snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Own text, excluding children.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PageNode>,
}

impl PageNode {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(property.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: PageNode) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    fn visit_with_class(&mut self, class: &str, visit: &mut dyn FnMut(&mut PageNode)) {
        if self.has_class(class) {
            visit(self);
        }
        for child in &mut self.children {
            child.visit_with_class(class, visit);
        }
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }
}

impl PageElement for PageNode {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn set_style(&mut self, property: &str, value: &str) {
        self.style.insert(property.to_string(), value.to_string());
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn descendant_with_attribute(&self, name: &str) -> Option<&Self> {
        self.children.iter().find_map(|child| {
            if child.attributes.contains_key(name) {
                Some(child)
            } else {
                child.descendant_with_attribute(name)
            }
        })
    }

    fn descendant_with_attribute_mut(&mut self, name: &str) -> Option<&mut Self> {
        for child in &mut self.children {
            if child.attributes.contains_key(name) {
                return Some(child);
            }
            if let Some(found) = child.descendant_with_attribute_mut(name) {
                return Some(found);
            }
        }
        None
    }
}

/// A page snapshot: an ordered forest of top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub nodes: Vec<PageNode>,
}

impl Page {
    #[must_use]
    pub fn new(nodes: Vec<PageNode>) -> Self {
        Self { nodes }
    }

    /// Count of nodes carrying `class`, at any depth.
    #[must_use]
    pub fn count_with_class(&self, class: &str) -> usize {
        fn count(node: &PageNode, class: &str) -> usize {
            usize::from(node.has_class(class))
                + node.children.iter().map(|c| count(c, class)).sum::<usize>()
        }
        self.nodes.iter().map(|n| count(n, class)).sum()
    }
}

impl PageDocument for Page {
    type Element = PageNode;

    fn for_each_with_class(&mut self, class: &str, visit: &mut dyn FnMut(&mut PageNode)) {
        for node in &mut self.nodes {
            node.visit_with_class(class, visit);
        }
    }
}
