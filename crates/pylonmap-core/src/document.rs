//! Generic tagged-object document model.
//!
//! The network export is a tree of named elements. Loaders materialize each
//! catalog object as a [`TaggedObject`]; everything downstream reads fields
//! through the accessor methods here, which return `None` instead of failing
//! when a child is missing.

use serde::{Deserialize, Serialize};

/// One element of the source document with its direct text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedObject {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TaggedObject>,
}

impl TaggedObject {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Builder helper used by loaders and tests: append a leaf child with text.
    pub fn with_field(mut self, tag: impl Into<String>, text: impl Into<String>) -> Self {
        self.children.push(TaggedObject::new(tag).with_text(text));
        self
    }

    /// Append an arbitrary child element.
    pub fn with_child(mut self, child: TaggedObject) -> Self {
        self.children.push(child);
        self
    }

    /// Set the element text. Blank text is stored as absent.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        let trimmed = text.trim();
        self.text = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&TaggedObject> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// All direct children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TaggedObject> {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    /// Text of the first direct child with the given tag.
    ///
    /// Absent when the child is missing or its text is empty.
    pub fn field(&self, tag: &str) -> Option<&str> {
        self.child(tag).and_then(|c| c.text.as_deref())
    }

    /// Owned variant of [`TaggedObject::field`].
    pub fn field_owned(&self, tag: &str) -> Option<String> {
        self.field(tag).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_present_and_missing() {
        let obj = TaggedObject::new("Obj")
            .with_field("Ref", "abc")
            .with_field("Description", "Опора 1");

        assert_eq!(obj.field("Ref"), Some("abc"));
        assert_eq!(obj.field("Description"), Some("Опора 1"));
        assert_eq!(obj.field("Parent"), None);
    }

    #[test]
    fn test_blank_text_is_absent() {
        let obj = TaggedObject::new("Obj").with_field("Parent", "   ");
        assert!(obj.child("Parent").is_some());
        assert_eq!(obj.field("Parent"), None);
    }

    #[test]
    fn test_first_matching_child_wins() {
        let obj = TaggedObject::new("Obj")
            .with_field("Ref", "first")
            .with_field("Ref", "second");
        assert_eq!(obj.field("Ref"), Some("first"));
        assert_eq!(obj.children_named("Ref").count(), 2);
    }
}
