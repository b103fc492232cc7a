//! Element selectors used by [`HostElement::query_selector_all`]
//!
//! Only the `tag[name=value]` form is needed to find submit controls.
//!
//! [`HostElement::query_selector_all`]: super::HostElement::query_selector_all

/// A tag name plus one exact attribute test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    tag: String,
    name: String,
    value: String,
}

impl Selector {
    /// `tag[name=value]`
    pub fn attribute_equals(tag: &str, name: &str, value: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            name: name.to_ascii_lowercase(),
            value: value.to_string(),
        }
    }

    /// Test a candidate given its tag and an attribute lookup.
    /// Tag names compare case-insensitively, attribute values exactly.
    pub fn matches<'a>(&self, tag: &str, attribute: impl Fn(&str) -> Option<&'a str>) -> bool {
        self.tag.eq_ignore_ascii_case(tag) && attribute(&self.name) == Some(self.value.as_str())
    }
}
