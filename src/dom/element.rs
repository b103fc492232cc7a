//! Host element abstraction and an in-memory implementation

use super::event::{Event, EventListener, ListenerId, SyntheticEvent, SUBMIT_EVENT};
use super::selector::Selector;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// The element operations the form controller relies on.
///
/// Implementations are cheap handles: cloning yields another reference to the
/// same underlying element.
pub trait HostElement: Clone {
    /// Descendants matching `selector`, in document order
    fn query_selector_all(&self, selector: &Selector) -> Vec<Self>;

    fn get_attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn has_attribute(&self, name: &str) -> bool;
    fn remove_attribute(&self, name: &str);

    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;

    fn add_event_listener(&self, event_type: &str, listener: Rc<dyn EventListener>)
        -> ListenerId;
    fn remove_event_listener(&self, id: ListenerId);
}

struct Registration {
    id: ListenerId,
    event_type: String,
    listener: Rc<dyn EventListener>,
}

#[derive(Default)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    classes: Vec<String>,
    children: Vec<Element>,
    listeners: Vec<Registration>,
    next_listener_id: u64,
    native_submissions: usize,
}

/// In-memory element tree used as the host for tests and the demo binary
#[derive(Clone, Default)]
pub struct Element(Rc<RefCell<Node>>);

impl Element {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(Node {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        })))
    }

    /// Create an element with the given attributes already set
    pub fn with_attributes(tag: &str, attributes: &[(&str, &str)]) -> Self {
        let element = Self::new(tag);
        for (name, value) in attributes {
            element.set_attribute(name, value);
        }
        element
    }

    pub fn append_child(&self, child: Element) {
        self.0.borrow_mut().children.push(child);
    }

    pub fn tag_name(&self) -> String {
        self.0.borrow().tag.clone()
    }

    /// Space-separated class list, like `Element.className`
    pub fn class_name(&self) -> String {
        self.0.borrow().classes.join(" ")
    }

    /// Number of listeners registered for `event_type`
    pub fn listener_count(&self, event_type: &str) -> usize {
        self.0
            .borrow()
            .listeners
            .iter()
            .filter(|r| r.event_type == event_type)
            .count()
    }

    /// Whether both handles point at the same element
    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Dispatch `event` to every listener registered for `event_type`.
    ///
    /// Listeners are snapshotted before dispatch so they may freely mutate the
    /// element (classes, attributes, listener list).
    pub fn dispatch_event(&self, event_type: &str, event: &dyn Event) {
        let listeners: Vec<Rc<dyn EventListener>> = self
            .0
            .borrow()
            .listeners
            .iter()
            .filter(|r| r.event_type == event_type)
            .map(|r| Rc::clone(&r.listener))
            .collect();
        for listener in listeners {
            listener.handle_event(event);
        }
    }

    /// Fire a submit event. Returns true when no listener cancelled it, in
    /// which case the native submission is recorded.
    pub fn submit(&self) -> bool {
        let event = SyntheticEvent::new(SUBMIT_EVENT);
        self.dispatch_event(SUBMIT_EVENT, &event);
        if event.default_prevented() {
            return false;
        }
        self.0.borrow_mut().native_submissions += 1;
        true
    }

    /// How many submits fell through to native navigation
    pub fn native_submissions(&self) -> usize {
        self.0.borrow().native_submissions
    }

    fn collect_matching(&self, selector: &Selector, out: &mut Vec<Element>) {
        let children = self.0.borrow().children.clone();
        for child in children {
            if child.matches(selector) {
                out.push(child.clone());
            }
            child.collect_matching(selector, out);
        }
    }

    fn matches(&self, selector: &Selector) -> bool {
        let node = self.0.borrow();
        selector.matches(&node.tag, |name| {
            node.attributes.get(name).map(String::as_str)
        })
    }
}

impl HostElement for Element {
    fn query_selector_all(&self, selector: &Selector) -> Vec<Self> {
        let mut found = Vec::new();
        self.collect_matching(selector, &mut found);
        found
    }

    fn get_attribute(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.0
            .borrow()
            .attributes
            .contains_key(&name.to_ascii_lowercase())
    }

    fn remove_attribute(&self, name: &str) {
        self.0
            .borrow_mut()
            .attributes
            .remove(&name.to_ascii_lowercase());
    }

    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn add_event_listener(
        &self,
        event_type: &str,
        listener: Rc<dyn EventListener>,
    ) -> ListenerId {
        let mut node = self.0.borrow_mut();
        node.next_listener_id += 1;
        let id = ListenerId(node.next_listener_id);
        node.listeners.push(Registration {
            id,
            event_type: event_type.to_string(),
            listener,
        });
        id
    }

    fn remove_event_listener(&self, id: ListenerId) {
        self.0.borrow_mut().listeners.retain(|r| r.id != id);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Element")
            .field("tag", &node.tag)
            .field("attributes", &node.attributes)
            .field("classes", &node.classes)
            .field("children", &node.children.len())
            .field("listeners", &node.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn form_with_buttons(count: usize) -> Element {
        let form = Element::with_attributes("form", &[("action-xhr", "https://example.com")]);
        form.append_child(Element::with_attributes(
            "input",
            &[("name", "name"), ("value", "John Miller")],
        ));
        for _ in 0..count {
            form.append_child(Element::with_attributes("input", &[("type", "submit")]));
        }
        form
    }

    mod attributes {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_get_remove() {
            let el = Element::new("input");
            assert!(!el.has_attribute("disabled"));
            el.set_attribute("disabled", "");
            assert!(el.has_attribute("disabled"));
            assert_eq!(el.get_attribute("disabled"), Some(String::new()));
            el.remove_attribute("disabled");
            assert!(!el.has_attribute("disabled"));
            assert_eq!(el.get_attribute("disabled"), None);
        }

        #[test]
        fn test_names_are_case_insensitive() {
            let el = Element::new("form");
            el.set_attribute("Action-XHR", "https://example.com");
            assert_eq!(
                el.get_attribute("action-xhr").as_deref(),
                Some("https://example.com")
            );
        }
    }

    mod classes {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_add_is_idempotent() {
            let el = Element::new("form");
            el.add_class("a");
            el.add_class("a");
            el.add_class("b");
            assert_eq!(el.class_name(), "a b");
        }

        #[test]
        fn test_remove_missing_is_noop() {
            let el = Element::new("form");
            el.add_class("a");
            el.remove_class("z");
            el.remove_class("a");
            assert!(!el.has_class("a"));
            assert_eq!(el.class_name(), "");
        }
    }

    mod queries {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_finds_submit_controls_in_order() {
            let form = form_with_buttons(2);
            let selector = Selector::attribute_equals("input", "type", "submit");
            let found = form.query_selector_all(&selector);
            assert_eq!(found.len(), 2);
            assert!(!found[0].ptr_eq(&found[1]));
        }

        #[test]
        fn test_searches_nested_descendants() {
            let form = Element::new("form");
            let fieldset = Element::new("fieldset");
            let button = Element::with_attributes("input", &[("type", "submit")]);
            fieldset.append_child(button.clone());
            form.append_child(fieldset);
            let selector = Selector::attribute_equals("input", "type", "submit");
            let found = form.query_selector_all(&selector);
            assert_eq!(found.len(), 1);
            assert!(found[0].ptr_eq(&button));
        }

        #[test]
        fn test_does_not_match_self() {
            let input = Element::with_attributes("input", &[("type", "submit")]);
            let selector = Selector::attribute_equals("input", "type", "submit");
            assert!(input.query_selector_all(&selector).is_empty());
        }
    }

    mod events {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_submit_without_listeners_navigates() {
            let form = form_with_buttons(1);
            assert!(form.submit());
            assert_eq!(form.native_submissions(), 1);
        }

        #[test]
        fn test_listener_can_cancel_submit() {
            let form = form_with_buttons(1);
            let calls = Rc::new(Cell::new(0));
            let seen = Rc::clone(&calls);
            form.add_event_listener(
                SUBMIT_EVENT,
                Rc::new(move |event: &dyn Event| {
                    seen.set(seen.get() + 1);
                    event.prevent_default();
                }),
            );
            assert!(!form.submit());
            assert_eq!(calls.get(), 1);
            assert_eq!(form.native_submissions(), 0);
        }

        #[test]
        fn test_remove_listener() {
            let form = form_with_buttons(1);
            let id = form.add_event_listener(
                SUBMIT_EVENT,
                Rc::new(|event: &dyn Event| event.prevent_default()),
            );
            assert_eq!(form.listener_count(SUBMIT_EVENT), 1);
            form.remove_event_listener(id);
            assert_eq!(form.listener_count(SUBMIT_EVENT), 0);
            assert!(form.submit());
        }

        #[test]
        fn test_listener_only_sees_its_event_type() {
            let form = form_with_buttons(1);
            form.add_event_listener(
                "reset",
                Rc::new(|event: &dyn Event| event.prevent_default()),
            );
            assert_eq!(form.listener_count(SUBMIT_EVENT), 0);
            assert!(form.submit());
        }
    }
}
