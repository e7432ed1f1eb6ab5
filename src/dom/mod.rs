//! Page Abstraction
//!
//! The controller never touches a concrete DOM. It writes through the
//! [`Document`] trait: element ids, classes, attributes, inner HTML, input
//! values, toasts and the viewport width. Operations on ids the page does
//! not contain are silent no-ops, like a `null` element lookup in a browser.

mod memory;

pub use memory::{Element, MemoryDocument};

/// Severity of a toast notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// The page the controller renders into
pub trait Document: Send {
    /// Whether an element with this id exists
    fn exists(&self, id: &str) -> bool;

    fn set_html(&mut self, id: &str, html: &str);

    fn inner_html(&self, id: &str) -> Option<String>;

    fn set_text(&mut self, id: &str, text: &str);

    fn text(&self, id: &str) -> Option<String>;

    fn add_class(&mut self, id: &str, class: &str);

    fn remove_class(&mut self, id: &str, class: &str);

    fn has_class(&self, id: &str, class: &str) -> bool;

    /// Ids of every element carrying `class`, in document order
    fn ids_with_class(&self, class: &str) -> Vec<String>;

    fn attribute(&self, id: &str, name: &str) -> Option<String>;

    /// Set the value of an input element
    fn set_value(&mut self, id: &str, value: &str);

    fn value(&self, id: &str) -> Option<String>;

    fn focus(&mut self, id: &str);

    fn show_toast(&mut self, level: ToastLevel, message: &str);

    /// Current viewport width in CSS pixels
    fn viewport_width(&self) -> u32;

    /// Flip `class` on an element; returns whether it is now present
    fn toggle_class(&mut self, id: &str, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            self.has_class(id, class)
        }
    }

    /// Remove `class` from every element that carries `marker`
    fn remove_class_from_all(&mut self, marker: &str, class: &str) {
        for id in self.ids_with_class(marker) {
            self.remove_class(&id, class);
        }
    }
}
