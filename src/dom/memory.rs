//! In-memory page
//!
//! A headless [`Document`] used by the CLI and by tests. `cpa_page` builds
//! the element layout the dashboard template provides.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{Document, ToastLevel};
use crate::model::{LeadStage, TaxCategory};

/// Views that have a section and a nav entry on the page
pub const PAGE_VIEWS: &[&str] = &["dashboard", "insights", "clients", "pipeline", "review"];

/// A single element of the in-memory page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub id: String,
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub html: String,
    pub text: String,
    pub value: String,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder method: add a class
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    /// Builder method: set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Headless page kept entirely in memory
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    elements: Vec<Element>,
    index: HashMap<String, usize>,
    toasts: Vec<(ToastLevel, String)>,
    focused: Option<String>,
    viewport_width: u32,
}

impl MemoryDocument {
    /// Create an empty page
    pub fn new(viewport_width: u32) -> Self {
        Self {
            elements: Vec::new(),
            index: HashMap::new(),
            toasts: Vec::new(),
            focused: None,
            viewport_width,
        }
    }

    /// Page with every element id the dashboard controller expects
    pub fn cpa_page(viewport_width: u32) -> Self {
        let mut page = Self::new(viewport_width);

        page.insert(Element::new("sidebar"));
        page.insert(Element::new("mobile-overlay"));

        for view in PAGE_VIEWS {
            page.insert(Element::new(format!("view-{}", view)).class("view-section"));
            page.insert(
                Element::new(format!("nav-{}", view))
                    .class("nav-item")
                    .attr("data-view", *view),
            );
        }

        for id in [
            "top-insights",
            "high-value-clients",
            "total-savings",
            "total-clients",
            "total-insights",
            "insights-list",
            "clients-list",
            "review-list",
            "insights-badge",
            "clients-badge",
            "pipeline-badge",
            "review-badge",
        ] {
            page.insert(Element::new(id));
        }

        for category in TaxCategory::all() {
            page.insert(Element::new(format!("{}-count", category)));
            page.insert(Element::new(format!("{}-level", category)));
        }

        for stage in LeadStage::all() {
            page.insert(Element::new(format!("pipeline-{}", stage)));
            page.insert(Element::new(format!("pipeline-{}-count", stage)));
        }

        page.insert(
            Element::new("filter-all")
                .class("filter-chip")
                .class("active")
                .attr("data-category", "all"),
        );
        for category in TaxCategory::all() {
            page.insert(
                Element::new(format!("filter-{}", category))
                    .class("filter-chip")
                    .attr("data-category", category.as_str()),
            );
        }

        for panel in ["insight-panel", "client-panel"] {
            page.insert(Element::new(panel).class("detail-panel"));
            page.insert(Element::new(format!("{}-title", panel)));
            page.insert(Element::new(format!("{}-body", panel)));
        }
        page.insert(Element::new("panel-overlay"));

        page.insert(Element::new("command-palette"));
        page.insert(Element::new("palette-input"));
        page.insert(Element::new("palette-results"));

        page
    }

    /// Add or replace an element
    pub fn insert(&mut self, element: Element) {
        match self.index.get(&element.id) {
            Some(&pos) => self.elements[pos] = element,
            None => {
                self.index.insert(element.id.clone(), self.elements.len());
                self.elements.push(element);
            }
        }
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.index.get(id).map(|&pos| &self.elements[pos])
    }

    fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        match self.index.get(id) {
            Some(&pos) => self.elements.get_mut(pos),
            None => {
                tracing::trace!(id = %id, "element not on page");
                None
            }
        }
    }

    /// Toasts shown so far, oldest first
    pub fn toasts(&self) -> &[(ToastLevel, String)] {
        &self.toasts
    }

    /// Id of the focused element
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }
}

impl Document for MemoryDocument {
    fn exists(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    fn set_html(&mut self, id: &str, html: &str) {
        if let Some(el) = self.element_mut(id) {
            el.html = html.to_string();
            el.text.clear();
        }
    }

    fn inner_html(&self, id: &str) -> Option<String> {
        self.element(id).map(|el| el.html.clone())
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.element_mut(id) {
            el.text = text.to_string();
            el.html.clear();
        }
    }

    fn text(&self, id: &str) -> Option<String> {
        self.element(id).map(|el| el.text.clone())
    }

    fn add_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.remove(class);
        }
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.element(id)
            .map(|el| el.classes.contains(class))
            .unwrap_or(false)
    }

    fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.elements
            .iter()
            .filter(|el| el.classes.contains(class))
            .map(|el| el.id.clone())
            .collect()
    }

    fn attribute(&self, id: &str, name: &str) -> Option<String> {
        self.element(id).and_then(|el| el.attributes.get(name).cloned())
    }

    fn set_value(&mut self, id: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            el.value = value.to_string();
        }
    }

    fn value(&self, id: &str) -> Option<String> {
        self.element(id).map(|el| el.value.clone())
    }

    fn focus(&mut self, id: &str) {
        if self.exists(id) {
            self.focused = Some(id.to_string());
        }
    }

    fn show_toast(&mut self, level: ToastLevel, message: &str) {
        self.toasts.push((level, message.to_string()));
    }

    fn viewport_width(&self) -> u32 {
        self.viewport_width
    }
}
