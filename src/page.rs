//! Page abstraction
//!
//! Everything the settings logic needs from the document goes through
//! [`Page`]: root marker attributes, input control lookup, the system color
//! scheme query and the settings overlay. The browser implementation lives in
//! `platform::web`; [`HeadlessPage`] is an in-memory stand-in for native
//! builds and tests.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::error::Result;

/// An `<input>` bound to a setting
pub trait Control {
    fn name(&self) -> String;
    fn checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
    fn value(&self) -> String;
}

/// The settings panel chrome, owned by page script
pub trait Overlay {
    fn show(&self);
    fn hide(&self);
}

pub trait Page {
    /// Set an attribute on the document element
    fn set_root_attribute(&self, name: &str, value: &str) -> Result<()>;

    /// Remove an attribute from the document element
    fn remove_root_attribute(&self, name: &str) -> Result<()>;

    /// Whether the system prefers a dark color scheme.
    ///
    /// `None` when the platform cannot answer the query.
    fn prefers_dark_scheme(&self) -> Option<bool>;

    /// First input whose `name` matches, and whose `value` matches too if given
    fn find_control(&self, name: &str, value: Option<&str>) -> Option<Box<dyn Control>>;

    /// Acquire the settings overlay from its container
    fn settings_overlay(&self) -> Option<Box<dyn Overlay>>;
}

impl<C: Control + ?Sized> Control for Rc<C> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn checked(&self) -> bool {
        (**self).checked()
    }

    fn set_checked(&self, checked: bool) {
        (**self).set_checked(checked)
    }

    fn value(&self) -> String {
        (**self).value()
    }
}

impl<O: Overlay + ?Sized> Overlay for Rc<O> {
    fn show(&self) {
        (**self).show()
    }

    fn hide(&self) {
        (**self).hide()
    }
}

#[derive(Debug)]
enum CheckState {
    /// Checkbox: checked independently
    Own(Cell<bool>),
    /// Radio: value of the checked member of the group, shared by every
    /// radio with the same `name`
    Group(Rc<RefCell<Option<String>>>),
}

/// In-memory input control
#[derive(Debug)]
pub struct HeadlessControl {
    name: String,
    value: String,
    state: CheckState,
}

impl HeadlessControl {
    /// Checkbox-style control
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            state: CheckState::Own(Cell::new(false)),
        }
    }

    fn radio(name: &str, value: &str, group: Rc<RefCell<Option<String>>>) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            state: CheckState::Group(group),
        }
    }

    fn group(&self) -> Option<Rc<RefCell<Option<String>>>> {
        match &self.state {
            CheckState::Own(_) => None,
            CheckState::Group(group) => Some(group.clone()),
        }
    }
}

impl Control for HeadlessControl {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn checked(&self) -> bool {
        match &self.state {
            CheckState::Own(checked) => checked.get(),
            CheckState::Group(group) => group.borrow().as_deref() == Some(self.value.as_str()),
        }
    }

    /// Checking a radio unchecks the rest of its group
    fn set_checked(&self, checked: bool) {
        match &self.state {
            CheckState::Own(cell) => cell.set(checked),
            CheckState::Group(group) => {
                let mut current = group.borrow_mut();
                if checked {
                    *current = Some(self.value.clone());
                } else if current.as_deref() == Some(self.value.as_str()) {
                    *current = None;
                }
            }
        }
    }

    fn value(&self) -> String {
        self.value.clone()
    }
}

#[derive(Debug, Default)]
pub struct HeadlessOverlay {
    visible: Cell<bool>,
}

impl HeadlessOverlay {
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }
}

impl Overlay for HeadlessOverlay {
    fn show(&self) {
        self.visible.set(true);
    }

    fn hide(&self) {
        self.visible.set(false);
    }
}

/// Document stand-in with no browser behind it
#[derive(Debug, Default)]
pub struct HeadlessPage {
    attributes: RefCell<BTreeMap<String, String>>,
    controls: RefCell<Vec<Rc<HeadlessControl>>>,
    prefers_dark: Cell<Option<bool>>,
    overlay: RefCell<Option<Rc<HeadlessOverlay>>>,
}

impl HeadlessPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Page whose platform answers the dark-scheme query with `dark`
    pub fn with_dark_preference(dark: bool) -> Self {
        let page = Self::new();
        page.set_prefers_dark(Some(dark));
        page
    }

    /// Change what the dark-scheme query reports (`None` = query unavailable)
    pub fn set_prefers_dark(&self, dark: Option<bool>) {
        self.prefers_dark.set(dark);
    }

    /// Add an `<input type=checkbox name=.. value=..>` to the page
    pub fn add_control(&self, name: &str, value: &str) -> Rc<HeadlessControl> {
        let control = Rc::new(HeadlessControl::new(name, value));
        self.controls.borrow_mut().push(control.clone());
        control
    }

    /// Add an `<input type=radio name=.. value=..>`, joining the group of
    /// radios already sharing `name`
    pub fn add_radio(&self, name: &str, value: &str) -> Rc<HeadlessControl> {
        let group = self
            .controls
            .borrow()
            .iter()
            .filter(|c| c.name == name)
            .find_map(|c| c.group())
            .unwrap_or_default();
        let control = Rc::new(HeadlessControl::radio(name, value, group));
        self.controls.borrow_mut().push(control.clone());
        control
    }

    /// Add the `div#settings.modal` container
    pub fn add_overlay(&self) -> Rc<HeadlessOverlay> {
        let overlay = Rc::new(HeadlessOverlay::default());
        *self.overlay.borrow_mut() = Some(overlay.clone());
        overlay
    }

    pub fn root_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }
}

impl Page for HeadlessPage {
    fn set_root_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove_root_attribute(&self, name: &str) -> Result<()> {
        self.attributes.borrow_mut().remove(name);
        Ok(())
    }

    fn prefers_dark_scheme(&self) -> Option<bool> {
        self.prefers_dark.get()
    }

    fn find_control(&self, name: &str, value: Option<&str>) -> Option<Box<dyn Control>> {
        self.controls
            .borrow()
            .iter()
            .find(|c| c.name == name && value.is_none_or(|v| c.value == v))
            .map(|c| Box::new(c.clone()) as Box<dyn Control>)
    }

    fn settings_overlay(&self) -> Option<Box<dyn Overlay>> {
        self.overlay
            .borrow()
            .as_ref()
            .map(|o| Box::new(o.clone()) as Box<dyn Overlay>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_control_by_name_and_value() {
        let page = HeadlessPage::new();
        page.add_radio("setTheme", "light");
        page.add_radio("setTheme", "dark");

        let dark = page.find_control("setTheme", Some("dark")).unwrap();
        assert_eq!(dark.value(), "dark");
        // Without a value the first match wins
        assert_eq!(page.find_control("setTheme", None).unwrap().value(), "light");
        assert!(page.find_control("setTheme", Some("sepia")).is_none());
        assert!(page.find_control("useSerifFont", None).is_none());
    }

    #[test]
    fn test_found_control_shares_state() {
        let page = HeadlessPage::new();
        let input = page.add_control("useSerifFont", "on");
        page.find_control("useSerifFont", None)
            .unwrap()
            .set_checked(true);
        assert!(input.checked());
    }

    #[test]
    fn test_radio_group_is_exclusive() {
        let page = HeadlessPage::new();
        let light = page.add_radio("setTheme", "light");
        let dark = page.add_radio("setTheme", "dark");
        let font = page.add_control("useSerifFont", "on");
        font.set_checked(true);

        light.set_checked(true);
        dark.set_checked(true);
        assert!(dark.checked());
        assert!(!light.checked());
        // Other groups are untouched
        assert!(font.checked());

        // Unchecking a radio that is not selected changes nothing
        light.set_checked(false);
        assert!(dark.checked());
    }

    #[test]
    fn test_root_attributes() {
        let page = HeadlessPage::new();
        page.set_root_attribute("data-font", "serif").unwrap();
        assert_eq!(page.root_attribute("data-font").as_deref(), Some("serif"));
        page.remove_root_attribute("data-font").unwrap();
        assert_eq!(page.root_attribute("data-font"), None);
        // Removing an absent attribute is fine
        page.remove_root_attribute("data-font").unwrap();
    }
}
