//! Registry of the settings known to the page

use crate::consts::{
    FONT_ATTRIBUTE, FONT_SERIF, FONT_SETTING, THEME_AUTOMATIC, THEME_CHOICES, THEME_SETTING,
};
use crate::error::Result;
use crate::page::{Control, Page};
use crate::persistence::PreferenceStore;
use crate::setting::{Setting, root_attribute_toggle, theme_effect};

/// Ordered settings, unique by name
#[derive(Debug, Default)]
pub struct Registry {
    settings: Vec<Setting>,
}

impl Registry {
    pub fn new(settings: Vec<Setting>) -> Self {
        debug_assert!(
            settings
                .iter()
                .enumerate()
                .all(|(i, s)| settings[..i].iter().all(|o| o.name() != s.name())),
            "setting names must be unique"
        );
        Self { settings }
    }

    /// The serif font toggle and the color theme choice
    pub fn standard() -> Self {
        Self::new(vec![
            Setting::toggle(
                FONT_SETTING,
                false,
                root_attribute_toggle(FONT_ATTRIBUTE, FONT_SERIF),
            ),
            Setting::choice(THEME_SETTING, THEME_CHOICES, THEME_AUTOMATIC, theme_effect()),
        ])
    }

    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Setting> {
        self.settings.iter().find(|s| s.name() == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Setting> {
        self.settings.iter_mut().find(|s| s.name() == name)
    }

    /// Load and apply every setting in registration order
    pub fn load_all(&mut self, store: &dyn PreferenceStore, page: &dyn Page) {
        for setting in &mut self.settings {
            setting.load(store, page);
        }
    }

    /// Reflect every setting onto its control, stopping at the first one missing
    pub fn reflect_all(&self, page: &dyn Page) -> Result<()> {
        self.settings
            .iter()
            .try_for_each(|s| s.reflect_to_control(page))
    }

    /// Route a control change to the setting of the same name.
    ///
    /// Controls that no setting claims are ignored.
    pub fn dispatch_update(
        &mut self,
        control_name: &str,
        control: &dyn Control,
        store: &dyn PreferenceStore,
        page: &dyn Page,
    ) -> Result<()> {
        match self.find_by_name_mut(control_name) {
            Some(setting) => setting.update(control, store, page),
            None => {
                log::debug!("No setting named \"{control_name}\", ignoring change");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HeadlessPage;
    use crate::persistence::MemoryStore;
    use crate::setting::SettingValue;

    #[test]
    fn test_standard_registry_order() {
        let registry = Registry::standard();
        let names: Vec<_> = registry.settings().iter().map(|s| s.name()).collect();
        assert_eq!(names, ["useSerifFont", "setTheme"]);
        assert!(registry.find_by_name("setTheme").is_some());
        assert!(registry.find_by_name("settheme").is_none());
    }

    #[test]
    fn test_load_all_empty_store() {
        let store = MemoryStore::new();
        let page = HeadlessPage::with_dark_preference(true);
        let mut registry = Registry::standard();
        registry.load_all(&store, &page);

        assert_eq!(page.root_attribute("data-font"), None);
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));

        let page = HeadlessPage::with_dark_preference(false);
        registry.load_all(&store, &page);
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_load_all_persisted_values() {
        let store = MemoryStore::with_entries([("useSerifFont", "true"), ("setTheme", "\"dark\"")]);
        let page = HeadlessPage::with_dark_preference(false);
        let mut registry = Registry::standard();
        registry.load_all(&store, &page);

        assert_eq!(page.root_attribute("data-font").as_deref(), Some("serif"));
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));
    }

    #[test]
    fn test_load_all_isolates_failures() {
        let store = MemoryStore::with_entries([("setTheme", "\"light\"")]);
        let page = HeadlessPage::new();
        let mut registry = Registry::new(vec![
            Setting::toggle(
                "broken",
                true,
                Box::new(|_: &dyn Page, _: &SettingValue| {
                    Err(crate::SettingsError::Dom("boom".into()))
                }),
            ),
            Setting::choice("setTheme", THEME_CHOICES, "automatic", theme_effect()),
        ]);
        registry.load_all(&store, &page);
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_dispatch_checkbox() {
        let store = MemoryStore::new();
        let page = HeadlessPage::new();
        let input = page.add_control("useSerifFont", "on");
        let mut registry = Registry::standard();
        registry.load_all(&store, &page);

        input.set_checked(true);
        registry
            .dispatch_update("useSerifFont", &input, &store, &page)
            .unwrap();
        assert_eq!(store.get_item("useSerifFont").unwrap().as_deref(), Some("true"));
        assert_eq!(page.root_attribute("data-font").as_deref(), Some("serif"));
        assert_eq!(
            registry.find_by_name("useSerifFont").unwrap().value(),
            &SettingValue::Toggle(true)
        );
    }

    #[test]
    fn test_dispatch_radio_ignores_system_preference() {
        let store = MemoryStore::new();
        let page = HeadlessPage::with_dark_preference(true);
        let light = page.add_radio("setTheme", "light");
        let mut registry = Registry::standard();
        registry.load_all(&store, &page);
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));

        registry
            .dispatch_update("setTheme", &light, &store, &page)
            .unwrap();
        assert_eq!(store.get_item("setTheme").unwrap().as_deref(), Some("\"light\""));
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_dispatch_unknown_name_is_noop() {
        let store = MemoryStore::new();
        let page = HeadlessPage::new();
        let stray = page.add_control("searchScope", "all");
        let mut registry = Registry::standard();

        registry
            .dispatch_update("searchScope", &stray, &store, &page)
            .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_reflect_all_after_load() {
        let store = MemoryStore::with_entries([("useSerifFont", "true"), ("setTheme", "\"light\"")]);
        let page = HeadlessPage::new();
        let font = page.add_control("useSerifFont", "on");
        let themes: Vec<_> = THEME_CHOICES
            .iter()
            .map(|c| page.add_radio("setTheme", c))
            .collect();

        let mut registry = Registry::standard();
        registry.load_all(&store, &page);
        registry.reflect_all(&page).unwrap();

        assert!(font.checked());
        let checked: Vec<_> = themes.iter().map(|c| c.checked()).collect();
        assert_eq!(checked, [true, false, false]);
    }
}
