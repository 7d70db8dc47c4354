//! Color theme resolution
//!
//! The stored preference may be `automatic`, which follows the system color
//! scheme at the moment it is resolved. Nothing is cached: every load or
//! update queries the platform again.

use crate::consts::{THEME_ATTRIBUTE, THEME_AUTOMATIC, THEME_DARK, THEME_LIGHT};
use crate::error::{Result, SettingsError};
use crate::page::Page;

/// Concrete theme written to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

impl ResolvedTheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedTheme::Light => THEME_LIGHT,
            ResolvedTheme::Dark => THEME_DARK,
        }
    }
}

/// Resolve a theme preference against the system dark-scheme query.
///
/// `light` and `dark` resolve to themselves; `automatic` follows the system,
/// falling back to light when the platform cannot answer the query
/// (`prefers_dark == None`). Unknown preferences resolve to `None`.
pub fn resolve_theme(preference: &str, prefers_dark: Option<bool>) -> Option<ResolvedTheme> {
    match preference {
        THEME_LIGHT => Some(ResolvedTheme::Light),
        THEME_DARK => Some(ResolvedTheme::Dark),
        THEME_AUTOMATIC if prefers_dark.unwrap_or(false) => Some(ResolvedTheme::Dark),
        THEME_AUTOMATIC => Some(ResolvedTheme::Light),
        _ => None,
    }
}

/// Apply a theme preference to the page
pub fn apply_theme(page: &dyn Page, preference: &str) -> Result<()> {
    let theme = resolve_theme(preference, page.prefers_dark_scheme()).ok_or_else(|| {
        SettingsError::UnknownChoice {
            name: THEME_ATTRIBUTE.to_string(),
            value: preference.to_string(),
        }
    })?;
    log::debug!("Applying theme {} (preference {preference})", theme.as_str());
    page.set_root_attribute(THEME_ATTRIBUTE, theme.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::HeadlessPage;
    use proptest::prelude::*;

    #[test]
    fn test_explicit_themes_pass_through() {
        for dark in [Some(true), Some(false), None] {
            assert_eq!(resolve_theme("light", dark), Some(ResolvedTheme::Light));
            assert_eq!(resolve_theme("dark", dark), Some(ResolvedTheme::Dark));
        }
    }

    #[test]
    fn test_automatic_follows_system() {
        assert_eq!(resolve_theme("automatic", Some(true)), Some(ResolvedTheme::Dark));
        assert_eq!(resolve_theme("automatic", Some(false)), Some(ResolvedTheme::Light));
    }

    #[test]
    fn test_automatic_without_query_is_light() {
        assert_eq!(resolve_theme("automatic", None), Some(ResolvedTheme::Light));
    }

    #[test]
    fn test_apply_requeries_system() {
        let page = HeadlessPage::with_dark_preference(true);
        apply_theme(&page, "automatic").unwrap();
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("dark"));

        page.set_prefers_dark(Some(false));
        apply_theme(&page, "automatic").unwrap();
        assert_eq!(page.root_attribute("data-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_apply_unknown_preference_fails() {
        let page = HeadlessPage::with_dark_preference(true);
        let err = apply_theme(&page, "sepia").unwrap_err();
        assert!(matches!(err, SettingsError::UnknownChoice { ref value, .. } if value == "sepia"));
        assert_eq!(page.root_attribute("data-theme"), None);
    }

    proptest! {
        #[test]
        fn prop_unknown_preferences_unresolved(pref in "[a-z]{1,12}", dark in any::<Option<bool>>()) {
            prop_assume!(!["light", "dark", "automatic"].contains(&pref.as_str()));
            prop_assert_eq!(resolve_theme(&pref, dark), None);
        }
    }
}
