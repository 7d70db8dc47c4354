//! docprefs - reader preferences for documentation pages
//!
//! Core modules:
//! - `setting`: Setting descriptors (checkbox toggle, radio choice)
//! - `registry`: The fixed list of settings known to the page
//! - `theme`: Color theme resolution against the system preference
//! - `binder`: Document-ready reflection and change routing
//! - `context`: Process-wide state handed to every handler
//! - `persistence`: JSON-text preference store
//! - `page`: Document abstraction (headless stand-in for native builds)
//! - `platform`: Browser bindings (wasm32 only)

pub mod binder;
pub mod context;
pub mod error;
pub mod page;
pub mod persistence;
pub mod platform;
pub mod registry;
pub mod setting;
pub mod theme;

pub use context::PreferenceContext;
pub use error::{Result, SettingsError};
pub use page::{Control, HeadlessPage, Overlay, Page};
pub use persistence::{MemoryStore, PreferenceStore};
pub use registry::Registry;
pub use setting::{Setting, SettingKind, SettingValue};
pub use theme::{ResolvedTheme, resolve_theme};

/// Storage keys, document attributes and selectors
pub mod consts {
    /// Store key of the serif font toggle
    pub const FONT_SETTING: &str = "useSerifFont";
    /// Store key of the color theme choice
    pub const THEME_SETTING: &str = "setTheme";

    /// Root attribute present while the serif font is on
    pub const FONT_ATTRIBUTE: &str = "data-font";
    pub const FONT_SERIF: &str = "serif";

    /// Root attribute holding the resolved theme
    pub const THEME_ATTRIBUTE: &str = "data-theme";
    pub const THEME_LIGHT: &str = "light";
    pub const THEME_DARK: &str = "dark";
    pub const THEME_AUTOMATIC: &str = "automatic";
    /// Radio values offered for the theme, in document order
    pub const THEME_CHOICES: &[&str] = &[THEME_LIGHT, THEME_DARK, THEME_AUTOMATIC];

    pub const DARK_SCHEME_QUERY: &str = "(prefers-color-scheme: dark)";
    /// Container the settings overlay is built from
    pub const SETTINGS_OVERLAY_SELECTOR: &str = "div#settings.modal";
}
