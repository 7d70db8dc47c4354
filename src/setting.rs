//! Setting descriptors
//!
//! A [`Setting`] is one named, persisted preference with a default and an
//! apply effect. The two kinds differ only in how a value is parsed, read
//! back from its input control, and how that control is located; those
//! behaviors live on [`SettingKind`].

use std::fmt;

use serde::Serialize;

use crate::error::{Result, SettingsError};
use crate::page::{Control, Page};
use crate::persistence::PreferenceStore;

/// Value of a setting, persisted as plain JSON (`true`, `"dark"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SettingValue {
    Toggle(bool),
    Choice(String),
}

impl SettingValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Toggle(b) => Some(*b),
            SettingValue::Choice(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Toggle(_) => None,
            SettingValue::Choice(s) => Some(s),
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Toggle(b) => write!(f, "{b}"),
            SettingValue::Choice(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKind {
    /// Checkbox-backed boolean
    Toggle,
    /// Radio-backed string, one of `choices`
    Choice { choices: &'static [&'static str] },
}

impl SettingKind {
    /// Parse a persisted entry. `None` for malformed JSON, the wrong JSON
    /// type, or a choice outside the allowed set.
    pub fn parse(&self, raw: &str) -> Option<SettingValue> {
        match self {
            SettingKind::Toggle => serde_json::from_str::<bool>(raw)
                .ok()
                .map(SettingValue::Toggle),
            SettingKind::Choice { choices } => serde_json::from_str::<String>(raw)
                .ok()
                .filter(|s| choices.iter().any(|c| *c == s.as_str()))
                .map(SettingValue::Choice),
        }
    }

    /// Value carried by a control that just changed
    pub fn read_control(&self, control: &dyn Control) -> SettingValue {
        match self {
            SettingKind::Toggle => SettingValue::Toggle(control.checked()),
            SettingKind::Choice { .. } => SettingValue::Choice(control.value()),
        }
    }

    fn accepts(&self, value: &SettingValue) -> bool {
        match (self, value) {
            (SettingKind::Toggle, SettingValue::Toggle(_)) => true,
            (SettingKind::Choice { choices }, SettingValue::Choice(s)) => {
                choices.iter().any(|c| *c == s.as_str())
            }
            _ => false,
        }
    }
}

/// Side effect making a value visible on the page
pub type ApplyEffect = Box<dyn Fn(&dyn Page, &SettingValue) -> Result<()>>;

pub struct Setting {
    name: &'static str,
    kind: SettingKind,
    default: SettingValue,
    value: SettingValue,
    apply: ApplyEffect,
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setting")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("default", &self.default)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

impl Setting {
    pub fn toggle(name: &'static str, default: bool, apply: ApplyEffect) -> Self {
        Self {
            name,
            kind: SettingKind::Toggle,
            default: SettingValue::Toggle(default),
            value: SettingValue::Toggle(default),
            apply,
        }
    }

    /// `default` should be one of `choices`
    pub fn choice(
        name: &'static str,
        choices: &'static [&'static str],
        default: &str,
        apply: ApplyEffect,
    ) -> Self {
        debug_assert!(choices.iter().any(|c| *c == default));
        Self {
            name,
            kind: SettingKind::Choice { choices },
            default: SettingValue::Choice(default.to_string()),
            value: SettingValue::Choice(default.to_string()),
            apply,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> SettingKind {
        self.kind
    }

    pub fn default_value(&self) -> &SettingValue {
        &self.default
    }

    /// Currently loaded value
    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    /// Load the persisted value (or the default) and apply it.
    ///
    /// Never fails: a bad entry falls back to the default, and an apply
    /// failure is logged so the remaining settings still load.
    pub fn load(&mut self, store: &dyn PreferenceStore, page: &dyn Page) {
        let raw = match store.get_item(self.name) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("Could not read setting \"{}\": {err}", self.name);
                None
            }
        };

        self.value = match raw.as_deref().map(|r| (r, self.kind.parse(r))) {
            Some((_, Some(value))) => value,
            Some((r, None)) => {
                log::debug!("Ignoring malformed entry for \"{}\": {r}", self.name);
                self.default.clone()
            }
            None => self.default.clone(),
        };

        if let Err(err) = (self.apply)(page, &self.value) {
            log::error!(
                "Failed to apply setting \"{}\" with value {}: {err}",
                self.name,
                self.value
            );
        }
    }

    /// Check the input control matching the loaded value
    pub fn reflect_to_control(&self, page: &dyn Page) -> Result<()> {
        match (&self.kind, &self.value) {
            (SettingKind::Toggle, SettingValue::Toggle(checked)) => {
                let control = page.find_control(self.name, None).ok_or_else(|| {
                    SettingsError::MissingControl {
                        name: self.name.to_string(),
                        value: None,
                    }
                })?;
                control.set_checked(*checked);
            }
            (SettingKind::Choice { .. }, SettingValue::Choice(value)) => {
                let control = page.find_control(self.name, Some(value)).ok_or_else(|| {
                    SettingsError::MissingControl {
                        name: self.name.to_string(),
                        value: Some(value.clone()),
                    }
                })?;
                control.set_checked(true);
            }
            _ => return Err(self.type_mismatch()),
        }
        Ok(())
    }

    /// Persist and apply the value carried by `control`.
    ///
    /// Unlike [`Setting::load`], failures are returned to the caller.
    pub fn update(
        &mut self,
        control: &dyn Control,
        store: &dyn PreferenceStore,
        page: &dyn Page,
    ) -> Result<()> {
        let value = self.kind.read_control(control);
        if !self.kind.accepts(&value) {
            return Err(SettingsError::UnknownChoice {
                name: self.name.to_string(),
                value: control.value(),
            });
        }

        let json = serde_json::to_string(&value).map_err(|source| SettingsError::Serialize {
            name: self.name.to_string(),
            source,
        })?;
        store.set_item(self.name, &json)?;
        log::info!("Setting \"{}\" changed to {}", self.name, value);

        self.value = value;
        (self.apply)(page, &self.value)
    }

    fn type_mismatch(&self) -> SettingsError {
        SettingsError::TypeMismatch {
            name: self.name.to_string(),
            expected: match self.kind {
                SettingKind::Toggle => "boolean",
                SettingKind::Choice { .. } => "string",
            },
        }
    }
}

/// Effect that sets `attribute="value"` on the document element when the
/// toggle is on and removes it when off
pub fn root_attribute_toggle(attribute: &'static str, value: &'static str) -> ApplyEffect {
    Box::new(move |page: &dyn Page, setting: &SettingValue| match setting.as_bool() {
        Some(true) => page.set_root_attribute(attribute, value),
        Some(false) => page.remove_root_attribute(attribute),
        None => Err(SettingsError::TypeMismatch {
            name: attribute.to_string(),
            expected: "boolean",
        }),
    })
}

/// Effect that writes the resolved color theme to the document element
pub fn theme_effect() -> ApplyEffect {
    Box::new(|page: &dyn Page, setting: &SettingValue| match setting.as_str() {
        Some(preference) => crate::theme::apply_theme(page, preference),
        None => Err(SettingsError::TypeMismatch {
            name: crate::consts::THEME_ATTRIBUTE.to_string(),
            expected: "string",
        }),
    })
}
