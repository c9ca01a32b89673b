//! Theme preference store.
//!
//! # Responsibility
//! - Persist the light/dark preference.
//! - Fall back to the system preference when nothing valid is stored.
//! - Apply the active theme through the presentation environment.
//!
//! # Invariants
//! - The system fallback is applied but never written back on load.
//! - No storage write happens before `load()`.

use crate::service::memo_store::StoreLifecycle;
use crate::storage::{KeyValueStore, StorageKeys};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parses the persisted literal. Anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl Display for Theme {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation host: reports the system preference and applies themes.
pub trait ThemeEnvironment {
    /// Whether the platform asks for a dark color scheme.
    fn prefers_dark(&self) -> bool;
    /// Applies `theme` as the global presentation flag.
    fn apply(&self, theme: Theme);
}

impl<T: ThemeEnvironment + ?Sized> ThemeEnvironment for &T {
    fn prefers_dark(&self) -> bool {
        (**self).prefers_dark()
    }

    fn apply(&self, theme: Theme) {
        (**self).apply(theme)
    }
}

/// Environment with a fixed system preference that records the applied theme.
#[derive(Debug, Default)]
pub struct StaticThemeEnvironment {
    prefers_dark: bool,
    applied: Cell<Option<Theme>>,
}

impl StaticThemeEnvironment {
    pub fn new(prefers_dark: bool) -> Self {
        Self {
            prefers_dark,
            applied: Cell::new(None),
        }
    }

    /// Last theme passed to `apply`.
    pub fn applied(&self) -> Option<Theme> {
        self.applied.get()
    }
}

impl ThemeEnvironment for StaticThemeEnvironment {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }

    fn apply(&self, theme: Theme) {
        self.applied.set(Some(theme));
    }
}

pub struct ThemeStore<S: KeyValueStore, E: ThemeEnvironment> {
    storage: S,
    env: E,
    key: String,
    theme: Theme,
    lifecycle: StoreLifecycle,
}

impl<S: KeyValueStore, E: ThemeEnvironment> ThemeStore<S, E> {
    pub fn new(storage: S, env: E) -> Self {
        Self::with_keys(storage, env, &StorageKeys::default())
    }

    pub fn with_keys(storage: S, env: E, keys: &StorageKeys) -> Self {
        Self {
            storage,
            env,
            key: keys.theme.clone(),
            theme: Theme::default(),
            lifecycle: StoreLifecycle::Cold,
        }
    }

    pub fn lifecycle(&self) -> StoreLifecycle {
        self.lifecycle
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Resolves stored-or-system theme and applies it.
    pub fn load(&mut self) -> Theme {
        if self.lifecycle == StoreLifecycle::Hydrated {
            return self.theme;
        }

        let theme = self.read_stored().unwrap_or_else(|| self.system_theme());
        self.theme = theme;
        self.env.apply(theme);
        self.lifecycle = StoreLifecycle::Hydrated;
        debug!(
            "event=theme_load module=store status=ok theme={}",
            self.theme
        );
        self.theme
    }

    /// Sets, applies and persists `theme`.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.env.apply(theme);
        if self.lifecycle == StoreLifecycle::Cold {
            debug!("event=theme_save module=store status=skipped reason=cold");
            return;
        }
        if let Err(err) = self.storage.set(&self.key, theme.as_str()) {
            warn!(
                "event=theme_save module=store status=error error_code=storage_write_failed error={}",
                err
            );
        }
    }

    /// Switches between light and dark; returns the new theme.
    pub fn toggle(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set_theme(next);
        next
    }

    fn system_theme(&self) -> Theme {
        if self.env.prefers_dark() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn read_stored(&self) -> Option<Theme> {
        match self.storage.get(&self.key) {
            Ok(value) => value.as_deref().and_then(Theme::parse),
            Err(err) => {
                warn!(
                    "event=theme_load module=store status=error error_code=storage_read_failed error={}",
                    err
                );
                None
            }
        }
    }
}
