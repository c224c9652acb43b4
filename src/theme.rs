use serde::{Deserialize, Serialize};

/// Local storage key holding the user's explicit theme choice
pub const THEME_STORAGE_KEY: &str = "theme";

/// Class added to the document root while dark mode is active
pub const DARK_CLASS: &str = "dark";

/// Media query used to detect the system colour scheme
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Value written to storage
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Decide the theme to apply on first mount
///
/// An explicit `"dark"` in storage wins. Any other stored value counts as an
/// explicit light choice; only when nothing is stored does the system
/// preference decide.
pub fn resolve_initial_theme(stored: Option<&str>, system_prefers_dark: bool) -> Theme {
    match stored {
        Some("dark") => Theme::Dark,
        Some(_) => Theme::Light,
        None if system_prefers_dark => Theme::Dark,
        None => Theme::Light,
    }
}

/// State behind the theme toggle button
///
/// Before mount the button has no theme yet and renders a neutral placeholder,
/// so server output never disagrees with what the browser later decides.
#[derive(Clone, Debug, Default)]
pub struct ThemeToggle {
    theme: Theme,
    mounted: bool,
}

impl ThemeToggle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, stored: Option<&str>, system_prefers_dark: bool) -> Theme {
        self.theme = resolve_initial_theme(stored, system_prefers_dark);
        self.mounted = true;
        self.theme
    }

    /// Flip the theme. The returned value should be persisted with
    /// [`Theme::as_str`] under [`THEME_STORAGE_KEY`].
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn aria_label(&self) -> &'static str {
        if !self.mounted {
            return "Toggle theme";
        }
        if self.theme.is_dark() {
            "Switch to light mode"
        } else {
            "Switch to dark mode"
        }
    }
}
