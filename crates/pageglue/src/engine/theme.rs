//! Theme resolution and application.
//!
//! The visible theme is one of two mutually exclusive classes on a target
//! element. [`ThemeResolver::apply`] is the only code path that touches them.

use pageglue_protocol::{ResolvedTheme, Theme};

/// Platform color-scheme preferences. At most one is expected to be true.
pub trait ColorSchemeSignals {
    fn prefers_dark(&self) -> bool;
    fn prefers_light(&self) -> bool;
}

/// Something carrying a class list.
pub trait ThemeTarget {
    fn add_class(&mut self, class: &str);
    fn remove_class(&mut self, class: &str);
}

pub const DARK_CLASS: &str = "dark-theme";
pub const LIGHT_CLASS: &str = "light-theme";

fn class_for(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => DARK_CLASS,
        Theme::Light => LIGHT_CLASS,
    }
}

pub struct ThemeResolver;

impl ThemeResolver {
    /// Combines the stored choice with the platform default. Dark wins if
    /// both preferences claim to match.
    pub fn resolve(stored: Option<Theme>, signals: &impl ColorSchemeSignals) -> ResolvedTheme {
        let default = if signals.prefers_dark() {
            Some(Theme::Dark)
        } else if signals.prefers_light() {
            Some(Theme::Light)
        } else {
            None
        };
        ResolvedTheme {
            set: stored,
            default,
        }
    }

    /// Removes both theme classes, then adds the one for `theme`, if any.
    pub fn apply(target: &mut impl ThemeTarget, theme: Option<Theme>) {
        target.remove_class(DARK_CLASS);
        target.remove_class(LIGHT_CLASS);
        if let Some(theme) = theme {
            target.add_class(class_for(theme));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[derive(Debug, Default)]
    pub(crate) struct ClassList {
        pub classes: BTreeSet<String>,
        pub operations: Vec<String>,
    }

    impl ThemeTarget for ClassList {
        fn add_class(&mut self, class: &str) {
            self.operations.push(format!("+{class}"));
            self.classes.insert(class.to_owned());
        }

        fn remove_class(&mut self, class: &str) {
            self.operations.push(format!("-{class}"));
            self.classes.remove(class);
        }
    }

    pub(crate) struct Signals {
        pub dark: bool,
        pub light: bool,
    }

    impl ColorSchemeSignals for Signals {
        fn prefers_dark(&self) -> bool {
            self.dark
        }

        fn prefers_light(&self) -> bool {
            self.light
        }
    }

    fn classes(list: &ClassList) -> Vec<&str> {
        list.classes.iter().map(String::as_str).collect()
    }

    #[test]
    fn apply_is_idempotent() {
        let mut once = ClassList::default();
        let mut twice = ClassList::default();

        ThemeResolver::apply(&mut once, Some(Theme::Dark));
        ThemeResolver::apply(&mut twice, Some(Theme::Dark));
        ThemeResolver::apply(&mut twice, Some(Theme::Dark));

        assert_eq!(once.classes, twice.classes);
        assert_eq!(classes(&once), ["dark-theme"]);
    }

    #[test]
    fn switching_themes_leaves_exactly_one_class() {
        let mut body = ClassList::default();
        body.classes.insert("page".to_owned());

        ThemeResolver::apply(&mut body, Some(Theme::Dark));
        ThemeResolver::apply(&mut body, Some(Theme::Light));

        assert_eq!(classes(&body), ["light-theme", "page"]);
    }

    #[test]
    fn no_theme_clears_both_classes() {
        let mut body = ClassList::default();

        ThemeResolver::apply(&mut body, Some(Theme::Light));
        ThemeResolver::apply(&mut body, None);

        assert!(body.classes.is_empty());
    }

    #[test]
    fn explicit_choice_is_kept_next_to_platform_default() {
        let signals = Signals {
            dark: false,
            light: true,
        };
        let resolved = ThemeResolver::resolve(Some(Theme::Dark), &signals);
        assert_eq!(resolved.set, Some(Theme::Dark));
        assert_eq!(resolved.default, Some(Theme::Light));
    }

    #[test]
    fn default_follows_signals() {
        let none = Signals {
            dark: false,
            light: false,
        };
        assert_eq!(ThemeResolver::resolve(None, &none), ResolvedTheme::default());

        let both = Signals {
            dark: true,
            light: true,
        };
        assert_eq!(ThemeResolver::resolve(None, &both).default, Some(Theme::Dark));
    }

    #[test]
    fn apply_removes_both_before_adding() {
        let mut body = ClassList::default();
        ThemeResolver::apply(&mut body, Some(Theme::Light));
        assert_eq!(body.operations, ["-dark-theme", "-light-theme", "+light-theme"]);
    }
}
