//! Context menu for the tray icon.

use std::collections::HashMap;
use std::sync::Arc;

/// Actions that can be triggered from the tray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Toggle the main window.
    ShowHide,
    /// Open the settings window.
    Settings,
    /// Open the about window.
    About,
    /// Quit the application.
    Exit,
}

impl MenuAction {
    /// All actions, in menu order.
    pub const ALL: [MenuAction; 4] = [
        MenuAction::ShowHide,
        MenuAction::Settings,
        MenuAction::About,
        MenuAction::Exit,
    ];

    /// Translation key of the menu label.
    pub fn label_key(self) -> &'static str {
        match self {
            MenuAction::ShowHide => "Display",
            MenuAction::Settings => "Settings",
            MenuAction::About => "About",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Source of translated display strings.
pub trait LabelProvider {
    /// Returns the text for `key`.
    fn label(&self, key: &str) -> String;
}

/// Plain lookup table; unknown keys render as themselves.
impl LabelProvider for HashMap<String, String> {
    fn label(&self, key: &str) -> String {
        self.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

impl<T: LabelProvider + ?Sized> LabelProvider for Arc<T> {
    fn label(&self, key: &str) -> String {
        (**self).label(key)
    }
}

/// A single menu item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    /// Display text.
    pub label: String,
    /// Whether the item is enabled (clickable).
    pub enabled: bool,
    /// Action triggered on click.
    pub action: Option<MenuAction>,
}

impl MenuItem {
    fn entry(labels: &dyn LabelProvider, action: MenuAction) -> Self {
        Self {
            label: labels.label(action.label_key()),
            enabled: true,
            action: Some(action),
        }
    }

    // Separator (represented as disabled empty item).
    fn separator() -> Self {
        Self {
            label: String::new(),
            enabled: false,
            action: None,
        }
    }

    /// Whether this item is a separator.
    pub fn is_separator(&self) -> bool {
        self.action.is_none() && self.label.is_empty()
    }
}

/// The tray's context menu, built once per icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuDefinition {
    items: Vec<MenuItem>,
}

impl MenuDefinition {
    /// Builds the menu: Display, separator, Settings, About, separator, Exit.
    pub fn build(labels: &dyn LabelProvider) -> Self {
        let items = vec![
            MenuItem::entry(labels, MenuAction::ShowHide),
            MenuItem::separator(),
            MenuItem::entry(labels, MenuAction::Settings),
            MenuItem::entry(labels, MenuAction::About),
            MenuItem::separator(),
            MenuItem::entry(labels, MenuAction::Exit),
        ];
        Self { items }
    }

    /// All items including separators.
    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Actionable items only.
    pub fn entries(&self) -> impl Iterator<Item = &MenuItem> {
        self.items.iter().filter(|i| i.action.is_some())
    }

    /// Label shown for `action`.
    pub fn label_for(&self, action: MenuAction) -> Option<&str> {
        self.entries()
            .find(|i| i.action == Some(action))
            .map(|i| i.label.as_str())
    }
}
