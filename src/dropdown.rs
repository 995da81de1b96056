//! A keyboard-driven dropdown menu.

use std::fmt::Write as _;

use qview_search::render::escape;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownItem<T> {
    pub label: String,
    pub value: T,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEntry<T> {
    Item(DropdownItem<T>),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownEvent<T> {
    Opened,
    Closed,
    Highlighted(usize),
    Selected(T),
    Ignored,
}

#[derive(Debug, Clone)]
pub struct DropdownMenu<T> {
    entries: Vec<DropdownEntry<T>>,
    open: bool,
    highlighted: Option<usize>,
    selected: Option<usize>,
    type_ahead: String,
}

impl<T> Default for DropdownMenu<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            open: false,
            highlighted: None,
            selected: None,
            type_ahead: String::new(),
        }
    }
}

impl<T: Clone + PartialEq> DropdownMenu<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(mut self, label: impl Into<String>, value: T) -> Self {
        self.entries.push(DropdownEntry::Item(DropdownItem {
            label: label.into(),
            value,
            disabled: false,
        }));
        self
    }

    pub fn disabled_item(mut self, label: impl Into<String>, value: T) -> Self {
        self.entries.push(DropdownEntry::Item(DropdownItem {
            label: label.into(),
            value,
            disabled: true,
        }));
        self
    }

    pub fn separator(mut self) -> Self {
        self.entries.push(DropdownEntry::Separator);
        self
    }

    pub fn entries(&self) -> &[DropdownEntry<T>] {
        &self.entries
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn selected_value(&self) -> Option<&T> {
        self.selected.and_then(|index| self.enabled_item(index)).map(|item| &item.value)
    }

    pub fn selected_label(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.enabled_item(index))
            .map(|item| item.label.as_str())
    }

    /// Marks the entry holding `value` as selected without emitting events.
    pub fn set_selected_value(&mut self, value: &T) -> bool {
        let index = self.entries.iter().position(|entry| {
            matches!(entry, DropdownEntry::Item(item) if !item.disabled && item.value == *value)
        });
        if index.is_some() {
            self.selected = index;
        }
        index.is_some()
    }

    pub fn open(&mut self) {
        self.open = true;
        self.type_ahead.clear();
        self.highlighted = self
            .selected
            .or_else(|| self.step_from(None, 1));
    }

    pub fn close(&mut self) {
        self.open = false;
        self.highlighted = None;
        self.type_ahead.clear();
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn highlight_next(&mut self) -> Option<usize> {
        self.highlighted = self.step_from(self.highlighted, 1).or(self.highlighted);
        self.highlighted
    }

    pub fn highlight_previous(&mut self) -> Option<usize> {
        self.highlighted = self.step_from(self.highlighted, -1).or(self.highlighted);
        self.highlighted
    }

    /// Picks the highlighted entry and closes the menu.
    pub fn select_highlighted(&mut self) -> Option<T> {
        let index = self.highlighted?;
        self.select_index(index)
    }

    pub fn select_index(&mut self, index: usize) -> Option<T> {
        let value = self.enabled_item(index)?.value.clone();
        self.selected = Some(index);
        self.close();
        Some(value)
    }

    /// Highlights the first enabled item whose label starts with the typed
    /// prefix; a prefix with no match restarts from the new character.
    pub fn type_ahead(&mut self, c: char) -> Option<usize> {
        self.type_ahead.extend(c.to_lowercase());
        if let Some(index) = self.find_prefix(&self.type_ahead) {
            self.highlighted = Some(index);
            return Some(index);
        }

        self.type_ahead = c.to_lowercase().collect();
        let found = self.find_prefix(&self.type_ahead);
        if found.is_some() {
            self.highlighted = found;
        }
        found
    }

    pub fn handle_key(&mut self, key: &str) -> DropdownEvent<T> {
        if !self.open {
            return match key {
                "enter" | "space" | "down" | "alt-down" => {
                    self.open();
                    DropdownEvent::Opened
                }
                _ => DropdownEvent::Ignored,
            };
        }

        match key {
            "escape" | "tab" => {
                self.close();
                DropdownEvent::Closed
            }
            "down" => self.highlighted_event(Self::highlight_next),
            "up" => self.highlighted_event(Self::highlight_previous),
            "home" => {
                self.highlighted = self.step_from(None, 1);
                self.highlighted_event(|menu| menu.highlighted)
            }
            "end" => {
                self.highlighted = self.step_from(None, -1);
                self.highlighted_event(|menu| menu.highlighted)
            }
            "enter" | "space" => match self.select_highlighted() {
                Some(value) => DropdownEvent::Selected(value),
                None => DropdownEvent::Ignored,
            },
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => match self.type_ahead(c) {
                        Some(index) => DropdownEvent::Highlighted(index),
                        None => DropdownEvent::Ignored,
                    },
                    _ => DropdownEvent::Ignored,
                }
            }
        }
    }

    pub fn render(&self, id: &str) -> String {
        let mut out = String::new();
        let label = self.selected_label().unwrap_or("");
        let _ = write!(
            out,
            "<button class=\"dropdown-toggle\" id=\"{}-toggle\" aria-expanded=\"{}\">{}</button>",
            escape(id),
            self.open,
            escape(label)
        );

        if !self.open {
            return out;
        }

        out.push_str("<ul class=\"dropdown-menu\" role=\"listbox\">");
        for (index, entry) in self.entries.iter().enumerate() {
            match entry {
                DropdownEntry::Separator => out.push_str("<li class=\"separator\" role=\"separator\"></li>"),
                DropdownEntry::Item(item) => {
                    let mut classes = vec!["dropdown-item"];
                    if self.highlighted == Some(index) {
                        classes.push("highlighted");
                    }
                    if self.selected == Some(index) {
                        classes.push("selected");
                    }
                    if item.disabled {
                        classes.push("disabled");
                    }
                    let _ = write!(
                        out,
                        "<li class=\"{}\" role=\"option\" data-index=\"{}\" aria-disabled=\"{}\">{}</li>",
                        classes.join(" "),
                        index,
                        item.disabled,
                        escape(&item.label)
                    );
                }
            }
        }
        out.push_str("</ul>");
        out
    }

    fn highlighted_event(&mut self, f: impl FnOnce(&mut Self) -> Option<usize>) -> DropdownEvent<T> {
        match f(self) {
            Some(index) => DropdownEvent::Highlighted(index),
            None => DropdownEvent::Ignored,
        }
    }

    fn enabled_item(&self, index: usize) -> Option<&DropdownItem<T>> {
        match self.entries.get(index)? {
            DropdownEntry::Item(item) if !item.disabled => Some(item),
            _ => None,
        }
    }

    // Next enabled item from `from` in `direction`, wrapping around.
    fn step_from(&self, from: Option<usize>, direction: isize) -> Option<usize> {
        let len = self.entries.len() as isize;
        if len == 0 {
            return None;
        }

        let start = match from {
            Some(index) => index as isize,
            None if direction > 0 => -1,
            None => len,
        };

        (1..=len)
            .map(|step| (start + step * direction).rem_euclid(len) as usize)
            .find(|&index| self.enabled_item(index).is_some())
    }

    fn find_prefix(&self, prefix: &str) -> Option<usize> {
        (0..self.entries.len()).find(|&index| {
            self.enabled_item(index)
                .is_some_and(|item| item.label.to_lowercase().starts_with(prefix))
        })
    }
}
