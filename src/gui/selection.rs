//! Country Multi-Select
//! Selection state for the CO2 per-capita trend chart and the widget that edits it.

use egui::{Color32, ComboBox, RichText, ScrollArea};

const MAX_MENU_ITEMS: usize = 200;

/// Countries currently chosen, in the order they were chosen.
pub struct CountrySelection {
    options: Vec<String>,
    selected: Vec<String>,
    search: String,
}

impl CountrySelection {
    /// Start with `defaults`. Defaults that are not among `options` are dropped.
    pub fn new(options: Vec<String>, defaults: &[String]) -> Self {
        let mut selected = Vec::new();
        for country in defaults {
            if options.contains(country) {
                if !selected.contains(country) {
                    selected.push(country.clone());
                }
            } else {
                log::warn!("Default country {:?} not found in CO2 data", country);
            }
        }
        Self {
            options,
            selected,
            search: String::new(),
        }
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_selected(&self, country: &str) -> bool {
        self.selected.iter().any(|c| c == country)
    }

    /// Returns true when the selection changed.
    pub fn add(&mut self, country: &str) -> bool {
        if self.is_selected(country) || !self.options.iter().any(|c| c == country) {
            return false;
        }
        self.selected.push(country.to_string());
        true
    }

    /// Returns true when the selection changed.
    pub fn remove(&mut self, country: &str) -> bool {
        let before = self.selected.len();
        self.selected.retain(|c| c != country);
        self.selected.len() != before
    }

    /// Returns true when the selection changed.
    pub fn clear(&mut self) -> bool {
        let changed = !self.selected.is_empty();
        self.selected.clear();
        changed
    }

    /// Unselected options whose name contains `query` (case-insensitive).
    pub fn candidates(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();
        self.options
            .iter()
            .filter(|c| !self.is_selected(c))
            .filter(|c| query.is_empty() || c.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    /// Draw the multi-select. Returns true when the selection changed.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut removed: Option<String> = None;
        let mut added: Option<String> = None;
        let mut cleared = false;

        ui.label(RichText::new("Country or District").size(13.0).strong());
        ui.add_space(4.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    if self.selected.is_empty() {
                        ui.label(RichText::new("Choose an option").color(Color32::GRAY));
                    }
                    for country in &self.selected {
                        let chip = egui::Button::new(RichText::new(format!("{} ✕", country)).size(12.0))
                            .fill(Color32::from_rgb(255, 75, 75))
                            .rounding(4.0);
                        if ui.add(chip).on_hover_text("Remove").clicked() {
                            removed = Some(country.clone());
                        }
                    }
                });

                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ComboBox::from_id_salt("country_select")
                        .width(220.0)
                        .selected_text("Add country…")
                        .show_ui(ui, |ui| {
                            ui.text_edit_singleline(&mut self.search);
                            ui.separator();
                            ScrollArea::vertical().max_height(260.0).show(ui, |ui| {
                                for country in self.candidates(&self.search).into_iter().take(MAX_MENU_ITEMS) {
                                    if ui.selectable_label(false, country).clicked() {
                                        added = Some(country.to_string());
                                    }
                                }
                            });
                        });

                    if ui.small_button("Clear All").clicked() {
                        cleared = true;
                    }
                });
            });

        let mut changed = false;
        if let Some(country) = removed {
            changed |= self.remove(&country);
        }
        if let Some(country) = added {
            changed |= self.add(&country);
            self.search.clear();
        }
        if cleared {
            changed |= self.clear();
        }
        if changed {
            log::debug!("Country selection now {:?}", self.selected);
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn options() -> Vec<String> {
        names(&["Afghanistan", "China", "EU-27", "United Kingdom", "United States"])
    }

    fn defaults() -> Vec<String> {
        names(&["United States", "United Kingdom", "EU-27", "China"])
    }

    #[test]
    fn starts_with_default_countries() {
        let selection = CountrySelection::new(options(), &defaults());
        assert_eq!(
            selection.selected(),
            ["United States", "United Kingdom", "EU-27", "China"]
        );
    }

    #[test]
    fn unknown_defaults_are_dropped() {
        let selection = CountrySelection::new(names(&["China"]), &defaults());
        assert_eq!(selection.selected(), ["China"]);
    }

    #[test]
    fn add_and_remove_report_changes() {
        let mut selection = CountrySelection::new(options(), &defaults());

        assert!(selection.add("Afghanistan"));
        assert!(!selection.add("Afghanistan"));
        assert!(!selection.add("Atlantis"));
        assert!(selection.remove("China"));
        assert!(!selection.remove("China"));
        assert_eq!(selection.selected().len(), 4);
    }

    #[test]
    fn clear_empties_selection() {
        let mut selection = CountrySelection::new(options(), &defaults());
        assert!(selection.clear());
        assert!(selection.selected().is_empty());
        assert!(!selection.clear());
    }

    #[test]
    fn candidates_exclude_selected_and_match_query() {
        let selection = CountrySelection::new(options(), &defaults());
        assert_eq!(selection.candidates(""), vec!["Afghanistan"]);

        let mut selection = CountrySelection::new(options(), &[]);
        selection.add("United States");
        assert_eq!(selection.candidates("united"), vec!["United Kingdom"]);
    }
}
