//! Development panel model
//!
//! Headless counterpart of the on-screen tuning panel: one row per tunable
//! with a label that tracks the tunable through its change notifications.
//! A real UI renders [`DevelopmentPanel::rows`] and forwards edits to
//! [`DevelopmentPanel::edit`].

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::EditError;
use crate::tunables::{Control, ListenerId, Variables};

/// One tunable as shown in the panel
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub name: &'static str,
    pub control: Control,
    pub label: String,
    /// Validity message of the last edit
    pub error: Option<String>,
}

struct Row {
    name: &'static str,
    label: Rc<RefCell<String>>,
    listener: ListenerId,
}

pub struct DevelopmentPanel {
    variables: Rc<Variables>,
    rows: Vec<Row>,
    debug: Vec<(String, String)>,
}

impl DevelopmentPanel {
    pub fn new(variables: Rc<Variables>) -> Self {
        let rows = variables
            .entries()
            .into_iter()
            .map(|tunable| {
                let label = Rc::new(RefCell::new(tunable.formatted()));
                let sink = label.clone();
                let listener = tunable.watch(Box::new(move |text| *sink.borrow_mut() = text));
                Row {
                    name: tunable.name(),
                    label,
                    listener,
                }
            })
            .collect();

        Self {
            variables,
            rows,
            debug: Vec::new(),
        }
    }

    pub fn rows(&self) -> Vec<PanelRow> {
        self.rows
            .iter()
            .filter_map(|row| {
                let tunable = self.variables.find(row.name)?;
                Some(PanelRow {
                    name: row.name,
                    control: tunable.control(),
                    label: row.label.borrow().clone(),
                    error: tunable.error(),
                })
            })
            .collect()
    }

    pub fn label(&self, name: &str) -> Option<String> {
        self.rows
            .iter()
            .find(|row| row.name == name)
            .map(|row| row.label.borrow().clone())
    }

    /// Forward edited text to the named tunable
    pub fn edit(&self, name: &str, raw: &str) -> Result<(), EditError> {
        let tunable = self
            .variables
            .find(name)
            .ok_or_else(|| EditError::UnknownTunable(name.to_string()))?;
        tunable.apply_raw_input(raw)?;
        Ok(())
    }

    /// Restore every tunable to its default
    pub fn reset(&self) {
        log::info!("panel: resetting all tunables");
        self.variables.reset_all();
    }

    /// Show or update an ad-hoc diagnostic row
    pub fn debug_value(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.debug.iter_mut().find(|(n, _)| n == name) {
            Some((_, current)) => *current = value,
            None => self.debug.push((name.to_string(), value)),
        }
    }

    pub fn debug_rows(&self) -> &[(String, String)] {
        &self.debug
    }
}

impl Drop for DevelopmentPanel {
    fn drop(&mut self) {
        for row in &self.rows {
            if let Some(tunable) = self.variables.find(row.name) {
                tunable.unwatch(row.listener);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_tracks_value() {
        let vars = Rc::new(Variables::default());
        let panel = DevelopmentPanel::new(vars.clone());
        assert_eq!(panel.label("playerSpeed").as_deref(), Some("200"));

        vars.player_speed.set(250.0);
        assert_eq!(panel.label("playerSpeed").as_deref(), Some("250"));

        panel.edit("playerSpeed", "300").unwrap();
        assert_eq!(vars.player_speed.get(), 300.0);
        assert_eq!(panel.label("playerSpeed").as_deref(), Some("300"));
    }

    #[test]
    fn test_invalid_edit_shows_error() {
        let vars = Rc::new(Variables::default());
        let panel = DevelopmentPanel::new(vars.clone());
        assert!(panel.edit("handOffset", "abc").is_err());

        let row = panel
            .rows()
            .into_iter()
            .find(|r| r.name == "handOffset")
            .unwrap();
        assert_eq!(row.label, "32");
        assert!(row.error.is_some());

        panel.edit("handOffset", "40").unwrap();
        let row = panel
            .rows()
            .into_iter()
            .find(|r| r.name == "handOffset")
            .unwrap();
        assert_eq!(row.error, None);
    }

    #[test]
    fn test_unknown_tunable_is_error() {
        let vars = Rc::new(Variables::default());
        let panel = DevelopmentPanel::new(vars.clone());
        assert_eq!(
            panel.edit("playerSped", "300"),
            Err(EditError::UnknownTunable("playerSped".to_string()))
        );
        assert_eq!(vars.player_speed.get(), 200.0);
        assert!(matches!(
            panel.edit("playerSpeed", "fast"),
            Err(EditError::Parse(_))
        ));
    }

    #[test]
    fn test_reset_updates_labels() {
        let vars = Rc::new(Variables::default());
        let panel = DevelopmentPanel::new(vars.clone());
        panel.edit("stageWidth", "1000").unwrap();
        panel.reset();
        assert_eq!(panel.label("stageWidth").as_deref(), Some("2000"));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let vars = Rc::new(Variables::default());
        let panel = DevelopmentPanel::new(vars.clone());
        assert_eq!(vars.player_speed.listener_count(), 1);
        drop(panel);
        assert_eq!(vars.player_speed.listener_count(), 0);
        assert_eq!(vars.civilian_wander_max_dist.listener_count(), 0);
    }

    #[test]
    fn test_debug_values() {
        let mut panel = DevelopmentPanel::new(Rc::new(Variables::default()));
        panel.debug_value("fps", 60);
        panel.debug_value("fps", 59);
        panel.debug_value("civilians", 3);
        assert_eq!(
            panel.debug_rows(),
            &[
                ("fps".to_string(), "59".to_string()),
                ("civilians".to_string(), "3".to_string())
            ]
        );
    }
}
