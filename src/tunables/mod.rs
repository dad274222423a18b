//! Live-tunable simulation parameters
//!
//! A [`Variable`] owns its value and an explicit list of change listeners.
//! Every mutation goes through [`Variable::set`], which notifies listeners
//! synchronously with `(old, new)` before it returns. The panel edits
//! variables through the text path ([`Variable::apply_raw_input`]).

mod variables;

pub use variables::Variables;

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::ops::Deref;
use std::rc::Rc;

use crate::error::ParseError;

/// Value types a tunable can hold
pub trait TunableValue: Clone + PartialEq + Display + 'static {
    /// Parse edited text, returning a human-readable reason on failure
    fn parse_raw(raw: &str) -> Result<Self, String>;
}

impl TunableValue for f32 {
    fn parse_raw(raw: &str) -> Result<Self, String> {
        let value: f32 = raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseFloatError| e.to_string())?;
        if !value.is_finite() {
            return Err(format!("{value} is not a finite number"));
        }
        Ok(value)
    }
}

impl TunableValue for bool {
    fn parse_raw(raw: &str) -> Result<Self, String> {
        match raw.trim().to_lowercase().as_str() {
            "true" | "on" | "1" => Ok(true),
            "false" | "off" | "0" => Ok(false),
            other => Err(format!("expected true/false, got {other:?}")),
        }
    }
}

/// Identifies one subscription on one variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener<T> {
    id: ListenerId,
    /// Cleared on unsubscribe so an in-flight notification skips it
    active: Cell<bool>,
    callback: RefCell<Box<dyn FnMut(&T, &T)>>,
}

/// A reactive value with change notification
pub struct Variable<T: TunableValue> {
    name: &'static str,
    value: RefCell<T>,
    default_value: T,
    error: RefCell<Option<String>>,
    listeners: RefCell<Vec<Rc<Listener<T>>>>,
    next_listener: Cell<u64>,
}

impl<T: TunableValue> Variable<T> {
    pub fn new(name: &'static str, value: T) -> Self {
        Self {
            name,
            value: RefCell::new(value.clone()),
            default_value: value,
            error: RefCell::new(None),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    pub fn default_value(&self) -> &T {
        &self.default_value
    }

    /// Replace the value and notify listeners.
    ///
    /// Setting the current value again is a no-op and notifies nobody.
    /// Listeners registered while the notification runs are not called for
    /// it; listeners removed while it runs are skipped. A listener that sets
    /// a different value ends this notification: the nested `set` has
    /// already delivered the newer value to everyone else.
    pub fn set(&self, value: T) {
        let old = {
            let mut current = self.value.borrow_mut();
            if *current == value {
                return;
            }
            std::mem::replace(&mut *current, value.clone())
        };

        let snapshot: Vec<Rc<Listener<T>>> = self.listeners.borrow().clone();
        for listener in snapshot {
            if !listener.active.get() {
                continue;
            }
            // A listener that sets this variable from inside its own callback
            // is not re-entered.
            match listener.callback.try_borrow_mut() {
                Ok(mut callback) => callback(&old, &value),
                Err(_) => log::warn!(
                    "{}: listener {:?} re-entered during its own notification",
                    self.name,
                    listener.id
                ),
            }
            if *self.value.borrow() != value {
                break;
            }
        }
    }

    pub fn subscribe(&self, callback: impl FnMut(&T, &T) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Rc::new(Listener {
            id,
            active: Cell::new(true),
            callback: RefCell::new(Box::new(callback)),
        }));
        id
    }

    /// Returns false if `id` was not subscribed
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        match listeners.iter().position(|l| l.id == id) {
            Some(index) => {
                let listener = listeners.remove(index);
                listener.active.set(false);
                true
            }
            None => false,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Parse edited text and apply it.
    ///
    /// On failure the value is untouched and the error is remembered until
    /// the next successful edit.
    pub fn apply_raw_input(&self, raw: &str) -> Result<(), ParseError> {
        match T::parse_raw(raw) {
            Ok(value) => {
                self.set(value);
                self.error.replace(None);
                Ok(())
            }
            Err(reason) => {
                log::warn!("{}: rejected edit {raw:?}: {reason}", self.name);
                self.error.replace(Some(reason.clone()));
                Err(ParseError {
                    name: self.name,
                    raw: raw.to_string(),
                    reason,
                })
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.borrow().is_none()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub fn reset(&self) {
        self.set(self.default_value.clone());
    }

    pub fn format(&self) -> String {
        self.value.borrow().to_string()
    }
}

/// How the panel should present a tunable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    /// Free text field
    Text,
    /// Slider between `min` and `max` in increments of `step`
    Range { min: f32, max: f32, step: f32 },
}

/// Numeric tunable that advertises a slider range around its default.
///
/// The range is presentation only; `set` accepts any value.
pub struct RangeVariable {
    inner: Variable<f32>,
    range: f32,
    steps: u32,
}

impl RangeVariable {
    /// Range defaults to the default value itself (slider spans 0..2x)
    pub fn new(name: &'static str, value: f32) -> Self {
        Self::with_range(name, value, value.abs(), 100)
    }

    pub fn with_range(name: &'static str, value: f32, range: f32, steps: u32) -> Self {
        Self {
            inner: Variable::new(name, value),
            range,
            steps: steps.max(1),
        }
    }

    pub fn control(&self) -> Control {
        let default = *self.inner.default_value();
        Control::Range {
            min: default - self.range,
            max: default + self.range,
            step: (2.0 * self.range) / self.steps as f32,
        }
    }
}

impl Deref for RangeVariable {
    type Target = Variable<f32>;

    fn deref(&self) -> &Variable<f32> {
        &self.inner
    }
}

/// Object-safe view of a tunable, as seen by the panel
pub trait Tunable {
    fn name(&self) -> &'static str;
    fn formatted(&self) -> String;
    fn control(&self) -> Control;
    fn apply_raw_input(&self, raw: &str) -> Result<(), ParseError>;
    fn reset(&self);
    fn error(&self) -> Option<String>;
    /// Subscribe to the formatted new value
    fn watch(&self, on_change: Box<dyn FnMut(String)>) -> ListenerId;
    fn unwatch(&self, id: ListenerId) -> bool;
}

impl<T: TunableValue> Tunable for Variable<T> {
    fn name(&self) -> &'static str {
        Variable::name(self)
    }

    fn formatted(&self) -> String {
        self.format()
    }

    fn control(&self) -> Control {
        Control::Text
    }

    fn apply_raw_input(&self, raw: &str) -> Result<(), ParseError> {
        Variable::apply_raw_input(self, raw)
    }

    fn reset(&self) {
        Variable::reset(self)
    }

    fn error(&self) -> Option<String> {
        Variable::error(self)
    }

    fn watch(&self, mut on_change: Box<dyn FnMut(String)>) -> ListenerId {
        self.subscribe(move |_, new| on_change(new.to_string()))
    }

    fn unwatch(&self, id: ListenerId) -> bool {
        self.unsubscribe(id)
    }
}

impl Tunable for RangeVariable {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn formatted(&self) -> String {
        self.inner.format()
    }

    fn control(&self) -> Control {
        RangeVariable::control(self)
    }

    fn apply_raw_input(&self, raw: &str) -> Result<(), ParseError> {
        self.inner.apply_raw_input(raw)
    }

    fn reset(&self) {
        self.inner.reset()
    }

    fn error(&self) -> Option<String> {
        self.inner.error()
    }

    fn watch(&self, on_change: Box<dyn FnMut(String)>) -> ListenerId {
        Tunable::watch(&self.inner, on_change)
    }

    fn unwatch(&self, id: ListenerId) -> bool {
        self.inner.unsubscribe(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn recorder(var: &Variable<f32>) -> Rc<RefCell<Vec<(f32, f32)>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        var.subscribe(move |old, new| sink.borrow_mut().push((*old, *new)));
        seen
    }

    #[test]
    fn test_set_same_value_is_silent() {
        let var = Variable::new("speed", 200.0_f32);
        let seen = recorder(&var);
        var.set(200.0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_set_notifies_once_with_old_and_new() {
        let var = Variable::new("speed", 200.0_f32);
        let seen = recorder(&var);
        var.set(150.0);
        assert_eq!(*seen.borrow(), vec![(200.0, 150.0)]);
        assert_eq!(var.get(), 150.0);
    }

    #[test]
    fn test_listener_sees_new_value_during_notification() {
        let var = Rc::new(Variable::new("w", 1.0_f32));
        let observed = Rc::new(Cell::new(0.0));
        let (v, o) = (Rc::downgrade(&var), observed.clone());
        var.subscribe(move |_, _| {
            if let Some(v) = v.upgrade() {
                o.set(v.get());
            }
        });
        var.set(5.0);
        assert_eq!(observed.get(), 5.0);
    }

    #[test]
    fn test_subscriber_added_during_notification_waits_for_next() {
        let var = Rc::new(Variable::new("w", 1.0_f32));
        let late_calls = Rc::new(Cell::new(0));
        let weak = Rc::downgrade(&var);
        let counter = late_calls.clone();
        var.subscribe(move |_, _| {
            if let Some(var) = weak.upgrade() {
                let counter = counter.clone();
                var.subscribe(move |_, _| counter.set(counter.get() + 1));
            }
        });

        var.set(2.0);
        assert_eq!(late_calls.get(), 0);
        var.set(3.0);
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn test_unsubscribed_listener_is_not_called() {
        let var = Variable::new("w", 1.0_f32);
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let id = var.subscribe(move |_, _| c.set(c.get() + 1));
        assert!(var.unsubscribe(id));
        assert!(!var.unsubscribe(id));
        var.set(2.0);
        assert_eq!(calls.get(), 0);
        assert_eq!(var.listener_count(), 0);
    }

    #[test]
    fn test_listener_removed_mid_notification_is_skipped() {
        let var = Rc::new(Variable::new("w", 1.0_f32));
        let late_calls = Rc::new(Cell::new(0));
        let late_id = Rc::new(Cell::new(None));

        let (weak, id_slot) = (Rc::downgrade(&var), late_id.clone());
        var.subscribe(move |_, _| {
            if let (Some(var), Some(id)) = (weak.upgrade(), id_slot.get()) {
                var.unsubscribe(id);
            }
        });
        let counter = late_calls.clone();
        late_id.set(Some(var.subscribe(move |_, _| counter.set(counter.get() + 1))));

        var.set(2.0);
        assert_eq!(late_calls.get(), 0);
        assert_eq!(var.listener_count(), 1);
    }

    #[test]
    fn test_listener_setting_its_own_variable_leaves_labels_current() {
        let var = Rc::new(Variable::new("speed", 50.0_f32));
        let weak = Rc::downgrade(&var);
        var.subscribe(move |_, new| {
            if *new > 100.0 {
                if let Some(var) = weak.upgrade() {
                    var.set(100.0);
                }
            }
        });
        let label = Rc::new(RefCell::new(String::new()));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let (sink, log) = (label.clone(), seen.clone());
        var.subscribe(move |old, new| {
            *sink.borrow_mut() = new.to_string();
            log.borrow_mut().push((*old, *new));
        });

        var.set(500.0);
        assert_eq!(var.get(), 100.0);
        assert_eq!(*label.borrow(), "100");
        assert_eq!(*seen.borrow(), vec![(500.0, 100.0)]);

        var.set(80.0);
        assert_eq!(*label.borrow(), "80");
    }

    #[test]
    fn test_malformed_input_leaves_value() {
        let var = Variable::new("speed", 200.0_f32);
        let seen = recorder(&var);
        let err = var.apply_raw_input("fast").unwrap_err();
        assert_eq!(err.raw, "fast");
        assert_eq!(var.get(), 200.0);
        assert!(!var.is_valid());
        assert!(seen.borrow().is_empty());

        var.apply_raw_input(" 120.5 ").unwrap();
        assert_eq!(var.get(), 120.5);
        assert!(var.is_valid());
    }

    #[test]
    fn test_non_finite_input_rejected() {
        let var = Variable::new("speed", 1.0_f32);
        assert!(var.apply_raw_input("NaN").is_err());
        assert!(var.apply_raw_input("inf").is_err());
        assert_eq!(var.get(), 1.0);
    }

    #[test]
    fn test_reset_restores_default() {
        let var = Variable::new("flag", false);
        var.set(true);
        var.reset();
        assert!(!var.get());
    }

    #[test]
    fn test_range_control_from_default() {
        let var = RangeVariable::new("stage_width", 2000.0);
        assert_eq!(
            var.control(),
            Control::Range {
                min: 0.0,
                max: 4000.0,
                step: 40.0
            }
        );
        // Presentation only: out-of-range values are accepted
        var.set(9000.0);
        assert_eq!(var.get(), 9000.0);
    }

    #[test]
    fn test_tunable_watch_formats_value() {
        let var = RangeVariable::new("hand_offset", 32.0);
        let label = Rc::new(RefCell::new(String::new()));
        let sink = label.clone();
        let id = Tunable::watch(&var, Box::new(move |text| *sink.borrow_mut() = text));
        Tunable::apply_raw_input(&var, "40").unwrap();
        assert_eq!(*label.borrow(), "40");
        assert!(Tunable::unwatch(&var, id));
    }

    proptest! {
        #[test]
        fn prop_one_notification_per_change(
            values in prop::collection::vec(-1000i32..1000, 1..50)
        ) {
            let var = Variable::new("v", 0.0_f32);
            let seen = recorder(&var);
            let mut expected = Vec::new();
            let mut current = 0.0_f32;
            for v in values {
                let v = v as f32;
                if v != current {
                    expected.push((current, v));
                    current = v;
                }
                var.set(v);
            }
            prop_assert_eq!(seen.borrow().clone(), expected);
        }
    }
}
