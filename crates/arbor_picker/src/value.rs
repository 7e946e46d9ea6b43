//! Selection value ownership
//!
//! A picker either *controls* nothing and owns its selection (uncontrolled),
//! or mirrors a value owned by its caller (controlled). The mode is chosen
//! once at construction: controlled iff both a value and a change handler
//! were supplied.
//!
//! In controlled mode edits never touch local state; they are forwarded to
//! the caller's handler, and the rendered value only moves when the caller
//! passes a new value back in through [`ValueReconciler::reconcile`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, trace};

/// Ordered list of selected node values
pub type SelectionValue = Vec<Value>;

/// Change handler receiving the full new selection
pub type ChangeCallback = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Who owns the selection
pub enum ValueOwnership {
    /// The caller owns the value; edits are delegated to `on_change`
    Controlled {
        external: SelectionValue,
        on_change: ChangeCallback,
    },
    /// The picker owns the value; `on_change` (if any) only observes edits
    Uncontrolled {
        value: SelectionValue,
        on_change: Option<ChangeCallback>,
    },
}

impl fmt::Debug for ValueOwnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueOwnership::Controlled { external, .. } => f
                .debug_struct("Controlled")
                .field("external", external)
                .finish_non_exhaustive(),
            ValueOwnership::Uncontrolled { value, on_change } => f
                .debug_struct("Uncontrolled")
                .field("value", value)
                .field("observed", &on_change.is_some())
                .finish(),
        }
    }
}

/// Resolves the authoritative selection under either ownership mode
#[derive(Debug)]
pub struct ValueReconciler {
    ownership: ValueOwnership,
    /// Last value passed in from outside, for change detection
    last_external: Option<SelectionValue>,
}

impl ValueReconciler {
    pub fn controlled(value: SelectionValue, on_change: ChangeCallback) -> Self {
        Self {
            last_external: Some(value.clone()),
            ownership: ValueOwnership::Controlled {
                external: value,
                on_change,
            },
        }
    }

    pub fn uncontrolled(initial: SelectionValue) -> Self {
        Self {
            last_external: None,
            ownership: ValueOwnership::Uncontrolled {
                value: initial,
                on_change: None,
            },
        }
    }

    /// Pick the mode from construction-time options
    pub fn from_options(value: Option<SelectionValue>, on_change: Option<ChangeCallback>) -> Self {
        match (value, on_change) {
            (Some(value), Some(on_change)) => Self::controlled(value, on_change),
            (value, on_change) => {
                let mut reconciler = Self::uncontrolled(value.clone().unwrap_or_default());
                reconciler.last_external = value;
                if let ValueOwnership::Uncontrolled { on_change: slot, .. } =
                    &mut reconciler.ownership
                {
                    *slot = on_change;
                }
                reconciler
            }
        }
    }

    /// Seed the working copy of an uncontrolled selection. Ignored when
    /// controlled.
    pub fn seed(&mut self, initial: SelectionValue) {
        if let ValueOwnership::Uncontrolled { value, .. } = &mut self.ownership {
            *value = initial;
        }
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self.ownership, ValueOwnership::Controlled { .. })
    }

    pub fn ownership(&self) -> &ValueOwnership {
        &self.ownership
    }

    /// The authoritative value, as an owned copy
    pub fn current_value(&self) -> SelectionValue {
        self.working_value().to_vec()
    }

    /// The value rendering uses
    pub fn working_value(&self) -> &[Value] {
        match &self.ownership {
            ValueOwnership::Controlled { external, .. } => external,
            ValueOwnership::Uncontrolled { value, .. } => value,
        }
    }

    /// Apply an edit coming from the tree widget
    pub fn apply_change(&mut self, new_value: SelectionValue) {
        match &mut self.ownership {
            ValueOwnership::Controlled { on_change, .. } => {
                trace!(len = new_value.len(), "delegating change to owner");
                on_change(new_value.as_slice());
            }
            ValueOwnership::Uncontrolled { value, on_change } => {
                *value = new_value;
                if let Some(on_change) = on_change {
                    on_change(value.as_slice());
                }
            }
        }
    }

    /// Reset the selection to empty, following the same ownership rules
    pub fn clear(&mut self) {
        self.apply_change(Vec::new());
    }

    /// Take a value passed in from outside
    ///
    /// Replaces the working copy in either mode when it differs from the last
    /// external value. `None` counts as an empty selection. Returns whether
    /// anything changed.
    pub fn reconcile(&mut self, external: Option<&[Value]>) -> bool {
        let incoming = external.map(<[Value]>::to_vec);
        if incoming == self.last_external {
            return false;
        }
        self.last_external = incoming.clone();

        let next = incoming.unwrap_or_default();
        debug!(len = next.len(), "external value replaced working copy");
        match &mut self.ownership {
            ValueOwnership::Controlled { external, .. } => *external = next,
            ValueOwnership::Uncontrolled { value, .. } => *value = next,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn recorder() -> (ChangeCallback, Arc<Mutex<Vec<SelectionValue>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let callback: ChangeCallback = Arc::new(move |v: &[Value]| {
            sink.lock().unwrap().push(v.to_vec());
        });
        (callback, calls)
    }

    #[test]
    fn test_mode_selection() {
        let (cb, _) = recorder();
        assert!(ValueReconciler::from_options(Some(vec![]), Some(cb.clone())).is_controlled());
        assert!(!ValueReconciler::from_options(Some(vec![json!("a")]), None).is_controlled());
        assert!(!ValueReconciler::from_options(None, Some(cb)).is_controlled());
        assert!(!ValueReconciler::from_options(None, None).is_controlled());
    }

    #[test]
    fn test_uncontrolled_apply_change_round_trips() {
        let mut reconciler = ValueReconciler::uncontrolled(vec![json!("apple")]);
        reconciler.apply_change(vec![json!("apple"), json!("banana")]);
        assert_eq!(reconciler.current_value(), vec![json!("apple"), json!("banana")]);
    }

    #[test]
    fn test_controlled_apply_change_only_delegates() {
        let (cb, calls) = recorder();
        let mut reconciler = ValueReconciler::controlled(vec![json!("apple")], cb);

        reconciler.apply_change(vec![json!("apple"), json!("banana")]);

        assert_eq!(reconciler.current_value(), vec![json!("apple")]);
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            &[vec![json!("apple"), json!("banana")]]
        );
    }

    #[test]
    fn test_controlled_follows_external_updates() {
        let (cb, _) = recorder();
        let mut reconciler = ValueReconciler::controlled(vec![json!("apple")], cb);
        reconciler.apply_change(vec![json!("banana")]);
        assert_eq!(reconciler.current_value(), vec![json!("apple")]);

        assert!(reconciler.reconcile(Some(&[json!("banana")])));
        assert_eq!(reconciler.current_value(), vec![json!("banana")]);
    }

    #[test]
    fn test_current_value_is_a_copy() {
        let reconciler = ValueReconciler::uncontrolled(vec![json!(1)]);
        let mut copy = reconciler.current_value();
        copy.push(json!(2));
        assert_eq!(reconciler.current_value(), vec![json!(1)]);
    }

    #[test]
    fn test_clear_follows_ownership() {
        let mut uncontrolled = ValueReconciler::uncontrolled(vec![json!("a")]);
        uncontrolled.clear();
        assert!(uncontrolled.current_value().is_empty());

        let (cb, calls) = recorder();
        let mut controlled = ValueReconciler::controlled(vec![json!("a")], cb);
        controlled.clear();
        assert_eq!(controlled.current_value(), vec![json!("a")]);
        assert_eq!(calls.lock().unwrap().as_slice(), &[Vec::<Value>::new()]);
    }

    #[test]
    fn test_reconcile_ignores_equal_values() {
        let mut reconciler = ValueReconciler::from_options(Some(vec![json!("a")]), None);
        reconciler.apply_change(vec![json!("b")]);

        // Same external value as before: local edit survives
        assert!(!reconciler.reconcile(Some(&[json!("a")])));
        assert_eq!(reconciler.current_value(), vec![json!("b")]);

        // New external value wins even in uncontrolled mode
        assert!(reconciler.reconcile(Some(&[json!("c")])));
        assert_eq!(reconciler.current_value(), vec![json!("c")]);
    }

    #[test]
    fn test_reconcile_missing_value_is_empty() {
        let (cb, _) = recorder();
        let mut reconciler = ValueReconciler::controlled(vec![json!("a")], cb);
        assert!(reconciler.reconcile(None));
        assert!(reconciler.current_value().is_empty());
    }

    #[test]
    fn test_uncontrolled_observer_sees_edits() {
        let (cb, calls) = recorder();
        let mut reconciler = ValueReconciler::from_options(None, Some(cb));
        reconciler.apply_change(vec![json!("x")]);

        assert_eq!(reconciler.current_value(), vec![json!("x")]);
        assert_eq!(calls.lock().unwrap().as_slice(), &[vec![json!("x")]]);
    }
}
