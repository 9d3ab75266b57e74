//! Filter evaluation.
//!
//! Translates the request-level `filter` parameter into a [`TodoFilter`]
//! applied by the store, together with the filter chips rendered by the
//! views. Accepted values are `""`, `"done"` and `"notdone"`; anything else
//! leaves the filter unset and logs a warning.

use crate::todo::Todo;

/// Tri-state selector over the completion flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TodoFilter {
    /// `None` matches every todo; `Some(d)` only todos with `done == d`
    pub done: Option<bool>,
}

impl TodoFilter {
    /// A filter matching every live todo
    #[must_use]
    pub const fn all() -> Self {
        Self { done: None }
    }

    /// A filter on the completion flag
    #[must_use]
    pub const fn done(done: bool) -> Self {
        Self { done: Some(done) }
    }

    /// Whether any restriction is set
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.done.is_some()
    }

    /// Whether a live todo passes this filter.
    ///
    /// Deleted todos never match.
    #[must_use]
    pub fn matches(&self, todo: &Todo) -> bool {
        todo.is_live() && self.done.is_none_or(|done| todo.done == done)
    }
}

/// UI descriptor for one filter option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FilterChip {
    /// Message key of the human label ("All", "Done", "Remaining")
    pub label: &'static str,
    /// Value submitted as the `filter` parameter
    pub value: &'static str,
    /// Whether this chip is the current selection
    pub active: bool,
}

/// Value of the `filter` parameter selecting completed todos.
pub const FILTER_DONE: &str = "done";

/// Value of the `filter` parameter selecting remaining todos.
pub const FILTER_NOT_DONE: &str = "notdone";

/// Result of evaluating the `filter` request parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSelection {
    /// Filter to hand to the store
    pub filter: TodoFilter,
    /// Chips in display order, at most one active
    pub chips: Vec<FilterChip>,
}

impl FilterSelection {
    /// The `filter` parameter value reproducing this selection, if any.
    #[must_use]
    pub const fn param(&self) -> Option<&'static str> {
        match self.filter.done {
            Some(true) => Some(FILTER_DONE),
            Some(false) => Some(FILTER_NOT_DONE),
            None => None,
        }
    }
}

fn default_chips() -> Vec<FilterChip> {
    vec![
        FilterChip {
            label: "All",
            value: "",
            active: true,
        },
        FilterChip {
            label: "Done",
            value: FILTER_DONE,
            active: false,
        },
        FilterChip {
            label: "Remaining",
            value: FILTER_NOT_DONE,
            active: false,
        },
    ]
}

/// Evaluate the `filter` request parameter.
///
/// An absent or empty value selects everything with the "All" chip active.
/// A non-empty value activates the chip with the same value (none when the
/// value is unknown).
#[must_use]
pub fn evaluate(param: Option<&str>) -> FilterSelection {
    let mut chips = default_chips();
    let mut filter = TodoFilter::all();

    let Some(value) = param.filter(|v| !v.is_empty()) else {
        return FilterSelection { filter, chips };
    };

    for chip in &mut chips {
        chip.active = chip.value == value;
    }

    match value {
        FILTER_DONE => filter = TodoFilter::done(true),
        FILTER_NOT_DONE => filter = TodoFilter::done(false),
        unknown => tracing::warn!(value = %unknown, "Unknown filter value ignored"),
    }

    FilterSelection { filter, chips }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::todo::TodoId;
    use chrono::Utc;

    fn active_values(selection: &FilterSelection) -> Vec<&'static str> {
        selection
            .chips
            .iter()
            .filter(|c| c.active)
            .map(|c| c.value)
            .collect()
    }

    #[test]
    fn test_absent_selects_all() {
        let selection = evaluate(None);
        assert_eq!(selection.filter, TodoFilter::all());
        assert_eq!(active_values(&selection), vec![""]);
        assert_eq!(selection.param(), None);
    }

    #[test]
    fn test_empty_selects_all() {
        let selection = evaluate(Some(""));
        assert_eq!(selection.filter, TodoFilter::all());
        assert_eq!(active_values(&selection), vec![""]);
    }

    #[test]
    fn test_done() {
        let selection = evaluate(Some("done"));
        assert_eq!(selection.filter, TodoFilter::done(true));
        assert_eq!(active_values(&selection), vec!["done"]);
        assert_eq!(selection.param(), Some("done"));
    }

    #[test]
    fn test_notdone() {
        let selection = evaluate(Some("notdone"));
        assert_eq!(selection.filter, TodoFilter::done(false));
        assert_eq!(active_values(&selection), vec!["notdone"]);
        assert_eq!(selection.param(), Some("notdone"));
    }

    #[test]
    fn test_unknown_value_is_ignored() {
        let selection = evaluate(Some("maybe"));
        assert_eq!(selection.filter, TodoFilter::all());
        assert!(active_values(&selection).is_empty());
        assert_eq!(selection.chips.len(), 3);
    }

    #[test]
    fn test_chip_order_and_labels() {
        let labels: Vec<_> = evaluate(None).chips.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["All", "Done", "Remaining"]);
    }

    #[test]
    fn test_matches() {
        let mut todo = Todo::new(TodoId::new(1), "x".to_string(), Utc::now());
        assert!(TodoFilter::all().matches(&todo));
        assert!(TodoFilter::done(false).matches(&todo));
        assert!(!TodoFilter::done(true).matches(&todo));

        todo.set_done(true, Utc::now());
        assert!(TodoFilter::done(true).matches(&todo));

        todo.soft_delete(Utc::now());
        assert!(!TodoFilter::all().matches(&todo));
        assert!(!TodoFilter::done(true).matches(&todo));
    }
}
