use super::icons::{resolve_icon, RunIcon};
use serde::Deserialize;

/// One selectable tag as shown in a multi-select widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
  pub label: String,
  pub value: String,
  /// Derived from `value`; None for pickers without icons
  pub icon: Option<RunIcon>,
}

impl SelectOption {
  pub fn plain(value: &str) -> Self {
    Self {
      label: value.to_string(),
      value: value.to_string(),
      icon: None,
    }
  }

  pub fn with_icon(value: &str) -> Self {
    Self {
      icon: Some(resolve_icon(value)),
      ..Self::plain(value)
    }
  }
}

/// Tag values to widget options, no icons. `None` yields an empty list.
pub fn to_multi_select_options(values: Option<&[String]>) -> Vec<SelectOption> {
  values
    .unwrap_or_default()
    .iter()
    .map(|v| SelectOption::plain(v))
    .collect()
}

/// Run-type tag values to widget options, each with its run-type icon
pub fn run_type_options(values: Option<&[String]>) -> Vec<SelectOption> {
  values
    .unwrap_or_default()
    .iter()
    .map(|v| SelectOption::with_icon(v))
    .collect()
}

/// An element of a selection-change payload coming out of a multi-select.
///
/// Anything that doesn't carry a string `value` deserializes as `Malformed`.
/// Other keys (`label`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SelectionItem {
  Tag { value: String },
  Malformed(serde_json::Value),
}

impl From<&SelectOption> for SelectionItem {
  fn from(option: &SelectOption) -> Self {
    SelectionItem::Tag {
      value: option.value.clone(),
    }
  }
}

/// Project a selection payload to its tag values, preserving order.
/// Returns None if any element is malformed.
pub fn selected_values(items: &[SelectionItem]) -> Option<Vec<String>> {
  items
    .iter()
    .map(|item| match item {
      SelectionItem::Tag { value, .. } => Some(value.clone()),
      SelectionItem::Malformed(_) => None,
    })
    .collect()
}

/// Forward a selection change to a store write. Malformed payloads are
/// dropped without calling `write`.
pub fn apply_selection<W>(items: &[SelectionItem], write: W) -> bool
where
  W: FnOnce(Vec<String>),
{
  match selected_values(items) {
    Some(values) => {
      write(values);
      true
    }
    None => false,
  }
}
