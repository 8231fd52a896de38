//! Filter state model behind the run-listing filter bar.
//!
//! The store owns canonical values. Everything else here is a pure
//! derivation recomputed on each render: default flags, widget options
//! and icons.

pub mod icons;
pub mod options;
pub mod state;
pub mod store;

pub use icons::resolve_icon;
pub use options::{
  apply_selection, run_type_options, to_multi_select_options, SelectOption, SelectionItem,
};
pub use state::{
  Clock, DisplayTimezone, FieldDefaults, FilterDefaults, FilterState, FixedClock, SystemClock,
};
pub use store::{FilterStore, QueryFilterStore};
