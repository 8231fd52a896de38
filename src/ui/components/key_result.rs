/// Outcome of offering a key to a filter-bar control.
///
/// Controls never touch the filter store themselves; they hand an event
/// back and the owning view decides which store write it maps to.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing for the parent to do
  Handled,
  /// Key was consumed and produced an event for the parent
  Event(T),
  /// Key was not consumed, parent should try the next handler
  NotHandled,
}
