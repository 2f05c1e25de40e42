use thiserror::Error;

/// Why [`ObservableExt::to_vec`](crate::observable::ObservableExt::to_vec)
/// could not produce the values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectError<Err> {
  /// The source terminated with an error.
  #[error("source observable emitted an error")]
  Source(Err),
  /// The source did not terminate during the subscribe call, e.g. because it
  /// is driven by a scheduler.
  #[error("source observable did not complete synchronously")]
  Incomplete,
}

impl<Err> CollectError<Err> {
  /// The source error, if there was one.
  pub fn into_source(self) -> Option<Err> {
    match self {
      CollectError::Source(err) => Some(err),
      CollectError::Incomplete => None,
    }
  }
}
