use thiserror::Error;

/// Engine-level failures. None are recoverable inside the engine;
/// all are surfaced to the caller with the partially formatted buffer
/// discarded by the caller.
#[derive(Debug, Error)]
pub enum EngineError {
  /// An engine invariant was violated (cursor mismatch, leaf with children,
  /// etc). Signals an engine or rule bug, not user error.
  #[error(
    "assertion failed: {message} (this is an engine or rule bug, please file an issue)"
  )]
  Assertion { message: String },

  /// The 1000-iteration (child) or 2-iteration (root) convergence bound was
  /// exceeded; indicates a non-idempotent rule.
  #[error("infinite loop? rule pipeline did not converge after {iterations} iterations at byte {cursor}")]
  Convergence { iterations: usize, cursor: usize },

  /// A CST kind was not covered by the dispatch table.
  #[error("unhandled kind {kind:?} at byte {cursor}; partial output: {partial:?}")]
  UnhandledKind {
    kind: crate::kind::Kind,
    cursor: usize,
    partial: Vec<u8>,
  },

  /// A rule returned `Deleted` at the root; the root cannot be deleted.
  #[error("root node deleted by a rule, which is not supported")]
  RootDeletion,

  /// A rule returned `Deleted` somewhere the children driver does not (yet)
  /// support deletion bookkeeping for siblings.
  #[error("rule returned Deleted outcome, which this engine core does not support")]
  DeletedVariant,

  /// The root driver observed a second successful root replacement.
  #[error("root node modified more than once")]
  RootModifiedTwice,
}
