use crate::context::Context;
use crate::node::Node;

/// The three-outcome return every rewrite rule and the per-node driver
/// produce.
#[derive(Debug, Clone)]
pub enum Outcome {
  /// The output cursor has advanced by exactly `span(node)`; those bytes are
  /// final for this subtree.
  Accepted,
  /// The rule has already spliced `span(n')` bytes at the entry cursor and
  /// left the cursor unchanged; `n'` replaces the node in the tree.
  Replaced(Node),
  /// Reserved; no canonical rule currently produces this.
  Deleted,
}

/// A pure function `(ctx, node) -> Outcome`. Implementors must uphold:
/// - purity w.r.t. `ctx.*_sibling` and user flags (read-only),
/// - output alignment: on `Accepted`, the cursor is unchanged,
/// - on `Replaced`, exactly `span(n')` bytes were spliced at entry cursor,
/// - idempotence: applying the rule to its own output returns `Accepted`,
/// - monotone progress: bounded iterations to reach `Accepted`.
pub trait Rule {
  fn name(&self) -> &'static str;
  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome;
}

/// The ordered rule pipeline. Rule order is part of the external contract;
/// the first rule returning a non-`Accepted` outcome wins per invocation.
/// The engine has no knowledge of any particular rule —
/// this is just a `Vec` of trait objects supplied by the caller.
pub type RulePipeline = Vec<Box<dyn Rule>>;

pub(crate) fn run_pipeline(pipeline: &RulePipeline, ctx: &mut Context, node: &Node) -> Outcome {
  for rule in pipeline {
    match rule.apply(ctx, node) {
      Outcome::Accepted => continue,
      other => return other,
    }
  }
  Outcome::Accepted
}
