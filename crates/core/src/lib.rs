/*!
The tree-rewriting fixed-point engine at the heart of runestone.

This crate owns the lossless CST data model, the output-buffer byte-splice
protocol, sibling/context propagation, and the driver that walks a CST while
applying a caller-supplied rule pipeline to a fixed point. It does not parse
source text and does not know anything about any particular rewrite rule —
see `runestone-syntax` for the former and `runestone-rules` for the latter.
*/

mod buffer;
mod context;
mod driver;
mod error;
mod kind;
mod node;
mod rule;

pub use buffer::FmtBuffer;
pub use context::{Context, ContextFlags, SourceReader};
pub use driver::{format_node, format_node_with_kids, format_tree};
pub use error::EngineError;
pub use kind::{Flags, Kind, TagBits};
pub use node::{
  first_leaf, first_non_whitespace_child, infix_op_call_op, is_assignment, is_comparison_leaf,
  is_infix_op_call, is_leaf, is_operator_leaf, last_leaf, leaf_bytes, make_node, meta_nargs,
  replace_first_leaf, verified_kids, Head, Kids, Node,
};
pub use rule::{Outcome, Rule, RulePipeline};

/// Convenience wrapper: format a source string end to end. Idempotent on
/// already-formatted input.
pub fn format_string(
  src: &str,
  parse: impl FnOnce(&str) -> Node,
  flags: ContextFlags,
  rules: RulePipeline,
) -> Result<String, EngineError> {
  let tree = parse(src);
  let mut ctx = Context::new(src, tree, flags, rules);
  format_tree(&mut ctx)?;
  Ok(String::from_utf8_lossy(ctx.fmt_io().as_bytes()).into_owned())
}

#[cfg(test)]
mod test {
  use super::*;

  fn leaf(kind: Kind, text: &str) -> Node {
    Node::leaf(Head::new(kind), text.as_bytes())
  }

  fn identity_rules() -> RulePipeline {
    Vec::new()
  }

  #[test]
  fn empty_input_round_trips() {
    let tree = Node::composite(Head::new(Kind::Block), vec![]);
    let mut ctx = Context::new("", tree, ContextFlags::default(), identity_rules());
    format_tree(&mut ctx).expect("format_tree should succeed");
    assert_eq!(ctx.fmt_io().as_bytes(), b"");
  }

  #[test]
  fn trivially_accepted_input_round_trips_byte_for_byte() {
    // S2/S6 (testable property 6): every rule Accepted on every node implies
    // format_string(s) == s byte-for-byte.
    let src = "  x  \n";
    let tree = Node::composite(
      Head::new(Kind::Block),
      vec![
        leaf(Kind::Whitespace, "  "),
        leaf(Kind::Identifier, "x"),
        leaf(Kind::Whitespace, "  "),
        leaf(Kind::NewlineWs, "\n"),
      ],
    );
    let mut ctx = Context::new(src, tree, ContextFlags::default(), identity_rules());
    format_tree(&mut ctx).expect("format_tree should succeed");
    assert_eq!(ctx.fmt_io().as_bytes(), src.as_bytes());
  }

  #[test]
  fn unhandled_kind_reports_partial_output() {
    let tree = Node::composite(
      Head::new(Kind::Block),
      vec![
        leaf(Kind::Identifier, "x"),
        leaf(Kind::Unsupported, "?"),
      ],
    );
    let mut ctx = Context::new("x?", tree, ContextFlags::default(), identity_rules());
    let err = format_tree(&mut ctx).expect_err("unsupported kind should fail");
    match err {
      EngineError::UnhandledKind { kind, partial, .. } => {
        assert_eq!(kind, Kind::Unsupported);
        assert_eq!(&partial[..1], b"x");
      }
      other => panic!("expected UnhandledKind, got {other:?}"),
    }
  }

  struct AlwaysDeletes;
  impl Rule for AlwaysDeletes {
    fn name(&self) -> &'static str {
      "always-deletes"
    }
    fn apply(&self, _ctx: &mut Context, node: &Node) -> Outcome {
      if node.kind() == Kind::Block {
        Outcome::Deleted
      } else {
        Outcome::Accepted
      }
    }
  }

  #[test]
  fn root_deletion_is_rejected() {
    let tree = Node::composite(Head::new(Kind::Block), vec![]);
    let mut ctx = Context::new(
      "",
      tree,
      ContextFlags::default(),
      vec![Box::new(AlwaysDeletes)],
    );
    let err = format_tree(&mut ctx).expect_err("root deletion should fail");
    assert!(matches!(err, EngineError::RootDeletion));
  }

  #[test]
  fn non_idempotent_root_rule_hits_convergence_bound() {
    // A rule that keeps returning Replaced for any span will never let the
    // root driver reach Accepted; the second iteration must error out rather
    // than loop forever.
    struct NeverSettles;
    impl Rule for NeverSettles {
      fn name(&self) -> &'static str {
        "never-settles"
      }
      fn apply(&self, _ctx: &mut Context, node: &Node) -> Outcome {
        Outcome::Replaced(Node::composite(Head::new(node.kind()), vec![]))
      }
    }
    let tree = Node::composite(Head::new(Kind::Block), vec![]);
    let mut ctx = Context::new(
      "",
      tree,
      ContextFlags::default(),
      vec![Box::new(NeverSettles)],
    );
    let err = format_tree(&mut ctx).expect_err("non-idempotent rule should not converge");
    assert!(matches!(err, EngineError::RootModifiedTwice));
  }

  #[test]
  fn format_string_idempotence_on_plain_identity_pipeline() {
    let src = "abc";
    let parse = |s: &str| Node::leaf(Head::new(Kind::Identifier), s.as_bytes());
    let once = format_string(src, parse, ContextFlags::default(), identity_rules()).unwrap();
    let twice = format_string(&once, parse, ContextFlags::default(), identity_rules()).unwrap();
    assert_eq!(once, twice);
  }
}
