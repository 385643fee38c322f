use runestone_core::{
  is_comparison_leaf, is_operator_leaf, verified_kids, Context, Head, Kind, Node, Outcome, Rule,
};

use crate::render::render;

/// Rule 5: exactly one space surrounds an infix operator (`a+b` → `a + b`).
/// Operates on the infix `Call` node as a whole — the operator's neighbors
/// are its direct siblings in the call's child list.
pub struct SpacesAroundOperators;

impl Rule for SpacesAroundOperators {
  fn name(&self) -> &'static str {
    "spaces-around-operators"
  }

  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome {
    if !runestone_core::is_infix_op_call(node) {
      return Outcome::Accepted;
    }
    let kids = verified_kids(node);
    let Some(op_idx) = find_operator_index(kids) else {
      return Outcome::Accepted;
    };

    let before_ok = op_idx > 0
      && kids[op_idx - 1].kind() == Kind::Whitespace
      && runestone_core::leaf_bytes(&kids[op_idx - 1]) == b" ";
    let after_ok = op_idx + 1 < kids.len()
      && kids[op_idx + 1].kind() == Kind::Whitespace
      && runestone_core::leaf_bytes(&kids[op_idx + 1]) == b" ";
    if before_ok && after_ok {
      return Outcome::Accepted;
    }

    let before_is_ws = op_idx > 0 && kids[op_idx - 1].kind() == Kind::Whitespace;
    let after_is_ws = op_idx + 1 < kids.len() && kids[op_idx + 1].kind() == Kind::Whitespace;

    let mut new_kids = Vec::with_capacity(kids.len() + 2);
    for (i, kid) in kids.iter().enumerate() {
      if before_is_ws && i == op_idx - 1 {
        continue;
      }
      if after_is_ws && i == op_idx + 1 {
        continue;
      }
      if i == op_idx {
        new_kids.push(space());
        new_kids.push(kid.clone());
        new_kids.push(space());
      } else {
        new_kids.push(kid.clone());
      }
    }

    let new_node = Node::composite(node.head, new_kids);
    let rendered = render(&new_node);
    ctx.fmt_io_mut().replace_bytes(&rendered, node.span());
    Outcome::Replaced(new_node)
  }
}

fn space() -> Node {
  Node::leaf(Head::new(Kind::Whitespace), &b" "[..])
}

/// Mirrors `infix_op_call_op`'s scan (first non-trivia child is the operand,
/// the next operator/comparison-flagged child is the operator) but returns
/// the index instead of a reference, since the rule needs to inspect the
/// operator's immediate neighbors.
fn find_operator_index(kids: &[Node]) -> Option<usize> {
  let mut seen_operand = false;
  for (i, kid) in kids.iter().enumerate() {
    if kid.kind().is_trivia() {
      continue;
    }
    if !seen_operand {
      seen_operand = true;
      continue;
    }
    if is_operator_leaf(kid) || is_comparison_leaf(kid) {
      return Some(i);
    }
  }
  None
}
