use runestone_core::{is_assignment, is_leaf, verified_kids, Context, Flags, Head, Kind, Node, Outcome, Rule};

use crate::render::render;

/// Rule 6: exactly one space surrounds the `=` in an assignment
/// (`x=1` → `x = 1`). Symmetric to [`crate::operator_spacing`]'s algorithm,
/// keyed on the `ASSIGNMENT`-flagged operator leaf instead of the
/// operator-precedence one.
pub struct SpacesAroundAssignments;

impl Rule for SpacesAroundAssignments {
  fn name(&self) -> &'static str {
    "spaces-around-assignments"
  }

  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome {
    if !is_assignment(node) {
      return Outcome::Accepted;
    }
    let kids = verified_kids(node);
    let Some(op_idx) = kids.iter().position(is_assignment_leaf) else {
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

fn is_assignment_leaf(n: &Node) -> bool {
  is_leaf(n) && n.kind() == Kind::OperatorLeaf && n.head.flags.contains(Flags::ASSIGNMENT)
}
