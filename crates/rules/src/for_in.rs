use runestone_core::{is_assignment, is_leaf, verified_kids, Context, Flags, Head, Kind, Node, Outcome, Rule};

use crate::render::render;

/// Rule 8: a `for` loop's iteration header uses `in`, not `=` (`for i=1:3`
/// → `for i in 1:3`). Once rewritten, the header is no longer an
/// `is_assignment` node, so this rule and [`crate::assignment_spacing`]
/// never fight over the same bytes.
pub struct ForLoopUsesIn;

impl Rule for ForLoopUsesIn {
  fn name(&self) -> &'static str {
    "for-loop-uses-in"
  }

  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome {
    if node.kind() != Kind::For {
      return Outcome::Accepted;
    }
    let kids = verified_kids(node);
    let Some(assign_idx) = kids.iter().position(is_assignment) else {
      return Outcome::Accepted;
    };
    let inner = verified_kids(&kids[assign_idx]);
    let Some(op_pos) = inner.iter().position(is_assignment_leaf) else {
      return Outcome::Accepted;
    };

    let lhs = inner[..op_pos].iter().filter(|k| !k.kind().is_trivia()).cloned();
    let rhs = inner[op_pos + 1..].iter().filter(|k| !k.kind().is_trivia()).cloned();

    let mut replacement: Vec<Node> = lhs.collect();
    replacement.push(space());
    replacement.push(Node::leaf(Head::new(Kind::Keyword), &b"in"[..]));
    replacement.push(space());
    replacement.extend(rhs);

    let mut new_kids = Vec::with_capacity(kids.len() + replacement.len());
    for (i, kid) in kids.iter().enumerate() {
      if i == assign_idx {
        new_kids.extend(replacement.iter().cloned());
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
