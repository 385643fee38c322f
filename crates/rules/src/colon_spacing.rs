use runestone_core::{verified_kids, Context, Kind, Node, Outcome, Rule};

use crate::render::render;

/// Rule 7: no whitespace directly touches a `:` (range bounds, `a:b:c`).
pub struct NoSpacesAroundColonAndSimilar;

impl Rule for NoSpacesAroundColonAndSimilar {
  fn name(&self) -> &'static str {
    "no-spaces-around-colon-and-similar"
  }

  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome {
    if node.kind() != Kind::Range {
      return Outcome::Accepted;
    }
    let kids = verified_kids(node);
    let needs_change = kids.iter().enumerate().any(|(i, kid)| {
      is_colon(kid)
        && ((i > 0 && kids[i - 1].kind().is_whitespace_like())
          || (i + 1 < kids.len() && kids[i + 1].kind().is_whitespace_like()))
    });
    if !needs_change {
      return Outcome::Accepted;
    }

    let mut new_kids: Vec<Node> = Vec::with_capacity(kids.len());
    let mut i = 0;
    while i < kids.len() {
      if is_colon(&kids[i]) {
        if matches!(new_kids.last(), Some(last) if last.kind().is_whitespace_like()) {
          new_kids.pop();
        }
        new_kids.push(kids[i].clone());
        i += 1;
        if i < kids.len() && kids[i].kind().is_whitespace_like() {
          i += 1;
        }
        continue;
      }
      new_kids.push(kids[i].clone());
      i += 1;
    }

    let new_node = Node::composite(node.head, new_kids);
    let rendered = render(&new_node);
    ctx.fmt_io_mut().replace_bytes(&rendered, node.span());
    Outcome::Replaced(new_node)
  }
}

fn is_colon(n: &Node) -> bool {
  n.kind() == Kind::Punctuation && runestone_core::leaf_bytes(n) == b":"
}
