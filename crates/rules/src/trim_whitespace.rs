use runestone_core::{Context, Head, Kind, Node, Outcome, Rule};

/// Rule 1 of the canonical pipeline: trailing whitespace at the end of a
/// line or at end of file is trimmed to nothing.
pub struct TrimTrailingWhitespace;

impl Rule for TrimTrailingWhitespace {
  fn name(&self) -> &'static str {
    "trim-trailing-whitespace"
  }

  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome {
    if node.kind() != Kind::Whitespace || node.span() == 0 {
      return Outcome::Accepted;
    }
    let trailing = match &ctx.next_sibling {
      None => true,
      Some(next) => next.kind() == Kind::NewlineWs,
    };
    if !trailing {
      return Outcome::Accepted;
    }
    ctx.fmt_io_mut().replace_bytes(&[], node.span());
    Outcome::Replaced(Node::leaf(Head::new(Kind::Whitespace), &b""[..]))
  }
}
