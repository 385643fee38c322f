use runestone_core::{leaf_bytes, Context, Head, Kind, Node, Outcome, Rule};

/// Rule 4: the exponent marker in a float literal is lowercased (`1.5E-3` →
/// `1.5e-3`).
pub struct NormalizeFloatLiterals;

impl Rule for NormalizeFloatLiterals {
  fn name(&self) -> &'static str {
    "normalize-float-literals"
  }

  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome {
    if node.kind() != Kind::FloatLit {
      return Outcome::Accepted;
    }
    let bytes = leaf_bytes(node);
    if !bytes.contains(&b'E') {
      return Outcome::Accepted;
    }
    let canonical: Vec<u8> = bytes
      .iter()
      .map(|&b| if b == b'E' { b'e' } else { b })
      .collect();
    ctx.fmt_io_mut().replace_bytes(&canonical, node.span());
    Outcome::Replaced(Node::leaf(Head::new(Kind::FloatLit), canonical))
  }
}
