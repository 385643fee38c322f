use runestone_core::{leaf_bytes, Context, Head, Kind, Node, Outcome, Rule};

/// Rule 3: `0o` integer literals are lowercased, prefix included.
pub struct NormalizeOctalIntegerLiterals;

impl Rule for NormalizeOctalIntegerLiterals {
  fn name(&self) -> &'static str {
    "normalize-octal-integer-literals"
  }

  fn apply(&self, ctx: &mut Context, node: &Node) -> Outcome {
    if node.kind() != Kind::IntegerLit {
      return Outcome::Accepted;
    }
    let bytes = leaf_bytes(node);
    if bytes.len() < 2 || bytes[0] != b'0' || !bytes[1].eq_ignore_ascii_case(&b'o') {
      return Outcome::Accepted;
    }
    let mut canonical = Vec::with_capacity(bytes.len());
    canonical.push(b'0');
    canonical.push(b'o');
    canonical.extend(bytes[2..].iter().map(u8::to_ascii_lowercase));
    if canonical == bytes {
      return Outcome::Accepted;
    }
    ctx.fmt_io_mut().replace_bytes(&canonical, node.span());
    Outcome::Replaced(Node::leaf(Head::new(Kind::IntegerLit), canonical))
  }
}
