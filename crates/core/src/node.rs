use std::rc::Rc;

use crate::kind::{Flags, Kind, TagBits};

/// Opaque value combining a node's [`Kind`] tag and [`Flags`] bitset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Head {
  pub kind: Kind,
  pub flags: Flags,
}

impl Head {
  pub fn new(kind: Kind) -> Self {
    Self {
      kind,
      flags: Flags::empty(),
    }
  }
  pub fn with_flags(kind: Kind, flags: Flags) -> Self {
    Self { kind, flags }
  }
}

/// Either the leaf marker (terminal bytes) or an ordered sequence of children.
#[derive(Debug, Clone)]
pub enum Kids {
  Leaf(Rc<[u8]>),
  Children(Rc<[Node]>),
}

/// An immutable, lossless CST node. Nodes are never mutated in
/// place; "mutation" constructs a replacement and propagates upward, sharing
/// unchanged subtrees via `Rc`.
#[derive(Debug, Clone)]
pub struct Node {
  pub head: Head,
  span: usize,
  kids: Kids,
  pub tags: TagBits,
}

impl Node {
  /// Construct a leaf node carrying its terminal bytes directly.
  pub fn leaf(head: Head, bytes: impl Into<Rc<[u8]>>) -> Self {
    let bytes = bytes.into();
    Self {
      head,
      span: bytes.len(),
      kids: Kids::Leaf(bytes),
      tags: TagBits::empty(),
    }
  }

  /// Construct a composite node; span is the sum of the children's spans.
  pub fn composite(head: Head, kids: Vec<Node>) -> Self {
    let span = kids.iter().map(Node::span).sum();
    Self {
      head,
      span,
      kids: Kids::Children(kids.into()),
      tags: TagBits::empty(),
    }
  }

  pub fn with_tags(mut self, tags: TagBits) -> Self {
    self.tags = tags;
    self
  }

  pub fn kind(&self) -> Kind {
    self.head.kind
  }

  pub fn span(&self) -> usize {
    self.span
  }
}

/// CST operations. Free functions rather than methods, since these read as
/// operations "over" a node rather than behavior owned by it.
pub fn is_leaf(n: &Node) -> bool {
  matches!(n.kids, Kids::Leaf(_))
}

/// Returns the child sequence. Programmer error (panics) if called on a leaf.
pub fn verified_kids(n: &Node) -> &[Node] {
  match &n.kids {
    Kids::Children(kids) => kids,
    Kids::Leaf(_) => panic!("verified_kids called on a leaf node"),
  }
}

pub fn leaf_bytes(n: &Node) -> &[u8] {
  match &n.kids {
    Kids::Leaf(bytes) => bytes,
    Kids::Children(_) => panic!("leaf_bytes called on a composite node"),
  }
}

/// Leftmost terminal under `n` (or `n` itself if it is already a leaf).
pub fn first_leaf(n: &Node) -> &Node {
  let mut cur = n;
  while !is_leaf(cur) {
    cur = verified_kids(cur).first().expect("composite node with no children");
  }
  cur
}

/// Rightmost terminal under `n`.
pub fn last_leaf(n: &Node) -> &Node {
  let mut cur = n;
  while !is_leaf(cur) {
    cur = verified_kids(cur).last().expect("composite node with no children");
  }
  cur
}

/// Count of non-trivia children (0 for leaves).
pub fn meta_nargs(n: &Node) -> usize {
  if is_leaf(n) {
    return 0;
  }
  verified_kids(n)
    .iter()
    .filter(|k| !k.kind().is_trivia())
    .count()
}

/// First child that is not whitespace/comment trivia. Programmer error
/// (panics) if none exists.
pub fn first_non_whitespace_child(n: &Node) -> &Node {
  verified_kids(n)
    .iter()
    .find(|k| !k.kind().is_trivia())
    .expect("node has no non-whitespace child")
}

/// Returns a new tree with the leftmost terminal replaced; spans along the
/// path are recomputed.
pub fn replace_first_leaf(n: &Node, leaf: Node) -> Node {
  if is_leaf(n) {
    return leaf;
  }
  let kids = verified_kids(n);
  let mut new_kids = Vec::with_capacity(kids.len());
  let mut replaced = false;
  for (i, kid) in kids.iter().enumerate() {
    if i == 0 {
      new_kids.push(replace_first_leaf(kid, leaf.clone()));
      replaced = true;
    } else {
      new_kids.push(kid.clone());
    }
  }
  debug_assert!(replaced, "composite node must have at least one child");
  Node::composite(n.head, new_kids)
}

/// New node with the same head as `n`, new children, recomputed span.
pub fn make_node(n: &Node, kids: Vec<Node>, tags: TagBits) -> Node {
  Node::composite(n.head, kids).with_tags(tags)
}

/// Non-leaf node whose operator carries the assignment flag. Deliberately
/// narrow: a bare `=`-flagged leaf (e.g. a keyword-argument default) is not
/// itself an assignment (see DESIGN.md).
pub fn is_assignment(n: &Node) -> bool {
  !is_leaf(n) && n.kind() == Kind::Operator && n.head.flags.contains(Flags::ASSIGNMENT)
}

/// A call node flagged as an infix operator invocation. Calls that are not
/// flagged infix are never infix calls, even if they contain operator
/// children.
pub fn is_infix_op_call(n: &Node) -> bool {
  n.kind() == Kind::Call && n.head.flags.contains(Flags::INFIX)
}

/// A leaf with comparison precedence, or a dotted comparison of the form
/// `.<op>`: a non-leaf `Dotted` node with exactly two non-trivia children
/// whose second child is itself a comparison leaf. Recursive by design
/// (depth ≤ 2 in well-formed input).
pub fn is_comparison_leaf(n: &Node) -> bool {
  if is_leaf(n) {
    return n.head.flags.contains(Flags::COMPARISON_PREC);
  }
  if n.kind() != Kind::Dotted {
    return false;
  }
  let named: Vec<&Node> = verified_kids(n).iter().filter(|k| !k.kind().is_trivia()).collect();
  named.len() == 2 && is_comparison_leaf(named[1])
}

pub fn is_operator_leaf(n: &Node) -> bool {
  is_leaf(n) && n.head.flags.contains(Flags::OPERATOR_PREC)
}

/// Extracts the operator child of an infix call: scan children strictly
/// left-to-right; the first non-whitespace child is the left operand, then
/// the next child with operator precedence class is the operator.
pub fn infix_op_call_op(n: &Node) -> Option<&Node> {
  if !is_infix_op_call(n) {
    return None;
  }
  let kids = verified_kids(n);
  let mut seen_operand = false;
  for kid in kids {
    if kid.kind().is_trivia() {
      continue;
    }
    if !seen_operand {
      seen_operand = true;
      continue;
    }
    if is_operator_leaf(kid) || is_comparison_leaf(kid) {
      return Some(kid);
    }
  }
  None
}

#[cfg(test)]
mod test {
  use super::*;

  fn id(text: &str) -> Node {
    Node::leaf(Head::new(Kind::Identifier), text.as_bytes())
  }
  fn ws(text: &str) -> Node {
    Node::leaf(Head::new(Kind::Whitespace), text.as_bytes())
  }
  fn op_leaf(text: &str) -> Node {
    Node::leaf(
      Head::with_flags(Kind::OperatorLeaf, Flags::OPERATOR_PREC),
      text.as_bytes(),
    )
  }

  #[test]
  fn span_is_sum_of_children() {
    let n = Node::composite(Head::new(Kind::Tuple), vec![id("a"), ws(" "), id("b")]);
    assert_eq!(n.span(), 3);
  }

  #[test]
  fn meta_nargs_skips_trivia() {
    let n = Node::composite(Head::new(Kind::Tuple), vec![id("a"), ws(" "), id("b")]);
    assert_eq!(meta_nargs(&n), 2);
  }

  #[test]
  fn first_and_last_leaf() {
    let inner = Node::composite(Head::new(Kind::Tuple), vec![id("a"), id("b")]);
    let outer = Node::composite(Head::new(Kind::Block), vec![inner, id("c")]);
    assert_eq!(leaf_bytes(first_leaf(&outer)), b"a");
    assert_eq!(leaf_bytes(last_leaf(&outer)), b"c");
  }

  #[test]
  fn infix_call_extracts_operator() {
    let call = Node::composite(
      Head::with_flags(Kind::Call, Flags::INFIX),
      vec![id("a"), op_leaf("+"), id("b")],
    );
    let op = infix_op_call_op(&call).expect("operator present");
    assert_eq!(leaf_bytes(op), b"+");
  }

  #[test]
  fn non_infix_call_has_no_operator() {
    let call = Node::composite(Head::new(Kind::Call), vec![id("a"), op_leaf("+"), id("b")]);
    assert!(infix_op_call_op(&call).is_none());
  }

  #[test]
  fn replace_first_leaf_updates_span() {
    let n = Node::composite(Head::new(Kind::Tuple), vec![id("ab"), ws(" "), id("c")]);
    let replaced = replace_first_leaf(&n, id("x"));
    assert_eq!(replaced.span(), 3);
    assert_eq!(leaf_bytes(first_leaf(&replaced)), b"x");
  }
}
