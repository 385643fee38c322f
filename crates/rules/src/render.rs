use runestone_core::{is_leaf, leaf_bytes, verified_kids, Node};

/// Flattens a node's leaves into a byte vector, in source order. The rules
/// that restructure a node's children (operator/assignment spacing, colon
/// spacing, `for`-loop normalization) need this to build the replacement
/// bytes they splice into `fmt_io`.
pub(crate) fn render(n: &Node) -> Vec<u8> {
  if is_leaf(n) {
    leaf_bytes(n).to_vec()
  } else {
    verified_kids(n).iter().flat_map(render).collect()
  }
}
