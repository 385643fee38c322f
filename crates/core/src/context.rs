use std::rc::Rc;

use crate::buffer::FmtBuffer;
use crate::node::Node;
use crate::rule::RulePipeline;

/// User flags. `debug` is a one-way widening applied at
/// construction: it forces `assert` and `verbose` on, never toggled back.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextFlags {
  pub quiet: bool,
  pub verbose: bool,
  pub assert: bool,
  pub debug: bool,
  pub check: bool,
  pub diff: bool,
}

impl ContextFlags {
  pub fn new(quiet: bool, verbose: bool, assert: bool, debug: bool, check: bool, diff: bool) -> Self {
    let widened_verbose = verbose || debug;
    let widened_assert = assert || debug;
    Self {
      quiet,
      verbose: widened_verbose,
      assert: widened_assert,
      debug,
      check,
      diff,
    }
  }
}

/// Read-only view over the source bytes. Constant after
/// `Context` construction, like `src_str`/`src_tree`.
#[derive(Debug, Clone)]
pub struct SourceReader {
  bytes: Rc<[u8]>,
}

impl SourceReader {
  pub fn new(bytes: Rc<[u8]>) -> Self {
    Self { bytes }
  }
  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }
  pub fn slice(&self, range: std::ops::Range<usize>) -> &[u8] {
    &self.bytes[range]
  }
}

/// Mutable traversal state threaded through the engine.
///
/// `src_str`/`src_tree`/`src_io` are constant after construction. `fmt_io`'s
/// cursor mirrors the traversal. `prev_sibling`/`next_sibling` are set by the
/// children driver around each child's `format_node!` invocation and are
/// otherwise `None` (top level). `Context` is single-use: `format_tree!` runs
/// once; afterward `fmt_io` holds the formatted bytes and `fmt_tree` holds
/// the rewritten CST.
pub struct Context {
  pub(crate) src_str: Rc<str>,
  pub(crate) src_tree: Node,
  pub(crate) src_io: SourceReader,
  pub(crate) fmt_io: FmtBuffer,
  pub(crate) fmt_tree: Option<Node>,
  pub prev_sibling: Option<Node>,
  pub next_sibling: Option<Node>,
  pub flags: ContextFlags,
  pub(crate) rules: RulePipeline,
}

impl Context {
  pub fn new(src: &str, src_tree: Node, flags: ContextFlags, rules: RulePipeline) -> Self {
    let bytes: Rc<[u8]> = Rc::from(src.as_bytes());
    Self {
      src_str: Rc::from(src),
      src_tree,
      src_io: SourceReader::new(bytes),
      fmt_io: FmtBuffer::new(),
      fmt_tree: None,
      prev_sibling: None,
      next_sibling: None,
      flags,
      rules,
    }
  }

  pub fn src_str(&self) -> &str {
    &self.src_str
  }

  pub fn src_tree(&self) -> &Node {
    &self.src_tree
  }

  pub fn src_io(&self) -> &SourceReader {
    &self.src_io
  }

  pub fn fmt_io(&self) -> &FmtBuffer {
    &self.fmt_io
  }

  pub fn fmt_io_mut(&mut self) -> &mut FmtBuffer {
    &mut self.fmt_io
  }

  /// Available only after `format_tree!` completes successfully.
  pub fn fmt_tree(&self) -> Option<&Node> {
    self.fmt_tree.as_ref()
  }
}
