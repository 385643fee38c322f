/// Tiny inline replacement for the `bitflags` crate macro, matching its
/// generated API surface (`empty`, `contains`, `insert`, `union`, `Default`)
/// closely enough that call sites read the same either way.
macro_rules! bitflags_lite {
  (
    $(#[$meta:meta])*
    pub struct $name:ident: $ty:ty {
      $(const $flag:ident = $val:expr;)*
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct $name($ty);

    impl $name {
      $(pub const $flag: $name = $name($val);)*

      pub const fn empty() -> Self {
        $name(0)
      }
      pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
      }
      pub const fn union(self, other: Self) -> Self {
        $name(self.0 | other.0)
      }
      pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
      }
    }

    impl std::ops::BitOr for $name {
      type Output = Self;
      fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
      }
    }
  };
}

/// Closed enumeration of syntactic categories a [`crate::Node`] can carry.
///
/// Three behavioral classes drive the per-node driver's dispatch:
/// always-recursive composites, conditionally-recursive composites (recurse only
/// when not trivia), and terminals/trivia (emitted verbatim).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
  // always-recursive composites
  Block,
  Call,
  Tuple,
  ArrayLit,
  StringLit,
  CmdStringLit,
  Comprehension,
  Generator,
  Quote,
  Dotted,
  Range,

  // conditionally-recursive composites
  Function,
  If,
  Else,
  While,
  For,
  Struct,
  Module,
  Operator,

  // terminals and trivia
  Identifier,
  IntegerLit,
  FloatLit,
  OperatorLeaf,
  Keyword,
  Punctuation,
  /// Raw literal content with no further structure of its own, e.g. the
  /// bytes between a string or cmdstring literal's delimiters.
  Literal,
  Whitespace,
  NewlineWs,
  Comment,

  /// Not wired into any of the three dispatch classes below. Exists so the
  /// driver's `UnhandledKind` error path is reachable without a
  /// synthetic/fuzzed `Kind`.
  Unsupported,
}

impl Kind {
  /// (a) Always-recursive composites: always recurse into children regardless
  /// of trivia status.
  pub fn is_always_recursive(self) -> bool {
    use Kind::*;
    matches!(
      self,
      Block | Call | Tuple | ArrayLit | StringLit | CmdStringLit | Comprehension | Generator
        | Quote | Dotted | Range
    )
  }

  /// (b) Conditionally-recursive composites: recurse only when the node is not
  /// itself classified as trivia (composites of this class are never trivia in
  /// practice, but the predicate is kept explicit).
  pub fn is_conditionally_recursive(self) -> bool {
    use Kind::*;
    matches!(
      self,
      Function | If | Else | While | For | Struct | Module | Operator
    )
  }

  /// (c) Terminals and trivia: emitted verbatim, cursor advances by span.
  pub fn is_terminal_or_trivia(self) -> bool {
    use Kind::*;
    matches!(
      self,
      Identifier
        | IntegerLit
        | FloatLit
        | OperatorLeaf
        | Keyword
        | Punctuation
        | Literal
        | Whitespace
        | NewlineWs
        | Comment
    )
  }

  pub fn is_whitespace_like(self) -> bool {
    matches!(self, Kind::Whitespace | Kind::NewlineWs | Kind::Comment)
  }

  /// Whitespace/comment nodes that `first_non_whitespace_child` and
  /// `meta_nargs` skip over.
  pub fn is_trivia(self) -> bool {
    self.is_whitespace_like()
  }
}

bitflags_lite! {
  /// Per-node flag bitset packed alongside `Kind` into a node's `Head`.
  ///
  /// `INFIX`/`PREFIX`/`POSTFIX` mark operator-call position; `COMPARISON_PREC`
  /// and `OPERATOR_PREC` mark the precedence class of an `OperatorLeaf` node,
  /// tested by `is_comparison_leaf`/`is_operator_leaf`; `ASSIGNMENT` marks
  /// an `Operator` node as the `=` family.
  pub struct Flags: u16 {
    const INFIX = 1 << 0;
    const PREFIX = 1 << 1;
    const POSTFIX = 1 << 2;
    const COMPARISON_PREC = 1 << 3;
    const OPERATOR_PREC = 1 << 4;
    const ASSIGNMENT = 1 << 5;
  }
}

// Engine-level per-node bitset. The engine preserves these through rewrites
// but never interprets them; rules use them for indentation bookkeeping.
bitflags_lite! {
  pub struct TagBits: u8 {
    const INDENT = 1 << 0;
    const DEDENT = 1 << 1;
  }
}
