use runestone_core::{Flags, Head, Kind, Node};

use crate::SyntaxError;

/// Recursive-descent parser over the flat token list produced by [`crate::lexer::lex`].
///
/// The grammar is deliberately small: just enough Julia-flavored surface
/// syntax to exercise every `Kind` the engine dispatches on and every rule in
/// the canonical pipeline. It is not a validating parser: malformed input
/// that doesn't match one of the forms below is rejected with a
/// [`SyntaxError`] — the engine itself never sees a tree it can't handle.
pub struct Parser<'a> {
  toks: &'a [Node],
  pos: usize,
}

impl<'a> Parser<'a> {
  pub fn new(toks: &'a [Node]) -> Self {
    Self { toks, pos: 0 }
  }

  pub fn parse_block(&mut self) -> Result<Node, SyntaxError> {
    let mut kids = Vec::new();
    while self.pos < self.toks.len() {
      kids.push(self.parse_statement()?);
    }
    Ok(Node::composite(Head::new(Kind::Block), kids))
  }

  fn peek(&self) -> Option<&Node> {
    self.toks.get(self.pos)
  }

  fn peek_non_trivia(&self) -> Option<&Node> {
    self.toks[self.pos..].iter().find(|t| !t.kind().is_trivia())
  }

  fn bump(&mut self) -> Node {
    let t = self.toks[self.pos].clone();
    self.pos += 1;
    t
  }

  fn take_trivia(&mut self, out: &mut Vec<Node>) {
    while let Some(t) = self.peek() {
      if t.kind().is_trivia() {
        out.push(self.bump());
      } else {
        break;
      }
    }
  }

  fn is_keyword(&self, word: &str) -> bool {
    self
      .peek_non_trivia()
      .is_some_and(|t| t.kind() == Kind::Keyword && runestone_core::leaf_bytes(t) == word.as_bytes())
  }

  fn is_punct(&self, sym: &str) -> bool {
    self
      .peek_non_trivia()
      .is_some_and(|t| t.kind() == Kind::Punctuation && runestone_core::leaf_bytes(t) == sym.as_bytes())
  }

  fn expect_keyword(&mut self, word: &str, kids: &mut Vec<Node>) -> Result<(), SyntaxError> {
    self.take_trivia(kids);
    match self.peek() {
      Some(t) if t.kind() == Kind::Keyword && runestone_core::leaf_bytes(t) == word.as_bytes() => {
        kids.push(self.bump());
        Ok(())
      }
      other => Err(SyntaxError::Expected {
        expected: word.to_string(),
        found: describe(other),
      }),
    }
  }

  fn expect_punct(&mut self, sym: &str, kids: &mut Vec<Node>) -> Result<(), SyntaxError> {
    self.take_trivia(kids);
    match self.peek() {
      Some(t) if t.kind() == Kind::Punctuation && runestone_core::leaf_bytes(t) == sym.as_bytes() => {
        kids.push(self.bump());
        Ok(())
      }
      other => Err(SyntaxError::Expected {
        expected: sym.to_string(),
        found: describe(other),
      }),
    }
  }

  fn parse_statement(&mut self) -> Result<Node, SyntaxError> {
    let mut lead = Vec::new();
    self.take_trivia(&mut lead);
    if !lead.is_empty() && self.pos >= self.toks.len() {
      return Ok(Node::composite(Head::new(Kind::Block), lead));
    }

    if self.is_keyword("for") {
      return self.parse_for(lead);
    }
    if self.is_keyword("while") {
      return self.parse_while(lead);
    }
    if self.is_keyword("if") {
      return self.parse_if(lead);
    }
    if self.is_keyword("function") {
      return self.parse_block_form(lead, "function", Kind::Function);
    }
    if self.is_keyword("struct") {
      return self.parse_block_form(lead, "struct", Kind::Struct);
    }
    if self.is_keyword("module") {
      return self.parse_block_form(lead, "module", Kind::Module);
    }

    let expr = self.parse_expr()?;
    if !lead.is_empty() {
      let mut kids = lead;
      kids.push(expr);
      return Ok(Node::composite(Head::new(Kind::Block), kids));
    }
    Ok(expr)
  }

  /// `for <ident> = <expr> : <expr> ... end` / `while <expr> ... end` /
  /// `if <expr> ... [else ...] end`, each a conditionally-recursive composite
  /// whose body is itself parsed as nested statements up to `end`/`else`.
  fn parse_for(&mut self, mut kids: Vec<Node>) -> Result<Node, SyntaxError> {
    self.expect_keyword("for", &mut kids)?;
    self.take_trivia(&mut kids);
    kids.push(self.parse_for_header()?);
    while !self.is_keyword("end") {
      if self.pos >= self.toks.len() {
        return Err(SyntaxError::UnexpectedEof { expected: "end" });
      }
      kids.push(self.parse_statement()?);
    }
    self.expect_keyword("end", &mut kids)?;
    Ok(Node::composite(Head::new(Kind::For), kids))
  }

  /// `<ident> = <range>` or `<ident> in <range>` — both accepted so that a
  /// `for` loop whose header was already rewritten to the canonical `in`
  /// form by a rule still re-parses.
  fn parse_for_header(&mut self) -> Result<Node, SyntaxError> {
    let ident = match self.peek() {
      Some(t) if t.kind() == Kind::Identifier => self.bump(),
      other => {
        return Err(SyntaxError::Expected {
          expected: "identifier".to_string(),
          found: describe(other),
        })
      }
    };
    let mut mid = Vec::new();
    self.take_trivia(&mut mid);

    if self.is_keyword("in") {
      let mut kids = vec![ident];
      kids.extend(mid);
      kids.push(self.bump());
      self.take_trivia(&mut kids);
      kids.push(self.parse_range()?);
      return Ok(Node::composite(Head::new(Kind::Block), kids));
    }

    let is_eq = self
      .peek()
      .is_some_and(|t| t.kind() == Kind::OperatorLeaf && runestone_core::leaf_bytes(t) == b"=");
    if is_eq {
      let mut kids = vec![ident];
      kids.extend(mid);
      let op = self.bump();
      kids.push(Node::leaf(
        Head::with_flags(Kind::OperatorLeaf, Flags::ASSIGNMENT),
        op_bytes(&op),
      ));
      self.take_trivia(&mut kids);
      kids.push(self.parse_range()?);
      return Ok(Node::composite(Head::with_flags(Kind::Operator, Flags::ASSIGNMENT), kids));
    }

    Err(SyntaxError::Expected {
      expected: "= or in".to_string(),
      found: describe(self.peek()),
    })
  }

  fn parse_while(&mut self, mut kids: Vec<Node>) -> Result<Node, SyntaxError> {
    self.expect_keyword("while", &mut kids)?;
    self.take_trivia(&mut kids);
    kids.push(self.parse_expr()?);
    while !self.is_keyword("end") {
      if self.pos >= self.toks.len() {
        return Err(SyntaxError::UnexpectedEof { expected: "end" });
      }
      kids.push(self.parse_statement()?);
    }
    self.expect_keyword("end", &mut kids)?;
    Ok(Node::composite(Head::new(Kind::While), kids))
  }

  fn parse_if(&mut self, mut kids: Vec<Node>) -> Result<Node, SyntaxError> {
    self.expect_keyword("if", &mut kids)?;
    self.take_trivia(&mut kids);
    kids.push(self.parse_expr()?);
    while !self.is_keyword("else") && !self.is_keyword("end") {
      if self.pos >= self.toks.len() {
        return Err(SyntaxError::UnexpectedEof { expected: "end" });
      }
      kids.push(self.parse_statement()?);
    }
    if self.is_keyword("else") {
      let mut else_kids = Vec::new();
      self.expect_keyword("else", &mut else_kids)?;
      while !self.is_keyword("end") {
        if self.pos >= self.toks.len() {
          return Err(SyntaxError::UnexpectedEof { expected: "end" });
        }
        else_kids.push(self.parse_statement()?);
      }
      kids.push(Node::composite(Head::new(Kind::Else), else_kids));
    }
    self.expect_keyword("end", &mut kids)?;
    Ok(Node::composite(Head::new(Kind::If), kids))
  }

  fn parse_block_form(
    &mut self,
    mut kids: Vec<Node>,
    keyword: &str,
    kind: Kind,
  ) -> Result<Node, SyntaxError> {
    self.expect_keyword(keyword, &mut kids)?;
    self.take_trivia(&mut kids);
    kids.push(self.parse_expr()?);
    while !self.is_keyword("end") {
      if self.pos >= self.toks.len() {
        return Err(SyntaxError::UnexpectedEof { expected: "end" });
      }
      kids.push(self.parse_statement()?);
    }
    self.expect_keyword("end", &mut kids)?;
    Ok(Node::composite(Head::new(kind), kids))
  }

  fn parse_expr(&mut self) -> Result<Node, SyntaxError> {
    self.parse_assignment()
  }

  fn parse_assignment(&mut self) -> Result<Node, SyntaxError> {
    let lhs = self.parse_comparison()?;
    let mut lead = Vec::new();
    self.take_trivia(&mut lead);
    let is_eq = self
      .peek()
      .is_some_and(|t| t.kind() == Kind::OperatorLeaf && runestone_core::leaf_bytes(t) == b"=");
    if is_eq {
      let mut kids = vec![lhs];
      kids.extend(lead);
      let op = self.bump();
      kids.push(Node::leaf(Head::with_flags(Kind::OperatorLeaf, Flags::ASSIGNMENT), op_bytes(&op)));
      self.take_trivia(&mut kids);
      kids.push(self.parse_comparison()?);
      return Ok(Node::composite(Head::with_flags(Kind::Operator, Flags::ASSIGNMENT), kids));
    }
    // no assignment: put back the leading trivia we speculatively consumed.
    self.pos -= lead.len();
    Ok(lhs)
  }

  fn parse_comparison(&mut self) -> Result<Node, SyntaxError> {
    let lhs = self.parse_range()?;
    let mut lead = Vec::new();
    self.take_trivia(&mut lead);
    if let Some(op) = self.try_take_comparison_op() {
      let mut kids = vec![lhs];
      kids.extend(lead);
      kids.push(op);
      self.take_trivia(&mut kids);
      kids.push(self.parse_range()?);
      return Ok(Node::composite(Head::with_flags(Kind::Call, Flags::INFIX), kids));
    }
    self.pos -= lead.len();
    Ok(lhs)
  }

  /// Consumes a plain comparison leaf (`==`, `<`, ...) or a dotted form
  /// (`.==`, `.<`, ...), returning it as the operator child. The dotted
  /// spelling has no trivia between the `.` and the operator.
  fn try_take_comparison_op(&mut self) -> Option<Node> {
    match self.peek() {
      Some(t) if t.kind() == Kind::OperatorLeaf && t.head.flags.contains(Flags::COMPARISON_PREC) => {
        Some(self.bump())
      }
      Some(t)
        if t.kind() == Kind::Punctuation
          && runestone_core::leaf_bytes(t) == b"."
          && self
            .toks
            .get(self.pos + 1)
            .is_some_and(|n| n.kind() == Kind::OperatorLeaf && n.head.flags.contains(Flags::COMPARISON_PREC)) =>
      {
        let dot = self.bump();
        let op = self.bump();
        Some(Node::composite(Head::new(Kind::Dotted), vec![dot, op]))
      }
      _ => None,
    }
  }

  /// `start:stop` and `start:step:stop` (e.g. a `for` loop's iteration
  /// range). Unambiguous at this grammar level: the compact quote form
  /// `:( expr )` only ever starts a primary expression, never follows one.
  fn parse_range(&mut self) -> Result<Node, SyntaxError> {
    let mut kids = vec![self.parse_additive()?];
    loop {
      let mut lead = Vec::new();
      self.take_trivia(&mut lead);
      if !self.is_punct(":") {
        self.pos -= lead.len();
        break;
      }
      kids.extend(lead);
      kids.push(self.bump());
      self.take_trivia(&mut kids);
      kids.push(self.parse_additive()?);
    }
    if kids.len() == 1 {
      return Ok(kids.pop().unwrap());
    }
    Ok(Node::composite(Head::new(Kind::Range), kids))
  }

  fn parse_additive(&mut self) -> Result<Node, SyntaxError> {
    let mut lhs = self.parse_primary()?;
    loop {
      let mut lead = Vec::new();
      self.take_trivia(&mut lead);
      let is_op = self.peek().is_some_and(|t| {
        t.kind() == Kind::OperatorLeaf && t.head.flags.contains(Flags::OPERATOR_PREC)
      });
      if !is_op {
        self.pos -= lead.len();
        break;
      }
      let mut kids = vec![lhs];
      kids.extend(lead);
      kids.push(self.bump());
      self.take_trivia(&mut kids);
      kids.push(self.parse_primary()?);
      lhs = Node::composite(Head::with_flags(Kind::Call, Flags::INFIX), kids);
    }
    Ok(lhs)
  }

  fn parse_primary(&mut self) -> Result<Node, SyntaxError> {
    let mut lead = Vec::new();
    self.take_trivia(&mut lead);
    let tok = self.peek().cloned().ok_or(SyntaxError::UnexpectedEof {
      expected: "expression",
    })?;

    let mut node = match tok.kind() {
      Kind::Identifier | Kind::IntegerLit | Kind::FloatLit => self.bump(),
      Kind::Punctuation if runestone_core::leaf_bytes(&tok) == b"\"" => self.parse_string_lit()?,
      Kind::Punctuation if runestone_core::leaf_bytes(&tok) == b"`" => self.parse_cmdstring_lit()?,
      Kind::Punctuation if runestone_core::leaf_bytes(&tok) == b"[" => self.parse_array_or_comprehension()?,
      Kind::Punctuation if runestone_core::leaf_bytes(&tok) == b"(" => self.parse_tuple_or_generator()?,
      Kind::Punctuation if runestone_core::leaf_bytes(&tok) == b":" => self.parse_quote()?,
      _ => return Err(SyntaxError::Expected {
        expected: "expression".to_string(),
        found: describe(Some(&tok)),
      }),
    };

    // function-call suffix: `ident (args)`.
    if node.kind() == Kind::Identifier {
      let mut call_lead = Vec::new();
      self.take_trivia(&mut call_lead);
      if self.is_punct("(") {
        let mut kids = vec![node];
        kids.extend(call_lead);
        kids.push(self.parse_tuple_or_generator()?);
        node = Node::composite(Head::new(Kind::Call), kids);
      } else {
        self.pos -= call_lead.len();
      }
    }

    if !lead.is_empty() {
      // leading trivia belongs to the caller's composite, not discarded.
      let mut kids = lead;
      kids.push(node);
      return Ok(Node::composite(Head::new(Kind::Block), kids));
    }
    Ok(node)
  }

  fn parse_string_lit(&mut self) -> Result<Node, SyntaxError> {
    let open = self.bump();
    let content = match self.peek() {
      Some(t) if t.kind() == Kind::Literal => self.bump(),
      _ => Node::leaf(Head::new(Kind::Literal), &b""[..]),
    };
    let close = match self.peek() {
      Some(t) if t.kind() == Kind::Punctuation && runestone_core::leaf_bytes(t) == b"\"" => self.bump(),
      other => return Err(SyntaxError::Expected {
        expected: "\"".to_string(),
        found: describe(other),
      }),
    };
    Ok(Node::composite(Head::new(Kind::StringLit), vec![open, content, close]))
  }

  fn parse_cmdstring_lit(&mut self) -> Result<Node, SyntaxError> {
    let open = self.bump();
    let content = match self.peek() {
      Some(t) if t.kind() == Kind::Literal => self.bump(),
      _ => Node::leaf(Head::new(Kind::Literal), &b""[..]),
    };
    let close = match self.peek() {
      Some(t) if t.kind() == Kind::Punctuation && runestone_core::leaf_bytes(t) == b"`" => self.bump(),
      other => return Err(SyntaxError::Expected {
        expected: "`".to_string(),
        found: describe(other),
      }),
    };
    Ok(Node::composite(Head::new(Kind::CmdStringLit), vec![open, content, close]))
  }

  /// `[ ... ]`: a generator suffix (`for` before the close) makes it a
  /// `Comprehension`; otherwise a plain `ArrayLit`.
  fn parse_array_or_comprehension(&mut self) -> Result<Node, SyntaxError> {
    let mut kids = vec![self.bump()];
    let mut saw_for = false;
    while !self.is_punct("]") {
      if self.pos >= self.toks.len() {
        return Err(SyntaxError::UnexpectedEof { expected: "]" });
      }
      if self.is_keyword("for") {
        saw_for = true;
      }
      kids.push(self.parse_comma_item()?);
    }
    self.expect_punct("]", &mut kids)?;
    let kind = if saw_for { Kind::Comprehension } else { Kind::ArrayLit };
    Ok(Node::composite(Head::new(kind), kids))
  }

  /// `( ... )`: a generator suffix makes it a `Generator`; a single
  /// comma makes it a `Tuple`; otherwise it's a parenthesized expression,
  /// still represented as a `Tuple` of one element.
  fn parse_tuple_or_generator(&mut self) -> Result<Node, SyntaxError> {
    let mut kids = vec![self.bump()];
    let mut saw_for = false;
    while !self.is_punct(")") {
      if self.pos >= self.toks.len() {
        return Err(SyntaxError::UnexpectedEof { expected: ")" });
      }
      if self.is_keyword("for") {
        saw_for = true;
      }
      kids.push(self.parse_comma_item()?);
    }
    self.expect_punct(")", &mut kids)?;
    let kind = if saw_for { Kind::Generator } else { Kind::Tuple };
    Ok(Node::composite(Head::new(kind), kids))
  }

  fn parse_comma_item(&mut self) -> Result<Node, SyntaxError> {
    let mut lead = Vec::new();
    self.take_trivia(&mut lead);
    if self.is_punct(",") {
      lead.push(self.bump());
      return Ok(Node::composite(Head::new(Kind::Block), lead));
    }
    if self.is_keyword("for") {
      let mut kids = lead;
      kids.push(self.bump());
      self.take_trivia(&mut kids);
      kids.push(self.parse_expr()?);
      return Ok(Node::composite(Head::new(Kind::Block), kids));
    }
    let expr = self.parse_expr()?;
    if lead.is_empty() {
      Ok(expr)
    } else {
      let mut kids = lead;
      kids.push(expr);
      Ok(Node::composite(Head::new(Kind::Block), kids))
    }
  }

  /// `:( expr )`: the compact quote form.
  fn parse_quote(&mut self) -> Result<Node, SyntaxError> {
    let mut kids = vec![self.bump()];
    self.expect_punct("(", &mut kids)?;
    kids.push(self.parse_expr()?);
    self.expect_punct(")", &mut kids)?;
    Ok(Node::composite(Head::new(Kind::Quote), kids))
  }
}

fn op_bytes(n: &Node) -> &[u8] {
  runestone_core::leaf_bytes(n)
}

fn describe(tok: Option<&Node>) -> String {
  match tok {
    Some(t) if runestone_core::is_leaf(t) => {
      String::from_utf8_lossy(runestone_core::leaf_bytes(t)).into_owned()
    }
    Some(t) => format!("{:?}", t.kind()),
    None => "end of input".to_string(),
  }
}
