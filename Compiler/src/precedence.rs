use lexer::TokenKind;

use crate::Compiler;

/// Precedence levels, low to high (spec 4.4). `derive(PartialOrd)` relies
/// on the declaration order below matching that ordering exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
  None,
  Assignment,
  Or,
  And,
  Equality,
  Comparison,
  Term,
  Factor,
  Unary,
  Call,
  Primary,
}

impl Precedence {
  /// One level higher, used when parsing a binary operator's right-hand
  /// side so that `+`/`-` etc. are left-associative.
  pub fn higher(self) -> Precedence {
    use Precedence::*;
    match self {
      None => Assignment,
      Assignment => Or,
      Or => And,
      And => Equality,
      Equality => Comparison,
      Comparison => Term,
      Term => Factor,
      Factor => Unary,
      Unary => Call,
      Call | Primary => Primary,
    }
  }
}

type ParseFn<'src> = fn(&mut Compiler<'src>, bool);

/// One row of the Pratt parse table: the prefix handler (if this token can
/// start an expression), the infix handler (if it can continue one), and
/// the precedence used when it appears as an infix/binary operator.
pub struct ParseRule<'src> {
  pub prefix: Option<ParseFn<'src>>,
  pub infix: Option<ParseFn<'src>>,
  pub precedence: Precedence,
}

/// The token → rule table, as a pure function rather than a runtime-built
/// array (spec 9's design note: avoid global mutable parser state).
pub(crate) fn rule_for<'src>(kind: TokenKind) -> ParseRule<'src> {
  use Precedence::*;
  use TokenKind::*;

  let (prefix, infix, precedence): (Option<ParseFn<'src>>, Option<ParseFn<'src>>, Precedence) = match kind {
    LeftParen => (Some(Compiler::grouping), None, None),
    Minus => (Some(Compiler::unary), Some(Compiler::binary), Term),
    Plus => (None, Some(Compiler::binary), Term),
    Slash | Star => (None, Some(Compiler::binary), Factor),
    Bang => (Some(Compiler::unary), None, None),
    BangEqual | EqualEqual => (None, Some(Compiler::binary), Equality),
    Greater | GreaterEqual | Less | LessEqual => (None, Some(Compiler::binary), Comparison),
    Number => (Some(Compiler::number), None, None),
    String => (Some(Compiler::string), None, None),
    Identifier => (Some(Compiler::variable), None, None),
    False | Nil | True => (Some(Compiler::literal), None, None),
    _ => (None, None, None),
  };

  ParseRule { prefix, infix, precedence }
}

impl<'src> Compiler<'src> {
  /// The Pratt precedence-climbing core (spec 4.4's `parsePrecedence`).
  pub(crate) fn parse_precedence(&mut self, precedence: Precedence) {
    self.advance();
    let Some(prefix_rule) = rule_for(self.previous.kind).prefix else {
      self.error("Expect expression.");
      return;
    };

    let can_assign = precedence <= Precedence::Assignment;
    prefix_rule(self, can_assign);

    while precedence <= rule_for(self.current.kind).precedence {
      self.advance();
      let infix_rule = rule_for(self.previous.kind).infix.expect("infix precedence implies an infix rule");
      infix_rule(self, can_assign);
    }

    if can_assign && self.match_token(TokenKind::Equal) {
      self.error("Invalid assignment target.");
    }
  }
}
