mod error;
pub mod expression;
pub mod formatter;
pub mod program;
pub mod statement;

use crate::{
    lexer::{unescape_string_literal, LexicalError, Lexer, Span, Token, TokenKind},
    machine::Instruction,
    string::Ident,
};
pub use error::{ParserError, ParserErrorKind};
use expression::{
    Expression, ExpressionRef, FunctionCall, InstructionCall, Literal, LiteralKind,
};
pub use program::{BlockRef, FunctionRef, Program, ProgramBuilder};
use statement::{
    Assignment, Block, ExpressionStatement, ForStatement, FunctionDefinition, IfStatement,
    Statement, SwitchCase, SwitchStatement, VariableDeclaration,
};

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    lookahead: Option<Result<Token, ParserError>>,
    program: ProgramBuilder,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            lookahead: None,
            program: ProgramBuilder::new(),
        }
    }

    fn peek(&mut self) -> Result<Token, ParserError> {
        match self.lookahead {
            Some(ref token_or_error) => token_or_error.clone(),
            None => {
                let next_token = self.next_token();
                self.lookahead = Some(next_token.clone());
                next_token
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParserError> {
        match self.lookahead.take() {
            Some(token_or_error) => token_or_error,
            None => self
                .lexer
                .next_token()
                .map_err(|e: LexicalError| ParserError::from(e)),
        }
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParserError> {
        let next_token = self.next_token()?;
        if next_token.kind != expected {
            Err(ParserError {
                span: next_token.span,
                kind: match next_token.kind {
                    TokenKind::Eof => ParserErrorKind::UnexpectedEof,
                    actual => ParserErrorKind::UnexpectedToken { actual, expected },
                },
            })
        } else {
            Ok(next_token)
        }
    }

    fn eat_if(&mut self, next: TokenKind) -> Result<Option<Token>, ParserError> {
        let next_token = self.peek()?;
        if next_token.kind != next {
            Ok(None)
        } else {
            let _ = self.next_token()?;
            Ok(Some(next_token))
        }
    }

    fn lexeme(&self, token: &Token) -> &'src str {
        self.lexer.get_lexeme(&token.span).unwrap_or_default()
    }

    fn ident(&self, token: &Token) -> Ident {
        Ident::new(self.lexeme(token), token.span)
    }

    fn expect_ident(&mut self) -> Result<Ident, ParserError> {
        let token = self.expect(TokenKind::Ident)?;
        Ok(self.ident(&token))
    }

    /// Type annotations (`x:u256`) are accepted and discarded.
    fn skip_type_annotation(&mut self) -> Result<Option<Span>, ParserError> {
        if self.eat_if(TokenKind::Colon)?.is_some() {
            let ty = self.expect(TokenKind::Ident)?;
            return Ok(Some(ty.span));
        }
        Ok(None)
    }

    fn expect_typed_ident(&mut self) -> Result<Ident, ParserError> {
        let ident = self.expect_ident()?;
        self.skip_type_annotation()?;
        Ok(ident)
    }

    fn parse_typed_ident_list(&mut self) -> Result<Vec<Ident>, ParserError> {
        let mut idents = vec![self.expect_typed_ident()?];
        while self.eat_if(TokenKind::Comma)?.is_some() {
            idents.push(self.expect_typed_ident()?);
        }
        Ok(idents)
    }

    fn expression_span(&self, expr: ExpressionRef) -> Span {
        self.program
            .get_expression(expr)
            .map(Expression::span)
            .unwrap_or_default()
    }

    fn block_span(&self, block: BlockRef) -> Span {
        self.program
            .get_block(block)
            .map(|block| block.span)
            .unwrap_or_default()
    }
}

// Expressions
impl<'src> Parser<'src> {
    pub fn parse_expression(&mut self) -> Result<ExpressionRef, ParserError> {
        let token = self.next_token()?;
        let expr = match token.kind {
            TokenKind::Ident => {
                let name = self.ident(&token);
                if self.peek()?.kind == TokenKind::LeftParenthesis {
                    return self.parse_call(name);
                }
                Expression::Identifier(name)
            }
            kind if kind.is_literal() => Expression::Literal(self.parse_literal(&token)?),
            TokenKind::Eof => {
                return Err(ParserError {
                    kind: ParserErrorKind::UnexpectedEof,
                    span: token.span,
                })
            }
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::NonExpression(kind),
                    span: token.span,
                })
            }
        };
        Ok(self.program.push_expression(expr))
    }

    fn parse_literal(&mut self, token: &Token) -> Result<Literal, ParserError> {
        let lexeme = self.lexeme(token);
        let (kind, value) = match token.kind {
            TokenKind::NumericLiteral | TokenKind::HexLiteral => (LiteralKind::Number, lexeme.into()),
            TokenKind::KeywordTrue | TokenKind::KeywordFalse => {
                (LiteralKind::Boolean, lexeme.into())
            }
            TokenKind::StringLiteral => {
                let value = unescape_string_literal(lexeme).map_err(|kind| {
                    ParserError::from(LexicalError {
                        kind,
                        span: token.span,
                    })
                })?;
                (LiteralKind::String, value)
            }
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::NonExpression(kind),
                    span: token.span,
                })
            }
        };
        let span = match self.skip_type_annotation()? {
            Some(ty) => token.span.merge(&ty),
            None => token.span,
        };
        Ok(Literal { kind, value, span })
    }

    fn parse_call(&mut self, name: Ident) -> Result<ExpressionRef, ParserError> {
        self.expect(TokenKind::LeftParenthesis)?;
        let mut arguments = Vec::new();
        let close = match self.eat_if(TokenKind::RightParenthesis)? {
            Some(close) => close,
            None => {
                loop {
                    arguments.push(self.parse_expression()?);
                    if self.eat_if(TokenKind::Comma)?.is_none() {
                        break;
                    }
                }
                self.expect(TokenKind::RightParenthesis)?
            }
        };
        let span = name.span.merge(&close.span);
        let expr = if Instruction::from_name(&name.name).is_some() {
            Expression::Instruction(InstructionCall {
                instruction: name,
                arguments,
                span,
            })
        } else {
            Expression::FunctionCall(FunctionCall {
                function: name,
                arguments,
                span,
            })
        };
        Ok(self.program.push_expression(expr))
    }
}

// Statements
impl<'src> Parser<'src> {
    /// Parses a whole program. A program is either a single block or a
    /// sequence of statements that gets wrapped into an implicit root block.
    pub fn parse(mut self) -> Result<Program, ParserError> {
        let mut statements = Vec::new();
        let end = loop {
            let next = self.peek()?;
            if next.kind == TokenKind::Eof {
                break next.span;
            }
            statements.push(self.parse_statement()?);
        };

        let root = match statements.as_slice() {
            [Statement::Block(block)] => *block,
            _ => self.program.push_block(Block {
                statements,
                span: Span::new(0, end.end().to_usize()),
            }),
        };
        Ok(self.program.finish(root))
    }

    pub fn parse_block(&mut self) -> Result<BlockRef, ParserError> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let mut statements = Vec::new();
        let close = loop {
            if let Some(close) = self.eat_if(TokenKind::RightBrace)? {
                break close;
            }
            statements.push(self.parse_statement()?);
        };
        Ok(self.program.push_block(Block {
            statements,
            span: open.span.merge(&close.span),
        }))
    }

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        let first = self.peek()?;
        match first.kind {
            TokenKind::LeftBrace => Ok(Statement::Block(self.parse_block()?)),
            TokenKind::KeywordFunction => self.parse_function_definition(),
            TokenKind::KeywordLet => self.parse_variable_declaration(),
            TokenKind::KeywordIf => {
                let keyword = self.next_token()?;
                let condition = self.parse_expression()?;
                let body = self.parse_block()?;
                Ok(Statement::If(IfStatement {
                    condition,
                    body,
                    span: keyword.span.merge(&self.block_span(body)),
                }))
            }
            TokenKind::KeywordSwitch => self.parse_switch(),
            TokenKind::KeywordFor => {
                let keyword = self.next_token()?;
                let pre = self.parse_block()?;
                let condition = self.parse_expression()?;
                let post = self.parse_block()?;
                let body = self.parse_block()?;
                Ok(Statement::For(ForStatement {
                    pre,
                    condition,
                    post,
                    body,
                    span: keyword.span.merge(&self.block_span(body)),
                }))
            }
            TokenKind::Ident => {
                let token = self.next_token()?;
                let ident = self.ident(&token);
                let next = self.peek()?;
                match next.kind {
                    TokenKind::LeftParenthesis => {
                        let expr = self.parse_call(ident)?;
                        Ok(Statement::Expression(ExpressionStatement {
                            expr,
                            span: self.expression_span(expr),
                        }))
                    }
                    TokenKind::Comma | TokenKind::ColonEqual => {
                        let mut targets = vec![ident];
                        while self.eat_if(TokenKind::Comma)?.is_some() {
                            targets.push(self.expect_ident()?);
                        }
                        self.expect(TokenKind::ColonEqual)?;
                        let value = self.parse_expression()?;
                        Ok(Statement::Assignment(Assignment {
                            span: token.span.merge(&self.expression_span(value)),
                            targets,
                            value,
                        }))
                    }
                    TokenKind::Eof => Err(ParserError {
                        kind: ParserErrorKind::UnexpectedEof,
                        span: next.span,
                    }),
                    kind => Err(ParserError {
                        kind: ParserErrorKind::InvalidStatement(kind),
                        span: next.span,
                    }),
                }
            }
            kind => Err(ParserError {
                kind: ParserErrorKind::InvalidStatement(kind),
                span: first.span,
            }),
        }
    }

    fn parse_variable_declaration(&mut self) -> Result<Statement, ParserError> {
        let keyword = self.expect(TokenKind::KeywordLet)?;
        let names = self.parse_typed_ident_list()?;
        let value = match self.eat_if(TokenKind::ColonEqual)? {
            Some(_) => Some(self.parse_expression()?),
            None => None,
        };
        let end = match value {
            Some(value) => self.expression_span(value),
            None => names.last().map(|name| name.span).unwrap_or(keyword.span),
        };
        Ok(Statement::VariableDeclaration(VariableDeclaration {
            names,
            value,
            span: keyword.span.merge(&end),
        }))
    }

    fn parse_function_definition(&mut self) -> Result<Statement, ParserError> {
        let keyword = self.expect(TokenKind::KeywordFunction)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LeftParenthesis)?;
        let parameters = match self.peek()?.kind {
            TokenKind::RightParenthesis => Vec::new(),
            _ => self.parse_typed_ident_list()?,
        };
        self.expect(TokenKind::RightParenthesis)?;
        let returns = match self.eat_if(TokenKind::Arrow)? {
            Some(_) => self.parse_typed_ident_list()?,
            None => Vec::new(),
        };
        let body = self.parse_block()?;
        let function = self.program.push_function(FunctionDefinition {
            name,
            parameters,
            returns,
            body,
            span: keyword.span.merge(&self.block_span(body)),
        });
        Ok(Statement::FunctionDefinition(function))
    }

    fn parse_switch(&mut self) -> Result<Statement, ParserError> {
        let keyword = self.expect(TokenKind::KeywordSwitch)?;
        let scrutinee = self.parse_expression()?;
        let mut cases: Vec<SwitchCase> = Vec::new();
        loop {
            let next = self.peek()?;
            let guard = match next.kind {
                TokenKind::KeywordCase | TokenKind::KeywordDefault
                    if cases.last().is_some_and(|case| case.guard.is_none()) =>
                {
                    return Err(ParserError {
                        kind: ParserErrorKind::DefaultNotLast,
                        span: next.span,
                    });
                }
                TokenKind::KeywordCase => {
                    let _ = self.next_token()?;
                    let value = self.next_token()?;
                    if !value.kind.is_literal() {
                        return Err(ParserError {
                            kind: ParserErrorKind::NonLiteralCase(value.kind),
                            span: value.span,
                        });
                    }
                    let literal = self.parse_literal(&value)?;
                    Some(self.program.push_expression(Expression::Literal(literal)))
                }
                TokenKind::KeywordDefault => {
                    let _ = self.next_token()?;
                    None
                }
                _ => break,
            };
            let body = self.parse_block()?;
            cases.push(SwitchCase {
                guard,
                body,
                span: next.span.merge(&self.block_span(body)),
            });
        }

        let Some(last) = cases.last() else {
            return Err(ParserError {
                kind: ParserErrorKind::EmptySwitch,
                span: keyword.span.merge(&self.expression_span(scrutinee)),
            });
        };
        let span = keyword.span.merge(&last.span);
        Ok(Statement::Switch(SwitchStatement {
            scrutinee,
            cases,
            span,
        }))
    }
}
