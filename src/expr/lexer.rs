/*
 * Copyright (c) Radzivon Bartoshyk, 10/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Int(i64),
    True,
    False,
    String(String),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Not,
    LParen,
    RParen,
    Comma,
    Eof,
}

/// Identifiers may contain dots and brackets so that dotted/indexed template
/// paths like `planes[0].line_stride` lex as a single atomic token.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']')
}

pub struct Lexer<'a> {
    src: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Lexer {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let (start, c) = match self.chars.next() {
                Some(pair) => pair,
                None => {
                    tokens.push(Token::Eof);
                    return Ok(tokens);
                }
            };
            let tok = match c {
                '+' => Token::Plus,
                '-' => Token::Minus,
                '/' => Token::Slash,
                '%' => Token::Percent,
                '(' => Token::LParen,
                ')' => Token::RParen,
                ',' => Token::Comma,
                '*' => {
                    if self.peek_char() == Some('*') {
                        self.chars.next();
                        Token::StarStar
                    } else {
                        Token::Star
                    }
                }
                '=' => {
                    if self.peek_char() == Some('=') {
                        self.chars.next();
                        Token::Eq
                    } else {
                        return Err(ParseError::UnexpectedChar('=', start));
                    }
                }
                '!' => {
                    if self.peek_char() == Some('=') {
                        self.chars.next();
                        Token::Ne
                    } else {
                        Token::Not
                    }
                }
                '<' => {
                    if self.peek_char() == Some('=') {
                        self.chars.next();
                        Token::Le
                    } else {
                        Token::Lt
                    }
                }
                '>' => {
                    if self.peek_char() == Some('=') {
                        self.chars.next();
                        Token::Ge
                    } else {
                        Token::Gt
                    }
                }
                '&' => {
                    if self.peek_char() == Some('&') {
                        self.chars.next();
                        Token::AndAnd
                    } else {
                        return Err(ParseError::UnexpectedChar('&', start));
                    }
                }
                '|' => {
                    if self.peek_char() == Some('|') {
                        self.chars.next();
                        Token::OrOr
                    } else {
                        return Err(ParseError::UnexpectedChar('|', start));
                    }
                }
                '"' => self.lex_string(start)?,
                c if c.is_ascii_digit() => self.lex_int(start),
                c if is_ident_start(c) => self.lex_ident(start),
                c => return Err(ParseError::UnexpectedChar(c, start)),
            };
            tokens.push(tok);
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.chars.next();
        }
    }

    fn lex_int(&mut self, start: usize) -> Token {
        let mut end = start + 1;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                end += c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.src[start..end];
        Token::Int(text.parse().expect("digit-only slice must parse"))
    }

    fn lex_ident(&mut self, start: usize) -> Token {
        let mut end = start + 1;
        while let Some(c) = self.peek_char() {
            if is_ident_continue(c) {
                end += c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        match &self.src[start..end] {
            "true" => Token::True,
            "false" => Token::False,
            ident => Token::Ident(ident.to_string()),
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, ParseError> {
        let mut s = String::new();
        loop {
            match self.chars.next() {
                Some((_, '"')) => return Ok(Token::String(s)),
                Some((_, c)) => s.push(c),
                None => return Err(ParseError::UnexpectedChar('"', start)),
            }
        }
    }
}
