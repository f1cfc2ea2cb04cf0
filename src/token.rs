use std::fmt;
use std::iter::Peekable;

use num::{BigInt, Num};

use crate::error::CalcError;
use crate::error::CalcError::*;
use crate::value::Value;

/// Tokens used for parsing an arithmetic expression
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Plus,
    Minus,
    Divide,
    FloorDivide,
    Multiply,
    Exponent,
    Modulo,
    OpenParen,
    CloseParen,
    Comma,
    Number(Value),
    Atom(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Token::Plus => write!(f, "Plus"),
            Token::Minus => write!(f, "Minus"),
            Token::Divide => write!(f, "Divide"),
            Token::FloorDivide => write!(f, "FloorDivide"),
            Token::Multiply => write!(f, "Multiply"),
            Token::Exponent => write!(f, "Exponent"),
            Token::Modulo => write!(f, "Modulo"),
            Token::OpenParen => write!(f, "OpenParen"),
            Token::CloseParen => write!(f, "CloseParen"),
            Token::Comma => write!(f, "Comma"),
            Token::Number(ref n) => write!(f, "'{}'", n),
            Token::Atom(ref s) => write!(f, "'{}'", s),
        }
    }
}

enum OperatorState {
    PotentiallyIncomplete,
    Complete,
    NotAnOperator,
}

trait IsOperator {
    fn is_operator(self) -> bool;
}

impl IsOperator for char {
    fn is_operator(self) -> bool {
        match self {
            '+' | '-' | '/' | '*' | '%' | '(' | ')' | ',' => true,
            _ => false,
        }
    }
}

trait CheckOperator {
    fn check_operator(self) -> OperatorState;
}

impl CheckOperator for char {
    fn check_operator(self) -> OperatorState {
        match self {
            '+' | '-' | '%' | '(' | ')' | ',' => OperatorState::Complete,
            '*' | '/' => OperatorState::PotentiallyIncomplete,
            _ => OperatorState::NotAnOperator,
        }
    }
}

trait OperatorMatch {
    fn operator_type(self) -> Option<Token>;
}

impl OperatorMatch for [char; 2] {
    fn operator_type(self) -> Option<Token> {
        match self {
            ['*', '*'] => Some(Token::Exponent),
            ['/', '/'] => Some(Token::FloorDivide),
            _ => None,
        }
    }
}

impl OperatorMatch for char {
    fn operator_type(self) -> Option<Token> {
        match self {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '/' => Some(Token::Divide),
            '*' => Some(Token::Multiply),
            '%' => Some(Token::Modulo),
            '(' => Some(Token::OpenParen),
            ')' => Some(Token::CloseParen),
            ',' => Some(Token::Comma),
            _ => None,
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_alphabetic() || c == '_' {
            tokens.push(Token::Atom(consume_atom(&mut chars)));
        } else if c.is_ascii_digit() || c == '.' {
            tokens.push(consume_number(&mut chars)?);
        } else {
            match c.check_operator() {
                OperatorState::Complete => {
                    tokens.push(c.operator_type().ok_or(InvalidOperator(c))?);
                    chars.next();
                }
                OperatorState::PotentiallyIncomplete => {
                    chars.next();
                    let pair = chars.peek().and_then(|&next| [c, next].operator_type());
                    match pair {
                        Some(token) => {
                            tokens.push(token);
                            chars.next();
                        }
                        None => tokens.push(c.operator_type().ok_or(InvalidOperator(c))?),
                    }
                }
                OperatorState::NotAnOperator => {
                    if c.is_whitespace() {
                        chars.next();
                    } else {
                        let token_string = consume_until_new_token(&mut chars);
                        return Err(CalcError::UnrecognizedToken(token_string));
                    }
                }
            }
        }
    }
    Ok(tokens)
}

fn digits<I>(input: &mut Peekable<I>, radix: u32) -> String
where
    I: Iterator<Item = char>,
{
    let mut number = String::new();
    while let Some(&c) = input.peek() {
        if c.is_digit(radix) {
            number.push(c);
        } else {
            break;
        }
        input.next();
    }
    number
}

/// Consume a numeric literal:
/// - `0x`, `0o` and `0b` prefixed integers
/// - decimal integers, which may not carry leading zeros
/// - decimals with an optional whole or fractional part and an optional
///   exponent (`1.`, `.5`, `2.5e-3`)
fn consume_number<I>(input: &mut Peekable<I>) -> Result<Token, CalcError>
where
    I: Iterator<Item = char>,
{
    let whole = digits(input, 10);
    if whole == "0" {
        let radix = match input.peek() {
            Some(&'x') | Some(&'X') => Some(16),
            Some(&'o') | Some(&'O') => Some(8),
            Some(&'b') | Some(&'B') => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            input.next();
            let digits = digits(input, radix);
            let num = BigInt::from_str_radix(&digits, radix)?;
            return Ok(Token::Number(Value::Int(num)));
        }
    }

    let mut literal = whole;
    let mut is_float = false;
    if let Some(&'.') = input.peek() {
        input.next();
        literal.push('.');
        literal.push_str(&digits(input, 10));
        is_float = true;
    }
    if literal == "." {
        return Err(InvalidNumber(literal));
    }
    if let Some(&e) = input.peek() {
        if e == 'e' || e == 'E' {
            input.next();
            literal.push('e');
            if let Some(&sign) = input.peek() {
                if sign == '+' || sign == '-' {
                    input.next();
                    literal.push(sign);
                }
            }
            let exponent = digits(input, 10);
            if exponent.is_empty() {
                return Err(InvalidNumber(literal));
            }
            literal.push_str(&exponent);
            is_float = true;
        }
    }

    if is_float {
        Ok(Token::Number(Value::Float(literal.parse()?)))
    } else if literal.starts_with('0') && literal.chars().any(|c| c != '0') {
        Err(InvalidNumber(literal))
    } else {
        Ok(Token::Number(Value::Int(literal.parse()?)))
    }
}

/// Consume a valid atom. An atom is defined by:
/// - Starting with an alphabetic character or an underscore
/// - Consisting of alphanumeric characters or underscores
fn consume_atom<I: Iterator<Item = char>>(input: &mut Peekable<I>) -> String {
    let mut atom = String::new();
    while let Some(&c) = input.peek() {
        if c.is_alphanumeric() || c == '_' {
            atom.push(c);
            input.next();
        } else {
            break;
        }
    }
    atom
}

fn consume_until_new_token<I: Iterator<Item = char>>(input: &mut I) -> String {
    input
        .take_while(|c| !(c.is_whitespace() || c.is_operator() || c.is_digit(10)))
        .collect()
}
