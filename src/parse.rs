use std::ops::RangeInclusive;

use tracing::trace;

use crate::error::{CalcError, PartialComp};
use crate::token::*;
use crate::value::Value;

/// How deep parentheses, argument lists, unary signs and `**` chains may
/// nest before an expression is refused.
pub const MAX_DEPTH: usize = 256;

#[derive(Clone, Debug)]
pub struct IntermediateResult {
    value: Value,
    tokens_read: usize,
}

impl IntermediateResult {
    pub fn new(value: Value, tokens_read: usize) -> Self {
        IntermediateResult { value, tokens_read }
    }
}

/// Represents an environment for evaluating a mathematical expression
pub trait Environment {
    /// Look up how many arguments a function accepts:
    /// - Every name is a function; there are no variables
    /// - If a symbol is not defined, return None
    fn arity(&self, atom: &str) -> Option<RangeInclusive<usize>>;

    /// Resolve a function call given its name and evaluated arguments
    /// Precondition: `self.arity(atom)` contains `args.len()`
    fn resolve(&mut self, atom: &str, args: &[Value]) -> Result<Value, CalcError>;
}

// Addition and subtraction
fn e_expr<E>(
    token_list: &[Token],
    env: &mut E,
    depth: usize,
) -> Result<IntermediateResult, CalcError>
where
    E: Environment,
{
    let mut t1 = t_expr(token_list, env, depth)?;
    let mut index = t1.tokens_read;

    while index < token_list.len() {
        match token_list[index] {
            Token::Plus => {
                let t2 = t_expr(&token_list[index + 1..], env, depth)?;
                t1.value = (t1.value + t2.value)?;
                t1.tokens_read += t2.tokens_read + 1;
            }
            Token::Minus => {
                let t2 = t_expr(&token_list[index + 1..], env, depth)?;
                t1.value = (t1.value - t2.value)?;
                t1.tokens_read += t2.tokens_read + 1;
            }
            Token::Number(ref n) => {
                return Err(CalcError::UnexpectedToken(n.to_string(), "operator"));
            }
            _ => break,
        };
        index = t1.tokens_read;
    }
    Ok(t1)
}

// Multiplication, division and modulo
fn t_expr<E>(
    token_list: &[Token],
    env: &mut E,
    depth: usize,
) -> Result<IntermediateResult, CalcError>
where
    E: Environment,
{
    let mut u1 = u_expr(token_list, env, depth)?;
    let mut index = u1.tokens_read;

    while index < token_list.len() {
        match token_list[index] {
            Token::Multiply => {
                let u2 = u_expr(&token_list[index + 1..], env, depth)?;
                u1.value = (u1.value * u2.value)?;
                u1.tokens_read += u2.tokens_read + 1;
            }
            Token::Divide => {
                let u2 = u_expr(&token_list[index + 1..], env, depth)?;
                u1.value = (u1.value / u2.value)?;
                u1.tokens_read += u2.tokens_read + 1;
            }
            Token::FloorDivide => {
                let u2 = u_expr(&token_list[index + 1..], env, depth)?;
                u1.value = u1.value.floor_div(u2.value)?;
                u1.tokens_read += u2.tokens_read + 1;
            }
            Token::Modulo => {
                let u2 = u_expr(&token_list[index + 1..], env, depth)?;
                u1.value = (u1.value % u2.value)?;
                u1.tokens_read += u2.tokens_read + 1;
            }
            Token::Number(ref n) => {
                return Err(CalcError::UnexpectedToken(n.to_string(), "operator"));
            }
            _ => break,
        }
        index = u1.tokens_read;
    }
    Ok(u1)
}

// Unary signs, which bind looser than exponentiation: -2**2 == -4
fn u_expr<E>(
    token_list: &[Token],
    env: &mut E,
    depth: usize,
) -> Result<IntermediateResult, CalcError>
where
    E: Environment,
{
    if depth > MAX_DEPTH {
        return Err(CalcError::TooDeeplyNested);
    }
    match token_list.first() {
        Some(Token::Minus) => {
            let mut ir = u_expr(&token_list[1..], env, depth + 1)?;
            ir.value = -ir.value;
            ir.tokens_read += 1;
            Ok(ir)
        }
        Some(Token::Plus) => {
            let mut ir = u_expr(&token_list[1..], env, depth + 1)?;
            ir.tokens_read += 1;
            Ok(ir)
        }
        _ => f_expr(token_list, env, depth),
    }
}

// Exponentiation, right associative through the unary level
fn f_expr<E>(
    token_list: &[Token],
    env: &mut E,
    depth: usize,
) -> Result<IntermediateResult, CalcError>
where
    E: Environment,
{
    let mut g1 = g_expr(token_list, env, depth)?;
    let index = g1.tokens_read;
    match token_list.get(index) {
        Some(Token::Exponent) => {
            let u = u_expr(&token_list[index + 1..], env, depth + 1)?;
            g1.value = g1.value.pow(u.value)?;
            g1.tokens_read += u.tokens_read + 1;
        }
        Some(Token::Number(n)) => {
            return Err(CalcError::UnexpectedToken(n.to_string(), "operator"));
        }
        _ => (),
    }
    Ok(g1)
}

// Numbers, parenthesized expressions, and function calls
fn g_expr<E>(
    token_list: &[Token],
    env: &mut E,
    depth: usize,
) -> Result<IntermediateResult, CalcError>
where
    E: Environment,
{
    if token_list.is_empty() {
        return Err(CalcError::UnexpectedEndOfInput);
    }
    match token_list[0] {
        Token::Number(ref n) => Ok(IntermediateResult::new(n.clone(), 1)),
        Token::Atom(ref s) => {
            let arity = env
                .arity(s)
                .ok_or_else(|| CalcError::UnknownAtom(s.clone()))?;
            if token_list.get(1) != Some(&Token::OpenParen) {
                return Err(CalcError::NoFunctionArgument(s.clone()));
            }
            let (args, read) = arguments(&token_list[2..], env, depth + 1)?;
            if !arity.contains(&args.len()) {
                return Err(CalcError::BadArity(s.clone(), args.len()));
            }
            let value = env.resolve(s, &args)?;
            trace!("{}({} args) = {}", s, args.len(), value);
            Ok(IntermediateResult::new(value, read + 2))
        }
        Token::OpenParen => {
            let ir = e_expr(&token_list[1..], env, depth + 1)?;
            let close_paren = ir.tokens_read + 1;
            if close_paren < token_list.len() {
                match token_list[close_paren] {
                    Token::CloseParen => Ok(IntermediateResult::new(ir.value, close_paren + 1)),
                    _ => Err(CalcError::UnexpectedToken(
                        token_list[close_paren].to_string(),
                        ")",
                    )),
                }
            } else {
                Err(CalcError::UnmatchedParenthesis)
            }
        }
        _ => Err(CalcError::UnexpectedToken(
            token_list[0].to_string(),
            "number",
        )),
    }
}

/// Parse a comma separated argument list up to and including the closing
/// parenthesis. Returns the values and the number of tokens consumed.
fn arguments<E>(
    token_list: &[Token],
    env: &mut E,
    depth: usize,
) -> Result<(Vec<Value>, usize), CalcError>
where
    E: Environment,
{
    let mut args = Vec::new();
    if token_list.first() == Some(&Token::CloseParen) {
        return Ok((args, 1));
    }
    let mut index = 0;
    loop {
        let ir = e_expr(&token_list[index..], env, depth)?;
        index += ir.tokens_read;
        args.push(ir.value);
        match token_list.get(index) {
            Some(Token::Comma) => index += 1,
            Some(Token::CloseParen) => return Ok((args, index + 1)),
            Some(token) => return Err(CalcError::UnexpectedToken(token.to_string(), ")")),
            None => return Err(CalcError::UnmatchedParenthesis),
        }
    }
}

/// The only names an expression may use: `abs`, `log10`, `log` (natural,
/// with an optional base) and `exp`.
pub struct DefaultEnvironment;

impl Environment for DefaultEnvironment {
    fn arity(&self, atom: &str) -> Option<RangeInclusive<usize>> {
        match atom {
            "abs" | "log10" | "exp" => Some(1..=1),
            "log" => Some(1..=2),
            _ => None,
        }
    }

    fn resolve(&mut self, atom: &str, args: &[Value]) -> Result<Value, CalcError> {
        match (atom, args) {
            ("abs", [x]) => Ok(x.clone().abs()),
            ("log10", [x]) => Ok(Value::Float(x.log10()?)),
            ("log", [x]) => Ok(Value::Float(x.ln()?)),
            ("log", [x, base]) => {
                let numerator = x.ln()?;
                let denominator = base.ln()?;
                if denominator == 0.0 {
                    return Err(CalcError::DivideByZero);
                }
                Ok(Value::Float(numerator / denominator))
            }
            ("exp", [x]) => {
                let result = x.as_float()?.exp();
                if result.is_infinite() {
                    Err(CalcError::WouldOverflow(PartialComp::unary(atom, x)))
                } else {
                    Ok(Value::Float(result))
                }
            }
            _ => Err(CalcError::UnknownAtom(atom.to_owned())),
        }
    }
}

pub fn parse<E>(tokens: &[Token], env: &mut E) -> Result<Value, CalcError>
where
    E: Environment,
{
    let answer = e_expr(tokens, env, 0)?;
    match tokens.get(answer.tokens_read) {
        None => Ok(answer.value),
        Some(Token::CloseParen) => Err(CalcError::UnmatchedParenthesis),
        Some(token) => Err(CalcError::UnexpectedToken(token.to_string(), "operator")),
    }
}
