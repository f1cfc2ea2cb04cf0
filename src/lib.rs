#![cfg_attr(all(test, feature = "unstable"), feature(test))]

#[cfg(all(test, feature = "unstable"))]
extern crate test;

#[cfg(all(test, feature = "unstable"))]
mod bench;


mod error;
pub mod keypad;
mod ops;
mod parse;
mod session;
mod token;
mod value;

pub use error::{CalcError, OperationError, PartialComp};
pub use keypad::{Action, Key};
pub use ops::{Function, MAX_FACTORIAL};
pub use parse::{DefaultEnvironment, Environment};
pub use session::{HistoryEntry, Session, Surface};
pub use value::Value;

/// Evaluate an arithmetic expression over `abs`, `log10`, `log` and `exp`.
pub fn eval(input: &str) -> Result<Value, CalcError> {
    let mut env = parse::DefaultEnvironment;
    token::tokenize(input).and_then(|x| parse::parse(&x, &mut env))
}

pub fn eval_with_env<E>(input: &str, env: &mut E) -> Result<Value, CalcError>
where
    E: parse::Environment,
{
    token::tokenize(input).and_then(|x| parse::parse(&x, env))
}
