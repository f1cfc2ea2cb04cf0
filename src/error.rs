use std::error::Error;
use std::fmt;

use std::num::{ParseFloatError, ParseIntError};

use num::bigint::ParseBigIntError;

use crate::ops::Function;

/// Represents a partial computation that can be captured as part of an
/// error message.
#[derive(Debug, PartialEq)]
pub enum PartialComp {
    Unary { op: String, arg: String },
    Binary { op: String, lhs: String, rhs: String },
}

impl PartialComp {
    pub fn unary<T, U>(op: T, arg: U) -> Self
    where
        T: ToString,
        U: ToString,
    {
        PartialComp::Unary {
            op: op.to_string(),
            arg: arg.to_string(),
        }
    }

    pub fn binary<T, U, V>(op: T, lhs: U, rhs: V) -> Self
    where
        T: ToString,
        U: ToString,
        V: ToString,
    {
        PartialComp::Binary {
            op: op.to_string(),
            lhs: lhs.to_string(),
            rhs: rhs.to_string(),
        }
    }
}

impl fmt::Display for PartialComp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PartialComp::Unary { ref op, ref arg } => write!(f, "{}({})", op, arg),
            PartialComp::Binary {
                ref op,
                ref lhs,
                ref rhs,
            } => write!(f, "{} {} {}", lhs, op, rhs),
        }
    }
}

/// Everything that can go wrong while tokenizing, parsing or evaluating an
/// expression. `DivideByZero` is the only variant a caller needs to tell
/// apart; all others mean the text is not a valid expression.
#[derive(Debug, PartialEq)]
pub enum CalcError {
    BadArity(String, usize),
    BadTypes(PartialComp),
    DivideByZero,
    DomainError(PartialComp),
    IntTooLarge,
    InvalidNumber(String),
    InvalidOperator(char),
    UnrecognizedToken(String),
    UnexpectedToken(String, &'static str),
    UnknownAtom(String),
    UnexpectedEndOfInput,
    UnmatchedParenthesis,
    TooDeeplyNested,
    WouldOverflow(PartialComp),
    NoFunctionArgument(String),
}

use self::CalcError::*;

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            BadArity(ref name, given) => {
                write!(f, "function '{}' does not take {} arguments", name, given)
            }
            BadTypes(ref comp) => write!(f, "expression '{}' has no real result", comp),
            DivideByZero => write!(f, "attempted to divide by zero"),
            DomainError(ref comp) => write!(f, "math domain error in '{}'", comp),
            IntTooLarge => write!(f, "integer too large to convert to float"),
            InvalidNumber(ref number) => write!(f, "invalid number: {}", number),
            InvalidOperator(ref c) => write!(f, "invalid operator: {}", c),
            UnrecognizedToken(ref token) => write!(f, "unrecognized token: {}", token),
            UnexpectedToken(ref token, ref kind) => {
                write!(f, "expected {} token, got {} instead", kind, token)
            }
            UnknownAtom(ref atom) => write!(f, "unknown variable or function '{}'", atom),
            WouldOverflow(ref comp) => write!(f, "expression '{}' would overflow", comp),
            UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            UnmatchedParenthesis => write!(f, "unmatched parenthesis"),
            TooDeeplyNested => write!(f, "expression is nested too deeply"),
            NoFunctionArgument(ref name) => {
                write!(f, "no bracketed argument for function '{}'", name)
            }
        }
    }
}

impl Error for CalcError {}

impl From<ParseFloatError> for CalcError {
    fn from(data: ParseFloatError) -> CalcError {
        CalcError::InvalidNumber(data.to_string())
    }
}

impl From<ParseIntError> for CalcError {
    fn from(data: ParseIntError) -> CalcError {
        CalcError::InvalidNumber(data.to_string())
    }
}

impl From<ParseBigIntError> for CalcError {
    fn from(data: ParseBigIntError) -> CalcError {
        CalcError::InvalidNumber(data.to_string())
    }
}

/// A failed button or key handler. The `Display` form is the message shown
/// to the user before the expression buffer is reset.
#[derive(Debug, PartialEq)]
pub enum OperationError {
    /// `=` could not evaluate the buffer.
    Evaluation(CalcError),
    /// A function handler whose buffer was not evaluable (only `%`).
    InvalidExpression(Function, CalcError),
    /// A function handler whose buffer did not parse as a number.
    InvalidInput(Function),
    NegativeFactorial,
    FactorialTooLarge,
    NegativeSquareRoot,
    UndefinedCotangent,
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OperationError::Evaluation(DivideByZero) => write!(f, "Cannot divide by zero"),
            OperationError::Evaluation(ref err) => write!(f, "Invalid expression: {}", err),
            OperationError::InvalidExpression(function, _) => {
                write!(f, "Invalid expression for {}", function)
            }
            OperationError::InvalidInput(function) => write!(f, "Invalid input for {}", function),
            OperationError::NegativeFactorial => {
                write!(f, "Factorial not defined for negative numbers")
            }
            OperationError::FactorialTooLarge => write!(f, "Number too large for factorial"),
            OperationError::NegativeSquareRoot => {
                write!(f, "Cannot calculate square root of negative number")
            }
            OperationError::UndefinedCotangent => {
                write!(f, "Cotangent undefined at multiples of 180°")
            }
        }
    }
}

impl Error for OperationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            OperationError::Evaluation(ref err) | OperationError::InvalidExpression(_, ref err) => {
                Some(err)
            }
            _ => None,
        }
    }
}

impl From<CalcError> for OperationError {
    fn from(data: CalcError) -> OperationError {
        OperationError::Evaluation(data)
    }
}
