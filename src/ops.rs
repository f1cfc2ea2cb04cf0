//! Single-purpose handlers behind the scientific buttons. Each one reads the
//! whole expression buffer, applies exactly one transformation and returns
//! the new buffer text.

use std::fmt;

use num::{BigUint, One};

use crate::error::OperationError;
use crate::value::Value;

/// Largest argument accepted by the factorial button.
pub const MAX_FACTORIAL: u32 = 170;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Factorial,
    Sine,
    Cosine,
    Tangent,
    Cotangent,
    SquareRoot,
    CubeRoot,
    Percent,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Function::Factorial => "factorial",
            Function::Sine => "sine",
            Function::Cosine => "cosine",
            Function::Tangent => "tangent",
            Function::Cotangent => "cotangent",
            Function::SquareRoot => "square root",
            Function::CubeRoot => "cube root",
            Function::Percent => "percentage",
        };
        write!(f, "{}", name)
    }
}

impl Function {
    /// Transform the buffer contents, returning the replacement text.
    pub fn apply(self, input: &str) -> Result<String, OperationError> {
        match self {
            Function::Factorial => factorial(input),
            Function::Sine => degrees(self, input, f64::sin),
            Function::Cosine => degrees(self, input, f64::cos),
            Function::Tangent => degrees(self, input, f64::tan),
            Function::Cotangent => cotangent(input),
            Function::SquareRoot => square_root(input),
            Function::CubeRoot => cube_root(input),
            Function::Percent => percent(input),
        }
    }
}

/// Toggle a leading minus sign. An empty buffer stays empty.
pub fn flip_sign(input: &str) -> String {
    if input.is_empty() {
        String::new()
    } else if let Some(rest) = input.strip_prefix('-') {
        rest.to_owned()
    } else {
        format!("-{}", input)
    }
}

/// The buffer read as a bare number, without evaluating it.
fn number(function: Function, input: &str) -> Result<f64, OperationError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or(OperationError::InvalidInput(function))
}

fn float(x: f64) -> String {
    Value::Float(x).to_string()
}

fn factorial(input: &str) -> Result<String, OperationError> {
    let n = number(Function::Factorial, input)?.trunc();
    if n < 0.0 {
        return Err(OperationError::NegativeFactorial);
    }
    if n > f64::from(MAX_FACTORIAL) {
        return Err(OperationError::FactorialTooLarge);
    }
    let product = (2..=n as u32).fold(BigUint::one(), |acc, k| acc * k);
    Ok(product.to_string())
}

fn degrees(function: Function, input: &str, f: fn(f64) -> f64) -> Result<String, OperationError> {
    let angle = number(function, input)?;
    Ok(float(f(angle.to_radians())))
}

fn cotangent(input: &str) -> Result<String, OperationError> {
    let angle = number(Function::Cotangent, input)?;
    if angle % 180.0 == 0.0 {
        return Err(OperationError::UndefinedCotangent);
    }
    Ok(float(1.0 / angle.to_radians().tan()))
}

fn square_root(input: &str) -> Result<String, OperationError> {
    let x = number(Function::SquareRoot, input)?;
    if x < 0.0 {
        return Err(OperationError::NegativeSquareRoot);
    }
    Ok(float(x.sqrt()))
}

/// Real cube root through the power formula, mirrored for negative input.
/// Deliberately not `f64::cbrt`: `27` gives `3.0000000000000004`.
fn cube_root(input: &str) -> Result<String, OperationError> {
    let x = number(Function::CubeRoot, input)?;
    let root = if x >= 0.0 {
        x.powf(1.0 / 3.0)
    } else {
        -(-x).powf(1.0 / 3.0)
    };
    Ok(float(root))
}

fn percent(input: &str) -> Result<String, OperationError> {
    let hundredth = crate::eval(input).and_then(|value| value / Value::from(100));
    hundredth
        .map(|value| value.to_string())
        .map_err(|err| OperationError::InvalidExpression(Function::Percent, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(text: &str, expected: f64) -> bool {
        text.parse::<f64>()
            .map(|x| (x - expected).abs() < 1e-12)
            .unwrap_or(false)
    }

    #[test]
    fn factorial_domain() {
        assert_eq!(Function::Factorial.apply("5"), Ok("120".to_owned()));
        assert_eq!(Function::Factorial.apply("0"), Ok("1".to_owned()));
        assert_eq!(Function::Factorial.apply("5.9"), Ok("120".to_owned()));
        assert_eq!(
            Function::Factorial.apply("-1"),
            Err(OperationError::NegativeFactorial)
        );
        assert_eq!(
            Function::Factorial.apply("171"),
            Err(OperationError::FactorialTooLarge)
        );
        assert_eq!(
            Function::Factorial.apply("2+3"),
            Err(OperationError::InvalidInput(Function::Factorial))
        );
    }

    #[test]
    fn factorial_is_exact() {
        let text = Function::Factorial.apply("170").unwrap();
        assert_eq!(text.len(), 307);
        assert!(text.starts_with("7257415615307998967"));
        assert!(text.ends_with("0000000000"));
    }

    #[test]
    fn trigonometry_in_degrees() {
        assert!(close(&Function::Sine.apply("30").unwrap(), 0.5));
        assert!(close(&Function::Cosine.apply("60").unwrap(), 0.5));
        assert!(close(&Function::Tangent.apply("45").unwrap(), 1.0));
        assert!(close(&Function::Cotangent.apply("45").unwrap(), 1.0));
        assert_eq!(Function::Sine.apply("0"), Ok("0.0".to_owned()));
        assert_eq!(
            Function::Cosine.apply("abc"),
            Err(OperationError::InvalidInput(Function::Cosine))
        );
    }

    #[test]
    fn cotangent_multiples_of_half_turn() {
        for input in &["0", "180", "-360", "540.0"] {
            assert_eq!(
                Function::Cotangent.apply(input),
                Err(OperationError::UndefinedCotangent)
            );
        }
    }

    #[test]
    fn roots() {
        assert_eq!(Function::SquareRoot.apply("9"), Ok("3.0".to_owned()));
        assert_eq!(
            Function::SquareRoot.apply("-4"),
            Err(OperationError::NegativeSquareRoot)
        );
        assert_eq!(Function::CubeRoot.apply("-8"), Ok("-2.0".to_owned()));
        assert_eq!(Function::CubeRoot.apply("8"), Ok("2.0".to_owned()));
        assert!(close(&Function::CubeRoot.apply("-2").unwrap(), -1.2599210498948732));
        assert_eq!(
            Function::CubeRoot.apply(""),
            Err(OperationError::InvalidInput(Function::CubeRoot))
        );
    }

    #[test]
    fn percent_evaluates_first() {
        assert_eq!(Function::Percent.apply("50"), Ok("0.5".to_owned()));
        assert_eq!(Function::Percent.apply("2*25"), Ok("0.5".to_owned()));
        let err = Function::Percent.apply("5/0").unwrap_err();
        assert_eq!(err.to_string(), "Invalid expression for percentage");
    }

    #[test]
    fn sign_flip_is_an_involution() {
        assert_eq!(flip_sign(""), "");
        assert_eq!(flip_sign("12"), "-12");
        assert_eq!(flip_sign("-12+3"), "12+3");
        assert_eq!(flip_sign(&flip_sign("4*(2-1)")), "4*(2-1)");
    }
}
