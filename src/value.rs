use std::fmt;
use std::ops::*;

use num::{BigInt, BigRational, Integer, Signed, ToPrimitive, Zero};

use crate::error::{CalcError, PartialComp};

/// Integer powers whose result would need more bits than this are refused
/// so that every evaluation finishes in bounded time.
const MAX_POW_BITS: u64 = 1 << 16;

/// Represents a canonical value that can be calculated by this library
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An exact integer of arbitrary size. Integer arithmetic stays in this
    /// form until an operation (true division, a float operand, a
    /// transcendental function) forces a float.
    Int(BigInt),
    /// A floating point number
    Float(f64),
}

impl Value {
    pub fn is_zero(&self) -> bool {
        match *self {
            Value::Int(ref n) => n.is_zero(),
            Value::Float(f) => f == 0.0,
        }
    }

    pub fn is_negative(&self) -> bool {
        match *self {
            Value::Int(ref n) => n.is_negative(),
            Value::Float(f) => f < 0.0,
        }
    }

    /// Converts to `f64`, failing for integers beyond the float range.
    pub fn as_float(&self) -> Result<f64, CalcError> {
        match *self {
            Value::Int(ref n) => n
                .to_f64()
                .filter(|f| f.is_finite())
                .ok_or(CalcError::IntTooLarge),
            Value::Float(f) => Ok(f),
        }
    }

    /// Natural logarithm, failing outside the positive reals.
    pub fn ln(&self) -> Result<f64, CalcError> {
        self.logarithm("log", f64::ln, 1.0)
    }

    pub fn log10(&self) -> Result<f64, CalcError> {
        self.logarithm("log10", f64::log10, std::f64::consts::LN_10)
    }

    /// Integers too large for a float go through their decimal digits so
    /// `log(10**400)` still works.
    fn logarithm(&self, op: &str, log: fn(f64) -> f64, base_ln: f64) -> Result<f64, CalcError> {
        if !self.is_negative() && !self.is_zero() {
            if let Value::Int(ref n) = *self {
                if n.to_f64().filter(|f| f.is_finite()).is_none() {
                    return Ok(big_ln(n) / base_ln);
                }
            }
            let x = self.as_float()?;
            if !x.is_nan() {
                return Ok(log(x));
            }
        }
        Err(CalcError::DomainError(PartialComp::unary(op, self)))
    }

    /// Represents a computation that keeps integers exact and casts to
    /// floating point as soon as either side is a float
    pub fn castmap<F, G>(self, that: Value, f: F, g: G) -> Result<Value, CalcError>
    where
        F: Fn(BigInt, BigInt) -> BigInt,
        G: Fn(f64, f64) -> f64,
    {
        match (self, that) {
            (Value::Int(n), Value::Int(m)) => Ok(Value::Int(f(n, m))),
            (this, that) => Ok(Value::Float(g(this.as_float()?, that.as_float()?))),
        }
    }

    /// Floor division; the quotient of `divmod`.
    pub fn floor_div(self, that: Value) -> Result<Self, CalcError> {
        if that.is_zero() {
            return Err(CalcError::DivideByZero);
        }
        self.castmap(that, |x, y| x.div_floor(&y), |x, y| float_divmod(x, y).0)
    }

    pub fn pow(self, that: Value) -> Result<Self, CalcError> {
        if let (Value::Int(n), Value::Int(m)) = (&self, &that) {
            if !m.is_negative() {
                return int_pow(n, m).ok_or_else(|| {
                    CalcError::WouldOverflow(PartialComp::binary("**", &self, &that))
                });
            }
        }
        let (x, y) = (self.as_float()?, that.as_float()?);
        if x == 0.0 && y < 0.0 {
            return Err(CalcError::DivideByZero);
        }
        if x < 0.0 && y.fract() != 0.0 && y.is_finite() {
            return Err(CalcError::BadTypes(PartialComp::binary("**", self, that)));
        }
        let result = x.powf(y);
        if result.is_infinite() && x.is_finite() && y.is_finite() {
            return Err(CalcError::WouldOverflow(PartialComp::binary("**", self, that)));
        }
        Ok(Value::Float(result))
    }

    pub fn abs(self) -> Self {
        match self {
            Value::Int(n) => Value::Int(n.abs()),
            Value::Float(f) => Value::Float(f.abs()),
        }
    }
}

fn int_pow(base: &BigInt, exp: &BigInt) -> Option<Value> {
    let one = BigInt::from(1);
    if base.is_zero() || base.abs() == one {
        // 0, 1 and -1 stay small for any exponent; only parity matters.
        let value = if exp.is_zero() {
            one
        } else if base.is_negative() && exp.is_odd() {
            -one
        } else {
            base.abs()
        };
        return Some(Value::Int(value));
    }
    let exp = exp.to_u32()?;
    // |base|**exp needs at least (bits - 1) * exp + 1 bits.
    let least = (base.bits() - 1)
        .saturating_mul(u64::from(exp))
        .saturating_add(1);
    if least > MAX_POW_BITS {
        return None;
    }
    let result = base.pow(exp);
    if result.bits() > MAX_POW_BITS {
        return None;
    }
    Some(Value::Int(result))
}

fn big_ln(n: &BigInt) -> f64 {
    let digits = n.magnitude().to_string();
    let lead = &digits[..17];
    // Leading digits are plain ASCII; parsing cannot fail.
    let mantissa: f64 = lead.parse().unwrap_or(1.0);
    mantissa.ln() + (digits.len() - 17) as f64 * std::f64::consts::LN_10
}

/// Floored division and modulo for floats: the remainder takes the sign of
/// the divisor and the quotient is rounded toward negative infinity.
fn float_divmod(x: f64, y: f64) -> (f64, f64) {
    let mut rem = x % y;
    let mut div = (x - rem) / y;
    if rem != 0.0 {
        if (y < 0.0) != (rem < 0.0) {
            rem += y;
            div -= 1.0;
        }
    } else {
        rem = 0.0f64.copysign(y);
    }
    let quot = if div != 0.0 {
        let floor = div.floor();
        if div - floor > 0.5 {
            floor + 1.0
        } else {
            floor
        }
    } else {
        0.0f64.copysign(x / y)
    };
    (quot, rem)
}

/// Formats a float the way the display shows it: the shortest text that
/// reads back as the same number, with a `.0` on whole values and exponent
/// form for very large or very small magnitudes.
fn format_float(x: f64, f: &mut fmt::Formatter) -> fmt::Result {
    if x.is_nan() {
        return write!(f, "nan");
    }
    if x.is_infinite() {
        return write!(f, "{}", if x < 0.0 { "-inf" } else { "inf" });
    }
    let magnitude = x.abs();
    if magnitude != 0.0 && (magnitude >= 1e16 || magnitude < 1e-4) {
        return write!(f, "{:e}", x);
    }
    let text = x.to_string();
    if text.contains('.') {
        write!(f, "{}", text)
    } else {
        write!(f, "{}.0", text)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Int(ref n) => write!(f, "{}", n),
            Value::Float(n) => format_float(n, f),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(BigInt::from(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Self {
        Value::Int(n)
    }
}

impl Add for Value {
    type Output = Result<Self, CalcError>;

    fn add(self, that: Value) -> Self::Output {
        self.castmap(that, |x, y| x + y, |x, y| x + y)
    }
}

impl Sub for Value {
    type Output = Result<Self, CalcError>;

    fn sub(self, that: Value) -> Self::Output {
        self.castmap(that, |x, y| x - y, |x, y| x - y)
    }
}

impl Mul for Value {
    type Output = Result<Self, CalcError>;

    fn mul(self, that: Value) -> Self::Output {
        self.castmap(that, |x, y| x * y, |x, y| x * y)
    }
}

/// True division: the quotient is always a float.
impl Div for Value {
    type Output = Result<Self, CalcError>;

    fn div(self, that: Value) -> Self::Output {
        if that.is_zero() {
            return Err(CalcError::DivideByZero);
        }
        let value = match (self, that) {
            // Rounded once from the exact quotient, so huge operands work as
            // long as the quotient fits in a float.
            (Value::Int(n), Value::Int(m)) => BigRational::new(n, m)
                .to_f64()
                .filter(|f| f.is_finite())
                .ok_or(CalcError::IntTooLarge)?,
            (this, that) => this.as_float()? / that.as_float()?,
        };
        Ok(Value::Float(value))
    }
}

impl Neg for Value {
    type Output = Self;

    fn neg(self) -> Self::Output {
        match self {
            Value::Int(n) => Value::Int(-n),
            Value::Float(f) => Value::Float(-f),
        }
    }
}

/// Modulo with the sign of the divisor.
impl Rem for Value {
    type Output = Result<Self, CalcError>;

    fn rem(self, that: Value) -> Self::Output {
        if that.is_zero() {
            return Err(CalcError::DivideByZero);
        }
        self.castmap(that, |x, y| x.mod_floor(&y), |x, y| float_divmod(x, y).1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn float_override() {
        let cases = vec![
            (Value::Float(3.0) + Value::from(1), Value::Float(4.0)),
            (Value::from(5) - Value::Float(4.5), Value::Float(0.5)),
            (
                (Value::from(24) * Value::from(4)).and_then(|v| v * Value::Float(1.0 / 48.0)),
                Value::Float(2.0),
            ),
        ];

        for (output, expected) in cases {
            assert_eq!(output, Ok(expected));
        }
    }

    #[test]
    fn integers_stay_exact() {
        let big = Value::from(2).pow(Value::from(100)).unwrap();
        assert_eq!(big.to_string(), "1267650600228229401496703205376");
        assert_eq!(Value::from(7).floor_div(Value::from(-2)), Ok(Value::from(-4)));
        assert_eq!(Value::from(-7) % Value::from(3), Ok(Value::from(2)));
    }

    #[test]
    fn true_division_is_float() {
        assert_eq!(Value::from(4) / Value::from(2), Ok(Value::Float(2.0)));
        assert_eq!(Value::from(1) / Value::from(0), Err(CalcError::DivideByZero));
        assert_eq!(Value::Float(1.0) % Value::Float(0.0), Err(CalcError::DivideByZero));

        let huge = Value::from(10).pow(Value::from(399)).unwrap();
        let larger = (Value::from(10).pow(Value::from(400)).unwrap() + Value::from(1)).unwrap();
        assert_eq!(larger.clone() / huge, Ok(Value::Float(10.0)));
        assert_eq!(larger / Value::from(1), Err(CalcError::IntTooLarge));

        let odd = (Value::from(2).pow(Value::from(54)).unwrap() + Value::from(1)).unwrap();
        assert_eq!(odd / Value::from(3), Ok(Value::Float(6004799503160662.0)));
    }

    #[test]
    fn float_modulo_follows_divisor() {
        assert_eq!(Value::Float(-7.5) % Value::from(2), Ok(Value::Float(0.5)));
        assert_eq!(Value::Float(7.5).floor_div(Value::from(-2)), Ok(Value::Float(-4.0)));
    }

    #[test]
    fn powers() {
        assert_eq!(Value::from(2).pow(Value::from(-1)), Ok(Value::Float(0.5)));
        assert_eq!(Value::from(0).pow(Value::from(-1)), Err(CalcError::DivideByZero));
        assert_eq!(Value::from(-1).pow(Value::from(1_000_001)), Ok(Value::from(-1)));
        assert!(matches!(
            Value::from(9).pow(Value::from(99_999)),
            Err(CalcError::WouldOverflow(_))
        ));
        match Value::from(2).pow(Value::from(65535)) {
            Ok(Value::Int(n)) => assert_eq!(n.bits(), 65536),
            other => panic!("2**65535 gave {:?}", other),
        }
        assert!(matches!(
            Value::from(2).pow(Value::from(65536)),
            Err(CalcError::WouldOverflow(_))
        ));
        assert!(matches!(
            Value::from(3).pow(Value::from(65535)),
            Err(CalcError::WouldOverflow(_))
        ));
        assert!(matches!(
            Value::from(-8).pow(Value::Float(1.0 / 3.0)),
            Err(CalcError::BadTypes(_))
        ));
        assert!(matches!(
            Value::Float(10.0).pow(Value::from(400)),
            Err(CalcError::WouldOverflow(_))
        ));
    }

    #[test]
    fn display() {
        let cases = vec![
            (Value::Float(3.0), "3.0"),
            (Value::Float(-2.5), "-2.5"),
            (Value::Float(0.1 + 0.2), "0.30000000000000004"),
            (Value::Float(1e16), "1e16"),
            (Value::Float(1.5e-7), "1.5e-7"),
            (Value::Float(0.0001), "0.0001"),
            (Value::Float(f64::INFINITY), "inf"),
            (Value::from(-42), "-42"),
        ];
        for (value, expected) in cases {
            assert_eq!(value.to_string(), expected);
        }
    }

    #[test]
    fn logarithm_of_huge_integer() {
        let n = Value::from(10).pow(Value::from(400)).unwrap();
        assert!((n.log10().unwrap() - 400.0).abs() < 1e-9);
        assert_eq!(Value::from(1000).log10(), Ok(3.0));
        assert!(matches!(Value::from(0).ln(), Err(CalcError::DomainError(_))));
        assert!(matches!(Value::Float(-1.0).log10(), Err(CalcError::DomainError(_))));
    }
}
