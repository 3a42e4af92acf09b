use std::fmt;
use std::ops::Not;

use crate::error::Error;

/// A propositional variable, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var(u32);

/// A signed reference to a variable: `x` or `¬x`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Sign { Pos, Neg, }

/// Three-valued state of a variable under a partial assignment.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum Value { True, False, Unassigned, }

impl Var {
    pub fn from_u32(v: u32) -> Var {
        Var(v)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn to_lit(&self, sign: Sign) -> Lit {
        match sign {
            Sign::Pos => Lit(self.0 as i32),
            Sign::Neg => Lit(-(self.0 as i32)),
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl Lit {
    /// `l` must be non-zero. Untrusted values go through `Lit::try_from`.
    pub fn from_i32(l: i32) -> Lit {
        debug_assert!(l != 0, "0 is not a literal");
        Lit(l)
    }

    pub fn to_i32(&self) -> i32 {
        self.0
    }

    pub fn var(&self) -> Var {
        Var(self.0.unsigned_abs())
    }

    pub fn sign(&self) -> Sign {
        if self.0 > 0 { Sign::Pos } else { Sign::Neg }
    }

    pub fn neg(&self) -> Lit {
        Lit(-self.0)
    }

    /// The value its variable must take for this literal to be true.
    pub fn satisfying_value(&self) -> Value {
        match self.sign() {
            Sign::Pos => Value::True,
            Sign::Neg => Value::False,
        }
    }

    /// Truth of the literal given the value of its variable.
    pub fn eval(&self, value: Value) -> Value {
        match (value, self.sign()) {
            (Value::Unassigned, _) => Value::Unassigned,
            (v, Sign::Pos) => v,
            (v, Sign::Neg) => !v,
        }
    }
}

impl fmt::Debug for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Lit {
    type Error = Error;

    fn try_from(l: i32) -> Result<Lit, Error> {
        match l {
            0 => Err(Error::ZeroLiteral),
            _ => Ok(Lit(l)),
        }
    }
}

impl Value {
    pub fn from_bool(b: bool) -> Value {
        if b { Value::True } else { Value::False }
    }

    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::True => Some(true),
            Value::False => Some(false),
            Value::Unassigned => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        *self != Value::Unassigned
    }
}

impl Not for Value {
    type Output = Value;

    fn not(self) -> Value {
        match self {
            Value::True => Value::False,
            Value::False => Value::True,
            Value::Unassigned => Value::Unassigned,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::True => write!(f, "TRUE"),
            Value::False => write!(f, "FALSE"),
            Value::Unassigned => write!(f, "UNASSIGNED"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lit_var_and_sign() {
        let l = Lit::from_i32(-3);
        assert_eq!(l.var(), Var::from_u32(3));
        assert_eq!(l.sign(), Sign::Neg);
        assert_eq!(l.neg(), Lit::from_i32(3));
        assert_eq!(Var::from_u32(3).to_lit(Sign::Neg), l);
    }

    #[test]
    fn test_lit_eval() {
        let pos = Lit::from_i32(2);
        let neg = Lit::from_i32(-2);
        assert_eq!(pos.eval(Value::True), Value::True);
        assert_eq!(neg.eval(Value::True), Value::False);
        assert_eq!(neg.eval(Value::False), Value::True);
        assert_eq!(neg.eval(Value::Unassigned), Value::Unassigned);
        assert_eq!(neg.satisfying_value(), Value::False);
    }

    #[test]
    fn test_lit_try_from() {
        assert_eq!(Lit::try_from(-7).unwrap(), Lit::from_i32(-7));
        assert!(matches!(Lit::try_from(0), Err(Error::ZeroLiteral)));
    }

    #[test]
    fn test_value_not() {
        assert_eq!(!Value::True, Value::False);
        assert_eq!(!Value::Unassigned, Value::Unassigned);
        assert_eq!(Value::from_bool(true).to_bool(), Some(true));
    }
}
