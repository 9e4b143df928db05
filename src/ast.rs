//! The typed expression tree handed from the parser to convolution and on
//! to the renderers.

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

use crate::error::ConstructionError;

/// A qualified column name such as `schema.table.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef(pub Vec<String>);

impl ColumnRef {
    pub fn new<I>(parts: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        ColumnRef(parts.into_iter().map(Into::into).collect())
    }

    /// Splits a dotted name into its parts.
    pub fn parse(dotted: &str) -> Self {
        ColumnRef::new(dotted.split('.'))
    }

    /// The unqualified column name.
    pub fn name(&self) -> &str {
        self.0.last().map(String::as_str).unwrap_or("")
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add, // +
    Sub, // -
    Mul, // *
    Div, // /
}

impl ArithOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// Binary boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompOp {
    Eq, // =
    Ne, // <>
    Lt, // <
    Le, // <=
    Gt, // >
    Ge, // >=
}

impl CompOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompOp::Eq => "=",
            CompOp::Ne => "<>",
            CompOp::Lt => "<",
            CompOp::Le => "<=",
            CompOp::Gt => ">",
            CompOp::Ge => ">=",
        }
    }

    /// The operator whose result is the negation of this one.
    pub fn inverse(&self) -> CompOp {
        match self {
            CompOp::Eq => CompOp::Ne,
            CompOp::Ne => CompOp::Eq,
            CompOp::Lt => CompOp::Ge,
            CompOp::Ge => CompOp::Lt,
            CompOp::Gt => CompOp::Le,
            CompOp::Le => CompOp::Gt,
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<CompOp> {
        match symbol {
            "=" => Some(CompOp::Eq),
            "<>" | "!=" => Some(CompOp::Ne),
            "<" => Some(CompOp::Lt),
            "<=" => Some(CompOp::Le),
            ">" => Some(CompOp::Gt),
            ">=" => Some(CompOp::Ge),
            _ => None,
        }
    }
}

/// Every kind of value a primary node can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Bool(bool),
    Null,
    Column(ColumnRef),
}

impl From<i64> for Literal {
    fn from(v: i64) -> Self {
        Literal::Int(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Literal::Int(v.into())
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Literal::Float(v)
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Literal::Str(v)
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Literal::Str(v.to_string())
    }
}

impl From<NaiveDate> for Literal {
    fn from(v: NaiveDate) -> Self {
        Literal::Date(v)
    }
}

impl From<NaiveDateTime> for Literal {
    fn from(v: NaiveDateTime) -> Self {
        Literal::Datetime(v)
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Literal::Bool(v)
    }
}

impl From<ColumnRef> for Literal {
    fn from(v: ColumnRef) -> Self {
        Literal::Column(v)
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(v: Option<T>) -> Self {
        v.map_or(Literal::Null, Into::into)
    }
}

/// An expression node. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // Primary values
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Bool(bool),
    Null,
    Column(ColumnRef),

    /// `+x` / `-x`; the operand is read as an integer.
    UnarySign { operand: Box<Expr>, negative: bool },
    Arithmetic { op: ArithOp, left: Box<Expr>, right: Box<Expr> },
    Not(Box<Expr>),
    Boolean { op: BoolOp, left: Box<Expr>, right: Box<Expr> },
    /// `x IS TRUE`, `x IS FALSE`, `x IS NULL`; `None` is NULL.
    Is { operand: Box<Expr>, target: Option<bool> },
    Comparison { op: CompOp, left: Box<Expr>, right: Box<Expr> },
}

impl From<Literal> for Expr {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Int(v) => Expr::Int(v),
            Literal::Float(v) => Expr::Float(v),
            Literal::Str(v) => Expr::Str(v),
            Literal::Date(v) => Expr::Date(v),
            Literal::Datetime(v) => Expr::Datetime(v),
            Literal::Bool(v) => Expr::Bool(v),
            Literal::Null => Expr::Null,
            Literal::Column(v) => Expr::Column(v),
        }
    }
}

impl Expr {
    /// Builds the primary node for a typed value.
    pub fn literal(value: impl Into<Literal>) -> Expr {
        Expr::from(value.into())
    }

    /// Builds the primary node for an untyped JSON scalar.
    ///
    /// Arrays and objects have no primary node and are rejected.
    pub fn auto(value: &serde_json::Value) -> Result<Expr, ConstructionError> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(Expr::Null),
            Value::Bool(b) => Ok(Expr::Bool(*b)),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Ok(Expr::Int(i)),
                (None, Some(f)) => Ok(Expr::Float(f)),
                (None, None) => Err(ConstructionError::UnsupportedLiteral {
                    kind: "number",
                    value: n.to_string(),
                }),
            },
            Value::String(s) => Ok(Expr::Str(s.clone())),
            Value::Array(_) => Err(ConstructionError::UnsupportedLiteral {
                kind: "array",
                value: value.to_string(),
            }),
            Value::Object(_) => Err(ConstructionError::UnsupportedLiteral {
                kind: "object",
                value: value.to_string(),
            }),
        }
    }

    pub fn string(v: impl Into<String>) -> Expr {
        Expr::Str(v.into())
    }

    pub fn column(dotted: &str) -> Expr {
        Expr::Column(ColumnRef::parse(dotted))
    }

    pub fn sign(operand: Expr, negative: bool) -> Expr {
        Expr::UnarySign { operand: Box::new(operand), negative }
    }

    pub fn neg(operand: Expr) -> Expr {
        Expr::sign(operand, true)
    }

    pub fn arithmetic(op: ArithOp, left: Expr, right: Expr) -> Expr {
        Expr::Arithmetic { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn add(left: Expr, right: Expr) -> Expr {
        Expr::arithmetic(ArithOp::Add, left, right)
    }

    pub fn sub(left: Expr, right: Expr) -> Expr {
        Expr::arithmetic(ArithOp::Sub, left, right)
    }

    pub fn mul(left: Expr, right: Expr) -> Expr {
        Expr::arithmetic(ArithOp::Mul, left, right)
    }

    pub fn div(left: Expr, right: Expr) -> Expr {
        Expr::arithmetic(ArithOp::Div, left, right)
    }

    pub fn not(operand: Expr) -> Expr {
        Expr::Not(Box::new(operand))
    }

    pub fn boolean(op: BoolOp, left: Expr, right: Expr) -> Expr {
        Expr::Boolean { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn and(left: Expr, right: Expr) -> Expr {
        Expr::boolean(BoolOp::And, left, right)
    }

    pub fn or(left: Expr, right: Expr) -> Expr {
        Expr::boolean(BoolOp::Or, left, right)
    }

    pub fn is(operand: Expr, target: Option<bool>) -> Expr {
        Expr::Is { operand: Box::new(operand), target }
    }

    pub fn compare(op: CompOp, left: Expr, right: Expr) -> Expr {
        Expr::Comparison { op, left: Box::new(left), right: Box::new(right) }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Expr::Null)
    }

    /// True for a numeric literal equal to zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Expr::Int(v) => *v == 0,
            Expr::Float(v) => *v == 0.0,
            _ => false,
        }
    }

    /// True for a numeric literal equal to one.
    pub fn is_one(&self) -> bool {
        match self {
            Expr::Int(v) => *v == 1,
            Expr::Float(v) => *v == 1.0,
            _ => false,
        }
    }

    /// Reads booleans as integers; everything else is unchanged.
    pub fn to_int(self) -> Expr {
        match self {
            Expr::Bool(b) => Expr::Int(i64::from(b)),
            other => other,
        }
    }

    /// Reads numeric literals as booleans; everything else is unchanged.
    pub fn to_bool(self) -> Expr {
        match self {
            Expr::Int(v) => Expr::Bool(v != 0),
            Expr::Float(v) => Expr::Bool(v != 0.0),
            other => other,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(v) => write!(f, "Int({})", v),
            Expr::Float(v) => write!(f, "Float({})", v),
            Expr::Str(v) => write!(f, "Str({:?})", v),
            Expr::Date(v) => write!(f, "Date({})", v),
            Expr::Datetime(v) => write!(f, "Datetime({})", v),
            Expr::Bool(v) => write!(f, "Bool({})", v),
            Expr::Null => write!(f, "Null"),
            Expr::Column(v) => write!(f, "Column({})", v),
            Expr::UnarySign { operand, negative } => {
                write!(f, "{}CastToInt({})", if *negative { "-" } else { "" }, operand)
            }
            Expr::Arithmetic { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::Not(operand) => write!(f, "not {}", operand),
            Expr::Boolean { op, left, right } => {
                write!(f, "({} {} {})", left, op.keyword(), right)
            }
            Expr::Is { operand, target } => {
                let target = match target {
                    Some(true) => "TRUE",
                    Some(false) => "FALSE",
                    None => "NULL",
                };
                write!(f, "({} is {})", operand, target)
            }
            Expr::Comparison { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_literal_dispatch() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(Expr::literal(7i64), Expr::Int(7));
        assert_eq!(Expr::literal(2.5), Expr::Float(2.5));
        assert_eq!(Expr::literal("abc"), Expr::Str("abc".to_string()));
        assert_eq!(Expr::literal(date), Expr::Date(date));
        assert_eq!(Expr::literal(true), Expr::Bool(true));
        assert_eq!(Expr::literal(None::<i64>), Expr::Null);
        assert_eq!(Expr::literal(Some(3i64)), Expr::Int(3));
        assert_eq!(
            Expr::literal(ColumnRef::parse("t.id")),
            Expr::Column(ColumnRef::new(["t", "id"]))
        );
        assert_eq!(ColumnRef::parse("s.t.price").name(), "price");
    }

    #[test]
    fn test_auto_from_json() {
        assert_eq!(Expr::auto(&json!(5)).unwrap(), Expr::Int(5));
        assert_eq!(Expr::auto(&json!(-1.25)).unwrap(), Expr::Float(-1.25));
        assert_eq!(Expr::auto(&json!("x")).unwrap(), Expr::string("x"));
        assert_eq!(Expr::auto(&json!(false)).unwrap(), Expr::Bool(false));
        assert_eq!(Expr::auto(&json!(null)).unwrap(), Expr::Null);
        assert_eq!(Expr::auto(&json!(u64::MAX)).unwrap(), Expr::Float(u64::MAX as f64));
    }

    #[test]
    fn test_auto_rejects_compound_values() {
        let err = Expr::auto(&json!([1, 2])).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::UnsupportedLiteral { kind: "array", value: "[1,2]".to_string() }
        );
        assert!(Expr::auto(&json!({"a": 1})).is_err());
    }

    #[test]
    fn test_coercions() {
        assert_eq!(Expr::Bool(true).to_int(), Expr::Int(1));
        assert_eq!(Expr::Bool(false).to_int(), Expr::Int(0));
        assert_eq!(Expr::Float(0.5).to_int(), Expr::Float(0.5));
        assert_eq!(Expr::column("a").to_int(), Expr::column("a"));

        assert_eq!(Expr::Int(0).to_bool(), Expr::Bool(false));
        assert_eq!(Expr::Int(-4).to_bool(), Expr::Bool(true));
        assert_eq!(Expr::Float(0.0).to_bool(), Expr::Bool(false));
        assert_eq!(Expr::Float(0.1).to_bool(), Expr::Bool(true));
        assert_eq!(Expr::Null.to_bool(), Expr::Null);
        assert_eq!(Expr::string("0").to_bool(), Expr::string("0"));
    }

    #[test]
    fn test_comparison_inverse_pairs() {
        for op in [CompOp::Eq, CompOp::Ne, CompOp::Lt, CompOp::Le, CompOp::Gt, CompOp::Ge] {
            assert_ne!(op.inverse(), op);
            assert_eq!(op.inverse().inverse(), op);
            assert_eq!(CompOp::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(CompOp::Lt.inverse(), CompOp::Ge);
        assert_eq!(CompOp::Gt.inverse(), CompOp::Le);
        assert_eq!(CompOp::from_symbol("!="), Some(CompOp::Ne));
    }

    #[test]
    fn test_display() {
        let expr = Expr::and(
            Expr::compare(CompOp::Le, Expr::column("t.a"), Expr::neg(Expr::Int(2))),
            Expr::not(Expr::is(Expr::column("b"), None)),
        );
        assert_eq!(
            expr.to_string(),
            "((Column(t.a) <= -CastToInt(Int(2))) and not (Column(b) is NULL))"
        );
        assert_eq!(
            Expr::div(Expr::Float(1.5), Expr::string("x")).to_string(),
            "(Float(1.5) / Str(\"x\"))"
        );
    }
}
