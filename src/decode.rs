//! Decoding whole expression trees from JSON.
//!
//! Scalars become primary nodes through [`Expr::auto`]. Everything else is a
//! single-key object naming the node:
//!
//! ```text
//! {"column": "t.price"}            {"date": "2024-01-31"}
//! {"datetime": "2024-01-31T08:00:00"}
//! {"neg": x}  {"pos": x}  {"not": x}
//! {"add": [l, r]}  {"sub": ..}  {"mul": ..}  {"div": ..}
//! {"and": [l, r]}  {"or": [l, r]}
//! {"is": [x, true | false | null]}
//! {"eq": [l, r]}  {"ne": ..}  {"lt": ..}  {"le": ..}  {"gt": ..}  {"ge": ..}
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::ast::{ArithOp, BoolOp, ColumnRef, CompOp, Expr};
use crate::error::ConstructionError;

impl Expr {
    pub fn from_json(value: &Value) -> Result<Expr, ConstructionError> {
        let Value::Object(map) = value else {
            return Expr::auto(value);
        };
        let mut entries = map.iter();
        let (Some((tag, body)), None) = (entries.next(), entries.next()) else {
            return Err(malformed(format!("expected a single-key object, got {}", value)));
        };

        match tag.as_str() {
            "column" => Ok(Expr::Column(ColumnRef::parse(string(tag, body)?))),
            "date" => NaiveDate::parse_from_str(string(tag, body)?, "%Y-%m-%d")
                .map(Expr::Date)
                .map_err(|e| malformed(format!("bad date {}: {}", body, e))),
            "datetime" => {
                let text = string(tag, body)?.replacen(' ', "T", 1);
                NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(Expr::Datetime)
                    .map_err(|e| malformed(format!("bad datetime {}: {}", body, e)))
            }
            "neg" => Ok(Expr::sign(Expr::from_json(body)?, true)),
            "pos" => Ok(Expr::sign(Expr::from_json(body)?, false)),
            "not" => Ok(Expr::not(Expr::from_json(body)?)),
            "is" => {
                let [operand, target] = pair(tag, body)?;
                let target = match target {
                    Value::Bool(b) => Some(*b),
                    Value::Null => None,
                    other => {
                        return Err(malformed(format!(
                            "'is' target must be true, false or null, got {}",
                            other
                        )))
                    }
                };
                Ok(Expr::is(Expr::from_json(operand)?, target))
            }
            _ => binary(tag, body),
        }
    }
}

enum Binary {
    Arith(ArithOp),
    Bool(BoolOp),
    Comp(CompOp),
}

fn binary(tag: &str, body: &Value) -> Result<Expr, ConstructionError> {
    let kind = match tag {
        "add" => Binary::Arith(ArithOp::Add),
        "sub" => Binary::Arith(ArithOp::Sub),
        "mul" => Binary::Arith(ArithOp::Mul),
        "div" => Binary::Arith(ArithOp::Div),
        "and" => Binary::Bool(BoolOp::And),
        "or" => Binary::Bool(BoolOp::Or),
        "eq" => Binary::Comp(CompOp::Eq),
        "ne" => Binary::Comp(CompOp::Ne),
        "lt" => Binary::Comp(CompOp::Lt),
        "le" => Binary::Comp(CompOp::Le),
        "gt" => Binary::Comp(CompOp::Gt),
        "ge" => Binary::Comp(CompOp::Ge),
        _ => return Err(malformed(format!("unknown node '{}'", tag))),
    };

    let [left, right] = pair(tag, body)?;
    let (left, right) = (Expr::from_json(left)?, Expr::from_json(right)?);
    Ok(match kind {
        Binary::Arith(op) => Expr::arithmetic(op, left, right),
        Binary::Bool(op) => Expr::boolean(op, left, right),
        Binary::Comp(op) => Expr::compare(op, left, right),
    })
}

fn malformed(message: String) -> ConstructionError {
    ConstructionError::Malformed(message)
}

fn string<'v>(tag: &str, body: &'v Value) -> Result<&'v str, ConstructionError> {
    body.as_str()
        .ok_or_else(|| malformed(format!("'{}' expects a string, got {}", tag, body)))
}

fn pair<'v>(tag: &str, body: &'v Value) -> Result<[&'v Value; 2], ConstructionError> {
    match body.as_array().map(Vec::as_slice) {
        Some([left, right]) => Ok([left, right]),
        _ => Err(malformed(format!("'{}' expects two operands, got {}", tag, body))),
    }
}
