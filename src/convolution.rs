//! Convolution: constant folding and algebraic simplification of [`Expr`]
//! trees under SQL three-valued logic.
//!
//! The rewrite is bottom-up. Children are folded first, coerced to the type
//! the parent operator reads them as, and then the parent's own rule runs:
//!
//! | node        | children read as | rule                                                  |
//! |-------------|------------------|-------------------------------------------------------|
//! | `+x`/`-x`   | `to_int`         | literal → signed literal, `-(-x)` → `+x`, NULL → NULL |
//! | `a op b`    | `to_int`         | evaluate literals, `x / 0` → NULL, NULL propagates, identities |
//! | `not x`     | `to_bool`        | comparison → inverted comparison, literal → negated   |
//! | `and`/`or`  | `to_bool`        | short-circuit literals, then NULL propagates          |
//! | `x is t`    | `to_bool`        | literal → `Bool`                                      |
//! | `a cmp b`   | as is            | children only                                         |
//!
//! Convolution never fails. A node no rule applies to comes back with its
//! folded children, and running convolution on its own output changes
//! nothing.

use crate::ast::{ArithOp, BoolOp, Expr};

/// Simplifies `expr` as far as the local rules allow.
pub fn simplify(expr: Expr) -> Expr {
    if log::log_enabled!(log::Level::Trace) {
        let before = expr.to_string();
        let after = expr.convolution();
        log::trace!("convolution: {} => {}", before, after);
        after
    } else {
        expr.convolution()
    }
}

impl Expr {
    /// One bottom-up folding pass. See the module docs for the rules.
    pub fn convolution(self) -> Expr {
        match self {
            Expr::UnarySign { operand, negative } => {
                fold_sign((*operand).convolution().to_int(), negative)
            }
            Expr::Arithmetic { op, left, right } => fold_arithmetic(
                op,
                (*left).convolution().to_int(),
                (*right).convolution().to_int(),
            ),
            Expr::Not(operand) => fold_not((*operand).convolution().to_bool()),
            Expr::Boolean { op, left, right } => fold_boolean(
                op,
                (*left).convolution().to_bool(),
                (*right).convolution().to_bool(),
            ),
            Expr::Is { operand, target } => fold_is((*operand).convolution().to_bool(), target),
            Expr::Comparison { op, left, right } => {
                Expr::compare(op, (*left).convolution(), (*right).convolution())
            }
            primary => primary,
        }
    }
}

fn fold_sign(operand: Expr, negative: bool) -> Expr {
    match operand {
        Expr::Int(v) if !negative => Expr::Int(v),
        Expr::Int(v) => match v.checked_neg() {
            Some(v) => Expr::Int(v),
            None => Expr::sign(Expr::Int(v), negative),
        },
        Expr::Float(v) => Expr::Float(if negative { -v } else { v }),
        Expr::Null => Expr::Null,
        Expr::UnarySign { operand: inner, negative: inner_negative } => {
            fold_sign(*inner, negative ^ inner_negative)
        }
        other => Expr::sign(other, negative),
    }
}

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn of(expr: &Expr) -> Option<Number> {
        match expr {
            Expr::Int(v) => Some(Number::Int(*v)),
            Expr::Float(v) => Some(Number::Float(*v)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }
}

/// Evaluates `a op b` over literals. `None` when an integer result would
/// overflow or a float result is not finite, in which case the node is left
/// for the database to evaluate.
fn evaluate(op: ArithOp, a: Number, b: Number) -> Option<Expr> {
    match (a, b) {
        (Number::Int(a), Number::Int(b)) => {
            let value = match op {
                ArithOp::Add => a.checked_add(b),
                ArithOp::Sub => a.checked_sub(b),
                ArithOp::Mul => a.checked_mul(b),
                ArithOp::Div => a.checked_div(b),
            }?;
            Some(Expr::Int(value))
        }
        (a, b) => {
            let (a, b) = (a.as_f64(), b.as_f64());
            let value = match op {
                ArithOp::Add => a + b,
                ArithOp::Sub => a - b,
                ArithOp::Mul => a * b,
                ArithOp::Div => a / b,
            };
            value.is_finite().then_some(Expr::Float(value))
        }
    }
}

fn fold_arithmetic(op: ArithOp, left: Expr, right: Expr) -> Expr {
    if let (Some(a), Some(b)) = (Number::of(&left), Number::of(&right)) {
        if op == ArithOp::Div && right.is_zero() {
            return Expr::Null;
        }
        return evaluate(op, a, b).unwrap_or_else(|| Expr::arithmetic(op, left, right));
    }

    if left.is_null() || right.is_null() {
        return Expr::Null;
    }

    match op {
        ArithOp::Add if left.is_zero() => right,
        ArithOp::Add if right.is_zero() => left,
        ArithOp::Sub if left.is_zero() => fold_sign(right, true),
        ArithOp::Sub if right.is_zero() => left,
        ArithOp::Mul if left.is_zero() || right.is_zero() => Expr::Int(0),
        ArithOp::Div if right.is_zero() => Expr::Null,
        ArithOp::Div if left.is_zero() => Expr::Int(0),
        ArithOp::Div if right.is_one() => left,
        _ => Expr::arithmetic(op, left, right),
    }
}

fn fold_not(operand: Expr) -> Expr {
    match operand {
        Expr::Comparison { op, left, right } => Expr::Comparison { op: op.inverse(), left, right },
        Expr::Bool(b) => Expr::Bool(!b),
        Expr::Null => Expr::Null,
        other => Expr::not(other),
    }
}

fn is_true(expr: &Expr) -> bool {
    matches!(expr, Expr::Bool(true))
}

fn is_false(expr: &Expr) -> bool {
    matches!(expr, Expr::Bool(false))
}

fn fold_boolean(op: BoolOp, left: Expr, right: Expr) -> Expr {
    match op {
        // TRUE OR x is TRUE even when x is unknown.
        BoolOp::Or if is_true(&left) || is_true(&right) => Expr::Bool(true),
        BoolOp::Or if is_false(&left) && is_false(&right) => Expr::Bool(false),
        BoolOp::And if is_true(&left) && is_true(&right) => Expr::Bool(true),
        // FALSE AND x is FALSE even when x is unknown.
        BoolOp::And if is_false(&left) || is_false(&right) => Expr::Bool(false),
        _ if left.is_null() || right.is_null() => Expr::Null,
        _ => Expr::boolean(op, left, right),
    }
}

fn fold_is(operand: Expr, target: Option<bool>) -> Expr {
    match operand {
        Expr::Bool(b) => Expr::Bool(target == Some(b)),
        Expr::Null => Expr::Bool(target.is_none()),
        other => Expr::is(other, target),
    }
}
