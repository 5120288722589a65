//! Symbolic expression trees
//!
//! A [`Symbol`] describes a physical quantity as a tree of constants, references to
//! named parameters, calls to time-dependent functions and arithmetic. Trees are
//! immutable values: every transformation returns a new tree.
//!
//! ```rust
//! use ecsim_core::symbol::Symbol;
//!
//! let current = Symbol::parameter("Typical current [A]")
//!     * Symbol::function_parameter("Current function", vec![Symbol::time()]);
//!
//! assert!(!current.is_resolved());
//! assert_eq!(
//!     current.to_string(),
//!     "(Typical current [A] * Current function(t))"
//! );
//! ```

use crate::functions::TimeFunction;
use crate::timeseries::FloatValue;
use num::Zero;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::sync::Arc;

/// Arithmetic operators for [`Symbol::BinaryOperator`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Multiply,
    Divide,
    Add,
    Subtract,
}

impl BinaryOperator {
    /// Apply the operator to two numbers without any zero checks
    pub(crate) fn apply(&self, left: FloatValue, right: FloatValue) -> FloatValue {
        match self {
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A node in a symbolic expression tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Symbol {
    /// A numeric literal
    Constant(FloatValue),
    /// Reference to a named entry of a parameter table
    Parameter(String),
    /// Call of a function that is supplied by a parameter table
    ///
    /// `args` holds at most one expression, the input of the function.
    /// Without arguments the function is called with the current time.
    FunctionParameter { name: String, args: Vec<Symbol> },
    /// A function that has been bound to a concrete callable
    Function {
        name: String,
        function: Arc<dyn TimeFunction>,
        args: Vec<Symbol>,
    },
    BinaryOperator {
        operator: BinaryOperator,
        left: Box<Symbol>,
        right: Box<Symbol>,
    },
    /// The independent time variable
    Time,
}

impl Symbol {
    pub fn constant(value: FloatValue) -> Self {
        Symbol::Constant(value)
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Symbol::Parameter(name.into())
    }

    pub fn function_parameter(name: impl Into<String>, args: Vec<Symbol>) -> Self {
        Symbol::FunctionParameter {
            name: name.into(),
            args,
        }
    }

    pub fn function(
        name: impl Into<String>,
        function: Arc<dyn TimeFunction>,
        args: Vec<Symbol>,
    ) -> Self {
        Symbol::Function {
            name: name.into(),
            function,
            args,
        }
    }

    pub fn time() -> Self {
        Symbol::Time
    }

    pub fn binary(operator: BinaryOperator, left: Symbol, right: Symbol) -> Self {
        Symbol::BinaryOperator {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// True if the tree contains no references to a parameter table
    pub fn is_resolved(&self) -> bool {
        match self {
            Symbol::Constant(_) | Symbol::Time => true,
            Symbol::Parameter(_) | Symbol::FunctionParameter { .. } => false,
            Symbol::Function { args, .. } => args.iter().all(Symbol::is_resolved),
            Symbol::BinaryOperator { left, right, .. } => {
                left.is_resolved() && right.is_resolved()
            }
        }
    }

    /// Names of every parameter and function parameter referenced in the tree
    pub fn parameters(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        self.collect_parameters(&mut names);
        names
    }

    fn collect_parameters<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Symbol::Constant(_) | Symbol::Time => {}
            Symbol::Parameter(name) => {
                names.insert(name.as_str());
            }
            Symbol::FunctionParameter { name, args } => {
                names.insert(name.as_str());
                args.iter().for_each(|arg| arg.collect_parameters(names));
            }
            Symbol::Function { args, .. } => {
                args.iter().for_each(|arg| arg.collect_parameters(names));
            }
            Symbol::BinaryOperator { left, right, .. } => {
                left.collect_parameters(names);
                right.collect_parameters(names);
            }
        }
    }

    /// Replace every occurrence of the time variable with `replacement`
    pub fn substitute_time(&self, replacement: &Symbol) -> Symbol {
        match self {
            Symbol::Time => replacement.clone(),
            Symbol::Constant(_) | Symbol::Parameter(_) => self.clone(),
            Symbol::FunctionParameter { name, args } => Symbol::FunctionParameter {
                name: name.clone(),
                args: args.iter().map(|a| a.substitute_time(replacement)).collect(),
            },
            Symbol::Function {
                name,
                function,
                args,
            } => Symbol::Function {
                name: name.clone(),
                function: Arc::clone(function),
                args: args.iter().map(|a| a.substitute_time(replacement)).collect(),
            },
            Symbol::BinaryOperator {
                operator,
                left,
                right,
            } => Symbol::binary(
                *operator,
                left.substitute_time(replacement),
                right.substitute_time(replacement),
            ),
        }
    }

    /// Fold arithmetic between constants into a single constant.
    ///
    /// Divisions by a zero constant are left in place so that evaluation
    /// reports the failure.
    pub fn simplify(&self) -> Symbol {
        match self {
            Symbol::Constant(_) | Symbol::Parameter(_) | Symbol::Time => self.clone(),
            Symbol::FunctionParameter { name, args } => Symbol::FunctionParameter {
                name: name.clone(),
                args: args.iter().map(Symbol::simplify).collect(),
            },
            Symbol::Function {
                name,
                function,
                args,
            } => Symbol::Function {
                name: name.clone(),
                function: Arc::clone(function),
                args: args.iter().map(Symbol::simplify).collect(),
            },
            Symbol::BinaryOperator {
                operator,
                left,
                right,
            } => {
                let left = left.simplify();
                let right = right.simplify();
                let folded = match (&left, &right) {
                    (_, Symbol::Constant(r))
                        if *operator == BinaryOperator::Divide && r.is_zero() =>
                    {
                        None
                    }
                    (Symbol::Constant(l), Symbol::Constant(r)) => Some(operator.apply(*l, *r)),
                    _ => None,
                };
                match folded {
                    Some(value) => Symbol::Constant(value),
                    None => Symbol::binary(*operator, left, right),
                }
            }
        }
    }
}

/// Structural equality.
///
/// Bound functions compare by name and arguments, so two resolutions of the same
/// tree are equal even though each holds its own callable.
impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Symbol::Constant(a), Symbol::Constant(b)) => a == b,
            (Symbol::Parameter(a), Symbol::Parameter(b)) => a == b,
            (
                Symbol::FunctionParameter { name: n1, args: a1 },
                Symbol::FunctionParameter { name: n2, args: a2 },
            ) => n1 == n2 && a1 == a2,
            (
                Symbol::Function {
                    name: n1, args: a1, ..
                },
                Symbol::Function {
                    name: n2, args: a2, ..
                },
            ) => n1 == n2 && a1 == a2,
            (
                Symbol::BinaryOperator {
                    operator: o1,
                    left: l1,
                    right: r1,
                },
                Symbol::BinaryOperator {
                    operator: o2,
                    left: l2,
                    right: r2,
                },
            ) => o1 == o2 && l1 == l2 && r1 == r2,
            (Symbol::Time, Symbol::Time) => true,
            _ => false,
        }
    }
}

fn write_call(f: &mut fmt::Formatter<'_>, name: &str, args: &[Symbol]) -> fmt::Result {
    write!(f, "{name}(")?;
    if args.is_empty() {
        write!(f, "t")?;
    }
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{arg}")?;
    }
    write!(f, ")")
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Constant(value) => write!(f, "{value}"),
            Symbol::Parameter(name) => write!(f, "{name}"),
            Symbol::FunctionParameter { name, args } | Symbol::Function { name, args, .. } => {
                write_call(f, name, args)
            }
            Symbol::BinaryOperator {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
            Symbol::Time => write!(f, "t"),
        }
    }
}

impl From<FloatValue> for Symbol {
    fn from(value: FloatValue) -> Self {
        Symbol::Constant(value)
    }
}

macro_rules! impl_binary_ops {
    ($($op_trait:ident, $method:ident, $operator:expr;)*) => {
        $(
            impl $op_trait for Symbol {
                type Output = Symbol;

                fn $method(self, rhs: Symbol) -> Symbol {
                    Symbol::binary($operator, self, rhs)
                }
            }

            impl $op_trait<FloatValue> for Symbol {
                type Output = Symbol;

                fn $method(self, rhs: FloatValue) -> Symbol {
                    Symbol::binary($operator, self, Symbol::Constant(rhs))
                }
            }

            impl $op_trait<Symbol> for FloatValue {
                type Output = Symbol;

                fn $method(self, rhs: Symbol) -> Symbol {
                    Symbol::binary($operator, Symbol::Constant(self), rhs)
                }
            }
        )*
    };
}

impl_binary_ops! {
    Mul, mul, BinaryOperator::Multiply;
    Div, div, BinaryOperator::Divide;
    Add, add, BinaryOperator::Add;
    Sub, sub, BinaryOperator::Subtract;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::ConstantCurrent;

    #[test]
    fn operators_build_binary_nodes() {
        let symbol = Symbol::parameter("a") * 2.0 + Symbol::time();
        assert_eq!(
            symbol,
            Symbol::binary(
                BinaryOperator::Add,
                Symbol::binary(
                    BinaryOperator::Multiply,
                    Symbol::parameter("a"),
                    Symbol::constant(2.0)
                ),
                Symbol::Time,
            )
        );
        assert_eq!(symbol.to_string(), "((a * 2) + t)");
    }

    #[test]
    fn resolution_state() {
        assert!(Symbol::constant(1.0).is_resolved());
        assert!(Symbol::time().is_resolved());
        assert!(!Symbol::parameter("a").is_resolved());
        assert!(!(Symbol::constant(1.0) / Symbol::parameter("a")).is_resolved());
        assert!(!Symbol::function_parameter("f", vec![]).is_resolved());

        let bound = Symbol::function("f", Arc::new(ConstantCurrent::new(1.0)), vec![Symbol::Time]);
        assert!(bound.is_resolved());
        let bound_with_parameter = Symbol::function(
            "f",
            Arc::new(ConstantCurrent::new(1.0)),
            vec![Symbol::parameter("tau")],
        );
        assert!(!bound_with_parameter.is_resolved());
    }

    #[test]
    fn collects_parameter_names() {
        let symbol = Symbol::parameter("b") * Symbol::parameter("a")
            / Symbol::function_parameter("f", vec![Symbol::time() * Symbol::parameter("a")]);
        let names: Vec<_> = symbol.parameters().into_iter().collect();
        assert_eq!(names, vec!["a", "b", "f"]);
    }

    #[test]
    fn substitutes_time() {
        let symbol = Symbol::time() * 2.0 + Symbol::function_parameter("f", vec![Symbol::time()]);
        let substituted = symbol.substitute_time(&(Symbol::time() * 60.0));
        assert_eq!(substituted.to_string(), "(((t * 60) * 2) + f((t * 60)))");
    }

    #[test]
    fn simplify_folds_constants() {
        let symbol = Symbol::constant(2.0) / (Symbol::constant(8.0) * 0.1 * 0.1);
        assert_eq!(symbol.simplify(), Symbol::Constant(2.0 / (8.0 * 0.1 * 0.1)));

        let partial = Symbol::parameter("a") * (Symbol::constant(1.0) + 1.0);
        assert_eq!(partial.simplify(), Symbol::parameter("a") * 2.0);
    }

    #[test]
    fn simplify_keeps_division_by_zero() {
        let symbol = Symbol::constant(1.0) / Symbol::constant(0.0);
        assert_eq!(symbol.simplify(), symbol);
    }

    #[test]
    fn display_function_without_arguments() {
        let symbol = Symbol::function_parameter("Current function", vec![]);
        assert_eq!(symbol.to_string(), "Current function(t)");
    }
}
