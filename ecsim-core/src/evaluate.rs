//! Numeric evaluation of processed expressions

use crate::errors::{ECSimError, ECSimResult};
use crate::symbol::{BinaryOperator, Symbol};
use crate::timeseries::{FloatValue, Time};
use num::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Evaluate a fully resolved expression at time `t`.
///
/// Fails with [`ECSimError::UnresolvedReference`] if the tree still references a
/// parameter table and with [`ECSimError::DivisionByZero`] if a divisor evaluates
/// to zero.
pub fn evaluate(symbol: &Symbol, t: Time) -> ECSimResult<FloatValue> {
    match symbol {
        Symbol::Constant(value) => Ok(*value),
        Symbol::Time => Ok(t),
        Symbol::Parameter(name) | Symbol::FunctionParameter { name, .. } => {
            Err(ECSimError::UnresolvedReference(name.clone()))
        }
        Symbol::Function {
            name,
            function,
            args,
        } => {
            let input = match args.as_slice() {
                [] => t,
                [arg] => evaluate(arg, t)?,
                _ => {
                    return Err(ECSimError::InvalidArguments {
                        name: name.clone(),
                        expected: 1,
                        got: args.len(),
                    })
                }
            };
            function.evaluate(input)
        }
        Symbol::BinaryOperator {
            operator,
            left,
            right,
        } => {
            let left = evaluate(left, t)?;
            let right = evaluate(right, t)?;
            if *operator == BinaryOperator::Divide && right.is_zero() {
                return Err(ECSimError::DivisionByZero);
            }
            Ok(operator.apply(left, right))
        }
    }
}

/// A resolved expression ready for evaluation
///
/// Created by [`ParameterValues::process`](crate::parameter_values::ParameterValues::process).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Symbol", into = "Symbol")]
pub struct ProcessedExpression {
    symbol: Symbol,
}

impl TryFrom<Symbol> for ProcessedExpression {
    type Error = ECSimError;

    fn try_from(symbol: Symbol) -> ECSimResult<Self> {
        Self::new(symbol)
    }
}

impl From<ProcessedExpression> for Symbol {
    fn from(processed: ProcessedExpression) -> Self {
        processed.symbol
    }
}

impl ProcessedExpression {
    /// Wrap a resolved tree.
    ///
    /// Fails with [`ECSimError::UnresolvedReference`] naming the first parameter
    /// that is still referenced.
    pub fn new(symbol: Symbol) -> ECSimResult<Self> {
        if let Some(name) = symbol.parameters().into_iter().next() {
            return Err(ECSimError::UnresolvedReference(name.to_string()));
        }
        Ok(Self { symbol })
    }

    pub fn evaluate(&self, t: Time) -> ECSimResult<FloatValue> {
        evaluate(&self.symbol, t)
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn into_symbol(self) -> Symbol {
        self.symbol
    }
}

impl fmt::Display for ProcessedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
