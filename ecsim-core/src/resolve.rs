//! Substitution of parameter references
//!
//! The resolver walks a [`Symbol`] tree and replaces every reference to a parameter
//! table with the value stored under that name. Parameters may be defined in terms
//! of other parameters; the names currently being expanded are tracked so that a
//! parameter that (indirectly) refers to itself fails with
//! [`ECSimError::CyclicParameterDefinition`] instead of recursing forever.

use crate::errors::{ECSimError, ECSimResult};
use crate::parameter_values::{ParameterValue, ParameterValues};
use crate::symbol::Symbol;
use log::trace;
use std::sync::Arc;

/// Resolves symbols against a single parameter table.
///
/// A resolver only reads the table. Each call to [`Resolver::resolve`] invokes the
/// factory behind every function reference once.
pub(crate) struct Resolver<'a> {
    parameter_values: &'a ParameterValues,
    /// Names being expanded on the current path, outermost first
    in_progress: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(parameter_values: &'a ParameterValues) -> Self {
        Self {
            parameter_values,
            in_progress: Vec::new(),
        }
    }

    pub fn resolve(&mut self, symbol: &Symbol) -> ECSimResult<Symbol> {
        match symbol {
            Symbol::Constant(_) | Symbol::Time => Ok(symbol.clone()),
            Symbol::Parameter(name) => self.resolve_parameter(name),
            Symbol::FunctionParameter { name, args } => {
                let args = self.resolve_args(args)?;
                self.resolve_function_parameter(name, args)
            }
            Symbol::Function {
                name,
                function,
                args,
            } => Ok(Symbol::function(
                name.clone(),
                Arc::clone(function),
                self.resolve_args(args)?,
            )),
            Symbol::BinaryOperator {
                operator,
                left,
                right,
            } => {
                let left = self.resolve(left)?;
                let right = self.resolve(right)?;
                Ok(Symbol::binary(*operator, left, right))
            }
        }
    }

    fn resolve_args(&mut self, args: &[Symbol]) -> ECSimResult<Vec<Symbol>> {
        args.iter().map(|arg| self.resolve(arg)).collect()
    }

    fn resolve_parameter(&mut self, name: &str) -> ECSimResult<Symbol> {
        let value = self.parameter_values.lookup(name)?;
        trace!("Substituting parameter '{}'", name);

        match value {
            ParameterValue::Scalar(value) => Ok(Symbol::Constant(*value)),
            ParameterValue::Expression(expression) => self.expand(name, expression),
            // A function used as a plain parameter is a function of time
            ParameterValue::Function(factory) => {
                Ok(Symbol::function(name, factory.generate()?, vec![Symbol::Time]))
            }
        }
    }

    fn resolve_function_parameter(&mut self, name: &str, args: Vec<Symbol>) -> ECSimResult<Symbol> {
        if args.len() > 1 {
            return Err(ECSimError::InvalidArguments {
                name: name.to_string(),
                expected: 1,
                got: args.len(),
            });
        }

        let value = self.parameter_values.lookup(name)?;
        trace!("Binding function parameter '{}'", name);

        match value {
            ParameterValue::Function(factory) => Ok(Symbol::function(name, factory.generate()?, args)),
            // A number given for a function is a constant function
            ParameterValue::Scalar(value) => Ok(Symbol::Constant(*value)),
            ParameterValue::Expression(expression) => {
                let expanded = self.expand(name, expression)?;
                Ok(match args.first() {
                    Some(input) => expanded.substitute_time(input),
                    None => expanded,
                })
            }
        }
    }

    /// Resolve the expression stored under `name` with `name` marked as in progress
    fn expand(&mut self, name: &str, expression: &Symbol) -> ECSimResult<Symbol> {
        if self.in_progress.iter().any(|n| n == name) {
            let mut path = self.in_progress.clone();
            path.push(name.to_string());
            return Err(ECSimError::CyclicParameterDefinition(path));
        }

        self.in_progress.push(name.to_string());
        let resolved = self.resolve(expression);
        self.in_progress.pop();
        resolved
    }
}
