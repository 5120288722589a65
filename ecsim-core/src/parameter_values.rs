//! Parameter tables
//!
//! [`ParameterValues`] maps parameter names such as `"Electrode height [m]"` to a
//! number, a [`CurrentFunction`] factory or a [`Symbol`] defined in terms of other
//! parameters. A table is built once and only read afterwards, so the same table
//! can process any number of expressions, from any number of threads.
//!
//! Tables are usually loaded from TOML:
//!
//! ```rust
//! use ecsim_core::parameter_values::ParameterValues;
//! use ecsim_core::symbol::Symbol;
//!
//! let parameter_values = ParameterValues::from_toml_str(r#"
//! "Typical current [A]" = 2
//! "Current function" = { kind = "constant" }
//! "#).unwrap();
//!
//! let current = Symbol::parameter("Typical current [A]")
//!     * Symbol::function_parameter("Current function", vec![Symbol::time()]);
//! let processed = parameter_values.process(&current).unwrap();
//! assert_eq!(processed.evaluate(3.0).unwrap(), 2.0);
//! ```

use crate::errors::{ECSimError, ECSimResult};
use crate::evaluate::ProcessedExpression;
use crate::functions::CurrentFunction;
use crate::resolve::Resolver;
use crate::symbol::Symbol;
use crate::timeseries::FloatValue;
use log::debug;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::Path;

/// The value stored under a parameter name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Scalar(FloatValue),
    Function(CurrentFunction),
    /// An expression that may reference other parameters
    Expression(Symbol),
}

impl From<FloatValue> for ParameterValue {
    fn from(value: FloatValue) -> Self {
        ParameterValue::Scalar(value)
    }
}

impl From<CurrentFunction> for ParameterValue {
    fn from(value: CurrentFunction) -> Self {
        ParameterValue::Function(value)
    }
}

impl From<Symbol> for ParameterValue {
    fn from(value: Symbol) -> Self {
        ParameterValue::Expression(value)
    }
}

/// A read-only table of parameter values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterValues {
    values: BTreeMap<String, ParameterValue>,
}

impl<K, V> FromIterator<(K, V)> for ParameterValues
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for ParameterValues
where
    K: Into<String>,
    V: Into<ParameterValue>,
{
    fn from(values: [(K, V); N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a ParameterValues {
    type Item = (&'a String, &'a ParameterValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ParameterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl ParameterValues {
    /// Parse a table from a TOML document.
    ///
    /// Numbers become scalars, tables with a `kind` key become current functions
    /// and any other table is read as a serialised [`Symbol`].
    pub fn from_toml_str(document: &str) -> ECSimResult<Self> {
        let parameter_values: Self = toml::from_str(document)?;
        debug!("Loaded {} parameters", parameter_values.len());
        Ok(parameter_values)
    }

    /// Read a table from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ECSimResult<Self> {
        let path = path.as_ref();
        debug!("Reading parameters from {}", path.display());
        let document = std::fs::read_to_string(path)?;
        Self::from_toml_str(&document)
    }

    pub fn to_toml_string(&self) -> ECSimResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Look up a parameter, failing with [`ECSimError::UnknownParameter`] if absent
    pub fn lookup(&self, name: &str) -> ECSimResult<&ParameterValue> {
        self.values
            .get(name)
            .ok_or_else(|| ECSimError::UnknownParameter(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterValue)> {
        self.values.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// A copy of this table with existing values replaced.
    ///
    /// Every overridden name must already be present, so a misspelt key fails
    /// with [`ECSimError::UnknownParameter`] instead of being silently added.
    pub fn update<K, V>(&self, overrides: impl IntoIterator<Item = (K, V)>) -> ECSimResult<Self>
    where
        K: Into<String>,
        V: Into<ParameterValue>,
    {
        let mut values = self.values.clone();
        for (name, value) in overrides {
            let name = name.into();
            match values.get_mut(&name) {
                Some(existing) => {
                    debug!("Updating parameter '{}'", name);
                    *existing = value.into();
                }
                None => return Err(ECSimError::UnknownParameter(name)),
            }
        }
        Ok(Self { values })
    }

    /// A copy of this table with `other` added, replacing entries with the same name
    pub fn merge(&self, other: &ParameterValues) -> Self {
        let mut values = self.values.clone();
        for (name, value) in other {
            if values.insert(name.clone(), value.clone()).is_some() {
                debug!("Replacing parameter '{}'", name);
            }
        }
        Self { values }
    }

    /// Directed graph from every parameter to the parameters its value references.
    ///
    /// Referenced names that are not in the table are added as nodes without
    /// outgoing edges.
    pub fn dependency_graph(&self) -> DiGraph<String, ()> {
        let mut graph = DiGraph::new();
        let mut indexes: HashMap<&str, NodeIndex> = HashMap::new();

        for name in self.names() {
            indexes.insert(name, graph.add_node(name.to_string()));
        }
        for (name, value) in self.iter() {
            if let ParameterValue::Expression(expression) = value {
                let from = indexes[name.as_str()];
                for dependency in expression.parameters() {
                    let to = *indexes
                        .entry(dependency)
                        .or_insert_with(|| graph.add_node(dependency.to_string()));
                    graph.update_edge(from, to, ());
                }
            }
        }
        graph
    }

    /// Check the whole table before processing anything.
    ///
    /// Fails with [`ECSimError::CyclicParameterDefinition`] if parameters refer to
    /// each other in a loop, with [`ECSimError::UnknownParameter`] if an expression
    /// references a missing name, or with the factory's error if a current function
    /// cannot be generated.
    pub fn validate(&self) -> ECSimResult<()> {
        let graph = self.dependency_graph();

        if let Err(cycle) = petgraph::algo::toposort(&graph, None) {
            let path = cycle_path(&graph, cycle.node_id());
            return Err(ECSimError::CyclicParameterDefinition(path));
        }

        for index in graph.node_indices() {
            let name = &graph[index];
            if !self.contains(name) {
                return Err(ECSimError::UnknownParameter(name.clone()));
            }
        }

        for value in self.values.values() {
            if let ParameterValue::Function(factory) = value {
                factory.generate()?;
            }
        }
        Ok(())
    }

    /// Substitute every parameter reference in `symbol`, returning the resolved tree
    pub fn process_symbol(&self, symbol: &Symbol) -> ECSimResult<Symbol> {
        debug!("Processing {}", symbol);
        let resolved = Resolver::new(self).resolve(symbol)?;
        Ok(resolved.simplify())
    }

    /// Substitute every parameter reference in `symbol`, ready for evaluation
    pub fn process(&self, symbol: &Symbol) -> ECSimResult<ProcessedExpression> {
        ProcessedExpression::new(self.process_symbol(symbol)?)
    }
}

/// Names along a cycle that passes through `start`, ending with `start` again
fn cycle_path(graph: &DiGraph<String, ()>, start: NodeIndex) -> Vec<String> {
    let mut previous: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(node) = queue.pop_front() {
        for next in graph.neighbors(node) {
            if next == start {
                let mut path = vec![graph[start].clone()];
                let mut current = node;
                while current != start {
                    path.push(graph[current].clone());
                    current = previous[&current];
                }
                path.push(graph[start].clone());
                let end = path.len() - 1;
                path[1..end].reverse();
                return path;
            }
            if !previous.contains_key(&next) {
                previous.insert(next, node);
                queue.push_back(next);
            }
        }
    }
    vec![graph[start].clone()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn cell_parameters() -> ParameterValues {
        ParameterValues::from_iter([
            ("Electrode height [m]", ParameterValue::from(0.1)),
            ("Electrode depth [m]", ParameterValue::from(0.1)),
            (
                "Electrode area [m2]",
                ParameterValue::from(
                    Symbol::parameter("Electrode height [m]")
                        * Symbol::parameter("Electrode depth [m]"),
                ),
            ),
            ("Current function", ParameterValue::from(CurrentFunction::constant())),
        ])
    }

    #[test]
    fn lookup() {
        let parameter_values = cell_parameters();
        assert_eq!(parameter_values.len(), 4);
        assert!(matches!(
            parameter_values.lookup("Electrode height [m]"),
            Ok(ParameterValue::Scalar(v)) if *v == 0.1
        ));
        assert!(matches!(
            parameter_values.lookup("Electrode width [m]"),
            Err(ECSimError::UnknownParameter(name)) if name == "Electrode width [m]"
        ));
        assert!(parameter_values.get("Electrode width [m]").is_none());
    }

    #[test]
    fn update_returns_a_new_table() {
        let parameter_values = cell_parameters();
        let updated = parameter_values
            .update([("Electrode height [m]", 0.2)])
            .unwrap();

        assert_eq!(
            parameter_values.get("Electrode height [m]"),
            Some(&ParameterValue::Scalar(0.1))
        );
        assert_eq!(
            updated.get("Electrode height [m]"),
            Some(&ParameterValue::Scalar(0.2))
        );
    }

    #[test]
    fn update_rejects_new_names() {
        let parameter_values = cell_parameters();
        assert!(matches!(
            parameter_values.update([("Electrode hieght [m]", 0.2)]),
            Err(ECSimError::UnknownParameter(_))
        ));
    }

    #[test]
    fn merge_adds_and_replaces() {
        let merged = cell_parameters().merge(&ParameterValues::from([
            ("Electrode height [m]", 0.3),
            ("Typical current [A]", 2.0),
        ]));
        assert_eq!(merged.len(), 5);
        assert_eq!(
            merged.get("Electrode height [m]"),
            Some(&ParameterValue::Scalar(0.3))
        );
    }

    #[test]
    fn process_resolves_and_folds_constants() {
        let parameter_values = cell_parameters();
        let symbol = Symbol::constant(2.0) / Symbol::parameter("Electrode area [m2]");

        let processed = parameter_values.process_symbol(&symbol).unwrap();
        assert_eq!(processed, Symbol::Constant(2.0 / (0.1 * 0.1)));

        let processed = parameter_values.process(&symbol).unwrap();
        assert!(is_close!(processed.evaluate(0.0).unwrap(), 200.0));
    }

    #[test]
    fn process_twice_is_deterministic() {
        let parameter_values = cell_parameters();
        let symbol = Symbol::function_parameter("Current function", vec![Symbol::time()])
            / Symbol::parameter("Electrode area [m2]");

        let first = parameter_values.process(&symbol).unwrap();
        let second = parameter_values.process(&symbol).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.evaluate(3.0).unwrap().to_bits(),
            second.evaluate(3.0).unwrap().to_bits()
        );
    }

    #[test]
    fn division_by_zero_parameter() {
        let parameter_values = ParameterValues::from([("zero", 0.0), ("one", 1.0)]);
        let processed = parameter_values
            .process(&(Symbol::parameter("one") / Symbol::parameter("zero")))
            .unwrap();
        assert!(matches!(
            processed.evaluate(0.0),
            Err(ECSimError::DivisionByZero)
        ));
    }

    #[test]
    fn dependency_graph() {
        let graph = cell_parameters().dependency_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn validate_accepts_a_consistent_table() {
        assert!(cell_parameters().validate().is_ok());
    }

    #[test]
    fn validate_reports_cycles() {
        let parameter_values = ParameterValues::from_iter([
            ("A", ParameterValue::from(Symbol::parameter("B") * 2.0)),
            ("B", ParameterValue::from(Symbol::parameter("C") - 1.0)),
            ("C", ParameterValue::from(Symbol::parameter("A") / 4.0)),
            ("D", ParameterValue::from(1.0)),
        ]);
        match parameter_values.validate() {
            Err(ECSimError::CyclicParameterDefinition(path)) => {
                assert_eq!(path.len(), 4);
                assert_eq!(path.first(), path.last());
                for name in ["A", "B", "C"] {
                    assert!(path.iter().any(|n| n == name));
                }
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn validate_reports_self_reference() {
        let parameter_values =
            ParameterValues::from_iter([("A", ParameterValue::from(Symbol::parameter("A") + 1.0))]);
        assert!(matches!(
            parameter_values.validate(),
            Err(ECSimError::CyclicParameterDefinition(path)) if path == vec!["A", "A"]
        ));
    }

    #[test]
    fn validate_reports_two_parameter_cycle_in_order() {
        let parameter_values = ParameterValues::from_iter([
            ("A", ParameterValue::from(Symbol::parameter("B") * 2.0)),
            ("B", ParameterValue::from(Symbol::parameter("A") + 1.0)),
        ]);
        match parameter_values.validate() {
            Err(ECSimError::CyclicParameterDefinition(path)) => {
                assert_eq!(path.len(), 3);
                assert_eq!(path[0], path[2]);
                assert_ne!(path[0], path[1]);
            }
            other => panic!("expected a cycle, got {other:?}"),
        }
    }

    #[test]
    fn validate_reports_cycles_through_function_parameters() {
        let parameter_values = ParameterValues::from_iter([
            ("I", ParameterValue::from(2.0)),
            (
                "f",
                ParameterValue::from(
                    Symbol::parameter("I") * Symbol::function_parameter("f", vec![Symbol::time()]),
                ),
            ),
        ]);
        assert!(matches!(
            parameter_values.validate(),
            Err(ECSimError::CyclicParameterDefinition(path)) if path == vec!["f", "f"]
        ));
    }

    #[test]
    fn validate_reports_unknown_references() {
        let parameter_values = ParameterValues::from_iter([(
            "Electrode area [m2]",
            Symbol::parameter("Electrode height [m]") * Symbol::parameter("Electrode depth [m]"),
        )]);
        assert!(matches!(
            parameter_values.validate(),
            Err(ECSimError::UnknownParameter(name)) if name == "Electrode depth [m]"
        ));
    }

    #[test]
    fn validate_reports_invalid_current_functions() {
        let parameter_values = ParameterValues::from_iter([(
            "Current function",
            CurrentFunction::tabulated(vec![1.0, 0.0], vec![0.0, 1.0], false),
        )]);
        assert!(matches!(
            parameter_values.validate(),
            Err(ECSimError::InvalidCurrentFunction(_))
        ));
    }

    #[test]
    fn load_from_toml() {
        let parameter_values = ParameterValues::from_toml_str(
            r#"
"Electrode height [m]" = 0.1
"Number of electrodes connected in parallel to make a cell" = 8
"Current function" = { kind = "tabulated", times = [0.0, 10.0], values = [0.0, 1.0] }
"Double height [m]" = { BinaryOperator = { operator = "Multiply", left = { Parameter = "Electrode height [m]" }, right = { Constant = 2.0 } } }
"#,
        )
        .unwrap();

        assert_eq!(
            parameter_values.get("Number of electrodes connected in parallel to make a cell"),
            Some(&ParameterValue::Scalar(8.0))
        );
        assert!(matches!(
            parameter_values.get("Current function"),
            Some(ParameterValue::Function(CurrentFunction::Tabulated { extrapolate: false, .. }))
        ));
        assert_eq!(
            parameter_values.get("Double height [m]"),
            Some(&ParameterValue::Expression(
                Symbol::parameter("Electrode height [m]") * 2.0
            ))
        );
        assert!(parameter_values.validate().is_ok());
    }

    #[test]
    fn toml_document_survives_a_round_trip() {
        let parameter_values = cell_parameters();
        let document = parameter_values.to_toml_string().unwrap();
        let reloaded = ParameterValues::from_toml_str(&document).unwrap();
        assert_eq!(reloaded, parameter_values);
    }

    #[test]
    fn invalid_toml() {
        assert!(matches!(
            ParameterValues::from_toml_str("\"Electrode height [m]\" = \"tall\""),
            Err(ECSimError::Config(_))
        ));
    }
}
