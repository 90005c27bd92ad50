//! Reactive cell graph
//!
//! Cells declare the bindings they read and the bindings they write. The
//! builder wires every read to its single producer, forming a
//! `petgraph::DiGraph` whose topological order is fixed at build time.
//! Changing an input re-executes exactly the cells reachable from it, in
//! that order, as one synchronous pass.

use crate::table::Table;
use crate::{Error, Result};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, instrument};

/// Value held by a binding
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Integer(i64),
    Text(String),
    Numbers(Vec<f64>),
    Table(Table),
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(x) => Some(*x),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            CellValue::Numbers(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            CellValue::Table(t) => Some(t),
            _ => None,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            CellValue::Number(_) => "number",
            CellValue::Integer(_) => "integer",
            CellValue::Text(_) => "text",
            CellValue::Numbers(_) => "numbers",
            CellValue::Table(_) => "table",
        }
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Number(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Integer(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<Vec<f64>> for CellValue {
    fn from(v: Vec<f64>) -> Self {
        CellValue::Numbers(v)
    }
}

impl From<Table> for CellValue {
    fn from(v: Table) -> Self {
        CellValue::Table(v)
    }
}

/// Read-only view of the bindings a cell declared
pub struct Inputs<'a> {
    cell: &'a str,
    reads: &'a [String],
    values: &'a HashMap<String, CellValue>,
}

impl<'a> Inputs<'a> {
    /// A declared binding's current value
    pub fn get(&self, name: &str) -> Result<&'a CellValue> {
        if !self.reads.iter().any(|r| r == name) {
            return Err(Error::Graph(format!(
                "cell '{}' read undeclared binding '{name}'",
                self.cell
            )));
        }
        self.values.get(name).ok_or_else(|| {
            Error::Graph(format!("binding '{name}' has no value yet (cell '{}')", self.cell))
        })
    }

    pub fn number(&self, name: &str) -> Result<f64> {
        let value = self.get(name)?;
        value.as_number().ok_or_else(|| self.mistyped(name, "number", value))
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        let value = self.get(name)?;
        value.as_integer().ok_or_else(|| self.mistyped(name, "integer", value))
    }

    pub fn text(&self, name: &str) -> Result<&'a str> {
        let value = self.get(name)?;
        value.as_text().ok_or_else(|| self.mistyped(name, "text", value))
    }

    pub fn numbers(&self, name: &str) -> Result<&'a [f64]> {
        let value = self.get(name)?;
        value.as_numbers().ok_or_else(|| self.mistyped(name, "numbers", value))
    }

    pub fn table(&self, name: &str) -> Result<&'a Table> {
        let value = self.get(name)?;
        value.as_table().ok_or_else(|| self.mistyped(name, "table", value))
    }

    fn mistyped(&self, name: &str, expected: &str, found: &CellValue) -> Error {
        Error::Graph(format!(
            "cell '{}' expected binding '{name}' to be {expected}, found {}",
            self.cell,
            found.type_name()
        ))
    }
}

/// Values written by one cell execution
#[derive(Debug, Default)]
pub struct Outputs {
    values: Vec<(String, CellValue)>,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.values.push((name.into(), value.into()));
        self
    }
}

type CellFn = Box<dyn Fn(&Inputs<'_>) -> Result<Outputs>>;

/// A named cell: declared reads, declared writes and the function computing the writes
pub struct Cell {
    name: String,
    reads: Vec<String>,
    writes: Vec<String>,
    run: CellFn,
}

impl Cell {
    pub fn new<F>(name: impl Into<String>, reads: &[&str], writes: &[&str], run: F) -> Self
    where
        F: Fn(&Inputs<'_>) -> Result<Outputs> + 'static,
    {
        Self {
            name: name.into(),
            reads: reads.iter().map(|s| s.to_string()).collect(),
            writes: writes.iter().map(|s| s.to_string()).collect(),
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reads(&self) -> &[String] {
        &self.reads
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("name", &self.name)
            .field("reads", &self.reads)
            .field("writes", &self.writes)
            .finish()
    }
}

#[derive(Debug, Clone)]
enum Node {
    Input(String),
    Cell(usize),
}

/// Builder for [`CellGraph`]
#[derive(Debug, Default)]
pub struct CellGraphBuilder {
    inputs: Vec<(String, CellValue)>,
    cells: Vec<Cell>,
}

impl CellGraphBuilder {
    /// Declare an input binding with its initial value
    pub fn input(mut self, name: impl Into<String>, initial: impl Into<CellValue>) -> Self {
        self.inputs.push((name.into(), initial.into()));
        self
    }

    pub fn cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Wire reads to producers and fix the topological order
    pub fn build(self) -> Result<CellGraph> {
        let mut graph: DiGraph<Node, ()> = DiGraph::new();
        let mut producers: HashMap<String, NodeIndex> = HashMap::new();
        let mut input_nodes = HashMap::new();
        let mut values = HashMap::new();

        for (name, initial) in self.inputs {
            if producers.contains_key(&name) {
                return Err(Error::Graph(format!("binding '{name}' is written twice")));
            }
            let node = graph.add_node(Node::Input(name.clone()));
            producers.insert(name.clone(), node);
            input_nodes.insert(name.clone(), node);
            values.insert(name, initial);
        }

        let mut names = HashSet::new();
        let mut cell_nodes = Vec::with_capacity(self.cells.len());
        for (index, cell) in self.cells.iter().enumerate() {
            if !names.insert(cell.name.as_str()) {
                return Err(Error::Graph(format!("cell '{}' declared twice", cell.name)));
            }
            let node = graph.add_node(Node::Cell(index));
            for binding in &cell.writes {
                if producers.insert(binding.clone(), node).is_some() {
                    return Err(Error::Graph(format!(
                        "binding '{binding}' is written twice (second writer '{}')",
                        cell.name
                    )));
                }
            }
            cell_nodes.push(node);
        }

        for (cell, &node) in self.cells.iter().zip(&cell_nodes) {
            for binding in &cell.reads {
                let producer = producers.get(binding).ok_or_else(|| {
                    Error::Graph(format!(
                        "cell '{}' reads '{binding}', which nothing writes",
                        cell.name
                    ))
                })?;
                graph.update_edge(*producer, node, ());
            }
        }

        let order = toposort(&graph, None).map_err(|cycle| {
            let name = match &graph[cycle.node_id()] {
                Node::Input(name) => name.clone(),
                Node::Cell(i) => self.cells[*i].name.clone(),
            };
            Error::Graph(format!("dependency cycle through '{name}'"))
        })?;

        Ok(CellGraph {
            graph,
            order,
            cells: self.cells,
            inputs: input_nodes,
            values,
            evaluated: false,
        })
    }
}

/// A statically declared acyclic graph of cells
pub struct CellGraph {
    graph: DiGraph<Node, ()>,
    order: Vec<NodeIndex>,
    cells: Vec<Cell>,
    inputs: HashMap<String, NodeIndex>,
    values: HashMap<String, CellValue>,
    evaluated: bool,
}

impl CellGraph {
    pub fn builder() -> CellGraphBuilder {
        CellGraphBuilder::default()
    }

    /// Cell names in execution order
    pub fn order(&self) -> Vec<&str> {
        self.order
            .iter()
            .filter_map(|&n| match &self.graph[n] {
                Node::Cell(i) => Some(self.cells[*i].name.as_str()),
                Node::Input(_) => None,
            })
            .collect()
    }

    /// Run every cell once; returns the executed cell names in order
    #[instrument(skip(self), level = "debug")]
    pub fn evaluate(&mut self) -> Result<Vec<String>> {
        let order = self.order.clone();
        let executed = self.run_nodes(&order)?;
        self.evaluated = true;
        Ok(executed)
    }

    /// Replace an input and re-run the cells reachable from it
    ///
    /// Before the first [`evaluate`](Self::evaluate) the value is only
    /// stored. An unchanged value runs nothing.
    #[instrument(skip(self, value), level = "debug")]
    pub fn set_input(&mut self, name: &str, value: impl Into<CellValue>) -> Result<Vec<String>> {
        let value = value.into();
        let start = *self
            .inputs
            .get(name)
            .ok_or_else(|| Error::Graph(format!("unknown input '{name}'")))?;
        if self.values.get(name) == Some(&value) {
            debug!(input = name, "input unchanged");
            return Ok(Vec::new());
        }
        self.values.insert(name.to_string(), value);
        if !self.evaluated {
            return Ok(Vec::new());
        }

        let mut reachable = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(node) = dfs.next(&self.graph) {
            reachable.insert(node);
        }
        let affected: Vec<NodeIndex> = self
            .order
            .iter()
            .copied()
            .filter(|n| reachable.contains(n))
            .collect();
        self.run_nodes(&affected)
    }

    /// Current value of a binding
    pub fn value(&self, binding: &str) -> Option<&CellValue> {
        self.values.get(binding)
    }

    fn run_nodes(&mut self, nodes: &[NodeIndex]) -> Result<Vec<String>> {
        let mut executed = Vec::new();
        for &node in nodes {
            let Node::Cell(index) = self.graph[node] else {
                continue;
            };
            let cell = &self.cells[index];
            let inputs = Inputs {
                cell: &cell.name,
                reads: &cell.reads,
                values: &self.values,
            };
            let outputs = (cell.run)(&inputs)?;

            let mut written = HashSet::new();
            for (binding, _) in &outputs.values {
                if !cell.writes.contains(binding) {
                    return Err(Error::Graph(format!(
                        "cell '{}' wrote undeclared binding '{binding}'",
                        cell.name
                    )));
                }
                written.insert(binding.as_str());
            }
            if let Some(missing) = cell.writes.iter().find(|w| !written.contains(w.as_str())) {
                return Err(Error::Graph(format!(
                    "cell '{}' did not write '{missing}'",
                    cell.name
                )));
            }

            debug!(cell = %cell.name, "cell executed");
            executed.push(cell.name.clone());
            for (binding, value) in outputs.values {
                self.values.insert(binding, value);
            }
        }
        Ok(executed)
    }
}

impl fmt::Debug for CellGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellGraph")
            .field("order", &self.order())
            .field("evaluated", &self.evaluated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // a -> double -> a2 --\
    //                       sum -> total
    // b -------------------/
    //   \-> label -> text
    fn diamond() -> CellGraph {
        CellGraph::builder()
            .input("a", 2.0)
            .input("b", 3.0)
            .cell(Cell::new("label", &["b"], &["text"], |i| {
                Ok(Outputs::new().set("text", format!("b={}", i.number("b")?)))
            }))
            .cell(Cell::new("sum", &["a2", "b"], &["total"], |i| {
                Ok(Outputs::new().set("total", i.number("a2")? + i.number("b")?))
            }))
            .cell(Cell::new("double", &["a"], &["a2"], |i| {
                Ok(Outputs::new().set("a2", i.number("a")? * 2.0))
            }))
            .build()
            .unwrap()
    }

    fn position(executed: &[String], name: &str) -> usize {
        executed.iter().position(|n| n == name).unwrap()
    }

    #[test]
    fn test_evaluate_runs_everything_in_dependency_order() {
        let mut graph = diamond();
        let executed = graph.evaluate().unwrap();
        assert_eq!(executed.len(), 3);
        assert!(position(&executed, "double") < position(&executed, "sum"));
        assert_eq!(graph.value("total"), Some(&CellValue::Number(7.0)));
        assert_eq!(graph.value("text").and_then(CellValue::as_text), Some("b=3"));
    }

    #[test]
    fn test_set_input_reruns_only_reachable_cells() {
        let mut graph = diamond();
        graph.evaluate().unwrap();

        let executed = graph.set_input("a", 5.0).unwrap();
        assert_eq!(executed, vec!["double".to_string(), "sum".to_string()]);
        assert_eq!(graph.value("total"), Some(&CellValue::Number(13.0)));

        let mut executed = graph.set_input("b", 1.0).unwrap();
        executed.sort();
        assert_eq!(executed, vec!["label".to_string(), "sum".to_string()]);
        assert_eq!(graph.value("total"), Some(&CellValue::Number(11.0)));
    }

    #[test]
    fn test_unchanged_input_runs_nothing() {
        let mut graph = diamond();
        graph.evaluate().unwrap();
        assert!(graph.set_input("a", 2.0).unwrap().is_empty());
    }

    #[test]
    fn test_set_input_before_evaluate_only_stores() {
        let mut graph = diamond();
        assert!(graph.set_input("a", 10.0).unwrap().is_empty());
        graph.evaluate().unwrap();
        assert_eq!(graph.value("total"), Some(&CellValue::Number(23.0)));
    }

    #[test]
    fn test_unknown_input() {
        let mut graph = diamond();
        assert!(matches!(graph.set_input("zzz", 1.0), Err(Error::Graph(_))));
        // cell outputs are not inputs
        assert!(matches!(graph.set_input("total", 1.0), Err(Error::Graph(_))));
    }

    #[test]
    fn test_build_rejects_duplicate_writer() {
        let result = CellGraph::builder()
            .input("a", 1.0)
            .cell(Cell::new("x", &[], &["a"], |_| Ok(Outputs::new().set("a", 1.0))))
            .build();
        assert!(matches!(result, Err(Error::Graph(_))));
    }

    #[test]
    fn test_build_rejects_missing_producer() {
        let result = CellGraph::builder()
            .cell(Cell::new("x", &["nowhere"], &["y"], |_| Ok(Outputs::new().set("y", 1.0))))
            .build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("nowhere"));
    }

    #[test]
    fn test_build_rejects_cycle() {
        let result = CellGraph::builder()
            .cell(Cell::new("p", &["q_out"], &["p_out"], |_| Ok(Outputs::new().set("p_out", 1.0))))
            .cell(Cell::new("q", &["p_out"], &["q_out"], |_| Ok(Outputs::new().set("q_out", 1.0))))
            .build();
        let err = result.unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_undeclared_write_and_read_fail() {
        let mut graph = CellGraph::builder()
            .input("a", 1.0)
            .cell(Cell::new("x", &["a"], &["y"], |_| Ok(Outputs::new().set("z", 1.0))))
            .build()
            .unwrap();
        assert!(matches!(graph.evaluate(), Err(Error::Graph(_))));

        let mut graph = CellGraph::builder()
            .input("a", 1.0)
            .input("b", 1.0)
            .cell(Cell::new("x", &["a"], &["y"], |i| {
                Ok(Outputs::new().set("y", i.number("b")?))
            }))
            .build()
            .unwrap();
        assert!(matches!(graph.evaluate(), Err(Error::Graph(_))));
    }

    #[test]
    fn test_mistyped_binding() {
        let mut graph = CellGraph::builder()
            .input("label", "text")
            .cell(Cell::new("x", &["label"], &["y"], |i| {
                Ok(Outputs::new().set("y", i.number("label")?))
            }))
            .build()
            .unwrap();
        let err = graph.evaluate().unwrap_err();
        assert!(err.to_string().contains("expected binding 'label' to be number"));
    }
}
