use std::collections::HashMap;
use std::fmt;

use crate::graph::{Graph, NodeId};

/// Node × node snapshot of edge membership, for diagnostic display.
///
/// Rows and columns follow [`Graph::nodes`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    names: Vec<String>,
    cells: Vec<Vec<bool>>,
}

impl AdjacencyMatrix {
    pub fn new(graph: &Graph) -> Self {
        let ids: Vec<NodeId> = graph.nodes().collect();
        let position: HashMap<NodeId, usize> =
            ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let names = ids
            .iter()
            .map(|&id| graph.name(id).unwrap_or_default().to_string())
            .collect();
        let cells = ids
            .iter()
            .map(|&id| {
                let mut row = vec![false; ids.len()];
                for m in graph.neighbours(id).unwrap_or(&[]) {
                    if let Some(&col) = position.get(m) {
                        row[col] = true;
                    }
                }
                row
            })
            .collect();

        Self { names, cells }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether row `i` and column `j` are connected. Out-of-range is `false`.
    pub fn is_edge(&self, i: usize, j: usize) -> bool {
        self.cells
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(false)
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.names.iter().map(String::len).max().unwrap_or(0).max(3);
        let rule = "-".repeat((width + 3) * (self.names.len() + 1));

        write!(f, " {:>width$} |", "")?;
        for name in &self.names {
            write!(f, " {:>width$} |", name)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", rule)?;

        for (name, row) in self.names.iter().zip(&self.cells) {
            write!(f, " {:>width$} |", name)?;
            for &cell in row {
                write!(f, " {:>width$} |", if cell { "yes" } else { "no" })?;
            }
            writeln!(f)?;
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
