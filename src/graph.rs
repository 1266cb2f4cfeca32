//! Dependency ordering of models.
//!
//! Depth-first topological sort with three-state marking. The walk uses an
//! explicit stack over node indices, so deep dependency chains cannot
//! overflow the call stack and the cycle path is read straight off the
//! stack when a back-edge is found.
//!
//! Only nodes with at least one dependency seed the walk (last declared
//! first). Nodes never reached are placed ahead of the sorted ones in their
//! declared order.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// Dependency cycle found while sorting.
///
/// Each node depends on the next one; the last depends on the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCycle<N> {
    pub nodes: Vec<N>,
}

impl<N: fmt::Display> fmt::Display for DependencyCycle<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Order `nodes` so that every node comes after the nodes it depends on.
///
/// `dependencies` is called once per node. Dependencies that are not in
/// `nodes` are ignored. Nodes are expected to be distinct.
pub fn topological_sort<N, I, F>(
    nodes: &[N],
    mut dependencies: F,
) -> Result<Vec<N>, DependencyCycle<N>>
where
    N: Clone + Eq + Hash,
    I: IntoIterator<Item = N>,
    F: FnMut(&N) -> I,
{
    let mut index: HashMap<&N, usize> = HashMap::with_capacity(nodes.len());
    for (i, node) in nodes.iter().enumerate() {
        index.entry(node).or_insert(i);
    }
    let edges: Vec<Vec<usize>> = nodes
        .iter()
        .map(|node| {
            dependencies(node)
                .into_iter()
                .filter_map(|dep| index.get(&dep).copied())
                .collect()
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; nodes.len()];
    let mut order = Vec::with_capacity(nodes.len());

    let roots: Vec<usize> = (0..nodes.len()).filter(|&i| !edges[i].is_empty()).collect();
    for &root in roots.iter().rev() {
        if marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::InProgress;
        // (node, position of the next edge to follow)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(top) = stack.last_mut() {
            let node = top.0;
            let Some(&dep) = edges[node].get(top.1) else {
                marks[node] = Mark::Done;
                order.push(node);
                stack.pop();
                continue;
            };
            top.1 += 1;

            match marks[dep] {
                Mark::Unvisited => {
                    marks[dep] = Mark::InProgress;
                    stack.push((dep, 0));
                }
                Mark::InProgress => {
                    let start = stack.iter().position(|&(n, _)| n == dep).unwrap_or(0);
                    return Err(DependencyCycle {
                        nodes: stack[start..]
                            .iter()
                            .map(|&(n, _)| nodes[n].clone())
                            .collect(),
                    });
                }
                Mark::Done => {}
            }
        }
    }

    let mut sorted: Vec<N> = (0..nodes.len())
        .filter(|&i| marks[i] == Mark::Unvisited)
        .map(|i| nodes[i].clone())
        .collect();
    sorted.extend(order.into_iter().map(|i| nodes[i].clone()));
    Ok(sorted)
}
