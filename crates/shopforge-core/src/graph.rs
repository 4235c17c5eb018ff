use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::schema::Catalog;

/// Summary of FK graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for FK dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphReport {
    pub summary: FkGraphSummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic parent-first ordering of the catalog tables.
///
/// Ties between ready tables are broken by declaration order in the catalog.
pub fn build_fk_graph_report(catalog: &Catalog) -> FkGraphReport {
    let positions: BTreeMap<&str, usize> = catalog
        .tables
        .iter()
        .enumerate()
        .map(|(idx, table)| (table.name.as_str(), idx))
        .collect();
    let graph = build_adjacency(catalog);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = FkGraphSummary { nodes, edges };

    match toposort(&graph, &positions) {
        Ok(order) => FkGraphReport {
            summary,
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => FkGraphReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(catalog: &Catalog) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for table in &catalog.tables {
        graph.entry(table.name.clone()).or_default();

        for fk in table.foreign_keys() {
            graph
                .entry(fk.referenced_table.clone())
                .or_default()
                .insert(table.name.clone());
        }
    }

    graph
}

fn toposort(
    graph: &BTreeMap<String, BTreeSet<String>>,
    positions: &BTreeMap<&str, usize>,
) -> Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> =
        graph.keys().map(|node| (node.clone(), 0)).collect();

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let rank = |node: &str| positions.get(node).copied().unwrap_or(usize::MAX);
    let mut ready: BTreeSet<(usize, String)> = indegree
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(node, _)| (rank(node), node.clone()))
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some((_, node)) = ready.pop_first() {
        order.push(node.clone());

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert((rank(target), target.clone()));
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes: Vec<String> = indegree
            .into_iter()
            .filter_map(|(node, count)| if count > 0 { Some(node) } else { None })
            .collect();
        Err(cycle_nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Constraint, ForeignKey};

    #[test]
    fn ecommerce_tables_load_parents_first() {
        let report = build_fk_graph_report(&Catalog::ecommerce());
        assert_eq!(report.summary.nodes, 5);
        assert_eq!(report.summary.edges, 4);
        assert_eq!(
            report.topo_order.expect("acyclic"),
            vec!["customers", "products", "orders", "order_items", "payments"]
        );
    }

    #[test]
    fn toposort_reports_cycle() {
        let mut catalog = Catalog::ecommerce();
        let customers = catalog
            .tables
            .iter_mut()
            .find(|table| table.name == "customers")
            .expect("customers table");
        customers
            .constraints
            .push(Constraint::ForeignKey(ForeignKey {
                columns: vec!["customer_id".to_string()],
                referenced_table: "orders".to_string(),
                referenced_columns: vec!["order_id".to_string()],
            }));

        let report = build_fk_graph_report(&catalog);
        assert!(report.topo_order.is_none());
        let cycle = report.cycle.expect("cycle");
        assert!(cycle.contains(&"customers".to_string()));
        assert!(cycle.contains(&"orders".to_string()));
    }
}
