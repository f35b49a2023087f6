//! Dependency ordering of models.

use std::collections::VecDeque;

use tracing::warn;

use crate::schema::ModelDescriptor;

/// Orders models so that every referenced table comes before the tables that
/// reference it. Returns indexes into `models`.
///
/// References to tables outside the set are ignored. Ties keep input order.
/// Models blocked by a reference cycle are appended in input order.
pub fn dependency_order<M: ModelDescriptor>(models: &[M]) -> Vec<usize> {
    let position = |table: &str| {
        models
            .iter()
            .position(|m| m.table_name().eq_ignore_ascii_case(table))
    };

    let mut in_degree = vec![0usize; models.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); models.len()];
    for (index, model) in models.iter().enumerate() {
        for table in model.referenced_tables() {
            if let Some(parent) = position(&table) {
                if parent != index && !dependents[parent].contains(&index) {
                    dependents[parent].push(index);
                    in_degree[index] += 1;
                }
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..models.len()).filter(|i| in_degree[*i] == 0).collect();
    let mut order = Vec::with_capacity(models.len());
    while let Some(index) = queue.pop_front() {
        order.push(index);
        for &child in &dependents[index] {
            in_degree[child] -= 1;
            if in_degree[child] == 0 {
                queue.push_back(child);
            }
        }
    }

    if order.len() != models.len() {
        let cyclic: Vec<usize> = (0..models.len()).filter(|i| !order.contains(i)).collect();
        warn!(
            tables = ?cyclic.iter().map(|i| models[*i].table_name()).collect::<Vec<_>>(),
            "Reference cycle between models, keeping input order"
        );
        order.extend(cyclic);
    }

    order
}
