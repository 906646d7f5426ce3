//! Small multiples: splitting rows by a categorical column.

/// Rows belonging to one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetGroup {
    /// Category value.
    pub label: String,
    /// Row indices in input order.
    pub indices: Vec<usize>,
}

impl FacetGroup {
    /// Pick this group's rows out of a column aligned with the input.
    #[must_use]
    pub fn select<T: Copy>(&self, values: &[T]) -> Vec<T> {
        self.indices.iter().filter_map(|&i| values.get(i).copied()).collect()
    }
}

/// Group row indices by category.
///
/// Groups follow first appearance unless `order` is given; categories missing
/// from `order` are appended in first-appearance order, and entries of `order`
/// with no rows are skipped. Rows with a missing label belong to no group.
#[must_use]
pub fn group_by_category(labels: &[Option<String>], order: Option<&[String]>) -> Vec<FacetGroup> {
    let mut groups: Vec<FacetGroup> = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        let Some(label) = label else { continue };
        match groups.iter_mut().find(|g| &g.label == label) {
            Some(group) => group.indices.push(i),
            None => groups.push(FacetGroup { label: label.clone(), indices: vec![i] }),
        }
    }

    if let Some(order) = order {
        let rank = |g: &FacetGroup| order.iter().position(|o| o == &g.label).unwrap_or(order.len());
        // Stable sort keeps first-appearance order among unranked groups.
        groups.sort_by_key(rank);
    }

    tracing::debug!(groups = groups.len(), rows = labels.len(), "grouped facets");
    groups
}
