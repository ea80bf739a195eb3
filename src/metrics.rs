use crate::dataset::Datasets;

pub const LABEL_WRAP_WIDTH: usize = 18;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSpec {
    pub id: String,
    pub label: String,
}

/// Ordered metrics for a position with their display labels. Unknown
/// positions resolve to an empty list.
pub fn resolve(ds: &Datasets, position: &str) -> Vec<MetricSpec> {
    let Some(ids) = ds.position_metrics.get(position) else {
        return Vec::new();
    };
    ids.iter()
        .map(|id| id.trim())
        .filter(|id| !id.is_empty())
        .map(|id| MetricSpec {
            id: id.to_string(),
            label: display_name(ds, id).to_string(),
        })
        .collect()
}

pub fn display_name<'a>(ds: &'a Datasets, id: &'a str) -> &'a str {
    ds.metric_names
        .get(id)
        .map(|s| s.as_str())
        .unwrap_or(id)
}

/// Greedy word wrap. Words longer than `width` get a line of their own.
pub fn wrap_label(label: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in label.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
