use super::parser::XmlElement;

/// Keeps items whose first `category` text contains `category` as a
/// case-sensitive substring. Items without a category never match a
/// non-empty pattern. Order is preserved.
pub fn filter_by_category<'a>(items: Vec<&'a XmlElement>, category: &str) -> Vec<&'a XmlElement> {
    items
        .into_iter()
        .filter(|item| item.find_text("category").contains(category))
        .collect()
}

/// Keeps the first `limit` items; `None` keeps everything.
pub fn apply_limit<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

/// Selects the channel's `item` children: category filter first (only for a
/// non-empty pattern), then the limit. "First N" therefore counts matches,
/// not raw items.
pub fn select_items<'a>(
    channel: &'a XmlElement,
    category: Option<&str>,
    limit: Option<usize>,
) -> Vec<&'a XmlElement> {
    let items: Vec<&XmlElement> = channel.find_all("item").collect();
    let total = items.len();

    let items = match category.filter(|c| !c.is_empty()) {
        Some(category) => filter_by_category(items, category),
        None => items,
    };
    let matched = items.len();
    let items = apply_limit(items, limit);

    tracing::debug!(
        total = total,
        matched = matched,
        selected = items.len(),
        "Selected feed items"
    );
    items
}
