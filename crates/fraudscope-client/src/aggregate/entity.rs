use std::collections::HashMap;

use serde::Serialize;

use crate::filter::FilteredView;

/// Rendering cap for the category/merchant breakdown.
pub const DEFAULT_ENTITY_LIMIT: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCount {
    pub category: String,
    pub merchant: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityBreakdown {
    pub rows: Vec<EntityCount>,
    pub distinct_pairs: usize,
    pub truncated: bool,
}

/// Top `limit` (category, merchant) pairs by count.
///
/// Pairs with equal counts keep the order in which they were first seen.
/// Records missing either key are not counted.
pub fn aggregate(view: &FilteredView<'_>, limit: usize) -> EntityBreakdown {
    let mut position_by_pair: HashMap<(&str, &str), usize> = HashMap::new();
    let mut rows: Vec<EntityCount> = Vec::new();

    for record in view.iter() {
        let (Some(category), Some(merchant)) = (record.category.as_deref(), record.merchant.as_deref())
        else {
            continue;
        };

        match position_by_pair.get(&(category, merchant)) {
            Some(position) => rows[*position].count += 1,
            None => {
                position_by_pair.insert((category, merchant), rows.len());
                rows.push(EntityCount {
                    category: category.to_string(),
                    merchant: merchant.to_string(),
                    count: 1,
                });
            }
        }
    }

    let distinct_pairs = rows.len();
    // Stable sort keeps first-seen order among equal counts.
    rows.sort_by(|left, right| right.count.cmp(&left.count));
    rows.truncate(limit);

    EntityBreakdown {
        rows,
        distinct_pairs,
        truncated: distinct_pairs > limit,
    }
}
