use crate::filter::spec::FilterSpec;
use crate::store::{RecordStore, TransactionRecord};

/// Records of a store that satisfy one `FilterSpec`, in store order.
///
/// The view only holds indices; no record is copied, changed, or repeated.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    store: &'a RecordStore,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a TransactionRecord> + '_ {
        let store = self.store;
        self.indices
            .iter()
            .filter_map(move |index| store.get(*index))
    }
}

pub fn evaluate<'a>(store: &'a RecordStore, spec: &FilterSpec) -> FilteredView<'a> {
    let indices = store
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| admits(record, spec))
        .map(|(index, _)| index)
        .collect::<Vec<usize>>();

    log::debug!("filter kept {} of {} records", indices.len(), store.len());
    FilteredView { store, indices }
}

/// Predicates run in a fixed order; each one is a pure conjunct.
pub fn admits(record: &TransactionRecord, spec: &FilterSpec) -> bool {
    let Some(date) = record.date() else {
        return false;
    };
    if !spec.dates.contains(date) {
        return false;
    }
    if !spec.amounts.contains(record.amount) {
        return false;
    }
    if spec.exclude_coerced_amounts && record.amount_coerced {
        return false;
    }
    if !spec.allows_region(record.region_code.as_deref()) {
        return false;
    }
    if !spec.allows_merchant(record.merchant.as_deref()) {
        return false;
    }
    spec.label_mode.admits(record.is_fraud)
}
