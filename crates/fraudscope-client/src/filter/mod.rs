pub mod evaluate;
pub mod spec;

pub use evaluate::{FilteredView, evaluate};
pub use spec::{AmountRange, DateRange, FilterSelections, FilterSpec, LabelMode};
