//! Column names of the transaction dataset and the statically declared schema.

pub const TIMESTAMP: &str = "trans_date_trans_time";
pub const SPLIT_DATE: &str = "trans_date";
pub const SPLIT_TIME: &str = "trans_time";
pub const CARD_NUMBER: &str = "cc_num";
pub const MERCHANT: &str = "merchant";
pub const CATEGORY: &str = "category";
pub const AMOUNT: &str = "amt";
pub const CITY: &str = "city";
pub const REGION: &str = "state";
pub const LAT: &str = "lat";
pub const LONG: &str = "long";
pub const MERCH_LAT: &str = "merch_lat";
pub const MERCH_LONG: &str = "merch_long";
pub const LABEL: &str = "is_fraud";
pub const TRANSACTION_ID: &str = "trans_num";

/// Header names pandas-style exports give to a leading row-index column.
pub const INDEX_COLUMN_NAMES: [&str; 2] = ["", "Unnamed: 0"];

pub const EXPECTED_COLUMNS: [(&str, &str); 22] = [
    (TIMESTAMP, "string"),
    (CARD_NUMBER, "integer"),
    (MERCHANT, "string"),
    (CATEGORY, "string"),
    (AMOUNT, "float"),
    ("first", "string"),
    ("last", "string"),
    ("gender", "string"),
    ("street", "string"),
    (CITY, "string"),
    (REGION, "string"),
    ("zip", "integer"),
    (LAT, "float"),
    (LONG, "float"),
    ("city_pop", "integer"),
    ("job", "string"),
    ("dob", "string"),
    (TRANSACTION_ID, "string"),
    ("unix_time", "integer"),
    (MERCH_LAT, "float"),
    (MERCH_LONG, "float"),
    (LABEL, "integer"),
];

pub fn expected_column_names() -> Vec<&'static str> {
    EXPECTED_COLUMNS.iter().map(|(name, _)| *name).collect()
}

pub fn is_index_column(name: &str) -> bool {
    INDEX_COLUMN_NAMES.contains(&name)
}
