//! Data models for catalogscrape.

mod product;
mod url_table;

pub use product::{
    FieldValue, ProductField, ProductFields, ProductRecord, ProductRow, RecordOutcome,
    RecordStatus, FETCH_ERROR, NOT_AVAILABLE, PRODUCT_COLUMNS, SUBCATEGORY_DEPTH,
};
pub use url_table::{UrlTable, URL_COLUMN};
