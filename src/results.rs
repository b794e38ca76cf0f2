pub mod row;

pub use row::ResultRow;
pub(crate) use row::RowShape;
