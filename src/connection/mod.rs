mod fetch;
mod query;
mod session;
mod tx;

pub use fetch::Rows;
pub use session::Connection;
