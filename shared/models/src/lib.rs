pub mod query;
pub mod rows;
pub mod schema;

pub use query::*;
pub use rows::*;
pub use schema::*;
