pub mod aggregation;
pub mod context;
pub mod cursor;
pub mod memory;
pub mod query;
pub mod record;
pub mod stream;
