//! Typed cursors over MongoDB result streams with a configurable policy for
//! documents that fail to decode: abort, skip the row, or skip just the
//! offending fields.

pub mod error;
pub mod mongo;
pub mod options;
mod utils;

pub use mongodb::bson;

pub use error::{Error, Result};
pub use mongo::context::{CancelHandle, QueryContext};
pub use mongo::cursor::Cursor;
pub use mongo::memory::MemoryStream;
pub use mongo::record::{decode_value, FieldDef, Record};
pub use mongo::stream::{DocumentStream, DriverStream};
pub use options::{DecodePolicy, QueryOptions};
pub use utils::tag::wire_name;
