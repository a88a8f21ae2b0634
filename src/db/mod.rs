mod source;
mod sqlite;

pub use source::*;
pub use sqlite::*;
