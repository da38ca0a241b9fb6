pub mod encoding;
pub mod model;

pub use encoding::canonical_bytes;
pub use model::{FieldValue, TransactionRecord, sample_transactions, tagged_sample_transactions};
