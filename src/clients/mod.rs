pub mod cms;
pub mod query;

pub use cms::{CmsClient, CmsError, Envelope};
pub use query::{Condition, FilterOp, Query};
