//! Domain types - the vocabulary shared by the engine and its backends.

mod descriptor;

mod record;

mod request;

pub use descriptor::LimitDescriptor;
pub use record::QuotaRecord;
pub use request::{HandlerId, RequestContext};
