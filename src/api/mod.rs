pub mod envelope;

pub use envelope::{ApiResult, ClientError, Envelope, EnvelopeStatus, SearchResult};
