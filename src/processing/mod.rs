//! Document processing pipeline: extraction, metadata, summaries, keywords, and status tracking.

pub mod extract;
pub mod keywords;
pub mod metadata;
mod service;
pub mod status;
pub mod summarize;
pub mod types;

pub use extract::{ExtractionError, ExtractionOutcome, Format};
pub use service::{ProcessingApi, ProcessingService};
pub use status::{RunTicket, StatusError, StatusTracker};
pub use types::{
    DocumentId, DocumentRequest, ExtractionFailurePolicy, Metadata, PipelineSettings,
    ProcessingError, ProcessingResult, ProcessingStatus, ResubmissionPolicy, RunOptions, RunState,
    Stage,
};
