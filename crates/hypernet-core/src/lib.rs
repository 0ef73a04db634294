// Shared plumbing for the page script and the cache worker
pub mod analytics;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod http;
pub mod logs;
pub mod models;
pub mod storage;
pub mod validation;

pub use analytics::{Analytics, AnalyticsSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SiteConfig;
pub use debounce::Debouncer;
pub use error::{Error, StorageError};
pub use http::{HttpClient, Request, Response, ResponseKind};
pub use logs::{EventLog, SubmissionLog, EVENTS_KEY, SUBMISSIONS_KEY};
pub use models::{AnalyticsEvent, ContactForm, SubmissionRecord, SUBMISSION_SOURCE};
pub use storage::{DisabledStore, KeyValueStore, MemoryStore, SqliteStore};
pub use validation::{is_valid_email, validate, ValidationError};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
