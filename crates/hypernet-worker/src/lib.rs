// The cache worker: offline asset serving, deferred form sync, push notifications
//
// Runs beside the page, never calls into it. The two only meet through
// request interception and the shared local storage.

pub mod error;
pub mod fetch;
pub mod host;
pub mod lifecycle;
pub mod push;
pub mod sync;
pub mod worker;

pub use error::{Result, WorkerError};
pub use fetch::{offline_response, FetchOutcome, ResponseSource};
pub use host::{Clients, HeadlessHost, NotificationOptions, Notifier, WindowClient};
pub use lifecycle::{ActivateReport, InstallReport, WorkerState};
pub use push::{ClickOutcome, PushPayload};
pub use sync::SyncReport;
pub use worker::{CacheWorker, WorkerEvent, WorkerReply};
