// Page script: everything that runs in the document
//
// Each capability is a small handler with its collaborators injected;
// `PageScript` wires them to page events.

pub mod form;
pub mod lazy;
pub mod navigation;
pub mod page;
pub mod registration;
pub mod scroll;
pub mod tracking;
pub mod vitals;

pub use form::{ContactFormHandler, FormView, MessageKind, SubmitOutcome};
pub use lazy::{LazyImage, LazyImageLoader};
pub use navigation::{ClickTarget, MobileNav};
pub use page::{PageContext, PageEvent, PageReply, PageScript};
pub use registration::{register_worker, WorkerRegistrar};
pub use scroll::{anchor_scroll, Layout, ScrollBehavior, ScrollTo, NAVBAR_OFFSET};
pub use tracking::{Link, SectionEntry, SECTION_THRESHOLD};
pub use vitals::{Metric, NavigationTiming, VitalName};
