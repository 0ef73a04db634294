// Wires page events to the individual handlers
use crate::form::{ContactFormHandler, FormView, SubmitOutcome, MESSAGE_DISPLAY};
use crate::lazy::{LazyImage, LazyImageLoader};
use crate::navigation::{ClickTarget, MobileNav};
use crate::registration::{register_worker, WorkerRegistrar};
use crate::scroll::{anchor_scroll, Layout, ScrollTo};
use crate::tracking::{self, Link, SectionEntry};
use crate::vitals::{self, Metric, NavigationTiming};
use hypernet_core::{
    Analytics, AnalyticsSink, Clock, ContactForm, EventLog, HttpClient, KeyValueStore,
    SiteConfig, SubmissionLog,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;
use url::Url;

/// Where the page is and what it's called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub path: String,
    pub title: String,
    pub hostname: String,
}

#[derive(Debug, Clone)]
pub enum PageEvent {
    /// Document parsed; run the one-off setup
    Ready,
    ToggleClick,
    NavLinkClick,
    DocumentClick(ClickTarget),
    AnchorClick { href: String },
    Submit(ContactForm),
    SectionsVisible(Vec<SectionEntry>),
    LinkClick(Link),
    ImageVisible { id: String, is_intersecting: bool },
    Vital(Metric),
    Load(NavigationTiming),
}

#[derive(Debug, PartialEq)]
pub enum PageReply {
    Handled,
    /// No handler wired for this event, or nothing to do
    Ignored,
    /// Prevent the default navigation and scroll here instead
    Scroll(ScrollTo),
    Submitted(SubmitOutcome),
    ImageLoaded(LazyImage),
}

/// The whole page script
///
/// Handlers for missing page elements are simply never wired: no form
/// view, no submit handling; no layout, anchors keep their default jump.
pub struct PageScript {
    context: PageContext,
    worker_script: String,
    form_endpoint: Url,
    analytics: Analytics,
    submissions_store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    nav: Option<MobileNav>,
    form: Option<(ContactFormHandler, Box<dyn FormView>)>,
    /// When the current form message comes down
    message_deadline: Option<Instant>,
    layout: Option<Box<dyn Layout>>,
    registrar: Option<Arc<dyn WorkerRegistrar>>,
    images: Vec<LazyImage>,
    lazy: LazyImageLoader,
}

impl PageScript {
    pub fn new(
        config: &SiteConfig,
        context: PageContext,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> hypernet_core::Result<Self> {
        let dev_host = config.site.dev_hosts.iter().any(|h| *h == context.hostname);
        let analytics = Analytics::new(
            EventLog::with_capacity(store.clone(), config.analytics.max_events),
            clock.clone(),
        )
        .with_dev_host(dev_host);

        Ok(Self {
            context,
            worker_script: config.site.worker_script.clone(),
            form_endpoint: config.resolve(&config.form.endpoint)?,
            analytics,
            submissions_store: store,
            clock,
            nav: None,
            form: None,
            message_deadline: None,
            layout: None,
            registrar: None,
            images: Vec::new(),
            lazy: LazyImageLoader::new(false),
        })
    }

    pub fn with_navigation(mut self) -> Self {
        self.nav = Some(MobileNav::new());
        self
    }

    pub fn with_contact_form(mut self, network: Arc<dyn HttpClient>, view: Box<dyn FormView>) -> Self {
        let handler = ContactFormHandler::new(
            self.form_endpoint.clone(),
            network,
            SubmissionLog::new(self.submissions_store.clone()),
            self.clock.clone(),
        );
        self.form = Some((handler, view));
        self
    }

    pub fn with_layout(mut self, layout: Box<dyn Layout>) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_analytics_sink(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.analytics = self.analytics.with_sink(sink);
        self
    }

    pub fn with_registrar(mut self, registrar: Arc<dyn WorkerRegistrar>) -> Self {
        self.registrar = Some(registrar);
        self
    }

    /// Images on the page, and whether the host can report intersections
    pub fn with_images(mut self, images: Vec<LazyImage>, intersection_supported: bool) -> Self {
        self.images = images;
        self.lazy = LazyImageLoader::new(intersection_supported);
        self
    }

    pub fn nav(&self) -> Option<&MobileNav> {
        self.nav.as_ref()
    }

    pub fn images(&self) -> &[LazyImage] {
        &self.images
    }

    pub fn analytics(&self) -> &Analytics {
        &self.analytics
    }

    pub fn message_deadline(&self) -> Option<Instant> {
        self.message_deadline
    }

    /// Take the form message down now
    pub fn hide_message(&mut self) {
        self.message_deadline = None;
        if let Some((_, view)) = self.form.as_mut() {
            view.hide_message();
        }
    }

    /// Drive the page from a stream of events until the sender goes away
    ///
    /// Form messages are hidden [`MESSAGE_DISPLAY`] after they were shown; a
    /// newer message restarts the countdown.
    pub async fn run(&mut self, mut events: mpsc::Receiver<PageEvent>) {
        loop {
            let deadline = self.message_deadline;
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        let reply = self.dispatch(event).await;
                        debug!("Page event handled: {:?}", reply);
                    }
                    None => break,
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.hide_message();
                }
            }
        }
    }

    pub async fn dispatch(&mut self, event: PageEvent) -> PageReply {
        match event {
            PageEvent::Ready => {
                self.on_ready().await;
                PageReply::Handled
            }
            PageEvent::ToggleClick => self.with_nav(MobileNav::on_toggle_click),
            PageEvent::NavLinkClick => self.with_nav(MobileNav::on_link_click),
            PageEvent::DocumentClick(target) => self.with_nav(|nav| nav.on_document_click(target)),
            PageEvent::AnchorClick { href } => self
                .layout
                .as_deref()
                .and_then(|layout| anchor_scroll(&href, layout))
                .map(PageReply::Scroll)
                .unwrap_or(PageReply::Ignored),
            PageEvent::Submit(form) => match self.form.as_mut() {
                Some((handler, view)) => {
                    let outcome = handler.submit(view.as_mut(), &form).await;
                    // every outcome leaves a message up
                    self.message_deadline = Some(Instant::now() + MESSAGE_DISPLAY);
                    PageReply::Submitted(outcome)
                }
                None => PageReply::Ignored,
            },
            PageEvent::SectionsVisible(entries) => {
                tracking::track_sections(&self.analytics, &entries);
                PageReply::Handled
            }
            PageEvent::LinkClick(link) => {
                if tracking::track_link_click(&self.analytics, &link) {
                    PageReply::Handled
                } else {
                    PageReply::Ignored
                }
            }
            PageEvent::ImageVisible { id, is_intersecting } => {
                let Some(image) = self.images.iter_mut().find(|i| i.id == id) else {
                    return PageReply::Ignored;
                };
                if self.lazy.on_intersection(image, is_intersecting) {
                    PageReply::ImageLoaded(image.clone())
                } else {
                    PageReply::Ignored
                }
            }
            PageEvent::Vital(metric) => {
                vitals::track_metric(&self.analytics, &metric);
                PageReply::Handled
            }
            PageEvent::Load(timing) => {
                vitals::track_page_load(&self.analytics, &timing);
                PageReply::Handled
            }
        }
    }

    async fn on_ready(&mut self) {
        tracking::track_pageview(&self.analytics, &self.context.path, &self.context.title);

        let observed = self.lazy.observe_all(&self.images);
        debug!("Observing {} lazy images", observed);

        if let Some(registrar) = &self.registrar {
            register_worker(registrar.as_ref(), &self.worker_script, &self.context.hostname).await;
        }
    }

    fn with_nav(&mut self, f: impl FnOnce(&mut MobileNav)) -> PageReply {
        match self.nav.as_mut() {
            Some(nav) => {
                f(nav);
                PageReply::Handled
            }
            None => PageReply::Ignored,
        }
    }
}
