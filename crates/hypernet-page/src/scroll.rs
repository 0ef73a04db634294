/// Height of the fixed navbar; anchors land just below it
pub const NAVBAR_OFFSET: f64 = 80.0;

/// Element positions, as far as scrolling cares
#[cfg_attr(test, mockall::automock)]
pub trait Layout: Send {
    /// Document offset of the element with this id, if it exists
    fn offset_top(&self, id: &str) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTo {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

/// Where an in-page anchor click should scroll to
///
/// `None` means leave the click alone: not an in-page anchor, a bare `#`,
/// or a target that isn't on the page.
pub fn anchor_scroll(href: &str, layout: &dyn Layout) -> Option<ScrollTo> {
    let id = href.strip_prefix('#')?;
    if id.is_empty() {
        return None;
    }

    let offset = layout.offset_top(id)?;
    Some(ScrollTo {
        top: offset - NAVBAR_OFFSET,
        behavior: ScrollBehavior::Smooth,
    })
}
