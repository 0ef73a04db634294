/// Where a document click landed, relative to the nav
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickTarget {
    pub inside_nav: bool,
    pub on_toggle: bool,
}

/// Mobile menu: the menu and its toggle button share one `active` state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MobileNav {
    pub menu_active: bool,
    pub toggle_active: bool,
}

impl MobileNav {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.menu_active
    }

    pub fn on_toggle_click(&mut self) {
        self.menu_active = !self.menu_active;
        self.toggle_active = !self.toggle_active;
    }

    /// Following a menu link always closes the menu
    pub fn on_link_click(&mut self) {
        self.close();
    }

    /// Clicking anywhere outside the menu and its toggle dismisses it
    pub fn on_document_click(&mut self, target: ClickTarget) {
        if !target.inside_nav && !target.on_toggle && self.menu_active {
            self.close();
        }
    }

    fn close(&mut self) {
        self.menu_active = false;
        self.toggle_active = false;
    }
}
