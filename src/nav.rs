use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Vertical offset (from the top of the viewport) that a section must cross
/// to be considered the active one.
pub const ACTIVATION_LINE_PX: f64 = 100.0;

/// Scroll offset after which the header switches to its translucent style.
pub const SCROLLED_THRESHOLD_PX: f64 = 20.0;

/// Scroll offset after which the back-to-top button is shown.
pub const BACK_TO_TOP_THRESHOLD_PX: f64 = 300.0;

/// A navigation entry pointing at an in-page section
///
/// The list of nav items is fixed for the lifetime of a page and its order
/// is the display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Element id of the section this entry scrolls to
    pub anchor_id: String,

    /// Text shown in the navigation bar
    pub label: String,
}

impl NavItem {
    pub fn new(anchor_id: impl Into<String>, label: impl Into<String>) -> Self {
        NavItem {
            anchor_id: anchor_id.into(),
            label: label.into(),
        }
    }

    /// Fragment link for the section, e.g. `#news`
    pub fn href(&self) -> String {
        format!("#{}", self.anchor_id)
    }
}

/// The navigation entries used when the data file does not configure any.
pub fn default_nav_items() -> Vec<NavItem> {
    vec![
        NavItem::new("news", "News"),
        NavItem::new("projects", "Projects"),
        NavItem::new("publications", "Publications"),
        NavItem::new("experience", "Experience"),
    ]
}

/// Raw scroll metrics sampled from the display surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    /// Distance scrolled from the top of the document
    pub scroll_top_px: f64,

    /// Height of the visible viewport
    pub viewport_height_px: f64,

    /// Full height of the document content
    pub document_height_px: f64,
}

impl ScrollState {
    pub fn new(scroll_top_px: f64, viewport_height_px: f64, document_height_px: f64) -> Self {
        ScrollState {
            scroll_top_px,
            viewport_height_px,
            document_height_px,
        }
    }
}

/// Bounding box of an anchor element relative to the viewport
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    pub top: f64,
    pub bottom: f64,
}

impl AnchorRect {
    pub fn new(top: f64, bottom: f64) -> Self {
        AnchorRect { top, bottom }
    }

    /// Whether the box straddles a horizontal line at `line_px`
    pub fn crosses(&self, line_px: f64) -> bool {
        self.top <= line_px && self.bottom >= line_px
    }
}

/// Source of live anchor geometry
///
/// Returns `None` when the anchor is not present in the rendered page.
pub trait AnchorRectProvider {
    fn anchor_rect(&self, anchor_id: &str) -> Option<AnchorRect>;
}

impl<F> AnchorRectProvider for F
where
    F: Fn(&str) -> Option<AnchorRect>,
{
    fn anchor_rect(&self, anchor_id: &str) -> Option<AnchorRect> {
        self(anchor_id)
    }
}

impl AnchorRectProvider for HashMap<String, AnchorRect> {
    fn anchor_rect(&self, anchor_id: &str) -> Option<AnchorRect> {
        self.get(anchor_id).copied()
    }
}

/// Receiver of smooth-scroll requests
pub trait ScrollDriver {
    /// Bring the top edge of `anchor_id` to the top of the viewport
    fn smooth_scroll_to_anchor(&mut self, anchor_id: &str);

    /// Scroll back to the very top of the page
    fn smooth_scroll_to_top(&mut self);
}

/// Mobile menu state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    pub fn toggled(self) -> Self {
        match self {
            MenuState::Closed => MenuState::Open,
            MenuState::Open => MenuState::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, MenuState::Open)
    }
}

/// Everything the rendering layer needs to draw the navigation chrome
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedUiState {
    /// Width of the progress bar, always within `[0, 100]`
    pub scroll_progress_percent: f64,

    /// Anchor whose nav entry should be highlighted
    pub active_anchor_id: Option<String>,

    /// Page scrolled past the header threshold
    pub is_past_threshold: bool,

    /// Back-to-top button visible
    pub show_back_to_top: bool,

    pub is_mobile_menu_open: bool,
}

/// Compute how far the page has been scrolled as a percentage
///
/// Content that fits in the viewport (or degenerate, non-finite geometry)
/// always yields `0`. Overscroll is clamped into `[0, 100]`.
///
/// # Arguments
/// * `scroll` - Sampled scroll metrics
///
/// # Returns
/// * `f64` - Percentage of the scrollable range traversed
///
/// # Examples
/// ```
/// use portfolio::nav::{ScrollState, compute_scroll_progress};
///
/// assert_eq!(compute_scroll_progress(&ScrollState::new(400.0, 800.0, 1600.0)), 50.0);
/// assert_eq!(compute_scroll_progress(&ScrollState::new(0.0, 800.0, 800.0)), 0.0);
/// ```
pub fn compute_scroll_progress(scroll: &ScrollState) -> f64 {
    let scrollable = scroll.document_height_px - scroll.viewport_height_px;
    if !(scrollable > 0.0) || !scroll.scroll_top_px.is_finite() {
        return 0.0;
    }

    let percent = 100.0 * scroll.scroll_top_px / scrollable;
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Find the first nav item whose section crosses the activation line
///
/// Items are tested in their configured order, so when two boxes straddle
/// the line the earlier one wins. Anchors the provider cannot find are
/// skipped.
///
/// # Arguments
/// * `nav_items` - Navigation entries in display order
/// * `provider` - Lookup for each anchor's current bounding box
///
/// # Returns
/// * `Option<&str>` - The matching anchor id, or `None` when no section crosses the line
pub fn compute_active_anchor<'a, P>(nav_items: &'a [NavItem], provider: &P) -> Option<&'a str>
where
    P: AnchorRectProvider + ?Sized,
{
    nav_items
        .iter()
        .find(|item| {
            provider
                .anchor_rect(&item.anchor_id)
                .is_some_and(|rect| rect.crosses(ACTIVATION_LINE_PX))
        })
        .map(|item| item.anchor_id.as_str())
}

/// Scroll-derived navigation state for one mounted page
///
/// Owned by the page that renders the navigation bar; created when the page
/// mounts and dropped when it unmounts.
#[derive(Clone, Debug)]
pub struct NavigationController {
    nav_items: Vec<NavItem>,
    active_anchor_id: Option<String>,
    scroll_progress_percent: f64,
    is_past_threshold: bool,
    show_back_to_top: bool,
    menu: MenuState,
}

impl NavigationController {
    pub fn new(nav_items: Vec<NavItem>) -> Self {
        NavigationController {
            nav_items,
            active_anchor_id: None,
            scroll_progress_percent: 0.0,
            is_past_threshold: false,
            show_back_to_top: false,
            menu: MenuState::Closed,
        }
    }

    pub fn nav_items(&self) -> &[NavItem] {
        &self.nav_items
    }

    /// Recompute everything from a new scroll sample
    ///
    /// Called on mount and on every scroll or resize notification. When no
    /// section crosses the activation line the previously active anchor is
    /// kept.
    ///
    /// # Arguments
    /// * `scroll` - Fresh scroll metrics
    /// * `provider` - Lookup for anchor geometry
    ///
    /// # Returns
    /// * `DerivedUiState` - Snapshot for the rendering layer
    pub fn on_scroll<P>(&mut self, scroll: &ScrollState, provider: &P) -> DerivedUiState
    where
        P: AnchorRectProvider + ?Sized,
    {
        self.scroll_progress_percent = compute_scroll_progress(scroll);
        self.is_past_threshold = scroll.scroll_top_px > SCROLLED_THRESHOLD_PX;
        self.show_back_to_top = scroll.scroll_top_px > BACK_TO_TOP_THRESHOLD_PX;

        if let Some(anchor) = compute_active_anchor(&self.nav_items, provider) {
            if self.active_anchor_id.as_deref() != Some(anchor) {
                log::debug!("active section changed to {}", anchor);
                self.active_anchor_id = Some(anchor.to_string());
            }
        }

        self.state()
    }

    /// Current snapshot without recomputation
    pub fn state(&self) -> DerivedUiState {
        DerivedUiState {
            scroll_progress_percent: self.scroll_progress_percent,
            active_anchor_id: self.active_anchor_id.clone(),
            is_past_threshold: self.is_past_threshold,
            show_back_to_top: self.show_back_to_top,
            is_mobile_menu_open: self.menu.is_open(),
        }
    }

    pub fn active_anchor_id(&self) -> Option<&str> {
        self.active_anchor_id.as_deref()
    }

    pub fn is_active(&self, anchor_id: &str) -> bool {
        self.active_anchor_id.as_deref() == Some(anchor_id)
    }

    pub fn menu(&self) -> MenuState {
        self.menu
    }

    /// Flip the mobile menu and return whether it is now open
    pub fn toggle_mobile_menu(&mut self) -> bool {
        self.menu = self.menu.toggled();
        self.menu.is_open()
    }

    /// Force the mobile menu closed. Idempotent.
    pub fn close_mobile_menu(&mut self) {
        self.menu = MenuState::Closed;
    }

    /// Request a smooth scroll to an anchor
    ///
    /// Missing anchors are ignored. This never touches controller state.
    ///
    /// # Returns
    /// * `bool` - Whether a scroll was requested
    pub fn navigate_to_anchor<P, D>(&self, anchor_id: &str, provider: &P, driver: &mut D) -> bool
    where
        P: AnchorRectProvider + ?Sized,
        D: ScrollDriver + ?Sized,
    {
        if provider.anchor_rect(anchor_id).is_none() {
            log::debug!("ignoring navigation to missing anchor {}", anchor_id);
            return false;
        }
        driver.smooth_scroll_to_anchor(anchor_id);
        true
    }

    /// Handle a click on a nav entry: scroll there and close the menu
    pub fn select_nav_item<P, D>(&mut self, anchor_id: &str, provider: &P, driver: &mut D) -> bool
    where
        P: AnchorRectProvider + ?Sized,
        D: ScrollDriver + ?Sized,
    {
        let scrolled = self.navigate_to_anchor(anchor_id, provider, driver);
        self.close_mobile_menu();
        scrolled
    }

    /// Handle the back-to-top button
    pub fn back_to_top<D>(&mut self, driver: &mut D)
    where
        D: ScrollDriver + ?Sized,
    {
        driver.smooth_scroll_to_top();
        self.close_mobile_menu();
    }
}
