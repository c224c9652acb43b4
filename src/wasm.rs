use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, ScrollToOptions, Window,
};

use crate::binding::{ListenerGuard, ListenerTarget, NavigationBinding, SCROLL_EVENTS};
use crate::nav::{
    AnchorRect, AnchorRectProvider, DerivedUiState, NavItem, ScrollDriver, ScrollState,
    default_nav_items,
};
use crate::theme::{DARK_CLASS, PREFERS_DARK_QUERY, THEME_STORAGE_KEY, Theme, ThemeToggle};

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

fn document(window: &Window) -> Result<Document, JsValue> {
    window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// Section geometry read from the live DOM
struct DomAnchors<'a> {
    document: &'a Document,
}

impl AnchorRectProvider for DomAnchors<'_> {
    fn anchor_rect(&self, anchor_id: &str) -> Option<AnchorRect> {
        let element = self.document.get_element_by_id(anchor_id)?;
        let rect = element.get_bounding_client_rect();
        Some(AnchorRect::new(rect.top(), rect.bottom()))
    }
}

/// Smooth scrolling through the browser's native APIs
struct DomScroller<'a> {
    window: &'a Window,
    document: &'a Document,
}

impl ScrollDriver for DomScroller<'_> {
    fn smooth_scroll_to_anchor(&mut self, anchor_id: &str) {
        if let Some(element) = self.document.get_element_by_id(anchor_id) {
            let options = ScrollIntoViewOptions::new();
            options.set_behavior(ScrollBehavior::Smooth);
            options.set_block(ScrollLogicalPosition::Start);
            element.scroll_into_view_with_scroll_into_view_options(&options);
        }
    }

    fn smooth_scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}

fn sample_scroll(window: &Window, document: &Document) -> ScrollState {
    let scroll_top = window.scroll_y().unwrap_or(0.0);
    let viewport = window
        .inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0);
    let content = document
        .document_element()
        .map(|root| root.scroll_height() as f64)
        .unwrap_or(0.0);
    ScrollState::new(scroll_top, viewport, content)
}

type Binding = NavigationBinding<Box<dyn Fn(&DerivedUiState)>>;

/// Forwards each state to the JS observer as a plain object
fn js_observer(on_change: js_sys::Function) -> Box<dyn Fn(&DerivedUiState)> {
    Box::new(move |state: &DerivedUiState| {
        let published = serde_json::to_string(state)
            .map_err(|e| JsValue::from_str(&e.to_string()))
            .and_then(|json| js_sys::JSON::parse(&json))
            .and_then(|value| on_change.call1(&JsValue::NULL, &value));
        if let Err(err) = published {
            web_sys::console::error_1(&err);
        }
    })
}

fn refresh(binding: &Binding) -> Result<(), JsValue> {
    let window = window()?;
    let document = document(&window)?;
    let scroll = sample_scroll(&window, &document);
    binding.update(|c| {
        c.on_scroll(&scroll, &DomAnchors { document: &document });
    });
    Ok(())
}

/// The browser window as a listener target
struct WindowEvents(Window);

impl ListenerTarget for WindowEvents {
    type Callback = Closure<dyn FnMut()>;
    type Error = JsValue;

    fn add_listener(&self, event: &str, callback: &Self::Callback) -> Result<(), JsValue> {
        self.0
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
    }

    fn remove_listener(&self, event: &str, callback: &Self::Callback) {
        let _ = self
            .0
            .remove_event_listener_with_callback(event, callback.as_ref().unchecked_ref());
    }
}

/// Navigation controller bound to the page's scroll and resize events
///
/// Every change is reported to the `on_change` callback as a plain object
/// mirroring the derived UI state. The callback runs with no borrow held, so
/// it may call back into the handle. Listeners are removed on `detach` or
/// when the handle is freed.
#[wasm_bindgen]
pub struct NavigationHandle {
    binding: Rc<Binding>,
    listeners: RefCell<Option<ListenerGuard<WindowEvents>>>,
}

#[wasm_bindgen]
impl NavigationHandle {
    /// `nav_items_json` is the serialized nav list; empty means the defaults
    #[wasm_bindgen(constructor)]
    pub fn new(nav_items_json: &str, on_change: js_sys::Function) -> Result<NavigationHandle, JsValue> {
        let nav_items: Vec<NavItem> = if nav_items_json.trim().is_empty() {
            default_nav_items()
        } else {
            serde_json::from_str(nav_items_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        Ok(NavigationHandle {
            binding: Rc::new(NavigationBinding::new(nav_items, js_observer(on_change))),
            listeners: RefCell::new(None),
        })
    }

    /// Start listening and publish the current state. Attaching twice is a
    /// no-op apart from the refresh.
    pub fn attach(&self) -> Result<(), JsValue> {
        if self.listeners.borrow().is_none() {
            let binding = Rc::clone(&self.binding);
            let callback = Closure::<dyn FnMut()>::new(move || {
                if let Err(err) = refresh(&binding) {
                    web_sys::console::error_1(&err);
                }
            });
            let guard = ListenerGuard::attach(WindowEvents(window()?), &SCROLL_EVENTS, callback)?;
            *self.listeners.borrow_mut() = Some(guard);
        }
        refresh(&self.binding)
    }

    /// Stop listening. Safe to call more than once.
    pub fn detach(&self) {
        let guard = self.listeners.borrow_mut().take();
        drop(guard);
    }

    #[wasm_bindgen(js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.listeners.borrow().is_some()
    }

    /// Recompute from the current scroll position
    pub fn refresh(&self) -> Result<(), JsValue> {
        refresh(&self.binding)
    }

    #[wasm_bindgen(js_name = toggleMenu)]
    pub fn toggle_menu(&self) -> bool {
        self.binding.update(|c| c.toggle_mobile_menu())
    }

    #[wasm_bindgen(js_name = closeMenu)]
    pub fn close_menu(&self) {
        self.binding.update(|c| c.close_mobile_menu());
    }

    /// Nav entry clicked: scroll to its section and close the menu
    pub fn select(&self, anchor_id: &str) -> Result<bool, JsValue> {
        let window = window()?;
        let document = document(&window)?;
        Ok(self.binding.update(|c| {
            c.select_nav_item(
                anchor_id,
                &DomAnchors { document: &document },
                &mut DomScroller {
                    window: &window,
                    document: &document,
                },
            )
        }))
    }

    #[wasm_bindgen(js_name = backToTop)]
    pub fn back_to_top(&self) -> Result<(), JsValue> {
        let window = window()?;
        let document = document(&window)?;
        self.binding.update(|c| {
            c.back_to_top(&mut DomScroller {
                window: &window,
                document: &document,
            })
        });
        Ok(())
    }

    #[wasm_bindgen(js_name = activeAnchor)]
    pub fn active_anchor(&self) -> Option<String> {
        self.binding
            .read(|c| c.active_anchor_id().map(str::to_string))
    }
}

/// Theme toggle backed by `localStorage` and the `dark` root class
#[wasm_bindgen]
pub struct ThemeHandle {
    toggle: ThemeToggle,
}

#[wasm_bindgen]
impl ThemeHandle {
    #[wasm_bindgen(constructor)]
    pub fn new() -> ThemeHandle {
        ThemeHandle {
            toggle: ThemeToggle::new(),
        }
    }

    /// Resolve the initial theme, apply it and return its name
    pub fn mount(&mut self) -> Result<String, JsValue> {
        let window = window()?;
        let stored = window
            .local_storage()?
            .and_then(|storage| storage.get_item(THEME_STORAGE_KEY).ok().flatten());
        let prefers_dark = window
            .match_media(PREFERS_DARK_QUERY)?
            .map(|query| query.matches())
            .unwrap_or(false);

        let theme = self.toggle.mount(stored.as_deref(), prefers_dark);
        apply_theme(&window, theme)?;
        Ok(theme.as_str().to_string())
    }

    /// Flip, persist and apply the theme
    pub fn toggle(&mut self) -> Result<String, JsValue> {
        let window = window()?;
        let theme = self.toggle.toggle();
        if let Some(storage) = window.local_storage()? {
            storage.set_item(THEME_STORAGE_KEY, theme.as_str())?;
        }
        apply_theme(&window, theme)?;
        Ok(theme.as_str().to_string())
    }

    #[wasm_bindgen(js_name = ariaLabel)]
    pub fn aria_label(&self) -> String {
        self.toggle.aria_label().to_string()
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.toggle.is_mounted()
    }
}

impl Default for ThemeHandle {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_theme(window: &Window, theme: Theme) -> Result<(), JsValue> {
    if let Some(root) = document(window)?.document_element() {
        root.class_list()
            .toggle_with_force(DARK_CLASS, theme.is_dark())?;
    }
    Ok(())
}
