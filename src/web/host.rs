//! [`Host`] over the browser DOM.

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use crate::error::{Result, StickyError};
use crate::geometry::{Frame, Rect};
use crate::host::{Host, StyleSink};

// `scrollLeft`/`scrollTop` are fractional on high-DPI displays; the typed
// getters round them.
fn scroll_left_f64(element: &Element) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollLeft"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::from(element.scroll_left()))
}

fn scroll_top_f64(element: &Element) -> f64 {
    Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(f64::from(element.scroll_top()))
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// The live document.
#[derive(Debug, Clone)]
pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    /// Bind to the global window and document.
    ///
    /// # Errors
    /// Returns [`StickyError::Dom`] outside a browser main thread.
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| StickyError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| StickyError::Dom("no document".into()))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl StyleSink for DomHost {
    type Node = Element;

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }

    fn remove_style(&self, node: &Element, property: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.style().remove_property(property);
        }
    }

    fn scroll_to(&self, node: &Element, x: f64, y: f64) {
        node.scroll_to_with_x_and_y(x, y);
    }
}

impl Host for DomHost {
    fn client_rect(&self, node: &Element) -> Option<Rect> {
        if !node.is_connected() {
            return None;
        }
        let r = node.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
    }

    fn frame(&self, container: Option<&Element>) -> Frame {
        match container {
            Some(el) => {
                let r = el.get_bounding_client_rect();
                Frame {
                    origin_x: r.left() + f64::from(el.client_left()),
                    origin_y: r.top() + f64::from(el.client_top()),
                    scroll_x: scroll_left_f64(el),
                    scroll_y: scroll_top_f64(el),
                }
            }
            None => {
                let (inset_x, inset_y) = self
                    .document
                    .document_element()
                    .map_or((0.0, 0.0), |root| {
                        (f64::from(root.client_left()), f64::from(root.client_top()))
                    });
                Frame {
                    origin_x: inset_x,
                    origin_y: inset_y,
                    scroll_x: self.window.scroll_x().unwrap_or(0.0),
                    scroll_y: self.window.scroll_y().unwrap_or(0.0),
                }
            }
        }
    }

    fn scroll_left(&self, node: &Element) -> f64 {
        scroll_left_f64(node)
    }

    fn inline_style(&self, node: &Element, property: &str) -> Option<String> {
        node.dyn_ref::<HtmlElement>()
            .and_then(|el| el.style().get_property_value(property).ok())
            .filter(|value| !value.is_empty())
    }

    fn query_first(&self, scope: Option<&Element>, selector: &str) -> Option<Element> {
        match scope {
            Some(el) => el.query_selector(selector).ok().flatten(),
            None => self.document.query_selector(selector).ok().flatten(),
        }
    }

    fn query_all(&self, scope: Option<&Element>, selector: &str) -> Vec<Element> {
        let list = match scope {
            Some(el) => el.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        };
        list.map(|l| elements(&l)).unwrap_or_default()
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn first_element_child(&self, node: &Element) -> Option<Element> {
        node.first_element_child()
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn deep_clone(&self, node: &Element) -> Option<Element> {
        node.clone_node_with_deep(true)
            .ok()
            .and_then(|copy| copy.dyn_into::<Element>().ok())
    }

    fn insert_after(&self, anchor: &Element, node: &Element) {
        let _ = anchor.insert_adjacent_element("afterend", node);
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn remove_attribute(&self, node: &Element, name: &str) {
        let _ = node.remove_attribute(name);
    }
}
