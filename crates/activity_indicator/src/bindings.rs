//! `wasm-bindgen` exports for JavaScript hosts.
//!
//! These are the entry points the packaged ESM/CommonJS artifacts expose. Options are plain
//! objects matching [`IndicatorOptions`]; `undefined` and `null` select the defaults.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::configuration::CONFIGURATION;
use crate::error::IndicatorError;
use crate::indicator::{IndicatorConfig, IndicatorOptions};
use crate::markup::MarkupNode;
use crate::style::StyleMap;

/// Render an indicator and append it to `target`. Returns the new root element.
#[wasm_bindgen(js_name = mountActivityIndicator)]
pub fn mount_activity_indicator(target: &Element, options: JsValue) -> Result<Element, JsValue> {
    let config = IndicatorConfig::from(parse_options(options)?);
    let document = target
        .owner_document()
        .ok_or(IndicatorError::MissingDocument)?;
    let root = build_element(&document, &config.render())?;
    target.append_child(&root).map_err(IndicatorError::dom)?;
    Ok(root)
}

/// Render an indicator to an HTML string.
#[wasm_bindgen(js_name = renderActivityIndicator)]
pub fn render_activity_indicator(options: JsValue) -> Result<String, JsValue> {
    let config = IndicatorConfig::from(parse_options(options)?);
    Ok(config.to_html())
}

/// The static shape descriptor as `{ numberOfBlades, iterate }`.
#[wasm_bindgen(js_name = activityIndicatorConfiguration)]
pub fn activity_indicator_configuration() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&CONFIGURATION.snapshot())
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

fn parse_options(options: JsValue) -> Result<IndicatorOptions, IndicatorError> {
    if options.is_undefined() || options.is_null() {
        return Ok(IndicatorOptions::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|err| IndicatorError::InvalidOptions(err.to_string()))
}

fn build_element(document: &Document, node: &MarkupNode) -> Result<Element, IndicatorError> {
    let element = document
        .create_element(node.tag())
        .map_err(IndicatorError::dom)?;
    for (name, value) in node.attributes() {
        if name == "style" {
            apply_style(&element, value)?;
        } else {
            element
                .set_attribute(name, value)
                .map_err(IndicatorError::dom)?;
        }
    }
    for child in node.children() {
        let child = build_element(document, child)?;
        element.append_child(&child).map_err(IndicatorError::dom)?;
    }
    Ok(element)
}

/// Sets each declaration through `CSSStyleDeclaration.setProperty` rather than writing the
/// serialized attribute.
fn apply_style(element: &Element, inline: &str) -> Result<(), IndicatorError> {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return element
            .set_attribute("style", inline)
            .map_err(IndicatorError::dom);
    };
    let style = element.style();
    for (name, value) in StyleMap::parse_inline(inline).iter() {
        style
            .set_property(name, value)
            .map_err(IndicatorError::dom)?;
    }
    Ok(())
}
