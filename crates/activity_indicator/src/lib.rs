//! Multi-bar loading spinner primitive.
//!
//! The crate owns a pure render model ([`IndicatorConfig`] to [`MarkupNode`]), the Leptos
//! [`ActivityIndicator`] component built on it, `wasm-bindgen` exports for JavaScript hosts, and
//! the default stylesheet consumed by the emitted class contract. Rendering never fails: an
//! unrecognized size falls back to no size class and unusable passthrough attributes are dropped
//! with a console warning.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bindings;
mod component;
mod configuration;
mod error;
mod indicator;
mod markup;
mod style;
mod tokens;

pub use bindings::{
    activity_indicator_configuration, mount_activity_indicator, render_activity_indicator,
};
pub use component::ActivityIndicator;
pub use configuration::{IndicatorConfiguration, CONFIGURATION, NOMINAL_BLADE_COUNT};
pub use error::IndicatorError;
pub use indicator::{IndicatorConfig, IndicatorOptions, OptionValue};
pub use markup::MarkupNode;
pub use style::StyleMap;
pub use tokens::{
    IndicatorSize, BAR_CLASS, COLOR_PROPERTY, CONTAINER_CLASS, RENDERED_BAR_COUNT, SPINNER_CLASS,
};

/// Default stylesheet for the indicator class contract.
pub const STYLESHEET: &str = include_str!("../style/activity_indicator.css");

/// Convenience imports for crates rendering the indicator.
pub mod prelude {
    pub use crate::{ActivityIndicator, IndicatorConfig, IndicatorSize, StyleMap};
}
