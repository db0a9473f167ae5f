//! Render model: maps an indicator configuration to its element tree.
//!
//! Every renderer (the Leptos component, the DOM mount, and static HTML) goes through
//! [`IndicatorConfig`] so class composition, the color overlay, and passthrough filtering are
//! decided in one place.

use leptos::logging::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::markup::MarkupNode;
use crate::style::{is_declaration, StyleMap};
use crate::tokens::{
    is_reserved_attribute, is_valid_attribute_name, IndicatorSize, BAR_CLASS, COLOR_PROPERTY,
    CONTAINER_CLASS, KIND, RENDERED_BAR_COUNT, SPINNER_CLASS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Per-render indicator configuration.
pub struct IndicatorConfig {
    /// Selected size. `None` stands for an unrecognized size token and renders no size class.
    pub size: Option<IndicatorSize>,
    /// Bar color override, emitted as the `--spinner-color` custom property.
    pub color: Option<String>,
    /// Caller classes appended after the generated classes.
    pub class_name: Option<String>,
    /// Caller inline style declarations.
    pub style: StyleMap,
    /// Passthrough attributes for the root element.
    pub attributes: BTreeMap<String, String>,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            size: Some(IndicatorSize::Medium),
            color: None,
            class_name: None,
            style: StyleMap::new(),
            attributes: BTreeMap::new(),
        }
    }
}

impl IndicatorConfig {
    /// Default configuration (medium, no color).
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a size.
    pub fn size(mut self, size: IndicatorSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Select a size by token; unrecognized tokens clear the size class.
    pub fn size_token(mut self, token: &str) -> Self {
        self.size = IndicatorSize::from_token(token);
        if self.size.is_none() {
            warn!("activity indicator: unrecognized size `{token}`, rendering without a size class");
        }
        self
    }

    /// Override the bar color.
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Append caller classes.
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Replace the caller style map.
    pub fn style(mut self, style: StyleMap) -> Self {
        self.style = style;
        self
    }

    /// Add one passthrough attribute.
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Root class tokens: container, size class when recognized, then caller classes.
    pub fn class_tokens(&self) -> Vec<&str> {
        let mut tokens = vec![CONTAINER_CLASS];
        if let Some(size) = self.size {
            tokens.push(size.class());
        }
        if let Some(class_name) = &self.class_name {
            tokens.extend(class_name.split_whitespace());
        }
        tokens
    }

    /// Root `class` attribute value.
    pub fn class_list(&self) -> String {
        self.class_tokens().join(" ")
    }

    /// Caller style overlaid with the color custom property.
    ///
    /// An empty color string counts as absent. Declarations whose value would end the
    /// declaration early (a top-level `;`, an unclosed quote or bracket) are dropped with a
    /// warning; this includes the color, which leaves any caller `--spinner-color` in place.
    pub fn composed_style(&self) -> StyleMap {
        let mut style: StyleMap = self
            .style
            .iter()
            .filter(|(name, value)| {
                let keep = is_declaration(name, value);
                if !keep {
                    warn!("activity indicator: ignoring style declaration `{name}: {value}`");
                }
                keep
            })
            .collect();
        if let Some(color) = self.color.as_deref().filter(|color| !color.is_empty()) {
            if is_declaration(COLOR_PROPERTY, color) {
                style.insert(COLOR_PROPERTY, color);
            } else {
                warn!("activity indicator: ignoring color `{color}`, it is not a single CSS value");
            }
        }
        style
    }

    /// Passthrough attributes that survive filtering, in name order.
    ///
    /// Names the component owns and names that are not valid attribute names are dropped with a
    /// warning.
    pub fn passthrough(&self) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .filter(|(name, _)| {
                if is_reserved_attribute(name) {
                    warn!("activity indicator: ignoring passthrough attribute `{name}` owned by the component");
                    false
                } else if !is_valid_attribute_name(name) {
                    warn!("activity indicator: ignoring invalid attribute name `{name}`");
                    false
                } else {
                    true
                }
            })
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }

    /// Root attributes in emission order: class, style, DOM contract, passthrough.
    pub fn root_attributes(&self) -> Vec<(String, String)> {
        let mut attributes = vec![("class".to_string(), self.class_list())];
        if let Some(style) = self.composed_style().to_inline() {
            attributes.push(("style".to_string(), style));
        }
        attributes.push(("data-ui-primitive".to_string(), "true".to_string()));
        attributes.push(("data-ui-kind".to_string(), KIND.to_string()));
        if let Some(size) = self.size {
            attributes.push(("data-ui-size".to_string(), size.token().to_string()));
        }
        attributes.extend(self.passthrough());
        attributes
    }

    /// Render the element tree: root container, one spinner wrapper, and its bars.
    pub fn render(&self) -> MarkupNode {
        let bars = (0..RENDERED_BAR_COUNT).map(|_| bar_node());
        MarkupNode::new("div")
            .attrs(self.root_attributes())
            .child(
                MarkupNode::new("div")
                    .attr("class", SPINNER_CLASS)
                    .children_from(bars),
            )
    }

    /// Render straight to HTML.
    pub fn to_html(&self) -> String {
        self.render().to_html()
    }
}

fn bar_node() -> MarkupNode {
    MarkupNode::new("div").attr("class", BAR_CLASS)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Indicator options as supplied by JavaScript hosts.
pub struct IndicatorOptions {
    /// Size token (`small`, `medium`, `large`). Absent means medium.
    pub size: Option<String>,
    /// Bar color override.
    pub color: Option<String>,
    /// Caller classes.
    pub class_name: Option<String>,
    /// Caller style declarations.
    pub style: BTreeMap<String, OptionValue>,
    /// Passthrough root attributes.
    pub attributes: BTreeMap<String, OptionValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// Scalar style or attribute value from a JavaScript options object.
pub enum OptionValue {
    /// Used verbatim.
    Text(String),
    /// Written the way JavaScript's `String(n)` writes it for ordinary values.
    Number(f64),
    /// `true` or `false`.
    Flag(bool),
    /// `null` or `undefined`. The entry is skipped.
    Absent,
}

impl OptionValue {
    /// Text form of the value, or `None` when the entry should be skipped.
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Number(number) => Some(number_text(number)),
            Self::Flag(flag) => Some(flag.to_string()),
            Self::Absent => None,
        }
    }
}

fn number_text(number: f64) -> String {
    if number.is_nan() {
        "NaN".to_string()
    } else if number.is_infinite() {
        let sign = if number < 0.0 { "-" } else { "" };
        format!("{sign}Infinity")
    } else if number == 0.0 {
        "0".to_string()
    } else {
        number.to_string()
    }
}

fn text_entries(entries: BTreeMap<String, OptionValue>) -> impl Iterator<Item = (String, String)> {
    entries
        .into_iter()
        .filter_map(|(name, value)| Some((name, value.into_text()?)))
}

impl From<IndicatorOptions> for IndicatorConfig {
    fn from(options: IndicatorOptions) -> Self {
        let mut config = IndicatorConfig::new();
        if let Some(token) = options.size.as_deref() {
            config = config.size_token(token);
        }
        config.color = options.color;
        config.class_name = options.class_name;
        config.style = text_entries(options.style).collect();
        config.attributes = text_entries(options.attributes).collect();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn size_classes(node: &MarkupNode) -> Vec<&str> {
        node.class_tokens()
            .into_iter()
            .filter(|token| IndicatorSize::ALL.iter().any(|size| size.class() == *token))
            .collect()
    }

    #[test]
    fn defaults_render_medium_without_color() {
        let root = IndicatorConfig::new().render();
        assert_eq!(
            root.class_tokens(),
            vec![CONTAINER_CLASS, IndicatorSize::Medium.class()]
        );
        assert_eq!(root.attribute("style"), None);
        assert_eq!(root.attribute("data-ui-size"), Some("medium"));
    }

    #[test]
    fn each_recognized_size_adds_exactly_its_class() {
        for size in IndicatorSize::ALL {
            let root = IndicatorConfig::new().size(size).render();
            assert_eq!(size_classes(&root), vec![size.class()]);
        }
    }

    #[test]
    fn unrecognized_size_renders_without_size_class() {
        let config = IndicatorConfig::new().size_token("gigantic");
        assert_eq!(config.size, None);
        let root = config.render();
        assert!(size_classes(&root).is_empty());
        assert_eq!(root.attribute("data-ui-size"), None);
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn caller_classes_are_appended_after_generated_classes() {
        let config = IndicatorConfig::new()
            .size(IndicatorSize::Small)
            .class_name("  toolbar-spinner  muted ");
        assert_eq!(
            config.class_list(),
            "ui-activity-indicator ui-activity-indicator--small toolbar-spinner muted"
        );
        assert_eq!(IndicatorConfig::new().class_name("").class_tokens().len(), 2);
    }

    #[test]
    fn color_overlays_caller_style() {
        let config = IndicatorConfig::new()
            .style(StyleMap::new().with("margin", "4px").with(COLOR_PROPERTY, "blue"))
            .color("#ff0000");
        let style = config.composed_style();
        assert_eq!(style.get("margin"), Some("4px"));
        assert_eq!(style.get(COLOR_PROPERTY), Some("#ff0000"));
    }

    #[test]
    fn empty_color_counts_as_absent() {
        let config = IndicatorConfig::new().color("");
        assert!(!config.composed_style().contains(COLOR_PROPERTY));
        assert_eq!(config.render().attribute("style"), None);
    }

    #[test]
    fn passthrough_drops_reserved_and_invalid_names() {
        let config = IndicatorConfig::new()
            .attribute("class", "hijack")
            .attribute("data-ui-kind", "button")
            .attribute("bad name", "x")
            .attribute("data-testid", "loading")
            .attribute("aria-busy", "true");
        assert_eq!(
            config.passthrough(),
            vec![
                ("aria-busy".to_string(), "true".to_string()),
                ("data-testid".to_string(), "loading".to_string()),
            ]
        );
        let root = config.render();
        assert_eq!(root.attribute("class"), Some(config.class_list().as_str()));
        assert_eq!(root.attribute("data-ui-kind"), Some(KIND));
    }

    #[test]
    fn reserved_names_are_dropped_in_any_case() {
        let config = IndicatorConfig::new()
            .attribute("CLASS", "hijack")
            .attribute("Style", "display:none")
            .attribute("Data-Ui-Size", "huge")
            .attribute("id", "busy");
        assert_eq!(
            config.passthrough(),
            vec![("id".to_string(), "busy".to_string())]
        );
        let html = config.to_html();
        assert!(!html.contains("hijack"));
        assert!(!html.contains("display:none"));
        assert!(html.starts_with(r#"<div class="ui-activity-indicator ui-activity-indicator--medium""#));
    }

    #[test]
    fn color_that_would_escape_its_declaration_is_dropped() {
        let config = IndicatorConfig::new().color("red; display: none");
        let style = config.composed_style();
        assert!(!style.contains(COLOR_PROPERTY));
        assert!(!style.contains("display"));
        assert_eq!(config.render().attribute("style"), None);

        let config = IndicatorConfig::new()
            .style(StyleMap::new().with(COLOR_PROPERTY, "gray"))
            .color("url(x");
        assert_eq!(config.composed_style().get(COLOR_PROPERTY), Some("gray"));
    }

    #[test]
    fn caller_style_declarations_that_escape_are_dropped() {
        let config = IndicatorConfig::new().style(
            StyleMap::new()
                .with("margin", "0; position: fixed")
                .with("background", r#"url("data:image/png;base64,AA")"#),
        );
        let style = config.composed_style();
        assert_eq!(style.get("margin"), None);
        assert_eq!(
            style.get("background"),
            Some(r#"url("data:image/png;base64,AA")"#)
        );
        let root = config.render();
        let reparsed = StyleMap::parse_inline(root.attribute("style").unwrap_or_default());
        assert_eq!(reparsed, style);
    }

    #[test]
    fn render_emits_one_wrapper_with_twelve_empty_bars() {
        let root = IndicatorConfig::new().render();
        assert_eq!(root.children().len(), 1);
        let spinner = &root.children()[0];
        assert_eq!(spinner.class_tokens(), vec![SPINNER_CLASS]);
        assert_eq!(spinner.children().len(), RENDERED_BAR_COUNT);
        for bar in spinner.children() {
            assert_eq!(bar.class_tokens(), vec![BAR_CLASS]);
            assert!(bar.children().is_empty());
        }
    }

    #[test]
    fn options_map_absent_size_to_medium_and_unknown_size_to_none() {
        let config = IndicatorConfig::from(IndicatorOptions::default());
        assert_eq!(config.size, Some(IndicatorSize::Medium));

        let config = IndicatorConfig::from(IndicatorOptions {
            size: Some("xl".to_string()),
            ..IndicatorOptions::default()
        });
        assert_eq!(config.size, None);
    }

    #[test]
    fn options_accept_scalar_style_and_attribute_values() {
        let options: IndicatorOptions = serde_json::from_value(serde_json::json!({
            "style": { "opacity": 0.5, "zIndex": 3, "margin": "0" },
            "attributes": {
                "aria-hidden": true,
                "tabIndex": 0,
                "data-progress": -2.5,
                "data-missing": null
            }
        }))
        .expect("deserialize scalar options");
        let config = IndicatorConfig::from(options);
        assert_eq!(config.style.get("opacity"), Some("0.5"));
        assert_eq!(config.style.get("zIndex"), Some("3"));
        assert_eq!(config.style.get("margin"), Some("0"));
        assert_eq!(
            config.passthrough(),
            vec![
                ("aria-hidden".to_string(), "true".to_string()),
                ("data-progress".to_string(), "-2.5".to_string()),
                ("tabIndex".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn numbers_are_written_like_javascript_strings() {
        let text = |number: f64| OptionValue::Number(number).into_text();
        assert_eq!(text(12.0).as_deref(), Some("12"));
        assert_eq!(text(-0.0).as_deref(), Some("0"));
        assert_eq!(text(0.25).as_deref(), Some("0.25"));
        assert_eq!(text(f64::INFINITY).as_deref(), Some("Infinity"));
        assert_eq!(text(f64::NAN).as_deref(), Some("NaN"));
        assert_eq!(OptionValue::Absent.into_text(), None);
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let options: IndicatorOptions = serde_json::from_value(serde_json::json!({
            "size": "small",
            "color": "teal",
            "className": "inline",
            "style": { "margin": "0" },
            "attributes": { "data-testid": "spinner" }
        }))
        .expect("deserialize options");
        let config = IndicatorConfig::from(options);
        assert_eq!(config.size, Some(IndicatorSize::Small));
        assert_eq!(config.color.as_deref(), Some("teal"));
        assert_eq!(config.class_name.as_deref(), Some("inline"));
        assert_eq!(config.style.get("margin"), Some("0"));
        assert_eq!(
            config.attributes.get("data-testid").map(String::as_str),
            Some("spinner")
        );
    }
}
