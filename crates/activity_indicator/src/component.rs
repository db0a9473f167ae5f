use leptos::*;

use crate::indicator::IndicatorConfig;
use crate::markup::MarkupNode;
use crate::style::StyleMap;
use crate::tokens::IndicatorSize;

#[component]
/// Multi-bar loading spinner.
///
/// Bar rotation and fading come from the stylesheet ([`STYLESHEET`](crate::STYLESHEET)); the
/// component only emits the class contract and the bar elements.
pub fn ActivityIndicator(
    /// Visual scale.
    #[prop(default = IndicatorSize::Medium)]
    size: IndicatorSize,
    /// Bar color, applied through the `--spinner-color` custom property.
    #[prop(optional, into)]
    color: Option<String>,
    /// Extra classes appended after the generated ones.
    #[prop(optional, into)]
    layout_class: Option<String>,
    /// Inline style declarations, merged under the color override.
    #[prop(optional, into)]
    style: Option<String>,
    /// Root element id.
    #[prop(optional, into)]
    id: Option<String>,
    /// Root ARIA role.
    #[prop(optional, into)]
    role: Option<String>,
    /// Root accessible label.
    #[prop(optional, into)]
    aria_label: Option<String>,
    /// Root tooltip text.
    #[prop(optional, into)]
    title: Option<String>,
    /// Shell slot name emitted as `data-ui-slot`.
    #[prop(optional)]
    ui_slot: Option<&'static str>,
    /// Extra root attributes, passed through unmodified.
    #[prop(optional)]
    attributes: Vec<(String, String)>,
) -> impl IntoView {
    let config = IndicatorProps {
        size,
        color,
        layout_class,
        style,
        id,
        role,
        aria_label,
        title,
        ui_slot,
        attributes,
    }
    .into_config();

    element_view(&config.render())
}

/// Builder-syntax element for a rendered node. `style` goes through `.style()` one property at
/// a time so each declaration is set with `setProperty`.
fn element_view(node: &MarkupNode) -> HtmlElement<html::Custom> {
    let element = node.attributes().iter().fold(
        html::custom(html::Custom::new(node.tag())),
        |element, (name, value)| {
            if name == "style" {
                StyleMap::parse_inline(value)
                    .iter()
                    .fold(element, |element, (property, value)| {
                        element.style(property.to_string(), value.to_string())
                    })
            } else {
                element.attr(name.clone(), value.clone())
            }
        },
    );
    node.children()
        .iter()
        .fold(element, |element, child| element.child(element_view(child)))
}

struct IndicatorProps {
    size: IndicatorSize,
    color: Option<String>,
    layout_class: Option<String>,
    style: Option<String>,
    id: Option<String>,
    role: Option<String>,
    aria_label: Option<String>,
    title: Option<String>,
    ui_slot: Option<&'static str>,
    attributes: Vec<(String, String)>,
}

impl IndicatorProps {
    fn into_config(self) -> IndicatorConfig {
        let mut config = IndicatorConfig::new().size(self.size);
        config.color = self.color;
        config.class_name = self.layout_class;
        config.style = self
            .style
            .as_deref()
            .map(StyleMap::parse_inline)
            .unwrap_or_default();

        let typed = [
            ("id", self.id),
            ("role", self.role),
            ("aria-label", self.aria_label),
            ("title", self.title),
            ("data-ui-slot", self.ui_slot.map(str::to_string)),
        ];
        for (name, value) in typed {
            if let Some(value) = value {
                config = config.attribute(name, value);
            }
        }
        for (name, value) in self.attributes {
            config = config.attribute(name, value);
        }
        config
    }
}
