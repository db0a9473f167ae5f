//! Class names, DOM contract attributes, and size tokens shared by every renderer.

/// Class applied to the root container.
pub const CONTAINER_CLASS: &str = "ui-activity-indicator";
/// Class applied to the single wrapper that holds the bars.
pub const SPINNER_CLASS: &str = "ui-activity-indicator-spinner";
/// Class applied to every bar leaf.
pub const BAR_CLASS: &str = "ui-activity-indicator-bar";
/// Custom property consumed by the stylesheet for the bar color.
pub const COLOR_PROPERTY: &str = "--spinner-color";
/// Number of bar elements emitted by every render.
pub const RENDERED_BAR_COUNT: usize = 12;

pub(crate) const KIND: &str = "activity-indicator";

/// Root attribute names the component always owns. Passthrough values for these are dropped.
pub(crate) const RESERVED_ATTRIBUTES: [&str; 5] = [
    "class",
    "style",
    "data-ui-primitive",
    "data-ui-kind",
    "data-ui-size",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
/// Visual scale of the indicator.
pub enum IndicatorSize {
    /// Compact inline spinner.
    Small,
    /// Default spinner.
    #[default]
    Medium,
    /// Page-level spinner.
    Large,
}

impl IndicatorSize {
    /// Every size, smallest first.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Stable token used by `data-ui-size` and by JavaScript options.
    pub fn token(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Size-specific class. Exactly one of these lands on a root with a recognized size.
    pub fn class(self) -> &'static str {
        match self {
            Self::Small => "ui-activity-indicator--small",
            Self::Medium => "ui-activity-indicator--medium",
            Self::Large => "ui-activity-indicator--large",
        }
    }

    /// Exact, case-sensitive token lookup.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.token() == token)
    }
}

/// HTML attribute names are ASCII case-insensitive; `CLASS` would overwrite `class`.
pub(crate) fn is_reserved_attribute(name: &str) -> bool {
    RESERVED_ATTRIBUTES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Accepts names the HTML serializer and `Element::setAttribute` both take verbatim.
pub(crate) fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|ch| {
            !ch.is_whitespace()
                && !ch.is_control()
                && !matches!(ch, '"' | '\'' | '<' | '>' | '/' | '=')
        })
}
