use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures at the JavaScript boundary. Rendering itself cannot fail.
pub enum IndicatorError {
    /// The options object did not match the expected shape.
    #[error("invalid activity indicator options: {0}")]
    InvalidOptions(String),
    /// The mount target has no owner document.
    #[error("mount target is not attached to a document")]
    MissingDocument,
    /// A DOM call threw.
    #[error("dom operation failed: {0}")]
    Dom(String),
}

impl IndicatorError {
    pub(crate) fn dom(err: JsValue) -> Self {
        Self::Dom(format!("{err:?}"))
    }
}

impl From<IndicatorError> for JsValue {
    fn from(err: IndicatorError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
