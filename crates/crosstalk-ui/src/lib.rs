//! UI-thread endpoint for crosstalk channels.
//!
//! [`UiEndpoint`] sends user gestures (edit begin/change/end, note on/off,
//! custom messages) to the engine and, on each [`tick`](UiEndpoint::tick),
//! drains engine messages into a [`DispatchTable`] of widget callbacks.
//! Parameter echoes for a control the user is currently dragging are
//! suppressed.
//!
//! Enable the `webview` feature for the JSON command bridge used by
//! web-based editors.

pub mod edit;
pub mod endpoint;
pub mod error;
pub mod plot;
pub mod table;
#[cfg(feature = "webview")]
pub mod webview;

pub use edit::EditState;
pub use endpoint::{TickReport, UiEndpoint};
pub use error::{Error, Result};
pub use plot::PlotBuffer;
pub use table::DispatchTable;
#[cfg(feature = "webview")]
pub use webview::{
    handle_json, params_json, script_for, script_for_json, WebViewCommand, JSON_MSG_TAG,
};
