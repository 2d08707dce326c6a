//! Yew views over the core widgets.
//!
//! Views hold no widget state of their own: every gesture is forwarded to the
//! core object and the view re-reads its state afterwards.

pub(crate) mod dialog;
pub(crate) mod navigation;
pub(crate) mod table;
