//! Flutter-facing bridge for the Dex widget.

pub mod api;
pub mod layout;
