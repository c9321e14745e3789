//! UI components for Docsmith

pub mod create;
pub mod documents;
pub mod editor;
pub mod header;
pub mod home;
pub mod preview;
pub mod sidebar;
