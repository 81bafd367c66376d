//! HTTP handlers

pub mod token;
pub mod meeting;
pub mod dialog;
pub mod voice_bot;
pub mod messages;
pub mod health;
pub mod fallback;
