//! HTTP request handlers

pub mod catalog;
pub mod chat;
pub mod health;
pub mod notes;
pub mod settings;
pub mod speech;
