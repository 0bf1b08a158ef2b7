//! Opal desktop shell.
//!
//! Wires the tray controller, the about actions and the UI loop together.
//! Window presentation is left to a front end; this crate only provides
//! the behaviour behind it.

pub mod about;
pub mod alert;
pub mod app;
pub mod config;
pub mod i18n;
pub mod listener;
pub mod opener;
