//! Employee performance points and grading engine.
//!
//! This crate grades employees' work metrics into A–E letter grades using a
//! configurable scoring model (weighted metrics, threshold bonuses and
//! penalties, and bonuses gated on auxiliary metrics), and keeps the records
//! around it: departments, employees, work logs, points, notifications,
//! attachments and targets.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod scoring;
pub mod store;
