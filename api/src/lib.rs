// Viao boost API library: payment reconciliation, checkout creation and boost read paths

pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod payments;
pub mod services;
