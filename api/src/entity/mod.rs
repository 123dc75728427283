//! Entity module for database models

pub mod boost_checkouts;
pub mod boost_receipts;
pub mod events;
pub mod notifications;
