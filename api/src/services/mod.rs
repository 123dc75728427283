// Business logic service implementations

pub mod boost_query_service;
pub mod boost_service;
pub mod checkout_service;
pub mod health;
pub mod redirect;
pub mod session_hash;
