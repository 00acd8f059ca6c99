pub mod models;
pub mod payloads;
pub mod ports;
pub mod service;
