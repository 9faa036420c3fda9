pub mod config;
pub mod csv;
pub mod response;
pub mod service_clients;
