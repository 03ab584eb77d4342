pub mod client;
pub mod esios;
pub mod price_provider;
