pub mod check;
pub mod classify;
pub mod config;
pub mod deliveries;
pub mod geo;
pub mod routing;
pub mod util;
