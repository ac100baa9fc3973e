// Domain layer: release/record models, the service allow-list and the ports
// (interfaces) implemented by adapters.

pub mod model;
pub mod ports;
pub mod services;
