// Domain layer: core models, ports (interfaces) and the pure intake rules.

pub mod model;
pub mod ports;

pub mod services;
