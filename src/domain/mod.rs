// Domain layer: core models and ports (interfaces). No transport details here.

pub mod frame;
pub mod model;
pub mod ports;
