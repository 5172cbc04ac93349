// Domain layer: content models and ports. No transport code lives here.

pub mod blocks;
pub mod model;
pub mod ports;
