// Domain layer: report models, typed source records, the data-service query model and ports.

pub mod model;
pub mod ports;
pub mod query;
pub mod records;
