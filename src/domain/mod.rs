// Domain layer: models, schemas and ports. Nothing here talks to the network or the filesystem.

pub mod cede_columns;
pub mod model;
pub mod ports;
pub mod schema;
