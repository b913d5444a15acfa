mod error;
mod registry;
mod schema;

#[cfg(test)]
mod tests;

pub use error::{FieldViolation, SchemaViolations, ValidationError};
pub use registry::{PAYMENT_CONFIG, SchemaRegistry, payment_config_schema};
pub use schema::CompiledSchema;
