//! Algorithm parameters and their schemas.
//!
//! Clients send parameters as a loosely typed mapping ([`Parameters`]). Each
//! algorithm publishes a [`ParameterSchema`] describing its tunable parameters;
//! [`ParameterSchema::resolve`] checks a mapping against the schema and fills in
//! defaults before the mapping is turned into the typed configuration of the
//! algorithm.
mod schema;
mod value;
pub use schema::{ParamSpec, ParamType, ParameterSchema};
pub use value::{ParamValue, Parameters};
