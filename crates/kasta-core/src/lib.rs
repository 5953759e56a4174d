//! Kasta Core - Device attribute schemas, codecs and type registry
//!
//! This crate describes the attribute shape of every Kasta device type and
//! turns raw protocol integers into display text:
//! - Attribute specs and per-type schemas with validation and decoding
//! - Schema registry keyed by device type code
//! - Gateway connectivity bitmask, socket error log and remote-binding codecs
//! - Catalogue grouping, search and supported-type reconciliation
//!
//! Everything here is synchronous and side-effect free.

pub mod attribute;
pub mod catalog;
pub mod connection;
pub mod device_type;
pub mod error;
pub mod format;
pub mod registry;
pub mod remote_bind;
pub mod schema;
pub mod socket_error;

pub use attribute::{AttributeKind, AttributeSpec, Format};
pub use catalog::{DeviceTypeDescriptor, Reconciliation, SupportedEntry};
pub use connection::{ConnectionDetails, ConnectionState};
pub use device_type::DeviceType;
pub use error::{SchemaError, ValidationError};
pub use format::{rgb_to_hex, BackLightLevel};
pub use registry::SchemaRegistry;
pub use remote_bind::{DisplayBinding, HoleRange, RemoteBindEntry};
pub use schema::DeviceTypeSchema;
pub use socket_error::{ErrorSummary, SocketError, SocketErrorType};
