//! # Target Shapes
//!
//! Typed request structures the property bags of each resource kind are
//! mapped into before calling the provisioning API. Wire keys follow the
//! provider's PascalCase names, both when mapping and when serialising.

pub mod mediaconnect;
pub mod medialive;
pub mod mediastore;
