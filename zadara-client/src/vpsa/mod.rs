//! Block and file storage (VPSA) resources.
//!
//! Each submodule adds methods to [`Session`](crate::Session) for one REST
//! resource family.

pub mod container_services;
pub mod drives;
pub mod pools;
pub mod raid_groups;
pub mod volumes;

use crate::types::Body;
use serde_json::Value;

/// Turns a `json!({...})` literal into a request body.
pub(crate) fn object(value: Value) -> Body {
    match value {
        Value::Object(map) => map,
        _ => Body::new(),
    }
}
