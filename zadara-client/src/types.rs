//! Type definitions for the Zadara client.
//!
//! Wire-level enums serialize to the exact spellings the API expects, and
//! [`ApiResponse`] carries whatever the transport decoded.

use crate::error::{ClientError, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// JSON object used for request bodies and parsed responses.
pub type Body = Map<String, Value>;

/// URL query parameters, in order.
pub type Query = Vec<(String, String)>;

/// How the transport hands the response body back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnType {
    /// Decode the body as a JSON object and run it through the error
    /// normalizer.
    #[default]
    Parsed,
    /// Return the body as an unparsed UTF-8 string.
    Json,
    /// Return the body bytes untouched.
    Raw,
}

/// A decoded API response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// JSON object, already checked for error envelopes.
    Parsed(Body),
    /// Unparsed JSON text.
    Json(String),
    /// Undecoded body bytes.
    Raw(Bytes),
    /// Response headers plus `"status": "success"`.
    Headers(Body),
}

impl ApiResponse {
    /// The decoded object, for `Parsed` and `Headers` responses.
    pub fn as_object(&self) -> Option<&Body> {
        match self {
            Self::Parsed(map) | Self::Headers(map) => Some(map),
            Self::Json(_) | Self::Raw(_) => None,
        }
    }

    /// Consumes the response and returns the decoded object.
    pub fn into_object(self) -> Option<Body> {
        match self {
            Self::Parsed(map) | Self::Headers(map) => Some(map),
            Self::Json(_) | Self::Raw(_) => None,
        }
    }

    /// The unparsed JSON text of a `Json` response.
    pub fn as_json_str(&self) -> Option<&str> {
        match self {
            Self::Json(text) => Some(text),
            _ => None,
        }
    }

    /// Looks `key` up under `response` first, then at the top level.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let map = self.as_object()?;
        map.get("response")
            .and_then(|inner| inner.get(key))
            .or_else(|| map.get(key))
    }

    /// Renders the response as JSON text regardless of variant.
    pub fn to_json_string(&self) -> Result<String> {
        match self {
            Self::Parsed(map) | Self::Headers(map) => Ok(serde_json::to_string(map)?),
            Self::Json(text) => Ok(text.clone()),
            Self::Raw(bytes) => Ok(String::from_utf8(bytes.to_vec())?),
        }
    }
}

/// A `YES` / `NO` flag as the API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    /// `YES`
    #[serde(rename = "YES")]
    Yes,
    /// `NO`
    #[serde(rename = "NO")]
    No,
}

impl YesNo {
    /// Wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
        }
    }

    pub fn is_yes(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YesNo {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "YES" => Ok(Self::Yes),
            "NO" => Ok(Self::No),
            _ => Err(ClientError::invalid(format!(
                "{s} is not a valid YES or NO argument."
            ))),
        }
    }
}

/// RAID protection level of a RAID group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaidProtection {
    #[serde(rename = "RAID1")]
    Raid1,
    #[serde(rename = "RAID5")]
    Raid5,
    #[serde(rename = "RAID6")]
    Raid6,
}

impl RaidProtection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Raid1 => "RAID1",
            Self::Raid5 => "RAID5",
            Self::Raid6 => "RAID6",
        }
    }

    /// Inclusive range of member drives the level accepts.
    pub fn drive_range(self) -> (usize, usize) {
        match self {
            Self::Raid1 => (2, 3),
            Self::Raid5 => (3, 5),
            Self::Raid6 => (4, 10),
        }
    }
}

impl fmt::Display for RaidProtection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RaidProtection {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RAID1" => Ok(Self::Raid1),
            "RAID5" => Ok(Self::Raid5),
            "RAID6" => Ok(Self::Raid6),
            _ => Err(ClientError::invalid(format!(
                "{s} is not a valid RAID type. Allowed values are: RAID1, RAID5, or RAID6"
            ))),
        }
    }
}

/// Storage pool type.
///
/// Gen2 arrays use `Transactional`, `Repository` and `Archival`; gen3 arrays
/// use the `*-Optimized` and `Balanced` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolType {
    Transactional,
    Repository,
    Archival,
    IopsOptimized,
    Balanced,
    ThroughputOptimized,
}

impl PoolType {
    /// Name accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transactional => "Transactional",
            Self::Repository => "Repository",
            Self::Archival => "Archival",
            Self::IopsOptimized => "Iops-Optimized",
            Self::Balanced => "Balanced",
            Self::ThroughputOptimized => "Throughput-Optimized",
        }
    }

    /// Spelling sent in the `pooltype` body field.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Transactional => "Transactional Workloads",
            Self::Repository => "Repository Storage",
            Self::Archival => "Archival Storage",
            Self::IopsOptimized => "IOPs-Optimized",
            Self::Balanced => "Balanced",
            Self::ThroughputOptimized => "Throughput-Optimized",
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PoolType {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transactional" => Ok(Self::Transactional),
            "repository" => Ok(Self::Repository),
            "archival" => Ok(Self::Archival),
            "iops-optimized" => Ok(Self::IopsOptimized),
            "balanced" => Ok(Self::Balanced),
            "throughput-optimized" => Ok(Self::ThroughputOptimized),
            _ => Err(ClientError::invalid(format!(
                "{s} is not a valid storage pool type. Allowed values are: Transactional, \
                 Repository, Archival, Iops-Optimized, Balanced, or Throughput-Optimized"
            ))),
        }
    }
}

/// How a pool lays data out across its RAID groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolMode {
    #[default]
    Stripe,
    Simple,
}

impl PoolMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "stripe",
            Self::Simple => "simple",
        }
    }
}

impl FromStr for PoolMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(Self::Stripe),
            "simple" => Ok(Self::Simple),
            _ => Err(ClientError::invalid(format!(
                "{s} is not a valid storage pool mode. Allowed values are: stripe or simple"
            ))),
        }
    }
}

/// Access mode of a container volume mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MountAccess {
    #[serde(rename = "rw")]
    ReadWrite,
    #[serde(rename = "r")]
    ReadOnly,
}

impl MountAccess {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadWrite => "rw",
            Self::ReadOnly => "r",
        }
    }
}

impl FromStr for MountAccess {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rw" => Ok(Self::ReadWrite),
            "r" => Ok(Self::ReadOnly),
            _ => Err(ClientError::invalid(format!(
                "{s} is not a valid mount access mode. Allowed values are: rw or r"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_yes_no_serializes_uppercase() {
        assert_eq!(serde_json::to_value(YesNo::Yes).unwrap(), json!("YES"));
        assert_eq!(serde_json::to_value(YesNo::No).unwrap(), json!("NO"));
    }

    #[test]
    fn test_yes_no_parses_case_insensitively() {
        assert_eq!("yes".parse::<YesNo>().unwrap(), YesNo::Yes);
        assert_eq!(" No ".parse::<YesNo>().unwrap(), YesNo::No);
        assert!("maybe".parse::<YesNo>().is_err());
    }

    #[test]
    fn test_pool_type_wire_names() {
        assert_eq!(PoolType::Transactional.wire_name(), "Transactional Workloads");
        assert_eq!(PoolType::Archival.wire_name(), "Archival Storage");
        assert_eq!(
            "iops-optimized".parse::<PoolType>().unwrap().wire_name(),
            "IOPs-Optimized"
        );
    }

    #[test]
    fn test_lookup_prefers_nested_response() {
        let body = json!({"response": {"raid_groups": [1]}, "raid_groups": [2]});
        let response = ApiResponse::Parsed(body.as_object().unwrap().clone());
        assert_eq!(response.lookup("raid_groups"), Some(&json!([1])));
    }

    #[test]
    fn test_raid_drive_ranges() {
        assert_eq!(RaidProtection::Raid6.drive_range(), (4, 10));
        assert_eq!("raid5".parse::<RaidProtection>().unwrap(), RaidProtection::Raid5);
    }
}
