//! Parameter validators.
//!
//! Every `verify_*` function either hands its input back (possibly trimmed or
//! narrowed to a tighter type) or rejects it with
//! [`ClientError::Validation`]. They are pure, so re-validating a value that
//! already passed is a no-op.

use crate::error::{ClientError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

/// Compiles a pattern that is part of the crate source and therefore known
/// to be valid.
macro_rules! static_regex {
    ($pattern:expr, $name:expr) => {
        Regex::new($pattern).unwrap_or_else(|_| {
            panic!(
                "Static regex '{}' failed to compile - this is a bug in zadara-client",
                $name
            )
        })
    };
}

static CG_ID: Lazy<Regex> = Lazy::new(|| static_regex!(r"^cg-[0-9a-f]{8}$", "CG_ID"));
static POLICY_ID: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"^policy-[0-9a-f]{8}$", "POLICY_ID"));
static POOL_ID: Lazy<Regex> = Lazy::new(|| static_regex!(r"^pool-[0-9a-f]{8}$", "POOL_ID"));
static REMOTE_POOL_ID: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"^r?pool-[0-9a-f]{8}$", "REMOTE_POOL_ID"));
static RAID_ID: Lazy<Regex> = Lazy::new(|| static_regex!(r"^RaidGroup-[0-9]+$", "RAID_ID"));
static SERVER_ID: Lazy<Regex> = Lazy::new(|| static_regex!(r"^srv-[0-9a-f]{8}$", "SERVER_ID"));
static SNAPSHOT_ID: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"^snap-[0-9a-f]{8}$", "SNAPSHOT_ID"));
static VOLUME_ID: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"^volume-[0-9a-f]{8}$", "VOLUME_ID"));
static ZCS_IMAGE_ID: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"^img-[0-9a-f]{8}$", "ZCS_IMAGE_ID"));
static ZCS_CONTAINER_ID: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"^container-[0-9a-f]{8}$", "ZCS_CONTAINER_ID"));
static MEMORY_POOL_ID: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"^dgroup-[0-9a-f]{8}$", "MEMORY_POOL_ID"));
// Lookarounds are not supported by the regex crate, so leading and trailing
// hyphens are checked separately in `verify_host`.
static HOST_LABEL: Lazy<Regex> =
    Lazy::new(|| static_regex!(r"(?i)^[a-z0-9-]{1,63}$", "HOST_LABEL"));

fn verify_pattern<'a>(value: &'a str, pattern: &Regex, what: &str) -> Result<&'a str> {
    if pattern.is_match(value) {
        Ok(value)
    } else {
        Err(ClientError::invalid(format!("{value} is not a valid {what}.")))
    }
}

/// Consistency group ID, e.g. `cg-00000001`.
pub fn verify_cg_id(cg_id: &str) -> Result<&str> {
    verify_pattern(cg_id, &CG_ID, "consistency group ID")
}

/// Snapshot policy ID, e.g. `policy-00000001`.
pub fn verify_policy_id(policy_id: &str) -> Result<&str> {
    verify_pattern(policy_id, &POLICY_ID, "snapshot policy ID")
}

/// Storage pool ID, e.g. `pool-00000001`.
pub fn verify_pool_id(pool_id: &str) -> Result<&str> {
    verify_pattern(pool_id, &POOL_ID, "storage pool ID")
}

/// Storage pool ID that may also name a remote pool (`rpool-00000001`).
pub fn verify_remote_pool_id(pool_id: &str) -> Result<&str> {
    verify_pattern(pool_id, &REMOTE_POOL_ID, "storage pool ID")
}

/// RAID group ID, e.g. `RaidGroup-1`.
pub fn verify_raid_id(raid_id: &str) -> Result<&str> {
    verify_pattern(raid_id, &RAID_ID, "RAID group ID")
}

/// Server ID, e.g. `srv-00000001`.
pub fn verify_server_id(server_id: &str) -> Result<&str> {
    verify_pattern(server_id, &SERVER_ID, "server ID")
}

/// Snapshot ID, e.g. `snap-00000001`.
pub fn verify_snapshot_id(snapshot_id: &str) -> Result<&str> {
    verify_pattern(snapshot_id, &SNAPSHOT_ID, "snapshot ID")
}

/// Volume ID, e.g. `volume-00000001`.
pub fn verify_volume_id(volume_id: &str) -> Result<&str> {
    verify_pattern(volume_id, &VOLUME_ID, "volume ID")
}

/// Drive ID. Drives share the `volume-xxxxxxxx` naming scheme with volumes.
pub fn verify_drive_id(drive_id: &str) -> Result<&str> {
    verify_pattern(drive_id, &VOLUME_ID, "drive ID")
}

/// ZCS image ID, e.g. `img-00000001`.
pub fn verify_zcs_image_id(image_id: &str) -> Result<&str> {
    verify_pattern(image_id, &ZCS_IMAGE_ID, "ZCS image ID")
}

/// ZCS container ID, e.g. `container-00000001`.
pub fn verify_zcs_container_id(container_id: &str) -> Result<&str> {
    verify_pattern(container_id, &ZCS_CONTAINER_ID, "ZCS container ID")
}

/// ZCS memory pool ID, e.g. `dgroup-00000001`.
pub fn verify_memory_pool_id(mempool_id: &str) -> Result<&str> {
    verify_pattern(mempool_id, &MEMORY_POOL_ID, "memory pool ID")
}

/// Comma separated drive IDs with no whitespace, e.g.
/// `volume-00002a73,volume-00002a74`. Returns the individual IDs.
pub fn verify_drive_list(drives: &str) -> Result<Vec<&str>> {
    drives
        .split(',')
        .map(|drive_id| {
            verify_drive_id(drive_id).map_err(|_| {
                ClientError::invalid(format!("\"{drive_id}\" in \"{drives}\" is not a valid drive ID."))
            })
        })
        .collect()
}

/// Comma separated RAID group IDs, e.g. `RaidGroup-1,RaidGroup-2`.
pub fn verify_raid_group_list(raid_groups: &str) -> Result<Vec<&str>> {
    raid_groups
        .split(',')
        .map(|raid_id| {
            verify_raid_id(raid_id).map_err(|_| {
                ClientError::invalid(format!(
                    "\"{raid_id}\" in \"{raid_groups}\" is not a valid RAID group ID."
                ))
            })
        })
        .collect()
}

/// Free text such as a display name. Surrounding whitespace is stripped and
/// single quotes are rejected.
pub fn verify_field(value: &str, field_name: &str) -> Result<String> {
    let value = value.trim();
    if value.contains('\'') {
        return Err(ClientError::invalid(format!(
            "{value} is not a valid {field_name} parameter: single quotes are not allowed."
        )));
    }
    Ok(value.to_string())
}

/// TCP port in `1..=65535`.
pub fn verify_port(port: u32) -> Result<u16> {
    u16::try_from(port)
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| {
            ClientError::Config(format!(
                "{port} is not a valid port. Must be between 1 and 65535"
            ))
        })
}

/// Hostname (at most 255 characters of RFC 1123 labels) or IP address.
pub fn verify_host(host: &str) -> Result<&str> {
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host);
    }

    let valid = !host.is_empty()
        && host.len() <= 255
        && host.split('.').all(|label| {
            HOST_LABEL.is_match(label) && !label.starts_with('-') && !label.ends_with('-')
        });

    if valid {
        Ok(host)
    } else {
        Err(ClientError::Config(format!(
            "{host} is not a valid hostname or IP address."
        )))
    }
}

/// Strictly positive count such as a capacity in GB or a quantity.
pub fn verify_positive(value: u64, field_name: &str) -> Result<u64> {
    if value == 0 {
        return Err(ClientError::invalid(format!(
            "{field_name} must be a positive integer, 0 was supplied."
        )));
    }
    Ok(value)
}

/// Metering interval in seconds, at least 1.
pub fn verify_interval(interval: u32) -> Result<u32> {
    if interval < 1 {
        return Err(ClientError::invalid(format!(
            "Interval must be at least 1 second ({interval} was supplied)."
        )));
    }
    Ok(interval)
}

/// UNIX style permission mask: four octal digits with a leading `0`,
/// e.g. `0755`.
pub fn verify_mask<'a>(mask: &'a str, field_name: &str) -> Result<&'a str> {
    let mut chars = mask.chars();
    let valid = mask.len() == 4
        && chars.next() == Some('0')
        && chars.all(|c| matches!(c, '0' | '1' | '2' | '4' | '5' | '6' | '7'));

    if valid {
        Ok(mask)
    } else {
        Err(ClientError::invalid(format!(
            "{mask} is not a valid {field_name} mask."
        )))
    }
}

/// Builds the `start`/`limit` pagination parameters shared by list calls.
pub fn start_limit(start: Option<u32>, limit: Option<u32>) -> Vec<(String, String)> {
    [("start", start), ("limit", limit)]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pool_id_is_returned_unchanged() {
        let once = verify_pool_id("pool-00000001").unwrap();
        let twice = verify_pool_id(once).unwrap();
        assert_eq!(twice, "pool-00000001");
    }

    #[test]
    fn test_unpadded_pool_id_is_rejected_every_time() {
        for _ in 0..3 {
            let err = verify_pool_id("pool-1").unwrap_err();
            assert_eq!(err.to_string(), "pool-1 is not a valid storage pool ID.");
        }
    }

    #[test]
    fn test_remote_pool_id() {
        assert!(verify_remote_pool_id("rpool-0000000a").is_ok());
        assert!(verify_pool_id("rpool-0000000a").is_err());
    }

    #[test]
    fn test_raid_id() {
        assert!(verify_raid_id("RaidGroup-12").is_ok());
        assert!(verify_raid_id("raidgroup-12").is_err());
        assert!(verify_raid_id("RaidGroup-").is_err());
    }

    #[test]
    fn test_uppercase_hex_rejected() {
        assert!(verify_volume_id("volume-0000ABCD").is_err());
        assert!(verify_volume_id("volume-0000abcd").is_ok());
    }

    #[test]
    fn test_drive_list() {
        let drives = verify_drive_list("volume-00002a73,volume-00002a74").unwrap();
        assert_eq!(drives, vec!["volume-00002a73", "volume-00002a74"]);

        let err = verify_drive_list("volume-00002a73, volume-00002a74").unwrap_err();
        assert!(err.to_string().contains("\" volume-00002a74\""));
    }

    #[test]
    fn test_field_trims_and_rejects_quotes() {
        assert_eq!(verify_field("  rg1 ", "display_name").unwrap(), "rg1");
        assert!(verify_field("it's", "display_name").is_err());
    }

    #[test]
    fn test_port_range() {
        assert_eq!(verify_port(443).unwrap(), 443);
        assert!(verify_port(0).is_err());
        assert!(verify_port(65536).is_err());
    }

    #[test]
    fn test_host() {
        assert!(verify_host("vsa-00000578-aws.zadaravpsa.com").is_ok());
        assert!(verify_host("10.0.0.1").is_ok());
        assert!(verify_host("::1").is_ok());
        assert!(verify_host("invalid$.hostname.com").is_err());
        assert!(verify_host("-bad.example.com").is_err());
        assert!(verify_host(&"a".repeat(256)).is_err());
    }

    #[test]
    fn test_mask() {
        assert!(verify_mask("0755", "smbfilecreatemask").is_ok());
        assert!(verify_mask("0788", "smbfilecreatemask").is_err());
        assert!(verify_mask("755", "smbfilecreatemask").is_err());
    }

    #[test]
    fn test_start_limit() {
        assert_eq!(
            start_limit(Some(0), Some(10)),
            vec![
                ("start".to_string(), "0".to_string()),
                ("limit".to_string(), "10".to_string())
            ]
        );
        assert!(start_limit(None, None).is_empty());
    }
}
