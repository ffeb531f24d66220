//! Storage pool operations.

use crate::error::{ClientError, Result};
use crate::request::CallOptions;
use crate::session::Session;
use crate::types::{ApiResponse, Body, PoolMode, PoolType, YesNo};
use crate::validators::{
    start_limit, verify_drive_list, verify_field, verify_interval, verify_pool_id,
    verify_positive, verify_raid_group_list,
};
use crate::vpsa::object;
use serde_json::json;

/// Object storage shrink sizes must be a multiple of this many GB.
const OBS_SHRINK_MULTIPLE: u64 = 20;

/// Parameters for [`Session::create_pool`].
#[derive(Debug, Clone)]
pub struct NewPool {
    /// Display name. Single quotes are not allowed.
    pub display_name: String,
    /// Comma separated RAID group IDs, e.g. `RaidGroup-1,RaidGroup-2`.
    pub raid_groups: String,
    /// Capacity in GB.
    pub capacity: u64,
    pub pooltype: PoolType,
    /// SSD read cache.
    pub cache: YesNo,
    /// Copy-on-write cache. Only sent when `cache` is `YES`.
    pub cowcache: YesNo,
    /// Forced to [`PoolMode::Simple`] when only one RAID group is given.
    pub mode: PoolMode,
}

impl NewPool {
    /// A pool over the comma separated `raid_groups` with default tuning.
    pub fn new(
        display_name: impl Into<String>,
        raid_groups: impl Into<String>,
        capacity: u64,
        pooltype: PoolType,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            raid_groups: raid_groups.into(),
            capacity,
            pooltype,
            cache: YesNo::No,
            cowcache: YesNo::Yes,
            mode: PoolMode::Stripe,
        }
    }

    fn to_body(&self) -> Result<Body> {
        let display_name = verify_field(&self.display_name, "display_name")?;
        let capacity = verify_positive(self.capacity, "Storage pool capacity")?;
        let raid_groups = verify_raid_group_list(&self.raid_groups)?;

        let mode = if raid_groups.len() == 1 {
            PoolMode::Simple
        } else {
            self.mode
        };

        let mut body = object(json!({
            "display_name": display_name,
            "capacity": format!("{capacity}G"),
            "raid_groups": self.raid_groups,
            "pooltype": self.pooltype.wire_name(),
            "cache": self.cache,
            "mode": mode.as_str(),
        }));
        insert_cowcache(&mut body, self.cache, self.cowcache);
        Ok(body)
    }
}

/// Parameters for [`Session::create_raid10_pool`].
#[derive(Debug, Clone)]
pub struct NewRaid10Pool {
    pub display_name: String,
    /// Comma separated drive IDs, e.g. `volume-00002a73,volume-00002a74`.
    pub drives: String,
    pub pooltype: PoolType,
    pub cache: YesNo,
    pub cowcache: YesNo,
}

impl NewRaid10Pool {
    fn to_body(&self) -> Result<Body> {
        let display_name = verify_field(&self.display_name, "display_name")?;
        verify_drive_list(&self.drives)?;

        let mut body = object(json!({
            "display_name": display_name,
            "disks": self.drives,
            "pooltype": self.pooltype.wire_name(),
            "cache": self.cache,
        }));
        insert_cowcache(&mut body, self.cache, self.cowcache);
        Ok(body)
    }
}

// CoW cache can only be toggled on pools with the primary cache enabled.
fn insert_cowcache(body: &mut Body, cache: YesNo, cowcache: YesNo) {
    if cache.is_yes() {
        body.insert("cowcache".to_string(), json!(cowcache_flag(cowcache)));
    }
}

fn cowcache_flag(cowcache: YesNo) -> &'static str {
    if cowcache.is_yes() { "true" } else { "false" }
}

impl Session {
    /// Lists storage pools.
    pub async fn get_all_pools(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api("/api/pools.json", start_limit(start, limit), options)
            .await
    }

    /// Fetches one storage pool.
    pub async fn get_pool(&self, pool_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        self.get_api(&format!("/api/pools/{pool_id}.json"), Vec::new(), options)
            .await
    }

    /// Creates a storage pool from existing RAID groups.
    ///
    /// The capacity is sent as `"{n}G"`. A pool built from a single RAID
    /// group is always created in `simple` mode.
    pub async fn create_pool(&self, pool: &NewPool, options: &CallOptions) -> Result<ApiResponse> {
        let body = pool.to_body()?;
        self.post_api("/api/pools.json", body, options).await
    }

    /// Creates a RAID10 pool directly from drives.
    pub async fn create_raid10_pool(
        &self,
        pool: &NewRaid10Pool,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let body = pool.to_body()?;
        self.post_api("/api/pools.json", body, options).await
    }

    /// Deletes a pool. The pool must contain no volumes.
    pub async fn delete_pool(&self, pool_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        self.delete_api(&format!("/api/pools/{pool_id}.json"), Vec::new(), options)
            .await
    }

    /// Sets the display name of a pool.
    pub async fn rename_pool(
        &self,
        pool_id: &str,
        display_name: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        let display_name = verify_field(display_name, "display_name")?;
        let body = object(json!({ "new_name": display_name }));
        self.post_api(&format!("/api/pools/{pool_id}/rename.json"), body, options)
            .await
    }

    /// Lists the RAID groups backing a pool.
    pub async fn get_raid_groups_in_pool(
        &self,
        pool_id: &str,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        self.get_api(
            &format!("/api/pools/{pool_id}/raid_groups.json"),
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Lists the volumes allocated from a pool.
    pub async fn get_volumes_in_pool(
        &self,
        pool_id: &str,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        self.get_api(
            &format!("/api/pools/{pool_id}/volumes.json"),
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Grows a pool by `capacity` GB taken from `raid_groups`.
    pub async fn expand_pool(
        &self,
        pool_id: &str,
        raid_groups: &str,
        capacity: u64,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        verify_raid_group_list(raid_groups)?;
        let capacity = verify_positive(capacity, "Storage pool capacity")?;
        let body = object(json!({
            "raid_groups": raid_groups,
            "capacity": format!("{capacity}G"),
        }));
        self.post_api(&format!("/api/pools/{pool_id}/expand.json"), body, options)
            .await
    }

    /// Enables or disables the SSD read cache.
    pub async fn set_pool_cache(
        &self,
        pool_id: &str,
        cache: YesNo,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        let command = if cache.is_yes() { "Enable" } else { "Disable" };
        let body = object(json!({ "command": command }));
        self.post_api(
            &format!("/api/pools/{pool_id}/toggle_cache.json"),
            body,
            options,
        )
        .await
    }

    /// Enables or disables copy-on-write caching for a pool.
    pub async fn set_pool_cowcache(
        &self,
        pool_id: &str,
        cowcache: YesNo,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        let body = object(json!({ "cowcache": cowcache_flag(cowcache) }));
        self.post_api(&format!("/api/pools/{pool_id}/cow_cache.json"), body, options)
            .await
    }

    /// Lists deleted volumes still held in the pool's recycle bin.
    pub async fn get_volumes_in_pool_recycle_bin(
        &self,
        pool_id: &str,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        self.get_api(
            &format!("/api/pools/{pool_id}/volumes_in_recycle_bin.json"),
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Fetches I/O performance samples for a pool.
    pub async fn get_pool_performance(
        &self,
        pool_id: &str,
        interval: u32,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        let interval = verify_interval(interval)?;
        self.get_api(
            &format!("/api/pools/{pool_id}/performance.json"),
            vec![("interval".to_string(), interval.to_string())],
            options,
        )
        .await
    }

    /// Evacuates a RAID group out of the pool, or shrinks its object
    /// storage tier by `obs_shrink_size` GB.
    pub async fn shrink_pool(
        &self,
        pool_id: &str,
        raid_group_id: Option<&str>,
        obs_shrink_size: Option<u64>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        let mut body = Body::new();

        if let Some(raid_group_id) = raid_group_id {
            verify_raid_group_list(raid_group_id)?;
            body.insert("raid_group".to_string(), json!(raid_group_id));
        }
        if let Some(size) = obs_shrink_size {
            if size % OBS_SHRINK_MULTIPLE != 0 {
                return Err(ClientError::invalid(format!(
                    "{size} must be a multiple of {OBS_SHRINK_MULTIPLE}"
                )));
            }
            body.insert("obsshrinksize".to_string(), json!(size));
        }

        self.post_api(&format!("/api/pools/{pool_id}/shrink.json"), body, options)
            .await
    }

    /// Cancels a running shrink.
    pub async fn cancel_pool_shrink(&self, pool_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        self.post_api(
            &format!("/api/pools/{pool_id}/cancel_shrink.json"),
            Body::new(),
            options,
        )
        .await
    }

    /// Sets how many hours data stays on SSD before it is demoted.
    pub async fn set_pool_ssd_cool_off(
        &self,
        pool_id: &str,
        cool_off_hours: u32,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let pool_id = verify_pool_id(pool_id)?;
        let body = object(json!({ "cool_off_hours": cool_off_hours }));
        self.post_api(
            &format!("/api/pools/{pool_id}/update_ssd_cool_off.json"),
            body,
            options,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_raid_group_forces_simple_mode() {
        let pool = NewPool::new("pool1", "RaidGroup-1", 100, PoolType::Transactional);
        let body = pool.to_body().unwrap();
        assert_eq!(body["mode"], json!("simple"));
        assert_eq!(body["capacity"], json!("100G"));
        assert_eq!(body["pooltype"], json!("Transactional Workloads"));
        assert_eq!(body["cache"], json!("NO"));
        assert!(!body.contains_key("cowcache"));
    }

    #[test]
    fn test_striped_pool_with_cache() {
        let mut pool = NewPool::new(
            "pool1",
            "RaidGroup-1,RaidGroup-2",
            500,
            PoolType::IopsOptimized,
        );
        pool.cache = YesNo::Yes;
        pool.cowcache = YesNo::No;

        let body = pool.to_body().unwrap();
        assert_eq!(body["mode"], json!("stripe"));
        assert_eq!(body["pooltype"], json!("IOPs-Optimized"));
        assert_eq!(body["cowcache"], json!("false"));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let pool = NewPool::new("pool1", "RaidGroup-1", 0, PoolType::Balanced);
        assert!(pool.to_body().is_err());
    }

    #[test]
    fn test_raid10_pool_body() {
        let pool = NewRaid10Pool {
            display_name: "r10".into(),
            drives: "volume-00000001,volume-00000002".into(),
            pooltype: PoolType::Repository,
            cache: YesNo::Yes,
            cowcache: YesNo::Yes,
        };
        let body = pool.to_body().unwrap();
        assert_eq!(body["disks"], json!("volume-00000001,volume-00000002"));
        assert_eq!(body["pooltype"], json!("Repository Storage"));
        assert_eq!(body["cowcache"], json!("true"));
    }
}
