//! RAID group operations.
//!
//! A RAID group is a set of drives combined under one protection level. Pools
//! are carved from RAID groups.

use crate::error::{ClientError, Result};
use crate::request::CallOptions;
use crate::session::Session;
use crate::types::{ApiResponse, RaidProtection, YesNo};
use crate::validators::{
    start_limit, verify_drive_id, verify_drive_list, verify_field, verify_interval,
    verify_raid_id,
};
use crate::vpsa::object;
use serde_json::json;

/// Stripe sizes in KB accepted for RAID5 and RAID6 groups.
pub const STRIPE_SIZES: [u32; 6] = [4, 16, 32, 64, 128, 256];

/// Stripe size used when the caller has no preference.
pub const DEFAULT_STRIPE_SIZE: u32 = 64;

/// Parameters for [`Session::create_raid_group`].
#[derive(Debug, Clone)]
pub struct NewRaidGroup {
    /// Display name, e.g. `rg1`. Single quotes are not allowed.
    pub display_name: String,
    pub protection: RaidProtection,
    /// Comma separated drive IDs with no spaces,
    /// e.g. `volume-00002a73,volume-00002a74`.
    pub disk: String,
    /// In KB. Ignored for RAID1.
    pub stripe_size: u32,
    /// Reserve one of the drives as a hot spare.
    pub hot_spare: YesNo,
    /// Create the group even if drive capacities differ.
    pub force: YesNo,
}

impl NewRaidGroup {
    /// A group with the default stripe size and no hot spare.
    pub fn new(
        display_name: impl Into<String>,
        protection: RaidProtection,
        disk: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            protection,
            disk: disk.into(),
            stripe_size: DEFAULT_STRIPE_SIZE,
            hot_spare: YesNo::No,
            force: YesNo::No,
        }
    }
}

impl Session {
    /// Lists all RAID groups.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use zadara_client::{CallOptions, Session};
    /// # async fn example(session: Session) -> Result<(), zadara_client::ClientError> {
    /// let response = session
    ///     .get_all_raid_groups(Some(0), Some(10), &CallOptions::default())
    ///     .await?;
    /// if let Some(groups) = response.lookup("raid_groups") {
    ///     println!("{groups}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_all_raid_groups(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api("/api/raid_groups.json", start_limit(start, limit), options)
            .await
    }

    /// Lists RAID groups not yet allocated to a pool.
    pub async fn get_free_raid_groups(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api(
            "/api/raid_groups/free.json",
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Fetches one RAID group.
    pub async fn get_raid_group(&self, raid_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        self.get_api(&format!("/api/raid_groups/{raid_id}.json"), Vec::new(), options)
            .await
    }

    /// Creates a RAID group.
    ///
    /// The protection width is taken from the number of drives in
    /// `group.disk`, which must suit the protection level: 2-3 drives for
    /// RAID1, 3-5 for RAID5 and 4-10 for RAID6.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a bad name, drive ID, stripe
    /// size or drive count.
    pub async fn create_raid_group(
        &self,
        group: &NewRaidGroup,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let display_name = verify_field(&group.display_name, "RAID group name")?;
        let drives = verify_drive_list(&group.disk)?;

        if !STRIPE_SIZES.contains(&group.stripe_size) {
            return Err(ClientError::invalid(format!(
                "{} is not a valid stripe size. Allowed values are: 4, 16, 32, 64, 128, or 256",
                group.stripe_size
            )));
        }

        let protection_width = drives.len();
        let (min, max) = group.protection.drive_range();
        if !(min..=max).contains(&protection_width) {
            return Err(ClientError::invalid(format!(
                "A {} group may only have {min}-{max} drives, but {protection_width} were supplied.",
                group.protection
            )));
        }

        let mut body = object(json!({
            "display_name": display_name,
            "protection": group.protection,
            "disk": group.disk,
            "hot_spare": group.hot_spare,
            "protection_width": protection_width,
            "force": group.force,
        }));
        if group.protection != RaidProtection::Raid1 {
            body.insert("stripe_size".to_string(), json!(group.stripe_size));
        }

        self.post_api("/api/raid_groups.json", body, options).await
    }

    /// Deletes a RAID group that is not part of a pool.
    pub async fn delete_raid_group(&self, raid_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        self.delete_api(&format!("/api/raid_groups/{raid_id}.json"), Vec::new(), options)
            .await
    }

    /// Lists the drives that make up a RAID group.
    pub async fn get_drives_in_raid_group(
        &self,
        raid_id: &str,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        self.get_api(
            &format!("/api/raid_groups/{raid_id}/disks.json"),
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Sets the display name of a RAID group.
    pub async fn rename_raid_group(
        &self,
        raid_id: &str,
        display_name: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        let display_name = verify_field(display_name, "RAID group name")?;
        let body = object(json!({ "newname": display_name }));
        self.post_api(&format!("/api/raid_groups/{raid_id}/rename.json"), body, options)
            .await
    }

    /// Starts a repair of a degraded RAID group.
    pub async fn repair_raid_group(&self, raid_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        self.post_api(
            &format!("/api/raid_groups/{raid_id}/repair.json"),
            Default::default(),
            options,
        )
        .await
    }

    /// Sets the resync speed bounds in MB/s.
    pub async fn update_raid_group_resync_speed(
        &self,
        raid_id: &str,
        minimum: u32,
        maximum: u32,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        if minimum > maximum {
            return Err(ClientError::invalid(format!(
                "Minimum speed ({minimum}) must be less than maximum speed ({maximum})."
            )));
        }
        let body = object(json!({ "min": minimum, "max": maximum }));
        self.post_api(
            &format!("/api/raid_groups/{raid_id}/resync_speed.json"),
            body,
            options,
        )
        .await
    }

    /// Starts a media scan.
    pub async fn start_raid_group_media_scan(
        &self,
        raid_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        self.post_api(
            &format!("/api/raid_groups/{raid_id}/scrub.json"),
            Default::default(),
            options,
        )
        .await
    }

    /// Pauses a running media scan.
    pub async fn pause_raid_group_media_scan(
        &self,
        raid_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        self.post_api(
            &format!("/api/raid_groups/{raid_id}/pause_scrub.json"),
            Default::default(),
            options,
        )
        .await
    }

    /// Dedicates an unallocated drive as the group's hot spare.
    pub async fn add_hot_spare_to_raid_group(
        &self,
        raid_id: &str,
        drive_id: &str,
        force: YesNo,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        let drive_id = verify_drive_id(drive_id)?;
        let body = object(json!({ "disk": drive_id, "force": force }));
        self.post_api(
            &format!("/api/raid_groups/{raid_id}/hot_spares.json"),
            body,
            options,
        )
        .await
    }

    /// Removes the hot spare drive.
    pub async fn remove_hot_spare_from_raid_group(
        &self,
        raid_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        self.post_api(
            &format!("/api/raid_groups/{raid_id}/hot_spares/remove.json"),
            Default::default(),
            options,
        )
        .await
    }

    /// Fetches I/O performance samples for a RAID group.
    pub async fn get_raid_group_performance(
        &self,
        raid_id: &str,
        interval: u32,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let raid_id = verify_raid_id(raid_id)?;
        let interval = verify_interval(interval)?;
        self.get_api(
            &format!("/api/raid_groups/{raid_id}/performance.json"),
            vec![("interval".to_string(), interval.to_string())],
            options,
        )
        .await
    }
}
