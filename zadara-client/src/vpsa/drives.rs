//! Physical drive operations.
//!
//! Drives are named like volumes (`volume-00002a73`); the ID is the `name`
//! field returned by [`Session::get_all_drives`].

use crate::error::Result;
use crate::request::CallOptions;
use crate::session::Session;
use crate::types::{ApiResponse, YesNo};
use crate::validators::{start_limit, verify_drive_id, verify_field, verify_interval};
use crate::vpsa::object;
use serde_json::json;

impl Session {
    /// Lists every drive attached to the VPSA.
    pub async fn get_all_drives(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api("/api/drives.json", start_limit(start, limit), options)
            .await
    }

    /// Lists drives not yet participating in a RAID group.
    pub async fn get_free_drives(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api("/api/drives/free.json", start_limit(start, limit), options)
            .await
    }

    /// Fetches one drive.
    pub async fn get_drive(&self, drive_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let drive_id = verify_drive_id(drive_id)?;
        self.get_api(&format!("/api/drives/{drive_id}.json"), Vec::new(), options)
            .await
    }

    /// Sets the display name of a drive.
    pub async fn rename_drive(
        &self,
        drive_id: &str,
        display_name: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let drive_id = verify_drive_id(drive_id)?;
        let display_name = verify_field(display_name, "drive display name")?;
        let body = object(json!({ "newname": display_name }));
        self.post_api(&format!("/api/drives/{drive_id}/rename.json"), body, options)
            .await
    }

    /// Removes a drive from the VPSA. Only drives outside any RAID group can
    /// be removed.
    pub async fn remove_drive(&self, drive_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let drive_id = verify_drive_id(drive_id)?;
        self.post_api(
            &format!("/api/drives/{drive_id}/remove.json"),
            Default::default(),
            options,
        )
        .await
    }

    /// Replaces `drive_id` in its RAID group with the unallocated drive
    /// `to_drive_id`.
    pub async fn replace_drive(
        &self,
        drive_id: &str,
        to_drive_id: &str,
        force: YesNo,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let drive_id = verify_drive_id(drive_id)?;
        let to_drive_id = verify_drive_id(to_drive_id)?;
        let body = object(json!({ "toname": to_drive_id, "force": force }));
        self.post_api(&format!("/api/drives/{drive_id}/replace.json"), body, options)
            .await
    }

    /// Starts a secure erase of an unallocated drive. This destroys all data
    /// on it.
    pub async fn shred_drive(
        &self,
        drive_id: &str,
        force: YesNo,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let drive_id = verify_drive_id(drive_id)?;
        let body = object(json!({ "force": force }));
        self.post_api(&format!("/api/drives/{drive_id}/shred.json"), body, options)
            .await
    }

    /// Stops a running shred.
    pub async fn cancel_shred_drive(
        &self,
        drive_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let drive_id = verify_drive_id(drive_id)?;
        self.post_api(
            &format!("/api/drives/{drive_id}/cancel_shred.json"),
            Default::default(),
            options,
        )
        .await
    }

    /// Metering statistics for the last `interval` seconds.
    pub async fn get_drive_performance(
        &self,
        drive_id: &str,
        interval: u32,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let drive_id = verify_drive_id(drive_id)?;
        let interval = verify_interval(interval)?;
        self.get_api(
            &format!("/api/drives/{drive_id}/performance.json"),
            vec![("interval".to_string(), interval.to_string())],
            options,
        )
        .await
    }
}
