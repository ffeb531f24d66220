//! Volume operations.
//!
//! A volume is either a block device or a NAS share carved from a pool. Each
//! volume belongs to a consistency group (`cg-xxxxxxxx`), which is what
//! snapshots are taken against.

use crate::error::{ClientError, Result};
use crate::request::{ApiCall, CallOptions};
use crate::session::Session;
use crate::types::{ApiResponse, Body, YesNo};
use crate::validators::{
    start_limit, verify_cg_id, verify_field, verify_interval, verify_mask, verify_policy_id,
    verify_pool_id, verify_positive, verify_server_id, verify_snapshot_id, verify_volume_id,
};
use crate::vpsa::object;
use serde_json::json;

/// Read-ahead sizes in KB a NAS share accepts.
pub const READAHEAD_SIZES_KB: [u32; 5] = [16, 64, 128, 256, 512];

/// Filters for [`Session::get_all_volumes`].
#[derive(Debug, Clone, Default)]
pub struct VolumeFilter {
    pub show_only_block: bool,
    pub show_only_file: bool,
    pub display_name: Option<String>,
}

/// Options that only apply to NAS shares.
#[derive(Debug, Clone)]
pub struct NasOptions {
    pub export_name: Option<String>,
    pub atimeupdate: YesNo,
    pub nfsrootsquash: YesNo,
    pub readaheadkb: u32,
    pub smbonly: YesNo,
    pub smbguest: YesNo,
    pub smbwindowsacl: YesNo,
    pub smbfilecreatemask: String,
    pub smbdircreatemask: String,
    pub smbmaparchive: YesNo,
    /// Sent as `16384` when enabled and `1` otherwise.
    pub smbaiosize: YesNo,
    pub smbbrowseable: YesNo,
    pub smbhideunreadable: YesNo,
    pub smbhideunwriteable: YesNo,
    pub smbhidedotfiles: YesNo,
    pub smbstoredosattributes: YesNo,
    pub smbenableoplocks: YesNo,
}

impl Default for NasOptions {
    fn default() -> Self {
        Self {
            export_name: None,
            atimeupdate: YesNo::No,
            nfsrootsquash: YesNo::No,
            readaheadkb: 512,
            smbonly: YesNo::No,
            smbguest: YesNo::No,
            smbwindowsacl: YesNo::No,
            smbfilecreatemask: "0744".to_string(),
            smbdircreatemask: "0755".to_string(),
            smbmaparchive: YesNo::Yes,
            smbaiosize: YesNo::No,
            smbbrowseable: YesNo::Yes,
            smbhideunreadable: YesNo::No,
            smbhideunwriteable: YesNo::No,
            smbhidedotfiles: YesNo::Yes,
            smbstoredosattributes: YesNo::No,
            smbenableoplocks: YesNo::Yes,
        }
    }
}

impl NasOptions {
    fn append_to(&self, body: &mut Body) -> Result<()> {
        if let Some(export_name) = &self.export_name {
            body.insert(
                "export_name".to_string(),
                json!(verify_field(export_name, "export_name")?),
            );
        }
        if !READAHEAD_SIZES_KB.contains(&self.readaheadkb) {
            return Err(ClientError::invalid(format!(
                "{} is not a valid read ahead size. Allowed values are: 16, 64, 128, 256, or 512",
                self.readaheadkb
            )));
        }
        let file_mask = verify_mask(&self.smbfilecreatemask, "smbfilecreatemask")?;
        let dir_mask = verify_mask(&self.smbdircreatemask, "smbdircreatemask")?;
        let aio_size = if self.smbaiosize.is_yes() { "16384" } else { "1" };

        body.extend(object(json!({
            "atimeupdate": self.atimeupdate,
            "nfsrootsquash": self.nfsrootsquash,
            "readaheadkb": self.readaheadkb.to_string(),
            "smbonly": self.smbonly,
            "smbguest": self.smbguest,
            "smbwindowsacl": self.smbwindowsacl,
            "smbfilecreatemask": file_mask,
            "smbdircreatemask": dir_mask,
            "smbmaparchive": self.smbmaparchive,
            "smbbrowseable": self.smbbrowseable,
            "smbhideunreadable": self.smbhideunreadable,
            "smbhideunwriteable": self.smbhideunwriteable,
            "smbhidedotfiles": self.smbhidedotfiles,
            "smbstoredosattributes": self.smbstoredosattributes,
            "smbenableoplocks": self.smbenableoplocks,
            "smbaiosize": aio_size,
        })));
        Ok(())
    }
}

/// Parameters for [`Session::create_volume`].
#[derive(Debug, Clone)]
pub struct NewVolume {
    pub pool_id: String,
    pub display_name: String,
    /// Capacity in GB.
    pub capacity: u64,
    /// `true` for a block volume, `false` for a NAS share.
    pub block: bool,
    pub attachpolicies: YesNo,
    pub crypt: YesNo,
    pub dedupe: YesNo,
    pub compress: YesNo,
    /// Ignored for block volumes.
    pub nas: NasOptions,
}

impl NewVolume {
    /// A new volume in `pool_id`. `block` selects a block volume over a NAS share.
    pub fn new(
        pool_id: impl Into<String>,
        display_name: impl Into<String>,
        capacity: u64,
        block: bool,
    ) -> Self {
        Self {
            pool_id: pool_id.into(),
            display_name: display_name.into(),
            capacity,
            block,
            attachpolicies: YesNo::Yes,
            crypt: YesNo::No,
            dedupe: YesNo::No,
            compress: YesNo::No,
            nas: NasOptions::default(),
        }
    }

    fn to_body(&self) -> Result<Body> {
        let pool_id = verify_pool_id(&self.pool_id)?;
        let display_name = verify_field(&self.display_name, "display_name")?;
        let capacity = verify_positive(self.capacity, "Volume capacity")?;

        let mut body = object(json!({
            "pool": pool_id,
            "name": display_name,
            "capacity": format!("{capacity}G"),
            "block": YesNo::from(self.block),
            "attachpolicies": self.attachpolicies,
            "crypt": self.crypt,
            "dedupe": self.dedupe,
            "compress": self.compress,
        }));

        // NAS shares are always thin provisioned.
        if self.block {
            body.insert("thin".to_string(), json!(YesNo::Yes));
        } else {
            self.nas.append_to(&mut body)?;
        }
        Ok(body)
    }
}

impl Session {
    /// Lists volumes, optionally only block or only file volumes, or those
    /// matching a display name.
    pub async fn get_all_volumes(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        filter: &VolumeFilter,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let mut query = start_limit(start, limit);
        query.push((
            "showonlyblock".to_string(),
            YesNo::from(filter.show_only_block).to_string(),
        ));
        query.push((
            "showonlyfile".to_string(),
            YesNo::from(filter.show_only_file).to_string(),
        ));
        if let Some(name) = &filter.display_name {
            query.push((
                "display_name".to_string(),
                verify_field(name, "display_name")?,
            ));
        }
        self.get_api("/api/volumes.json", query, options).await
    }

    /// Lists volumes not attached to any server.
    pub async fn get_free_volumes(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api("/api/volumes/free.json", start_limit(start, limit), options)
            .await
    }

    /// Fetches one volume.
    pub async fn get_volume(&self, volume_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        self.get_api(&format!("/api/volumes/{volume_id}.json"), Vec::new(), options)
            .await
    }

    /// Creates a volume. Block volumes are thin provisioned; NAS options are
    /// only sent for file volumes.
    pub async fn create_volume(&self, volume: &NewVolume, options: &CallOptions) -> Result<ApiResponse> {
        let body = volume.to_body()?;
        self.post_api("/api/volumes.json", body, options).await
    }

    /// Deletes a volume. With `force`, the volume is deleted even while
    /// attached to servers.
    pub async fn delete_volume(
        &self,
        volume_id: &str,
        force: YesNo,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        let call = ApiCall::delete(format!("/api/volumes/{volume_id}.json"))
            .body(object(json!({ "force": force })));
        self.call_api(call, options).await
    }

    /// Sets the display name of a volume.
    pub async fn rename_volume(
        &self,
        volume_id: &str,
        display_name: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        let display_name = verify_field(display_name, "display_name")?;
        let body = object(json!({ "new_name": display_name }));
        self.post_api(&format!("/api/volumes/{volume_id}/rename.json"), body, options)
            .await
    }

    /// Grows a volume by `capacity` GB.
    pub async fn expand_volume(
        &self,
        volume_id: &str,
        capacity: u64,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        let capacity = verify_positive(capacity, "Volume capacity")?;
        let body = object(json!({ "capacity": format!("{capacity}G") }));
        self.post_api(&format!("/api/volumes/{volume_id}/expand.json"), body, options)
            .await
    }

    /// Replaces the comment on a volume.
    pub async fn update_volume_comment(
        &self,
        volume_id: &str,
        comment: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        let body = object(json!({ "new_comment": comment }));
        self.post_api(
            &format!("/api/volumes/{volume_id}/update_comment.json"),
            body,
            options,
        )
        .await
    }

    /// Changes the NFS/SMB export name of a NAS share.
    pub async fn set_volume_export_name(
        &self,
        volume_id: &str,
        export_name: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        let export_name = verify_field(export_name, "export_name")?;
        let body = object(json!({ "exportname": export_name }));
        self.put_api(
            &format!("/api/volumes/{volume_id}/export_name.json"),
            body,
            options,
        )
        .await
    }

    /// Lists the servers a volume is attached to.
    pub async fn get_servers_attached_to_volume(
        &self,
        volume_id: &str,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        self.get_api(
            &format!("/api/volumes/{volume_id}/servers.json"),
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Detaches a volume from a comma separated list of servers
    /// (`srv-00000001,srv-00000002`).
    pub async fn detach_servers_from_volume(
        &self,
        volume_id: &str,
        servers: &str,
        force: YesNo,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        for server_id in servers.split(',') {
            verify_server_id(server_id)?;
        }
        let body = object(json!({ "servers": servers, "force": force }));
        self.post_api(&format!("/api/volumes/{volume_id}/detach.json"), body, options)
            .await
    }

    /// Lists snapshots of a consistency group, optionally only those taken
    /// by one snapshot policy.
    pub async fn get_all_snapshots(
        &self,
        cg_id: &str,
        policy_id: Option<&str>,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let cg_id = verify_cg_id(cg_id)?;
        let mut query = start_limit(start, limit);
        if let Some(policy_id) = policy_id {
            let policy_id = verify_policy_id(policy_id)?;
            query.push(("jobname".to_string(), policy_id.to_string()));
            query.push(("application".to_string(), "user".to_string()));
        }
        self.get_api(
            &format!("/api/consistency_groups/{cg_id}/snapshots.json"),
            query,
            options,
        )
        .await
    }

    /// Takes a manual snapshot of a consistency group.
    pub async fn create_volume_snapshot(
        &self,
        cg_id: &str,
        display_name: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let cg_id = verify_cg_id(cg_id)?;
        let display_name = verify_field(display_name, "display_name")?;
        let body = object(json!({ "display_name": display_name }));
        self.post_api(
            &format!("/api/consistency_groups/{cg_id}/snapshots.json"),
            body,
            options,
        )
        .await
    }

    /// Deletes one snapshot.
    pub async fn delete_volume_snapshot(
        &self,
        snapshot_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let snapshot_id = verify_snapshot_id(snapshot_id)?;
        self.delete_api(&format!("/api/snapshots/{snapshot_id}.json"), Vec::new(), options)
            .await
    }

    /// Fetches I/O performance samples for a volume.
    pub async fn get_volume_performance(
        &self,
        volume_id: &str,
        interval: u32,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let volume_id = verify_volume_id(volume_id)?;
        let interval = verify_interval(interval)?;
        self.get_api(
            &format!("/api/volumes/{volume_id}/performance.json"),
            vec![("interval".to_string(), interval.to_string())],
            options,
        )
        .await
    }
}
