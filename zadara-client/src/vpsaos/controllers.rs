//! Object storage virtual controllers.
//!
//! Virtual controllers are addressed by their numeric index.

use crate::error::Result;
use crate::request::CallOptions;
use crate::session::Session;
use crate::types::ApiResponse;
use crate::validators::{start_limit, verify_positive};

impl Session {
    /// Lists the virtual controllers of an object storage array.
    pub async fn get_all_controllers(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api(
            "/api/zios/virtual_controllers.json",
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Fetches one virtual controller by index.
    pub async fn get_virtual_controller(&self, vc_index: u32, options: &CallOptions) -> Result<ApiResponse> {
        self.get_api(
            &format!("/api/zios/virtual_controllers/{vc_index}.json"),
            Vec::new(),
            options,
        )
        .await
    }

    /// Lists the drives served by one virtual controller.
    pub async fn get_virtual_controller_drives(
        &self,
        vc_index: u32,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api(
            &format!("/api/zios/virtual_controllers/{vc_index}/drives.json"),
            Vec::new(),
            options,
        )
        .await
    }

    /// Removes `quantity` proxy virtual controllers.
    ///
    /// The array answers with a `response.status` in the async range while
    /// the removal is queued, so this call always runs with
    /// [`CallOptions::apply_async_status_override`] enabled.
    pub async fn remove_proxy_vcs(&self, quantity: u64, options: &CallOptions) -> Result<ApiResponse> {
        let quantity = verify_positive(quantity, "quantity")?;
        let options = options.clone().with_async_status_override(true);
        self.delete_api(
            "/api/zios/virtual_controllers/remove_proxy_vcs.json",
            vec![("quantity".to_string(), quantity.to_string())],
            &options,
        )
        .await
    }
}
