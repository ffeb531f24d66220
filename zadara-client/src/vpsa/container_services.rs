//! Zadara Container Services (ZCS): images, containers and memory pools.
//!
//! Some ZCS operations are queued by the array and answered with an error
//! whose text says the request "has been submitted". Image creation,
//! container stop and container deletion treat that answer as success and
//! return `{"response": {"status": 0}}`.

use crate::error::{ClientError, Result};
use crate::request::CallOptions;
use crate::session::Session;
use crate::types::{ApiResponse, Body, MountAccess, YesNo};
use crate::validators::{
    start_limit, verify_field, verify_memory_pool_id, verify_positive, verify_volume_id,
    verify_zcs_container_id, verify_zcs_image_id,
};
use crate::vpsa::object;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Leading text of the error raised for a queued ZCS request.
pub const REQUEST_SUBMITTED: &str =
    "The API server returned an error: \"The request has been submitted";

fn submitted_as_success(result: Result<ApiResponse>) -> Result<ApiResponse> {
    match result {
        Err(err) if err.to_string().starts_with(REQUEST_SUBMITTED) => {
            tracing::warn!(error = %err, "Request queued by the array, reporting success");
            Ok(ApiResponse::Parsed(object(json!({ "response": { "status": 0 } }))))
        }
        other => other,
    }
}

/// A VPSA volume mounted into a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerVolume {
    /// Volume ID, e.g. `volume-00000001`.
    pub name: String,
    /// Mount point inside the container.
    pub path: String,
    pub access: MountAccess,
}

/// One command line argument passed to the container entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerArg {
    pub arg: String,
}

/// A port range exposed by the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPort {
    /// `tcp` or `udp`.
    pub protocol: String,
    pub low: u16,
    pub high: u16,
}

/// An environment variable set in the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEnvVar {
    pub variable: String,
    pub value: String,
}

/// Parameters for [`Session::create_zcs_container`].
#[derive(Debug, Clone)]
pub struct NewContainer {
    pub display_name: String,
    /// Image ID, e.g. `img-00000001`.
    pub zcs_image_id: String,
    /// Start the container as soon as it is created.
    pub start: YesNo,
    pub use_public_ip: YesNo,
    pub entrypoint: Option<String>,
    pub volumes: Vec<ContainerVolume>,
    pub args: Vec<ContainerArg>,
    pub ports: Vec<ContainerPort>,
    pub envvars: Vec<ContainerEnvVar>,
    /// Comma separated names of containers to link to.
    pub links: Option<String>,
    pub memorypoolname: Option<String>,
}

impl NewContainer {
    /// A container with no volumes, ports, environment or arguments.
    pub fn new(display_name: impl Into<String>, zcs_image_id: impl Into<String>, start: YesNo) -> Self {
        Self {
            display_name: display_name.into(),
            zcs_image_id: zcs_image_id.into(),
            start,
            use_public_ip: YesNo::No,
            entrypoint: None,
            volumes: Vec::new(),
            args: Vec::new(),
            ports: Vec::new(),
            envvars: Vec::new(),
            links: None,
            memorypoolname: None,
        }
    }

    fn to_body(&self) -> Result<Body> {
        let display_name = verify_field(&self.display_name, "display_name")?;
        let image_id = verify_zcs_image_id(&self.zcs_image_id)?;

        let mut body = object(json!({
            "name": display_name,
            "imagename": image_id,
            "start": self.start,
            "use_public_ip": self.use_public_ip,
            "entrypoint": self.entrypoint,
            "link": self.links,
        }));

        if !self.volumes.is_empty() {
            let volumes = self
                .volumes
                .iter()
                .map(|v| {
                    verify_volume_id(&v.name)?;
                    let path = verify_field(&v.path, "ZCS container volume mount point")?;
                    Ok(ContainerVolume {
                        name: v.name.clone(),
                        path,
                        access: v.access,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            body.insert("volumes".to_string(), serde_json::to_value(volumes)?);
        }

        if !self.args.is_empty() {
            let args = self
                .args
                .iter()
                .map(|a| {
                    Ok(ContainerArg {
                        arg: verify_field(&a.arg, "ZCS container argument")?,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            body.insert("args".to_string(), serde_json::to_value(args)?);
        }

        if !self.ports.is_empty() {
            body.insert("ports".to_string(), serde_json::to_value(&self.ports)?);
        }

        if !self.envvars.is_empty() {
            let envvars = self
                .envvars
                .iter()
                .map(|e| {
                    let variable =
                        verify_field(&e.variable, "ZCS container environment variable name")?;
                    // Values keep their surrounding whitespace.
                    if e.value.contains('\'') {
                        return Err(ClientError::invalid(format!(
                            "{} is not a valid ZCS container environment variable value.",
                            e.value
                        )));
                    }
                    Ok(ContainerEnvVar {
                        variable,
                        value: e.value.clone(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            body.insert("envvars".to_string(), serde_json::to_value(envvars)?);
        }

        if let Some(pool) = self.memorypoolname.as_deref().filter(|p| !p.is_empty()) {
            body.insert("memorypoolname".to_string(), json!(pool));
        }

        Ok(body)
    }
}

impl Session {
    /// Lists container images.
    pub async fn get_all_zcs_images(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api("/api/images.json", start_limit(start, limit), options)
            .await
    }

    /// Fetches one container image.
    pub async fn get_zcs_image(&self, zcs_image_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let image_id = verify_zcs_image_id(zcs_image_id)?;
        self.get_api(&format!("/api/images/{image_id}.json"), Vec::new(), options)
            .await
    }

    /// Imports an image, from a Docker registry path or, when `volume_id` is
    /// given, from a file on that volume.
    pub async fn create_zcs_image(
        &self,
        display_name: &str,
        path: &str,
        volume_id: Option<&str>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let display_name = verify_field(display_name, "display_name")?;
        let path = verify_field(path, "ZCS image path")?;

        let mut body = object(json!({ "name": display_name, "path": path }));
        let mode = match volume_id {
            Some(volume_id) => {
                verify_volume_id(volume_id)?;
                "volume"
            }
            None => "docker",
        };
        body.insert("mode".to_string(), json!(mode));

        submitted_as_success(self.post_api("/api/images.json", body, options).await)
    }

    /// Deletes a container image.
    pub async fn delete_zcs_image(&self, zcs_image_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let image_id = verify_zcs_image_id(zcs_image_id)?;
        self.delete_api(&format!("/api/images/{image_id}.json"), Vec::new(), options)
            .await
    }

    /// Lists the containers created from an image.
    pub async fn get_all_zcs_containers_by_image(
        &self,
        zcs_image_id: &str,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let image_id = verify_zcs_image_id(zcs_image_id)?;
        self.get_api(
            &format!("/api/images/{image_id}/containers.json"),
            start_limit(start, limit),
            options,
        )
        .await
    }

    /// Lists containers.
    pub async fn get_all_zcs_containers(
        &self,
        start: Option<u32>,
        limit: Option<u32>,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        self.get_api("/api/containers.json", start_limit(start, limit), options)
            .await
    }

    /// Fetches one container.
    pub async fn get_zcs_container(
        &self,
        zcs_container_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let container_id = verify_zcs_container_id(zcs_container_id)?;
        self.get_api(&format!("/api/containers/{container_id}.json"), Vec::new(), options)
            .await
    }

    /// Creates a container from an image.
    pub async fn create_zcs_container(
        &self,
        container: &NewContainer,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let body = container.to_body()?;
        self.post_api("/api/containers.json", body, options).await
    }

    /// Starts a stopped container.
    pub async fn start_zcs_container(
        &self,
        zcs_container_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let container_id = verify_zcs_container_id(zcs_container_id)?;
        self.post_api(
            &format!("/api/containers/{container_id}/start.json"),
            Body::new(),
            options,
        )
        .await
    }

    /// Stops a running container.
    pub async fn stop_zcs_container(
        &self,
        zcs_container_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let container_id = verify_zcs_container_id(zcs_container_id)?;
        submitted_as_success(
            self.post_api(
                &format!("/api/containers/{container_id}/stop.json"),
                Body::new(),
                options,
            )
            .await,
        )
    }

    /// Deletes a stopped container.
    pub async fn delete_zcs_container(
        &self,
        zcs_container_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let container_id = verify_zcs_container_id(zcs_container_id)?;
        submitted_as_success(
            self.delete_api(&format!("/api/containers/{container_id}.json"), Vec::new(), options)
                .await,
        )
    }

    /// Fetches CPU and memory usage samples for a container.
    pub async fn get_zcs_container_performance(
        &self,
        zcs_container_id: &str,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let container_id = verify_zcs_container_id(zcs_container_id)?;
        self.get_api(
            &format!("/api/containers/{container_id}/performance.json"),
            Vec::new(),
            options,
        )
        .await
    }

    /// Lists container memory pools.
    pub async fn get_all_memory_pools(&self, options: &CallOptions) -> Result<ApiResponse> {
        self.get_api("/api/container_memory_pools.json", Vec::new(), options)
            .await
    }

    /// Fetches one container memory pool.
    pub async fn get_memory_pool(&self, mempool_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let mempool_id = verify_memory_pool_id(mempool_id)?;
        self.get_api(
            &format!("/api/container_memory_pools/{mempool_id}.json"),
            Vec::new(),
            options,
        )
        .await
    }

    /// Reserves `mb` MB of controller memory for containers.
    pub async fn create_memory_pool(
        &self,
        display_name: &str,
        mb: u64,
        options: &CallOptions,
    ) -> Result<ApiResponse> {
        let display_name = verify_field(display_name, "display_name")?;
        let mb = verify_positive(mb, "Memory pool size")?;
        let body = object(json!({ "name": display_name, "mb": mb }));
        self.post_api("/api/container_memory_pools.json", body, options)
            .await
    }

    /// Deletes a container memory pool.
    pub async fn delete_memory_pool(&self, mempool_id: &str, options: &CallOptions) -> Result<ApiResponse> {
        let mempool_id = verify_memory_pool_id(mempool_id)?;
        self.delete_api(
            &format!("/api/container_memory_pools/{mempool_id}.json"),
            Vec::new(),
            options,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_error_becomes_success() {
        let err = ClientError::Api("The request has been submitted".to_string());
        let response = submitted_as_success(Err(err)).unwrap();
        assert_eq!(response.lookup("status"), Some(&json!(0)));
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = ClientError::Api("No such container".to_string());
        assert!(submitted_as_success(Err(err)).is_err());

        let err = ClientError::General("The request has been submitted".to_string());
        assert!(submitted_as_success(Err(err)).is_err());
    }

    #[test]
    fn test_container_body() {
        let mut container = NewContainer::new("web", "img-00000001", YesNo::Yes);
        container.volumes.push(ContainerVolume {
            name: "volume-00000001".into(),
            path: " /data ".into(),
            access: MountAccess::ReadWrite,
        });
        container.envvars.push(ContainerEnvVar {
            variable: " MODE ".into(),
            value: " prod ".into(),
        });

        let body = container.to_body().unwrap();
        assert_eq!(body["imagename"], json!("img-00000001"));
        assert_eq!(body["start"], json!("YES"));
        assert_eq!(body["entrypoint"], json!(null));
        assert_eq!(
            body["volumes"],
            json!([{"name": "volume-00000001", "path": "/data", "access": "rw"}])
        );
        assert_eq!(body["envvars"], json!([{"variable": "MODE", "value": " prod "}]));
        assert!(!body.contains_key("args"));
    }

    #[test]
    fn test_container_volume_must_be_a_volume() {
        let mut container = NewContainer::new("web", "img-00000001", YesNo::No);
        container.volumes.push(ContainerVolume {
            name: "pool-00000001".into(),
            path: "/data".into(),
            access: MountAccess::ReadOnly,
        });
        assert!(container.to_body().is_err());
    }

    #[test]
    fn test_volume_list_parses_from_json() {
        let volumes: Vec<ContainerVolume> =
            serde_json::from_str(r#"[{"name": "volume-00000001", "path": "/d", "access": "r"}]"#)
                .unwrap();
        assert_eq!(volumes[0].access, MountAccess::ReadOnly);
    }
}
