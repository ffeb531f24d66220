//! `zadarapy container-services ...`

use zadara_client::vpsa::container_services::{
    ContainerArg, ContainerEnvVar, ContainerPort, ContainerVolume, NewContainer,
};

use crate::registry::{CommandSpec, ParamSpec, handler, limit, start};

const COMMAND: &str = "container-services";

fn image_id() -> ParamSpec {
    ParamSpec::text(
        "zcs-image-id",
        "The ZCS image \"name\" value as returned by \"container-services list-images\", e.g. img-00000001",
    )
    .required()
}

fn container_id() -> ParamSpec {
    ParamSpec::text(
        "zcs-container-id",
        "The ZCS container \"name\" value as returned by \"container-services list-containers\"",
    )
    .required()
}

fn mempool_id() -> ParamSpec {
    ParamSpec::text("mempool-id", "The memory pool ID, e.g. dgroup-00000001").required()
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            command: COMMAND,
            subcommand: "create-container",
            about: "Creates a new ZCS container from the given ZCS image",
            params: vec![
                ParamSpec::text("display-name", "A text label for the container").required(),
                image_id(),
                ParamSpec::yes_no("start", "Start the container once it is created").default("YES"),
                ParamSpec::yes_no("use-public-ip", "Expose the container on the public IP")
                    .default("NO"),
                ParamSpec::text("entrypoint", "Override the image entrypoint"),
                ParamSpec::text("links", "Containers to link, e.g. container-00000001:db"),
                ParamSpec::text("memorypoolname", "Memory pool to run the container in"),
                ParamSpec::text(
                    "volumes",
                    "JSON list of {\"name\": volume-id, \"path\": mount point, \"access\": \"rw\" or \"r\"}",
                ),
                ParamSpec::text("args", "JSON list of {\"arg\": value}"),
                ParamSpec::text(
                    "ports",
                    "JSON list of {\"protocol\": \"tcp\" or \"udp\", \"low\": port, \"high\": port}",
                ),
                ParamSpec::text("envvars", "JSON list of {\"variable\": name, \"value\": value}"),
            ],
            return_key: Some("container_name"),
            handler: handler!(|session, params| {
                let mut container = NewContainer::new(
                    params.text("display-name")?,
                    params.text("zcs-image-id")?,
                    params.yes_no("start")?,
                );
                container.use_public_ip = params.yes_no("use-public-ip")?;
                container.entrypoint = params.opt_text("entrypoint").map(String::from);
                container.links = params.opt_text("links").map(String::from);
                container.memorypoolname = params.opt_text("memorypoolname").map(String::from);
                container.volumes = params.json::<Vec<ContainerVolume>>("volumes")?.unwrap_or_default();
                container.args = params.json::<Vec<ContainerArg>>("args")?.unwrap_or_default();
                container.ports = params.json::<Vec<ContainerPort>>("ports")?.unwrap_or_default();
                container.envvars = params.json::<Vec<ContainerEnvVar>>("envvars")?.unwrap_or_default();
                session.create_zcs_container(&container, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "create-image",
            about: "Imports a ZCS image from Docker Hub or from a tar file on a volume",
            params: vec![
                ParamSpec::text("display-name", "A text label for the image").required(),
                ParamSpec::text(
                    "path",
                    "Docker Hub image name, e.g. zadara/ssh, or the tar file path on --volume-id",
                )
                .required(),
                ParamSpec::text("volume-id", "Import from this volume instead of Docker Hub"),
            ],
            return_key: Some("image_name"),
            handler: handler!(|session, params| {
                session
                    .create_zcs_image(
                        params.text("display-name")?,
                        params.text("path")?,
                        params.opt_text("volume-id"),
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "delete-container",
            about: "Deletes a ZCS container. The container must be stopped first",
            params: vec![container_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .delete_zcs_container(params.text("zcs-container-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "delete-image",
            about: "Deletes a ZCS image that no container uses",
            params: vec![image_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .delete_zcs_image(params.text("zcs-image-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "get-container",
            about: "Displays details for a single ZCS container",
            params: vec![container_id()],
            return_key: Some("container"),
            handler: handler!(|session, params| {
                session
                    .get_zcs_container(params.text("zcs-container-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "get-image",
            about: "Displays details for a single ZCS image",
            params: vec![image_id()],
            return_key: Some("image"),
            handler: handler!(|session, params| {
                session.get_zcs_image(params.text("zcs-image-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-containers",
            about: "Displays details for all ZCS containers on the VPSA",
            params: vec![limit(), start()],
            return_key: Some("containers"),
            handler: handler!(|session, params| {
                session
                    .get_all_zcs_containers(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-containers-by-image",
            about: "Displays the ZCS containers spawned from a ZCS image",
            params: vec![image_id(), limit(), start()],
            return_key: Some("containers"),
            handler: handler!(|session, params| {
                session
                    .get_all_zcs_containers_by_image(
                        params.text("zcs-image-id")?,
                        params.start()?,
                        params.limit()?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-images",
            about: "Displays details for all ZCS images on the VPSA",
            params: vec![limit(), start()],
            return_key: Some("images"),
            handler: handler!(|session, params| {
                session
                    .get_all_zcs_images(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "start-container",
            about: "Starts a stopped container",
            params: vec![container_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .start_zcs_container(params.text("zcs-container-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "stop-container",
            about: "Stops a running container",
            params: vec![container_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .stop_zcs_container(params.text("zcs-container-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "container-performance",
            about: "Gets performance statistics for a ZCS container",
            params: vec![container_id()],
            return_key: Some("usages"),
            handler: handler!(|session, params| {
                session
                    .get_zcs_container_performance(params.text("zcs-container-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-memory-pools",
            about: "Displays the container memory pools",
            params: vec![],
            return_key: Some("memory_pools"),
            handler: handler!(|session, params| {
                session.get_all_memory_pools(params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "get-memory-pool",
            about: "Displays details for a single container memory pool",
            params: vec![mempool_id()],
            return_key: Some("memory_pool"),
            handler: handler!(|session, params| {
                session.get_memory_pool(params.text("mempool-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "create-memory-pool",
            about: "Creates a container memory pool",
            params: vec![
                ParamSpec::text("display-name", "A text label for the memory pool").required(),
                ParamSpec::int("mb", "Memory pool size in MB").required(),
            ],
            return_key: Some("memory_pool_name"),
            handler: handler!(|session, params| {
                session
                    .create_memory_pool(params.text("display-name")?, params.u64("mb")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "delete-memory-pool",
            about: "Deletes a container memory pool",
            params: vec![mempool_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session.delete_memory_pool(params.text("mempool-id")?, params.options()).await?
            }),
        },
    ]
}

