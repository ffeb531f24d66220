//! `zadarapy vpsaos-controllers ...`

use crate::registry::{CommandSpec, ParamSpec, handler, limit, start};

const COMMAND: &str = "vpsaos-controllers";

fn vc_index() -> ParamSpec {
    ParamSpec::int("vc-index", "The virtual controller index, e.g. 0").required()
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            command: COMMAND,
            subcommand: "list",
            about: "Displays details for all VPSA Object Storage virtual controllers",
            params: vec![limit(), start()],
            return_key: Some("vcontrollers"),
            handler: handler!(|session, params| {
                session
                    .get_all_controllers(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "get",
            about: "Displays details for a single virtual controller",
            params: vec![vc_index()],
            return_key: Some("vcontroller"),
            handler: handler!(|session, params| {
                session
                    .get_virtual_controller(params.u32("vc-index")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-drives",
            about: "Displays the drives of a virtual controller",
            params: vec![vc_index()],
            return_key: Some("disks"),
            handler: handler!(|session, params| {
                session
                    .get_virtual_controller_drives(params.u32("vc-index")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "remove-proxy-vcs",
            about: "Removes proxy virtual controllers. Completes asynchronously",
            params: vec![
                ParamSpec::int("quantity", "Number of proxy virtual controllers to remove")
                    .required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .remove_proxy_vcs(params.u64("quantity")?, params.options())
                    .await?
            }),
        },
    ]
}
