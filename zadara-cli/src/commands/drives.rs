//! `zadarapy drives ...`

use crate::registry::{CommandSpec, ParamSpec, force, handler, interval, limit, start};

const COMMAND: &str = "drives";

fn drive_id() -> ParamSpec {
    ParamSpec::text(
        "drive-id",
        "The drive \"name\" value as returned by \"drives list\", e.g. volume-00000001",
    )
    .required()
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            command: COMMAND,
            subcommand: "get",
            about: "Displays details for a single drive on the VPSA",
            params: vec![drive_id()],
            return_key: Some("disk"),
            handler: handler!(|session, params| {
                session.get_drive(params.text("drive-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list",
            about: "Displays details for all drives attached to the VPSA",
            params: vec![limit(), start()],
            return_key: Some("disks"),
            handler: handler!(|session, params| {
                session
                    .get_all_drives(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-free",
            about: "Displays details for all drives not currently in a RAID group",
            params: vec![limit(), start()],
            return_key: Some("disks"),
            handler: handler!(|session, params| {
                session
                    .get_free_drives(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "performance",
            about: "Gets performance statistics for a drive",
            params: vec![drive_id(), interval()],
            return_key: Some("usages"),
            handler: handler!(|session, params| {
                session
                    .get_drive_performance(
                        params.text("drive-id")?,
                        params.u32("interval")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "remove",
            about: "Removes an unused drive from the VPSA",
            params: vec![drive_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session.remove_drive(params.text("drive-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "rename",
            about: "Changes the display name for a drive",
            params: vec![
                drive_id(),
                ParamSpec::text("display-name", "The new display name").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .rename_drive(
                        params.text("drive-id")?,
                        params.text("display-name")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "replace",
            about: "Replaces a drive in a RAID group with another drive",
            params: vec![
                drive_id(),
                ParamSpec::text("to-drive-id", "The unused drive to replace it with").required(),
                force(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .replace_drive(
                        params.text("drive-id")?,
                        params.text("to-drive-id")?,
                        params.yes_no("force")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "shred",
            about: "Securely erases an unused drive",
            params: vec![drive_id(), force()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .shred_drive(params.text("drive-id")?, params.yes_no("force")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "cancel-shred",
            about: "Cancels a running shred",
            params: vec![drive_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .cancel_shred_drive(params.text("drive-id")?, params.options())
                    .await?
            }),
        },
    ]
}
