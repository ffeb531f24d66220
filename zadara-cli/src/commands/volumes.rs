//! `zadarapy volumes ...`

use zadara_client::vpsa::volumes::{NasOptions, NewVolume, VolumeFilter};

use crate::registry::{CommandSpec, ParamSpec, force, handler, interval, limit, start};

const COMMAND: &str = "volumes";

fn volume_id() -> ParamSpec {
    ParamSpec::text(
        "volume-id",
        "The volume \"name\" value as returned by \"volumes list\", e.g. volume-00000001",
    )
    .required()
}

fn cg_id() -> ParamSpec {
    ParamSpec::text(
        "cg-id",
        "The consistency group \"cg_name\" of the volume, e.g. cg-00000001",
    )
    .required()
}

/// NAS share arguments with their defaults, in the order they are shown.
fn nas_params() -> Vec<ParamSpec> {
    vec![
        ParamSpec::text("export-name", "NFS export name. Defaults to the display name"),
        ParamSpec::yes_no("atimeupdate", "Update access times on read").default("NO"),
        ParamSpec::yes_no("nfsrootsquash", "Map NFS root to an anonymous user").default("NO"),
        ParamSpec::choice("readaheadkb", &["16", "64", "128", "256", "512"], "Read ahead in KB")
            .default("512"),
        ParamSpec::yes_no("smbonly", "Share over SMB only").default("NO"),
        ParamSpec::yes_no("smbguest", "Allow SMB guest access").default("NO"),
        ParamSpec::yes_no("smbwindowsacl", "Use Windows ACLs").default("NO"),
        ParamSpec::text("smbfilecreatemask", "Permission mask for new SMB files").default("0744"),
        ParamSpec::text("smbdircreatemask", "Permission mask for new SMB directories")
            .default("0755"),
        ParamSpec::yes_no("smbmaparchive", "Map the DOS archive bit").default("YES"),
        ParamSpec::yes_no("smbaiosize", "Use asynchronous SMB I/O").default("NO"),
        ParamSpec::yes_no("smbbrowseable", "Show the share in browse lists").default("YES"),
        ParamSpec::yes_no("smbhideunreadable", "Hide unreadable files").default("NO"),
        ParamSpec::yes_no("smbhideunwriteable", "Hide unwriteable files").default("NO"),
        ParamSpec::yes_no("smbhidedotfiles", "Hide dot files").default("YES"),
        ParamSpec::yes_no("smbstoredosattributes", "Store DOS attributes").default("NO"),
        ParamSpec::yes_no("smbenableoplocks", "Enable opportunistic locks").default("YES"),
    ]
}

fn create_params() -> Vec<ParamSpec> {
    let mut params = vec![
        ParamSpec::text("pool-id", "The pool to create the volume in, e.g. pool-00000001")
            .required(),
        ParamSpec::text("display-name", "A text label for the volume").required(),
        ParamSpec::int("capacity", "Volume capacity in GB").required(),
        ParamSpec::flag("block", "Create a block volume instead of a NAS share"),
        ParamSpec::yes_no("attachpolicies", "Attach the default snapshot policy").default("YES"),
        ParamSpec::yes_no("crypt", "Encrypt the volume").default("NO"),
        ParamSpec::yes_no("dedupe", "Enable deduplication").default("NO"),
        ParamSpec::yes_no("compress", "Enable compression").default("NO"),
    ];
    params.extend(nas_params());
    params
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            command: COMMAND,
            subcommand: "create",
            about: "Creates a block volume or NAS share in a storage pool",
            params: create_params(),
            return_key: Some("vol_name"),
            handler: handler!(|session, params| {
                let mut volume = NewVolume::new(
                    params.text("pool-id")?,
                    params.text("display-name")?,
                    params.u64("capacity")?,
                    params.flag("block"),
                );
                volume.attachpolicies = params.yes_no("attachpolicies")?;
                volume.crypt = params.yes_no("crypt")?;
                volume.dedupe = params.yes_no("dedupe")?;
                volume.compress = params.yes_no("compress")?;
                volume.nas = NasOptions {
                    export_name: params.opt_text("export-name").map(String::from),
                    atimeupdate: params.yes_no("atimeupdate")?,
                    nfsrootsquash: params.yes_no("nfsrootsquash")?,
                    readaheadkb: params
                        .opt_text("readaheadkb")
                        .and_then(|size| size.parse().ok())
                        .unwrap_or(512),
                    smbonly: params.yes_no("smbonly")?,
                    smbguest: params.yes_no("smbguest")?,
                    smbwindowsacl: params.yes_no("smbwindowsacl")?,
                    smbfilecreatemask: params.text("smbfilecreatemask")?.to_string(),
                    smbdircreatemask: params.text("smbdircreatemask")?.to_string(),
                    smbmaparchive: params.yes_no("smbmaparchive")?,
                    smbaiosize: params.yes_no("smbaiosize")?,
                    smbbrowseable: params.yes_no("smbbrowseable")?,
                    smbhideunreadable: params.yes_no("smbhideunreadable")?,
                    smbhideunwriteable: params.yes_no("smbhideunwriteable")?,
                    smbhidedotfiles: params.yes_no("smbhidedotfiles")?,
                    smbstoredosattributes: params.yes_no("smbstoredosattributes")?,
                    smbenableoplocks: params.yes_no("smbenableoplocks")?,
                };
                session.create_volume(&volume, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "delete",
            about: "Deletes a volume. It is moved to the pool's recycle bin",
            params: vec![volume_id(), force()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .delete_volume(params.text("volume-id")?, params.yes_no("force")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "get",
            about: "Displays details for a single volume",
            params: vec![volume_id()],
            return_key: Some("volume"),
            handler: handler!(|session, params| {
                session.get_volume(params.text("volume-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list",
            about: "Displays details for all volumes on the VPSA",
            params: vec![
                limit(),
                start(),
                ParamSpec::flag("show-only-block", "Only list block volumes"),
                ParamSpec::flag("show-only-file", "Only list NAS shares"),
                ParamSpec::text("display-name", "Only list volumes with this display name"),
            ],
            return_key: Some("volumes"),
            handler: handler!(|session, params| {
                let filter = VolumeFilter {
                    show_only_block: params.flag("show-only-block"),
                    show_only_file: params.flag("show-only-file"),
                    display_name: params.opt_text("display-name").map(String::from),
                };
                session
                    .get_all_volumes(params.start()?, params.limit()?, &filter, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-free",
            about: "Displays volumes not attached to any server",
            params: vec![limit(), start()],
            return_key: Some("volumes"),
            handler: handler!(|session, params| {
                session
                    .get_free_volumes(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "rename",
            about: "Changes the display name for a volume",
            params: vec![
                volume_id(),
                ParamSpec::text("display-name", "The new display name").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .rename_volume(
                        params.text("volume-id")?,
                        params.text("display-name")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "expand",
            about: "Adds capacity to a volume",
            params: vec![
                volume_id(),
                ParamSpec::int("capacity", "Capacity in GB to add").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .expand_volume(params.text("volume-id")?, params.u64("capacity")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "update-comment",
            about: "Sets the comment on a volume",
            params: vec![
                volume_id(),
                ParamSpec::text("comment", "The new comment").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .update_volume_comment(
                        params.text("volume-id")?,
                        params.text("comment")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "set-export-name",
            about: "Changes the NFS export name of a NAS share",
            params: vec![
                volume_id(),
                ParamSpec::text("export-name", "The new export name").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .set_volume_export_name(
                        params.text("volume-id")?,
                        params.text("export-name")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-servers",
            about: "Displays the servers a volume is attached to",
            params: vec![volume_id(), limit(), start()],
            return_key: Some("servers"),
            handler: handler!(|session, params| {
                session
                    .get_servers_attached_to_volume(
                        params.text("volume-id")?,
                        params.start()?,
                        params.limit()?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "detach-servers",
            about: "Detaches a volume from one or more servers",
            params: vec![
                volume_id(),
                ParamSpec::text("servers", "Comma separated server IDs, e.g. srv-00000001").required(),
                force(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .detach_servers_from_volume(
                        params.text("volume-id")?,
                        params.text("servers")?,
                        params.yes_no("force")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-snapshots",
            about: "Displays the snapshots of a volume's consistency group",
            params: vec![
                cg_id(),
                ParamSpec::text("policy-id", "Only list snapshots taken by this policy"),
                limit(),
                start(),
            ],
            return_key: Some("snapshots"),
            handler: handler!(|session, params| {
                session
                    .get_all_snapshots(
                        params.text("cg-id")?,
                        params.opt_text("policy-id"),
                        params.start()?,
                        params.limit()?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "create-snapshot",
            about: "Takes a manual snapshot of a volume's consistency group",
            params: vec![
                cg_id(),
                ParamSpec::text("display-name", "A text label for the snapshot").required(),
            ],
            return_key: Some("snapshot_name"),
            handler: handler!(|session, params| {
                session
                    .create_volume_snapshot(
                        params.text("cg-id")?,
                        params.text("display-name")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "delete-snapshot",
            about: "Deletes a snapshot",
            params: vec![
                ParamSpec::text("snapshot-id", "The snapshot ID, e.g. snap-00000001").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .delete_volume_snapshot(params.text("snapshot-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "performance",
            about: "Gets performance statistics for a volume",
            params: vec![volume_id(), interval()],
            return_key: Some("usages"),
            handler: handler!(|session, params| {
                session
                    .get_volume_performance(
                        params.text("volume-id")?,
                        params.u32("interval")?,
                        params.options(),
                    )
                    .await?
            }),
        },
    ]
}
