//! `zadarapy raid-groups ...`

use zadara_client::RaidProtection;
use zadara_client::vpsa::raid_groups::{DEFAULT_STRIPE_SIZE, NewRaidGroup};

use crate::registry::{CommandSpec, ParamSpec, force, handler, interval, limit, start};

const COMMAND: &str = "raid-groups";

fn raid_id() -> ParamSpec {
    ParamSpec::text(
        "raid-id",
        "The RAID group \"name\" value as returned by \"raid-groups list\", e.g. RaidGroup-1",
    )
    .required()
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            command: COMMAND,
            subcommand: "create",
            about: "Creates a RAID group from unused drives",
            params: vec![
                ParamSpec::text("display-name", "A text label for the RAID group").required(),
                ParamSpec::choice("protection", &["RAID1", "RAID5", "RAID6"], "The RAID level")
                    .required(),
                ParamSpec::text("disk", "Comma separated drive IDs, e.g. volume-00000001,volume-00000002")
                    .required(),
                ParamSpec::choice(
                    "stripe-size",
                    &["4", "16", "32", "64", "128", "256"],
                    "Stripe size in KB. Ignored for RAID1",
                )
                .default("64"),
                ParamSpec::yes_no("hot-spare", "Reserve a hot spare for the group").default("NO"),
                force(),
            ],
            return_key: Some("raidgroup_name"),
            handler: handler!(|session, params| {
                let mut group = NewRaidGroup::new(
                    params.text("display-name")?,
                    params.parse::<RaidProtection>("protection")?,
                    params.text("disk")?,
                );
                group.stripe_size = params
                    .opt_text("stripe-size")
                    .and_then(|size| size.parse().ok())
                    .unwrap_or(DEFAULT_STRIPE_SIZE);
                group.hot_spare = params.yes_no("hot-spare")?;
                group.force = params.yes_no("force")?;
                session.create_raid_group(&group, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "delete",
            about: "Deletes a RAID group that is not part of a pool",
            params: vec![raid_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session.delete_raid_group(params.text("raid-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "get",
            about: "Displays details for a single RAID group",
            params: vec![raid_id()],
            return_key: Some("raid_group"),
            handler: handler!(|session, params| {
                session.get_raid_group(params.text("raid-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list",
            about: "Displays details for all RAID groups on the VPSA",
            params: vec![limit(), start()],
            return_key: Some("raid_groups"),
            handler: handler!(|session, params| {
                session
                    .get_all_raid_groups(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-free",
            about: "Displays RAID groups not yet assigned to a pool",
            params: vec![limit(), start()],
            return_key: Some("raid_groups"),
            handler: handler!(|session, params| {
                session
                    .get_free_raid_groups(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-drives",
            about: "Displays the drives that make up a RAID group",
            params: vec![raid_id(), limit(), start()],
            return_key: Some("disks"),
            handler: handler!(|session, params| {
                session
                    .get_drives_in_raid_group(
                        params.text("raid-id")?,
                        params.start()?,
                        params.limit()?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "rename",
            about: "Changes the display name for a RAID group",
            params: vec![
                raid_id(),
                ParamSpec::text("display-name", "The new display name").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .rename_raid_group(
                        params.text("raid-id")?,
                        params.text("display-name")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "repair",
            about: "Starts a repair of a degraded RAID group",
            params: vec![raid_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session.repair_raid_group(params.text("raid-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "resync-speed",
            about: "Sets the minimum and maximum resync speed in MB/s",
            params: vec![
                raid_id(),
                ParamSpec::int("minimum", "Minimum resync speed in MB/s").required(),
                ParamSpec::int("maximum", "Maximum resync speed in MB/s").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .update_raid_group_resync_speed(
                        params.text("raid-id")?,
                        params.u32("minimum")?,
                        params.u32("maximum")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "start-media-scan",
            about: "Starts a media scan on a RAID group",
            params: vec![raid_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .start_raid_group_media_scan(params.text("raid-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "pause-media-scan",
            about: "Pauses a running media scan",
            params: vec![raid_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .pause_raid_group_media_scan(params.text("raid-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "add-hot-spare",
            about: "Adds an unused drive to a RAID group as a hot spare",
            params: vec![
                raid_id(),
                ParamSpec::text("drive-id", "The unused drive to add, e.g. volume-00000001").required(),
                force(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .add_hot_spare_to_raid_group(
                        params.text("raid-id")?,
                        params.text("drive-id")?,
                        params.yes_no("force")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "remove-hot-spare",
            about: "Removes the hot spare from a RAID group",
            params: vec![raid_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .remove_hot_spare_from_raid_group(params.text("raid-id")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "performance",
            about: "Gets performance statistics for a RAID group",
            params: vec![raid_id(), interval()],
            return_key: Some("usages"),
            handler: handler!(|session, params| {
                session
                    .get_raid_group_performance(
                        params.text("raid-id")?,
                        params.u32("interval")?,
                        params.options(),
                    )
                    .await?
            }),
        },
    ]
}
