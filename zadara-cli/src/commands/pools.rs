//! `zadarapy pools ...`

use zadara_client::vpsa::pools::{NewPool, NewRaid10Pool};
use zadara_client::{PoolMode, PoolType};

use crate::registry::{CommandSpec, ParamSpec, handler, interval, limit, start};

const COMMAND: &str = "pools";

const POOL_TYPES: &[&str] = &[
    "Transactional",
    "Repository",
    "Archival",
    "Iops-Optimized",
    "Balanced",
    "Throughput-Optimized",
];

fn pool_id() -> ParamSpec {
    ParamSpec::text(
        "pool-id",
        "The pool \"name\" value as returned by \"pools list\", e.g. pool-00000001",
    )
    .required()
}

fn pooltype() -> ParamSpec {
    ParamSpec::choice("pooltype", POOL_TYPES, "The workload the pool is optimized for")
        .default("Transactional")
}

fn cache() -> ParamSpec {
    ParamSpec::yes_no("cache", "Enable SSD caching for the pool").default("NO")
}

fn cowcache() -> ParamSpec {
    ParamSpec::yes_no("cowcache", "Cache copy-on-write data. Only used with --cache YES")
        .default("YES")
}

pub fn commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            command: COMMAND,
            subcommand: "create",
            about: "Creates a storage pool from one or more RAID groups",
            params: vec![
                ParamSpec::text("display-name", "A text label for the pool").required(),
                ParamSpec::text(
                    "raid-groups",
                    "Comma separated RAID group IDs, e.g. RaidGroup-1,RaidGroup-2",
                )
                .required(),
                ParamSpec::int("capacity", "Pool capacity in GB").required(),
                pooltype(),
                cache(),
                cowcache(),
                ParamSpec::choice("mode", &["stripe", "simple"], "Data layout across RAID groups")
                    .default("stripe"),
            ],
            return_key: Some("pool_name"),
            handler: handler!(|session, params| {
                let mut pool = NewPool::new(
                    params.text("display-name")?,
                    params.text("raid-groups")?,
                    params.u64("capacity")?,
                    params.parse::<PoolType>("pooltype")?,
                );
                pool.cache = params.yes_no("cache")?;
                pool.cowcache = params.yes_no("cowcache")?;
                pool.mode = params.parse::<PoolMode>("mode")?;
                session.create_pool(&pool, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "create-raid10",
            about: "Creates a RAID10 storage pool directly from drives",
            params: vec![
                ParamSpec::text("display-name", "A text label for the pool").required(),
                ParamSpec::text("drives", "Comma separated drive IDs, an even number of them")
                    .required(),
                pooltype(),
                cache(),
                cowcache(),
            ],
            return_key: Some("pool_name"),
            handler: handler!(|session, params| {
                let pool = NewRaid10Pool {
                    display_name: params.text("display-name")?.to_string(),
                    drives: params.text("drives")?.to_string(),
                    pooltype: params.parse::<PoolType>("pooltype")?,
                    cache: params.yes_no("cache")?,
                    cowcache: params.yes_no("cowcache")?,
                };
                session.create_raid10_pool(&pool, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "delete",
            about: "Deletes a storage pool that holds no volumes",
            params: vec![pool_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session.delete_pool(params.text("pool-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "get",
            about: "Displays details for a single storage pool",
            params: vec![pool_id()],
            return_key: Some("pool"),
            handler: handler!(|session, params| {
                session.get_pool(params.text("pool-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list",
            about: "Displays details for all storage pools on the VPSA",
            params: vec![limit(), start()],
            return_key: Some("pools"),
            handler: handler!(|session, params| {
                session
                    .get_all_pools(params.start()?, params.limit()?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-raid-groups",
            about: "Displays the RAID groups in a storage pool",
            params: vec![pool_id(), limit(), start()],
            return_key: Some("raid_groups"),
            handler: handler!(|session, params| {
                session
                    .get_raid_groups_in_pool(
                        params.text("pool-id")?,
                        params.start()?,
                        params.limit()?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-volumes",
            about: "Displays the volumes in a storage pool",
            params: vec![pool_id(), limit(), start()],
            return_key: Some("volumes"),
            handler: handler!(|session, params| {
                session
                    .get_volumes_in_pool(
                        params.text("pool-id")?,
                        params.start()?,
                        params.limit()?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "list-recycle-bin",
            about: "Displays deleted volumes held in a pool's recycle bin",
            params: vec![pool_id(), limit(), start()],
            return_key: Some("volumes"),
            handler: handler!(|session, params| {
                session
                    .get_volumes_in_pool_recycle_bin(
                        params.text("pool-id")?,
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
            about: "Changes the display name for a storage pool",
            params: vec![
                pool_id(),
                ParamSpec::text("display-name", "The new display name").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .rename_pool(
                        params.text("pool-id")?,
                        params.text("display-name")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "expand",
            about: "Adds RAID groups and capacity to a storage pool",
            params: vec![
                pool_id(),
                ParamSpec::text("raid-groups", "Comma separated RAID group IDs to add").required(),
                ParamSpec::int("capacity", "Capacity in GB to add").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .expand_pool(
                        params.text("pool-id")?,
                        params.text("raid-groups")?,
                        params.u64("capacity")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "set-cache",
            about: "Enables or disables SSD caching for a storage pool",
            params: vec![pool_id(), ParamSpec::yes_no("cache", "YES to enable").required()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .set_pool_cache(params.text("pool-id")?, params.yes_no("cache")?, params.options())
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "set-cowcache",
            about: "Enables or disables copy-on-write caching for a storage pool",
            params: vec![pool_id(), ParamSpec::yes_no("cowcache", "YES to enable").required()],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .set_pool_cowcache(
                        params.text("pool-id")?,
                        params.yes_no("cowcache")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "shrink",
            about: "Removes a RAID group or object storage capacity from a pool",
            params: vec![
                pool_id(),
                ParamSpec::text("raid-group-id", "The RAID group to evacuate and remove"),
                ParamSpec::int("obs-shrink-size", "GB of object storage to release, a multiple of 20"),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .shrink_pool(
                        params.text("pool-id")?,
                        params.opt_text("raid-group-id"),
                        params.opt_u64("obs-shrink-size"),
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "cancel-shrink",
            about: "Cancels a running pool shrink",
            params: vec![pool_id()],
            return_key: None,
            handler: handler!(|session, params| {
                session.cancel_pool_shrink(params.text("pool-id")?, params.options()).await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "set-ssd-cool-off",
            about: "Sets how long data stays on SSD before it may move to slower tiers",
            params: vec![
                pool_id(),
                ParamSpec::int("cool-off-hours", "Cool off time in hours").required(),
            ],
            return_key: None,
            handler: handler!(|session, params| {
                session
                    .set_pool_ssd_cool_off(
                        params.text("pool-id")?,
                        params.u32("cool-off-hours")?,
                        params.options(),
                    )
                    .await?
            }),
        },
        CommandSpec {
            command: COMMAND,
            subcommand: "performance",
            about: "Gets performance statistics for a storage pool",
            params: vec![pool_id(), interval()],
            return_key: Some("usages"),
            handler: handler!(|session, params| {
                session
                    .get_pool_performance(
                        params.text("pool-id")?,
                        params.u32("interval")?,
                        params.options(),
                    )
                    .await?
            }),
        },
    ]
}
