//! Registered `zadarapy` commands, one module per resource family.

pub mod container_services;
pub mod controllers;
pub mod drives;
pub mod pools;
pub mod raid_groups;
pub mod volumes;

use crate::registry::{CommandGroup, CommandSpec};

/// Top-level commands in help order.
pub fn groups() -> Vec<CommandGroup> {
    vec![
        CommandGroup {
            name: "container-services",
            about: "Commands related to Zadara Container Services (ZCS)",
        },
        CommandGroup {
            name: "drives",
            about: "Commands related to individual drives",
        },
        CommandGroup {
            name: "pools",
            about: "Commands related to storage pools",
        },
        CommandGroup {
            name: "raid-groups",
            about: "Commands related to RAID groups",
        },
        CommandGroup {
            name: "volumes",
            about: "Commands related to volumes, NAS shares and snapshots",
        },
        CommandGroup {
            name: "vpsaos-controllers",
            about: "Commands related to VPSA Object Storage virtual controllers",
        },
    ]
}

/// Every registered subcommand.
pub fn registry() -> Vec<CommandSpec> {
    [
        container_services::commands(),
        drives::commands(),
        pools::commands(),
        raid_groups::commands(),
        volumes::commands(),
        controllers::commands(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_cli;
    use std::collections::HashSet;

    #[test]
    fn test_command_pairs_are_unique() {
        let specs = registry();
        let mut seen = HashSet::new();
        for spec in &specs {
            assert!(
                seen.insert((spec.command, spec.subcommand)),
                "duplicate command {} {}",
                spec.command,
                spec.subcommand
            );
        }
    }

    #[test]
    fn test_every_command_belongs_to_a_group() {
        let names: HashSet<_> = groups().iter().map(|group| group.name).collect();
        for spec in registry() {
            assert!(names.contains(spec.command), "{} has no group", spec.command);
        }
        for group in groups() {
            assert!(
                registry().iter().any(|spec| spec.command == group.name),
                "{} has no subcommands",
                group.name
            );
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        build_cli(&groups(), &registry()).debug_assert();
    }

    #[test]
    fn test_parse_create_raid_group() {
        let matches = build_cli(&groups(), &registry())
            .try_get_matches_from([
                "zadarapy",
                "raid-groups",
                "create",
                "--display-name",
                "rg1",
                "--protection",
                "raid5",
                "--disk",
                "volume-00000001,volume-00000002,volume-00000003",
                "-t",
                "30",
            ])
            .unwrap();

        let (command, group) = matches.subcommand().unwrap();
        let (subcommand, args) = group.subcommand().unwrap();
        assert_eq!((command, subcommand), ("raid-groups", "create"));
        assert_eq!(args.get_one::<String>("stripe-size").unwrap(), "64");
        assert_eq!(args.get_one::<String>("force").unwrap(), "NO");
    }
}
