//! Integration tests for command synthesis.
//!
//! These tests pin the exact argument lists handed to useradd, usermod,
//! userdel and chage.

use useradd_planner::{
    AccountSpec, AttributeChange, CommandInvocation, CommandPlan, CommandSynthesizer, PlanError,
    PlatformCapabilities, PropertyTable, ToolPaths, Transition,
};

fn tools() -> ToolPaths {
    ToolPaths::default()
}

fn linux(system: bool) -> PlatformCapabilities {
    PlatformCapabilities::new(system, true, "Debian")
}

fn myuser() -> AccountSpec {
    AccountSpec::new("myuser")
}

mod create_tests {
    use super::*;

    #[test]
    fn test_allowdupe_adds_o() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            allow_duplicate_uid: true,
            ..myuser()
        };
        assert_eq!(
            synth.build_create(&spec).unwrap(),
            ["/usr/sbin/useradd", "-o", "myuser"]
        );
    }

    #[test]
    fn test_system_adds_r_when_supported() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            is_system_account: true,
            ..myuser()
        };
        assert_eq!(
            synth.build_create(&spec).unwrap(),
            ["/usr/sbin/useradd", "-r", "myuser"]
        );
    }

    #[test]
    fn test_system_omitted_when_unsupported() {
        let caps = linux(false);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            is_system_account: true,
            ..myuser()
        };
        assert_eq!(
            synth.build_create(&spec).unwrap(),
            ["/usr/sbin/useradd", "myuser"]
        );
    }

    #[test]
    fn test_full_command() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            allow_duplicate_uid: true,
            manage_home_directory: true,
            is_system_account: true,
            expiry_date: Some("2012-08-18".to_string()),
            ..myuser().with_property("groups", "somegroup")
        };
        assert_eq!(
            synth.build_create(&spec).unwrap(),
            [
                "/usr/sbin/useradd",
                "-G",
                "somegroup",
                "-o",
                "-m",
                "-e 2012-08-18",
                "-r",
                "myuser"
            ]
        );
    }

    #[test]
    fn test_full_command_without_expiry() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            allow_duplicate_uid: true,
            manage_home_directory: true,
            is_system_account: true,
            ..myuser().with_property("groups", "somegroup")
        };
        assert_eq!(
            synth.build_create(&spec).unwrap(),
            [
                "/usr/sbin/useradd",
                "-G",
                "somegroup",
                "-o",
                "-m",
                "-r",
                "myuser"
            ]
        );
    }

    #[test]
    fn test_create_plan_adds_password_policy() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            password_min_age: Some(5),
            password_max_age: Some(10),
            ..myuser()
        };
        let plan = synth.plan_create(&spec).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.invocations()[0], ["/usr/sbin/useradd", "myuser"]);
        assert_eq!(
            plan.invocations()[1],
            ["/usr/bin/chage", "-m", "5", "-M", "10", "myuser"]
        );
    }

    #[test]
    fn test_password_ages_never_in_add_command() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            password_min_age: Some(5),
            ..myuser()
        };
        assert_eq!(
            synth.build_create(&spec).unwrap(),
            ["/usr/sbin/useradd", "myuser"]
        );
    }

    #[test]
    fn test_unknown_property_is_rejected() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = myuser().with_property("favourite_colour", "blue");
        assert_eq!(
            synth.build_create(&spec),
            Err(PlanError::UnknownProperty("favourite_colour".to_string()))
        );
    }

    #[test]
    fn test_custom_tool_paths() {
        let caps = linux(true);
        let tools = ToolPaths {
            add: "/sbin/useradd".to_string(),
            ..ToolPaths::default()
        };
        let table = PropertyTable::default();
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        assert_eq!(synth.build_create(&myuser()).unwrap().program(), "/sbin/useradd");
    }

    #[test]
    fn test_uid_declared_twice_is_rejected() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            uid: Some(6),
            ..myuser().with_property("uid", "5")
        };
        assert_eq!(
            synth.build_create(&spec),
            Err(PlanError::ConflictingAttribute("uid".to_string()))
        );
    }

    #[test]
    fn test_declared_uid_alone_is_rendered_once() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = myuser().with_property("uid", "5");
        assert_eq!(
            synth.build_create(&spec).unwrap(),
            ["/usr/sbin/useradd", "-u", "5", "myuser"]
        );
    }
}

mod home_tests {
    use super::*;

    #[test]
    fn test_redhat_unmanaged_home_gets_capital_m() {
        let caps = PlatformCapabilities::new(true, true, "RedHat");
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        assert!(synth.build_create(&myuser()).unwrap().contains("-M"));
    }

    #[test]
    fn test_other_os_unmanaged_home_gets_nothing() {
        let caps = PlatformCapabilities::new(true, true, "some OS");
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let cmd = synth.build_create(&myuser()).unwrap();
        assert!(!cmd.contains("-M"));
        assert!(!cmd.contains("-m"));
    }

    #[test]
    fn test_delete_removes_managed_home() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            manage_home_directory: true,
            ensure: useradd_planner::Ensure::Absent,
            ..myuser()
        };
        assert_eq!(
            synth.build_delete(&spec).unwrap(),
            ["/usr/sbin/userdel", "-r", "myuser"]
        );
        assert_eq!(
            synth.build_delete(&myuser()).unwrap(),
            ["/usr/sbin/userdel", "myuser"]
        );
    }
}

mod password_policy_tests {
    use super::*;

    fn synth_policy(min: Option<i64>, max: Option<i64>) -> Option<Vec<String>> {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            password_min_age: min,
            password_max_age: max,
            allow_duplicate_uid: true,
            manage_home_directory: true,
            is_system_account: true,
            ..myuser()
        };
        synth
            .build_password_policy(&spec)
            .unwrap()
            .map(|c| c.into_tokens())
    }

    #[test]
    fn test_nothing_to_do_without_ages() {
        assert_eq!(synth_policy(None, None), None);
    }

    #[test]
    fn test_min_only() {
        assert_eq!(
            synth_policy(Some(123), None).unwrap(),
            vec!["/usr/bin/chage", "-m", "123", "myuser"]
        );
    }

    #[test]
    fn test_max_only() {
        assert_eq!(
            synth_policy(None, Some(999)).unwrap(),
            vec!["/usr/bin/chage", "-M", "999", "myuser"]
        );
    }

    #[test]
    fn test_min_before_max() {
        assert_eq!(
            synth_policy(Some(123), Some(999)).unwrap(),
            vec!["/usr/bin/chage", "-m", "123", "-M", "999", "myuser"]
        );
    }

    #[test]
    fn test_negative_age_rejected() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            password_min_age: Some(-3),
            ..myuser()
        };
        assert_eq!(
            synth.build_password_policy(&spec),
            Err(PlanError::NegativePasswordAge {
                field: "password_min_age",
                value: -3
            })
        );
        assert!(synth.plan_create(&spec).is_err());
    }
}

mod modify_tests {
    use super::*;

    #[test]
    fn test_uid_with_allowdupe() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let spec = AccountSpec {
            allow_duplicate_uid: true,
            ..myuser()
        };
        assert_eq!(
            synth
                .build_modify_attribute(&spec, "uid", "150")
                .unwrap()
                .unwrap(),
            ["/usr/sbin/usermod", "-u", "150", "-o", "myuser"]
        );
    }

    #[test]
    fn test_expiry_modification_keeps_combined_token() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        assert_eq!(
            synth
                .build_modify_attribute(&myuser(), "expiry_date", "2030-01-01")
                .unwrap()
                .unwrap(),
            ["/usr/sbin/usermod", "-e 2030-01-01", "myuser"]
        );
    }

    #[test]
    fn test_each_change_gets_its_own_invocation() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let changes = vec![
            AttributeChange::new("comment", "Jane Doe"),
            AttributeChange::new("shell", "/bin/zsh"),
            AttributeChange::new("password_min_age", "7"),
        ];
        let plan = synth
            .plan_transition(&myuser(), &Transition::Modify(changes))
            .unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(
            plan.invocations()[0],
            ["/usr/sbin/usermod", "-c", "Jane Doe", "myuser"]
        );
        assert_eq!(
            plan.invocations()[1],
            ["/usr/sbin/usermod", "-s", "/bin/zsh", "myuser"]
        );
        assert_eq!(plan.invocations()[2], ["/usr/bin/chage", "-m", "7", "myuser"]);
    }

    #[test]
    fn test_password_age_dropped_without_aging_support() {
        let caps = PlatformCapabilities::new(true, false, "Debian");
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let changes = vec![
            AttributeChange::new("shell", "/bin/zsh"),
            AttributeChange::new("password_max_age", "90"),
        ];
        let plan = synth
            .plan_transition(&myuser(), &Transition::Modify(changes))
            .unwrap();
        assert_eq!(
            plan,
            CommandPlan::from(vec![
                CommandInvocation::new("/usr/sbin/usermod").args(["-s", "/bin/zsh", "myuser"])
            ])
        );
    }

    #[test]
    fn test_only_password_age_without_aging_support_is_nothing_to_do() {
        let caps = PlatformCapabilities::new(true, false, "Debian");
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let changes = vec![AttributeChange::new("password_min_age", "1")];
        assert!(synth.plan_modify(&myuser(), &changes).unwrap().is_empty());
    }
}

mod transition_tests {
    use super::*;

    #[test]
    fn test_unchanged_is_empty_plan() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        assert_eq!(
            synth
                .plan_transition(&myuser(), &Transition::Unchanged)
                .unwrap(),
            CommandPlan::new()
        );
    }

    #[test]
    fn test_delete_plan() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let plan = synth.plan_transition(&myuser(), &Transition::Delete).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.invocations()[0], ["/usr/sbin/userdel", "myuser"]);
    }

    #[test]
    fn test_create_plan_without_policy() {
        let caps = linux(true);
        let (tools, table) = (tools(), PropertyTable::default());
        let synth = CommandSynthesizer::new(&caps, &tools, &table);
        let plan = synth.plan_transition(&myuser(), &Transition::Create).unwrap();
        assert_eq!(plan.len(), 1);
    }
}
