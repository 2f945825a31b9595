/* tests/end_to_end.rs */

use bind_zone_builder::xml::parse_config;
use bind_zone_builder::{ConfigError, ZoneSync};
use chrono::NaiveDate;
use std::fs;

const CONFIG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<domains>
	<domain name="example.com" admin="hostmaster@example.com" ttl="1d" refresh="3h" retry="15m" expire="1w" negttl="1h">
		<record type="NS" value="ns1.example.com" />
		<record type="A" value="203.0.113.5" />
	</domain>
</domains>
"#;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

#[test]
fn first_run_writes_second_run_is_quiet() {
    let dir = tempfile::tempdir().unwrap();
    let sync = ZoneSync::for_date(dir.path(), today());

    let zones = parse_config(CONFIG).unwrap();
    let plan = sync.plan(&zones).unwrap();
    sync.apply(&plan).unwrap();

    let files: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files, vec!["db.example.com"]);

    let text = fs::read_to_string(dir.path().join("db.example.com")).unwrap();
    assert_eq!(
        text,
        concat!(
            "$TTL 1d\n",
            "@ IN SOA ns1.example.com hostmaster.example.com. (\n",
            "\t\t\t\t\t\t\t2026101600\t; Serial\n",
            "\t\t\t\t\t\t\t3h\t\t\t; Refresh\n",
            "\t\t\t\t\t\t\t15m\t\t\t; Retry\n",
            "\t\t\t\t\t\t\t1w\t\t\t; Expire\n",
            "\t\t\t\t\t\t\t1h )\t\t; Negative Cache TTL\n",
            "\n",
            "@\t\t\t\t\t\t\tNS\t\t\tns1.example.com\n",
            "\n",
            "@\t\t\t\t\t\t\tA\t\t\t203.0.113.5\n",
        )
    );

    let zones = parse_config(CONFIG).unwrap();
    let plan = sync.plan(&zones).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.unchanged, vec!["example.com"]);
}

#[test]
fn duplicate_domain_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = CONFIG.replace(
        "</domains>",
        r#"	<domain name="example.com" admin="hostmaster@example.com" ttl="1d" refresh="3h" retry="15m" expire="1w" negttl="1h">
		<record type="NS" value="ns2.example.com" />
	</domain>
</domains>"#,
    );

    let err = parse_config(&config).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::DuplicateDomain { ref domain, line: 7 } if domain == "example.com"
    ));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
