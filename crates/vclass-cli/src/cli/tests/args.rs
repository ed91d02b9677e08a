use super::*;

#[test]
fn cli_parse_no_subcommand_is_menu() {
    let cli = parse(&["vclass"]);
    assert_eq!(cli.command, None);
    assert_eq!(cli.base_url, None);
}

#[test]
fn cli_parse_menu() {
    assert_eq!(parse(&["vclass", "menu"]).command, Some(CliCommand::Menu));
}

#[test]
fn cli_parse_courses() {
    match parse(&["vclass", "courses"]).command {
        Some(CliCommand::Courses { filter }) => assert_eq!(filter, None),
        other => panic!("expected Courses, got {:?}", other),
    }
}

#[test]
fn cli_parse_courses_with_filter() {
    match parse(&["vclass", "courses", "--filter", "Budi"]).command {
        Some(CliCommand::Courses { filter }) => assert_eq!(filter.as_deref(), Some("Budi")),
        other => panic!("expected Courses, got {:?}", other),
    }
}

#[test]
fn cli_parse_detail() {
    match parse(&["vclass", "detail", "https://v-class.example/course/view.php?id=5"]).command {
        Some(CliCommand::Detail { link }) => {
            assert_eq!(link, "https://v-class.example/course/view.php?id=5")
        }
        other => panic!("expected Detail, got {:?}", other),
    }
}

#[test]
fn cli_parse_timeline_and_calendar() {
    assert_eq!(parse(&["vclass", "timeline"]).command, Some(CliCommand::Timeline));
    assert_eq!(parse(&["vclass", "calendar"]).command, Some(CliCommand::Calendar));
}

#[test]
fn cli_parse_global_base_url() {
    let cli = parse(&["vclass", "timeline", "--base-url", "http://localhost:8080"]);
    assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
    let cli = parse(&["vclass", "--base-url", "http://localhost:8080"]);
    assert_eq!(cli.base_url.as_deref(), Some("http://localhost:8080"));
    assert_eq!(cli.command, None);
}

#[test]
fn cli_rejects_detail_without_link() {
    assert!(Cli::try_parse_from(["vclass", "detail"]).is_err());
}
