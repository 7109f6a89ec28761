use course_watch::core::watch::BoardMode;
use course_watch::core::ConfigProvider;
use course_watch::utils::validation::Validate;
use course_watch::{open_fetcher, BoardConfig, TerminalDashboard, WatchEngine};
use httpmock::prelude::*;

const SEARCH_PAGE: &str = r#"<html><body>
<form action="cc100.action"><input id="srchOpenSchyy" name="srchOpenSchyy" value=""></form>
</body></html>"#;

fn result_page(section: &str, title: &str, capacity: &str, current: &str) -> String {
    let mut cells: Vec<String> = (0..15).map(|i| format!("c{}", i)).collect();
    cells[3] = section.to_string();
    cells[6] = title.to_string();
    cells[13] = capacity.to_string();
    cells[14] = current.to_string();
    let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
    format!(
        r#"<html><body><table class="tbl_basic"><tbody><tr>{}</tr></tbody></table></body></html>"#,
        tds
    )
}

fn board_toml(endpoint: &str) -> String {
    format!(
        r#"
[source]
endpoint = "{endpoint}"
timeout_seconds = 5

[watch]
interval_seconds = 1
bar_width = 10

[[courses]]
year = 2025
term = "fall"
subject = "100.001"
section = "001"

[[courses]]
year = 2025
term = "fall"
subject = "100.002"
section = "001"

[[courses]]
year = 2025
term = "fall"
subject = "100.003"
section = "001"
label = "Third"

[[courses]]
year = 2025
term = "fall"
subject = "100.004"
section = "009"
"#
    )
}

#[tokio::test]
async fn test_ranked_board_against_mock_site() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/cc100.action");
        then.status(200).body(SEARCH_PAGE);
    });

    let fixtures = [
        ("100.001", result_page("001", "Half Full", "100", "50")),
        ("100.002", result_page("001", "Packed", "80 (100)", "100")),
        ("100.003", result_page("001", "Scraped Title", "100", "90")),
        ("100.004", result_page("001", "Wrong Section", "10", "1")),
    ];
    for (subject, body) in fixtures {
        server.mock(|when, then| {
            when.method(POST)
                .path("/cc100.action")
                .body_contains(format!("srchSbjtCd={}", subject));
            then.status(200).body(body);
        });
    }

    let config = BoardConfig::from_toml_str(&board_toml(&server.url("/cc100.action"))).unwrap();
    config.validate().unwrap();

    let fetcher = open_fetcher(&config).await.unwrap();
    let dashboard = TerminalDashboard::new(Vec::new(), config.bar_width(), false);
    let mut engine = WatchEngine::new(
        fetcher,
        config.layout(),
        dashboard,
        config.courses(),
        config.interval(),
    )
    .with_mode(BoardMode::Ranked);

    let polls = engine.run(Some(1)).await.unwrap();
    assert_eq!(polls, 1);

    let dashboard = engine.shutdown().await.unwrap();
    let text = String::from_utf8(dashboard.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "1. 2025-fall 100.002 (001)");
    assert_eq!(lines[1], "   [##########] 100.0%  Packed (100/100)  FULL");
    assert_eq!(lines[2], "2. 2025-fall 100.003 (001)");
    assert_eq!(lines[3], "   [#########-]  90.0%  Third (90/100)  OPEN");
    assert_eq!(lines[4], "3. 2025-fall 100.001 (001)");
    assert_eq!(lines[5], "   [#####-----]  50.0%  Half Full (50/100)  OPEN");
    assert!(lines[6].starts_with("2025-fall 100.004 (009)  Row not found"));
    assert!(lines[7].starts_with("Last updated: "));
}

#[tokio::test]
async fn test_unreachable_site_keeps_polling() {
    // Nothing listens on port 9 (discard) on test machines.
    let config = BoardConfig::from_toml_str(&board_toml("http://127.0.0.1:9/cc100.action")).unwrap();
    let fetcher = open_fetcher(&config).await.unwrap();
    let dashboard = TerminalDashboard::new(Vec::new(), 10, false);
    let mut engine = WatchEngine::new(
        fetcher,
        config.layout(),
        dashboard,
        config.courses()[..1].to_vec(),
        std::time::Duration::from_millis(10),
    );

    let polls = engine.run(Some(2)).await.unwrap();
    assert_eq!(polls, 2);

    let text = String::from_utf8(engine.shutdown().await.unwrap().into_inner()).unwrap();
    assert_eq!(text.matches("Failed to reach the registration site").count(), 2);
}
