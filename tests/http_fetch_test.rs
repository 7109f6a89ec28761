use course_watch::core::PageFetcher;
use course_watch::{
    CourseStatus, HttpConfig, HttpFetcher, Query, StatusFetcher, TableLayout, Term, WatchError,
};
use httpmock::prelude::*;
use std::time::Duration;

const SEARCH_PAGE: &str = r#"
<html><body>
  <form id="CC100" method="post" action="/uni/sugang/cc/cc100.action?mode=search">
    <input type="hidden" name="workType" value="S">
    <input type="text" id="srchOpenSchyy" name="srchOpenSchyy" value="2024">
    <select id="srchOpenShtm" name="srchOpenShtm">
      <option value="U000200001U000300001" selected>1</option>
    </select>
    <input type="text" id="srchSbjtCd" name="srchSbjtCd" value="">
  </form>
  <table class="tbl_basic"><tbody></tbody></table>
</body></html>"#;

fn result_row(section: &str, title: &str, capacity: &str, current: &str) -> String {
    let mut cells: Vec<String> = (0..16).map(|i| format!("c{}", i)).collect();
    cells[7] = section.to_string();
    cells[6] = title.to_string();
    cells[13] = capacity.to_string();
    cells[14] = current.to_string();
    let tds: String = cells.iter().map(|c| format!("<td>{}</td>", c)).collect();
    format!("<tr>{}</tr>", tds)
}

fn result_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table class="tbl_basic">
<thead><tr><th>No</th><th>Section</th></tr></thead>
<tbody>{}</tbody></table></body></html>"#,
        rows.concat()
    )
}

fn fetcher_for(server: &MockServer, timeout: Duration) -> HttpFetcher {
    HttpFetcher::new(HttpConfig {
        endpoint: server.url("/uni/sugang/cc/cc100.action"),
        timeout,
        user_agent: "course-watch-test".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_found_full_section() {
    let server = MockServer::start();

    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/uni/sugang/cc/cc100.action");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(SEARCH_PAGE);
    });

    let body = result_page(&[
        result_row("001", "Other Section", "40", "12"),
        result_row("002", "Intro to Crystallography", "80(75)", "75"),
    ]);
    let search_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/uni/sugang/cc/cc100.action")
            .query_param("mode", "search")
            .body_contains("workType=S")
            .body_contains("srchOpenSchyy=2025")
            .body_contains("srchOpenShtm=U000200002U000300001")
            .body_contains("srchSbjtCd=445.206");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(body);
    });

    let mut status_fetcher = StatusFetcher::new(
        fetcher_for(&server, Duration::from_secs(5)),
        TableLayout::default(),
    );
    let query = Query::new(2025, Term::Fall, "445.206", "002");
    let status = status_fetcher.fetch(&query).await.unwrap();

    page_mock.assert();
    search_mock.assert();

    let enrollment = status.enrollment().unwrap();
    assert_eq!(enrollment.title, "Intro to Crystallography");
    assert_eq!(enrollment.capacity, 75);
    assert_eq!(enrollment.current, 75);
    assert!(enrollment.is_full());
}

#[tokio::test]
async fn test_section_missing_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/uni/sugang/cc/cc100.action");
        then.status(200).body(SEARCH_PAGE);
    });
    let body = result_page(&[result_row("002A", "Lookalike", "30", "3")]);
    server.mock(|when, then| {
        when.method(POST).path("/uni/sugang/cc/cc100.action");
        then.status(200).body(body);
    });

    let mut status_fetcher = StatusFetcher::new(
        fetcher_for(&server, Duration::from_secs(5)),
        TableLayout::default(),
    );
    let status = status_fetcher
        .fetch(&Query::new(2025, Term::Fall, "445.206", "002"))
        .await
        .unwrap();
    assert_eq!(status, CourseStatus::NotFound);
}

#[tokio::test]
async fn test_page_without_form_posts_bare_parameters() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/uni/sugang/cc/cc100.action");
        then.status(200).body("<html><body>maintenance banner</body></html>");
    });
    let body = result_page(&[result_row("003", "Bare", "1,200", "1,150")]);
    let search_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/uni/sugang/cc/cc100.action")
            .body_contains("srchSbjtCd=100.100");
        then.status(200).body(body);
    });

    let mut fetcher = fetcher_for(&server, Duration::from_secs(5));
    let layout = TableLayout::default();
    let rows = fetcher
        .search(&Query::new(2025, Term::Summer, "100.100", "003"), &layout)
        .await
        .unwrap();
    search_mock.assert();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][13], "1,200");
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/uni/sugang/cc/cc100.action");
        then.status(503);
    });

    let mut fetcher = fetcher_for(&server, Duration::from_secs(5));
    let err = fetcher
        .search(&Query::new(2025, Term::Fall, "445.206", "002"), &TableLayout::default())
        .await
        .unwrap_err();
    assert!(matches!(err, WatchError::TransportError { .. }));
    assert!(!err.is_timeout());
}

#[tokio::test]
async fn test_slow_results_time_out() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/uni/sugang/cc/cc100.action");
        then.status(200).body(SEARCH_PAGE);
    });
    server.mock(|when, then| {
        when.method(POST).path("/uni/sugang/cc/cc100.action");
        then.status(200)
            .delay(Duration::from_secs(3))
            .body(result_page(&[]));
    });

    let mut fetcher = fetcher_for(&server, Duration::from_secs(1));
    let err = fetcher
        .search(&Query::new(2025, Term::Fall, "445.206", "002"), &TableLayout::default())
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(matches!(err, WatchError::TimeoutError { ref stage, seconds: 1 } if stage == "result table"));
}
