use mockito::{Matcher, Server};
use serde_json::json;
use trade_flow_ingestor::{
    aggregate,
    config::IngestorConfig,
    errors::ErrorKind,
    models::{category::TradeCategory, date::parse_query_date, request_params::CollectParams},
    providers::{TradeFlowProvider, cafef::CafefProvider},
};

fn provider_for(server: &Server) -> CafefProvider {
    let mut config = IngestorConfig::default();
    config.cafef.base_url = server.url();
    config.http.timeout_secs = 5;
    CafefProvider::new(&config).unwrap()
}

fn foreign_body(total: u64, days: &[&str]) -> String {
    let rows: Vec<_> = days
        .iter()
        .map(|d| json!({"Ngay": d, "KLGDRong": 1000, "GTDGRong": 2.5, "ThayDoi": "25,800(0.4 %)"}))
        .collect();
    json!({"Data": {"TotalCount": total, "Data": rows}, "Success": true}).to_string()
}

fn page(index: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("Symbol".into(), "HPG".into()),
        Matcher::UrlEncoded("PageIndex".into(), index.into()),
        Matcher::UrlEncoded("PageSize".into(), "3".into()),
    ])
}

#[test]
fn collects_all_pages_in_request_order() {
    let mut server = Server::new();
    let first = server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(page("1"))
        .with_header("content-type", "application/json")
        .with_body(foreign_body(4, &["05/12/2025", "04/12/2025", "03/12/2025"]))
        .expect(1)
        .create();
    let second = server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(page("2"))
        .with_header("content-type", "application/json")
        .with_body(foreign_body(4, &["02/12/2025"]))
        .expect(1)
        .create();
    let third = server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(page("3"))
        .expect(0)
        .create();

    let provider = provider_for(&server);
    let params = CollectParams::new("HPG").with_page_size(3);
    let set = provider.fetch_trades(TradeCategory::Foreign, &params).unwrap();

    first.assert();
    second.assert();
    third.assert();
    assert_eq!(set.len(), 4);
    let days: Vec<_> = set
        .records
        .iter()
        .map(|r| r.get("Ngay").and_then(|v| v.as_str()).unwrap().to_string())
        .collect();
    assert_eq!(days, ["05/12/2025", "04/12/2025", "03/12/2025", "02/12/2025"]);
}

#[test]
fn one_month_aggregation_keeps_collected_rows() {
    let mut server = Server::new();
    server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(page("1"))
        .with_body(foreign_body(4, &["05/12/2025", "04/12/2025", "03/12/2025"]))
        .create();
    server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(page("2"))
        .with_body(foreign_body(4, &["02/12/2025"]))
        .create();

    let provider = provider_for(&server);
    let params = CollectParams::new("HPG").with_page_size(3);
    let table = provider.fetch_table(TradeCategory::Foreign, &params).unwrap();
    assert_eq!(table.date_column(), Some("Ngay"));

    let same = aggregate(&table, "1M").unwrap();
    assert_eq!(same, table);
    assert_eq!(same.len(), 4);
}

#[test]
fn empty_page_stops_before_reported_total() {
    let mut server = Server::new();
    server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(page("1"))
        .with_body(foreign_body(100, &["05/12/2025", "04/12/2025", "03/12/2025"]))
        .expect(1)
        .create();
    let empty = server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(page("2"))
        .with_body(foreign_body(100, &[]))
        .expect(1)
        .create();

    let set = provider_for(&server)
        .fetch_trades(TradeCategory::Foreign, &CollectParams::new("HPG").with_page_size(3))
        .unwrap();
    empty.assert();
    assert_eq!(set.len(), 3);
}

#[test]
fn proprietary_list_is_read_from_nested_section() {
    let mut server = Server::new();
    let body = json!({
        "Data": {
            "TotalCount": 2,
            "Data": {
                "ListDataTudoanh": [
                    {"Date": "05/12/2025", "KLcpMua": 100, "KlcpBan": 50},
                    {"Date": "04/12/2025", "KLcpMua": 10, "KlcpBan": 70}
                ]
            }
        },
        "Success": true
    });
    server
        .mock("GET", "/GDTuDoanh.ashx")
        .match_query(Matcher::UrlEncoded("PageIndex".into(), "1".into()))
        .with_body(body.to_string())
        .expect(1)
        .create();

    let provider = provider_for(&server);
    let params = provider.default_params(TradeCategory::Proprietary, "HPG");
    assert_eq!(params.page_size, 1000);

    let table = provider.fetch_table(TradeCategory::Proprietary, &params).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.date_column(), Some("Date"));
}

#[test]
fn date_bounds_are_sent_as_day_month_year() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("StartDate".into(), "01/12/2025".into()),
            Matcher::UrlEncoded("EndDate".into(), "05/12/2025".into()),
        ]))
        .with_body(foreign_body(1, &["05/12/2025"]))
        .expect(1)
        .create();

    let params = CollectParams::new("HPG").with_range(
        parse_query_date("01/12/2025").ok(),
        parse_query_date("05/12/2025").ok(),
    );
    let set = provider_for(&server)
        .fetch_trades(TradeCategory::Foreign, &params)
        .unwrap();
    mock.assert();
    assert_eq!(set.len(), 1);
}

#[test]
fn server_error_is_an_http_error() {
    let mut server = Server::new();
    server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("boom")
        .create();

    let err = provider_for(&server)
        .fetch_trades(TradeCategory::Foreign, &CollectParams::new("HPG"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert!(err.to_string().contains("500"), "{err}");
}

#[test]
fn invalid_json_is_a_parse_error() {
    let mut server = Server::new();
    server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(Matcher::Any)
        .with_body("<html>not json</html>")
        .create();

    let err = provider_for(&server)
        .fetch_trades(TradeCategory::Foreign, &CollectParams::new("HPG"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}

#[test]
fn missing_data_section_is_a_parse_error() {
    let mut server = Server::new();
    server
        .mock("GET", "/GDKhoiNgoai.ashx")
        .match_query(Matcher::Any)
        .with_body(r#"{"Success": false, "Message": "not found"}"#)
        .create();

    let err = provider_for(&server)
        .fetch_trades(TradeCategory::Foreign, &CollectParams::new("HPG"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Parse);
}
