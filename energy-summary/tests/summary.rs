mod common;

use std::time::Duration;

use common::{next_link, page, sample, MockApi, Reply, FROM, TO};
use energy_summary::{FailurePolicy, Orchestrator, PipelineError};
use samples_client::{
    domain::{AggregationLevel, Query, Scope, SensorType},
    FetchError, SamplesApi,
};

fn orchestrator() -> Orchestrator {
    Orchestrator::new(SamplesApi::new(Duration::from_secs(5), 100).unwrap())
}

fn base_query(base_url: &str) -> Query {
    Query::new(
        base_url,
        Scope::DataLogger("dl-1".to_string()),
        Some(SensorType::Main),
        FROM,
        TO,
        AggregationLevel::default(),
    )
    .unwrap()
}

fn single_page(delay_ms: u64, samples: Vec<serde_json::Value>) -> Reply {
    Reply::Delayed(Duration::from_millis(delay_ms), page(samples, None))
}

#[tokio::test]
async fn prints_every_level_in_completion_order() {
    let mock = MockApi::default();
    mock.reply(
        "days_1",
        1,
        single_page(450, vec![sample("d1", FROM, &[("A", 12.0), ("B", 3.5)])]),
    )
    .reply(
        "hours_1",
        1,
        Reply::Delayed(
            Duration::from_millis(150),
            page(
                vec![sample("h1", FROM, &[("A", 1.0), ("B", 2.0)])],
                next_link("hours_1", 2),
            ),
        ),
    )
    .reply(
        "hours_1",
        2,
        single_page(
            150,
            vec![sample("h2", FROM + 3600, &[("A", 0.5)]), sample("h3", FROM + 7200, &[])],
        ),
    )
    .reply("minutes_15", 1, single_page(150, vec![sample("q1", FROM, &[("A", 0.25)])]))
    .reply("minutes_1", 1, single_page(0, vec![]));
    let base = mock.serve().await;

    let mut printed = Vec::new();
    let lines = orchestrator()
        .run(
            &base_query(&base),
            &AggregationLevel::ALL,
            FailurePolicy::Abort,
            |line| printed.push(line.to_string()),
        )
        .await
        .unwrap();

    assert_eq!(
        lines,
        vec![
            "minutes_1, count: 0",
            "A: 0.2500 kWh, total: 0.2500 kWh, minutes_15, count: 1",
            "A: 1.5000 kWh, B: 2.0000 kWh, total: 3.5000 kWh, hours_1, count: 3",
            "A: 12.0000 kWh, B: 3.5000 kWh, total: 15.5000 kWh, days_1, count: 1",
        ]
    );
    assert_eq!(printed, lines);
    assert_eq!(mock.hits(), 5);
}

#[tokio::test]
async fn every_level_shares_the_same_filters() {
    let mock = MockApi::default();
    for level in AggregationLevel::ALL {
        mock.reply(level.as_str(), 1, Reply::Json(page(vec![], None)));
    }
    let base = mock.serve().await;

    orchestrator()
        .run(&base_query(&base), &AggregationLevel::ALL, FailurePolicy::Abort, |_| {})
        .await
        .unwrap();

    let requests = mock.requests();
    assert_eq!(requests.len(), 4);

    let mut levels: Vec<&str> = requests
        .iter()
        .map(|r| r["aggregation_level"].as_str())
        .collect();
    levels.sort();
    assert_eq!(levels, vec!["days_1", "hours_1", "minutes_1", "minutes_15"]);

    for params in &requests {
        assert_eq!(params["filter[data_logger]"], "dl-1");
        assert_eq!(params["filter[type]"], "main");
        assert_eq!(params["filter[from]"], FROM.to_string());
        assert_eq!(params["filter[to]"], TO.to_string());
    }
}

#[tokio::test]
async fn fetch_failure_aborts_the_run() {
    let mock = MockApi::default();
    mock.reply("days_1", 1, single_page(300, vec![sample("d1", FROM, &[("A", 1.0)])]))
        .reply("hours_1", 1, single_page(300, vec![]))
        .reply("minutes_15", 1, Reply::Status(503))
        .reply("minutes_1", 1, single_page(300, vec![]));
    let base = mock.serve().await;

    let mut printed = Vec::new();
    let res = orchestrator()
        .run(
            &base_query(&base),
            &AggregationLevel::ALL,
            FailurePolicy::Abort,
            |line| printed.push(line.to_string()),
        )
        .await;

    assert!(matches!(
        res,
        Err(PipelineError::Fetch(FetchError::Status { .. }))
    ));
    assert!(printed.is_empty());
}

#[tokio::test]
async fn partial_policy_keeps_successful_levels() {
    let mock = MockApi::default();
    mock.reply("days_1", 1, Reply::Json(page(vec![sample("d1", FROM, &[("A", 1.0)])], None)))
        .reply("hours_1", 1, Reply::Raw("not json"));
    let base = mock.serve().await;

    let levels = [AggregationLevel::Days1, AggregationLevel::Hours1];
    let mut printed = Vec::new();
    let res = orchestrator()
        .run(
            &base_query(&base),
            &levels,
            FailurePolicy::ReportPartial,
            |line| printed.push(line.to_string()),
        )
        .await;

    assert!(matches!(
        res,
        Err(PipelineError::Incomplete { failed: 1, total: 2 })
    ));
    assert_eq!(printed, vec!["A: 1.0000 kWh, total: 1.0000 kWh, days_1, count: 1"]);
}
