mod common;

use std::sync::Arc;

use chrono::NaiveDate;
use common::{init_logging, Call, FakeApi};
use pretty_assertions::assert_eq;
use reviews_core::{
    CrawlStatus, JobId, ReconcilePolicy, Review, ReviewSet, RowOutcome, TrackedSource,
};
use reviews_engine::{ApiError, EngineConfig, ReviewsEngine, ScheduleRequest};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 10, 10).unwrap()
}

fn config() -> EngineConfig {
    EngineConfig {
        policy: ReconcilePolicy::default(),
        reviews_per_page: 500,
        today: Arc::new(today),
    }
}

fn row(url: &str, job_id: Option<&str>, last_crawl: Option<NaiveDate>) -> TrackedSource {
    TrackedSource {
        website: None,
        url: Some(url.to_string()),
        latest_job_id: job_id.map(JobId::new),
        status: job_id.map(|_| CrawlStatus::Complete),
        last_crawl,
        latest_schedule_message: None,
    }
}

fn days_ago(days: i64) -> Option<NaiveDate> {
    Some(today() - chrono::Duration::days(days))
}

#[tokio::test]
async fn schedule_pass_handles_each_row_in_order() {
    init_logging();
    let api = FakeApi::new()
        .with_status("1", CrawlStatus::Complete, 10)
        .with_status("2", CrawlStatus::Pending, 0);
    let mut engine = ReviewsEngine::new(api, config());
    let input = vec![
        row("https://a.example.com", None, None),
        row("https://b.example.com", Some("1"), days_ago(5)),
        row("https://c.example.com", Some("2"), days_ago(5)),
        row("https://d.example.com", Some("3"), days_ago(1)),
    ];

    let (table, report) = engine.schedule_job_list(&input).await.unwrap();

    assert_eq!(
        engine.api().calls,
        vec![
            Call::Schedule(ScheduleRequest::new("https://a.example.com")),
            Call::Status(JobId::new("1")),
            Call::Schedule(
                ScheduleRequest::new("https://example.com/reviews")
                    .previous_job(Some(JobId::new("1")))
            ),
            Call::Status(JobId::new("2")),
        ]
    );
    assert_eq!(
        report.rows.iter().map(|(_, outcome)| outcome.clone()).collect::<Vec<_>>(),
        vec![
            RowOutcome::Scheduled {
                job_id: JobId::new("101")
            },
            RowOutcome::Scheduled {
                job_id: JobId::new("102")
            },
            RowOutcome::SkippedPending,
            RowOutcome::SkippedCooldown,
        ]
    );

    assert_eq!(table[0].latest_job_id, Some(JobId::new("101")));
    assert_eq!(table[0].status, Some(CrawlStatus::Pending));
    assert_eq!(table[0].last_crawl, Some(today()));
    assert_eq!(table[1].latest_job_id, Some(JobId::new("102")));
    assert_eq!(table[1].website.as_deref(), Some("trustpilot"));
    assert_eq!(table[2].status, Some(CrawlStatus::Pending));
    assert_eq!(table[2].latest_job_id, Some(JobId::new("2")));
    assert_eq!(table[3], input[3]);
}

#[tokio::test]
async fn rows_without_url_are_dropped_and_input_is_untouched() {
    init_logging();
    let mut engine = ReviewsEngine::new(FakeApi::new(), config());
    let input = vec![
        TrackedSource::default(),
        row("https://a.example.com", None, None),
    ];
    let before = input.clone();

    let (table, _) = engine.schedule_job_list(&input).await.unwrap();

    assert_eq!(input, before);
    assert_eq!(table.len(), 1);
    assert_eq!(table[0].url.as_deref(), Some("https://a.example.com"));
}

#[tokio::test]
async fn cooldown_rows_issue_no_calls() {
    init_logging();
    let mut engine = ReviewsEngine::new(FakeApi::new(), config());
    let input = vec![row("https://a.example.com", Some("1"), days_ago(0))];

    let (table, report) = engine.schedule_job_list(&input).await.unwrap();

    assert!(engine.api().calls.is_empty());
    assert_eq!(table, input);
    assert_eq!(report.skipped(), 1);
}

#[tokio::test]
async fn rejected_schedule_keeps_previous_job() {
    init_logging();
    let mut api = FakeApi::new();
    api.reject_schedules = true;
    let mut engine = ReviewsEngine::new(api, config());
    let input = vec![row("https://a.example.com", None, None)];

    let (table, report) = engine.schedule_job_list(&input).await.unwrap();

    assert_eq!(report.rejected(), 1);
    assert_eq!(table[0].latest_job_id, None);
    assert!(table[0]
        .latest_schedule_message
        .as_deref()
        .unwrap()
        .contains("rejected"));
}

#[tokio::test]
async fn first_failing_row_aborts_the_pass() {
    init_logging();
    let mut api = FakeApi::new().with_status("2", CrawlStatus::Complete, 0);
    api.failing_status = Some(JobId::new("1"));
    let mut engine = ReviewsEngine::new(api, config());
    let input = vec![
        row("https://a.example.com", Some("1"), days_ago(9)),
        row("https://b.example.com", Some("2"), days_ago(9)),
    ];

    let err = engine.schedule_job_list(&input).await.unwrap_err();

    assert!(matches!(err, ApiError::Connection { status: Some(500), .. }));
    assert_eq!(engine.api().calls, vec![Call::Status(JobId::new("1"))]);
}

#[tokio::test]
async fn refresh_row_copies_service_fields() {
    init_logging();
    let api = FakeApi::new().with_status("1", CrawlStatus::InProgress, 0);
    let mut engine = ReviewsEngine::new(api, config());

    let refreshed = engine
        .refresh_row(&row("https://old.example.com", Some("1"), days_ago(9)))
        .await
        .unwrap();

    assert_eq!(refreshed.url.as_deref(), Some("https://example.com/reviews"));
    assert_eq!(refreshed.website.as_deref(), Some("trustpilot"));
    assert_eq!(refreshed.status, Some(CrawlStatus::InProgress));
    assert_eq!(refreshed.last_crawl, NaiveDate::from_ymd_opt(2021, 10, 1));

    let untracked = row("https://new.example.com", None, None);
    assert_eq!(engine.refresh_row(&untracked).await.unwrap(), untracked);
    assert_eq!(engine.api().calls.len(), 1);
}

#[tokio::test]
async fn sweep_merges_complete_jobs_into_history_once() {
    init_logging();
    let api = FakeApi::new()
        .with_status("1", CrawlStatus::Complete, 3)
        .with_page("1", 1, "a", 3)
        .with_status("2", CrawlStatus::Pending, 0)
        .with_status("3", CrawlStatus::Complete, 2)
        .with_page("3", 1, "b", 2);
    let mut engine = ReviewsEngine::new(api, config());
    let jobs = vec![
        row("https://a.example.com", Some("1"), days_ago(1)),
        row("https://b.example.com", Some("2"), days_ago(1)),
        row("https://c.example.com", None, None),
        row("https://d.example.com", Some("3"), days_ago(1)),
    ];
    let history: ReviewSet = engine
        .get_job_reviews(&JobId::new("1"), None)
        .await
        .unwrap()
        .1
        .into_iter()
        .take(1)
        .collect();
    engine.api_mut().calls.clear();

    let (table, merged, report) = engine.get_job_list_reviews(&jobs, &history).await.unwrap();

    assert_eq!(merged.len(), 5);
    assert_eq!(history.len(), 1);
    assert_eq!(table[1].status, Some(CrawlStatus::Pending));
    assert_eq!(report.rows[2].1, RowOutcome::Untracked);
    assert_eq!(engine.api().page_calls(), vec![1, 2, 1, 2]);

    // A second sweep over the same state adds nothing.
    let (_, again, _) = engine.get_job_list_reviews(&jobs, &merged).await.unwrap();
    assert_eq!(again, merged);
}

#[tokio::test]
async fn sweep_over_empty_table_makes_no_calls() {
    init_logging();
    let mut engine = ReviewsEngine::new(FakeApi::new(), config());
    let history: ReviewSet = Vec::<Review>::new().into();

    let (table, merged, _) = engine.get_job_list_reviews(&[], &history).await.unwrap();

    assert!(table.is_empty());
    assert!(merged.is_empty());
    assert!(engine.api().calls.is_empty());
}
