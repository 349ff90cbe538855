use axum::http::StatusCode;
use geoscore::records::{DateFormat, DatePolicy};

mod utils;

use utils::*;

fn season() -> TestSetupBuilder {
    TestSetupBuilder::new()
        .with_row("alice", "2024-01-01", "21000")
        .with_row("bob", "2024-01-01", "16000")
        .with_row("alice", "2024-01-02", "25000")
        .with_row("carol", "2024-01-02", "9000")
        .with_row("bob", "2024-01-03", "25000")
        .with_row("carol", "2024-01-03", "11000")
}

#[tokio::test]
async fn test_messy_sheet_is_cleaned_and_bad_rows_reported() {
    let setup = TestSetupBuilder::new()
        .with_header(" PLAYER ,Date,Score")
        .with_row("  alice   smith ", "15/03/2024", "20000")
        .with_row("BOB", "03/15/2024", "18000.0")
        .with_line(",,")
        .with_row("carol", "2024-03-15", "25001")
        .with_row("", "2024-03-15", "100")
        .with_row("dave", "2024-03-15", "12.5")
        .build();

    let players = setup.get("/players").await;
    players.assert_ok();
    assert_eq!(players.players(), vec!["Alice Smith", "Bob"]);
    assert_eq!(players.body["rejected_rows"], 3);

    let history = setup.get("/players/bob/history").await;
    history.assert_ok();
    assert_eq!(history.data()[0]["date"], "2024-03-15");
    assert_eq!(history.data()[0]["score"], 18000);

    let rejected = setup.get("/rejected").await;
    rejected.assert_ok();
    let rows: Vec<u64> = rejected
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["row"]["row_number"].as_u64().unwrap())
        .collect();
    // Row 4 is blank and skipped without a rejection.
    assert_eq!(rows, vec![5, 6, 7]);
    assert_eq!(rejected.data()[0]["issues"][0]["kind"], "score_out_of_range");
    assert_eq!(rejected.data()[1]["issues"][0]["kind"], "empty_player");
    assert_eq!(rejected.data()[2]["issues"][0]["kind"], "score_not_whole");
}

#[tokio::test]
async fn test_explicit_date_format_resolves_ambiguous_dates() {
    let setup = TestSetupBuilder::new()
        .with_date_policy(DatePolicy::Explicit(DateFormat::MonthDayYear))
        .with_row("alice", "01/02/2024", "20000")
        .with_row("alice", "2024-01-05", "20000")
        .build();

    let history = setup.get("/players/alice/history").await;

    history.assert_ok();
    assert_eq!(history.data().as_array().unwrap().len(), 1);
    assert_eq!(history.data()[0]["date"], "2024-01-02");
    assert_eq!(history.body["rejected_rows"], 1);
}

#[tokio::test]
async fn test_leaderboard_ranks_by_each_metric() {
    let setup = season().build();

    let average = setup.get("/leaderboard").await;
    average.assert_ok();
    assert_eq!(average.players(), vec!["Alice", "Bob", "Carol"]);
    assert_eq!(average.data()[0]["rank"], 1);
    assert_eq!(average.data()[0]["average_score"], 23000.0);

    let best = setup.get("/leaderboard?metric=best").await;
    best.assert_ok();
    // Alice and Bob tie on 25000; the tie goes to the name that sorts first.
    assert_eq!(best.players(), vec!["Alice", "Bob", "Carol"]);

    let total = setup.get("/leaderboard?metric=total&limit=2").await;
    total.assert_ok();
    assert_eq!(total.players(), vec!["Alice", "Bob"]);
    assert_eq!(total.data()[1]["total_score"], 41000);
}

#[tokio::test]
async fn test_date_range_narrows_every_view() {
    let setup = season().build();

    let summary = setup.get("/summary?start=2024-01-02").await;
    summary.assert_ok();
    assert_eq!(summary.data()["total_games"], 4);
    assert_eq!(summary.data()["first_date"], "2024-01-02");

    let perfect = setup.get("/perfect-games?end=2024-01-02").await;
    perfect.assert_ok();
    assert_eq!(perfect.data()["overall"], 1);
    assert!(perfect.data()["per_player"]["Bob"].is_null());

    let h2h = setup
        .get("/compare?player1=carol&player2=bob&start=2024-01-03")
        .await;
    h2h.assert_ok();
    assert_eq!(h2h.data()["shared_dates"], 1);
    assert_eq!(h2h.data()["average_score_diff"], -14000.0);

    let empty = setup.get("/summary?start=2024-02-01&end=2024-01-01").await;
    empty.assert_ok();
    assert_eq!(empty.data()["total_games"], 0);
    assert!(empty.data()["first_date"].is_null());
}

#[tokio::test]
async fn test_invalid_date_range_is_rejected() {
    let setup = season().build();

    let response = setup.get("/summary?start=yesterday").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trend_needs_ten_games() {
    let setup = TestSetupBuilder::new()
        .with_daily_scores(
            "alice",
            &[10000, 10000, 10000, 10000, 10000, 20000, 20000, 20000, 20000],
        )
        .build();

    let short = setup.get("/players/alice/trend").await;
    short.assert_ok();
    assert_eq!(short.data()["trend"], "insufficient_data");
    assert!(short.data()["delta"].is_null());

    setup
        .edit_sheet(&[
            ("alice", "2024-01-01", "10000"),
            ("alice", "2024-01-02", "10000"),
            ("alice", "2024-01-03", "10000"),
            ("alice", "2024-01-04", "10000"),
            ("alice", "2024-01-05", "10000"),
            ("alice", "2024-01-06", "20000"),
            ("alice", "2024-01-07", "20000"),
            ("alice", "2024-01-08", "20000"),
            ("alice", "2024-01-09", "20000"),
            ("alice", "2024-01-10", "20000"),
        ])
        .await;
    setup.post("/refresh").await.assert_ok();

    let full = setup.get("/players/alice/trend").await;
    full.assert_ok();
    assert_eq!(full.data()["trend"], "improving");
    assert_eq!(full.data()["delta"], 10000.0);
}

#[tokio::test]
async fn test_declining_trend_shows_on_player_stats() {
    let setup = TestSetupBuilder::new()
        .with_daily_scores(
            "bob",
            &[20000, 20000, 20000, 20000, 20000, 19000, 19000, 19000, 19000, 19000],
        )
        .build();

    let stats = setup.get("/players/Bob").await;

    stats.assert_ok();
    assert_eq!(stats.data()["trend"], "declining");
    assert_eq!(stats.data()["trend_delta"], -1000.0);
    assert_eq!(stats.data()["worst_score"], 19000);
}

#[tokio::test]
async fn test_weekly_time_series_groups_by_monday() {
    // 2024-01-01 is a Monday.
    let setup = TestSetupBuilder::new()
        .with_daily_scores("carol", &[1000, 2000, 3000, 4000, 5000, 6000, 7000, 8000])
        .build();

    let series = setup.get("/timeseries?period=week").await;

    series.assert_ok();
    let points = series.data().as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["period_start"], "2024-01-01");
    assert_eq!(points[0]["games_played"], 7);
    assert_eq!(points[0]["average_score"], 4000.0);
    assert_eq!(points[1]["period_start"], "2024-01-08");
    assert_eq!(points[1]["best_score"], 8000);
}

#[tokio::test]
async fn test_cached_load_is_reused_until_ttl_expires() {
    let setup = season().with_ttl_secs(60).build();

    setup.get("/summary").await.assert_ok();
    setup.edit_sheet(&[("zoe", "2024-02-01", "25000")]).await;

    setup.advance_secs(59);
    let cached = setup.get("/summary").await;
    assert_eq!(cached.data()["total_games"], 6);
    assert_eq!(setup.fetch_count(), 1);

    setup.advance_secs(2);
    let reloaded = setup.get("/summary").await;
    assert_eq!(reloaded.data()["total_games"], 1);
    assert_eq!(setup.fetch_count(), 2);
}

#[tokio::test]
async fn test_zero_ttl_reads_the_sheet_on_every_request() {
    let setup = season().with_ttl_secs(0).build();

    setup.get("/summary").await.assert_ok();
    setup.get("/leaderboard").await.assert_ok();

    assert_eq!(setup.fetch_count(), 2);
}

#[tokio::test]
async fn test_outage_serves_last_good_load_marked_stale() {
    let setup = season().with_ttl_secs(60).build();
    let before = setup.get("/summary").await;
    assert!(!before.is_stale());

    setup.go_offline();
    setup.advance_secs(120);

    let during = setup.get("/summary").await;
    during.assert_ok();
    assert!(during.is_stale());
    assert_eq!(during.data()["total_games"], 6);
    assert_eq!(during.body["loaded_at"], before.body["loaded_at"]);

    let refresh = setup.post("/refresh").await;
    refresh.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(refresh.error().contains("unavailable"));

    setup.come_back_online();
    let after = setup.get("/summary").await;
    after.assert_ok();
    assert!(!after.is_stale());
}

#[tokio::test]
async fn test_failed_refresh_reports_error_and_keeps_cached_load() {
    let setup = season().with_ttl_secs(300).build();
    setup.get("/summary").await.assert_ok();

    setup.go_offline();
    let refresh = setup.post("/refresh").await;
    refresh.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(!refresh.is_stale());

    // Still inside the TTL, so the cached load is served as fresh.
    let summary = setup.get("/summary").await;
    summary.assert_ok();
    assert!(!summary.is_stale());
    assert_eq!(summary.data()["total_games"], 6);
    // The initial load and the failed refresh; the last GET hit the cache.
    assert_eq!(setup.fetch_count(), 2);
}

#[tokio::test]
async fn test_unreachable_sheet_without_history_is_an_error() {
    let setup = season().build();
    setup.go_offline();

    let response = setup.get("/leaderboard").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_missing_columns_are_named() {
    let setup = TestSetupBuilder::new()
        .with_header("name,when,points")
        .with_row("alice", "2024-01-01", "1")
        .build();

    let response = setup.get("/summary").await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.error().contains("player, date, score"));
}

#[tokio::test]
async fn test_unknown_player_is_not_found() {
    let setup = season().build();

    setup
        .get("/players/zed/trend")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    setup
        .get("/compare?player1=alice&player2=zed")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    setup
        .get("/timeseries?player=zed")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
