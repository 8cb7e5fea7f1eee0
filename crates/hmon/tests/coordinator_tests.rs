//! Tests for batch coordination and run aggregation

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use hmon::{
    Batch, Coordinator, DiagnosticObserver, EngineConfig, EngineError, ExecutionMode, FailureKind,
    MonitorSpec, RunSummary,
};

/// Server answering /ok with "system OK" and /down with "system DOWN"
async fn status_server() -> mockito::ServerGuard {
    let mut server = mockito::Server::new_async().await;
    server.mock("GET", "/ok").with_body("system OK").create_async().await;
    server.mock("GET", "/down").with_body("system DOWN").create_async().await;
    server
}

fn mixed_batch(base: &str, slow_url: &str) -> Batch {
    Batch::new(
        "mixed",
        [
            MonitorSpec::new("ok-1", format!("{base}/ok")).with_assertion("OK"),
            MonitorSpec::new("down", format!("{base}/down")).with_assertion("OK"),
            MonitorSpec::new("slow", slow_url).with_timeout_ms(200),
            MonitorSpec::new("ok-2", format!("{base}/ok")),
            MonitorSpec::new("missing-payload", format!("{base}/ok")).with_payload("nope.xml"),
        ],
    )
}

fn coordinator(mode: ExecutionMode) -> Coordinator {
    let config = EngineConfig::builder().mode(mode).build();
    Coordinator::new(&config).unwrap()
}

#[tokio::test]
async fn test_parallel_returns_one_result_per_monitor() {
    common::init();
    let server = status_server().await;
    let slow = common::silent_server().await;
    let batch = mixed_batch(&server.url(), &slow);

    let result = coordinator(ExecutionMode::Parallel).run_batch(&batch, None).await.unwrap();

    assert_eq!(result.name(), "mixed");
    assert_eq!(result.len(), batch.len());
    for monitor in &batch.monitors {
        let matching = result.results().iter().filter(|result| result.is_for(monitor)).count();
        assert_eq!(matching, 1, "monitor {}", monitor.name);
    }

    assert!(result.get("ok-1").unwrap().is_success());
    assert!(result.get("ok-2").unwrap().is_success());
    assert_eq!(result.get("down").unwrap().outcome().kind(), Some(FailureKind::Assertion));
    assert_eq!(result.get("slow").unwrap().outcome().kind(), Some(FailureKind::Timeout));
    assert_eq!(
        result.get("missing-payload").unwrap().outcome().kind(),
        Some(FailureKind::PayloadRead)
    );
}

#[tokio::test]
async fn test_sequential_preserves_input_order() {
    common::init();
    let server = status_server().await;
    let slow = common::silent_server().await;
    let batch = mixed_batch(&server.url(), &slow);

    let result = coordinator(ExecutionMode::Sequential).run_batch(&batch, None).await.unwrap();

    let names: Vec<_> =
        result.results().iter().map(|result| result.monitor().name.as_str()).collect();
    assert_eq!(names, ["ok-1", "down", "slow", "ok-2", "missing-payload"]);
    for (result, monitor) in result.results().iter().zip(&batch.monitors) {
        assert!(result.is_for(monitor));
    }
}

#[tokio::test]
async fn test_parallel_overlaps_checks() {
    common::init();
    let slow = common::silent_server().await;
    let batch = Batch::new(
        "slow",
        (0..4).map(|i| MonitorSpec::new(format!("slow-{i}"), slow.as_str()).with_timeout_ms(300)),
    );

    let started = Instant::now();
    let result = coordinator(ExecutionMode::Parallel).run_batch(&batch, None).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.summary(), RunSummary { total: 4, success: 0, failure: 4 });
    assert!(elapsed < Duration::from_millis(1_000), "checks did not overlap: {elapsed:?}");
}

#[tokio::test]
async fn test_sequential_runs_one_at_a_time() {
    common::init();
    let slow = common::silent_server().await;
    let batch = Batch::new(
        "slow",
        (0..3).map(|i| MonitorSpec::new(format!("slow-{i}"), slow.as_str()).with_timeout_ms(200)),
    );

    let started = Instant::now();
    let result = coordinator(ExecutionMode::Sequential).run_batch(&batch, None).await.unwrap();

    assert_eq!(result.len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_concurrency_limit_bounds_in_flight_checks() {
    common::init();
    let slow = common::silent_server().await;
    let batch = Batch::new(
        "slow",
        (0..3).map(|i| MonitorSpec::new(format!("slow-{i}"), slow.as_str()).with_timeout_ms(200)),
    );
    let config = EngineConfig::builder().max_concurrency(1).build();

    let started = Instant::now();
    let result = Coordinator::new(&config).unwrap().run_batch(&batch, None).await.unwrap();

    assert_eq!(result.len(), 3);
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_empty_batch() {
    common::init();
    let batch = Batch::new("empty", Vec::<MonitorSpec>::new());

    for mode in [ExecutionMode::Parallel, ExecutionMode::Sequential] {
        let result = coordinator(mode).run_batch(&batch, None).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(result.name(), "empty");
    }
}

#[tokio::test]
async fn test_observer_called_once_per_check() {
    common::init();
    let server = status_server().await;
    let slow = common::silent_server().await;
    let batch = mixed_batch(&server.url(), &slow);

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let observer: Arc<dyn DiagnosticObserver> =
        Arc::new(move |_: &str, _: Option<&[u8]>, _: Option<&[u8]>| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    coordinator(ExecutionMode::Parallel).run_batch(&batch, Some(observer)).await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), batch.len());
}

#[tokio::test]
async fn test_run_aggregates_batches() -> anyhow::Result<()> {
    common::init();
    let server = status_server().await;
    let base = server.url();
    let first = Batch::new(
        "first",
        [
            MonitorSpec::new("ok", format!("{base}/ok")).with_assertion("OK"),
            MonitorSpec::new("down", format!("{base}/down")).with_assertion("OK"),
        ],
    );
    let second = Batch::new("second", [MonitorSpec::new("ok", format!("{base}/ok"))]);
    let batches = vec![first, second];

    let report = Coordinator::new(&EngineConfig::default())?.run(&batches, None).await?;

    assert_eq!(report.summary, RunSummary { total: 3, success: 2, failure: 1 });
    assert!(!report.summary.all_passed());
    assert_eq!(report.batch("first").map(|batch| batch.len()), Some(2));
    assert_eq!(report.batch("second").map(|batch| batch.summary().success), Some(1));
    Ok(())
}

#[tokio::test]
async fn test_run_rejects_duplicate_batch_names() {
    common::init();
    let mut server = mockito::Server::new_async().await;
    let mock = server.mock("GET", "/").expect(0).create_async().await;
    let batches = [
        Batch::new("grp", [MonitorSpec::new("a", server.url())]),
        Batch::new("grp", [MonitorSpec::new("b", server.url())]),
    ];

    let error = coordinator(ExecutionMode::Parallel).run(&batches, None).await.unwrap_err();

    assert!(matches!(&error, EngineError::DuplicateBatch(name) if name == "grp"), "{error}");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_merged_batch_shares_specs() {
    common::init();
    let server = status_server().await;
    let base = server.url();
    let first = Batch::new("first", [MonitorSpec::new("a", format!("{base}/ok"))]);
    let second = Batch::new("second", [MonitorSpec::new("b", format!("{base}/down"))]);
    let merged = Batch::merge("all", [&first, &second]);

    let result = coordinator(ExecutionMode::Parallel).run_batch(&merged, None).await.unwrap();

    assert_eq!(result.len(), 2);
    assert!(result.results().iter().any(|result| result.is_for(&first.monitors[0])));
    assert!(result.results().iter().any(|result| result.is_for(&second.monitors[0])));
}

#[tokio::test]
async fn test_serialized_report() -> anyhow::Result<()> {
    common::init();
    let server = status_server().await;
    let batch = Batch::new(
        "group",
        [MonitorSpec::new("down", format!("{}/down", server.url())).with_assertion("OK")],
    );

    let report = coordinator(ExecutionMode::Sequential).run(&[batch], None).await?;
    let value = serde_json::to_value(&report)?;

    assert_eq!(value["summary"]["failure"], 1);
    assert_eq!(value["batches"][0]["name"], "group");
    let record = &value["batches"][0]["results"][0];
    assert_eq!(record["status"], "failure");
    assert_eq!(record["failure_kind"], "assertion");
    assert_eq!(record["error"], "assertion failed for regex `OK`");
    Ok(())
}
