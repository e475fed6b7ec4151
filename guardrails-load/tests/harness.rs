use guardrails_load::{
    config::parse_base_url, Credential, Harness, JitterRange, Operation, RunConfig,
};
use std::time::Duration;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_answering(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(path_regex("^/rest/ai-reviewer/1.0/.*"))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

fn config_for(server: &MockServer, concurrency: usize) -> RunConfig {
    RunConfig::builder()
        .base_url(parse_base_url(&server.uri()).unwrap())
        .credential(Credential::new("admin", "admin"))
        .duration(Duration::from_secs(5))
        .concurrency(concurrency)
        .request_timeout(Duration::from_secs(2))
        .seed(Some(7))
        .build()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn healthy_endpoints_yield_error_free_summary() {
    let server = server_answering(200).await;
    let harness = Harness::new(config_for(&server, 2)).unwrap();

    let report = harness.run().await.unwrap();

    assert_eq!(report.workers.len(), 2);
    for worker in &report.workers {
        assert!(worker.cycles >= 3, "worker {} ran {} cycles", worker.id, worker.cycles);
    }
    assert!(report.elapsed >= Duration::from_secs(5));

    let names: Vec<_> = report
        .summary
        .operations
        .iter()
        .map(|op| op.name.as_str())
        .collect();
    assert_eq!(names, ["alerts", "pause", "queue", "resume", "runtime"]);
    for op in &report.summary.operations {
        assert_eq!(op.total, report.total_cycles(), "{}", op.name);
        assert_eq!(op.errors, 0, "{}", op.name);
    }

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len() as u64, report.summary.total_calls());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failing_endpoints_still_finish_the_run() {
    let server = server_answering(500).await;
    let harness = Harness::new(config_for(&server, 3)).unwrap();

    let report = harness.run().await.unwrap();

    assert_eq!(report.workers.len(), 3);
    assert_eq!(report.summary.operations.len(), Operation::ALL.len());
    for op in &report.summary.operations {
        assert!(op.total >= 3);
        assert_eq!(op.errors, op.total, "{}", op.name);
    }
}

#[tokio::test]
async fn mixed_failures_are_isolated_per_operation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = RunConfig::builder()
        .base_url(parse_base_url(&server.uri()).unwrap())
        .api_prefix("")
        .credential(Credential::new("admin", "admin"))
        .duration(Duration::from_secs(5))
        .concurrency(1)
        .jitter(JitterRange::new(Duration::from_millis(50), Duration::from_millis(150)).unwrap())
        .build();
    let report = Harness::new(config).unwrap().run().await.unwrap();

    let summary = &report.summary;
    for operation in Operation::MONITORING {
        assert_eq!(summary.operation(operation.name()).unwrap().errors, 0);
    }
    for operation in Operation::TOGGLES {
        let op = summary.operation(operation.name()).unwrap();
        assert_eq!(op.errors, op.total);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refused_connections_count_every_call_as_an_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = RunConfig::builder()
        .base_url(parse_base_url(&format!("http://{addr}")).unwrap())
        .credential(Credential::new("admin", "admin"))
        .duration(Duration::from_secs(5))
        .concurrency(2)
        .request_timeout(Duration::from_secs(1))
        .jitter(JitterRange::new(Duration::from_millis(50), Duration::from_millis(150)).unwrap())
        .build();
    let report = Harness::new(config).unwrap().run().await.unwrap();

    assert_eq!(report.workers.len(), 2);
    assert_eq!(report.summary.operations.len(), Operation::ALL.len());
    for op in &report.summary.operations {
        assert_eq!(op.total, report.total_cycles(), "{}", op.name);
        assert_eq!(op.errors, op.total, "{}", op.name);
    }
}
