use guardrails_load::{config::parse_base_url, Credential, Harness, RunConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();
    let config = RunConfig::builder()
        .base_url(parse_base_url("http://localhost:7990/bitbucket")?)
        .credential(Credential::new("admin", "admin"))
        .duration(Duration::from_secs(30))
        .concurrency(16)
        .build();

    let report = Harness::new(config)?.run().await?;
    println!("{}", report.summary);
    println!("{} cycles in {:?}", report.total_cycles(), report.elapsed);
    Ok(())
}
