use anyhow::Result;
use qa_run_client::{new_client, ArtifactUrlResolver, Config, RunClient, RunReport, RunRequest};

// Submits the instructions given on the command line and prints where the
// run's screenshots can be viewed.
async fn run(instructions: String) -> Result<String> {
    let config = Config::from_env()?;
    let client = new_client()?;
    let resolver = ArtifactUrlResolver::from_config(&config);

    let health = client.health().await?;
    if !health.is_ready() {
        anyhow::bail!("Backend is missing settings: {:?}", health.missing());
    }

    let response = client
        .submit_run(RunRequest::new(instructions).headful(false))
        .await?;
    let report = RunReport::from_response(&response)?;

    let mut ret = format!(
        "Run {} finished in {} ms on {}\n",
        report.run_id, report.elapsed_ms, report.screen.url
    );
    for url in report.screenshot_urls(&resolver) {
        ret += &format!("  {url}\n");
    }
    ret += &format!("Result: {}", report.task_result);
    Ok(ret)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let instructions = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    match run(instructions).await {
        Ok(summary) => println!("{summary}"),
        Err(e) => println!("Run failed: {e}"),
    }
}
