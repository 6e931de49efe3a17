use sitelens::config::Settings;
use sitelens::ops::telemetry;
use sitelens::pipeline::Orchestrator;

#[tokio::main]
async fn main() {
    // * Load .env before reading settings, then bring up logging
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            std::process::exit(1);
        }
    };

    tracing::info!(
        url = %settings.target_url,
        workdir = %settings.workdir.display(),
        "SiteLens pipeline starting"
    );

    let orchestrator = match Orchestrator::new(&settings) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            tracing::error!(error = %e, "Pipeline setup failed");
            std::process::exit(1);
        }
    };

    let Some(search_index) = orchestrator.run().await else {
        tracing::error!("Pipeline produced no index");
        std::process::exit(1);
    };

    let stats = orchestrator.stats();
    tracing::info!(
        entries = search_index.len(),
        screenshots = stats.screenshots,
        screenshot_descriptions = stats.screenshot_descriptions,
        image_descriptions = stats.image_descriptions,
        describe_failures = stats.describe_failures,
        chunks = stats.chunks,
        cache_hits = stats.cache_hits,
        "Pipeline complete"
    );

    // * One-shot question answering when QUESTION is set
    if let Ok(question) = std::env::var("QUESTION") {
        if !question.trim().is_empty() {
            match orchestrator.answer(&question, &search_index).await {
                Ok(answer) => println!("{answer}"),
                Err(e) => {
                    tracing::error!(error = %e, "Question answering failed");
                    std::process::exit(1);
                }
            }
        }
    }
}
