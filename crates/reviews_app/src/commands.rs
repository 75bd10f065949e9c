use std::path::Path;

use anyhow::{bail, Result};
use reviews_core::{JobId, RowPhase, TrackedSource};
use reviews_engine::{DatashakeClient, EngineConfig, ReviewsApi, ReviewsEngine, TableStore};
use reviews_logging::reviews_info;

use crate::config::settings_from_env;

fn engine() -> Result<ReviewsEngine<DatashakeClient>> {
    let settings = settings_from_env()?;
    let config = EngineConfig::from_settings(&settings);
    Ok(ReviewsEngine::new(DatashakeClient::new(settings)?, config))
}

pub(crate) async fn schedule(data_dir: &Path) -> Result<()> {
    let store = TableStore::new(data_dir);
    let sources = store.load_sources()?;
    let mut engine = engine()?;

    let (updated, report) = engine.schedule_job_list(&sources).await?;
    store.save_sources(&updated)?;

    println!(
        "schedule complete: rows={} scheduled={} rejected={} skipped={}",
        updated.len(),
        report.scheduled(),
        report.rejected(),
        report.skipped()
    );
    Ok(())
}

pub(crate) async fn collect(data_dir: &Path) -> Result<()> {
    let store = TableStore::new(data_dir);
    let sources = store.load_sources()?;
    let history = store.load_reviews()?;
    let mut engine = engine()?;

    let (updated, reviews, _report) = engine.get_job_list_reviews(&sources, &history).await?;
    store.save_sources(&updated)?;
    store.save_reviews(&reviews)?;

    println!(
        "collect complete: rows={} new_reviews={} total_reviews={}",
        updated.len(),
        reviews.len() - history.len(),
        reviews.len()
    );
    println!("{}", phase_summary(&updated));
    Ok(())
}

fn phase_summary(rows: &[TrackedSource]) -> String {
    let (mut untracked, mut pending, mut complete, mut error) = (0, 0, 0, 0);
    for row in rows {
        match row.phase() {
            RowPhase::Untracked => untracked += 1,
            RowPhase::Pending => pending += 1,
            RowPhase::Complete => complete += 1,
            RowPhase::Error => error += 1,
        }
    }
    format!("jobs: complete={complete} pending={pending} error={error} untracked={untracked}")
}

pub(crate) async fn status(job_id: &str) -> Result<()> {
    let mut engine = engine()?;
    let status = engine.api_mut().get_job_status(&JobId::new(job_id)).await?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

pub(crate) fn add(data_dir: &Path, url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        bail!("url must not be empty");
    }
    let store = TableStore::new(data_dir);
    let mut sources = store.load_sources()?;
    if sources.iter().any(|row| row.url() == Some(url)) {
        println!("already tracked: {url}");
        return Ok(());
    }
    sources.push(TrackedSource::new(url));
    let path = store.save_sources(&sources)?;
    reviews_info!("Added {} to {:?}", url, path);
    println!("now tracking {} sources", sources.len());
    Ok(())
}
