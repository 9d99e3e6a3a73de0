//! Hazard Sentry - Disaster risk fusion engine
//!
//! Diagnostic CLI: assess cyclone and earthquake risk for one pair of
//! coordinates against the live providers and the pretrained models.
//!
//! Usage: hazard_sentry <latitude> <longitude>

use hazard_sentry::{EngineConfig, Location, LiveSignalSource, ModelRegistry, RiskAnalyzer};

use eyre::{eyre, Result};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    println!(
        r#"
    ╔══════════════════════════════════════════════╗
    ║          H A Z A R D   S E N T R Y           ║
    ║        Disaster Risk Fusion Engine           ║
    ╚══════════════════════════════════════════════╝
    "#
    );

    let mut args = std::env::args().skip(1);
    let latitude: f64 = args
        .next()
        .ok_or_else(|| eyre!("Usage: hazard_sentry <latitude> <longitude>"))?
        .parse()
        .map_err(|e| eyre!("Invalid latitude: {}", e))?;
    let longitude: f64 = args
        .next()
        .ok_or_else(|| eyre!("Usage: hazard_sentry <latitude> <longitude>"))?
        .parse()
        .map_err(|e| eyre!("Invalid longitude: {}", e))?;

    if std::env::var("OPENWEATHER_API_KEY").is_err() {
        eprintln!("⚠️  WARNING: OPENWEATHER_API_KEY not set!");
        eprintln!("   Weather requests will be rejected by the provider.");
        eprintln!();
    }

    let config = EngineConfig::default();
    let signals = Arc::new(LiveSignalSource::new(&config));
    let models = Arc::new(ModelRegistry::load(&config));
    let analyzer = RiskAnalyzer::new(config, signals.clone(), models);

    let report = analyzer.assess(Location::new(latitude, longitude)).await;
    println!("{}", report.summary());

    let stats = analyzer.stats();
    println!(
        "📊 Assessments: {} | Signal failures: {} | Elevated: {}",
        stats.total_assessments, stats.signal_failures, stats.elevated_verdicts
    );
    let cache = signals.cache_stats();
    println!(
        "💾 Cache: {} entries | {} hits / {} misses ({:.0}% hit rate)",
        cache.entries, cache.hits, cache.misses, cache.hit_rate
    );

    Ok(())
}
