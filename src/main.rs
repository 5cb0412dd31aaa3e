use std::io::{BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use skycast::{
    AppConfig, GeocodingResolver, GoogleGeocoder, MemoryCache, SearchOutcome, SearchService,
    SkycastError, WeatherFetcher, WeatherPresenter,
};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<ExitCode> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging.level);

    let cache = Arc::new(MemoryCache::new());
    let geocoder = GoogleGeocoder::new(&config.geocoding)?;
    let resolver = GeocodingResolver::new(Arc::new(geocoder));
    let fetcher = WeatherFetcher::new(config.weather.clone());
    let ttl = Duration::from_secs(config.cache.ttl_minutes * 60);
    let service = SearchService::new(cache, resolver, fetcher, ttl);

    let address = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if std::env::args().len() <= 1 {
        return prompt_loop(&service).await;
    }
    if address.trim().is_empty() {
        return Err(SkycastError::validation("Please enter an address").into());
    }

    Ok(render(&service.search(&address).await))
}

/// Read addresses from stdin until EOF. Repeated lookups within one
/// session hit the in-process cache, which the rendered notice reports.
async fn prompt_loop(service: &SearchService) -> Result<ExitCode> {
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("Address: ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(ExitCode::SUCCESS);
        }

        let address = line.trim();
        if address.is_empty() {
            eprintln!("Please enter an address");
            continue;
        }

        let _ = render(&service.search(address).await);
    }
}

fn render(outcome: &SearchOutcome) -> ExitCode {
    match outcome {
        SearchOutcome::Success(report) => {
            let presenter = WeatherPresenter::new(report);
            println!("{}", presenter.headline());
            println!("{}", presenter.temperature_line());
            println!("{}", presenter.condition_line());
            if let Some(url) = presenter.icon_url() {
                println!("Icon: {url}");
            }
            if let Some(notice) = presenter.cache_notice() {
                println!("{notice}");
            }
            ExitCode::SUCCESS
        }
        SearchOutcome::GeocodingFailure { error } | SearchOutcome::WeatherFailure { error } => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
