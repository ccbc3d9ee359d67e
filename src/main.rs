use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;
use vaderkollen::{ranking, Aggregator, LocationResolver, VaderkollenConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let query = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        return Err(anyhow!("usage: vaderkollen <place name>"));
    }

    let config = VaderkollenConfig::load()?;
    let aggregator = Aggregator::new(config.clone())?;

    let places = LocationResolver::resolve(aggregator.client(), &config, &query).await;
    let Some(place) = places.into_iter().next() else {
        return Err(anyhow!("No place found for {query:?}"));
    };
    println!("Weather comparison for {}\n", place.label());

    let result = aggregator
        .aggregate(&place)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    println!(
        "Winner: {} - {:.1}°C, {}",
        result.winner.provider.name,
        result.winner.temperature_c,
        ranking::condition_description(result.winner.condition_code),
    );

    println!("\nAll providers:");
    for reading in result.readings() {
        let wind = reading
            .wind_speed_ms
            .map_or_else(|| "-".to_string(), |w| format!("{w:.1} m/s"));
        let rain = reading
            .precipitation_mm
            .map_or_else(|| "-".to_string(), |p| format!("{p:.1} mm"));
        println!(
            "  {:<18} {:>6.1}°C  {:<14} wind {:<9} precip {}",
            reading.provider.name,
            reading.temperature_c,
            ranking::condition_description(reading.condition_code),
            wind,
            rain,
        );
    }

    if let Some(daily) = &result.winner.daily {
        let outlook = daily.outlook();
        if !outlook.is_empty() {
            println!("\n5-day outlook ({}):", result.winner.provider.name);
            for day in outlook {
                println!(
                    "  {:<4} {:>5.0}° / {:.0}°  {}",
                    day.weekday,
                    day.entry.temperature_max,
                    day.entry.temperature_min,
                    ranking::condition_description(day.entry.condition_code),
                );
            }
        }
    }

    Ok(())
}
