use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;

use skystats_core::ingest::openweather::OpenWeatherSource;
use skystats_core::repository::archive::ArchiveRepository;
use skystats_core::{
    AnalyticsService, Bucket, Config, Metric, ObservationSource, Snapshot, SnapshotRepository,
    TrendResult,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skystats", version, about = "Weather history statistics")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key used by `fetch`.
    Configure,

    /// Fetch the current observation for a city and record it.
    Fetch {
        /// City name, e.g. "Tokyo" or "New York".
        city: String,
    },

    /// List every registered location.
    Locations,

    /// Per-day average temperatures.
    Daily {
        city: String,

        /// Trailing days to include (max 365); all history if absent.
        #[arg(long)]
        days: Option<u32>,
    },

    /// Per-ISO-week average temperatures.
    Weekly {
        city: String,

        /// Trailing weeks to include (max 52).
        #[arg(long, default_value_t = 4)]
        weeks: u32,
    },

    /// Per-month average temperatures.
    Monthly {
        city: String,

        /// Trailing months to include (max 24).
        #[arg(long, default_value_t = 12)]
        months: u32,
    },

    /// Directional temperature trend over trailing days.
    Trend {
        city: String,

        /// Trailing days to analyze (max 365).
        #[arg(long, default_value_t = 7)]
        days: u32,
    },

    /// Humidity/pressure pattern summary over all history.
    Patterns { city: String },

    /// Rank 2-10 cities by a statistic.
    Compare {
        /// City names, space separated.
        #[arg(required = true)]
        cities: Vec<String>,

        /// One of: mean_temperature, mean_humidity, mean_pressure.
        #[arg(long, default_value = "mean_temperature")]
        metric: String,
    },

    /// Export raw snapshots in a date range.
    Export {
        city: String,

        /// Inclusive start date, YYYY-MM-DD.
        #[arg(long)]
        start: Option<String>,

        /// Inclusive end date, YYYY-MM-DD.
        #[arg(long)]
        end: Option<String>,

        /// Emit JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;
        let archive_path = match &config.archive_path {
            Some(path) => path.clone(),
            None => ArchiveRepository::default_path()?,
        };
        let repo = ArchiveRepository::new(archive_path);
        let service = AnalyticsService::new(&repo);

        match self.command {
            Command::Configure => configure(config),
            Command::Fetch { city } => fetch(&config, &repo, &city).await,
            Command::Locations => {
                let locations = repo.list_locations().await?;
                if locations.is_empty() {
                    println!("No locations recorded yet. Run `skystats fetch <city>` first.");
                    return Ok(());
                }
                for l in locations {
                    println!("{:>4}  {} ({})  [{:.2}, {:.2}]", l.id, l.name, l.country, l.lat, l.lon);
                }
                Ok(())
            }
            Command::Daily { city, days } => {
                let city = skystats_core::validate::location_name(&city)?.to_owned();
                let buckets = service.daily_averages(&city, days).await?;
                print_buckets(&city, &buckets);
                Ok(())
            }
            Command::Weekly { city, weeks } => {
                let city = skystats_core::validate::location_name(&city)?.to_owned();
                let buckets = service.weekly_averages(&city, weeks).await?;
                print_buckets(&city, &buckets);
                Ok(())
            }
            Command::Monthly { city, months } => {
                let city = skystats_core::validate::location_name(&city)?.to_owned();
                let buckets = service.monthly_averages(&city, months).await?;
                print_buckets(&city, &buckets);
                Ok(())
            }
            Command::Trend { city, days } => {
                let city = skystats_core::validate::location_name(&city)?.to_owned();
                let result = service.trend(&city, days).await?;
                print_trend(&city, days, &result);
                Ok(())
            }
            Command::Patterns { city } => {
                let city = skystats_core::validate::location_name(&city)?.to_owned();
                let result = service.patterns(&city).await?;

                println!("Patterns for {city} ({} snapshots)", result.total_snapshots);
                match &result.humidity {
                    Some(h) => println!("  humidity:  mean {:.1}%  variance {:.1}", h.mean, h.variance),
                    None => println!("  humidity:  no data"),
                }
                match &result.pressure {
                    Some(p) => println!("  pressure:  mean {:.1} hPa  variance {:.1}", p.mean, p.variance),
                    None => println!("  pressure:  no data"),
                }
                println!("  humidity/pressure correlation: {}", result.correlation);
                for (condition, count) in &result.condition_counts {
                    println!("  {condition}: {count}");
                }
                Ok(())
            }
            Command::Compare { cities, metric } => {
                let metric: Metric = metric.parse()?;
                let result = service.compare(&cities, metric).await?;

                println!("Ranking by {metric}:");
                for entry in &result.entries {
                    match entry.value {
                        Some(v) => println!(
                            "  {}. {} ({})  {:.2}  [{} snapshots]",
                            entry.rank,
                            entry.location.name,
                            entry.location.country,
                            v,
                            entry.snapshot_count
                        ),
                        None => println!(
                            "  {}. {} ({})  no data",
                            entry.rank, entry.location.name, entry.location.country
                        ),
                    }
                }
                Ok(())
            }
            Command::Export { city, start, end, json } => {
                let city = skystats_core::validate::location_name(&city)?.to_owned();
                let start = parse_date(start.as_deref())?;
                let end = parse_date(end.as_deref())?;
                let report = service.export(&city, start, end).await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    println!("{} records for {city}", report.total_records);
                    for record in &report.records {
                        print_record(record);
                    }
                }
                Ok(())
            }
        }
    }
}

fn parse_date(raw: Option<&str>) -> anyhow::Result<Option<NaiveDate>> {
    Ok(match raw {
        Some(s) => Some(skystats_core::validate::date(s)?),
        None => None,
    })
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(api_key);
    config.save()?;
    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn fetch(config: &Config, repo: &ArchiveRepository, city: &str) -> anyhow::Result<()> {
    let city = skystats_core::validate::location_name(city)?;
    let api_key = config.require_api_key()?;

    let source = OpenWeatherSource::new(api_key.to_owned());
    let observation = source.fetch_current(city).await?;
    info!("observation for '{}' at {}", observation.location_name, observation.observed_at);

    let location = repo.register_location(
        &observation.location_name,
        &observation.country,
        observation.lat,
        observation.lon,
    )?;
    let snapshot = repo.append_snapshot(Snapshot {
        id: 0,
        location_id: location.id,
        temperature_c: observation.temperature_c,
        humidity_pct: observation.humidity_pct,
        pressure_hpa: observation.pressure_hpa,
        condition: observation.condition,
        recorded_at: observation.observed_at,
    })?;

    println!(
        "Recorded {} for {}: {:.1} °C{}",
        snapshot.recorded_at.format("%Y-%m-%d %H:%M UTC"),
        location.name,
        snapshot.temperature_c,
        snapshot
            .condition
            .as_deref()
            .map(|c| format!(", {c}"))
            .unwrap_or_default()
    );
    Ok(())
}

fn print_buckets(city: &str, buckets: &[Bucket]) {
    if buckets.is_empty() {
        println!("No data for {city} in that window.");
        return;
    }
    println!("{city}:");
    for b in buckets {
        let humidity = b
            .mean_humidity_pct
            .map(|h| format!("  {h:.0}%"))
            .unwrap_or_default();
        println!(
            "  {}  avg {:+.1} °C  (min {:+.1}, max {:+.1}, n={}){humidity}",
            b.key, b.mean_temperature_c, b.min_temperature_c, b.max_temperature_c, b.count
        );
    }
}

fn print_trend(city: &str, days: u32, result: &TrendResult) {
    println!(
        "Trend for {city} over the last {days} days: {} ({:+.3} °C/day)",
        result.direction, result.slope
    );
    println!(
        "  first day avg {:+.1} °C, last day avg {:+.1} °C, {} populated days",
        result.first_avg,
        result.last_avg,
        result.buckets.len()
    );
}

fn print_record(record: &Snapshot) {
    let humidity = record
        .humidity_pct
        .map(|h| format!("  {h}%"))
        .unwrap_or_else(|| "  --".into());
    let pressure = record
        .pressure_hpa
        .map(|p| format!("  {p} hPa"))
        .unwrap_or_else(|| "  --".into());
    println!(
        "  {}  {:+.1} °C{humidity}{pressure}  {}",
        record.recorded_at.format("%Y-%m-%d %H:%M"),
        record.temperature_c,
        record.condition.as_deref().unwrap_or("-")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn compare_requires_at_least_one_positional() {
        let parsed = Cli::try_parse_from(["skystats", "compare"]);
        assert!(parsed.is_err());

        let parsed =
            Cli::try_parse_from(["skystats", "compare", "Tokyo", "Oslo", "--metric", "humidity"]);
        assert!(parsed.is_ok());
    }

    #[test]
    fn trend_defaults_to_seven_days() {
        let parsed = Cli::try_parse_from(["skystats", "trend", "Tokyo"]).unwrap();
        match parsed.command {
            Command::Trend { days, .. } => assert_eq!(days, 7),
            _ => unreachable!("expected trend command"),
        }
    }
}
