use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "state-weather")]
#[command(about = "Per-state weather and air-quality series for dashboards")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the loading spinner")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file [default: state-weather.toml when present]"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Live observations CSV")]
    pub live: Option<PathBuf>,

    #[arg(long, global = true, help = "Historical air-quality CSV")]
    pub aqi_history: Option<PathBuf>,

    #[arg(long, global = true, help = "Forecast CSV")]
    pub forecast: Option<PathBuf>,

    #[arg(long, global = true, help = "Memory-map the historical air-quality file")]
    pub mmap: bool,

    #[arg(long, global = true)]
    pub max_workers: Option<usize>,

    #[arg(short, long, global = true, help = "Write JSON to this file instead of stdout")]
    pub output: Option<PathBuf>,

    #[arg(long, global = true, help = "Pretty-print JSON output")]
    pub pretty: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the states available for selection
    States,

    /// Current temperature, feels-like and conditions for a state
    Current {
        #[arg(short, long, help = "State name [default: configured default state]")]
        state: Option<String>,
    },

    /// Hourly pm2.5 and temperature series for a state
    Hourly {
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Temperature forecast series for a state
    Forecast {
        #[arg(short, long)]
        state: Option<String>,
    },

    /// Month-by-day heatmap of one pollutant for a state
    Heatmap {
        #[arg(short, long)]
        state: Option<String>,

        #[arg(short, long, help = "One of pm25, o3, pm10, no2, so2, co")]
        pollutant: String,
    },

    /// Every series for a state, as the dashboard shows it
    Dashboard {
        #[arg(short, long)]
        state: Option<String>,

        #[arg(
            long,
            help = "Save to output/dashboard-{state}-{YYMMDD}.json when --output is not given"
        )]
        save: bool,
    },

    /// Current temperature of every state, for the choropleth map
    Choropleth,

    /// Check the source tables and print an integrity report
    Validate {
        #[arg(long, help = "Fail on the first row that does not validate")]
        strict: bool,
    },
}
