use clap::{Args, Parser, Subcommand};
use visitlog_core::config::{DEFAULT_API_KEY, DEFAULT_BASE_URL};
use visitlog_core::{ScreenMetrics, StaticEnvironment, StaticHostState};

#[derive(Parser, Debug)]
#[command(name = "visitlog")]
#[command(about = "Anonymous session telemetry recorder")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the fingerprint and environment profile for a set of signals
    Fingerprint {
        #[command(flatten)]
        signals: SignalArgs,
    },

    /// Open a session and heartbeat it until Ctrl-C, then send the final beacon
    Run {
        #[command(flatten)]
        signals: SignalArgs,
        #[command(flatten)]
        host: HostArgs,
        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Environment signals the host would normally read from the browser.
#[derive(Args, Debug)]
pub struct SignalArgs {
    #[arg(long, default_value_t = 1920)]
    pub width: u32,
    #[arg(long, default_value_t = 1080)]
    pub height: u32,
    #[arg(long, default_value_t = 24)]
    pub color_depth: u32,
    #[arg(long, default_value = "en-US")]
    pub locale: String,
    #[arg(long, env = "TZ", default_value = "UTC")]
    pub time_zone: String,
    /// Logical processor count (defaults to this machine's)
    #[arg(long)]
    pub cores: Option<u32>,
    #[arg(long)]
    pub user_agent: Option<String>,
    /// Raw latitude; rounded to 0.1 degrees before it is sent
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,
    /// Raw longitude; rounded to 0.1 degrees before it is sent
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl SignalArgs {
    pub fn into_environment(self) -> StaticEnvironment {
        let core_count = self.cores.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get() as u32)
                .unwrap_or(1)
        });
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("visitlog/{}", env!("CARGO_PKG_VERSION")));
        StaticEnvironment {
            screen: ScreenMetrics {
                width: self.width,
                height: self.height,
                color_depth: self.color_depth,
            },
            locale: self.locale,
            time_zone: self.time_zone,
            user_agent,
            core_count,
            location: self.lat.zip(self.lon),
        }
    }
}

/// Display preferences the host page would expose.
#[derive(Args, Debug)]
pub struct HostArgs {
    #[arg(long, default_value = "classic")]
    pub dial: String,
    #[arg(long, default_value = "western")]
    pub numerals: String,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    /// Banner text; contains RAMADAN to flag seasonal mode
    #[arg(long)]
    pub banner: Option<String>,
}

impl From<HostArgs> for StaticHostState {
    fn from(args: HostArgs) -> Self {
        Self {
            dial: args.dial,
            numerals: args.numerals,
            city: args.city,
            country: args.country,
            banner: args.banner,
        }
    }
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Store base URL (no trailing slash needed)
    #[arg(long, env = "VISITLOG_URL", default_value = DEFAULT_BASE_URL)]
    pub url: String,
    /// Shared anonymous API key
    #[arg(long, env = "VISITLOG_KEY", default_value = DEFAULT_API_KEY, hide_env_values = true)]
    pub key: String,
    /// Seconds to wait for the final beacon on shutdown
    #[arg(long, default_value_t = 5)]
    pub flush_timeout: u64,
}
