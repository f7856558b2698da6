use clap::Parser;
use mchat::core::config::{self, CliOverrides, MchatConfig};
use mchat::tui;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "mchat", about = "Terminal chat over IP multicast")]
struct Args {
    /// Nickname to chat as
    #[arg(short, long)]
    nick: Option<String>,

    /// UDP port shared by everyone on the group
    #[arg(short, long)]
    port: Option<u16>,

    /// IPv4 multicast group address
    #[arg(long)]
    group: Option<String>,

    /// Character that starts a command line
    #[arg(short, long)]
    escape: Option<String>,

    /// Log verbosity for mchat.log
    #[arg(long, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to mchat.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("mchat.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    log::info!("mchat starting up");

    // A broken config file is not fatal: run on defaults and say so
    let (file_config, warning) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => {
            log::error!("{}", e);
            let first_line = e.to_string().lines().next().unwrap_or_default().to_string();
            (
                MchatConfig::default(),
                Some(format!("Config error, using defaults: {}", first_line)),
            )
        }
    };

    let cli = CliOverrides {
        nickname: args.nick,
        port: args.port,
        group: args.group,
        escape: args.escape,
    };
    let resolved = config::resolve(&file_config, &cli);
    log::info!("Resolved config: {:?}", resolved);

    tui::run(&resolved, warning)
}
