use clap::Parser;

#[derive(Parser)]
#[command(name = "stomp-wire")]
#[command(version)]
#[command(about = "Interactive STOMP wire client")]
pub struct Cli {
    /// Broker URL (tcp://host:port/)
    #[arg(short, long, default_value = "tcp://127.0.0.1:61613/")]
    pub url: String,

    /// Login username (omitted from CONNECT when not set)
    #[arg(short, long)]
    pub login: Option<String>,

    /// Passcode (omitted from CONNECT when not set)
    #[arg(short, long)]
    pub passcode: Option<String>,

    /// Destinations to subscribe to (can be specified multiple times)
    #[arg(short, long)]
    pub subscribe: Vec<String>,
}
