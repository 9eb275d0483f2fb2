use super::Parser;

/// Trade relationship and invoice messaging service.
#[derive(Parser, Debug)]
#[command(name = "tradelink", version)]
pub struct Cli {
    /// Settings file. Defaults to the build profile's file under `settings/`.
    #[arg(long, short = 's', value_name = "PATH")]
    pub settings: Option<String>,
}
