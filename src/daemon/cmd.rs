use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "vmregd")]
#[command(about = "vm registry daemon", long_about = None)]
pub struct Cli {
    /// Path to the config file. If not provided, the daemon will look for a config file in the
    /// current working directory (vmreg.toml), in the home config dir or in the system config
    /// dir (/etc/vmreg/config.toml), and fall back to built-in defaults
    #[arg(long = "config", short = 'c')]
    pub config_path: Option<PathBuf>,

    /// Overrides `api.host` from the config file
    #[arg(long)]
    pub host: Option<String>,

    /// Overrides `api.port` from the config file
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}
