use clap::Arg;
use clap::ArgAction;
use clap::Command;

use crate::configuration::{Config, ConfigKey};

pub fn build() -> Command {
    return Command::new("shelf")
        .about("Terminal client for the shelf file-hosting service")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .long(ConfigKey::ApiUrl.to_string())
                .env("SHELF_API_URL")
                .num_args(1)
                .help(format!(
                    "Base URL of the shelf server [default: {}]",
                    Config::default(ConfigKey::ApiUrl)
                )),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .long(ConfigKey::ConfigFile.to_string())
                .num_args(1)
                .help(format!(
                    "Path to the configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                )),
        )
        .arg(
            Arg::new(ConfigKey::DownloadDir.to_string())
                .long(ConfigKey::DownloadDir.to_string())
                .num_args(1)
                .help("Directory downloads are saved into"),
        )
        .arg(
            Arg::new(ConfigKey::SessionFile.to_string())
                .long(ConfigKey::SessionFile.to_string())
                .num_args(1)
                .help("Path of the persisted session file"),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .action(ArgAction::SetTrue)
                .help("Keep the session in memory only, never on disk"),
        )
        .subcommand(Command::new("config").about("Print the default config file to stdout"));
}
