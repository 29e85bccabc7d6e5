use azdeploy_core::DEFAULT_CONFIG_PATH;
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

mod context;
mod http;
mod report;

use context::Context;

fn cli() -> Command {
    Command::new("check-quota")
        .about("check PostgreSQL and Container Apps quota across allowed Azure regions")
        .version("0.1.0")
        .arg(
            Arg::new("server")
                .long("server")
                .help("serve quota checks over HTTP instead of printing a report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .help("address to listen on in server mode")
                .default_value(http::DEFAULT_BIND_ADDRESS)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("deployment config file")
                .default_value(DEFAULT_CONFIG_PATH)
                .action(ArgAction::Set),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = cli().get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .expect("config has a default value");

    let context = Context::new(PathBuf::from(config_path))?;

    if matches.get_flag("server") {
        let bind_address = matches
            .get_one::<String>("bind")
            .expect("bind has a default value");

        http::serve(context, bind_address).await
    } else {
        report::run(&context).await
    }
}

#[cfg(test)]
mod tests {
    use super::cli;

    #[test]
    fn test_defaults_to_cli_report() {
        let matches = cli().try_get_matches_from(["check-quota"]).unwrap();

        assert!(!matches.get_flag("server"));
        assert_eq!(
            matches.get_one::<String>("config").unwrap(),
            "infra/azure-config.json"
        );
        assert_eq!(matches.get_one::<String>("bind").unwrap(), "0.0.0.0:8000");
    }

    #[test]
    fn test_server_mode_flag() {
        let matches = cli()
            .try_get_matches_from(["check-quota", "--server", "--bind", "127.0.0.1:9000"])
            .unwrap();

        assert!(matches.get_flag("server"));
        assert_eq!(matches.get_one::<String>("bind").unwrap(), "127.0.0.1:9000");
    }
}
