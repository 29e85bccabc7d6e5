use azdeploy_core::bicep::{self, BicepPaths, DEFAULT_PARAMETERS_PATH, DEFAULT_TEMPLATE_PATH};
use azdeploy_core::DEFAULT_CONFIG_PATH;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

fn cli() -> Command {
    Command::new("bicep-config")
        .about("Generate Bicep configuration")
        .version("0.1.0")
        .arg(
            Arg::new("region")
                .long("region")
                .help("Target Azure region for deployment")
                .required(true)
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
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .help("Bicep template to update in place")
                .default_value(DEFAULT_TEMPLATE_PATH)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("parameters")
                .short('p')
                .long("parameters")
                .help("parameters file to write")
                .default_value(DEFAULT_PARAMETERS_PATH)
                .action(ArgAction::Set),
        )
}

fn paths(matches: &ArgMatches) -> BicepPaths {
    let path = |id: &str| {
        PathBuf::from(
            matches
                .get_one::<String>(id)
                .expect("path arguments have default values"),
        )
    };

    BicepPaths {
        config: path("config"),
        template: path("template"),
        parameters: path("parameters"),
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = cli().get_matches();

    let region = matches
        .get_one::<String>("region")
        .expect("region is required");

    bicep::generate(&paths(&matches), region)?;

    println!("Successfully updated Bicep configuration for region: {region}");

    Ok(())
}
