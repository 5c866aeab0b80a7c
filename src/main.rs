use clap::Parser;
use log::{info, warn};

use crate::core::{
    cli::{Cli, Command},
    configuration::{self, Configuration},
    logger::{self, SuppressionLineFilter},
};

mod config_utils;
mod core;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let conf = match &cli.configuration_file {
        Some(c) => configuration::get_configuration(c.to_owned()).await?,
        None => Configuration::default(),
    };

    conf.assert_fragments_are_not_blank()?;

    match &cli.command {
        Command::Check => {
            check(&conf);
        }
        Command::Demo => {
            let line_filter = SuppressionLineFilter::new(conf.suppression_rule());

            // the handle keeps the logging pipeline alive until the end of main
            let _handle = logger::install(&conf.log, cli.verbosity, line_filter)?;

            demo();
        }
    }

    Ok(())
}

fn check(conf: &Configuration) {
    let rule = conf.suppression_rule();

    println!("message fragment: {:?}", rule.message_fragment());
    println!("caller fragment:  {:?}", rule.caller_fragment());
    println!("configuration is valid");
}

fn demo() {
    info!("demo started");

    // passes through untouched
    config_utils::load_from_stream("valid", "port = 9102");

    // suppressed, parameters echoed to stdout instead
    config_utils::load_from_stream("broken", "port == 9102");

    // same message from another origin: suppressed, no echo
    warn!("Cannot load configuration from stream");

    info!("demo finished");
}
