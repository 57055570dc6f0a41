pub mod cli;
pub mod commands;
pub mod config;
pub mod notify;
pub mod render;
pub mod store;
pub mod task;
pub mod theme;
pub mod view;

use std::ffi::OsString;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};

#[tracing::instrument(skip_all)]
pub fn run(raw_args: Vec<OsString>) -> anyhow::Result<()> {
    let pre = cli::preprocess_args(&raw_args)?;
    let cli = cli::GlobalCli::parse_from(pre.cleaned_args);

    cli::init_tracing(cli.verbose, cli.quiet)?;

    info!(verbose = cli.verbose, quiet = cli.quiet, "starting todo CLI");
    debug!(?pre.rc_overrides, "preprocessed rc overrides");

    let mut cfg = config::Config::load(cli.rcfile.as_deref())?;
    cfg.apply_overrides(
        pre.rc_overrides
            .into_iter()
            .chain(cli.rc_overrides.into_iter().map(|kv| (kv.key, kv.value))),
    );

    let data_dir = config::resolve_data_dir(&cfg, cli.data.as_deref())
        .context("failed to resolve data directory")?;

    let mut store = store::TaskStore::open(&data_dir)
        .with_context(|| format!("failed to open task store at {}", data_dir.display()))?;

    let themes = theme::ThemeProvider::new(&data_dir);
    let notifier = notify::Notifier::new(&cfg);
    let mut renderer = render::Renderer::new(&cfg, themes.get())?;

    if store.recovered_from_corruption() {
        notifier.emit(notify::Notice::error(
            "Saved tasks could not be read",
            "Starting with an empty list",
        ));
    }

    let inv = cli::Invocation::parse(&cfg, cli.rest)?;
    commands::dispatch(&mut store, &themes, &mut renderer, &notifier, inv)?;

    info!("done");
    Ok(())
}
