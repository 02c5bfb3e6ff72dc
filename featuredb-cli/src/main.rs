use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod annotations;
mod cli;
mod commands;
mod fs;

use std::io;

use clap::Parser;

use self::{
    cli::{Cli, Command},
    commands::{lookup, mutation, search},
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Lookup(args) => lookup(args)?,
        Command::Mutation(args) => mutation(args)?,
        Command::Search(args) => search(args)?,
    }

    Ok(())
}
