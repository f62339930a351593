use std::path::PathBuf;

use clap::{command, value_parser, Arg, ArgAction, Command};
use context::Context;
use markdown::DEFAULT_THEME;

mod context;
mod generator;
mod markdown;
mod metadata;
mod renderer;

fn cli() -> Command {
    command!()
        .args(&[
            Arg::new("posts")
                .short('p')
                .long("posts")
                .help("Directory of Markdown posts. Pages and index.json are written next to them.")
                .value_parser(value_parser!(PathBuf))
                .default_value("posts")
                .global(true),
            Arg::new("template")
                .short('t')
                .long("template")
                .help("Page template with {{title}}, {{content}} and {{highlight_css}} placeholders")
                .value_parser(value_parser!(PathBuf))
                .default_value("template.html")
                .global(true),
            Arg::new("highlight")
                .long("highlight")
                .help("Highlight fenced code blocks and include the theme's stylesheet")
                .action(ArgAction::SetTrue)
                .global(true),
            Arg::new("theme")
                .long("theme")
                .help("Color theme used with --highlight")
                .default_value(DEFAULT_THEME)
                .global(true),
        ])
        .subcommands([
            Command::new("build").about("Render every post, then rebuild index.json (default)"),
            Command::new("pages").about("Render every post to HTML"),
            Command::new("index").about("Rebuild index.json only"),
        ])
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = cli().get_matches();
    let context = Context::from_matches(&matches)?;

    match matches.subcommand_name() {
        Some("pages") => {
            generator::generate_pages(&context)?;
        }
        Some("index") => generator::generate_index(&context.post_dir)?,
        _ => generator::generate(&context)?,
    }

    Ok(())
}
