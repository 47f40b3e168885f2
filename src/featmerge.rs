extern crate clap;
use clap::*;

mod cmd_featmerge;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let app = Command::new("featmerge")
        .version(crate_version!())
        .author(crate_authors!())
        .about("`featmerge` - Merge overlapping features of GFF/GTF files")
        .propagate_version(true)
        .arg_required_else_help(true)
        .color(ColorChoice::Auto)
        .subcommand(cmd_featmerge::merge::make_subcommand())
        .subcommand(cmd_featmerge::types::make_subcommand())
        .after_help(
            r###"Subcommands:

* merge - Merge overlapping features into parent records
* types - List the featuretypes of the input with record counts

Logging goes to stderr and is controlled by RUST_LOG, e.g. RUST_LOG=info

"###,
        );

    // Usage errors exit with 1; --help and --version with 0
    let matches = match app.try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            e.print()?;
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // Check which subcomamnd the user ran...
    match matches.subcommand() {
        Some(("merge", sub_matches)) => cmd_featmerge::merge::execute(sub_matches),
        Some(("types", sub_matches)) => cmd_featmerge::types::execute(sub_matches),
        _ => unreachable!(),
    }?;

    Ok(())
}
