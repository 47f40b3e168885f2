use clap::*;
use featmerge::libs::store::DuplicateStrategy;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("types")
        .about("List featuretypes with record counts")
        .after_help(
            r###"
Prints each featuretype of the input(s) and its number of records, ordered by
type. These are the types `featmerge merge -f` accepts.

Examples:
1. List the featuretypes of an annotation:
   featmerge types input.gff

2. Count over several files:
   featmerge types input1.gff input2.gtf.gz -o types.tsv

"###,
        )
        .arg(
            Arg::new("infiles")
                .required(true)
                .num_args(1..)
                .index(1)
                .help("Input GFF/GTF file(s) to process"),
        )
        .arg(
            Arg::new("outfile")
                .long("outfile")
                .short('o')
                .num_args(1)
                .default_value("stdout")
                .help("Output filename. [stdout] for screen"),
        )
}

// command implementation
pub fn execute(args: &ArgMatches) -> anyhow::Result<()> {
    let infiles: Vec<&String> = args.get_many::<String>("infiles").unwrap().collect();
    // records are only counted, so duplicate IDs are kept apart
    let store = super::load_store(&infiles, DuplicateStrategy::CreateUnique)?;

    let mut writer = featmerge::writer(args.get_one::<String>("outfile").unwrap())?;
    for (featuretype, count) in store.count_by_type() {
        writer.write_fmt(format_args!("{}\t{}\n", featuretype, count))?;
    }
    writer.flush()?;

    Ok(())
}
