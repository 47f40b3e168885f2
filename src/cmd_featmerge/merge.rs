use clap::*;
use featmerge::libs::gff::{Dialect, GFF3_HEADER};
use featmerge::libs::merge::{flatten, validate_groups, MergeAll, MergeGroup, MergeOptions};
use featmerge::libs::store::DuplicateStrategy;
use std::io::Write;

// Create clap subcommand arguments
pub fn make_subcommand() -> Command {
    Command::new("merge")
        .about("Merge overlapping features")
        .after_help(
            r###"
Features that overlap, abut, or are separated by a single base are merged into
a new parent record. The original records are kept as its components and
receive its ID in their Parent attribute.

Notes:
* Accepts GFF3 or GTF; the output uses the dialect of the input
* Supports both plain text and gzipped (.gz) files
* Reads from stdin if input file is 'stdin'
* Features on different sequences are never merged
* By default only features of the same strand and featuretype are merged
* With --ignore-type merged records get the type `sequence_feature`
* Merged IDs are `merged_<id1>_<id2>...`, or a 16-digit hash when longer
  than 32 characters
* A featuretype may belong to one group only; types not in any group are
  printed unchanged after all groups
* ALL claims every remaining type, so it must be the last type group. ALL and
  NONE cannot be combined with featuretypes

Examples:
1. Merge all overlapping features of the same type and strand:
   featmerge merge input.gff

2. Merge genes and pseudogenes together regardless of strand:
   featmerge merge -i -t -f gene,pseudogene input.gff

3. Merge CDSs, then everything else, printing only the merged records:
   featmerge merge -e -f CDS -f ALL input1.gff input2.gff

4. Only merge records with identical coordinates:
   featmerge merge -x input.gtf

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
            Arg::new("ignore_strand")
                .long("ignore-strand")
                .short('i')
                .action(ArgAction::SetTrue)
                .help("Merge features regardless of strand"),
        )
        .arg(
            Arg::new("ignore_type")
                .long("ignore-type")
                .short('t')
                .action(ArgAction::SetTrue)
                .help("Merge features regardless of featuretype"),
        )
        .arg(
            Arg::new("exact")
                .long("exact")
                .short('x')
                .action(ArgAction::SetTrue)
                .help("Only merge features with identical coordinates"),
        )
        .arg(
            Arg::new("exclude_components")
                .long("exclude-components")
                .short('e')
                .action(ArgAction::SetTrue)
                .help("Don't output the components of merged features"),
        )
        .arg(
            Arg::new("featuretypes")
                .long("featuretypes")
                .short('f')
                .num_args(1)
                .action(ArgAction::Append)
                .help("Comma separated featuretypes to merge together, ALL or NONE. Repeat for more groups [default: ALL]"),
        )
        .arg(
            Arg::new("strategy")
                .long("merge-strategy")
                .short('m')
                .num_args(1)
                .default_value("merge")
                .value_parser(["merge", "create_unique", "error"])
                .help("How to handle records sharing an ID across the inputs"),
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
    //----------------------------
    // Args
    //----------------------------
    let opt = MergeOptions {
        ignore_strand: args.get_flag("ignore_strand"),
        ignore_featuretype: args.get_flag("ignore_type"),
        exact_only: args.get_flag("exact"),
        exclude_components: args.get_flag("exclude_components"),
    };

    let groups: Vec<MergeGroup> = match args.get_many::<String>("featuretypes") {
        Some(values) => values
            .map(|s| MergeGroup::parse(s))
            .collect::<Result<Vec<_>, _>>()?,
        None => vec![MergeGroup::All],
    };
    validate_groups(&groups)?;
    opt.criteria().validate()?;

    let strategy: DuplicateStrategy = args.get_one::<String>("strategy").unwrap().parse()?;
    let infiles: Vec<&String> = args.get_many::<String>("infiles").unwrap().collect();

    //----------------------------
    // Load
    //----------------------------
    let store = super::load_store(&infiles, strategy)?;
    let all = MergeAll::new(&store, groups, opt.criteria())?;

    //----------------------------
    // Output
    //----------------------------
    let mut writer = featmerge::writer(args.get_one::<String>("outfile").unwrap())?;
    if store.is_empty() {
        writer.flush()?;
        return Ok(());
    }

    let dialect = store.dialect();
    if dialect == Dialect::Gff3 {
        writer.write_fmt(format_args!("{}\n", GFF3_HEADER))?;
    }

    let mut n_merged = 0;
    for feature in all {
        if feature.is_merged() {
            n_merged += 1;
        }
        for record in flatten(&feature, opt.exclude_components) {
            writer.write_fmt(format_args!("{}\n", record.to_line(dialect)))?;
        }
    }
    writer.flush()?;
    log::info!("Wrote {} merged records", n_merged);

    Ok(())
}
