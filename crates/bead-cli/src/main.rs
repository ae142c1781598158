use anyhow::{bail, Context, Result};
use bead_box::{load_boxes, BeadSource, BoxSpec, DirBox, ScanConfig};
use bead_meta::FreezeTime;
use bead_web::{encode, read_snapshot, write_snapshot, Freshness, Sketch};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod report;

fn cli() -> Command {
    let snapshot = Arg::new("snapshot")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Snapshot file to read");
    let output = Arg::new("output")
        .short('o')
        .long("output")
        .value_parser(value_parser!(PathBuf))
        .help("Write the resolved snapshot here instead of stdout");

    Command::new("bead-web")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Resolve freshness of beads across boxes")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v debug, -vv trace); RUST_LOG overrides"),
        )
        .subcommand(
            Command::new("scan")
                .about("Load beads from boxes and write a resolved snapshot")
                .arg(
                    Arg::new("box")
                        .long("box")
                        .required(true)
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(BoxSpec))
                        .help("Box to scan, as NAME=DIR; repeatable"),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail on unreadable metadata instead of skipping it"),
                )
                .arg(output.clone()),
        )
        .subcommand(
            Command::new("resolve")
                .about("Recompute freshness of a snapshot")
                .arg(snapshot.clone())
                .arg(output),
        )
        .subcommand(
            Command::new("report")
                .about("List beads with their freshness")
                .arg(snapshot.clone())
                .arg(
                    Arg::new("freshness")
                        .long("freshness")
                        .value_parser(value_parser!(Freshness))
                        .help("Only beads in this state (up-to-date, out-of-date, superseded)"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("history")
                .about("List the versions of a bead, oldest first")
                .arg(snapshot)
                .arg(Arg::new("name").required(true).help("Bead name"))
                .arg(
                    Arg::new("time")
                        .long("time")
                        .value_parser(value_parser!(FreezeTime))
                        .help("Only the newest version frozen at or before this time"),
                ),
        )
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_sketch(path: &Path) -> Result<Sketch> {
    let beads = read_snapshot(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(Sketch::from_snapshot(beads))
}

fn emit(sketch: &Sketch, output: Option<&PathBuf>) -> Result<()> {
    let entries = sketch.to_snapshot();
    match output {
        Some(path) => write_snapshot(path, &entries)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", encode(&entries).context("encoding snapshot")?),
    }
    Ok(())
}

fn scan(args: &ArgMatches) -> Result<()> {
    let config = ScanConfig::new().with_skip_invalid(!args.get_flag("strict"));
    let boxes: Vec<DirBox> = args
        .get_many::<BoxSpec>("box")
        .into_iter()
        .flatten()
        .map(|spec| spec.open(&config))
        .collect();
    let sources: Vec<&dyn BeadSource> = boxes.iter().map(|b| b as &dyn BeadSource).collect();
    let records = load_boxes(&sources).context("scanning boxes")?;
    tracing::info!(boxes = boxes.len(), records = records.len(), "scanned");
    emit(&Sketch::from_beads(records), args.get_one::<PathBuf>("output"))
}

fn resolve(args: &ArgMatches) -> Result<()> {
    let sketch = load_sketch(snapshot_arg(args)?)?;
    emit(&sketch, args.get_one::<PathBuf>("output"))
}

fn report(args: &ArgMatches) -> Result<()> {
    let sketch = load_sketch(snapshot_arg(args)?)?;
    let filter = args.get_one::<Freshness>("freshness").copied();
    if args.get_flag("json") {
        println!("{}", report::render_json(&sketch, filter)?);
    } else {
        print!("{}", report::Table::new(&sketch, filter));
    }
    Ok(())
}

fn history(args: &ArgMatches) -> Result<()> {
    let sketch = load_sketch(snapshot_arg(args)?)?;
    let name = args
        .get_one::<String>("name")
        .context("missing bead name")?;
    if sketch.history(name).is_empty() {
        bail!("no bead named '{name}'");
    }
    match args.get_one::<FreezeTime>("time") {
        Some(time) => {
            let bead = sketch
                .at_time(name, time.instant())
                .with_context(|| format!("no version of '{name}' frozen by {time}"))?;
            println!("{}", report::VersionLine::new(&sketch, bead));
        }
        None => print!("{}", report::History::new(&sketch, name)),
    }
    Ok(())
}

fn snapshot_arg(args: &ArgMatches) -> Result<&PathBuf> {
    args.get_one::<PathBuf>("snapshot")
        .context("missing snapshot path")
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("scan", args)) => scan(args),
        Some(("resolve", args)) => resolve(args),
        Some(("report", args)) => report(args),
        Some(("history", args)) => history(args),
        _ => unreachable!("subcommand is required"),
    }
}
