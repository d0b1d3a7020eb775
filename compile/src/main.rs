use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use glossa::Dictionary;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    about = "A program to compile a Toolbox dictionary into binary."
)]
struct Args {
    /// Toolbox dictionary file.
    #[clap(short = 'i', long)]
    toolbox_in: PathBuf,

    /// File to which the binary dictionary is output (in zstd).
    #[clap(short = 'o', long)]
    dict_out: PathBuf,

    /// Verbosity level, repeat for more messages.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    eprintln!("Compiling the dictionary...");
    let start = Instant::now();
    let dict = Dictionary::from_toolbox_reader(File::open(&args.toolbox_in)?)?;
    eprintln!("{} seconds", start.elapsed().as_secs_f64());
    eprintln!(
        "lang={} name={} ver={} keys={} fingerprint={}",
        dict.lang(),
        dict.name(),
        dict.ver(),
        dict.len(),
        dict.fingerprint()
    );

    eprintln!(
        "Writing the binary dictionary in zstd...: {:?}",
        &args.dict_out
    );
    let mut f = zstd::Encoder::new(File::create(args.dict_out)?, 19)?;
    dict.write(&mut f)?;
    f.finish()?;

    Ok(())
}
