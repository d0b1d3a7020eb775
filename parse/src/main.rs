use std::error::Error;
use std::fs::File;
use std::io::{prelude::*, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use glossa::chain::Registration;
use glossa::orthography;
use glossa::processor::{AnnotatedSentence, GlossToken};
use glossa::{ChainDict, Dictionary, Grammar, Parser as GlossParser, Processor};

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use unicode_normalization::UnicodeNormalization;

#[derive(Parser, Debug)]
#[clap(
    name = "parse",
    about = "A program to gloss a text with dictionaries and a grammar."
)]
struct Args {
    /// Dictionary file, either binary (*.bdi, in zstd) or Toolbox.
    /// May be given several times.
    #[clap(short = 'd', long)]
    dictionary: Vec<PathBuf>,

    /// Binary grammar file (in zstd).
    #[clap(short = 'g', long)]
    grammar: Option<PathBuf>,

    /// Orthography converter, applied in the order given.
    #[clap(short = 's', long)]
    script: Vec<String>,

    /// Ignores tones in dictionary lookups.
    #[clap(short = 't', long)]
    detone: bool,

    /// Input text file. Reads the standard input if not given.
    #[clap(short = 'i', long)]
    infile: Option<PathBuf>,

    /// Output file. Writes to the standard output if not given.
    #[clap(short = 'o', long)]
    outfile: Option<PathBuf>,

    /// Verbosity level, repeat for more messages.
    #[clap(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_dictionary(path: &Path) -> Result<Dictionary, Box<dyn Error>> {
    let file = File::open(path)?;
    let dict = if path.extension().map_or(false, |ext| ext == "bdi") {
        Dictionary::read(zstd::Decoder::new(file)?)?
    } else {
        Dictionary::from_toolbox_reader(file)?
    };
    Ok(dict)
}

/// Splits a text into paragraphs at blank lines.
fn paragraphs(text: &str) -> Vec<String> {
    let mut paras = vec![];
    let mut lines: Vec<&str> = vec![];
    for line in text.lines() {
        if line.trim().is_empty() {
            if !lines.is_empty() {
                paras.push(lines.join("\n"));
                lines.clear();
            }
        } else {
            lines.push(line);
        }
    }
    if !lines.is_empty() {
        paras.push(lines.join("\n"));
    }
    paras
}

fn write_sentence<W>(wtr: &mut W, sent: &AnnotatedSentence) -> std::io::Result<()>
where
    W: Write,
{
    for token in &sent.tokens {
        match token {
            GlossToken::Word(w) => {
                let glosses: Vec<_> = w.glosses.iter().map(ToString::to_string).collect();
                writeln!(wtr, "{}\t{}\t{}", w.token, w.stage, glosses.join(" | "))?;
            }
            GlossToken::Punct(s) | GlossToken::SentPunct(s) => writeln!(wtr, "{s}\tc")?,
            GlossToken::Tag(s) => writeln!(wtr, "{s}\ttag")?,
            GlossToken::Comment(s) => writeln!(wtr, "{}\tcomment", s.replace('\n', " "))?,
        }
    }
    writeln!(wtr, "EOS")
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

    eprintln!("Loading the dictionaries...");
    let mut chain = ChainDict::new();
    for path in &args.dictionary {
        match chain.register(load_dictionary(path)?) {
            Registration::Added(id) => log::info!("Added {path:?} as {id}"),
            Registration::Replaced { old, new } => {
                log::info!("Replaced {old} with {path:?} as {new}")
            }
            Registration::Unchanged(id) => log::info!("Skipped {path:?}, identical to {id}"),
        }
    }

    let grammar = match args.grammar.as_ref() {
        Some(path) => {
            eprintln!("Loading the grammar...");
            Some(Grammar::read(zstd::Decoder::new(File::open(path)?)?)?)
        }
        None => None,
    };

    let converters = args
        .script
        .iter()
        .map(|name| orthography::converter(name))
        .collect::<Result<Vec<_>, _>>()?;

    let parser = GlossParser::new(chain, grammar.as_ref())?.detone(args.detone);
    let processor = Processor::new(parser)?.converters(converters);
    eprintln!("Ready to parse :)");

    let mut text = String::new();
    match args.infile.as_ref() {
        Some(path) => BufReader::new(File::open(path)?).read_to_string(&mut text)?,
        None => std::io::stdin().lock().read_to_string(&mut text)?,
    };
    let text: String = text.nfkd().collect();

    let mut out: Box<dyn Write> = match args.outfile.as_ref() {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    for para in paragraphs(&text) {
        for sent in processor.parse_paragraph(&para) {
            write_sentence(&mut out, &sent)?;
        }
    }
    out.flush()?;

    Ok(())
}
