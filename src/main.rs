use std::{fs::File, io::BufReader, time::Instant};

use ocrbox::{Builder, CharBoxBuilder, LineBoxBuilder, TextBuilder, WordBoxBuilder};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

fn main() -> ocrbox::Result<()> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: ocrbox <engine output file> [text|words|lines|chars]");
        std::process::exit(2);
    };
    let kind = args.next().unwrap_or_else(|| "words".to_string());
    let input = BufReader::new(File::open(&path)?);

    let start = Instant::now();
    match kind.as_str() {
        "text" => println!("{}", TextBuilder::new().read(input)?),
        "lines" => {
            for line in LineBoxBuilder::new().read(input)? {
                println!("{line}");
            }
        }
        "chars" => {
            for char_box in CharBoxBuilder::new().read(input)? {
                println!("{char_box}");
            }
        }
        "words" => {
            for word in WordBoxBuilder::new().read(input)? {
                println!("{word}");
            }
        }
        other => {
            eprintln!("unknown output kind {other:?}, expected text, words, lines or chars");
            std::process::exit(2);
        }
    }
    log::debug!("Parsed {path} in {:?}", start.elapsed());
    Ok(())
}
