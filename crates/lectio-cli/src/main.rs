use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context as _, Result, bail};
use clap::{Args, Parser, Subcommand};
use lectio_config::{Config, DEFAULT_TRANSLATION};
use lectio_engine::{
    AnchorIndex, AnnotationBinding, Backend, Library, RenderMode, SegmentItem, Token,
    header_type, segment_for_mode,
};
use lectio_syntax::{
    BookTable, Context, format_references, locate_references, locate_strongs, parse_reference,
};

#[derive(Parser)]
#[command(name = "lectio")]
#[command(version, about = "Scripture reference resolution and annotated passages", long_about = None)]
#[command(after_help = "EXAMPLES:
    lectio parse \"John 3:16-17\"              Resolve a reference
    lectio parse \"v. 4\" --book GEN --chapter 2 Resolve against a context
    lectio locate \"See Gen 1; 2:3\"           Find references in text
    lectio passage \"John 3\" --group default  Show a chapter with its notes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a reference (and any continuations) to canonical specs
    Parse {
        reference: String,
        #[command(flatten)]
        context: ContextArgs,
        /// Print specs as JSON
        #[arg(long)]
        json: bool,
    },
    /// Split free text into literal runs and references
    Locate {
        text: String,
        #[command(flatten)]
        context: ContextArgs,
        #[arg(long)]
        json: bool,
    },
    /// Parse each reference, then render them all as one display string
    Format {
        #[arg(required = true)]
        references: Vec<String>,
        #[command(flatten)]
        context: ContextArgs,
    },
    /// Find Strong's numbers (G26, H430) in text
    Strongs { text: String },
    /// List the book table
    Books {
        #[arg(long)]
        apocrypha: bool,
    },
    /// Show a chapter split around its notes
    Passage {
        reference: String,
        #[arg(long)]
        translation: Option<String>,
        /// Note group to load
        #[arg(long)]
        group: Option<String>,
        #[arg(long, value_name = "interlinear|sidenotes")]
        mode: Option<RenderMode>,
        /// Extra data directories, searched after the configured one
        #[arg(long = "data", value_name = "DIR")]
        data: Vec<PathBuf>,
        #[arg(long)]
        apocrypha: bool,
    },
}

#[derive(Args)]
struct ContextArgs {
    /// Current book code for shorthand and keyword references
    #[arg(long, value_name = "CODE")]
    book: Option<String>,
    /// Current chapter
    #[arg(long)]
    chapter: Option<u32>,
    /// Also search the apocrypha
    #[arg(long)]
    apocrypha: bool,
}

impl ContextArgs {
    fn to_context(&self, config: Option<&Config>) -> Result<Context> {
        let book = match &self.book {
            Some(code) => Some(
                BookTable::standard()
                    .code(code)
                    .with_context(|| format!("Unknown book code: {code}"))?,
            ),
            None => None,
        };
        let include_apocrypha =
            self.apocrypha || config.is_some_and(|config| config.include_apocrypha);
        Ok(Context {
            book,
            chapter: self.chapter,
            include_apocrypha,
        })
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let config_path = Config::config_path();
    let config = Config::load().context("Failed to load config file")?;
    match &config {
        Some(_) => log::debug!("Loaded config from {}", config_path.display()),
        None => log::debug!("No config file at {}", config_path.display()),
    }

    match cli.command {
        Command::Parse {
            reference,
            context,
            json,
        } => {
            let specs = parse_reference(&reference, &context.to_context(config.as_ref())?);
            if json {
                println!("{}", serde_json::to_string_pretty(&specs)?);
            } else if specs.is_empty() {
                bail!("Not a reference: {reference}");
            } else {
                for spec in &specs {
                    println!("{spec}");
                }
            }
        }
        Command::Locate {
            text,
            context,
            json,
        } => {
            let segments = locate_references(&text, &context.to_context(config.as_ref())?);
            if json {
                println!("{}", serde_json::to_string_pretty(&segments)?);
            } else {
                for segment in &segments {
                    let span = format!("{:>4}..{:<4}", segment.start, segment.end);
                    match &segment.reference {
                        Some(spec) => println!("{span} {:?} → {spec}", segment.text),
                        None => println!("{span} {:?}", segment.text),
                    }
                }
            }
        }
        Command::Format {
            references,
            context,
        } => {
            let context = context.to_context(config.as_ref())?;
            let specs: Vec<_> = references
                .iter()
                .flat_map(|reference| parse_reference(reference, &context))
                .collect();
            println!("{}", format_references(&specs));
        }
        Command::Strongs { text } => {
            for segment in locate_strongs(&text) {
                let span = format!("{:>4}..{:<4}", segment.start, segment.end);
                match &segment.number {
                    Some(number) => println!("{span} {number}"),
                    None => println!("{span} {:?}", segment.text),
                }
            }
        }
        Command::Books { apocrypha } => {
            for book in BookTable::standard().books(apocrypha) {
                let info = book.info();
                println!(
                    "{:<4} {:<24} {:>3}  {}",
                    info.code,
                    info.display_title(),
                    info.chapters,
                    info.aliases.join(", ")
                );
            }
        }
        Command::Passage {
            reference,
            translation,
            group,
            mode,
            data,
            apocrypha,
        } => {
            let library = match &config {
                Some(config) => config.library(&data),
                None => Library::new(data.into_iter().map(Backend::Directory).collect()),
            };
            if library.backends().is_empty() {
                bail!(
                    "No data directory: pass --data or set data_path in {}",
                    config_path.display()
                );
            }

            let context = Context {
                include_apocrypha: apocrypha
                    || config.as_ref().is_some_and(|c| c.include_apocrypha),
                ..Context::default()
            };
            let spec = parse_reference(&reference, &context)
                .into_iter()
                .next()
                .with_context(|| format!("Not a reference: {reference}"))?;
            let Some(chapter) = spec.initial_chapter else {
                bail!("Reference names no chapter: {reference}");
            };

            let translation = translation
                .or_else(|| config.as_ref().map(|c| c.translation.clone()))
                .unwrap_or_else(|| DEFAULT_TRANSLATION.to_string());
            let group = group.or_else(|| config.as_ref().and_then(|c| c.note_group.clone()));
            let mode = mode
                .or_else(|| config.as_ref().map(|c| c.render_mode))
                .unwrap_or_default();

            let tokens = library
                .load_tokens(&translation, spec.book, chapter)
                .with_context(|| format!("Failed to load {spec} ({translation})"))?;
            let notes = match &group {
                Some(group) => library
                    .load_notes(group, spec.book, chapter)
                    .with_context(|| format!("Failed to load notes for {spec} in group {group}"))?,
                None => Vec::new(),
            };

            println!("{} ({translation}, {mode})", format_references(&[spec]));
            println!();
            for item in segment_for_mode(mode, &tokens, &notes)? {
                match item {
                    SegmentItem::Chunk(chunk) => print_chunk(chunk),
                    SegmentItem::Marker(note) => println!("    ▸ {}", describe_note(note)),
                }
            }

            if mode == RenderMode::Sidenotes {
                print_sidenotes(&tokens, &notes);
            }
        }
    }

    Ok(())
}

fn print_chunk(chunk: &[Token]) {
    let mut line = String::new();
    for token in chunk {
        if header_type(&token.kind).is_some() {
            if !line.is_empty() {
                println!("{}", line.trim_end());
                line.clear();
            }
            println!("## {}", token.content);
        } else if token.is_label() {
            line.push_str(&format!("[{}] ", token.content));
        } else {
            line.push_str(&token.content);
            line.push(' ');
        }
    }
    if !line.is_empty() {
        println!("{}", line.trim_end());
    }
}

fn print_sidenotes(tokens: &[Token], notes: &[AnnotationBinding]) {
    let anchors = AnchorIndex::build(notes);
    let mut shown = HashSet::new();
    println!();
    for id in tokens.iter().filter_map(|t| t.id.as_ref()) {
        for note in anchors.notes_for(id) {
            if shown.insert(note.id.as_str()) {
                println!("{id:<12} {}", describe_note(note));
            }
        }
    }
}

fn describe_note(note: &AnnotationBinding) -> String {
    match &note.contents {
        serde_json::Value::Null => note.id.clone(),
        serde_json::Value::String(text) => format!("{}: {text}", note.id),
        other => format!("{}: {other}", note.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_passage_arguments() {
        let cli = Cli::try_parse_from([
            "lectio", "passage", "John 3", "--mode", "sidenotes", "--data", "/a", "--data", "/b",
        ])
        .unwrap();
        let Command::Passage { mode, data, .. } = cli.command else {
            panic!("expected passage command");
        };
        assert_eq!(mode, Some(RenderMode::Sidenotes));
        assert_eq!(data, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["lectio", "passage", "John 3", "--mode", "columns"]).is_err());
    }

    #[test]
    fn test_context_args_resolve_book_code() {
        let args = ContextArgs {
            book: Some("GEN".to_string()),
            chapter: Some(2),
            apocrypha: false,
        };
        let mut config = Config::new("/data");
        config.include_apocrypha = true;

        let context = args.to_context(Some(&config)).unwrap();
        assert_eq!(context.book.map(|b| b.as_str()), Some("GEN"));
        assert_eq!(context.chapter, Some(2));
        assert!(context.include_apocrypha);
    }

    #[test]
    fn test_context_args_reject_unknown_code() {
        let args = ContextArgs {
            book: Some("XYZ".to_string()),
            chapter: None,
            apocrypha: false,
        };
        assert!(args.to_context(None).is_err());
    }
}
