//! Inspect and append to note files.
//!
//! Usage: nerf <command> <file> [args]
//!
//!   new <file>            start a document holding an empty list
//!   append <file> <note>  append a note, e.g. `(insert 0 (become-atom "a"))`
//!   show <file>           print the document's notes and tree
//!   history <file>        print every note in the context it was played in
//!   hash <file>           print the hash of the document's score

use std::error::Error;
use std::fs::OpenOptions;
use std::process::ExitCode;

use flexi_logger::Logger;
use log::info;

use nerf::Note;
use nerf::SExpr;
use nerf::Score;
use nerf::Session;
use nerf::file::NoteWriter;
use nerf::file::read_score_file;
use nerf::in_context::history_in_context;
use nerf::play::Construct;
use nerf::pp::MultilineMode;
use nerf::pp::construct_iri_top_down;
use nerf::pp::construct_pp_tree;
use nerf::pp::render;

const USAGE: &str = "usage: nerf <new|append|show|history|hash> <file> [note]";

fn load(session: &mut Session, path: &str) -> Result<Score, Box<dyn Error>> {
    let score = read_score_file(session, path)?;
    info!("loaded {} notes from {}", score.len(), path);
    return Ok(score);
}

fn append(path: &str, note: &Note) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    NoteWriter::new(file).write_note(note)?;
    return Ok(());
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let (Some(command), Some(path)) = (args.first(), args.get(1)) else {
        return Err(USAGE.into());
    };
    let mut session = Session::new();

    match command.as_str() {
        "new" => {
            if std::path::Path::new(path).exists() {
                return Err(format!("{path} already exists").into());
            }
            append(path, &Note::BecomeList)?;
        }
        "append" => {
            let note: Note = args.get(2).ok_or(USAGE)?.parse()?;
            let score = load(&mut session, path)?;
            // refuse notes that do not fit the document
            let tree = session.play(&score)?;
            SExpr::play_note(&mut session.scores, &note, tree.as_ref())?;
            append(path, &note)?;
        }
        "show" => {
            let score = load(&mut session, path)?;
            for (i, note) in score.notes().into_iter().enumerate() {
                println!("{:>4}  {}", i, note);
            }
            match session.play(&score)? {
                Some(tree) => {
                    let pp_tree = construct_pp_tree(&tree, &[]);
                    println!("{}", render(&construct_iri_top_down(&pp_tree, MultilineMode::MultiLineAligned)));
                }
                None => println!("(empty)"),
            }
        }
        "history" => {
            let score = load(&mut session, path)?;
            for (i, item) in history_in_context(&mut session, &score)?.iter().enumerate() {
                println!("{:>4}  {}", i, item);
            }
        }
        "hash" => {
            let score = load(&mut session, path)?;
            println!("{}", score.hash());
        }
        _ => return Err(USAGE.into()),
    }

    return Ok(());
}

fn main() -> ExitCode {
    let _logger = match Logger::try_with_env_or_str("warn").and_then(|logger| logger.start()) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("failed to start logger: {err}");
            None
        }
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    return match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("nerf: {err}");
            ExitCode::FAILURE
        }
    };
}
