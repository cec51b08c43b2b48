//! Console player that runs compiled `.ink.json` story files through a
//! [`DialogueRunner`].
use std::{fs, io, io::Write, path::Path};

use anyhow::{bail, Context};
use clap::Parser;
use dialogue_runner::{
    asset::AssetLibrary, DialogueChoice, DialogueRunner, EventKind, RunnerEvent, StoryFactory,
};
use rand::Rng;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The compiled .ink.json file
    pub json_filename: String,

    /// Choose options randomly
    #[arg(short, default_value_t = false)]
    pub auto_play: bool,

    /// Forbid external function fallbacks
    #[arg(short = 'e', default_value_t = false)]
    pub forbid_external_fallbacks: bool,

    /// The file is a story asset envelope instead of compiled ink
    #[arg(long, default_value_t = false)]
    pub asset: bool,
}

enum Command {
    Choose(usize),
    Exit,
    Help,
    Load(String),
    Save(String),
    Reset,
    Rewind,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let json_string = get_json_string(&args.json_filename)?;

    let factory =
        StoryFactory::new().with_external_function_fallbacks(!args.forbid_external_fallbacks);
    let mut runner: DialogueRunner = DialogueRunner::with_factory(factory);

    runner.subscribe(EventKind::NewLine, |runner, event| {
        if let RunnerEvent::NewLine(line) = event {
            println!("{}", line.text);

            if !line.tags.is_empty() {
                println!("# tags: {}", line.tags.join(", "));
            }
        }

        runner.advance();
    });

    if args.asset {
        let mut library = AssetLibrary::new();
        let reference = library
            .load_json(&json_string)
            .with_context(|| format!("invalid asset file `{}`", args.json_filename))?;

        runner.start_from(&reference, true);
    } else {
        runner.start_from(&json_string, true);
    }

    if !runner.is_story_active() {
        bail!("could not start the story in `{}`", args.json_filename);
    }

    loop {
        let choices = runner.current_choices().to_vec();

        if choices.is_empty() {
            break;
        }

        let command = if args.auto_play {
            let i = rand::thread_rng().gen_range(0..choices.len());

            println!();
            print_choices(&choices);
            println!("?> {}", i + 1);

            Command::Choose(i)
        } else {
            match read_input(&choices)? {
                Some(command) => command,
                // stdin closed
                None => break,
            }
        };

        if process_command(command, &mut runner)? {
            break;
        }
    }

    runner.stop();

    Ok(())
}

// Returns true if the program has to stop
fn process_command(command: Command, runner: &mut DialogueRunner) -> anyhow::Result<bool> {
    match command {
        Command::Choose(c) => runner.choose(c, true),
        Command::Exit => return Ok(true),
        Command::Load(filename) => {
            let saved_string = get_json_string(&filename)?;
            runner.load_save_state(&saved_string)?;
            println!("Ok.");
            runner.advance();
        }
        Command::Save(filename) => {
            let json_string = runner
                .save_state()
                .context("could not get the story state")?;
            save_json(&filename, &json_string)?;
            println!("Ok.")
        }
        Command::Reset => {
            runner.reset();
            runner.advance();
        }
        Command::Rewind => {
            runner.rewind_to_start();
            runner.advance();
        }
        Command::Help => println!(
            "Commands:\n\t<option number>\n\tload <filename>\n\tsave <filename>\n\treset\n\trewind\n\tquit\n\t"
        ),
    }

    Ok(false)
}

fn print_choices(choices: &[DialogueChoice]) {
    for (i, c) in choices.iter().enumerate() {
        println!("{}: {}", i + 1, c.text);
    }
}

fn read_input(choices: &[DialogueChoice]) -> anyhow::Result<Option<Command>> {
    let mut line = String::new();

    loop {
        println!();
        print_choices(choices);
        print!("?> ");
        io::stdout().flush()?;

        line.clear();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();

        if trimmed.is_empty() {
            continue;
        }

        if let Ok(v) = trimmed.parse::<usize>() {
            if v < 1 || v > choices.len() {
                print_error("option out of range");
                continue;
            }

            return Ok(Some(Command::Choose(v - 1)));
        }

        let words: Vec<&str> = trimmed.split_whitespace().collect();

        match words[0].to_lowercase().as_str() {
            "exit" | "quit" => return Ok(Some(Command::Exit)),
            "help" => return Ok(Some(Command::Help)),
            "reset" => return Ok(Some(Command::Reset)),
            "rewind" => return Ok(Some(Command::Rewind)),
            "load" => {
                if words.len() == 2 {
                    return Ok(Some(Command::Load(words[1].to_string())));
                }

                print_error("incorrect filename");
            }
            "save" => {
                if words.len() == 2 {
                    return Ok(Some(Command::Save(words[1].to_string())));
                }

                print_error("incorrect filename");
            }
            _ => print_error("unrecognized option or command"),
        }
    }
}

fn print_error(error: &str) {
    eprintln!("<{error}>");
}

fn get_json_string(filename: &str) -> anyhow::Result<String> {
    let path = Path::new(filename);
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read file `{}`", path.to_string_lossy()))?;

    Ok(json)
}

fn save_json(filename: &str, content: &str) -> anyhow::Result<()> {
    let path = Path::new(filename);
    fs::write(path, content)
        .with_context(|| format!("could not write file `{}`", path.to_string_lossy()))?;

    Ok(())
}
