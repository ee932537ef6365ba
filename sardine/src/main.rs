use console::style;
use sardine::Session;
use sardine_source::{Error, FsModuleLoader};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::{env, fs, process};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let code = match args.as_slice() {
        [] => run_repl(),
        [script] => run_file(Path::new(script)),
        _ => {
            eprintln!("Usage: sardine [script]");
            64
        }
    };
    process::exit(code);
}

fn run_file(path: &Path) -> i32 {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: could not read {}: {}", style("error").red(), path.display(), err);
            return 66;
        }
    };

    let root = path.parent().unwrap_or_else(|| Path::new("."));
    let mut session = Session::new(io::stdout(), FsModuleLoader::new(root));
    match session.run(&source) {
        Ok(()) => 0,
        Err(errors) => {
            report(&errors);
            match errors[0].kind {
                sardine::ErrorKind::Runtime(_) => 70,
                _ => 65,
            }
        }
    }
}

fn run_repl() -> i32 {
    let mut session = Session::stdout();
    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return 74;
        }

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                println!();
                return 0;
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("{}: {}", style("error").red(), err);
                return 74;
            }
        }

        if let Err(errors) = session.run(&line) {
            report(&errors);
        }
    }
}

fn report(errors: &[Error]) {
    for error in errors {
        eprintln!(
            "{}: line {}, at '{}'. {}",
            style(error.kind).red().bold(),
            error.line,
            error.token,
            error.message
        );
    }
}
