use std::{env, fs, process::ExitCode};

use stepwise::{MapEnvironment, StdInput, StdPrint, execute, parse_program};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let Some(file_path) = args.get(1) else {
        eprintln!("usage: stepwise <file.py>");
        return ExitCode::FAILURE;
    };

    let source = match fs::read_to_string(file_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading {file_path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let (graph, root) = match parse_program(&source) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let Some(root) = root else {
        return ExitCode::SUCCESS;
    };

    let mut env = MapEnvironment::new();
    let mut writer = StdPrint;
    let mut input = StdInput;
    match execute(&graph, root, &mut env, &mut writer, &mut input) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
