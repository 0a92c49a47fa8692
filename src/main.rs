use std::process;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use lispet::Error;
use lispet::core::default_env;
use lispet::env::Env;
use lispet::evaluator;
use lispet::printer::pr_str;
use lispet::reader::read_str;
use lispet::value::Value;

fn main() {
    let env = match default_env() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("Failed to initialize the interpreter: {e}");
            process::exit(1);
        }
    };

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        run_file(&args, &env);
    } else {
        run_repl(&env);
    }
}

/// Read-evaluate-print one input line
fn rep(input: &str, env: &Env) -> Result<String, Error> {
    let ast = read_str(input)?;
    let value = evaluator::eval(&ast, env)?;
    Ok(pr_str(&value, true))
}

/// Run a script: `lispet <file> [args...]` binds the remaining arguments to
/// *ARGV* and loads the file
fn run_file(args: &[String], env: &Env) {
    let argv: Vec<Value> = args[2..]
        .iter()
        .map(|arg| Value::string(arg.as_str()))
        .collect();
    env.set("*ARGV*", Value::list(argv));

    // Render the path through the printer so quotes and backslashes in it
    // survive re-reading
    let form = format!("(load-file {})", pr_str(&Value::string(args[1].as_str()), true));
    match read_str(&form).and_then(|ast| evaluator::eval(&ast, env)) {
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run_repl(env: &Env) {
    println!("lispet {}", env!("CARGO_PKG_VERSION"));
    println!("Enter forms like (+ 1 2). Type Ctrl+C or Ctrl+D to exit.");
    println!();

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Could not initialize the line editor: {e}");
            process::exit(1);
        }
    };

    loop {
        match rl.readline("user> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match rep(line, env) {
                    Ok(output) => println!("{output}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
}
