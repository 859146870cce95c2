use std::env;
use std::fs;
use std::process;

fn main() {
  env_logger::init();

  let args: Vec<String> = env::args().collect();
  if args.len() < 2 || args.len() > 3 {
    let program = args.first().map(String::as_str).unwrap_or("blocc");
    eprintln!("usage: {program} <source-file> [output-file]");
    process::exit(1);
  }

  let source = match fs::read_to_string(&args[1]) {
    Ok(source) => source,
    Err(err) => {
      eprintln!("{}: {err}", args[1]);
      process::exit(1);
    }
  };
  log::debug!("compiling {}", args[1]);

  let asm = match blocc::compile(&source) {
    Ok(asm) => asm,
    Err(err) => {
      eprintln!("{err}");
      process::exit(1);
    }
  };

  match args.get(2) {
    Some(path) => {
      if let Err(err) = fs::write(path, &asm) {
        eprintln!("{path}: {err}");
        process::exit(1);
      }
      log::info!("wrote {} bytes to {path}", asm.len());
    }
    None => print!("{asm}"),
  }
}
