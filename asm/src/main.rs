use std::path::{Path, PathBuf};
use std::process::ExitCode;

use color_print::cprintln;
use retroasm::{Assembler, Error, Level, Output};

const HELP_TEMPLATE: &str = "\
{before-help}{bin} {version}
  {author}
  {about}

{usage-heading}
{tab}{usage}

{all-args}{after-help}";

#[derive(Debug, clap::Parser)]
#[clap(author, version, about, help_template = HELP_TEMPLATE)]
struct Args {
    /// Input file
    input: PathBuf,

    /// Base address: C000, $C000 or 0xC000
    #[clap(short, long, default_value = "C000", value_parser = parse_base)]
    base: u16,

    /// Output file [default: input with extension prg]
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Log level: 0 error, 1 warn, 2 info, 3 diag
    #[clap(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=3))]
    log: u8,

    /// Dump assembly listing
    #[clap(short, long)]
    dump: bool,

    /// Assemble only, write nothing
    #[clap(short, long)]
    no_write: bool,

    /// Omit the 2-byte load address header
    #[clap(short, long)]
    raw: bool,

    /// Write the symbol table as YAML
    #[clap(short, long)]
    symbols: Option<PathBuf>,
}

fn parse_base(s: &str) -> Result<u16, String> {
    let hex = s
        .strip_prefix('$')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(hex, 16).map_err(|err| format!("`{}` is not a 16-bit hex address: {}", s, err))
}

fn main() -> ExitCode {
    use clap::Parser;

    let args = Args::parse();
    let level = Level::try_from(args.log).unwrap_or(Level::Warn);
    println!("6510 Assembler");

    println!("1. Read Files and Assemble");
    println!("  < {}", args.input.display());
    let mut asm = Assembler::new();
    let output = match asm.run_file(&args.input, args.base) {
        Ok(output) => output,
        Err(err) => {
            asm.log().print(level, asm.sources());
            err.print_diag(asm.sources());
            return ExitCode::FAILURE;
        }
    };
    output.log.print(level, &output.sources);

    if (args.dump || level >= Level::Info) && !output.listing.is_empty() {
        output.listing.print_dump();
    }
    cprintln!(
        "  <g>${:04X}</> {} bytes, {} symbols",
        output.origin,
        output.bytes.len(),
        output.symbols.len()
    );

    if args.no_write {
        return ExitCode::SUCCESS;
    }
    match write(&args, &output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            err.print_diag(&output.sources);
            ExitCode::FAILURE
        }
    }
}

fn write(args: &Args, output: &Output) -> Result<(), Error> {
    println!("2. Write Image");
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("prg"));
    println!("  > {}", path.display());
    let image = if args.raw {
        output.bytes.clone()
    } else {
        output.image()
    };
    write_file(&path, image.as_slice())?;

    if let Some(path) = &args.symbols {
        println!("  > {}", path.display());
        write_file(path, output.symbols.to_yaml()?.as_bytes())?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), Error> {
    use std::io::Write;

    let name = path.display().to_string();
    let mut file = std::fs::File::create(path).map_err(|err| Error::FileCreate(name.clone(), err))?;
    file.write_all(contents)
        .map_err(|err| Error::FileWrite(name, err))
}
