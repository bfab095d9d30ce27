use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use iulia::machine::MachineConfig;
use std::path::{Path, PathBuf};
use std::{fs::read_to_string, process::ExitCode};

const DATA_ERROR: u8 = 65;
const SOFTWARE_ERROR: u8 = 70;

#[derive(Debug, Parser)]
#[clap(name = "iulia", version)]
pub struct CLArgs {
    #[clap(subcommand)]
    pub routine: IuliaCommand,
}

#[derive(Debug, Subcommand)]
pub enum IuliaCommand {
    Tokenize {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: TokenFormat,
    },
    Parse {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "basic")]
        format: ReportFormat,
    },
    Run {
        path: PathBuf,
        #[clap(long = "format", value_enum, default_value = "pretty")]
        format: ReportFormat,
        /// Print every evaluated instruction before the final state.
        #[clap(long = "trace")]
        trace: bool,
        /// Upper bound on machine memory, in bytes.
        #[clap(long = "memory-limit", default_value_t = MachineConfig::default().memory_limit)]
        memory_limit: usize,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum TokenFormat {
    Debug,
    Basic,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ReportFormat {
    Debug,
    Basic,
    Pretty,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    iulia::init_tracing();
    let args = CLArgs::parse();
    match args.routine {
        IuliaCommand::Tokenize { path, format } => {
            let src = read_to_string(&path)?;
            Ok(tokenize(&src, &format))
        }
        IuliaCommand::Parse { path, format } => {
            let src = read_to_string(&path)?;
            Ok(parse(&src, &path, &format))
        }
        IuliaCommand::Run {
            path,
            format,
            trace,
            memory_limit,
        } => {
            let src = read_to_string(&path)?;
            Ok(run(&src, &path, &format, trace, MachineConfig { memory_limit }))
        }
    }
}

fn tokenize(src: &str, format: &TokenFormat) -> ExitCode {
    use iulia::lexer::formatter::{BasicFormatter, DebugFormatter, ToFormatter, TokenFormatter};
    use iulia::lexer::{Lexer, TokenKind};

    let mut lexer = Lexer::new(src);
    let formatter: Box<dyn TokenFormatter + '_> = match format {
        TokenFormat::Debug => Box::new(ToFormatter::<DebugFormatter>::create_formatter(&lexer)),
        TokenFormat::Basic => Box::new(ToFormatter::<BasicFormatter>::create_formatter(&lexer)),
    };
    let mut succeeded = true;
    loop {
        match lexer.next_token() {
            Ok(token) => {
                println!("{}", formatter.format(&token));
                if matches!(token.kind, TokenKind::Eof) {
                    break;
                }
            }
            Err(error) => {
                eprintln!("{}", formatter.format_lexical_error(&error));
                succeeded = false;
            }
        }
    }
    if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(DATA_ERROR)
    }
}

fn parser_formatter<'src>(
    src: &'src str,
    path: &'src Path,
    format: &ReportFormat,
) -> Box<dyn iulia::parser::formatter::ParserFormatter + 'src> {
    use iulia::parser::formatter::{
        BasicParserFormatter, DebugParserFormatter, PrettyParserFormatter,
    };

    match format {
        ReportFormat::Debug => Box::new(DebugParserFormatter),
        ReportFormat::Basic => Box::new(BasicParserFormatter::new(src)),
        ReportFormat::Pretty => Box::new(PrettyParserFormatter::new(src, path)),
    }
}

fn parse(src: &str, path: &Path, format: &ReportFormat) -> ExitCode {
    let formatter = parser_formatter(src, path, format);
    match iulia::parser::Parser::new(src).parse() {
        Ok(program) => {
            println!("{}", formatter.format(&program));
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", formatter.format_error(&error));
            ExitCode::from(DATA_ERROR)
        }
    }
}

fn run(
    src: &str,
    path: &Path,
    format: &ReportFormat,
    trace: bool,
    config: MachineConfig,
) -> ExitCode {
    use iulia::interpreter::formatter::{
        BasicRuntimeFormatter, DebugRuntimeFormatter, PrettyRuntimeFormatter, RuntimeFormatter,
    };
    use iulia::interpreter::Interpreter;
    use iulia::machine::error::Halt;
    use iulia::machine::formatter::{BasicStateFormatter, DebugStateFormatter, StateFormatter};
    use iulia::machine::WordMachine;

    let program = match iulia::parser::Parser::new(src).parse() {
        Ok(program) => program,
        Err(error) => {
            eprintln!("{}", parser_formatter(src, path, format).format_error(&error));
            return ExitCode::from(DATA_ERROR);
        }
    };

    let mut machine = WordMachine::with_config(config);
    let result = Interpreter::new(&program, &mut machine).run();

    let state_formatter: Box<dyn StateFormatter> = match format {
        ReportFormat::Debug => Box::new(DebugStateFormatter),
        ReportFormat::Basic | ReportFormat::Pretty => Box::new(BasicStateFormatter),
    };
    if trace {
        print!("{}", state_formatter.format_trace(&machine));
    }
    print!("{}", state_formatter.format_state(&machine));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => match error.halt() {
            Some(halt) if matches!(halt, Halt::Stop | Halt::Return(_)) => {
                println!("{}", state_formatter.format_halt(halt));
                ExitCode::SUCCESS
            }
            Some(halt) => {
                println!("{}", state_formatter.format_halt(halt));
                ExitCode::from(SOFTWARE_ERROR)
            }
            None => {
                let formatter: Box<dyn RuntimeFormatter + '_> = match format {
                    ReportFormat::Debug => Box::new(DebugRuntimeFormatter),
                    ReportFormat::Basic => Box::new(BasicRuntimeFormatter::new(src)),
                    ReportFormat::Pretty => Box::new(PrettyRuntimeFormatter::new(src, path)),
                };
                eprintln!("{}", formatter.format_error(&error));
                ExitCode::from(SOFTWARE_ERROR)
            }
        },
    }
}
