use clap::{Parser, Subcommand};
use photo_porter::config::{self, AppConfig};
use photo_porter::imaging::RustBackend;
use photo_porter::output;
use photo_porter::session::SessionError;
use photo_porter::shell::Shell;
use photo_porter::types::{OpError, Operation};
use photo_porter::validate::check_image;
use photo_porter::worker::{Job, JobOutput, Worker, run_job};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn version_string() -> &'static str {
    let on_tag = env!("PHOTO_PORTER_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PHOTO_PORTER_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "photo-porter")]
#[command(about = "Inspect, convert, rename and move image files without overwriting anything")]
#[command(long_about = "\
Inspect, convert, rename and move image files without overwriting anything

Supported files: .png .jpg .jpeg .bmp .tiff .gif .webp (any case).
WebP files can be inspected and moved but not converted.

Naming rules:
  gray     photo.png  → photo_bw.png    (re-running replaces photo_bw.png)
  move     photo.png  → dest/photo.png, or dest/photo_1.png, photo_2.png, …
           when the name is taken
  rename   photo.png  + \"beach\" → beach.png  (refused if beach.png exists)

Each command runs one operation and exits non-zero on failure.
'photo-porter shell' keeps a current file and a history between commands.

Run 'photo-porter gen-config' to generate a documented photo-porter.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Directory containing photo-porter.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show dimensions, size, format, color mode and timestamps
    Info {
        path: PathBuf,
        /// Print metadata as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that a file is a supported, decodable image
    Check {
        path: PathBuf,
        /// Only check existence and extension, skip the decode
        #[arg(long)]
        shallow: bool,
    },
    /// Save a grayscale copy next to the image as <name>_bw.<ext>
    Gray { path: PathBuf },
    /// Move an image into a folder, numbering the name if it is taken
    Move {
        path: PathBuf,
        /// Destination folder (default: default_destination from config)
        dest: Option<PathBuf>,
    },
    /// Rename an image in place, keeping its extension
    Rename { path: PathBuf, new_name: String },
    /// Interactive session with a current file and history
    Shell,
    /// Print a stock photo-porter.toml with all options documented
    GenConfig,
}

fn init_logger(config: &AppConfig, verbose: bool) {
    use std::io::Write;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        config.level_filter()
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(ExitCode::SUCCESS);
    }

    let config = config::load_config(&cli.config_dir)?;
    init_logger(&config, cli.verbose);
    let backend = RustBackend::new();

    let code = match cli.command {
        Command::Info { path, json } => {
            let job = Job {
                operation: Operation::Inspect,
                source: path,
            };
            match run_job(&backend, &job) {
                Ok(JobOutput::Metadata(info)) if json => {
                    println!("{}", serde_json::to_string_pretty(&info)?);
                    ExitCode::SUCCESS
                }
                result => report(&result),
            }
        }
        Command::Check { path, shallow } => {
            let result = check_image(&backend, &path, !shallow);
            if let Err(e) = &result {
                log::warn!("validate {}: {e}", path.display());
            }
            println!("{}", output::format_check(&path, &result));
            if result.is_ok() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Gray { path } => one_shot(&backend, &config, &path, Operation::Grayscale),
        Command::Move { path, dest } => {
            let Some(destination) = dest.or_else(|| config.default_destination.clone()) else {
                eprintln!("{}", SessionError::NoDestination);
                return Ok(ExitCode::from(2));
            };
            one_shot(&backend, &config, &path, Operation::Move { destination })
        }
        Command::Rename { path, new_name } => {
            one_shot(&backend, &config, &path, Operation::Rename { new_name })
        }
        Command::Shell => {
            let worker = Worker::spawn(RustBackend::new());
            let mut shell = Shell::new(backend, worker, &config);
            shell.run(std::io::stdin().lock(), std::io::stdout().lock())?;
            ExitCode::SUCCESS
        }
        Command::GenConfig => ExitCode::SUCCESS,
    };

    Ok(code)
}

/// Validate `path`, run one operation on it and print the outcome.
fn one_shot(
    backend: &RustBackend,
    config: &AppConfig,
    path: &Path,
    operation: Operation,
) -> ExitCode {
    if let Err(e) = check_image(backend, path, config.verify_on_open) {
        log::warn!("{} refused for {}: {e}", operation.name(), path.display());
        return report(&Err(e));
    }
    let job = Job {
        operation,
        source: path.to_path_buf(),
    };
    report(&run_job(backend, &job))
}

fn report(result: &Result<JobOutput, OpError>) -> ExitCode {
    match result {
        Ok(_) => {
            output::print_result(result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", output::format_error(e));
            ExitCode::FAILURE
        }
    }
}
