use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use webpress::process::{ProcessError, ProcessEvent};
use webpress::scan::ScanError;
use webpress::{config, output, process};

#[derive(Parser)]
#[command(name = "webpress")]
#[command(about = "Convert a directory of images to size-capped WebP")]
#[command(long_about = "\
Convert a directory of images to size-capped WebP

Every .jpg, .jpeg, .png, .gif and .bmp file directly inside the source
directory is re-encoded as lossy WebP next to the original:

  images/
  ├── webpress.toml     # Optional overrides (see gen-config)
  ├── hero.jpg          # 2.4 MB → hero.webp, downscaled to 2000px wide
  ├── logo.png          # 40 KB → left alone (already small)
  └── banner.png        # transparency is kept in banner.webp

Images wider than the maximum width are downscaled first. The encoder then
steps down a quality ladder until the output fits the byte budget; when no
level fits, the smallest attempt is kept anyway. Sources are never modified.

Run 'webpress gen-config' to generate a documented webpress.toml.")]
#[command(version)]
struct Cli {
    /// Image directory
    #[arg(long, default_value = "images", global = true)]
    source: PathBuf,

    /// Config file (default: webpress.toml in the image directory, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More diagnostic output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Optimize every image in the source directory (default)
    Optimize,
    /// Print a stock webpress.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command.unwrap_or(Command::Optimize) {
        Command::Optimize => {
            let optimize_config = match &cli.config {
                Some(path) => config::load_config_file(path)?,
                None => config::load_config(&cli.source)?,
            };

            let (tx, rx) = std::sync::mpsc::channel::<ProcessEvent>();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    for line in output::format_process_event(&event) {
                        println!("{}", line);
                    }
                }
            });
            let result = process::process(&cli.source, &optimize_config, Some(tx));
            // The sender was moved into `process` and is dropped by now.
            printer.join().ok();

            match result {
                Ok(report) => output::print_run_report(&report.summary, &report.outputs),
                Err(ProcessError::Scan(
                    e @ (ScanError::DirectoryNotFound(_) | ScanError::NoImagesFound(_)),
                )) => println!("{}", output::format_scan_error(&e)),
                Err(e) => return Err(e.into()),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Compact diagnostics on stderr; stdout carries the report.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
