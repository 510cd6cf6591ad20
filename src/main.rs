use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use curiosity::page::{render_page, PageOptions};
use curiosity::rendering::render_pedigree_svg;
use curiosity::view::{assemble_all, TableRenderer, TextRenderer};
use curiosity::{ClinicalRecord, DashboardConfig, Pedigree, Theme};
use log::{info, LevelFilter};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "curiosity", version, about = "Single-patient clinical summary dashboard")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard over HTTP
    Serve {
        /// Address to bind, e.g. 127.0.0.1:8501
        #[arg(long)]
        addr: Option<String>,
        /// Number of worker threads (defaults to the CPU count)
        #[arg(long)]
        workers: Option<usize>,
        /// Theme used when the viewer has not picked one
        #[arg(long, value_enum, default_value_t = ThemeArg::Default)]
        theme: ThemeArg,
    },
    /// Render the dashboard as a static HTML file
    Render {
        #[arg(long, value_enum, default_value_t = ThemeArg::Default)]
        theme: ThemeArg,
        /// Include the reference range list
        #[arg(long)]
        ranges: bool,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the pedigree chart
    Pedigree {
        #[arg(long, value_enum, default_value_t = PedigreeFormat::Dot)]
        format: PedigreeFormat,
    },
    /// Print every table as text, marking abnormal rows with `!`
    Summary,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Default,
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(t: ThemeArg) -> Self {
        match t {
            ThemeArg::Default => Theme::Default,
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PedigreeFormat {
    Dot,
    Svg,
}

fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(LevelFilter::Debug);
        }
        _ => {
            builder.filter_level(LevelFilter::Trace);
        }
    }
    builder.init();
}

fn write_output(out: Option<PathBuf>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(content.as_bytes()).context("failed to write to stdout")?;
        }
    }
    Ok(())
}

#[cfg(feature = "server")]
fn serve(config: DashboardConfig) -> Result<()> {
    let server = curiosity::server::DashboardServer::bind(config).context("failed to start server")?;
    server.run().context("server stopped unexpectedly")?;
    Ok(())
}

#[cfg(not(feature = "server"))]
fn serve(_config: DashboardConfig) -> Result<()> {
    anyhow::bail!("curiosity was built without the `server` feature")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = DashboardConfig::default();
    let record = ClinicalRecord::sample();

    match cli.command {
        Command::Serve { addr, workers, theme } => {
            if let Some(addr) = addr {
                config.addr = addr;
            }
            if let Some(workers) = workers {
                config.workers = workers;
            }
            config.default_theme = theme.into();
            serve(config)?;
        }
        Command::Render { theme, ranges, out } => {
            let options = PageOptions { theme: theme.into(), show_reference_ranges: ranges };
            let html = render_page(&record, &options, &config).context("failed to render page")?;
            write_output(out, &html)?;
        }
        Command::Pedigree { format } => {
            let pedigree = Pedigree::build(&record.patient, &record.family_history)?;
            let text = match format {
                PedigreeFormat::Dot => pedigree.to_dot(),
                PedigreeFormat::Svg => render_pedigree_svg(&pedigree)?,
            };
            write_output(None, &text)?;
        }
        Command::Summary => {
            let p = &record.patient;
            let mut text = format!(
                "{} (age {}), {}\n\n",
                p.name, p.age, p.clinical_classification
            );
            text.push_str(&TextRenderer.render_tables(&assemble_all(&record))?);
            write_output(None, &text)?;
        }
    }
    Ok(())
}
