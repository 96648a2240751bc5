//! pdfstamp command-line front end
//!
//! Holds the stamp settings for one invocation and reports every failure as
//! a readable message instead of a panic.

use anyhow::{Context, Result};
use clap::Parser;
use pdfstamp_core::{
    export, render_preview, DocumentStampingService, PageSelection, PdfStamper,
};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Output goes to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pdfstamp=info,pdfstamp_core=info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Info { pdf, pages } => {
            let stamper = open(&pdf)?;
            let total = stamper.page_count();
            let selection = PageSelection::resolve(&pages, total);
            println!("Pages: {}", total);
            println!("Pages selected: {}", selection.display());
            if let Some(first) = selection.first() {
                let page_box = stamper.source().page_box(first)?;
                println!(
                    "Page {} size: {} x {} pt",
                    first + 1,
                    page_box.width(),
                    page_box.height()
                );
            }
        }
        Command::Preview { pdf, out, stamp } => {
            let settings = stamp.resolve()?;
            let stamper = open(&pdf)?;
            let preview = render_preview(&stamper, &settings).context("Preview failed")?;
            preview
                .image
                .save(&out)
                .with_context(|| format!("Failed to write {}", out.display()))?;

            println!("{} -> {}", preview.caption(), out.display());
            match preview.guide {
                Some(guide) => println!(
                    "Label `{}` at ({},{}) size {}, guide at pixel ({},{})",
                    settings.label(),
                    settings.x,
                    settings.y,
                    settings.font_size,
                    guide.x,
                    guide.y
                ),
                None => println!("Label: (none)"),
            }
        }
        Command::Locate {
            px,
            py,
            zoom,
            font_size,
        } => {
            let settings = cli::locate(px, py, zoom, font_size);
            println!("x={} y={}", settings.x, settings.y);
        }
        Command::Export {
            pdf,
            out_dir,
            stamp,
        } => {
            let settings = stamp.resolve()?;
            let stamper = open(&pdf)?;
            let artifact = export(&stamper, &settings).context("Export failed")?;

            fs::create_dir_all(&out_dir)
                .with_context(|| format!("Failed to create {}", out_dir.display()))?;
            let target = out_dir.join(&artifact.file_name);
            fs::write(&target, &artifact.data)
                .with_context(|| format!("Failed to write {}", target.display()))?;

            println!(
                "Pages selected: {}",
                pdfstamp_core::page_ranges::format_page_list(&artifact.pages)
            );
            println!("Wrote {} ({})", target.display(), artifact.mime_type);
        }
    }
    Ok(())
}

fn open(path: &Path) -> Result<PdfStamper> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let stamper = PdfStamper::load(&bytes)?;
    tracing::info!(
        path = %path.display(),
        pages = stamper.page_count(),
        "loaded PDF"
    );
    Ok(stamper)
}
