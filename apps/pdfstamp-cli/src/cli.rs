//! Command-line arguments

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use pdfstamp_core::{ExportMode, StampFont, StampSettings};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pdfstamp")]
#[command(version, about = "Stamp a text label onto selected PDF pages")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show page count and which pages a range selects
    Info {
        pdf: PathBuf,

        /// Page range, e.g. "1-3,5" (empty for all pages)
        #[arg(long, default_value = "")]
        pages: String,
    },

    /// Render the first selected page with a guide mark to a PNG
    Preview {
        pdf: PathBuf,

        #[arg(short, long, default_value = "preview.png")]
        out: PathBuf,

        #[command(flatten)]
        stamp: StampArgs,
    },

    /// Convert a click on the preview image into stamp coordinates
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        px: f64,

        #[arg(long, allow_hyphen_values = true)]
        py: f64,

        #[arg(long, default_value_t = pdfstamp_core::coords::DEFAULT_ZOOM)]
        zoom: f64,

        #[arg(long, default_value_t = pdfstamp_core::stamp::DEFAULT_FONT_SIZE)]
        font_size: u32,
    },

    /// Write the stamped PDF (group) or zip of per-page PDFs
    Export {
        pdf: PathBuf,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        #[command(flatten)]
        stamp: StampArgs,
    },
}

/// Stamp settings; flags override values from `--settings`
#[derive(Args, Debug, Default)]
pub struct StampArgs {
    /// JSON settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    #[arg(long)]
    pub event_id: Option<String>,

    #[arg(long)]
    pub banner_id: Option<String>,

    /// Page range, e.g. "1-3,5"
    #[arg(long)]
    pub pages: Option<String>,

    #[arg(short = 'x', long)]
    pub x: Option<u32>,

    #[arg(short = 'y', long)]
    pub y: Option<u32>,

    #[arg(long)]
    pub font_size: Option<u32>,

    /// sans, serif or mono
    #[arg(long)]
    pub font: Option<StampFont>,

    /// Hex color such as #000000
    #[arg(long)]
    pub color: Option<String>,

    /// group or per-page
    #[arg(long)]
    pub mode: Option<ExportMode>,

    #[arg(long)]
    pub zoom: Option<f64>,
}

impl StampArgs {
    /// Merge the settings file (if any) with command-line overrides
    pub fn resolve(&self) -> anyhow::Result<StampSettings> {
        let mut settings = match &self.settings {
            Some(path) => StampSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => StampSettings::default(),
        };

        if let Some(event_id) = &self.event_id {
            settings.event_id = event_id.clone();
        }
        if let Some(banner_id) = &self.banner_id {
            settings.banner_id = banner_id.clone();
        }
        if let Some(pages) = &self.pages {
            settings.pages = pages.clone();
        }
        if let Some(x) = self.x {
            settings.x = x;
        }
        if let Some(y) = self.y {
            settings.y = y;
        }
        if let Some(font_size) = self.font_size {
            settings.font_size = font_size;
        }
        if let Some(font) = self.font {
            settings.font = font;
        }
        if let Some(color) = &self.color {
            settings.color = color.clone();
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(zoom) = self.zoom {
            settings.zoom = zoom;
        }

        settings.validate()?;
        Ok(settings)
    }
}

/// Default settings with the anchor moved to a preview click at `(px, py)`
pub fn locate(px: f64, py: f64, zoom: f64, font_size: u32) -> StampSettings {
    let mut settings = StampSettings {
        zoom,
        font_size,
        ..Default::default()
    };
    settings.place_at_pixel(px, py);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_export_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "pdfstamp",
            "export",
            "in.pdf",
            "--event-id",
            "EV9",
            "--pages",
            "1-3,5",
            "-x",
            "200",
            "--font",
            "serif",
            "--mode",
            "per-page",
        ])
        .unwrap();

        let Command::Export { pdf, stamp, .. } = cli.command else {
            panic!("expected export");
        };
        assert_eq!(pdf, PathBuf::from("in.pdf"));

        let settings = stamp.resolve().unwrap();
        assert_eq!(settings.label(), "EV9_1000");
        assert_eq!(settings.pages, "1-3,5");
        assert_eq!(settings.x, 200);
        assert_eq!(settings.y, 72);
        assert_eq!(settings.font, StampFont::Serif);
        assert_eq!(settings.mode, ExportMode::PerPage);
    }

    #[test]
    fn test_unknown_font_is_a_usage_error() {
        let result = Cli::try_parse_from(["pdfstamp", "preview", "in.pdf", "--font", "comic"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_range_font_size_fails_resolve() {
        let args = StampArgs {
            font_size: Some(200),
            ..Default::default()
        };
        assert!(args.resolve().is_err());
    }

    #[test]
    fn test_locate_accepts_negative_pixels() {
        let cli =
            Cli::try_parse_from(["pdfstamp", "locate", "--px", "-5", "--py", "10"]).unwrap();
        let Command::Locate { px, zoom, .. } = cli.command else {
            panic!("expected locate");
        };
        assert_eq!(px, -5.0);
        assert_eq!(zoom, 1.25);
    }

    #[test]
    fn test_locate_maps_click_to_anchor() {
        let settings = locate(131.0, 105.0, 1.25, 12);
        assert_eq!((settings.x, settings.y), (105, 72));

        let settings = locate(1600.0, 1792.0, 16.0, 12);
        assert_eq!((settings.x, settings.y), (100, 100));
    }

    #[test]
    fn test_locate_clamps_to_settings_bounds() {
        let settings = locate(1.0e7, -40.0, 1.0, 12);
        assert_eq!((settings.x, settings.y), (5000, 0));
    }
}
