use clap::Parser;
use log::{error, info, warn};
use tracing_subscriber;

use wcs_overlay::astro_util::{format_dec_dms, format_ra_hms};
use wcs_overlay::cursor::{cursor_to_info, PixelSamples, ViewState};
use wcs_overlay::grid::{compute_grid, GridSettings};
use wcs_overlay::grid_labels::{Edge, GridLabel};
use wcs_overlay::scale_bar::compute_scale_bar;
use wcs_overlay::wcs::WcsParams;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about=None)]
struct Args {
    /// Reference pixel, "x,y" in FITS pixels of the native image.
    #[arg(long, value_parser = parse_pair)]
    crpix: [f64; 2],

    /// RA and Dec at the reference pixel, "ra,dec" in degrees.
    #[arg(long, value_parser = parse_pair)]
    crval: [f64; 2],

    /// CD matrix, "cd1_1,cd1_2,cd2_1,cd2_2" in degrees per pixel. Takes
    /// precedence over --cdelt.
    #[arg(long, value_parser = parse_quad)]
    cd: Option<[f64; 4]>,

    /// Per-axis pixel scale, "cdelt1,cdelt2" in degrees per pixel. Used when
    /// --cd is absent.
    #[arg(long, value_parser = parse_pair, default_value = "0,0")]
    cdelt: [f64; 2],

    #[arg(long, default_value = "RA---TAN")]
    ctype1: String,

    #[arg(long, default_value = "DEC--TAN")]
    ctype2: String,

    /// Preview width, pixels.
    #[arg(long)]
    width: f64,

    /// Preview height, pixels.
    #[arg(long)]
    height: f64,

    /// Ratio of native image resolution to preview resolution.
    #[arg(long, default_value = "1.0")]
    scale_factor: f64,

    /// Viewer zoom, screen pixels per preview pixel.
    #[arg(long, default_value = "1.0")]
    zoom: f64,

    /// Viewer pan, "x,y" screen pixels.
    #[arg(long, value_parser = parse_pair, default_value = "0,0")]
    pan: [f64; 2],

    /// Screen position to report a cursor readout for, "x,y".
    #[arg(long, value_parser = parse_pair)]
    cursor: Option<[f64; 2]>,

    /// Place declination labels on the right edge instead of the left.
    #[arg(long, default_value = "false")]
    dec_labels_right: bool,
}

fn parse_values<const N: usize>(arg: &str) -> Result<[f64; N], String> {
    let values = arg.split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| format!("{}: {}", arg, e))?;
    values.try_into().map_err(|v: Vec<f64>| {
        format!("expected {} comma-separated values, got {}", N, v.len())
    })
}

fn parse_pair(arg: &str) -> Result<[f64; 2], String> {
    parse_values::<2>(arg)
}

fn parse_quad(arg: &str) -> Result<[f64; 4], String> {
    parse_values::<4>(arg)
}

fn log_labels(kind: &str, labels: &[GridLabel]) {
    for label in labels {
        info!("{} label {} at ({:.1}, {:.1}) {:?} edge",
              kind, label.formatted, label.anchor.x, label.anchor.y,
              label.edge);
    }
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let cd = match args.cd {
        Some(cd) => [[cd[0], cd[1]], [cd[2], cd[3]]],
        None => [[0.0, 0.0], [0.0, 0.0]],
    };
    let wcs = match WcsParams::new(args.crpix, args.crval, cd, args.cdelt,
                                   [Some(args.ctype1), Some(args.ctype2)]) {
        Ok(wcs) => wcs,
        Err(e) => {
            error!("Invalid WCS: {}", e.message);
            std::process::exit(1);
        }
    };
    info!("Using WCS {:?}, {:.3} arcsec/pixel", wcs, wcs.pixel_scale() * 3600.0);

    let mut settings = GridSettings::default();
    if args.dec_labels_right {
        settings.dec_label_edge = Edge::Right;
    }
    match compute_grid(&wcs, args.width, args.height, args.scale_factor,
                       &settings) {
        Some(grid) => {
            info!("Grid spacing {:.6} deg Dec, {:.6} deg RA: {} RA lines, \
                   {} Dec lines",
                  grid.spacing_deg, grid.ra_spacing_deg,
                  grid.ra_lines.len(), grid.dec_lines.len());
            log_labels("RA", &grid.ra_labels);
            log_labels("Dec", &grid.dec_labels);
        }
        None => warn!("No coordinate grid for this image"),
    }

    match compute_scale_bar(&wcs, args.scale_factor, args.zoom) {
        Some(bar) => info!("Scale bar {} is {:.1} screen pixels",
                           bar.label, bar.width_px),
        None => warn!("No scale bar for this image"),
    }

    if let Some([x, y]) = args.cursor {
        let view = ViewState {
            preview_width: args.width,
            preview_height: args.height,
            scale: args.zoom,
            offset_x: args.pan[0],
            offset_y: args.pan[1],
        };
        // No pixel data is loaded, so values read as NaN.
        match cursor_to_info(x, y, &view, args.scale_factor,
                             &PixelSamples::default(), Some(&wcs)) {
            Some(info) => info!("Cursor at preview ({}, {}) FITS ({}, {}) \
                                 value {} RA {:?} Dec {:?}",
                                info.pixel_x, info.pixel_y,
                                info.fits_x, info.fits_y, info.value,
                                info.ra.map(format_ra_hms),
                                info.dec.map(format_dec_dms)),
            None => info!("Cursor ({}, {}) is off the image", x, y),
        }
    }
}
