// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{info, LevelFilter};

use latent_stego::raster::{fit_within, fitted_dimensions};
use latent_stego::{decode_image, encode_image, CapacityInfo, CipherScheme, StegoConfig};

#[derive(Parser)]
#[command(name = "latent-stego")]
#[command(version, about = "Hide a compressed secret image in the LSBs of a cover image", long_about = None)]
struct Cli {
    /// TOML configuration file (cipher salt/scheme, cover size, codec geometry)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a secret image into a cover image
    #[command(alias = "e")]
    Encode {
        /// Cover image
        #[arg(long)]
        cover: PathBuf,

        /// Secret image to hide
        #[arg(long)]
        secret: PathBuf,

        /// Output stego image (PNG)
        #[arg(long, short)]
        output: PathBuf,

        /// Encryption password (empty or absent disables encryption)
        #[arg(long)]
        password: Option<String>,
    },

    /// Recover the secret image from a stego image
    #[command(alias = "d")]
    Decode {
        /// Stego image
        #[arg(long)]
        stego: PathBuf,

        /// Output file for the recovered secret
        #[arg(long, short)]
        output: PathBuf,

        /// Password used at encode time
        #[arg(long)]
        password: Option<String>,
    },

    /// Show how much payload an image can carry
    #[command(alias = "c")]
    Capacity {
        /// Image to inspect
        image: PathBuf,
    },
}

fn init_logger() {
    Builder::new()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<StegoConfig> {
    match path {
        Some(p) => StegoConfig::from_file(p).with_context(|| format!("loading {}", p.display())),
        None => Ok(StegoConfig::default()),
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Encode { cover, secret, output, password } => {
            if !is_png(&output) {
                bail!("stego output must be a .png file; lossy formats destroy the payload");
            }
            let params = config.cipher_params()?;
            let codec = config.latent_codec()?;

            let cover_img = image::open(&cover)
                .with_context(|| format!("opening cover {}", cover.display()))?
                .to_rgb8();
            let cover_img = fit_within(&cover_img, config.cover.max_side);
            let secret_img = image::open(&secret)
                .with_context(|| format!("opening secret {}", secret.display()))?
                .to_rgb8();

            let stego = encode_image(&codec, &cover_img, &secret_img, password.as_deref(), &params)?;
            stego.save(&output).with_context(|| format!("writing {}", output.display()))?;
            info!(
                "wrote {} ({}x{}, {})",
                output.display(),
                stego.width(),
                stego.height(),
                if password.as_deref().is_some_and(|p| !p.is_empty()) { "encrypted" } else { "plain" }
            );
        }

        Commands::Decode { stego, output, password } => {
            let params = config.cipher_params()?;
            let codec = config.latent_codec()?;

            let stego_img = image::open(&stego)
                .with_context(|| format!("opening stego image {}", stego.display()))?
                .to_rgb8();
            let recovered = decode_image(&codec, &stego_img, password.as_deref(), &params)?;
            recovered.save(&output).with_context(|| format!("writing {}", output.display()))?;
            info!("recovered {}x{} secret to {}", recovered.width(), recovered.height(), output.display());
        }

        Commands::Capacity { image: path } => {
            let (w, h) = image::image_dimensions(&path).with_context(|| format!("reading {}", path.display()))?;
            let (fit_w, fit_h) = fitted_dimensions(w, h, config.cover.max_side);
            if (fit_w, fit_h) != (w, h) {
                println!(
                    "Cover {w}x{h} is resized to {fit_w}x{fit_h} before embedding (max_side {})",
                    config.cover.max_side
                );
            }
            let info = CapacityInfo::from_dimensions(fit_w, fit_h);
            print!("{info}");

            let codec = config.latent_codec()?;
            let (lh, lw, lc) = codec.latent_dims();
            let needed = lh * lw * lc;
            println!("Codec latent {lh}x{lw}x{lc} ({needed} f32 elements):");
            for scheme in [None, Some(config.cipher.scheme)] {
                let label = scheme.map_or("plain", CipherScheme::as_str);
                let max = info.max_latent_elements(scheme);
                let verdict = if needed <= max { "fits" } else { "does not fit" };
                println!("  {label:<15} {verdict} (max {max})");
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
