use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::{Path, PathBuf};

use imagepress::config::Config;
use imagepress::context::ServiceContext;
use imagepress::operations::{
    self, ConvertRequest, CropRequest, ImageInput, InfoRequest, OperationOutput, ResizeRequest,
    WatermarkRequest,
};

/// Imagepress - image conversion, inspection and diagonal text watermarking
#[derive(Parser, Debug)]
#[command(name = "imagepress")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (defaults are used when absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Re-encode an image in another format
    Convert {
        #[command(flatten)]
        io: ImageArgs,
        #[command(flatten)]
        encoding: EncodingArgs,
    },

    /// Report the image's size against every output format
    Info {
        /// Input image
        input: PathBuf,
        /// Quality (1-100) used for the size comparison
        #[arg(short, long)]
        quality: Option<u32>,
    },

    /// Print format, mode, size, container info and EXIF fields
    Metadata {
        /// Input image
        input: PathBuf,
    },

    /// Tile diagonal text across the image
    Watermark {
        #[command(flatten)]
        io: ImageArgs,
        #[command(flatten)]
        encoding: EncodingArgs,
        /// Watermark text
        #[arg(short, long)]
        text: String,
        /// Opacity from 0.0 to 1.0
        #[arg(long)]
        opacity: Option<f32>,
        /// Tile density from 1 (sparse) to 50 (dense)
        #[arg(long)]
        density: Option<u32>,
        /// Font size in pixels (derived from the image size when absent)
        #[arg(long)]
        font_size: Option<u32>,
    },

    /// Resize by width, height or percentage
    Resize {
        #[command(flatten)]
        io: ImageArgs,
        #[command(flatten)]
        encoding: EncodingArgs,
        #[arg(short = 'W', long)]
        width: Option<u32>,
        #[arg(short = 'H', long)]
        height: Option<u32>,
        /// Scale in percent; wins over width and height
        #[arg(short, long)]
        percentage: Option<f64>,
        /// Stretch to the exact width and height
        #[arg(long)]
        ignore_aspect_ratio: bool,
    },

    /// Crop to the box left..right, top..bottom
    Crop {
        #[command(flatten)]
        io: ImageArgs,
        #[command(flatten)]
        encoding: EncodingArgs,
        #[arg(long, allow_negative_numbers = true)]
        left: i64,
        #[arg(long, allow_negative_numbers = true)]
        top: i64,
        #[arg(long)]
        right: i64,
        #[arg(long)]
        bottom: i64,
    },

    /// Print the service status
    Status,
}

#[derive(ClapArgs, Debug)]
struct ImageArgs {
    /// Input image
    input: PathBuf,
    /// Output file (defaults to the suggested name in the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
struct EncodingArgs {
    /// Output format: avif, webp, png, jpg or jpeg
    #[arg(short, long)]
    format: String,
    /// Quality (1-100)
    #[arg(short, long)]
    quality: Option<u32>,
}

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    // Initialize logging subsystem
    imagepress::logging::init_subscriber(&config.logging)
        .map_err(anyhow::Error::msg)
        .context("Failed to initialize logging subsystem")?;

    tracing::info!(
        config_file = ?args.config,
        service = %config.service.name,
        "Configuration loaded successfully"
    );

    let ctx = ServiceContext::new(config);
    run(&ctx, args.command)
}

fn run(ctx: &ServiceContext, command: Command) -> Result<()> {
    match command {
        Command::Convert { io, encoding } => {
            let request = ConvertRequest {
                format: encoding.format,
                quality: encoding.quality,
            };
            with_image(&io, |input| operations::convert(ctx, input, &request))
        }
        Command::Info { input, quality } => {
            let (name, data) = read_input(&input)?;
            let report = operations::info(
                ctx,
                ImageInput::new(&name, &data),
                &InfoRequest { quality },
            )?;
            println!("{}", operations::to_json(&report)?);
            Ok(())
        }
        Command::Metadata { input } => {
            let (name, data) = read_input(&input)?;
            let report = operations::metadata(ctx, ImageInput::new(&name, &data))?;
            println!("{}", operations::to_json(&report)?);
            Ok(())
        }
        Command::Watermark {
            io,
            encoding,
            text,
            opacity,
            density,
            font_size,
        } => {
            let request = WatermarkRequest {
                text,
                opacity,
                density,
                font_size,
                format: encoding.format,
                quality: encoding.quality,
            };
            with_image(&io, |input| operations::watermark(ctx, input, &request))
        }
        Command::Resize {
            io,
            encoding,
            width,
            height,
            percentage,
            ignore_aspect_ratio,
        } => {
            let request = ResizeRequest {
                width,
                height,
                percentage,
                maintain_aspect_ratio: !ignore_aspect_ratio,
                format: encoding.format,
                quality: encoding.quality,
            };
            with_image(&io, |input| operations::resize(ctx, input, &request))
        }
        Command::Crop {
            io,
            encoding,
            left,
            top,
            right,
            bottom,
        } => {
            let request = CropRequest {
                left,
                top,
                right,
                bottom,
                format: encoding.format,
                quality: encoding.quality,
            };
            with_image(&io, |input| operations::crop(ctx, input, &request))
        }
        Command::Status => {
            println!("{}", operations::to_json(&operations::status(ctx))?);
            Ok(())
        }
    }
}

/// Read `path`, returning its file name and contents.
fn read_input(path: &Path) -> Result<(String, Vec<u8>)> {
    let data =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, data))
}

/// Run an image-producing operation and write its output.
fn with_image<F>(io: &ImageArgs, op: F) -> Result<()>
where
    F: FnOnce(ImageInput<'_>) -> Result<OperationOutput, imagepress::ServiceError>,
{
    let (name, data) = read_input(&io.input)?;
    let output = op(ImageInput::new(&name, &data))?;

    let path = io
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&output.filename));
    std::fs::write(&path, &output.data)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(
        output = %path.display(),
        content_type = output.content_type,
        bytes = output.data.len(),
        width = output.width,
        height = output.height,
        "Wrote output image"
    );
    Ok(())
}
