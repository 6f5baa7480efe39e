use clap::{Parser, Subcommand};
use picweave::config::{self, SiteDefaults};
use picweave::markup::{VideoOptions, generate_picture_markup, generate_video_markup};
use picweave::request::{FetchPriority, Loading, MediaRequest};
use std::path::PathBuf;

/// Shared media-identity flags for the render commands.
#[derive(clap::Args, Clone)]
struct SourceArgs {
    /// Theme-agnostic source path
    #[arg(long)]
    src: Option<String>,

    /// Light-scheme source (requires --dark-src)
    #[arg(long)]
    light_src: Option<String>,

    /// Dark-scheme source (requires --light-src)
    #[arg(long)]
    dark_src: Option<String>,

    /// Alternative text
    #[arg(long, default_value = "")]
    alt: String,

    /// Mark the media as decorative (empty alt is intentional)
    #[arg(long)]
    decorative: bool,
}

impl SourceArgs {
    /// Assemble a request, prefixing bare filenames with the configured
    /// responsive directory.
    fn to_request(&self, defaults: &SiteDefaults) -> MediaRequest {
        let qualify = |src: &Option<String>| -> String {
            match src {
                None => String::new(),
                Some(s) if s.contains('/') => s.clone(),
                Some(s) => format!("{}/{}", defaults.responsive_dir, s),
            }
        };
        MediaRequest {
            primary_src: qualify(&self.src),
            light_src: qualify(&self.light_src),
            dark_src: qualify(&self.dark_src),
            alt: self.alt.clone(),
            is_decorative: self.decorative,
            ..MediaRequest::default()
        }
    }
}

#[derive(Parser)]
#[command(name = "picweave")]
#[command(version)]
#[command(about = "Generate responsive picture/video markup")]
#[command(long_about = "\
Generate responsive picture/video markup

Source files follow the naming convention the asset pipeline publishes:

  {directory}/{stem}-{width}.{format}   responsive variants
  {directory}/{stem}.{ext}              unsuffixed primary (fallback <img>)

Widths: 768, 1024, 1366, 1920, 2560, 3840. Formats: avif, webp (images);
webm, mp4 (video). Give either --src alone or both --light-src and
--dark-src; themed variants are gated on prefers-color-scheme, light first.

Run 'picweave gen-config' for a stock site-defaults document.")]
struct Cli {
    /// Site defaults document (JSON); stock defaults when absent
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a responsive <picture> fragment
    Picture {
        #[command(flatten)]
        source: SourceArgs,

        /// Width hint for mobile viewports (e.g. 100vw)
        #[arg(long, default_value = "100vw")]
        mobile_width: String,

        /// Width hint for tablet viewports
        #[arg(long, default_value = "100vw")]
        tablet_width: String,

        /// Width hint for desktop viewports
        #[arg(long, default_value = "100vw")]
        desktop_width: String,

        /// Aspect ratio like 16/9
        #[arg(long, default_value = "")]
        aspect_ratio: String,

        /// Load eagerly instead of lazily
        #[arg(long)]
        eager: bool,

        /// Hint a high fetch priority
        #[arg(long)]
        high_priority: bool,

        /// Wrap in schema.org ImageObject microdata
        #[arg(long)]
        schema: bool,
    },
    /// Render a <video> fragment
    Video {
        #[command(flatten)]
        source: SourceArgs,

        /// Poster image path
        #[arg(long, default_value = "")]
        poster: String,

        /// Autoplay (implies muted + playsinline)
        #[arg(long)]
        autoplay: bool,

        /// Loop playback
        #[arg(long = "loop")]
        looped: bool,

        /// Hide playback controls
        #[arg(long)]
        no_controls: bool,
    },
    /// Print a stock site-defaults document with all keys
    GenConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let defaults = match &cli.config {
        Some(path) => SiteDefaults::load(path),
        None => SiteDefaults::default(),
    };

    match cli.command {
        Command::Picture {
            source,
            mobile_width,
            tablet_width,
            desktop_width,
            aspect_ratio,
            eager,
            high_priority,
            schema,
        } => {
            let request = MediaRequest {
                mobile_width,
                tablet_width,
                desktop_width,
                aspect_ratio,
                loading: if eager { Loading::Eager } else { Loading::Lazy },
                fetch_priority: if high_priority {
                    FetchPriority::High
                } else {
                    FetchPriority::Auto
                },
                include_schema: schema,
                ..source.to_request(&defaults)
            };
            println!("{}", generate_picture_markup(&request).into_string());
        }
        Command::Video {
            source,
            poster,
            autoplay,
            looped,
            no_controls,
        } => {
            let request = source.to_request(&defaults);
            let options = VideoOptions {
                poster,
                autoplay,
                looped,
                controls: !no_controls,
                ..VideoOptions::default()
            };
            println!("{}", generate_video_markup(&request, &options).into_string());
        }
        Command::GenConfig => {
            println!("{}", config::stock_config_json());
        }
    }
}
