use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use housing_ads::{Ad, AdForm, AdPanelHost, Config, HttpAdsBackend, ImageFile};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "housing-ads", about = "Create or update rental listing ads")]
struct Cli {
    /// Id of the user who owns the listing
    #[arg(long)]
    owner: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a new ad
    Create(Fields),
    /// Edit an existing ad, starting from its JSON record
    Update {
        /// Path to the ad as returned by the backend
        #[arg(long)]
        ad: PathBuf,
        #[command(flatten)]
        fields: Fields,
    },
}

#[derive(Args)]
struct Fields {
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    price: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    move_in: Option<String>,
    /// "available" or "unavailable"
    #[arg(long)]
    status: Option<String>,
    /// Image file to attach (repeatable, at most 5)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
    /// Index of an existing image to drop (repeatable)
    #[arg(long = "remove-image")]
    remove_images: Vec<usize>,
}

/// Reports panel callbacks on the console
struct ConsoleHost;

impl AdPanelHost for ConsoleHost {
    fn toggle_refresh_ads(&self) {
        info!("🔄 Ad list needs a refresh");
    }

    fn set_add_unit(&self, open: bool) {
        info!("Panel {}", if open { "opened" } else { "closed" });
    }

    fn alert(&self, message: &str) {
        warn!("⚠️  {}", message);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    info!("🏠 Housing Ads - backend at {}", config.backend_url);

    let backend = Arc::new(HttpAdsBackend::new(config)?);

    let (ad, fields) = match cli.command {
        Command::Create(fields) => (None, fields),
        Command::Update { ad, fields } => {
            let raw = tokio::fs::read_to_string(&ad)
                .await
                .with_context(|| format!("Failed to read {}", ad.display()))?;
            let record: Ad = serde_json::from_str(&raw).context("Ad file is not a valid record")?;
            (Some(record), fields)
        }
    };

    let form = AdForm::new(backend, Arc::new(ConsoleHost), cli.owner, ad);
    apply_fields(&form, fields).await?;

    let view = form.view();
    info!(
        "{} \"{}\" ({} images, {})",
        view.submit_label,
        view.title,
        view.image_count,
        view.status.as_str()
    );

    let saved = form.submit().await?;
    match saved {
        Some(ad) => println!("{}", serde_json::to_string_pretty(&ad)?),
        None => info!("✅ Saved (backend returned no record)"),
    }

    form.dismiss();
    Ok(())
}

async fn apply_fields(form: &AdForm, fields: Fields) -> Result<()> {
    if let Some(title) = fields.title {
        form.set_title(title);
    }
    if let Some(description) = fields.description {
        form.set_description(description);
    }
    if let Some(price) = fields.price {
        form.set_price(&price)?;
    }
    if let Some(date) = fields.move_in {
        form.set_move_in_date(&date)?;
    }
    if let Some(status) = fields.status {
        form.set_status(&status);
    }

    // Highest index first so earlier removals don't shift later ones
    let mut removals = fields.remove_images;
    removals.sort_unstable_by(|a, b| b.cmp(a));
    removals.dedup();
    for index in removals {
        if !form.remove_image(index) {
            warn!("No image at index {}", index);
        }
    }

    if !fields.images.is_empty() {
        let files = fields.images.into_iter().map(ImageFile::from_path).collect();
        let summary = form.upload_images(files)?.wait().await;
        info!("📷 Attached {} images", summary.appended);
        for name in summary.failed {
            warn!("Skipped unreadable image {}", name);
        }
    }

    Ok(())
}
