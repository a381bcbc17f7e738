//! Commentary CLI
//!
//! Match events JSON + clip catalog + clip directory → commentary WAV

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "commentary")]
#[command(about = "Generate commentary tracks from football match events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Generate a commentary track for a time window
    Generate {
        /// Events JSON file (array of match events)
        #[arg(long)]
        events: PathBuf,

        /// Clip catalog (YAML or JSON); the sample catalog when omitted
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Directory holding the clip WAV files
        #[arg(long)]
        clips: PathBuf,

        /// Window start (match seconds)
        #[arg(long)]
        start: f64,

        /// Window end (match seconds)
        #[arg(long)]
        end: f64,

        /// Output WAV path (default: <events-stem>-<start>-<end>.wav)
        #[arg(long)]
        out: Option<PathBuf>,

        /// RNG seed, overrides the config file
        #[arg(long)]
        seed: Option<u64>,

        /// Config file (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output manifest JSON file
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Verify the written track against its checksum
        #[arg(long, default_value = "false")]
        verify: bool,
    },

    /// Load and validate a catalog, then print its summary
    CheckCatalog {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { events, catalog, clips, start, end, out, seed, config, manifest, verify } => {
            let mut run_config = commentary_cli::load_config(config.as_deref())?;
            if let Some(seed) = seed {
                run_config.seed = Some(seed);
            }
            let catalog = commentary_cli::load_catalog(catalog.as_deref())?;
            let match_events = commentary_core::event::load_events_json(&events)?;
            let store = commentary_core::WavDirectoryStore::new(&clips, run_config.audio)
                .with_pattern(&run_config.clip_pattern);
            let out = out.unwrap_or_else(|| commentary_cli::default_output_path(&events, start, end));

            println!("Generating commentary...");
            println!("   Events:  {} ({} events)", events.display(), match_events.len());
            println!("   Clips:   {}", clips.display());
            println!("   Window:  [{}, {})", start, end);
            println!("   Output:  {}", out.display());

            let seed = run_config.seed;
            let mut engine = commentary_core::CommentaryEngine::new(catalog, store, run_config)?;
            let commentary = engine.generate(&match_events, start, end)?;
            let meta = commentary_cli::write_track(&commentary, &out, seed)?;

            print_manifest(&meta);

            if verify {
                verify_track_integrity(&out, &meta.checksum)?;
            }

            if let Some(manifest_path) = manifest {
                commentary_cli::save_manifest(&manifest_path, &meta)?;
                println!("\nManifest saved to: {}", manifest_path.display());
            }
        }

        Commands::CheckCatalog { catalog } => {
            let catalog = commentary_cli::load_catalog(catalog.as_deref())?;
            let summary = catalog.summary();
            println!("Catalog OK");
            println!("   Rules:        {}", summary.rules);
            println!("   Distinct ids: {}", summary.distinct_ids);
            println!("   Disabled:     {}", summary.disabled);
            println!("   Random:       {}", summary.random);
            for (event_type, count) in &summary.by_event_type {
                println!("   {:<20} {}", event_type, count);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn print_manifest(meta: &commentary_cli::RunManifest) {
    println!("\nTrack written");
    println!("   Duration: {:.2}s ({} Hz, {} ch)", meta.duration_secs, meta.sample_rate, meta.channels);
    println!("   Clips:    {} placed, {} dropped", meta.placed, meta.dropped);
    println!("   Checksum: {}", meta.checksum);
    println!("   Created:  {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_track_integrity(track: &std::path::Path, checksum: &str) -> Result<()> {
    println!("\nVerifying track...");
    if commentary_cli::verify_track(track, checksum)? {
        println!("Track verification passed");
        Ok(())
    } else {
        anyhow::bail!("Track verification failed - checksum mismatch!")
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("commentary CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
