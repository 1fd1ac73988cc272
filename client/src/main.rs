//! IronTrack command line
//!
//! Signs in to the demo account directory and prints derived metrics, the
//! prompt summary, or a validated AI report for the account's profile.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use irontrack_client::auth::{Account, AccountDirectory};
use irontrack_client::config::AppConfig;
use irontrack_client::{Page, ReportClient, Session};
use irontrack_shared::guidance::{goal_alignment, safety_flags};
use irontrack_shared::health_metrics::describe_weight_difference;
use irontrack_shared::prompt::summarize_profile;
use irontrack_shared::{DerivedMetrics, Profile};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "irontrack")]
#[command(author, version, about = "Fitness metrics and AI reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Credentials {
    /// Account email
    #[arg(short, long, env = "IRONTRACK_EMAIL")]
    email: String,

    /// Account password
    #[arg(short, long, env = "IRONTRACK_PASSWORD")]
    password: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Show derived metrics and safety flags
    Metrics {
        #[command(flatten)]
        credentials: Credentials,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate a validated AI report
    Report {
        #[command(flatten)]
        credentials: Credentials,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the profile summary sent to the AI
    Summary {
        #[command(flatten)]
        credentials: Credentials,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        "Starting IronTrack"
    );

    let directory = if config.auth.seed_demo_accounts {
        AccountDirectory::with_demo_accounts()?
    } else {
        AccountDirectory::empty()
    };

    match cli.command {
        Commands::Metrics { credentials, json } => {
            let (_, profile) = sign_in(&directory, &credentials).await?;
            print_metrics(&profile, json)?;
        }
        Commands::Report { credentials, json } => {
            let (account, _) = sign_in(&directory, &credentials).await?;
            run_report(&config, account, json).await?;
        }
        Commands::Summary { credentials } => {
            let (_, profile) = sign_in(&directory, &credentials).await?;
            println!("{}", summarize_profile(&profile));
        }
    }

    Ok(())
}

async fn sign_in(directory: &AccountDirectory, credentials: &Credentials) -> Result<(Account, Profile)> {
    let account = directory
        .sign_in(&credentials.email, &credentials.password)
        .await?;
    let profile = account
        .profile
        .clone()
        .context("This account has not completed onboarding")?;
    Ok((account, profile))
}

fn print_metrics(profile: &Profile, json: bool) -> Result<()> {
    let metrics = DerivedMetrics::from_profile(profile);
    let alignment = goal_alignment(profile, &metrics);
    let flags = safety_flags(profile, &metrics);

    if json {
        let body = serde_json::json!({
            "metrics": metrics,
            "goalAlignment": alignment,
            "safetyFlags": flags,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let (protein_pct, carbs_pct, fats_pct) = metrics.macros.percentages();
    println!("BMI            {:.1} ({})", metrics.bmi, metrics.bmi_category.label());
    println!("BMR            {:.0} kcal", metrics.bmr);
    println!("TDEE           {:.0} kcal", metrics.tdee);
    println!(
        "Ideal weight   {:.1}-{:.1} kg ({})",
        metrics.ideal_weight.min,
        metrics.ideal_weight.max,
        describe_weight_difference(metrics.weight_difference_kg)
    );
    println!(
        "Calories       {} ({:+.0} kcal)",
        metrics.calories.status, metrics.calories.gap
    );
    println!(
        "Macros         P {:.1}% / C {:.1}% / F {:.1}%",
        protein_pct, carbs_pct, fats_pct
    );
    println!(
        "Goal           {} (target {:.0}-{:.0} kcal, {:.0}-{:.0} g protein)",
        if alignment.on_track() { "on track" } else { "needs adjustment" },
        alignment.calorie_target.min,
        alignment.calorie_target.max,
        alignment.protein_target_g.min,
        alignment.protein_target_g.max
    );
    for flag in &flags {
        println!("! {}", flag.message());
    }
    Ok(())
}

async fn run_report(config: &AppConfig, account: Account, json: bool) -> Result<()> {
    let client = ReportClient::new(&config.ai).map_err(|e| {
        error!(error = %e, "Report client unavailable");
        anyhow::anyhow!(e.user_message())
    })?;
    let session = Session::new(Arc::new(client));
    session.login(account)?;
    session.navigate(Page::Report)?;

    let report = session.generate().await.map_err(|e| {
        error!(error = %e, "Report generation failed");
        anyhow::anyhow!(e.user_message())
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(report.as_ref())?);
        return Ok(());
    }

    println!("Score {:.0}/100 | {} ({:+.0} kcal)", report.score, report.calorie_status, report.calorie_gap);
    println!();
    println!("{}", report.goal_summary);
    println!();
    println!("Working:    {}", report.what_working);
    println!("Misaligned: {}", report.what_misaligned);
    println!();
    for (i, remark) in report.remarks.iter().enumerate() {
        println!("{}. {}", i + 1, remark);
    }
    println!();
    for (label, value) in report.action_plan.entries() {
        println!("{:<18} {}", label, value);
    }
    println!();
    println!("Timeline: {}", report.timeline);
    println!("{}", report.expert_remark);
    Ok(())
}

/// Initialize tracing/logging on stderr so stdout stays machine-readable
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "irontrack_client=info,irontrack=info".into()
        } else {
            "irontrack_client=debug,irontrack=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
