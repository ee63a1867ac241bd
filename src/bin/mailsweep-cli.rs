use std::io::{self, BufRead};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};

use mailsweep_lib::{CleanOptions, DomainLists, SuppressionList, Table, clean_list, config};

#[derive(Parser)]
#[command(name = "mailsweep-cli")]
#[command(about = "Nettoie une liste d'adresses e-mail: normalisation, dédoublonnage, validation")]
struct Cli {
    /// lit des adresses depuis stdin (une par ligne)
    #[arg(long)]
    stdin: bool,

    /// fichier CSV d'entrée avec ligne d'en-tête (feature `with-csv`)
    #[cfg(feature = "with-csv")]
    #[arg(long)]
    input: Option<PathBuf>,

    /// nom de la colonne e-mail du CSV
    #[arg(long, default_value = "email")]
    column: String,

    /// désactive le safe mode (rejette les lignes limites au lieu de corriger/marquer)
    #[arg(long)]
    no_safe_mode: bool,

    /// distance d'édition maximale pour une suggestion de domaine
    #[arg(long, default_value_t = config::TYPO_DISTANCE_THRESHOLD)]
    typo_threshold: usize,

    /// remplace la liste de domaines jetables embarquée
    #[arg(long)]
    disposable_list: Option<PathBuf>,

    /// remplace la liste de domaines de confiance embarquée
    #[arg(long)]
    common_list: Option<PathBuf>,

    /// CSV de suppression: ces adresses sont exclues avant validation
    #[cfg(feature = "with-csv")]
    #[arg(long)]
    suppression: Option<PathBuf>,

    /// colonne e-mail du CSV de suppression
    #[cfg(feature = "with-csv")]
    #[arg(long, default_value = "email")]
    suppression_column: String,

    /// vérifie les enregistrements MX des domaines (feature `with-mx`)
    #[cfg(feature = "with-mx")]
    #[arg(long)]
    mx: bool,

    /// timeout DNS par domaine, en secondes
    #[cfg(feature = "with-mx")]
    #[arg(long, default_value_t = config::DNS_TIMEOUT.as_secs_f64())]
    mx_timeout: f64,

    /// budget total de l'étape MX, en secondes
    #[cfg(feature = "with-mx")]
    #[arg(long, default_value_t = config::MX_DEADLINE.as_secs_f64())]
    mx_deadline: f64,

    /// nombre maximal de lookups MX concurrents
    #[cfg(feature = "with-mx")]
    #[arg(long, default_value_t = config::MAX_MX_WORKERS)]
    mx_workers: usize,

    /// format: human|json|csv
    #[arg(long, default_value = "human")]
    format: String,

    /// écrit cleaned/rejected/suppressed/insights dans ce répertoire
    #[cfg(feature = "with-csv")]
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_lists(cli: &Cli) -> Result<DomainLists> {
    match (&cli.disposable_list, &cli.common_list) {
        (Some(disposable), Some(common)) => {
            DomainLists::from_files(disposable, common).context("loading domain lists")
        }
        (None, None) => Ok(DomainLists::bundled()),
        _ => bail!("--disposable-list and --common-list must be given together"),
    }
}

fn read_input(cli: &Cli) -> Result<Option<Table>> {
    if cli.stdin {
        let mut values = Vec::new();
        for line in io::stdin().lock().lines() {
            values.push(line.context("read stdin")?);
        }
        return Ok(Some(Table::from_column(cli.column.clone(), values)));
    }

    #[cfg(feature = "with-csv")]
    if let Some(path) = &cli.input {
        let table = mailsweep_lib::io::read_table_from_path(path)
            .with_context(|| format!("reading {}", path.display()))?;
        return Ok(Some(table));
    }

    Ok(None)
}

fn build_options(cli: &Cli) -> CleanOptions {
    let options = CleanOptions {
        safe_mode: !cli.no_safe_mode,
        typo_distance_threshold: cli.typo_threshold,
        ..CleanOptions::default()
    };
    #[cfg(feature = "with-mx")]
    let options = CleanOptions {
        enable_mx_check: cli.mx,
        mx_timeout: std::time::Duration::from_secs_f64(cli.mx_timeout),
        mx_deadline: std::time::Duration::from_secs_f64(cli.mx_deadline),
        max_concurrent_mx_lookups: cli.mx_workers,
        ..options
    };
    options
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let Some(table) = read_input(&cli)? else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    if table.is_empty() {
        eprintln!("no data: the input has a header but no rows");
        return Ok(());
    }

    let lists = load_lists(&cli)?;

    #[cfg(feature = "with-csv")]
    let suppression = match &cli.suppression {
        Some(path) => {
            let supp_table = mailsweep_lib::io::read_table_from_path(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Some(SuppressionList::from_table(
                &supp_table,
                &cli.suppression_column,
            )?)
        }
        None => None,
    };
    #[cfg(not(feature = "with-csv"))]
    let suppression: Option<SuppressionList> = None;

    let options = build_options(&cli);

    let started = Instant::now();
    let mut result = clean_list(&table, &cli.column, &lists, suppression.as_ref(), &options)?;
    result.summary = result
        .summary
        .clone()
        .with_duration(started.elapsed().as_secs_f64());

    match cli.format.as_str() {
        "human" => {
            println!("{}", result.summary);
            let stats = result.reasons_histogram();
            if !stats.is_empty() {
                println!("excluded rows by reason:");
                for stat in &stats {
                    println!("  {:<18} {:>6}  {:>6}%", stat.reason, stat.count, stat.percent);
                }
            }
        }
        "json" => {
            #[cfg(feature = "with-serde")]
            {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            #[cfg(not(feature = "with-serde"))]
            {
                eprintln!("format=json nécessite la feature 'with-serde'");
                std::process::exit(1);
            }
        }
        "csv" => {
            #[cfg(feature = "with-csv")]
            {
                let bytes = mailsweep_lib::io::rows_to_csv(&table, &result.cleaned)?;
                io::Write::write_all(&mut io::stdout(), &bytes)?;
            }
            #[cfg(not(feature = "with-csv"))]
            {
                eprintln!("format=csv nécessite la feature 'with-csv'");
                std::process::exit(1);
            }
        }
        other => {
            eprintln!("unknown --format '{}', use: human|json|csv", other);
            std::process::exit(1);
        }
    }

    #[cfg(feature = "with-csv")]
    if let Some(dir) = &cli.out_dir {
        use mailsweep_lib::io::{histogram_to_csv, rows_to_csv, write_atomically};

        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
        write_atomically(
            &dir.join("cleaned_emails.csv"),
            &rows_to_csv(&table, &result.cleaned)?,
        )?;
        write_atomically(
            &dir.join("rejected_emails.csv"),
            &rows_to_csv(&table, &result.rejected)?,
        )?;
        if !result.suppressed.is_empty() {
            write_atomically(
                &dir.join("suppressed_emails.csv"),
                &rows_to_csv(&table, &result.suppressed)?,
            )?;
        }
        let stats = result.reasons_histogram();
        if !stats.is_empty() {
            write_atomically(
                &dir.join("rejection_insights.csv"),
                &histogram_to_csv(&stats)?,
            )?;
        }
        eprintln!("results written to {}", dir.display());
    }

    // codes de sortie : 0 OK, 2 lignes rejetées, 1 fatal
    if !result.rejected.is_empty() {
        std::process::exit(2);
    }
    Ok(())
}
