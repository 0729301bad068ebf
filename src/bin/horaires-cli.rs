#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use horaires::{
    io,
    model::{BusinessHours, EmployeeId, OpeningHours, OrganizationId, ShiftId, Workspace},
    notification::{RejectionReporter, StderrReporter, TextNotice},
    scheduler::{CancelToken, CoverageOptions, Outcome, Rejection, Scheduler, SessionOptions},
    storage::JsonBackend,
    window::{ScheduleRange, Selection},
    Verdict,
};
use std::io::{BufRead, Write};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification de shifts (disponibilités, congés, couverture)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du workspace
    #[arg(long, global = true, default_value = "workspace.json")]
    workspace: String,

    /// Organisation attendue (par défaut : celle du workspace)
    #[arg(long, global = true)]
    organization: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un workspace vide (requiert --organization)
    Init {
        /// Heures d'ouverture "jour@ouverture-fermeture;..." (0 = dimanche)
        #[arg(long)]
        hours: Option<String>,
        #[arg(long, default_value_t = 9)]
        open: u8,
        #[arg(long, default_value_t = 17)]
        close: u8,
    },

    /// Importer des employés depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Vérifier un placement sans l'appliquer
    Validate {
        /// Identifiant ou nom de l'employé
        #[arg(long)]
        employee: String,
        /// RFC3339 UTC
        #[arg(long)]
        start: String,
        /// RFC3339 UTC
        #[arg(long)]
        end: String,
    },

    /// Placer un shift (fin par défaut : début + durée par défaut)
    Create {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value_t = 60)]
        default_minutes: u32,
    },

    /// Déplacer un shift
    Move {
        #[arg(long)]
        shift_id: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Redimensionner un shift
    Resize {
        #[arg(long)]
        shift_id: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },

    /// Supprimer un shift (confirmation demandée sauf --yes)
    Delete {
        #[arg(long)]
        shift_id: String,
        #[arg(long)]
        yes: bool,
    },

    /// Lister et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Couverture par tranche sur les heures d'ouverture
    Coverage {
        /// Journée unique (AAAA-MM-JJ)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        day: Option<String>,
        #[arg(long, requires = "to")]
        from: Option<String>,
        #[arg(long, requires = "from")]
        to: Option<String>,
        #[arg(long, default_value_t = 60)]
        bucket_minutes: u32,
        #[arg(long)]
        out_csv: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let backend = JsonBackend::open(&cli.workspace)?;

    let code = match cli.cmd {
        Commands::Init {
            hours,
            open,
            close,
        } => {
            if backend.exists() {
                bail!("workspace {} already exists", backend.path().display());
            }
            let organization = cli
                .organization
                .context("--organization is required to init a workspace")?;
            let mut workspace = Workspace::new(OrganizationId::new(organization));
            workspace.business_hours = match hours {
                Some(raw) => parse_business_hours(&raw)?,
                None => BusinessHours::every_day(
                    OpeningHours::new(open, close).map_err(anyhow::Error::msg)?,
                ),
            };
            backend.save(&workspace)?;
            0
        }
        Commands::ImportEmployees { csv } => {
            let mut workspace = backend.load()?;
            let employees = io::import_employees_csv(csv, &workspace.organization_id)?;
            println!("Imported {} employee(s)", employees.len());
            workspace.employees.extend(employees);
            backend.save(&workspace)?;
            0
        }
        Commands::Validate {
            employee,
            start,
            end,
        } => {
            let scheduler = open(backend, cli.organization, SessionOptions::default())?;
            let employee = resolve_employee(&scheduler, &employee)?;
            let (start, end) = (parse_ts(&start)?, parse_ts(&end)?);
            match scheduler.validate(&employee, start, end)? {
                Verdict::Accept => {
                    println!("OK: placement accepted");
                    0
                }
                Verdict::Reject(reason) => {
                    report(
                        &scheduler,
                        &Rejection {
                            employee,
                            start,
                            end,
                            reason,
                        },
                    );
                    2
                }
            }
        }
        Commands::Create {
            employee,
            start,
            end,
            default_minutes,
        } => {
            let opts = SessionOptions {
                default_shift_minutes: default_minutes,
            };
            let mut scheduler = open(backend, cli.organization, opts)?;
            let employee = resolve_employee(&scheduler, &employee)?;
            let start = parse_ts(&start)?;
            let cancel = CancelToken::new();
            let outcome = match end {
                Some(end) => scheduler.create_until(&employee, start, parse_ts(&end)?, &cancel)?,
                None => scheduler.create(&employee, start, &cancel)?,
            };
            finish(&scheduler, outcome)
        }
        Commands::Move {
            shift_id,
            start,
            end,
        } => {
            let mut scheduler = open(backend, cli.organization, SessionOptions::default())?;
            let outcome = scheduler.move_shift(
                &ShiftId::new(shift_id),
                parse_ts(&start)?,
                parse_ts(&end)?,
                &CancelToken::new(),
            )?;
            finish(&scheduler, outcome)
        }
        Commands::Resize {
            shift_id,
            start,
            end,
        } => {
            let mut scheduler = open(backend, cli.organization, SessionOptions::default())?;
            let outcome = scheduler.resize_shift(
                &ShiftId::new(shift_id),
                parse_ts(&start)?,
                parse_ts(&end)?,
                &CancelToken::new(),
            )?;
            finish(&scheduler, outcome)
        }
        Commands::Delete { shift_id, yes } => {
            let mut scheduler = open(backend, cli.organization, SessionOptions::default())?;
            let confirm = move |prompt: &str| yes || ask(prompt);
            match scheduler.delete_shift(&ShiftId::new(shift_id), &confirm, &CancelToken::new())? {
                Outcome::Applied(()) => {
                    println!("Shift deleted");
                    0
                }
                Outcome::DeletionCancelled => {
                    println!("Deletion cancelled");
                    0
                }
                Outcome::Abandoned => {
                    println!("Deletion abandoned");
                    0
                }
                Outcome::Rejected(rejection) => {
                    report(&scheduler, &rejection);
                    2
                }
            }
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_workspace_json(path, &backend.load()?)?;
            }
            let scheduler = open(backend, cli.organization, SessionOptions::default())?;
            if let Some(path) = out_csv {
                io::export_shifts_csv(path, scheduler.session())?;
            }
            let session = scheduler.session();
            let mut shifts: Vec<_> = session.shifts().collect();
            shifts.sort_by_key(|s| s.start);
            for s in shifts {
                println!(
                    "{} | {} → {} ({} min) | {}",
                    s.id,
                    s.start.to_rfc3339(),
                    s.end.to_rfc3339(),
                    s.duration_minutes(),
                    session.title_of(s)
                );
            }
            0
        }
        Commands::Coverage {
            day,
            from,
            to,
            bucket_minutes,
            out_csv,
        } => {
            let scheduler = open(backend, cli.organization, SessionOptions::default())?;
            let range = match (day, from, to) {
                (Some(day), _, _) => {
                    ScheduleRange::from_selection(&Selection::Days(vec![parse_day(&day)?]))?
                }
                (None, Some(from), Some(to)) => ScheduleRange::from_selection(&Selection::Span {
                    start: parse_day(&from)?,
                    end: parse_day(&to)?,
                })?,
                _ => ScheduleRange::current_week(Utc::now()),
            };
            if let Some((open, close)) = scheduler.session().business_hours().hour_range() {
                println!("Business hours: {open}h → {close}h");
            }
            let summary = scheduler.coverage(&range, CoverageOptions { bucket_minutes });
            if let Some(path) = out_csv {
                io::export_coverage_csv(path, &summary)?;
            }
            for b in &summary.buckets {
                println!("{} → {} | {}", b.start.to_rfc3339(), b.end.to_rfc3339(), b.count);
            }
            println!(
                "Total: {:.1} staffed hour(s), {} uncovered bucket(s)",
                summary.total_staffed_hours(),
                summary.gaps().count()
            );
            0
        }
    };

    std::process::exit(code);
}

fn open(
    backend: JsonBackend,
    organization: Option<String>,
    opts: SessionOptions,
) -> Result<Scheduler<JsonBackend>> {
    let organization = match organization {
        Some(org) => OrganizationId::new(org),
        None => backend.load()?.organization_id,
    };
    Ok(Scheduler::open(backend, organization, opts)?)
}

fn resolve_employee(scheduler: &Scheduler<JsonBackend>, raw: &str) -> Result<EmployeeId> {
    let session = scheduler.session();
    session
        .employees()
        .iter()
        .find(|e| e.id.as_str() == raw)
        .or_else(|| {
            session
                .employees()
                .iter()
                .find(|e| e.display_name().eq_ignore_ascii_case(raw) || e.first_name == raw)
        })
        .map(|e| e.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown employee: {}", raw))
}

fn report(scheduler: &Scheduler<JsonBackend>, rejection: &Rejection) {
    let employee = scheduler.session().find_employee(&rejection.employee);
    StderrReporter::new(TextNotice).report(employee, rejection);
}

fn finish(scheduler: &Scheduler<JsonBackend>, outcome: Outcome<horaires::Shift>) -> i32 {
    match outcome {
        Outcome::Applied(shift) => {
            println!(
                "{} | {} → {} | {}",
                shift.id,
                shift.start.to_rfc3339(),
                shift.end.to_rfc3339(),
                scheduler.session().title_of(&shift)
            );
            0
        }
        Outcome::Rejected(rejection) => {
            report(scheduler, &rejection);
            // Code 2 = placement refusé
            2
        }
        Outcome::DeletionCancelled | Outcome::Abandoned => 0,
    }
}

fn ask(prompt: &str) -> bool {
    print!("{prompt}\n[y/N] ");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "o" | "oui")
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse()
        .with_context(|| format!("invalid RFC3339 timestamp: {raw}"))
}

fn parse_day(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = raw.parse::<DateTime<Utc>>() {
        return Ok(ts);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date: {raw}"))?;
    Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

fn parse_business_hours(raw: &str) -> Result<BusinessHours> {
    let mut hours = BusinessHours::default();
    for chunk in raw.split(';').map(str::trim).filter(|c| !c.is_empty()) {
        let (day, span) = chunk
            .split_once('@')
            .with_context(|| format!("expected day@open-close, got {chunk}"))?;
        let (open, close) = span
            .split_once('-')
            .with_context(|| format!("expected open-close, got {span}"))?;
        let day: u8 = day.trim().parse().context("day of week")?;
        if day > 6 {
            bail!("day of week out of range: {day}");
        }
        let opening = OpeningHours::new(
            open.trim().parse().context("open hour")?,
            close.trim().parse().context("close hour")?,
        )
        .map_err(anyhow::Error::msg)?;
        hours.set(day, Some(opening));
    }
    Ok(hours)
}
