use crate::model::{
    Availability, Employee, OrganizationId, TimeOffRequest, TimeOffStatus, Workspace,
};
use crate::scheduler::{CoverageSummary, Session};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import d'employés depuis CSV: header `first_name,last_name[,availabilities][,time_off]`
///
/// - `availabilities` : `jour@début-fin` séparés par `;` (ex. `2@9-17;3@8-16`, 0 = dimanche)
/// - `time_off` : `AAAA-MM-JJ[:statut]` séparés par `;` (statut par défaut : `approved`)
pub fn import_employees_csv<P: AsRef<Path>>(
    path: P,
    organization: &OrganizationId,
) -> anyhow::Result<Vec<Employee>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let first = rec.get(0).context("missing first_name")?.trim();
        let last = rec.get(1).context("missing last_name")?.trim();
        if first.is_empty() {
            bail!("invalid employee row (empty first_name)");
        }
        let mut employee = Employee::new(organization.clone(), first, last);
        if let Some(raw) = rec.get(2).map(str::trim).filter(|s| !s.is_empty()) {
            employee.availabilities = parse_availabilities(raw)
                .with_context(|| format!("invalid availabilities for {first} {last}"))?;
        }
        if let Some(raw) = rec.get(3).map(str::trim).filter(|s| !s.is_empty()) {
            employee.time_off_requests = parse_time_off(raw)
                .with_context(|| format!("invalid time_off for {first} {last}"))?;
        }
        out.push(employee);
    }
    Ok(out)
}

fn parse_availabilities(raw: &str) -> anyhow::Result<Vec<Availability>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(parse_availability_chunk)
        .collect()
}

fn parse_availability_chunk(chunk: &str) -> anyhow::Result<Availability> {
    let (day, hours) = chunk
        .split_once('@')
        .with_context(|| format!("expected day@start-end, got {chunk}"))?;
    let (start, end) = hours
        .split_once('-')
        .with_context(|| format!("expected start-end hours, got {hours}"))?;
    let day: u8 = day.trim().parse().context("day of week")?;
    let start: u8 = start.trim().parse().context("start hour")?;
    let end: u8 = end.trim().parse().context("end hour")?;
    Availability::new(day, start, end).map_err(anyhow::Error::msg)
}

fn parse_time_off(raw: &str) -> anyhow::Result<Vec<TimeOffRequest>> {
    raw.split(';')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(parse_time_off_chunk)
        .collect()
}

fn parse_time_off_chunk(chunk: &str) -> anyhow::Result<TimeOffRequest> {
    let (date, status) = chunk.split_once(':').unwrap_or((chunk, "approved"));
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date: {date}"))?;
    let status = status
        .parse::<TimeOffStatus>()
        .map_err(anyhow::Error::msg)?;
    Ok(TimeOffRequest::new(date, status))
}

/// Export JSON du workspace (jolie mise en forme)
pub fn export_workspace_json<P: AsRef<Path>>(path: P, workspace: &Workspace) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(workspace)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des shifts: header `id,employee,title,start,end`
pub fn export_shifts_csv<P: AsRef<Path>>(path: P, session: &Session) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "employee", "title", "start", "end"])?;
    let mut shifts: Vec<_> = session.shifts().collect();
    shifts.sort_by_key(|s| s.start);
    for s in shifts {
        let title = session.title_of(s);
        let start = s.start.to_rfc3339();
        let end = s.end.to_rfc3339();
        w.write_record([
            s.id.as_str(),
            s.employee.as_str(),
            title.as_str(),
            start.as_str(),
            end.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV de la couverture: header `start,end,count`
pub fn export_coverage_csv<P: AsRef<Path>>(
    path: P,
    summary: &CoverageSummary,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["start", "end", "count"])?;
    let mut buf = itoa::Buffer::new();
    for b in &summary.buckets {
        let start = b.start.to_rfc3339();
        let end = b.end.to_rfc3339();
        w.write_record([start.as_str(), end.as_str(), buf.format(b.count)])?;
    }
    w.flush()?;
    Ok(())
}
