use crate::model::{
    DutyAssignment, LeaveRecord, LeaveStatus, LeaveType, Personnel, PersonnelId, PersonnelStatus,
    Rank, Section,
};
use crate::scheduler::{RosterFailure, RosterRequest};
use crate::workload::PersonWorkload;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import du personnel depuis CSV:
/// header `id,service_id,first_name,last_name,rank,section,status[,joined_date]`
pub fn import_personnel_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Personnel>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = field(&rec, 0, "id")?;
        let rank = field(&rec, 4, "rank")?;
        let section = field(&rec, 5, "section")?;
        let status = field(&rec, 6, "status")?;
        let mut person = Personnel::new(
            id,
            field(&rec, 2, "first_name")?,
            field(&rec, 3, "last_name")?,
            rank.parse::<Rank>().with_context(|| format!("invalid rank for {id}"))?,
            section.parse::<Section>().with_context(|| format!("invalid section for {id}"))?,
        )
        .with_status(
            status
                .parse::<PersonnelStatus>()
                .with_context(|| format!("invalid status for {id}"))?,
        );
        let service_id = field(&rec, 1, "service_id")?;
        person.service_id = service_id.to_string();
        if let Some(joined) = rec.get(7).map(str::trim).filter(|s| !s.is_empty()) {
            person.joined_date = Some(
                parse_date(joined).with_context(|| format!("invalid joined_date for {id}"))?,
            );
        }
        out.push(person);
    }
    Ok(out)
}

/// Import des congés: header `id,personnel_id,leave_type,start_date,end_date,status`
pub fn import_leaves_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<LeaveRecord>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = field(&rec, 0, "id")?;
        let start_date = parse_date(field(&rec, 3, "start_date")?)?;
        let end_date = parse_date(field(&rec, 4, "end_date")?)?;
        if end_date < start_date {
            bail!("leave {id} ends before it starts");
        }
        out.push(LeaveRecord {
            id: id.to_string(),
            personnel_id: PersonnelId::new(field(&rec, 1, "personnel_id")?),
            leave_type: field(&rec, 2, "leave_type")?
                .parse::<LeaveType>()
                .with_context(|| format!("invalid leave_type for leave {id}"))?,
            start_date,
            end_date,
            status: field(&rec, 5, "status")?
                .parse::<LeaveStatus>()
                .with_context(|| format!("invalid status for leave {id}"))?,
        });
    }
    Ok(out)
}

fn field<'r>(rec: &'r StringRecord, idx: usize, name: &str) -> anyhow::Result<&'r str> {
    let value = rec
        .get(idx)
        .with_context(|| format!("missing {name}"))?
        .trim();
    if value.is_empty() {
        bail!("empty {name}");
    }
    Ok(value)
}

fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Lecture d'une demande de génération (JSON camelCase).
pub fn load_request_json<P: AsRef<Path>>(path: P) -> anyhow::Result<RosterRequest> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing request {}", path.display()))
}

pub fn load_assignments_json<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<DutyAssignment>> {
    let path = path.as_ref();
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing assignments {}", path.display()))
}

/// Export JSON des affectations (jolie mise en forme)
pub fn export_assignments_json<P: AsRef<Path>>(
    path: P,
    assignments: &[DutyAssignment],
) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(assignments)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV: header `id,personnel_id,duty_type,date,shift,start,end,assigned_at`
pub fn export_assignments_csv<P: AsRef<Path>>(
    path: P,
    assignments: &[DutyAssignment],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "id",
        "personnel_id",
        "duty_type",
        "date",
        "shift",
        "start",
        "end",
        "assigned_at",
    ])?;
    for a in assignments {
        let date = a.date.to_string();
        let shift = a.shift.to_string();
        let start = a.shift.starts_at(a.date).to_rfc3339();
        let end = a.shift.ends_at(a.date).to_rfc3339();
        let assigned_at = a.assigned_at.to_rfc3339();
        w.write_record([
            a.id.as_str(),
            a.personnel_id.as_str(),
            a.duty_type.label(),
            date.as_str(),
            shift.as_str(),
            start.as_str(),
            end.as_str(),
            assigned_at.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Rapport CSV des créneaux non pourvus: header `date,shift,duty_type,slot_index,reason`
pub fn export_unfilled_csv<P: AsRef<Path>>(path: P, failure: &RosterFailure) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "shift", "duty_type", "slot_index", "reason"])?;
    let mut buf = itoa::Buffer::new();
    for u in &failure.unfilled_slots {
        let date = u.slot.date.to_string();
        let shift = u.slot.shift.to_string();
        w.write_record([
            date.as_str(),
            shift.as_str(),
            u.slot.duty_type.label(),
            buf.format(u.slot.slot_index),
            u.reason_code.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Export CSV du bilan: header `personnel_id,name,section,total,day,night`
pub fn export_workload_csv<P: AsRef<Path>>(path: P, rows: &[PersonWorkload]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["personnel_id", "name", "section", "total", "day", "night"])?;
    let (mut total, mut day, mut night) = (itoa::Buffer::new(), itoa::Buffer::new(), itoa::Buffer::new());
    for r in rows {
        let section = r.section.to_string();
        w.write_record([
            r.personnel_id.as_str(),
            r.name.as_str(),
            section.as_str(),
            total.format(r.total),
            day.format(r.day),
            night.format(r.night),
        ])?;
    }
    w.flush()?;
    Ok(())
}
