use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Libellé inconnu lors du parsing d'une énumération (CSV, CLI).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseLabelError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Normalise un libellé : minuscules, sans espaces ni ponctuation.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Identifiant fort pour Personnel
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PersonnelId(String);

impl PersonnelId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonnelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Grades, du plus bas au plus haut. L'ordre de déclaration fait foi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "Cadet")]
    Cadet,
    #[serde(rename = "Officer III")]
    OfficerIII,
    #[serde(rename = "Officer II")]
    OfficerII,
    #[serde(rename = "Officer I")]
    OfficerI,
    #[serde(rename = "Sergeant")]
    Sergeant,
    #[serde(rename = "Inspector")]
    Inspector,
    #[serde(rename = "Chief Inspector")]
    ChiefInspector,
    #[serde(rename = "Commander")]
    Commander,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::Cadet,
        Rank::OfficerIII,
        Rank::OfficerII,
        Rank::OfficerI,
        Rank::Sergeant,
        Rank::Inspector,
        Rank::ChiefInspector,
        Rank::Commander,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Rank::Cadet => "Cadet",
            Rank::OfficerIII => "Officer III",
            Rank::OfficerII => "Officer II",
            Rank::OfficerI => "Officer I",
            Rank::Sergeant => "Sergeant",
            Rank::Inspector => "Inspector",
            Rank::ChiefInspector => "Chief Inspector",
            Rank::Commander => "Commander",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Rank {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Rank::ALL
            .into_iter()
            .find(|r| normalize(r.label()) == key)
            .ok_or_else(|| ParseLabelError::new("rank", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Section {
    Operations,
    Intelligence,
    Logistics,
    Administration,
    Communications,
    Training,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Operations,
        Section::Intelligence,
        Section::Logistics,
        Section::Administration,
        Section::Communications,
        Section::Training,
    ];
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Section {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Section::ALL
            .into_iter()
            .find(|sec| normalize(&sec.to_string()) == key)
            .ok_or_else(|| ParseLabelError::new("section", s))
    }
}

/// Situation administrative. Seul `Active` est affectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonnelStatus {
    Active,
    #[serde(rename = "On Leave", alias = "OnLeave")]
    OnLeave,
    Suspended,
    Retired,
}

impl FromStr for PersonnelStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "active" => Ok(Self::Active),
            "onleave" => Ok(Self::OnLeave),
            "suspended" => Ok(Self::Suspended),
            "retired" => Ok(Self::Retired),
            _ => Err(ParseLabelError::new("personnel status", s)),
        }
    }
}

/// Membre du personnel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Personnel {
    pub id: PersonnelId,
    #[serde(default)]
    pub service_id: String,
    pub first_name: String,
    pub last_name: String,
    pub rank: Rank,
    pub section: Section,
    pub status: PersonnelStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_date: Option<NaiveDate>,
}

impl Personnel {
    pub fn new<I: AsRef<str>, F: Into<String>, L: Into<String>>(
        id: I,
        first_name: F,
        last_name: L,
        rank: Rank,
        section: Section,
    ) -> Self {
        let id = PersonnelId::new(id);
        Self {
            service_id: id.as_str().to_string(),
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            rank,
            section,
            status: PersonnelStatus::Active,
            joined_date: None,
        }
    }

    pub fn with_status(mut self, status: PersonnelStatus) -> Self {
        self.status = status;
        self
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_assignable(&self) -> bool {
        self.status == PersonnelStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    #[serde(rename = "Annual Leave", alias = "ANNUAL")]
    Annual,
    #[serde(rename = "Casual Leave", alias = "CASUAL")]
    Casual,
    #[serde(rename = "Sick Leave", alias = "SICK")]
    Sick,
    #[serde(rename = "Maternity Leave", alias = "MATERNITY")]
    Maternity,
    #[serde(rename = "Paternity Leave", alias = "PATERNITY")]
    Paternity,
    #[serde(rename = "Compassionate Leave", alias = "COMPASSIONATE")]
    Compassionate,
    #[serde(rename = "Study Leave", alias = "STUDY")]
    Study,
}

impl FromStr for LeaveType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        let key = key.strip_suffix("leave").unwrap_or(&key);
        match key {
            "annual" => Ok(Self::Annual),
            "casual" => Ok(Self::Casual),
            "sick" => Ok(Self::Sick),
            "maternity" => Ok(Self::Maternity),
            "paternity" => Ok(Self::Paternity),
            "compassionate" => Ok(Self::Compassionate),
            "study" => Ok(Self::Study),
            _ => Err(ParseLabelError::new("leave type", s)),
        }
    }
}

/// Statut d'une demande de congé. Seul `Approved` bloque les affectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveStatus {
    #[serde(alias = "PENDING")]
    Pending,
    #[serde(alias = "APPROVED")]
    Approved,
    #[serde(alias = "REJECTED")]
    Rejected,
    #[serde(alias = "CANCELLED")]
    Cancelled,
    #[serde(alias = "COMPLETED")]
    Completed,
}

impl FromStr for LeaveStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseLabelError::new("leave status", s)),
        }
    }
}

/// Congé : intervalle de dates inclusif [start_date, end_date].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRecord {
    #[serde(default)]
    pub id: String,
    pub personnel_id: PersonnelId,
    #[serde(rename = "type", alias = "leaveType")]
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
}

impl LeaveRecord {
    pub fn approved(
        personnel_id: PersonnelId,
        leave_type: LeaveType,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Self, String> {
        if end_date < start_date {
            return Err("leave end date must not precede start date".to_string());
        }
        Ok(Self {
            id: format!("{}-{}", personnel_id, start_date),
            personnel_id,
            leave_type,
            start_date,
            end_date,
            status: LeaveStatus::Approved,
        })
    }

    /// Vrai si le congé est approuvé et couvre `date`.
    pub fn blocks(&self, date: NaiveDate) -> bool {
        self.status == LeaveStatus::Approved && self.start_date <= date && date <= self.end_date
    }
}

/// Postes de service, dans l'ordre déclaré (ordre de remplissage).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DutyType {
    #[serde(rename = "Main Gate Guard", alias = "GUARD")]
    Guard,
    #[serde(rename = "Perimeter Patrol", alias = "PATROL")]
    Patrol,
    #[serde(rename = "Radio Room", alias = "RADIO")]
    Radio,
    #[serde(rename = "Duty Desk", alias = "DESK")]
    Desk,
    #[serde(rename = "Quick Reaction Force", alias = "QRF")]
    Qrf,
}

impl DutyType {
    pub const ALL: [DutyType; 5] = [
        DutyType::Guard,
        DutyType::Patrol,
        DutyType::Radio,
        DutyType::Desk,
        DutyType::Qrf,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DutyType::Guard => "Main Gate Guard",
            DutyType::Patrol => "Perimeter Patrol",
            DutyType::Radio => "Radio Room",
            DutyType::Desk => "Duty Desk",
            DutyType::Qrf => "Quick Reaction Force",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            DutyType::Guard => "GUARD",
            DutyType::Patrol => "PATROL",
            DutyType::Radio => "RADIO",
            DutyType::Desk => "DESK",
            DutyType::Qrf => "QRF",
        }
    }

    /// Effectif requis par défaut, par créneau.
    pub fn default_headcount(self) -> u32 {
        match self {
            DutyType::Guard | DutyType::Patrol => 2,
            DutyType::Radio | DutyType::Desk => 1,
            DutyType::Qrf => 3,
        }
    }
}

impl fmt::Display for DutyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DutyType {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        DutyType::ALL
            .into_iter()
            .find(|d| normalize(d.label()) == key || normalize(d.code()) == key)
            .ok_or_else(|| ParseLabelError::new("duty type", s))
    }
}

/// Créneau : jour (06h-18h) ou nuit (18h-06h le lendemain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Shift {
    #[serde(rename = "Day (0600-1800)", alias = "Day", alias = "DAY")]
    Day,
    #[serde(rename = "Night (1800-0600)", alias = "Night", alias = "NIGHT")]
    Night,
}

impl Shift {
    pub const ALL: [Shift; 2] = [Shift::Day, Shift::Night];

    pub fn start_time(self) -> NaiveTime {
        match self {
            Shift::Day => NaiveTime::MIN + Duration::hours(6),
            Shift::Night => NaiveTime::MIN + Duration::hours(18),
        }
    }

    /// Début du créneau en UTC pour la date donnée.
    pub fn starts_at(self, date: NaiveDate) -> DateTime<Utc> {
        Utc.from_utc_datetime(&date.and_time(self.start_time()))
    }

    /// Fin du créneau ; la nuit se termine le lendemain à 06h.
    pub fn ends_at(self, date: NaiveDate) -> DateTime<Utc> {
        self.starts_at(date) + Duration::hours(12)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shift::Day => f.write_str("Day"),
            Shift::Night => f.write_str("Night"),
        }
    }
}

impl FromStr for Shift {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        if key.starts_with("day") {
            Ok(Shift::Day)
        } else if key.starts_with("night") {
            Ok(Shift::Night)
        } else {
            Err(ParseLabelError::new("shift", s))
        }
    }
}

/// Identifiant fort pour DutyAssignment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentId(String);

impl AssignmentId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }

    /// Identifiant stable : même clé, même identifiant (UUID v5).
    pub fn derived<S: AsRef<str>>(key: S) -> Self {
        Self(Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_ref().as_bytes()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Affectation d'une personne à un poste, pour une date et un créneau.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyAssignment {
    pub id: AssignmentId,
    pub personnel_id: PersonnelId,
    pub duty_type: DutyType,
    pub date: NaiveDate,
    pub shift: Shift,
    pub assigned_at: DateTime<Utc>,
}

impl DutyAssignment {
    /// Clé de recence : (date, créneau).
    pub fn period(&self) -> (NaiveDate, Shift) {
        (self.date, self.shift)
    }
}
