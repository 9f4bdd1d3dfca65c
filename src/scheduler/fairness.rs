use super::context::WeekContext;
use crate::model::{DutyAssignment, Shift};
use chrono::{Days, NaiveDate};
use tracing::debug;

type Period = (NaiveDate, Shift);

/// Compteurs d'équité par personne (index du contexte) : nombre
/// d'affectations dans la fenêtre + semaine courante, et dernière affectation.
pub(super) struct FairnessLedger {
    counts: Vec<u32>,
    last: Vec<Option<Period>>,
}

impl FairnessLedger {
    /// Initialise depuis l'historique. Seules les affectations antérieures à
    /// la semaine comptent ; le compteur ne retient que celles de la fenêtre
    /// `[week_start - lookback_days, week_start)`, la recence les retient toutes.
    pub fn from_history(
        ctx: &WeekContext<'_>,
        past_duties: &[DutyAssignment],
        lookback_days: u32,
    ) -> Self {
        let size = ctx.personnel.len();
        let mut ledger = Self {
            counts: vec![0; size],
            last: vec![None; size],
        };
        let window_start = ctx
            .week_start
            .checked_sub_days(Days::new(u64::from(lookback_days)))
            .unwrap_or(NaiveDate::MIN);

        let mut ignored = 0usize;
        for duty in past_duties {
            if duty.date >= ctx.week_start {
                ignored += 1;
                continue;
            }
            let Some(idx) = ctx.index_of(&duty.personnel_id) else {
                ignored += 1;
                continue;
            };
            if duty.date >= window_start {
                ledger.counts[idx] += 1;
            }
            ledger.bump_last(idx, duty.period());
        }
        if ignored > 0 {
            debug!(ignored, "past duties outside history scope");
        }
        ledger
    }

    fn bump_last(&mut self, idx: usize, period: Period) {
        let slot = &mut self.last[idx];
        if slot.map_or(true, |prev| prev < period) {
            *slot = Some(period);
        }
    }

    pub fn record(&mut self, idx: usize, date: NaiveDate, shift: Shift) {
        self.counts[idx] += 1;
        self.bump_last(idx, (date, shift));
    }

    pub fn count(&self, idx: usize) -> u32 {
        self.counts[idx]
    }

    /// Clé de tri : moins d'affectations, puis affectation la plus ancienne
    /// (jamais affecté en premier), puis index, qui suit l'ordre des identifiants.
    fn key(&self, idx: usize) -> (u32, Option<Period>, usize) {
        (self.counts[idx], self.last[idx], idx)
    }

    pub fn pick<I>(&self, candidates: I) -> Option<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        candidates.into_iter().min_by_key(|&idx| self.key(idx))
    }
}
