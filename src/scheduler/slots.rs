use super::DutySlot;
use crate::config::RosterConfig;
use crate::model::Shift;
use chrono::NaiveDate;

/// Énumère les créneaux dans l'ordre de remplissage : jour calendaire,
/// puis créneau (jour avant nuit), puis poste (ordre déclaré), puis position.
pub fn enumerate_slots(dates: &[NaiveDate], config: &RosterConfig) -> Vec<DutySlot> {
    let requirements = config.ordered_requirements();
    let per_day: u32 = requirements.iter().map(|(_, n)| n).sum::<u32>() * Shift::ALL.len() as u32;
    let mut out = Vec::with_capacity(dates.len() * per_day as usize);

    for &date in dates {
        for shift in Shift::ALL {
            for &(duty_type, headcount) in &requirements {
                out.extend((0..headcount).map(|slot_index| DutySlot {
                    date,
                    shift,
                    duty_type,
                    slot_index,
                }));
            }
        }
    }
    out
}
