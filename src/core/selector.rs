use crate::domain::model::{InterestSelection, SkillMap};

/// Picks the skills of interest in a single pass over `skills`.
///
/// Every record gets its `average_level` (re)computed first. Each superlative uses
/// a strict comparison, so on ties the skill seen first in map order wins.
pub fn select(skills: &mut SkillMap) -> InterestSelection {
    let mut most_common: Option<(&str, usize)> = None;
    let mut highest_average: Option<(&str, f64)> = None;
    let mut rarest: Option<&str> = None;
    let mut rarest_frequency = f64::INFINITY;

    for (skill_id, record) in skills.iter_mut() {
        let average = record.finalize();

        if most_common.map_or(true, |(_, count)| record.count > count) {
            most_common = Some((skill_id, record.count));
        }

        if highest_average.map_or(true, |(_, best)| average > best) {
            highest_average = Some((skill_id, average));
        }

        if record.frequency.as_f64() < rarest_frequency {
            rarest = Some(skill_id);
            rarest_frequency = record.frequency.as_f64();
        }
    }

    let selection = InterestSelection {
        most_common_skill_id: most_common.map(|(id, _)| id.to_string()),
        highest_average_level_skill_id: highest_average.map(|(id, _)| id.to_string()),
        rarest_skill_id: rarest.map(str::to_string),
    };

    if selection.is_empty() {
        tracing::info!("No skills aggregated, skills of interest are empty");
    }

    selection
}
