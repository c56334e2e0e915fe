use crate::domain::model::{CourseRecord, SkillMap, SkillRecord};

/// Folds every matched course's curated skills into one record per skill id.
///
/// Courses are visited in match order and skills in curated order. The first
/// occurrence of a skill fixes its name, category and frequency; later ones only
/// bump the count, the level totals and the course list.
pub fn aggregate(matched: &[CourseRecord]) -> SkillMap {
    let mut skills = SkillMap::new();

    for course in matched {
        let course_code = course.code_str();
        for entry in &course.skills {
            match skills.get_mut(&entry.skill_id) {
                Some(record) => record.absorb(entry, course_code),
                None => skills.insert(
                    entry.skill_id.clone(),
                    SkillRecord::first_occurrence(entry, course_code),
                ),
            }
        }
    }

    tracing::debug!(
        "Aggregated {} distinct skills from {} courses",
        skills.len(),
        matched.len()
    );

    skills
}
