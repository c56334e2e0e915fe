use crate::config::OutputFormat;
use crate::domain::model::SkillProfile;
use crate::utils::error::{Result, SkillError};

const CSV_HEADER: [&str; 9] = [
    "skill_id",
    "name",
    "category",
    "frequency",
    "count",
    "max_skill_level",
    "sum_skill_level",
    "skill_level_average",
    "courses",
];

pub fn render(profile: &SkillProfile, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(profile)?),
        OutputFormat::Csv => render_csv(profile),
    }
}

/// One row per skill in map order; courses as `CODE:level` joined by `;`.
fn render_csv(profile: &SkillProfile) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for (skill_id, record) in profile.skills.iter() {
        let courses = record
            .courses
            .iter()
            .map(|(code, level)| format!("{}:{}", code, level))
            .collect::<Vec<_>>()
            .join(";");
        let average = record
            .average_level
            .map(|average| average.to_string())
            .unwrap_or_default();

        writer.write_record([
            skill_id.to_string(),
            record.name.clone(),
            record.category.clone(),
            record.frequency.to_string(),
            record.count.to_string(),
            record.max_level.to_string(),
            record.sum_level.to_string(),
            average,
            courses,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| SkillError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
