use crate::domain::model::CourseRecord;
use serde::{Deserialize, Serialize};

const SUMMARY_SYSTEM_PROMPT: &str = "\
You are summarizing a university-level student's abilities and skills.
You will receive:
1) The courses the student completed, with their descriptions
2) The skills associated with each of those courses
3) The skills that stand out in the student's profile

Your task:
- Write a short summary (at most 3 sentences) of the student's strengths.
- Mention at least one notable skill group they excel in.
- Highlight at least one specific skill learned in a course, referencing that course.
- Keep the tone positive, in the style of: \"Your coursework has given you skills in ... \
Notably your accounting class taught you ...\"
- Avoid lists; keep it narrative and concise.

Output only the summary.";

const PATHWAY_SYSTEM_PROMPT: &str = "\
You are a career development advisor for university students.
You will receive the name of one skill the student has already built through coursework.

Your task:
- Suggest a concrete pathway to develop this skill further, in at most 4 sentences.
- Name one next course topic, one hands-on project idea and one kind of role that uses the skill.
- Keep the tone encouraging and specific.

Output only the pathway.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

pub fn pathway_messages(skill_name: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(PATHWAY_SYSTEM_PROMPT),
        ChatMessage::user(format!("Skill: {}", skill_name)),
    ]
}

pub fn summary_messages(skill_names: &[String], courses: &[CourseRecord]) -> Vec<ChatMessage> {
    let descriptions = courses
        .iter()
        .map(|course| format!("- {}: {}", course.name, course.description))
        .collect::<Vec<_>>()
        .join("\n");

    let skills_by_course = courses
        .iter()
        .map(|course| {
            let names = course
                .skills
                .iter()
                .map(|skill| skill.skill_name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("- {}: {}", course.name, names)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "1) Courses\n{}\n\n2) Skills by course\n{}\n\n3) Standout skills\n{}",
        descriptions,
        skills_by_course,
        skill_names.join(", ")
    );

    vec![
        ChatMessage::system(SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(user),
    ]
}
