use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// 學生自行填寫的課程 (title, code)，未經任何正規化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CourseQueryRepr")]
pub struct CourseQuery {
    pub title: String,
    pub code: String,
}

impl CourseQuery {
    pub fn new(title: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            code: code.into(),
        }
    }
}

// coursesList 的項目可以是 ["title", "code"] 或 {"title": ..., "code": ...}
#[derive(Deserialize)]
#[serde(untagged)]
enum CourseQueryRepr {
    Pair(String, String),
    Object {
        #[serde(default)]
        title: String,
        code: String,
    },
}

impl From<CourseQueryRepr> for CourseQuery {
    fn from(repr: CourseQueryRepr) -> Self {
        match repr {
            CourseQueryRepr::Pair(title, code) | CourseQueryRepr::Object { title, code } => {
                Self { title, code }
            }
        }
    }
}

/// A course as stored in the registry snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(
        default,
        rename = "skills_curated",
        alias = "skills",
        deserialize_with = "null_as_default"
    )]
    pub skills: Vec<SkillEntry>,
}

impl CourseRecord {
    /// Uppercased code used for matching; `None` when the code is absent or empty.
    pub fn matchable_code(&self) -> Option<String> {
        self.code
            .as_deref()
            .filter(|code| !code.is_empty())
            .map(str::to_uppercase)
    }

    pub fn code_str(&self) -> &str {
        self.code.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub skill_id: String,
    #[serde(rename = "skill", alias = "skill_name")]
    pub skill_name: String,
    #[serde(default, alias = "skill_category", deserialize_with = "null_as_default")]
    pub category: String,
    /// 全 registry 的稀有度分數，越低越稀有
    pub frequency: Score,
    #[serde(rename = "skill_level", alias = "level")]
    pub level: Score,
}

/// Registry number echoed back as written: integers stay integers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Int(i64),
    Float(f64),
}

impl Score {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(value) => value as f64,
            Self::Float(value) => value,
        }
    }
}

impl From<i64> for Score {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl std::ops::Add for Score {
    type Output = Score;

    fn add(self, other: Score) -> Score {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map(Self::Int)
                .unwrap_or_else(|| Self::Float(a as f64 + b as f64)),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }
}

// 以數值比較，Int(3) == Float(3.0)
impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.as_f64() == other.as_f64()
    }
}

impl PartialEq<f64> for Score {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == *other
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
        }
    }
}

/// Cumulative record of one skill across every matched course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRecord {
    pub name: String,
    pub category: String,
    pub frequency: Score,
    pub count: usize,
    #[serde(rename = "max_skill_level")]
    pub max_level: Score,
    #[serde(rename = "sum_skill_level")]
    pub sum_level: Score,
    pub courses: Vec<(String, Score)>,
    #[serde(rename = "skill_level_average", skip_serializing_if = "Option::is_none")]
    pub average_level: Option<f64>,
}

impl SkillRecord {
    pub fn first_occurrence(entry: &SkillEntry, course_code: &str) -> Self {
        Self {
            name: entry.skill_name.clone(),
            category: entry.category.clone(),
            frequency: entry.frequency,
            count: 1,
            max_level: entry.level,
            sum_level: entry.level,
            courses: vec![(course_code.to_string(), entry.level)],
            average_level: None,
        }
    }

    /// 後續出現：只累加數值，name/category/frequency 保留第一次的值
    pub fn absorb(&mut self, entry: &SkillEntry, course_code: &str) {
        self.count += 1;
        if entry.level > self.max_level {
            self.max_level = entry.level;
        }
        self.sum_level = self.sum_level + entry.level;
        self.courses.push((course_code.to_string(), entry.level));
        self.average_level = None;
    }

    /// Recomputes and stores `sum_level / count`.
    pub fn finalize(&mut self) -> f64 {
        let average = self.sum_level.as_f64() / self.count as f64;
        self.average_level = Some(average);
        average
    }
}

/// Skill id → record, iterated in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillMap {
    entries: Vec<(String, SkillRecord)>,
    index: HashMap<String, usize>,
}

impl SkillMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, skill_id: &str) -> Option<&SkillRecord> {
        self.index.get(skill_id).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, skill_id: &str) -> Option<&mut SkillRecord> {
        match self.index.get(skill_id) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Inserts a new record at the end; an existing id is replaced in place.
    pub fn insert(&mut self, skill_id: String, record: SkillRecord) {
        match self.index.get(&skill_id) {
            Some(&i) => self.entries[i].1 = record,
            None => {
                self.index.insert(skill_id.clone(), self.entries.len());
                self.entries.push((skill_id, record));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SkillRecord)> {
        self.entries.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut SkillRecord)> {
        self.entries
            .iter_mut()
            .map(|(id, record)| (id.as_str(), record))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }
}

impl Serialize for SkillMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    NotFound,
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedCourse {
    pub title: String,
    pub code: String,
    pub reason: UnresolvedReason,
    /// Registry codes that matched an ambiguous query.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    pub matched: Vec<CourseRecord>,
    pub unresolved: Vec<UnresolvedCourse>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InterestSelection {
    pub most_common_skill_id: Option<String>,
    pub highest_average_level_skill_id: Option<String>,
    pub rarest_skill_id: Option<String>,
}

impl InterestSelection {
    pub fn is_empty(&self) -> bool {
        self.most_common_skill_id.is_none()
            && self.highest_average_level_skill_id.is_none()
            && self.rarest_skill_id.is_none()
    }

    /// [most_common, highest_average_level, rarest]
    pub fn as_array(&self) -> [Option<&str>; 3] {
        [
            self.most_common_skill_id.as_deref(),
            self.highest_average_level_skill_id.as_deref(),
            self.rarest_skill_id.as_deref(),
        ]
    }

    /// Selected ids without repeats, in selection order.
    pub fn distinct_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::with_capacity(3);
        for id in self.as_array().into_iter().flatten() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillPathway {
    pub skill_id: String,
    pub skill_name: String,
    pub pathway: String,
}

/// Response body assembled for one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillProfile {
    pub skills: SkillMap,
    #[serde(rename = "skills_of_interest", serialize_with = "selection_as_list")]
    pub selection: InterestSelection,
    pub course_ids: Vec<String>,
    pub unresolved: Vec<UnresolvedCourse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pathways: Vec<SkillPathway>,
    pub analyzed_at: DateTime<Utc>,
}

/// Connection settings for the narrative text service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSettings {
    pub endpoint: String,
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
}

pub const DEFAULT_NARRATIVE_MODEL: &str = "amazon.nova-micro-v1:0";

fn default_max_tokens() -> u32 {
    2000
}

impl NarrativeSettings {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: 0.0,
        }
    }
}

fn selection_as_list<S: Serializer>(
    selection: &InterestSelection,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    selection.as_array().serialize(serializer)
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "skill_id must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_course_query_accepts_pairs_and_objects() {
        let queries: Vec<CourseQuery> = serde_json::from_value(json!([
            ["Intro to Programming", "CS101"],
            {"title": "Accounting", "code": "ACC200"}
        ]))
        .unwrap();

        assert_eq!(queries[0], CourseQuery::new("Intro to Programming", "CS101"));
        assert_eq!(queries[1], CourseQuery::new("Accounting", "ACC200"));
    }

    #[test]
    fn test_course_record_schema_aliases() {
        let canonical: CourseRecord = serde_json::from_value(json!({
            "code": "cs101",
            "name": "Intro",
            "description": null,
            "skills_curated": [
                {"skill_id": "sk-1", "skill": "Python", "category": "Programming",
                 "frequency": 12, "skill_level": 3}
            ]
        }))
        .unwrap();
        let drifted: CourseRecord = serde_json::from_value(json!({
            "code": "cs101",
            "name": "Intro",
            "skills": [
                {"skill_id": 7, "skill_name": "Python", "skill_category": "Programming",
                 "frequency": 12.5, "level": 2.5}
            ]
        }))
        .unwrap();

        assert_eq!(canonical.matchable_code().as_deref(), Some("CS101"));
        assert_eq!(canonical.description, "");
        assert_eq!(canonical.skills[0].category, "Programming");
        assert_eq!(drifted.skills[0].skill_id, "7");
        assert_eq!(drifted.skills[0].category, "Programming");
        assert_eq!(drifted.skills[0].level, 2.5);
    }

    #[test]
    fn test_registry_numbers_keep_their_json_form() {
        let entries: Vec<SkillEntry> = serde_json::from_value(json!([
            {"skill_id": "sk-1", "skill": "Python", "frequency": 120, "skill_level": 3},
            {"skill_id": "sk-1", "skill": "Python", "frequency": 120, "skill_level": 2.5}
        ]))
        .unwrap();

        let mut record = SkillRecord::first_occurrence(&entries[0], "CS101");
        let first = serde_json::to_value(&record).unwrap();
        assert_eq!(first["frequency"], json!(120));
        assert_eq!(first["max_skill_level"], json!(3));
        assert_eq!(first["courses"], json!([["CS101", 3]]));

        record.absorb(&entries[1], "CS201");
        record.finalize();
        let merged = serde_json::to_value(&record).unwrap();
        assert_eq!(merged["sum_skill_level"], json!(5.5));
        assert_eq!(merged["courses"][1], json!(["CS201", 2.5]));
        assert_eq!(merged["skill_level_average"], json!(2.75));
    }

    #[test]
    fn test_missing_or_empty_code_is_not_matchable() {
        let missing: CourseRecord = serde_json::from_value(json!({"name": "No code"})).unwrap();
        let empty: CourseRecord =
            serde_json::from_value(json!({"code": "", "name": "Empty"})).unwrap();

        assert!(missing.matchable_code().is_none());
        assert!(empty.matchable_code().is_none());
        assert_eq!(missing.code_str(), "");
    }

    #[test]
    fn test_skill_map_keeps_first_occurrence_order() {
        let entry = |id: &str| SkillEntry {
            skill_id: id.to_string(),
            skill_name: id.to_string(),
            category: String::new(),
            frequency: Score::Int(1),
            level: Score::Int(1),
        };
        let mut map = SkillMap::new();
        for id in ["zeta", "alpha", "mid"] {
            map.insert(id.to_string(), SkillRecord::first_occurrence(&entry(id), "C1"));
        }
        map.insert("alpha".to_string(), SkillRecord::first_occurrence(&entry("alpha"), "C2"));

        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha").unwrap().courses[0].0, "C2");

        let serialized = serde_json::to_string(&map).unwrap();
        let zeta = serialized.find("\"zeta\"").unwrap();
        let alpha = serialized.find("\"alpha\"").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_selection_serializes_as_list() {
        let selection = InterestSelection {
            most_common_skill_id: Some("sk-1".to_string()),
            highest_average_level_skill_id: None,
            rarest_skill_id: Some("sk-1".to_string()),
        };
        assert_eq!(
            serde_json::to_value(selection.as_array()).unwrap(),
            json!(["sk-1", null, "sk-1"])
        );
        assert_eq!(selection.distinct_ids(), vec!["sk-1"]);
    }
}
