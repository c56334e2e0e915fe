use crate::domain::model::{
    CourseQuery, CourseRecord, MatchResult, UnresolvedCourse, UnresolvedReason,
};

/// Resolves loosely specified course codes against the registry.
///
/// Registry codes are uppercased once; a query matches every registry course whose
/// uppercased code contains the query code as a substring. The query code is used
/// exactly as given. Only a single candidate counts as a match: zero candidates is
/// `not_found`, two or more is `ambiguous` and is never resolved to one of them.
#[derive(Debug)]
pub struct CourseMatcher<'r> {
    pool: Vec<(String, &'r CourseRecord)>,
}

impl<'r> CourseMatcher<'r> {
    pub fn new(registry: &'r [CourseRecord]) -> Self {
        // 沒有 code 的課程完全不參與比對
        let pool: Vec<(String, &CourseRecord)> = registry
            .iter()
            .filter_map(|course| course.matchable_code().map(|code| (code, course)))
            .collect();

        tracing::debug!(
            "Matcher pool holds {} of {} registry courses",
            pool.len(),
            registry.len()
        );

        Self { pool }
    }

    pub fn candidates(&self, code: &str) -> Vec<&'r CourseRecord> {
        self.pool
            .iter()
            .filter(|(registry_code, _)| registry_code.contains(code))
            .map(|(_, course)| *course)
            .collect()
    }

    pub fn resolve(&self, queries: &[CourseQuery]) -> MatchResult {
        let mut result = MatchResult::default();

        for query in queries {
            let candidates = self.candidates(&query.code);

            match candidates.as_slice() {
                [course] => {
                    tracing::debug!(
                        "Matched {} ({}) to {}",
                        query.code,
                        query.title,
                        course.code_str()
                    );
                    result.matched.push((*course).clone());
                }
                [] => {
                    tracing::info!("Course code was not found in the registry: {}", query.code);
                    result.unresolved.push(UnresolvedCourse {
                        title: query.title.clone(),
                        code: query.code.clone(),
                        reason: UnresolvedReason::NotFound,
                        candidates: Vec::new(),
                    });
                }
                many => {
                    let listing = many
                        .iter()
                        .map(|course| format!("{}: {}", course.code_str(), course.name))
                        .collect::<Vec<_>>()
                        .join(", ");
                    tracing::warn!(
                        "{} candidates for course {} ({}) were found in the registry: {}",
                        many.len(),
                        query.code,
                        query.title,
                        listing
                    );
                    result.unresolved.push(UnresolvedCourse {
                        title: query.title.clone(),
                        code: query.code.clone(),
                        reason: UnresolvedReason::Ambiguous,
                        candidates: many.iter().map(|c| c.code_str().to_string()).collect(),
                    });
                }
            }
        }

        if !result.unresolved.is_empty() {
            tracing::warn!(
                "{} of {} courses could not be resolved in the registry",
                result.unresolved.len(),
                queries.len()
            );
        }

        result
    }
}

/// One-shot form of [`CourseMatcher::resolve`].
pub fn resolve(queries: &[CourseQuery], registry: &[CourseRecord]) -> MatchResult {
    CourseMatcher::new(registry).resolve(queries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(code: &str, name: &str) -> CourseRecord {
        CourseRecord {
            code: Some(code.to_string()),
            name: name.to_string(),
            description: String::new(),
            skills: vec![],
        }
    }

    fn matched_codes(result: &MatchResult) -> Vec<&str> {
        result.matched.iter().map(CourseRecord::code_str).collect()
    }

    #[test]
    fn test_partial_code_matches_unique_course() {
        let registry = vec![course("CS101", "Intro"), course("CS201", "Data Structures")];
        let result = resolve(&[CourseQuery::new("Intro", "CS1")], &registry);

        assert_eq!(matched_codes(&result), vec!["CS101"]);
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn test_multiple_candidates_are_ambiguous() {
        let registry = vec![course("CS101", "Intro"), course("CS102", "Intro II")];
        let result = resolve(&[CourseQuery::new("Intro", "CS10")], &registry);

        assert!(result.matched.is_empty());
        assert_eq!(result.unresolved.len(), 1);
        assert_eq!(result.unresolved[0].reason, UnresolvedReason::Ambiguous);
        assert_eq!(result.unresolved[0].candidates, vec!["CS101", "CS102"]);
    }

    #[test]
    fn test_unknown_code_is_not_found() {
        let registry = vec![course("CS101", "Intro"), course("MATH220", "Linear Algebra")];
        let result = resolve(&[CourseQuery::new("Physics", "PHYS")], &registry);

        assert!(result.matched.is_empty());
        assert_eq!(result.unresolved[0].reason, UnresolvedReason::NotFound);
        assert_eq!(result.unresolved[0].title, "Physics");
        assert!(result.unresolved[0].candidates.is_empty());
    }

    #[test]
    fn test_duplicate_registry_entries_are_ambiguous() {
        let registry = vec![course("CS101", "Intro"), course("CS101", "Intro (copy)")];
        let result = resolve(&[CourseQuery::new("Intro", "CS101")], &registry);

        assert!(result.matched.is_empty());
        assert_eq!(result.unresolved[0].reason, UnresolvedReason::Ambiguous);
    }

    #[test]
    fn test_registry_codes_uppercased_but_query_used_as_is() {
        let registry = vec![course("cs101", "Intro")];

        let upper = resolve(&[CourseQuery::new("Intro", "CS101")], &registry);
        assert_eq!(upper.matched.len(), 1);
        // 保留原始 code，不回寫大寫
        assert_eq!(upper.matched[0].code_str(), "cs101");

        let lower = resolve(&[CourseQuery::new("Intro", "cs101")], &registry);
        assert!(lower.matched.is_empty());
        assert_eq!(lower.unresolved[0].reason, UnresolvedReason::NotFound);
    }

    #[test]
    fn test_courses_without_code_never_match() {
        let mut no_code = course("", "Seminar");
        no_code.code = None;
        let registry = vec![no_code, course("", "Workshop"), course("ART100", "Drawing")];

        // 空字串 query 是所有 code 的子字串，但只有 ART100 在候選池中
        let result = resolve(&[CourseQuery::new("Anything", "")], &registry);
        assert_eq!(matched_codes(&result), vec!["ART100"]);
    }

    #[test]
    fn test_order_preserved_and_duplicates_kept() {
        let registry = vec![
            course("CS101", "Intro"),
            course("MATH220", "Linear Algebra"),
            course("ACC200", "Accounting"),
        ];
        let queries = vec![
            CourseQuery::new("Accounting", "ACC200"),
            CourseQuery::new("Missing", "BIO1"),
            CourseQuery::new("Intro", "CS101"),
            CourseQuery::new("Intro again", "CS101"),
            CourseQuery::new("Missing too", "CHEM"),
        ];

        let result = resolve(&queries, &registry);

        assert_eq!(matched_codes(&result), vec!["ACC200", "CS101", "CS101"]);
        let unresolved: Vec<&str> = result.unresolved.iter().map(|u| u.code.as_str()).collect();
        assert_eq!(unresolved, vec!["BIO1", "CHEM"]);
    }

    #[test]
    fn test_every_match_contains_query_code() {
        let registry = vec![
            course("CS101", "Intro"),
            course("cs305", "Compilers"),
            course("MATH101", "Calculus"),
            course("HIST210", "History"),
        ];
        let queries: Vec<CourseQuery> = ["CS1", "305", "MATH", "101", "H", "210", "XYZ"]
            .iter()
            .map(|code| CourseQuery::new("q", *code))
            .collect();

        let matcher = CourseMatcher::new(&registry);
        let result = matcher.resolve(&queries);

        assert_eq!(result.matched.len() + result.unresolved.len(), queries.len());
        for query in &queries {
            let hits = matcher.candidates(&query.code).len();
            let unresolved = result.unresolved.iter().find(|u| u.code == query.code);
            match hits {
                1 => assert!(unresolved.is_none()),
                0 => assert_eq!(unresolved.unwrap().reason, UnresolvedReason::NotFound),
                _ => assert_eq!(unresolved.unwrap().reason, UnresolvedReason::Ambiguous),
            }
        }
        for query in &queries {
            let single = matcher.resolve(std::slice::from_ref(query));
            let unique = matcher.candidates(&query.code).len() == 1;
            assert_eq!(single.matched.len(), usize::from(unique));
            for record in &single.matched {
                assert!(record.matchable_code().unwrap().contains(&query.code));
            }
        }
    }
}
