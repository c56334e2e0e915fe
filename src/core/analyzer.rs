use crate::core::{aggregator, matcher, selector};
use crate::domain::model::{
    CourseQuery, CourseRecord, InterestSelection, MatchResult, SkillMap, SkillPathway,
    SkillProfile,
};
use crate::domain::ports::{NarrativeGenerator, RegistrySource};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::time::Instant;

/// Outcome of resolve → aggregate → select for one query list.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub matches: MatchResult,
    pub skills: SkillMap,
    pub selection: InterestSelection,
}

impl Analysis {
    pub fn into_profile(self) -> SkillProfile {
        let course_ids = self
            .matches
            .matched
            .iter()
            .map(|course| course.code_str().to_string())
            .collect();

        SkillProfile {
            skills: self.skills,
            selection: self.selection,
            course_ids,
            unresolved: self.matches.unresolved,
            summary: None,
            pathways: Vec::new(),
            analyzed_at: chrono::Utc::now(),
        }
    }

    /// Names of the selected skills, without repeats, in selection order.
    pub fn selected_skill_names(&self) -> Vec<String> {
        self.selection
            .distinct_ids()
            .into_iter()
            .filter_map(|id| self.skills.get(id))
            .map(|record| record.name.clone())
            .collect()
    }
}

/// Pure, synchronous core: no I/O, no shared state.
pub fn analyze(queries: &[CourseQuery], registry: &[CourseRecord]) -> Analysis {
    let matches = matcher::resolve(queries, registry);
    let mut skills = aggregator::aggregate(&matches.matched);
    let selection = selector::select(&mut skills);

    tracing::info!(
        "Highest count skill: {:?}, highest level skill: {:?}, most unique skill: {:?}",
        selection.most_common_skill_id,
        selection.highest_average_level_skill_id,
        selection.rarest_skill_id
    );

    Analysis {
        matches,
        skills,
        selection,
    }
}

pub struct SkillAnalyzer<R: RegistrySource> {
    registry: R,
    narrative: Option<Box<dyn NarrativeGenerator>>,
    monitor: SystemMonitor,
}

impl<R: RegistrySource> SkillAnalyzer<R> {
    pub fn new(registry: R) -> Self {
        Self::new_with_monitoring(registry, false)
    }

    pub fn new_with_monitoring(registry: R, monitor_enabled: bool) -> Self {
        Self {
            registry,
            narrative: None,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn with_narrative<N: NarrativeGenerator + 'static>(mut self, narrative: N) -> Self {
        self.narrative = Some(Box::new(narrative));
        self
    }

    pub fn with_optional_narrative<N: NarrativeGenerator + 'static>(
        self,
        narrative: Option<N>,
    ) -> Self {
        match narrative {
            Some(narrative) => self.with_narrative(narrative),
            None => self,
        }
    }

    /// Runs one full invocation. Registry failures abort before any matching.
    pub async fn run(&self, queries: &[CourseQuery]) -> Result<SkillProfile> {
        let started = Instant::now();

        tracing::info!("Loading registry from {}", self.registry.location());
        let registry = self.registry.load().await?;
        tracing::info!("Loaded {} registry courses", registry.len());
        self.monitor.log_stats("load");

        let analysis = analyze(queries, &registry);
        tracing::info!(
            "Matched {} of {} courses into {} skills",
            analysis.matches.matched.len(),
            queries.len(),
            analysis.skills.len()
        );
        self.monitor.log_stats("analyze");

        let profile = match &self.narrative {
            Some(narrative) => {
                let profile = enrich(narrative.as_ref(), analysis).await;
                self.monitor.log_stats("narrative");
                profile
            }
            None => analysis.into_profile(),
        };
        self.monitor.log_final_stats();

        tracing::info!(
            "Skill profile completed in {:.3} ms",
            started.elapsed().as_secs_f64() * 1000.0
        );
        Ok(profile)
    }
}

/// 旁述文字失敗不影響結果，只省略對應欄位
async fn enrich(narrative: &dyn NarrativeGenerator, analysis: Analysis) -> SkillProfile {
    if analysis.selection.is_empty() {
        tracing::info!("No skills selected, skipping narrative enrichment");
        return analysis.into_profile();
    }

    let mut pathways = Vec::new();
    for skill_id in analysis.selection.distinct_ids() {
        let Some(record) = analysis.skills.get(skill_id) else {
            continue;
        };
        match narrative.skill_pathway(&record.name).await {
            Ok(pathway) => pathways.push(SkillPathway {
                skill_id: skill_id.to_string(),
                skill_name: record.name.clone(),
                pathway,
            }),
            Err(e) => tracing::warn!("Pathway for {} unavailable: {}", skill_id, e),
        }
    }

    let summary = match narrative
        .summary(&analysis.selected_skill_names(), &analysis.matches.matched)
        .await
    {
        Ok(summary) => Some(summary),
        Err(e) => {
            tracing::warn!("Summary unavailable: {}", e);
            None
        }
    };

    let mut profile = analysis.into_profile();
    profile.pathways = pathways;
    profile.summary = summary;
    profile
}
