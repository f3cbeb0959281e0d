// Canned analyses. Each kind pairs one fixed prompt with an input policy;
// all judgement is delegated to the model.

pub mod assemble;
pub mod handlers;
pub mod prompts;

use serde::{Deserialize, Serialize};

use prompts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    OverallEvaluation,
    PercentageMatch,
    Formatting,
    QuantifiableAchievements,
    ActionVerbs,
    SkillGap,
    CoverLetter,
}

/// How the job description participates in an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobDescriptionUse {
    /// Never sent.
    Ignored,
    /// Sent when non-blank.
    Optional,
    /// The analysis is refused without one.
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisGroup {
    Resume,
    CoverLetter,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 7] = [
        AnalysisKind::OverallEvaluation,
        AnalysisKind::PercentageMatch,
        AnalysisKind::Formatting,
        AnalysisKind::QuantifiableAchievements,
        AnalysisKind::ActionVerbs,
        AnalysisKind::SkillGap,
        AnalysisKind::CoverLetter,
    ];

    pub fn prompt(self) -> &'static str {
        match self {
            AnalysisKind::OverallEvaluation => PROMPT_RESUME_EVAL,
            AnalysisKind::PercentageMatch => PROMPT_PERCENTAGE_MATCH,
            AnalysisKind::Formatting => PROMPT_FORMATTING_READABILITY,
            AnalysisKind::QuantifiableAchievements => PROMPT_QUANTIFIABLE_ACHIEVEMENTS,
            AnalysisKind::ActionVerbs => PROMPT_ACTION_VERBS,
            AnalysisKind::SkillGap => PROMPT_SKILL_GAP_ANALYSIS,
            AnalysisKind::CoverLetter => PROMPT_COVER_LETTER_ANALYSIS,
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            AnalysisKind::OverallEvaluation => "Overall Resume Evaluation",
            AnalysisKind::PercentageMatch => "Percentage Match & Keywords",
            AnalysisKind::Formatting => "Formatting & Readability",
            AnalysisKind::QuantifiableAchievements => "Quantifiable Achievements",
            AnalysisKind::ActionVerbs => "Action Verb Enhancement",
            AnalysisKind::SkillGap => "Skill Gap & Learning Path",
            AnalysisKind::CoverLetter => "Analyze Cover Letter",
        }
    }

    /// Heading shown above the model's reply.
    pub fn title(self) -> &'static str {
        match self {
            AnalysisKind::OverallEvaluation => "Resume Evaluation",
            AnalysisKind::PercentageMatch => "Percentage Match & Keywords",
            AnalysisKind::Formatting => "Formatting & Readability Analysis",
            AnalysisKind::QuantifiableAchievements => "Quantifiable Achievements Suggestions",
            AnalysisKind::ActionVerbs => "Action Verb Enhancement",
            AnalysisKind::SkillGap => "Skill Gap Analysis & Learning Paths",
            AnalysisKind::CoverLetter => "Cover Letter Analysis",
        }
    }

    pub fn progress_message(self) -> &'static str {
        match self {
            AnalysisKind::OverallEvaluation => "Analyzing resume...",
            AnalysisKind::PercentageMatch => "Calculating match percentage...",
            AnalysisKind::Formatting => "Analyzing formatting...",
            AnalysisKind::QuantifiableAchievements => "Suggesting quantifiable achievements...",
            AnalysisKind::ActionVerbs => "Improving action verbs...",
            AnalysisKind::SkillGap => "Identifying skill gaps...",
            AnalysisKind::CoverLetter => "Analyzing cover letter...",
        }
    }

    pub fn group(self) -> AnalysisGroup {
        match self {
            AnalysisKind::CoverLetter => AnalysisGroup::CoverLetter,
            _ => AnalysisGroup::Resume,
        }
    }

    /// Whether the analysis is refused without an uploaded resume.
    pub fn requires_resume(self) -> bool {
        self.group() == AnalysisGroup::Resume
    }

    pub fn job_description_use(self) -> JobDescriptionUse {
        match self {
            AnalysisKind::Formatting | AnalysisKind::ActionVerbs => JobDescriptionUse::Ignored,
            AnalysisKind::SkillGap => JobDescriptionUse::Required,
            _ => JobDescriptionUse::Optional,
        }
    }
}

/// Entry of `GET /api/v1/analyses`, used by the page to build its buttons.
#[derive(Debug, Serialize)]
pub struct AnalysisDescriptor {
    pub analysis: AnalysisKind,
    pub label: &'static str,
    pub title: &'static str,
    pub progress_message: &'static str,
    pub group: AnalysisGroup,
    pub requires_resume: bool,
    pub job_description: JobDescriptionUse,
}

pub fn catalogue() -> Vec<AnalysisDescriptor> {
    AnalysisKind::ALL
        .iter()
        .map(|&kind| AnalysisDescriptor {
            analysis: kind,
            label: kind.label(),
            title: kind.title(),
            progress_message: kind.progress_message(),
            group: kind.group(),
            requires_resume: kind.requires_resume(),
            job_description: kind.job_description_use(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_each_analysis_has_its_own_prompt() {
        let prompts: HashSet<&str> = AnalysisKind::ALL.iter().map(|k| k.prompt()).collect();
        assert_eq!(prompts.len(), AnalysisKind::ALL.len());
    }

    #[test]
    fn test_prompt_mapping() {
        assert_eq!(AnalysisKind::OverallEvaluation.prompt(), PROMPT_RESUME_EVAL);
        assert_eq!(AnalysisKind::PercentageMatch.prompt(), PROMPT_PERCENTAGE_MATCH);
        assert_eq!(AnalysisKind::Formatting.prompt(), PROMPT_FORMATTING_READABILITY);
        assert_eq!(
            AnalysisKind::QuantifiableAchievements.prompt(),
            PROMPT_QUANTIFIABLE_ACHIEVEMENTS
        );
        assert_eq!(AnalysisKind::ActionVerbs.prompt(), PROMPT_ACTION_VERBS);
        assert_eq!(AnalysisKind::SkillGap.prompt(), PROMPT_SKILL_GAP_ANALYSIS);
        assert_eq!(AnalysisKind::CoverLetter.prompt(), PROMPT_COVER_LETTER_ANALYSIS);
    }

    #[test]
    fn test_percentage_prompt_demands_fixed_format() {
        let prompt = AnalysisKind::PercentageMatch.prompt();
        for marker in ["PERCENTAGE_MATCH:", "MISSING_KEYWORDS:", "FINAL_THOUGHTS:"] {
            assert!(prompt.contains(marker), "missing {marker}");
        }
    }

    #[test]
    fn test_job_description_policies() {
        use JobDescriptionUse::*;
        assert_eq!(AnalysisKind::OverallEvaluation.job_description_use(), Optional);
        assert_eq!(AnalysisKind::Formatting.job_description_use(), Ignored);
        assert_eq!(AnalysisKind::ActionVerbs.job_description_use(), Ignored);
        assert_eq!(AnalysisKind::SkillGap.job_description_use(), Required);
        assert_eq!(AnalysisKind::CoverLetter.job_description_use(), Optional);
    }

    #[test]
    fn test_only_cover_letter_review_works_without_resume() {
        let without_resume: Vec<_> = AnalysisKind::ALL
            .iter()
            .filter(|k| !k.requires_resume())
            .collect();
        assert_eq!(without_resume, vec![&AnalysisKind::CoverLetter]);
    }

    #[test]
    fn test_wire_names() {
        let kind: AnalysisKind = serde_json::from_str("\"skill_gap\"").unwrap();
        assert_eq!(kind, AnalysisKind::SkillGap);
        assert_eq!(
            serde_json::to_string(&AnalysisKind::QuantifiableAchievements).unwrap(),
            "\"quantifiable_achievements\""
        );
        assert_eq!(catalogue().len(), 7);
    }
}
