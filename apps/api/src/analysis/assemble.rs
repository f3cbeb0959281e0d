//! Builds the model input for an analysis from the session and the form
//! fields, or refuses with the warning the user should see.

use crate::analysis::{AnalysisKind, JobDescriptionUse};
use crate::documents::cover_letter::CoverLetter;
use crate::errors::AppError;
use crate::llm_client::ContentPart;
use crate::session::Session;

pub const RESUME_REQUIRED: &str = "Please upload your resume for this analysis.";
pub const RESUME_AND_JD_REQUIRED: &str =
    "Please upload your resume and provide the Job Description for this analysis.";
pub const JD_REQUIRED: &str = "Please provide the Job Description to identify skill gaps.";
pub const COVER_LETTER_REQUIRED: &str =
    "Please provide a Cover Letter (upload or paste) for analysis.";

/// Text typed into the page at the time of the click.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormInputs<'a> {
    pub job_description: &'a str,
    /// Pasted cover letter; wins over an uploaded text file when non-blank.
    pub cover_letter_text: &'a str,
}

/// Returns the ordered parts: prompt, resume pages, cover-letter pages,
/// then the optional trailing text.
pub fn build_parts(
    kind: AnalysisKind,
    session: &Session,
    form: FormInputs<'_>,
) -> Result<Vec<ContentPart>, AppError> {
    if kind == AnalysisKind::CoverLetter {
        return build_cover_letter_parts(session, form);
    }

    let resume = match &session.resume {
        Some(resume) => resume,
        None if kind.job_description_use() == JobDescriptionUse::Required => {
            return Err(AppError::MissingInput(RESUME_AND_JD_REQUIRED.to_string()))
        }
        None => return Err(AppError::MissingInput(RESUME_REQUIRED.to_string())),
    };

    let job_description = non_blank(form.job_description);
    let trailing_text = match kind.job_description_use() {
        JobDescriptionUse::Ignored => None,
        JobDescriptionUse::Optional => job_description,
        JobDescriptionUse::Required => Some(
            job_description.ok_or_else(|| AppError::MissingInput(JD_REQUIRED.to_string()))?,
        ),
    };

    let mut parts = Vec::with_capacity(resume.pages.len() + 2);
    parts.push(ContentPart::text(kind.prompt()));
    parts.extend(resume.pages.iter().map(ContentPart::from));
    if let Some(text) = trailing_text {
        parts.push(ContentPart::text(text));
    }
    Ok(parts)
}

fn build_cover_letter_parts(
    session: &Session,
    form: FormInputs<'_>,
) -> Result<Vec<ContentPart>, AppError> {
    let pasted = non_blank(form.cover_letter_text);
    let uploaded = session.cover_letter.as_ref();

    let (letter_text, letter_pages) = match (pasted, uploaded) {
        (Some(text), _) => (text, &[][..]),
        (None, Some(CoverLetter::Text { text, .. })) => (text.as_str(), &[][..]),
        (None, Some(CoverLetter::Pages { pages, .. })) => ("", pages.as_slice()),
        (None, None) => return Err(AppError::MissingInput(COVER_LETTER_REQUIRED.to_string())),
    };

    let resume_pages = session.resume.as_ref().map_or(&[][..], |r| r.pages.as_slice());

    let mut parts = Vec::with_capacity(resume_pages.len() + letter_pages.len() + 2);
    parts.push(ContentPart::text(AnalysisKind::CoverLetter.prompt()));
    parts.extend(resume_pages.iter().map(ContentPart::from));
    parts.extend(letter_pages.iter().map(ContentPart::from));
    parts.push(ContentPart::text(format!(
        "Job Description: {}\n\nCover Letter: {}",
        form.job_description, letter_text
    )));
    Ok(parts)
}

fn non_blank(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::PageImage;
    use crate::session::{ResumeDocument, SessionStore};
    use bytes::Bytes;

    async fn session(resume_pages: usize, cover_letter: Option<CoverLetter>) -> Session {
        let mut session = SessionStore::new(60).create().await;
        if resume_pages > 0 {
            session.resume = Some(ResumeDocument {
                file_name: "cv.pdf".to_string(),
                pages: (0..resume_pages)
                    .map(|i| PageImage::jpeg(Bytes::from(format!("resume-{i}"))))
                    .collect(),
            });
        }
        session.cover_letter = cover_letter;
        session
    }

    fn texts(parts: &[ContentPart]) -> Vec<&str> {
        parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    fn missing_input(result: Result<Vec<ContentPart>, AppError>) -> String {
        match result {
            Err(AppError::MissingInput(msg)) => msg,
            other => panic!("expected missing input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resume_analyses_refused_without_resume() {
        let s = session(0, None).await;
        let form = FormInputs {
            job_description: "Rust engineer",
            ..Default::default()
        };
        for kind in [
            AnalysisKind::OverallEvaluation,
            AnalysisKind::PercentageMatch,
            AnalysisKind::Formatting,
            AnalysisKind::QuantifiableAchievements,
            AnalysisKind::ActionVerbs,
        ] {
            assert_eq!(missing_input(build_parts(kind, &s, form)), RESUME_REQUIRED);
        }
        assert_eq!(
            missing_input(build_parts(AnalysisKind::SkillGap, &s, form)),
            RESUME_AND_JD_REQUIRED
        );
    }

    #[tokio::test]
    async fn test_overall_evaluation_layout() {
        let s = session(2, None).await;
        let form = FormInputs {
            job_description: "Rust engineer",
            ..Default::default()
        };
        let parts = build_parts(AnalysisKind::OverallEvaluation, &s, form).unwrap();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], ContentPart::text(AnalysisKind::OverallEvaluation.prompt()));
        assert!(parts[1].is_image() && parts[2].is_image());
        assert_eq!(parts[3], ContentPart::text("Rust engineer"));
    }

    #[tokio::test]
    async fn test_blank_job_description_is_not_sent() {
        let s = session(1, None).await;
        let form = FormInputs {
            job_description: "   \n",
            ..Default::default()
        };
        let parts = build_parts(AnalysisKind::PercentageMatch, &s, form).unwrap();
        assert_eq!(parts.len(), 2);
    }

    #[tokio::test]
    async fn test_formatting_ignores_job_description() {
        let s = session(1, None).await;
        let form = FormInputs {
            job_description: "Rust engineer",
            ..Default::default()
        };
        for kind in [AnalysisKind::Formatting, AnalysisKind::ActionVerbs] {
            let parts = build_parts(kind, &s, form).unwrap();
            assert_eq!(texts(&parts), vec![kind.prompt()]);
        }
    }

    #[tokio::test]
    async fn test_skill_gap_requires_job_description() {
        let s = session(1, None).await;
        assert_eq!(
            missing_input(build_parts(AnalysisKind::SkillGap, &s, FormInputs::default())),
            JD_REQUIRED
        );
        let form = FormInputs {
            job_description: "Kubernetes, Go",
            ..Default::default()
        };
        let parts = build_parts(AnalysisKind::SkillGap, &s, form).unwrap();
        assert_eq!(texts(&parts).last(), Some(&"Kubernetes, Go"));
    }

    #[tokio::test]
    async fn test_cover_letter_requires_some_letter() {
        let s = session(1, None).await;
        assert_eq!(
            missing_input(build_parts(AnalysisKind::CoverLetter, &s, FormInputs::default())),
            COVER_LETTER_REQUIRED
        );
    }

    #[tokio::test]
    async fn test_cover_letter_without_resume_uses_pasted_text() {
        let s = session(0, None).await;
        let form = FormInputs {
            job_description: "Data Scientist",
            cover_letter_text: "Dear team",
        };
        let parts = build_parts(AnalysisKind::CoverLetter, &s, form).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            ContentPart::text("Job Description: Data Scientist\n\nCover Letter: Dear team")
        );
    }

    #[tokio::test]
    async fn test_pasted_text_wins_over_uploaded_text() {
        let uploaded = CoverLetter::Text {
            file_name: "letter.txt".to_string(),
            text: "uploaded".to_string(),
        };
        let s = session(1, Some(uploaded)).await;
        let form = FormInputs {
            job_description: "JD",
            cover_letter_text: "pasted",
        };
        let parts = build_parts(AnalysisKind::CoverLetter, &s, form).unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(
            texts(&parts).last(),
            Some(&"Job Description: JD\n\nCover Letter: pasted")
        );

        let form = FormInputs {
            job_description: "JD",
            cover_letter_text: "",
        };
        let parts = build_parts(AnalysisKind::CoverLetter, &s, form).unwrap();
        assert_eq!(
            texts(&parts).last(),
            Some(&"Job Description: JD\n\nCover Letter: uploaded")
        );
    }

    #[tokio::test]
    async fn test_scanned_cover_letter_pages_follow_resume_pages() {
        let scanned = CoverLetter::Pages {
            file_name: "scan.pdf".to_string(),
            pages: vec![PageImage::jpeg(Bytes::from_static(b"letter-0"))],
        };
        let s = session(2, Some(scanned)).await;
        let parts = build_parts(AnalysisKind::CoverLetter, &s, FormInputs::default()).unwrap();
        assert_eq!(parts.len(), 5);
        match &parts[3] {
            ContentPart::InlineData { data, .. } => assert_eq!(&data[..], b"letter-0"),
            other => panic!("expected cover letter page, got {other:?}"),
        }
    }
}
