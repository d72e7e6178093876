use serde::{Deserialize, Serialize};

/// Who the resume is for. Only `email` is required, and only to generate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Free-text contact line, e.g. "London | +44 7700 900000".
    #[serde(default)]
    pub contact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// Independently optional free-text resume blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSections {
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
    #[serde(default)]
    pub awards: Option<String>,
    #[serde(default)]
    pub volunteering: Option<String>,
}

/// Resume sections in the order they are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Education,
    TechnicalSkills,
    ProfessionalExperience,
    Volunteering,
    Awards,
}

impl SectionKind {
    /// Print order, tuned for early-career applicants: education first.
    pub const ORDER: [SectionKind; 5] = [
        SectionKind::Education,
        SectionKind::TechnicalSkills,
        SectionKind::ProfessionalExperience,
        SectionKind::Volunteering,
        SectionKind::Awards,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Education => "Education",
            SectionKind::TechnicalSkills => "Technical Skills",
            SectionKind::ProfessionalExperience => "Professional Experience",
            SectionKind::Volunteering => "Volunteering & Social Work",
            SectionKind::Awards => "Awards & Grants",
        }
    }
}

impl ResumeSections {
    /// Body for `kind`. Experience is not part of the static sections; it is
    /// the rewritten draft passed in by the caller.
    pub fn body<'a>(&'a self, kind: SectionKind, experience: &'a str) -> Option<&'a str> {
        match kind {
            SectionKind::Education => self.education.as_deref(),
            SectionKind::TechnicalSkills => self.skills.as_deref(),
            SectionKind::ProfessionalExperience => Some(experience),
            SectionKind::Volunteering => self.volunteering.as_deref(),
            SectionKind::Awards => self.awards.as_deref(),
        }
    }
}
