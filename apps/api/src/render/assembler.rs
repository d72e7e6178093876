//! Document Assembler — lays out a one-column resume top to bottom.
//!
//! Layout (millimetres, A4):
//! - header: centered name (Times-Bold 22) and contact line (Times-Roman 10)
//! - optional QR code for the video pitch, pinned top-right with a linked caption
//! - sections in [`SectionKind::ORDER`], each skipped when its body is empty:
//!   upper-cased title, full-width rule, justified body, trailing gap
//!
//! Pagination is automatic at a 15 mm bottom margin.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::models::resume::{Profile, ResumeSections, SectionKind};
use crate::render::font_metrics::FontFace;
use crate::render::pdf::{Align, PdfCanvas, MARGIN_MM, PAGE_WIDTH_MM};
use crate::render::sanitize::sanitize;
use crate::render::{qr, RenderError, RenderedDocument};

const BOTTOM_MARGIN_MM: f32 = 15.0;

const NAME_SIZE_PT: f32 = 22.0;
const NAME_HEIGHT_MM: f32 = 10.0;
const CONTACT_SIZE_PT: f32 = 10.0;
const CONTACT_HEIGHT_MM: f32 = 5.0;
const HEADER_GAP_MM: f32 = 8.0;

const QR_X_MM: f32 = 170.0;
const QR_Y_MM: f32 = 10.0;
const QR_SIZE_MM: f32 = 22.0;
const CAPTION_Y_MM: f32 = 32.0;
const CAPTION_HEIGHT_MM: f32 = 4.0;
const CAPTION_SIZE_PT: f32 = 7.0;
const CAPTION_TEXT: &str = "Video Intro";

const TITLE_SIZE_PT: f32 = 12.0;
const TITLE_HEIGHT_MM: f32 = 6.0;
const RULE_GAP_MM: f32 = 2.0;
const BODY_SIZE_PT: f32 = 10.5;
const BODY_LINE_HEIGHT_MM: f32 = 5.0;
const SECTION_GAP_MM: f32 = 4.0;

/// Builds resume PDFs. Holds only the directory used for the scoped QR image
/// file, so one instance can serve every request.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    scratch_dir: PathBuf,
}

impl DocumentAssembler {
    pub fn new(scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    /// Renders the resume. `experience` is the final (possibly user-edited)
    /// rewritten text; `video_url`, when non-empty, adds the QR block. The URL
    /// is encoded exactly as given.
    ///
    /// Either a complete document is returned or an error; never a partial file.
    pub fn assemble(
        &self,
        profile: &Profile,
        sections: &ResumeSections,
        experience: &str,
        video_url: Option<&str>,
    ) -> Result<RenderedDocument, RenderError> {
        let canvas = self.compose(profile, sections, experience, video_url)?;
        let page_count = canvas.page_count();
        let bytes = canvas.finish()?;

        debug!("Assembled resume: {} page(s), {} bytes", page_count, bytes.len());
        Ok(RenderedDocument { bytes, page_count })
    }

    pub(crate) fn compose(
        &self,
        profile: &Profile,
        sections: &ResumeSections,
        experience: &str,
        video_url: Option<&str>,
    ) -> Result<PdfCanvas, RenderError> {
        let mut canvas = PdfCanvas::new(BOTTOM_MARGIN_MM);

        canvas.set_font(FontFace::Bold, NAME_SIZE_PT);
        canvas.cell(0.0, NAME_HEIGHT_MM, &sanitize(profile.name.as_str()), Align::Center, true, None);
        canvas.set_font(FontFace::Regular, CONTACT_SIZE_PT);
        canvas.cell(
            0.0,
            CONTACT_HEIGHT_MM,
            &sanitize(profile.contact.as_str()),
            Align::Center,
            true,
            None,
        );

        if let Some(url) = video_url.filter(|url| !url.is_empty()) {
            self.embed_video_qr(&mut canvas, url)?;
        }

        canvas.ln(HEADER_GAP_MM);

        for kind in SectionKind::ORDER {
            if let Some(body) = sections
                .body(kind, experience)
                .filter(|body| !body.is_empty())
            {
                add_section(&mut canvas, kind.title(), body);
            }
        }

        Ok(canvas)
    }

    fn embed_video_qr(&self, canvas: &mut PdfCanvas, url: &str) -> Result<(), RenderError> {
        let image = qr::render_qr(url)?;
        let staged = qr::stage_png(&image, &self.scratch_dir)?;
        // An early return here drops `staged`, which deletes the file.
        let raster = qr::load_raster(staged.path())?;
        staged.close()?;

        canvas.image(raster, QR_X_MM, QR_Y_MM, QR_SIZE_MM);
        canvas.set_xy(QR_X_MM, CAPTION_Y_MM);
        canvas.set_font(FontFace::Italic, CAPTION_SIZE_PT);
        canvas.cell(
            QR_SIZE_MM,
            CAPTION_HEIGHT_MM,
            CAPTION_TEXT,
            Align::Center,
            false,
            Some(url),
        );
        Ok(())
    }
}

fn add_section(canvas: &mut PdfCanvas, title: &str, body: &str) {
    canvas.set_font(FontFace::Bold, TITLE_SIZE_PT);
    canvas.cell(0.0, TITLE_HEIGHT_MM, &title.to_uppercase(), Align::Left, true, None);

    let y = canvas.y();
    canvas.line(MARGIN_MM, y, PAGE_WIDTH_MM - MARGIN_MM, y);
    canvas.ln(RULE_GAP_MM);

    canvas.set_font(FontFace::Regular, BODY_SIZE_PT);
    canvas.multi_cell(0.0, BODY_LINE_HEIGHT_MM, &sanitize(body));
    canvas.ln(SECTION_GAP_MM);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTION_TITLES: [&str; 5] = [
        "EDUCATION",
        "TECHNICAL SKILLS",
        "PROFESSIONAL EXPERIENCE",
        "VOLUNTEERING & SOCIAL WORK",
        "AWARDS & GRANTS",
    ];

    fn profile() -> Profile {
        Profile {
            name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            contact: "London | +44 7700 900000".to_string(),
            video_url: None,
        }
    }

    fn full_sections() -> ResumeSections {
        ResumeSections {
            education: Some("Harvard University, B.A. Economics (2024)".to_string()),
            skills: Some("Python, Policy Analysis, Data Visualization".to_string()),
            awards: Some("Fulbright Scholar, Dean's List".to_string()),
            volunteering: Some("Community Organizer, Flood Relief Drive".to_string()),
        }
    }

    fn scratch_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    fn all_text_runs(canvas: &PdfCanvas) -> Vec<String> {
        canvas.pages().iter().flat_map(|p| p.text_runs()).collect()
    }

    fn titles_in_order(canvas: &PdfCanvas) -> Vec<String> {
        all_text_runs(canvas)
            .into_iter()
            .filter(|run| SECTION_TITLES.contains(&run.as_str()))
            .collect()
    }

    #[test]
    fn test_empty_sections_render_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());

        let canvas = assembler
            .compose(&profile(), &ResumeSections::default(), "", None)
            .unwrap();
        assert_eq!(
            all_text_runs(&canvas),
            vec!["Jane Doe".to_string(), "London | +44 7700 900000".to_string()]
        );

        let document = assembler
            .assemble(&profile(), &ResumeSections::default(), "", None)
            .unwrap();
        assert_eq!(document.page_count, 1);
        let parsed = lopdf::Document::load_mem(&document.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), 1);
    }

    #[test]
    fn test_video_url_grows_document_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let sections = full_sections();

        let without = assembler
            .assemble(&profile(), &sections, "- Led team", None)
            .unwrap();
        let with = assembler
            .assemble(
                &profile(),
                &sections,
                "- Led team",
                Some("https://youtube.com/watch?v=pitch"),
            )
            .unwrap();

        assert!(with.bytes.len() > without.bytes.len());
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[test]
    fn test_empty_video_url_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());

        let none = assembler
            .assemble(&profile(), &ResumeSections::default(), "", None)
            .unwrap();
        let empty = assembler
            .assemble(&profile(), &ResumeSections::default(), "", Some(""))
            .unwrap();
        assert_eq!(none.bytes, empty.bytes);
    }

    #[test]
    fn test_whitespace_video_url_still_gets_qr_block() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());

        let canvas = assembler
            .compose(&profile(), &ResumeSections::default(), "", Some(" "))
            .unwrap();
        let page = &canvas.pages()[0];
        assert!(page.operations.iter().any(|op| op.operator == "Do"));
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].uri, " ");
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[test]
    fn test_video_url_is_linked_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());

        let canvas = assembler
            .compose(
                &profile(),
                &ResumeSections::default(),
                "",
                Some(" https://x.io/pitch "),
            )
            .unwrap();
        assert_eq!(canvas.pages()[0].links[0].uri, " https://x.io/pitch ");
    }

    #[test]
    fn test_unvalidated_url_still_gets_qr_block() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());

        let canvas = assembler
            .compose(
                &profile(),
                &ResumeSections::default(),
                "",
                Some("not-a-real-url-but-nonempty"),
            )
            .unwrap();
        let page = &canvas.pages()[0];
        assert!(page.operations.iter().any(|op| op.operator == "Do"));
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].uri, "not-a-real-url-but-nonempty");
        assert!(page.text_runs().contains(&CAPTION_TEXT.to_string()));
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[test]
    fn test_unencodable_url_fails_without_leaving_files() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let url = format!("https://example.com/{}", "a".repeat(4000));

        let result = assembler.assemble(&profile(), &full_sections(), "", Some(&url));
        assert!(matches!(result, Err(RenderError::Qr(_))));
        assert_eq!(scratch_entries(dir.path()), 0);
    }

    #[test]
    fn test_missing_scratch_dir_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path().join("missing"));

        let result = assembler.assemble(
            &profile(),
            &ResumeSections::default(),
            "",
            Some("https://example.com"),
        );
        assert!(matches!(result, Err(RenderError::Io(_))));
    }

    #[test]
    fn test_sections_print_in_fixed_order() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());

        let canvas = assembler
            .compose(&profile(), &full_sections(), "- Analyzed data", None)
            .unwrap();
        assert_eq!(titles_in_order(&canvas), SECTION_TITLES.to_vec());
    }

    #[test]
    fn test_order_holds_for_partial_population() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let sections = ResumeSections {
            awards: Some("Dean's List".to_string()),
            education: Some("MIT".to_string()),
            ..Default::default()
        };

        let canvas = assembler
            .compose(&profile(), &sections, "- Shipped", None)
            .unwrap();
        assert_eq!(
            titles_in_order(&canvas),
            vec!["EDUCATION", "PROFESSIONAL EXPERIENCE", "AWARDS & GRANTS"]
        );
    }

    #[test]
    fn test_empty_bodies_are_omitted() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let sections = ResumeSections {
            skills: Some(String::new()),
            ..Default::default()
        };

        let canvas = assembler.compose(&profile(), &sections, "", None).unwrap();
        assert!(titles_in_order(&canvas).is_empty());
    }

    #[test]
    fn test_whitespace_bodies_keep_their_section() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let sections = ResumeSections {
            skills: Some(" ".to_string()),
            ..Default::default()
        };

        let canvas = assembler.compose(&profile(), &sections, "\n", None).unwrap();
        assert_eq!(
            titles_in_order(&canvas),
            vec!["TECHNICAL SKILLS", "PROFESSIONAL EXPERIENCE"]
        );
    }

    #[test]
    fn test_header_and_body_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let profile = Profile {
            name: "José — Müller".to_string(),
            contact: "Café — London".to_string(),
            ..Default::default()
        };

        let canvas = assembler
            .compose(&profile, &ResumeSections::default(), "\u{2022} Led \u{201C}growth\u{201D} 🚀", None)
            .unwrap();
        let runs = all_text_runs(&canvas);
        assert_eq!(runs[0], "José - Müller");
        assert_eq!(runs[1], "Café - London");
        assert!(runs.contains(&"- Led \"growth\" ?".to_string()));
    }

    #[test]
    fn test_long_experience_paginates() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());
        let experience =
            "- Developed reporting pipelines that cut turnaround time for policy briefs\n".repeat(80);

        let document = assembler
            .assemble(&profile(), &full_sections(), &experience, None)
            .unwrap();
        assert!(document.page_count >= 2);
        let parsed = lopdf::Document::load_mem(&document.bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), document.page_count);
    }

    #[test]
    fn test_output_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = DocumentAssembler::new(dir.path());

        let first = assembler
            .assemble(&profile(), &full_sections(), "- Led", Some("https://example.com"))
            .unwrap();
        let second = assembler
            .assemble(&profile(), &full_sections(), "- Led", Some("https://example.com"))
            .unwrap();
        assert_eq!(first.bytes, second.bytes);
    }
}
