//! A small cursor-based PDF canvas on top of `lopdf`.
//!
//! Coordinates are millimetres on an A4 page with the origin at the top-left
//! corner; they are flipped and scaled to PDF points only when operations are
//! emitted. The canvas tracks a cursor the way a typewriter does: cells advance
//! it, `ln` returns to the left margin, and a cell that would cross the
//! bottom trigger starts a new page first.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Object, ObjectId, Stream, StringFormat};

use crate::render::font_metrics::{get_metrics, FontFace};
use crate::render::wrap::wrap_text;
use crate::render::RenderError;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// Horizontal padding inside a cell for left-aligned text.
pub const CELL_MARGIN_MM: f32 = 1.0;
pub const LINE_WIDTH_MM: f32 = 0.2;

const PT_PER_MM: f32 = 72.0 / 25.4;

/// Horizontal text alignment inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A raster image ready to be embedded: 8-bit grayscale rows, top to bottom.
#[derive(Debug, Clone)]
pub struct GrayRaster {
    pub width_px: u32,
    pub height_px: u32,
    pub pixels: Vec<u8>,
}

/// Clickable rectangle on a page, in canvas millimetres.
#[derive(Debug, Clone)]
pub struct LinkArea {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub uri: String,
}

/// Content of one page before serialization.
#[derive(Debug, Default)]
pub struct CanvasPage {
    pub operations: Vec<Operation>,
    pub links: Vec<LinkArea>,
}

impl CanvasPage {
    /// Decoded strings of every `Tj` operation, in drawing order.
    pub fn text_runs(&self) -> Vec<String> {
        self.operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => {
                    Some(bytes.iter().map(|&b| b as char).collect())
                }
                _ => None,
            })
            .collect()
    }
}

pub struct PdfCanvas {
    pages: Vec<CanvasPage>,
    images: Vec<GrayRaster>,
    x: f32,
    y: f32,
    face: FontFace,
    font_size_pt: f32,
    page_break_trigger: f32,
}

impl PdfCanvas {
    /// Opens a canvas with one empty page. Content reaching within
    /// `bottom_margin_mm` of the page bottom flows onto a new page.
    pub fn new(bottom_margin_mm: f32) -> Self {
        let mut canvas = Self {
            pages: Vec::new(),
            images: Vec::new(),
            x: MARGIN_MM,
            y: MARGIN_MM,
            face: FontFace::Regular,
            font_size_pt: 12.0,
            page_break_trigger: PAGE_HEIGHT_MM - bottom_margin_mm,
        };
        canvas.add_page();
        canvas
    }

    pub fn add_page(&mut self) {
        let mut page = CanvasPage::default();
        page.operations.push(Operation::new(
            "w",
            vec![Object::Real(LINE_WIDTH_MM * PT_PER_MM)],
        ));
        self.pages.push(page);
        self.x = MARGIN_MM;
        self.y = MARGIN_MM;
    }

    pub fn pages(&self) -> &[CanvasPage] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn set_xy(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    pub fn set_font(&mut self, face: FontFace, size_pt: f32) {
        self.face = face;
        self.font_size_pt = size_pt;
    }

    /// Moves the cursor down by `h` and back to the left margin.
    pub fn ln(&mut self, h: f32) {
        self.x = MARGIN_MM;
        self.y += h;
    }

    fn font_size_mm(&self) -> f32 {
        self.font_size_pt / PT_PER_MM
    }

    /// Rendered width of `text` in the current font, in millimetres.
    pub fn string_width(&self, text: &str) -> f32 {
        get_metrics(self.face).measure_str(text) * self.font_size_mm()
    }

    /// Width of a cell declared with `w == 0`: from the cursor to the right margin.
    fn resolve_width(&self, w: f32) -> f32 {
        if w == 0.0 {
            PAGE_WIDTH_MM - MARGIN_MM - self.x
        } else {
            w
        }
    }

    fn break_if_needed(&mut self, h: f32) {
        if self.y + h > self.page_break_trigger {
            let x = self.x;
            self.add_page();
            self.x = x;
        }
    }

    /// Single-line cell. With `newline` the cursor moves below the cell to the
    /// left margin; otherwise it moves to the cell's right edge.
    pub fn cell(&mut self, w: f32, h: f32, text: &str, align: Align, newline: bool, link: Option<&str>) {
        let w = self.resolve_width(w);
        self.break_if_needed(h);
        self.put_text(w, h, text, align, 0.0);

        if let Some(uri) = link {
            let area = LinkArea {
                x: self.x,
                y: self.y,
                w,
                h,
                uri: uri.to_string(),
            };
            self.current_page().links.push(area);
        }

        if newline {
            self.ln(h);
        } else {
            self.x += w;
        }
    }

    /// Word-wrapped, justified block of text. Leaves the cursor at the left
    /// margin below the last line.
    pub fn multi_cell(&mut self, w: f32, h: f32, text: &str) {
        let w = self.resolve_width(w);
        let size_mm = self.font_size_mm();
        let inner_width = w - 2.0 * CELL_MARGIN_MM;
        let metrics = get_metrics(self.face);
        let start_x = self.x;

        for line in wrap_text(text, metrics, inner_width / size_mm) {
            let spaces = line.space_count();
            let word_spacing = if line.justify && spaces > 0 {
                ((inner_width - line.width_em * size_mm) / spaces as f32).max(0.0)
            } else {
                0.0
            };

            self.break_if_needed(h);
            self.put_text(w, h, &line.text, Align::Left, word_spacing);
            self.x = start_x;
            self.y += h;
        }

        self.x = MARGIN_MM;
    }

    /// Straight stroke between two canvas points.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let ops = vec![
            Operation::new("m", vec![pt_x(x1), pt_y(y1)]),
            Operation::new("l", vec![pt_x(x2), pt_y(y2)]),
            Operation::new("S", vec![]),
        ];
        self.current_page().operations.extend(ops);
    }

    /// Draws `raster` with its top-left corner at (`x`, `y`), scaled to width
    /// `w`; the height keeps the raster's aspect ratio.
    pub fn image(&mut self, raster: GrayRaster, x: f32, y: f32, w: f32) {
        let h = w * raster.height_px as f32 / raster.width_px.max(1) as f32;
        self.images.push(raster);
        let name = image_resource_name(self.images.len());

        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(w * PT_PER_MM),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(h * PT_PER_MM),
                    pt_x(x),
                    pt_y(y + h),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ];
        self.current_page().operations.extend(ops);
    }

    fn current_page(&mut self) -> &mut CanvasPage {
        if self.pages.is_empty() {
            self.add_page();
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn put_text(&mut self, w: f32, h: f32, text: &str, align: Align, word_spacing: f32) {
        if text.is_empty() {
            return;
        }
        let dx = match align {
            Align::Left => CELL_MARGIN_MM,
            Align::Center => (w - self.string_width(text)) / 2.0,
        };
        let baseline = self.y + 0.5 * h + 0.3 * self.font_size_mm();

        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(self.face.resource_name().as_bytes().to_vec()),
                    Object::Real(self.font_size_pt),
                ],
            ),
        ];
        if word_spacing > 0.0 {
            ops.push(Operation::new("Tw", vec![Object::Real(word_spacing * PT_PER_MM)]));
        }
        ops.push(Operation::new("Td", vec![pt_x(self.x + dx), pt_y(baseline)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(encode_text(text), StringFormat::Literal)],
        ));
        if word_spacing > 0.0 {
            ops.push(Operation::new("Tw", vec![Object::Integer(0)]));
        }
        ops.push(Operation::new("ET", vec![]));

        self.current_page().operations.extend(ops);
    }

    /// Serializes the canvas into PDF bytes.
    pub fn finish(self) -> Result<Vec<u8>, RenderError> {
        let mut document = lopdf::Document::with_version("1.4");
        let pages_id = document.new_object_id();

        let mut fonts = Dictionary::new();
        for face in FontFace::ALL {
            let font_id = document.add_object(Dictionary::from_iter(vec![
                ("Type", name("Font")),
                ("Subtype", name("Type1")),
                ("BaseFont", name(face.base_font())),
                ("Encoding", name("WinAnsiEncoding")),
            ]));
            fonts.set(face.resource_name(), Object::Reference(font_id));
        }

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        if !self.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (index, raster) in self.images.into_iter().enumerate() {
                let image_id = document.add_object(image_stream(raster));
                xobjects.set(image_resource_name(index + 1), Object::Reference(image_id));
            }
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        let resources_id = document.add_object(resources);

        let page_count = self.pages.len();
        let mut kids = Vec::with_capacity(page_count);
        for page in self.pages {
            let content = Content {
                operations: page.operations,
            }
            .encode()
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
            let content_id = document.add_object(Stream::new(Dictionary::new(), content));

            let mut page_dictionary = Dictionary::from_iter(vec![
                ("Type", name("Page")),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(PAGE_WIDTH_MM * PT_PER_MM),
                        Object::Real(PAGE_HEIGHT_MM * PT_PER_MM),
                    ]),
                ),
                ("Resources", Object::Reference(resources_id)),
                ("Contents", Object::Reference(content_id)),
            ]);

            if !page.links.is_empty() {
                let annotations: Vec<Object> = page
                    .links
                    .iter()
                    .map(|link| Object::Reference(add_link_annotation(&mut document, link)))
                    .collect();
                page_dictionary.set("Annots", Object::Array(annotations));
            }

            kids.push(Object::Reference(document.add_object(page_dictionary)));
        }

        document.objects.insert(
            pages_id,
            Object::Dictionary(Dictionary::from_iter(vec![
                ("Type", name("Pages")),
                ("Kids", Object::Array(kids)),
                ("Count", Object::Integer(page_count as i64)),
            ])),
        );

        let catalog_id = document.add_object(Dictionary::from_iter(vec![
            ("Type", name("Catalog")),
            ("Pages", Object::Reference(pages_id)),
        ]));
        let info_id = document.add_object(Dictionary::from_iter(vec![
            ("Title", literal("Resume")),
            ("Producer", literal(env!("CARGO_PKG_NAME"))),
        ]));
        document.trailer.set("Root", Object::Reference(catalog_id));
        document.trailer.set("Info", Object::Reference(info_id));

        document.compress();

        let mut bytes = Vec::new();
        document
            .save_to(&mut bytes)
            .map_err(|e| RenderError::Pdf(e.to_string()))?;
        Ok(bytes)
    }
}

/// Encodes text as single-byte Latin-1 for a WinAnsi font.
///
/// Tabs become spaces; other control characters and anything above 0xFF
/// become `?`.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x09 => b' ',
            0x00..=0x1F | 0x7F..=0x9F => b'?',
            code @ 0x20..=0xFF => code as u8,
            _ => b'?',
        })
        .collect()
}

fn add_link_annotation(document: &mut lopdf::Document, link: &LinkArea) -> ObjectId {
    let action = Dictionary::from_iter(vec![
        ("S", name("URI")),
        ("URI", Object::String(link.uri.as_bytes().to_vec(), StringFormat::Literal)),
    ]);
    document.add_object(Dictionary::from_iter(vec![
        ("Type", name("Annot")),
        ("Subtype", name("Link")),
        (
            "Rect",
            Object::Array(vec![
                pt_x(link.x),
                pt_y(link.y + link.h),
                pt_x(link.x + link.w),
                pt_y(link.y),
            ]),
        ),
        (
            "Border",
            Object::Array(vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)]),
        ),
        ("A", Object::Dictionary(action)),
    ]))
}

fn image_stream(raster: GrayRaster) -> Stream {
    let dictionary = Dictionary::from_iter(vec![
        ("Type", name("XObject")),
        ("Subtype", name("Image")),
        ("Width", Object::Integer(raster.width_px as i64)),
        ("Height", Object::Integer(raster.height_px as i64)),
        ("ColorSpace", name("DeviceGray")),
        ("BitsPerComponent", Object::Integer(8)),
    ]);
    Stream::new(dictionary, raster.pixels)
}

fn image_resource_name(index: usize) -> String {
    format!("Im{index}")
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

fn literal(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

fn pt_x(x_mm: f32) -> Object {
    Object::Real(x_mm * PT_PER_MM)
}

fn pt_y(y_mm: f32) -> Object {
    Object::Real((PAGE_HEIGHT_MM - y_mm) * PT_PER_MM)
}
