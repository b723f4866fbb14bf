//! # Document Assembler
//!
//! Lays a chronological set of captured frames onto a multi-page PDF, one
//! image per page. Page orientation follows the image's aspect ratio, the
//! image is uniformly scaled to fit the content area and centered, and a
//! timestamp caption sits underneath. The finished document is written
//! atomically: rendered into a temp file next to the destination, then
//! persisted over it.
//!
//! Any unreadable image or filename without a timestamp aborts the whole
//! document; there is no per-frame skip-and-continue.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{BuiltinFont, Image, ImageTransform, Mm, PdfDocument};
use tempfile::NamedTempFile;

use crate::capture::CapturedFrame;
use crate::error::{Result, ShotlogError};

/// A4 side lengths in millimetres; pages flip between the two orientations.
const PAGE_SHORT_MM: f64 = 210.0;
const PAGE_LONG_MM: f64 = 297.0;
/// Outer margin on every page edge.
const MARGIN_MM: f64 = 10.0;
/// Vertical band under the image reserved for the caption line.
const CAPTION_RESERVE_MM: f64 = 10.0;
/// Caption baseline sits this far below the image's bottom edge.
const CAPTION_GAP_MM: f64 = 5.0;
const CAPTION_FONT_PT: f64 = 10.0;
/// Pixels map to millimetres 1:1 before scaling (25.4 px per inch).
const PIXEL_DPI: f64 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Geometry for placing one image and its caption on its own page.
///
/// All distances are millimetres. `image_x`/`image_y` locate the scaled
/// image's lower-left corner from the page's lower-left corner (PDF
/// coordinates grow upward).
#[derive(Debug, Clone, Copy)]
pub struct PageLayout {
    pub orientation: Orientation,
    pub page_w: f64,
    pub page_h: f64,
    pub image_x: f64,
    pub image_y: f64,
    pub image_w: f64,
    pub image_h: f64,
    pub scale: f64,
    pub caption_y: f64,
}

impl PageLayout {
    /// Compute the page for an image of the given pixel dimensions.
    ///
    /// Landscape iff the image is wider than tall. The uniform scale is
    /// `min(contentW/w, contentH/h)` and may exceed 1.0: small images are
    /// blown up to fit rather than left at native size.
    pub fn compute(width_px: u32, height_px: u32) -> Self {
        let (w, h) = (f64::from(width_px), f64::from(height_px));
        let orientation = if width_px > height_px {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        let (page_w, page_h) = match orientation {
            Orientation::Landscape => (PAGE_LONG_MM, PAGE_SHORT_MM),
            Orientation::Portrait => (PAGE_SHORT_MM, PAGE_LONG_MM),
        };

        let content_w = page_w - 2.0 * MARGIN_MM;
        let content_h = page_h - 2.0 * MARGIN_MM - CAPTION_RESERVE_MM;
        let scale = (content_w / w).min(content_h / h);
        let image_w = w * scale;
        let image_h = h * scale;
        let image_x = MARGIN_MM + (content_w - image_w) / 2.0;
        let image_y = page_h - MARGIN_MM - image_h;

        Self {
            orientation,
            page_w,
            page_h,
            image_x,
            image_y,
            image_w,
            image_h,
            scale,
            caption_y: image_y - CAPTION_GAP_MM,
        }
    }

    /// Left edge of a caption of `text_w` millimetres, centered under the image.
    fn caption_x(&self, text_w: f64) -> f64 {
        self.image_x + (self.image_w - text_w) / 2.0
    }
}

/// What [`assemble`] produced.
#[derive(Debug)]
pub struct DocumentSummary {
    pub path: PathBuf,
    pub pages: usize,
}

/// Lay every frame onto its own page and write the PDF atomically to `dest`.
///
/// Input paths may arrive in any order; pages follow the capture timestamps
/// parsed from the filenames. Empty input, an unreadable image, or a filename
/// without a timestamp is an error and no document is written.
pub fn assemble(paths: &[PathBuf], dest: &Path) -> Result<DocumentSummary> {
    if paths.is_empty() {
        return Err(ShotlogError::EmptyDocument);
    }

    let mut frames = paths
        .iter()
        .map(|p| CapturedFrame::from_path(p))
        .collect::<Result<Vec<_>>>()?;
    frames.sort_by_key(|f| f.timestamp);

    // The document starts with its first page, so the first frame seeds it
    // and the rest add pages.
    let first_layout = layout_for(&frames[0])?;
    let (doc, page, layer) = PdfDocument::new(
        "Screenshots",
        Mm(first_layout.page_w),
        Mm(first_layout.page_h),
        "Page 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ShotlogError::Pdf(e.to_string()))?;

    place(&doc.get_page(page).get_layer(layer), &frames[0], first_layout, &font)?;
    for (idx, frame) in frames.iter().enumerate().skip(1) {
        let layout = layout_for(frame)?;
        let (page, layer) = doc.add_page(
            Mm(layout.page_w),
            Mm(layout.page_h),
            format!("Page {}", idx + 1),
        );
        place(&doc.get_page(page).get_layer(layer), frame, layout, &font)?;
    }

    let pages = frames.len();
    write_atomic(doc, dest)?;
    Ok(DocumentSummary {
        path: dest.to_path_buf(),
        pages,
    })
}

fn layout_for(frame: &CapturedFrame) -> Result<PageLayout> {
    let (w, h) = image::image_dimensions(&frame.path)?;
    Ok(PageLayout::compute(w, h))
}

/// Draw one frame and its caption onto `layer`.
fn place(
    layer: &printpdf::PdfLayerReference,
    frame: &CapturedFrame,
    layout: PageLayout,
    font: &printpdf::IndirectFontRef,
) -> Result<()> {
    let decoded = printpdf::image_crate::open(&frame.path).map_err(|e| ShotlogError::Decode {
        path: frame.path.clone(),
        reason: e.to_string(),
    })?;
    let image = Image::from_dynamic_image(&decoded);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(layout.image_x)),
            translate_y: Some(Mm(layout.image_y)),
            scale_x: Some(layout.scale),
            scale_y: Some(layout.scale),
            dpi: Some(PIXEL_DPI),
            ..Default::default()
        },
    );

    let caption = frame.caption();
    let x = layout.caption_x(text_width_mm(&caption, CAPTION_FONT_PT));
    layer.use_text(caption, CAPTION_FONT_PT, Mm(x), Mm(layout.caption_y), font);
    Ok(())
}

/// Approximate advance width of Helvetica text; close enough to center a
/// caption of known shape.
fn text_width_mm(text: &str, font_pt: f64) -> f64 {
    const PT_TO_MM: f64 = 0.352_778;
    text.chars().count() as f64 * font_pt * 0.5 * PT_TO_MM
}

/// Render into a temp file in the destination directory, then persist.
fn write_atomic(doc: printpdf::PdfDocumentReference, dest: &Path) -> Result<()> {
    let dir = match dest.parent() {
        Some(parent) if parent != Path::new("") => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        doc.save(&mut writer)
            .map_err(|e| ShotlogError::Pdf(e.to_string()))?;
    }
    tmp.persist(dest).map_err(|e| ShotlogError::Io(e.error))?;
    Ok(())
}
