//! A small page model serialized with `pdf-writer`.
//!
//! Pages collect drawing operators, text spans, intra-document links and form
//! fields. Links point at [`DestId`]s from the plan's destination table, which
//! become entries of the catalog's `/Dests` dictionary, so every link target is
//! known before any page is written.

use super::fonts::{EmbeddedFont, Face, FontSet, Typeface};
use super::metrics::{self, FIRST_CHAR, LAST_CHAR};
use crate::notebook::{DestId, DestinationTable, Rect};
use crate::units::Pt;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Date, Filter, Name, Pdf, Ref, Str, TextStr};
use std::io::Write;

/// Which font and size a span of text is set in.
#[derive(Copy, Clone, Debug)]
pub struct SpanFont {
    pub face: Face,
    pub size: Pt,
}

/// A run of text on a single baseline.
#[derive(Clone, Debug)]
pub struct SpanLayout {
    pub text: String,
    pub font: SpanFont,
    /// Fill grey level, 0 is black
    pub grey: f32,
    /// Start of the baseline
    pub coords: (Pt, Pt),
}

/// A clickable area that jumps to a destination in the same document.
#[derive(Copy, Clone, Debug)]
pub struct Link {
    pub rect: Rect,
    pub target: DestId,
}

/// An editable text field on a page.
#[derive(Clone, Debug)]
pub struct TextField {
    /// Fully qualified field name, unique in the document
    pub name: String,
    /// Tooltip shown by viewers
    pub label: String,
    pub value: String,
    pub rect: Rect,
    pub multiline: bool,
}

#[derive(Default)]
pub struct Page {
    operations: Vec<u8>,
    links: Vec<Link>,
    fields: Vec<TextField>,
}

impl Page {
    pub fn new() -> Page {
        Page::default()
    }

    /// Append raw drawing operators.
    pub fn add_content(&mut self, content: Content) {
        self.operations.extend_from_slice(&content.finish());
        self.operations.push(b'\n');
    }

    pub fn add_span(&mut self, span: SpanLayout) {
        let text = metrics::encode(&span.text);
        let mut content = Content::new();
        content.save_state();
        content.set_fill_gray(span.grey);
        content.begin_text();
        content.set_font(Name(span.font.face.resource_name()), *span.font.size);
        content.next_line(*span.coords.0, *span.coords.1);
        content.show(Str(&text));
        content.end_text();
        content.restore_state();
        self.add_content(content);
    }

    pub fn add_intradocument_link(&mut self, rect: Rect, target: DestId) {
        self.links.push(Link { rect, target });
    }

    pub fn add_text_field(&mut self, field: TextField) {
        self.fields.push(field);
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[cfg(test)]
    pub fn fields(&self) -> &[TextField] {
        &self.fields
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.links.is_empty() && self.fields.is_empty()
    }
}

/// An entry in the document outline (bookmarks panel).
#[derive(Clone, Debug)]
pub struct OutlineEntry {
    pub title: String,
    pub target: DestId,
}

/// Document information dictionary contents.
#[derive(Clone, Debug, Default)]
pub struct Info {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    pub creator: Option<String>,
}

pub struct Document<'f> {
    pub page_size: (Pt, Pt),
    pub fonts: &'f FontSet,
    pub destinations: DestinationTable,
    pub pages: Vec<Page>,
    pub outline: Vec<OutlineEntry>,
    pub info: Info,
}

/// Hands out sequential object ids.
struct Refs(i32);

impl Refs {
    fn next(&mut self) -> Ref {
        self.0 += 1;
        Ref::new(self.0)
    }
}

fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

fn pdf_rect(rect: &Rect) -> pdf_writer::Rect {
    pdf_writer::Rect::new(*rect.x1, *rect.y1, *rect.x2, *rect.y2)
}

impl<'f> Document<'f> {
    pub fn new(page_size: (Pt, Pt), fonts: &'f FontSet, destinations: DestinationTable) -> Self {
        Document {
            page_size,
            fonts,
            destinations,
            pages: Vec::new(),
            outline: Vec::new(),
            info: Info::default(),
        }
    }

    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    pub fn add_bookmark<S: Into<String>>(&mut self, title: S, target: DestId) {
        self.outline.push(OutlineEntry {
            title: title.into(),
            target,
        });
    }

    pub fn set_info(&mut self, info: Info) {
        self.info = info;
    }

    /// Serialize the document.
    pub fn write(&self) -> std::io::Result<Vec<u8>> {
        let mut refs = Refs(0);
        let catalog_id = refs.next();
        let page_tree_id = refs.next();
        let info_id = refs.next();
        let dests_id = refs.next();

        let mut pdf = Pdf::new();
        pdf.set_version(1, 7);

        // fonts
        let font_ids: Vec<(Face, Ref)> = Face::all().iter().map(|f| (*f, refs.next())).collect();
        for (face, font_id) in font_ids.iter() {
            match self.fonts.face(*face) {
                Typeface::Standard(base_font) => {
                    pdf.type1_font(*font_id)
                        .base_font(Name(base_font.as_bytes()))
                        .pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
                }
                Typeface::Embedded(font) => {
                    write_truetype_font(&mut pdf, &mut refs, *font_id, font)?;
                }
            }
        }
        let sans_id = font_ids[0].1;

        // pages and their content streams
        let page_ids: Vec<Ref> = self.pages.iter().map(|_| refs.next()).collect();
        let mut field_ids: Vec<Ref> = Vec::new();
        for (page, page_id) in self.pages.iter().zip(page_ids.iter()) {
            let content_id = refs.next();
            let compressed = compress(&page.operations)?;
            pdf.stream(content_id, &compressed)
                .filter(Filter::FlateDecode);

            let mut annotation_ids: Vec<Ref> = Vec::new();
            for link in page.links.iter() {
                let annotation_id = refs.next();
                let dest = self.destinations.get(link.target);
                let mut annotation = pdf.annotation(annotation_id);
                annotation
                    .subtype(AnnotationType::Link)
                    .rect(pdf_rect(&link.rect))
                    .border(0.0, 0.0, 0.0, None);
                annotation
                    .action()
                    .action_type(ActionType::GoTo)
                    .pair(Name(b"D"), Name(dest.name.as_bytes()));
                drop(annotation);
                annotation_ids.push(annotation_id);
            }

            for field in page.fields.iter() {
                let field_id = refs.next();
                write_text_field(&mut pdf, field_id, *page_id, field);
                annotation_ids.push(field_id);
                field_ids.push(field_id);
            }

            let mut pdf_page = pdf.page(*page_id);
            pdf_page
                .media_box(pdf_writer::Rect::new(
                    0.0,
                    0.0,
                    *self.page_size.0,
                    *self.page_size.1,
                ))
                .parent(page_tree_id)
                .contents(content_id);
            if !annotation_ids.is_empty() {
                pdf_page.annotations(annotation_ids.iter().copied());
            }
            {
                let mut resources = pdf_page.resources();
                let mut fonts = resources.fonts();
                for (face, font_id) in font_ids.iter() {
                    fonts.pair(Name(face.resource_name()), *font_id);
                }
            }
        }

        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        // named destinations, all resolved against the page ids above
        {
            let mut dests = pdf.indirect(dests_id).dict();
            for dest in self.destinations.iter() {
                dests
                    .insert(Name(dest.name.as_bytes()))
                    .array()
                    .item(page_ids[dest.page_index])
                    .item(Name(b"Fit"));
            }
        }

        // outline
        let outline_id = if self.outline.is_empty() {
            None
        } else {
            let outline_id = refs.next();
            let item_ids: Vec<Ref> = self.outline.iter().map(|_| refs.next()).collect();
            pdf.outline(outline_id)
                .first(item_ids[0])
                .last(item_ids[item_ids.len() - 1])
                .count(item_ids.len() as i32);
            for (i, entry) in self.outline.iter().enumerate() {
                let dest = self.destinations.get(entry.target);
                let mut item = pdf.outline_item(item_ids[i]);
                item.title(TextStr(&entry.title)).parent(outline_id);
                if i > 0 {
                    item.prev(item_ids[i - 1]);
                }
                if i + 1 < item_ids.len() {
                    item.next(item_ids[i + 1]);
                }
                item.pair(Name(b"Dest"), Name(dest.name.as_bytes()));
            }
            Some(outline_id)
        };

        {
            let mut catalog = pdf.catalog(catalog_id);
            catalog.pages(page_tree_id);
            catalog.pair(Name(b"Dests"), dests_id);
            if let Some(outline_id) = outline_id {
                catalog.outlines(outline_id);
                catalog.pair(Name(b"PageMode"), Name(b"UseOutlines"));
            }
            if !field_ids.is_empty() {
                let mut form = catalog.insert(Name(b"AcroForm")).dict();
                form.insert(Name(b"Fields"))
                    .array()
                    .items(field_ids.iter().copied());
                form.pair(Name(b"NeedAppearances"), true);
                form.pair(Name(b"DA"), Str(b"/Helv 0 Tf 0 g"));
                form.insert(Name(b"DR"))
                    .dict()
                    .insert(Name(b"Font"))
                    .dict()
                    .pair(Name(b"Helv"), sans_id);
            }
        }

        {
            let now = chrono::Local::now();
            let mut info = pdf.document_info(info_id);
            if let Some(title) = &self.info.title {
                info.title(TextStr(title));
            }
            if let Some(author) = &self.info.author {
                info.author(TextStr(author));
            }
            if let Some(subject) = &self.info.subject {
                info.subject(TextStr(subject));
            }
            if let Some(keywords) = &self.info.keywords {
                info.keywords(TextStr(keywords));
            }
            if let Some(creator) = &self.info.creator {
                info.creator(TextStr(creator));
            }
            use chrono::{Datelike, Timelike};
            info.creation_date(
                Date::new(now.year() as u16)
                    .month(now.month() as u8)
                    .day(now.day() as u8)
                    .hour(now.hour() as u8)
                    .minute(now.minute() as u8)
                    .second(now.second() as u8),
            );
        }

        Ok(pdf.finish())
    }
}

fn write_truetype_font(
    pdf: &mut Pdf,
    refs: &mut Refs,
    font_id: Ref,
    font: &EmbeddedFont,
) -> std::io::Result<()> {
    let descriptor_id = refs.next();
    let file_id = refs.next();

    {
        let mut dict = pdf.indirect(font_id).dict();
        dict.pair(Name(b"Type"), Name(b"Font"));
        dict.pair(Name(b"Subtype"), Name(b"TrueType"));
        dict.pair(Name(b"BaseFont"), Name(font.base_font.as_bytes()));
        dict.pair(Name(b"FirstChar"), FIRST_CHAR as i32);
        dict.pair(Name(b"LastChar"), LAST_CHAR as i32);
        dict.insert(Name(b"Widths"))
            .array()
            .items(font.widths.iter().copied());
        dict.pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
        dict.pair(Name(b"FontDescriptor"), descriptor_id);
    }

    {
        let mut descriptor = pdf.indirect(descriptor_id).dict();
        descriptor.pair(Name(b"Type"), Name(b"FontDescriptor"));
        descriptor.pair(Name(b"FontName"), Name(font.base_font.as_bytes()));
        // non-symbolic
        descriptor.pair(Name(b"Flags"), 32);
        descriptor.pair(
            Name(b"FontBBox"),
            pdf_writer::Rect::new(font.bbox[0], font.bbox[1], font.bbox[2], font.bbox[3]),
        );
        descriptor.pair(Name(b"ItalicAngle"), 0);
        descriptor.pair(Name(b"Ascent"), font.ascent);
        descriptor.pair(Name(b"Descent"), font.descent);
        descriptor.pair(Name(b"CapHeight"), font.cap_height);
        descriptor.pair(Name(b"StemV"), 80);
        descriptor.pair(Name(b"FontFile2"), file_id);
    }

    let compressed = compress(&font.data)?;
    pdf.stream(file_id, &compressed)
        .filter(Filter::FlateDecode)
        .pair(Name(b"Length1"), font.data.len() as i32);
    Ok(())
}

/// Ff bit 13
const FIELD_FLAG_MULTILINE: i32 = 1 << 12;

fn write_text_field(pdf: &mut Pdf, field_id: Ref, page_id: Ref, field: &TextField) {
    let mut dict = pdf.indirect(field_id).dict();
    dict.pair(Name(b"Type"), Name(b"Annot"));
    dict.pair(Name(b"Subtype"), Name(b"Widget"));
    dict.pair(Name(b"FT"), Name(b"Tx"));
    dict.pair(Name(b"T"), TextStr(&field.name));
    dict.pair(Name(b"TU"), TextStr(&field.label));
    dict.pair(Name(b"V"), TextStr(&field.value));
    dict.pair(Name(b"Rect"), pdf_rect(&field.rect));
    dict.pair(Name(b"P"), page_id);
    // printable
    dict.pair(Name(b"F"), 4);
    dict.pair(Name(b"DA"), Str(b"/Helv 9 Tf 0 g"));
    if field.multiline {
        dict.pair(Name(b"Ff"), FIELD_FLAG_MULTILINE);
    }
    dict.insert(Name(b"Border")).array().items([0, 0, 0]);
}
