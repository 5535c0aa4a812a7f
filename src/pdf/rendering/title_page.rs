//! The cover page: a header, ruled and fillable fields, and a footer naming the
//! device the notebook was sized for.

use crate::notebook::{NotebookConfig, Rect, TitleMetadata};
use crate::pdf::document::{Page, SpanFont, SpanLayout, TextField};
use crate::pdf::fonts::Face;
use crate::units::{Mm, Pt};
use pdf_writer::types::LineCapStyle;
use pdf_writer::Content;

pub const HEADER: &str = "Linked Workbook";
const HEADER_SIZE: Pt = Pt(16.0);
const LABEL_SIZE: Pt = Pt(7.0);
const FOOTER_SIZE: Pt = Pt(6.0);

/// Gap between the rules of a multi-line field
const LINE_GAP: Pt = Pt(20.0);
/// Label baseline below the last rule of a field
const LABEL_DROP: Pt = Pt(12.0);
/// Room for writing above a rule, covered by the form field
const FIELD_HEIGHT: Pt = Pt(14.0);

struct FieldSpec {
    name: &'static str,
    label: &'static str,
    lines: usize,
    value: Option<String>,
}

fn field_specs(metadata: &TitleMetadata) -> Vec<FieldSpec> {
    let tags = if metadata.tags.is_empty() {
        None
    } else {
        Some(metadata.tags.join(", "))
    };
    vec![
        FieldSpec {
            name: "title",
            label: "Title",
            lines: 1,
            value: metadata.title.clone(),
        },
        FieldSpec {
            name: "author",
            label: "Author",
            lines: 1,
            value: metadata.author.clone(),
        },
        FieldSpec {
            name: "description",
            label: "Description",
            lines: 3,
            value: metadata.description.clone(),
        },
        FieldSpec {
            name: "date_from",
            label: "Date From",
            lines: 1,
            value: metadata.date_from.clone(),
        },
        FieldSpec {
            name: "date_to",
            label: "Date To",
            lines: 1,
            value: metadata.date_to.clone(),
        },
        FieldSpec {
            name: "tags",
            label: "Tags",
            lines: 1,
            value: tags,
        },
    ]
}

pub fn render(config: &NotebookConfig) -> Page {
    let geometry = config.geometry();
    let mut page = Page::new();

    let header_gap: Pt = Mm(20.0).into();
    page.add_span(SpanLayout {
        text: HEADER.to_string(),
        font: SpanFont {
            face: Face::Serif,
            size: HEADER_SIZE,
        },
        grey: 0.3,
        coords: (geometry.left, geometry.height - geometry.top - header_gap),
    });

    let x1 = geometry.left;
    let x2 = geometry.width - geometry.right;
    let fields_gap: Pt = Mm(30.0).into();
    let mut y = geometry.height - geometry.top - Pt(20.0) - fields_gap;

    let mut rules = Content::new();
    rules
        .save_state()
        .set_stroke_gray(0.7)
        .set_line_width(0.5)
        .set_line_cap(LineCapStyle::ButtCap);

    for spec in field_specs(&config.title_metadata) {
        let top_rule = y;
        for line in 0..spec.lines {
            rules.move_to(*x1, *y).line_to(*x2, *y);
            if line + 1 < spec.lines {
                y -= LINE_GAP;
            }
        }

        page.add_text_field(TextField {
            name: spec.name.to_string(),
            label: spec.label.to_string(),
            value: spec.value.unwrap_or_default(),
            rect: Rect {
                x1,
                y1: y + Pt(1.0),
                x2,
                y2: top_rule + FIELD_HEIGHT,
            },
            multiline: spec.lines > 1,
        });

        y -= LABEL_DROP;
        page.add_span(SpanLayout {
            text: spec.label.to_string(),
            font: SpanFont {
                face: Face::Sans,
                size: LABEL_SIZE,
            },
            grey: 0.3,
            coords: (x1, y),
        });
        y -= if spec.lines > 1 { Pt(38.0) } else { Pt(28.0) };
    }

    rules.stroke().restore_state();
    page.add_content(rules);

    page.add_span(SpanLayout {
        text: format!("For {}", config.page_size.display_name()),
        font: SpanFont {
            face: Face::SansOblique,
            size: FOOTER_SIZE,
        },
        grey: 0.4,
        coords: (geometry.left, Pt::from(Mm(10.0))),
    });

    page
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::notebook::TitleMetadataBuilder;

    #[test]
    fn fields_are_prefilled_from_metadata() {
        let metadata = TitleMetadataBuilder::default()
            .title("Lab book")
            .date_from("2026-01-01")
            .tag("chemistry")
            .tag("2026")
            .build()
            .unwrap();
        let config = NotebookConfig::builder()
            .title_metadata(metadata)
            .build()
            .unwrap();
        let page = render(&config);

        let fields = page.fields();
        let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["title", "author", "description", "date_from", "date_to", "tags"]
        );
        assert_eq!(fields[0].value, "Lab book");
        assert_eq!(fields[1].value, "");
        assert_eq!(fields[3].value, "2026-01-01");
        assert_eq!(fields[5].value, "chemistry, 2026");
    }

    #[test]
    fn only_the_description_is_multiline() {
        let config = NotebookConfig::builder().build().unwrap();
        let page = render(&config);
        for field in page.fields() {
            assert_eq!(field.multiline, field.name == "description");
            assert!(field.rect.height() > Pt(0.0));
        }

        // fields run down the page without overlapping
        for pair in page.fields().windows(2) {
            assert!(pair[1].rect.y2 < pair[0].rect.y1);
        }
    }

    #[test]
    fn title_page_has_no_links() {
        let config = NotebookConfig::builder().build().unwrap();
        assert!(render(&config).links().is_empty());
    }
}
